//! API request and response types

use serde::{Deserialize, Serialize};

/// Standard API envelope for status/error responses
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success_with_message(message: &str) -> Self {
        Self {
            status: "success".to_string(),
            message: Some(message.to_string()),
            data: None,
        }
    }

    pub fn success_with_data(data: T) -> Self {
        Self {
            status: "success".to_string(),
            message: None,
            data: Some(data),
        }
    }

    pub fn error(message: &str) -> Self {
        Self {
            status: "error".to_string(),
            message: Some(message.to_string()),
            data: None,
        }
    }
}

/// Empty data type for responses without data
#[derive(Debug, Clone, Serialize)]
pub struct Empty {}

/// Query parameters for GET /api/v1/inventory_summary
///
/// Unsigned on purpose: negative horizons are a caller error and fail
/// extraction with a 400 before any work happens.
#[derive(Debug, Clone, Deserialize)]
pub struct SummaryParams {
    pub days: u32,
    pub days_to_predict: u32,
}
