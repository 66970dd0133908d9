//! API response envelope

use serde::{Deserialize, Serialize};

/// Standard API response
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(default)]
    pub errors: Vec<ApiMessage>,
    #[serde(default)]
    pub messages: Vec<ApiMessage>,
    pub result: Option<T>,
    pub result_info: Option<ResultInfo>,
}

impl<T> ApiResponse<T> {
    /// `code: message` pairs joined for display
    pub fn error_summary(&self) -> String {
        self.errors
            .iter()
            .map(|e| match e.code {
                Some(code) => format!("{}: {}", code, e.message),
                None => e.message.clone(),
            })
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// API error or informational message
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiMessage {
    pub code: Option<i32>,
    pub message: String,
}

/// Pagination info
#[derive(Debug, Serialize, Deserialize)]
pub struct ResultInfo {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub total_pages: Option<u32>,
    pub count: Option<u32>,
    pub total_count: Option<u32>,
}
