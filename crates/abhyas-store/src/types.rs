//! Wire types for content-store error responses.

use serde::Deserialize;

/// Error body shape the content store returns on non-2xx responses.
#[derive(Debug, Deserialize)]
pub struct StoreErrorResponse {
    pub error: StoreError,
}

#[derive(Debug, Deserialize)]
pub struct StoreError {
    pub message: String,
    #[serde(default)]
    pub code: Option<String>,
}

impl StoreErrorResponse {
    /// Placeholder used when the error body itself fails to decode.
    pub fn unknown() -> Self {
        Self {
            error: StoreError {
                message: "Unknown error".to_string(),
                code: None,
            },
        }
    }
}
