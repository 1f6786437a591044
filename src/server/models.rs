use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::ValidationError;
use crate::document::DocumentResult;
use crate::utils::config::MergeConfig;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MergeRequest {
    /// Cell-detection payload, `{ "boxes": [...] }`
    pub cells: Value,

    /// OCR payload in any of the supported layouts
    pub ocr: Value,

    /// Thresholds for this request; the server defaults apply when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<MergeConfig>,
}

impl MergeRequest {
    /// Returns the request's own thresholds, or `default` when it has none.
    pub fn validated_config(&self, default: &MergeConfig) -> Result<MergeConfig, ValidationError> {
        let config = self.options.clone().unwrap_or_else(|| default.clone());
        config.validate()?;
        Ok(config)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MergeResponse {
    pub status: String,
    pub result: DocumentResult,
}

impl MergeResponse {
    pub fn success(result: DocumentResult) -> Self {
        Self {
            status: "success".to_string(),
            result,
        }
    }
}

/// Error response body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status: String,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            error: error.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

impl HealthResponse {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
