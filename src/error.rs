use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SkelError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration: {0}")]
    Validation(String),

    #[error("Browser error: {0}")]
    Browser(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl SkelError {
    pub fn validation(message: impl Into<String>) -> Self {
        SkelError::Validation(message.into())
    }

    pub fn browser(message: impl Into<String>) -> Self {
        SkelError::Browser(message.into())
    }

    /// True for errors caught before any browser work begins. The CLI maps
    /// these to a distinct exit code so scripts can tell bad invocations
    /// apart from runtime failures.
    pub fn is_validation(&self) -> bool {
        matches!(self, SkelError::Validation(_))
    }

    pub fn to_payload(&self) -> ErrorPayload {
        match self {
            SkelError::Io(e) => ErrorPayload::new(
                ErrorCategory::Io,
                e.to_string(),
                "Check file paths/permissions.",
            ),
            SkelError::Validation(msg) => ErrorPayload::new(
                ErrorCategory::Validation,
                msg.to_string(),
                "Check --url and --out; the output path must already exist.",
            ),
            SkelError::Browser(msg) => {
                let lower = msg.to_ascii_lowercase();
                if lower.contains("cannot find module 'playwright'")
                    || lower.contains("playwright npm package is missing")
                {
                    ErrorPayload::new(
                        ErrorCategory::Browser,
                        msg.to_string(),
                        "Install Playwright (`npm install playwright` and `npx playwright install chromium`).",
                    )
                } else if lower.contains("not found on path") {
                    ErrorPayload::new(
                        ErrorCategory::Browser,
                        msg.to_string(),
                        "Install Node.js and ensure the node binary is on PATH.",
                    )
                } else if lower.contains("timed out") || lower.contains("timeout") {
                    ErrorPayload::new(
                        ErrorCategory::Browser,
                        msg.to_string(),
                        "Try increasing --nav-timeout/--process-timeout, and ensure the page loads without blocking.",
                    )
                } else {
                    ErrorPayload::new(
                        ErrorCategory::Browser,
                        msg.to_string(),
                        "Re-run with --verbose for the helper's full output.",
                    )
                }
            }
            SkelError::Serialization(e) => ErrorPayload::new(
                ErrorCategory::Browser,
                e.to_string(),
                "Unexpected helper output; re-run with --verbose.",
            ),
        }
    }
}

pub type Result<T> = std::result::Result<T, SkelError>;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ErrorCategory {
    Validation,
    Browser,
    Io,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorPayload {
    pub category: ErrorCategory,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remediation: Option<String>,
}

impl ErrorPayload {
    pub fn new(category: ErrorCategory, message: String, remediation: impl Into<String>) -> Self {
        Self {
            category,
            message,
            remediation: Some(remediation.into()),
        }
    }
}
