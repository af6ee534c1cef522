use std::path::Path;

use serde::Serialize;

use crate::error::RectifyError;

/// The single JSON line printed on stdout for every run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Report {
    pub fn success(output: &Path) -> Self {
        Self {
            success: true,
            output: Some(output.to_string_lossy().into_owned()),
            error: None,
        }
    }

    pub fn failure(error: &RectifyError) -> Self {
        Self {
            success: false,
            output: None,
            error: Some(error.to_string()),
        }
    }

    pub fn to_json_line(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
