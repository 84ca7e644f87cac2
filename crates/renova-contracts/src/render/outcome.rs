use serde::{Deserialize, Serialize};

use crate::errors::RenderError;

/// Which pathway produced the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationSource {
    Modification,
    Creation,
    Fallback,
}

impl GenerationSource {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Modification => "modification",
            Self::Creation => "creation",
            Self::Fallback => "fallback",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationResult {
    pub image_bytes: Vec<u8>,
    pub mime_type: String,
    pub description: Option<String>,
    pub attempts_used: u32,
    pub source_mode: GenerationSource,
}

/// What the chat layer receives from `generate_render`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum RenderOutcome {
    #[serde(rename_all = "camelCase")]
    Success {
        image_url: String,
        description: String,
        prompt_used: String,
    },
    Error { error: String },
}

impl RenderOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

impl From<RenderError> for RenderOutcome {
    fn from(err: RenderError) -> Self {
        Self::Error {
            error: err.to_string(),
        }
    }
}
