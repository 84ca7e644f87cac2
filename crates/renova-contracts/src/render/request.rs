use serde::{Deserialize, Serialize};

use crate::errors::RenderError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    #[default]
    Creation,
    Modification,
}

impl RenderMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Creation => "creation",
            Self::Modification => "modification",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ModificationType {
    #[default]
    Renovation,
    Detail,
}

/// Input of one `generate_render` call, as sent by the chat layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderRequest {
    #[serde(default)]
    pub prompt: String,
    pub room_type: String,
    pub style: String,
    #[serde(default, alias = "structuralElements")]
    pub structural_elements_text: String,
    #[serde(default)]
    pub mode: RenderMode,
    #[serde(default, alias = "sourceImageUrl")]
    pub source_image_ref: Option<String>,
    #[serde(default)]
    pub modification_type: ModificationType,
    #[serde(default)]
    pub keep_elements: Vec<String>,
}

impl RenderRequest {
    pub fn validate(&self) -> Result<(), RenderError> {
        if self.room_type.trim().is_empty() {
            return Err(RenderError::Validation("roomType is required".to_string()));
        }
        if self.style.trim().is_empty() {
            return Err(RenderError::Validation("style is required".to_string()));
        }
        if self.mode == RenderMode::Modification && self.source_image().is_none() {
            return Err(RenderError::Validation(
                "sourceImageUrl is required in modification mode".to_string(),
            ));
        }
        Ok(())
    }

    pub fn source_image(&self) -> Option<&str> {
        self.source_image_ref
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
    }

    pub fn structural_elements(&self) -> Option<&str> {
        Some(self.structural_elements_text.trim()).filter(|value| !value.is_empty())
    }
}

/// Raw bytes of a fetched reference photo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceImage {
    pub bytes: Vec<u8>,
    pub mime_type: String,
}
