//! External collaborators of the render pipeline. Each is injected into
//! [`crate::RenderService`] so tests can substitute doubles.

use anyhow::Result;
use renova_contracts::render::{ArchitectBrief, ArchitectResult, RoomAnalysis, SourceImage};

use crate::leads::LeadRecord;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentPart {
    Text(String),
    InlineImage { mime_type: String, bytes: Vec<u8> },
}

/// Content parts of one successful generation call, in response order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GenerationResponse {
    pub parts: Vec<ContentPart>,
}

impl GenerationResponse {
    pub fn first_image(&self) -> Option<(&str, &[u8])> {
        self.parts.iter().find_map(|part| match part {
            ContentPart::InlineImage { mime_type, bytes } if !bytes.is_empty() => {
                Some((mime_type.as_str(), bytes.as_slice()))
            }
            _ => None,
        })
    }

    pub fn first_text(&self) -> Option<&str> {
        self.parts.iter().find_map(|part| match part {
            ContentPart::Text(text) if !text.trim().is_empty() => Some(text.trim()),
            _ => None,
        })
    }
}

pub trait VisionAnalyzer: Send + Sync {
    fn analyze(&self, image: &SourceImage) -> Result<RoomAnalysis>;
}

pub trait Architect: Send + Sync {
    fn plan(&self, image: &SourceImage, brief: &ArchitectBrief) -> Result<ArchitectResult>;
}

pub trait ImageGenerator: Send + Sync {
    fn generate(&self, prompt: &str, reference: Option<&SourceImage>)
        -> Result<GenerationResponse>;
}

pub trait ImageFetcher: Send + Sync {
    fn fetch(&self, url: &str) -> Result<SourceImage>;
}

/// Returns the public (or signed) URL of the stored object.
pub trait ObjectStorage: Send + Sync {
    fn upload(&self, image: &[u8], mime_type: &str, session_id: &str, slug: &str)
        -> Result<String>;
}

/// Returns the id of the stored record.
pub trait LeadStore: Send + Sync {
    fn save(&self, record: &LeadRecord) -> Result<String>;
}
