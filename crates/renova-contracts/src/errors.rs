use thiserror::Error;

/// Everything a render can fail with.
///
/// Inside the modification pathway every variant except `Validation` and
/// `Upload` is absorbed by the fallback controller; the caller only ever sees
/// the error of the last attempt.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    #[error("invalid render request: {0}")]
    Validation(String),

    #[error("source image unavailable: {0}")]
    Fetch(String),

    #[error("room analysis failed: {0}")]
    Analysis(String),

    #[error("image generation failed after {attempts} attempt(s): {message}")]
    GenerationTransient { attempts: u32, message: String },

    #[error("image generation returned an unusable result: {0}")]
    GenerationFatal(String),

    #[error("render upload failed: {0}")]
    Upload(String),
}

impl RenderError {
    pub fn fetch(err: &anyhow::Error) -> Self {
        Self::Fetch(error_chain_text(err, ERROR_TEXT_MAX_CHARS))
    }

    pub fn analysis(err: &anyhow::Error) -> Self {
        Self::Analysis(error_chain_text(err, ERROR_TEXT_MAX_CHARS))
    }

    pub fn upload(err: &anyhow::Error) -> Self {
        Self::Upload(error_chain_text(err, ERROR_TEXT_MAX_CHARS))
    }

    /// Short stable label used in event payloads.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::Fetch(_) => "fetch",
            Self::Analysis(_) => "analysis",
            Self::GenerationTransient { .. } => "generation_transient",
            Self::GenerationFatal(_) => "generation_fatal",
            Self::Upload(_) => "upload",
        }
    }

    pub fn is_fallback_eligible(&self) -> bool {
        !matches!(self, Self::Validation(_) | Self::Upload(_))
    }
}

pub const ERROR_TEXT_MAX_CHARS: usize = 600;

/// Flattens an anyhow chain into one line, dropping consecutive duplicates.
pub fn error_chain_text(err: &anyhow::Error, max_chars: usize) -> String {
    let mut parts: Vec<String> = Vec::new();
    for cause in err.chain() {
        let text = cause.to_string();
        let trimmed = text.trim();
        if trimmed.is_empty() {
            continue;
        }
        if parts
            .last()
            .map(|existing| existing == trimmed)
            .unwrap_or(false)
        {
            continue;
        }
        parts.push(trimmed.to_string());
    }
    if parts.is_empty() {
        return truncate_text(&err.to_string(), max_chars);
    }
    truncate_text(&parts.join(" | caused by: "), max_chars)
}

pub fn truncate_text(value: &str, max_chars: usize) -> String {
    if value.chars().count() <= max_chars {
        return value.to_string();
    }
    value.chars().take(max_chars).collect::<String>() + "…"
}
