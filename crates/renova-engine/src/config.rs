use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const MAX_GENERATION_ATTEMPTS: u32 = 3;
pub const BACKOFF_BASE: Duration = Duration::from_secs(2);
pub const BACKOFF_MULTIPLIER: u32 = 2;
pub const MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_IMAGE_MODEL: &str = "gemini-2.5-flash-image";
const DEFAULT_TEXT_MODEL: &str = "gemini-2.5-flash";
const DEFAULT_STORAGE_DIR: &str = "renders";
const DEFAULT_PUBLIC_BASE_URL: &str = "file://renders";

/// Attempt ceiling and exponential backoff for generation calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub multiplier: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: MAX_GENERATION_ATTEMPTS,
            base_delay: BACKOFF_BASE,
            multiplier: BACKOFF_MULTIPLIER,
        }
    }
}

impl RetryPolicy {
    /// Wait after failed attempt number `attempt` (1-based).
    pub fn delay_after(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1);
        let factor = self.multiplier.max(1).saturating_pow(exponent);
        self.base_delay.saturating_mul(factor)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub gemini_api_key: Option<String>,
    pub gemini_api_base: String,
    pub image_model: String,
    pub text_model: String,
    pub request_timeout: Duration,
    pub storage_dir: PathBuf,
    pub public_base_url: String,
    pub retry: RetryPolicy,
    pub max_image_bytes: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

impl EngineConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(non_empty_env)
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let request_timeout = lookup("RENOVA_REQUEST_TIMEOUT")
            .and_then(|raw| raw.trim().parse::<f64>().ok())
            .filter(|value| value.is_finite())
            .map(|value| Duration::from_secs_f64(value.clamp(15.0, 300.0)))
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT);
        Self {
            gemini_api_key: lookup("GEMINI_API_KEY").or_else(|| lookup("GOOGLE_API_KEY")),
            gemini_api_base: lookup("GEMINI_API_BASE")
                .map(|value| value.trim().trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_GEMINI_API_BASE.to_string()),
            image_model: lookup("RENOVA_IMAGE_MODEL")
                .unwrap_or_else(|| DEFAULT_IMAGE_MODEL.to_string()),
            text_model: lookup("RENOVA_TEXT_MODEL")
                .unwrap_or_else(|| DEFAULT_TEXT_MODEL.to_string()),
            request_timeout,
            storage_dir: lookup("RENOVA_STORAGE_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_STORAGE_DIR)),
            public_base_url: lookup("RENOVA_PUBLIC_BASE_URL")
                .map(|value| value.trim().trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_PUBLIC_BASE_URL.to_string()),
            retry: RetryPolicy::default(),
            max_image_bytes: MAX_IMAGE_BYTES,
        }
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
