pub mod capabilities;
pub mod config;
pub mod dryrun;
pub mod fallback;
pub mod fetch;
pub mod gemini;
pub mod invoker;
pub mod leads;
pub mod router;
pub mod service;
pub mod storage;

use std::sync::Arc;

use anyhow::Result;
use renova_contracts::events::EventWriter;
use serde_json::{Map, Value};

pub use capabilities::{
    Architect, ContentPart, GenerationResponse, ImageFetcher, ImageGenerator, LeadStore,
    ObjectStorage, VisionAnalyzer,
};
pub use config::{EngineConfig, RetryPolicy};
pub use invoker::GenerationInvoker;
pub use leads::{LeadRecord, LeadRequest};
pub use service::{Capabilities, RenderService};

const LEADS_FILE_NAME: &str = "leads.jsonl";

/// Which backend answers the model calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    Gemini,
    Dryrun,
}

impl ProviderKind {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "gemini" | "google" => Some(Self::Gemini),
            "dryrun" | "dry-run" => Some(Self::Dryrun),
            _ => None,
        }
    }
}

/// Wires a `RenderService` from config: HTTP fetch, local bucket, JSONL
/// leads, and either Gemini or the offline dry-run models.
pub fn build_service(
    config: &EngineConfig,
    provider: ProviderKind,
    events: EventWriter,
) -> Result<RenderService> {
    let (vision, architect, generator): (
        Arc<dyn VisionAnalyzer>,
        Arc<dyn Architect>,
        Arc<dyn ImageGenerator>,
    ) = match provider {
        ProviderKind::Gemini => {
            let client = Arc::new(gemini::GeminiClient::new(config)?);
            (client.clone(), client.clone(), client)
        }
        ProviderKind::Dryrun => {
            let models = Arc::new(dryrun::DryrunModels);
            (models.clone(), models.clone(), models)
        }
    };
    let capabilities = Capabilities {
        vision,
        architect,
        generator,
        fetcher: Arc::new(fetch::HttpImageFetcher::new(config.request_timeout)),
        storage: Arc::new(storage::LocalObjectStorage::new(
            config.storage_dir.clone(),
            config.public_base_url.clone(),
        )),
        leads: Arc::new(leads::JsonlLeadStore::new(
            config.storage_dir.join(LEADS_FILE_NAME),
        )),
    };
    let invoker = GenerationInvoker::new(
        config.retry,
        config.max_image_bytes,
        Box::new(invoker::ThreadSleeper),
    );
    Ok(RenderService::new(capabilities, invoker, events))
}

pub(crate) fn map_object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}
