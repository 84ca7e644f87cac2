use std::sync::Arc;

use anyhow::Result;
use renova_contracts::compiler::compile;
use renova_contracts::errors::RenderError;
use renova_contracts::events::EventWriter;
use renova_contracts::prompts::{creation_prompt, default_description, fallback_prompt};
use renova_contracts::render::{
    ArchitectBrief, ArchitectResult, GenerationResult, GenerationSource, RenderOutcome,
    RenderRequest, SourceImage,
};
use serde_json::json;

use crate::capabilities::{
    Architect, ImageFetcher, ImageGenerator, LeadStore, ObjectStorage, VisionAnalyzer,
};
use crate::fallback::attempt_with_fallback;
use crate::invoker::GenerationInvoker;
use crate::leads::{LeadRecord, LeadRequest};
use crate::map_object;
use crate::router::{fetch_source, route, Route};
use crate::storage::render_slug;

/// Client handles the pipeline runs against.
#[derive(Clone)]
pub struct Capabilities {
    pub vision: Arc<dyn VisionAnalyzer>,
    pub architect: Arc<dyn Architect>,
    pub generator: Arc<dyn ImageGenerator>,
    pub fetcher: Arc<dyn ImageFetcher>,
    pub storage: Arc<dyn ObjectStorage>,
    pub leads: Arc<dyn LeadStore>,
}

struct Rendered {
    prompt: String,
    result: GenerationResult,
}

pub struct RenderService {
    capabilities: Capabilities,
    invoker: GenerationInvoker,
    events: EventWriter,
}

impl RenderService {
    pub fn new(capabilities: Capabilities, invoker: GenerationInvoker, events: EventWriter) -> Self {
        Self {
            capabilities,
            invoker,
            events,
        }
    }

    /// The single entry point used by the chat layer. Never fails: every
    /// error is folded into `RenderOutcome::Error`.
    pub fn generate_render(&self, session_id: &str, request: &RenderRequest) -> RenderOutcome {
        let events = self.events.for_session(session_id);
        match self.render(&events, session_id, request) {
            Ok(outcome) => outcome,
            Err(err) => {
                events.record(
                    "render_failed",
                    map_object(json!({
                        "kind": err.kind(),
                        "error": err.to_string(),
                    })),
                );
                RenderOutcome::from(err)
            }
        }
    }

    pub fn submit_lead(&self, session_id: &str, request: LeadRequest) -> Result<String> {
        let record = LeadRecord::from_request(session_id, request)?;
        let id = self.capabilities.leads.save(&record)?;
        self.events.for_session(session_id).record(
            "lead_recorded",
            map_object(json!({
                "lead_id": id,
                "room_type": record.room_type,
                "style": record.style,
            })),
        );
        Ok(id)
    }

    fn render(
        &self,
        events: &EventWriter,
        session_id: &str,
        request: &RenderRequest,
    ) -> Result<RenderOutcome, RenderError> {
        request.validate()?;
        events.record(
            "render_started",
            map_object(json!({
                "mode": request.mode.as_str(),
                "room_type": request.room_type,
                "style": request.style,
            })),
        );

        let route = route(request)?;
        events.record(
            "render_routed",
            map_object(json!({ "pathway": route.pathway() })),
        );
        let rendered = match route {
            Route::Creation => self.run_creation(events, request)?,
            Route::Modification { source_url } => attempt_with_fallback(
                || self.run_modification(events, request, source_url),
                |err| {
                    events.record(
                        "modification_failed",
                        map_object(json!({
                            "stage": err.kind(),
                            "error": err.to_string(),
                        })),
                    );
                },
                || self.run_fallback(events, request),
            )?,
        };

        let result = &rendered.result;
        let slug = render_slug(&request.room_type, &request.style, &result.image_bytes);
        let image_url = self
            .capabilities
            .storage
            .upload(&result.image_bytes, &result.mime_type, session_id, &slug)
            .map_err(|err| RenderError::upload(&err))?;
        events.record(
            "render_completed",
            map_object(json!({
                "source_mode": result.source_mode.as_str(),
                "attempts": result.attempts_used,
                "bytes": result.image_bytes.len(),
                "image_url": image_url,
            })),
        );

        Ok(RenderOutcome::Success {
            image_url,
            description: result
                .description
                .clone()
                .unwrap_or_else(|| default_description(&request.room_type, &request.style)),
            prompt_used: rendered.prompt,
        })
    }

    fn run_creation(
        &self,
        events: &EventWriter,
        request: &RenderRequest,
    ) -> Result<Rendered, RenderError> {
        let prompt = creation_prompt(
            &request.room_type,
            &request.style,
            &request.prompt,
            request.structural_elements(),
        );
        self.generate(events, prompt, None, GenerationSource::Creation)
    }

    /// fetch → triage → architect → compile → generate.
    fn run_modification(
        &self,
        events: &EventWriter,
        request: &RenderRequest,
        source_url: &str,
    ) -> Result<Rendered, RenderError> {
        let image = fetch_source(source_url, self.capabilities.fetcher.as_ref())?;

        let analysis = self
            .capabilities
            .vision
            .analyze(&image)
            .map_err(|err| RenderError::analysis(&err))?;
        let brief = ArchitectBrief {
            room_type: request.room_type.clone(),
            style: request.style.clone(),
            user_prompt: request.prompt.clone(),
            structural_elements_text: request.structural_elements_text.clone(),
            keep_elements: request.keep_elements.clone(),
            modification_type: request.modification_type,
            analysis,
        };
        let plan = self
            .capabilities
            .architect
            .plan(&image, &brief)
            .map_err(|err| RenderError::analysis(&err))?;
        let prompt = match plan {
            ArchitectResult::Structured(output) => compile(&output).text(),
            ArchitectResult::Locked(prompt) => {
                events.record(
                    "architect_locked_prompt",
                    map_object(json!({ "chars": prompt.chars().count() })),
                );
                prompt
            }
        };
        self.generate(events, prompt, Some(&image), GenerationSource::Modification)
    }

    /// Creation-style retry after the modification pathway failed. Uses
    /// only room type, style and the raw user prompt.
    fn run_fallback(
        &self,
        events: &EventWriter,
        request: &RenderRequest,
    ) -> Result<Rendered, RenderError> {
        events.record("fallback_started", map_object(json!({})));
        let prompt = fallback_prompt(&request.room_type, &request.style, &request.prompt);
        self.generate(events, prompt, None, GenerationSource::Fallback)
    }

    fn generate(
        &self,
        events: &EventWriter,
        prompt: String,
        reference: Option<&SourceImage>,
        source_mode: GenerationSource,
    ) -> Result<Rendered, RenderError> {
        let result = self.invoker.invoke(
            self.capabilities.generator.as_ref(),
            &prompt,
            reference,
            source_mode,
            events,
        )?;
        Ok(Rendered { prompt, result })
    }
}
