use std::thread;
use std::time::Duration;

use renova_contracts::errors::{error_chain_text, RenderError, ERROR_TEXT_MAX_CHARS};
use renova_contracts::events::EventWriter;
use renova_contracts::render::{GenerationResult, GenerationSource, SourceImage};
use serde_json::json;

use crate::capabilities::ImageGenerator;
use crate::config::{RetryPolicy, MAX_IMAGE_BYTES};
use crate::map_object;

/// Error text fragments of network failures worth another attempt.
const TRANSIENT_SIGNATURES: &[&str] = &[
    "econnreset",
    "connection reset",
    "socket hang up",
    "other side closed",
    "terminated",
    "fetch failed",
    "timed out",
    "timeout",
];

pub trait Sleeper: Send + Sync {
    fn sleep(&self, delay: Duration);
}

pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&self, delay: Duration) {
        thread::sleep(delay);
    }
}

pub struct GenerationInvoker {
    policy: RetryPolicy,
    max_image_bytes: usize,
    sleeper: Box<dyn Sleeper>,
}

impl Default for GenerationInvoker {
    fn default() -> Self {
        Self::new(RetryPolicy::default(), MAX_IMAGE_BYTES, Box::new(ThreadSleeper))
    }
}

impl GenerationInvoker {
    pub fn new(policy: RetryPolicy, max_image_bytes: usize, sleeper: Box<dyn Sleeper>) -> Self {
        Self {
            policy,
            max_image_bytes,
            sleeper,
        }
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    /// One generation with bounded retries. Only transport failures are
    /// retried; a response without a usable image is fatal on first sight.
    pub fn invoke(
        &self,
        generator: &dyn ImageGenerator,
        prompt: &str,
        reference: Option<&SourceImage>,
        source_mode: GenerationSource,
        events: &EventWriter,
    ) -> Result<GenerationResult, RenderError> {
        let max_attempts = self.policy.max_attempts.max(1);
        let mut attempt = 0;
        let response = loop {
            attempt += 1;
            match generator.generate(prompt, reference) {
                Ok(response) => break response,
                Err(err) => {
                    let message = error_chain_text(&err, ERROR_TEXT_MAX_CHARS);
                    if !is_transient_error(&err) || attempt >= max_attempts {
                        return Err(RenderError::GenerationTransient {
                            attempts: attempt,
                            message,
                        });
                    }
                    let delay = self.policy.delay_after(attempt);
                    events.record(
                        "generation_retry",
                        map_object(json!({
                            "attempt": attempt,
                            "max_attempts": max_attempts,
                            "delay_ms": delay.as_millis() as u64,
                            "source_mode": source_mode.as_str(),
                            "error": message,
                        })),
                    );
                    self.sleeper.sleep(delay);
                }
            }
        };

        let Some((mime_type, bytes)) = response.first_image() else {
            return Err(RenderError::GenerationFatal(
                "response contained no inline image".to_string(),
            ));
        };
        if bytes.len() > self.max_image_bytes {
            return Err(RenderError::GenerationFatal(format!(
                "image of {} bytes exceeds the {} byte limit",
                bytes.len(),
                self.max_image_bytes
            )));
        }

        Ok(GenerationResult {
            image_bytes: bytes.to_vec(),
            mime_type: mime_type.to_string(),
            description: response.first_text().map(str::to_string),
            attempts_used: attempt,
            source_mode,
        })
    }
}

pub fn is_transient_error(err: &anyhow::Error) -> bool {
    err.chain().any(|cause| {
        let transport = cause
            .downcast_ref::<reqwest::Error>()
            .map(|reqwest_err| {
                reqwest_err.is_timeout() || reqwest_err.is_connect() || reqwest_err.is_request()
            })
            .unwrap_or(false);
        if transport {
            return true;
        }
        let text = cause.to_string().to_ascii_lowercase();
        TRANSIENT_SIGNATURES
            .iter()
            .any(|signature| text.contains(signature))
    })
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    use anyhow::{anyhow, Result};

    use super::*;
    use crate::capabilities::{ContentPart, GenerationResponse};

    struct ScriptedGenerator {
        script: Mutex<VecDeque<Result<GenerationResponse>>>,
        calls: Mutex<u32>,
    }

    impl ScriptedGenerator {
        fn new(script: Vec<Result<GenerationResponse>>) -> Self {
            Self {
                script: Mutex::new(script.into()),
                calls: Mutex::new(0),
            }
        }

        fn calls(&self) -> u32 {
            *self.calls.lock().unwrap()
        }
    }

    impl ImageGenerator for ScriptedGenerator {
        fn generate(
            &self,
            _prompt: &str,
            _reference: Option<&SourceImage>,
        ) -> Result<GenerationResponse> {
            *self.calls.lock().unwrap() += 1;
            self.script
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(anyhow!("script exhausted")))
        }
    }

    #[derive(Clone, Default)]
    struct RecordingSleeper {
        delays: Arc<Mutex<Vec<Duration>>>,
    }

    impl Sleeper for RecordingSleeper {
        fn sleep(&self, delay: Duration) {
            self.delays.lock().unwrap().push(delay);
        }
    }

    fn image(bytes: usize) -> GenerationResponse {
        GenerationResponse {
            parts: vec![
                ContentPart::Text("A bright kitchen".to_string()),
                ContentPart::InlineImage {
                    mime_type: "image/png".to_string(),
                    bytes: vec![7; bytes],
                },
            ],
        }
    }

    fn invoker(sleeper: &RecordingSleeper, max_image_bytes: usize) -> GenerationInvoker {
        GenerationInvoker::new(
            RetryPolicy::default(),
            max_image_bytes,
            Box::new(sleeper.clone()),
        )
    }

    fn invoke(
        invoker: &GenerationInvoker,
        generator: &ScriptedGenerator,
    ) -> Result<GenerationResult, RenderError> {
        invoker.invoke(
            generator,
            "prompt",
            None,
            GenerationSource::Creation,
            &EventWriter::disabled("test"),
        )
    }

    #[test]
    fn two_transient_failures_then_success_uses_three_attempts() {
        let sleeper = RecordingSleeper::default();
        let generator = ScriptedGenerator::new(vec![
            Err(anyhow!("read ECONNRESET")),
            Err(anyhow!("fetch failed")),
            Ok(image(16)),
        ]);
        let result = invoke(&invoker(&sleeper, 1024), &generator).expect("success");
        assert_eq!(generator.calls(), 3);
        assert_eq!(result.attempts_used, 3);
        assert_eq!(result.image_bytes.len(), 16);
        assert_eq!(result.description.as_deref(), Some("A bright kitchen"));
        assert_eq!(
            *sleeper.delays.lock().unwrap(),
            vec![Duration::from_secs(2), Duration::from_secs(4)]
        );
    }

    #[test]
    fn non_retryable_error_makes_one_attempt() {
        let sleeper = RecordingSleeper::default();
        let generator = ScriptedGenerator::new(vec![
            Err(anyhow!("Gemini request failed (400): invalid argument")),
            Ok(image(16)),
        ]);
        let err = invoke(&invoker(&sleeper, 1024), &generator).unwrap_err();
        assert_eq!(generator.calls(), 1);
        assert!(matches!(err, RenderError::GenerationTransient { attempts: 1, .. }));
        assert!(sleeper.delays.lock().unwrap().is_empty());
    }

    #[test]
    fn transient_errors_stop_at_the_ceiling() {
        let sleeper = RecordingSleeper::default();
        let generator = ScriptedGenerator::new(vec![
            Err(anyhow!("socket hang up")),
            Err(anyhow!("socket hang up")),
            Err(anyhow!("other side closed")),
            Ok(image(16)),
        ]);
        let err = invoke(&invoker(&sleeper, 1024), &generator).unwrap_err();
        assert_eq!(generator.calls(), 3);
        match err {
            RenderError::GenerationTransient { attempts, message } => {
                assert_eq!(attempts, 3);
                assert!(message.contains("other side closed"));
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn response_without_image_is_fatal_and_not_retried() {
        let sleeper = RecordingSleeper::default();
        let generator = ScriptedGenerator::new(vec![
            Ok(GenerationResponse {
                parts: vec![ContentPart::Text("I cannot draw that".to_string())],
            }),
            Ok(image(16)),
        ]);
        let err = invoke(&invoker(&sleeper, 1024), &generator).unwrap_err();
        assert_eq!(generator.calls(), 1);
        assert!(matches!(err, RenderError::GenerationFatal(_)));
    }

    #[test]
    fn oversized_image_is_fatal_and_not_retried() {
        let sleeper = RecordingSleeper::default();
        let generator = ScriptedGenerator::new(vec![Ok(image(2048)), Ok(image(16))]);
        let err = invoke(&invoker(&sleeper, 1024), &generator).unwrap_err();
        assert_eq!(generator.calls(), 1);
        assert!(matches!(err, RenderError::GenerationFatal(_)));
    }

    #[test]
    fn retries_are_logged() -> anyhow::Result<()> {
        let temp = tempfile::tempdir()?;
        let events_path = temp.path().join("events.jsonl");
        let sleeper = RecordingSleeper::default();
        let generator =
            ScriptedGenerator::new(vec![Err(anyhow!("operation timed out")), Ok(image(4))]);
        invoker(&sleeper, 1024)
            .invoke(
                &generator,
                "prompt",
                None,
                GenerationSource::Modification,
                &EventWriter::new(&events_path, "s-1"),
            )
            .map_err(|err| anyhow!(err))?;
        let raw = std::fs::read_to_string(events_path)?;
        let row: serde_json::Value = serde_json::from_str(raw.lines().next().unwrap_or(""))?;
        assert_eq!(row["type"], "generation_retry");
        assert_eq!(row["attempt"], 1);
        assert_eq!(row["delay_ms"], 2000);
        assert_eq!(row["source_mode"], "modification");
        Ok(())
    }

    #[test]
    fn transient_classification_reads_the_whole_chain() {
        let err = anyhow!("Connection reset by peer").context("Gemini request failed");
        assert!(is_transient_error(&err));
        assert!(!is_transient_error(&anyhow!("quota exceeded")));
    }
}
