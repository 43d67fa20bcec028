//! Worksheet synthesis: transcript → raw pipe-delimited table text.
//!
//! This stage is intentionally thin. The prompt lives in [`crate::prompts`],
//! structure checks live in [`crate::pipeline::table`], and the timeout is
//! applied by the orchestrator. Unlike the transcript stage, a remote failure
//! is surfaced as [`WorksheetError::UpstreamApiFailure`] so the caller can
//! tell "no transcript" apart from "generation failed".

use crate::error::{SourceError, WorksheetError};
use crate::pipeline::postprocess;
use crate::pipeline::transcript::Transcript;
use crate::prompts::worksheet_prompt;
use async_trait::async_trait;
use edgequake_llm::{ChatMessage, CompletionOptions, LLMProvider};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// A remote text-generation capability.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Complete `prompt` and return the model's text.
    async fn generate(&self, prompt: &str) -> Result<String, SourceError>;
}

/// [`TextGenerator`] over any `edgequake-llm` provider (Gemini by default).
pub struct LlmTextGenerator {
    provider: Arc<dyn LLMProvider>,
    options: CompletionOptions,
}

impl LlmTextGenerator {
    pub fn new(provider: Arc<dyn LLMProvider>, temperature: f32, max_tokens: usize) -> Self {
        Self {
            provider,
            options: CompletionOptions {
                temperature: Some(temperature),
                max_tokens: Some(max_tokens),
                ..Default::default()
            },
        }
    }
}

#[async_trait]
impl TextGenerator for LlmTextGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, SourceError> {
        let messages = vec![ChatMessage::user(prompt)];
        let response = self
            .provider
            .chat(&messages, Some(&self.options))
            .await
            .map_err(|e| SourceError::Api(e.to_string()))?;

        debug!(
            "LLM: {} input tokens, {} output tokens",
            response.prompt_tokens, response.completion_tokens
        );
        Ok(response.content)
    }
}

/// Ask the generator for the worksheet table of `transcript`.
///
/// The returned text has been normalised by
/// [`postprocess::clean_raw_table`] but is otherwise unvalidated.
pub async fn synthesize(
    generator: &dyn TextGenerator,
    transcript: &Transcript,
) -> Result<String, WorksheetError> {
    let start = Instant::now();
    let prompt = worksheet_prompt(&transcript.text);

    match generator.generate(&prompt).await {
        Ok(raw) => {
            info!(
                "Video {}: generated {} chars in {:?}",
                transcript.video_id,
                raw.len(),
                start.elapsed()
            );
            Ok(postprocess::clean_raw_table(&raw))
        }
        Err(e) => {
            warn!("Video {}: generation failed: {}", transcript.video_id, e);
            Err(WorksheetError::UpstreamApiFailure {
                message: e.to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FailureKind;
    use crate::pipeline::identifier::extract_video_id;
    use std::sync::Mutex;

    struct Recording {
        reply: Result<String, SourceError>,
        seen: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl TextGenerator for Recording {
        async fn generate(&self, prompt: &str) -> Result<String, SourceError> {
            self.seen.lock().unwrap().push(prompt.to_string());
            self.reply.clone()
        }
    }

    fn transcript() -> Transcript {
        Transcript {
            video_id: extract_video_id("/watch?v=abcDEFghi12").unwrap(),
            language_code: "en".into(),
            text: "It is nice to meet you.".into(),
        }
    }

    #[tokio::test]
    async fn prompt_carries_transcript() {
        let generator = Recording {
            reply: Ok("H1\nH2\n".into()),
            seen: Mutex::new(Vec::new()),
        };
        synthesize(&generator, &transcript()).await.unwrap();
        let seen = generator.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert!(seen[0].contains("It is nice to meet you."));
    }

    #[tokio::test]
    async fn output_is_normalised_not_validated() {
        let generator = Recording {
            reply: Ok("```\nH1\r\nH2\r\nnot a table row\n```".into()),
            seen: Mutex::new(Vec::new()),
        };
        let raw = synthesize(&generator, &transcript()).await.unwrap();
        assert_eq!(raw, "H1\nH2\nnot a table row");
    }

    #[tokio::test]
    async fn generator_error_is_upstream_failure() {
        let generator = Recording {
            reply: Err(SourceError::Api("429 quota exceeded".into())),
            seen: Mutex::new(Vec::new()),
        };
        let err = synthesize(&generator, &transcript()).await.unwrap_err();
        assert_eq!(err.kind(), FailureKind::UpstreamApiFailure);
        assert!(err.to_string().contains("429 quota exceeded"));
    }
}
