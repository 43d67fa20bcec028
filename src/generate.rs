//! Request orchestration: URL in, worksheet artifact (or a classified failure) out.
//!
//! ## Why two entry points?
//!
//! [`generate`] is the library API: it returns `Result` so callers can match
//! on the failure. [`process_video`] is the UI API: it never fails, and turns
//! either outcome into a [`WorksheetOutcome`] carrying the status line to
//! display and, on success only, the artifact.
//!
//! Every request walks the [`Stage`] machine. The two remote calls are
//! spawned and awaited under a bound (see [`crate::pipeline::offload`]); the
//! render runs on the blocking pool. Requests share nothing but the artifact
//! directory, so any number may run concurrently.

use crate::config::WorksheetConfig;
use crate::error::{SourceError, WorksheetError};
use crate::output::{GenerationStats, WorksheetArtifact, WorksheetOutcome};
use crate::pipeline::identifier::{extract_video_id, VideoId};
use crate::pipeline::offload::{run_bounded, Bounded};
use crate::pipeline::render::{render_artifact, WorksheetDocument};
use crate::pipeline::synthesize::{synthesize, LlmTextGenerator, TextGenerator};
use crate::pipeline::table::parse_table;
use crate::pipeline::transcript::{fetch_transcript, TranscriptSource, YouTubeTranscriptSource};
use crate::progress::ProgressCallback;
use crate::state::Stage;
use edgequake_llm::ProviderFactory;
use std::path::Path;
use std::sync::Arc;
use std::time::{Instant, SystemTime};
use tracing::{debug, info, warn};

/// Generate a worksheet for the video at `url`.
///
/// This is the primary entry point for the library.
///
/// # Arguments
/// * `url` — Any string containing an 11-character video ID
///   (`watch?v=`, `youtu.be/`, `/embed/`, …)
/// * `config` — Request configuration
///
/// # Returns
/// The artifact in `config.output_dir`. It is temporary: the janitor removes
/// it after `config.retention_secs`.
///
/// # Errors
/// Exactly one [`WorksheetError`] per failed request; its
/// [`kind`](WorksheetError::kind) names the failure:
/// - credential variable unset (checked before any stage runs)
/// - no video ID in `url`
/// - no transcript, or the transcript service timed out
/// - the generation call failed or timed out
/// - the document could not be written
pub async fn generate(
    url: impl AsRef<str>,
    config: &WorksheetConfig,
) -> Result<WorksheetArtifact, WorksheetError> {
    let total_start = Instant::now();
    let url = url.as_ref();
    info!("Starting worksheet request: {}", url);

    let mut run = Run::new(config.progress_callback.clone());
    match run_stages(url, config, &mut run, total_start).await {
        Ok(artifact) => {
            run.advance(Stage::Done);
            info!(
                "Worksheet complete: {} rows → {} ({}ms total)",
                artifact.row_count,
                artifact.path.display(),
                artifact.stats.total_ms
            );
            if let Some(ref cb) = run.callback {
                cb.on_complete(&artifact);
            }
            Ok(artifact)
        }
        Err(e) => {
            run.fail(&e);
            Err(e)
        }
    }
}

/// Run a request and fold the result into a displayable outcome.
///
/// Never fails: every error becomes `status` text and `artifact: None`.
pub async fn process_video(url: impl AsRef<str>, config: &WorksheetConfig) -> WorksheetOutcome {
    match generate(url, config).await {
        Ok(artifact) => WorksheetOutcome::success(artifact),
        Err(e) => WorksheetOutcome::failure(&e),
    }
}

/// Generate a worksheet and copy it to `output_path`.
///
/// Uses atomic write (temp file + rename) so `output_path` never holds a
/// partial document. The artifact itself stays in the artifact directory
/// until the janitor removes it.
pub async fn generate_to_file(
    url: impl AsRef<str>,
    output_path: impl AsRef<Path>,
    config: &WorksheetConfig,
) -> Result<WorksheetArtifact, WorksheetError> {
    let artifact = generate(url, config).await?;
    let path = output_path.as_ref();
    let write_failed = |e: std::io::Error| WorksheetError::RenderFailure {
        path: path.to_path_buf(),
        reason: e.to_string(),
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await.map_err(write_failed)?;
    }

    let tmp_path = path.with_extension("docx.tmp");
    tokio::fs::copy(&artifact.path, &tmp_path)
        .await
        .map_err(write_failed)?;
    tokio::fs::rename(&tmp_path, path)
        .await
        .map_err(write_failed)?;

    debug!("Copied {} → {}", artifact.path.display(), path.display());
    Ok(artifact)
}

/// Synchronous wrapper around [`generate`].
///
/// Creates a temporary tokio runtime internally.
pub fn generate_sync(
    url: impl AsRef<str>,
    config: &WorksheetConfig,
) -> Result<WorksheetArtifact, WorksheetError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| WorksheetError::Unexpected(format!("Failed to create tokio runtime: {}", e)))?
        .block_on(generate(url, config))
}

// ── Internal helpers ─────────────────────────────────────────────────────

/// The stage a request is in, plus who to tell when it moves.
struct Run {
    stage: Stage,
    callback: Option<ProgressCallback>,
}

impl Run {
    fn new(callback: Option<ProgressCallback>) -> Self {
        Self {
            stage: Stage::Idle,
            callback,
        }
    }

    fn advance(&mut self, next: Stage) {
        debug_assert!(
            self.stage.can_transition_to(&next),
            "illegal transition {} → {}",
            self.stage,
            next
        );
        debug!("Stage: {} → {}", self.stage, next);
        self.stage = next;
        if let Some(ref cb) = self.callback {
            cb.on_stage(&next);
        }
    }

    /// Move to `Failed(kind)`.
    ///
    /// Precondition failures (credential, provider setup) happen in `Idle`,
    /// which has no failure edge; they are reported directly.
    fn fail(&mut self, error: &WorksheetError) {
        let failed = Stage::Failed(error.kind());
        debug_assert!(
            self.stage == Stage::Idle || self.stage.can_transition_to(&failed),
            "illegal transition {} → {}",
            self.stage,
            failed
        );
        warn!("Request failed while {}: {}", self.stage, error);
        self.stage = failed;
        if let Some(ref cb) = self.callback {
            cb.on_stage(&failed);
            cb.on_failure(error);
        }
    }
}

async fn run_stages(
    url: &str,
    config: &WorksheetConfig,
    run: &mut Run,
    total_start: Instant,
) -> Result<WorksheetArtifact, WorksheetError> {
    let mut stats = GenerationStats::default();

    // ── Step 0: Preconditions ────────────────────────────────────────────
    let generator = resolve_generator(config)?;

    // ── Step 1: Extract the video ID ─────────────────────────────────────
    run.advance(Stage::ExtractingId);
    let video_id = extract_video_id(url).ok_or_else(|| WorksheetError::InvalidUrl {
        input: url.to_string(),
    })?;
    info!("Video ID: {}", video_id);

    // ── Step 2: Fetch the transcript (bounded) ───────────────────────────
    run.advance(Stage::FetchingTranscript);
    let fetch_start = Instant::now();
    let source = resolve_transcript_source(config).map_err(|e| {
        warn!("Video {}: transcript client unavailable: {}", video_id, e);
        no_transcript(&video_id, config)
    })?;
    let transcript = {
        let id = video_id.clone();
        let languages = config.languages.clone();
        let fetch = async move { fetch_transcript(source.as_ref(), &id, &languages).await };
        match run_bounded(config.transcript_timeout(), fetch).await {
            Bounded::Completed(Some(t)) => t,
            Bounded::Completed(None) => return Err(no_transcript(&video_id, config)),
            Bounded::TimedOut => {
                return Err(WorksheetError::TranscriptTimeout {
                    video_id: video_id.to_string(),
                    secs: config.transcript_timeout_secs,
                })
            }
            Bounded::Failed(e) => return Err(task_failed("Transcript", e)),
        }
    };
    stats.fetch_ms = fetch_start.elapsed().as_millis() as u64;
    stats.transcript_chars = transcript.text.chars().count();
    let transcript_language = transcript.language_code.clone();

    // ── Step 3: Synthesize the table (bounded) ───────────────────────────
    run.advance(Stage::Synthesizing);
    let synthesis_start = Instant::now();
    let raw = {
        let work = async move { synthesize(generator.as_ref(), &transcript).await };
        match run_bounded(config.synthesis_timeout(), work).await {
            Bounded::Completed(result) => result?,
            Bounded::TimedOut => {
                return Err(WorksheetError::SynthesisTimeout {
                    secs: config.synthesis_timeout_secs,
                })
            }
            Bounded::Failed(e) => return Err(task_failed("Generation", e)),
        }
    };
    stats.synthesis_ms = synthesis_start.elapsed().as_millis() as u64;
    stats.raw_table_chars = raw.chars().count();

    // ── Step 4: Parse ────────────────────────────────────────────────────
    run.advance(Stage::Parsing);
    let rows = parse_table(&raw);
    stats.row_count = rows.len();
    if rows.is_empty() {
        warn!("Video {}: generated text held no table rows", video_id);
    }

    // ── Step 5: Render ───────────────────────────────────────────────────
    run.advance(Stage::Rendering);
    let render_start = Instant::now();
    let doc = WorksheetDocument::new(config.title.clone(), rows);
    let path = render_artifact(doc, config.output_dir.clone()).await?;
    stats.render_ms = render_start.elapsed().as_millis() as u64;
    stats.total_ms = total_start.elapsed().as_millis() as u64;

    Ok(WorksheetArtifact {
        path,
        video_id,
        transcript_language,
        row_count: stats.row_count,
        created_at: SystemTime::now(),
        stats,
    })
}

fn task_failed(what: &str, e: tokio::task::JoinError) -> WorksheetError {
    WorksheetError::Unexpected(format!("{} task failed: {}", what, e))
}

/// Resolve the text generator, checking the credential first.
///
/// 1. **Pre-built generator** (`config.generator`): used as-is; no
///    credential is required.
/// 2. **Named provider** (`config.provider_name` + `config.model`): the
///    credential variable must be set and non-empty, then
///    [`ProviderFactory::create_llm_provider`] builds the provider.
fn resolve_generator(config: &WorksheetConfig) -> Result<Arc<dyn TextGenerator>, WorksheetError> {
    if let Some(ref generator) = config.generator {
        return Ok(Arc::clone(generator));
    }

    if !config.credential_env.is_empty() {
        let present = std::env::var(&config.credential_env).is_ok_and(|v| !v.trim().is_empty());
        if !present {
            return Err(WorksheetError::MissingCredential {
                var: config.credential_env.clone(),
            });
        }
    }

    let provider = ProviderFactory::create_llm_provider(&config.provider_name, &config.model)
        .map_err(|e| {
            WorksheetError::InvalidConfig(format!(
                "Cannot create provider '{}' (model {}): {}",
                config.provider_name, config.model, e
            ))
        })?;
    debug!("Using provider {} / {}", config.provider_name, config.model);

    Ok(Arc::new(LlmTextGenerator::new(
        provider,
        config.temperature,
        config.max_tokens,
    )))
}

fn no_transcript(video_id: &VideoId, config: &WorksheetConfig) -> WorksheetError {
    WorksheetError::NoTranscriptFound {
        video_id: video_id.to_string(),
        languages: config.languages.join(", "),
    }
}

/// A client that cannot be built is a transcript that cannot be fetched.
fn resolve_transcript_source(
    config: &WorksheetConfig,
) -> Result<Arc<dyn TranscriptSource>, SourceError> {
    if let Some(ref source) = config.transcript_source {
        return Ok(Arc::clone(source));
    }
    YouTubeTranscriptSource::new().map(|s| Arc::new(s) as Arc<dyn TranscriptSource>)
}
