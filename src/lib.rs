//! # yt-worksheet
//!
//! Turn a YouTube video into a fill-in-the-blank English worksheet for
//! Korean learners, delivered as a `.docx` document.
//!
//! ## Why this crate?
//!
//! Captions are the cheapest source of authentic spoken English there is,
//! but turning them into exercises by hand is slow. This crate fetches a
//! video's caption track, asks an LLM to blank one word or phrase per
//! sentence and translate the sentence into Korean, and lays the result out
//! as a printable three-column table.
//!
//! ## Pipeline Overview
//!
//! ```text
//! URL
//!  │
//!  ├─ 1. Extract     11-character video ID (pure regex)
//!  ├─ 2. Transcript  first caption track in a preferred language (bounded, 30 s)
//!  ├─ 3. Synthesize  LLM → pipe-delimited table text (bounded, 60 s)
//!  ├─ 4. Parse       text → rows (never fails)
//!  ├─ 5. Render      rows → worksheet_<random>.docx (spawn_blocking)
//!  └─ 6. Janitor     artifacts older than 30 min are swept
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use yt_worksheet::{process_video, WorksheetConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Reads GEMINI_API_KEY from the environment
//!     let config = WorksheetConfig::default();
//!     let outcome = process_video("https://www.youtube.com/watch?v=dQw4w9WgXcQ", &config).await;
//!     println!("{}", outcome.status);
//!     if let Some(artifact) = outcome.artifact {
//!         eprintln!("{} rows → {}", artifact.row_count, artifact.path.display());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `worksheet` binary (clap + anyhow + indicatif + tracing-subscriber) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! yt-worksheet = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod generate;
pub mod janitor;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod prompts;
pub mod state;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{WorksheetConfig, WorksheetConfigBuilder};
pub use error::{FailureKind, SourceError, WorksheetError};
pub use generate::{generate, generate_sync, generate_to_file, process_video};
pub use janitor::{select_expired, spawn_janitor, sweep, ArtifactEntry};
pub use output::{GenerationStats, WorksheetArtifact, WorksheetOutcome};
pub use pipeline::identifier::{extract_video_id, VideoId};
pub use pipeline::render::{render_worksheet, WorksheetDocument, WORKSHEET_HEADERS};
pub use pipeline::synthesize::{LlmTextGenerator, TextGenerator};
pub use pipeline::table::{parse_table, WorksheetRow};
pub use pipeline::transcript::{
    CaptionFragment, CaptionTrack, Transcript, TranscriptSource, YouTubeTranscriptSource,
};
pub use progress::{NoopProgressCallback, PipelineProgressCallback, ProgressCallback};
pub use state::Stage;
