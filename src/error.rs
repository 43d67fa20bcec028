//! Error types for the yt-worksheet library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`WorksheetError`] — **Fatal**: the request cannot produce a worksheet
//!   (no credential, bad URL, no transcript, the LLM call failed). Every
//!   variant maps onto exactly one [`FailureKind`], and its `Display` text is
//!   the status message shown to the user.
//!
//! * [`SourceError`] — **Stage-local**: what a remote capability (transcript
//!   service, text generator) reports. It never crosses into the caller; each
//!   stage converts it into a `WorksheetError` or an absent value.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Classification of every terminal pipeline failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FailureKind {
    MissingCredential,
    InvalidUrl,
    NoTranscriptFound,
    TranscriptTimeout,
    SynthesisTimeout,
    UpstreamApiFailure,
    RenderFailure,
    UnexpectedFailure,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FailureKind::MissingCredential => "MissingCredential",
            FailureKind::InvalidUrl => "InvalidUrl",
            FailureKind::NoTranscriptFound => "NoTranscriptFound",
            FailureKind::TranscriptTimeout => "TranscriptTimeout",
            FailureKind::SynthesisTimeout => "SynthesisTimeout",
            FailureKind::UpstreamApiFailure => "UpstreamApiFailure",
            FailureKind::RenderFailure => "RenderFailure",
            FailureKind::UnexpectedFailure => "UnexpectedFailure",
        };
        f.write_str(name)
    }
}

/// All fatal errors returned by the yt-worksheet library.
#[derive(Debug, Error)]
pub enum WorksheetError {
    // ── Preconditions ─────────────────────────────────────────────────────
    /// The generation service's API key is not in the environment.
    #[error("{var} is not set.\nExport it (or add it to your shell profile) before generating worksheets.")]
    MissingCredential { var: String },

    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Input ─────────────────────────────────────────────────────────────
    /// No 11-character video ID could be found in the locator.
    #[error("Could not find a video ID in '{input}'.\nExpected a URL like https://www.youtube.com/watch?v=XXXXXXXXXXX")]
    InvalidUrl { input: String },

    // ── Transcript ────────────────────────────────────────────────────────
    /// No caption track in a preferred language, or the track was empty.
    #[error("No transcript found for video {video_id} (languages tried: {languages})")]
    NoTranscriptFound { video_id: String, languages: String },

    /// The transcript service did not answer within the bound.
    #[error("Transcript retrieval for video {video_id} timed out after {secs}s")]
    TranscriptTimeout { video_id: String, secs: u64 },

    // ── Generation ────────────────────────────────────────────────────────
    /// The text-generation call did not answer within the bound.
    #[error("Worksheet generation timed out after {secs}s")]
    SynthesisTimeout { secs: u64 },

    /// The text-generation service returned an error.
    #[error("Worksheet generation failed: {message}")]
    UpstreamApiFailure { message: String },

    // ── Output ────────────────────────────────────────────────────────────
    /// Could not create or write the worksheet document.
    #[error("Failed to write worksheet '{path}': {reason}")]
    RenderFailure { path: PathBuf, reason: String },

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error (a stage task panicked, runtime failure…).
    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl WorksheetError {
    /// The taxonomy kind this error is reported as.
    pub fn kind(&self) -> FailureKind {
        match self {
            WorksheetError::MissingCredential { .. } => FailureKind::MissingCredential,
            WorksheetError::InvalidUrl { .. } => FailureKind::InvalidUrl,
            WorksheetError::NoTranscriptFound { .. } => FailureKind::NoTranscriptFound,
            WorksheetError::TranscriptTimeout { .. } => FailureKind::TranscriptTimeout,
            WorksheetError::SynthesisTimeout { .. } => FailureKind::SynthesisTimeout,
            WorksheetError::UpstreamApiFailure { .. } => FailureKind::UpstreamApiFailure,
            WorksheetError::RenderFailure { .. } => FailureKind::RenderFailure,
            WorksheetError::InvalidConfig(_) | WorksheetError::Unexpected(_) => {
                FailureKind::UnexpectedFailure
            }
        }
    }
}

/// A failure reported by a remote capability.
///
/// Never returned to the caller of the pipeline: the transcript stage turns
/// it into "no transcript", the synthesis stage into
/// [`WorksheetError::UpstreamApiFailure`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SourceError {
    /// The video does not exist, is private, or has captions disabled.
    #[error("video {0} not found or has no captions")]
    NotFound(String),

    /// No track in any of the requested languages.
    #[error("no caption track in [{0}]")]
    NoMatchingTrack(String),

    /// Transport or service error.
    #[error("{0}")]
    Api(String),
}
