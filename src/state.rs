//! Pipeline state machine.
//!
//! ```text
//! Idle ─▶ ExtractingId ─▶ FetchingTranscript ─▶ Synthesizing ─▶ Parsing ─▶ Rendering ─▶ Done
//!              │                 │                    │                        │
//!              └─────────────────┴────────────────────┴────────────────────────┴──▶ Failed(kind)
//! ```
//!
//! `Parsing` has no failure edge: an empty row list is a valid worksheet.
//! `Done` and `Failed` are terminal. A missing credential is a precondition
//! checked before the machine leaves `Idle`, so `Failed(MissingCredential)` is
//! reported directly rather than reached through an edge.

use crate::error::FailureKind;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a request is in the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stage {
    Idle,
    ExtractingId,
    FetchingTranscript,
    Synthesizing,
    Parsing,
    Rendering,
    Done,
    Failed(FailureKind),
}

impl Stage {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Stage::Done | Stage::Failed(_))
    }

    /// Whether `self → next` is an edge of the state machine.
    pub fn can_transition_to(&self, next: &Stage) -> bool {
        use FailureKind::*;
        use Stage::*;
        match (self, next) {
            (Idle, ExtractingId)
            | (ExtractingId, FetchingTranscript)
            | (FetchingTranscript, Synthesizing)
            | (Synthesizing, Parsing)
            | (Parsing, Rendering)
            | (Rendering, Done) => true,

            (ExtractingId, Failed(InvalidUrl))
            | (FetchingTranscript, Failed(TranscriptTimeout | NoTranscriptFound))
            | (Synthesizing, Failed(SynthesisTimeout | UpstreamApiFailure))
            | (Rendering, Failed(RenderFailure)) => true,

            // A panicking stage task can surface from any working state.
            (ExtractingId | FetchingTranscript | Synthesizing | Parsing | Rendering, Failed(UnexpectedFailure)) => true,

            _ => false,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Idle => f.write_str("idle"),
            Stage::ExtractingId => f.write_str("extracting video ID"),
            Stage::FetchingTranscript => f.write_str("fetching transcript"),
            Stage::Synthesizing => f.write_str("generating worksheet"),
            Stage::Parsing => f.write_str("parsing table"),
            Stage::Rendering => f.write_str("rendering document"),
            Stage::Done => f.write_str("done"),
            Stage::Failed(kind) => write!(f, "failed ({kind})"),
        }
    }
}
