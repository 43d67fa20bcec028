//! Result types returned by the pipeline.

use crate::error::{FailureKind, WorksheetError};
use crate::pipeline::identifier::VideoId;
use crate::state::Stage;
use serde::Serialize;
use std::path::PathBuf;
use std::time::SystemTime;

/// A rendered worksheet in the artifact directory.
///
/// The file is temporary: the janitor removes it once it is older than the
/// retention window. Copy it elsewhere (see
/// [`crate::generate::generate_to_file`]) to keep it.
#[derive(Debug, Clone, Serialize)]
pub struct WorksheetArtifact {
    pub path: PathBuf,
    pub video_id: VideoId,
    /// Language code of the caption track that was used.
    pub transcript_language: String,
    /// Data rows in the table (header excluded).
    pub row_count: usize,
    pub created_at: SystemTime,
    pub stats: GenerationStats,
}

impl WorksheetArtifact {
    /// File name of the artifact, for status messages.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

/// Sizes and stage timings of one request.
#[derive(Debug, Clone, Default, Serialize)]
pub struct GenerationStats {
    pub transcript_chars: usize,
    pub raw_table_chars: usize,
    pub row_count: usize,
    pub fetch_ms: u64,
    pub synthesis_ms: u64,
    pub render_ms: u64,
    pub total_ms: u64,
}

/// What a UI caller receives: a status line and, on success only, the file.
#[derive(Debug, Clone, Serialize)]
pub struct WorksheetOutcome {
    pub status: String,
    pub artifact: Option<WorksheetArtifact>,
    pub final_stage: Stage,
}

impl WorksheetOutcome {
    pub fn success(artifact: WorksheetArtifact) -> Self {
        Self {
            status: format!("Worksheet created: {}", artifact.file_name()),
            artifact: Some(artifact),
            final_stage: Stage::Done,
        }
    }

    pub fn failure(error: &WorksheetError) -> Self {
        Self {
            status: error.to_string(),
            artifact: None,
            final_stage: Stage::Failed(error.kind()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.artifact.is_some()
    }

    /// The failure classification, if the request failed.
    pub fn failure_kind(&self) -> Option<FailureKind> {
        match self.final_stage {
            Stage::Failed(kind) => Some(kind),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::identifier::extract_video_id;

    fn artifact() -> WorksheetArtifact {
        WorksheetArtifact {
            path: PathBuf::from("/tmp/yt-worksheet/worksheet_abc123.docx"),
            video_id: extract_video_id("/watch?v=abcDEFghi12").unwrap(),
            transcript_language: "en".into(),
            row_count: 1,
            created_at: SystemTime::UNIX_EPOCH,
            stats: GenerationStats::default(),
        }
    }

    #[test]
    fn success_status_names_the_file() {
        let outcome = WorksheetOutcome::success(artifact());
        assert_eq!(outcome.status, "Worksheet created: worksheet_abc123.docx");
        assert!(outcome.is_success());
        assert_eq!(outcome.failure_kind(), None);
    }

    #[test]
    fn failure_has_no_artifact() {
        let err = WorksheetError::InvalidUrl {
            input: "nope".into(),
        };
        let outcome = WorksheetOutcome::failure(&err);
        assert!(!outcome.is_success());
        assert_eq!(outcome.failure_kind(), Some(FailureKind::InvalidUrl));
        assert_eq!(outcome.status, err.to_string());
    }

    #[test]
    fn outcome_serialises_to_json() {
        let json = serde_json::to_value(WorksheetOutcome::success(artifact())).unwrap();
        assert_eq!(json["final_stage"], "Done");
        assert_eq!(json["artifact"]["video_id"], "abcDEFghi12");
        assert_eq!(json["artifact"]["row_count"], 1);
    }
}
