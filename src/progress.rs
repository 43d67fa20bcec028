//! Progress-callback trait for pipeline events.
//!
//! Inject an [`Arc<dyn PipelineProgressCallback>`] via
//! [`crate::config::WorksheetConfigBuilder::progress_callback`] to observe a
//! request as it moves through the [`Stage`]s: drive a spinner, forward
//! events to a UI, or record the transition trace in tests.
//!
//! # Example
//!
//! ```rust
//! use yt_worksheet::{PipelineProgressCallback, Stage, WorksheetConfig};
//! use std::sync::Arc;
//!
//! struct PrintStages;
//!
//! impl PipelineProgressCallback for PrintStages {
//!     fn on_stage(&self, stage: &Stage) {
//!         eprintln!("→ {stage}");
//!     }
//! }
//!
//! let config = WorksheetConfig::builder()
//!     .progress_callback(Arc::new(PrintStages))
//!     .build()
//!     .unwrap();
//! ```

use crate::error::WorksheetError;
use crate::output::WorksheetArtifact;
use crate::state::Stage;
use std::sync::Arc;

/// Called by the pipeline as a request advances.
///
/// Implementations must be `Send + Sync`: concurrent requests may share one
/// callback. All methods default to no-ops.
pub trait PipelineProgressCallback: Send + Sync {
    /// Called on every state transition, including the terminal one.
    fn on_stage(&self, stage: &Stage) {
        let _ = stage;
    }

    /// Called once when the worksheet has been written.
    fn on_complete(&self, artifact: &WorksheetArtifact) {
        let _ = artifact;
    }

    /// Called once when the request fails.
    fn on_failure(&self, error: &WorksheetError) {
        let _ = error;
    }
}

/// A callback that ignores every event.
pub struct NoopProgressCallback;

impl PipelineProgressCallback for NoopProgressCallback {}

/// Convenience alias for the shared callback type stored in the config.
pub type ProgressCallback = Arc<dyn PipelineProgressCallback>;
