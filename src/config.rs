//! Configuration for worksheet generation.
//!
//! Every knob lives in [`WorksheetConfig`], built via its
//! [`WorksheetConfigBuilder`]. One struct is easy to share across concurrent
//! requests and easy to log when two runs behave differently.
//!
//! The remote capabilities are part of the config too: callers can inject a
//! pre-built [`TranscriptSource`] or [`TextGenerator`] (tests, custom
//! middleware), otherwise the defaults are constructed per request.

use crate::error::WorksheetError;
use crate::pipeline::synthesize::TextGenerator;
use crate::pipeline::transcript::TranscriptSource;
use crate::progress::ProgressCallback;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Default bound on transcript retrieval.
pub const DEFAULT_TRANSCRIPT_TIMEOUT_SECS: u64 = 30;

/// Default bound on the generation call.
pub const DEFAULT_SYNTHESIS_TIMEOUT_SECS: u64 = 60;

/// Age after which the janitor removes an artifact.
pub const DEFAULT_RETENTION_SECS: u64 = 1800;

/// Configuration for a worksheet request.
///
/// # Example
/// ```rust
/// use yt_worksheet::WorksheetConfig;
///
/// let config = WorksheetConfig::builder()
///     .languages(["en", "ko"])
///     .model("gemini-1.5-flash")
///     .output_dir("/tmp/worksheets")
///     .build()
///     .unwrap();
/// assert_eq!(config.credential_env, "GEMINI_API_KEY");
/// ```
#[derive(Clone)]
pub struct WorksheetConfig {
    /// Directory holding rendered worksheets. Default: `$TMPDIR/yt-worksheet`.
    ///
    /// Shared by all requests and swept by the janitor; do not point it at a
    /// directory holding files you care about named `worksheet_*.docx`.
    pub output_dir: PathBuf,

    /// Caption languages in order of preference. Default: `["en", "ko"]`.
    ///
    /// The first language with an available track wins. There is no fallback
    /// to other languages: a video captioned only in French yields
    /// `NoTranscriptFound`.
    pub languages: Vec<String>,

    /// `edgequake-llm` provider name. Default: `"gemini"`.
    pub provider_name: String,

    /// Model identifier. Default: `"gemini-1.5-pro"`.
    pub model: String,

    /// Environment variable that must hold the provider's API key.
    /// Default: `"GEMINI_API_KEY"` (follows `provider_name`).
    pub credential_env: String,

    /// Sampling temperature. Default: 0.3.
    ///
    /// Low enough that the table format is followed reliably, high enough
    /// that the blanked words vary between sentences.
    pub temperature: f32,

    /// Maximum tokens generated. Default: 8192.
    ///
    /// One row is roughly 60 tokens; a 10-minute video produces 100–150
    /// sentences, so 4096 would truncate long transcripts mid-table.
    pub max_tokens: usize,

    /// Transcript retrieval bound in seconds. Default: 30.
    pub transcript_timeout_secs: u64,

    /// Generation bound in seconds. Default: 60.
    pub synthesis_timeout_secs: u64,

    /// Artifact retention window in seconds. Default: 1800.
    pub retention_secs: u64,

    /// Heading above the worksheet table. Default: "YouTube Learning Worksheet".
    pub title: String,

    /// Pre-built transcript source. Default: `YouTubeTranscriptSource`.
    pub transcript_source: Option<Arc<dyn TranscriptSource>>,

    /// Pre-built text generator. Takes precedence over `provider_name` and
    /// skips the credential check.
    pub generator: Option<Arc<dyn TextGenerator>>,

    /// Optional observer of stage transitions.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for WorksheetConfig {
    fn default() -> Self {
        Self {
            output_dir: std::env::temp_dir().join("yt-worksheet"),
            languages: vec!["en".to_string(), "ko".to_string()],
            provider_name: "gemini".to_string(),
            model: "gemini-1.5-pro".to_string(),
            credential_env: "GEMINI_API_KEY".to_string(),
            temperature: 0.3,
            max_tokens: 8192,
            transcript_timeout_secs: DEFAULT_TRANSCRIPT_TIMEOUT_SECS,
            synthesis_timeout_secs: DEFAULT_SYNTHESIS_TIMEOUT_SECS,
            retention_secs: DEFAULT_RETENTION_SECS,
            title: "YouTube Learning Worksheet".to_string(),
            transcript_source: None,
            generator: None,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for WorksheetConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorksheetConfig")
            .field("output_dir", &self.output_dir)
            .field("languages", &self.languages)
            .field("provider_name", &self.provider_name)
            .field("model", &self.model)
            .field("credential_env", &self.credential_env)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("transcript_timeout_secs", &self.transcript_timeout_secs)
            .field("synthesis_timeout_secs", &self.synthesis_timeout_secs)
            .field("retention_secs", &self.retention_secs)
            .field("title", &self.title)
            .field(
                "transcript_source",
                &self.transcript_source.as_ref().map(|_| "<dyn TranscriptSource>"),
            )
            .field("generator", &self.generator.as_ref().map(|_| "<dyn TextGenerator>"))
            .finish()
    }
}

impl WorksheetConfig {
    /// Create a new builder for `WorksheetConfig`.
    pub fn builder() -> WorksheetConfigBuilder {
        WorksheetConfigBuilder {
            config: Self::default(),
        }
    }

    pub fn transcript_timeout(&self) -> Duration {
        Duration::from_secs(self.transcript_timeout_secs)
    }

    pub fn synthesis_timeout(&self) -> Duration {
        Duration::from_secs(self.synthesis_timeout_secs)
    }

    pub fn retention(&self) -> Duration {
        Duration::from_secs(self.retention_secs)
    }
}

/// The API-key variable `edgequake-llm` reads for a provider.
///
/// `None` for providers that need no key (local servers).
pub fn credential_env_for(provider: &str) -> Option<&'static str> {
    match provider.to_ascii_lowercase().as_str() {
        "gemini" | "google" => Some("GEMINI_API_KEY"),
        "openai" => Some("OPENAI_API_KEY"),
        "anthropic" | "claude" => Some("ANTHROPIC_API_KEY"),
        "mistral" => Some("MISTRAL_API_KEY"),
        "azure" => Some("AZURE_OPENAI_API_KEY"),
        _ => None,
    }
}

/// Builder for [`WorksheetConfig`].
pub struct WorksheetConfigBuilder {
    config: WorksheetConfig,
}

impl fmt::Debug for WorksheetConfigBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorksheetConfigBuilder")
            .field("config", &self.config)
            .finish()
    }
}

impl WorksheetConfigBuilder {
    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.output_dir = dir.into();
        self
    }

    pub fn languages<I, S>(mut self, languages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.languages = languages
            .into_iter()
            .map(Into::into)
            .map(|l: String| l.trim().to_string())
            .filter(|l| !l.is_empty())
            .collect();
        self
    }

    /// Select the provider; the credential variable follows it.
    pub fn provider_name(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.config.credential_env = credential_env_for(&name).unwrap_or("").to_string();
        self.config.provider_name = name;
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    pub fn credential_env(mut self, var: impl Into<String>) -> Self {
        self.config.credential_env = var.into();
        self
    }

    pub fn temperature(mut self, t: f32) -> Self {
        self.config.temperature = t.clamp(0.0, 2.0);
        self
    }

    pub fn max_tokens(mut self, n: usize) -> Self {
        self.config.max_tokens = n.max(256);
        self
    }

    pub fn transcript_timeout_secs(mut self, secs: u64) -> Self {
        self.config.transcript_timeout_secs = secs;
        self
    }

    pub fn synthesis_timeout_secs(mut self, secs: u64) -> Self {
        self.config.synthesis_timeout_secs = secs;
        self
    }

    pub fn retention_secs(mut self, secs: u64) -> Self {
        self.config.retention_secs = secs;
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.config.title = title.into();
        self
    }

    pub fn transcript_source(mut self, source: Arc<dyn TranscriptSource>) -> Self {
        self.config.transcript_source = Some(source);
        self
    }

    pub fn generator(mut self, generator: Arc<dyn TextGenerator>) -> Self {
        self.config.generator = Some(generator);
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<WorksheetConfig, WorksheetError> {
        let c = &self.config;
        if c.languages.is_empty() {
            return Err(WorksheetError::InvalidConfig(
                "At least one caption language is required".into(),
            ));
        }
        if c.transcript_timeout_secs == 0 || c.synthesis_timeout_secs == 0 {
            return Err(WorksheetError::InvalidConfig(
                "Timeouts must be ≥ 1 second".into(),
            ));
        }
        if c.title.trim().is_empty() {
            return Err(WorksheetError::InvalidConfig(
                "Worksheet title must not be empty".into(),
            ));
        }
        if c.output_dir.as_os_str().is_empty() {
            return Err(WorksheetError::InvalidConfig(
                "Output directory must not be empty".into(),
            ));
        }
        Ok(self.config)
    }
}
