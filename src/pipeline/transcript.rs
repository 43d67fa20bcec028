//! Transcript retrieval: caption track → one whitespace-joined text blob.
//!
//! The remote capability sits behind [`TranscriptSource`] so the pipeline can
//! be driven by the real YouTube client ([`YouTubeTranscriptSource`]) or by a
//! test double. The source negotiates the track: it is handed the ordered
//! language preference list and returns the first track that exists.
//!
//! [`fetch_transcript`] never fails. Every source error is logged and becomes
//! `None`, because the orchestrator only needs to know "no transcript".
//! Timeouts are the orchestrator's business.

use crate::error::SourceError;
use crate::pipeline::identifier::VideoId;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use yt_transcript_rs::api::YouTubeTranscriptApi;
use yt_transcript_rs::errors::{CouldNotRetrieveTranscript, CouldNotRetrieveTranscriptReason};

/// One caption line with its start offset in seconds.
#[derive(Debug, Clone, PartialEq)]
pub struct CaptionFragment {
    pub text: String,
    pub start_secs: f64,
}

/// The track a source selected for a video.
#[derive(Debug, Clone, PartialEq)]
pub struct CaptionTrack {
    pub language_code: String,
    pub fragments: Vec<CaptionFragment>,
}

/// The transcript handed to the synthesizer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transcript {
    pub video_id: VideoId,
    pub language_code: String,
    /// Fragments in time order, single-space separated. Never empty.
    pub text: String,
}

impl Transcript {
    /// Join a track's fragments in time order.
    ///
    /// Returns `None` when nothing but whitespace is left.
    pub fn from_track(video_id: VideoId, track: CaptionTrack) -> Option<Self> {
        let mut fragments = track.fragments;
        fragments.sort_by(|a, b| a.start_secs.total_cmp(&b.start_secs));

        let text = fragments
            .iter()
            .flat_map(|f| f.text.split_whitespace())
            .collect::<Vec<_>>()
            .join(" ");

        if text.is_empty() {
            return None;
        }

        Some(Self {
            video_id,
            language_code: track.language_code,
            text,
        })
    }
}

/// A remote transcript capability.
#[async_trait]
pub trait TranscriptSource: Send + Sync {
    /// Return the first available track among `languages` (in order).
    async fn fetch_track(
        &self,
        video_id: &VideoId,
        languages: &[String],
    ) -> Result<CaptionTrack, SourceError>;
}

/// [`TranscriptSource`] backed by `yt-transcript-rs`.
///
/// Holds one API handle (and its HTTP connection pool) for its lifetime; build
/// it once and share it behind an `Arc`.
pub struct YouTubeTranscriptSource {
    api: YouTubeTranscriptApi,
}

impl YouTubeTranscriptSource {
    pub fn new() -> Result<Self, SourceError> {
        let api = YouTubeTranscriptApi::new(None, None, None)
            .map_err(|e| SourceError::Api(format!("transcript client init failed: {e}")))?;
        Ok(Self { api })
    }
}

#[async_trait]
impl TranscriptSource for YouTubeTranscriptSource {
    async fn fetch_track(
        &self,
        video_id: &VideoId,
        languages: &[String],
    ) -> Result<CaptionTrack, SourceError> {
        let langs: Vec<&str> = languages.iter().map(String::as_str).collect();
        let fetched = self
            .api
            .fetch_transcript(video_id.as_str(), &langs, false)
            .await
            .map_err(|e| classify_fetch_error(&e))?;

        debug!(
            "Video {}: track {} ({}), {} snippets, generated={}",
            video_id,
            fetched.language_code,
            fetched.language,
            fetched.snippets.len(),
            fetched.is_generated
        );

        Ok(CaptionTrack {
            language_code: fetched.language_code.clone(),
            fragments: fetched
                .snippets
                .iter()
                .map(|s| CaptionFragment {
                    text: s.text.clone(),
                    start_secs: s.start,
                })
                .collect(),
        })
    }
}

/// Map a `yt-transcript-rs` failure onto the stage-local taxonomy.
fn classify_fetch_error(err: &CouldNotRetrieveTranscript) -> SourceError {
    use CouldNotRetrieveTranscriptReason as Reason;
    match &err.reason {
        Some(Reason::VideoUnavailable | Reason::TranscriptsDisabled | Reason::InvalidVideoId) => {
            SourceError::NotFound(err.video_id.clone())
        }
        Some(Reason::NoTranscriptFound {
            requested_language_codes,
            ..
        }) => SourceError::NoMatchingTrack(requested_language_codes.join(", ")),
        _ => SourceError::Api(err.to_string()),
    }
}

/// Fetch the transcript for `video_id` in the first available preferred language.
///
/// Returns `None` when the source fails, the track is empty, or the source
/// answered with a language outside `languages` (no fallback to other
/// languages).
pub async fn fetch_transcript(
    source: &dyn TranscriptSource,
    video_id: &VideoId,
    languages: &[String],
) -> Option<Transcript> {
    let track = match source.fetch_track(video_id, languages).await {
        Ok(track) => track,
        Err(e) => {
            warn!("Video {}: transcript unavailable: {}", video_id, e);
            return None;
        }
    };

    if !is_preferred(&track.language_code, languages) {
        warn!(
            "Video {}: source returned track '{}' outside preferences {:?}",
            video_id, track.language_code, languages
        );
        return None;
    }

    let transcript = Transcript::from_track(video_id.clone(), track);
    match &transcript {
        Some(t) => info!(
            "Video {}: transcript in '{}' ({} chars)",
            video_id,
            t.language_code,
            t.text.len()
        ),
        None => warn!("Video {}: caption track is empty", video_id),
    }
    transcript
}

/// Match `en` against `en`, and regional tracks (`en-US`) against `en`.
fn is_preferred(language_code: &str, languages: &[String]) -> bool {
    let base = language_code.split(['-', '_']).next().unwrap_or(language_code);
    languages
        .iter()
        .any(|l| l.eq_ignore_ascii_case(language_code) || l.eq_ignore_ascii_case(base))
}
