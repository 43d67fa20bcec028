//! Video ID extraction: find the 11-character YouTube ID inside a locator.
//!
//! The pattern accepts the ID after a `v=` query marker
//! (`watch?v=dQw4w9WgXcQ`) or after a path separator (`youtu.be/dQw4w9WgXcQ`,
//! `/embed/dQw4w9WgXcQ`, `/shorts/dQw4w9WgXcQ`). The leftmost match wins.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

static RE_VIDEO_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:v=|/)([0-9A-Za-z_-]{11})").unwrap());

/// A canonical YouTube video ID: exactly 11 characters of `[A-Za-z0-9_-]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VideoId(String);

impl VideoId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Extract the video ID from a URL-like locator.
///
/// Pure and total: returns `None` for anything without a match, never panics.
pub fn extract_video_id(locator: &str) -> Option<VideoId> {
    RE_VIDEO_ID
        .captures(locator)
        .map(|caps| VideoId(caps[1].to_string()))
}
