//! Pipeline stages for video-to-worksheet generation.
//!
//! Each submodule implements exactly one transformation step, so each is
//! testable on its own and the remote capabilities can be swapped for fakes
//! without touching the other stages.
//!
//! ## Data Flow
//!
//! ```text
//! identifier ──▶ transcript ──▶ synthesize ──▶ table ──▶ render
//!  (regex)       (captions)     (LLM +          (split)   (docx-rs)
//!                               postprocess)
//! ```
//!
//! 1. [`identifier`] — pull the 11-character video ID out of any locator
//! 2. [`transcript`] — fetch the first caption track in a preferred language
//!    and join it into one text blob
//! 3. [`synthesize`] — one LLM call turning the transcript into table text;
//!    [`postprocess`] strips the fences and invisible characters models add
//! 4. [`table`]      — lenient row parsing; malformed lines are dropped
//! 5. [`render`]     — write the `.docx`; runs in `spawn_blocking`
//!
//! [`offload`] holds the bounded, non-cancelling wait used for the two
//! remote stages.

pub mod identifier;
pub mod offload;
pub mod postprocess;
pub mod render;
pub mod synthesize;
pub mod table;
pub mod transcript;
