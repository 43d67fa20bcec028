//! Prompt template for worksheet generation.
//!
//! Kept in one place so the instructions can be tuned (and inspected by
//! tests) without touching the timeout or error-handling logic in
//! [`crate::pipeline::synthesize`].
//!
//! The output contract the prompt asks for is the one
//! [`crate::pipeline::table::parse_table`] expects: two header lines, then
//! one `exercise|translation|answer` row per sentence.

/// The marker that replaces the blanked word or phrase.
pub const BLANK_MARKER: &str = "___";

/// Placeholder replaced by the transcript text.
const TRANSCRIPT_SLOT: &str = "{transcript}";

/// Instructional template sent to the text-generation model.
pub const WORKSHEET_PROMPT: &str = r#"You are preparing an English listening worksheet for Korean learners.

Split the transcript below into individual sentences. For EVERY sentence:

1. EXERCISE
   - Copy the sentence and replace exactly ONE important word or short phrase
     with ___ (three underscores)
   - Choose vocabulary worth learning; never blank names or filler words
2. TRANSLATION
   - Translate the complete original sentence into natural Korean
3. ANSWER
   - Give the exact word or phrase you replaced with ___

OUTPUT FORMAT
   - Output ONLY the table, no commentary and no code fences
   - Line 1: Exercise|Korean Translation|Answer
   - Line 2: ---|---|---
   - Then one line per sentence: exercise|translation|answer
   - Use the | character only as the column separator
   - Keep the original sentence order

Transcript:
"""
{transcript}
"""
"#;

/// Build the generation prompt for a transcript.
pub fn worksheet_prompt(transcript: &str) -> String {
    WORKSHEET_PROMPT.replace(TRANSCRIPT_SLOT, transcript)
}
