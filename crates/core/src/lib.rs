//! Lecsum Core Library
//!
//! Core functionality for transcribing lecture audio, grouping the transcript
//! into time-anchored paragraphs, summarizing it chunk by chunk through a
//! chat model, and turning the result into review quizzes.

pub mod anchor;
pub mod chunk;
pub mod config;
pub mod error;
pub mod estimate;
pub mod format;
pub mod llm;
pub mod parse;
pub mod quiz;
pub mod segment;
pub mod store;
pub mod summarize;
pub mod title;
pub mod transcribe;
pub mod types;

// Re-export commonly used items at crate root
pub use anchor::TimeAnchorIndex;
pub use chunk::{DEFAULT_CHUNK_SIZE_SECS, chunk_by_time};
pub use config::ApiConfig;
pub use error::{LecsumError, Result};
pub use format::{bracketed_timestamp, build_transcript_text, format_timestamp};
pub use llm::{ChatClient, ChatRequest, OpenAiChat};
pub use parse::{parse_keyword_definitions, parse_mcq_quiz, parse_ox_quiz};
pub use segment::{SegmentPolicy, group_paragraphs};
pub use summarize::{
    SummaryMode, SummaryOptions, summarize_concurrent, summarize_sequential,
};
pub use transcribe::transcribe;
pub use types::{
    Chunk, McqQuestion, OxQuestion, Paragraph, Segment, SummaryRecord, SummaryResult, Transcript,
    WrongNote,
};
