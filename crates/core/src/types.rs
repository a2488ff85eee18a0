use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One time-coded fragment as returned by the transcription service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub start: f32,
    pub end: f32,
    pub text: String,
}

/// A semantically grouped span of transcript text, the unit summarization
/// operates on. `start_time` is the start of its first constituent segment,
/// `end_time` the end of the segment that closed it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paragraph {
    pub start_time: f32,
    pub end_time: f32,
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transcript {
    pub text: String,
    pub segments: Vec<Segment>,
    pub language: String,
}

/// A contiguous, time-bounded run of paragraphs submitted together to the
/// chat model.
pub type Chunk = Vec<Paragraph>;

/// Consolidated output of a full summarization run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryResult {
    /// Per-chunk summary bodies concatenated in chunk order, each paragraph
    /// prefixed with its `[MM:SS]` timestamp.
    pub body: String,
    /// Union of the keyword maps extracted from every chunk. Duplicate
    /// keywords resolve last-write-wins in chunk order.
    pub keywords: BTreeMap<String, String>,
}

impl SummaryResult {
    /// Renders the summary the way it is persisted and displayed: the body,
    /// then a single trailing keyword section when any keywords were
    /// collected.
    pub fn render(&self) -> String {
        if self.keywords.is_empty() {
            return self.body.clone();
        }
        let pairs = self
            .keywords
            .iter()
            .map(|(k, v)| format!("{k}:{v}"))
            .collect::<Vec<_>>()
            .join(", ");
        format!("{}\n\n{} {}", self.body, crate::parse::KEYWORD_MARKER, pairs)
    }
}

/// True/false ("O"/"X") quiz question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OxQuestion {
    pub question: String,
    pub answer: bool,
    pub explanation: String,
}

/// Multiple-choice question. The four-options invariant is structural.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct McqQuestion {
    pub question: String,
    pub options: [String; 4],
    pub correct_index: usize,
    pub explanation: String,
}

/// A persisted record of a previously missed quiz question. The variant
/// carries only the fields valid for that question kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WrongNote {
    Ox {
        question: String,
        answer: bool,
        explanation: String,
    },
    Mcq {
        question: String,
        options: [String; 4],
        correct_index: usize,
        explanation: String,
    },
}

impl WrongNote {
    pub fn question(&self) -> &str {
        match self {
            WrongNote::Ox { question, .. } => question,
            WrongNote::Mcq { question, .. } => question,
        }
    }
}

/// Transcription + summary snapshot handed to persistence after a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryRecord {
    pub id: String,
    pub audio_file_name: String,
    pub transcribed_text: String,
    pub ai_summary: String,
    pub title: String,
    pub upload_date: String,
    pub timestamp: i64,
    pub segments: Vec<Segment>,
    pub paragraphs: Vec<Paragraph>,
}
