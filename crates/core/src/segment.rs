//! Groups raw transcript segments into paragraphs.
//!
//! Two interchangeable policies: a sentence-boundary policy that closes a
//! paragraph at terminal punctuation or a hard length cap, and a
//! length-bounded policy that additionally requires a minimum accumulated
//! length before punctuation may close a paragraph. Both are pure functions
//! over the segment sequence.

use crate::types::{Paragraph, Segment};

/// Tunable thresholds for paragraph grouping. Lengths are in characters.
#[derive(Debug, Clone, PartialEq)]
pub enum SegmentPolicy {
    /// Close at sentence-ending punctuation (`.`, `?`, `!`) or once the
    /// buffer reaches `max_chars`.
    SentenceBound { max_chars: usize },
    /// Close at sentence-ending punctuation only once the buffer holds at
    /// least `min_chars`, or unconditionally at `max_chars`.
    LengthBound { min_chars: usize, max_chars: usize },
}

impl SegmentPolicy {
    pub fn sentence_bound() -> Self {
        SegmentPolicy::SentenceBound { max_chars: 200 }
    }

    pub fn length_bound() -> Self {
        SegmentPolicy::LengthBound {
            min_chars: 500,
            max_chars: 1000,
        }
    }
}

impl Default for SegmentPolicy {
    fn default() -> Self {
        SegmentPolicy::length_bound()
    }
}

fn ends_sentence(text: &str) -> bool {
    matches!(text.chars().last(), Some('.') | Some('?') | Some('!'))
}

/// Groups `segments` into paragraphs under `policy`.
///
/// Each paragraph's `start_time` is the start of the first segment that
/// contributed to it; `end_time` is the end of the segment that closed it. A
/// buffer left open after the last segment is flushed as a final paragraph
/// ending at the last segment's end time.
pub fn group_paragraphs(segments: &[Segment], policy: &SegmentPolicy) -> Vec<Paragraph> {
    let mut paragraphs = Vec::new();
    let Some(last_segment) = segments.last() else {
        return paragraphs;
    };

    let mut buffer = String::new();
    let mut buffer_chars = 0usize;
    let mut paragraph_start = segments[0].start;

    for segment in segments {
        if buffer.is_empty() {
            paragraph_start = segment.start;
        }

        let trimmed = segment.text.trim();
        buffer.push_str(trimmed);
        buffer.push(' ');
        buffer_chars += trimmed.chars().count() + 1;

        let at_sentence_end = ends_sentence(trimmed);
        let close = match *policy {
            SegmentPolicy::SentenceBound { max_chars } => {
                at_sentence_end || buffer_chars >= max_chars
            }
            SegmentPolicy::LengthBound {
                min_chars,
                max_chars,
            } => (at_sentence_end && buffer_chars >= min_chars) || buffer_chars >= max_chars,
        };

        if close {
            paragraphs.push(Paragraph {
                start_time: paragraph_start,
                end_time: segment.end,
                text: buffer.trim().to_string(),
            });
            buffer.clear();
            buffer_chars = 0;
        }
    }

    if !buffer.is_empty() {
        paragraphs.push(Paragraph {
            start_time: paragraph_start,
            end_time: last_segment.end,
            text: buffer.trim().to_string(),
        });
    }

    paragraphs
}
