//! Maps `[MM:SS]` tokens in rendered summary text back to the originating
//! paragraphs, so a click on a timestamp can seek the audio or scroll the
//! transcript.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::{format::format_timestamp, types::Paragraph};

static TIMESTAMP_TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[(\d{2}:\d{2})\]").unwrap());

/// One `[MM:SS]` occurrence in the rendered text, tied to the paragraph
/// whose formatted start time matches it textually.
#[derive(Debug, Clone, PartialEq)]
pub struct AnchorEntry {
    /// Byte offset of the token in the rendered text.
    pub offset: usize,
    /// The `MM:SS` string inside the brackets.
    pub timestamp: String,
    /// Index into the paragraph list handed to [`TimeAnchorIndex::build`].
    pub paragraph: usize,
}

/// Lookup structure built once per summary render.
///
/// Anchoring is by timestamp string, not numeric proximity: two paragraphs
/// that round to the same `MM:SS` are an accepted collision and the first
/// match in scan order wins. Numeric proximity is a separate lookup used by
/// audio-seek handlers.
#[derive(Debug, Clone)]
pub struct TimeAnchorIndex {
    entries: Vec<AnchorEntry>,
    paragraphs: Vec<Paragraph>,
}

impl TimeAnchorIndex {
    /// Scans `rendered` for timestamp tokens and associates each occurrence
    /// with the first paragraph rendering to the same `MM:SS`. Tokens no
    /// paragraph matches are left unanchored and skipped.
    pub fn build(rendered: &str, paragraphs: &[Paragraph]) -> Self {
        let entries = TIMESTAMP_TOKEN
            .captures_iter(rendered)
            .filter_map(|captures| {
                let token = captures.get(1)?;
                let paragraph = paragraphs
                    .iter()
                    .position(|p| format_timestamp(p.start_time) == token.as_str())?;
                Some(AnchorEntry {
                    offset: captures.get(0)?.start(),
                    timestamp: token.as_str().to_string(),
                    paragraph,
                })
            })
            .collect();
        Self {
            entries,
            paragraphs: paragraphs.to_vec(),
        }
    }

    pub fn entries(&self) -> &[AnchorEntry] {
        &self.entries
    }

    /// Exact-string lookup: the first scanned occurrence of `timestamp`
    /// (`MM:SS`, no brackets) wins. Used for scroll positioning.
    pub fn lookup(&self, timestamp: &str) -> Option<&Paragraph> {
        self.entries
            .iter()
            .find(|entry| entry.timestamp == timestamp)
            .map(|entry| &self.paragraphs[entry.paragraph])
    }

    /// Nearest-paragraph lookup by numeric start time, within a one-second
    /// tolerance. Used by audio-seek click handlers.
    pub fn nearest(&self, time_secs: f32) -> Option<&Paragraph> {
        self.paragraphs
            .iter()
            .find(|p| (p.start_time - time_secs).abs() < 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paragraph(start: f32, end: f32, text: &str) -> Paragraph {
        Paragraph {
            start_time: start,
            end_time: end,
            text: text.to_string(),
        }
    }

    #[test]
    fn lookup_finds_the_matching_paragraph() {
        let paragraphs = vec![
            paragraph(0.0, 60.0, "도입부"),
            paragraph(65.0, 125.0, "본론"),
        ];
        let rendered = "[00:00] 강의 도입 요약\n\n[01:05] 본론 요약";
        let index = TimeAnchorIndex::build(rendered, &paragraphs);

        assert_eq!(index.lookup("01:05").unwrap().text, "본론");
        assert_eq!(index.lookup("00:00").unwrap().text, "도입부");
        assert!(index.lookup("02:00").is_none());
    }

    #[test]
    fn entries_carry_scan_offsets() {
        let paragraphs = vec![paragraph(0.0, 10.0, "하나")];
        let rendered = "요약: [00:00] 내용";
        let index = TimeAnchorIndex::build(rendered, &paragraphs);

        assert_eq!(index.entries().len(), 1);
        assert_eq!(index.entries()[0].offset, rendered.find('[').unwrap());
        assert_eq!(index.entries()[0].timestamp, "00:00");
    }

    #[test]
    fn sub_minute_collision_resolves_to_first_paragraph_in_scan_order() {
        // Both paragraphs render to 00:30.
        let paragraphs = vec![
            paragraph(30.2, 40.0, "먼저 나온 문단"),
            paragraph(30.8, 50.0, "나중 문단"),
        ];
        let rendered = "[00:30] 충돌하는 요약";
        let index = TimeAnchorIndex::build(rendered, &paragraphs);

        assert_eq!(index.lookup("00:30").unwrap().text, "먼저 나온 문단");
    }

    #[test]
    fn tokens_without_a_matching_paragraph_are_skipped() {
        let paragraphs = vec![paragraph(0.0, 10.0, "하나")];
        let rendered = "[00:00] 진짜 토큰\n\n[09:59] 모델이 지어낸 토큰";
        let index = TimeAnchorIndex::build(rendered, &paragraphs);

        assert_eq!(index.entries().len(), 1);
        assert!(index.lookup("09:59").is_none());
    }

    #[test]
    fn nearest_uses_one_second_tolerance() {
        let paragraphs = vec![
            paragraph(0.0, 60.0, "도입부"),
            paragraph(65.0, 125.0, "본론"),
        ];
        let index = TimeAnchorIndex::build("[00:00] x [01:05] y", &paragraphs);

        assert_eq!(index.nearest(65.4).unwrap().text, "본론");
        assert_eq!(index.nearest(0.9).unwrap().text, "도입부");
        assert!(index.nearest(30.0).is_none());
    }
}
