use crate::types::Paragraph;

/// Format seconds as MM:SS timestamp
pub fn format_timestamp(seconds: f32) -> String {
    let mins = (seconds / 60.0) as u32;
    let secs = (seconds % 60.0) as u32;
    format!("{:02}:{:02}", mins, secs)
}

/// Format seconds as the bracketed `[MM:SS]` token used in prompts and in
/// rendered summaries.
pub fn bracketed_timestamp(seconds: f32) -> String {
    format!("[{}]", format_timestamp(seconds))
}

/// Format paragraphs as prompt-ready transcript text: one `[MM:SS]` heading
/// line per paragraph, blocks separated by a blank line.
pub fn build_transcript_text(paragraphs: &[Paragraph]) -> String {
    paragraphs
        .iter()
        .map(|p| {
            format!(
                "{}\n{}",
                bracketed_timestamp(p.start_time),
                p.text.trim()
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
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
    fn timestamp_is_zero_padded() {
        assert_eq!(format_timestamp(0.0), "00:00");
        assert_eq!(format_timestamp(65.4), "01:05");
        assert_eq!(format_timestamp(780.0), "13:00");
    }

    #[test]
    fn transcript_text_prefixes_each_paragraph() {
        let paragraphs = vec![
            paragraph(0.0, 5.0, "첫 번째 문단입니다."),
            paragraph(65.0, 120.0, "두 번째 문단입니다."),
        ];
        let text = build_transcript_text(&paragraphs);
        assert_eq!(
            text,
            "[00:00]\n첫 번째 문단입니다.\n\n[01:05]\n두 번째 문단입니다."
        );
    }

    #[test]
    fn transcript_text_of_no_paragraphs_is_empty() {
        assert_eq!(build_transcript_text(&[]), "");
    }
}
