//! Partitions an ordered paragraph sequence into time-bounded chunks for
//! submission to the chat model under context limits.

use crate::types::{Chunk, Paragraph};

/// Default chunk span: 13 minutes of lecture per request.
pub const DEFAULT_CHUNK_SIZE_SECS: u32 = 13 * 60;

/// Splits `paragraphs` into contiguous chunks, starting a new chunk at the
/// first paragraph whose start time lies `chunk_size_secs` or more past the
/// running chunk start.
///
/// Boundaries only ever fall between paragraphs, so flattening the result
/// reproduces the input exactly. A single paragraph longer than the span
/// still becomes its own chunk.
pub fn chunk_by_time(paragraphs: &[Paragraph], chunk_size_secs: u32) -> Vec<Chunk> {
    let mut chunks = Vec::new();
    let mut current: Chunk = Vec::new();
    let mut chunk_start = paragraphs.first().map(|p| p.start_time).unwrap_or(0.0);

    for paragraph in paragraphs {
        if paragraph.start_time - chunk_start >= chunk_size_secs as f32 && !current.is_empty() {
            chunks.push(std::mem::take(&mut current));
            chunk_start = paragraph.start_time;
        }
        current.push(paragraph.clone());
    }
    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paragraph(start: f32, end: f32) -> Paragraph {
        Paragraph {
            start_time: start,
            end_time: end,
            text: format!("문단 {start}"),
        }
    }

    #[test]
    fn empty_input_yields_no_chunks() {
        assert!(chunk_by_time(&[], DEFAULT_CHUNK_SIZE_SECS).is_empty());
    }

    #[test]
    fn short_input_stays_in_one_chunk() {
        let paragraphs = vec![paragraph(0.0, 60.0), paragraph(60.0, 300.0)];
        let chunks = chunk_by_time(&paragraphs, DEFAULT_CHUNK_SIZE_SECS);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0], paragraphs);
    }

    #[test]
    fn boundary_starts_a_new_chunk_at_the_crossing_paragraph() {
        let paragraphs = vec![
            paragraph(0.0, 400.0),
            paragraph(400.0, 700.0),
            paragraph(800.0, 1200.0),
            paragraph(1200.0, 1500.0),
        ];
        let chunks = chunk_by_time(&paragraphs, 780);

        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].len(), 2);
        assert_eq!(chunks[1][0].start_time, 800.0);
    }

    #[test]
    fn flattening_reproduces_the_input() {
        let paragraphs: Vec<_> = (0..20)
            .map(|i| paragraph(i as f32 * 120.0, (i + 1) as f32 * 120.0))
            .collect();
        let chunks = chunk_by_time(&paragraphs, 780);

        let flattened: Vec<_> = chunks.into_iter().flatten().collect();
        assert_eq!(flattened, paragraphs);
    }

    #[test]
    fn no_chunk_except_the_last_spans_less_than_the_threshold() {
        let paragraphs: Vec<_> = (0..10)
            .map(|i| paragraph(i as f32 * 300.0, (i + 1) as f32 * 300.0))
            .collect();
        let chunks = chunk_by_time(&paragraphs, 780);

        for chunk in &chunks[..chunks.len() - 1] {
            let span = chunk.last().unwrap().start_time - chunk.first().unwrap().start_time;
            // The paragraph that crossed the threshold opens the next chunk,
            // so each closed chunk covers at least the span up to it.
            assert!(span + 300.0 >= 780.0);
        }
    }

    #[test]
    fn oversized_single_paragraph_becomes_its_own_chunk() {
        let paragraphs = vec![
            paragraph(0.0, 2000.0),
            paragraph(2000.0, 2100.0),
            paragraph(2100.0, 2200.0),
        ];
        let chunks = chunk_by_time(&paragraphs, 780);

        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].len(), 1);
        assert_eq!(chunks[0][0].end_time, 2000.0);
        assert_eq!(chunks[1].len(), 2);
    }
}
