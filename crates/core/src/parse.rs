//! Extractors that recover structured records from free-form model output.
//!
//! These grammars are tolerant by contract: malformed or partial blocks are
//! dropped silently and the remaining blocks still parse, so one bad block
//! never voids the rest of a reply. Callers treat an empty result as "nothing
//! usable", not as an error.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::types::{McqQuestion, OxQuestion};

/// Marker introducing the keyword section of a summary reply.
pub const KEYWORD_MARKER: &str = "주요 키워드:";

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// `keyword: definition` pair; the definition runs until the next colon or
/// comma, which is why the prompt forbids both inside definitions.
static KEYWORD_PAIR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([^:\s]+)\s*:\s*([^:,]+(?:\s[^:,]+)*)").unwrap());

/// `문제:` / `문제 3:` question marker opening a quiz block.
static QUESTION_MARKER: Lazy<Regex> = Lazy::new(|| Regex::new(r"문제\s*\d*:").unwrap());

static OX_BLOCK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)문제\s*\d*:\s*(.+?)\s*정답\s*\d*:\s*([OoXx])\s*해설\s*\d*:\s*(.+)").unwrap()
});

static MCQ_QUESTION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"문제\s*\d*:\s*(.+?)\s*보기:").unwrap());
static MCQ_OPTIONS: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)보기:\s*(.+?)\s*정답:").unwrap());
static MCQ_ANSWER: Lazy<Regex> = Lazy::new(|| Regex::new(r"정답:\s*([A-D])").unwrap());
static MCQ_EXPLANATION: Lazy<Regex> = Lazy::new(|| Regex::new(r"해설:\s*(.+)").unwrap());
static OPTION_MARKER: Lazy<Regex> = Lazy::new(|| Regex::new(r"[A-D]\.").unwrap());

/// Extracts `keyword: definition` pairs from one keyword section (the text
/// following a [`KEYWORD_MARKER`], marker excluded).
///
/// Newlines and whitespace runs are collapsed first. After the regex scan,
/// one trailing pair the scan may have missed is recovered by splitting the
/// remainder once on its first colon. Pairs with an empty keyword or empty
/// definition are rejected.
pub fn parse_keyword_section(section: &str) -> Vec<(String, String)> {
    let newline_free = section.replace('\n', " ");
    let cleaned = WHITESPACE.replace_all(&newline_free, " ");
    let cleaned = cleaned.trim();

    let mut pairs = Vec::new();
    let mut last_end = 0;
    for captures in KEYWORD_PAIR.captures_iter(cleaned) {
        let keyword = captures[1].trim().to_string();
        let definition = captures[2].trim().to_string();
        if !keyword.is_empty() && !definition.is_empty() {
            pairs.push((keyword, definition));
        }
        last_end = captures.get(0).map(|m| m.end()).unwrap_or(last_end);
    }

    let remaining = cleaned[last_end..].trim();
    if let Some((keyword, definition)) = remaining.split_once(':') {
        let keyword = keyword.trim();
        let definition = definition.trim();
        if !keyword.is_empty() && !definition.is_empty() {
            pairs.push((keyword.to_string(), definition.to_string()));
        }
    }

    pairs
}

/// True when `section` contains at least one recognizable pair; the merge
/// step uses this to tell a genuine keyword section from stray body text
/// that happened to follow the marker.
pub fn has_keyword_pairs(section: &str) -> bool {
    let newline_free = section.replace('\n', " ");
    let cleaned = WHITESPACE.replace_all(&newline_free, " ");
    KEYWORD_PAIR.is_match(cleaned.trim())
}

/// Scans every keyword section of `text` (one per [`KEYWORD_MARKER`]
/// occurrence) into a single map. Duplicate keywords resolve last-write-wins.
pub fn parse_keyword_definitions(text: &str) -> BTreeMap<String, String> {
    let mut map = BTreeMap::new();
    for section in text.split(KEYWORD_MARKER).skip(1) {
        for (keyword, definition) in parse_keyword_section(section) {
            map.insert(keyword, definition);
        }
    }
    map
}

/// Slices `content` into blocks, one per question marker. Text before the
/// first marker is ignored.
fn question_blocks(content: &str) -> Vec<&str> {
    let starts: Vec<usize> = QUESTION_MARKER.find_iter(content).map(|m| m.start()).collect();
    starts
        .iter()
        .enumerate()
        .map(|(i, &start)| {
            let end = starts.get(i + 1).copied().unwrap_or(content.len());
            content[start..end].trim()
        })
        .collect()
}

/// Parses repeated `문제/정답/해설` blocks into OX questions. Answer `O` maps
/// to `true`, `X` to `false` (case-insensitive); a block with any other
/// answer token, or with a missing field, is dropped.
pub fn parse_ox_quiz(content: &str) -> Vec<OxQuestion> {
    let questions: Vec<OxQuestion> = question_blocks(content)
        .into_iter()
        .filter_map(|block| {
            let captures = OX_BLOCK.captures(block)?;
            Some(OxQuestion {
                question: captures[1].trim().to_string(),
                answer: captures[2].eq_ignore_ascii_case("O"),
                explanation: captures[3].trim().to_string(),
            })
        })
        .collect();
    debug!(count = questions.len(), "parsed OX quiz blocks");
    questions
}

/// Splits an options line on its `A.`–`D.` prefixes.
fn split_options(options_text: &str) -> Vec<String> {
    let marks: Vec<_> = OPTION_MARKER.find_iter(options_text).collect();
    marks
        .iter()
        .enumerate()
        .filter_map(|(i, mark)| {
            let end = marks
                .get(i + 1)
                .map(|next| next.start())
                .unwrap_or(options_text.len());
            let option = options_text[mark.end()..end].trim();
            (!option.is_empty()).then(|| option.to_string())
        })
        .collect()
}

/// Parses repeated `문제/보기/정답/해설` blocks into MCQ questions.
///
/// A block qualifies only if it carries both an options and an answer
/// marker; it is accepted only when exactly four options are recovered and
/// the answer letter maps to one of them. Everything else is dropped.
pub fn parse_mcq_quiz(content: &str) -> Vec<McqQuestion> {
    let questions: Vec<McqQuestion> = question_blocks(content)
        .into_iter()
        .filter(|block| block.contains("보기:") && block.contains("정답:"))
        .filter_map(|block| {
            let question = MCQ_QUESTION.captures(block)?[1].trim().to_string();
            let options_text = MCQ_OPTIONS.captures(block)?[1].trim().to_string();
            let answer = MCQ_ANSWER.captures(block)?[1].to_string();
            let explanation = MCQ_EXPLANATION.captures(block)?[1].trim().to_string();

            let options: [String; 4] = split_options(&options_text).try_into().ok()?;
            let correct_index = match answer.as_str() {
                "A" => 0,
                "B" => 1,
                "C" => 2,
                "D" => 3,
                _ => return None,
            };

            Some(McqQuestion {
                question,
                options,
                correct_index,
                explanation,
            })
        })
        .collect();
    debug!(count = questions.len(), "parsed MCQ quiz blocks");
    questions
}
