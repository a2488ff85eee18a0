//! Chunked summarization orchestrator.
//!
//! Two execution strategies over the same per-chunk request and the same
//! canonical merge:
//!
//! - [`summarize_sequential`] submits chunk *i+1* only after chunk *i*'s
//!   reply has been parsed, threading the keyword map forward. At most one
//!   request is outstanding.
//! - [`summarize_concurrent`] fans all chunk requests out at once and merges
//!   replies from chunk-indexed slots, so the consolidated text always reads
//!   in lecture order no matter how the network interleaves completions.
//!
//! Under either strategy a single chunk failure fails the whole run: the
//! terminal result is produced exactly once, remaining requests are not
//! issued (sequential) or are aborted (concurrent), and no partial summary
//! escapes.

use std::{collections::BTreeMap, str::FromStr, sync::Arc};

use tokio::task::JoinSet;
use tracing::debug;

use crate::{
    error::{LecsumError, Result},
    format::build_transcript_text,
    llm::{ChatClient, ChatRequest},
    parse::{self, KEYWORD_MARKER},
    types::{Chunk, SummaryResult},
};

pub const SUMMARY_MODEL: &str = "gpt-4-turbo";
const SUMMARY_MAX_TOKENS: u32 = 2000;
const SUMMARY_TEMPERATURE: f32 = 0.5;

const KEYWORD_INSTRUCTION: &str = "
마지막에 '주요 키워드:'라는 제목 아래 다음 형식으로 정리해 주세요:

- 형식: 키워드: 정의
- 예시: 재귀함수: 자기 자신을 호출하는 함수

요구 사항:
1. 각 키워드는 고유한 개념어여야 하며, 일반 단어(예: 분석, 효과, 방식, 법칙)는 제외하세요.
2. 정의에는 다른 키워드나 예시, 쉼표(,)를 포함하지 마세요.
3. 정의는 자기참조 없이 단독으로 의미를 이해할 수 있어야 하며, 15단어 이내의 간결한 문장으로 작성하세요.
4. 키워드는 줄바꿈 없이 쉼표(,)로 구분해 주세요.";

/// How much detail the per-paragraph summaries should carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryMode {
    Simple,
    Detailed,
}

impl SummaryMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SummaryMode::Simple => "simple",
            SummaryMode::Detailed => "detailed",
        }
    }
}

impl FromStr for SummaryMode {
    type Err = LecsumError;

    /// An unrecognized mode is a configuration defect, not a retryable
    /// failure.
    fn from_str(s: &str) -> Result<Self> {
        match s {
            "simple" => Ok(SummaryMode::Simple),
            "detailed" => Ok(SummaryMode::Detailed),
            other => Err(LecsumError::UnknownSummaryMode(other.to_string())),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SummaryOptions {
    pub mode: SummaryMode,
    pub include_keywords: bool,
    pub chunk_size_secs: u32,
}

impl Default for SummaryOptions {
    fn default() -> Self {
        Self {
            mode: SummaryMode::Simple,
            include_keywords: true,
            chunk_size_secs: crate::chunk::DEFAULT_CHUNK_SIZE_SECS,
        }
    }
}

fn system_prompt(mode: SummaryMode, include_keywords: bool) -> String {
    let base = match mode {
        SummaryMode::Simple => {
            "다음 강의 내용을 문단별로 간단하면서도 핵심은 포함하여 반드시 한국어로 요약해 주세요. \
             각 문단 앞에는 시작 시각(예: [00:00])을 제목처럼 따로 표시해 주세요."
        }
        SummaryMode::Detailed => {
            "다음 강의 내용을 문단별로 자세하고 정확하게 반드시 한국어로 요약해 주세요. \
             각 문단 앞에는 시작 시각(예: [00:00])을 제목처럼 따로 표시해 주세요."
        }
    };
    if include_keywords {
        format!("{base}{KEYWORD_INSTRUCTION}")
    } else {
        base.to_string()
    }
}

fn user_prompt(chunk: &Chunk) -> String {
    format!(
        "다음은 강의의 문단별 내용입니다. 한국어(Korean)이 아닌 외국어일 수 있으나, \
         반드시 한국어로 요약해 주세요 :\n\n{}",
        build_transcript_text(chunk)
    )
}

fn chunk_request(chunk: &Chunk, options: &SummaryOptions) -> ChatRequest {
    ChatRequest {
        system: system_prompt(options.mode, options.include_keywords),
        user: user_prompt(chunk),
        model: SUMMARY_MODEL,
        max_tokens: SUMMARY_MAX_TOKENS,
        temperature: SUMMARY_TEMPERATURE,
    }
}

/// Folds one chunk reply into the accumulating body and keyword map.
///
/// The reply's keyword section (if any) is stripped from the body and merged
/// into the map, last write winning on duplicate keywords. Text after the
/// marker that contains no recognizable pair is kept as body instead, since
/// models occasionally continue prose there.
fn merge_reply(body: &mut String, keywords: &mut BTreeMap<String, String>, reply: &str) {
    let (chunk_body, section) = match reply.split_once(KEYWORD_MARKER) {
        Some((chunk_body, section)) => (chunk_body, Some(section)),
        None => (reply, None),
    };

    let chunk_body = chunk_body.trim();
    if !chunk_body.is_empty() {
        body.push_str(chunk_body);
        body.push_str("\n\n");
    }

    if let Some(section) = section {
        if parse::has_keyword_pairs(section) {
            for (keyword, definition) in parse::parse_keyword_section(section) {
                keywords.insert(keyword, definition);
            }
        } else if !section.trim().is_empty() {
            body.push_str(section.trim());
            body.push_str("\n\n");
        }
    }
}

/// Merges per-chunk replies, in the order given, into one consolidated
/// result. Both orchestration strategies reduce to this.
pub fn merge_chunk_summaries(replies: &[String]) -> SummaryResult {
    let mut body = String::new();
    let mut keywords = BTreeMap::new();
    for reply in replies {
        merge_reply(&mut body, &mut keywords, reply);
    }
    SummaryResult {
        body: body.trim().to_string(),
        keywords,
    }
}

/// Strict sequential chaining. Chunk *i+1* is not issued until chunk *i*'s
/// reply has been merged; the first failure is terminal and no further
/// request is sent.
pub async fn summarize_sequential(
    client: &dyn ChatClient,
    chunks: &[Chunk],
    options: &SummaryOptions,
) -> Result<SummaryResult> {
    let mut body = String::new();
    let mut keywords = BTreeMap::new();

    for (index, chunk) in chunks.iter().enumerate() {
        debug!(chunk = index, total = chunks.len(), "summarizing chunk");
        let reply = client.complete(chunk_request(chunk, options)).await?;
        merge_reply(&mut body, &mut keywords, &reply);
    }

    Ok(SummaryResult {
        body: body.trim().to_string(),
        keywords,
    })
}

/// Fan-out/fan-in. All chunk requests are submitted at once; replies land
/// in chunk-indexed slots and merge in chunk order, never arrival order. On
/// the first failure the remaining in-flight requests are aborted and the
/// error is returned once.
pub async fn summarize_concurrent(
    client: Arc<dyn ChatClient>,
    chunks: &[Chunk],
    options: &SummaryOptions,
) -> Result<SummaryResult> {
    let mut set = JoinSet::new();
    for (index, chunk) in chunks.iter().enumerate() {
        let client = Arc::clone(&client);
        let request = chunk_request(chunk, options);
        set.spawn(async move { (index, client.complete(request).await) });
    }

    let mut slots: Vec<Option<String>> = vec![None; chunks.len()];
    while let Some(joined) = set.join_next().await {
        let (index, result) = joined.map_err(|e| LecsumError::TaskFailed {
            reason: e.to_string(),
        })?;
        match result {
            Ok(reply) => {
                debug!(chunk = index, "chunk summary arrived");
                slots[index] = Some(reply);
            }
            Err(e) => {
                set.abort_all();
                return Err(e);
            }
        }
    }

    let replies: Vec<String> = slots.into_iter().flatten().collect();
    Ok(merge_chunk_summaries(&replies))
}
