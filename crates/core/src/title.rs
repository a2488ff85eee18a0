//! One-line title generation from a finished summary.

use crate::{
    error::Result,
    llm::{ChatClient, ChatRequest},
};

pub const TITLE_MODEL: &str = "gpt-4";
const TITLE_MAX_TOKENS: u32 = 50;
const TITLE_TEMPERATURE: f32 = 0.7;

/// Asks for a concise (≤ 15 character) title for `summary`. Models love to
/// quote their titles, so surrounding double quotes are stripped.
pub async fn generate_title(client: &dyn ChatClient, summary: &str) -> Result<String> {
    let reply = client
        .complete(ChatRequest {
            system: "다음 요약 내용을 한 줄 제목으로 간결하게 만들어줘. 핵심 주제를 잘 드러내되 15자 이내로."
                .to_string(),
            user: format!("요약 내용:\n{summary}"),
            model: TITLE_MODEL,
            max_tokens: TITLE_MAX_TOKENS,
            temperature: TITLE_TEMPERATURE,
        })
        .await?;

    Ok(clean_title(&reply))
}

fn clean_title(raw: &str) -> String {
    raw.replace('"', "").trim().to_string()
}
