//! Quiz generation over a finished summary, plus assembly that reuses
//! previously missed questions from the wrong-note list before asking the
//! model for fresh ones.

use tracing::debug;

use crate::{
    error::Result,
    llm::{ChatClient, ChatRequest},
    parse,
    types::{McqQuestion, OxQuestion, WrongNote},
};

pub const QUIZ_MODEL: &str = "gpt-3.5-turbo";
const QUIZ_MAX_TOKENS: u32 = 1000;
const QUIZ_TEMPERATURE: f32 = 0.7;

/// Questions per quiz round.
pub const QUIZ_SIZE: usize = 5;

const QUIZ_SYSTEM_PROMPT: &str = "너는 한국어로 퀴즈를 만드는 AI야.";

fn ox_prompt(summary: &str) -> String {
    format!(
        "아래 강의 요약을 기반으로 정확히 5개의 OX 퀴즈를 만들어줘.
각 문제는 반드시 **진술문 형식의 사실 확인 문장**이어야 하며,
객관식처럼 \"O, X 중 고르시오\" 식의 선택 유도 문장은 절대 쓰면 안 돼.

형식은 반드시 아래와 같아야 해:

문제: (사실을 진술하는 한 문장)
정답: O 또는 X
해설: (정답에 대한 해설을 한두 문장으로 설명)

예시:
문제: 인공지능은 데이터를 기반으로 학습한다.
정답: O
해설: 인공지능은 데이터를 통해 패턴을 학습하기 때문에 정답은 O이다.

강의 요약:
{summary}"
    )
}

fn mcq_prompt(summary: &str) -> String {
    format!(
        "아래 강의 요약을 바탕으로 객관식 퀴즈 5개를 만들어줘. 각 퀴즈는 반드시 아래 형식을 따라야 해:

문제: (질문 내용)
보기: A. 선택지1 B. 선택지2 C. 선택지3 D. 선택지4
정답: (정답 하나, A/B/C/D 중 하나만)
해설: (정답에 대한 이유를 한두 문장으로 설명)

예시:
문제: 인공지능의 학습 방식으로 올바른 것은?
보기: A. 무작위 B. 강화학습 C. 추측 D. 마법
정답: B
해설: 인공지능은 보상을 통해 학습하는 강화학습을 사용한다.

강의 요약:
{summary}"
    )
}

fn quiz_request(user: String) -> ChatRequest {
    ChatRequest {
        system: QUIZ_SYSTEM_PROMPT.to_string(),
        user,
        model: QUIZ_MODEL,
        max_tokens: QUIZ_MAX_TOKENS,
        temperature: QUIZ_TEMPERATURE,
    }
}

/// Generates OX questions from `summary`. Malformed blocks in the reply are
/// dropped by the parser, so fewer than five questions may come back.
pub async fn generate_ox_quiz(client: &dyn ChatClient, summary: &str) -> Result<Vec<OxQuestion>> {
    let reply = client.complete(quiz_request(ox_prompt(summary))).await?;
    Ok(parse::parse_ox_quiz(&reply))
}

/// Generates MCQ questions from `summary`; same tolerance as the OX path.
pub async fn generate_mcq_quiz(client: &dyn ChatClient, summary: &str) -> Result<Vec<McqQuestion>> {
    let reply = client.complete(quiz_request(mcq_prompt(summary))).await?;
    Ok(parse::parse_mcq_quiz(&reply))
}

/// Assembles an OX round: previously missed questions first (up to
/// [`QUIZ_SIZE`]), then freshly generated ones to fill the gap.
pub async fn assemble_ox_quiz(
    client: &dyn ChatClient,
    summary: &str,
    wrong_notes: &[WrongNote],
) -> Result<Vec<OxQuestion>> {
    let mut questions: Vec<OxQuestion> = wrong_notes
        .iter()
        .filter_map(|note| match note {
            WrongNote::Ox {
                question,
                answer,
                explanation,
            } => Some(OxQuestion {
                question: question.clone(),
                answer: *answer,
                explanation: explanation.clone(),
            }),
            WrongNote::Mcq { .. } => None,
        })
        .take(QUIZ_SIZE)
        .collect();

    let needed = QUIZ_SIZE - questions.len();
    if needed > 0 {
        let fresh = generate_ox_quiz(client, summary).await?;
        questions.extend(fresh.into_iter().take(needed));
    }
    debug!(reused = QUIZ_SIZE - needed, total = questions.len(), "assembled OX quiz");

    Ok(questions)
}

/// MCQ counterpart of [`assemble_ox_quiz`].
pub async fn assemble_mcq_quiz(
    client: &dyn ChatClient,
    summary: &str,
    wrong_notes: &[WrongNote],
) -> Result<Vec<McqQuestion>> {
    let mut questions: Vec<McqQuestion> = wrong_notes
        .iter()
        .filter_map(|note| match note {
            WrongNote::Mcq {
                question,
                options,
                correct_index,
                explanation,
            } => Some(McqQuestion {
                question: question.clone(),
                options: options.clone(),
                correct_index: *correct_index,
                explanation: explanation.clone(),
            }),
            WrongNote::Ox { .. } => None,
        })
        .take(QUIZ_SIZE)
        .collect();

    let needed = QUIZ_SIZE - questions.len();
    if needed > 0 {
        let fresh = generate_mcq_quiz(client, summary).await?;
        questions.extend(fresh.into_iter().take(needed));
    }

    Ok(questions)
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;

    struct CannedClient {
        reply: String,
        calls: Mutex<usize>,
    }

    impl CannedClient {
        fn new(reply: impl Into<String>) -> Self {
            Self {
                reply: reply.into(),
                calls: Mutex::new(0),
            }
        }

        fn call_count(&self) -> usize {
            *self.calls.lock().unwrap()
        }
    }

    #[async_trait]
    impl ChatClient for CannedClient {
        async fn complete(&self, _request: ChatRequest) -> Result<String> {
            *self.calls.lock().unwrap() += 1;
            Ok(self.reply.clone())
        }
    }

    fn five_ox_blocks() -> String {
        (1..=5)
            .map(|i| {
                format!(
                    "문제: {i}번째 진술이다.\n정답: {}\n해설: {i}번 해설.",
                    if i % 2 == 0 { "X" } else { "O" }
                )
            })
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    fn ox_note(question: &str) -> WrongNote {
        WrongNote::Ox {
            question: question.to_string(),
            answer: true,
            explanation: "복습용 해설".to_string(),
        }
    }

    #[tokio::test]
    async fn generation_returns_parsed_questions() {
        let client = CannedClient::new(five_ox_blocks());
        let questions = generate_ox_quiz(&client, "요약").await.unwrap();
        assert_eq!(questions.len(), 5);
        assert!(questions[0].answer);
        assert!(!questions[1].answer);
    }

    #[tokio::test]
    async fn assembly_reuses_wrong_notes_then_tops_up() {
        let client = CannedClient::new(five_ox_blocks());
        let notes = vec![
            ox_note("복습 문제 하나"),
            ox_note("복습 문제 둘"),
            ox_note("복습 문제 셋"),
        ];

        let questions = assemble_ox_quiz(&client, "요약", &notes).await.unwrap();

        assert_eq!(questions.len(), QUIZ_SIZE);
        assert_eq!(questions[0].question, "복습 문제 하나");
        assert_eq!(questions[2].question, "복습 문제 셋");
        assert_eq!(questions[3].question, "1번째 진술이다.");
        assert_eq!(questions[4].question, "2번째 진술이다.");
    }

    #[tokio::test]
    async fn full_wrong_note_list_skips_generation() {
        let client = CannedClient::new(five_ox_blocks());
        let notes: Vec<WrongNote> = (0..6).map(|i| ox_note(&format!("복습 {i}"))).collect();

        let questions = assemble_ox_quiz(&client, "요약", &notes).await.unwrap();

        assert_eq!(questions.len(), QUIZ_SIZE);
        assert_eq!(client.call_count(), 0);
    }

    #[tokio::test]
    async fn mcq_assembly_ignores_ox_notes() {
        let mcq_reply = "\
문제: 객관식 문제?
보기: A. 하나 B. 둘 C. 셋 D. 넷
정답: C
해설: 세 번째 보기가 맞다.";
        let client = CannedClient::new(mcq_reply);
        let notes = vec![ox_note("OX 복습 문제")];

        let questions = assemble_mcq_quiz(&client, "요약", &notes).await.unwrap();

        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].correct_index, 2);
    }
}
