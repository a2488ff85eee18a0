//! Remote transcription collaborator.
//!
//! Uploads an audio file to a Whisper-style `audio/transcriptions` endpoint
//! and parses the time-coded segments out of the `verbose_json` response.
//! Speech recognition itself is the remote service's business.

use std::{path::Path, time::Duration};

use reqwest::multipart::{Form, Part};
use tracing::{debug, error};

use crate::{
    config::ApiConfig,
    error::{LecsumError, Result},
    types::{Segment, Transcript},
};

pub const TRANSCRIBE_MODEL: &str = "whisper-1";

/// Large uploads of lecture-length audio can take a long while.
const TRANSCRIBE_TIMEOUT_SECS: u64 = 1200;

/// Transcribes `audio_path` into time-coded segments.
pub async fn transcribe(config: &ApiConfig, audio_path: &Path) -> Result<Transcript> {
    let file_name = audio_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "audio".to_string());
    let bytes = tokio::fs::read(audio_path).await?;
    debug!(file = %file_name, size = bytes.len(), "uploading audio for transcription");

    let form = Form::new()
        .part(
            "file",
            Part::bytes(bytes)
                .file_name(file_name)
                .mime_str("audio/mpeg")?,
        )
        .text("model", TRANSCRIBE_MODEL)
        .text("response_format", "verbose_json");

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(TRANSCRIBE_TIMEOUT_SECS))
        .connect_timeout(Duration::from_secs(TRANSCRIBE_TIMEOUT_SECS))
        .build()?;

    let response = client
        .post(&config.transcribe_url)
        .header("Authorization", format!("Bearer {}", config.api_key))
        .multipart(form)
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        error!(status = status.as_u16(), "transcription request rejected");
        return Err(LecsumError::RemoteRejected {
            status: status.as_u16(),
        });
    }

    let body = response.json::<serde_json::Value>().await?;
    parse_transcription(&body)
}

fn parse_transcription(body: &serde_json::Value) -> Result<Transcript> {
    let raw_segments = body["segments"]
        .as_array()
        .ok_or(LecsumError::MissingSegments)?;

    let segments = raw_segments
        .iter()
        .map(|seg| Segment {
            start: seg["start"].as_f64().unwrap_or(0.0) as f32,
            end: seg["end"].as_f64().unwrap_or(0.0) as f32,
            text: seg["text"].as_str().unwrap_or_default().to_string(),
        })
        .collect();

    Ok(Transcript {
        text: body["text"].as_str().unwrap_or_default().to_string(),
        segments,
        language: body["language"].as_str().unwrap_or("unknown").to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbose_json_segments_are_parsed() {
        let body: serde_json::Value = serde_json::from_str(
            r#"{
                "text": "오늘은 인공지능을 배웁니다. 인공지능은 데이터를 학습합니다",
                "language": "korean",
                "segments": [
                    { "start": 0.0, "end": 2.0, "text": "오늘은 인공지능을 배웁니다." },
                    { "start": 2.0, "end": 5.0, "text": "인공지능은 데이터를 학습합니다" }
                ]
            }"#,
        )
        .unwrap();

        let transcript = parse_transcription(&body).unwrap();
        assert_eq!(transcript.segments.len(), 2);
        assert_eq!(transcript.segments[0].end, 2.0);
        assert_eq!(transcript.segments[1].text, "인공지능은 데이터를 학습합니다");
        assert_eq!(transcript.language, "korean");
    }

    #[test]
    fn missing_segments_field_is_a_hard_error() {
        let body: serde_json::Value = serde_json::from_str(r#"{ "text": "전사 결과" }"#).unwrap();
        assert!(matches!(
            parse_transcription(&body),
            Err(LecsumError::MissingSegments)
        ));
    }
}
