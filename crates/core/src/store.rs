//! JSON-file persistence for summary records and the wrong-note list.
//!
//! Records live under a per-source directory keyed by a hash of the audio
//! source; the wrong-note list is a single file at the storage root. All
//! writes are whole-file JSON snapshots.

use std::{
    hash::{DefaultHasher, Hash, Hasher},
    path::{Path, PathBuf},
};

use tokio::fs;
use uuid::Uuid;

use crate::{
    error::Result,
    types::{SummaryRecord, WrongNote},
};

pub fn get_storage_root() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("/tmp"))
        .join("lecsum")
}

/// Per-source directory under the storage root, keyed by a hash of the
/// audio source string (path or URL).
pub fn get_record_dir(root: &Path, source: &str) -> PathBuf {
    let mut hasher = DefaultHasher::new();
    source.hash(&mut hasher);
    root.join(hasher.finish().to_string())
}

pub fn get_transcript_path(record_dir: &Path) -> PathBuf {
    record_dir.join("transcript.json")
}

/// Record path is summary-mode aware so simple and detailed runs of the same
/// audio cache independently.
pub fn get_record_path(record_dir: &Path, mode: &str) -> PathBuf {
    record_dir.join(format!("record_{mode}.json"))
}

pub fn get_wrong_notes_path(root: &Path) -> PathBuf {
    root.join("wrong_notes.json")
}

pub fn new_record_id() -> String {
    Uuid::new_v4().to_string()
}

pub async fn save_record(record: &SummaryRecord, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await?;
    }
    fs::write(path, serde_json::to_string_pretty(record)?).await?;
    Ok(())
}

pub async fn load_record(path: &Path) -> Result<SummaryRecord> {
    let json = fs::read_to_string(path).await?;
    Ok(serde_json::from_str(&json)?)
}

/// Lists every record stored under `root`, newest first.
pub async fn list_records(root: &Path) -> Result<Vec<SummaryRecord>> {
    let mut records = Vec::new();
    let Ok(mut dirs) = fs::read_dir(root).await else {
        return Ok(records);
    };
    while let Some(entry) = dirs.next_entry().await? {
        if !entry.file_type().await?.is_dir() {
            continue;
        }
        let mut files = fs::read_dir(entry.path()).await?;
        while let Some(file) = files.next_entry().await? {
            let name = file.file_name().to_string_lossy().into_owned();
            if name.starts_with("record_") && name.ends_with(".json") {
                if let Ok(record) = load_record(&file.path()).await {
                    records.push(record);
                }
            }
        }
    }
    records.sort_by_key(|r| std::cmp::Reverse(r.timestamp));
    Ok(records)
}

pub async fn load_wrong_notes(path: &Path) -> Result<Vec<WrongNote>> {
    match fs::read_to_string(path).await {
        Ok(json) => Ok(serde_json::from_str(&json)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
        Err(e) => Err(e.into()),
    }
}

pub async fn save_wrong_notes(notes: &[WrongNote], path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await?;
    }
    fs::write(path, serde_json::to_string_pretty(notes)?).await?;
    Ok(())
}

pub async fn append_wrong_note(note: WrongNote, path: &Path) -> Result<()> {
    let mut notes = load_wrong_notes(path).await?;
    notes.push(note);
    save_wrong_notes(&notes, path).await
}

/// Removes every stored note with the given question text (swipe-delete).
pub async fn remove_wrong_note(question: &str, path: &Path) -> Result<()> {
    let mut notes = load_wrong_notes(path).await?;
    notes.retain(|note| note.question() != question);
    save_wrong_notes(&notes, path).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Paragraph, Segment};

    fn scratch_root() -> PathBuf {
        std::env::temp_dir().join(format!("lecsum-store-test-{}", Uuid::new_v4()))
    }

    fn sample_record(source: &str) -> SummaryRecord {
        SummaryRecord {
            id: new_record_id(),
            audio_file_name: source.to_string(),
            transcribed_text: "[00:00]\n전사 본문".to_string(),
            ai_summary: "[00:00] 요약 본문".to_string(),
            title: "강의 제목".to_string(),
            upload_date: "2025-05-29".to_string(),
            timestamp: 1_748_000_000,
            segments: vec![Segment {
                start: 0.0,
                end: 5.0,
                text: "전사 본문".to_string(),
            }],
            paragraphs: vec![Paragraph {
                start_time: 0.0,
                end_time: 5.0,
                text: "전사 본문".to_string(),
            }],
        }
    }

    #[test]
    fn record_dir_is_stable_per_source() {
        let root = PathBuf::from("/cache");
        assert_eq!(
            get_record_dir(&root, "lecture.mp3"),
            get_record_dir(&root, "lecture.mp3")
        );
        assert_ne!(
            get_record_dir(&root, "lecture.mp3"),
            get_record_dir(&root, "other.mp3")
        );
    }

    #[tokio::test]
    async fn record_round_trips_through_disk() {
        let root = scratch_root();
        let record = sample_record("lecture.mp3");
        let path = get_record_path(&get_record_dir(&root, "lecture.mp3"), "simple");

        save_record(&record, &path).await.unwrap();
        let loaded = load_record(&path).await.unwrap();

        assert_eq!(loaded.id, record.id);
        assert_eq!(loaded.ai_summary, record.ai_summary);
        assert_eq!(loaded.paragraphs, record.paragraphs);

        fs::remove_dir_all(&root).await.unwrap();
    }

    #[tokio::test]
    async fn listing_returns_records_newest_first() {
        let root = scratch_root();
        let mut first = sample_record("a.mp3");
        first.timestamp = 100;
        let mut second = sample_record("b.mp3");
        second.timestamp = 200;

        save_record(&first, &get_record_path(&get_record_dir(&root, "a.mp3"), "simple"))
            .await
            .unwrap();
        save_record(&second, &get_record_path(&get_record_dir(&root, "b.mp3"), "simple"))
            .await
            .unwrap();

        let records = list_records(&root).await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].timestamp, 200);

        fs::remove_dir_all(&root).await.unwrap();
    }

    #[tokio::test]
    async fn missing_wrong_note_file_reads_as_empty() {
        let root = scratch_root();
        let notes = load_wrong_notes(&get_wrong_notes_path(&root)).await.unwrap();
        assert!(notes.is_empty());
    }

    #[tokio::test]
    async fn wrong_notes_append_and_remove_by_question() {
        let root = scratch_root();
        let path = get_wrong_notes_path(&root);

        append_wrong_note(
            WrongNote::Ox {
                question: "틀린 OX 문제".to_string(),
                answer: false,
                explanation: "해설".to_string(),
            },
            &path,
        )
        .await
        .unwrap();
        append_wrong_note(
            WrongNote::Mcq {
                question: "틀린 객관식 문제".to_string(),
                options: [
                    "하나".to_string(),
                    "둘".to_string(),
                    "셋".to_string(),
                    "넷".to_string(),
                ],
                correct_index: 3,
                explanation: "해설".to_string(),
            },
            &path,
        )
        .await
        .unwrap();

        let notes = load_wrong_notes(&path).await.unwrap();
        assert_eq!(notes.len(), 2);

        remove_wrong_note("틀린 OX 문제", &path).await.unwrap();
        let notes = load_wrong_notes(&path).await.unwrap();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].question(), "틀린 객관식 문제");

        fs::remove_dir_all(&root).await.unwrap();
    }

    #[tokio::test]
    async fn wrong_note_variants_round_trip_with_tags() {
        let root = scratch_root();
        let path = get_wrong_notes_path(&root);
        let note = WrongNote::Mcq {
            question: "태그 직렬화 확인".to_string(),
            options: [
                "A안".to_string(),
                "B안".to_string(),
                "C안".to_string(),
                "D안".to_string(),
            ],
            correct_index: 1,
            explanation: "두 번째가 맞다".to_string(),
        };

        save_wrong_notes(std::slice::from_ref(&note), &path).await.unwrap();
        let json = fs::read_to_string(&path).await.unwrap();
        assert!(json.contains("\"kind\": \"mcq\""));

        let loaded = load_wrong_notes(&path).await.unwrap();
        assert_eq!(loaded[0], note);

        fs::remove_dir_all(&root).await.unwrap();
    }
}
