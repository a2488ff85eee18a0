use std::{
    path::PathBuf,
    str::FromStr,
    sync::Arc,
    time::{Duration, Instant},
};

use anyhow::Result;
use clap::{Parser, ValueEnum};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;

use lecsum_core::{
    ApiConfig, OpenAiChat, SummaryMode, SummaryOptions, TimeAnchorIndex,
    chunk::chunk_by_time,
    estimate::EstimatorParams,
    format::format_timestamp,
    quiz, segment,
    store::{
        get_record_dir, get_record_path, get_storage_root, get_transcript_path,
        get_wrong_notes_path, load_record, load_wrong_notes, new_record_id, save_record,
    },
    summarize::{summarize_concurrent, summarize_sequential},
    title::generate_title,
    transcribe::transcribe,
    types::{SummaryRecord, Transcript},
};

/// Fitted on past runs against the transcription endpoint.
const ESTIMATOR_PARAMS: &str = r#"{"coefficient": 0.28, "intercept": 12.0}"#;

fn format_duration(d: Duration) -> String {
    let secs = d.as_secs_f64();
    if secs < 60.0 {
        format!("{:.1}s", secs)
    } else {
        format!("{:.0}m {:.0}s", secs / 60.0, secs % 60.0)
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum CliStrategy {
    /// Fan all chunk requests out at once, merge in chunk order.
    Concurrent,
    /// One chunk at a time, next request only after the previous reply.
    Sequential,
}

#[derive(Clone, Copy, ValueEnum)]
enum QuizKind {
    Ox,
    Mcq,
}

#[derive(Parser)]
#[command(name = "lecsum")]
#[command(
    about = "Transcribe lecture audio, summarize it chunk by chunk with timestamps, and generate review quizzes"
)]
struct Cli {
    /// Audio file to process (mp3/wav)
    audio: PathBuf,

    /// Summary mode: "simple" or "detailed"
    #[arg(short, long, default_value = "simple")]
    mode: String,

    /// Skip the keyword/definition section
    #[arg(long)]
    no_keywords: bool,

    /// How chunk requests are dispatched
    #[arg(short, long, value_enum, default_value = "concurrent")]
    strategy: CliStrategy,

    /// Also generate a quiz of the given kind from the summary
    #[arg(short, long, value_enum)]
    quiz: Option<QuizKind>,

    /// Force re-processing even if cached files exist
    #[arg(short, long)]
    force: bool,
}

fn create_spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
            .template("{spinner:.cyan} {msg}")
            .unwrap(),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    // Fail fast on bad configuration before any network call
    let mode = match SummaryMode::from_str(&cli.mode) {
        Ok(mode) => mode,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            std::process::exit(1);
        }
    };
    let config = match ApiConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            std::process::exit(1);
        }
    };

    let options = SummaryOptions {
        mode,
        include_keywords: !cli.no_keywords,
        ..SummaryOptions::default()
    };

    let storage_root = get_storage_root();
    let source = cli.audio.to_string_lossy().into_owned();
    let record_dir = get_record_dir(&storage_root, &source);
    tokio::fs::create_dir_all(&record_dir).await?;

    println!(
        "\n{}  {}\n",
        style("lecsum").cyan().bold(),
        style("Lecture Summarizer").dim()
    );
    println!("{}", style("─".repeat(60)).dim());

    let total_start = Instant::now();

    // Step 1: Transcribe (check cache)
    let step_start = Instant::now();
    let transcript_path = get_transcript_path(&record_dir);
    let transcript: Transcript = if !cli.force && transcript_path.exists() {
        let json = tokio::fs::read_to_string(&transcript_path).await?;
        let transcript: Transcript = serde_json::from_str(&json)?;
        println!(
            "{} Transcribed: {:.1} min, {} {}",
            style("✓").green().bold(),
            transcript.segments.last().map(|s| s.end / 60.0).unwrap_or(0.0),
            style(&transcript.language).yellow(),
            style("(cached)").dim()
        );
        transcript
    } else {
        let estimator = EstimatorParams::from_json(ESTIMATOR_PARAMS)?;
        // Rough audio length from file size, assuming ~32 KB/s encoding
        let audio_secs = tokio::fs::metadata(&cli.audio).await?.len() as f32 / 32_000.0;
        let spinner = create_spinner(&format!(
            "Transcribing... (~{} expected)",
            format_duration(Duration::from_secs_f32(estimator.predict(audio_secs).max(1.0)))
        ));
        let transcript = transcribe(&config, &cli.audio).await?;
        tokio::fs::write(&transcript_path, serde_json::to_string_pretty(&transcript)?).await?;
        spinner.finish_with_message(format!(
            "{} Transcribed: {:.1} min, {} {}",
            style("✓").green().bold(),
            transcript.segments.last().map(|s| s.end / 60.0).unwrap_or(0.0),
            style(&transcript.language).yellow(),
            style(format!("[{}]", format_duration(step_start.elapsed()))).dim()
        ));
        transcript
    };

    // Step 2: Paragraphs and chunks (pure, no spinner needed)
    let paragraphs = segment::group_paragraphs(&transcript.segments, &segment::SegmentPolicy::default());
    let chunks = chunk_by_time(&paragraphs, options.chunk_size_secs);
    println!(
        "{} Grouped: {} paragraphs, {} chunks",
        style("✓").green().bold(),
        paragraphs.len(),
        chunks.len()
    );

    // Step 3: Summarize (check cache with mode)
    let step_start = Instant::now();
    let record_path = get_record_path(&record_dir, options.mode.as_str());
    let record = if !cli.force && record_path.exists() {
        let record = load_record(&record_path).await?;
        println!(
            "{} Summarized ({}) {}",
            style("✓").green().bold(),
            options.mode.as_str(),
            style("(cached)").dim()
        );
        record
    } else {
        let spinner = create_spinner(&format!(
            "Summarizing {} chunks ({} mode)...",
            chunks.len(),
            options.mode.as_str()
        ));
        let client = Arc::new(OpenAiChat::new(&config)?);
        let summary = match cli.strategy {
            CliStrategy::Concurrent => {
                summarize_concurrent(client.clone(), &chunks, &options).await?
            }
            CliStrategy::Sequential => {
                summarize_sequential(client.as_ref(), &chunks, &options).await?
            }
        };
        spinner.finish_with_message(format!(
            "{} Summarized {}",
            style("✓").green().bold(),
            style(format!("[{}]", format_duration(step_start.elapsed()))).dim()
        ));

        let step_start = Instant::now();
        let spinner = create_spinner("Generating title...");
        let rendered = summary.render();
        let title = match generate_title(client.as_ref(), &rendered).await {
            Ok(title) => title,
            Err(e) => {
                tracing::warn!(error = %e, "title generation failed");
                "제목 없음".to_string()
            }
        };
        spinner.finish_with_message(format!(
            "{} Title: {} {}",
            style("✓").green().bold(),
            style(&title).yellow(),
            style(format!("[{}]", format_duration(step_start.elapsed()))).dim()
        ));

        let record = SummaryRecord {
            id: new_record_id(),
            audio_file_name: cli
                .audio
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| source.clone()),
            transcribed_text: lecsum_core::build_transcript_text(&paragraphs),
            ai_summary: rendered,
            title,
            upload_date: String::new(),
            timestamp: std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_millis() as i64)
                .unwrap_or_default(),
            segments: transcript.segments.clone(),
            paragraphs: paragraphs.clone(),
        };
        save_record(&record, &record_path).await?;
        record
    };

    // Step 4: Quiz (optional)
    if let Some(kind) = cli.quiz {
        let spinner = create_spinner("Generating quiz...");
        let client = OpenAiChat::new(&config)?;
        let wrong_notes = load_wrong_notes(&get_wrong_notes_path(&storage_root)).await?;
        match kind {
            QuizKind::Ox => {
                let questions =
                    quiz::assemble_ox_quiz(&client, &record.ai_summary, &wrong_notes).await?;
                spinner.finish_with_message(format!(
                    "{} Quiz ready: {} OX questions",
                    style("✓").green().bold(),
                    questions.len()
                ));
                for (i, q) in questions.iter().enumerate() {
                    println!(
                        "\n{} {}",
                        style(format!("문제 {}.", i + 1)).cyan().bold(),
                        q.question
                    );
                    println!(
                        "   {} {}  {} {}",
                        style("정답:").dim(),
                        if q.answer { "O" } else { "X" },
                        style("해설:").dim(),
                        q.explanation
                    );
                }
            }
            QuizKind::Mcq => {
                let questions =
                    quiz::assemble_mcq_quiz(&client, &record.ai_summary, &wrong_notes).await?;
                spinner.finish_with_message(format!(
                    "{} Quiz ready: {} MCQ questions",
                    style("✓").green().bold(),
                    questions.len()
                ));
                for (i, q) in questions.iter().enumerate() {
                    println!(
                        "\n{} {}",
                        style(format!("문제 {}.", i + 1)).cyan().bold(),
                        q.question
                    );
                    for (j, option) in q.options.iter().enumerate() {
                        let letter = char::from(b'A' + j as u8);
                        println!("   {letter}. {option}");
                    }
                    println!(
                        "   {} {}  {} {}",
                        style("정답:").dim(),
                        char::from(b'A' + q.correct_index as u8),
                        style("해설:").dim(),
                        q.explanation
                    );
                }
            }
        }
    }

    println!(
        "\n{} {}",
        style("Total time:").dim(),
        style(format_duration(total_start.elapsed())).cyan().bold()
    );
    println!(
        "{} {}\n",
        style("Saved:").dim(),
        style(record_path.display()).cyan()
    );
    println!("{}", style("─".repeat(60)).dim());

    // Rendered summary plus the timestamps that can be jumped to
    println!("\n# {}\n", style(&record.title).bold());
    println!("{}\n", record.ai_summary);

    let index = TimeAnchorIndex::build(&record.ai_summary, &record.paragraphs);
    if !index.entries().is_empty() {
        println!("{}", style("─".repeat(60)).dim());
        println!("{}", style("Jump targets:").dim());
        for entry in index.entries() {
            if let Some(paragraph) = index.lookup(&entry.timestamp) {
                println!(
                    "  [{}] → {}–{}",
                    entry.timestamp,
                    format_timestamp(paragraph.start_time),
                    format_timestamp(paragraph.end_time)
                );
            }
        }
    }

    Ok(())
}
