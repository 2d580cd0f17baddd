use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;

use luna_core::{
    DEFAULT_INTERVAL_SECONDS, Provider, VideoSource, WorkDirs, rewrite_summary, summarize_video,
    turn_into_story,
};

/// CLI wrapper for Provider enum (needed for clap ValueEnum)
#[derive(Clone, Default, ValueEnum)]
enum CliProvider {
    #[default]
    Groq,
    Openai,
    Gemini,
}

impl From<CliProvider> for Provider {
    fn from(cli: CliProvider) -> Self {
        match cli {
            CliProvider::Groq => Provider::Groq,
            CliProvider::Openai => Provider::Openai,
            CliProvider::Gemini => Provider::Gemini,
        }
    }
}

#[derive(Parser)]
#[command(name = "luna")]
#[command(
    about = "Download or upload a video, sample frames at a fixed cadence, and summarize it with an LLM"
)]
struct Cli {
    /// Video URL (handed to yt-dlp)
    #[arg(conflicts_with = "file", required_unless_present = "file")]
    url: Option<String>,

    /// Local video file to upload instead of downloading
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Sampling interval in seconds
    #[arg(short, long, default_value_t = DEFAULT_INTERVAL_SECONDS)]
    interval: f64,

    /// AI provider for summary generation
    #[arg(short, long, default_value = "groq")]
    provider: CliProvider,

    /// Directory for downloaded/uploaded videos
    #[arg(long, default_value = "videos")]
    videos_dir: PathBuf,

    /// Directory for sampled frames (cleared on every run)
    #[arg(long, default_value = "frames")]
    frames_dir: PathBuf,
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

fn print_summary(summary: &str) {
    println!("{}", style("─".repeat(60)).dim());
    println!("{summary}");
    println!("{}", style("─".repeat(60)).dim());
}

fn read_command() -> Option<String> {
    print!(
        "{} ",
        style("[r]ewrite  [s]tory  [p]rint  [q]uit >").cyan()
    );
    std::io::stdout().flush().ok()?;
    let mut line = String::new();
    if std::io::stdin().read_line(&mut line).ok()? == 0 {
        return None;
    }
    Some(line.trim().to_lowercase())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let provider: Provider = cli.provider.into();

    // Validate API key early
    if let Err(e) = provider.validate_api_key() {
        eprintln!("{} {}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }

    let source = match (&cli.url, &cli.file) {
        (Some(url), None) => VideoSource::Url(url.clone()),
        (None, Some(path)) => {
            let file_name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "upload.mp4".to_string());
            let bytes = tokio::fs::read(path).await?;
            VideoSource::Upload { file_name, bytes }
        }
        _ => unreachable!("clap enforces exactly one source"),
    };

    let dirs = WorkDirs::new(&cli.videos_dir, &cli.frames_dir);
    dirs.ensure().await?;

    println!(
        "\n{}  {}\n",
        style("luna").cyan().bold(),
        style("Video Summarizer").dim()
    );

    let spinner = create_spinner(&format!(
        "Fetching, sampling every {:.0}s, summarizing with {}...",
        cli.interval,
        provider.name()
    ));
    let mut summary = match summarize_video(&source, &dirs, cli.interval, &provider).await {
        Ok(summary) => {
            spinner.finish_with_message(format!(
                "{} Summary generated ({} frames)",
                style("✓").green().bold(),
                dirs.frame_files().len()
            ));
            summary
        }
        Err(e) => {
            spinner.finish_and_clear();
            eprintln!("{} {}", style("Error:").red().bold(), e);
            std::process::exit(1);
        }
    };

    print_summary(&summary);

    // Interactive transforms. A failed call leaves the current summary as-is.
    while let Some(command) = read_command() {
        let transform = match command.as_str() {
            "r" | "rewrite" => rewrite_summary(&summary, &provider).await,
            "s" | "story" => turn_into_story(&summary, &provider).await,
            "p" | "print" => {
                print_summary(&summary);
                continue;
            }
            "q" | "quit" | "exit" => break,
            "" => continue,
            other => {
                eprintln!("{} unknown command {other:?}", style("?").yellow());
                continue;
            }
        };

        match transform {
            Ok(new_summary) => {
                summary = new_summary;
                print_summary(&summary);
            }
            Err(e) => {
                eprintln!("{} {}", style("Error:").red().bold(), e);
            }
        }
    }

    Ok(())
}
