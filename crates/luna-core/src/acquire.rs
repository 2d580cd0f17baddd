use std::path::{Path, PathBuf};

use tokio::{fs, process::Command};

use crate::{
    error::{LunaError, Result},
    workdirs::WorkDirs,
};

/// Where a video comes from: a URL handed to the downloader, or bytes the
/// user uploaded directly.
#[derive(Debug, Clone)]
pub enum VideoSource {
    Url(String),
    Upload { file_name: String, bytes: Vec<u8> },
}

impl VideoSource {
    /// Short human-readable name for error messages.
    pub fn describe(&self) -> String {
        match self {
            VideoSource::Url(url) => url.clone(),
            VideoSource::Upload { file_name, .. } => file_name.clone(),
        }
    }
}

/// Fetch or register a video file and return its local path.
///
/// The returned path is fully written and readable before this resolves.
pub async fn fetch_video(source: &VideoSource, dirs: &WorkDirs) -> Result<PathBuf> {
    match source {
        VideoSource::Url(url) => download_video(url, &dirs.videos_dir).await,
        VideoSource::Upload { file_name, bytes } => {
            save_upload(file_name, bytes, &dirs.videos_dir).await
        }
    }
}

/// Download a video from URL using yt-dlp
pub async fn download_video(url: &str, videos_dir: &Path) -> Result<PathBuf> {
    run_downloader("yt-dlp", url, videos_dir).await
}

async fn run_downloader(program: &str, url: &str, videos_dir: &Path) -> Result<PathBuf> {
    let output_template = videos_dir.join("%(title)s.%(ext)s");
    let output = Command::new(program)
        .arg(url)
        .arg("--print")
        .arg("after_move:filepath")
        .arg("--extractor-args")
        .arg("youtube:player_client=android,web")
        .arg("-f")
        .arg("best[ext=mp4]/best")
        .arg("-o")
        .arg(&output_template)
        .output()
        .await?;

    if !output.status.success() {
        return Err(LunaError::Acquisition {
            source_name: url.to_string(),
            reason: String::from_utf8_lossy(&output.stderr).to_string(),
        });
    }

    let stdout_str = String::from_utf8_lossy(output.stdout.as_slice());
    let filepath = stdout_str.trim();
    tracing::debug!(path = filepath, "downloaded video");
    Ok(PathBuf::from(filepath))
}

/// Write uploaded bytes into the videos directory and return the path.
pub async fn save_upload(file_name: &str, bytes: &[u8], videos_dir: &Path) -> Result<PathBuf> {
    // Strip any directory components a client may have sent along.
    let name = Path::new(file_name)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .filter(|n| n != "..")
        .unwrap_or_else(|| "upload.mp4".to_string());

    let dest = videos_dir.join(name);
    fs::write(&dest, bytes).await.map_err(|e| LunaError::Acquisition {
        source_name: file_name.to_string(),
        reason: e.to_string(),
    })?;
    tracing::debug!(path = %dest.display(), "stored uploaded video");
    Ok(dest)
}
