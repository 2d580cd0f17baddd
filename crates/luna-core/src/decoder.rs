use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Deserialize;
use tokio::process::Command;

use crate::error::{LunaError, Result};

/// Seek-and-decode access to a video stream.
///
/// `decode_frame` returns `Ok(false)` for an ordinary per-frame decode miss;
/// `Err` is reserved for environmental failure (e.g. ffmpeg not installed).
/// The sampler is written against this trait so it can be tested without
/// real video files.
#[async_trait]
pub trait VideoDecoder: Send + Sync {
    /// Frames per second reported by the stream. Always positive for an
    /// opened video.
    fn frame_rate(&self) -> f64;

    /// Total frame count captured when the video was opened.
    fn total_frames(&self) -> u64;

    /// Seek to `index` and decode one frame into a still image at `dest`.
    async fn decode_frame(&self, index: u64, dest: &Path) -> Result<bool>;
}

/// ffprobe/ffmpeg-backed video file.
pub struct FfmpegVideo {
    path: PathBuf,
    frame_rate: f64,
    total_frames: u64,
}

#[derive(Deserialize)]
struct Probe {
    #[serde(default)]
    streams: Vec<ProbeStream>,
    format: Option<ProbeFormat>,
}

#[derive(Deserialize)]
struct ProbeStream {
    avg_frame_rate: Option<String>,
    nb_frames: Option<String>,
}

#[derive(Deserialize)]
struct ProbeFormat {
    duration: Option<String>,
}

impl FfmpegVideo {
    /// Probe a video file with ffprobe.
    ///
    /// Fails with a decode error when the file cannot be probed, has no
    /// video stream, or reports a zero/invalid frame rate.
    pub async fn open(path: &Path) -> Result<Self> {
        let output = Command::new("ffprobe")
            .arg("-v")
            .arg("error")
            .arg("-select_streams")
            .arg("v:0")
            .arg("-show_entries")
            .arg("stream=avg_frame_rate,nb_frames")
            .arg("-show_entries")
            .arg("format=duration")
            .arg("-of")
            .arg("json")
            .arg(path)
            .output()
            .await?;

        if !output.status.success() {
            return Err(LunaError::Decode {
                path: path.to_path_buf(),
                reason: String::from_utf8_lossy(&output.stderr).to_string(),
            });
        }

        let (frame_rate, total_frames) =
            parse_probe(&String::from_utf8_lossy(&output.stdout), path)?;

        Ok(Self {
            path: path.to_path_buf(),
            frame_rate,
            total_frames,
        })
    }
}

/// Parse ffprobe JSON into (frame_rate, total_frames).
///
/// Frame rates come as fractions like "30000/1001". When nb_frames is
/// absent (common for webm), fall back to duration * rate.
fn parse_probe(json: &str, path: &Path) -> Result<(f64, u64)> {
    let probe: Probe = serde_json::from_str(json)?;

    let stream = probe.streams.first().ok_or_else(|| LunaError::Decode {
        path: path.to_path_buf(),
        reason: "no video stream found".to_string(),
    })?;

    let frame_rate = stream
        .avg_frame_rate
        .as_deref()
        .and_then(parse_rational)
        .unwrap_or(0.0);
    if frame_rate <= 0.0 || !frame_rate.is_finite() {
        return Err(LunaError::Decode {
            path: path.to_path_buf(),
            reason: format!(
                "invalid frame rate {:?}",
                stream.avg_frame_rate.as_deref().unwrap_or("missing")
            ),
        });
    }

    let total_frames = match stream.nb_frames.as_deref().and_then(|n| n.parse::<u64>().ok()) {
        Some(n) => n,
        None => {
            let duration = probe
                .format
                .and_then(|f| f.duration)
                .and_then(|d| d.parse::<f64>().ok())
                .unwrap_or(0.0);
            (duration * frame_rate) as u64
        }
    };

    Ok((frame_rate, total_frames))
}

fn parse_rational(s: &str) -> Option<f64> {
    match s.split_once('/') {
        Some((num, den)) => {
            let num: f64 = num.parse().ok()?;
            let den: f64 = den.parse().ok()?;
            if den == 0.0 { None } else { Some(num / den) }
        }
        None => s.parse().ok(),
    }
}

#[async_trait]
impl VideoDecoder for FfmpegVideo {
    fn frame_rate(&self) -> f64 {
        self.frame_rate
    }

    fn total_frames(&self) -> u64 {
        self.total_frames
    }

    async fn decode_frame(&self, index: u64, dest: &Path) -> Result<bool> {
        let seek_seconds = index as f64 / self.frame_rate;
        let output = Command::new("ffmpeg")
            .arg("-v")
            .arg("error")
            .arg("-y")
            .arg("-ss")
            .arg(format!("{seek_seconds:.4}"))
            .arg("-i")
            .arg(&self.path)
            .arg("-frames:v")
            .arg("1")
            .arg(dest)
            .output()
            .await?;

        // ffmpeg can exit 0 while producing nothing (seek past the end),
        // so a missing or empty output file is also a miss.
        let produced = tokio::fs::metadata(dest).await.map(|m| m.len() > 0);
        if !output.status.success() || !produced.unwrap_or(false) {
            let _ = tokio::fs::remove_file(dest).await;
            return Ok(false);
        }
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_probe_fractional_rate() {
        let json = r#"{"streams":[{"avg_frame_rate":"30000/1001","nb_frames":"300"}],
                       "format":{"duration":"10.010000"}}"#;
        let (rate, total) = parse_probe(json, Path::new("v.mp4")).unwrap();
        assert!((rate - 29.97).abs() < 0.01);
        assert_eq!(total, 300);
    }

    #[test]
    fn parse_probe_missing_nb_frames_falls_back_to_duration() {
        let json = r#"{"streams":[{"avg_frame_rate":"25/1"}],
                       "format":{"duration":"8.0"}}"#;
        let (rate, total) = parse_probe(json, Path::new("v.webm")).unwrap();
        assert_eq!(rate, 25.0);
        assert_eq!(total, 200);
    }

    #[test]
    fn parse_probe_zero_rate_is_decode_error() {
        let json = r#"{"streams":[{"avg_frame_rate":"0/0","nb_frames":"10"}],
                       "format":{"duration":"1.0"}}"#;
        let err = parse_probe(json, Path::new("v.mp4")).unwrap_err();
        assert!(matches!(err, LunaError::Decode { .. }));
    }

    #[test]
    fn parse_probe_no_stream_is_decode_error() {
        let json = r#"{"streams":[],"format":{"duration":"1.0"}}"#;
        let err = parse_probe(json, Path::new("audio.mp4")).unwrap_err();
        assert!(matches!(err, LunaError::Decode { .. }));
    }

    #[test]
    fn parse_rational_handles_plain_numbers() {
        assert_eq!(parse_rational("30"), Some(30.0));
        assert_eq!(parse_rational("24/1"), Some(24.0));
        assert_eq!(parse_rational("0/0"), None);
        assert_eq!(parse_rational("garbage"), None);
    }
}
