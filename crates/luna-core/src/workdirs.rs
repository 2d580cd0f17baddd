use std::path::{Path, PathBuf};

use crate::error::Result;

const VIDEO_EXTENSIONS: &[&str] = &["mp4", "webm", "mkv", "mov", "avi"];

/// Working directories for video and frame storage.
///
/// Passed explicitly into acquisition and sampling so tests can point them
/// at temporary locations. Video storage only grows across runs; frame
/// storage is replaced wholesale on every sampling run.
#[derive(Debug, Clone)]
pub struct WorkDirs {
    pub videos_dir: PathBuf,
    pub frames_dir: PathBuf,
}

impl WorkDirs {
    pub fn new(videos_dir: impl Into<PathBuf>, frames_dir: impl Into<PathBuf>) -> Self {
        Self {
            videos_dir: videos_dir.into(),
            frames_dir: frames_dir.into(),
        }
    }

    /// Create both directories if they do not exist yet.
    pub async fn ensure(&self) -> Result<()> {
        tokio::fs::create_dir_all(&self.videos_dir).await?;
        tokio::fs::create_dir_all(&self.frames_dir).await?;
        Ok(())
    }

    /// Find the most recently created video file in the videos directory.
    ///
    /// Downloaded filenames are not unique across runs, so the newest file
    /// wins when a caller needs to disambiguate.
    pub fn newest_video(&self) -> Option<PathBuf> {
        let entries = std::fs::read_dir(&self.videos_dir).ok()?;

        let mut newest: Option<(std::time::SystemTime, PathBuf)> = None;
        for entry in entries.flatten() {
            let path = entry.path();
            if !is_video_file(&path) {
                continue;
            }
            let Ok(meta) = entry.metadata() else {
                continue;
            };
            let Ok(created) = meta.created().or_else(|_| meta.modified()) else {
                continue;
            };
            if newest.as_ref().is_none_or(|(t, _)| created > *t) {
                newest = Some((created, path));
            }
        }
        newest.map(|(_, path)| path)
    }

    /// Sorted list of frame filenames currently in the frames directory.
    pub fn frame_files(&self) -> Vec<String> {
        let Ok(entries) = std::fs::read_dir(&self.frames_dir) else {
            return Vec::new();
        };

        let mut names: Vec<String> = entries
            .flatten()
            .filter(|e| e.path().is_file())
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }
}

fn is_video_file(path: &Path) -> bool {
    let Some(ext) = path.extension() else {
        return false;
    };
    let ext = ext.to_string_lossy().to_lowercase();
    VIDEO_EXTENSIONS.contains(&ext.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newest_video_picks_latest_and_ignores_non_video() {
        let tmp = tempfile::tempdir().unwrap();
        let dirs = WorkDirs::new(tmp.path(), tmp.path().join("frames"));

        std::fs::write(tmp.path().join("first.mp4"), b"a").unwrap();
        std::fs::write(tmp.path().join("notes.txt"), b"b").unwrap();
        // Creation-time resolution is coarse on some filesystems.
        std::thread::sleep(std::time::Duration::from_millis(20));
        std::fs::write(tmp.path().join("second.webm"), b"c").unwrap();

        let newest = dirs.newest_video().unwrap();
        assert_eq!(newest.file_name().unwrap(), "second.webm");
    }

    #[test]
    fn newest_video_empty_dir_is_none() {
        let tmp = tempfile::tempdir().unwrap();
        let dirs = WorkDirs::new(tmp.path(), tmp.path().join("frames"));
        assert!(dirs.newest_video().is_none());
    }

    #[test]
    fn frame_files_are_sorted() {
        let tmp = tempfile::tempdir().unwrap();
        let frames = tmp.path().join("frames");
        std::fs::create_dir_all(&frames).unwrap();
        std::fs::write(frames.join("frame_002.jpg"), b"x").unwrap();
        std::fs::write(frames.join("frame_001.jpg"), b"x").unwrap();
        std::fs::write(frames.join("frame_010.jpg"), b"x").unwrap();

        let dirs = WorkDirs::new(tmp.path(), &frames);
        assert_eq!(
            dirs.frame_files(),
            vec!["frame_001.jpg", "frame_002.jpg", "frame_010.jpg"]
        );
    }
}
