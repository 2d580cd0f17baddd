use std::path::Path;

use uuid::Uuid;

use crate::{
    decoder::VideoDecoder,
    error::{LunaError, Result},
};

/// Default sampling cadence in seconds.
pub const DEFAULT_INTERVAL_SECONDS: f64 = 5.0;

/// Sample still frames from `video` at a fixed time cadence, replacing the
/// contents of `frames_dir` in full.
///
/// Frames are named `frame_<NNN>.jpg` with a 1-based, zero-padded sequence
/// number that increments only on successful decodes; indices that fail to
/// decode are skipped without leaving a hole in the numbering. The new frame
/// set is written to a temporary sibling directory and swapped into place
/// only after sampling finishes, so an interrupted run never leaves
/// `frames_dir` half-populated.
///
/// Returns the sorted list of produced frame filenames.
pub async fn sample_frames(
    video: &dyn VideoDecoder,
    frames_dir: &Path,
    interval_seconds: f64,
) -> Result<Vec<String>> {
    let frame_rate = video.frame_rate();
    let total_frames = video.total_frames();

    if !(interval_seconds > 0.0) {
        return Err(LunaError::Decode {
            path: frames_dir.to_path_buf(),
            reason: format!("sampling interval must be positive, got {interval_seconds}"),
        });
    }
    if frame_rate <= 0.0 || !frame_rate.is_finite() {
        return Err(LunaError::Decode {
            path: frames_dir.to_path_buf(),
            reason: format!("video reports invalid frame rate {frame_rate}"),
        });
    }

    // Rate drives the step, count bounds the loop. At least 1 so the index
    // always advances and the loop terminates within total_frames + 1 rounds.
    let step = (frame_rate * interval_seconds).round().max(1.0) as u64;

    let staging = frames_dir.with_file_name(format!(
        "{}.tmp-{}",
        frames_dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "frames".to_string()),
        Uuid::new_v4()
    ));
    tokio::fs::create_dir_all(&staging).await?;

    let mut names = Vec::new();
    let mut index: u64 = 0;
    let mut sequence: u32 = 1;

    while index <= total_frames {
        let name = format!("frame_{sequence:03}.jpg");
        let dest = staging.join(&name);
        match video.decode_frame(index, &dest).await {
            Ok(true) => {
                names.push(name);
                sequence += 1;
            }
            Ok(false) => {
                tracing::warn!(index, "frame failed to decode, skipping");
            }
            Err(e) => {
                let _ = tokio::fs::remove_dir_all(&staging).await;
                return Err(e);
            }
        }
        index += step;
    }

    // Swap the finished set into place, discarding the previous run in full.
    if tokio::fs::metadata(frames_dir).await.is_ok() {
        tokio::fs::remove_dir_all(frames_dir).await?;
    }
    tokio::fs::rename(&staging, frames_dir).await?;

    names.sort();
    Ok(names)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use async_trait::async_trait;

    use super::*;

    /// Decoder backed by no video at all: a fixed rate and count, plus a set
    /// of indices that refuse to decode.
    struct MockDecoder {
        frame_rate: f64,
        total_frames: u64,
        bad_indices: HashSet<u64>,
        label: &'static str,
    }

    impl MockDecoder {
        fn new(frame_rate: f64, total_frames: u64) -> Self {
            Self {
                frame_rate,
                total_frames,
                bad_indices: HashSet::new(),
                label: "mock",
            }
        }

        fn failing_at(mut self, indices: &[u64]) -> Self {
            self.bad_indices = indices.iter().copied().collect();
            self
        }

        fn labeled(mut self, label: &'static str) -> Self {
            self.label = label;
            self
        }
    }

    #[async_trait]
    impl VideoDecoder for MockDecoder {
        fn frame_rate(&self) -> f64 {
            self.frame_rate
        }

        fn total_frames(&self) -> u64 {
            self.total_frames
        }

        async fn decode_frame(&self, index: u64, dest: &Path) -> Result<bool> {
            if self.bad_indices.contains(&index) {
                return Ok(false);
            }
            tokio::fs::write(dest, format!("{}:{}", self.label, index)).await?;
            Ok(true)
        }
    }

    fn listed(frames_dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(frames_dir)
            .unwrap()
            .flatten()
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[tokio::test]
    async fn sequence_numbers_are_gapless() {
        let tmp = tempfile::tempdir().unwrap();
        let frames_dir = tmp.path().join("frames");
        // rate 2 fps, interval 5s -> step 10; indices 0, 10, 20, 30, 40, 50.
        let video = MockDecoder::new(2.0, 50);

        let names = sample_frames(&video, &frames_dir, 5.0).await.unwrap();
        assert_eq!(
            names,
            vec![
                "frame_001.jpg",
                "frame_002.jpg",
                "frame_003.jpg",
                "frame_004.jpg",
                "frame_005.jpg",
                "frame_006.jpg"
            ]
        );
        assert_eq!(listed(&frames_dir), names);
    }

    #[tokio::test]
    async fn corrupt_frame_is_skipped_without_renumbering() {
        let tmp = tempfile::tempdir().unwrap();
        let frames_dir = tmp.path().join("frames");
        // rate 0.4 fps, interval 5s -> step 2; indices 0, 2, 4; index 2 bad.
        let video = MockDecoder::new(0.4, 5).failing_at(&[2]);

        let names = sample_frames(&video, &frames_dir, 5.0).await.unwrap();
        assert_eq!(names, vec!["frame_001.jpg", "frame_002.jpg"]);

        // frame_002 must come from source index 4, not a duplicate of 0.
        let second = std::fs::read_to_string(frames_dir.join("frame_002.jpg")).unwrap();
        assert_eq!(second, "mock:4");
    }

    #[tokio::test]
    async fn second_run_replaces_first_run_entirely() {
        let tmp = tempfile::tempdir().unwrap();
        let frames_dir = tmp.path().join("frames");

        let long_video = MockDecoder::new(1.0, 40).labeled("long");
        let names = sample_frames(&long_video, &frames_dir, 5.0).await.unwrap();
        assert_eq!(names.len(), 9);

        let short_video = MockDecoder::new(1.0, 10).labeled("short");
        let names = sample_frames(&short_video, &frames_dir, 5.0).await.unwrap();
        assert_eq!(names, vec!["frame_001.jpg", "frame_002.jpg", "frame_003.jpg"]);
        assert_eq!(listed(&frames_dir), names);

        let first = std::fs::read_to_string(frames_dir.join("frame_001.jpg")).unwrap();
        assert_eq!(first, "short:0");
    }

    #[tokio::test]
    async fn zero_frame_rate_is_decode_error() {
        let tmp = tempfile::tempdir().unwrap();
        let frames_dir = tmp.path().join("frames");
        let video = MockDecoder::new(0.0, 100);

        let err = sample_frames(&video, &frames_dir, 5.0).await.unwrap_err();
        assert!(matches!(err, LunaError::Decode { .. }));
        assert!(!frames_dir.exists());
    }

    #[tokio::test]
    async fn non_positive_interval_is_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        let frames_dir = tmp.path().join("frames");
        let video = MockDecoder::new(30.0, 100);

        let err = sample_frames(&video, &frames_dir, 0.0).await.unwrap_err();
        assert!(matches!(err, LunaError::Decode { .. }));
    }

    #[tokio::test]
    async fn sub_frame_step_still_advances() {
        let tmp = tempfile::tempdir().unwrap();
        let frames_dir = tmp.path().join("frames");
        // rate * interval rounds to 0; the step clamps to 1.
        let video = MockDecoder::new(0.1, 3);

        let names = sample_frames(&video, &frames_dir, 1.0).await.unwrap();
        assert_eq!(names.len(), 4); // indices 0, 1, 2, 3
    }

    #[tokio::test]
    async fn all_frames_failing_still_terminates_and_clears() {
        let tmp = tempfile::tempdir().unwrap();
        let frames_dir = tmp.path().join("frames");
        std::fs::create_dir_all(&frames_dir).unwrap();
        std::fs::write(frames_dir.join("stale.jpg"), b"old").unwrap();

        let video = MockDecoder::new(1.0, 10).failing_at(&[0, 5, 10]);
        let names = sample_frames(&video, &frames_dir, 5.0).await.unwrap();
        assert!(names.is_empty());
        assert!(listed(&frames_dir).is_empty());
    }
}
