use crate::{
    acquire::{VideoSource, fetch_video},
    decoder::FfmpegVideo,
    error::Result,
    model::generate,
    prompt::{rewrite_prompt, story_prompt, summary_prompt},
    provider::Provider,
    sampler::sample_frames,
    workdirs::WorkDirs,
};

/// Run the full forward pipeline: acquire the video, sample frames at the
/// given cadence, and ask the model for a summary built from the sorted
/// frame filenames.
///
/// Acquisition failure aborts before any frame is sampled; the previous
/// frame set stays intact in that case.
pub async fn summarize_video(
    source: &VideoSource,
    dirs: &WorkDirs,
    interval_seconds: f64,
    provider: &Provider,
) -> Result<String> {
    let video_path = fetch_video(source, dirs).await?;
    let video = FfmpegVideo::open(&video_path).await?;
    let frame_names = sample_frames(&video, &dirs.frames_dir, interval_seconds).await?;
    generate(provider, &summary_prompt(&frame_names)).await
}

/// Rewrite an existing summary in a polished, easy-to-read form.
///
/// The caller owns the summary value; on failure it keeps the original.
pub async fn rewrite_summary(summary: &str, provider: &Provider) -> Result<String> {
    generate(provider, &rewrite_prompt(summary)).await
}

/// Turn an existing summary into a narrative story.
pub async fn turn_into_story(summary: &str, provider: &Provider) -> Result<String> {
    generate(provider, &story_prompt(summary)).await
}
