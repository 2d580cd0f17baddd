//! Luna Core Library
//!
//! Core functionality for acquiring videos (YouTube download or upload),
//! sampling still frames at a fixed time cadence, and generating AI-powered
//! summaries from the sampled frames.

pub mod acquire;
pub mod decoder;
pub mod error;
pub mod model;
pub mod pipeline;
pub mod prompt;
pub mod provider;
pub mod sampler;
pub mod workdirs;

// Re-export commonly used items at crate root
pub use acquire::{VideoSource, download_video, fetch_video, save_upload};
pub use decoder::{FfmpegVideo, VideoDecoder};
pub use error::{LunaError, Result};
pub use model::generate;
pub use pipeline::{rewrite_summary, summarize_video, turn_into_story};
pub use prompt::{rewrite_prompt, story_prompt, summary_prompt};
pub use provider::{Provider, ProviderConfig};
pub use sampler::{DEFAULT_INTERVAL_SECONDS, sample_frames};
pub use workdirs::WorkDirs;
