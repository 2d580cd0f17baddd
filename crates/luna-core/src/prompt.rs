//! Prompt templates for the three summary operations.

/// Prompt asking for an initial summary from sampled frame filenames.
pub fn summary_prompt(frame_names: &[String]) -> String {
    format!(
        "You are a helpful assistant. Summarize the video based on the following frame filenames:\n{}",
        frame_names.join("\n")
    )
}

/// Prompt asking for a polished rewrite of an existing summary.
pub fn rewrite_prompt(summary: &str) -> String {
    format!(
        "Please rewrite this video summary in a polished and easy to understand way:\n\n{summary}"
    )
}

/// Prompt asking to turn an existing summary into a narrative story.
pub fn story_prompt(summary: &str) -> String {
    format!(
        "Turn the following video summary into a narrative story with characters, settings, conflict and resolution:\n\n{summary}"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_prompt_lists_frames_in_order() {
        let frames = vec!["frame_001.jpg".to_string(), "frame_002.jpg".to_string()];
        let prompt = summary_prompt(&frames);
        assert!(prompt.contains("frame_001.jpg\nframe_002.jpg"));
        assert!(prompt.contains("Summarize the video"));
    }

    #[test]
    fn transform_prompts_embed_the_summary() {
        let summary = "A cat chases a laser pointer.";
        assert!(rewrite_prompt(summary).ends_with(summary));
        assert!(story_prompt(summary).ends_with(summary));
        assert!(story_prompt(summary).contains("conflict and resolution"));
    }
}
