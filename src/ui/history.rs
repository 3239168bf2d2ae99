use crate::types::GeneratedImage;
use crate::utils::format::{format_timestamp, truncate_prompt};

const HISTORY_PROMPT_PREVIEW: usize = 60;

pub fn render_history(images: &[GeneratedImage]) -> String {
    if images.is_empty() {
        return "History\n  No generation history yet\n".to_string();
    }

    let mut out = format!("History [{}]  (/clear)\n", images.len());
    for (index, image) in images.iter().enumerate() {
        let badge = image
            .generation_time
            .map(|seconds| format!(" [{seconds:.1}s]"))
            .unwrap_or_default();
        out.push_str(&format!(
            "  {}. {}\n     {}{}  {} × {}  (/select {})\n",
            index + 1,
            truncate_prompt(&image.prompt, HISTORY_PROMPT_PREVIEW),
            format_timestamp(image.timestamp),
            badge,
            image.dimensions.width,
            image.dimensions.height,
            index + 1
        ));
    }
    out
}
