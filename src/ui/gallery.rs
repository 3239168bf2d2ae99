use crate::types::GeneratedImage;
use crate::utils::format::{format_generation_time, format_timestamp};

pub fn render_gallery(images: &[GeneratedImage]) -> String {
    if images.is_empty() {
        return "No images yet. Enter a prompt and /generate to create your first image.\n"
            .to_string();
    }

    let mut out = format!("Generated images ({})\n", images.len());
    for (index, image) in images.iter().enumerate() {
        out.push_str(&format!("[{}] {}\n", index + 1, image.prompt));
        out.push_str(&format!("    {}\n", image.url));
        let mut details = vec![
            format_timestamp(image.timestamp),
            format!("{}×{}", image.dimensions.width, image.dimensions.height),
            image.model.clone(),
        ];
        if let Some(seconds) = image.generation_time {
            details.push(format_generation_time(seconds));
        }
        out.push_str(&format!("    {}  (/download {})\n", details.join(" · "), index + 1));
    }
    out
}
