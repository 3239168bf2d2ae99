const BAR_WIDTH: usize = 24;

pub fn render_loading(text: &str, progress: f64) -> String {
    let clamped = if progress.is_finite() {
        progress.clamp(0.0, 100.0)
    } else {
        0.0
    };
    let filled = ((clamped / 100.0) * BAR_WIDTH as f64).round() as usize;
    format!(
        "{text} [{}{}] {}%",
        "#".repeat(filled),
        "-".repeat(BAR_WIDTH - filled),
        clamped.round() as u32
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_rounded_percentage() {
        let line = render_loading("Generating your image...", 42.6);
        assert!(line.starts_with("Generating your image... ["));
        assert!(line.ends_with("] 43%"));
    }

    #[test]
    fn clamps_out_of_range_values() {
        assert!(render_loading("x", 140.0).ends_with(&format!("[{}] 100%", "#".repeat(BAR_WIDTH))));
        assert!(render_loading("x", -5.0).ends_with(&format!("[{}] 0%", "-".repeat(BAR_WIDTH))));
        assert!(render_loading("x", f64::NAN).ends_with("] 0%"));
    }
}
