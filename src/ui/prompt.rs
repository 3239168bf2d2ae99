use crate::types::{PromptHistoryEntry, EXAMPLE_PROMPTS};
use crate::utils::format::{format_timestamp, truncate_prompt};

const RECENT_PROMPT_PREVIEW: usize = 50;
pub const RECENT_PROMPTS_SHOWN: usize = 5;

pub fn render_prompt_input(
    prompt: &str,
    system_prompt: &str,
    recent: &[PromptHistoryEntry],
    is_generating: bool,
) -> String {
    let mut out = String::new();
    out.push_str("System prompt:\n");
    if system_prompt.trim().is_empty() {
        out.push_str("  (none)\n");
    } else {
        out.push_str(&format!("  {}\n", system_prompt));
    }

    out.push_str("\nImage prompt:\n");
    if prompt.trim().is_empty() {
        out.push_str("  (empty) type a description and /generate\n");
    } else {
        out.push_str(&format!("  {}\n", prompt));
    }
    if is_generating {
        out.push_str("  generation in progress...\n");
    }

    out.push_str("\nTry an example (/example N):\n");
    for (index, example) in EXAMPLE_PROMPTS.iter().enumerate() {
        out.push_str(&format!("  {}. {}\n", index + 1, example));
    }

    if !recent.is_empty() {
        out.push_str("\nRecent prompts (/use N):\n");
        for (index, entry) in recent.iter().take(RECENT_PROMPTS_SHOWN).enumerate() {
            out.push_str(&format!(
                "  {}. {} ({})\n",
                index + 1,
                truncate_prompt(&entry.prompt, RECENT_PROMPT_PREVIEW),
                format_timestamp(entry.timestamp)
            ));
        }
    }
    out
}

pub fn render_error(error: Option<&str>) -> Option<String> {
    error.map(|message| format!("! {message}  (/dismiss)"))
}
