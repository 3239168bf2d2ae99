//! Text views for the terminal studio. Each function renders state it is
//! handed; none of them fetches or persists anything.

pub mod gallery;
pub mod history;
pub mod loading;
pub mod prompt;
pub mod settings;

pub use gallery::render_gallery;
pub use history::render_history;
pub use loading::render_loading;
pub use prompt::{render_error, render_prompt_input, RECENT_PROMPTS_SHOWN};
pub use settings::SettingsForm;
