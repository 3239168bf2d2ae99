//! Local persistence for image history, prompt history and settings.
//!
//! Values are JSON strings under fixed keys, the same layout a browser's
//! local storage would hold. [`KeyValueStore`] is the backend seam; the
//! studio only ever talks to [`HistoryStore`].

pub mod history;
#[cfg(test)]
pub mod memory;
pub mod sqlite;

use anyhow::Result;
use async_trait::async_trait;

pub use history::{generate_image_id, HistoryStore};
#[cfg(test)]
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

pub const IMAGE_HISTORY_KEY: &str = "ai_image_history";
pub const PROMPT_HISTORY_KEY: &str = "ai_prompt_history";
pub const SETTINGS_KEY: &str = "ai_generation_settings";

#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;

    async fn set(&self, key: &str, value: &str) -> Result<()>;

    async fn remove(&self, key: &str) -> Result<()>;
}
