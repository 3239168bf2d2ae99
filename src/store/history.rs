use std::sync::Arc;

use anyhow::Result;
use chrono::Utc;
use rand::Rng;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::warn;

use super::{KeyValueStore, IMAGE_HISTORY_KEY, PROMPT_HISTORY_KEY, SETTINGS_KEY};
use crate::types::{GeneratedImage, GenerationSettings, PromptHistoryEntry};

pub const IMAGE_HISTORY_CAP: usize = 50;
pub const PROMPT_HISTORY_CAP: usize = 20;

const ID_SUFFIX_LEN: usize = 9;
const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Builds a list-key identifier from the current time and a random suffix.
/// Collisions are possible but negligible; this is not a security token.
pub fn generate_image_id() -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..ID_SUFFIX_LEN)
        .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
        .collect();
    format!("img_{}_{}", Utc::now().timestamp_millis(), suffix)
}

/// History and settings persistence on top of any [`KeyValueStore`].
///
/// Every operation degrades instead of failing: write errors are logged and
/// dropped, read errors yield an empty list or the default settings.
#[derive(Clone)]
pub struct HistoryStore {
    backend: Arc<dyn KeyValueStore>,
}

impl HistoryStore {
    pub fn new(backend: Arc<dyn KeyValueStore>) -> Self {
        HistoryStore { backend }
    }

    async fn read_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.backend.get(key).await? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    async fn write_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let raw = serde_json::to_string(value)?;
        self.backend.set(key, &raw).await
    }

    async fn read_list<T: DeserializeOwned>(&self, key: &str) -> Vec<T> {
        match self.read_json::<Vec<T>>(key).await {
            Ok(items) => items.unwrap_or_default(),
            Err(err) => {
                warn!("Failed to load {key}: {err}");
                Vec::new()
            }
        }
    }

    pub async fn save_image_to_history(&self, image: &GeneratedImage) {
        let mut images = self.get_image_history().await;
        images.insert(0, image.clone());
        images.truncate(IMAGE_HISTORY_CAP);
        if let Err(err) = self.write_json(IMAGE_HISTORY_KEY, &images).await {
            warn!("Failed to save image to history: {err}");
        }
    }

    pub async fn get_image_history(&self) -> Vec<GeneratedImage> {
        self.read_list(IMAGE_HISTORY_KEY).await
    }

    pub async fn clear_image_history(&self) {
        if let Err(err) = self.backend.remove(IMAGE_HISTORY_KEY).await {
            warn!("Failed to clear image history: {err}");
        }
    }

    pub async fn save_prompt_to_history(&self, prompt: &str) {
        let existing = self.get_prompt_history().await;
        let mut entries = Vec::with_capacity(existing.len() + 1);
        entries.push(PromptHistoryEntry {
            id: generate_image_id(),
            prompt: prompt.to_string(),
            timestamp: Utc::now().timestamp_millis(),
            image_url: None,
        });
        entries.extend(existing.into_iter().filter(|entry| entry.prompt != prompt));
        entries.truncate(PROMPT_HISTORY_CAP);
        if let Err(err) = self.write_json(PROMPT_HISTORY_KEY, &entries).await {
            warn!("Failed to save prompt to history: {err}");
        }
    }

    pub async fn get_prompt_history(&self) -> Vec<PromptHistoryEntry> {
        self.read_list(PROMPT_HISTORY_KEY).await
    }

    pub async fn save_settings(&self, settings: &GenerationSettings) {
        if let Err(err) = self.write_json(SETTINGS_KEY, settings).await {
            warn!("Failed to save settings: {err}");
        }
    }

    pub async fn load_settings(&self) -> GenerationSettings {
        match self.read_json::<Value>(SETTINGS_KEY).await {
            Ok(Some(stored)) => merge_settings(&stored),
            Ok(None) => GenerationSettings::default(),
            Err(err) => {
                warn!("Failed to load settings: {err}");
                GenerationSettings::default()
            }
        }
    }
}

/// Overlays stored settings onto the defaults one field at a time. A field
/// that is null or of the wrong type keeps its default; the rest still apply.
fn merge_settings(stored: &Value) -> GenerationSettings {
    let defaults = GenerationSettings::default();
    let Some(stored) = stored.as_object() else {
        warn!("Ignoring stored settings that are not an object");
        return defaults;
    };
    let Ok(Value::Object(mut merged)) = serde_json::to_value(&defaults) else {
        return defaults;
    };

    for (key, value) in stored {
        if !merged.contains_key(key) {
            continue;
        }
        let mut candidate = merged.clone();
        candidate.insert(key.clone(), value.clone());
        if serde_json::from_value::<GenerationSettings>(Value::Object(candidate.clone())).is_ok() {
            merged = candidate;
        } else {
            warn!("Ignoring stored setting {key}: unexpected value {value}");
        }
    }

    serde_json::from_value(Value::Object(merged)).unwrap_or(defaults)
}
