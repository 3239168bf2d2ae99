//! Front-end controller: owns the UI state, drives generations through a
//! [`GenerationBackend`] and writes results through to the [`HistoryStore`].

pub mod client;
pub mod progress;
pub mod terminal;

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::{info, warn};

use crate::store::history::IMAGE_HISTORY_CAP;
use crate::store::{generate_image_id, HistoryStore};
use crate::types::{
    GeneratedImage, GenerationSettings, ImageGenerationRequest, PromptHistoryEntry,
};
use client::GenerationBackend;
use progress::{start_progress_simulator, ProgressHandle};

pub use client::ProxyClient;

const FALLBACK_FAILURE_MESSAGE: &str = "Failed to generate image";
const FALLBACK_TRANSPORT_MESSAGE: &str = "An error occurred while generating the image";

#[derive(Debug, Clone, PartialEq)]
pub enum GenerateOutcome {
    /// Blank prompt or a generation already running; nothing happened.
    Skipped,
    Generated(GeneratedImage),
    Failed(String),
}

pub struct Studio {
    history: HistoryStore,
    backend: Arc<dyn GenerationBackend>,
    progress_interval: Duration,
    prompt: String,
    is_generating: bool,
    images: Vec<GeneratedImage>,
    settings: GenerationSettings,
    show_settings: bool,
    error: Option<String>,
    progress: ProgressHandle,
}

impl Studio {
    /// Builds the controller and loads persisted image history and settings.
    pub async fn load(
        history: HistoryStore,
        backend: Arc<dyn GenerationBackend>,
        progress_interval: Duration,
    ) -> Self {
        let images = history.get_image_history().await;
        let settings = history.load_settings().await;
        info!("Studio loaded with {} image(s) in history", images.len());

        Studio {
            history,
            backend,
            progress_interval,
            prompt: String::new(),
            is_generating: false,
            images,
            settings,
            show_settings: false,
            error: None,
            progress: ProgressHandle::default(),
        }
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn set_prompt(&mut self, prompt: impl Into<String>) {
        self.prompt = prompt.into();
    }

    pub fn is_generating(&self) -> bool {
        self.is_generating
    }

    pub fn images(&self) -> &[GeneratedImage] {
        &self.images
    }

    pub fn settings(&self) -> &GenerationSettings {
        &self.settings
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    pub fn show_settings(&self) -> bool {
        self.show_settings
    }

    pub fn open_settings(&mut self) {
        self.show_settings = true;
    }

    pub fn close_settings(&mut self) {
        self.show_settings = false;
    }

    /// Shared handle to the cosmetic progress value, readable while a generation runs.
    pub fn progress_handle(&self) -> ProgressHandle {
        self.progress.clone()
    }

    pub async fn prompt_history(&self) -> Vec<PromptHistoryEntry> {
        self.history.get_prompt_history().await
    }

    pub async fn generate_image(&mut self) -> GenerateOutcome {
        let prompt = self.prompt.trim().to_string();
        if prompt.is_empty() || self.is_generating {
            return GenerateOutcome::Skipped;
        }

        self.history.save_prompt_to_history(&prompt).await;
        self.is_generating = true;
        self.error = None;
        let simulator = start_progress_simulator(self.progress.clone(), self.progress_interval);

        let request = ImageGenerationRequest {
            prompt: Some(prompt.clone()),
            width: Some(self.settings.default_width),
            height: Some(self.settings.default_height),
            model: Some(self.settings.model.clone()),
            system_prompt: Some(self.settings.system_prompt.clone()),
        };
        let result = self.backend.generate(&request).await;

        drop(simulator);
        self.progress.set(100.0);

        let outcome = match result {
            Ok(response) if response.success && response.image_url.is_some() => {
                let image = GeneratedImage {
                    id: generate_image_id(),
                    url: response.image_url.unwrap_or_default(),
                    prompt,
                    timestamp: Utc::now().timestamp_millis(),
                    dimensions: self.settings.dimensions(),
                    model: self.settings.model.clone(),
                    generation_time: response.generation_time,
                };
                self.history.save_image_to_history(&image).await;
                self.images.insert(0, image.clone());
                self.images.truncate(IMAGE_HISTORY_CAP);
                info!("Generated image {} ({})", image.id, image.url);
                GenerateOutcome::Generated(image)
            }
            Ok(response) => {
                let message = response
                    .error
                    .filter(|message| !message.trim().is_empty())
                    .unwrap_or_else(|| FALLBACK_FAILURE_MESSAGE.to_string());
                GenerateOutcome::Failed(message)
            }
            Err(err) => {
                let message = err.to_string();
                if message.trim().is_empty() {
                    GenerateOutcome::Failed(FALLBACK_TRANSPORT_MESSAGE.to_string())
                } else {
                    GenerateOutcome::Failed(message)
                }
            }
        };

        if let GenerateOutcome::Failed(message) = &outcome {
            warn!("Image generation failed: {message}");
            self.error = Some(message.clone());
        }

        self.is_generating = false;
        self.progress.set(0.0);
        outcome
    }

    /// Copies a history entry's prompt into the prompt field. Returns false
    /// for an unknown index.
    pub fn select_image(&mut self, index: usize) -> bool {
        match self.images.get(index) {
            Some(image) => {
                self.prompt = image.prompt.clone();
                true
            }
            None => false,
        }
    }

    pub async fn update_settings(&mut self, settings: GenerationSettings) {
        self.history.save_settings(&settings).await;
        self.settings = settings;
    }

    /// Edits the system prompt for upcoming generations without persisting it.
    pub fn set_system_prompt(&mut self, system_prompt: impl Into<String>) {
        self.settings.system_prompt = system_prompt.into();
    }

    /// Clears image history if `confirm` agrees. Prompt history and settings are kept.
    pub async fn clear_history<F>(&mut self, confirm: F) -> bool
    where
        F: FnOnce() -> bool,
    {
        if !confirm() {
            return false;
        }
        self.history.clear_image_history().await;
        self.images.clear();
        info!("Image history cleared");
        true
    }
}

#[cfg(test)]
mod tests {
    use anyhow::{anyhow, Result};
    use async_trait::async_trait;
    use parking_lot::Mutex;

    use super::*;
    use crate::store::{MemoryStore, IMAGE_HISTORY_KEY, PROMPT_HISTORY_KEY, SETTINGS_KEY};
    use crate::types::{Dimensions, ImageGenerationResponse, ResponseMetadata};

    enum Reply {
        Success(&'static str, f64),
        Failure(Option<&'static str>),
        SuccessWithoutUrl,
        Transport(&'static str),
    }

    struct ScriptedBackend {
        reply: Reply,
        seen: Mutex<Vec<ImageGenerationRequest>>,
    }

    impl ScriptedBackend {
        fn new(reply: Reply) -> Arc<Self> {
            Arc::new(ScriptedBackend {
                reply,
                seen: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl GenerationBackend for ScriptedBackend {
        async fn generate(&self, request: &ImageGenerationRequest) -> Result<ImageGenerationResponse> {
            self.seen.lock().push(request.clone());
            match self.reply {
                Reply::Success(url, seconds) => Ok(ImageGenerationResponse::success(
                    url.to_string(),
                    seconds,
                    ResponseMetadata {
                        model: request.model.clone().unwrap_or_default(),
                        prompt: request.prompt.clone().unwrap_or_default(),
                        dimensions: Dimensions { width: 1, height: 1 },
                    },
                )),
                Reply::Failure(message) => Ok(ImageGenerationResponse {
                    success: false,
                    image_url: None,
                    error: message.map(str::to_string),
                    generation_time: None,
                    metadata: None,
                }),
                Reply::SuccessWithoutUrl => Ok(ImageGenerationResponse {
                    success: true,
                    image_url: None,
                    error: None,
                    generation_time: Some(1.0),
                    metadata: None,
                }),
                Reply::Transport(message) => Err(anyhow!(message)),
            }
        }
    }

    async fn studio_with(backend: Arc<ScriptedBackend>) -> (Arc<MemoryStore>, Studio) {
        let store = Arc::new(MemoryStore::new());
        let history = HistoryStore::new(store.clone());
        let studio = Studio::load(history, backend, Duration::from_millis(50)).await;
        (store, studio)
    }

    #[tokio::test]
    async fn blank_prompt_is_a_no_op() {
        let backend = ScriptedBackend::new(Reply::Success("https://x/y.png", 2.0));
        let (store, mut studio) = studio_with(backend.clone()).await;
        studio.set_prompt("   ");

        assert_eq!(studio.generate_image().await, GenerateOutcome::Skipped);
        assert!(backend.seen.lock().is_empty());
        assert!(store.raw(PROMPT_HISTORY_KEY).is_none());
    }

    #[tokio::test]
    async fn success_records_the_image_everywhere() {
        let backend = ScriptedBackend::new(Reply::Success("https://x/y.png", 12.5));
        let (_, mut studio) = studio_with(backend.clone()).await;
        studio
            .update_settings(GenerationSettings {
                system_prompt: "Moody.".to_string(),
                default_width: 1536,
                default_height: 1024,
                model: "replicate/black-forest-labs/flux-schnell".to_string(),
            })
            .await;
        studio.set_prompt("  a quiet harbor  ");

        let GenerateOutcome::Generated(image) = studio.generate_image().await else {
            panic!("expected a generated image");
        };
        assert_eq!(image.url, "https://x/y.png");
        assert_eq!(image.prompt, "a quiet harbor");
        assert_eq!(image.dimensions, Dimensions { width: 1536, height: 1024 });
        assert_eq!(image.model, "replicate/black-forest-labs/flux-schnell");
        assert_eq!(image.generation_time, Some(12.5));

        assert_eq!(studio.images()[0], image);
        assert!(!studio.is_generating());
        assert_eq!(studio.progress_handle().get(), 0.0);
        assert!(studio.error().is_none());

        let sent = backend.seen.lock()[0].clone();
        assert_eq!(sent.prompt.as_deref(), Some("a quiet harbor"));
        assert_eq!(sent.width, Some(1536));
        assert_eq!(sent.system_prompt.as_deref(), Some("Moody."));

        let persisted = studio.history.get_image_history().await;
        assert_eq!(persisted, vec![image]);
        let prompts = studio.prompt_history().await;
        assert_eq!(prompts[0].prompt, "a quiet harbor");
    }

    #[tokio::test]
    async fn failure_sets_error_and_keeps_history() {
        let backend = ScriptedBackend::new(Reply::Failure(Some("No image URL received from AI service")));
        let (store, mut studio) = studio_with(backend).await;
        studio.set_prompt("a fox");

        assert_eq!(
            studio.generate_image().await,
            GenerateOutcome::Failed("No image URL received from AI service".to_string())
        );
        assert_eq!(studio.error(), Some("No image URL received from AI service"));
        assert!(studio.images().is_empty());
        assert!(store.raw(IMAGE_HISTORY_KEY).is_none());
        assert!(!studio.is_generating());
        assert_eq!(studio.progress_handle().get(), 0.0);

        studio.dismiss_error();
        assert!(studio.error().is_none());
    }

    #[tokio::test]
    async fn missing_url_or_message_uses_fallbacks() {
        let backend = ScriptedBackend::new(Reply::SuccessWithoutUrl);
        let (_, mut studio) = studio_with(backend).await;
        studio.set_prompt("a fox");
        assert_eq!(
            studio.generate_image().await,
            GenerateOutcome::Failed(FALLBACK_FAILURE_MESSAGE.to_string())
        );

        let backend = ScriptedBackend::new(Reply::Failure(None));
        let (_, mut studio) = studio_with(backend).await;
        studio.set_prompt("a fox");
        assert_eq!(
            studio.generate_image().await,
            GenerateOutcome::Failed(FALLBACK_FAILURE_MESSAGE.to_string())
        );
    }

    #[tokio::test]
    async fn transport_error_message_is_surfaced() {
        let backend = ScriptedBackend::new(Reply::Transport("connection refused"));
        let (_, mut studio) = studio_with(backend).await;
        studio.set_prompt("a fox");
        studio.generate_image().await;
        assert_eq!(studio.error(), Some("connection refused"));
    }

    #[tokio::test]
    async fn long_sessions_keep_the_image_cap() {
        let backend = ScriptedBackend::new(Reply::Success("https://x/y.png", 1.0));
        let (_, mut studio) = studio_with(backend).await;
        let mut newest = None;
        for index in 0..IMAGE_HISTORY_CAP + 5 {
            studio.set_prompt(format!("prompt {index}"));
            if let GenerateOutcome::Generated(image) = studio.generate_image().await {
                newest = Some(image);
            }
        }

        let newest = newest.unwrap();
        assert_eq!(studio.images().len(), IMAGE_HISTORY_CAP);
        assert_eq!(studio.images()[0], newest);
        assert_eq!(studio.images()[0].prompt, format!("prompt {}", IMAGE_HISTORY_CAP + 4));

        let persisted = studio.history.get_image_history().await;
        assert_eq!(persisted.len(), IMAGE_HISTORY_CAP);
        assert_eq!(persisted, studio.images());
    }

    #[tokio::test]
    async fn declined_clear_changes_nothing() {
        let backend = ScriptedBackend::new(Reply::Success("https://x/y.png", 1.0));
        let (store, mut studio) = studio_with(backend).await;
        studio.set_prompt("a fox");
        studio.generate_image().await;

        assert!(!studio.clear_history(|| false).await);
        assert_eq!(studio.images().len(), 1);
        assert!(store.raw(IMAGE_HISTORY_KEY).is_some());
    }

    #[tokio::test]
    async fn confirmed_clear_keeps_prompts_and_settings() {
        let backend = ScriptedBackend::new(Reply::Success("https://x/y.png", 1.0));
        let (store, mut studio) = studio_with(backend).await;
        studio.update_settings(GenerationSettings::default()).await;
        studio.set_prompt("a fox");
        studio.generate_image().await;

        assert!(studio.clear_history(|| true).await);
        assert!(studio.images().is_empty());
        assert!(store.raw(IMAGE_HISTORY_KEY).is_none());
        assert!(store.raw(PROMPT_HISTORY_KEY).is_some());
        assert!(store.raw(SETTINGS_KEY).is_some());
    }

    #[tokio::test]
    async fn selecting_an_image_restores_its_prompt() {
        let backend = ScriptedBackend::new(Reply::Success("https://x/y.png", 1.0));
        let (_, mut studio) = studio_with(backend.clone()).await;
        studio.set_prompt("first prompt");
        studio.generate_image().await;
        studio.set_prompt("something else");

        assert!(studio.select_image(0));
        assert_eq!(studio.prompt(), "first prompt");
        assert!(!studio.select_image(5));
        assert_eq!(backend.seen.lock().len(), 1);
    }

    #[tokio::test]
    async fn reload_picks_up_persisted_state() {
        let backend = ScriptedBackend::new(Reply::Success("https://x/y.png", 1.0));
        let (store, mut studio) = studio_with(backend.clone()).await;
        let settings = GenerationSettings {
            default_width: 512,
            default_height: 512,
            ..GenerationSettings::default()
        };
        studio.update_settings(settings.clone()).await;
        studio.set_prompt("a fox");
        studio.generate_image().await;

        let reloaded = Studio::load(
            HistoryStore::new(store),
            backend,
            Duration::from_millis(50),
        )
        .await;
        assert_eq!(reloaded.settings(), &settings);
        assert_eq!(reloaded.images().len(), 1);
        assert!(reloaded.prompt().is_empty());
    }

    #[tokio::test]
    async fn system_prompt_edits_are_not_persisted() {
        let backend = ScriptedBackend::new(Reply::Success("https://x/y.png", 1.0));
        let (store, mut studio) = studio_with(backend).await;
        studio.set_system_prompt("Line art only.");
        assert_eq!(studio.settings().system_prompt, "Line art only.");
        assert!(store.raw(SETTINGS_KEY).is_none());
    }
}
