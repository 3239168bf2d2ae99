use crate::types::{GenerationSettings, DIMENSION_PRESETS, MODEL_OPTIONS};

/// Working copy of the settings while the dialog is open. Nothing reaches the
/// studio until the caller takes [`SettingsForm::into_settings`] on save.
#[derive(Debug, Clone, PartialEq)]
pub struct SettingsForm {
    draft: GenerationSettings,
}

impl SettingsForm {
    pub fn open(current: &GenerationSettings) -> Self {
        SettingsForm {
            draft: current.clone(),
        }
    }

    pub fn draft(&self) -> &GenerationSettings {
        &self.draft
    }

    /// Picks a model by its zero-based position in [`MODEL_OPTIONS`].
    pub fn select_model(&mut self, index: usize) -> bool {
        match MODEL_OPTIONS.get(index) {
            Some(option) => {
                self.draft.model = option.value.to_string();
                true
            }
            None => false,
        }
    }

    /// Picks a size by its zero-based position in [`DIMENSION_PRESETS`].
    pub fn select_dimensions(&mut self, index: usize) -> bool {
        match DIMENSION_PRESETS.get(index) {
            Some(preset) => {
                self.draft.default_width = preset.width;
                self.draft.default_height = preset.height;
                true
            }
            None => false,
        }
    }

    pub fn set_system_prompt(&mut self, system_prompt: impl Into<String>) {
        self.draft.system_prompt = system_prompt.into();
    }

    pub fn reset(&mut self) {
        self.draft = GenerationSettings::default();
    }

    pub fn into_settings(self) -> GenerationSettings {
        self.draft
    }

    pub fn render(&self) -> String {
        let mut out = String::from("Generation settings\n\nModel (/model N):\n");
        for (index, option) in MODEL_OPTIONS.iter().enumerate() {
            let marker = if option.value == self.draft.model { "*" } else { " " };
            out.push_str(&format!("  {marker} {}. {}\n", index + 1, option.label));
        }
        if !MODEL_OPTIONS.iter().any(|option| option.value == self.draft.model) {
            out.push_str(&format!("    custom: {}\n", self.draft.model));
        }

        out.push_str("\nDefault dimensions (/size N):\n");
        for (index, preset) in DIMENSION_PRESETS.iter().enumerate() {
            let selected = preset.width == self.draft.default_width
                && preset.height == self.draft.default_height;
            let marker = if selected { "*" } else { " " };
            out.push_str(&format!("  {marker} {}. {}\n", index + 1, preset.label));
        }

        out.push_str("\nSystem prompt (/system TEXT):\n");
        out.push_str(&format!("  {}\n", self.draft.system_prompt));
        out.push_str("\n/reset restores defaults, /save applies, /cancel discards\n");
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edits_stay_local_until_taken() {
        let current = GenerationSettings::default();
        let mut form = SettingsForm::open(&current);
        assert!(form.select_model(1));
        assert!(form.select_dimensions(5));
        form.set_system_prompt("Watercolor.");

        assert_eq!(current, GenerationSettings::default());
        let saved = form.into_settings();
        assert_eq!(saved.model, "replicate/black-forest-labs/flux-schnell");
        assert_eq!((saved.default_width, saved.default_height), (1792, 1024));
        assert_eq!(saved.system_prompt, "Watercolor.");
    }

    #[test]
    fn out_of_range_choices_are_rejected() {
        let mut form = SettingsForm::open(&GenerationSettings::default());
        assert!(!form.select_model(MODEL_OPTIONS.len()));
        assert!(!form.select_dimensions(DIMENSION_PRESETS.len()));
        assert_eq!(form.draft(), &GenerationSettings::default());
    }

    #[test]
    fn reset_restores_defaults() {
        let mut form = SettingsForm::open(&GenerationSettings {
            system_prompt: String::new(),
            default_width: 512,
            default_height: 512,
            model: "custom/model".to_string(),
        });
        assert!(form.render().contains("custom: custom/model"));
        form.reset();
        assert_eq!(form.draft(), &GenerationSettings::default());
        let view = form.render();
        assert!(view.contains("* 1. FLUX 1.1 Pro (Recommended)"));
        assert!(view.contains("* 3. 1024 × 1024 (Square)"));
    }
}
