use serde::{Deserialize, Serialize};

use crate::config::DEFAULT_MODEL;

pub const DEFAULT_SYSTEM_PROMPT: &str = "Create a high-quality, detailed image based on the user's prompt. Focus on artistic composition, proper lighting, and visual appeal.";
pub const DEFAULT_DIMENSION: u32 = 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedImage {
    pub id: String,
    pub url: String,
    pub prompt: String,
    pub timestamp: i64,
    pub dimensions: Dimensions,
    pub model: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generation_time: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptHistoryEntry {
    pub id: String,
    pub prompt: String,
    pub timestamp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// User defaults applied to every new generation request.
///
/// Deserialization backfills any missing field from [`GenerationSettings::default`],
/// so settings persisted by an older build still resolve to a complete value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GenerationSettings {
    pub system_prompt: String,
    pub default_width: u32,
    pub default_height: u32,
    pub model: String,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        GenerationSettings {
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            default_width: DEFAULT_DIMENSION,
            default_height: DEFAULT_DIMENSION,
            model: DEFAULT_MODEL.to_string(),
        }
    }
}

impl GenerationSettings {
    pub fn dimensions(&self) -> Dimensions {
        Dimensions {
            width: self.default_width,
            height: self.default_height,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ModelOption {
    pub label: &'static str,
    pub value: &'static str,
}

pub const MODEL_OPTIONS: &[ModelOption] = &[
    ModelOption {
        label: "FLUX 1.1 Pro (Recommended)",
        value: "replicate/black-forest-labs/flux-1.1-pro",
    },
    ModelOption {
        label: "FLUX Schnell (Fast)",
        value: "replicate/black-forest-labs/flux-schnell",
    },
    ModelOption {
        label: "FLUX Kontext Max (Context)",
        value: "replicate/black-forest-labs/flux-kontext-max",
    },
];

#[derive(Debug, Clone, Copy)]
pub struct DimensionPreset {
    pub label: &'static str,
    pub width: u32,
    pub height: u32,
}

pub const DIMENSION_PRESETS: &[DimensionPreset] = &[
    DimensionPreset { label: "512 × 512 (Square)", width: 512, height: 512 },
    DimensionPreset { label: "768 × 768 (Square)", width: 768, height: 768 },
    DimensionPreset { label: "1024 × 1024 (Square)", width: 1024, height: 1024 },
    DimensionPreset { label: "1536 × 1024 (Landscape)", width: 1536, height: 1024 },
    DimensionPreset { label: "1024 × 1536 (Portrait)", width: 1024, height: 1536 },
    DimensionPreset { label: "1792 × 1024 (Wide)", width: 1792, height: 1024 },
    DimensionPreset { label: "1024 × 1792 (Tall)", width: 1024, height: 1792 },
];

pub const EXAMPLE_PROMPTS: &[&str] = &[
    "A serene mountain landscape at sunset with golden light",
    "Futuristic cyberpunk city with neon lights and flying cars",
    "Portrait of a wise old wizard with magical sparkles",
    "Underwater scene with colorful coral reef and tropical fish",
    "Steampunk mechanical dragon with brass gears and steam",
];

/// Body accepted by `POST /generate-image`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageGenerationRequest {
    #[serde(default)]
    pub prompt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseMetadata {
    pub model: String,
    pub prompt: String,
    pub dimensions: Dimensions,
}

/// Body returned by `POST /generate-image`, for both outcomes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageGenerationResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generation_time: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ResponseMetadata>,
}

impl ImageGenerationResponse {
    pub fn success(image_url: String, generation_time: f64, metadata: ResponseMetadata) -> Self {
        ImageGenerationResponse {
            success: true,
            image_url: Some(image_url),
            error: None,
            generation_time: Some(generation_time),
            metadata: Some(metadata),
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        ImageGenerationResponse {
            success: false,
            image_url: None,
            error: Some(error.into()),
            generation_time: None,
            metadata: None,
        }
    }
}
