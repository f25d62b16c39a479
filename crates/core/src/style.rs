//! Style profiles for the image-to-image transfer endpoints.
//!
//! One parametrized implementation serves every style route. A profile
//! bundles the checkpoint, optional LoRA/VAE overrides, the prompt
//! templates, the caption instruction (if the style captions the upload at
//! all), and the composition layout that decides where caption and caller
//! prompt land.

use crate::prompt::{template_caption_prompt, STYLE_CAPTION_INSTRUCTION};

/// Base checkpoint used by img2img.
pub const SD15_CHECKPOINT: &str = "v1-5-pruned-emaonly.safetensors";

/// Base checkpoint used by most style profiles.
pub const SD14_CHECKPOINT: &str = "sd-v1-4.ckpt";

/// Ghibli fine-tune checkpoint used by the remix profile.
pub const GHIBLI_CHECKPOINT: &str = "ghibli-diffusion-v1.ckpt";

/// VAE override used by the pixar profile.
pub const PIXAR_VAE: &str = "Cartoon_illustration_flux_lora_v1.safetensors";

const GHIBLI_POSITIVE: &str = "Studio Ghibli animation style, Hayao Miyazaki artistic \
    interpretation, hand-drawn animation quality, delicate anime features, expressive eyes, soft \
    facial expressions, Ghibli character design, painterly textures, watercolor effect, vibrant \
    and pastel tones, lush landscapes, whimsical backgrounds, magical lighting, fantastical \
    scenery with Ghibli aesthetics, cel-shading.";

const GHIBLI_NEGATIVE: &str = "Photorealism, 3D rendering, hyper-realistic textures, distorted \
    proportions, deformed features, asymmetry, unnatural anatomy, misaligned eyes, facial \
    distortion, noisy output, low quality, pixelation, poor shading, visual artifacts.";

const PIXAR_POSITIVE: &str = "PIXAR style, Disney style, vibrant colors, whimsical, 3D-rendered, \
    cartoonish, soft lighting, exaggerated features, cinematic, expressive, character design, \
    highly detailed, polished, photorealistic textures, family-friendly, storytelling vibe";

const PIXAR_NEGATIVE: &str = "Dark, gritty, hyper-realistic, black and white, monochrome, \
    low-resolution, horror, grotesque, distorted, dull, aged, pixelated, poorly rendered, \
    blurry, flat lighting";

/// How a profile assembles its positive/negative prompt pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptLayout {
    /// positive = template + caption + prompt; negative = negative template.
    TemplateCaptionPrompt,
    /// positive = template + prompt (no caption); negative = negative template.
    TemplatePrompt,
    /// Templates swapped: positive = negative template + caption + prompt;
    /// negative = positive template.
    SwappedCaptionPrompt,
    /// Fully inverted: positive = negative template alone; negative =
    /// positive template + caption + prompt.
    Inverted,
}

/// Assembled prompt pair handed to the external renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposedPrompts {
    pub positive: String,
    pub negative: String,
}

/// Fixed configuration for one style-transfer route.
#[derive(Debug, Clone)]
pub struct StyleProfile {
    /// Route path, e.g. `/img2ghibli/`.
    pub route: &'static str,
    /// Checkpoint filename under the model directory.
    pub checkpoint: &'static str,
    /// Whether the renderer gets the configured LoRA model directory.
    pub uses_lora_dir: bool,
    /// Optional VAE filename under the model directory.
    pub vae: Option<&'static str>,
    /// Positive prompt template.
    pub positive_template: &'static str,
    /// Negative prompt template.
    pub negative_template: &'static str,
    /// Caption instruction; `None` means the upload is not captioned.
    pub caption_instruction: Option<&'static str>,
    /// Prompt assembly layout.
    pub layout: PromptLayout,
    /// Default denoising strength for this style.
    pub default_strength: f32,
}

impl StyleProfile {
    /// Assemble the positive/negative prompt pair from the caller's prompt
    /// and the derived caption, per this profile's layout.
    pub fn compose(&self, prompt: &str, caption: &str) -> ComposedPrompts {
        match self.layout {
            PromptLayout::TemplateCaptionPrompt => ComposedPrompts {
                positive: template_caption_prompt(self.positive_template, caption, prompt),
                negative: self.negative_template.to_string(),
            },
            PromptLayout::TemplatePrompt => ComposedPrompts {
                positive: template_caption_prompt(self.positive_template, "", prompt),
                negative: self.negative_template.to_string(),
            },
            PromptLayout::SwappedCaptionPrompt => ComposedPrompts {
                positive: template_caption_prompt(self.negative_template, caption, prompt),
                negative: self.positive_template.to_string(),
            },
            PromptLayout::Inverted => ComposedPrompts {
                positive: self.negative_template.to_string(),
                negative: template_caption_prompt(self.positive_template, caption, prompt),
            },
        }
    }
}

/// All built-in style profiles, in route-registration order.
pub fn builtin_profiles() -> &'static [StyleProfile] {
    static PROFILES: &[StyleProfile] = &[
        StyleProfile {
            route: "/img2ghibli/",
            checkpoint: SD14_CHECKPOINT,
            uses_lora_dir: true,
            vae: None,
            positive_template: GHIBLI_POSITIVE,
            negative_template: GHIBLI_NEGATIVE,
            caption_instruction: Some(STYLE_CAPTION_INSTRUCTION),
            layout: PromptLayout::TemplateCaptionPrompt,
            default_strength: 0.53,
        },
        StyleProfile {
            route: "/img2pixar/",
            checkpoint: SD14_CHECKPOINT,
            uses_lora_dir: false,
            vae: Some(PIXAR_VAE),
            positive_template: PIXAR_POSITIVE,
            negative_template: PIXAR_NEGATIVE,
            caption_instruction: None,
            layout: PromptLayout::TemplatePrompt,
            default_strength: 0.53,
        },
        StyleProfile {
            route: "/anti-ghibli/",
            checkpoint: SD14_CHECKPOINT,
            uses_lora_dir: true,
            vae: None,
            positive_template: GHIBLI_POSITIVE,
            negative_template: GHIBLI_NEGATIVE,
            caption_instruction: Some(STYLE_CAPTION_INSTRUCTION),
            layout: PromptLayout::SwappedCaptionPrompt,
            default_strength: 0.53,
        },
        StyleProfile {
            route: "/img2remix/",
            checkpoint: GHIBLI_CHECKPOINT,
            uses_lora_dir: false,
            vae: None,
            positive_template: GHIBLI_POSITIVE,
            negative_template: GHIBLI_NEGATIVE,
            caption_instruction: Some(STYLE_CAPTION_INSTRUCTION),
            layout: PromptLayout::Inverted,
            default_strength: 0.2,
        },
    ];
    PROFILES
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
