//! Caption instructions and prompt assembly.
//!
//! The composition order of caller prompt and derived caption is
//! kind-specific and must be preserved exactly: img2img appends the caption
//! after the caller's prompt, img2animation puts the caption first, and
//! img2sound conditions on the caption alone. Style-transfer composition
//! lives with the profiles in [`crate::style`].

/// Caption instruction used when no kind-specific instruction applies.
pub const DEFAULT_CAPTION_INSTRUCTION: &str = "Describe this image in detail.";

/// Caption instruction for style-transfer kinds.
pub const STYLE_CAPTION_INSTRUCTION: &str = "Describe this image in detail for an artistic \
    transformation to Studio Ghibli style. Focus on key visual elements such as facial \
    expressions, character emotions, color palette, lighting, and background details. Emphasize \
    textures, scenery, and atmosphere. Avoid photorealistic or overly technical descriptions.";

/// Caption instruction for the image-to-sound kind.
pub const SOUND_CAPTION_INSTRUCTION: &str = "Describe this image as an audio clip. Focus on key \
    visual elements such as facial expressions, character emotions, color palette, lighting, and \
    background details. Emphasize textures, scenery, and atmosphere. Avoid photorealistic or \
    overly technical descriptions. Use artistic language to describe the image in a way that \
    would translate well to sound. Consider the mood, tone, and style of the image.";

/// Default negative prompt for img2img.
pub const IMG2IMG_NEGATIVE_PROMPT: &str = "unrealistic, blurry";

/// Default negative prompt for the animation kinds.
pub const ANIMATION_NEGATIVE_PROMPT: &str = "bad quality, worse quality";

/// Join non-empty parts with single spaces.
fn join(parts: &[&str]) -> String {
    parts
        .iter()
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Caller prompt first, derived caption appended (img2img order).
pub fn prompt_then_caption(prompt: &str, caption: &str) -> String {
    join(&[prompt, caption])
}

/// Derived caption first, caller prompt appended (img2animation order).
pub fn caption_then_prompt(prompt: &str, caption: &str) -> String {
    join(&[caption, prompt])
}

/// Template, caption, caller prompt (style-transfer order).
pub fn template_caption_prompt(template: &str, caption: &str, prompt: &str) -> String {
    join(&[template, caption, prompt])
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
