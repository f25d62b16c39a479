//! The caption bridge: derive text conditioning from an uploaded image.
//!
//! Wraps the vision-language capability behind a small adapter that owns
//! the instruction template, the fixed output-token budget, and the
//! control-token cleanup. Sampling parameters are fixed, not
//! request-tunable, so identical inputs caption identically.

use std::path::Path;
use std::sync::Arc;

use cre8_core::error::CoreError;

use crate::registry::ModelRegistry;

/// Fixed output-token budget for caption generation.
pub const MAX_CAPTION_TOKENS: u32 = 1000;

const USER_TOKEN: &str = "<|user|>";
const ASSISTANT_TOKEN: &str = "<|assistant|>";
const END_TOKEN: &str = "<|end|>";
const IMAGE_TOKEN: &str = "<|image_1|>";

/// Compose the structured instruction the capability expects.
fn compose_instruction(instruction: &str) -> String {
    format!("{USER_TOKEN}{IMAGE_TOKEN}{instruction}{END_TOKEN}{ASSISTANT_TOKEN}")
}

/// Remove structural/control tokens from decoded caption text.
pub fn strip_control_tokens(raw: &str) -> String {
    let mut text = raw.to_string();
    for token in [USER_TOKEN, ASSISTANT_TOKEN, END_TOKEN, IMAGE_TOKEN] {
        text = text.replace(token, "");
    }
    text.trim().to_string()
}

/// Adapter over the captioning capability.
#[derive(Clone)]
pub struct CaptionBridge {
    registry: Arc<ModelRegistry>,
}

impl CaptionBridge {
    pub fn new(registry: Arc<ModelRegistry>) -> Self {
        Self { registry }
    }

    /// Caption the staged image at `image_path` following `instruction`.
    ///
    /// Returns [`CoreError::NotReady`] if the capability is not yet
    /// resident. Empty decoded text returns `Ok("")`; the caller decides
    /// whether an empty caption is acceptable context.
    pub async fn describe(
        &self,
        image_path: &Path,
        instruction: &str,
    ) -> Result<String, CoreError> {
        let handle = self.registry.captioner()?;
        let captioner = handle.lock().await;
        let raw = captioner
            .describe(image_path, &compose_instruction(instruction), MAX_CAPTION_TOKENS)
            .await?;
        let caption = strip_control_tokens(&raw);
        tracing::debug!(caption_len = caption.len(), "Caption derived");
        Ok(caption)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::{Captioner, Generator, ModelKind};
    use async_trait::async_trait;
    use std::collections::HashMap;

    #[test]
    fn instruction_template_wraps_user_text() {
        let composed = compose_instruction("Describe this image in detail.");
        assert_eq!(
            composed,
            "<|user|><|image_1|>Describe this image in detail.<|end|><|assistant|>"
        );
    }

    #[test]
    fn control_tokens_are_stripped() {
        let raw = "<|assistant|>A quiet hillside at dusk.<|end|>";
        assert_eq!(strip_control_tokens(raw), "A quiet hillside at dusk.");
    }

    #[test]
    fn stripping_plain_text_is_identity_modulo_trim() {
        assert_eq!(strip_control_tokens("  a cat  "), "a cat");
    }

    #[test]
    fn empty_decode_strips_to_empty_string() {
        assert_eq!(strip_control_tokens("<|assistant|><|end|>"), "");
    }

    struct FixedCaptioner(&'static str);

    #[async_trait]
    impl Captioner for FixedCaptioner {
        async fn describe(
            &self,
            _image: &Path,
            instruction: &str,
            max_new_tokens: u32,
        ) -> Result<String, CoreError> {
            assert!(instruction.starts_with(USER_TOKEN));
            assert_eq!(max_new_tokens, MAX_CAPTION_TOKENS);
            Ok(self.0.to_string())
        }
    }

    fn bridge_with(captioner: Box<dyn Captioner>) -> CaptionBridge {
        let registry = Arc::new(ModelRegistry::new());
        let generators: HashMap<ModelKind, Box<dyn Generator>> = HashMap::new();
        registry.initialize_with(generators, captioner).unwrap();
        CaptionBridge::new(registry)
    }

    #[tokio::test]
    async fn describe_strips_tokens_from_capability_output() {
        let bridge = bridge_with(Box::new(FixedCaptioner("<|assistant|>a dog<|end|>")));
        let caption = bridge
            .describe(Path::new("/tmp/in.png"), "Describe this image in detail.")
            .await
            .unwrap();
        assert_eq!(caption, "a dog");
    }

    #[tokio::test]
    async fn empty_capability_output_is_ok_empty() {
        let bridge = bridge_with(Box::new(FixedCaptioner("")));
        let caption = bridge
            .describe(Path::new("/tmp/in.png"), "whatever")
            .await
            .unwrap();
        assert_eq!(caption, "");
    }

    #[tokio::test]
    async fn unready_registry_surfaces_not_ready() {
        let bridge = CaptionBridge::new(Arc::new(ModelRegistry::new()));
        let err = bridge
            .describe(Path::new("/tmp/in.png"), "whatever")
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::NotReady { .. }));
    }
}
