use crate::{error::ModelError, llm::gemini::GeminiClient};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod gemini;

/// Sampling options for a single generation request.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationOptions {
    pub system_instruction: Option<String>,
    pub max_output_tokens: u32,
    pub temperature: f32,
}

impl GenerationOptions {
    pub fn new(max_output_tokens: u32, temperature: f32) -> Self {
        Self {
            system_instruction: None,
            max_output_tokens,
            temperature,
        }
    }

    pub fn with_system_instruction(mut self, instruction: impl Into<String>) -> Self {
        let instruction = instruction.into();
        self.system_instruction = (!instruction.is_empty()).then_some(instruction);
        self
    }
}

#[async_trait]
pub trait LanguageModel: Send + Sync + Debug {
    async fn generate(
        &self,
        prompt: &str,
        options: &GenerationOptions,
    ) -> Result<String, ModelError>;
}

/// Construct the Gemini client from the shared settings.
pub fn model_from_config(
    api_key: &str,
    config: &crate::Config,
) -> anyhow::Result<Box<dyn LanguageModel>> {
    let client = GeminiClient::new(
        api_key.to_owned(),
        config.gemini_model.clone(),
        config.gemini_base_url.clone(),
    )?;
    Ok(Box::new(client))
}
