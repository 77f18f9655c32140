use crate::model::LlmError;

/// Decoding parameters passed along with every prompt.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RequestOptions {
    pub temperature: f32,
    pub max_tokens: u32,
}

/// A text-in, text-out model. Implementations make exactly one attempt per call.
#[async_trait::async_trait]
pub trait LanguageModel: Send + Sync {
    async fn request(&self, prompt: &str, options: &RequestOptions) -> Result<String, LlmError>;
}
