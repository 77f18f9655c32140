// Language-model capability: trait seam plus the chat-completions client.

pub mod client;
pub mod traits;

pub use client::ChatCompletionsClient;
pub use traits::{LanguageModel, RequestOptions};
