// Gemini generative language client
pub mod client;
pub mod config;
pub mod error;

pub use client::{ChatMessage, ChatRole, GeminiChatModel, GeminiModelBuilder, GeminiStreamingChatModel, ReplyStream};
pub use config::{
    GeminiModelConfig, GeminiModelConfigBuilder, HarmBlockThreshold, HarmCategory, ResponseFormat, SafetySetting,
};
pub use error::GeminiError;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
