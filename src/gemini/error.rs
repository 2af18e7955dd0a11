use thiserror::Error;

#[derive(Debug, Error)]
pub enum GeminiError {
    #[error("Missing required Gemini parameter: {0}")]
    MissingParameter(&'static str),

    #[error("Invalid Gemini base URL: {0}")]
    InvalidBaseUrl(String),

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error("Gemini API returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error("Malformed Gemini event stream: {0}")]
    Stream(String),

    #[error("No response from Gemini")]
    EmptyResponse,
}
