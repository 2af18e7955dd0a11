use std::pin::{pin, Pin};

use eventsource_stream::{EventStreamError, Eventsource};
use futures::{Stream, StreamExt};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::gemini::config::{GeminiModelConfig, GeminiModelConfigBuilder, SafetySetting};
use crate::gemini::error::GeminiError;
use crate::gemini::DEFAULT_BASE_URL;

pub type ReplyStream = Pin<Box<dyn Stream<Item = Result<String, GeminiError>> + Send>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatRole {
    System,
    User,
    Model,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub text: String,
}

impl ChatMessage {
    pub fn system(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            text: text.into(),
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            text: text.into(),
        }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Model,
            text: text.into(),
        }
    }
}

// Wire format

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content<'a>>,
    generation_config: GenerationConfig,
    safety_settings: &'a [SafetySetting],
}

#[derive(Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'static str>,
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f64,
    top_p: f64,
    top_k: u32,
    max_output_tokens: u32,
    response_mime_type: &'static str,
}

#[derive(Deserialize, Default)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

impl GenerateContentResponse {
    /// Text of the first candidate, if any
    fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content.parts.iter().filter_map(|p| p.text.as_deref()).collect();
        Some(text)
    }
}

/// Fully resolved connection and generation settings.
#[derive(Clone)]
struct Endpoint {
    http: reqwest::Client,
    api_key: String,
    model_name: String,
    base_url: String,
    config: GeminiModelConfig,
}

impl Endpoint {
    fn request(&self, method: &str, query: Option<&str>, messages: &[ChatMessage]) -> reqwest::RequestBuilder {
        let mut url = format!("{}/v1beta/models/{}:{}", self.base_url, self.model_name, method);
        if let Some(query) = query {
            url.push('?');
            url.push_str(query);
        }
        debug!("Gemini request: POST {}", url);

        self.http
            .post(url)
            .header("x-goog-api-key", &self.api_key)
            .json(&self.body(messages))
    }

    fn body<'a>(&'a self, messages: &'a [ChatMessage]) -> GenerateContentRequest<'a> {
        let system: Vec<Part<'a>> = messages
            .iter()
            .filter(|m| m.role == ChatRole::System)
            .map(|m| Part { text: &m.text })
            .collect();

        let contents = messages
            .iter()
            .filter_map(|m| {
                let role = match m.role {
                    ChatRole::User => "user",
                    ChatRole::Model => "model",
                    ChatRole::System => return None,
                };
                Some(Content {
                    role: Some(role),
                    parts: vec![Part { text: &m.text }],
                })
            })
            .collect();

        GenerateContentRequest {
            contents,
            system_instruction: (!system.is_empty()).then_some(Content { role: None, parts: system }),
            generation_config: GenerationConfig {
                temperature: self.config.temperature(),
                top_p: self.config.top_p(),
                top_k: self.config.top_k(),
                max_output_tokens: self.config.max_output_tokens(),
                response_mime_type: self.config.response_format().mime_type(),
            },
            safety_settings: self.config.safety_settings(),
        }
    }
}

async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, GeminiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorEnvelope>(&body)
        .map(|e| e.error.message)
        .unwrap_or(body);

    Err(GeminiError::Api {
        status: status.as_u16(),
        message,
    })
}

/// Builds Gemini chat clients from an api key, a model name and generation settings.
///
/// Settings come either from a complete [`GeminiModelConfig`] or from a closure that
/// adjusts the default builder; both can be combined, `customize` applying on top.
pub struct GeminiModelBuilder {
    api_key: String,
    model_name: String,
    base_url: String,
    config: GeminiModelConfigBuilder,
}

impl GeminiModelBuilder {
    pub fn new(api_key: impl Into<String>, model_name: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model_name: model_name.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            config: GeminiModelConfigBuilder::default(),
        }
    }

    pub fn config(mut self, config: &GeminiModelConfig) -> Self {
        self.config = config.to_builder();
        self
    }

    pub fn customize(mut self, customizer: impl FnOnce(&mut GeminiModelConfigBuilder)) -> Self {
        customizer(&mut self.config);
        self
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn build_chat(&self) -> Result<GeminiChatModel, GeminiError> {
        Ok(GeminiChatModel {
            endpoint: self.resolve()?,
        })
    }

    pub fn build_streaming(&self) -> Result<GeminiStreamingChatModel, GeminiError> {
        Ok(GeminiStreamingChatModel {
            endpoint: self.resolve()?,
        })
    }

    fn resolve(&self) -> Result<Endpoint, GeminiError> {
        if self.api_key.trim().is_empty() {
            return Err(GeminiError::MissingParameter("apiKey"));
        }
        if self.model_name.trim().is_empty() {
            return Err(GeminiError::MissingParameter("modelName"));
        }

        let parsed = url::Url::parse(&self.base_url).map_err(|e| GeminiError::InvalidBaseUrl(format!("{}: {}", self.base_url, e)))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(GeminiError::InvalidBaseUrl(self.base_url.clone()));
        }

        let config = self.config.build();
        let http = reqwest::Client::builder().timeout(config.timeout()).build()?;

        Ok(Endpoint {
            http,
            api_key: self.api_key.clone(),
            model_name: self.model_name.trim().to_string(),
            base_url: self.base_url.trim_end_matches('/').to_string(),
            config,
        })
    }
}

/// Request/response Gemini client.
pub struct GeminiChatModel {
    endpoint: Endpoint,
}

impl GeminiChatModel {
    pub fn model_name(&self) -> &str {
        &self.endpoint.model_name
    }

    pub fn config(&self) -> &GeminiModelConfig {
        &self.endpoint.config
    }

    pub async fn chat(&self, messages: &[ChatMessage]) -> Result<String, GeminiError> {
        let response = self.endpoint.request("generateContent", None, messages).send().await?;
        let response = ensure_success(response).await?;
        let parsed: GenerateContentResponse = serde_json::from_slice(&response.bytes().await?)?;

        parsed.text().ok_or(GeminiError::EmptyResponse)
    }
}

/// Gemini client yielding the reply as server-sent text chunks.
pub struct GeminiStreamingChatModel {
    endpoint: Endpoint,
}

impl GeminiStreamingChatModel {
    pub fn model_name(&self) -> &str {
        &self.endpoint.model_name
    }

    pub fn config(&self) -> &GeminiModelConfig {
        &self.endpoint.config
    }

    pub fn chat_stream(&self, messages: &[ChatMessage]) -> ReplyStream {
        let request = self
            .endpoint
            .request("streamGenerateContent", Some("alt=sse"), messages);

        let stream = async_stream::stream! {
            let response = match request.send().await {
                Ok(response) => response,
                Err(e) => {
                    yield Err(GeminiError::from(e));
                    return;
                }
            };
            let response = match ensure_success(response).await {
                Ok(response) => response,
                Err(e) => {
                    yield Err(e);
                    return;
                }
            };

            let mut events = pin!(response.bytes_stream().eventsource());

            while let Some(event) = events.next().await {
                let event = match event {
                    Ok(event) => event,
                    Err(EventStreamError::Transport(e)) => {
                        yield Err(GeminiError::from(e));
                        return;
                    }
                    Err(e) => {
                        yield Err(GeminiError::Stream(e.to_string()));
                        return;
                    }
                };

                match parse_chunk(&event.data) {
                    Ok(Some(text)) => yield Ok(text),
                    Ok(None) => {}
                    Err(e) => {
                        yield Err(e);
                        return;
                    }
                }
            }
        };

        Box::pin(stream)
    }
}

/// Text carried by one `data` payload; `None` for keep-alives and empty parts.
fn parse_chunk(data: &str) -> Result<Option<String>, GeminiError> {
    if data.trim().is_empty() {
        return Ok(None);
    }

    let parsed: GenerateContentResponse = serde_json::from_str(data)?;
    Ok(parsed.text().filter(|text| !text.is_empty()))
}
