use std::time::Duration;

use serde::Serialize;

pub const DEFAULT_TEMPERATURE: f64 = 0.7;
pub const DEFAULT_TOP_P: f64 = 0.95;
pub const DEFAULT_TOP_K: u32 = 40;
pub const DEFAULT_MAX_OUTPUT_TOKENS: u32 = 8192;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResponseFormat {
    #[default]
    Text,
    Json,
}

impl ResponseFormat {
    pub fn mime_type(&self) -> &'static str {
        match self {
            ResponseFormat::Text => "text/plain",
            ResponseFormat::Json => "application/json",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum HarmCategory {
    #[serde(rename = "HARM_CATEGORY_HARASSMENT")]
    Harassment,
    #[serde(rename = "HARM_CATEGORY_HATE_SPEECH")]
    HateSpeech,
    #[serde(rename = "HARM_CATEGORY_SEXUALLY_EXPLICIT")]
    SexuallyExplicit,
    #[serde(rename = "HARM_CATEGORY_DANGEROUS_CONTENT")]
    DangerousContent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HarmBlockThreshold {
    BlockNone,
    BlockOnlyHigh,
    BlockMediumAndAbove,
    BlockLowAndAbove,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SafetySetting {
    pub category: HarmCategory,
    pub threshold: HarmBlockThreshold,
}

impl SafetySetting {
    pub fn new(category: HarmCategory, threshold: HarmBlockThreshold) -> Self {
        Self { category, threshold }
    }
}

/// Every harm category blocked at medium probability and above
pub fn default_safety_settings() -> Vec<SafetySetting> {
    [
        HarmCategory::Harassment,
        HarmCategory::HateSpeech,
        HarmCategory::SexuallyExplicit,
        HarmCategory::DangerousContent,
    ]
    .into_iter()
    .map(|category| SafetySetting::new(category, HarmBlockThreshold::BlockMediumAndAbove))
    .collect()
}

/// Resolved generation parameters shared by the chat and streaming clients.
///
/// Instances are immutable; derive a modified copy with [`GeminiModelConfig::to_builder`].
#[derive(Debug, Clone, PartialEq)]
pub struct GeminiModelConfig {
    temperature: f64,
    top_p: f64,
    top_k: u32,
    max_output_tokens: u32,
    timeout: Duration,
    response_format: ResponseFormat,
    safety_settings: Vec<SafetySetting>,
}

impl GeminiModelConfig {
    pub fn builder() -> GeminiModelConfigBuilder {
        GeminiModelConfigBuilder::default()
    }

    /// Builder pre-populated with every value of this config
    pub fn to_builder(&self) -> GeminiModelConfigBuilder {
        GeminiModelConfigBuilder {
            temperature: Some(self.temperature),
            top_p: Some(self.top_p),
            top_k: Some(self.top_k),
            max_output_tokens: Some(self.max_output_tokens),
            timeout: Some(self.timeout),
            response_format: Some(self.response_format),
            safety_settings: Some(self.safety_settings.clone()),
        }
    }

    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    pub fn top_p(&self) -> f64 {
        self.top_p
    }

    pub fn top_k(&self) -> u32 {
        self.top_k
    }

    pub fn max_output_tokens(&self) -> u32 {
        self.max_output_tokens
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn response_format(&self) -> ResponseFormat {
        self.response_format
    }

    pub fn safety_settings(&self) -> &[SafetySetting] {
        &self.safety_settings
    }
}

impl Default for GeminiModelConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

#[derive(Debug, Clone, Default)]
pub struct GeminiModelConfigBuilder {
    temperature: Option<f64>,
    top_p: Option<f64>,
    top_k: Option<u32>,
    max_output_tokens: Option<u32>,
    timeout: Option<Duration>,
    response_format: Option<ResponseFormat>,
    safety_settings: Option<Vec<SafetySetting>>,
}

impl GeminiModelConfigBuilder {
    pub fn temperature(&mut self, temperature: f64) -> &mut Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn top_p(&mut self, top_p: f64) -> &mut Self {
        self.top_p = Some(top_p);
        self
    }

    pub fn top_k(&mut self, top_k: u32) -> &mut Self {
        self.top_k = Some(top_k);
        self
    }

    pub fn max_output_tokens(&mut self, max_output_tokens: u32) -> &mut Self {
        self.max_output_tokens = Some(max_output_tokens);
        self
    }

    pub fn timeout(&mut self, timeout: Duration) -> &mut Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn response_format(&mut self, response_format: ResponseFormat) -> &mut Self {
        self.response_format = Some(response_format);
        self
    }

    pub fn safety_settings(&mut self, safety_settings: Vec<SafetySetting>) -> &mut Self {
        self.safety_settings = Some(safety_settings);
        self
    }

    /// Unset fields fall back to their defaults.
    pub fn build(&self) -> GeminiModelConfig {
        GeminiModelConfig {
            temperature: self.temperature.unwrap_or(DEFAULT_TEMPERATURE),
            top_p: self.top_p.unwrap_or(DEFAULT_TOP_P),
            top_k: self.top_k.unwrap_or(DEFAULT_TOP_K),
            max_output_tokens: self.max_output_tokens.unwrap_or(DEFAULT_MAX_OUTPUT_TOKENS),
            timeout: self.timeout.unwrap_or(DEFAULT_TIMEOUT),
            response_format: self.response_format.unwrap_or_default(),
            safety_settings: self.safety_settings.clone().unwrap_or_else(default_safety_settings),
        }
    }
}
