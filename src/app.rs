use std::sync::Arc;

use axum::{
    http::HeaderValue,
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::config::{AppConfig, GeminiSettings, SecurityConfig};
use crate::database::Store;
use crate::error::ApiError;
use crate::gemini::{GeminiChatModel, GeminiError, GeminiModelBuilder, GeminiStreamingChatModel};
use crate::handlers::{protected, public};
use crate::middleware::jwt_auth_middleware;

/// Gemini clients built from one resolved configuration.
pub struct Assistant {
    pub chat: GeminiChatModel,
    pub streaming: GeminiStreamingChatModel,
}

impl Assistant {
    /// `Ok(None)` when no api key is configured.
    pub fn from_settings(settings: &GeminiSettings) -> Result<Option<Self>, GeminiError> {
        let Some(api_key) = settings.api_key.as_deref() else {
            return Ok(None);
        };

        let builder = GeminiModelBuilder::new(api_key, &settings.model_name)
            .base_url(&settings.base_url)
            .customize(|config| {
                if let Some(temperature) = settings.temperature {
                    config.temperature(temperature);
                }
                if let Some(max_output_tokens) = settings.max_output_tokens {
                    config.max_output_tokens(max_output_tokens);
                }
            });

        Ok(Some(Self {
            chat: builder.build_chat()?,
            streaming: builder.build_streaming()?,
        }))
    }
}

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub assistant: Option<Arc<Assistant>>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, config: AppConfig) -> Self {
        Self {
            store,
            assistant: None,
            config: Arc::new(config),
        }
    }

    pub fn with_assistant(mut self, assistant: Assistant) -> Self {
        self.assistant = Some(Arc::new(assistant));
        self
    }

    pub fn assistant(&self) -> Result<&Assistant, ApiError> {
        self.assistant
            .as_deref()
            .ok_or_else(|| ApiError::service_unavailable("The travel assistant is not configured"))
    }
}

pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .route(
            "/api/journals",
            get(protected::journal_list).post(protected::journal_create),
        )
        .route(
            "/api/journals/:id",
            get(protected::journal_get)
                .put(protected::journal_update)
                .delete(protected::journal_delete),
        )
        .route(
            "/api/subsections",
            get(protected::subsection_list).post(protected::subsection_create),
        )
        .route(
            "/api/subsections/:id",
            get(protected::subsection_get)
                .put(protected::subsection_update)
                .delete(protected::subsection_delete),
        )
        .route("/api/assistant/chat", post(protected::assistant_chat))
        .route("/api/assistant/chat/stream", post(protected::assistant_chat_stream))
        .route_layer(middleware::from_fn_with_state(state.clone(), jwt_auth_middleware));

    Router::new()
        .route("/", get(public::root))
        .route("/health", get(public::health))
        .merge(api)
        .layer(cors_layer(&state.config.security))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(security: &SecurityConfig) -> CorsLayer {
    if !security.enable_cors {
        return CorsLayer::new();
    }
    if security.cors_origins.is_empty() || security.cors_origins.iter().any(|o| o == "*") {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(tower_http::cors::Any)
        .allow_headers(tower_http::cors::Any)
}
