use std::convert::Infallible;

use axum::{
    extract::{rejection::JsonRejection, State},
    response::sse::{Event, KeepAlive, Sse},
    Extension, Json,
};
use futures::{Stream, StreamExt};
use tracing::{info, warn};

use crate::api::{messages, ChatReplyView, ChatRequest};
use crate::app::AppState;
use crate::error::ApiError;
use crate::gemini::ChatMessage;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};

const SYSTEM_PROMPT: &str = "You are Roamance, a travel planning assistant. \
Help the traveller plan activities, sightseeing stops and routes, and keep answers short and practical.";

fn conversation(request: ChatRequest) -> Result<Vec<ChatMessage>, ApiError> {
    if request.message.trim().is_empty() {
        return Err(ApiError::invalid_argument("Message must not be blank"));
    }
    Ok(vec![ChatMessage::system(SYSTEM_PROMPT), ChatMessage::user(request.message)])
}

/// POST /api/assistant/chat - single-turn reply from the Gemini assistant
pub async fn chat(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> ApiResult<ChatReplyView> {
    let Json(request) = payload?;
    let assistant = state.assistant()?;
    info!("Assistant chat requested by user {}", user.user_id);

    let reply = assistant.chat.chat(&conversation(request)?).await?;

    Ok(ApiResponse::success(messages::ASSISTANT_REPLY_SUCCESS, ChatReplyView { reply }))
}

/// POST /api/assistant/chat/stream - the same reply as server-sent events
///
/// Each text chunk is one `data` event; a failure mid-stream is sent as an
/// `error` event and ends the stream.
pub async fn chat_stream(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, ApiError> {
    let Json(request) = payload?;
    let assistant = state.assistant()?;
    info!("Assistant stream requested by user {}", user.user_id);

    let events = assistant
        .streaming
        .chat_stream(&conversation(request)?)
        .map(|chunk| {
            let event = match chunk {
                Ok(text) => Event::default().data(text),
                Err(e) => {
                    warn!("Assistant stream failed: {}", e);
                    Event::default().event("error").data(e.to_string())
                }
            };
            Ok::<_, Infallible>(event)
        });

    Ok(Sse::new(events).keep_alive(KeepAlive::default()))
}
