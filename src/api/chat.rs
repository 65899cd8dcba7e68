use axum::{
    Extension, Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::{
    insights::chat::{ContextPlan, gather_context},
    management::SessionHandle,
    server::AppState,
    types::{ChatMessage, ChatRole},
};

use super::data::access_token;

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ChatReply {
    pub reply: String,
    pub messages: Vec<ChatMessage>,
}

pub async fn chat_history(Extension(session): Extension<SessionHandle>) -> Json<Vec<ChatMessage>> {
    let session = session.lock().await;
    Json(session.transcript().to_vec())
}

/// Answers one chat question with whatever data it mentions, recording both
/// turns in the session transcript.
pub async fn chat(
    State(state): State<AppState>,
    Extension(session): Extension<SessionHandle>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatReply>, Response> {
    let question = request.message.trim();
    if question.is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(json!({ "status": "error", "message": "message must not be empty" })),
        )
            .into_response());
    }

    let mut session = session.lock().await;
    let token = access_token(&state, &mut session)
        .await
        .map_err(IntoResponse::into_response)?;

    session.push_message(ChatRole::User, question);

    let plan = ContextPlan::for_question(question);
    let context = gather_context(&state.spotify, &token, plan).await;
    let reply = state.insights.analyze(question, &context).await;

    session.push_message(ChatRole::Assistant, reply.clone());

    Ok(Json(ChatReply {
        reply,
        messages: session.transcript().to_vec(),
    }))
}

pub async fn clear_chat(Extension(session): Extension<SessionHandle>) -> StatusCode {
    let mut session = session.lock().await;
    session.clear_transcript();
    StatusCode::NO_CONTENT
}
