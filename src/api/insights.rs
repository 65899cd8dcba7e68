use axum::{
    Extension, Json,
    extract::{Path, Query, State},
};
use serde::Serialize;

use crate::{
    error::AuthError,
    insights::{InsightParams, InsightTopic},
    management::SessionHandle,
    server::AppState,
    warning,
};

use super::data::access_token;

#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum InsightResponse {
    Success { insights: String },
    Error { message: String },
}

/// Runs the canned analysis for `topic`.
///
/// A generation failure still answers `success`, with the error sentence in
/// place of the insight. Only a failure to load the underlying data is
/// reported as `error`.
pub async fn insights(
    State(state): State<AppState>,
    Extension(session): Extension<SessionHandle>,
    Path(topic): Path<InsightTopic>,
    Query(params): Query<InsightParams>,
) -> Result<Json<InsightResponse>, AuthError> {
    let mut session = session.lock().await;
    let token = access_token(&state, &mut session).await?;

    let context = match topic.build_context(&state.spotify, &token, &params).await {
        Ok(context) => context,
        Err(message) => {
            warning!("No data for {:?} insights: {}", topic, message);
            return Ok(Json(InsightResponse::Error { message }));
        }
    };

    let insights = state.insights.analyze(topic.question(), &context).await;
    Ok(Json(InsightResponse::Success { insights }))
}
