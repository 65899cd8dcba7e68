use std::collections::HashMap;

use axum::{
    Extension, Json,
    extract::{Query, State},
    http::{StatusCode, header::SET_COOKIE},
    response::{Html, IntoResponse, Redirect, Response},
};
use chrono::Utc;
use serde_json::{Value, json};

use super::session_cookie;
use crate::{info, management::SessionHandle, server::AppState, success, warning};

/// Sends the browser to the Spotify consent screen.
///
/// This is the one place a session is stored. A caller without a known
/// session gets a new one along with its cookie.
pub async fn login(
    State(state): State<AppState>,
    Extension(session): Extension<SessionHandle>,
) -> Response {
    let transient = session.lock().await.is_transient();
    let (session, cookie) = if transient {
        let (id, handle) = state.sessions.create().await;
        (handle, Some(session_cookie(&id)))
    } else {
        (session, None)
    };

    let mut session = session.lock().await;
    // A new login drops the previous user even if this one is abandoned
    session.reset_identity();
    let request = session.auth.begin_login();
    let url = state
        .accounts
        .authorize_url(&request.csrf_state, &request.code_challenge);

    info!("Session {} is being sent to the consent screen", short_id(session.id()));
    match cookie {
        Some(cookie) => ([(SET_COOKIE, cookie)], Redirect::to(&url)).into_response(),
        None => Redirect::to(&url).into_response(),
    }
}

/// Redirect target registered with Spotify.
pub async fn callback(
    State(state): State<AppState>,
    Extension(session): Extension<SessionHandle>,
    Query(params): Query<HashMap<String, String>>,
) -> (StatusCode, Html<&'static str>) {
    let mut session = session.lock().await;

    if let Some(reason) = params.get("error") {
        let err = session.auth.deny_login(reason);
        session.reset_identity();
        warning!("Login aborted: {}", err);
        return (StatusCode::UNAUTHORIZED, Html("<h4>Login was cancelled.</h4>"));
    }

    let (Some(code), Some(returned_state)) = (params.get("code"), params.get("state")) else {
        return (
            StatusCode::BAD_REQUEST,
            Html("<h4>Missing authorization code.</h4>"),
        );
    };

    let now = Utc::now().timestamp();
    let token = match session
        .auth
        .complete_login(state.accounts.as_ref(), code, returned_state, now)
        .await
    {
        Ok(record) => record.access_token.clone(),
        Err(e) => {
            warning!("Token exchange failed: {}", e);
            if !session.auth.is_authenticated() {
                session.reset_identity();
            }
            return (
                StatusCode::BAD_REQUEST,
                Html("<h4>Login failed.</h4><p>Please try again.</p>"),
            );
        }
    };

    match state.spotify.fetch_profile(&token).await {
        Ok(profile) => {
            success!("Connected to Spotify as {}", profile.display_name);
            session.set_user(&profile);
        }
        Err(e) => warning!("Logged in, but the profile could not be loaded: {}", e),
    }

    (
        StatusCode::OK,
        Html("<h2>Authentication successful.</h2><p>You can close this window.</p>"),
    )
}

/// Clears the session and drops it from the store. The stale cookie then
/// resolves to nothing, like any unknown id.
pub async fn logout(
    State(state): State<AppState>,
    Extension(session): Extension<SessionHandle>,
) -> Json<Value> {
    let mut session = session.lock().await;
    session.logout();
    if !session.is_transient() {
        state.sessions.remove(session.id()).await;
    }
    Json(json!({ "status": "success" }))
}

fn short_id(id: &str) -> &str {
    id.get(..8).unwrap_or(id)
}
