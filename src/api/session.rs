use std::sync::Arc;

use axum::{
    Extension, Json,
    extract::{Request, State},
    http::{HeaderMap, header::COOKIE},
    middleware::Next,
    response::Response,
};
use serde::Serialize;
use tokio::sync::Mutex;

use crate::{
    management::{Session, SessionHandle},
    server::AppState,
};

pub const SESSION_COOKIE: &str = "spotinsight_session";

/// Attaches the caller's session context to the request. A request without
/// a known session id gets a transient context; only [`login`] stores a new
/// session and hands out its cookie.
///
/// [`login`]: super::login
pub async fn session_layer(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Response {
    let stored = match cookie_value(req.headers(), SESSION_COOKIE) {
        Some(id) => state.sessions.get(&id).await,
        None => None,
    };
    let handle = stored.unwrap_or_else(|| Arc::new(Mutex::new(Session::transient())));
    req.extensions_mut().insert(handle);

    next.run(req).await
}

/// `Set-Cookie` value for session `id`.
pub fn session_cookie(id: &str) -> String {
    format!("{SESSION_COOKIE}={id}; Path=/; HttpOnly; SameSite=Lax")
}

/// Value of cookie `name` across all `Cookie` headers.
pub fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.to_string())
}

#[derive(Debug, Serialize)]
pub struct SessionInfo {
    pub authenticated: bool,
    pub state: &'static str,
    pub user_id: Option<String>,
    pub user_name: Option<String>,
    pub user_image: Option<String>,
}

pub async fn session_info(Extension(session): Extension<SessionHandle>) -> Json<SessionInfo> {
    let session = session.lock().await;
    let user = session.user();

    Json(SessionInfo {
        authenticated: session.auth.is_authenticated(),
        state: session.auth.state().name(),
        user_id: user.map(|u| u.id.clone()),
        user_name: user.map(|u| u.display_name.clone()),
        user_image: user.and_then(|u| u.image_url.clone()),
    })
}
