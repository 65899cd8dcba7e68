//! # API Module
//!
//! HTTP endpoints of the dashboard server, built on [Axum](https://docs.rs/axum).
//!
//! ## Sessions
//!
//! Every route except [`health`] runs behind [`session_layer`], which maps the
//! `spotinsight_session` cookie to a [`crate::management::Session`] and places
//! its handle in the request extensions. A request without a known cookie is
//! served from a transient session that is never stored. Only [`login`] stores
//! a session and sets the cookie.
//!
//! ## Endpoints
//!
//! ### Authentication
//!
//! - [`login`] starts the Authorization Code flow and redirects to Spotify.
//!   The previous user and transcript are dropped at this point.
//! - [`callback`] completes it, then loads the user profile into the session.
//! - [`logout`] clears credentials, user info and chat transcript, and drops
//!   the session from the store.
//! - [`session_info`] reports the flow state and the logged-in user.
//!
//! ### Data
//!
//! [`top_tracks`], [`top_artists`], [`recently_played`], [`currently_playing`],
//! [`playlists`], [`profile`] and [`summary`] wrap the Spotify facade. Their
//! bodies are always a `FetchResult` envelope; only a missing or unrefreshable
//! login turns into `401 Unauthorized`.
//!
//! ### Insights
//!
//! - [`insights`] runs a canned analysis for one dashboard section.
//! - [`chat`], [`chat_history`] and [`clear_chat`] drive the free-form chat.

mod callback;
mod chat;
mod data;
mod health;
mod insights;
mod session;

pub use callback::{callback, login, logout};
pub use chat::{ChatReply, ChatRequest, chat, chat_history, clear_chat};
pub use data::{
    LimitQuery, TopQuery, currently_playing, playlists, profile, recently_played, summary,
    top_artists, top_tracks,
};
pub use health::health;
pub use insights::{InsightResponse, insights};
pub use session::{
    SESSION_COOKIE, SessionInfo, cookie_value, session_cookie, session_info, session_layer,
};

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::error::AuthError;

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({
                "status": "error",
                "message": self.to_string(),
            })),
        )
            .into_response()
    }
}
