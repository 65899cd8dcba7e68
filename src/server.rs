use std::{net::SocketAddr, sync::Arc};

use axum::{
    Router, middleware,
    routing::{get, post},
};
use tokio::net::TcpListener;

use crate::{
    Res, api,
    config::Settings,
    error::ConfigError,
    insights::{GeminiClient, InsightGenerator},
    management::SessionStore,
    spotify::{SpotifyApi, auth::SpotifyAccounts},
};

/// Shared, process-wide state handed to every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    pub sessions: Arc<SessionStore>,
    pub accounts: Arc<SpotifyAccounts>,
    pub spotify: SpotifyApi,
    pub insights: Arc<InsightGenerator>,
}

impl AppState {
    pub fn from_settings(settings: &Settings) -> Result<Self, ConfigError> {
        Ok(Self {
            sessions: Arc::new(SessionStore::default()),
            accounts: Arc::new(SpotifyAccounts::new(&settings.spotify)?),
            spotify: SpotifyApi::new(settings.spotify.api_url.clone()),
            insights: Arc::new(InsightGenerator::new(GeminiClient::new(&settings.gemini))),
        })
    }
}

pub fn router(state: AppState) -> Router {
    let session_routes = Router::new()
        .route("/login", get(api::login))
        .route("/callback", get(api::callback))
        .route("/logout", post(api::logout))
        .route("/api/session", get(api::session_info))
        .route("/api/top-tracks", get(api::top_tracks))
        .route("/api/top-artists", get(api::top_artists))
        .route("/api/recently-played", get(api::recently_played))
        .route("/api/currently-playing", get(api::currently_playing))
        .route("/api/playlists", get(api::playlists))
        .route("/api/profile", get(api::profile))
        .route("/api/summary", get(api::summary))
        .route("/api/insights/{topic}", post(api::insights))
        .route(
            "/api/chat",
            get(api::chat_history)
                .post(api::chat)
                .delete(api::clear_chat),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            api::session_layer,
        ));

    Router::new()
        .route("/health", get(api::health))
        .merge(session_routes)
        .with_state(state)
}

pub async fn start_api_server(state: AppState, addr: SocketAddr) -> Res<()> {
    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, router(state)).await?;
    Ok(())
}
