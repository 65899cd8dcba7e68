use axum::{
    Extension, Json,
    extract::{Query, State},
};
use chrono::Utc;
use serde::Deserialize;

use crate::{
    error::AuthError,
    management::{Session, SessionHandle},
    server::AppState,
    spotify::StatisticsSummary,
    types::{
        ArtistSummary, FetchResult, NowPlaying, PlaylistSummary, ProfileSummary, TimeRange,
        TrackSummary,
    },
};

const DEFAULT_LIMIT: u32 = 20;

fn default_limit() -> u32 {
    DEFAULT_LIMIT
}

#[derive(Debug, Deserialize)]
pub struct TopQuery {
    #[serde(default = "default_limit")]
    pub limit: u32,
    #[serde(default)]
    pub time_range: TimeRange,
}

#[derive(Debug, Deserialize)]
pub struct LimitQuery {
    #[serde(default = "default_limit")]
    pub limit: u32,
}

/// A usable access token for `session`, refreshed if it is about to expire.
///
/// A failed refresh leaves the session logged out.
pub(crate) async fn access_token(
    state: &AppState,
    session: &mut Session,
) -> Result<String, AuthError> {
    let now = Utc::now().timestamp();
    match session.auth.ensure_fresh(state.accounts.as_ref(), now).await {
        Ok(record) => Ok(record.access_token.clone()),
        Err(e) => {
            session.logout();
            Err(e)
        }
    }
}

pub async fn top_tracks(
    State(state): State<AppState>,
    Extension(session): Extension<SessionHandle>,
    Query(query): Query<TopQuery>,
) -> Result<Json<FetchResult<Vec<TrackSummary>>>, AuthError> {
    let mut session = session.lock().await;
    let token = access_token(&state, &mut session).await?;
    Ok(Json(
        state
            .spotify
            .get_top_tracks(&token, query.limit, query.time_range)
            .await,
    ))
}

pub async fn top_artists(
    State(state): State<AppState>,
    Extension(session): Extension<SessionHandle>,
    Query(query): Query<TopQuery>,
) -> Result<Json<FetchResult<Vec<ArtistSummary>>>, AuthError> {
    let mut session = session.lock().await;
    let token = access_token(&state, &mut session).await?;
    Ok(Json(
        state
            .spotify
            .get_top_artists(&token, query.limit, query.time_range)
            .await,
    ))
}

pub async fn recently_played(
    State(state): State<AppState>,
    Extension(session): Extension<SessionHandle>,
    Query(query): Query<LimitQuery>,
) -> Result<Json<FetchResult<Vec<TrackSummary>>>, AuthError> {
    let mut session = session.lock().await;
    let token = access_token(&state, &mut session).await?;
    Ok(Json(
        state.spotify.get_recently_played(&token, query.limit).await,
    ))
}

pub async fn currently_playing(
    State(state): State<AppState>,
    Extension(session): Extension<SessionHandle>,
) -> Result<Json<FetchResult<Option<NowPlaying>>>, AuthError> {
    let mut session = session.lock().await;
    let token = access_token(&state, &mut session).await?;
    Ok(Json(state.spotify.get_currently_playing(&token).await))
}

pub async fn playlists(
    State(state): State<AppState>,
    Extension(session): Extension<SessionHandle>,
    Query(query): Query<LimitQuery>,
) -> Result<Json<FetchResult<Vec<PlaylistSummary>>>, AuthError> {
    let mut session = session.lock().await;
    let token = access_token(&state, &mut session).await?;
    Ok(Json(state.spotify.get_playlists(&token, query.limit).await))
}

pub async fn profile(
    State(state): State<AppState>,
    Extension(session): Extension<SessionHandle>,
) -> Result<Json<FetchResult<ProfileSummary>>, AuthError> {
    let mut session = session.lock().await;
    let token = access_token(&state, &mut session).await?;
    Ok(Json(state.spotify.get_user_profile(&token).await))
}

pub async fn summary(
    State(state): State<AppState>,
    Extension(session): Extension<SessionHandle>,
) -> Result<Json<StatisticsSummary>, AuthError> {
    let mut session = session.lock().await;
    let token = access_token(&state, &mut session).await?;
    Ok(Json(state.spotify.get_statistics_summary(&token).await))
}
