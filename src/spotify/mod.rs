//! # Spotify Integration Module
//!
//! Thin client for the Spotify accounts service and the read-only parts of
//! the Web API the dashboard needs.
//!
//! ```text
//! HTTP handlers
//!      ↓
//! SpotifyApi facade (tracks, artists, playlists, profile)
//!      ↓
//! reqwest + serde payloads
//!      ↓
//! Spotify Web API
//! ```
//!
//! Every facade method returns a [`FetchResult`]. Transport failures,
//! non-success statuses and payloads that fail to decode are all converted
//! into [`FetchResult::Error`] so a single failing widget never takes the
//! rest of the dashboard down with it. Nothing is retried and only the first
//! page of any listing is requested.
//!
//! [`auth`] holds the token endpoint client used by the login flow.

pub mod artists;
pub mod auth;
pub mod playlists;
pub mod profile;
pub mod tracks;

use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::{
    error::ApiError,
    types::{
        ArtistSummary, FetchResult, Metadata, NowPlaying, Paging, TimeRange, TrackSummary,
    },
    warning,
};

/// Read-only facade over the Spotify Web API.
#[derive(Debug, Clone)]
pub struct SpotifyApi {
    http: Client,
    base_url: String,
}

/// Combined snapshot used by the dashboard header and the summary endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatisticsSummary {
    pub top_tracks_short: FetchResult<Vec<TrackSummary>>,
    pub top_artists_short: FetchResult<Vec<ArtistSummary>>,
    pub recently_played: FetchResult<Vec<TrackSummary>>,
    pub currently_playing: FetchResult<Option<NowPlaying>>,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

impl SpotifyApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub async fn get_statistics_summary(&self, token: &str) -> StatisticsSummary {
        StatisticsSummary {
            top_tracks_short: self.get_top_tracks(token, 5, TimeRange::ShortTerm).await,
            top_artists_short: self.get_top_artists(token, 5, TimeRange::ShortTerm).await,
            recently_played: self.get_recently_played(token, 10).await,
            currently_playing: self.get_currently_playing(token).await,
        }
    }

    /// GETs `path` with a bearer token. `Ok(None)` means 204 No Content.
    async fn get_json<T: DeserializeOwned>(
        &self,
        token: &str,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<Option<T>, ApiError> {
        let url = format!("{base}{path}", base = self.base_url);
        let res = self
            .http
            .get(&url)
            .bearer_auth(token)
            .query(query)
            .send()
            .await
            .map_err(ApiError::Transport)?;

        let status = res.status();
        if status == StatusCode::NO_CONTENT {
            return Ok(None);
        }

        let body = res.text().await.map_err(ApiError::Transport)?;
        if !status.is_success() {
            let message = serde_json::from_str::<ErrorEnvelope>(&body)
                .map(|e| e.error.message)
                .unwrap_or_else(|_| {
                    if body.trim().is_empty() {
                        status.canonical_reason().unwrap_or("request failed").to_string()
                    } else {
                        body.clone()
                    }
                });
            return Err(ApiError::Status { status, message });
        }

        if body.trim().is_empty() {
            return Ok(None);
        }

        serde_json::from_str::<T>(&body)
            .map(Some)
            .map_err(|e| ApiError::Decode(e.to_string()))
    }
}

/// Turns one page of provider items into a tagged result of flat records.
fn collect_page<T, U>(
    endpoint: &str,
    page: Result<Option<Paging<T>>, ApiError>,
    time_range: Option<TimeRange>,
    convert: impl FnMut(T) -> U,
) -> FetchResult<Vec<U>> {
    match page {
        Ok(page) => {
            let data: Vec<U> = page
                .map(|p| p.items)
                .unwrap_or_default()
                .into_iter()
                .map(convert)
                .collect();
            let total = data.len();
            FetchResult::success(data, Some(Metadata { time_range, total }))
        }
        Err(e) => failed(endpoint, e),
    }
}

fn failed<T>(endpoint: &str, err: ApiError) -> FetchResult<T> {
    warning!("Spotify {} failed: {}", endpoint, err);
    FetchResult::error(err.to_string())
}

/// URL of the first (largest) image, if any.
fn first_image(images: &[crate::types::Image]) -> Option<String> {
    images.first().map(|img| img.url.clone())
}
