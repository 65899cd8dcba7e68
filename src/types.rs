use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// OAuth credentials held for a single session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialRecord {
    pub access_token: String,
    pub refresh_token: String,
    /// Unix timestamp (seconds) after which the access token is rejected.
    pub expires_at: i64,
    pub scope: String,
}

impl CredentialRecord {
    /// True when fewer than `margin` seconds of validity remain at `now`.
    pub fn expires_within(&self, now: i64, margin: i64) -> bool {
        self.expires_at.saturating_sub(now) <= margin
    }
}

/// Raw body returned by the accounts service token endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
    pub expires_in: i64,
}

impl TokenResponse {
    /// Builds a record valid from `now`. Spotify may omit the refresh token
    /// on refresh; `previous_refresh` is kept in that case.
    pub fn into_record(self, now: i64, previous_refresh: Option<&str>) -> CredentialRecord {
        let refresh_token = match self.refresh_token {
            Some(token) if !token.is_empty() => token,
            _ => previous_refresh.unwrap_or_default().to_string(),
        };

        CredentialRecord {
            access_token: self.access_token,
            refresh_token,
            expires_at: now.saturating_add(self.expires_in),
            scope: self.scope.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeRange {
    /// Roughly the last four weeks.
    ShortTerm,
    /// Roughly the last six months.
    #[default]
    MediumTerm,
    /// Several years of history.
    LongTerm,
}

impl TimeRange {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeRange::ShortTerm => "short_term",
            TimeRange::MediumTerm => "medium_term",
            TimeRange::LongTerm => "long_term",
        }
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Spotify Web API payloads
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct Paging<T> {
    pub items: Vec<T>,
    #[serde(default)]
    pub total: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Image {
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SimplifiedArtist {
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AlbumRef {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub images: Vec<Image>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Track {
    pub name: String,
    #[serde(default)]
    pub artists: Vec<SimplifiedArtist>,
    #[serde(default)]
    pub album: AlbumRef,
    #[serde(default)]
    pub duration_ms: u64,
    #[serde(default)]
    pub popularity: u32,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Followers {
    #[serde(default)]
    pub total: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Artist {
    pub name: String,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub popularity: u32,
    #[serde(default)]
    pub followers: Followers,
    #[serde(default)]
    pub images: Vec<Image>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlayHistory {
    pub track: Track,
    pub played_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CurrentlyPlaying {
    #[serde(default)]
    pub is_playing: bool,
    #[serde(default)]
    pub progress_ms: Option<u64>,
    #[serde(default)]
    pub item: Option<Track>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlaylistTracks {
    #[serde(default)]
    pub total: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Playlist {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub tracks: PlaylistTracks,
    #[serde(default)]
    pub images: Option<Vec<Image>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserProfile {
    pub id: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub followers: Option<Followers>,
    #[serde(default)]
    pub product: Option<String>,
    #[serde(default)]
    pub images: Option<Vec<Image>>,
}

// ---------------------------------------------------------------------------
// Flattened records handed to the browser and to Gemini
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackSummary {
    pub name: String,
    pub artist: String,
    pub album: String,
    /// `M:SS`
    pub duration: String,
    pub duration_ms: u64,
    pub popularity: u32,
    pub image_url: Option<String>,
    /// `DD/MM/YYYY HH:MM`, only set for listening history.
    pub played_at: Option<String>,
    pub is_playing: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NowPlaying {
    #[serde(flatten)]
    pub track: TrackSummary,
    pub progress_ms: u64,
    pub progress_percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtistSummary {
    pub name: String,
    pub genres: Vec<String>,
    pub popularity: u32,
    pub followers: u64,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaylistSummary {
    pub name: String,
    pub description: String,
    pub tracks: u64,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileSummary {
    pub id: String,
    pub display_name: String,
    pub email: String,
    pub country: String,
    pub followers: u64,
    pub product: String,
    pub image_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_range: Option<TimeRange>,
    pub total: usize,
}

/// Outcome of a facade call. Upstream failures always end up in `Error`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum FetchResult<T> {
    Success {
        data: T,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        metadata: Option<Metadata>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
    Error {
        message: String,
    },
}

impl<T> FetchResult<T> {
    pub fn success(data: T, metadata: Option<Metadata>) -> Self {
        FetchResult::Success {
            data,
            metadata,
            message: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        FetchResult::Error {
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, FetchResult::Success { .. })
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            FetchResult::Success { data, .. } => Some(data),
            FetchResult::Error { .. } => None,
        }
    }

    pub fn into_data(self) -> Option<T> {
        match self {
            FetchResult::Success { data, .. } => Some(data),
            FetchResult::Error { .. } => None,
        }
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            FetchResult::Success { message, .. } => message.as_deref(),
            FetchResult::Error { message } => Some(message),
        }
    }
}

/// One turn of the chat transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}
