use crate::{spotify::SpotifyApi, types::TimeRange};

use super::InsightContext;

const CHAT_LIMIT: u32 = 20;
const FALLBACK_LIMIT: u32 = 5;

const TRACK_WORDS: &[&str] = &["song", "track", "tune", "música", "canção"];
const ARTIST_WORDS: &[&str] = &["artist", "band", "singer", "artista", "banda", "cantor"];
const RECENT_WORDS: &[&str] = &["recent", "history", "lately", "recente", "histórico"];
const CURRENT_WORDS: &[&str] = &["playing", "now", "current", "tocando", "agora"];

/// Which data sets a chat question asks about.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContextPlan {
    pub top_tracks: bool,
    pub top_artists: bool,
    pub recent_tracks: bool,
    pub current_track: bool,
}

impl ContextPlan {
    /// Matches words of `question` against keyword prefixes, so "songs"
    /// and "currently" count.
    pub fn for_question(question: &str) -> Self {
        let lowered = question.to_lowercase();
        let words: Vec<&str> = lowered
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .collect();
        let mentions = |keywords: &[&str]| {
            words
                .iter()
                .any(|w| keywords.iter().any(|k| w.starts_with(k)))
        };

        Self {
            top_tracks: mentions(TRACK_WORDS),
            top_artists: mentions(ARTIST_WORDS),
            recent_tracks: mentions(RECENT_WORDS),
            current_track: mentions(CURRENT_WORDS),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Loads the data a question refers to. Sections whose fetch fails are left
/// out. A question that names nothing gets the profile and a short overview.
pub async fn gather_context(api: &SpotifyApi, token: &str, plan: ContextPlan) -> InsightContext {
    let mut context = InsightContext::new();
    let time_range = TimeRange::MediumTerm;

    if plan.top_tracks {
        if let Some(tracks) = api.get_top_tracks(token, CHAT_LIMIT, time_range).await.into_data() {
            context.insert("top_tracks", &tracks);
        }
    }
    if plan.top_artists {
        if let Some(artists) = api.get_top_artists(token, CHAT_LIMIT, time_range).await.into_data() {
            context.insert("top_artists", &artists);
        }
    }
    if plan.recent_tracks {
        if let Some(recent) = api.get_recently_played(token, CHAT_LIMIT).await.into_data() {
            context.insert("recent_tracks", &recent);
        }
    }
    if plan.current_track {
        if let Some(current) = api.get_currently_playing(token).await.into_data() {
            context.insert("current_track", &current);
        }
    }

    if context.is_empty() {
        if let Some(profile) = api.get_user_profile(token).await.into_data() {
            context.insert("profile", &profile);
        }
        let tracks = api.get_top_tracks(token, FALLBACK_LIMIT, time_range).await;
        let artists = api.get_top_artists(token, FALLBACK_LIMIT, time_range).await;
        if let (Some(tracks), Some(artists)) = (tracks.into_data(), artists.into_data()) {
            context.insert(
                "general_stats",
                &serde_json::json!({ "top_tracks": tracks, "top_artists": artists }),
            );
        }
    }

    context
}
