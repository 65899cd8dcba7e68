use serde::Deserialize;

use crate::{
    spotify::SpotifyApi,
    types::{FetchResult, TimeRange},
};

use super::{InsightContext, stats};

/// Genres listed in the artist analysis context.
const GENRE_ANALYSIS_SIZE: usize = 10;

/// Canned analyses offered next to each dashboard section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightTopic {
    Dashboard,
    Tracks,
    Artists,
    History,
    Playlists,
}

/// Query parameters accepted by the insight endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InsightParams {
    #[serde(default)]
    pub time_range: TimeRange,
    pub limit: Option<u32>,
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub min_popularity: u32,
}

impl InsightTopic {
    pub fn question(&self) -> &'static str {
        match self {
            InsightTopic::Dashboard => {
                "Analyse my Spotify data and give me interesting insights about my listening habits."
            }
            InsightTopic::Tracks => {
                "Analyse the tracks this user listens to most. Cover: \
                 1. genre patterns, if they can be identified; \
                 2. how popular the tracks are; \
                 3. possible shifts in musical taste; \
                 4. recommendations based on these tracks."
            }
            InsightTopic::Artists => {
                "Analyse this user's favourite artists. Cover: \
                 1. genre patterns; \
                 2. what the artists have in common; \
                 3. similar artists worth trying; \
                 4. how their taste evolves with artist popularity."
            }
            InsightTopic::History => {
                "Analyse the recent listening history. Cover: \
                 1. time-of-day listening patterns; \
                 2. genre variation over time; \
                 3. consistency of musical choices; \
                 4. suggestions based on recent listening."
            }
            InsightTopic::Playlists => {
                "Analyse this user's playlists. Cover: \
                 1. diversity of content (many specialised playlists or a few general ones); \
                 2. average playlist size; \
                 3. patterns in names or descriptions; \
                 4. ideas for organising them or for new playlists."
            }
        }
    }

    fn default_limit(&self) -> u32 {
        match self {
            InsightTopic::Dashboard => 10,
            InsightTopic::Tracks | InsightTopic::Artists => 20,
            InsightTopic::History => 30,
            InsightTopic::Playlists => 50,
        }
    }

    /// Fetches what the topic needs and shapes it into a context.
    ///
    /// Fails with the facade's message when the primary data set for the
    /// topic cannot be loaded.
    pub async fn build_context(
        &self,
        api: &SpotifyApi,
        token: &str,
        params: &InsightParams,
    ) -> Result<InsightContext, String> {
        let limit = params.limit.unwrap_or_else(|| self.default_limit());
        let time_range = params.time_range;

        match self {
            InsightTopic::Dashboard => Ok(InsightContext::new()
                .with("top_tracks", &api.get_top_tracks(token, limit, time_range).await)
                .with("top_artists", &api.get_top_artists(token, limit, time_range).await)
                .with("recent_tracks", &api.get_recently_played(token, limit).await)),

            InsightTopic::Tracks => {
                let tracks = required(api.get_top_tracks(token, limit, time_range).await)?;
                let tracks = stats::filter_tracks(&tracks, &params.search, params.min_popularity);
                let summary = stats::track_stats(&tracks);
                Ok(InsightContext::new().with("tracks", &tracks).with(
                    "statistics",
                    &serde_json::json!({
                        "average_popularity": summary.average_popularity,
                        "total_tracks": summary.total_tracks,
                        "total_minutes": summary.total_minutes,
                        "time_range": time_range,
                    }),
                ))
            }

            InsightTopic::Artists => {
                let artists = required(api.get_top_artists(token, limit, time_range).await)?;
                let artists =
                    stats::filter_artists(&artists, &params.search, params.min_popularity);
                Ok(InsightContext::new()
                    .with("artists", &artists)
                    .with(
                        "genre_analysis",
                        &stats::genre_counts(&artists, GENRE_ANALYSIS_SIZE),
                    )
                    .with("statistics", &stats::artist_stats(&artists)))
            }

            InsightTopic::History => {
                let recent = required(api.get_recently_played(token, limit).await)?;
                Ok(InsightContext::new()
                    .with("hour_distribution", &stats::hour_distribution(&recent))
                    .with("total_tracks", &recent.len())
                    .with("recent_tracks", &recent))
            }

            InsightTopic::Playlists => {
                let playlists = required(api.get_playlists(token, limit).await)?;
                Ok(InsightContext::new()
                    .with("statistics", &stats::playlist_stats(&playlists))
                    .with("playlists", &playlists))
            }
        }
    }
}

fn required<T>(result: FetchResult<T>) -> Result<T, String> {
    match result {
        FetchResult::Success { data, .. } => Ok(data),
        FetchResult::Error { message } => Err(message),
    }
}
