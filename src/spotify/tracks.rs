use chrono::{DateTime, Utc};

use crate::{
    types::{
        CurrentlyPlaying, FetchResult, NowPlaying, Paging, PlayHistory, TimeRange, Track,
        TrackSummary,
    },
    utils,
};

use super::{SpotifyApi, collect_page, failed, first_image};

/// Message attached to an empty currently-playing result.
pub const NOTHING_PLAYING: &str = "Nothing is playing right now";

/// Flattens a provider track. Only the first credited artist is kept.
pub fn summarize_track(track: Track, played_at: Option<&DateTime<Utc>>) -> TrackSummary {
    let artist = track
        .artists
        .first()
        .map(|a| a.name.clone())
        .unwrap_or_default();

    TrackSummary {
        duration: utils::format_duration(track.duration_ms),
        image_url: first_image(&track.album.images),
        played_at: played_at.map(utils::format_played_at),
        name: track.name,
        artist,
        album: track.album.name,
        duration_ms: track.duration_ms,
        popularity: track.popularity,
        is_playing: false,
    }
}

pub fn summarize_now_playing(current: CurrentlyPlaying) -> Option<NowPlaying> {
    if !current.is_playing {
        return None;
    }
    let item = current.item?;
    let progress_ms = current.progress_ms.unwrap_or(0);
    let progress_percent = utils::progress_percent(progress_ms, item.duration_ms);

    let mut track = summarize_track(item, None);
    track.is_playing = true;

    Some(NowPlaying {
        track,
        progress_ms,
        progress_percent,
    })
}

impl SpotifyApi {
    /// The user's most played tracks over `time_range`.
    pub async fn get_top_tracks(
        &self,
        token: &str,
        limit: u32,
        time_range: TimeRange,
    ) -> FetchResult<Vec<TrackSummary>> {
        let query = [
            ("limit", utils::clamp_limit(limit).to_string()),
            ("time_range", time_range.to_string()),
        ];
        let page = self
            .get_json::<Paging<Track>>(token, "/me/top/tracks", &query)
            .await;

        collect_page("top tracks", page, Some(time_range), |track| {
            summarize_track(track, None)
        })
    }

    pub async fn get_recently_played(
        &self,
        token: &str,
        limit: u32,
    ) -> FetchResult<Vec<TrackSummary>> {
        let query = [("limit", utils::clamp_limit(limit).to_string())];
        let page = self
            .get_json::<Paging<PlayHistory>>(token, "/me/player/recently-played", &query)
            .await;

        collect_page("recently played", page, None, |entry| {
            summarize_track(entry.track, entry.played_at.as_ref())
        })
    }

    /// The track playing right now. An idle player is a success with no data.
    pub async fn get_currently_playing(&self, token: &str) -> FetchResult<Option<NowPlaying>> {
        let current = self
            .get_json::<CurrentlyPlaying>(token, "/me/player/currently-playing", &[])
            .await;

        match current {
            Ok(current) => match current.and_then(summarize_now_playing) {
                Some(now) => FetchResult::success(Some(now), None),
                None => FetchResult::Success {
                    data: None,
                    metadata: None,
                    message: Some(NOTHING_PLAYING.to_string()),
                },
            },
            Err(e) => failed("currently playing", e),
        }
    }
}
