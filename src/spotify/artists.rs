use crate::{
    types::{Artist, ArtistSummary, FetchResult, Paging, TimeRange},
    utils,
};

use super::{SpotifyApi, collect_page, first_image};

/// Genres kept per artist; Spotify lists them roughly by relevance.
pub const MAX_GENRES: usize = 3;

pub fn summarize_artist(artist: Artist) -> ArtistSummary {
    ArtistSummary {
        image_url: first_image(&artist.images),
        genres: artist.genres.into_iter().take(MAX_GENRES).collect(),
        name: artist.name,
        popularity: artist.popularity,
        followers: artist.followers.total,
    }
}

impl SpotifyApi {
    /// The user's most played artists over `time_range`.
    pub async fn get_top_artists(
        &self,
        token: &str,
        limit: u32,
        time_range: TimeRange,
    ) -> FetchResult<Vec<ArtistSummary>> {
        let query = [
            ("limit", utils::clamp_limit(limit).to_string()),
            ("time_range", time_range.to_string()),
        ];
        let page = self
            .get_json::<Paging<Artist>>(token, "/me/top/artists", &query)
            .await;

        collect_page("top artists", page, Some(time_range), summarize_artist)
    }
}
