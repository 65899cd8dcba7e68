use crate::{
    types::{FetchResult, Paging, Playlist, PlaylistSummary},
    utils,
};

use super::{SpotifyApi, collect_page, first_image};

pub fn summarize_playlist(playlist: Playlist) -> PlaylistSummary {
    PlaylistSummary {
        image_url: playlist.images.as_deref().and_then(first_image),
        name: playlist.name,
        description: playlist.description.unwrap_or_default(),
        tracks: playlist.tracks.total,
    }
}

impl SpotifyApi {
    /// First page of playlists owned or followed by the user.
    pub async fn get_playlists(&self, token: &str, limit: u32) -> FetchResult<Vec<PlaylistSummary>> {
        let query = [("limit", utils::clamp_limit(limit).to_string())];
        let page = self
            .get_json::<Paging<Playlist>>(token, "/me/playlists", &query)
            .await;

        collect_page("playlists", page, None, summarize_playlist)
    }
}
