use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use crate::{
    types::{ArtistSummary, PlaylistSummary, TrackSummary},
    utils,
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackStats {
    pub total_tracks: usize,
    pub average_popularity: f64,
    pub total_minutes: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArtistStats {
    pub total_artists: usize,
    pub average_popularity: f64,
    pub total_followers: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenreCount {
    pub genre: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaylistStats {
    pub total_playlists: usize,
    pub total_tracks: u64,
    pub average_tracks: f64,
}

/// Keeps tracks whose name or artist contains `search` (case-insensitive)
/// and whose popularity is at least `min_popularity`.
pub fn filter_tracks(
    tracks: &[TrackSummary],
    search: &str,
    min_popularity: u32,
) -> Vec<TrackSummary> {
    let needle = search.to_lowercase();
    tracks
        .iter()
        .filter(|t| t.popularity >= min_popularity)
        .filter(|t| {
            t.name.to_lowercase().contains(&needle) || t.artist.to_lowercase().contains(&needle)
        })
        .cloned()
        .collect()
}

pub fn filter_artists(
    artists: &[ArtistSummary],
    search: &str,
    min_popularity: u32,
) -> Vec<ArtistSummary> {
    let needle = search.to_lowercase();
    artists
        .iter()
        .filter(|a| a.popularity >= min_popularity && a.name.to_lowercase().contains(&needle))
        .cloned()
        .collect()
}

pub fn track_stats(tracks: &[TrackSummary]) -> TrackStats {
    let total_ms: u64 = tracks.iter().map(|t| t.duration_ms).sum();
    TrackStats {
        total_tracks: tracks.len(),
        average_popularity: average(tracks.iter().map(|t| f64::from(t.popularity)), tracks.len()),
        total_minutes: total_ms as f64 / 60_000.0,
    }
}

pub fn artist_stats(artists: &[ArtistSummary]) -> ArtistStats {
    ArtistStats {
        total_artists: artists.len(),
        average_popularity: average(
            artists.iter().map(|a| f64::from(a.popularity)),
            artists.len(),
        ),
        total_followers: artists.iter().map(|a| a.followers).sum(),
    }
}

/// The `top` most frequent genres, most frequent first, ties by name.
pub fn genre_counts(artists: &[ArtistSummary], top: usize) -> Vec<GenreCount> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for genre in artists.iter().flat_map(|a| a.genres.iter()) {
        *counts.entry(genre.as_str()).or_insert(0) += 1;
    }

    let mut counts: Vec<GenreCount> = counts
        .into_iter()
        .map(|(genre, count)| GenreCount {
            genre: genre.to_string(),
            count,
        })
        .collect();
    counts.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.genre.cmp(&b.genre)));
    counts.truncate(top);
    counts
}

/// Plays per hour of day. Empty when no `played_at` could be read,
/// otherwise every hour 0..=23 is present.
pub fn hour_distribution(tracks: &[TrackSummary]) -> BTreeMap<u32, usize> {
    let hours: Vec<u32> = tracks
        .iter()
        .filter_map(|t| t.played_at.as_deref())
        .filter_map(utils::hour_from_played_at)
        .collect();

    if hours.is_empty() {
        return BTreeMap::new();
    }

    let mut distribution: BTreeMap<u32, usize> = (0..24).map(|h| (h, 0)).collect();
    for hour in hours {
        *distribution.entry(hour).or_insert(0) += 1;
    }
    distribution
}

pub fn playlist_stats(playlists: &[PlaylistSummary]) -> PlaylistStats {
    PlaylistStats {
        total_playlists: playlists.len(),
        total_tracks: playlists.iter().map(|p| p.tracks).sum(),
        average_tracks: average(playlists.iter().map(|p| p.tracks as f64), playlists.len()),
    }
}

fn average(values: impl Iterator<Item = f64>, count: usize) -> f64 {
    if count == 0 {
        return 0.0;
    }
    values.sum::<f64>() / count as f64
}
