use std::collections::HashMap;

use chrono::{TimeZone, Utc};
use serde::{Serialize, Serializer, ser::Error as _};
use serde_json::{Value, json};
use spotinsight::{
    insights::{
        InsightContext, InsightTopic, compose_prompt,
        chat::ContextPlan,
        stats::{
            filter_artists, filter_tracks, genre_counts, hour_distribution, playlist_stats,
            track_stats,
        },
        to_context_text,
    },
    types::{ArtistSummary, PlaylistSummary, TrackSummary},
};

fn track(name: &str, artist: &str, popularity: u32, played_at: Option<&str>) -> TrackSummary {
    TrackSummary {
        name: name.to_string(),
        artist: artist.to_string(),
        album: "Album".to_string(),
        duration: "3:00".to_string(),
        duration_ms: 180_000,
        popularity,
        image_url: None,
        played_at: played_at.map(str::to_string),
        is_playing: false,
    }
}

fn artist(name: &str, popularity: u32, genres: &[&str]) -> ArtistSummary {
    ArtistSummary {
        name: name.to_string(),
        genres: genres.iter().map(|g| g.to_string()).collect(),
        popularity,
        followers: 100,
        image_url: None,
    }
}

fn playlist(name: &str, tracks: u64) -> PlaylistSummary {
    PlaylistSummary {
        name: name.to_string(),
        description: String::new(),
        tracks,
        image_url: None,
    }
}

#[test]
fn test_context_serializes_timestamps_as_text() {
    let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap();
    let context = InsightContext::new().with("fetched_at", &at);

    assert_eq!(
        context.get("fetched_at"),
        Some(&Value::String("2024-05-01T12:30:00Z".to_string()))
    );
    assert!(context.to_text().contains("2024-05-01T12:30:00Z"));
}

#[test]
fn test_context_stringifies_non_string_map_keys() {
    let mut pairs: HashMap<(u32, u32), &str> = HashMap::new();
    pairs.insert((1, 2), "odd key");

    let mut context = InsightContext::new();
    context.insert("pairs", &pairs).insert("count", &1);

    assert_eq!(context.get("pairs"), Some(&json!({ "[1,2]": "odd key" })));
    assert_eq!(context.get("count"), Some(&json!(1)));
    assert_eq!(context.len(), 2);

    // The whole-value helper never fails either
    assert!(to_context_text(&pairs).contains("odd key"));
}

#[derive(Debug, Serialize)]
struct Section {
    total: u32,
    pairs: HashMap<(u32, u32), &'static str>,
    ratio: f64,
}

#[test]
fn test_context_keeps_good_fields_next_to_awkward_ones() {
    let section = Section {
        total: 7,
        pairs: HashMap::from([((1, 2), "odd")]),
        ratio: f64::NAN,
    };
    let context = InsightContext::new().with("section", &section);

    let Some(Value::Object(fields)) = context.get("section") else {
        panic!("section should stay an object");
    };
    assert_eq!(fields["total"], json!(7));
    assert_eq!(fields["pairs"], json!({ "[1,2]": "odd" }));
    assert_eq!(fields["ratio"], json!("NaN"));
}

struct Broken;

impl Serialize for Broken {
    fn serialize<S: Serializer>(&self, _serializer: S) -> Result<S::Ok, S::Error> {
        Err(S::Error::custom("sensor offline"))
    }
}

#[derive(Serialize)]
struct Reading {
    name: &'static str,
    value: Broken,
    history: Vec<u32>,
}

impl std::fmt::Debug for Reading {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Reading")
    }
}

#[test]
fn test_context_replaces_only_the_failing_field() {
    let reading = Reading {
        name: "kitchen",
        value: Broken,
        history: vec![1, 2],
    };
    let context = InsightContext::new().with("reading", &reading);

    let Some(Value::Object(fields)) = context.get("reading") else {
        panic!("reading should stay an object");
    };
    assert_eq!(fields["name"], json!("kitchen"));
    assert_eq!(fields["history"], json!([1, 2]));
    let Value::String(text) = &fields["value"] else {
        panic!("failing field should become a string");
    };
    assert!(text.contains("sensor offline"));
}

#[test]
fn test_context_text_is_pretty_json() {
    let context = InsightContext::new()
        .with("tracks", &vec![track("Song", "Band", 10, None)])
        .with("total", &1);

    let text = context.to_text();
    let parsed: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(parsed["total"], json!(1));
    assert_eq!(parsed["tracks"][0]["name"], json!("Song"));
    assert!(text.contains('\n'));
}

#[test]
fn test_compose_prompt_includes_question_and_data() {
    let context = InsightContext::new().with("top_artists", &vec!["Nina Simone"]);
    let prompt = compose_prompt("Who do I listen to most?", &context);

    assert!(prompt.contains("USER QUESTION: Who do I listen to most?"));
    assert!(prompt.contains("Nina Simone"));
    assert!(prompt.trim_end().ends_with("ANSWER:"));
}

#[test]
fn test_filter_tracks() {
    let tracks = vec![
        track("Blue Monday", "New Order", 80, None),
        track("Blue", "Joni Mitchell", 40, None),
        track("Heroes", "David Bowie", 90, None),
    ];

    assert_eq!(filter_tracks(&tracks, "", 0).len(), 3);
    assert_eq!(filter_tracks(&tracks, "blue", 0).len(), 2);
    assert_eq!(filter_tracks(&tracks, "BLUE", 50).len(), 1);
    assert_eq!(filter_tracks(&tracks, "bowie", 0)[0].name, "Heroes");
    assert!(filter_tracks(&tracks, "", 95).is_empty());
}

#[test]
fn test_filter_artists() {
    let artists = vec![artist("Radiohead", 80, &[]), artist("Radio Dept.", 30, &[])];
    assert_eq!(filter_artists(&artists, "radio", 0).len(), 2);
    assert_eq!(filter_artists(&artists, "radio", 50).len(), 1);
}

#[test]
fn test_track_stats() {
    let tracks = vec![track("a", "x", 40, None), track("b", "y", 60, None)];
    let stats = track_stats(&tracks);

    assert_eq!(stats.total_tracks, 2);
    assert_eq!(stats.average_popularity, 50.0);
    assert_eq!(stats.total_minutes, 6.0);

    let empty = track_stats(&[]);
    assert_eq!(empty.total_tracks, 0);
    assert_eq!(empty.average_popularity, 0.0);
}

#[test]
fn test_genre_counts_order_and_limit() {
    let artists = vec![
        artist("a", 50, &["rock", "indie"]),
        artist("b", 50, &["indie", "pop"]),
        artist("c", 50, &["indie", "rock"]),
        artist("d", 50, &["ambient"]),
    ];

    let counts = genre_counts(&artists, 3);
    let names: Vec<(&str, usize)> = counts.iter().map(|c| (c.genre.as_str(), c.count)).collect();
    assert_eq!(names, vec![("indie", 3), ("rock", 2), ("ambient", 1)]);
}

#[test]
fn test_hour_distribution() {
    let tracks = vec![
        track("a", "x", 0, Some("07/03/2024 21:15")),
        track("b", "x", 0, Some("07/03/2024 21:50")),
        track("c", "x", 0, Some("08/03/2024 08:00")),
        track("d", "x", 0, Some("garbage")),
        track("e", "x", 0, None),
    ];

    let distribution = hour_distribution(&tracks);
    assert_eq!(distribution.len(), 24);
    assert_eq!(distribution[&21], 2);
    assert_eq!(distribution[&8], 1);
    assert_eq!(distribution[&0], 0);
    assert_eq!(distribution.values().sum::<usize>(), 3);

    assert!(hour_distribution(&[track("e", "x", 0, None)]).is_empty());
}

#[test]
fn test_playlist_stats() {
    let stats = playlist_stats(&[playlist("a", 10), playlist("b", 30)]);
    assert_eq!(stats.total_playlists, 2);
    assert_eq!(stats.total_tracks, 40);
    assert_eq!(stats.average_tracks, 20.0);

    assert_eq!(playlist_stats(&[]).average_tracks, 0.0);
}

#[test]
fn test_context_plan_keywords() {
    let plan = ContextPlan::for_question("Which songs and artists do I like?");
    assert!(plan.top_tracks);
    assert!(plan.top_artists);
    assert!(!plan.recent_tracks);
    assert!(!plan.current_track);

    let plan = ContextPlan::for_question("What is playing now?");
    assert!(plan.current_track);

    let plan = ContextPlan::for_question("Show my recent history");
    assert!(plan.recent_tracks);

    let plan = ContextPlan::for_question("Quais músicas eu ouvi recentemente?");
    assert!(plan.top_tracks);
    assert!(plan.recent_tracks);
}

#[test]
fn test_context_plan_without_keywords_is_empty() {
    assert!(ContextPlan::for_question("Tell me something about myself").is_empty());
    assert!(ContextPlan::for_question("").is_empty());
}

#[test]
fn test_insight_topic_from_path_segment() {
    let topic: InsightTopic = serde_json::from_value(json!("history")).unwrap();
    assert_eq!(topic, InsightTopic::History);
    assert!(serde_json::from_value::<InsightTopic>(json!("weather")).is_err());

    for topic in [
        InsightTopic::Dashboard,
        InsightTopic::Tracks,
        InsightTopic::Artists,
        InsightTopic::History,
        InsightTopic::Playlists,
    ] {
        assert!(!topic.question().is_empty());
    }
}
