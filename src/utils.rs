use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::{DateTime, Utc};
use rand::{Rng, distr::Alphanumeric};
use sha2::{Digest, Sha256};

/// Upper bound Spotify accepts for `limit` on every endpoint we call.
pub const MAX_PAGE_LIMIT: u32 = 50;

pub fn generate_code_verifier() -> String {
    random_token(128)
}

pub fn generate_code_challenge(verifier: &str) -> String {
    let hash = Sha256::digest(verifier.as_bytes());
    URL_SAFE_NO_PAD.encode(hash)
}

/// Alphanumeric token used for session ids and the OAuth `state` parameter.
pub fn random_token(len: usize) -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

pub fn clamp_limit(limit: u32) -> u32 {
    limit.clamp(1, MAX_PAGE_LIMIT)
}

/// Formats a duration in milliseconds as `M:SS`.
pub fn format_duration(duration_ms: u64) -> String {
    let minutes = duration_ms / 60_000;
    let seconds = (duration_ms % 60_000) / 1000;
    format!("{minutes}:{seconds:02}")
}

pub fn format_played_at(played_at: &DateTime<Utc>) -> String {
    played_at.format("%d/%m/%Y %H:%M").to_string()
}

/// Hour of day from a `DD/MM/YYYY HH:MM` string.
pub fn hour_from_played_at(played_at: &str) -> Option<u32> {
    let (_, time) = played_at.split_once(' ')?;
    let (hour, _) = time.split_once(':')?;
    hour.parse::<u32>().ok().filter(|h| *h < 24)
}

/// Percentage of `progress_ms` over `duration_ms`, rounded to one decimal.
pub fn progress_percent(progress_ms: u64, duration_ms: u64) -> f64 {
    if duration_ms == 0 {
        return 0.0;
    }
    let percent = progress_ms as f64 / duration_ms as f64 * 100.0;
    (percent * 10.0).round() / 10.0
}
