//! Configuration management for spotinsight.
//!
//! Values come from environment variables. Before they are read, a `.env`
//! secrets file in the local data directory (and then one in the working
//! directory) is loaded. Variables already present in the environment win
//! over both files.
//!
//! The secrets file lives at:
//! - Linux: `~/.local/share/spotinsight/.env`
//! - macOS: `~/Library/Application Support/spotinsight/.env`
//! - Windows: `%LOCALAPPDATA%/spotinsight/.env`

use std::{env, net::SocketAddr, path::PathBuf, str::FromStr};

use crate::error::ConfigError;

pub const DEFAULT_SERVER_ADDRESS: &str = "127.0.0.1:8501";
pub const DEFAULT_REDIRECT_URI: &str = "http://127.0.0.1:8501/callback";
pub const DEFAULT_SPOTIFY_API_URL: &str = "https://api.spotify.com/v1";
pub const DEFAULT_SPOTIFY_AUTH_URL: &str = "https://accounts.spotify.com/authorize";
pub const DEFAULT_SPOTIFY_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
pub const DEFAULT_GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";

/// Scopes needed by every read endpoint the dashboard calls.
pub const DEFAULT_SCOPES: &[&str] = &[
    "user-top-read",
    "user-read-recently-played",
    "user-read-currently-playing",
    "user-read-playback-state",
    "user-library-read",
    "user-read-private",
    "user-read-email",
];

/// Loads the `.env` secrets file from the local data directory, then any
/// `.env` in the working directory.
///
/// A missing file is not an error; the variables may come straight from the
/// environment.
///
/// # Errors
///
/// Returns an error string if the data directory cannot be created or an
/// existing secrets file cannot be parsed.
pub async fn load_env() -> Result<(), String> {
    let path = secrets_path();
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| e.to_string())?;
    }

    if path.is_file() {
        dotenv::from_path(&path).map_err(|e| e.to_string())?;
    }
    dotenv::dotenv().ok();

    Ok(())
}

pub fn secrets_path() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("spotinsight/.env");
    path
}

#[derive(Debug, Clone)]
pub struct SpotifySettings {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub scope: String,
    pub api_url: String,
    pub auth_url: String,
    pub token_url: String,
}

#[derive(Debug, Clone)]
pub struct GeminiSettings {
    pub api_key: String,
    pub api_url: String,
    pub model: String,
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub server_addr: SocketAddr,
    pub spotify: SpotifySettings,
    pub gemini: GeminiSettings,
}

impl Settings {
    /// Reads settings from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Reads settings through `lookup`, treating empty values as unset.
    ///
    /// # Errors
    ///
    /// Fails when `SPOTIFY_CLIENT_ID`, `SPOTIFY_CLIENT_SECRET` or
    /// `GEMINI_API_KEY` is missing, or `SERVER_ADDRESS` does not parse.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let required = |key: &'static str| get(key).ok_or(ConfigError::Missing(key));
        let or_default = |key: &str, default: &str| get(key).unwrap_or_else(|| default.to_string());

        let address = or_default("SERVER_ADDRESS", DEFAULT_SERVER_ADDRESS);
        let server_addr =
            SocketAddr::from_str(&address).map_err(|e| ConfigError::InvalidAddress {
                value: address.clone(),
                reason: e.to_string(),
            })?;

        let spotify = SpotifySettings {
            client_id: required("SPOTIFY_CLIENT_ID")?,
            client_secret: required("SPOTIFY_CLIENT_SECRET")?,
            redirect_uri: or_default("SPOTIFY_REDIRECT_URI", DEFAULT_REDIRECT_URI),
            scope: or_default("SPOTIFY_SCOPE", &DEFAULT_SCOPES.join(" ")),
            api_url: trim_base(or_default("SPOTIFY_API_URL", DEFAULT_SPOTIFY_API_URL)),
            auth_url: or_default("SPOTIFY_AUTH_URL", DEFAULT_SPOTIFY_AUTH_URL),
            token_url: or_default("SPOTIFY_TOKEN_URL", DEFAULT_SPOTIFY_TOKEN_URL),
        };

        let gemini = GeminiSettings {
            api_key: required("GEMINI_API_KEY")?,
            api_url: trim_base(or_default("GEMINI_API_URL", DEFAULT_GEMINI_API_URL)),
            model: or_default("GEMINI_MODEL", DEFAULT_GEMINI_MODEL),
        };

        Ok(Settings {
            server_addr,
            spotify,
            gemini,
        })
    }
}

fn trim_base(url: String) -> String {
    url.trim_end_matches('/').to_string()
}
