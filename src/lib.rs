//! Spotify listening dashboard with Gemini insights.
//!
//! A local web server that signs a browser session in to Spotify, exposes the
//! user's listening data as JSON, and asks Gemini to describe it.
//!
//! # Modules
//!
//! - `api` - HTTP handlers and the session cookie middleware
//! - `cli` - Command implementations behind the binary
//! - `config` - Environment and `.env` based settings
//! - `error` - Error enums for each layer
//! - `insights` - Prompt context, Gemini client and derived statistics
//! - `management` - Per-session credential cache and OAuth state machine
//! - `server` - Router and shared application state
//! - `spotify` - Spotify accounts client and Web API facade
//! - `types` - Provider payloads and the summaries handed to the UI
//! - `utils` - PKCE helpers and formatting
//!
//! # Example
//!
//! ```
//! use spotinsight::{config, server};
//!
//! #[tokio::main]
//! async fn main() -> spotinsight::Res<()> {
//!     config::load_env().await?;
//!     let settings = config::Settings::from_env()?;
//!     let state = server::AppState::from_settings(&settings)?;
//!     server::start_api_server(state, settings.server_addr).await
//! }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod insights;
pub mod management;
pub mod server;
pub mod spotify;
pub mod types;
pub mod utils;

/// Result alias used by the server entry points and the binary.
///
/// The boxed error is `Send + Sync` so it can cross task boundaries.
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Prints an informational line with a blue `o` marker.
///
/// ```
/// info!("Listening on {}", addr);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success line with a green checkmark.
///
/// ```
/// success!("Connected to Spotify as {}", name);
/// ```
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error line with a red `!` marker and exits with status 1.
///
/// Only for startup failures the server cannot recover from. Request
/// handlers report errors in their responses instead.
///
/// ```
/// error!("Invalid configuration: {}", err);
/// // not reached
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning line with a yellow `!` marker.
///
/// Used for recoverable failures such as a single facade call failing.
///
/// ```
/// warning!("Could not load top tracks: {}", err);
/// ```
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
