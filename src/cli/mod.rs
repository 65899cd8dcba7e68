//! # CLI Module
//!
//! Command implementations behind the `spotinsight` binary.
//!
//! - [`serve`] loads the configuration, starts the dashboard server and can
//!   open the login page in the browser.
//!
//! Shell completions are generated directly in `main.rs` from the clap
//! command definition.
//!
//! ```bash
//! spotinsight serve --open
//! spotinsight completions zsh > _spotinsight
//! ```

mod serve;

pub use serve::serve;
