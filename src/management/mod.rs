mod auth;
mod credentials;
mod session;

pub use auth::AuthFlow;
pub use auth::AuthState;
pub use auth::LoginRequest;
pub use auth::REFRESH_MARGIN_SECS;
pub use credentials::CredentialCache;
pub use session::SESSION_IDLE_TTL;
pub use session::Session;
pub use session::SessionHandle;
pub use session::SessionStore;
pub use session::UserInfo;
