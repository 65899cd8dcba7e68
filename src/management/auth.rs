use crate::{
    error::{AuthError, ExchangeError},
    spotify::auth::TokenEndpoint,
    types::CredentialRecord,
    utils,
};

use super::CredentialCache;

/// Tokens expiring within this many seconds are refreshed before use.
pub const REFRESH_MARGIN_SECS: i64 = 240;

/// Length of the OAuth `state` parameter.
const CSRF_STATE_LEN: usize = 32;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AuthState {
    #[default]
    Unauthenticated,
    /// The user was sent to the consent screen and we wait for the redirect.
    AwaitingCallback {
        csrf_state: String,
        code_verifier: String,
    },
    Authenticated,
}

impl AuthState {
    pub fn name(&self) -> &'static str {
        match self {
            AuthState::Unauthenticated => "unauthenticated",
            AuthState::AwaitingCallback { .. } => "awaiting_callback",
            AuthState::Authenticated => "authenticated",
        }
    }
}

/// Values needed to build the consent URL for a login attempt.
#[derive(Debug, Clone)]
pub struct LoginRequest {
    pub csrf_state: String,
    pub code_challenge: String,
}

/// OAuth state machine for one session.
///
/// `Authenticated` holds exactly when the credential cache is non-empty.
#[derive(Debug, Clone, Default)]
pub struct AuthFlow {
    state: AuthState,
    cache: CredentialCache,
}

impl AuthFlow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &AuthState {
        &self.state
    }

    pub fn credentials(&self) -> &CredentialCache {
        &self.cache
    }

    pub fn is_authenticated(&self) -> bool {
        self.state == AuthState::Authenticated
    }

    /// Starts a new login. Any cached credentials are dropped.
    pub fn begin_login(&mut self) -> LoginRequest {
        let csrf_state = utils::random_token(CSRF_STATE_LEN);
        let code_verifier = utils::generate_code_verifier();
        let code_challenge = utils::generate_code_challenge(&code_verifier);

        self.cache.clear();
        self.state = AuthState::AwaitingCallback {
            csrf_state: csrf_state.clone(),
            code_verifier,
        };

        LoginRequest {
            csrf_state,
            code_challenge,
        }
    }

    /// Handles the provider redirect.
    ///
    /// A callback that arrives while no login is pending leaves the session
    /// untouched. Every other failure drops back to `Unauthenticated`.
    pub async fn complete_login(
        &mut self,
        endpoint: &dyn TokenEndpoint,
        code: &str,
        returned_state: &str,
        now: i64,
    ) -> Result<&CredentialRecord, ExchangeError> {
        let code_verifier = match &self.state {
            AuthState::AwaitingCallback {
                csrf_state,
                code_verifier,
            } => {
                if csrf_state != returned_state {
                    self.logout();
                    return Err(ExchangeError::StateMismatch);
                }
                code_verifier.clone()
            }
            _ => return Err(ExchangeError::NotAwaitingCallback),
        };

        match endpoint.exchange_code(code, &code_verifier).await {
            Ok(token) => {
                self.state = AuthState::Authenticated;
                Ok(self.cache.put(token.into_record(now, None)))
            }
            Err(e) => {
                self.logout();
                Err(e)
            }
        }
    }

    /// The provider redirected back with `error=...` instead of a code.
    pub fn deny_login(&mut self, reason: &str) -> ExchangeError {
        self.logout();
        ExchangeError::Denied(reason.to_string())
    }

    /// Returns a record that is safe to use at `now`, refreshing it once if
    /// it is inside the safety margin.
    pub async fn ensure_fresh(
        &mut self,
        endpoint: &dyn TokenEndpoint,
        now: i64,
    ) -> Result<&CredentialRecord, AuthError> {
        let stale_refresh_token = match self.cache.get() {
            None => return Err(AuthError::NotAuthenticated),
            Some(record) if record.expires_within(now, REFRESH_MARGIN_SECS) => {
                Some(record.refresh_token.clone())
            }
            Some(_) => None,
        };

        if let Some(refresh_token) = stale_refresh_token {
            match endpoint.refresh(&refresh_token).await {
                Ok(token) => {
                    self.cache.put(token.into_record(now, Some(&refresh_token)));
                }
                Err(e) => {
                    self.logout();
                    return Err(AuthError::Refresh(e));
                }
            }
        }

        self.cache.get().ok_or(AuthError::NotAuthenticated)
    }

    pub fn logout(&mut self) {
        self.cache.clear();
        self.state = AuthState::Unauthenticated;
    }
}
