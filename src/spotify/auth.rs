use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};

use crate::{
    config::SpotifySettings,
    error::{ConfigError, ExchangeError, RefreshError},
    types::TokenResponse,
};

/// The part of the accounts service the login flow depends on.
#[async_trait]
pub trait TokenEndpoint: Send + Sync {
    /// Trades an authorization code (plus its PKCE verifier) for tokens.
    async fn exchange_code(
        &self,
        code: &str,
        code_verifier: &str,
    ) -> Result<TokenResponse, ExchangeError>;

    /// Requests a new access token with a refresh token.
    async fn refresh(&self, refresh_token: &str) -> Result<TokenResponse, RefreshError>;
}

/// Client for `accounts.spotify.com`.
#[derive(Debug, Clone)]
pub struct SpotifyAccounts {
    http: Client,
    authorize_url: Url,
    token_url: String,
    client_id: String,
    client_secret: String,
    redirect_uri: String,
    scope: String,
}

impl SpotifyAccounts {
    pub fn new(settings: &SpotifySettings) -> Result<Self, ConfigError> {
        let authorize_url =
            Url::parse(&settings.auth_url).map_err(|e| ConfigError::InvalidUrl {
                value: settings.auth_url.clone(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            http: Client::new(),
            authorize_url,
            token_url: settings.token_url.clone(),
            client_id: settings.client_id.clone(),
            client_secret: settings.client_secret.clone(),
            redirect_uri: settings.redirect_uri.clone(),
            scope: settings.scope.clone(),
        })
    }

    /// Consent screen URL for one login attempt.
    pub fn authorize_url(&self, csrf_state: &str, code_challenge: &str) -> String {
        let mut url = self.authorize_url.clone();
        url.query_pairs_mut()
            .append_pair("client_id", &self.client_id)
            .append_pair("response_type", "code")
            .append_pair("redirect_uri", &self.redirect_uri)
            .append_pair("scope", &self.scope)
            .append_pair("state", csrf_state)
            .append_pair("code_challenge_method", "S256")
            .append_pair("code_challenge", code_challenge)
            .append_pair("show_dialog", "true");
        url.into()
    }

    async fn request_token(&self, form: &[(&str, &str)]) -> Result<TokenResponse, TokenFailure> {
        let res = self
            .http
            .post(&self.token_url)
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .form(form)
            .send()
            .await
            .map_err(TokenFailure::Transport)?;

        let status = res.status();
        let body = res.text().await.map_err(TokenFailure::Transport)?;
        if !status.is_success() {
            return Err(TokenFailure::Rejected { status, body });
        }

        serde_json::from_str::<TokenResponse>(&body)
            .map_err(|e| TokenFailure::Malformed(e.to_string()))
    }
}

#[async_trait]
impl TokenEndpoint for SpotifyAccounts {
    async fn exchange_code(
        &self,
        code: &str,
        code_verifier: &str,
    ) -> Result<TokenResponse, ExchangeError> {
        let form = [
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", self.redirect_uri.as_str()),
            ("code_verifier", code_verifier),
        ];

        self.request_token(&form).await.map_err(|failure| match failure {
            TokenFailure::Rejected { status, body } => ExchangeError::Rejected { status, body },
            TokenFailure::Transport(e) => ExchangeError::Transport(e),
            TokenFailure::Malformed(e) => ExchangeError::Malformed(e),
        })
    }

    async fn refresh(&self, refresh_token: &str) -> Result<TokenResponse, RefreshError> {
        let form = [
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
        ];

        self.request_token(&form).await.map_err(|failure| match failure {
            TokenFailure::Rejected { status, body } => RefreshError::Rejected { status, body },
            TokenFailure::Transport(e) => RefreshError::Transport(e),
            TokenFailure::Malformed(e) => RefreshError::Malformed(e),
        })
    }
}

enum TokenFailure {
    Rejected { status: StatusCode, body: String },
    Transport(reqwest::Error),
    Malformed(String),
}
