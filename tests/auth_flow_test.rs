use std::sync::{
    Mutex,
    atomic::{AtomicUsize, Ordering},
};

use async_trait::async_trait;
use spotinsight::{
    error::{AuthError, ExchangeError, RefreshError},
    management::{AuthFlow, AuthState, CredentialCache, REFRESH_MARGIN_SECS},
    spotify::auth::TokenEndpoint,
    types::{CredentialRecord, TokenResponse},
};

const NOW: i64 = 1_700_000_000;

// Token endpoint double that counts calls and remembers what it was sent
#[derive(Default)]
struct FakeEndpoint {
    exchanges: AtomicUsize,
    refreshes: AtomicUsize,
    fail_exchange: bool,
    fail_refresh: bool,
    omit_refresh_token: bool,
    last_verifier: Mutex<Option<String>>,
}

impl FakeEndpoint {
    fn failing_refresh() -> Self {
        Self {
            fail_refresh: true,
            ..Default::default()
        }
    }

    fn exchanges(&self) -> usize {
        self.exchanges.load(Ordering::SeqCst)
    }

    fn refreshes(&self) -> usize {
        self.refreshes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TokenEndpoint for FakeEndpoint {
    async fn exchange_code(
        &self,
        code: &str,
        code_verifier: &str,
    ) -> Result<TokenResponse, ExchangeError> {
        self.exchanges.fetch_add(1, Ordering::SeqCst);
        *self.last_verifier.lock().unwrap() = Some(code_verifier.to_string());
        if self.fail_exchange {
            return Err(ExchangeError::Malformed("boom".to_string()));
        }
        Ok(TokenResponse {
            access_token: format!("access-{code}"),
            refresh_token: Some("refresh-1".to_string()),
            scope: Some("user-top-read".to_string()),
            expires_in: 3600,
        })
    }

    async fn refresh(&self, refresh_token: &str) -> Result<TokenResponse, RefreshError> {
        let n = self.refreshes.fetch_add(1, Ordering::SeqCst) + 1;
        if self.fail_refresh {
            return Err(RefreshError::Malformed("revoked".to_string()));
        }
        Ok(TokenResponse {
            access_token: format!("refreshed-{n}-from-{refresh_token}"),
            refresh_token: if self.omit_refresh_token {
                None
            } else {
                Some(format!("refresh-{}", n + 1))
            },
            scope: None,
            expires_in: 3600,
        })
    }
}

async fn logged_in(endpoint: &FakeEndpoint) -> AuthFlow {
    let mut flow = AuthFlow::new();
    let request = flow.begin_login();
    flow.complete_login(endpoint, "code", &request.csrf_state, NOW)
        .await
        .unwrap();
    flow
}

#[test]
fn test_credential_cache_put_get_clear() {
    let mut cache = CredentialCache::new();
    assert!(cache.is_empty());
    assert!(cache.get().is_none());

    let record = CredentialRecord {
        access_token: "a".to_string(),
        refresh_token: "r".to_string(),
        expires_at: NOW + 3600,
        scope: String::new(),
    };
    assert_eq!(cache.put(record.clone()), &record);
    assert_eq!(cache.get(), Some(&record));

    cache.clear();
    assert!(cache.is_empty());
    assert!(cache.get().is_none());
}

#[test]
fn test_expires_within_margin() {
    let record = CredentialRecord {
        access_token: "a".to_string(),
        refresh_token: "r".to_string(),
        expires_at: NOW + REFRESH_MARGIN_SECS + 1,
        scope: String::new(),
    };
    assert!(!record.expires_within(NOW, REFRESH_MARGIN_SECS));
    assert!(record.expires_within(NOW + 1, REFRESH_MARGIN_SECS));
    assert!(record.expires_within(NOW + 10_000, REFRESH_MARGIN_SECS));
}

#[test]
fn test_extreme_expiry_values_do_not_overflow() {
    let response = TokenResponse {
        access_token: "a".to_string(),
        refresh_token: Some("r".to_string()),
        scope: None,
        expires_in: i64::MAX,
    };
    let record = response.into_record(NOW, None);
    assert_eq!(record.expires_at, i64::MAX);
    assert!(!record.expires_within(NOW, REFRESH_MARGIN_SECS));
    assert!(!record.expires_within(i64::MIN, REFRESH_MARGIN_SECS));

    let stale = CredentialRecord {
        expires_at: i64::MIN,
        ..record
    };
    assert!(stale.expires_within(i64::MAX, REFRESH_MARGIN_SECS));
    assert!(stale.expires_within(NOW, REFRESH_MARGIN_SECS));
}

#[test]
fn test_token_response_keeps_previous_refresh_token() {
    let response = TokenResponse {
        access_token: "new".to_string(),
        refresh_token: None,
        scope: None,
        expires_in: 3600,
    };
    let record = response.into_record(NOW, Some("old-refresh"));
    assert_eq!(record.refresh_token, "old-refresh");
    assert_eq!(record.expires_at, NOW + 3600);

    let response = TokenResponse {
        access_token: "new".to_string(),
        refresh_token: Some(String::new()),
        scope: None,
        expires_in: 60,
    };
    assert_eq!(
        response.into_record(NOW, Some("old-refresh")).refresh_token,
        "old-refresh"
    );
}

#[test]
fn test_begin_login_awaits_callback_and_clears_cache() {
    let mut flow = AuthFlow::new();
    assert_eq!(flow.state(), &AuthState::Unauthenticated);

    let request = flow.begin_login();
    assert!(!request.csrf_state.is_empty());
    assert!(!request.code_challenge.is_empty());
    assert!(flow.credentials().is_empty());

    match flow.state() {
        AuthState::AwaitingCallback { csrf_state, .. } => {
            assert_eq!(csrf_state, &request.csrf_state)
        }
        other => panic!("unexpected state {other:?}"),
    }

    // A second attempt gets a different state parameter
    let again = flow.begin_login();
    assert_ne!(again.csrf_state, request.csrf_state);
}

#[tokio::test]
async fn test_complete_login_stores_credentials() {
    let endpoint = FakeEndpoint::default();
    let mut flow = AuthFlow::new();
    let request = flow.begin_login();

    let record = flow
        .complete_login(&endpoint, "abc", &request.csrf_state, NOW)
        .await
        .unwrap();
    assert_eq!(record.access_token, "access-abc");
    assert_eq!(record.refresh_token, "refresh-1");
    assert_eq!(record.expires_at, NOW + 3600);

    assert!(flow.is_authenticated());
    assert_eq!(endpoint.exchanges(), 1);

    // The verifier sent to the token endpoint matches the challenge
    let verifier = endpoint.last_verifier.lock().unwrap().clone().unwrap();
    assert_eq!(
        spotinsight::utils::generate_code_challenge(&verifier),
        request.code_challenge
    );
}

#[tokio::test]
async fn test_state_mismatch_never_calls_token_endpoint() {
    let endpoint = FakeEndpoint::default();
    let mut flow = AuthFlow::new();
    flow.begin_login();

    let err = flow
        .complete_login(&endpoint, "abc", "forged-state", NOW)
        .await
        .unwrap_err();

    assert!(matches!(err, ExchangeError::StateMismatch));
    assert_eq!(endpoint.exchanges(), 0);
    assert_eq!(flow.state(), &AuthState::Unauthenticated);
    assert!(flow.credentials().get().is_none());
}

#[tokio::test]
async fn test_callback_without_pending_login_leaves_session_unchanged() {
    let endpoint = FakeEndpoint::default();
    let mut flow = logged_in(&endpoint).await;
    let before = flow.credentials().get().cloned();

    let err = flow
        .complete_login(&endpoint, "replayed", "whatever", NOW)
        .await
        .unwrap_err();

    assert!(matches!(err, ExchangeError::NotAwaitingCallback));
    assert_eq!(endpoint.exchanges(), 1);
    assert!(flow.is_authenticated());
    assert_eq!(flow.credentials().get().cloned(), before);
}

#[tokio::test]
async fn test_failed_exchange_returns_to_unauthenticated() {
    let endpoint = FakeEndpoint {
        fail_exchange: true,
        ..Default::default()
    };
    let mut flow = AuthFlow::new();
    let request = flow.begin_login();

    let err = flow
        .complete_login(&endpoint, "abc", &request.csrf_state, NOW)
        .await
        .unwrap_err();

    assert!(matches!(err, ExchangeError::Malformed(_)));
    assert_eq!(flow.state(), &AuthState::Unauthenticated);
    assert!(flow.credentials().is_empty());
}

#[test]
fn test_deny_login() {
    let mut flow = AuthFlow::new();
    flow.begin_login();

    let err = flow.deny_login("access_denied");
    assert!(matches!(err, ExchangeError::Denied(ref reason) if reason == "access_denied"));
    assert_eq!(flow.state(), &AuthState::Unauthenticated);
}

#[tokio::test]
async fn test_ensure_fresh_without_login() {
    let endpoint = FakeEndpoint::default();
    let mut flow = AuthFlow::new();

    let err = flow.ensure_fresh(&endpoint, NOW).await.unwrap_err();
    assert!(matches!(err, AuthError::NotAuthenticated));
    assert_eq!(endpoint.refreshes(), 0);
}

#[tokio::test]
async fn test_ensure_fresh_does_not_refresh_valid_token() {
    let endpoint = FakeEndpoint::default();
    let mut flow = logged_in(&endpoint).await;

    let record = flow.ensure_fresh(&endpoint, NOW + 60).await.unwrap();
    assert_eq!(record.access_token, "access-code");
    assert_eq!(endpoint.refreshes(), 0);
}

#[tokio::test]
async fn test_ensure_fresh_refreshes_inside_margin_exactly_once() {
    let endpoint = FakeEndpoint::default();
    let mut flow = logged_in(&endpoint).await;

    // 200 seconds left, inside the refresh margin
    let later = NOW + 3600 - 200;
    let record = flow.ensure_fresh(&endpoint, later).await.unwrap();
    assert_eq!(record.access_token, "refreshed-1-from-refresh-1");
    assert_eq!(record.refresh_token, "refresh-2");
    assert_eq!(record.expires_at, later + 3600);
    assert_eq!(endpoint.refreshes(), 1);

    // The new record is fresh; no second refresh
    flow.ensure_fresh(&endpoint, later + 1).await.unwrap();
    assert_eq!(endpoint.refreshes(), 1);
}

#[tokio::test]
async fn test_refresh_without_new_refresh_token_keeps_old_one() {
    let endpoint = FakeEndpoint {
        omit_refresh_token: true,
        ..Default::default()
    };
    let mut flow = logged_in(&endpoint).await;

    let record = flow.ensure_fresh(&endpoint, NOW + 7200).await.unwrap();
    assert_eq!(record.refresh_token, "refresh-1");
}

#[tokio::test]
async fn test_failed_refresh_clears_credentials() {
    let endpoint = FakeEndpoint::failing_refresh();
    let mut flow = logged_in(&endpoint).await;

    let err = flow.ensure_fresh(&endpoint, NOW + 7200).await.unwrap_err();
    assert!(matches!(err, AuthError::Refresh(_)));
    assert_eq!(endpoint.refreshes(), 1);
    assert_eq!(flow.state(), &AuthState::Unauthenticated);
    assert!(flow.credentials().get().is_none());

    // Later calls report a missing login instead of refreshing again
    let err = flow.ensure_fresh(&endpoint, NOW + 7200).await.unwrap_err();
    assert!(matches!(err, AuthError::NotAuthenticated));
    assert_eq!(endpoint.refreshes(), 1);
}

#[tokio::test]
async fn test_logout_clears_credentials() {
    let endpoint = FakeEndpoint::default();
    let mut flow = logged_in(&endpoint).await;
    assert!(flow.credentials().get().is_some());

    flow.logout();
    assert!(flow.credentials().get().is_none());
    assert!(!flow.is_authenticated());
}
