use std::{
    collections::HashMap,
    sync::Arc,
    time::{Duration, Instant},
};

use tokio::sync::Mutex;

use crate::{
    types::{ChatMessage, ChatRole, ProfileSummary},
    utils,
};

use super::AuthFlow;

pub const SESSION_ID_LEN: usize = 48;

/// Sessions untouched for this long are dropped when a new one is created.
pub const SESSION_IDLE_TTL: Duration = Duration::from_secs(12 * 60 * 60);

/// A session context behind its own lock. Holding the lock for the whole of
/// a request serializes that session's actions.
pub type SessionHandle = Arc<Mutex<Session>>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserInfo {
    pub id: String,
    pub display_name: String,
    pub image_url: Option<String>,
}

/// Everything the server remembers about one browser session.
#[derive(Debug)]
pub struct Session {
    id: String,
    pub auth: AuthFlow,
    user: Option<UserInfo>,
    transcript: Vec<ChatMessage>,
}

impl Session {
    pub fn new(id: String) -> Self {
        Self {
            id,
            auth: AuthFlow::new(),
            user: None,
            transcript: Vec::new(),
        }
    }

    /// A session that lives for one request only. Requests without a known
    /// session id get one of these so the store only grows on `/login`.
    pub fn transient() -> Self {
        Self::new(String::new())
    }

    pub fn is_transient(&self) -> bool {
        self.id.is_empty()
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn user(&self) -> Option<&UserInfo> {
        self.user.as_ref()
    }

    pub fn set_user(&mut self, profile: &ProfileSummary) {
        let image_url = Some(profile.image_url.clone()).filter(|url| !url.is_empty());
        self.user = Some(UserInfo {
            id: profile.id.clone(),
            display_name: profile.display_name.clone(),
            image_url,
        });
    }

    pub fn transcript(&self) -> &[ChatMessage] {
        &self.transcript
    }

    pub fn push_message(&mut self, role: ChatRole, content: impl Into<String>) {
        self.transcript.push(ChatMessage {
            role,
            content: content.into(),
        });
    }

    pub fn clear_transcript(&mut self) {
        self.transcript.clear();
    }

    /// Forgets who the user is and what they talked about. Called whenever
    /// the session stops being authenticated.
    pub fn reset_identity(&mut self) {
        self.user = None;
        self.transcript.clear();
    }

    /// Drops credentials and everything learned about the user.
    pub fn logout(&mut self) {
        self.auth.logout();
        self.reset_identity();
    }
}

#[derive(Debug)]
struct SessionEntry {
    handle: SessionHandle,
    last_seen: Instant,
}

/// Process-wide map from session id to session context.
#[derive(Debug)]
pub struct SessionStore {
    sessions: Mutex<HashMap<String, SessionEntry>>,
    idle_ttl: Duration,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(SESSION_IDLE_TTL)
    }
}

impl SessionStore {
    pub fn new(idle_ttl: Duration) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            idle_ttl,
        }
    }

    /// The stored session for `id`, marking it as seen.
    pub async fn get(&self, id: &str) -> Option<SessionHandle> {
        let mut sessions = self.sessions.lock().await;
        let entry = sessions.get_mut(id)?;
        entry.last_seen = Instant::now();
        Some(Arc::clone(&entry.handle))
    }

    /// Stores a fresh session under a new random id. Idle sessions are
    /// pruned first.
    pub async fn create(&self) -> (String, SessionHandle) {
        let now = Instant::now();
        let mut sessions = self.sessions.lock().await;

        let idle_ttl = self.idle_ttl;
        sessions.retain(|_, entry| now.duration_since(entry.last_seen) < idle_ttl);

        let id = utils::random_token(SESSION_ID_LEN);
        let handle = Arc::new(Mutex::new(Session::new(id.clone())));
        sessions.insert(
            id.clone(),
            SessionEntry {
                handle: Arc::clone(&handle),
                last_seen: now,
            },
        );

        (id, handle)
    }

    pub async fn remove(&self, id: &str) -> bool {
        self.sessions.lock().await.remove(id).is_some()
    }

    pub async fn len(&self) -> usize {
        self.sessions.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
