use std::{collections::HashMap, sync::Arc};

use chrono::{DateTime, Duration, Utc};
use tokio::sync::{broadcast, RwLock};
use uuid::Uuid;

use crate::{
    config::Config,
    models::usermodel::{Session, UserRole},
};

const EVENT_CAPACITY: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    LoggedIn { session_id: Uuid, role: UserRole },
    LoggedOut { session_id: Uuid, role: UserRole },
}

/// Demo login: checks the two configured credential pairs.
/// Returns the role and, for the ambassador, the linked influencer id.
pub fn authenticate(config: &Config, email: &str, password: &str) -> Option<(UserRole, Option<String>)> {
    let email = email.trim();
    if email.eq_ignore_ascii_case(&config.admin_account.email) && password == config.admin_account.password {
        return Some((UserRole::Admin, None));
    }
    if email.eq_ignore_ascii_case(&config.ambassador_account.email)
        && password == config.ambassador_account.password
    {
        return Some((UserRole::Ambassador, Some(config.ambassador_influencer_id.clone())));
    }
    None
}

/// Live login sessions. Tokens carry the session id, so logging out
/// revokes the token even before it expires.
#[derive(Debug)]
pub struct SessionStore {
    sessions: RwLock<HashMap<Uuid, Session>>,
    events: broadcast::Sender<SessionEvent>,
    /// Matches the token lifetime.
    max_age: Duration,
}

impl SessionStore {
    pub fn new(max_age_minutes: i64) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        SessionStore {
            sessions: RwLock::new(HashMap::new()),
            events,
            max_age: Duration::minutes(max_age_minutes),
        }
    }

    fn is_expired(&self, session: &Session, now: DateTime<Utc>) -> bool {
        session.created_at + self.max_age <= now
    }

    pub async fn open(&self, email: &str, role: UserRole, influencer_id: Option<String>) -> Session {
        let now = Utc::now();
        let session = Session {
            id: Uuid::new_v4(),
            email: email.to_string(),
            role,
            influencer_id,
            created_at: now,
        };

        let mut sessions = self.sessions.write().await;
        sessions.retain(|_, s| !self.is_expired(s, now));
        sessions.insert(session.id, session.clone());
        drop(sessions);
        // No receivers is fine.
        let _ = self.events.send(SessionEvent::LoggedIn {
            session_id: session.id,
            role,
        });

        session
    }

    pub async fn get(&self, session_id: Uuid) -> Option<Session> {
        self.get_at(session_id, Utc::now()).await
    }

    async fn get_at(&self, session_id: Uuid, now: DateTime<Utc>) -> Option<Session> {
        self.sessions
            .read()
            .await
            .get(&session_id)
            .filter(|s| !self.is_expired(s, now))
            .cloned()
    }

    /// Drops sessions whose token has run out. Returns how many went.
    pub async fn remove_expired(&self, now: DateTime<Utc>) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, s| !self.is_expired(s, now));
        before - sessions.len()
    }

    pub fn start_cleanup_task(self: Arc<Self>) {
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(std::time::Duration::from_secs(3600));
            loop {
                interval.tick().await;
                let removed = self.remove_expired(Utc::now()).await;
                if removed > 0 {
                    tracing::debug!("Removed {} expired sessions, {} still open", removed, self.count().await);
                }
            }
        });
    }

    pub async fn close(&self, session_id: Uuid) -> Option<Session> {
        let removed = self.sessions.write().await.remove(&session_id);
        if let Some(session) = &removed {
            let _ = self.events.send(SessionEvent::LoggedOut {
                session_id,
                role: session.role,
            });
        }
        removed
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    pub async fn count(&self) -> usize {
        self.sessions.read().await.len()
    }
}
