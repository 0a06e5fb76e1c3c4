//! In-memory anonymous map sessions.

use crate::audio::AudioToggleController;
use crate::map::MapPresenter;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use super::metrics::set_active_sessions;

/// Everything one browser tab can change: viewport, selection and sounds.
#[derive(Debug)]
pub struct MapSession {
    pub presenter: MapPresenter,
    pub audio: AudioToggleController,
    last_seen: Instant,
}

/// Upper bound on live sessions; the least recently used one makes room.
pub const DEFAULT_MAX_SESSIONS: usize = 10_000;

pub struct SessionStore {
    sessions: Mutex<HashMap<String, MapSession>>,
    idle_timeout: Duration,
    max_sessions: usize,
}

impl SessionStore {
    pub fn new(idle_timeout: Duration) -> SessionStore {
        SessionStore::with_limit(idle_timeout, DEFAULT_MAX_SESSIONS)
    }

    pub fn with_limit(idle_timeout: Duration, max_sessions: usize) -> SessionStore {
        SessionStore {
            sessions: Mutex::new(HashMap::new()),
            idle_timeout,
            max_sessions: max_sessions.max(1),
        }
    }

    pub fn idle_timeout(&self) -> Duration {
        self.idle_timeout
    }

    fn prune_locked(&self, sessions: &mut HashMap<String, MapSession>) -> usize {
        let before = sessions.len();
        let now = Instant::now();
        let idle_timeout = self.idle_timeout;
        sessions.retain(|_, s| now.duration_since(s.last_seen) <= idle_timeout);
        before - sessions.len()
    }

    /// Drops every session idle for longer than the timeout.
    pub fn prune_idle(&self) -> usize {
        let mut sessions = self.lock();
        let pruned = self.prune_locked(&mut sessions);
        if pruned > 0 {
            info!("Pruned {} idle map sessions", pruned);
            set_active_sessions(sessions.len());
        }
        pruned
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, MapSession>> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Registers a fresh session and returns its token.
    pub fn create(&self, presenter: MapPresenter) -> String {
        let token = uuid::Uuid::new_v4().to_string();
        let mut sessions = self.lock();

        let pruned = self.prune_locked(&mut sessions);
        if pruned > 0 {
            info!("Pruned {} idle map sessions", pruned);
        }
        while sessions.len() >= self.max_sessions {
            let Some(oldest) = sessions
                .iter()
                .min_by_key(|(_, s)| s.last_seen)
                .map(|(token, _)| token.clone())
            else {
                break;
            };
            warn!("Session limit reached, evicting {}", oldest);
            sessions.remove(&oldest);
        }

        sessions.insert(
            token.clone(),
            MapSession {
                presenter,
                audio: AudioToggleController::new(),
                last_seen: Instant::now(),
            },
        );
        set_active_sessions(sessions.len());
        debug!("Created map session {}", token);
        token
    }

    pub fn remove(&self, token: &str) -> bool {
        let mut sessions = self.lock();
        let removed = sessions.remove(token).is_some();
        set_active_sessions(sessions.len());
        removed
    }

    pub fn contains(&self, token: &str) -> bool {
        self.lock().contains_key(token)
    }

    /// Runs `f` on the session under the store lock; `None` if the token is unknown.
    pub fn with_session<R>(&self, token: &str, f: impl FnOnce(&mut MapSession) -> R) -> Option<R> {
        let mut sessions = self.lock();
        let session = sessions.get_mut(token)?;
        session.last_seen = Instant::now();
        Some(f(session))
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}
