//! Per-browser Surface table keyed by a session cookie.
//!
//! Each session owns its own `Surface`; nothing here is shared between users. The table is
//! bounded and evicts the least recently touched session when full.

use axum::http::{header, HeaderMap, HeaderValue};
use contentgen_core::Surface;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

pub const SESSION_COOKIE: &str = "contentgen_session";

pub type SharedSurface = Arc<Mutex<Surface>>;

struct Slot {
    surface: SharedSurface,
    last_touched: AtomicU64,
}

pub struct SessionStore {
    slots: DashMap<Uuid, Slot>,
    clock: AtomicU64,
    max_sessions: usize,
    history_limit: usize,
}

/// Result of resolving the caller's session.
pub struct SessionHandle {
    pub id: Uuid,
    pub surface: SharedSurface,
    /// True when a new session was created and the cookie must be set.
    pub created: bool,
}

impl SessionHandle {
    pub fn set_cookie(&self) -> Option<HeaderValue> {
        if !self.created {
            return None;
        }
        HeaderValue::from_str(&format!(
            "{}={}; Path=/; HttpOnly; SameSite=Lax",
            SESSION_COOKIE, self.id
        ))
        .ok()
    }
}

impl SessionStore {
    pub fn new(max_sessions: usize, history_limit: usize) -> Self {
        Self {
            slots: DashMap::new(),
            clock: AtomicU64::new(0),
            max_sessions: max_sessions.max(1),
            history_limit,
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    fn tick(&self) -> u64 {
        self.clock.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Session named by the request cookie, or a fresh one when absent, unknown or evicted.
    pub fn resolve(&self, headers: &HeaderMap) -> SessionHandle {
        let now = self.tick();
        if let Some(id) = session_id_from_headers(headers) {
            if let Some(slot) = self.slots.get(&id) {
                slot.last_touched.store(now, Ordering::Relaxed);
                return SessionHandle {
                    id,
                    surface: Arc::clone(&slot.surface),
                    created: false,
                };
            }
        }

        if self.slots.len() >= self.max_sessions {
            self.evict_oldest();
        }

        let id = Uuid::new_v4();
        let surface = Arc::new(Mutex::new(Surface::new(self.history_limit)));
        self.slots.insert(
            id,
            Slot {
                surface: Arc::clone(&surface),
                last_touched: AtomicU64::new(now),
            },
        );
        tracing::debug!(session = %id, sessions = self.len(), "created session");
        SessionHandle {
            id,
            surface,
            created: true,
        }
    }

    fn evict_oldest(&self) {
        let oldest = self
            .slots
            .iter()
            .min_by_key(|e| e.value().last_touched.load(Ordering::Relaxed))
            .map(|e| *e.key());
        if let Some(id) = oldest {
            self.slots.remove(&id);
            tracing::debug!(session = %id, "evicted least recently used session");
        }
    }
}

/// Extracts and validates the session id from the `Cookie` header(s).
pub fn session_id_from_headers(headers: &HeaderMap) -> Option<Uuid> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .and_then(|(_, value)| Uuid::parse_str(value.trim()).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cookie_headers(id: Uuid) -> HeaderMap {
        let mut h = HeaderMap::new();
        h.insert(
            header::COOKIE,
            HeaderValue::from_str(&format!("theme=dark; {}={}", SESSION_COOKIE, id)).unwrap(),
        );
        h
    }

    #[test]
    fn new_session_sets_cookie_and_known_session_is_reused() {
        let store = SessionStore::new(8, 5);
        let first = store.resolve(&HeaderMap::new());
        assert!(first.created);
        assert!(first.set_cookie().unwrap().to_str().unwrap().contains(&first.id.to_string()));

        let again = store.resolve(&cookie_headers(first.id));
        assert!(!again.created);
        assert!(again.set_cookie().is_none());
        assert!(Arc::ptr_eq(&first.surface, &again.surface));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn unknown_or_malformed_cookie_gets_a_new_session() {
        let store = SessionStore::new(8, 5);
        let handle = store.resolve(&cookie_headers(Uuid::new_v4()));
        assert!(handle.created);

        let mut h = HeaderMap::new();
        h.insert(header::COOKIE, HeaderValue::from_static("contentgen_session=not-a-uuid"));
        assert_eq!(session_id_from_headers(&h), None);
    }

    #[test]
    fn full_table_evicts_least_recently_touched() {
        let store = SessionStore::new(2, 5);
        let a = store.resolve(&HeaderMap::new());
        let b = store.resolve(&HeaderMap::new());
        // Touch `a` so `b` becomes the oldest.
        store.resolve(&cookie_headers(a.id));

        let c = store.resolve(&HeaderMap::new());
        assert_eq!(store.len(), 2);
        assert!(!store.resolve(&cookie_headers(a.id)).created);
        assert!(!store.resolve(&cookie_headers(c.id)).created);
        assert!(store.resolve(&cookie_headers(b.id)).created);
    }

    #[tokio::test]
    async fn sessions_have_independent_surfaces() {
        let store = SessionStore::new(8, 5);
        let a = store.resolve(&HeaderMap::new());
        let b = store.resolve(&HeaderMap::new());
        a.surface.lock().await.set_prompt("only in a");
        assert_eq!(b.surface.lock().await.prompt(), "");
    }
}
