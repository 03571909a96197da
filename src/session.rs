//! In-process session store behind the `session` cookie.

use dashmap::DashMap;
use uuid::Uuid;

/// Cookie name carrying the session token.
pub const SESSION_COOKIE: &str = "session";

/// Map of opaque session token → authenticated user id. Tokens live for
/// the lifetime of the process; logout removes them eagerly.
#[derive(Default)]
pub struct SessionStore {
    sessions: DashMap<String, i64>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mint a fresh token bound to `user_id`.
    pub fn create(&self, user_id: i64) -> String {
        let token = Uuid::new_v4().to_string();
        self.sessions.insert(token.clone(), user_id);
        token
    }

    /// Resolve a token back to its user id.
    pub fn user_id(&self, token: &str) -> Option<i64> {
        self.sessions.get(token).map(|e| *e.value())
    }

    /// Drop a token. Unknown tokens are ignored.
    pub fn revoke(&self, token: &str) {
        self.sessions.remove(token);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_resolve_revoke() {
        let store = SessionStore::new();
        let token = store.create(7);
        assert_eq!(store.user_id(&token), Some(7));

        store.revoke(&token);
        assert_eq!(store.user_id(&token), None);

        // revoking again is a no-op
        store.revoke(&token);
    }

    #[test]
    fn tokens_are_distinct_per_login() {
        let store = SessionStore::new();
        let a = store.create(1);
        let b = store.create(1);
        assert_ne!(a, b);
        assert_eq!(store.user_id(&a), Some(1));
        assert_eq!(store.user_id(&b), Some(1));
    }
}
