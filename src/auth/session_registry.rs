//! Registry of logged-out tokens.
//!
//! Logout cannot edit a token that the client already holds, so the service
//! records the token string itself and rejects it at the gate until it
//! would have expired anyway. The set lives in process memory: it is empty
//! after a restart and is never purged, entries simply go stale once the
//! underlying token expires.

use std::collections::HashSet;
use std::sync::{Arc, RwLock};

/// Cloneable handle to the shared revoked-token set. Every worker holds a
/// clone; a `revoke` completed on one is visible to `is_revoked` on all.
#[derive(Clone, Default)]
pub struct SessionRegistry {
    revoked: Arc<RwLock<HashSet<String>>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `token` as logged out. Idempotent: revoking an
    /// already-revoked token is a no-op.
    pub fn revoke(&self, token: &str) {
        let mut revoked = self
            .revoked
            .write()
            .expect("session registry lock poisoned");
        revoked.insert(token.to_string());
    }

    /// Membership test used by the authentication gate.
    pub fn is_revoked(&self, token: &str) -> bool {
        let revoked = self
            .revoked
            .read()
            .expect("session registry lock poisoned");
        revoked.contains(token)
    }

    /// Number of revoked tokens currently held.
    pub fn len(&self) -> usize {
        let revoked = self
            .revoked
            .read()
            .expect("session registry lock poisoned");
        revoked.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
