//! Access-token claims.
//!
//! The token asserts exactly one thing: which username it was issued for,
//! and until when.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (username the token was issued for)
    pub sub: String,
    /// Expiration time (Unix timestamp), fixed at issuance
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
}

impl Claims {
    /// Create claims for `username` expiring `ttl_seconds` after `now`.
    pub fn new(username: String, now: DateTime<Utc>, ttl_seconds: i64) -> Self {
        let issued_at = now.timestamp();
        Self {
            sub: username,
            exp: issued_at + ttl_seconds,
            iat: issued_at,
        }
    }

    /// Check whether the token is expired as of `now`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.exp <= now.timestamp()
    }
}
