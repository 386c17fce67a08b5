// src/session.rs

//! Client-side credential cache.
//!
//! Holds the teacher's secret or identity token for the length of a local session so it
//! can be attached to each privileged call. The server re-validates it every time; an
//! entry here only means "worth sending", never "authorized".

use std::time::{Duration, Instant};

use crate::auth::Credential;

pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(60 * 60);

#[derive(Debug)]
struct Entry {
    credential: Credential,
    stored_at: Instant,
}

#[derive(Debug)]
pub struct CredentialCache {
    entry: Option<Entry>,
    ttl: Duration,
}

impl Default for CredentialCache {
    fn default() -> Self {
        Self::new(DEFAULT_SESSION_TTL)
    }
}

impl CredentialCache {
    pub fn new(ttl: Duration) -> Self {
        Self { entry: None, ttl }
    }

    pub fn store(&mut self, credential: Credential) {
        if credential == Credential::Anonymous {
            self.entry = None;
            return;
        }
        self.entry = Some(Entry {
            credential,
            stored_at: Instant::now(),
        });
    }

    /// The cached credential, dropping it first if the TTL has passed.
    pub fn current(&mut self) -> Option<&Credential> {
        if self
            .entry
            .as_ref()
            .is_some_and(|e| e.stored_at.elapsed() >= self.ttl)
        {
            self.entry = None;
        }
        self.entry.as_ref().map(|e| &e.credential)
    }

    /// Swaps a cached secret after a successful rotation. Keeps the original TTL window.
    pub fn replace_secret(&mut self, new_secret: &str) {
        if let Some(entry) = self.entry.as_mut() {
            if matches!(entry.credential, Credential::Secret(_)) {
                entry.credential = Credential::Secret(new_secret.to_string());
            }
        }
    }

    pub fn clear(&mut self) {
        self.entry = None;
    }

    pub fn is_signed_in(&mut self) -> bool {
        self.current().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stores_and_clears() {
        let mut cache = CredentialCache::default();
        assert!(!cache.is_signed_in());
        cache.store(Credential::Secret("abc".into()));
        assert_eq!(cache.current(), Some(&Credential::Secret("abc".into())));
        cache.clear();
        assert!(cache.current().is_none());
    }

    #[test]
    fn expires_after_ttl() {
        let mut cache = CredentialCache::new(Duration::ZERO);
        cache.store(Credential::Secret("abc".into()));
        assert!(cache.current().is_none());
    }

    #[test]
    fn replace_only_touches_secrets() {
        let mut cache = CredentialCache::default();
        cache.store(Credential::Secret("abc".into()));
        cache.replace_secret("xyz");
        assert_eq!(cache.current(), Some(&Credential::Secret("xyz".into())));

        cache.store(Credential::Bearer("token".into()));
        cache.replace_secret("xyz");
        assert_eq!(cache.current(), Some(&Credential::Bearer("token".into())));
    }

    #[test]
    fn anonymous_is_never_cached() {
        let mut cache = CredentialCache::default();
        cache.store(Credential::Secret("abc".into()));
        cache.store(Credential::Anonymous);
        assert!(!cache.is_signed_in());
    }
}
