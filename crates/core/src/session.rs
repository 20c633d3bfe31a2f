//! Session token handling.
//!
//! A session token is a random UUID created the first time a browsing
//! session needs one, stored in session-scoped storage, and reused until
//! the storage is cleared. Interaction records carry a short obfuscated
//! form of the token; content-view records carry the raw token.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use uuid::Uuid;

/// Storage key holding the session token.
pub const SESSION_STORAGE_KEY: &str = "session_id";

/// Length of the obfuscated session hash.
pub const SESSION_HASH_LEN: usize = 16;

/// Key/value storage scoped to one browsing session.
pub trait SessionStorage: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

/// Session storage kept in process memory.
///
/// Lives as long as the value does, so one instance is one session.
#[derive(Debug, Default)]
pub struct MemorySessionStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemorySessionStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops every key, ending the session.
    pub fn clear(&self) {
        self.entries.lock().clear();
    }
}

impl SessionStorage for MemorySessionStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.entries.lock().insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.entries.lock().remove(key);
    }
}

/// Raw per-session token.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionToken(String);

impl SessionToken {
    /// Generates a fresh random token.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for SessionToken {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Obfuscated session token stored on interaction records.
///
/// This is a truncated base64 encoding, not a cryptographic hash: the
/// encoded prefix of the token can be decoded back. Downstream reports
/// group on this exact format, so it must not be swapped for a digest.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionHash(String);

impl SessionHash {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Returns the session's token, creating and storing one if absent.
pub fn obtain_session_token(storage: &dyn SessionStorage) -> SessionToken {
    if let Some(existing) = storage.get(SESSION_STORAGE_KEY) {
        if !existing.trim().is_empty() {
            return SessionToken(existing);
        }
    }

    let token = SessionToken::generate();
    storage.set(SESSION_STORAGE_KEY, token.as_str());
    token
}

/// Derives the obfuscated hash: base64 of the token, first 16 characters.
pub fn session_hash(token: &SessionToken) -> SessionHash {
    let mut encoded = STANDARD.encode(token.as_str().as_bytes());
    // base64 output is ASCII, so truncating by byte is safe
    encoded.truncate(SESSION_HASH_LEN);
    SessionHash(encoded)
}

/// Token and hash for one session, resolved once and shared by all calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionContext {
    token: SessionToken,
    hash: SessionHash,
}

impl SessionContext {
    /// Resolves the session from storage, creating the token on first use.
    pub fn resolve(storage: &dyn SessionStorage) -> Self {
        Self::from_token(obtain_session_token(storage))
    }

    pub fn from_token(token: SessionToken) -> Self {
        let hash = session_hash(&token);
        Self { token, hash }
    }

    pub fn token(&self) -> &SessionToken {
        &self.token
    }

    pub fn hash(&self) -> &SessionHash {
        &self.hash
    }
}
