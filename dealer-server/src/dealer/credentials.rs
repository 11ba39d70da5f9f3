//! Credential Store
//!
//! Maps player identities to salted SHA-256 password digests. Plaintext
//! passwords only pass through `register` and `verify` and are never kept.

use std::collections::BTreeMap;
use std::fmt;
use tokio::sync::RwLock;
use tracing::debug;

use crate::core::hash::{digests_equal, hash_parts, Hash32, PASSWORD_DOMAIN};
use crate::dealer::player::PlayerId;

/// Salt length in bytes.
pub const SALT_LEN: usize = 16;

/// A salted password digest.
///
/// Renders as `sha256$<salt hex>$<digest hex>`, the only form in which a
/// password ever appears in a response.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordDigest {
    salt: [u8; SALT_LEN],
    hash: Hash32,
}

impl PasswordDigest {
    /// Digest `password` under a fresh random salt.
    pub fn new(password: &str) -> Self {
        Self::with_salt(rand::random(), password)
    }

    /// Digest `password` under a given salt.
    pub fn with_salt(salt: [u8; SALT_LEN], password: &str) -> Self {
        let hash = hash_parts(PASSWORD_DOMAIN, &[&salt, password.as_bytes()]);
        Self { salt, hash }
    }

    /// Check a presented password against this digest.
    pub fn matches(&self, password: &str) -> bool {
        let candidate = hash_parts(PASSWORD_DOMAIN, &[&self.salt, password.as_bytes()]);
        digests_equal(&self.hash, &candidate)
    }
}

impl fmt::Display for PasswordDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sha256${}${}", hex::encode(self.salt), hex::encode(self.hash))
    }
}

// Keep digests out of debug logs.
impl fmt::Debug for PasswordDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordDigest(..)")
    }
}

/// Credential store errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CredentialError {
    /// A credential already exists for this identity.
    #[error("credentials already registered for {0}")]
    Conflict(PlayerId),
}

/// Identity → password digest map.
#[derive(Default)]
pub struct CredentialStore {
    entries: RwLock<BTreeMap<PlayerId, PasswordDigest>>,
}

impl CredentialStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a salted digest of `password` for `identity`.
    pub async fn register(
        &self,
        identity: PlayerId,
        password: &str,
    ) -> Result<PasswordDigest, CredentialError> {
        let mut entries = self.entries.write().await;
        if entries.contains_key(&identity) {
            return Err(CredentialError::Conflict(identity));
        }

        let digest = PasswordDigest::new(password);
        entries.insert(identity, digest.clone());
        debug!(player_id = %identity, "credentials registered");
        Ok(digest)
    }

    /// True if `identity` has registered credentials.
    pub async fn contains(&self, identity: &PlayerId) -> bool {
        self.entries.read().await.contains_key(identity)
    }

    /// Check `password` for `identity`. Unknown identities never verify.
    pub async fn verify(&self, identity: &PlayerId, password: &str) -> bool {
        let entries = self.entries.read().await;
        match entries.get(identity) {
            Some(digest) => digest.matches(password),
            None => false,
        }
    }
}
