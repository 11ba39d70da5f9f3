//! Players and the Player Registry
//!
//! Players are keyed by an identity derived from their twitter handle, so
//! the same handle can never register twice. Registration validates the
//! submitted document, records the credential and publishes the player
//! under a single registry write lock.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use serde::{Serialize, Serializer};
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::info;

use crate::core::hash::{hash_with_domain, PLAYER_ID_DOMAIN};
use crate::dealer::credentials::{CredentialError, CredentialStore, PasswordDigest};

// =============================================================================
// PLAYER ID
// =============================================================================

/// Player identity, derived from the uniqueness handle.
///
/// Rendered as 32 lowercase hex characters; this is also the Basic-auth
/// username.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PlayerId(pub [u8; 16]);

impl PlayerId {
    /// Derive the identity for a uniqueness handle.
    pub fn from_handle(handle: &str) -> Self {
        let hash = hash_with_domain(PLAYER_ID_DOMAIN, handle.as_bytes());
        let mut id = [0u8; 16];
        id.copy_from_slice(&hash[..16]);
        Self(id)
    }

    /// Get raw bytes.
    pub fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.as_bytes()))
    }
}

impl FromStr for PlayerId {
    type Err = PlayerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = hex::decode(s).map_err(|_| PlayerError::NotFound(s.to_string()))?;
        let id: [u8; 16] = bytes
            .try_into()
            .map_err(|_| PlayerError::NotFound(s.to_string()))?;
        Ok(Self(id))
    }
}

impl Serialize for PlayerId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

// =============================================================================
// PLAYER RECORDS
// =============================================================================

/// A validated registration request.
#[derive(Clone)]
pub struct NewPlayer {
    /// Display name.
    pub name: String,
    /// Contact address.
    pub email: String,
    /// Birth year.
    pub year: i64,
    /// Uniqueness handle (a profile URI).
    pub twitter: String,
    /// Plaintext password, dropped once digested.
    pub password: String,
}

impl fmt::Debug for NewPlayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewPlayer")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("year", &self.year)
            .field("twitter", &self.twitter)
            .finish_non_exhaustive()
    }
}

impl NewPlayer {
    /// Validate a submitted player document.
    ///
    /// Every field is required; `email` must look like an address and
    /// `twitter` must parse as a URI. Unknown fields are ignored.
    pub fn from_document(document: &Value) -> Result<Self, PlayerError> {
        let object = document
            .as_object()
            .ok_or_else(|| PlayerError::Invalid("player must be a JSON object".into()))?;

        let string_field = |field: &str| -> Result<String, PlayerError> {
            match object.get(field) {
                Some(Value::String(s)) => Ok(s.clone()),
                Some(_) => Err(PlayerError::Invalid(format!("{field} must be a string"))),
                None => Err(PlayerError::Invalid(format!("{field} is a required property"))),
            }
        };

        let name = string_field("name")?;
        let email = string_field("email")?;
        let twitter = string_field("twitter")?;
        let password = string_field("password")?;
        let year = match object.get("year") {
            Some(value) => value
                .as_i64()
                .ok_or_else(|| PlayerError::Invalid("year must be an integer".into()))?,
            None => return Err(PlayerError::Invalid("year is a required property".into())),
        };

        if !is_email_shaped(&email) {
            return Err(PlayerError::Invalid(format!("{email:?} is not a valid email")));
        }
        if url::Url::parse(&twitter).is_err() {
            return Err(PlayerError::Invalid(format!("{twitter:?} is not a valid uri")));
        }

        Ok(Self { name, email, year, twitter, password })
    }
}

fn is_email_shaped(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    match email.rsplit_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !local.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    }
}

/// A registered player as returned to clients.
#[derive(Clone, Debug, Serialize)]
pub struct Player {
    /// Player identity.
    pub id: PlayerId,
    /// Display name.
    pub name: String,
    /// Contact address.
    pub email: String,
    /// Birth year.
    pub year: i64,
    /// Uniqueness handle.
    pub twitter: String,
    /// Salted digest, never the plaintext.
    #[serde(serialize_with = "serialize_digest")]
    pub password: PasswordDigest,
}

fn serialize_digest<S: Serializer>(digest: &PasswordDigest, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(digest)
}

/// Player registry errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlayerError {
    /// Document failed schema validation.
    #[error("{0}")]
    Invalid(String),

    /// A player with the same handle already exists.
    #[error("Duplicate player")]
    Duplicate(PlayerId),

    /// No player with this identifier.
    #[error("{0} not found")]
    NotFound(String),
}

// =============================================================================
// REGISTRY
// =============================================================================

/// Registry of every player registered with this process.
#[derive(Default)]
pub struct PlayerRegistry {
    players: RwLock<BTreeMap<PlayerId, Player>>,
}

impl PlayerRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and register a player document.
    ///
    /// Lock order is players, then credentials.
    pub async fn create(
        &self,
        document: &Value,
        credentials: &CredentialStore,
    ) -> Result<PlayerId, PlayerError> {
        let new_player = NewPlayer::from_document(document)?;
        let id = PlayerId::from_handle(&new_player.twitter);

        let mut players = self.players.write().await;
        if players.contains_key(&id) {
            return Err(PlayerError::Duplicate(id));
        }

        let password = credentials
            .register(id, &new_player.password)
            .await
            .map_err(|CredentialError::Conflict(id)| PlayerError::Duplicate(id))?;

        let NewPlayer { name, email, year, twitter, .. } = new_player;
        players.insert(id, Player { id, name, email, year, twitter, password });

        info!(player_id = %id, "player registered");
        Ok(id)
    }

    /// Look up a player by identifier.
    pub async fn get(&self, id: &PlayerId) -> Result<Player, PlayerError> {
        let players = self.players.read().await;
        players
            .get(id)
            .cloned()
            .ok_or_else(|| PlayerError::NotFound(id.to_string()))
    }

    /// Look up a player by its textual identifier.
    pub async fn get_by_str(&self, id: &str) -> Result<Player, PlayerError> {
        let id: PlayerId = id.parse()?;
        self.get(&id).await
    }

    /// All players, ordered by identifier.
    pub async fn list(&self) -> Vec<Player> {
        let players = self.players.read().await;
        players.values().cloned().collect()
    }

    /// Number of registered players.
    pub async fn player_count(&self) -> usize {
        self.players.read().await.len()
    }
}

// =============================================================================
// TESTS
// =============================================================================
