//! Dealer Context
//!
//! The single process-scoped owner of every store. Handlers receive it as
//! axum router state behind an `Arc`; nothing is held in globals.

use crate::core::rng::DeterministicRng;
use crate::dealer::credentials::CredentialStore;
use crate::dealer::deck::DeckRegistry;
use crate::dealer::player::PlayerRegistry;

/// Shared state for all request handlers.
pub struct DealerContext {
    /// Registered players.
    pub players: PlayerRegistry,
    /// Player credentials.
    pub credentials: CredentialStore,
    /// Created decks.
    pub decks: DeckRegistry,
    /// Path prefix the API is mounted under, used for `Location` headers.
    pub base_path: String,
}

impl DealerContext {
    /// Create empty stores.
    pub fn new(rng: DeterministicRng, max_deck_copies: u32, base_path: impl Into<String>) -> Self {
        Self {
            players: PlayerRegistry::new(),
            credentials: CredentialStore::new(),
            decks: DeckRegistry::new(rng, max_deck_copies),
            base_path: base_path.into(),
        }
    }

    /// Absolute path of a resource under the API prefix.
    pub fn location(&self, path: &str) -> String {
        format!("{}{}", self.base_path, path)
    }
}
