//! Decks and the Deck Registry
//!
//! A deck is built once from `copies` full card generations, shuffled once,
//! and never changed afterwards. The registry hands out shared `Arc<Deck>`
//! snapshots so dealing never holds the registry lock.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use serde::{Serialize, Deserialize};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info};
use uuid::Uuid;

use crate::core::card::{Card, CARDS_PER_DECK};
use crate::core::rng::DeterministicRng;

/// Default upper bound on the number of merged decks.
pub const DEFAULT_MAX_COPIES: u32 = 64;

/// Largest configurable bound on the number of merged decks.
pub const MAX_COPIES_LIMIT: u32 = 1024;

/// Opaque, time-ordered deck identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeckId(Uuid);

impl DeckId {
    /// Generate a fresh identifier.
    pub fn generate() -> Self {
        Self(Uuid::now_v7())
    }
}

impl fmt::Display for DeckId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for DeckId {
    type Err = DeckError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|_| DeckError::NotFound(s.to_string()))
    }
}

/// An ordered, immutable sequence of cards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Deck {
    id: DeckId,
    cards: Vec<Card>,
}

impl Deck {
    /// Build `copies` concatenated full generations, shuffled once.
    pub fn build(id: DeckId, copies: usize, rng: &mut DeterministicRng) -> Self {
        let mut cards = Vec::with_capacity(copies * CARDS_PER_DECK);
        for _ in 0..copies {
            cards.extend(Card::full_set());
        }
        rng.shuffle(&mut cards);
        Self { id, cards }
    }

    /// Deck identifier.
    pub fn id(&self) -> DeckId {
        self.id
    }

    /// Cards in deal order.
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Number of cards.
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// True if the deck holds no cards.
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

/// Deck registry errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DeckError {
    /// Requested number of merged decks is out of range.
    #[error("size must be between 1 and {max}, got {requested}")]
    InvalidCopies {
        /// Value the caller asked for.
        requested: i64,
        /// Configured maximum.
        max: u32,
    },

    /// No deck with this identifier.
    #[error("deck {0} not found")]
    NotFound(String),
}

/// Registry of every deck created by this process.
pub struct DeckRegistry {
    decks: RwLock<BTreeMap<DeckId, Arc<Deck>>>,
    rng: Mutex<DeterministicRng>,
    max_copies: u32,
}

impl DeckRegistry {
    /// Create a registry shuffling with `rng`.
    pub fn new(rng: DeterministicRng, max_copies: u32) -> Self {
        Self {
            decks: RwLock::new(BTreeMap::new()),
            rng: Mutex::new(rng),
            max_copies,
        }
    }

    /// Build, shuffle and publish a new deck.
    pub async fn create(&self, copies: i64) -> Result<DeckId, DeckError> {
        if copies < 1 || copies > i64::from(self.max_copies) {
            return Err(DeckError::InvalidCopies {
                requested: copies,
                max: self.max_copies,
            });
        }

        let id = DeckId::generate();
        let deck = {
            let mut rng = self.rng.lock().await;
            Deck::build(id, copies as usize, &mut rng)
        };
        let len = deck.len();

        let mut decks = self.decks.write().await;
        decks.insert(id, Arc::new(deck));

        info!(deck_id = %id, copies, cards = len, "deck created");
        Ok(id)
    }

    /// Look up a deck by identifier.
    pub async fn get(&self, id: &DeckId) -> Result<Arc<Deck>, DeckError> {
        let decks = self.decks.read().await;
        decks.get(id).cloned().ok_or_else(|| {
            debug!(deck_id = %id, known = decks.len(), "deck lookup missed");
            DeckError::NotFound(id.to_string())
        })
    }

    /// Look up a deck by its textual identifier.
    pub async fn get_by_str(&self, id: &str) -> Result<Arc<Deck>, DeckError> {
        let id: DeckId = id.parse()?;
        self.get(&id).await
    }

    /// Identifiers of all decks, ordered by id.
    pub async fn list(&self) -> Vec<DeckId> {
        let decks = self.decks.read().await;
        decks.keys().copied().collect()
    }

    /// Number of decks held.
    pub async fn deck_count(&self) -> usize {
        self.decks.read().await.len()
    }
}
