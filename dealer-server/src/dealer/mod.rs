//! Dealer Domain
//!
//! The resource stores and the hand partitioner. Stores are safe to share
//! across request tasks; the partitioner is a pure function.
//!
//! ## Module Structure
//!
//! - `deck`: Deck construction and the deck registry
//! - `hand`: Paginated hand dealing
//! - `player`: Player records, schema validation and the player registry
//! - `credentials`: Salted password digests and verification

pub mod deck;
pub mod hand;
pub mod player;
pub mod credentials;

// Re-export key types
pub use deck::{Deck, DeckId, DeckError, DeckRegistry};
pub use hand::{deal, Hand, HandWindow, DealError};
pub use player::{Player, PlayerId, PlayerError, PlayerRegistry};
pub use credentials::{CredentialStore, PasswordDigest};
