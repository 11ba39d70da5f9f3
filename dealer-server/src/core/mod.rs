//! Core primitives.
//!
//! Card values, the seeded shuffle generator and hashing helpers.
//! Nothing in this module touches the network or shared state.

pub mod card;
pub mod rng;
pub mod hash;

// Re-export core types
pub use card::{Card, Rank, Suit, CARDS_PER_DECK};
pub use rng::DeterministicRng;
pub use hash::Hash32;
