//! # Dealer Server
//!
//! Card dealing over HTTP: registered players create shuffled decks and
//! read them back as pages of fixed-size hands.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       DEALER SERVER                          │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/             - Primitives                              │
//! │  ├── card.rs       - Rank, suit and card model               │
//! │  ├── rng.rs        - Seedable Xorshift128+ shuffle           │
//! │  └── hash.rs       - Domain-separated SHA-256                │
//! │                                                              │
//! │  dealer/           - Domain stores                           │
//! │  ├── deck.rs       - Deck construction and registry          │
//! │  ├── hand.rs       - Hand windows over a deck                │
//! │  ├── player.rs     - Player validation and registry          │
//! │  └── credentials.rs- Salted password digests                 │
//! │                                                              │
//! │  network/          - HTTP surface                            │
//! │  ├── server.rs     - Router, handlers, config                │
//! │  ├── auth.rs       - Basic-auth gate                         │
//! │  ├── protocol.rs   - Errors, query params, API document      │
//! │  └── context.rs    - Shared state                            │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Determinism
//!
//! With a fixed seed (`DEAL_APP_SEED`) the sequence of shuffled decks is
//! identical across runs. Dealing never mutates a deck, so the same
//! window always yields the same hands.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod core;
pub mod dealer;
pub mod network;

// Re-export commonly used types
pub use crate::core::card::{Card, Rank, Suit};
pub use crate::core::rng::DeterministicRng;
pub use dealer::{Deck, DeckId, Hand, HandWindow, Player, PlayerId};
pub use network::{DealerServer, ServerConfig};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
