//! Network Layer
//!
//! HTTP surface over the dealer stores: routing, Basic-auth gate, and
//! response conventions. All domain logic lives in `dealer/`.

pub mod auth;
pub mod context;
pub mod protocol;
pub mod server;

pub use auth::{admit, parse_basic, Admitted, AuthError, BasicCredentials};
pub use context::DealerContext;
pub use protocol::{ApiError, CreatedBody};
pub use server::{DealerServer, DealerServerError, ServerConfig};
