//! HTTP Dealer Server
//!
//! axum router over the dealer stores. Player registration is the only
//! public write; every other resource route sits behind the Basic-auth
//! gate. All routes except `/swagger.json` require a client that accepts
//! JSON.

use std::collections::{BTreeMap, HashMap};
use std::net::SocketAddr;
use std::sync::Arc;
use axum::{
    body::Bytes,
    extract::{Path, Query, Request, State},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Extension, Json, Router,
};
use serde_json::Value;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::trace::TraceLayer;
use tracing::{debug, info, instrument};

use crate::core::card::Card;
use crate::core::rng::{derive_seed, DeterministicRng};
use crate::dealer::deck::{DeckId, DEFAULT_MAX_COPIES, MAX_COPIES_LIMIT};
use crate::dealer::hand::{deal_window, Hand};
use crate::dealer::player::Player;
use crate::network::auth::{require_auth, Admitted};
use crate::network::context::DealerContext;
use crate::network::protocol::{
    accepts_json, api_document, created, deck_size, hand_window, ApiError, CreatedBody,
};

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address.
    pub bind_addr: SocketAddr,
    /// Path prefix for every route; empty serves at the root.
    pub base_path: String,
    /// Shuffle seed. `None` seeds from OS entropy.
    pub seed: Option<u64>,
    /// Largest accepted `size` when creating a deck.
    pub max_deck_copies: u32,
    /// Server version string.
    pub version: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 5000)),
            base_path: "/dealer".to_string(),
            seed: None,
            max_deck_copies: DEFAULT_MAX_COPIES,
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

impl ServerConfig {
    /// Create config from environment variables.
    ///
    /// - `DEALER_BIND_ADDR`: socket address, default `127.0.0.1:5000`
    /// - `DEALER_BASE_PATH`: route prefix, default `/dealer`
    /// - `DEAL_APP_SEED`: shuffle seed (number or any text)
    /// - `DEALER_MAX_DECK_COPIES`: deck `size` limit, default 64, at most 1024
    pub fn from_env() -> Result<Self, DealerServerError> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Create config from an arbitrary variable lookup.
    pub fn from_vars<F>(lookup: F) -> Result<Self, DealerServerError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(addr) = lookup("DEALER_BIND_ADDR") {
            config.bind_addr = addr
                .parse()
                .map_err(|_| DealerServerError::Config(format!("invalid DEALER_BIND_ADDR: {addr}")))?;
        }

        if let Some(base_path) = lookup("DEALER_BASE_PATH") {
            config.base_path = normalize_base_path(&base_path);
        }

        config.seed = lookup("DEAL_APP_SEED").map(|seed| derive_seed(&seed));

        if let Some(max) = lookup("DEALER_MAX_DECK_COPIES") {
            config.max_deck_copies = match max.trim().parse::<u32>() {
                Ok(n) if (1..=MAX_COPIES_LIMIT).contains(&n) => n,
                _ => {
                    return Err(DealerServerError::Config(format!(
                        "invalid DEALER_MAX_DECK_COPIES: {max}"
                    )))
                }
            };
        }

        Ok(config)
    }
}

/// Normalize a route prefix to `/segment[/segment]` or empty.
fn normalize_base_path(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{trimmed}")
    }
}

/// Dealer server errors.
#[derive(Debug, thiserror::Error)]
pub enum DealerServerError {
    /// Failed to bind or serve.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid configuration value.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// The dealer server.
pub struct DealerServer {
    /// Server configuration.
    config: ServerConfig,
    /// Shared stores.
    context: Arc<DealerContext>,
    /// Shutdown signal.
    shutdown_tx: broadcast::Sender<()>,
}

impl DealerServer {
    /// Create a new server with empty stores.
    pub fn new(config: ServerConfig) -> Self {
        let (shutdown_tx, _) = broadcast::channel(1);
        let rng = DeterministicRng::from_optional_seed(config.seed);
        let context = Arc::new(DealerContext::new(
            rng,
            config.max_deck_copies,
            config.base_path.clone(),
        ));

        Self { config, context, shutdown_tx }
    }

    /// Shared stores behind the router.
    pub fn context(&self) -> Arc<DealerContext> {
        self.context.clone()
    }

    /// Build the HTTP router.
    pub fn router(&self) -> Router {
        let protected = Router::new()
            .route("/players", get(list_players))
            .route("/players/:id", get(get_player))
            .route("/decks", post(create_deck).get(list_decks))
            .route("/decks/:id", get(get_deck))
            .route("/decks/:id/hands", get(get_hands))
            .route_layer(middleware::from_fn_with_state(self.context.clone(), require_auth));

        let public = Router::new().route("/players", post(create_player));

        let document = api_document(&self.config.bind_addr.to_string(), &self.config.base_path);

        // The JSON check wraps only the routes registered before it.
        let api = public
            .merge(protected)
            .layer(middleware::from_fn(require_json))
            .route("/swagger.json", get(move || async move { Json(document) }));

        let app = if self.config.base_path.is_empty() {
            api
        } else {
            Router::new().nest(&self.config.base_path, api)
        };

        app.layer(TraceLayer::new_for_http())
            .with_state(self.context.clone())
    }

    /// Run the server until `shutdown` is called.
    #[instrument(skip(self))]
    pub async fn run(&self) -> Result<(), DealerServerError> {
        let listener = TcpListener::bind(self.config.bind_addr).await?;
        info!(
            "Dealer server v{} listening on {}{}",
            self.config.version, self.config.bind_addr, self.config.base_path
        );
        if self.config.seed.is_some() {
            info!("Deck shuffles are seeded");
        }

        let mut shutdown_rx = self.shutdown_tx.subscribe();
        axum::serve(listener, self.router())
            .with_graceful_shutdown(async move {
                let _ = shutdown_rx.recv().await;
                info!("Shutdown signal received");
            })
            .await?;

        Ok(())
    }

    /// Shutdown the server.
    pub fn shutdown(&self) {
        let _ = self.shutdown_tx.send(());
    }
}

// =============================================================================
// MIDDLEWARE
// =============================================================================

/// Reject requests that will not take a JSON response.
async fn require_json(request: Request, next: Next) -> Response {
    let query = Query::<HashMap<String, String>>::try_from_uri(request.uri())
        .map(|Query(query)| query)
        .unwrap_or_default();
    if !accepts_json(request.headers(), &query) {
        return ApiError::NotAcceptable.into_response();
    }
    next.run(request).await
}

// =============================================================================
// HANDLERS
// =============================================================================

async fn create_player(
    State(ctx): State<Arc<DealerContext>>,
    body: Bytes,
) -> Result<Response, ApiError> {
    let document: Value = serde_json::from_slice(&body)
        .map_err(|_| ApiError::BadRequest("request body is not valid JSON".into()))?;

    let id = ctx.players.create(&document, &ctx.credentials).await?;
    let location = ctx.location(&format!("/players/{id}"));
    Ok(created(&location, CreatedBody::new(id)))
}

async fn list_players(
    State(ctx): State<Arc<DealerContext>>,
    Extension(admitted): Extension<Admitted>,
) -> Json<BTreeMap<String, Player>> {
    let players = ctx.players.list().await;
    debug!(by = %admitted.player_id, count = players.len(), "listing players");
    Json(players.into_iter().map(|p| (p.id.to_string(), p)).collect())
}

async fn get_player(
    State(ctx): State<Arc<DealerContext>>,
    Path(id): Path<String>,
) -> Result<Json<Player>, ApiError> {
    Ok(Json(ctx.players.get_by_str(&id).await?))
}

async fn create_deck(
    State(ctx): State<Arc<DealerContext>>,
    Extension(admitted): Extension<Admitted>,
    Query(query): Query<HashMap<String, String>>,
) -> Result<Response, ApiError> {
    let copies = deck_size(&query)?;
    let id = ctx.decks.create(copies).await?;
    debug!(by = %admitted.player_id, deck_id = %id, "deck requested");

    let location = ctx.location(&format!("/decks/{id}"));
    Ok(created(&location, CreatedBody::new(id)))
}

async fn list_decks(State(ctx): State<Arc<DealerContext>>) -> Json<Vec<DeckId>> {
    Json(ctx.decks.list().await)
}

async fn get_deck(
    State(ctx): State<Arc<DealerContext>>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Card>>, ApiError> {
    let deck = ctx.decks.get_by_str(&id).await?;
    Ok(Json(deck.cards().to_vec()))
}

async fn get_hands(
    State(ctx): State<Arc<DealerContext>>,
    Path(id): Path<String>,
    Query(query): Query<HashMap<String, String>>,
) -> Result<Json<Vec<Hand>>, ApiError> {
    let deck = ctx.decks.get_by_str(&id).await?;
    let window = hand_window(&query)?;
    Ok(Json(deal_window(deck.cards(), &window)?))
}

// =============================================================================
// TESTS
// =============================================================================
