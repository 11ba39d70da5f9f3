//! Wire Protocol
//!
//! Response bodies, query-string parsing, the error-to-status mapping and
//! the machine-readable API description served at `/swagger.json`.

use std::collections::HashMap;
use axum::{
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::{json, Value};

use crate::dealer::deck::DeckError;
use crate::dealer::hand::{
    DealError, HandWindow, DEFAULT_HAND_SIZE, DEFAULT_PAGE_COUNT, DEFAULT_PAGE_OFFSET,
};
use crate::dealer::player::PlayerError;

/// Realm advertised in `WWW-Authenticate`.
pub const AUTH_REALM: &str = "dealer";

/// Query parameter holding the hand size.
pub const PARAM_CARDS: &str = "cards";
/// Query parameter holding the number of hands.
pub const PARAM_TOP: &str = "$top";
/// Query parameter holding the number of hands to skip.
pub const PARAM_SKIP: &str = "$skip";
/// Query parameter holding the number of merged decks.
pub const PARAM_SIZE: &str = "size";
/// Query parameter overriding content negotiation.
pub const PARAM_FORMAT: &str = "$format";

// =============================================================================
// RESPONSE BODIES
// =============================================================================

/// Body of a successful `201 Created`.
#[derive(Debug, Clone, Serialize)]
pub struct CreatedBody {
    /// Always `"ok"`.
    pub status: &'static str,
    /// Identifier of the new resource.
    pub id: String,
}

impl CreatedBody {
    /// Body for a freshly created resource.
    pub fn new(id: impl ToString) -> Self {
        Self { status: "ok", id: id.to_string() }
    }
}

/// Build a `201 Created` response with a `Location` header.
pub fn created(location: &str, body: CreatedBody) -> Response {
    let mut response = (StatusCode::CREATED, Json(body)).into_response();
    if let Ok(value) = HeaderValue::from_str(location) {
        response.headers_mut().insert(header::LOCATION, value);
    }
    response
}

// =============================================================================
// ERRORS
// =============================================================================

/// Request-level errors, each mapped to one HTTP status.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// Malformed body or unparsable query parameter (400).
    #[error("{0}")]
    BadRequest(String),

    /// Client did not accept a JSON response (400).
    #[error("Request doesn't accept a JSON response")]
    NotAcceptable,

    /// Hand window runs past the end of the deck (400).
    #[error("{0}")]
    Range(String),

    /// Missing or invalid credentials (401). Never carries detail.
    #[error("Unauthorized")]
    Unauthorized,

    /// Player document failed validation (403).
    #[error("{0}")]
    InvalidPlayer(String),

    /// Player already registered (403).
    #[error("{0}")]
    Conflict(String),

    /// Unknown player or deck (404).
    #[error("{0}")]
    NotFound(String),
}

impl ApiError {
    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) | ApiError::NotAcceptable | ApiError::Range(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::InvalidPlayer(_) | ApiError::Conflict(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let mut response = (status, Json(json!({ "error": self.to_string() }))).into_response();
        if status == StatusCode::UNAUTHORIZED {
            response.headers_mut().insert(
                header::WWW_AUTHENTICATE,
                HeaderValue::from_static("Basic realm=\"dealer\""),
            );
        }
        response
    }
}

impl From<DealError> for ApiError {
    fn from(err: DealError) -> Self {
        match err {
            DealError::Overflow { .. } => ApiError::Range(err.to_string()),
            _ => ApiError::BadRequest(err.to_string()),
        }
    }
}

impl From<DeckError> for ApiError {
    fn from(err: DeckError) -> Self {
        match err {
            DeckError::InvalidCopies { .. } => ApiError::BadRequest(err.to_string()),
            DeckError::NotFound(id) => ApiError::NotFound(format!("ID {id} not found")),
        }
    }
}

impl From<PlayerError> for ApiError {
    fn from(err: PlayerError) -> Self {
        match err {
            PlayerError::Invalid(message) => ApiError::InvalidPlayer(message),
            PlayerError::Duplicate(_) => ApiError::Conflict(err.to_string()),
            PlayerError::NotFound(_) => ApiError::NotFound(err.to_string()),
        }
    }
}

// =============================================================================
// QUERY PARSING
// =============================================================================

/// Read an integer query parameter, falling back to `default` when absent.
pub fn int_param(query: &HashMap<String, String>, name: &str, default: i64) -> Result<i64, ApiError> {
    match query.get(name) {
        None => Ok(default),
        Some(raw) => raw.trim().parse::<i64>().map_err(|_| {
            ApiError::BadRequest(format!("invalid literal for {name}: {raw:?}"))
        }),
    }
}

/// Hand window from `cards`, `$top` and `$skip`.
pub fn hand_window(query: &HashMap<String, String>) -> Result<HandWindow, ApiError> {
    Ok(HandWindow {
        hand_size: int_param(query, PARAM_CARDS, DEFAULT_HAND_SIZE)?,
        page_count: int_param(query, PARAM_TOP, DEFAULT_PAGE_COUNT)?,
        page_offset: int_param(query, PARAM_SKIP, DEFAULT_PAGE_OFFSET)?,
    })
}

/// Number of decks to merge, from `size`.
pub fn deck_size(query: &HashMap<String, String>) -> Result<i64, ApiError> {
    int_param(query, PARAM_SIZE, 1)
}

/// True if the request will take a JSON response, either through its
/// `Accept` header or a `$format=json` override.
pub fn accepts_json(headers: &HeaderMap, query: &HashMap<String, String>) -> bool {
    let accept_json = headers
        .get_all(header::ACCEPT)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .any(|value| value.contains("json"));
    accept_json || query.get(PARAM_FORMAT).is_some_and(|format| format == "json")
}

// =============================================================================
// API DESCRIPTION
// =============================================================================

/// Swagger 2.0 description of the HTTP surface.
pub fn api_document(host: &str, base_path: &str) -> Value {
    let id_param = json!({"name": "id", "in": "path", "type": "string", "required": true});
    let base_path = if base_path.is_empty() { "/" } else { base_path };

    json!({
        "swagger": "2.0",
        "info": {
            "title": "Dealer",
            "description": "Players and shuffled decks dealt into paginated hands.",
            "version": crate::VERSION,
        },
        "schemes": ["http"],
        "host": host,
        "basePath": base_path,
        "consumes": ["application/json"],
        "produces": ["application/json"],
        "securityDefinitions": {
            "basic": {"type": "basic"}
        },
        "paths": {
            "/players": {
                "post": {
                    "security": [],
                    "parameters": [
                        {"name": "player", "in": "body", "schema": {"$ref": "#/definitions/player"}}
                    ],
                    "responses": {
                        "201": {"description": "Player created"},
                        "403": {"description": "Player is invalid or a duplicate"}
                    }
                },
                "get": {
                    "security": [{"basic": []}],
                    "responses": {
                        "200": {"description": "All of the players defined so far"},
                        "401": {"description": "Missing or invalid credentials"}
                    }
                }
            },
            "/players/{id}": {
                "get": {
                    "security": [{"basic": []}],
                    "parameters": [id_param.clone()],
                    "responses": {
                        "200": {
                            "description": "The details of a specific player",
                            "schema": {"$ref": "#/definitions/player"}
                        },
                        "401": {"description": "Missing or invalid credentials"},
                        "404": {"description": "Player ID not found"}
                    }
                }
            },
            "/decks": {
                "post": {
                    "security": [{"basic": []}],
                    "parameters": [
                        {
                            "name": PARAM_SIZE, "in": "query", "type": "integer", "default": 1,
                            "description": "number of decks to build and shuffle"
                        }
                    ],
                    "responses": {
                        "201": {"description": "Create and shuffle a deck. Returns a unique deck id."},
                        "400": {"description": "Invalid size, or request doesn't accept a JSON response"},
                        "401": {"description": "Missing or invalid credentials"}
                    }
                },
                "get": {
                    "security": [{"basic": []}],
                    "responses": {
                        "200": {"description": "Identifiers of all decks"},
                        "401": {"description": "Missing or invalid credentials"}
                    }
                }
            },
            "/decks/{id}": {
                "get": {
                    "security": [{"basic": []}],
                    "parameters": [id_param.clone()],
                    "responses": {
                        "200": {
                            "description": "Every card in the deck, in deal order",
                            "schema": {"type": "array", "items": {"$ref": "#/definitions/card"}}
                        },
                        "401": {"description": "Missing or invalid credentials"},
                        "404": {"description": "ID not found."}
                    }
                }
            },
            "/decks/{id}/hands": {
                "get": {
                    "security": [{"basic": []}],
                    "parameters": [
                        id_param,
                        {
                            "name": PARAM_CARDS, "in": "query", "type": "integer",
                            "default": DEFAULT_HAND_SIZE,
                            "description": "number of cards in each hand"
                        },
                        {
                            "name": PARAM_TOP, "in": "query", "type": "integer",
                            "default": DEFAULT_PAGE_COUNT,
                            "description": "number of hands to deal"
                        },
                        {
                            "name": PARAM_SKIP, "in": "query", "type": "integer",
                            "default": DEFAULT_PAGE_OFFSET,
                            "description": "number of hands to skip before starting to deal"
                        }
                    ],
                    "responses": {
                        "200": {"description": "One hand of cards for each `hand` value in the query string"},
                        "400": {"description": "Bad parameters, hands larger than the deck, or request doesn't accept a JSON response"},
                        "401": {"description": "Missing or invalid credentials"},
                        "404": {"description": "ID not found."}
                    }
                }
            }
        },
        "definitions": {
            "player": {
                "type": "object",
                "required": ["name", "email", "year", "twitter", "password"],
                "properties": {
                    "name": {"type": "string"},
                    "email": {"type": "string", "format": "email"},
                    "year": {"type": "integer"},
                    "twitter": {"type": "string", "format": "uri"},
                    "password": {
                        "type": "string",
                        "description": "plain password on a request. Hash on a response."
                    }
                }
            },
            "card": {
                "type": "object",
                "properties": {
                    "rank": {"type": "string", "enum": ["A", "2", "3", "4", "5", "6", "7", "8", "9", "10", "J", "Q", "K"]},
                    "suit": {"type": "string", "enum": ["♣", "♦", "♥", "♠"]}
                }
            }
        }
    })
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn query(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn test_hand_window_defaults() {
        let window = hand_window(&HashMap::new()).unwrap();
        assert_eq!(window, HandWindow { hand_size: 13, page_count: 1, page_offset: 0 });
    }

    #[test]
    fn test_hand_window_parses_params() {
        let window = hand_window(&query(&[("cards", "5"), ("$top", "4"), ("$skip", " 2 ")])).unwrap();
        assert_eq!(window, HandWindow { hand_size: 5, page_count: 4, page_offset: 2 });
    }

    #[test]
    fn test_unparsable_param_is_bad_request() {
        let err = hand_window(&query(&[("cards", "thirteen")])).unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);

        let err = deck_size(&query(&[("size", "1.5")])).unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));
    }

    #[test]
    fn test_deal_error_mapping() {
        let overflow = DealError::Overflow { requested: 65, available: 52 };
        assert!(matches!(ApiError::from(overflow), ApiError::Range(_)));
        assert!(matches!(ApiError::from(DealError::InvalidHandSize(0)), ApiError::BadRequest(_)));
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(ApiError::Unauthorized.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::Conflict("x".into()).status(), StatusCode::FORBIDDEN);
        assert_eq!(ApiError::InvalidPlayer("x".into()).status(), StatusCode::FORBIDDEN);
        assert_eq!(ApiError::NotFound("x".into()).status(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::NotAcceptable.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_unauthorized_challenge_header() {
        let response = ApiError::Unauthorized.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            response.headers().get(header::WWW_AUTHENTICATE).unwrap(),
            "Basic realm=\"dealer\""
        );
    }

    #[test]
    fn test_accepts_json() {
        let query = |pairs: &[(&str, &str)]| -> HashMap<String, String> {
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
        };

        let mut headers = HeaderMap::new();
        assert!(!accepts_json(&headers, &HashMap::new()));
        assert!(!accepts_json(&headers, &query(&[("$format", "html")])));
        assert!(accepts_json(&headers, &query(&[("cards", "5"), ("$format", "json")])));

        headers.insert(header::ACCEPT, HeaderValue::from_static("text/html"));
        assert!(!accepts_json(&headers, &HashMap::new()));

        headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));
        assert!(accepts_json(&headers, &HashMap::new()));
    }

    #[test]
    fn test_api_document() {
        let doc = api_document("127.0.0.1:5000", "/dealer");
        assert_eq!(doc["swagger"], "2.0");
        assert_eq!(doc["basePath"], "/dealer");
        assert!(doc["paths"]["/decks/{id}/hands"]["get"].is_object());
        assert_eq!(doc["definitions"]["player"]["properties"]["email"]["format"], "email");

        assert_eq!(api_document("h", "")["basePath"], "/");
    }
}
