use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{FromRequest, Path, Request, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{delete, get, post, put};
use axum::{Router, async_trait};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::lifecycle::{self, CatchOutcome, ReleaseOutcome};
use crate::{LifecycleError, PokemonStore, RandomSource, ReleaseError};

////////////////////////////////////////////// Pokemon //////////////////////////////////////////////

/// A row of the `my_pokemon` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct PokemonRecord {
    /// Storage row id.
    pub id: i32,
    /// The externally supplied pokemon id.
    pub pokemon_id: i32,
    /// The current display name.
    pub name: String,
    /// How many times the pokemon has been renamed.
    pub rename_count: i32,
    /// When the pokemon was caught.
    pub created_at: DateTime<Utc>,
    /// When the pokemon was last renamed (or caught).
    pub updated_at: DateTime<Utc>,
}

/// A pokemon id paired with a name.
///
/// This is the body of catch and rename requests and the `data` of their
/// successful responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedPokemon {
    /// The pokemon id.
    pub pokemon_id: i32,
    /// The name to catch under, or the base name to rename to.
    pub name: String,
}

/// The response envelope shared by every endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T = ()> {
    /// Whether the request achieved what it asked for.
    pub success: bool,
    /// A human readable description of the outcome.
    pub message: String,
    /// Endpoint specific payload.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    /// A successful response carrying `data`.
    pub fn success(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
        }
    }

    /// An unsuccessful response that still carries `data`.
    pub fn failure_with(message: impl Into<String>, data: T) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: Some(data),
        }
    }

    fn with_status(self, status: StatusCode) -> Response {
        (status, Json(self)).into_response()
    }
}

impl ApiResponse<()> {
    /// An unsuccessful response without data.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        self.with_status(StatusCode::OK)
    }
}

////////////////////////////////////////////// Messages //////////////////////////////////////////////

const LIST_MESSAGE: &str = "You caught a new Pokemon.";
const LIST_ERROR: &str = "Something went wrong.";
const MISSING_FIELDS: &str = "pokemon_id and name are required fields.";
const INVALID_TYPES: &str =
    "Invalid data type. pokemon_id should be a number and name should be a string.";
const CAUGHT: &str = "You caught a Pokemon!";
const ESCAPED: &str = "You failed to catch the Pokemon.";
const ALREADY_OWNED: &str = "The Pokemon is already in the database.";
const CATCH_ERROR: &str = "An error occurred while catching the Pokemon.";
const NOT_FOUND: &str = "Pokemon not found";
const RENAME_ERROR: &str = "An error occurred while renaming the Pokemon.";
const RELEASED: &str = "You released a pokemon.";
const KEPT: &str = "You failed to release a pokemon.";
const RELEASE_ERROR: &str = "An error occurred while releasing the Pokemon.";

///////////////////////////////////////////// Validation /////////////////////////////////////////////

fn is_blank(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) | Some(Value::Bool(false)) => true,
        Some(Value::Number(n)) => n.as_f64() == Some(0.0),
        Some(Value::String(s)) => s.is_empty(),
        Some(_) => false,
    }
}

fn as_pokemon_id(value: &Value) -> Option<i32> {
    let Value::Number(n) = value else {
        return None;
    };
    let integral = n.as_i64().or_else(|| {
        n.as_f64()
            .filter(|f| f.fract() == 0.0 && *f >= i32::MIN as f64 && *f <= i32::MAX as f64)
            .map(|f| f as i64)
    })?;
    i32::try_from(integral).ok()
}

impl NamedPokemon {
    /// Validates a decoded request body.
    ///
    /// Missing, null, zero, false or empty fields are reported as missing; a
    /// present `pokemon_id` that is not an integral 32-bit number, or a
    /// `name` that is not a string, is reported as mistyped.
    pub fn from_json(body: &Value) -> Result<Self, &'static str> {
        let pokemon_id = body.get("pokemon_id");
        let name = body.get("name");
        if is_blank(pokemon_id) || is_blank(name) {
            return Err(MISSING_FIELDS);
        }

        let pokemon_id = pokemon_id.and_then(as_pokemon_id);
        let name = name.and_then(Value::as_str);
        match (pokemon_id, name) {
            (Some(pokemon_id), Some(name)) => Ok(Self {
                pokemon_id,
                name: name.to_string(),
            }),
            _ => Err(INVALID_TYPES),
        }
    }
}

#[async_trait]
impl<S> FromRequest<S> for NamedPokemon
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state).await.map_err(|_| {
            ApiResponse::failure(MISSING_FIELDS).with_status(StatusCode::BAD_REQUEST)
        })?;

        // A body that is not JSON is treated like an empty one.
        let body = serde_json::from_slice::<Value>(&bytes).unwrap_or(Value::Null);
        NamedPokemon::from_json(&body)
            .map_err(|message| ApiResponse::failure(message).with_status(StatusCode::BAD_REQUEST))
    }
}

////////////////////////////////////////////// Routes //////////////////////////////////////////////

/// Shared state of the pokemon routes.
#[derive(Clone)]
pub struct GameState {
    /// Where owned pokemon live.
    pub store: Arc<dyn PokemonStore>,
    /// Where catch rolls and release draws come from.
    pub rng: Arc<dyn RandomSource>,
}

async fn list_pokemon(State(state): State<GameState>) -> Response {
    match state.store.list().await {
        Ok(records) => ApiResponse::success(LIST_MESSAGE, records).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "failed to list pokemon");
            ApiResponse::failure(LIST_ERROR).with_status(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

async fn catch_pokemon(State(state): State<GameState>, request: NamedPokemon) -> Response {
    let outcome = lifecycle::catch(
        state.store.as_ref(),
        state.rng.as_ref(),
        request.pokemon_id,
        &request.name,
    )
    .await;

    match outcome {
        Ok(CatchOutcome::Caught { pokemon_id, name }) => {
            ApiResponse::success(CAUGHT, NamedPokemon { pokemon_id, name }).into_response()
        }
        Ok(CatchOutcome::Escaped) => ApiResponse::failure(ESCAPED).into_response(),
        Ok(CatchOutcome::AlreadyOwned) => ApiResponse::failure(ALREADY_OWNED).into_response(),
        Err(e) => {
            tracing::error!(pokemon_id = request.pokemon_id, error = %e, "failed to catch pokemon");
            ApiResponse::failure(CATCH_ERROR).with_status(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

async fn rename_pokemon(State(state): State<GameState>, request: NamedPokemon) -> Response {
    match lifecycle::rename(state.store.as_ref(), request.pokemon_id, &request.name).await {
        Ok(outcome) => {
            let message = format!(
                "You renamed a Pokemon: {} to {}.",
                outcome.previous_name, outcome.name
            );
            let data = NamedPokemon {
                pokemon_id: outcome.pokemon_id,
                name: outcome.name,
            };
            ApiResponse::success(message, data).into_response()
        }
        Err(LifecycleError::NotFound) => {
            ApiResponse::failure(NOT_FOUND).with_status(StatusCode::NOT_FOUND)
        }
        Err(e) => {
            tracing::error!(pokemon_id = request.pokemon_id, error = %e, "failed to rename pokemon");
            ApiResponse::failure(RENAME_ERROR).with_status(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

fn release_not_found(draw: u32, id: &str) -> Response {
    ApiResponse::failure_with(NOT_FOUND, format!("{} - {}", draw, id))
        .with_status(StatusCode::NOT_FOUND)
}

async fn release_pokemon(State(state): State<GameState>, Path(id): Path<String>) -> Response {
    // An id that is not an integer can never be owned.
    let Ok(pokemon_id) = id.trim().parse::<i32>() else {
        return release_not_found(state.rng.release_draw(), &id);
    };

    match lifecycle::release(state.store.as_ref(), state.rng.as_ref(), pokemon_id).await {
        Ok(ReleaseOutcome::Released { draw }) => {
            ApiResponse::success(RELEASED, draw).into_response()
        }
        Ok(ReleaseOutcome::Kept { .. }) => {
            ApiResponse::<Option<u32>>::failure_with(KEPT, None).into_response()
        }
        Err(ReleaseError::NotFound { draw }) => release_not_found(draw, &id),
        Err(ReleaseError::Store(e)) => {
            tracing::error!(pokemon_id, error = %e, "failed to release pokemon");
            ApiResponse::failure(RELEASE_ERROR).with_status(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

////////////////////////////////////////////// Router //////////////////////////////////////////////

/// Creates the pokemon router. Mount it under `/api/v1`.
///
/// | Method | Path | Operation |
/// |---|---|---|
/// | GET | `/my-pokemon` | list owned pokemon |
/// | POST | `/catch` | catch attempt |
/// | PUT | `/rename` | rename |
/// | DELETE | `/release/:id` | release attempt |
pub fn create_pokemon_router(
    store: Arc<dyn PokemonStore>,
    rng: Arc<dyn RandomSource>,
) -> Router {
    Router::new()
        .route("/my-pokemon", get(list_pokemon))
        .route("/catch", post(catch_pokemon))
        .route("/rename", put(rename_pokemon))
        .route("/release/:id", delete(release_pokemon))
        .with_state(GameState { store, rng })
}
