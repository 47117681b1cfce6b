//! # my-pokemon: Catch, Rename, Release
//!
//! A small game served over HTTP. Players try to catch pokemon, rename the
//! ones they own, and try to release them again. Every owned pokemon is a row
//! of a single table holding its id, its display name and how many times it
//! has been renamed.
//!
//! ## Game Rules
//!
//! - **Catch** succeeds with probability one half, and only when the id is not
//!   already owned. Failing either way is a normal outcome, not an error.
//! - **Rename** appends `-fib(n)` to the supplied name, where `n` is the
//!   pokemon's rename count, then increments the count.
//! - **Release** draws an integer in `[0, 100)` and lets the pokemon go only
//!   when the draw is prime.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │ HTTP API Layer (Axum routes)            │
//! ├─────────────────────────────────────────┤
//! │ Lifecycle (catch / rename / release)    │
//! ├──────────────────────┬──────────────────┤
//! │ PokemonStore trait   │ RandomSource     │
//! ├──────────────────────┴──────────────────┤
//! │ In-memory map or PostgreSQL             │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage Examples
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use axum::Router;
//! use my_pokemon::{InMemoryPokemonStore, SeededRandom, create_pokemon_router};
//!
//! let store = Arc::new(InMemoryPokemonStore::new());
//! let rng = Arc::new(SeededRandom::from_seed(151));
//! let app: Router = Router::new().nest("/api/v1", create_pokemon_router(store, rng));
//! ```

#![deny(missing_docs)]
mod data_store;
mod errors;
mod lifecycle;
mod numeric;
mod pokemon;
mod random;

// CLI utility modules

/// Command-line interface utilities for program termination and output formatting.
pub mod cli_utils;

/// HTTP client for the pokemon API, used by `pokectl`.
pub mod http_utils;

/// PostgreSQL storage: queries, the `PgPokemonStore` and embedded migrations.
pub mod sql;

pub use data_store::{InMemoryPokemonStore, PokemonStore};
pub use errors::{DataStoreError, LifecycleError, ReleaseError};
pub use lifecycle::{
    CATCH_PROBABILITY, CatchOutcome, ReleaseOutcome, RenameOutcome, catch, release, rename,
    renamed_name,
};
pub use numeric::{fibonacci, is_prime};
pub use pokemon::{ApiResponse, GameState, NamedPokemon, PokemonRecord, create_pokemon_router};
pub use random::{RELEASE_DRAW_BOUND, RandomSource, SeededRandom};
pub use sql::PgPokemonStore;
