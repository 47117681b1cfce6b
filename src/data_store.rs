//! # Pokemon Storage Abstraction
//!
//! The game never talks to a connection pool directly. Handlers receive an
//! `Arc<dyn PokemonStore>` and every store method is a single atomic step:
//! a point lookup, an insert, a name-and-counter update, or a delete.
//!
//! ## Implementations
//!
//! - **InMemoryPokemonStore**: `Mutex<BTreeMap>` keyed by pokemon id, used by
//!   tests and by the daemon when no database is configured
//! - **PgPokemonStore**: the `my_pokemon` table in PostgreSQL (see [`crate::sql`])
//!
//! ## Usage Examples
//!
//! ```rust
//! use my_pokemon::{InMemoryPokemonStore, PokemonStore};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let store = InMemoryPokemonStore::new();
//! store.insert(25, "Pikachu").await.unwrap();
//!
//! let pikachu = store.get(25).await.unwrap().unwrap();
//! assert_eq!(pikachu.name, "Pikachu");
//! assert_eq!(pikachu.rename_count, 0);
//! # }
//! ```

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;

use crate::{DataStoreError, PokemonRecord};

/// Storage interface for owned pokemon.
///
/// Implementors must be safe to share across request handlers.
#[async_trait]
pub trait PokemonStore: Send + Sync {
    /// Lists every owned pokemon, oldest row first.
    async fn list(&self) -> Result<Vec<PokemonRecord>, DataStoreError>;

    /// Looks up a pokemon by its id.
    ///
    /// # Returns
    /// * `Ok(Some(PokemonRecord))` - The pokemon is owned
    /// * `Ok(None)` - The pokemon is not owned
    /// * `Err(DataStoreError::Internal)` - Storage error
    async fn get(&self, pokemon_id: i32) -> Result<Option<PokemonRecord>, DataStoreError>;

    /// Inserts a freshly caught pokemon with a rename count of zero.
    ///
    /// # Returns
    /// * `Ok(())` - Pokemon stored
    /// * `Err(DataStoreError::AlreadyExists)` - The id is already owned
    /// * `Err(DataStoreError::Internal)` - Storage error
    async fn insert(&self, pokemon_id: i32, name: &str) -> Result<(), DataStoreError>;

    /// Sets the name and increments the rename count in one step.
    ///
    /// Returns `Ok(false)` when the pokemon is not owned.
    async fn rename(&self, pokemon_id: i32, new_name: &str) -> Result<bool, DataStoreError>;

    /// Deletes a pokemon permanently.
    ///
    /// Returns `Ok(false)` when the pokemon is not owned.
    async fn delete(&self, pokemon_id: i32) -> Result<bool, DataStoreError>;
}

#[derive(Default)]
struct InMemoryState {
    next_row_id: i32,
    pokemon: BTreeMap<i32, PokemonRecord>,
}

/// Longest name, in characters, the `my_pokemon.name` column holds.
pub(crate) const NAME_MAX_CHARS: usize = 255;

/// Thread-safe in-memory implementation of [`PokemonStore`].
///
/// Row ids are assigned from a counter starting at 1 and timestamps come from
/// the system clock, mirroring what the database does. Names longer than the
/// database column allows are refused the way the database refuses them.
#[derive(Default)]
pub struct InMemoryPokemonStore {
    state: Mutex<InMemoryState>,
}

impl InMemoryPokemonStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> Result<MutexGuard<'_, InMemoryState>, DataStoreError> {
        self.state
            .lock()
            .map_err(|_| DataStoreError::Internal("in-memory store lock poisoned".to_string()))
    }
}

fn check_name_length(name: &str) -> Result<(), DataStoreError> {
    let chars = name.chars().count();
    if chars > NAME_MAX_CHARS {
        return Err(DataStoreError::Internal(format!(
            "name of {} characters exceeds the {} character limit",
            chars, NAME_MAX_CHARS
        )));
    }
    Ok(())
}

#[async_trait]
impl PokemonStore for InMemoryPokemonStore {
    async fn list(&self) -> Result<Vec<PokemonRecord>, DataStoreError> {
        let state = self.state()?;
        let mut records: Vec<PokemonRecord> = state.pokemon.values().cloned().collect();
        records.sort_by_key(|record| record.id);
        Ok(records)
    }

    async fn get(&self, pokemon_id: i32) -> Result<Option<PokemonRecord>, DataStoreError> {
        let state = self.state()?;
        Ok(state.pokemon.get(&pokemon_id).cloned())
    }

    async fn insert(&self, pokemon_id: i32, name: &str) -> Result<(), DataStoreError> {
        check_name_length(name)?;
        let mut state = self.state()?;
        if state.pokemon.contains_key(&pokemon_id) {
            return Err(DataStoreError::AlreadyExists);
        }

        state.next_row_id += 1;
        let now = Utc::now();
        let record = PokemonRecord {
            id: state.next_row_id,
            pokemon_id,
            name: name.to_string(),
            rename_count: 0,
            created_at: now,
            updated_at: now,
        };
        state.pokemon.insert(pokemon_id, record);
        Ok(())
    }

    async fn rename(&self, pokemon_id: i32, new_name: &str) -> Result<bool, DataStoreError> {
        check_name_length(new_name)?;
        let mut state = self.state()?;
        match state.pokemon.get_mut(&pokemon_id) {
            Some(record) => {
                record.name = new_name.to_string();
                record.rename_count += 1;
                record.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, pokemon_id: i32) -> Result<bool, DataStoreError> {
        let mut state = self.state()?;
        Ok(state.pokemon.remove(&pokemon_id).is_some())
    }
}

#[cfg(test)]
impl InMemoryPokemonStore {
    /// Overwrites the rename counter of an owned pokemon.
    pub(crate) fn set_rename_count(&self, pokemon_id: i32, rename_count: i32) {
        let mut state = self.state().unwrap();
        state.pokemon.get_mut(&pokemon_id).unwrap().rename_count = rename_count;
    }
}
