//! PostgreSQL database operations for my-pokemon.
//!
//! Queries live in [`pokemon`]; [`PgPokemonStore`] adapts them to the
//! [`PokemonStore`] trait, running each operation in its own transaction.

use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::migrate::{MigrateError, Migrator};

use crate::{DataStoreError, PokemonRecord, PokemonStore};

/// Pokemon table operations with automatic timestamp tracking.
pub mod pokemon;

/// Migrations embedded from the `migrations/` directory.
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Applies every pending migration.
pub async fn migrate(pool: &PgPool) -> Result<(), MigrateError> {
    MIGRATOR.run(pool).await
}

/// A [`PokemonStore`] backed by the `my_pokemon` table.
#[derive(Debug, Clone)]
pub struct PgPokemonStore {
    pool: PgPool,
}

impl PgPokemonStore {
    /// Wraps an existing connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connects to `database_url`.
    pub async fn connect(database_url: &str) -> Result<Self, DataStoreError> {
        let pool = PgPool::connect(database_url).await?;
        Ok(Self::new(pool))
    }

    /// The underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl PokemonStore for PgPokemonStore {
    async fn list(&self) -> Result<Vec<PokemonRecord>, DataStoreError> {
        let mut tx = self.pool.begin().await?;
        let records = pokemon::list(&mut tx).await?;
        tx.commit().await?;
        Ok(records)
    }

    async fn get(&self, pokemon_id: i32) -> Result<Option<PokemonRecord>, DataStoreError> {
        let mut tx = self.pool.begin().await?;
        let record = pokemon::get(&mut tx, pokemon_id).await?;
        tx.commit().await?;
        Ok(record)
    }

    async fn insert(&self, pokemon_id: i32, name: &str) -> Result<(), DataStoreError> {
        let mut tx = self.pool.begin().await?;
        pokemon::create(&mut tx, pokemon_id, name).await?;
        tx.commit().await?;
        Ok(())
    }

    async fn rename(&self, pokemon_id: i32, new_name: &str) -> Result<bool, DataStoreError> {
        let mut tx = self.pool.begin().await?;
        let renamed = pokemon::rename(&mut tx, pokemon_id, new_name).await?;
        tx.commit().await?;
        Ok(renamed)
    }

    async fn delete(&self, pokemon_id: i32) -> Result<bool, DataStoreError> {
        let mut tx = self.pool.begin().await?;
        let deleted = pokemon::delete(&mut tx, pokemon_id).await?;
        tx.commit().await?;
        Ok(deleted)
    }
}
