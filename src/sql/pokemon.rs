//! Pokemon operations for PostgreSQL database.
//!
//! This module provides functions for managing rows of the `my_pokemon` table
//! with automatic timestamp tracking for created_at and updated_at fields.

use sqlx::{Postgres, Transaction};

use crate::{DataStoreError, PokemonRecord};

/// Result type for database operations.
pub type SqlResult<T> = Result<T, DataStoreError>;

/// Inserts a newly caught pokemon with a rename count of zero.
///
/// # Arguments
/// * `tx` - PostgreSQL transaction
/// * `pokemon_id` - The pokemon's identifier
/// * `name` - The display name
///
/// # Returns
/// * `Ok(())` - Pokemon created successfully
/// * `Err(DataStoreError::AlreadyExists)` - The id is already in the table
/// * `Err(DataStoreError::Internal)` - Database error
///
/// # Examples
/// ```no_run
/// # use my_pokemon::sql;
/// # use sqlx::PgPool;
/// # async fn example(pool: PgPool) -> Result<(), Box<dyn std::error::Error>> {
/// let mut tx = pool.begin().await?;
/// sql::pokemon::create(&mut tx, 25, "Pikachu").await?;
/// tx.commit().await?;
/// # Ok(())
/// # }
/// ```
pub async fn create(
    tx: &mut Transaction<'_, Postgres>,
    pokemon_id: i32,
    name: &str,
) -> SqlResult<()> {
    let result = sqlx::query(
        r#"
        INSERT INTO my_pokemon (pokemon_id, name, rename_count)
        VALUES ($1, $2, 0)
        "#,
    )
    .bind(pokemon_id)
    .bind(name)
    .execute(&mut **tx)
    .await;

    match result {
        Ok(_) => Ok(()),
        Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
            Err(DataStoreError::AlreadyExists)
        }
        Err(e) => {
            tracing::error!(pokemon_id, error = %e, "database error creating pokemon");
            Err(DataStoreError::Internal(e.to_string()))
        }
    }
}

/// Retrieves a pokemon by its identifier.
///
/// # Returns
/// * `Ok(Some(PokemonRecord))` - Pokemon found
/// * `Ok(None)` - Pokemon not found
/// * `Err(DataStoreError::Internal)` - Database error
pub async fn get(
    tx: &mut Transaction<'_, Postgres>,
    pokemon_id: i32,
) -> SqlResult<Option<PokemonRecord>> {
    let result = sqlx::query_as::<_, PokemonRecord>(
        r#"
        SELECT id, pokemon_id, name, rename_count, created_at, updated_at
        FROM my_pokemon
        WHERE pokemon_id = $1
        "#,
    )
    .bind(pokemon_id)
    .fetch_optional(&mut **tx)
    .await;

    match result {
        Ok(record) => Ok(record),
        Err(e) => {
            tracing::error!(pokemon_id, error = %e, "database error getting pokemon");
            Err(DataStoreError::Internal(e.to_string()))
        }
    }
}

/// Lists all pokemon in insertion order.
pub async fn list(tx: &mut Transaction<'_, Postgres>) -> SqlResult<Vec<PokemonRecord>> {
    let result = sqlx::query_as::<_, PokemonRecord>(
        r#"
        SELECT id, pokemon_id, name, rename_count, created_at, updated_at
        FROM my_pokemon
        ORDER BY id ASC
        "#,
    )
    .fetch_all(&mut **tx)
    .await;

    match result {
        Ok(records) => Ok(records),
        Err(e) => {
            tracing::error!(error = %e, "database error listing pokemon");
            Err(DataStoreError::Internal(e.to_string()))
        }
    }
}

/// Sets a new name and increments the rename count in a single statement.
///
/// # Returns
/// * `Ok(true)` - Pokemon existed and was renamed
/// * `Ok(false)` - Pokemon did not exist
/// * `Err(DataStoreError::Internal)` - Database error
pub async fn rename(
    tx: &mut Transaction<'_, Postgres>,
    pokemon_id: i32,
    new_name: &str,
) -> SqlResult<bool> {
    let result = sqlx::query(
        r#"
        UPDATE my_pokemon
        SET name = $1, rename_count = rename_count + 1, updated_at = CURRENT_TIMESTAMP
        WHERE pokemon_id = $2
        "#,
    )
    .bind(new_name)
    .bind(pokemon_id)
    .execute(&mut **tx)
    .await;

    match result {
        Ok(result) => Ok(result.rows_affected() > 0),
        Err(e) => {
            tracing::error!(pokemon_id, error = %e, "database error renaming pokemon");
            Err(DataStoreError::Internal(e.to_string()))
        }
    }
}

/// Deletes a pokemon.
///
/// # Returns
/// * `Ok(true)` - Pokemon existed and was deleted
/// * `Ok(false)` - Pokemon did not exist
/// * `Err(DataStoreError::Internal)` - Database error
pub async fn delete(tx: &mut Transaction<'_, Postgres>, pokemon_id: i32) -> SqlResult<bool> {
    let result = sqlx::query(
        r#"
        DELETE FROM my_pokemon
        WHERE pokemon_id = $1
        "#,
    )
    .bind(pokemon_id)
    .execute(&mut **tx)
    .await;

    match result {
        Ok(result) => Ok(result.rows_affected() > 0),
        Err(e) => {
            tracing::error!(pokemon_id, error = %e, "database error deleting pokemon");
            Err(DataStoreError::Internal(e.to_string()))
        }
    }
}
