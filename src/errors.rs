//! Error types for pokemon storage and game operations.

use thiserror::Error;

/// Errors that can occur during pokemon store operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DataStoreError {
    /// The requested pokemon was not found in the store.
    #[error("Item not found in data store")]
    NotFound,
    /// A pokemon with the same identifier already exists.
    #[error("Item already exists in data store")]
    AlreadyExists,
    /// An internal storage system error occurred.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sqlx::Error> for DataStoreError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::RowNotFound => DataStoreError::NotFound,
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                DataStoreError::AlreadyExists
            }
            _ => DataStoreError::Internal(e.to_string()),
        }
    }
}

/// Errors that end a lifecycle operation without a game outcome.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LifecycleError {
    /// The operation targets a pokemon that is not owned.
    #[error("Pokemon not found")]
    NotFound,
    /// The Fibonacci suffix for this rename count does not fit in a `u128`.
    #[error("rename suffix overflows at rename count {rename_count}")]
    SuffixOverflow {
        /// The rename count the suffix was requested for.
        rename_count: i32,
    },
    /// The store failed.
    #[error(transparent)]
    Store(#[from] DataStoreError),
}

/// Errors from a release attempt.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReleaseError {
    /// The pokemon is not owned. Carries the draw taken before the lookup.
    #[error("Pokemon not found (draw {draw})")]
    NotFound {
        /// The release draw.
        draw: u32,
    },
    /// The store failed.
    #[error(transparent)]
    Store(#[from] DataStoreError),
}
