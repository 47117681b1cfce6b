//! # Catch / Rename / Release
//!
//! A pokemon id is either absent or owned. The three transitions below are the
//! whole game:
//!
//! ```text
//!            catch (roll < 0.5, id absent)
//!   ABSENT ─────────────────────────────────▶ OWNED ──┐
//!     ▲                                          │     │ rename
//!     └──────────── release (prime draw) ────────┘ ◀───┘
//! ```
//!
//! Failing a random gate, or catching an id that is already owned, is a game
//! outcome and not an error. Only a missing pokemon on rename, an unrepresentable
//! rename suffix, or a store failure produce a [`LifecycleError`].

use crate::{
    DataStoreError, LifecycleError, PokemonStore, RandomSource, ReleaseError, fibonacci,
    is_prime,
};

/// A catch roll strictly below this value catches the pokemon.
pub const CATCH_PROBABILITY: f64 = 0.5;

/// Result of a catch attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatchOutcome {
    /// The pokemon is now owned.
    Caught {
        /// The caught pokemon's id.
        pokemon_id: i32,
        /// The name it was stored under.
        name: String,
    },
    /// The catch roll failed; nothing was stored.
    Escaped,
    /// The id is already owned; nothing was stored.
    AlreadyOwned,
}

/// Result of a successful rename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenameOutcome {
    /// The renamed pokemon's id.
    pub pokemon_id: i32,
    /// The name stored before the rename.
    pub previous_name: String,
    /// The name stored after the rename.
    pub name: String,
}

/// Result of a release attempt against an owned pokemon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseOutcome {
    /// The draw was prime and the pokemon was deleted.
    Released {
        /// The release draw.
        draw: u32,
    },
    /// The draw was not prime; the pokemon is still owned.
    Kept {
        /// The release draw.
        draw: u32,
    },
}

/// Builds the name a pokemon receives on its next rename.
///
/// The suffix is the Fibonacci number at the pokemon's current rename count,
/// so successive renames append `-0`, `-1`, `-1`, `-2`, `-3`, `-5`, ...
///
/// # Examples
/// ```
/// use my_pokemon::renamed_name;
///
/// assert_eq!(renamed_name("Pikachu", 0).unwrap(), "Pikachu-0");
/// assert_eq!(renamed_name("Pikachu-0", 1).unwrap(), "Pikachu-0-1");
/// assert_eq!(renamed_name("Raichu", 10).unwrap(), "Raichu-55");
/// ```
pub fn renamed_name(base: &str, rename_count: i32) -> Result<String, LifecycleError> {
    let suffix = u32::try_from(rename_count)
        .ok()
        .and_then(fibonacci)
        .ok_or(LifecycleError::SuffixOverflow { rename_count })?;
    Ok(format!("{}-{}", base, suffix))
}

/// Attempts to catch `pokemon_id` under `name`.
///
/// The catch roll is drawn before the store is consulted, so an escaped
/// pokemon never costs a store round trip.
pub async fn catch(
    store: &dyn PokemonStore,
    rng: &dyn RandomSource,
    pokemon_id: i32,
    name: &str,
) -> Result<CatchOutcome, DataStoreError> {
    let roll = rng.catch_roll();
    if roll >= CATCH_PROBABILITY {
        tracing::debug!(pokemon_id, roll, "pokemon escaped");
        return Ok(CatchOutcome::Escaped);
    }

    if store.get(pokemon_id).await?.is_some() {
        tracing::debug!(pokemon_id, "pokemon already owned");
        return Ok(CatchOutcome::AlreadyOwned);
    }

    match store.insert(pokemon_id, name).await {
        Ok(()) => {
            tracing::info!(pokemon_id, name, "caught pokemon");
            Ok(CatchOutcome::Caught {
                pokemon_id,
                name: name.to_string(),
            })
        }
        // Another catch of the same id got in between the lookup and the insert.
        Err(DataStoreError::AlreadyExists) => {
            tracing::debug!(pokemon_id, "pokemon caught concurrently");
            Ok(CatchOutcome::AlreadyOwned)
        }
        Err(e) => Err(e),
    }
}

/// Renames an owned pokemon to `base` plus its Fibonacci suffix.
pub async fn rename(
    store: &dyn PokemonStore,
    pokemon_id: i32,
    base: &str,
) -> Result<RenameOutcome, LifecycleError> {
    let record = store
        .get(pokemon_id)
        .await?
        .ok_or(LifecycleError::NotFound)?;

    let name = renamed_name(base, record.rename_count)?;
    if !store.rename(pokemon_id, &name).await? {
        return Err(LifecycleError::NotFound);
    }

    tracing::info!(
        pokemon_id,
        previous_name = %record.name,
        name = %name,
        rename_count = record.rename_count + 1,
        "renamed pokemon"
    );
    Ok(RenameOutcome {
        pokemon_id,
        previous_name: record.name,
        name,
    })
}

/// Attempts to release an owned pokemon.
///
/// The release draw is taken first; a missing pokemon is reported together
/// with the draw that would have decided its fate.
pub async fn release(
    store: &dyn PokemonStore,
    rng: &dyn RandomSource,
    pokemon_id: i32,
) -> Result<ReleaseOutcome, ReleaseError> {
    let draw = rng.release_draw();

    if store.get(pokemon_id).await?.is_none() {
        return Err(ReleaseError::NotFound { draw });
    }

    if !is_prime(i64::from(draw)) {
        tracing::debug!(pokemon_id, draw, "pokemon refused to leave");
        return Ok(ReleaseOutcome::Kept { draw });
    }

    if !store.delete(pokemon_id).await? {
        return Err(ReleaseError::NotFound { draw });
    }
    tracing::info!(pokemon_id, draw, "released pokemon");
    Ok(ReleaseOutcome::Released { draw })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::InMemoryPokemonStore;
    use crate::random::tests::FixedRandom;

    #[test]
    fn renamed_name_follows_fibonacci() {
        let names: Vec<String> = (0..7)
            .map(|count| renamed_name("Eevee", count).unwrap())
            .collect();
        assert_eq!(
            names,
            vec![
                "Eevee-0", "Eevee-1", "Eevee-1", "Eevee-2", "Eevee-3", "Eevee-5", "Eevee-8"
            ]
        );
    }

    #[test]
    fn renamed_name_overflow() {
        assert_eq!(
            renamed_name("Eevee", 187),
            Err(LifecycleError::SuffixOverflow { rename_count: 187 })
        );
        assert_eq!(
            renamed_name("Eevee", -1),
            Err(LifecycleError::SuffixOverflow { rename_count: -1 })
        );
        assert!(renamed_name("Eevee", 186).is_ok());
    }

    #[tokio::test]
    async fn catch_success_stores_pokemon() {
        let store = InMemoryPokemonStore::new();
        let outcome = catch(&store, &FixedRandom::catching(), 5, "Pikachu")
            .await
            .unwrap();
        assert_eq!(
            outcome,
            CatchOutcome::Caught {
                pokemon_id: 5,
                name: "Pikachu".to_string()
            }
        );

        let record = store.get(5).await.unwrap().unwrap();
        assert_eq!(record.name, "Pikachu");
        assert_eq!(record.rename_count, 0);
    }

    #[tokio::test]
    async fn catch_roll_at_threshold_escapes() {
        let store = InMemoryPokemonStore::new();
        let rng = FixedRandom {
            catch_roll: CATCH_PROBABILITY,
            release_draw: 0,
        };
        let outcome = catch(&store, &rng, 5, "Pikachu").await.unwrap();
        assert_eq!(outcome, CatchOutcome::Escaped);
        assert!(store.get(5).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn catch_owned_pokemon_changes_nothing() {
        let store = InMemoryPokemonStore::new();
        store.insert(5, "Pikachu").await.unwrap();
        store.rename(5, "Pikachu-0").await.unwrap();

        let outcome = catch(&store, &FixedRandom::catching(), 5, "Sparky")
            .await
            .unwrap();
        assert_eq!(outcome, CatchOutcome::AlreadyOwned);

        let record = store.get(5).await.unwrap().unwrap();
        assert_eq!(record.name, "Pikachu-0");
        assert_eq!(record.rename_count, 1);
    }

    #[tokio::test]
    async fn rename_sequence() {
        let store = InMemoryPokemonStore::new();
        catch(&store, &FixedRandom::catching(), 5, "Pikachu")
            .await
            .unwrap();

        let first = rename(&store, 5, "Pikachu").await.unwrap();
        assert_eq!(first.previous_name, "Pikachu");
        assert_eq!(first.name, "Pikachu-0");
        let record = store.get(5).await.unwrap().unwrap();
        assert_eq!((record.name.as_str(), record.rename_count), ("Pikachu-0", 1));

        let second = rename(&store, 5, "Pikachu-0").await.unwrap();
        assert_eq!(second.previous_name, "Pikachu-0");
        assert_eq!(second.name, "Pikachu-0-1");
        let record = store.get(5).await.unwrap().unwrap();
        assert_eq!(
            (record.name.as_str(), record.rename_count),
            ("Pikachu-0-1", 2)
        );
    }

    #[tokio::test]
    async fn rename_uses_supplied_base() {
        let store = InMemoryPokemonStore::new();
        store.insert(7, "Squirtle").await.unwrap();

        let outcome = rename(&store, 7, "Wartortle").await.unwrap();
        assert_eq!(outcome.previous_name, "Squirtle");
        assert_eq!(outcome.name, "Wartortle-0");
    }

    #[tokio::test]
    async fn rename_missing_is_not_found() {
        let store = InMemoryPokemonStore::new();
        assert_eq!(
            rename(&store, 5, "Pikachu").await,
            Err(LifecycleError::NotFound)
        );
    }

    #[tokio::test]
    async fn rename_past_last_suffix_overflows_and_keeps_record() {
        let store = InMemoryPokemonStore::new();
        store.insert(5, "Pikachu").await.unwrap();
        store.set_rename_count(5, 187);

        assert_eq!(
            rename(&store, 5, "Pikachu").await,
            Err(LifecycleError::SuffixOverflow { rename_count: 187 })
        );
        let record = store.get(5).await.unwrap().unwrap();
        assert_eq!((record.name.as_str(), record.rename_count), ("Pikachu", 187));
    }

    #[tokio::test]
    async fn release_prime_draw_deletes() {
        let store = InMemoryPokemonStore::new();
        store.insert(5, "Pikachu").await.unwrap();

        let rng = FixedRandom {
            catch_roll: 0.0,
            release_draw: 97,
        };
        let outcome = release(&store, &rng, 5).await.unwrap();
        assert_eq!(outcome, ReleaseOutcome::Released { draw: 97 });
        assert!(store.get(5).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn release_composite_draw_keeps() {
        let store = InMemoryPokemonStore::new();
        store.insert(5, "Pikachu").await.unwrap();

        for draw in [0, 1, 4, 9, 99] {
            let rng = FixedRandom {
                catch_roll: 0.0,
                release_draw: draw,
            };
            let outcome = release(&store, &rng, 5).await.unwrap();
            assert_eq!(outcome, ReleaseOutcome::Kept { draw });
        }
        assert!(store.get(5).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn release_missing_is_not_found_for_every_draw() {
        let store = InMemoryPokemonStore::new();
        for draw in 0..100 {
            let rng = FixedRandom {
                catch_roll: 0.0,
                release_draw: draw,
            };
            assert_eq!(
                release(&store, &rng, 5).await,
                Err(ReleaseError::NotFound { draw })
            );
        }
    }
}
