//! Character repository: registration, lookup, and stat raises.

use diesel::prelude::*;
use tracing::{debug, info, instrument, warn};

use crate::db::models::StatChanges;
use crate::db::{Character, CharacterKey, NewCharacter, Store, StoreError, schema};

/// Repository for player characters.
#[derive(Debug, Clone)]
pub struct CharacterRepository {
    store: Store,
}

impl CharacterRepository {
    /// Creates a repository backed by `store`.
    #[instrument(skip(store))]
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Lists every character in registration order.
    ///
    /// An empty table yields an empty list, not an error.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn list_characters(&self) -> Result<Vec<Character>, StoreError> {
        debug!("Listing all characters");
        let mut conn = self.store.connection()?;

        let characters = schema::character::table
            .select(Character::as_select())
            .order(schema::character::seq.asc())
            .load(&mut conn)?;

        info!(count = characters.len(), "Characters loaded");
        Ok(characters)
    }

    /// Looks up one character. Returns `None` if nothing matches.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if a database error occurs.
    #[instrument(skip(self), fields(key = %key))]
    pub fn get_character(&self, key: &CharacterKey) -> Result<Option<Character>, StoreError> {
        let mut conn = self.store.connection()?;
        let found = find_character(&mut conn, key)?;

        match &found {
            Some(c) => debug!(character_id = c.id(), "Character found"),
            None => debug!("Character not found"),
        }
        Ok(found)
    }

    /// Registers a new character with starting stats.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] with kind `AlreadyExists` if the ID or name is
    /// taken, `InvalidArgument` for a blank name, or `Storage` on database
    /// failure.
    #[instrument(skip(self, name), fields(name = %name))]
    pub fn create_character(&self, id: i64, name: String) -> Result<Character, StoreError> {
        if name.trim().is_empty() {
            return Err(StoreError::invalid_argument("Character name is empty"));
        }
        let mut conn = self.store.connection()?;

        let created = conn.transaction::<_, StoreError, _>(|conn| {
            let taken: i64 = schema::character::table
                .filter(
                    schema::character::id
                        .eq(id)
                        .or(schema::character::name.eq(&name)),
                )
                .count()
                .get_result(conn)?;
            if taken > 0 {
                warn!(character_id = id, "Character already registered");
                return Err(StoreError::already_exists(format!(
                    "Character {} or name '{}' already registered",
                    id, name
                )));
            }

            let new_character = NewCharacter::with_defaults(id, name.clone());
            let character = diesel::insert_into(schema::character::table)
                .values(&new_character)
                .returning(Character::as_returning())
                .get_result(conn)?;
            Ok(character)
        })?;

        info!(character_id = created.id(), "Character created");
        Ok(created)
    }

    /// Spends `amount` skill points on `stat_name` for the character `key`.
    ///
    /// Runs in a single write-locking transaction. The update is guarded by
    /// the revision read at the start, so a concurrent change to the same
    /// character is reported instead of overwritten.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] with kind `NotFound`, `InsufficientResource`,
    /// `InvalidArgument`, `Conflict`, or `Storage`. The record is unchanged on
    /// any error.
    #[instrument(skip(self), fields(key = %key))]
    pub fn raise_stat(
        &self,
        stat_name: &str,
        key: &CharacterKey,
        amount: i32,
    ) -> Result<Character, StoreError> {
        let mut conn = self.store.connection()?;

        let updated = conn.immediate_transaction::<_, StoreError, _>(|conn| {
            let mut character = find_character(conn, key)?
                .ok_or_else(|| StoreError::not_found(format!("No character matches {}", key)))?;
            let loaded_revision = *character.revision();

            let stat = character.spend_skill_points(stat_name, amount)?;
            debug!(%stat, amount, "Skill points spent");

            let changes = StatChanges::next_revision_of(&character);
            diesel::update(
                schema::character::table
                    .filter(schema::character::id.eq(*character.id()))
                    .filter(schema::character::revision.eq(loaded_revision)),
            )
            .set(&changes)
            .returning(Character::as_returning())
            .get_result(conn)
            .optional()?
            .ok_or_else(|| {
                StoreError::conflict(format!(
                    "Character {} changed during stat raise",
                    character.id()
                ))
            })
        })?;

        info!(
            character_id = updated.id(),
            skill_points = updated.skill_points(),
            revision = updated.revision(),
            "Stat raised"
        );
        Ok(updated)
    }
}

/// Finds a character by ID or by name pattern inside an open connection.
///
/// Name patterns match case-insensitively; the earliest registration wins
/// when several names match.
pub(crate) fn find_character(
    conn: &mut SqliteConnection,
    key: &CharacterKey,
) -> Result<Option<Character>, StoreError> {
    let query = schema::character::table.select(Character::as_select());
    let found = match key {
        CharacterKey::Id(id) => query
            .filter(schema::character::id.eq(*id))
            .first(conn)
            .optional()?,
        CharacterKey::Name(pattern) => query
            .filter(schema::character::name.like(pattern.as_str()))
            .order(schema::character::seq.asc())
            .first(conn)
            .optional()?,
    };
    Ok(found)
}
