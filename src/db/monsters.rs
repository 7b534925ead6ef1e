//! Monster queue repository and battle participation.

use diesel::prelude::*;
use tracing::{debug, info, instrument};

use crate::db::models::{MonsterRow, NewParticipation};
use crate::db::{Character, Monster, NewMonster, Store, StoreError, schema};

/// Repository for the monster queue.
#[derive(Debug, Clone)]
pub struct MonsterRepository {
    store: Store,
}

impl MonsterRepository {
    /// Creates a repository backed by `store`.
    #[instrument(skip(store))]
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Appends a monster to the queue at full health.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] with kind `InvalidArgument` for a descriptor
    /// that fails validation, or `Storage` if the insert fails.
    #[instrument(skip(self, monster), fields(name = %monster.name(), hp = monster.hp()))]
    pub fn spawn_monster(&self, monster: &NewMonster) -> Result<Monster, StoreError> {
        monster.validate()?;
        let mut conn = self.store.connection()?;

        let spawned = conn.transaction::<_, StoreError, _>(|conn| {
            let row = MonsterRow::from(monster);
            let spawned = diesel::insert_into(schema::monster_queue::table)
                .values(&row)
                .returning(Monster::as_returning())
                .get_result(conn)?;
            Ok(spawned)
        })?;

        info!(monster_id = spawned.id(), "Monster spawned");
        Ok(spawned)
    }

    /// Returns the earliest queued monster still alive, if any.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn active_monster(&self) -> Result<Option<Monster>, StoreError> {
        let mut conn = self.store.connection()?;

        let monster = schema::monster_queue::table
            .select(Monster::as_select())
            .filter(schema::monster_queue::current_hp.gt(0))
            .order(schema::monster_queue::id.asc())
            .first(&mut conn)
            .optional()?;

        match &monster {
            Some(m) => debug!(monster_id = m.id(), current_hp = m.current_hp(), "Active monster"),
            None => debug!("No monster alive"),
        }
        Ok(monster)
    }

    /// Deals `amount` damage to a queued monster. Hit points stop at zero.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] with kind `NotFound` for an unknown monster,
    /// `InvalidArgument` for a negative amount, or `Storage` on database
    /// failure.
    #[instrument(skip(self))]
    pub fn damage_monster(&self, monster_id: i32, amount: i32) -> Result<Monster, StoreError> {
        if amount < 0 {
            return Err(StoreError::invalid_argument(format!(
                "Damage must be non-negative, got {}",
                amount
            )));
        }
        let mut conn = self.store.connection()?;

        let monster = conn.immediate_transaction::<_, StoreError, _>(|conn| {
            let current: i32 = schema::monster_queue::table
                .find(monster_id)
                .select(schema::monster_queue::current_hp)
                .first(conn)
                .optional()?
                .ok_or_else(|| StoreError::not_found(format!("No monster #{}", monster_id)))?;

            let remaining = current.saturating_sub(amount).max(0);
            let monster = diesel::update(schema::monster_queue::table.find(monster_id))
                .set(schema::monster_queue::current_hp.eq(remaining))
                .returning(Monster::as_returning())
                .get_result(conn)?;
            Ok(monster)
        })?;

        info!(
            monster_id = monster.id(),
            current_hp = monster.current_hp(),
            alive = monster.is_alive(),
            "Monster damaged"
        );
        Ok(monster)
    }

    /// Records that a character takes part in the fight against a monster.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] with kind `AlreadyExists` if already recorded,
    /// `NotFound` if the character or monster does not exist, or `Storage`
    /// on database failure.
    #[instrument(skip(self))]
    pub fn join_battle(&self, character_id: i64, monster_id: i32) -> Result<(), StoreError> {
        let mut conn = self.store.connection()?;

        conn.transaction::<_, StoreError, _>(|conn| {
            diesel::insert_into(schema::battle_participation::table)
                .values(&NewParticipation::new(character_id, monster_id))
                .execute(conn)?;
            Ok(())
        })?;

        info!("Character joined battle");
        Ok(())
    }

    /// Lists the characters fighting a monster, in join order.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn battle_participants(&self, monster_id: i32) -> Result<Vec<Character>, StoreError> {
        let mut conn = self.store.connection()?;

        let participants = schema::character::table
            .inner_join(schema::battle_participation::table)
            .filter(schema::battle_participation::monster_id.eq(monster_id))
            .order(schema::battle_participation::seq.asc())
            .select(Character::as_select())
            .load(&mut conn)?;

        info!(count = participants.len(), "Battle participants loaded");
        Ok(participants)
    }
}
