//! Database models and domain types.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use derive_getters::Getters;
use derive_new::new;
use diesel::prelude::*;
use strum::{Display, EnumIter, EnumString};
use tracing::instrument;

use crate::db::{StoreError, schema};

/// Class given to every freshly registered character.
pub const DEFAULT_CLASS: &str = "Combattant";
/// Skill points a new character starts with.
pub const STARTING_SKILL_POINTS: i32 = 5;
/// Hit points a new character starts with.
pub const STARTING_HP: i32 = 12;
/// Stamina a new character starts with.
pub const STARTING_STAMINA: i32 = 100;

/// Player character database model.
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Identifiable, Selectable, Getters)]
#[diesel(table_name = schema::character)]
pub struct Character {
    seq: i32,
    id: i64,
    name: String,
    class: String,
    experience: i32,
    level: i32,
    strength: i32,
    agility: i32,
    wisdom: i32,
    constitution: i32,
    skill_points: i32,
    current_hp: i32,
    stamina: i32,
    revision: i32,
    created_at: NaiveDateTime,
}

impl Character {
    /// Returns the value of one stat.
    pub fn stat(&self, stat: Stat) -> i32 {
        match stat {
            Stat::Strength => self.strength,
            Stat::Agility => self.agility,
            Stat::Wisdom => self.wisdom,
            Stat::Constitution => self.constitution,
        }
    }

    /// Spends `amount` skill points on the stat named `stat_name`.
    ///
    /// Checks run in a fixed order: the amount must be positive, the balance
    /// must cover it, then the stat name must be known. Nothing is modified
    /// unless every check passes.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] with kind `InvalidArgument` or
    /// `InsufficientResource`.
    #[instrument(skip(self), fields(character_id = self.id, skill_points = self.skill_points))]
    pub fn spend_skill_points(&mut self, stat_name: &str, amount: i32) -> Result<Stat, StoreError> {
        if amount <= 0 {
            return Err(StoreError::invalid_argument(format!(
                "Amount must be positive, got {}",
                amount
            )));
        }
        if amount > self.skill_points {
            return Err(StoreError::insufficient(format!(
                "Not enough skill points: need {}, have {}",
                amount, self.skill_points
            )));
        }
        let stat = Stat::from_str(stat_name)
            .map_err(|_| StoreError::invalid_argument(format!("Wrong stat: '{}'", stat_name)))?;

        let slot = match stat {
            Stat::Strength => &mut self.strength,
            Stat::Agility => &mut self.agility,
            Stat::Wisdom => &mut self.wisdom,
            Stat::Constitution => &mut self.constitution,
        };
        *slot += amount;
        self.skill_points -= amount;
        Ok(stat)
    }

    /// Mention markup for the owning chat user.
    pub fn mention(&self) -> String {
        mention(self.id)
    }
}

/// Formats a chat-platform user ID as mention markup.
pub fn mention(user_id: i64) -> String {
    format!("<@{}>", user_id)
}

/// Formats characters as a one-line roster, e.g. `<@1> (niv. 2) <@7> (niv. 1)`.
#[instrument(skip(characters), fields(count = characters.len()))]
pub fn roster(characters: &[Character]) -> String {
    characters
        .iter()
        .map(|c| format!("{} (niv. {})", c.mention(), c.level))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Insertable character model, always built with starting defaults.
#[derive(Debug, Clone, Insertable, Getters)]
#[diesel(table_name = schema::character)]
pub struct NewCharacter {
    id: i64,
    name: String,
    class: String,
    experience: i32,
    level: i32,
    strength: i32,
    agility: i32,
    wisdom: i32,
    constitution: i32,
    skill_points: i32,
    current_hp: i32,
    stamina: i32,
}

impl NewCharacter {
    /// Creates a level 1 character with the default class and stats.
    #[instrument(skip(name), fields(name = %name))]
    pub fn with_defaults(id: i64, name: String) -> Self {
        Self {
            id,
            name,
            class: DEFAULT_CLASS.to_string(),
            experience: 0,
            level: 1,
            strength: 1,
            agility: 1,
            wisdom: 1,
            constitution: 1,
            skill_points: STARTING_SKILL_POINTS,
            current_hp: STARTING_HP,
            stamina: STARTING_STAMINA,
        }
    }
}

/// Columns touched by a stat raise.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = schema::character)]
pub(crate) struct StatChanges {
    strength: i32,
    agility: i32,
    wisdom: i32,
    constitution: i32,
    skill_points: i32,
    revision: i32,
}

impl StatChanges {
    /// Captures the stat columns of `character` and bumps its revision.
    pub(crate) fn next_revision_of(character: &Character) -> Self {
        Self {
            strength: character.strength,
            agility: character.agility,
            wisdom: character.wisdom,
            constitution: character.constitution,
            skill_points: character.skill_points,
            revision: character.revision + 1,
        }
    }
}

/// One of the four trainable stats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Stat {
    /// Physical power.
    Strength,
    /// Speed and dodge.
    Agility,
    /// Magic aptitude.
    Wisdom,
    /// Toughness.
    Constitution,
}

/// How a caller identifies a character.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CharacterKey {
    /// Exact chat-platform user ID.
    Id(i64),
    /// Case-insensitive SQL `LIKE` pattern on the character name.
    Name(String),
}

impl fmt::Display for CharacterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "#{}", id),
            Self::Name(pattern) => write!(f, "'{}'", pattern),
        }
    }
}

impl FromStr for CharacterKey {
    type Err = std::convert::Infallible;

    /// Digits become [`CharacterKey::Id`], anything else a name pattern.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.parse::<i64>() {
            Ok(id) => Self::Id(id),
            Err(_) => Self::Name(s.to_string()),
        })
    }
}

/// Queued monster database model.
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Identifiable, Selectable, Getters)]
#[diesel(table_name = schema::monster_queue)]
pub struct Monster {
    id: i32,
    name: String,
    current_hp: i32,
    max_hp: i32,
    strength: i32,
    agility: i32,
    wisdom: i32,
    constitution: i32,
    experience: i32,
    spawned_at: NaiveDateTime,
}

impl Monster {
    /// Whether the monster can still fight.
    pub fn is_alive(&self) -> bool {
        self.current_hp > 0
    }
}

/// Description of a monster to spawn.
#[derive(Debug, Clone, PartialEq, Eq, new, Getters)]
pub struct NewMonster {
    name: String,
    hp: i32,
    strength: i32,
    agility: i32,
    wisdom: i32,
    constitution: i32,
    experience: i32,
}

impl NewMonster {
    /// Rejects descriptors that could never form a live queue entry.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] with kind `InvalidArgument`.
    #[instrument(skip(self), fields(name = %self.name))]
    pub fn validate(&self) -> Result<(), StoreError> {
        if self.name.trim().is_empty() {
            return Err(StoreError::invalid_argument("Monster name is empty"));
        }
        if self.hp <= 0 {
            return Err(StoreError::invalid_argument(format!(
                "Monster hit points must be positive, got {}",
                self.hp
            )));
        }
        let stats = [self.strength, self.agility, self.wisdom, self.constitution];
        if stats.iter().any(|s| *s < 0) || self.experience < 0 {
            return Err(StoreError::invalid_argument(
                "Monster stats and experience must be non-negative",
            ));
        }
        Ok(())
    }
}

/// Insertable queue row; current and max hit points start equal.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = schema::monster_queue)]
pub(crate) struct MonsterRow<'a> {
    name: &'a str,
    current_hp: i32,
    max_hp: i32,
    strength: i32,
    agility: i32,
    wisdom: i32,
    constitution: i32,
    experience: i32,
}

impl<'a> From<&'a NewMonster> for MonsterRow<'a> {
    fn from(m: &'a NewMonster) -> Self {
        Self {
            name: &m.name,
            current_hp: m.hp,
            max_hp: m.hp,
            strength: m.strength,
            agility: m.agility,
            wisdom: m.wisdom,
            constitution: m.constitution,
            experience: m.experience,
        }
    }
}

/// Link row recording that a character fights a monster.
#[derive(Debug, Clone, Insertable, new)]
#[diesel(table_name = schema::battle_participation)]
pub(crate) struct NewParticipation {
    character_id: i64,
    monster_id: i32,
}
