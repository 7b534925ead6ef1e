//! Database persistence layer for characters and the monster queue.

mod characters;
mod error;
mod models;
mod monsters;
mod schema;
mod store;

pub use characters::CharacterRepository;
pub use error::{StoreError, StoreErrorKind};
pub use models::{
    Character, CharacterKey, DEFAULT_CLASS, Monster, NewCharacter, NewMonster,
    STARTING_HP, STARTING_SKILL_POINTS, STARTING_STAMINA, Stat, mention, roster,
};
pub use monsters::MonsterRepository;
pub use store::Store;
