//! Adventure store - persistence for a text role-playing bot
//!
//! Characters, a queue of monsters to fight, and the chat channel where
//! adventures are announced.
//!
//! # Architecture
//!
//! - **Store**: explicit handle to the SQLite database; one connection per call
//! - **Repositories**: [`CharacterRepository`] and [`MonsterRepository`], each
//!   operation in its own transaction
//! - **Channel pointer**: single-value text file replaced atomically
//!
//! # Example
//!
//! ```no_run
//! use adventure_store::{CharacterKey, CharacterRepository, Store};
//!
//! # fn example() -> Result<(), adventure_store::StoreError> {
//! let store = Store::open("adventure.db")?;
//! let characters = CharacterRepository::new(store);
//! characters.create_character(1234, "Aragorn".to_string())?;
//! characters.raise_stat("strength", &CharacterKey::Id(1234), 2)?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod adventure;
mod channel;
mod config;
mod db;

pub use adventure::Adventure;
pub use channel::{ChannelPointer, DEFAULT_CHANNEL_FILE};
pub use config::{AdventureConfig, ConfigError};
pub use db::{
    Character, CharacterKey, CharacterRepository, DEFAULT_CLASS, Monster, MonsterRepository,
    NewCharacter, NewMonster, STARTING_HP, STARTING_SKILL_POINTS, STARTING_STAMINA, Stat, Store,
    StoreError, StoreErrorKind, mention, roster,
};
