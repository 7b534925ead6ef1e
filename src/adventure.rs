//! Adventure facade bundling the repositories and channel pointer.

use derive_getters::Getters;
use tracing::{debug, info, instrument};

use crate::{
    AdventureConfig, ChannelPointer, Character, CharacterKey, CharacterRepository,
    MonsterRepository, Store, StoreError,
};

/// Everything a command handler needs, built from one [`AdventureConfig`].
#[derive(Debug, Clone, Getters)]
pub struct Adventure {
    characters: CharacterRepository,
    monsters: MonsterRepository,
    channel: ChannelPointer,
}

impl Adventure {
    /// Opens the database (applying migrations) and wires the repositories.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the database cannot be opened or migrated.
    #[instrument(skip(config))]
    pub fn open(config: &AdventureConfig) -> Result<Self, StoreError> {
        let store = Store::open(config.database_path())?;
        info!(db_path = %store.db_path().display(), "Adventure storage ready");
        Ok(Self::with_store(store, ChannelPointer::new(config.channel_file())))
    }

    /// Wires repositories around an existing store handle.
    #[instrument(skip(store, channel))]
    pub fn with_store(store: Store, channel: ChannelPointer) -> Self {
        Self {
            characters: CharacterRepository::new(store.clone()),
            monsters: MonsterRepository::new(store),
            channel,
        }
    }

    /// Returns the character registered under `id`, creating it if needed.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if creation fails, including `AlreadyExists`
    /// when `name` belongs to another ID.
    #[instrument(skip(self, name), fields(name = %name))]
    pub fn get_or_create_character(&self, id: i64, name: String) -> Result<Character, StoreError> {
        debug!(character_id = id, "Getting or creating character");

        if let Some(existing) = self.characters.get_character(&CharacterKey::Id(id))? {
            info!(character_id = id, "Existing character found");
            return Ok(existing);
        }

        self.characters.create_character(id, name)
    }
}
