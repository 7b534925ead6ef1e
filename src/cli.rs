//! Command-line interface for adventure_store.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Adventure Store - characters and monsters for a text role-playing bot
#[derive(Parser, Debug)]
#[command(name = "adventure_store")]
#[command(about = "Manage characters, monsters and the adventure channel", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to a TOML config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Database file (overrides config and ADVENTURE_DATABASE_PATH)
    #[arg(long, global = true)]
    pub db_path: Option<PathBuf>,

    /// Channel pointer file (overrides config and ADVENTURE_CHANNEL_FILE)
    #[arg(long, global = true)]
    pub channel_file: Option<PathBuf>,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// List every character with its level
    Characters,

    /// Show one character, by user ID or name pattern
    Character {
        /// User ID, or a case-insensitive name pattern (`%` wildcards allowed)
        key: String,
    },

    /// Register a new character with starting stats
    Create {
        /// Chat-platform user ID
        id: i64,

        /// Character name
        name: String,
    },

    /// Spend skill points on a stat
    Raise {
        /// strength, agility, wisdom or constitution
        stat: String,

        /// User ID or name pattern
        key: String,

        /// Points to spend
        amount: i32,
    },

    /// Add a monster to the queue
    Spawn {
        /// Monster name
        name: String,

        /// Starting (and maximum) hit points
        #[arg(long)]
        hp: i32,

        /// Strength
        #[arg(long, default_value = "0")]
        strength: i32,

        /// Agility
        #[arg(long, default_value = "0")]
        agility: i32,

        /// Wisdom
        #[arg(long, default_value = "0")]
        wisdom: i32,

        /// Constitution
        #[arg(long, default_value = "0")]
        constitution: i32,

        /// Experience granted on defeat
        #[arg(long, default_value = "0")]
        experience: i32,
    },

    /// Show the monster currently being fought
    Monster,

    /// Deal damage to a queued monster
    Damage {
        /// Monster queue ID
        monster_id: i32,

        /// Hit points to remove
        amount: i32,
    },

    /// Record a character joining the fight against a monster
    Join {
        /// Character user ID
        character_id: i64,

        /// Monster queue ID
        monster_id: i32,
    },

    /// List characters fighting a monster
    Participants {
        /// Monster queue ID
        monster_id: i32,
    },

    /// Set the channel where adventures are announced
    SetChannel {
        /// Channel identifier
        channel_id: String,
    },

    /// Show the adventure channel
    Channel,
}
