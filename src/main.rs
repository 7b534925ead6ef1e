//! Adventure Store - CLI
//!
//! Runs one storage operation per invocation.

#![warn(missing_docs)]

mod cli;

use std::path::PathBuf;

use adventure_store::{
    Adventure, AdventureConfig, CharacterKey, NewMonster, Stat, StoreErrorKind, mention, roster,
};
use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command};
use strum::IntoEnumIterator;
use tracing::{info, instrument, warn};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;
    let adventure = Adventure::open(&config)?;

    match run(&adventure, cli.command) {
        Err(e) if e.kind() != StoreErrorKind::Storage => {
            // Expected refusals are reported, not treated as crashes.
            warn!(kind = %e.kind(), "Command refused");
            eprintln!("{}: {}", e.kind(), e.message);
            std::process::exit(2);
        }
        other => Ok(other?),
    }
}

/// Merges the config file, environment and flags, later sources winning.
#[instrument(skip(cli))]
fn load_config(cli: &Cli) -> Result<AdventureConfig> {
    let base = match &cli.config {
        Some(path) => AdventureConfig::from_file(path)?,
        None => AdventureConfig::default(),
    };

    let env_path = |name: &str| std::env::var_os(name).map(PathBuf::from);
    let config = base
        .with_overrides(
            env_path("ADVENTURE_DATABASE_PATH"),
            env_path("ADVENTURE_CHANNEL_FILE"),
        )
        .with_overrides(cli.db_path.clone(), cli.channel_file.clone());

    info!(?config, "Configuration resolved");
    Ok(config)
}

/// Dispatches one command and prints its result.
#[instrument(skip(adventure))]
fn run(adventure: &Adventure, command: Command) -> Result<(), adventure_store::StoreError> {
    match command {
        Command::Characters => {
            let characters = adventure.characters().list_characters()?;
            if characters.is_empty() {
                println!("No characters yet.");
            } else {
                println!("{}", roster(&characters));
            }
        }
        Command::Character { key } => {
            let key = parse_key(&key);
            match adventure.characters().get_character(&key)? {
                Some(c) => println!("{:#?}", c),
                None => println!("No character matches {}.", key),
            }
        }
        Command::Create { id, name } => {
            let c = adventure.characters().create_character(id, name)?;
            println!("Welcome {} ({}), level {}.", c.name(), mention(*c.id()), c.level());
        }
        Command::Raise { stat, key, amount } => {
            let c = adventure
                .characters()
                .raise_stat(&stat, &parse_key(&key), amount)?;
            let stats = Stat::iter()
                .map(|s| format!("{} {}", s, c.stat(s)))
                .collect::<Vec<_>>()
                .join(", ");
            println!("{}: {}; {} skill points left.", c.name(), stats, c.skill_points());
        }
        Command::Spawn {
            name,
            hp,
            strength,
            agility,
            wisdom,
            constitution,
            experience,
        } => {
            let descriptor =
                NewMonster::new(name, hp, strength, agility, wisdom, constitution, experience);
            let m = adventure.monsters().spawn_monster(&descriptor)?;
            println!("{} #{} joins the queue with {} HP.", m.name(), m.id(), m.max_hp());
        }
        Command::Monster => match adventure.monsters().active_monster()? {
            Some(m) => println!(
                "#{} {}: {}/{} HP, {} XP",
                m.id(),
                m.name(),
                m.current_hp(),
                m.max_hp(),
                m.experience()
            ),
            None => println!("No monster is roaming."),
        },
        Command::Damage { monster_id, amount } => {
            let m = adventure.monsters().damage_monster(monster_id, amount)?;
            println!("{} has {}/{} HP.", m.name(), m.current_hp(), m.max_hp());
        }
        Command::Join {
            character_id,
            monster_id,
        } => {
            adventure.monsters().join_battle(character_id, monster_id)?;
            println!("{} joins the fight against #{}.", mention(character_id), monster_id);
        }
        Command::Participants { monster_id } => {
            let participants = adventure.monsters().battle_participants(monster_id)?;
            println!("{}", roster(&participants));
        }
        Command::SetChannel { channel_id } => {
            adventure.channel().set_adventure_channel(&channel_id)?;
            println!("Adventures will be announced in {}.", channel_id.trim());
        }
        Command::Channel => match adventure.channel().adventure_channel()? {
            Some(id) => println!("{}", id),
            None => println!("No adventure channel set."),
        },
    }
    Ok(())
}

fn parse_key(raw: &str) -> CharacterKey {
    match raw.parse() {
        Ok(key) => key,
        Err(never) => match never {},
    }
}
