//! Tests for the monster queue and battle participation.

use tempfile::NamedTempFile;

use adventure_store::{Adventure, ChannelPointer, NewMonster, Store, StoreErrorKind};

fn setup_test_adventure() -> (NamedTempFile, tempfile::TempDir, Adventure) {
    let db_file = NamedTempFile::new().expect("Failed to create temp file");
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let store = Store::open(db_file.path()).expect("Failed to open store");
    let channel = ChannelPointer::new(dir.path().join("current_channel.txt"));
    (db_file, dir, Adventure::with_store(store, channel))
}

fn goblin(hp: i32) -> NewMonster {
    NewMonster::new("Goblin".to_string(), hp, 3, 2, 0, 2, 10)
}

#[test]
fn test_spawn_sets_max_hp_to_current() {
    let (_db, _dir, adv) = setup_test_adventure();
    let m = adv.monsters().spawn_monster(&goblin(50)).expect("Spawn failed");
    assert_eq!(*m.current_hp(), 50);
    assert_eq!(*m.max_hp(), 50);
    assert_eq!(*m.experience(), 10);
    assert!(m.is_alive());
}

#[test]
fn test_spawn_rejects_dead_monster() {
    let (_db, _dir, adv) = setup_test_adventure();
    let err = adv.monsters().spawn_monster(&goblin(0)).unwrap_err();
    assert_eq!(err.kind(), StoreErrorKind::InvalidArgument);
    assert!(adv.monsters().active_monster().expect("Query failed").is_none());
}

#[test]
fn test_active_monster_empty_queue() {
    let (_db, _dir, adv) = setup_test_adventure();
    assert!(adv.monsters().active_monster().expect("Query failed").is_none());
}

#[test]
fn test_active_monster_until_killed() {
    let (_db, _dir, adv) = setup_test_adventure();
    let spawned = adv.monsters().spawn_monster(&goblin(50)).expect("Spawn failed");

    let active = adv
        .monsters()
        .active_monster()
        .expect("Query failed")
        .expect("No active monster");
    assert_eq!(active, spawned);

    let hurt = adv
        .monsters()
        .damage_monster(*spawned.id(), 20)
        .expect("Damage failed");
    assert_eq!(*hurt.current_hp(), 30);
    assert!(adv.monsters().active_monster().expect("Query failed").is_some());

    let dead = adv
        .monsters()
        .damage_monster(*spawned.id(), 500)
        .expect("Damage failed");
    assert_eq!(*dead.current_hp(), 0);
    assert!(adv.monsters().active_monster().expect("Query failed").is_none());
}

#[test]
fn test_active_monster_advances_to_next_survivor() {
    let (_db, _dir, adv) = setup_test_adventure();
    let first = adv.monsters().spawn_monster(&goblin(5)).expect("Spawn failed");
    let second = adv
        .monsters()
        .spawn_monster(&NewMonster::new("Troll".to_string(), 80, 8, 1, 0, 6, 40))
        .expect("Spawn failed");

    let active = adv.monsters().active_monster().expect("Query failed");
    assert_eq!(active.as_ref().map(|m| *m.id()), Some(*first.id()));

    adv.monsters()
        .damage_monster(*first.id(), 5)
        .expect("Damage failed");
    let active = adv.monsters().active_monster().expect("Query failed");
    assert_eq!(active.as_ref().map(|m| *m.id()), Some(*second.id()));
}

#[test]
fn test_damage_unknown_monster() {
    let (_db, _dir, adv) = setup_test_adventure();
    let err = adv.monsters().damage_monster(77, 1).unwrap_err();
    assert_eq!(err.kind(), StoreErrorKind::NotFound);
}

#[test]
fn test_damage_negative_amount_rejected() {
    let (_db, _dir, adv) = setup_test_adventure();
    let m = adv.monsters().spawn_monster(&goblin(10)).expect("Spawn failed");
    let err = adv.monsters().damage_monster(*m.id(), -3).unwrap_err();
    assert_eq!(err.kind(), StoreErrorKind::InvalidArgument);
}

#[test]
fn test_battle_participants() {
    let (_db, _dir, adv) = setup_test_adventure();
    let m = adv.monsters().spawn_monster(&goblin(30)).expect("Spawn failed");
    let other = adv.monsters().spawn_monster(&goblin(30)).expect("Spawn failed");
    adv.characters()
        .create_character(10, "Arwen".to_string())
        .expect("Create failed");
    adv.characters()
        .create_character(11, "Elrond".to_string())
        .expect("Create failed");

    adv.monsters().join_battle(10, *m.id()).expect("Join failed");
    adv.monsters().join_battle(11, *m.id()).expect("Join failed");
    adv.monsters().join_battle(11, *other.id()).expect("Join failed");

    let fighters = adv
        .monsters()
        .battle_participants(*m.id())
        .expect("Participants failed");
    let ids: Vec<i64> = fighters.iter().map(|c| *c.id()).collect();
    assert_eq!(ids, vec![10, 11]);

    let others = adv
        .monsters()
        .battle_participants(*other.id())
        .expect("Participants failed");
    assert_eq!(others.len(), 1);
}

#[test]
fn test_join_battle_twice_fails() {
    let (_db, _dir, adv) = setup_test_adventure();
    let m = adv.monsters().spawn_monster(&goblin(30)).expect("Spawn failed");
    adv.characters()
        .create_character(12, "Galadriel".to_string())
        .expect("Create failed");

    adv.monsters().join_battle(12, *m.id()).expect("Join failed");
    let err = adv.monsters().join_battle(12, *m.id()).unwrap_err();
    assert_eq!(err.kind(), StoreErrorKind::AlreadyExists);
}

#[test]
fn test_join_battle_unknown_side() {
    let (_db, _dir, adv) = setup_test_adventure();
    let m = adv.monsters().spawn_monster(&goblin(30)).expect("Spawn failed");

    let err = adv.monsters().join_battle(404, *m.id()).unwrap_err();
    assert_eq!(err.kind(), StoreErrorKind::NotFound);
    assert!(
        adv.monsters()
            .battle_participants(*m.id())
            .expect("Participants failed")
            .is_empty()
    );
}

#[test]
fn test_get_or_create_character() {
    let (_db, _dir, adv) = setup_test_adventure();
    let created = adv
        .get_or_create_character(20, "Saruman".to_string())
        .expect("Create failed");
    let raised = adv
        .characters()
        .raise_stat("wisdom", &adventure_store::CharacterKey::Id(20), 2)
        .expect("Raise failed");
    let fetched = adv
        .get_or_create_character(20, "Saruman".to_string())
        .expect("Fetch failed");
    assert_ne!(fetched, created);
    assert_eq!(fetched, raised);
}

#[test]
fn test_adventure_channel_round_trip() {
    let (_db, _dir, adv) = setup_test_adventure();
    assert!(adv.channel().adventure_channel().expect("Read failed").is_none());

    adv.channel()
        .set_adventure_channel("1234567890")
        .expect("Write failed");
    adv.channel().set_adventure_channel("12345").expect("Write failed");

    let raw = std::fs::read_to_string(adv.channel().path()).expect("Read failed");
    assert_eq!(raw, "12345");
}
