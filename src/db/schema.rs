// Mirrors the SQL in migrations/.

diesel::table! {
    character (id) {
        seq -> Integer,
        id -> BigInt,
        name -> Text,
        class -> Text,
        experience -> Integer,
        level -> Integer,
        strength -> Integer,
        agility -> Integer,
        wisdom -> Integer,
        constitution -> Integer,
        skill_points -> Integer,
        current_hp -> Integer,
        stamina -> Integer,
        revision -> Integer,
        created_at -> Timestamp,
    }
}

diesel::table! {
    monster_queue (id) {
        id -> Integer,
        name -> Text,
        current_hp -> Integer,
        max_hp -> Integer,
        strength -> Integer,
        agility -> Integer,
        wisdom -> Integer,
        constitution -> Integer,
        experience -> Integer,
        spawned_at -> Timestamp,
    }
}

diesel::table! {
    battle_participation (seq) {
        seq -> Integer,
        character_id -> BigInt,
        monster_id -> Integer,
        joined_at -> Timestamp,
    }
}

diesel::joinable!(battle_participation -> character (character_id));
diesel::joinable!(battle_participation -> monster_queue (monster_id));

diesel::allow_tables_to_appear_in_same_query!(battle_participation, character, monster_queue,);
