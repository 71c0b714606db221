use arena_engine::content::ability_catalog;
use arena_engine::creation::{AbilitySelection, CombatantDraft, CreationError, SelectionError};
use arena_engine::Faction;

fn draft(name: &str, health: i32, ids: &[&str]) -> CombatantDraft {
    CombatantDraft {
        name: name.to_string(),
        faction: Faction::Decepticon,
        icon: None,
        health,
        ability_ids: ids.iter().map(|s| s.to_string()).collect(),
    }
}

#[test]
fn valid_draft_builds_a_fresh_combatant() {
    let catalog = ability_catalog().unwrap();
    let built = draft("Soundwave", 140, &["ability_006", "ability_007", "ability_003"])
        .build(&catalog)
        .unwrap();

    assert_eq!(built.name, "Soundwave");
    assert_eq!(built.faction, Faction::Decepticon);
    assert_eq!(built.health, 140);
    assert_eq!((built.wins, built.losses), (0, 0));
    assert_eq!(built.icon, "/app/assets/default-decepticon.png");
    let names: Vec<_> = built.abilities.iter().map(|a| a.name.as_str()).collect();
    assert_eq!(names, vec!["Sonic Pulse", "Null Ray", "Ion Blaster"]);
    assert!(uuid::Uuid::parse_str(&built.id).is_ok());

    let again = draft("Soundwave", 140, &["ability_006", "ability_007", "ability_003"])
        .build(&catalog)
        .unwrap();
    assert_ne!(built.id, again.id);
}

#[test]
fn custom_icon_is_kept() {
    let catalog = ability_catalog().unwrap();
    let mut d = draft("Shockwave", 100, &["ability_001", "ability_002", "ability_003"]);
    d.icon = Some("https://example.test/shockwave.png".to_string());
    assert_eq!(d.build(&catalog).unwrap().icon, "https://example.test/shockwave.png");
}

#[test]
fn ability_count_must_be_three_to_five() {
    let catalog = ability_catalog().unwrap();
    let two = draft("Rumble", 100, &["ability_001", "ability_002"]).build(&catalog);
    assert_eq!(two.unwrap_err(), CreationError::AbilityCount(2));

    let six = draft(
        "Rumble",
        100,
        &["ability_001", "ability_002", "ability_003", "ability_004", "ability_005", "ability_006"],
    )
    .build(&catalog);
    assert_eq!(six.unwrap_err(), CreationError::AbilityCount(6));

    // count is checked before the name, as the form does
    let both = draft("  ", 100, &[]).build(&catalog);
    assert_eq!(both.unwrap_err(), CreationError::AbilityCount(0));
}

#[test]
fn blank_name_is_rejected() {
    let catalog = ability_catalog().unwrap();
    let err = draft("   ", 100, &["ability_001", "ability_002", "ability_003"])
        .build(&catalog)
        .unwrap_err();
    assert_eq!(err, CreationError::EmptyName);
    assert_eq!(err.to_string(), "Name is required");
}

#[test]
fn health_has_a_floor_and_a_step() {
    let catalog = ability_catalog().unwrap();
    let ids = ["ability_001", "ability_002", "ability_003"];
    assert_eq!(
        draft("Ravage", 95, &ids).build(&catalog).unwrap_err(),
        CreationError::Health(95)
    );
    assert_eq!(
        draft("Ravage", 105, &ids).build(&catalog).unwrap_err(),
        CreationError::Health(105)
    );
    assert!(draft("Ravage", 110, &ids).build(&catalog).is_ok());
}

#[test]
fn abilities_must_come_from_the_catalog_once_each() {
    let catalog = ability_catalog().unwrap();
    let unknown = draft("Laserbeak", 100, &["ability_001", "nope", "ability_003"]).build(&catalog);
    assert_eq!(unknown.unwrap_err(), CreationError::UnknownAbility("nope".to_string()));

    let twice = draft("Laserbeak", 100, &["ability_001", "ability_001", "ability_003"]).build(&catalog);
    assert_eq!(
        twice.unwrap_err(),
        CreationError::DuplicateAbility("ability_001".to_string())
    );
}

#[test]
fn selection_toggle_enforces_bounds() {
    let mut selection = AbilitySelection::new();
    for id in ["a", "b", "c", "d", "e"] {
        selection.toggle(id).unwrap();
    }
    assert_eq!(selection.toggle("f"), Err(SelectionError::TooMany));
    assert_eq!(selection.ids().len(), 5);

    selection.toggle("e").unwrap();
    selection.toggle("d").unwrap();
    assert_eq!(selection.toggle("c"), Err(SelectionError::TooFew));
    assert_eq!(selection.into_ids(), vec!["a", "b", "c"]);
}
