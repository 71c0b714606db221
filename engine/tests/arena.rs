use std::time::Duration;

use arena_engine::{
    Ability, Arena, BattleConfig, BattleError, CancelToken, Combatant, Dice, Faction, RosterStore,
    Silent, Verdict,
};

fn bot(id: &str, name: &str, faction: Faction, health: i32, damage: i32) -> Combatant {
    Combatant {
        id: id.to_string(),
        name: name.to_string(),
        faction,
        icon: String::new(),
        health,
        wins: 0,
        losses: 0,
        abilities: vec![Ability {
            id: format!("{id}_cannon"),
            name: "Cannon".to_string(),
            description: String::new(),
            damage,
            cooldown: 5,
        }],
    }
}

fn arena() -> Arena {
    let roster = RosterStore::new(
        vec![bot("autobot_001", "Optimus Prime", Faction::Autobot, 5, 150)],
        vec![bot("decepticon_001", "Megatron", Faction::Decepticon, 5, 160)],
    );
    Arena::new(roster, BattleConfig::headless())
}

#[tokio::test]
async fn a_decided_battle_is_recorded_and_tallied() {
    let mut arena = arena();
    let mut dice = Dice::from_scripted(vec![1, 0, 0]);
    let mut completed = Vec::new();

    let report = arena
        .battle_then(
            Some("autobot_001"),
            Some("decepticon_001"),
            &mut dice,
            &mut Silent,
            &CancelToken::new(),
            |verdict| completed.push(verdict.to_string()),
        )
        .await
        .unwrap();

    assert_eq!(report.verdict, Verdict::AutobotWins);
    assert_eq!(completed, vec!["Optimus Prime defeats Megatron!".to_string()]);

    let results = arena.results().entries();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].result, "Optimus Prime defeats Megatron!");

    let optimus = arena.roster().get("autobot_001").unwrap();
    let megatron = arena.roster().get("decepticon_001").unwrap();
    assert_eq!((optimus.wins, optimus.losses), (1, 0));
    assert_eq!((megatron.wins, megatron.losses), (0, 1));
    // stored health is untouched by the battle
    assert_eq!(optimus.health, 5);
    assert_eq!(megatron.health, 5);
}

#[tokio::test]
async fn tallies_accumulate_across_battles() {
    let mut arena = arena();
    // Autobot first, then Decepticon first, then Autobot first again.
    let mut dice = Dice::from_scripted(vec![1, 0, 0, 0, 0, 0, 1, 0, 0]);
    for _ in 0..3 {
        arena
            .battle(
                Some("autobot_001"),
                Some("decepticon_001"),
                &mut dice,
                &mut Silent,
                &CancelToken::new(),
            )
            .await
            .unwrap();
    }

    let optimus = arena.roster().get("autobot_001").unwrap();
    let megatron = arena.roster().get("decepticon_001").unwrap();
    assert_eq!((optimus.wins, optimus.losses), (2, 1));
    assert_eq!((megatron.wins, megatron.losses), (1, 2));
    assert_eq!(arena.results().len(), 3);
}

#[tokio::test]
async fn a_draw_is_recorded_without_tallies() {
    let roster = RosterStore::new(
        vec![bot("a", "Grimlock", Faction::Autobot, 0, 10)],
        vec![bot("d", "Devastator", Faction::Decepticon, 0, 10)],
    );
    let mut arena = Arena::new(roster, BattleConfig::headless());
    let report = arena
        .battle(Some("a"), Some("d"), &mut Dice::from_seed(5), &mut Silent, &CancelToken::new())
        .await
        .unwrap();

    assert_eq!(report.verdict, Verdict::Draw);
    assert_eq!(arena.results().entries()[0].result, "Battle ended in a draw!");
    for id in ["a", "d"] {
        let c = arena.roster().get(id).unwrap();
        assert_eq!((c.wins, c.losses), (0, 0));
    }
}

#[tokio::test]
async fn unknown_or_cross_faction_ids_count_as_missing() {
    let mut arena = arena();
    let mut dice = Dice::from_seed(1);
    let cancel = CancelToken::new();

    let err = arena
        .battle(Some("ghost"), Some("decepticon_001"), &mut dice, &mut Silent, &cancel)
        .await
        .unwrap_err();
    assert_eq!(err, BattleError::MissingCombatant(Faction::Autobot));

    // a Decepticon id in the Autobot slot is not a valid pick
    let err = arena
        .battle(Some("decepticon_001"), Some("decepticon_001"), &mut dice, &mut Silent, &cancel)
        .await
        .unwrap_err();
    assert_eq!(err, BattleError::MissingCombatant(Faction::Autobot));

    let err = arena
        .battle(Some("autobot_001"), None, &mut dice, &mut Silent, &cancel)
        .await
        .unwrap_err();
    assert_eq!(err, BattleError::MissingCombatant(Faction::Decepticon));
    assert!(arena.results().is_empty());
}

#[tokio::test(start_paused = true)]
async fn cancelled_battle_leaves_no_stale_result() {
    let roster = RosterStore::new(
        vec![bot("a", "Jazz", Faction::Autobot, 100, 1)],
        vec![bot("d", "Ravage", Faction::Decepticon, 100, 1)],
    );
    let mut arena = Arena::new(roster.clone(), BattleConfig::default());
    let cancel = CancelToken::new();
    let canceller = cancel.clone();
    let mut dice = Dice::from_seed(8);
    let mut observer = Silent;

    let (outcome, _) = tokio::join!(
        arena.battle(Some("a"), Some("d"), &mut dice, &mut observer, &cancel),
        async move {
            tokio::time::sleep(Duration::from_millis(2500)).await;
            canceller.cancel();
        }
    );

    assert_eq!(outcome.unwrap_err(), BattleError::Cancelled(3));
    assert!(arena.results().is_empty());
    assert_eq!(arena.roster(), &roster);
}

#[test]
fn added_combatants_are_selectable() {
    let mut arena = arena();
    arena.add_combatant(bot("autobot_777", "Hot Rod", Faction::Autobot, 120, 15));
    assert_eq!(arena.roster().autobots().len(), 2);
    assert!(arena.roster().find(Faction::Autobot, "autobot_777").is_some());
}
