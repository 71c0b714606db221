use std::collections::HashMap;

use anyhow::{Context, Result};
use indexmap::IndexMap;

use crate::combatant::{Ability, Combatant, Faction};
use crate::roster::parse_faction;

const ABILITIES: &str = include_str!("../content/abilities.json");

pub fn builtin_rosters() -> HashMap<Faction, &'static str> {
    HashMap::from([
        (Faction::Autobot, include_str!("../content/autobots.json")),
        (
            Faction::Decepticon,
            include_str!("../content/decepticons.json"),
        ),
    ])
}

/// The abilities a new combatant may pick from, keyed by id in catalog order.
pub fn ability_catalog() -> Result<IndexMap<String, Ability>> {
    let list: Vec<Ability> =
        serde_json::from_str(ABILITIES).context("failed to parse built-in ability catalog")?;
    Ok(list.into_iter().map(|a| (a.id.clone(), a)).collect())
}

pub fn builtin_roster(faction: Faction) -> Result<Vec<Combatant>> {
    let rosters = builtin_rosters();
    let text = rosters
        .get(&faction)
        .ok_or_else(|| anyhow::anyhow!("no built-in roster for {}", faction))?;
    parse_faction(text, faction).with_context(|| format!("built-in {} roster", faction))
}
