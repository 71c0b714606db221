use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::combatant::{Ability, Combatant, Faction};
use crate::content::builtin_roster;

/// Fields to merge into a stored combatant. `None` leaves a field alone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatantPatch {
    pub name: Option<String>,
    pub icon: Option<String>,
    pub health: Option<i32>,
    pub wins: Option<u32>,
    pub losses: Option<u32>,
    pub abilities: Option<Vec<Ability>>,
}

impl CombatantPatch {
    pub fn wins(wins: u32) -> Self {
        Self {
            wins: Some(wins),
            ..Default::default()
        }
    }

    pub fn losses(losses: u32) -> Self {
        Self {
            losses: Some(losses),
            ..Default::default()
        }
    }

    fn apply(&self, target: &mut Combatant) {
        if let Some(name) = &self.name {
            target.name = name.clone();
        }
        if let Some(icon) = &self.icon {
            target.icon = icon.clone();
        }
        if let Some(health) = self.health {
            target.health = health;
        }
        if let Some(wins) = self.wins {
            target.wins = wins;
        }
        if let Some(losses) = self.losses {
            target.losses = losses;
        }
        if let Some(abilities) = &self.abilities {
            target.abilities = abilities.clone();
        }
    }
}

/// One list of combatants per faction, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterStore {
    autobots: Vec<Combatant>,
    decepticons: Vec<Combatant>,
}

impl RosterStore {
    pub fn new(autobots: Vec<Combatant>, decepticons: Vec<Combatant>) -> Self {
        Self {
            autobots,
            decepticons,
        }
    }

    /// Built-in rosters, or the fallback record for a faction whose content fails to load.
    pub fn builtin() -> Self {
        Self::new(
            faction_or_fallback(builtin_roster(Faction::Autobot), Faction::Autobot),
            faction_or_fallback(builtin_roster(Faction::Decepticon), Faction::Decepticon),
        )
    }

    pub fn autobots(&self) -> &[Combatant] {
        &self.autobots
    }

    pub fn decepticons(&self) -> &[Combatant] {
        &self.decepticons
    }

    pub fn faction(&self, faction: Faction) -> &[Combatant] {
        match faction {
            Faction::Autobot => &self.autobots,
            Faction::Decepticon => &self.decepticons,
        }
    }

    /// Look an id up within one faction's list.
    pub fn find(&self, faction: Faction, id: &str) -> Option<&Combatant> {
        self.faction(faction).iter().find(|c| c.id == id)
    }

    pub fn get(&self, id: &str) -> Option<&Combatant> {
        self.autobots
            .iter()
            .chain(self.decepticons.iter())
            .find(|c| c.id == id)
    }

    pub fn add(&mut self, combatant: Combatant) {
        match combatant.faction {
            Faction::Autobot => self.autobots.push(combatant),
            Faction::Decepticon => self.decepticons.push(combatant),
        }
    }

    /// Merge `patch` into every entry with this id, searching both factions.
    /// Returns how many entries matched; zero is a no-op.
    pub fn update(&mut self, id: &str, patch: &CombatantPatch) -> usize {
        let mut matched = 0;
        for combatant in self
            .autobots
            .iter_mut()
            .chain(self.decepticons.iter_mut())
            .filter(|c| c.id == id)
        {
            patch.apply(combatant);
            matched += 1;
        }
        if matched == 0 {
            warn!(id, "update for unknown combatant ignored");
        }
        matched
    }
}

/// Parse a JSON array of combatant records. Records keep their own faction tag.
pub fn parse_faction(text: &str, faction: Faction) -> Result<Vec<Combatant>> {
    let value: serde_json::Value =
        serde_json::from_str(text).with_context(|| format!("{} roster is not JSON", faction))?;
    if !value.is_array() {
        bail!("{} roster must be an array", faction);
    }
    let list: Vec<Combatant> = serde_json::from_value(value)
        .with_context(|| format!("{} roster has malformed records", faction))?;
    if list.is_empty() {
        warn!(%faction, "roster is empty");
    }
    Ok(list)
}

/// The single record a faction falls back to when its roster cannot be loaded.
pub fn fallback_combatant(faction: Faction) -> Combatant {
    let id = match faction {
        Faction::Autobot => "fallback_001",
        Faction::Decepticon => "fallback_002",
    };
    Combatant {
        id: id.to_string(),
        name: format!("Fallback {}", faction),
        faction,
        icon: String::new(),
        health: 100,
        wins: 0,
        losses: 0,
        abilities: Vec::new(),
    }
}

pub fn faction_or_fallback(loaded: Result<Vec<Combatant>>, faction: Faction) -> Vec<Combatant> {
    match loaded {
        Ok(list) => list,
        Err(err) => {
            warn!(%faction, error = %format!("{:#}", err), "using fallback roster");
            vec![fallback_combatant(faction)]
        }
    }
}
