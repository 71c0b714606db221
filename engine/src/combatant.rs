use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Faction {
    Autobot,
    Decepticon,
}

impl Faction {
    pub fn opponent(self) -> Faction {
        match self {
            Faction::Autobot => Faction::Decepticon,
            Faction::Decepticon => Faction::Autobot,
        }
    }

    /// Icon used when a combatant is created without one.
    pub fn default_icon(self) -> String {
        format!("/app/assets/default-{}.png", self.slug())
    }

    pub fn slug(self) -> &'static str {
        match self {
            Faction::Autobot => "autobot",
            Faction::Decepticon => "decepticon",
        }
    }
}

impl fmt::Display for Faction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Faction::Autobot => f.write_str("Autobot"),
            Faction::Decepticon => f.write_str("Decepticon"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ability {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub damage: i32,
    /// Seconds between uses. Carried as data only; battles never throttle on it.
    #[serde(default)]
    pub cooldown: u32,
}

impl Ability {
    /// Stand-in used every round by a combatant with no abilities.
    pub fn basic_attack() -> Self {
        Self {
            id: "basic".to_string(),
            name: "Basic Attack".to_string(),
            description: "A basic attack".to_string(),
            damage: 1,
            cooldown: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Combatant {
    pub id: String,
    pub name: String,
    pub faction: Faction,
    #[serde(default)]
    pub icon: String,
    /// Not clamped at zero: a finishing blow can leave this negative.
    pub health: i32,
    #[serde(default)]
    pub wins: u32,
    #[serde(default)]
    pub losses: u32,
    #[serde(default)]
    pub abilities: Vec<Ability>,
}

impl Combatant {
    pub fn is_standing(&self) -> bool {
        self.health > 0
    }

    pub fn ability_names(&self) -> String {
        self.abilities
            .iter()
            .map(|a| a.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Land one ability on `defender`. Logs the attack and the defender's new health.
pub fn apply_damage(
    attacker: &str,
    ability: &Ability,
    defender: &mut Combatant,
    mut log: impl FnMut(String),
) {
    log(format!(
        "{} uses {} for {} damage to {}",
        attacker, ability.name, ability.damage, defender.name
    ));
    defender.health = defender.health.saturating_sub(ability.damage);
    log(format!("{} health: {}", defender.name, defender.health));
}
