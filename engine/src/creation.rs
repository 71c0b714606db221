use std::collections::HashSet;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use crate::combatant::{Ability, Combatant, Faction};

pub const MIN_ABILITIES: usize = 3;
pub const MAX_ABILITIES: usize = 5;
pub const MIN_HEALTH: i32 = 100;
pub const HEALTH_STEP: i32 = 10;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CreationError {
    #[error("Please select 3 to 5 abilities (got {0})")]
    AbilityCount(usize),
    #[error("Name is required")]
    EmptyName,
    #[error("Health must be at least 100 in steps of 10 (got {0})")]
    Health(i32),
    #[error("Unknown ability '{0}'")]
    UnknownAbility(String),
    #[error("Ability '{0}' selected twice")]
    DuplicateAbility(String),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SelectionError {
    #[error("Maximum 5 abilities allowed")]
    TooMany,
    #[error("Minimum 3 abilities required")]
    TooFew,
}

/// Ability checkboxes. Toggling refuses to grow past five and refuses any
/// removal that would leave fewer than three.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AbilitySelection {
    ids: Vec<String>,
}

impl AbilitySelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toggle(&mut self, id: &str) -> Result<(), SelectionError> {
        if let Some(pos) = self.ids.iter().position(|held| held == id) {
            if self.ids.len() - 1 < MIN_ABILITIES {
                return Err(SelectionError::TooFew);
            }
            self.ids.remove(pos);
        } else {
            if self.ids.len() + 1 > MAX_ABILITIES {
                return Err(SelectionError::TooMany);
            }
            self.ids.push(id.to_string());
        }
        Ok(())
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn into_ids(self) -> Vec<String> {
        self.ids
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatantDraft {
    pub name: String,
    pub faction: Faction,
    #[serde(default)]
    pub icon: Option<String>,
    pub health: i32,
    pub ability_ids: Vec<String>,
}

impl CombatantDraft {
    /// Validate against `catalog` and mint a fresh combatant.
    pub fn build(&self, catalog: &IndexMap<String, Ability>) -> Result<Combatant, CreationError> {
        let count = self.ability_ids.len();
        if !(MIN_ABILITIES..=MAX_ABILITIES).contains(&count) {
            return Err(CreationError::AbilityCount(count));
        }
        let name = self.name.trim();
        if name.is_empty() {
            return Err(CreationError::EmptyName);
        }
        if self.health < MIN_HEALTH || self.health % HEALTH_STEP != 0 {
            return Err(CreationError::Health(self.health));
        }

        let mut seen = HashSet::new();
        let mut abilities = Vec::with_capacity(count);
        for id in &self.ability_ids {
            if !seen.insert(id.as_str()) {
                return Err(CreationError::DuplicateAbility(id.clone()));
            }
            let ability = catalog
                .get(id)
                .ok_or_else(|| CreationError::UnknownAbility(id.clone()))?;
            abilities.push(ability.clone());
        }

        let icon = match self.icon.as_deref().map(str::trim) {
            Some(icon) if !icon.is_empty() => icon.to_string(),
            _ => self.faction.default_icon(),
        };
        let combatant = Combatant {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            faction: self.faction,
            icon,
            health: self.health,
            wins: 0,
            losses: 0,
            abilities,
        };
        debug!(id = %combatant.id, name = %combatant.name, "combatant created");
        Ok(combatant)
    }
}
