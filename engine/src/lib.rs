use std::collections::VecDeque;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

pub mod arena;
pub mod battle;
pub mod combatant;
pub mod config;
pub mod content;
pub mod creation;
pub mod results;
pub mod roster;

pub use arena::Arena;
pub use battle::{
    BattleError, BattleObserver, BattleReport, BattleSnapshot, CancelToken, Silent, Verdict,
};
pub use combatant::{Ability, Combatant, Faction};
pub use config::{ArenaConfig, BattleConfig};
pub use results::{ResultEntry, ResultRecorder};
pub use roster::{CombatantPatch, RosterStore};

/// The two random decisions a battle round makes.
pub trait RandomSource {
    /// `true` when the Autobot strikes first this round.
    fn coin_flip(&mut self) -> bool;

    /// Uniform index in `0..len`. Callers never pass zero.
    fn pick(&mut self, len: usize) -> usize;
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn coin_flip(&mut self) -> bool {
        (**self).coin_flip()
    }

    fn pick(&mut self, len: usize) -> usize {
        (**self).pick(len)
    }
}

enum Source {
    Seeded(ChaCha8Rng),
    Scripted(VecDeque<u32>),
}

pub struct Dice {
    source: Source,
}

impl Dice {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            source: Source::Seeded(ChaCha8Rng::seed_from_u64(seed)),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            source: Source::Seeded(ChaCha8Rng::from_entropy()),
        }
    }

    /// Replays `values` in order. A coin flip reads any non-zero value as
    /// "Autobot first"; a pick reduces the value modulo the list length.
    /// Once the script runs dry every draw reads as 0.
    pub fn from_scripted(values: Vec<u32>) -> Self {
        Self {
            source: Source::Scripted(values.into()),
        }
    }

    fn next_scripted(queue: &mut VecDeque<u32>) -> u32 {
        queue.pop_front().unwrap_or(0)
    }
}

impl RandomSource for Dice {
    fn coin_flip(&mut self) -> bool {
        match &mut self.source {
            Source::Seeded(rng) => rng.gen_bool(0.5),
            Source::Scripted(queue) => Self::next_scripted(queue) != 0,
        }
    }

    fn pick(&mut self, len: usize) -> usize {
        match &mut self.source {
            Source::Seeded(rng) => rng.gen_range(0..len),
            Source::Scripted(queue) => Self::next_scripted(queue) as usize % len,
        }
    }
}
