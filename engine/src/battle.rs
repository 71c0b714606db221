use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use crate::combatant::{apply_damage, Ability, Combatant, Faction};
use crate::config::BattleConfig;
use crate::{Dice, RandomSource};

/// Log line written when a battle is started without both sides selected.
pub const MISSING_COMBATANT: &str = "Error: Both Autobot and Decepticon must be selected.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    AutobotWins,
    DecepticonWins,
    Draw,
}

impl Verdict {
    pub fn classify(autobot: &Combatant, decepticon: &Combatant) -> Verdict {
        match (autobot.is_standing(), decepticon.is_standing()) {
            (false, false) => Verdict::Draw,
            (false, true) => Verdict::DecepticonWins,
            (true, false) => Verdict::AutobotWins,
            // Never produced by `BattleState::finish`.
            (true, true) => Verdict::Draw,
        }
    }

    pub fn winner(self) -> Option<Faction> {
        match self {
            Verdict::AutobotWins => Some(Faction::Autobot),
            Verdict::DecepticonWins => Some(Faction::Decepticon),
            Verdict::Draw => None,
        }
    }

    pub fn describe(self, autobot: &Combatant, decepticon: &Combatant) -> String {
        match self {
            Verdict::AutobotWins => format!("{} defeats {}!", autobot.name, decepticon.name),
            Verdict::DecepticonWins => format!("{} defeats {}!", decepticon.name, autobot.name),
            Verdict::Draw => "Battle ended in a draw!".to_string(),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BattleError {
    #[error("both an Autobot and a Decepticon must be selected (no {0} given)")]
    MissingCombatant(Faction),
    #[error("battle cancelled after {0} rounds")]
    Cancelled(u32),
    #[error("no verdict after {0} rounds")]
    RoundLimit(u32),
}

/// What observers see after every round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BattleSnapshot {
    pub round: u32,
    pub autobot: Combatant,
    pub decepticon: Combatant,
    pub log: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BattleReport {
    pub verdict: Verdict,
    /// The verdict as the results list shows it.
    pub result: String,
    pub rounds: u32,
    /// Working copies: final health plus the win/loss this battle earned.
    pub autobot: Combatant,
    pub decepticon: Combatant,
    pub log: Vec<String>,
}

impl BattleReport {
    pub fn snapshot(&self) -> BattleSnapshot {
        BattleSnapshot {
            round: self.rounds,
            autobot: self.autobot.clone(),
            decepticon: self.decepticon.clone(),
            log: self.log.clone(),
        }
    }
}

pub trait BattleObserver {
    fn on_update(&mut self, snapshot: &BattleSnapshot);

    /// Lines that belong to no battle, such as a rejected start.
    fn on_message(&mut self, _line: &str) {}
}

/// Observer that ignores everything.
pub struct Silent;

impl BattleObserver for Silent {
    fn on_update(&mut self, _snapshot: &BattleSnapshot) {}
}

impl<F: FnMut(&BattleSnapshot)> BattleObserver for F {
    fn on_update(&mut self, snapshot: &BattleSnapshot) {
        self(snapshot)
    }
}

/// Shared flag that stops an in-flight battle at its next pause.
#[derive(Debug, Clone)]
pub struct CancelToken {
    tx: Arc<watch::Sender<bool>>,
}

impl CancelToken {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.tx.borrow()
    }

    /// Resolves once `cancel` has been called on any clone.
    pub async fn cancelled(&self) {
        let mut rx = self.tx.subscribe();
        // The sender lives in `self`, so the channel cannot close under us.
        let _ = rx.wait_for(|cancelled| *cancelled).await;
    }
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}

/// Working copies of both combatants plus the log written so far.
#[derive(Debug, Clone)]
pub struct BattleState {
    autobot: Combatant,
    decepticon: Combatant,
    log: Vec<String>,
    round: u32,
}

impl BattleState {
    /// Copies both combatants; the originals are never touched.
    pub fn new(autobot: &Combatant, decepticon: &Combatant) -> Self {
        let log = vec![
            format!(
                "Combat initiated between {} and {}",
                autobot.name, decepticon.name
            ),
            format!("{} health: {}", autobot.name, autobot.health),
            format!("{} health: {}", decepticon.name, decepticon.health),
        ];
        Self {
            autobot: autobot.clone(),
            decepticon: decepticon.clone(),
            log,
            round: 0,
        }
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn log(&self) -> &[String] {
        &self.log
    }

    pub fn is_over(&self) -> bool {
        !self.autobot.is_standing() || !self.decepticon.is_standing()
    }

    /// One exchange: initiative, both ability draws, strike, then a
    /// retaliation if the defender is still standing.
    pub fn resolve_round<R: RandomSource + ?Sized>(&mut self, rng: &mut R) {
        self.round += 1;
        let autobot_first = rng.coin_flip();
        let autobot_move = choose_ability(&self.autobot, rng);
        let decepticon_move = choose_ability(&self.decepticon, rng);
        debug!(
            round = self.round,
            autobot_first,
            autobot_ability = %autobot_move.name,
            decepticon_ability = %decepticon_move.name,
            "round drawn"
        );

        let (first, second, first_move, second_move) = if autobot_first {
            (
                &mut self.autobot,
                &mut self.decepticon,
                autobot_move,
                decepticon_move,
            )
        } else {
            (
                &mut self.decepticon,
                &mut self.autobot,
                decepticon_move,
                autobot_move,
            )
        };

        let log = &mut self.log;
        apply_damage(&first.name, &first_move, second, |line| log.push(line));
        if second.is_standing() {
            apply_damage(&second.name, &second_move, first, |line| log.push(line));
        }
    }

    pub fn snapshot(&self) -> BattleSnapshot {
        BattleSnapshot {
            round: self.round,
            autobot: self.autobot.clone(),
            decepticon: self.decepticon.clone(),
            log: self.log.clone(),
        }
    }

    /// The report, once one side is down. `None` while both still stand.
    pub fn finish(self) -> Option<BattleReport> {
        if self.is_over() {
            Some(self.conclude())
        } else {
            None
        }
    }

    /// Classify, bump the working copies' counters, and close the log.
    fn conclude(mut self) -> BattleReport {
        let verdict = Verdict::classify(&self.autobot, &self.decepticon);
        match verdict {
            Verdict::AutobotWins => {
                self.autobot.wins = self.autobot.wins.saturating_add(1);
                self.decepticon.losses = self.decepticon.losses.saturating_add(1);
            }
            Verdict::DecepticonWins => {
                self.decepticon.wins = self.decepticon.wins.saturating_add(1);
                self.autobot.losses = self.autobot.losses.saturating_add(1);
            }
            Verdict::Draw => {}
        }
        let result = verdict.describe(&self.autobot, &self.decepticon);
        self.log.push(result.clone());
        info!(rounds = self.round, verdict = ?verdict, "{}", result);
        BattleReport {
            verdict,
            result,
            rounds: self.round,
            autobot: self.autobot,
            decepticon: self.decepticon,
            log: self.log,
        }
    }
}

/// An empty ability list falls back to the basic attack without consuming a draw.
fn choose_ability<R: RandomSource + ?Sized>(combatant: &Combatant, rng: &mut R) -> Ability {
    if combatant.abilities.is_empty() {
        Ability::basic_attack()
    } else {
        combatant.abilities[rng.pick(combatant.abilities.len())].clone()
    }
}

fn round_limit_reached(state: &BattleState, max_rounds: Option<u32>) -> Option<u32> {
    match max_rounds {
        Some(limit) if state.round() >= limit => Some(limit),
        _ => None,
    }
}

/// Run a whole battle with no pacing and no observer.
pub fn simulate<R: RandomSource + ?Sized>(
    autobot: &Combatant,
    decepticon: &Combatant,
    rng: &mut R,
    max_rounds: Option<u32>,
) -> Result<BattleReport, BattleError> {
    let mut state = BattleState::new(autobot, decepticon);
    while !state.is_over() {
        if let Some(limit) = round_limit_reached(&state, max_rounds) {
            return Err(BattleError::RoundLimit(limit));
        }
        state.resolve_round(rng);
    }
    Ok(state.conclude())
}

/// Resolve a battle round by round, publishing each round to `observer` and
/// pausing `config.round_delay()` between rounds. The pause races `cancel`.
pub async fn resolve<R, O>(
    autobot: Option<&Combatant>,
    decepticon: Option<&Combatant>,
    rng: &mut R,
    config: &BattleConfig,
    observer: &mut O,
    cancel: &CancelToken,
) -> Result<BattleReport, BattleError>
where
    R: RandomSource + ?Sized,
    O: BattleObserver + ?Sized,
{
    let (autobot, decepticon) = match (autobot, decepticon) {
        (Some(autobot), Some(decepticon)) => (autobot, decepticon),
        (autobot, _) => {
            let missing = if autobot.is_none() {
                Faction::Autobot
            } else {
                Faction::Decepticon
            };
            error!(%missing, "battle requested without both combatants");
            observer.on_message(MISSING_COMBATANT);
            return Err(BattleError::MissingCombatant(missing));
        }
    };

    info!(
        autobot = %autobot.name,
        decepticon = %decepticon.name,
        "battle started"
    );
    let delay = config.round_delay();
    let mut state = BattleState::new(autobot, decepticon);
    observer.on_update(&state.snapshot());

    while !state.is_over() {
        if cancel.is_cancelled() {
            warn!(round = state.round(), "battle cancelled");
            return Err(BattleError::Cancelled(state.round()));
        }
        if let Some(limit) = round_limit_reached(&state, config.max_rounds) {
            warn!(limit, "battle hit the round limit");
            return Err(BattleError::RoundLimit(limit));
        }

        state.resolve_round(rng);
        observer.on_update(&state.snapshot());

        if delay.is_zero() {
            tokio::task::yield_now().await;
        } else {
            tokio::select! {
                _ = tokio::time::sleep(delay) => {}
                _ = cancel.cancelled() => {
                    warn!(round = state.round(), "battle cancelled");
                    return Err(BattleError::Cancelled(state.round()));
                }
            }
        }
    }

    let report = state.conclude();
    observer.on_update(&report.snapshot());
    Ok(report)
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct BattleStats {
    pub samples: u32,
    pub autobot_wins: u32,
    pub decepticon_wins: u32,
    pub draws: u32,
    /// Battles that hit `max_rounds` without a verdict.
    pub stalls: u32,
    /// Mean rounds over battles that produced a verdict.
    pub mean_rounds: f64,
}

/// Many headless battles; sample `i` rolls with `Dice::from_seed(seed + i)`.
pub fn simulate_many(
    autobot: &Combatant,
    decepticon: &Combatant,
    seed: u64,
    samples: u32,
    max_rounds: Option<u32>,
) -> BattleStats {
    let mut stats = BattleStats {
        samples,
        ..Default::default()
    };
    let mut total_rounds = 0u64;
    for i in 0..samples {
        let mut dice = Dice::from_seed(seed.wrapping_add(i as u64));
        match simulate(autobot, decepticon, &mut dice, max_rounds) {
            Ok(report) => {
                total_rounds += report.rounds as u64;
                match report.verdict {
                    Verdict::AutobotWins => stats.autobot_wins += 1,
                    Verdict::DecepticonWins => stats.decepticon_wins += 1,
                    Verdict::Draw => stats.draws += 1,
                }
            }
            Err(_) => stats.stalls += 1,
        }
    }
    let decided = stats.autobot_wins + stats.decepticon_wins + stats.draws;
    if decided > 0 {
        stats.mean_rounds = total_rounds as f64 / decided as f64;
    }
    stats
}
