//! Session state for one user: both rosters, the results list, and the
//! battle settings. Battles take `&mut self`, so at most one runs at a time.

use tracing::info;

use crate::battle::{resolve, BattleError, BattleObserver, BattleReport, CancelToken, Verdict};
use crate::combatant::{Combatant, Faction};
use crate::config::BattleConfig;
use crate::results::ResultRecorder;
use crate::roster::{CombatantPatch, RosterStore};
use crate::RandomSource;

#[derive(Debug, Clone, Default)]
pub struct Arena {
    roster: RosterStore,
    results: ResultRecorder,
    config: BattleConfig,
}

impl Arena {
    pub fn new(roster: RosterStore, config: BattleConfig) -> Self {
        Self {
            roster,
            results: ResultRecorder::new(),
            config,
        }
    }

    pub fn roster(&self) -> &RosterStore {
        &self.roster
    }

    pub fn results(&self) -> &ResultRecorder {
        &self.results
    }

    pub fn config(&self) -> &BattleConfig {
        &self.config
    }

    pub fn add_combatant(&mut self, combatant: Combatant) {
        info!(id = %combatant.id, faction = %combatant.faction, "combatant added");
        self.roster.add(combatant);
    }

    pub async fn battle<R, O>(
        &mut self,
        autobot_id: Option<&str>,
        decepticon_id: Option<&str>,
        rng: &mut R,
        observer: &mut O,
        cancel: &CancelToken,
    ) -> Result<BattleReport, BattleError>
    where
        R: RandomSource + ?Sized,
        O: BattleObserver + ?Sized,
    {
        self.battle_then(autobot_id, decepticon_id, rng, observer, cancel, |_| {})
            .await
    }

    /// Run a battle between the selected ids. A decided battle is recorded,
    /// both counters are written back, and `on_complete` gets the verdict.
    /// Errors leave the session untouched.
    pub async fn battle_then<R, O, F>(
        &mut self,
        autobot_id: Option<&str>,
        decepticon_id: Option<&str>,
        rng: &mut R,
        observer: &mut O,
        cancel: &CancelToken,
        on_complete: F,
    ) -> Result<BattleReport, BattleError>
    where
        R: RandomSource + ?Sized,
        O: BattleObserver + ?Sized,
        F: FnOnce(&str),
    {
        let autobot = autobot_id
            .and_then(|id| self.roster.find(Faction::Autobot, id))
            .cloned();
        let decepticon = decepticon_id
            .and_then(|id| self.roster.find(Faction::Decepticon, id))
            .cloned();

        let report = resolve(
            autobot.as_ref(),
            decepticon.as_ref(),
            rng,
            &self.config,
            observer,
            cancel,
        )
        .await?;

        self.apply_outcome(&report);
        self.results.record(&report.result);
        on_complete(&report.result);
        Ok(report)
    }

    fn apply_outcome(&mut self, report: &BattleReport) {
        let (winner, loser) = match report.verdict {
            Verdict::AutobotWins => (&report.autobot, &report.decepticon),
            Verdict::DecepticonWins => (&report.decepticon, &report.autobot),
            Verdict::Draw => return,
        };
        self.roster
            .update(&winner.id, &CombatantPatch::wins(winner.wins));
        self.roster
            .update(&loser.id, &CombatantPatch::losses(loser.losses));
    }
}
