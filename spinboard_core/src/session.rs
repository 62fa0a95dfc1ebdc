//! One player's game session: the bet panel, the scoreboard and the
//! Idle -> Spinning -> Idle|Locked spin cycle.
//!
//! Rendering, sound playback and reel animation live behind the
//! [`Presenter`] and [`Spinner`] collaborators. At most one spin is in
//! flight; `start` while spinning is ignored.

use serde::{Deserialize, Serialize};
use std::future::Future;
use tracing::{debug, info, warn};

use crate::bet_selector::BetSelector;
use crate::config::GameConfig;
use crate::cue::{self, Cue, CueRequest};
use crate::scoreboard::{Payout, Scoreboard, ScoreboardView};
use crate::symbols::Symbol;
use crate::win::WinCategory;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpinOutcome {
    pub won: bool,
    pub reel_window: Vec<Vec<Symbol>>, // rows x cols, empty when the spinner has no reels
}

impl SpinOutcome {
    pub fn won() -> Self {
        Self {
            won: true,
            reel_window: Vec::new(),
        }
    }

    pub fn lost() -> Self {
        Self {
            won: false,
            reel_window: Vec::new(),
        }
    }
}

/// Runs the reels. Each call resolves exactly once.
pub trait Spinner {
    fn spin(&mut self) -> impl Future<Output = SpinOutcome>;
}

/// Chooses how big a win is once the reels report a win.
pub trait CategoryPicker {
    fn pick(&mut self) -> WinCategory;
}

impl<F: FnMut() -> WinCategory> CategoryPicker for F {
    fn pick(&mut self) -> WinCategory {
        self()
    }
}

/// Always pays the same category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FixedCategory(pub WinCategory);

impl CategoryPicker for FixedCategory {
    fn pick(&mut self) -> WinCategory {
        self.0
    }
}

/// Display and input-affordance side effects. Every hook defaults to a no-op.
#[allow(unused_variables)]
pub trait Presenter {
    fn set_start_enabled(&mut self, enabled: bool) {}
    fn set_bet_enabled(&mut self, enabled: bool) {}
    fn show_bet(&mut self, bet: u64) {}
    fn show_scoreboard(&mut self, view: &ScoreboardView) {}
    fn show_victory(&mut self, payout: &Payout) {}
    fn play_cue(&mut self, request: CueRequest) {}
    fn stop_cue(&mut self, cue: Cue) {}
    fn notice(&mut self, message: &str) {}
}

impl Presenter for () {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Idle,
    Spinning,
    /// Out of money after a settlement; wagering stays disabled.
    Locked,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    Started { bet: u64, debited: bool },
    AlreadySpinning,
    Locked,
    InsufficientFunds { money: u64, bet: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettledRound {
    pub won: bool,
    pub payout: Option<Payout>,
    pub locked: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settlement {
    Settled(SettledRound),
    NotSpinning,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoundReport {
    Played {
        bet: u64,
        outcome: SpinOutcome,
        round: SettledRound,
    },
    Skipped(StartOutcome),
}

#[derive(Debug)]
pub struct Session<P: Presenter = ()> {
    scoreboard: Scoreboard,
    selector: BetSelector,
    presenter: P,
    phase: Phase,
    rounds: u64,
}

impl Session<()> {
    pub fn headless(config: &GameConfig) -> Self {
        Self::new(config, ())
    }
}

impl<P: Presenter> Session<P> {
    pub fn new(config: &GameConfig, presenter: P) -> Self {
        let mut session = Self {
            scoreboard: Scoreboard::new(
                config.starting_money,
                config.initial_bet,
                config.minimum_bet,
                config.maximum_bet,
            ),
            selector: BetSelector::new(&config.selector),
            presenter,
            phase: Phase::Idle,
            rounds: 0,
        };
        session.presenter.show_bet(session.selector.current_bet());
        session.refresh_scoreboard();
        session.set_controls_enabled(true);
        session
    }

    pub fn increase_bet(&mut self) -> u64 {
        self.change_bet(BetSelector::increase)
    }

    pub fn decrease_bet(&mut self) -> u64 {
        self.change_bet(BetSelector::decrease)
    }

    pub fn max_bet(&mut self) -> u64 {
        self.change_bet(BetSelector::set_max_bet)
    }

    pub fn min_bet(&mut self) -> u64 {
        self.change_bet(BetSelector::set_min_bet)
    }

    pub fn adjust_bet(&mut self, delta: i64) -> u64 {
        self.change_bet(|s| s.adjust_bet(delta))
    }

    /// Apply a bet-panel action unless the panel is disabled, then reconcile
    /// with the scoreboard. Returns the bet the panel shows afterwards.
    fn change_bet(&mut self, action: impl FnOnce(&mut BetSelector) -> Option<u64>) -> u64 {
        if !self.selector.is_enabled() {
            debug!(phase = ?self.phase, "bet panel disabled, input ignored");
            return self.selector.current_bet();
        }
        let notified = action(&mut self.selector);
        self.reconcile(notified);
        self.selector.current_bet()
    }

    // Both clamps are idempotent, so the write-back settles within a few passes.
    fn reconcile(&mut self, mut pending: Option<u64>) {
        while let Some(requested) = pending {
            self.presenter.show_bet(requested);
            let actual = self.scoreboard.set_bet(requested as i64);
            self.refresh_scoreboard();
            pending = if actual != requested {
                debug!(requested, actual, "bet corrected by scoreboard");
                self.selector.set_current_bet(actual)
            } else {
                None
            };
        }
    }

    /// Pay for a spin with the panel's bet and lock the controls.
    pub fn start(&mut self) -> StartOutcome {
        match self.phase {
            Phase::Spinning => {
                warn!("spin already in progress, start ignored");
                return StartOutcome::AlreadySpinning;
            }
            Phase::Locked => {
                debug!("session locked, start ignored");
                return StartOutcome::Locked;
            }
            Phase::Idle => {}
        }

        let bet = self.selector.current_bet();
        let money = self.scoreboard.money();
        if money < bet {
            info!(money, bet, "not enough money to place the bet");
            self.presenter.notice("Not enough money to place the bet");
            return StartOutcome::InsufficientFunds { money, bet };
        }

        let debited = self.scoreboard.decrement(bet);
        self.refresh_scoreboard();
        self.set_controls_enabled(false);
        self.phase = Phase::Spinning;
        for request in cue::spin_started() {
            self.presenter.play_cue(request);
        }
        debug!(bet, debited, "spin started");
        StartOutcome::Started { bet, debited }
    }

    /// Resolve the outstanding spin. Ignored when nothing is spinning.
    pub fn settle<C: CategoryPicker>(&mut self, outcome: &SpinOutcome, picker: &mut C) -> Settlement {
        if self.phase != Phase::Spinning {
            debug!(phase = ?self.phase, "settle without a spin, ignored");
            return Settlement::NotSpinning;
        }
        Settlement::Settled(self.settle_spin(outcome.won, picker))
    }

    fn settle_spin<C: CategoryPicker>(&mut self, won: bool, picker: &mut C) -> SettledRound {
        self.phase = Phase::Idle;
        self.rounds += 1;
        self.presenter.stop_cue(Cue::Spin);
        for request in cue::spin_resolved(won) {
            self.presenter.play_cue(request);
        }

        let payout = won.then(|| {
            let payout = self.scoreboard.increment(picker.pick());
            self.refresh_scoreboard();
            self.presenter.show_victory(&payout);
            payout
        });

        let locked = self.scoreboard.is_out_of_money();
        if locked {
            self.phase = Phase::Locked;
        } else {
            self.set_controls_enabled(true);
        }
        info!(
            round = self.rounds,
            won,
            payout = payout.map_or(0, |p| p.total()),
            money = self.scoreboard.money(),
            locked,
            "spin settled"
        );
        SettledRound {
            won,
            payout,
            locked,
        }
    }

    /// Start, await the reels and settle a single round.
    pub async fn play_round<S, C>(&mut self, spinner: &mut S, picker: &mut C) -> RoundReport
    where
        S: Spinner,
        C: CategoryPicker,
    {
        let bet = match self.start() {
            StartOutcome::Started { bet, .. } => bet,
            skipped => return RoundReport::Skipped(skipped),
        };
        let outcome = spinner.spin().await;
        let round = self.settle_spin(outcome.won, picker);
        RoundReport::Played {
            bet,
            outcome,
            round,
        }
    }

    fn refresh_scoreboard(&mut self) {
        let view = self.scoreboard.snapshot();
        self.presenter.show_scoreboard(&view);
    }

    fn set_controls_enabled(&mut self, enabled: bool) {
        self.selector.set_enabled(enabled);
        self.presenter.set_start_enabled(enabled);
        self.presenter.set_bet_enabled(enabled);
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_spinning(&self) -> bool {
        self.phase == Phase::Spinning
    }

    pub fn rounds_played(&self) -> u64 {
        self.rounds
    }

    pub fn current_bet(&self) -> u64 {
        self.selector.current_bet()
    }

    pub fn scoreboard(&self) -> &Scoreboard {
        &self.scoreboard
    }

    pub fn selector(&self) -> &BetSelector {
        &self.selector
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn presenter_mut(&mut self) -> &mut P {
        &mut self.presenter
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default)]
    struct Recorder {
        start_enabled: Vec<bool>,
        bets: Vec<u64>,
        victories: Vec<Payout>,
        cues: Vec<Cue>,
        stopped: Vec<Cue>,
        notices: usize,
    }

    impl Presenter for Recorder {
        fn set_start_enabled(&mut self, enabled: bool) {
            self.start_enabled.push(enabled);
        }
        fn show_bet(&mut self, bet: u64) {
            self.bets.push(bet);
        }
        fn show_victory(&mut self, payout: &Payout) {
            self.victories.push(*payout);
        }
        fn play_cue(&mut self, request: CueRequest) {
            self.cues.push(request.cue);
        }
        fn stop_cue(&mut self, cue: Cue) {
            self.stopped.push(cue);
        }
        fn notice(&mut self, _message: &str) {
            self.notices += 1;
        }
    }

    fn session_with(money: u64) -> Session<Recorder> {
        let config = GameConfig {
            starting_money: money,
            ..GameConfig::default()
        };
        Session::new(&config, Recorder::default())
    }

    #[test]
    fn losing_spin_cycle() {
        let mut s = session_with(100);
        assert_eq!(s.start(), StartOutcome::Started { bet: 5, debited: true });
        assert!(s.is_spinning());
        assert!(!s.selector().is_enabled());
        assert_eq!(s.start(), StartOutcome::AlreadySpinning);
        assert_eq!(s.scoreboard().money(), 95);

        let settled = s.settle(&SpinOutcome::lost(), &mut FixedCategory::default());
        assert_eq!(
            settled,
            Settlement::Settled(SettledRound {
                won: false,
                payout: None,
                locked: false
            })
        );
        assert_eq!(s.phase(), Phase::Idle);
        assert!(s.selector().is_enabled());
        assert_eq!(s.presenter().start_enabled, vec![true, false, true]);
        assert_eq!(s.presenter().cues, vec![Cue::Coin, Cue::Spin, Cue::Stop]);
        assert_eq!(s.presenter().stopped, vec![Cue::Spin]);
    }

    #[test]
    fn winning_spin_pays_scoreboard_bet() {
        let mut s = session_with(100);
        s.start();
        s.settle(&SpinOutcome::won(), &mut FixedCategory(WinCategory::MediumWin));
        assert_eq!(s.scoreboard().money(), 95 + 25);
        assert_eq!(s.scoreboard().streak(), 1);
        assert_eq!(s.presenter().victories.len(), 1);
        assert_eq!(s.presenter().cues.last(), Some(&Cue::Win));
    }

    #[test]
    fn settle_without_spin_is_ignored() {
        let mut s = session_with(100);
        assert_eq!(
            s.settle(&SpinOutcome::won(), &mut FixedCategory::default()),
            Settlement::NotSpinning
        );
        assert_eq!(s.scoreboard().money(), 100);
    }

    #[test]
    fn insufficient_funds_changes_nothing() {
        let mut s = session_with(3);
        assert_eq!(
            s.start(),
            StartOutcome::InsufficientFunds { money: 3, bet: 5 }
        );
        assert_eq!(s.phase(), Phase::Idle);
        assert_eq!(s.scoreboard().money(), 3);
        assert_eq!(s.presenter().notices, 1);
    }

    #[test]
    fn draining_spin_locks_session() {
        let config = GameConfig {
            starting_money: 5,
            ..GameConfig::default()
        };
        let mut s = Session::new(&config, Recorder::default());
        s.start();
        let settled = s.settle(&SpinOutcome::lost(), &mut FixedCategory::default());
        assert!(matches!(settled, Settlement::Settled(SettledRound { locked: true, .. })));
        assert_eq!(s.phase(), Phase::Locked);
        assert_eq!(s.start(), StartOutcome::Locked);
        assert!(!s.selector().is_enabled());
        assert_eq!(s.increase_bet(), 5);
    }

    #[test]
    fn winning_last_coin_keeps_playing() {
        let mut s = session_with(5);
        s.start();
        let settled = s.settle(&SpinOutcome::won(), &mut FixedCategory::default());
        assert!(matches!(settled, Settlement::Settled(SettledRound { locked: false, .. })));
        assert_eq!(s.scoreboard().money(), 10);
        assert_eq!(s.phase(), Phase::Idle);
    }

    #[test]
    fn bet_changes_sync_scoreboard() {
        let mut s = session_with(100);
        assert_eq!(s.increase_bet(), 10);
        assert_eq!(s.scoreboard().bet(), 10);
        assert_eq!(s.max_bet(), 60);
        assert_eq!(s.scoreboard().bet(), 60);
        assert_eq!(s.min_bet(), 5);
        assert_eq!(s.scoreboard().bet(), 5);
    }

    #[test]
    fn scoreboard_correction_flows_back_to_panel() {
        let mut s = session_with(40);
        assert_eq!(s.max_bet(), 40);
        assert_eq!(s.scoreboard().bet(), 40);
        // 60 requested, 40 shown after the write-back
        assert_eq!(s.presenter().bets, vec![5, 60, 40]);
    }

    #[test]
    fn correction_below_panel_floor_settles() {
        let mut s = session_with(3);
        assert_eq!(s.max_bet(), 5);
        assert_eq!(s.scoreboard().bet(), 3);
    }

    #[test]
    fn bet_input_ignored_while_spinning() {
        let mut s = session_with(100);
        s.start();
        assert_eq!(s.increase_bet(), 5);
        assert_eq!(s.scoreboard().bet(), 5);
    }

    #[test]
    fn closure_picker() {
        let mut s = session_with(100);
        s.start();
        let mut picker = || WinCategory::MegaWin;
        s.settle(&SpinOutcome::won(), &mut picker);
        assert_eq!(s.scoreboard().money(), 95 + 100);
    }
}
