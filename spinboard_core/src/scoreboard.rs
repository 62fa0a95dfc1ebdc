//! Player balance, active bet, cumulative winnings and win streaks.
//!
//! Every operation is total: out-of-range bets are clamped and debits that
//! cannot be covered are ignored. Nothing here returns an error.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use crate::win::WinCategory;

pub const DEFAULT_STARTING_MONEY: u64 = 100;
pub const DEFAULT_BET: u64 = 5;
pub const DEFAULT_MINIMUM_BET: u64 = 1;
pub const DEFAULT_MAXIMUM_BET: u64 = 100;

/// Streaks longer than this earn a bonus on top of the base payout.
const STREAK_BONUS_THRESHOLD: u32 = 3;
const MAX_STREAK_TIER: u64 = 3;

/// Result of a credited win.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payout {
    pub category: WinCategory,
    pub base: u64,
    pub bonus: u64,
}

impl Payout {
    pub fn total(&self) -> u64 {
        self.base.saturating_add(self.bonus)
    }
}

/// Read-only copy of the scoreboard for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreboardView {
    pub money: u64,
    pub bet: u64,
    pub win_amount: u64,
    pub streak: u32,
    pub max_streak: u32,
    pub out_of_money: bool,
}

impl fmt::Display for ScoreboardView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Money: ${}", self.money)?;
        writeln!(f, "Total Wins: ${}", self.win_amount)?;
        write!(f, "Streak: {} (Best: {})", self.streak, self.max_streak)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scoreboard {
    money: u64,
    bet: u64,
    win_amount: u64,
    current_streak: u32,
    max_streak: u32,
    out_of_money: bool,
    minimum_bet: u64,
    maximum_bet: u64,
}

impl Default for Scoreboard {
    fn default() -> Self {
        Self::new(
            DEFAULT_STARTING_MONEY,
            DEFAULT_BET,
            DEFAULT_MINIMUM_BET,
            DEFAULT_MAXIMUM_BET,
        )
    }
}

impl Scoreboard {
    /// The initial bet is stored as given; it is reconciled on the first `set_bet`.
    pub fn new(money: u64, bet: u64, minimum_bet: u64, maximum_bet: u64) -> Self {
        Self {
            money,
            bet,
            win_amount: 0,
            current_streak: 0,
            max_streak: 0,
            out_of_money: false,
            minimum_bet,
            maximum_bet,
        }
    }

    /// Debit a wager. Ignored while out of money or when the balance cannot
    /// cover it; returns whether the debit happened.
    pub fn decrement(&mut self, bet_amount: u64) -> bool {
        if self.out_of_money || self.money < bet_amount {
            debug!(money = self.money, bet_amount, "debit ignored");
            return false;
        }
        self.money -= bet_amount;
        self.current_streak = 0;
        if self.money < self.minimum_bet {
            self.out_of_money = true;
        }
        debug!(money = self.money, out_of_money = self.out_of_money, "debited");
        true
    }

    /// Credit a win of `category` against the active bet, including any
    /// streak bonus.
    pub fn increment(&mut self, category: WinCategory) -> Payout {
        // balances saturate at u64::MAX rather than overflow
        let base = self.bet.saturating_mul(category.multiplier());
        self.money = self.money.saturating_add(base);
        self.win_amount = self.win_amount.saturating_add(base);
        self.current_streak = self.current_streak.saturating_add(1);
        self.max_streak = self.max_streak.max(self.current_streak);

        let mut bonus = 0;
        if self.current_streak > STREAK_BONUS_THRESHOLD {
            let tier = (self.current_streak as u64 / 3).min(MAX_STREAK_TIER);
            // floor(base * 0.1 * tier) without float rounding
            bonus = base.saturating_mul(tier) / 10;
            self.money = self.money.saturating_add(bonus);
            self.win_amount = self.win_amount.saturating_add(bonus);
        }

        if self.out_of_money && self.money >= self.minimum_bet {
            self.out_of_money = false;
        }
        debug!(%category, base, bonus, streak = self.current_streak, "credited");
        Payout {
            category,
            base,
            bonus,
        }
    }

    /// Credit by category name; unknown names pay as a small win.
    pub fn increment_named(&mut self, category: &str) -> Payout {
        self.increment(WinCategory::from_name(category).unwrap_or_default())
    }

    /// Clamp `amount` into `[minimum_bet, min(maximum_bet, money)]`, store it
    /// and return it. The lower bound wins when money is below the minimum.
    pub fn set_bet(&mut self, amount: i64) -> u64 {
        let ceiling = self.maximum_bet.min(self.money);
        let requested = u64::try_from(amount).unwrap_or(0);
        self.bet = requested.min(ceiling).max(self.minimum_bet);
        self.bet
    }

    pub fn money(&self) -> u64 {
        self.money
    }

    pub fn bet(&self) -> u64 {
        self.bet
    }

    pub fn streak(&self) -> u32 {
        self.current_streak
    }

    pub fn max_streak(&self) -> u32 {
        self.max_streak
    }

    pub fn win_amount(&self) -> u64 {
        self.win_amount
    }

    pub fn is_out_of_money(&self) -> bool {
        self.out_of_money
    }

    pub fn minimum_bet(&self) -> u64 {
        self.minimum_bet
    }

    pub fn maximum_bet(&self) -> u64 {
        self.maximum_bet
    }

    pub fn snapshot(&self) -> ScoreboardView {
        ScoreboardView {
            money: self.money,
            bet: self.bet,
            win_amount: self.win_amount,
            streak: self.current_streak,
            max_streak: self.max_streak,
            out_of_money: self.out_of_money,
        }
    }
}
