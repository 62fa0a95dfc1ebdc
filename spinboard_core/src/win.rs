//! Win categories, their fixed payout multipliers and the weighting used
//! when a category has to be drawn at random.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum WinCategory {
    #[default]
    SmallWin,
    MediumWin,
    BigWin,
    MegaWin,
}

impl WinCategory {
    pub const ALL: [WinCategory; 4] = [
        WinCategory::SmallWin,
        WinCategory::MediumWin,
        WinCategory::BigWin,
        WinCategory::MegaWin,
    ];

    /// Payout as a multiple of the active bet.
    pub fn multiplier(self) -> u64 {
        match self {
            WinCategory::SmallWin => 2,
            WinCategory::MediumWin => 5,
            WinCategory::BigWin => 10,
            WinCategory::MegaWin => 20,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            WinCategory::SmallWin => "small_win",
            WinCategory::MediumWin => "medium_win",
            WinCategory::BigWin => "big_win",
            WinCategory::MegaWin => "mega_win",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.name() == name)
    }
}

impl fmt::Display for WinCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Relative odds of each category once a spin is known to have won.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryWeights {
    pub small_win: u32,
    pub medium_win: u32,
    pub big_win: u32,
    pub mega_win: u32,
}

impl Default for CategoryWeights {
    fn default() -> Self {
        Self {
            small_win: 70,
            medium_win: 20,
            big_win: 8,
            mega_win: 2, // rare
        }
    }
}

impl CategoryWeights {
    pub fn weight(&self, category: WinCategory) -> u32 {
        match category {
            WinCategory::SmallWin => self.small_win,
            WinCategory::MediumWin => self.medium_win,
            WinCategory::BigWin => self.big_win,
            WinCategory::MegaWin => self.mega_win,
        }
    }

    pub fn total(&self) -> u64 {
        WinCategory::ALL
            .iter()
            .map(|c| self.weight(*c) as u64)
            .sum()
    }

    /// Map a uniform draw in `[0,1)` onto a category by cumulative weight.
    pub fn select(&self, draw: f64) -> WinCategory {
        let total = self.total();
        if total == 0 {
            return WinCategory::SmallWin;
        }
        let target = (draw.clamp(0.0, 1.0) * total as f64).floor() as u64;
        let mut cumulative = 0u64;
        for category in WinCategory::ALL {
            cumulative += self.weight(category) as u64;
            if target < cumulative {
                return category;
            }
        }
        // draw == 1.0 lands past the last bucket
        WinCategory::ALL
            .into_iter()
            .rev()
            .find(|c| self.weight(*c) > 0)
            .unwrap_or_default()
    }
}
