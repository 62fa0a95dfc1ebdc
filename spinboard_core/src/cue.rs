//! Sound cues emitted around a spin. Playback and timers belong to the
//! presenter; this only fixes which cue plays when.

use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const SPIN_LOOP_DELAY: Duration = Duration::from_millis(300);
pub const WIN_DELAY: Duration = Duration::from_millis(300);
/// The win jingle is cut off after this long.
pub const WIN_MAX_DURATION: Duration = Duration::from_millis(3500);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cue {
    Coin,
    Spin,
    Stop,
    Win,
}

impl Cue {
    pub fn volume(self) -> f32 {
        match self {
            Cue::Coin => 0.5,
            Cue::Spin => 0.3,
            Cue::Stop => 0.4,
            Cue::Win => 0.6,
        }
    }

    pub fn asset(self) -> &'static str {
        match self {
            Cue::Coin => "coin.mp3",
            Cue::Spin => "spin.mp3",
            Cue::Stop => "stop.mp3",
            Cue::Win => "win.mp3",
        }
    }

    /// How long the cue may play before the presenter stops it, if bounded.
    pub fn max_duration(self) -> Option<Duration> {
        match self {
            Cue::Win => Some(WIN_MAX_DURATION),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CueRequest {
    pub cue: Cue,
    pub delay: Duration,
    pub looping: bool,
}

impl CueRequest {
    pub fn now(cue: Cue) -> Self {
        Self {
            cue,
            delay: Duration::ZERO,
            looping: false,
        }
    }

    pub fn after(cue: Cue, delay: Duration) -> Self {
        Self {
            cue,
            delay,
            looping: false,
        }
    }

    pub fn looped(mut self) -> Self {
        self.looping = true;
        self
    }
}

/// Cues for a spin that was just paid for.
pub fn spin_started() -> [CueRequest; 2] {
    [
        CueRequest::now(Cue::Coin),
        CueRequest::after(Cue::Spin, SPIN_LOOP_DELAY).looped(),
    ]
}

/// Cues once the reels stop; the spin loop must be stopped first.
pub fn spin_resolved(won: bool) -> Vec<CueRequest> {
    let mut cues = vec![CueRequest::now(Cue::Stop)];
    if won {
        cues.push(CueRequest::after(Cue::Win, WIN_DELAY));
    }
    cues
}
