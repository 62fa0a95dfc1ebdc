//! The bet the player is dialing in on the bet panel.
//!
//! Independent of the scoreboard's own clamp against the balance; the
//! session reconciles the two.

use std::fmt;

use crate::config::SelectorConfig;

type ChangeListener = Box<dyn FnMut(u64)>;

pub struct BetSelector {
    current_bet: u64,
    min_bet: u64,
    max_bet: u64,
    step: u64,
    enabled: bool,
    on_change: Option<ChangeListener>,
}

impl fmt::Debug for BetSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BetSelector")
            .field("current_bet", &self.current_bet)
            .field("min_bet", &self.min_bet)
            .field("max_bet", &self.max_bet)
            .field("step", &self.step)
            .field("enabled", &self.enabled)
            .finish_non_exhaustive()
    }
}

impl Default for BetSelector {
    fn default() -> Self {
        Self::new(&SelectorConfig::default())
    }
}

impl BetSelector {
    /// Inverted bounds are swapped so the range is never empty.
    pub fn new(config: &SelectorConfig) -> Self {
        Self {
            current_bet: config.initial_bet,
            min_bet: config.min_bet.min(config.max_bet),
            max_bet: config.min_bet.max(config.max_bet),
            step: config.step,
            enabled: true,
            on_change: None,
        }
    }

    /// Register the listener fired on every notified change.
    pub fn on_change(&mut self, listener: impl FnMut(u64) + 'static) {
        self.on_change = Some(Box::new(listener));
    }

    fn clamp(&self, value: i128) -> u64 {
        value.clamp(self.min_bet as i128, self.max_bet as i128) as u64
    }

    fn notify(&mut self, value: u64) -> Option<u64> {
        self.current_bet = value;
        if let Some(listener) = self.on_change.as_mut() {
            listener(value);
        }
        Some(value)
    }

    /// Move by `delta`, staying in range. Notifies only when the value moved.
    pub fn adjust_bet(&mut self, delta: i64) -> Option<u64> {
        let next = self.clamp(self.current_bet as i128 + delta as i128);
        if next == self.current_bet {
            return None;
        }
        self.notify(next)
    }

    fn signed_step(&self) -> i64 {
        i64::try_from(self.step).unwrap_or(i64::MAX)
    }

    pub fn increase(&mut self) -> Option<u64> {
        self.adjust_bet(self.signed_step())
    }

    pub fn decrease(&mut self) -> Option<u64> {
        self.adjust_bet(-self.signed_step())
    }

    /// Always notifies, even when already at the maximum.
    pub fn set_max_bet(&mut self) -> Option<u64> {
        self.notify(self.max_bet)
    }

    /// Always notifies, even when already at the minimum.
    pub fn set_min_bet(&mut self) -> Option<u64> {
        self.notify(self.min_bet)
    }

    /// Correction path used when the scoreboard settles on a different bet.
    pub fn set_current_bet(&mut self, value: u64) -> Option<u64> {
        let next = self.clamp(value as i128);
        if next == self.current_bet {
            return None;
        }
        self.notify(next)
    }

    pub fn current_bet(&self) -> u64 {
        self.current_bet
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn min_bet(&self) -> u64 {
        self.min_bet
    }

    pub fn max_bet(&self) -> u64 {
        self.max_bet
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn recording() -> (BetSelector, Rc<RefCell<Vec<u64>>>) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut selector = BetSelector::default();
        let sink = Rc::clone(&seen);
        selector.on_change(move |v| sink.borrow_mut().push(v));
        (selector, seen)
    }

    #[test]
    fn steps_up_and_down() {
        let (mut s, seen) = recording();
        assert_eq!(s.increase(), Some(10));
        assert_eq!(s.increase(), Some(15));
        assert_eq!(s.decrease(), Some(10));
        assert_eq!(*seen.borrow(), vec![10, 15, 10]);
    }

    #[test]
    fn adjust_at_bound_is_silent() {
        let (mut s, seen) = recording();
        assert_eq!(s.decrease(), None);
        assert_eq!(s.current_bet(), 5);
        s.set_max_bet();
        seen.borrow_mut().clear();
        assert_eq!(s.adjust_bet(5), None);
        assert_eq!(s.current_bet(), 60);
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn max_and_min_always_notify() {
        let (mut s, seen) = recording();
        assert_eq!(s.set_max_bet(), Some(60));
        assert_eq!(s.set_max_bet(), Some(60));
        assert_eq!(s.set_min_bet(), Some(5));
        assert_eq!(s.set_min_bet(), Some(5));
        assert_eq!(*seen.borrow(), vec![60, 60, 5, 5]);
    }

    #[test]
    fn large_delta_clamps() {
        let (mut s, _) = recording();
        assert_eq!(s.adjust_bet(1_000), Some(60));
        assert_eq!(s.adjust_bet(i64::MIN), Some(5));
    }

    #[test]
    fn correction_clamps_and_skips_unchanged() {
        let (mut s, seen) = recording();
        assert_eq!(s.set_current_bet(5), None);
        assert_eq!(s.set_current_bet(3), None);
        assert_eq!(s.set_current_bet(25), Some(25));
        assert_eq!(s.set_current_bet(900), Some(60));
        assert_eq!(*seen.borrow(), vec![25, 60]);
    }

    #[test]
    fn inverted_bounds_are_reordered() {
        let mut s = BetSelector::new(&SelectorConfig {
            min_bet: 60,
            max_bet: 5,
            step: 5,
            initial_bet: 5,
        });
        assert_eq!((s.min_bet(), s.max_bet()), (5, 60));
        assert_eq!(s.increase(), Some(10));
        assert_eq!(s.set_max_bet(), Some(60));
    }

    #[test]
    fn oversized_step_clamps_to_bounds() {
        let mut s = BetSelector::new(&SelectorConfig {
            step: u64::MAX,
            ..SelectorConfig::default()
        });
        assert_eq!(s.increase(), Some(60));
        assert_eq!(s.decrease(), Some(5));
    }

    #[test]
    fn enabled_toggle_is_recorded() {
        let mut s = BetSelector::default();
        assert!(s.is_enabled());
        s.set_enabled(false);
        assert!(!s.is_enabled());
    }
}
