use tracing::debug;

use crate::{
    rng::ProvablyFairRng,
    session::{CategoryPicker, SpinOutcome, Spinner},
    symbols::{ReelsConfig, Symbol},
    win::{CategoryWeights, WinCategory},
};

pub fn compute_reel_window(rng: &ProvablyFairRng, reels: &ReelsConfig) -> Vec<Vec<Symbol>> {
    // Each reel starts at an RNG-chosen offset and shows `rows` symbols circularly
    let cols = reels.reels.len();
    let floats = rng.next_floats(cols);
    let mut window = vec![vec![Symbol::Cherry; cols]; reels.rows];
    for (col, strip) in reels.reels.iter().enumerate() {
        if strip.is_empty() {
            continue;
        }
        let start = ((floats[col] * strip.len() as f64).floor() as usize) % strip.len();
        for (r, row) in window.iter_mut().enumerate() {
            row[col] = strip[(start + r) % strip.len()];
        }
    }
    window
}

/// A row wins when every non-wild symbol on it is the same.
pub fn is_winning_row(row: &[Symbol]) -> bool {
    let mut anchor = None;
    for &sym in row.iter().filter(|s| !s.is_wild()) {
        match anchor {
            None => anchor = Some(sym),
            Some(a) if a != sym => return false,
            Some(_) => {}
        }
    }
    !row.is_empty()
}

pub fn is_winning_window(window: &[Vec<Symbol>]) -> bool {
    window.iter().any(|row| is_winning_row(row))
}

/// Recompute the window for published seeds and compare.
pub fn verify_window(
    server_seed: &str,
    client_seed: &str,
    nonce: u64,
    reels: &ReelsConfig,
    expected: &[Vec<Symbol>],
) -> bool {
    let rng = ProvablyFairRng::new(server_seed, client_seed, nonce);
    compute_reel_window(&rng, reels) == expected
}

/// Reels driven by the provably-fair RNG; one nonce per spin.
#[derive(Debug, Clone)]
pub struct ReelSpinner {
    rng: ProvablyFairRng,
    reels: ReelsConfig,
}

impl ReelSpinner {
    /// The first spin uses nonce `first_nonce + 1`.
    pub fn new(
        server_seed: impl Into<String>,
        client_seed: impl Into<String>,
        first_nonce: u64,
        reels: ReelsConfig,
    ) -> Self {
        Self {
            rng: ProvablyFairRng::new(server_seed, client_seed, first_nonce),
            reels,
        }
    }

    pub fn server_seed_hash_hex(&self) -> String {
        self.rng.server_seed_hash_hex()
    }

    /// Nonce of the most recent spin.
    pub fn nonce(&self) -> u64 {
        self.rng.nonce
    }

    pub fn reels(&self) -> &ReelsConfig {
        &self.reels
    }

    /// Spin without awaiting; front ends that animate on their own use this.
    pub fn spin_now(&mut self) -> SpinOutcome {
        self.rng.nonce += 1;
        let reel_window = compute_reel_window(&self.rng, &self.reels);
        let won = is_winning_window(&reel_window);
        debug!(nonce = self.rng.nonce, won, "reels stopped");
        SpinOutcome { won, reel_window }
    }
}

impl Spinner for ReelSpinner {
    async fn spin(&mut self) -> SpinOutcome {
        self.spin_now()
    }
}

/// Weighted category draws from the same HMAC construction, under a
/// separate client-seed domain so they never reuse a reel draw.
#[derive(Debug, Clone)]
pub struct SeededCategoryPicker {
    rng: ProvablyFairRng,
    weights: CategoryWeights,
}

impl SeededCategoryPicker {
    pub fn new(server_seed: impl Into<String>, client_seed: &str, weights: CategoryWeights) -> Self {
        Self {
            rng: ProvablyFairRng::new(server_seed, format!("{client_seed}/category"), 0),
            weights,
        }
    }
}

impl CategoryPicker for SeededCategoryPicker {
    fn pick(&mut self) -> WinCategory {
        self.rng.nonce += 1;
        self.weights.select(self.rng.next_float())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use Symbol::*;

    #[test]
    fn test_spin_deterministic() {
        let mut a = ReelSpinner::new("server", "client", 0, ReelsConfig::default_3x3());
        let mut b = ReelSpinner::new("server", "client", 0, ReelsConfig::default_3x3());
        assert_eq!(a.spin_now(), b.spin_now());
        assert_eq!(a.nonce(), 1);
    }

    #[test]
    fn rows_with_wilds() {
        assert!(is_winning_row(&[Bell, Bell, Bell]));
        assert!(is_winning_row(&[Wild, Seven, Seven]));
        assert!(is_winning_row(&[Lemon, Wild, Lemon]));
        assert!(is_winning_row(&[Wild, Wild, Wild]));
        assert!(!is_winning_row(&[Wild, Cherry, Lemon]));
        assert!(!is_winning_row(&[Cherry, Cherry, Lemon]));
        assert!(!is_winning_row(&[]));
    }

    #[test]
    fn window_is_strip_slice() {
        let rng = ProvablyFairRng::new("server", "client", 9);
        let cfg = ReelsConfig::default_3x3();
        let window = compute_reel_window(&rng, &cfg);
        assert_eq!(window.len(), 3);
        for (col, strip) in cfg.reels.iter().enumerate() {
            let contiguous = (0..strip.len())
                .any(|st| (0..3).all(|r| strip[(st + r) % strip.len()] == window[r][col]));
            assert!(contiguous, "column {col} is not a strip slice");
        }
    }

    #[test]
    fn verify_accepts_own_window_only() {
        let cfg = ReelsConfig::default_3x3();
        let mut spinner = ReelSpinner::new("server", "client", 41, cfg.clone());
        let out = spinner.spin_now();
        assert!(verify_window("server", "client", 42, &cfg, &out.reel_window));

        let mut tampered = out.reel_window.clone();
        tampered[0][0] = if tampered[0][0] == Wild { Cherry } else { Wild };
        assert!(!verify_window("server", "client", 42, &cfg, &tampered));
    }

    #[test]
    fn seeded_picker_is_repeatable() {
        let mut a = SeededCategoryPicker::new("s", "c", CategoryWeights::default());
        let mut b = SeededCategoryPicker::new("s", "c", CategoryWeights::default());
        let xs: Vec<_> = (0..20).map(|_| a.pick()).collect();
        let ys: Vec<_> = (0..20).map(|_| b.pick()).collect();
        assert_eq!(xs, ys);
    }

    #[test]
    fn seeded_picker_respects_single_weight() {
        let weights = CategoryWeights {
            small_win: 0,
            medium_win: 0,
            big_win: 1,
            mega_win: 0,
        };
        let mut p = SeededCategoryPicker::new("s", "c", weights);
        assert!((0..50).all(|_| p.pick() == WinCategory::BigWin));
    }
}
