use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Symbol {
    Cherry,
    Lemon,
    Bell,
    Seven,
    Wild,
}

impl Symbol {
    pub const ALL: [Symbol; 5] = [
        Symbol::Cherry,
        Symbol::Lemon,
        Symbol::Bell,
        Symbol::Seven,
        Symbol::Wild,
    ];

    pub fn from_index(i: u8) -> Self {
        Self::ALL[(i % 5) as usize]
    }

    pub fn to_index(self) -> u8 {
        self as u8
    }

    pub fn is_wild(self) -> bool {
        self == Symbol::Wild
    }

    pub fn glyph(self) -> char {
        match self {
            Symbol::Cherry => 'C',
            Symbol::Lemon => 'L',
            Symbol::Bell => 'B',
            Symbol::Seven => '7',
            Symbol::Wild => '*',
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReelsConfig {
    pub reels: Vec<Vec<Symbol>>, // one strip per reel
    pub rows: usize,             // visible rows
}

impl ReelsConfig {
    pub fn default_3x3() -> Self {
        let strip = vec![
            Symbol::Cherry,
            Symbol::Lemon,
            Symbol::Bell,
            Symbol::Seven,
            Symbol::Wild,
            Symbol::Cherry,
            Symbol::Lemon,
            Symbol::Bell,
            Symbol::Seven,
        ];
        Self {
            reels: vec![strip.clone(), strip.clone(), strip],
            rows: 3,
        }
    }
}

impl Default for ReelsConfig {
    fn default() -> Self {
        Self::default_3x3()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_round_trips_for_every_symbol() {
        for s in Symbol::ALL {
            assert_eq!(Symbol::from_index(s.to_index()), s);
        }
    }

    #[test]
    fn default_layout_is_three_by_three() {
        let cfg = ReelsConfig::default_3x3();
        assert_eq!(cfg.reels.len(), 3);
        assert_eq!(cfg.rows, 3);
    }
}
