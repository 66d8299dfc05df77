use bevy::prelude::*;

use crate::prelude::{BOARD_SIZE, MAX_MOVES, NUM_COLORS, PALETTE};

/// Environment variable holding a `u64` seed for reproducible boards.
pub const SEED_ENV_VAR: &str = "TINY_FLOOD_SEED";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("board size must be at least 1")]
    EmptyBoard,

    #[error("color count {0} is outside 1..={max}", max = PALETTE.len())]
    ColorCount(u8),

    #[error("invalid seed in TINY_FLOOD_SEED: {0:?}")]
    Seed(String),
}

/// Parameters for a game session.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    /// the amount of cells on each axis
    pub board_size: u32,
    pub num_colors: u8,
    pub max_moves: u32,
    /// fixed RNG seed, random when `None`
    pub seed: Option<u64>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            board_size: BOARD_SIZE,
            num_colors: NUM_COLORS,
            max_moves: MAX_MOVES,
            seed: None,
        }
    }
}

impl SessionConfig {
    /// Default config with the seed taken from [`SEED_ENV_VAR`] if it is set.
    pub fn from_env() -> Result<Self, ConfigError> {
        let seed = match std::env::var(SEED_ENV_VAR) {
            Ok(raw) => Some(parse_seed(&raw)?),
            Err(_) => None,
        };
        Self { seed, ..default() }.validate()
    }

    pub fn validate(self) -> Result<Self, ConfigError> {
        if self.board_size == 0 {
            return Err(ConfigError::EmptyBoard);
        }
        if self.num_colors == 0 || self.num_colors as usize > PALETTE.len() {
            return Err(ConfigError::ColorCount(self.num_colors));
        }
        Ok(self)
    }

    pub fn rng(&self) -> fastrand::Rng {
        match self.seed {
            Some(seed) => fastrand::Rng::with_seed(seed),
            None => fastrand::Rng::new(),
        }
    }
}

fn parse_seed(raw: &str) -> Result<u64, ConfigError> {
    raw.trim()
        .parse()
        .map_err(|_| ConfigError::Seed(raw.to_owned()))
}
