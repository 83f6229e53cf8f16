//! Run configuration
//!
//! [`LockConfig`] is the serializable form handed in by the surrounding
//! authentication layer; [`LockParams`] is its validated, immutable core.
//! Grid size, generation target and rule are never derived from
//! credentials.

use crate::error::LockError;
use crate::grid::{Rule, MAX_CELLS};
use crate::seed::CredentialPolicy;
use log::info;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Upper bound on the generation target
pub const MAX_GENERATIONS: u64 = 1_000_000;

/// Upper bound on cells × generations for a single run
pub const MAX_CELL_UPDATES: u64 = 1 << 40;

pub const DEFAULT_GRID_SIZE: usize = 256;
pub const DEFAULT_GENERATIONS: u64 = 1000;

/// Validated run-invariant parameters of one lock derivation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LockParams {
    width: usize,
    height: usize,
    generations: u64,
    rule: Rule,
}

impl LockParams {
    pub fn new(width: usize, height: usize, generations: u64, rule: Rule) -> Result<Self, LockError> {
        if width == 0 || height == 0 {
            return Err(LockError::config(format!(
                "grid dimensions must be positive, got {}x{}",
                width, height
            )));
        }
        let cells = width
            .checked_mul(height)
            .filter(|&n| n <= MAX_CELLS)
            .ok_or_else(|| {
                LockError::config(format!(
                    "grid {}x{} exceeds the {} cell ceiling",
                    width, height, MAX_CELLS
                ))
            })?;
        if generations > MAX_GENERATIONS {
            return Err(LockError::config(format!(
                "generation target {} exceeds the ceiling of {}",
                generations, MAX_GENERATIONS
            )));
        }
        if (cells as u64).saturating_mul(generations) > MAX_CELL_UPDATES {
            return Err(LockError::config(format!(
                "{} cells x {} generations exceeds the work ceiling of {} cell updates",
                cells, generations, MAX_CELL_UPDATES
            )));
        }
        Ok(Self { width, height, generations, rule })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn generations(&self) -> u64 {
        self.generations
    }

    pub fn rule(&self) -> Rule {
        self.rule
    }

    pub fn cells(&self) -> usize {
        self.width * self.height
    }
}

impl Default for LockParams {
    fn default() -> Self {
        Self {
            width: DEFAULT_GRID_SIZE,
            height: DEFAULT_GRID_SIZE,
            generations: DEFAULT_GENERATIONS,
            rule: Rule::default(),
        }
    }
}

/// Serializable pipeline configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LockConfig {
    pub grid_width: usize,
    pub grid_height: usize,
    /// Work factor: number of generations evolved per lock
    pub generation_target: u64,
    pub rule: Rule,
    pub policy: CredentialPolicy,
}

impl Default for LockConfig {
    fn default() -> Self {
        let params = LockParams::default();
        Self {
            grid_width: params.width,
            grid_height: params.height,
            generation_target: params.generations,
            rule: params.rule,
            policy: CredentialPolicy::default(),
        }
    }
}

impl LockConfig {
    /// Default configuration with different grid and work factor
    pub fn with_dimensions(width: usize, height: usize, generations: u64) -> Self {
        Self {
            grid_width: width,
            grid_height: height,
            generation_target: generations,
            ..Self::default()
        }
    }

    /// Validated parameters for a run
    pub fn params(&self) -> Result<LockParams, LockError> {
        LockParams::new(self.grid_width, self.grid_height, self.generation_target, self.rule)
    }

    pub fn validate(&self) -> Result<(), LockError> {
        self.params().map(|_| ())
    }

    /// Load and validate a JSON configuration file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LockError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| LockError::ConfigFile(format!("{}: {}", path.display(), e)))?;
        let config: Self = serde_json::from_str(&json)
            .map_err(|e| LockError::ConfigFile(format!("{}: {}", path.display(), e)))?;
        config.validate()?;
        info!("Loaded lock configuration from {}", path.display());
        Ok(config)
    }

    /// Load `path` if it exists, otherwise fall back to the defaults
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, LockError> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), LockError> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| LockError::ConfigFile(e.to_string()))?;
        std::fs::write(path, json)
            .map_err(|e| LockError::ConfigFile(format!("{}: {}", path.display(), e)))
    }

    pub fn summary(&self) -> String {
        format!(
            "grid={}x{} | generations={} | rule={} | non-empty parts={}",
            self.grid_width,
            self.grid_height,
            self.generation_target,
            self.rule,
            self.policy.require_non_empty
        )
    }
}
