//! Audit — empirical checks on the work function
//!
//! A rule that lets seeded grids settle into a fixed point or a short cycle
//! leaks timing information and makes the final state cheaper to predict
//! than the nominal work factor. [`probe_stability`] looks for such cycles;
//! [`avalanche`] measures how far locks of related credentials drift apart.

use crate::config::LockParams;
use crate::engine::Engine;
use crate::error::LockError;
use crate::grid::Grid;
use crate::lock::{seeded_grid, Lock, LOCK_LEN};
use crate::seed::Seed;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::{HashMap, VecDeque};

/// A detected repetition of the full dynamical state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cycle {
    /// Generation at which the repeated state first appeared
    pub first_seen: u64,
    /// Generations between the two occurrences
    pub period: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StabilityReport {
    /// Generations evolved before the probe stopped
    pub generations: u64,
    pub cycle: Option<Cycle>,
    pub initial_alive: usize,
    pub final_alive: usize,
}

impl StabilityReport {
    pub fn stabilized(&self) -> bool {
        self.cycle.is_some()
    }
}

// Fingerprint of everything the next generation depends on: for a
// second-order rule that includes the retained previous generation.
fn state_fingerprint(grid: &Grid, second_order: bool) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(grid.pack());
    if second_order {
        hasher.update(Grid::pack_cells(grid.next()));
    }
    hasher.finalize().into()
}

/// Evolve the grid keyed by `seed` and report the first repeated state.
///
/// Only the last `window` fingerprints are kept, so cycles longer than the
/// window go unnoticed; pass the generation target to cover the whole run.
pub fn probe_stability(seed: &Seed, params: &LockParams, window: usize) -> Result<StabilityReport, LockError> {
    let grid = seeded_grid(seed, params)?;
    let initial_alive = grid.alive_count();
    let second_order = params.rule().is_second_order();
    let mut engine = Engine::new(grid, params)?;

    let mut seen: HashMap<[u8; 32], u64> = HashMap::new();
    let mut order: VecDeque<[u8; 32]> = VecDeque::new();
    let mut cycle = None;

    loop {
        let generation = engine.generation();
        let fp = state_fingerprint(engine.grid(), second_order);
        if let Some(&first_seen) = seen.get(&fp) {
            cycle = Some(Cycle {
                first_seen,
                period: generation - first_seen,
            });
            break;
        }
        seen.insert(fp, generation);
        order.push_back(fp);
        if order.len() > window.max(1) {
            if let Some(old) = order.pop_front() {
                seen.remove(&old);
            }
        }
        if engine.is_complete() {
            break;
        }
        engine.step();
    }

    Ok(StabilityReport {
        generations: engine.generation(),
        cycle,
        initial_alive,
        final_alive: engine.grid().alive_count(),
    })
}

/// Fraction of differing bits between two locks
pub fn bit_difference(a: &Lock, b: &Lock) -> f64 {
    let differing: u32 = a
        .as_bytes()
        .iter()
        .zip(b.as_bytes())
        .map(|(x, y)| (x ^ y).count_ones())
        .sum();
    differing as f64 / (LOCK_LEN * 8) as f64
}

/// Mean bit-difference ratio over lock pairs; ideal is 0.5
pub fn avalanche<I: IntoIterator<Item = (Lock, Lock)>>(pairs: I) -> f64 {
    let (total, count) = pairs
        .into_iter()
        .fold((0.0, 0usize), |(sum, n), (a, b)| (sum + bit_difference(&a, &b), n + 1));
    if count == 0 {
        0.0
    } else {
        total / count as f64
    }
}
