//! Seed/Digest pipeline
//!
//! Each call builds its own seed, bit stream and grid and drops them once
//! the lock is computed. Nothing is cached or shared between calls, so
//! independent invocations can run on as many threads as the caller likes.

use super::Lock;
use crate::config::{LockConfig, LockParams};
use crate::engine::Engine;
use crate::error::LockError;
use crate::grid::Grid;
use crate::seed::{BitStream, CredentialPolicy, Seed};
use log::debug;

// Stand-in credential simulated when verification input fails the policy,
// so a rejected input costs the same as a wrong one.
const DECOY_PARTS: [&[u8]; 2] = [b"inkverify/decoy", b"\0"];

/// Allocate a grid for `params` and fill it from the seed's bit stream
pub fn seeded_grid(seed: &Seed, params: &LockParams) -> Result<Grid, LockError> {
    let mut grid = Grid::new(params.width(), params.height())?;
    let mut stream = BitStream::from_seed(seed);
    grid.fill(stream.bits());
    Ok(grid)
}

/// Configured lock derivation
#[derive(Debug, Clone)]
pub struct LockPipeline {
    params: LockParams,
    policy: CredentialPolicy,
}

impl LockPipeline {
    pub fn new(config: &LockConfig) -> Result<Self, LockError> {
        Ok(Self {
            params: config.params()?,
            policy: config.policy.clone(),
        })
    }

    pub fn from_params(params: LockParams, policy: CredentialPolicy) -> Self {
        Self { params, policy }
    }

    pub fn params(&self) -> &LockParams {
        &self.params
    }

    pub fn policy(&self) -> &CredentialPolicy {
        &self.policy
    }

    /// Derive the lock for a credential tuple.
    ///
    /// Policy violations are reported before any grid is allocated.
    pub fn derive<P: AsRef<[u8]>>(&self, credential_parts: &[P]) -> Result<Lock, LockError> {
        self.policy.check(credential_parts)?;
        self.derive_from_seed(&Seed::derive(credential_parts))
    }

    /// Evolve the grid keyed by `seed` and hash the final state
    pub fn derive_from_seed(&self, seed: &Seed) -> Result<Lock, LockError> {
        let params = &self.params;
        debug!(
            "Deriving lock: {}x{} grid, {} generations, rule {}",
            params.width(),
            params.height(),
            params.generations(),
            params.rule()
        );
        let grid = seeded_grid(seed, params)?;
        let final_state = Engine::new(grid, params)?.run();
        let lock = Lock::of_final_state(&final_state, params);
        debug!("Lock derived");
        Ok(lock)
    }

    /// Recompute the lock and compare it with `expected` in constant time.
    ///
    /// Never fails: any problem reads as a mismatch. Input rejected by the
    /// policy is still run through a full simulation on a decoy credential.
    pub fn verify<P: AsRef<[u8]>>(&self, credential_parts: &[P], expected: &[u8]) -> bool {
        let accepted = self.policy.check(credential_parts).is_ok();
        let seed = if accepted {
            Seed::derive(credential_parts)
        } else {
            Seed::derive(&DECOY_PARTS)
        };
        match self.derive_from_seed(&seed) {
            Ok(lock) => lock.matches(expected) & accepted,
            Err(_) => false,
        }
    }
}

/// Derive a lock with the default rule and credential policy
pub fn derive_lock<P: AsRef<[u8]>>(
    credential_parts: &[P],
    grid_width: usize,
    grid_height: usize,
    generation_target: u64,
) -> Result<Lock, LockError> {
    let config = LockConfig::with_dimensions(grid_width, grid_height, generation_target);
    LockPipeline::new(&config)?.derive(credential_parts)
}

/// Check a credential tuple against a stored lock; `false` on any mismatch
/// or error
pub fn verify_lock<P: AsRef<[u8]>>(
    candidate_credential_parts: &[P],
    grid_width: usize,
    grid_height: usize,
    generation_target: u64,
    expected_digest: &[u8],
) -> bool {
    let config = LockConfig::with_dimensions(grid_width, grid_height, generation_target);
    match LockPipeline::new(&config) {
        Ok(pipeline) => pipeline.verify(candidate_credential_parts, expected_digest),
        Err(_) => false,
    }
}
