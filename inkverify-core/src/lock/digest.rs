//! Lock digest and canonical final-state serialization

use crate::config::LockParams;
use crate::error::LockError;
use crate::grid::Grid;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};
use std::fmt;
use subtle::ConstantTimeEq;

/// Length of a lock in bytes
pub const LOCK_LEN: usize = 32;

const LOCK_DOMAIN: &[u8] = b"inkverify/lock/v1";

/// SHA-256 digest of a canonically serialized final grid.
///
/// Equality is constant-time; the hex form is for transport only.
#[derive(Clone, Copy)]
pub struct Lock([u8; LOCK_LEN]);

impl Lock {
    /// Hash the final state of `grid` together with the run parameters.
    ///
    /// Serialization: domain tag, rule id (u8), width, height and
    /// generation target (u64 LE each), then the packed cells.
    pub fn of_final_state(grid: &Grid, params: &LockParams) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(LOCK_DOMAIN);
        hasher.update([params.rule().id()]);
        hasher.update((params.width() as u64).to_le_bytes());
        hasher.update((params.height() as u64).to_le_bytes());
        hasher.update(params.generations().to_le_bytes());
        hasher.update(grid.pack());
        Self(hasher.finalize().into())
    }

    pub fn from_bytes(bytes: [u8; LOCK_LEN]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; LOCK_LEN] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    pub fn from_hex(s: &str) -> Result<Self, LockError> {
        let bytes = hex::decode(s.trim()).map_err(|e| LockError::input(format!("lock hex: {}", e)))?;
        let bytes: [u8; LOCK_LEN] = bytes.try_into().map_err(|v: Vec<u8>| {
            LockError::input(format!("lock must be {} bytes, got {}", LOCK_LEN, v.len()))
        })?;
        Ok(Self(bytes))
    }

    /// Constant-time comparison against raw bytes of any length
    pub fn matches(&self, candidate: &[u8]) -> bool {
        self.0[..].ct_eq(candidate).into()
    }
}

impl PartialEq for Lock {
    fn eq(&self, other: &Self) -> bool {
        self.matches(&other.0)
    }
}

impl Eq for Lock {}

impl fmt::Debug for Lock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Lock({})", self.to_hex())
    }
}

impl fmt::Display for Lock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for Lock {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Lock {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Lock::from_hex(&s).map_err(serde::de::Error::custom)
    }
}
