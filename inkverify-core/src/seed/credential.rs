//! Credential parts → Seed
//!
//! Parts are hashed with an explicit count and per-part length prefix so
//! that `("ab", "c")` and `("a", "bc")` can never collide.

use crate::error::LockError;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// Width of a derived seed in bytes
pub const SEED_LEN: usize = 32;

const SEED_DOMAIN: &[u8] = b"inkverify/seed/v1";

/// Which credential shapes the caller is willing to lock.
///
/// The policy belongs to the surrounding authentication layer; the pipeline
/// only enforces whatever it is handed, before any grid work starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CredentialPolicy {
    /// Reject an empty part list and any zero-length part
    pub require_non_empty: bool,
    /// Upper bound on the byte length of a single part
    pub max_part_len: usize,
}

impl Default for CredentialPolicy {
    fn default() -> Self {
        Self {
            require_non_empty: true,
            max_part_len: 4096,
        }
    }
}

impl CredentialPolicy {
    /// Accept any parts, including empty ones
    pub fn permissive() -> Self {
        Self {
            require_non_empty: false,
            max_part_len: usize::MAX,
        }
    }

    /// Check credential parts against this policy
    pub fn check<P: AsRef<[u8]>>(&self, parts: &[P]) -> Result<(), LockError> {
        if self.require_non_empty && parts.is_empty() {
            return Err(LockError::input("no credential parts supplied"));
        }
        for (i, part) in parts.iter().enumerate() {
            let len = part.as_ref().len();
            if self.require_non_empty && len == 0 {
                return Err(LockError::input(format!("credential part {} is empty", i)));
            }
            if len > self.max_part_len {
                return Err(LockError::input(format!(
                    "credential part {} exceeds {} bytes",
                    i, self.max_part_len
                )));
            }
        }
        Ok(())
    }
}

/// Fixed-width seed derived from a credential tuple
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Seed([u8; SEED_LEN]);

impl Seed {
    /// Hash credential parts into a seed.
    ///
    /// Layout: domain tag, u64-LE part count, then per part a u64-LE length
    /// followed by the raw bytes.
    pub fn derive<P: AsRef<[u8]>>(parts: &[P]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(SEED_DOMAIN);
        hasher.update((parts.len() as u64).to_le_bytes());
        for part in parts {
            let bytes = part.as_ref();
            hasher.update((bytes.len() as u64).to_le_bytes());
            hasher.update(bytes);
        }
        Self(hasher.finalize().into())
    }

    pub fn from_bytes(bytes: [u8; SEED_LEN]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; SEED_LEN] {
        &self.0
    }
}

// Seeds stand in for credentials and must never end up in logs.
impl fmt::Debug for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Seed(..)")
    }
}
