//! LockRecord — what a storage collaborator persists per account
//!
//! The record carries the lock and the public parameters needed to
//! recompute it. It never carries credentials or grid contents.

use super::{Lock, LockPipeline};
use crate::config::{LockConfig, LockParams};
use crate::error::LockError;
use crate::grid::Rule;
use crate::seed::CredentialPolicy;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockRecord {
    pub account: String,
    pub lock: Lock,
    pub grid_width: usize,
    pub grid_height: usize,
    pub generation_target: u64,
    pub rule: Rule,
    pub created_at: DateTime<Utc>,
}

impl LockRecord {
    /// Derive a fresh lock for `account`
    pub fn create<P: AsRef<[u8]>>(
        account: impl Into<String>,
        credential_parts: &[P],
        config: &LockConfig,
    ) -> Result<Self, LockError> {
        let pipeline = LockPipeline::new(config)?;
        let lock = pipeline.derive(credential_parts)?;
        let params = pipeline.params();
        Ok(Self {
            account: account.into(),
            lock,
            grid_width: params.width(),
            grid_height: params.height(),
            generation_target: params.generations(),
            rule: params.rule(),
            created_at: Utc::now(),
        })
    }

    pub fn params(&self) -> Result<LockParams, LockError> {
        LockParams::new(self.grid_width, self.grid_height, self.generation_target, self.rule)
    }

    /// Re-derive with the recorded parameters and compare in constant time
    pub fn matches<P: AsRef<[u8]>>(&self, credential_parts: &[P], policy: &CredentialPolicy) -> bool {
        match self.params() {
            Ok(params) => LockPipeline::from_params(params, policy.clone())
                .verify(credential_parts, self.lock.as_bytes()),
            Err(_) => false,
        }
    }

    pub fn to_json(&self) -> Result<String, LockError> {
        serde_json::to_string_pretty(self).map_err(|e| LockError::ConfigFile(e.to_string()))
    }

    pub fn from_json(json: &str) -> Result<Self, LockError> {
        serde_json::from_str(json).map_err(|e| LockError::input(format!("lock record: {}", e)))
    }

    pub fn summary(&self) -> String {
        format!(
            "LockRecord '{}' | {} | grid={}x{} | generations={} | rule={} | created={}",
            self.account,
            self.lock,
            self.grid_width,
            self.grid_height,
            self.generation_target,
            self.rule,
            self.created_at.to_rfc3339()
        )
    }
}
