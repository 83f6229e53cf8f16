//! Lock — the digest of an evolved grid and the pipeline that produces it
//!
//! credential → seed → bit stream → initial grid → N generations →
//! canonical serialization → SHA-256. The lock is the only artifact that
//! outlives a run.

mod digest;
mod pipeline;
mod record;

pub use digest::{Lock, LOCK_LEN};
pub use pipeline::{derive_lock, seeded_grid, verify_lock, LockPipeline};
pub use record::LockRecord;
