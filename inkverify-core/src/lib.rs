//! InkVerify — memory-hard cellular-automaton proof-of-work
//!
//! A credential pair is hashed into a seed, the seed fills a large toroidal
//! grid, the grid is evolved for a fixed number of generations, and the
//! final state is hashed into a 32-byte lock. The client pays the memory
//! bandwidth; the server stores only the lock and compares.

pub mod audit;
pub mod config;
pub mod engine;
pub mod error;
pub mod grid;
pub mod lock;
pub mod seed;

#[cfg(target_arch = "wasm32")]
pub mod wasm;

pub use config::{LockConfig, LockParams};
pub use engine::Engine;
pub use error::LockError;
pub use grid::{Grid, Rule};
pub use lock::{derive_lock, verify_lock, Lock, LockPipeline, LockRecord};
pub use seed::{BitStream, CredentialPolicy, Seed};
