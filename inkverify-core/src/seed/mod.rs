//! Seed material — the only place credentials touch the simulation
//!
//! A credential pair is hashed once into a fixed-width [`Seed`]; the seed
//! keys a [`BitStream`] that supplies the initial grid noise.

mod credential;
mod stream;

pub use credential::{CredentialPolicy, Seed, SEED_LEN};
pub use stream::BitStream;
