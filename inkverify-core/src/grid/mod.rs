//! Grid substrate and the versioned update rules that run over it

mod rule;
mod substrate;

pub use rule::Rule;
pub use substrate::{Grid, MAX_CELLS};
