// Pokemon Tiers Schema - Shared data definitions
// This crate holds every table, manifest and output record exchanged between
// the viability engine and the tools that feed it or consume its results.

// Re-export the main types
pub use battle_data::*;
pub use manifest::*;
pub use move_types::*;
pub use movepool::*;
pub use natures::*;
pub use pokemon_types::*;
pub use species_data::*;
pub use tiers::*;

pub mod battle_data;
pub mod manifest;
pub mod move_types;
pub mod movepool;
pub mod natures;
pub mod pokemon_types;
pub mod species_data;
pub mod tiers;
