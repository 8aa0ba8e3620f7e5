//! Pokemon Tiers
//!
//! An offline, deterministic viability engine. For every species of every
//! supported game it plays one-on-one matchups against the story's boss
//! battles, split into early, mid and late phases, and grades the results
//! into named ratios, letter tiers and a role.

// --- MODULE DECLARATIONS ---
pub mod analysis;
pub mod batch;
pub mod config;
pub mod errors;
pub mod parallel;
pub mod reference;
pub mod report;
pub mod stats;

// --- PUBLIC API RE-EXPORTS ---

// --- From the `schema` crate ---
pub use schema::{
    AvailabilityStatus, BattleCategory, BossBattle, BossCreature, GameManifest, MoveData, PhaseData, PhaseKind,
    PhaseRatios, PokemonSpecies, PokemonType, Rating, Role, Tier,
};

// --- From this crate's modules (`src/`) ---

// Per-game preparation and per-species analysis.
pub use analysis::{AnalysisResult, BattleReport, GameContext, MovesetStrategy, TierEngine};

// Loading and patching inputs.
pub use reference::loader::{load_game, load_reference_tables};
pub use reference::{apply_patch, PatchOverlay, ReferenceTables};

// Batch sweep and its outputs.
pub use batch::{run_batch, BatchOptions, BatchSummary};
pub use config::EngineConfig;
pub use report::{AvailabilityIndex, TierEntry, TierTable};

// Crate-specific error and result types.
pub use errors::{
    BattleError, DataError, DataResult, EngineError, EngineResult, PatchError, ReferenceError, SpeciesFailure,
    SpeciesResult,
};
