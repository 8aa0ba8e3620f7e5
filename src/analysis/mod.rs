// Analysis module - the viability engine proper
//
// Data flows in one direction: availability, phases and movesets feed the
// matchup simulator, whose outcomes are folded into ratios and then tiers.

pub mod availability;
pub mod engine;
pub mod matchup;
pub mod metrics;
pub mod movepool;
pub mod phases;
pub mod tiering;

#[cfg(test)]
pub(crate) mod tests;

pub use availability::{Availability, EvolutionGraph};
pub use engine::{AnalysisResult, BattleReport, GameContext, PhaseOutcome, TierEngine};
pub use movepool::{BestAvailable, Moveset, MovesetStrategy};
pub use phases::Partition;
