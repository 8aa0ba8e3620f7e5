//! Tunable numbers of the viability engine.
//!
//! Every weight, band and threshold used by the classifier lives here so that
//! alternate calibrations can be loaded from a `.ron` or `.json` file without
//! touching the engine. The defaults reproduce the published tier bands.

use crate::errors::DataResult;
use crate::reference::loader::read_document;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub score_weights: ScoreWeights,
    pub rating_thresholds: RatingThresholds,
    pub tier_bands: TierBands,
    pub phase_weights: PhaseWeights,
    pub phase_split: PhaseSplit,
    pub damage: DamageSettings,
    pub builds: BuildSettings,
    pub moveset: MovesetSettings,
    pub availability: AvailabilitySettings,
}

impl EngineConfig {
    /// Load a configuration file; missing sections and fields keep their defaults.
    pub fn load(path: &Path) -> DataResult<Self> {
        read_document(path)
    }
}

/// Per-phase score weights. They sum to 1 so the score stays in [0, 1].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreWeights {
    pub one_to_one: f64,
    pub ace_kill: f64,
    pub safety: f64,
    pub ohko: f64,
    pub safe_pivot: f64,
    pub coverage: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            one_to_one: 0.30,
            ace_kill: 0.20,
            safety: 0.15,
            ohko: 0.15,
            safe_pivot: 0.10,
            coverage: 0.10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RatingThresholds {
    pub good: f64,
    pub avg: f64,
}

impl Default for RatingThresholds {
    fn default() -> Self {
        Self { good: 0.66, avg: 0.40 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TierBands {
    pub s: f64,
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
}

impl Default for TierBands {
    fn default() -> Self {
        Self {
            s: 0.85,
            a: 0.66,
            b: 0.50,
            c: 0.40,
            d: 0.25,
        }
    }
}

/// Weights used to fold the three phase scores into the overall score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhaseWeights {
    pub early: f64,
    pub mid: f64,
    pub late: f64,
}

impl Default for PhaseWeights {
    fn default() -> Self {
        Self {
            early: 0.2,
            mid: 0.3,
            late: 0.5,
        }
    }
}

/// Fractions of the gym-leader count after which each phase boundary falls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhaseSplit {
    pub first: f64,
    pub second: f64,
}

impl Default for PhaseSplit {
    fn default() -> Self {
        Self {
            first: 1.0 / 3.0,
            second: 2.0 / 3.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DamageSettings {
    /// Fixed damage roll standing in for the 85-100% random range.
    pub neutral_roll: f64,
    pub stab: f64,
    /// Scale expected damage by move accuracy.
    pub apply_accuracy: bool,
    pub weather_boost: f64,
    pub weather_penalty: f64,
    pub terrain_boost: f64,
    /// A defender that needs at least this many turns to KO the attacker counts as walled.
    pub wall_turns: u32,
}

impl Default for DamageSettings {
    fn default() -> Self {
        Self {
            neutral_roll: 0.925,
            stab: 1.5,
            apply_accuracy: true,
            weather_boost: 1.5,
            weather_penalty: 0.5,
            terrain_boost: 1.3,
            wall_turns: 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildSettings {
    pub attacker_iv: u16,
    pub attacker_ev: u16,
    pub boss_iv: u16,
}

impl Default for BuildSettings {
    fn default() -> Self {
        Self {
            attacker_iv: 31,
            attacker_ev: 0,
            boss_iv: 31,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovesetSettings {
    /// Most slots the synthetic loadout spends on non-damaging utility moves.
    pub max_utility_slots: usize,
}

impl Default for MovesetSettings {
    fn default() -> Self {
        Self { max_utility_slots: 2 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AvailabilitySettings {
    /// Hold back level-up evolutions until the story lets the player reach the level.
    pub gate_level_evolutions: bool,
}

impl Default for AvailabilitySettings {
    fn default() -> Self {
        Self {
            gate_level_evolutions: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_score_weights_sum_to_one() {
        let w = ScoreWeights::default();
        let total = w.one_to_one + w.ace_kill + w.safety + w.ohko + w.safe_pivot + w.coverage;
        assert!((total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_partial_ron_config_keeps_defaults() {
        let config: EngineConfig =
            ron::from_str("(tier_bands: (s: 0.9), damage: (neutral_roll: 1.0))").unwrap();

        assert_eq!(config.tier_bands.s, 0.9);
        assert_eq!(config.tier_bands.a, 0.66);
        assert_eq!(config.damage.neutral_roll, 1.0);
        assert_eq!(config.damage.stab, 1.5);
        assert_eq!(config.phase_weights, PhaseWeights::default());
    }
}
