//! Story-ordered boss battles and their split into early, mid and late phases.

use crate::config::PhaseSplit;
use crate::errors::BattleError;
use schema::{BattleCategory, BossBattle, GameManifest, PhaseKind};

const MAX_TEAM_SIZE: usize = 6;
const MAX_MOVES: usize = 4;
const MAX_LEVEL: u8 = 100;

/// A validated battle together with the story position of its segment.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedBattle {
    pub battle: BossBattle,
    pub segment_order: u32,
}

impl PlacedBattle {
    pub fn level_cap(&self) -> u8 {
        self.battle.effective_level_cap()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Phase {
    pub kind: PhaseKind,
    pub battles: Vec<PlacedBattle>,
}

impl Phase {
    pub fn is_empty(&self) -> bool {
        self.battles.is_empty()
    }

    /// Story position of the phase's first battle.
    pub fn first_order(&self) -> Option<u32> {
        self.battles.first().map(|placed| placed.segment_order)
    }

    /// Highest level cap among the phase's battles.
    pub fn level_cap(&self) -> u8 {
        self.battles.iter().map(PlacedBattle::level_cap).max().unwrap_or(0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Partition {
    pub phases: [Phase; 3],
    pub labels: [String; 2],
    /// Optional and totem battles, in story order. Never part of a phase.
    pub optional: Vec<PlacedBattle>,
    pub dropped: Vec<BattleError>,
}

impl Partition {
    pub fn phase(&self, kind: PhaseKind) -> &Phase {
        match kind {
            PhaseKind::Early => &self.phases[0],
            PhaseKind::Mid => &self.phases[1],
            PhaseKind::Late => &self.phases[2],
        }
    }

    /// Every mandatory battle in story order.
    pub fn mandatory(&self) -> impl Iterator<Item = &PlacedBattle> {
        self.phases.iter().flat_map(|phase| phase.battles.iter())
    }

    /// Look a battle up by id among mandatory and optional battles.
    pub fn battle(&self, battle_id: &str) -> Option<&PlacedBattle> {
        self.mandatory()
            .chain(self.optional.iter())
            .find(|placed| placed.battle.id == battle_id)
    }

    /// Story position of the final mandatory battle.
    pub fn final_order(&self) -> Option<u32> {
        self.mandatory().map(|placed| placed.segment_order).max()
    }
}

/// Check the fields a battle needs before it can be simulated.
pub fn validate_battle(battle: &BossBattle, manifest: &GameManifest) -> Result<u32, BattleError> {
    let malformed = |details: String| BattleError::MalformedBattle {
        battle_id: battle.id.clone(),
        details,
    };

    let segment = manifest
        .segment(&battle.segment_id)
        .ok_or_else(|| malformed(format!("unknown segment '{}'", battle.segment_id)))?;

    if battle.team.is_empty() {
        return Err(malformed("empty team".to_string()));
    }
    if battle.team.len() > MAX_TEAM_SIZE {
        return Err(malformed(format!("team of {} exceeds {}", battle.team.len(), MAX_TEAM_SIZE)));
    }
    for (slot, creature) in battle.team.iter().enumerate() {
        if creature.pokemon_id.trim().is_empty() {
            return Err(malformed(format!("slot {} has no species", slot)));
        }
        if creature.level == 0 || creature.level > MAX_LEVEL {
            return Err(malformed(format!("slot {} has level {}", slot, creature.level)));
        }
        if creature.moves.len() > MAX_MOVES {
            return Err(malformed(format!("slot {} knows {} moves", slot, creature.moves.len())));
        }
    }

    Ok(segment.order)
}

/// 1-based boundary position `ceil(count * fraction)`, kept within `[1, count]`.
fn boundary(count: usize, fraction: f64) -> usize {
    // The epsilon keeps exact thirds such as 6 * (1/3) from rounding up past 2.
    let raw = (count as f64 * fraction - 1e-9).ceil();
    (raw.max(1.0) as usize).min(count)
}

/// Validate, order and split a game's battles.
pub fn partition_battles(bosses: &[BossBattle], manifest: &GameManifest, split: &PhaseSplit) -> Partition {
    let mut mandatory = Vec::new();
    let mut optional = Vec::new();
    let mut dropped = Vec::new();

    for battle in bosses {
        match validate_battle(battle, manifest) {
            Ok(segment_order) => {
                let placed = PlacedBattle {
                    battle: battle.clone(),
                    segment_order,
                };
                if battle.category.is_mandatory() {
                    mandatory.push(placed);
                } else {
                    optional.push(placed);
                }
            }
            Err(err) => {
                log::warn!("[{}] {}", manifest.id, err);
                dropped.push(err);
            }
        }
    }

    // Stable: battles sharing a segment keep their listed order.
    mandatory.sort_by_key(|placed| placed.segment_order);
    optional.sort_by_key(|placed| placed.segment_order);

    let gym_positions: Vec<usize> = mandatory
        .iter()
        .enumerate()
        .filter(|(_, placed)| placed.battle.category == BattleCategory::GymLeader)
        .map(|(index, _)| index)
        .collect();

    let (first_end, second_end, labels) = if gym_positions.is_empty() {
        let total = mandatory.len();
        if total == 0 {
            (0, 0, ["BATTLE 0".to_string(), "BATTLE 0".to_string()])
        } else {
            let first = boundary(total, split.first);
            let second = boundary(total, split.second).max(first);
            (first, second, [format!("BATTLE {}", first), format!("BATTLE {}", second)])
        }
    } else {
        let gyms = gym_positions.len();
        let first = boundary(gyms, split.first);
        let second = boundary(gyms, split.second).max(first);
        (
            gym_positions[first - 1] + 1,
            gym_positions[second - 1] + 1,
            [format!("GYM {}", first), format!("GYM {}", second)],
        )
    };

    let late = mandatory.split_off(second_end);
    let mid = mandatory.split_off(first_end);
    let early = mandatory;

    log::info!(
        "[{}] Phases: early {} / mid {} / late {} battles, boundaries {} and {}",
        manifest.id,
        early.len(),
        mid.len(),
        late.len(),
        labels[0],
        labels[1]
    );

    Partition {
        phases: [
            Phase {
                kind: PhaseKind::Early,
                battles: early,
            },
            Phase {
                kind: PhaseKind::Mid,
                battles: mid,
            },
            Phase {
                kind: PhaseKind::Late,
                battles: late,
            },
        ],
        labels,
        optional,
        dropped,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(8, 3, 6)]
    #[case(6, 2, 4)]
    #[case(3, 1, 2)]
    #[case(1, 1, 1)]
    #[case(2, 1, 2)]
    fn test_gym_boundaries(#[case] gyms: usize, #[case] first: usize, #[case] second: usize) {
        assert_eq!(boundary(gyms, 1.0 / 3.0), first);
        assert_eq!(boundary(gyms, 2.0 / 3.0), second);
    }
}
