//! Folding a phase's matchup outcomes into named ratios.

use crate::analysis::matchup::MatchupOutcome;
use crate::analysis::movepool::Moveset;
use schema::{PhaseRatios, PokemonSpecies, PokemonType, TacticalFlag};
use serde::Serialize;

/// One simulated matchup and the context the aggregator needs about it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchupRecord {
    pub battle_id: String,
    pub slot: usize,
    pub opponent: String,
    pub is_ace: bool,
    pub outcome: MatchupOutcome,
    /// Flags of the attacker's moveset for this battle's level cap.
    pub flags: Vec<TacticalFlag>,
}

impl MatchupRecord {
    fn has_flag(&self, flag: TacticalFlag) -> bool {
        self.flags.contains(&flag)
    }
}

fn rate(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64
    }
}

fn count(records: &[MatchupRecord], predicate: impl Fn(&MatchupRecord) -> bool) -> usize {
    records.iter().filter(|r| predicate(r)).count()
}

/// Standard types the moveset hits super-effectively.
pub fn covered_types(moveset: &Moveset) -> Vec<PokemonType> {
    PokemonType::standard()
        .filter(|defending| {
            moveset
                .damaging()
                .any(|m| PokemonType::type_effectiveness(m.move_type, *defending) >= 2.0)
        })
        .collect()
}

/// Standard types that deal at least double damage to the species.
pub fn weak_to(species: &PokemonSpecies) -> Vec<PokemonType> {
    PokemonType::standard()
        .filter(|attacking| PokemonType::effectiveness_against(*attacking, &species.types) >= 2.0)
        .collect()
}

/// Aggregate `records` for one phase; `moveset` is the loadout at the phase's level cap.
pub fn aggregate(records: &[MatchupRecord], moveset: &Moveset, species: &PokemonSpecies, wall_turns: u32) -> PhaseRatios {
    let total = records.len();
    let wins = count(records, |r| r.outcome.attacker_wins());
    let enemy_ohkos = count(records, |r| r.outcome.defender_ohkoes);

    let aces: Vec<&MatchupRecord> = records.iter().filter(|r| r.is_ace).collect();
    let ace_wins = aces.iter().filter(|r| r.outcome.attacker_wins()).count();

    let survives = |r: &MatchupRecord| !r.outcome.defender_ohkoes;
    let walled = |r: &MatchupRecord| r.outcome.is_walled(wall_turns);

    let one_to_one_rate = rate(wins, total);
    let (risk_rate, safe_pivot_rate, risky_pivot_rate) = if total == 0 {
        (0.0, 0.0, 0.0)
    } else {
        let safe = 1.0 - rate(enemy_ohkos, total);
        (1.0 - one_to_one_rate, safe, 1.0 - safe)
    };

    let covered = covered_types(moveset);
    let weaknesses = weak_to(species);
    let weakness_coverage = weaknesses.iter().filter(|t| covered.contains(t)).count();

    PhaseRatios {
        one_to_one_rate,
        risk_rate,
        ohko_rate: rate(count(records, |r| r.outcome.attacker_ohkoes), total),
        outspeed_rate: rate(count(records, |r| r.outcome.attacker_first), total),
        enemy_ohko_rate: rate(enemy_ohkos, total),
        ace_kill_rate: rate(ace_wins, aces.len()),
        safe_pivot_rate,
        risky_pivot_rate,
        wall_rate: rate(count(records, walled), total),
        stall_rate: rate(
            count(records, |r| {
                walled(r) && (r.has_flag(TacticalFlag::PassiveDamage) || r.has_flag(TacticalFlag::Recovery))
            }),
            total,
        ),
        safe_buff_rate: rate(count(records, |r| survives(r) && r.has_flag(TacticalFlag::StatStage)), total),
        safe_hazards_rate: rate(count(records, |r| survives(r) && r.has_flag(TacticalFlag::Hazard)), total),
        safe_status_rate: rate(count(records, |r| survives(r) && r.has_flag(TacticalFlag::Status)), total),
        coverage: covered.len() as u32,
        weaknesses: weaknesses.len() as u32,
        weakness_coverage: weakness_coverage as u32,
        speed_control_rate: if moveset.has_any_flag(&[TacticalFlag::Priority, TacticalFlag::SpeedControl]) {
            1.0
        } else {
            0.0
        },
    }
}
