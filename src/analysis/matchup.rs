//! One-on-one outcome between an attacker build and a single boss creature.
//!
//! Everything here is deterministic: a fixed damage roll stands in for the
//! random range and critical hits never happen.

use crate::analysis::movepool::Moveset;
use crate::config::DamageSettings;
use crate::stats::StatBlock;
use ordered_float::OrderedFloat;
use schema::{MoveCategory, MoveData, PokemonSpecies, PokemonType, Terrain, Weather};
use serde::Serialize;

/// One side of a matchup: who it is, its stats at the battle's level, what it knows.
#[derive(Debug, Clone, Copy)]
pub struct Combatant<'a> {
    pub species: &'a PokemonSpecies,
    pub level: u8,
    pub stats: StatBlock,
    pub moveset: &'a Moveset,
}

/// Field effects active for a whole battle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BattleConditions {
    pub weather: Option<Weather>,
    pub terrain: Option<Terrain>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchupOutcome {
    #[serde(rename = "attackerOHKOes")]
    pub attacker_ohkoes: bool,
    /// `None` when the attacker cannot damage the defender at all.
    pub attacker_ko_turns: Option<u32>,
    #[serde(rename = "defenderOHKOes")]
    pub defender_ohkoes: bool,
    pub defender_ko_turns: Option<u32>,
    pub attacker_first: bool,
}

impl MatchupOutcome {
    /// The attacker knocks the defender out before being knocked out itself.
    pub fn attacker_wins(&self) -> bool {
        match (self.attacker_ko_turns, self.defender_ko_turns) {
            (Some(att), Some(def)) => att < def || (att == def && self.attacker_first),
            (Some(_), None) => true,
            (None, _) => false,
        }
    }

    /// The defender needs at least `threshold` turns, or can never win.
    pub fn is_walled(&self, threshold: u32) -> bool {
        self.defender_ko_turns.map_or(true, |turns| turns >= threshold)
    }
}

fn weather_modifier(move_type: PokemonType, weather: Option<Weather>, settings: &DamageSettings) -> f64 {
    match (weather, move_type) {
        (Some(Weather::Rain), PokemonType::Water) | (Some(Weather::Sun), PokemonType::Fire) => settings.weather_boost,
        (Some(Weather::Rain), PokemonType::Fire) | (Some(Weather::Sun), PokemonType::Water) => {
            settings.weather_penalty
        }
        _ => 1.0,
    }
}

fn terrain_modifier(move_type: PokemonType, terrain: Option<Terrain>, settings: &DamageSettings) -> f64 {
    match (terrain, move_type) {
        (Some(Terrain::Electric), PokemonType::Electric)
        | (Some(Terrain::Grassy), PokemonType::Grass)
        | (Some(Terrain::Psychic), PokemonType::Psychic) => settings.terrain_boost,
        (Some(Terrain::Misty), PokemonType::Dragon) => 0.5,
        _ => 1.0,
    }
}

/// Expected damage of one use of `move_data`, before any HP comparison.
pub fn expected_damage(
    user: &Combatant,
    target: &Combatant,
    move_data: &MoveData,
    conditions: &BattleConditions,
    settings: &DamageSettings,
) -> f64 {
    if !move_data.is_damaging() {
        return 0.0;
    }

    let (attack, defense) = match move_data.category {
        MoveCategory::Physical => (user.stats.attack, target.stats.defense),
        MoveCategory::Special => (user.stats.sp_attack, target.stats.sp_defense),
        MoveCategory::Status => return 0.0,
    };

    let effectiveness = PokemonType::effectiveness_against(move_data.move_type, &target.species.types) as f64;
    if effectiveness == 0.0 {
        return 0.0;
    }

    // floor(floor(floor(2 * L / 5 + 2) * Power * A / D) / 50) + 2
    let level_factor = 2 * user.level as u64 / 5 + 2;
    let power = move_data.base_power() as u64;
    let base = level_factor * power * attack as u64 / (defense.max(1) as u64) / 50 + 2;

    let mut damage = base as f64;
    if user.species.has_type(move_data.move_type) {
        damage *= settings.stab;
    }
    damage *= effectiveness;
    damage *= settings.neutral_roll;
    damage *= weather_modifier(move_data.move_type, conditions.weather, settings);
    damage *= terrain_modifier(move_data.move_type, conditions.terrain, settings);
    if settings.apply_accuracy {
        if let Some(accuracy) = move_data.accuracy {
            damage *= accuracy.min(100) as f64 / 100.0;
        }
    }

    damage
}

/// The larger of the best physical and best special hit.
pub fn best_damage(user: &Combatant, target: &Combatant, conditions: &BattleConditions, settings: &DamageSettings) -> f64 {
    user.moveset
        .damaging()
        .map(|m| OrderedFloat(expected_damage(user, target, m, conditions, settings)))
        .max()
        .map_or(0.0, |best| best.into_inner())
}

/// Hits needed to take `hp` down with `damage` per hit.
pub fn ko_turns(hp: u16, damage: f64) -> Option<u32> {
    if damage <= 0.0 || !damage.is_finite() {
        return None;
    }
    Some((hp as f64 / damage).ceil().max(1.0) as u32)
}

pub fn simulate(
    attacker: &Combatant,
    defender: &Combatant,
    conditions: &BattleConditions,
    settings: &DamageSettings,
) -> MatchupOutcome {
    let attacker_ko_turns = ko_turns(defender.stats.hp, best_damage(attacker, defender, conditions, settings));
    let defender_ko_turns = ko_turns(attacker.stats.hp, best_damage(defender, attacker, conditions, settings));

    MatchupOutcome {
        attacker_ohkoes: attacker_ko_turns == Some(1),
        attacker_ko_turns,
        defender_ohkoes: defender_ko_turns == Some(1),
        defender_ko_turns,
        // Speed ties go to the attacker.
        attacker_first: attacker.stats.speed >= defender.stats.speed,
    }
}
