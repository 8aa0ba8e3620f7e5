//! Per-game preparation and the per-species analysis entry points.

use crate::analysis::availability::{Availability, AvailabilityClassifier, EvolutionGraph, ReachableLevels};
use crate::analysis::matchup::{simulate, BattleConditions, Combatant};
use crate::analysis::metrics::{aggregate, MatchupRecord};
use crate::analysis::movepool::{BestAvailable, Moveset, MovesetStrategy};
use crate::analysis::phases::{partition_battles, Partition, Phase, PlacedBattle};
use crate::analysis::tiering::{classify_phase, overall_score, role_for, tier_for};
use crate::config::EngineConfig;
use crate::errors::{PatchError, ReferenceError, SpeciesFailure, SpeciesResult};
use crate::reference::loader::GameData;
use crate::reference::{apply_patch, ReferenceTables};
use crate::stats::{attacker_stats, boss_stats};
use schema::{BossBattle, GameManifest, PhaseData, PhaseKind, PhaseRatios, PokemonSpecies, Rating, Role, Tier};
use serde::Serialize;
use std::collections::BTreeMap;

/// Everything one game's analysis reads, built once and shared across species.
#[derive(Debug, Clone)]
pub struct GameContext {
    pub game_id: String,
    pub generation: u8,
    pub manifest: GameManifest,
    pub tables: ReferenceTables,
    pub partition: Partition,
    pub evolution: EvolutionGraph,
    pub reachable: ReachableLevels,
    pub config: EngineConfig,
    pub patch_warnings: Vec<PatchError>,
    pub missing_references: Vec<ReferenceError>,
}

impl GameContext {
    /// Patch the base tables for this game and lay out its story.
    pub fn prepare(base: &ReferenceTables, game: GameData, config: &EngineConfig) -> Self {
        let patched = apply_patch(base, game.patch.as_ref());
        let tables = patched.tables;
        let game_id = game.manifest.id.clone();

        let missing_references = tables.missing_references(&game.bosses);
        for missing in &missing_references {
            log::warn!("[{}] {}; using a placeholder", game_id, missing);
        }

        let partition = partition_battles(&game.bosses, &game.manifest, &config.phase_split);
        let reachable = ReachableLevels::from_partition(&partition);
        let evolution = EvolutionGraph::build(&tables);

        GameContext {
            generation: game.manifest.generation,
            game_id,
            manifest: game.manifest,
            tables,
            partition,
            evolution,
            reachable,
            config: config.clone(),
            patch_warnings: patched.warnings,
            missing_references,
        }
    }

    pub fn species_ids(&self) -> impl Iterator<Item = &String> {
        self.tables.species.keys()
    }

    pub fn classifier(&self) -> AvailabilityClassifier<'_> {
        AvailabilityClassifier::new(
            &self.manifest,
            &self.evolution,
            &self.reachable,
            self.partition.final_order(),
            self.config.availability.gate_level_evolutions,
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PhaseOutcome {
    pub kind: PhaseKind,
    pub available: bool,
    pub data: PhaseData,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisResult {
    pub species_id: String,
    pub tier: Tier,
    pub score: f64,
    pub role: Option<Role>,
    pub availability: Availability,
    pub phases: [PhaseOutcome; 3],
    pub phase_labels: [String; 2],
}

impl AnalysisResult {
    pub fn phase(&self, kind: PhaseKind) -> &PhaseOutcome {
        match kind {
            PhaseKind::Early => &self.phases[0],
            PhaseKind::Mid => &self.phases[1],
            PhaseKind::Late => &self.phases[2],
        }
    }
}

/// Matchups and ratios of a single battle, for any category including optional ones.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BattleReport {
    pub battle_id: String,
    pub level_cap: u8,
    pub moveset: Vec<String>,
    pub matchups: Vec<MatchupRecord>,
    pub ratios: PhaseRatios,
}

/// Runs the analysis for one game with a pluggable moveset strategy.
pub struct TierEngine<'a, S: MovesetStrategy = BestAvailable<'a>> {
    context: &'a GameContext,
    strategy: S,
}

impl<'a> TierEngine<'a, BestAvailable<'a>> {
    pub fn new(context: &'a GameContext) -> Self {
        let strategy = BestAvailable::new(
            &context.tables,
            context.generation,
            context.config.moveset.max_utility_slots,
        );
        TierEngine { context, strategy }
    }
}

impl<'a, S: MovesetStrategy> TierEngine<'a, S> {
    pub fn with_strategy(context: &'a GameContext, strategy: S) -> Self {
        TierEngine { context, strategy }
    }

    pub fn context(&self) -> &GameContext {
        self.context
    }

    fn lookup_species(&self, species_id: &str) -> SpeciesResult<&'a PokemonSpecies> {
        let species = self
            .context
            .tables
            .species(species_id)
            .ok_or_else(|| SpeciesFailure::UnknownSpecies(species_id.to_string()))?;

        if species.types.is_empty() || species.types.len() > 2 {
            return Err(SpeciesFailure::InvalidRecord {
                species_id: species_id.to_string(),
                details: format!("expected 1 or 2 types, found {}", species.types.len()),
            });
        }
        if species.base_stats.hp == 0 {
            return Err(SpeciesFailure::InvalidRecord {
                species_id: species_id.to_string(),
                details: "base HP is zero".to_string(),
            });
        }

        Ok(species)
    }

    /// Simulate `species` against every creature of `battle` at the battle's level cap.
    fn battle_matchups(&self, species: &PokemonSpecies, battle: &BossBattle) -> (Moveset, Vec<MatchupRecord>) {
        let settings = &self.context.config;
        let cap = battle.effective_level_cap();
        let moveset = self.strategy.select_moveset(species, cap);
        let flags: Vec<_> = moveset.flags().into_iter().collect();
        let attacker = Combatant {
            species,
            level: cap,
            stats: attacker_stats(species, cap, &settings.builds),
            moveset: &moveset,
        };
        let conditions = BattleConditions {
            weather: battle.weather,
            terrain: battle.terrain,
        };

        let records = battle
            .team
            .iter()
            .enumerate()
            .map(|(slot, creature)| {
                let boss_species = self.context.tables.resolve_species(&creature.pokemon_id);
                let boss_moveset = if creature.moves.is_empty() {
                    self.strategy.select_moveset(&boss_species, creature.level)
                } else {
                    Moveset::new(
                        creature
                            .moves
                            .iter()
                            .map(|slug| self.context.tables.resolve_move(slug).into_owned())
                            .collect(),
                    )
                };
                let defender = Combatant {
                    species: &boss_species,
                    level: creature.level,
                    stats: boss_stats(&boss_species, creature, &settings.builds),
                    moveset: &boss_moveset,
                };

                MatchupRecord {
                    battle_id: battle.id.clone(),
                    slot,
                    opponent: creature.pokemon_id.clone(),
                    is_ace: battle.is_ace_slot(slot),
                    outcome: simulate(&attacker, &defender, &conditions, &settings.damage),
                    flags: flags.clone(),
                }
            })
            .collect();

        (moveset, records)
    }

    fn analyze_phase(&self, species: &PokemonSpecies, phase: &Phase, availability: &Availability) -> PhaseOutcome {
        if phase.is_empty() {
            let mut data = classify_phase(PhaseRatios::default(), false, &self.context.config);
            data.reason = "No mandatory battles in this phase".to_string();
            return PhaseOutcome {
                kind: phase.kind,
                available: false,
                data,
            };
        }

        let records: Vec<MatchupRecord> = phase
            .battles
            .iter()
            .flat_map(|placed: &PlacedBattle| self.battle_matchups(species, &placed.battle).1)
            .collect();
        let phase_moveset = self.strategy.select_moveset(species, phase.level_cap());
        let ratios = aggregate(
            &records,
            &phase_moveset,
            species,
            self.context.config.damage.wall_turns,
        );

        let available = availability.covers_phase(phase);
        PhaseOutcome {
            kind: phase.kind,
            available,
            data: classify_phase(ratios, available, &self.context.config),
        }
    }

    /// Full analysis of one species in this game.
    pub fn analyze(&self, species_id: &str) -> SpeciesResult<AnalysisResult> {
        let species = self.lookup_species(species_id)?;
        let availability = self.context.classifier().classify(species_id);
        let partition = &self.context.partition;

        let phases = PhaseKind::ALL.map(|kind| self.analyze_phase(species, partition.phase(kind), &availability));

        let scored: Vec<(PhaseKind, &PhaseData)> = phases.iter().map(|p| (p.kind, &p.data)).collect();
        let (score, tier) = match overall_score(&scored, &self.context.config.phase_weights) {
            Some(score) => (score, tier_for(score, &self.context.config.tier_bands)),
            None => (0.0, Tier::NotAvailable),
        };

        // Late phase first, then the latest phase that is still available.
        let role = phases
            .iter()
            .rev()
            .find(|p| p.data.rating != Rating::Unavailable)
            .map(|p| role_for(&p.data.ratios));

        Ok(AnalysisResult {
            species_id: species_id.to_string(),
            tier,
            score,
            role,
            availability,
            phases,
            phase_labels: partition.labels.clone(),
        })
    }

    /// Matchups of one species against one battle, mandatory or not.
    pub fn analyze_battle(&self, species_id: &str, battle_id: &str) -> SpeciesResult<Option<BattleReport>> {
        let species = self.lookup_species(species_id)?;
        let Some(placed) = self.context.partition.battle(battle_id) else {
            return Ok(None);
        };

        let (moveset, matchups) = self.battle_matchups(species, &placed.battle);
        let ratios = aggregate(&matchups, &moveset, species, self.context.config.damage.wall_turns);

        Ok(Some(BattleReport {
            battle_id: placed.battle.id.clone(),
            level_cap: placed.level_cap(),
            moveset: moveset.slugs().into_iter().map(str::to_string).collect(),
            matchups,
            ratios,
        }))
    }

    /// The moveset the strategy picks for each phase, keyed by phase.
    pub fn phase_movesets(&self, species_id: &str) -> SpeciesResult<BTreeMap<PhaseKind, Vec<String>>> {
        let species = self.lookup_species(species_id)?;
        Ok(PhaseKind::ALL
            .iter()
            .map(|kind| {
                let cap = self.context.partition.phase(*kind).level_cap();
                let moveset = self.strategy.select_moveset(species, cap);
                (*kind, moveset.slugs().into_iter().map(str::to_string).collect())
            })
            .collect())
    }
}
