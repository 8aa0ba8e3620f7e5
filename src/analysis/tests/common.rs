use crate::analysis::engine::{AnalysisResult, GameContext, TierEngine};
use crate::config::EngineConfig;
use crate::errors::SpeciesResult;
use crate::reference::loader::GameData;
use crate::reference::{PatchOverlay, ReferenceTables};
use schema::{
    BaseStats, BattleCategory, BattleFormat, BossBattle, BossCreature, Encounter, EncounterMethod, Evolution,
    EvolutionEdge, EvolutionTrigger, GameManifest, LearnMethod, MoveCategory, MoveData, MovepoolRecord,
    PartialStats, PokemonSpecies, PokemonType, Segment, StatStageChange, StatType, StatusInflict, StatusType,
    TacticalFlag, Tactics, Target,
};
use std::collections::BTreeMap;

/// Target generation of every fixture game.
pub const FIXTURE_GENERATION: u8 = 3;

/// Builds a species record from its types and `[hp, atk, def, spa, spd, spe]`.
pub fn species(id: &str, types: &[PokemonType], stats: [u16; 6]) -> PokemonSpecies {
    PokemonSpecies {
        id: id.to_string(),
        name: id.to_string(),
        types: types.to_vec(),
        base_stats: BaseStats {
            hp: stats[0],
            attack: stats[1],
            defense: stats[2],
            sp_attack: stats[3],
            sp_defense: stats[4],
            speed: stats[5],
        },
        evolution: Evolution::default(),
        extensions: BTreeMap::new(),
    }
}

/// A damaging move with full accuracy and no side effects.
pub fn attack(slug: &str, move_type: PokemonType, category: MoveCategory, power: u16) -> MoveData {
    MoveData {
        slug: slug.to_string(),
        move_type,
        category,
        power: Some(power),
        accuracy: Some(100),
        pp: 20,
        priority: 0,
        generation: None,
        tactics: Tactics::default(),
        extensions: BTreeMap::new(),
    }
}

/// A status move carrying explicit tactical flags.
pub fn utility(slug: &str, flags: &[TacticalFlag]) -> MoveData {
    MoveData {
        slug: slug.to_string(),
        move_type: PokemonType::Normal,
        category: MoveCategory::Status,
        power: None,
        accuracy: None,
        pp: 10,
        priority: 0,
        generation: None,
        tactics: Tactics {
            flags: flags.to_vec(),
            ..Tactics::default()
        },
        extensions: BTreeMap::new(),
    }
}

pub fn creature(pokemon_id: &str, level: u8) -> BossCreature {
    BossCreature {
        pokemon_id: pokemon_id.to_string(),
        level,
        moves: Vec::new(),
        item: None,
        ability: None,
        nature: None,
        evs: PartialStats::default(),
    }
}

pub fn creature_with_moves(pokemon_id: &str, level: u8, moves: &[&str]) -> BossCreature {
    BossCreature {
        moves: moves.iter().map(|m| m.to_string()).collect(),
        ..creature(pokemon_id, level)
    }
}

pub fn battle(id: &str, segment_id: &str, category: BattleCategory, team: Vec<BossCreature>) -> BossBattle {
    BossBattle {
        id: id.to_string(),
        segment_id: segment_id.to_string(),
        category,
        format: BattleFormat::Single,
        level_cap: None,
        team,
        weather: None,
        terrain: None,
    }
}

/// A small game world assembled step by step.
#[derive(Debug, Clone, Default)]
pub struct TestWorld {
    pub tables: ReferenceTables,
    pub manifest: GameManifest,
    pub bosses: Vec<BossBattle>,
    pub patch: Option<PatchOverlay>,
}

impl TestWorld {
    pub fn new(game_id: &str) -> Self {
        let mut world = TestWorld::default();
        world.manifest.id = game_id.to_string();
        world.manifest.generation = FIXTURE_GENERATION;
        world
    }

    pub fn with_species(mut self, record: PokemonSpecies) -> Self {
        self.tables.species.insert(record.id.clone(), record);
        self
    }

    pub fn with_move(mut self, record: MoveData) -> Self {
        self.tables.moves.insert(record.slug.clone(), record);
        self
    }

    /// Record that `child` evolves from `parent` through `trigger`.
    pub fn with_evolution(mut self, parent: &str, child: &str, trigger: EvolutionTrigger) -> Self {
        if let Some(record) = self.tables.species.get_mut(parent) {
            record.evolution.to.push(EvolutionEdge {
                id: child.to_string(),
                trigger,
            });
        }
        if let Some(record) = self.tables.species.get_mut(child) {
            record.evolution.from = Some(parent.to_string());
        }
        self
    }

    pub fn learns(mut self, species_id: &str, generation: u8, slug: &str, method: LearnMethod, level: u8) -> Self {
        self.tables
            .movepools
            .species
            .entry(species_id.to_string())
            .or_default()
            .entry(generation)
            .or_default()
            .push(MovepoolRecord {
                name: slug.to_string(),
                level,
                method,
            });
        self
    }

    pub fn with_segment(mut self, id: &str, order: u32, encounters: &[(&str, EncounterMethod)]) -> Self {
        self.manifest.segments.push(Segment {
            id: id.to_string(),
            order,
            encounters: encounters
                .iter()
                .map(|(pokemon_id, method)| Encounter {
                    pokemon_id: pokemon_id.to_string(),
                    method: *method,
                })
                .collect(),
        });
        self
    }

    pub fn with_battle(mut self, battle: BossBattle) -> Self {
        self.bosses.push(battle);
        self
    }

    pub fn with_patch(mut self, patch: serde_json::Value) -> Self {
        self.patch = Some(PatchOverlay::from_value(patch));
        self
    }

    pub fn game_data(&self) -> GameData {
        GameData {
            manifest: self.manifest.clone(),
            bosses: self.bosses.clone(),
            patch: self.patch.clone(),
            rejected_battles: Vec::new(),
        }
    }

    pub fn context(&self) -> GameContext {
        self.context_with(&EngineConfig::default())
    }

    pub fn context_with(&self, config: &EngineConfig) -> GameContext {
        GameContext::prepare(&self.tables, self.game_data(), config)
    }
}

/// A three-gym story with a rival, a champion, an optional battle and postgame content.
///
/// Story order: route-1 (0), pewter (1), route-3 (2), cerulean (3), vermilion (4),
/// victory-road (5), sevii (6). Phases: early = [brock], mid = [rival, misty],
/// late = [surge, champion].
pub fn kanto_world() -> TestWorld {
    use BattleCategory::*;
    use EncounterMethod::*;
    use LearnMethod::*;
    use MoveCategory::*;
    use PokemonType::*;

    let mut thunder_wave = utility("thunder-wave", &[]);
    thunder_wave.move_type = Electric;
    thunder_wave.tactics.status = Some(StatusInflict {
        status: StatusType::Paralysis,
        chance: 100,
    });

    let mut swords_dance = utility("swords-dance", &[]);
    swords_dance.tactics.stat_changes.push(StatStageChange {
        stat: StatType::Atk,
        stages: 2,
        target: Target::User,
        chance: 100,
    });

    let mut quick_attack = attack("quick-attack", Normal, Physical, 40);
    quick_attack.priority = 1;

    let mut stealth_rock = utility("stealth-rock", &[TacticalFlag::Hazard]);
    stealth_rock.move_type = Rock;
    stealth_rock.generation = Some(4);

    TestWorld::new("kanto")
        .with_species(species("sparkmouse", &[Electric], [35, 55, 40, 50, 50, 90]))
        .with_species(species("sprout", &[Grass, Poison], [45, 49, 49, 65, 65, 45]))
        .with_species(species("bloom", &[Grass, Poison], [60, 62, 63, 80, 80, 60]))
        .with_species(species("cinder", &[Fire], [39, 52, 43, 60, 50, 65]))
        .with_species(species("pebble", &[Rock, Ground], [40, 80, 100, 30, 30, 20]))
        .with_species(species("tidal", &[Water], [44, 48, 65, 50, 64, 43]))
        .with_species(species("faraway", &[Water], [95, 125, 79, 60, 100, 81]))
        .with_species(species("swapped", &[Psychic], [25, 20, 15, 105, 55, 90]))
        .with_evolution("sprout", "bloom", EvolutionTrigger::LevelUp { min_level: Some(16) })
        .with_move(attack("tackle", Normal, Physical, 40))
        .with_move(attack("thunder-shock", Electric, Special, 40))
        .with_move(attack("thunderbolt", Electric, Special, 90))
        .with_move(attack("vine-whip", Grass, Physical, 45))
        .with_move(attack("razor-leaf", Grass, Physical, 55))
        .with_move(attack("ember", Fire, Special, 40))
        .with_move(attack("flamethrower", Fire, Special, 90))
        .with_move(attack("rock-throw", Rock, Physical, 50))
        .with_move(attack("water-gun", Water, Special, 40))
        .with_move(attack("confusion", Psychic, Special, 50))
        .with_move(quick_attack)
        .with_move(thunder_wave)
        .with_move(swords_dance)
        .with_move(stealth_rock)
        .with_move(utility("protect", &[TacticalFlag::Protection]))
        .with_move(utility("leech-seed", &[TacticalFlag::PassiveDamage]))
        .learns("sparkmouse", 1, "thunder-shock", LevelUp, 1)
        .learns("sparkmouse", 1, "quick-attack", LevelUp, 5)
        .learns("sparkmouse", 1, "thunder-wave", LevelUp, 9)
        .learns("sparkmouse", 1, "thunderbolt", LevelUp, 26)
        .learns("sparkmouse", 3, "protect", Machine, 0)
        .learns("sprout", 1, "tackle", LevelUp, 1)
        .learns("sprout", 1, "vine-whip", LevelUp, 7)
        .learns("sprout", 1, "leech-seed", LevelUp, 9)
        .learns("bloom", 1, "tackle", LevelUp, 1)
        .learns("bloom", 1, "vine-whip", LevelUp, 7)
        .learns("bloom", 1, "razor-leaf", LevelUp, 20)
        .learns("bloom", 1, "leech-seed", LevelUp, 9)
        .learns("bloom", 1, "swords-dance", Machine, 0)
        .learns("cinder", 1, "ember", LevelUp, 1)
        .learns("cinder", 1, "flamethrower", Machine, 0)
        .learns("pebble", 1, "tackle", LevelUp, 1)
        .learns("pebble", 1, "rock-throw", LevelUp, 6)
        .learns("pebble", 3, "stealth-rock", Tutor, 0)
        .learns("tidal", 1, "water-gun", LevelUp, 1)
        .learns("faraway", 1, "water-gun", LevelUp, 1)
        .learns("swapped", 1, "confusion", LevelUp, 1)
        .with_segment("route-1", 0, &[("sparkmouse", Wild), ("sprout", Gift), ("swapped", Trade)])
        .with_segment("pewter", 1, &[])
        .with_segment("route-3", 2, &[("cinder", Wild)])
        .with_segment("cerulean", 3, &[("tidal", Static)])
        .with_segment("vermilion", 4, &[])
        .with_segment("victory-road", 5, &[])
        .with_segment("sevii", 6, &[("faraway", Wild)])
        .with_battle(battle(
            "brock",
            "pewter",
            GymLeader,
            vec![creature("pebble", 10), creature_with_moves("pebble", 12, &["rock-throw", "tackle"])],
        ))
        .with_battle(battle("rival-1", "route-3", Rival, vec![creature("cinder", 14)]))
        .with_battle(battle("bug-catcher", "route-3", Optional, vec![creature("tidal", 9)]))
        .with_battle(battle(
            "misty",
            "cerulean",
            GymLeader,
            vec![creature("tidal", 16), creature_with_moves("tidal", 18, &["water-gun"])],
        ))
        .with_battle(battle(
            "surge",
            "vermilion",
            GymLeader,
            vec![creature("sparkmouse", 21), creature("sparkmouse", 24)],
        ))
        .with_battle(battle(
            "champion",
            "victory-road",
            Champion,
            vec![creature("pebble", 28), creature("bloom", 29), creature("cinder", 30)],
        ))
}

pub fn analyze(context: &GameContext, species_id: &str) -> AnalysisResult {
    assert_ok(TierEngine::new(context).analyze(species_id))
}

/// Helper function to assert that a Result is Ok and return the value.
pub fn assert_ok<T>(result: SpeciesResult<T>) -> T {
    match result {
        Ok(value) => value,
        Err(err) => panic!("Expected Ok but got error: {}", err),
    }
}
