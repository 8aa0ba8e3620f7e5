//! Synthetic four-move loadouts standing in for the player's move choice.

use crate::reference::ReferenceTables;
use schema::{LearnMethod, MoveCategory, MoveData, PokemonSpecies, PokemonType, TacticalFlag};
use std::collections::{BTreeMap, BTreeSet};

pub const MOVESET_SIZE: usize = 4;

/// Flags a utility move may claim a slot for.
const UTILITY_FLAGS: [TacticalFlag; 6] = [
    TacticalFlag::Hazard,
    TacticalFlag::Screen,
    TacticalFlag::Redirection,
    TacticalFlag::Protection,
    TacticalFlag::StatStage,
    TacticalFlag::Priority,
];

/// Up to four resolved moves, in the order they were chosen.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Moveset {
    pub moves: Vec<MoveData>,
}

impl Moveset {
    pub fn new(moves: Vec<MoveData>) -> Self {
        Moveset { moves }
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    pub fn slugs(&self) -> Vec<&str> {
        self.moves.iter().map(|m| m.slug.as_str()).collect()
    }

    pub fn damaging(&self) -> impl Iterator<Item = &MoveData> {
        self.moves.iter().filter(|m| m.is_damaging())
    }

    pub fn flags(&self) -> BTreeSet<TacticalFlag> {
        self.moves.iter().flat_map(|m| m.tactical_flags()).collect()
    }

    pub fn has_flag(&self, flag: TacticalFlag) -> bool {
        self.moves.iter().any(|m| m.has_flag(flag))
    }

    pub fn has_any_flag(&self, flags: &[TacticalFlag]) -> bool {
        flags.iter().any(|flag| self.has_flag(*flag))
    }
}

/// Chooses the moves a species brings to battles capped at a given level.
pub trait MovesetStrategy: Send + Sync {
    fn select_moveset(&self, species: &PokemonSpecies, level_cap: u8) -> Moveset;
}

/// The default heuristic: strongest STAB move, then utility, then raw power.
pub struct BestAvailable<'a> {
    tables: &'a ReferenceTables,
    generation: u8,
    max_utility_slots: usize,
}

impl<'a> BestAvailable<'a> {
    pub fn new(tables: &'a ReferenceTables, generation: u8, max_utility_slots: usize) -> Self {
        BestAvailable {
            tables,
            generation,
            max_utility_slots,
        }
    }

    /// Every distinct move the species can know by `level_cap` in this generation, keyed by slug.
    pub fn learnable(&self, species_id: &str, level_cap: u8) -> BTreeMap<String, MoveData> {
        let mut learnable = BTreeMap::new();

        for entry in self.tables.movepools.entries(species_id) {
            if entry.generation > self.generation {
                continue;
            }
            if entry.method == LearnMethod::LevelUp && entry.level > level_cap {
                continue;
            }
            if learnable.contains_key(entry.move_slug) {
                continue;
            }
            let move_data = self.tables.resolve_move(entry.move_slug);
            if move_data.generation.is_some_and(|g| g > self.generation) {
                continue;
            }
            learnable.insert(entry.move_slug.to_string(), move_data.into_owned());
        }

        learnable
    }
}

fn is_stab(move_data: &MoveData, types: &[PokemonType]) -> bool {
    move_data.is_damaging() && types.contains(&move_data.move_type)
}

impl MovesetStrategy for BestAvailable<'_> {
    fn select_moveset(&self, species: &PokemonSpecies, level_cap: u8) -> Moveset {
        let mut pool = self.learnable(&species.id, level_cap);
        let mut chosen: Vec<MoveData> = Vec::with_capacity(MOVESET_SIZE);

        // Strongest same-type move; ties go to the first slug.
        let best_stab = pool
            .values()
            .filter(|m| is_stab(m, &species.types))
            .fold(None::<&MoveData>, |best, m| match best {
                Some(b) if b.base_power() >= m.base_power() => Some(b),
                _ => Some(m),
            })
            .map(|m| m.slug.clone());
        if let Some(slug) = best_stab {
            if let Some(m) = pool.remove(&slug) {
                chosen.push(m);
            }
        }

        // Status moves that bring a flag the loadout does not have yet.
        let mut utility_taken = 0;
        let utility: Vec<String> = pool
            .values()
            .filter(|m| m.category == MoveCategory::Status)
            .map(|m| m.slug.clone())
            .collect();
        for slug in utility {
            if utility_taken >= self.max_utility_slots || chosen.len() >= MOVESET_SIZE {
                break;
            }
            let represented: BTreeSet<TacticalFlag> = chosen.iter().flat_map(|m| m.tactical_flags()).collect();
            let adds_flag = pool.get(&slug).is_some_and(|m| {
                m.tactical_flags()
                    .iter()
                    .any(|flag| UTILITY_FLAGS.contains(flag) && !represented.contains(flag))
            });
            if adds_flag {
                if let Some(m) = pool.remove(&slug) {
                    chosen.push(m);
                    utility_taken += 1;
                }
            }
        }

        // Fill the rest by power.
        let mut remaining: Vec<MoveData> = pool.into_values().collect();
        remaining.sort_by(|a, b| b.base_power().cmp(&a.base_power()).then_with(|| a.slug.cmp(&b.slug)));
        let free = MOVESET_SIZE.saturating_sub(chosen.len());
        chosen.extend(remaining.into_iter().take(free));

        Moveset::new(chosen)
    }
}
