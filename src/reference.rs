//! The four lookup tables the engine runs on, and the patched per-game view of them.

pub mod loader;
pub mod patch;

use crate::errors::ReferenceError;
use schema::{BaseStats, BossBattle, MoveData, MovepoolTable, PokemonSpecies, PokemonType};
use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet};

pub use patch::{apply_patch, PatchOverlay, PatchedTables};

/// Base stat used for every stat of a placeholder species.
const PLACEHOLDER_BASE_STAT: u16 = 50;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReferenceTables {
    pub species: BTreeMap<String, PokemonSpecies>,
    pub moves: BTreeMap<String, MoveData>,
    pub movepools: MovepoolTable,
}

impl ReferenceTables {
    pub fn species(&self, id: &str) -> Option<&PokemonSpecies> {
        self.species.get(id)
    }

    /// The move record for `slug`, or a neutral zero-power stand-in.
    pub fn resolve_move(&self, slug: &str) -> Cow<'_, MoveData> {
        match self.moves.get(slug) {
            Some(record) => Cow::Borrowed(record),
            None => Cow::Owned(MoveData::placeholder(slug)),
        }
    }

    /// The species record for `id`, or a typeless stand-in with flat base stats.
    pub fn resolve_species(&self, id: &str) -> Cow<'_, PokemonSpecies> {
        match self.species.get(id) {
            Some(record) => Cow::Borrowed(record),
            None => Cow::Owned(placeholder_species(id)),
        }
    }

    /// Every species and move cited by a boss roster or a movepool that the tables lack.
    ///
    /// Each missing id is reported once, in sorted order.
    pub fn missing_references(&self, bosses: &[BossBattle]) -> Vec<ReferenceError> {
        let mut species = BTreeSet::new();
        let mut moves = BTreeSet::new();

        for creature in bosses.iter().flat_map(|battle| battle.team.iter()) {
            if !self.species.contains_key(&creature.pokemon_id) {
                species.insert(creature.pokemon_id.as_str());
            }
            for slug in &creature.moves {
                if !self.moves.contains_key(slug) {
                    moves.insert(slug.as_str());
                }
            }
        }

        for species_id in self.movepools.species.keys() {
            for entry in self.movepools.entries(species_id) {
                if !self.moves.contains_key(entry.move_slug) {
                    moves.insert(entry.move_slug);
                }
            }
        }

        species
            .into_iter()
            .map(|id| ReferenceError::MissingReference {
                kind: "species",
                id: id.to_string(),
            })
            .chain(moves.into_iter().map(|id| ReferenceError::MissingReference {
                kind: "move",
                id: id.to_string(),
            }))
            .collect()
    }
}

fn placeholder_species(id: &str) -> PokemonSpecies {
    PokemonSpecies {
        id: id.to_string(),
        name: id.to_string(),
        types: vec![PokemonType::Typeless],
        base_stats: BaseStats {
            hp: PLACEHOLDER_BASE_STAT,
            attack: PLACEHOLDER_BASE_STAT,
            defense: PLACEHOLDER_BASE_STAT,
            sp_attack: PLACEHOLDER_BASE_STAT,
            sp_defense: PLACEHOLDER_BASE_STAT,
            speed: PLACEHOLDER_BASE_STAT,
        },
        evolution: Default::default(),
        extensions: BTreeMap::new(),
    }
}
