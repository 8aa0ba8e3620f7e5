use crate::{MoveSlug, SpeciesId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LearnMethod {
    #[serde(alias = "level_up", alias = "level")]
    LevelUp,
    #[serde(alias = "tm", alias = "hm", alias = "tr")]
    Machine,
    Egg,
    Tutor,
}

/// One row of a species' movepool for one generation, as written in the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovepoolRecord {
    #[serde(alias = "move")]
    pub name: MoveSlug,
    #[serde(default)]
    pub level: u8,
    #[serde(alias = "learning_method", alias = "learning-method", alias = "method")]
    pub method: LearnMethod,
}

/// A movepool row resolved against its species and generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovepoolEntry<'a> {
    pub species_id: &'a str,
    pub generation: u8,
    pub method: LearnMethod,
    pub move_slug: &'a str,
    /// Zero for every method other than level-up.
    pub level: u8,
}

/// `speciesId -> generation -> rows`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MovepoolTable {
    pub species: BTreeMap<SpeciesId, BTreeMap<u8, Vec<MovepoolRecord>>>,
}

impl MovepoolTable {
    /// All rows for a species across every generation, in generation order.
    pub fn entries<'a>(&'a self, species_id: &str) -> impl Iterator<Item = MovepoolEntry<'a>> + 'a {
        self.species
            .get_key_value(species_id)
            .into_iter()
            .flat_map(|(id, generations)| {
                generations.iter().flat_map(move |(generation, records)| {
                    records.iter().map(move |record| MovepoolEntry {
                        species_id: id.as_str(),
                        generation: *generation,
                        method: record.method,
                        move_slug: record.name.as_str(),
                        level: if record.method == LearnMethod::LevelUp {
                            record.level
                        } else {
                            0
                        },
                    })
                })
            })
    }
}
