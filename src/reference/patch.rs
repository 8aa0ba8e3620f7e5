//! Patch overlays: partial replacements for species and move records.
//!
//! An overlay never touches the base tables. `apply_patch` clones them and
//! merges each entry field by field; entries that cannot be read are dropped
//! and reported as warnings rather than failing the game.

use crate::errors::PatchError;
use crate::reference::ReferenceTables;
use schema::{
    Evolution, MoveCategory, MoveData, PartialStats, PokemonSpecies, PokemonType, Tactics,
};
use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Overlay entries keyed by species id and move slug.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PatchOverlay {
    pub pokemon: BTreeMap<String, SpeciesPatch>,
    pub moves: BTreeMap<String, MovePatch>,
    /// Entries that could not be read; reported again by `apply_patch`.
    pub rejected: Vec<PatchError>,
}

impl PatchOverlay {
    /// Read a JSON patch document one entry at a time.
    ///
    /// Accepts `pokemon` or `species` for the species section. Anything that
    /// is not an object is treated as an empty overlay, and an entry that
    /// does not parse is dropped on its own.
    pub fn from_value(value: Value) -> Self {
        let mut overlay = PatchOverlay::default();
        let Value::Object(mut root) = value else {
            log::warn!("Patch document is not an object; ignoring it");
            return overlay;
        };

        let pokemon = root.remove("pokemon").or_else(|| root.remove("species"));
        if let Some(Value::Object(entries)) = pokemon {
            for (id, raw) in entries {
                match serde_json::from_value(raw) {
                    Ok(patch) => {
                        overlay.pokemon.insert(id, patch);
                    }
                    Err(e) => overlay.rejected.push(malformed(&id, e.to_string())),
                }
            }
        }
        if let Some(Value::Object(entries)) = root.remove("moves") {
            for (slug, raw) in entries {
                match serde_json::from_value(raw) {
                    Ok(patch) => {
                        overlay.moves.insert(slug, patch);
                    }
                    Err(e) => overlay.rejected.push(malformed(&slug, e.to_string())),
                }
            }
        }
        for section in root.keys() {
            log::warn!("Patch document has unknown section '{}'; ignoring it", section);
        }

        overlay
    }

    pub fn is_empty(&self) -> bool {
        self.pokemon.is_empty() && self.moves.is_empty()
    }
}

/// A whole overlay read in one typed pass, as RON documents are.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PatchDocument {
    #[serde(alias = "species")]
    pub pokemon: BTreeMap<String, SpeciesPatch>,
    pub moves: BTreeMap<String, MovePatch>,
}

impl From<PatchDocument> for PatchOverlay {
    fn from(document: PatchDocument) -> Self {
        PatchOverlay {
            pokemon: document.pokemon,
            moves: document.moves,
            rejected: Vec::new(),
        }
    }
}

/// Partial species record. Fields outside the schema are kept in `unknown`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpeciesPatch {
    pub name: Option<String>,
    pub types: Option<Vec<PokemonType>>,
    pub base_stats: Option<PartialStats>,
    pub evolution: Option<Evolution>,
    pub unknown: BTreeMap<String, Value>,
}

/// Partial move record. Fields outside the schema are kept in `unknown`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MovePatch {
    pub move_type: Option<PokemonType>,
    pub category: Option<MoveCategory>,
    pub power: Option<u16>,
    pub accuracy: Option<u8>,
    pub pp: Option<u8>,
    pub priority: Option<i8>,
    pub generation: Option<u8>,
    pub tactics: Option<Tactics>,
    pub unknown: BTreeMap<String, Value>,
}

/// Any field name, read as an identifier so RON records and JSON keys both work.
struct FieldName(String);

impl<'de> Deserialize<'de> for FieldName {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct NameVisitor;

        impl<'de> Visitor<'de> for NameVisitor {
            type Value = FieldName;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a field name")
            }

            fn visit_str<E: de::Error>(self, name: &str) -> Result<FieldName, E> {
                Ok(FieldName(name.to_string()))
            }
        }

        deserializer.deserialize_identifier(NameVisitor)
    }
}

const SPECIES_FIELDS: &[&str] = &["name", "types", "base_stats", "evolution"];

impl<'de> Deserialize<'de> for SpeciesPatch {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct SpeciesPatchVisitor;

        impl<'de> Visitor<'de> for SpeciesPatchVisitor {
            type Value = SpeciesPatch;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a species patch")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<SpeciesPatch, A::Error> {
                let mut patch = SpeciesPatch::default();
                while let Some(FieldName(field)) = map.next_key()? {
                    match field.as_str() {
                        "name" => patch.name = Some(map.next_value()?),
                        "types" => patch.types = Some(map.next_value()?),
                        "base_stats" | "stats" => patch.base_stats = Some(map.next_value()?),
                        "evolution" => patch.evolution = Some(map.next_value()?),
                        _ => {
                            let value = map.next_value()?;
                            patch.unknown.insert(field, value);
                        }
                    }
                }
                Ok(patch)
            }
        }

        deserializer.deserialize_struct("SpeciesPatch", SPECIES_FIELDS, SpeciesPatchVisitor)
    }
}

const MOVE_FIELDS: &[&str] = &[
    "type", "category", "power", "accuracy", "pp", "priority", "generation", "tactics",
];

impl<'de> Deserialize<'de> for MovePatch {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct MovePatchVisitor;

        impl<'de> Visitor<'de> for MovePatchVisitor {
            type Value = MovePatch;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a move patch")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<MovePatch, A::Error> {
                let mut patch = MovePatch::default();
                while let Some(FieldName(field)) = map.next_key()? {
                    match field.as_str() {
                        "type" | "move_type" => patch.move_type = Some(map.next_value()?),
                        "category" => patch.category = Some(map.next_value()?),
                        "power" => patch.power = Some(map.next_value()?),
                        "accuracy" => patch.accuracy = Some(map.next_value()?),
                        "pp" => patch.pp = Some(map.next_value()?),
                        "priority" => patch.priority = Some(map.next_value()?),
                        "generation" => patch.generation = Some(map.next_value()?),
                        "tactics" => patch.tactics = Some(map.next_value()?),
                        _ => {
                            let value = map.next_value()?;
                            patch.unknown.insert(field, value);
                        }
                    }
                }
                Ok(patch)
            }
        }

        deserializer.deserialize_struct("MovePatch", MOVE_FIELDS, MovePatchVisitor)
    }
}

/// Result of merging an overlay: the new tables plus every recoverable problem met.
#[derive(Debug, Clone)]
pub struct PatchedTables {
    pub tables: ReferenceTables,
    pub warnings: Vec<PatchError>,
}

/// Clone `base` and merge `overlay` into the copy.
pub fn apply_patch(base: &ReferenceTables, overlay: Option<&PatchOverlay>) -> PatchedTables {
    let mut tables = base.clone();
    let mut warnings = Vec::new();

    if let Some(overlay) = overlay {
        warnings.extend(overlay.rejected.iter().cloned());
        for (id, patch) in &overlay.pokemon {
            patch_species(&mut tables, id, patch, &mut warnings);
        }
        for (slug, patch) in &overlay.moves {
            patch_move(&mut tables, slug, patch, &mut warnings);
        }
    }

    for warning in &warnings {
        log::warn!("{}", warning);
    }

    PatchedTables { tables, warnings }
}

fn malformed(entry: &str, details: impl Into<String>) -> PatchError {
    PatchError::MalformedEntry {
        entry: entry.to_string(),
        details: details.into(),
    }
}

fn patch_species(tables: &mut ReferenceTables, id: &str, patch: &SpeciesPatch, warnings: &mut Vec<PatchError>) {
    if let Some(types) = &patch.types {
        if types.is_empty() || types.len() > 2 {
            warnings.push(malformed(id, format!("expected 1 or 2 types, got {}", types.len())));
            return;
        }
    }

    if !tables.species.contains_key(id) {
        // A new species must be fully specified to be simulated.
        let complete_stats = patch.base_stats.as_ref().filter(|s| s.is_complete());
        let (Some(types), Some(stats)) = (patch.types.clone(), complete_stats) else {
            warnings.push(malformed(id, "new species needs types and all six base stats"));
            return;
        };
        let mut base_stats = schema::BaseStats::default();
        base_stats.merge(stats);
        tables.species.insert(
            id.to_string(),
            PokemonSpecies {
                id: id.to_string(),
                name: id.to_string(),
                types,
                base_stats,
                evolution: Evolution::default(),
                extensions: BTreeMap::new(),
            },
        );
    }

    let Some(record) = tables.species.get_mut(id) else {
        return;
    };

    if let Some(name) = &patch.name {
        record.name = name.clone();
    }
    if let Some(types) = &patch.types {
        record.types = types.clone();
    }
    if let Some(stats) = &patch.base_stats {
        record.base_stats.merge(stats);
    }
    if let Some(evolution) = &patch.evolution {
        record.evolution = evolution.clone();
    }
    for (field, value) in &patch.unknown {
        warnings.push(PatchError::PatchConflict {
            entry: id.to_string(),
            field: field.clone(),
        });
        record.extensions.insert(field.clone(), value.clone());
    }
}

fn patch_move(tables: &mut ReferenceTables, slug: &str, patch: &MovePatch, warnings: &mut Vec<PatchError>) {
    let record = tables
        .moves
        .entry(slug.to_string())
        .or_insert_with(|| MoveData::placeholder(slug));

    if let Some(move_type) = patch.move_type {
        record.move_type = move_type;
    }
    if let Some(category) = patch.category {
        record.category = category;
    }
    if let Some(power) = patch.power {
        record.power = Some(power);
    }
    if let Some(accuracy) = patch.accuracy {
        record.accuracy = Some(accuracy);
    }
    if let Some(pp) = patch.pp {
        record.pp = pp;
    }
    if let Some(priority) = patch.priority {
        record.priority = priority;
    }
    if let Some(generation) = patch.generation {
        record.generation = Some(generation);
    }
    if let Some(tactics) = &patch.tactics {
        record.tactics = tactics.clone();
    }
    for (field, value) in &patch.unknown {
        warnings.push(PatchError::PatchConflict {
            entry: slug.to_string(),
            field: field.clone(),
        });
        record.extensions.insert(field.clone(), value.clone());
    }
}
