//! When a species can first be owned in a game.
//!
//! A species counts as obtained at the earliest segment where it, or any
//! ancestor in its evolution line, can be caught or received. Evolving from
//! an ancestor is only allowed once the story lets the player reach the
//! level the evolution needs.

use crate::analysis::phases::{Partition, Phase};
use crate::reference::ReferenceTables;
use schema::{AvailabilityStatus, EvolutionTrigger, GameManifest, Segment, SpeciesId};
use std::collections::{BTreeMap, BTreeSet};

/// Child to parent edges of every evolution line, with the trigger that links them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EvolutionGraph {
    parents: BTreeMap<SpeciesId, BTreeMap<SpeciesId, EvolutionTrigger>>,
}

impl EvolutionGraph {
    /// Collect edges from both `evolution.from` and `evolution.to`.
    pub fn build(tables: &ReferenceTables) -> Self {
        let mut parents: BTreeMap<SpeciesId, BTreeMap<SpeciesId, EvolutionTrigger>> = BTreeMap::new();

        for species in tables.species.values() {
            if let Some(from) = &species.evolution.from {
                let trigger = tables
                    .species(from)
                    .and_then(|parent| parent.trigger_for(&species.id))
                    .cloned()
                    .unwrap_or_default();
                parents
                    .entry(species.id.clone())
                    .or_default()
                    .insert(from.clone(), trigger);
            }
            for edge in &species.evolution.to {
                parents
                    .entry(edge.id.clone())
                    .or_default()
                    .insert(species.id.clone(), edge.trigger.clone());
            }
        }

        EvolutionGraph { parents }
    }

    pub fn parents_of(&self, species_id: &str) -> impl Iterator<Item = (&SpeciesId, &EvolutionTrigger)> {
        self.parents.get(species_id).into_iter().flat_map(|parents| parents.iter())
    }
}

/// The highest level a player can be expected to reach at each point of the story.
///
/// That is the level cap of the next mandatory battle at or after a segment;
/// past the final battle there is no bound.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReachableLevels {
    caps: Vec<(u32, u8)>,
}

impl ReachableLevels {
    pub fn from_partition(partition: &Partition) -> Self {
        ReachableLevels {
            caps: partition
                .mandatory()
                .map(|placed| (placed.segment_order, placed.level_cap()))
                .collect(),
        }
    }

    /// The highest cap among the battles of the first mandatory segment at or
    /// after `segment_order`. `None` means unbounded.
    pub fn level_at(&self, segment_order: u32) -> Option<u8> {
        let (next_order, _) = self.caps.iter().find(|(order, _)| *order >= segment_order)?;
        self.caps
            .iter()
            .filter(|(order, _)| order == next_order)
            .map(|(_, cap)| *cap)
            .max()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Availability {
    pub status: AvailabilityStatus,
    /// Earliest segment at which the species can be owned.
    pub origin: Option<String>,
    pub origin_order: Option<u32>,
}

impl Availability {
    pub fn unavailable() -> Self {
        Availability {
            status: AvailabilityStatus::Unavailable,
            origin: None,
            origin_order: None,
        }
    }

    pub fn is_available(&self) -> bool {
        self.status == AvailabilityStatus::Available
    }

    /// Whether the species can take part in `phase`: owned no later than its first battle.
    pub fn covers_phase(&self, phase: &Phase) -> bool {
        match (self.is_available(), self.origin_order, phase.first_order()) {
            (true, Some(origin), Some(first)) => origin <= first,
            _ => false,
        }
    }
}

pub struct AvailabilityClassifier<'a> {
    segments: Vec<&'a Segment>,
    graph: &'a EvolutionGraph,
    reachable: &'a ReachableLevels,
    final_order: Option<u32>,
    gate_level_evolutions: bool,
}

impl<'a> AvailabilityClassifier<'a> {
    pub fn new(
        manifest: &'a GameManifest,
        graph: &'a EvolutionGraph,
        reachable: &'a ReachableLevels,
        final_order: Option<u32>,
        gate_level_evolutions: bool,
    ) -> Self {
        AvailabilityClassifier {
            segments: manifest.ordered_segments(),
            graph,
            reachable,
            final_order,
            gate_level_evolutions,
        }
    }

    pub fn classify(&self, species_id: &str) -> Availability {
        let mut visiting = BTreeSet::new();
        let Some(index) = self.earliest_index(species_id, &mut visiting) else {
            return Availability::unavailable();
        };

        let segment = self.segments[index];
        let status = match self.final_order {
            Some(final_order) if segment.order > final_order => AvailabilityStatus::Postgame,
            _ => AvailabilityStatus::Available,
        };

        Availability {
            status,
            origin: Some(segment.id.clone()),
            origin_order: Some(segment.order),
        }
    }

    /// Position in story order of the first segment where `species_id` can be owned.
    fn earliest_index(&self, species_id: &str, visiting: &mut BTreeSet<String>) -> Option<usize> {
        if !visiting.insert(species_id.to_string()) {
            return None;
        }

        let direct = self.segments.iter().position(|segment| {
            segment
                .encounters
                .iter()
                .any(|encounter| encounter.pokemon_id == species_id && encounter.method.grants_ownership())
        });

        let mut earliest = direct;
        for (parent, trigger) in self.graph.parents_of(species_id) {
            let via_parent = self
                .earliest_index(parent, visiting)
                .and_then(|parent_index| self.evolution_index(parent_index, trigger));
            earliest = match (earliest, via_parent) {
                (Some(a), Some(b)) => Some(a.min(b)),
                (a, b) => a.or(b),
            };
        }

        visiting.remove(species_id);
        earliest
    }

    /// First segment, at or after the parent's, where the evolution can happen.
    fn evolution_index(&self, parent_index: usize, trigger: &EvolutionTrigger) -> Option<usize> {
        let min_level = match trigger {
            EvolutionTrigger::LevelUp {
                min_level: Some(level),
            } if self.gate_level_evolutions => *level,
            _ => return Some(parent_index),
        };

        (parent_index..self.segments.len()).find(|&index| {
            self.reachable
                .level_at(self.segments[index].order)
                .map_or(true, |cap| cap >= min_level)
        })
    }
}
