//! Output records: the per-game tiering table and the global availability index.
//!
//! Everything here is keyed by `BTreeMap` so the serialized files are stable
//! from one run to the next. The same structs feed the JSON and postcard writers,
//! so they avoid serde attributes that only self-describing formats understand.

use crate::analysis::{AnalysisResult, PhaseOutcome};
use crate::errors::{DataError, DataResult};
use schema::{AvailabilityStatus, PhaseKind, PhaseRatios, Rating, Role, Tier};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

const SCORE_DECIMALS: f64 = 10_000.0;

fn round_score(score: f64) -> f64 {
    (score * SCORE_DECIMALS).round() / SCORE_DECIMALS
}

/// One phase of one species, as written to disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhaseEntry {
    pub rating: Rating,
    pub tier: Tier,
    pub score: f64,
    pub reason: String,
    pub ratios: PhaseRatios,
    pub available: bool,
}

impl From<&PhaseOutcome> for PhaseEntry {
    fn from(outcome: &PhaseOutcome) -> Self {
        PhaseEntry {
            rating: outcome.data.rating,
            tier: outcome.data.tier,
            score: round_score(outcome.data.score),
            reason: outcome.data.reason.clone(),
            ratios: outcome.data.ratios,
            available: outcome.available,
        }
    }
}

/// One species row of a game's tiering table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TierEntry {
    pub tier: Tier,
    pub score: f64,
    pub is_available: bool,
    pub availability: AvailabilityStatus,
    pub origin: Option<String>,
    pub phase_labels: [String; 2],
    pub phases: BTreeMap<PhaseKind, PhaseEntry>,
    pub roles: Vec<Role>,
}

impl From<&AnalysisResult> for TierEntry {
    fn from(result: &AnalysisResult) -> Self {
        TierEntry {
            tier: result.tier,
            score: round_score(result.score),
            is_available: result.availability.status == AvailabilityStatus::Available,
            availability: result.availability.status,
            origin: result.availability.origin.clone(),
            phase_labels: result.phase_labels.clone(),
            phases: result
                .phases
                .iter()
                .map(|outcome| (outcome.kind, PhaseEntry::from(outcome)))
                .collect(),
            roles: result.role.into_iter().collect(),
        }
    }
}

/// A game's output table, keyed by species id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TierTable {
    pub entries: BTreeMap<String, TierEntry>,
}

impl TierTable {
    pub fn insert(&mut self, result: &AnalysisResult) {
        self.entries.insert(result.species_id.clone(), TierEntry::from(result));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Species of this table that can be owned during the story.
    pub fn available_species(&self) -> impl Iterator<Item = &String> {
        self.entries
            .iter()
            .filter(|(_, entry)| entry.is_available)
            .map(|(id, _)| id)
    }

    pub fn to_json(&self) -> DataResult<Vec<u8>> {
        let mut bytes = serde_json::to_vec_pretty(self).map_err(|e| DataError::Encode(e.to_string()))?;
        bytes.push(b'\n');
        Ok(bytes)
    }

    pub fn to_postcard(&self) -> DataResult<Vec<u8>> {
        postcard::to_allocvec(self).map_err(|e| DataError::Encode(e.to_string()))
    }
}

/// Species id to the sorted ids of every game where it is available.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AvailabilityIndex {
    pub games: BTreeMap<String, BTreeSet<String>>,
}

impl AvailabilityIndex {
    pub fn record(&mut self, game_id: &str, table: &TierTable) {
        for species_id in table.available_species() {
            self.games
                .entry(species_id.clone())
                .or_default()
                .insert(game_id.to_string());
        }
    }

    pub fn games_for(&self, species_id: &str) -> Vec<&str> {
        self.games
            .get(species_id)
            .map(|games| games.iter().map(String::as_str).collect())
            .unwrap_or_default()
    }

    pub fn to_json(&self) -> DataResult<Vec<u8>> {
        let mut bytes = serde_json::to_vec_pretty(self).map_err(|e| DataError::Encode(e.to_string()))?;
        bytes.push(b'\n');
        Ok(bytes)
    }
}
