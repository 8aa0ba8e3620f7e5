//! Batch driver: every species of every game under a data directory.
//!
//! Games are processed one after another; species inside a game are swept in
//! parallel against a shared, read-only [GameContext]. A game whose inputs cannot
//! be loaded is logged and skipped, and a species that fails is omitted from
//! its game's table. Output files only appear once their contents are complete.

use crate::analysis::GameContext;
use crate::config::EngineConfig;
use crate::errors::{DataError, DataResult, EngineError, EngineResult};
use crate::parallel::{sweep_species, WorkerPool};
use crate::reference::loader::{discover_games, load_game, load_reference_tables};
use crate::reference::ReferenceTables;
use crate::report::{AvailabilityIndex, TierTable};
use std::fs;
use std::path::{Path, PathBuf};

pub const AVAILABILITY_FILE: &str = "availability.json";

#[derive(Debug, Clone, Default)]
pub struct BatchOptions {
    pub data_dir: PathBuf,
    pub out_dir: PathBuf,
    pub config: EngineConfig,
    /// Games to process; empty means every game under `games/`.
    pub games: Vec<String>,
    /// Species to analyze; empty means the whole patched table.
    pub species: Vec<String>,
    pub pool: WorkerPool,
    /// Also write the postcard encoding of each table.
    pub binary: bool,
}

#[derive(Debug, Default)]
pub struct BatchSummary {
    pub games_written: Vec<String>,
    pub games_failed: Vec<(String, EngineError)>,
    pub species_failed: usize,
}

struct GameOutcome {
    table: TierTable,
    species_failed: usize,
}

/// Write `bytes` next to `path` and move it into place.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> DataResult<()> {
    let io_error = |target: &Path, e: std::io::Error| DataError::Io {
        path: target.to_path_buf(),
        details: e.to_string(),
    };

    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| DataError::UnsupportedFormat(path.to_path_buf()))?;
    let temp = path.with_file_name(format!(".{}.tmp", file_name));

    fs::write(&temp, bytes).map_err(|e| io_error(&temp, e))?;
    fs::rename(&temp, path).map_err(|e| io_error(path, e))?;
    log::debug!("Wrote {}", path.display());
    Ok(())
}

fn selected_games(options: &BatchOptions) -> DataResult<Vec<String>> {
    let discovered = discover_games(&options.data_dir)?;
    if options.games.is_empty() {
        return Ok(discovered);
    }

    let mut selected = Vec::new();
    for game_id in &options.games {
        if discovered.contains(game_id) {
            selected.push(game_id.clone());
        } else {
            log::warn!("Requested game '{}' has no directory; skipping it", game_id);
        }
    }
    Ok(selected)
}

fn run_game(base: &ReferenceTables, game_id: &str, options: &BatchOptions) -> EngineResult<GameOutcome> {
    let game = load_game(&options.data_dir, game_id)?;
    let context = GameContext::prepare(base, game, &options.config);

    let species_ids: Vec<String> = if options.species.is_empty() {
        context.species_ids().cloned().collect()
    } else {
        options.species.clone()
    };

    let mut table = TierTable::default();
    let mut species_failed = 0;
    for (species_id, result) in sweep_species(&context, &species_ids, &options.pool) {
        match result {
            Ok(analysis) => table.insert(&analysis),
            Err(failure) => {
                log::warn!("[{}] Omitting '{}': {}", game_id, species_id, failure);
                species_failed += 1;
            }
        }
    }

    let json_path = options.out_dir.join(format!("{}.json", game_id));
    write_atomic(&json_path, &table.to_json()?)?;
    if options.binary {
        let postcard_path = options.out_dir.join(format!("{}.postcard", game_id));
        write_atomic(&postcard_path, &table.to_postcard()?)?;
    }

    log::info!(
        "[{}] Wrote {} species to {} ({} omitted)",
        game_id,
        table.len(),
        json_path.display(),
        species_failed
    );

    Ok(GameOutcome { table, species_failed })
}

/// Run the whole sweep described by `options`.
///
/// Only failures that stop every game (unreadable reference tables, an unusable
/// output directory) are returned as errors; per-game failures land in the summary.
pub fn run_batch(options: &BatchOptions) -> EngineResult<BatchSummary> {
    let base = load_reference_tables(&options.data_dir)?;
    let games = selected_games(options)?;
    fs::create_dir_all(&options.out_dir).map_err(|e| DataError::Io {
        path: options.out_dir.clone(),
        details: e.to_string(),
    })?;

    let mut summary = BatchSummary::default();
    let mut index = AvailabilityIndex::default();

    for game_id in &games {
        match run_game(&base, game_id, options) {
            Ok(outcome) => {
                index.record(game_id, &outcome.table);
                summary.species_failed += outcome.species_failed;
                summary.games_written.push(game_id.clone());
            }
            Err(e) => {
                log::error!("[{}] Game skipped: {}", game_id, e);
                summary.games_failed.push((game_id.clone(), e));
            }
        }
    }

    write_atomic(&options.out_dir.join(AVAILABILITY_FILE), &index.to_json()?)?;
    log::info!(
        "Batch finished: {} games written, {} failed, {} species omitted",
        summary.games_written.len(),
        summary.games_failed.len(),
        summary.species_failed
    );

    Ok(summary)
}
