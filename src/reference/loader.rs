//! Reading reference tables and per-game inputs from disk.
//!
//! Every document may be written as JSON or RON; the extension decides which
//! parser is used. Lookups try `<stem>.json` first, then `<stem>.ron`.

use crate::errors::{BattleError, DataError, DataResult};
use crate::reference::patch::{PatchDocument, PatchOverlay};
use crate::reference::ReferenceTables;
use schema::{BossBattle, GameManifest, MoveData, MovepoolTable, PokemonSpecies};
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

const SUPPORTED_EXTENSIONS: [&str; 2] = ["json", "ron"];

pub const REFERENCE_DIR: &str = "reference";
pub const GAMES_DIR: &str = "games";

/// Inputs for one game, before any patching.
#[derive(Debug, Clone)]
pub struct GameData {
    pub manifest: GameManifest,
    pub bosses: Vec<BossBattle>,
    pub patch: Option<PatchOverlay>,
    /// Boss entries that failed to parse, already logged.
    pub rejected_battles: Vec<BattleError>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Ron,
}

impl DocumentFormat {
    pub fn of(path: &Path) -> DataResult<Self> {
        match path.extension().and_then(|s| s.to_str()) {
            Some("json") => Ok(DocumentFormat::Json),
            Some("ron") => Ok(DocumentFormat::Ron),
            _ => Err(DataError::UnsupportedFormat(path.to_path_buf())),
        }
    }
}

/// Parse a JSON or RON document into `T`.
pub fn read_document<T: DeserializeOwned>(path: &Path) -> DataResult<T> {
    let format = DocumentFormat::of(path)?;
    if !path.exists() {
        return Err(DataError::MissingFile(path.to_path_buf()));
    }

    let content = fs::read_to_string(path).map_err(|e| DataError::Io {
        path: path.to_path_buf(),
        details: e.to_string(),
    })?;

    let parse_error = |details: String| DataError::Parse {
        path: path.to_path_buf(),
        details,
    };

    match format {
        DocumentFormat::Json => serde_json::from_str(&content).map_err(|e| parse_error(e.to_string())),
        DocumentFormat::Ron => ron::from_str(&content).map_err(|e| parse_error(e.to_string())),
    }
}

/// Locate `<dir>/<stem>.json` or `<dir>/<stem>.ron`.
pub fn find_document(dir: &Path, stem: &str) -> Option<PathBuf> {
    SUPPORTED_EXTENSIONS
        .iter()
        .map(|ext| dir.join(format!("{}.{}", stem, ext)))
        .find(|path| path.exists())
}

fn require_document(dir: &Path, stem: &str) -> DataResult<PathBuf> {
    find_document(dir, stem).ok_or_else(|| DataError::MissingFile(dir.join(format!("{}.json", stem))))
}

/// Load `reference/{species,moves,movepools}` and fill record ids from their table keys.
pub fn load_reference_tables(data_dir: &Path) -> DataResult<ReferenceTables> {
    let reference_dir = data_dir.join(REFERENCE_DIR);

    let mut species: BTreeMap<String, PokemonSpecies> =
        read_document(&require_document(&reference_dir, "species")?)?;
    for (id, record) in species.iter_mut() {
        record.id = id.clone();
    }

    let mut moves: BTreeMap<String, MoveData> =
        read_document(&require_document(&reference_dir, "moves")?)?;
    for (slug, record) in moves.iter_mut() {
        record.slug = slug.clone();
    }

    let movepools: MovepoolTable = read_document(&require_document(&reference_dir, "movepools")?)?;

    log::info!(
        "Loaded reference tables: {} species, {} moves, {} movepools",
        species.len(),
        moves.len(),
        movepools.species.len()
    );

    Ok(ReferenceTables {
        species,
        moves,
        movepools,
    })
}

/// Game ids are the names of the directories under `games/`, sorted.
pub fn discover_games(data_dir: &Path) -> DataResult<Vec<String>> {
    let games_dir = data_dir.join(GAMES_DIR);
    let entries = fs::read_dir(&games_dir).map_err(|e| DataError::Io {
        path: games_dir.clone(),
        details: e.to_string(),
    })?;

    let mut game_ids = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| DataError::Io {
            path: games_dir.clone(),
            details: e.to_string(),
        })?;
        let path = entry.path();
        if path.is_dir() {
            if let Some(name) = path.file_name().and_then(|s| s.to_str()) {
                game_ids.push(name.to_string());
            }
        }
    }

    game_ids.sort();
    Ok(game_ids)
}

/// Read a boss roster.
///
/// JSON rosters are parsed one entry at a time so a single bad battle is
/// skipped, not fatal. RON has no untyped intermediate form, so a RON roster
/// is read whole; entries that parse but fail validation are still dropped later.
fn read_bosses(path: &Path, game_id: &str) -> DataResult<(Vec<BossBattle>, Vec<BattleError>)> {
    if DocumentFormat::of(path)? == DocumentFormat::Ron {
        return Ok((read_document(path)?, Vec::new()));
    }

    let raw_bosses: Vec<serde_json::Value> = read_document(path)?;
    let mut bosses = Vec::with_capacity(raw_bosses.len());
    let mut rejected_battles = Vec::new();
    for (index, raw) in raw_bosses.into_iter().enumerate() {
        let battle_id = raw
            .get("id")
            .and_then(|id| id.as_str())
            .map(str::to_string)
            .unwrap_or_else(|| format!("#{}", index));
        match serde_json::from_value::<BossBattle>(raw) {
            Ok(battle) => bosses.push(battle),
            Err(e) => {
                let err = BattleError::MalformedBattle {
                    battle_id,
                    details: e.to_string(),
                };
                log::warn!("[{}] {}", game_id, err);
                rejected_battles.push(err);
            }
        }
    }
    Ok((bosses, rejected_battles))
}

/// Read a patch overlay; JSON keeps per-entry rejection, RON is read in one typed pass.
fn read_patch(path: &Path) -> DataResult<PatchOverlay> {
    match DocumentFormat::of(path)? {
        DocumentFormat::Json => Ok(PatchOverlay::from_value(read_document(path)?)),
        DocumentFormat::Ron => Ok(PatchOverlay::from(read_document::<PatchDocument>(path)?)),
    }
}

/// Load manifest, bosses and the optional patch for one game.
pub fn load_game(data_dir: &Path, game_id: &str) -> DataResult<GameData> {
    let game_dir = data_dir.join(GAMES_DIR).join(game_id);

    let mut manifest: GameManifest = read_document(&require_document(&game_dir, "manifest")?)?;
    manifest.id = game_id.to_string();

    let (bosses, rejected_battles) = read_bosses(&require_document(&game_dir, "bosses")?, game_id)?;

    let patch = match find_document(&game_dir, "patch") {
        Some(path) => Some(read_patch(&path)?),
        None => None,
    };

    Ok(GameData {
        manifest,
        bosses,
        patch,
        rejected_battles,
    })
}
