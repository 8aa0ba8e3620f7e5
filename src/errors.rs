use std::fmt;
use std::path::PathBuf;

/// Main error type for the viability engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// Error reading or parsing an input file
    Data(DataError),
    /// Error related to species or move references
    Reference(ReferenceError),
    /// Error related to a boss battle definition
    Battle(BattleError),
    /// Error related to a patch overlay
    Patch(PatchError),
    /// A single species could not be analyzed
    Species(SpeciesFailure),
}

/// Errors related to loading input tables and writing outputs
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataError {
    /// A required file does not exist
    MissingFile(PathBuf),
    /// The file exists but could not be read or written
    Io { path: PathBuf, details: String },
    /// The file contents could not be parsed
    Parse { path: PathBuf, details: String },
    /// The file extension is not one of the supported formats
    UnsupportedFormat(PathBuf),
    /// An output could not be encoded
    Encode(String),
}

/// Errors related to table references
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReferenceError {
    /// A boss or movepool row cites a species or move the tables do not know
    MissingReference { kind: &'static str, id: String },
}

/// Errors related to boss battle validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BattleError {
    /// Boss team fails required-field validation
    MalformedBattle { battle_id: String, details: String },
}

/// Errors related to patch overlays
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatchError {
    /// Overlay touches a field absent from the base schema
    PatchConflict { entry: String, field: String },
    /// Overlay entry could not be interpreted and was dropped
    MalformedEntry { entry: String, details: String },
}

/// Errors that exclude one species from a game's output
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpeciesFailure {
    /// The species is not in the patched table
    UnknownSpecies(String),
    /// The species record cannot be simulated
    InvalidRecord { species_id: String, details: String },
    /// Analysis of the species panicked
    Panicked { species_id: String, details: String },
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::Data(err) => write!(f, "Data error: {}", err),
            EngineError::Reference(err) => write!(f, "Reference error: {}", err),
            EngineError::Battle(err) => write!(f, "Battle error: {}", err),
            EngineError::Patch(err) => write!(f, "Patch error: {}", err),
            EngineError::Species(err) => write!(f, "Species failure: {}", err),
        }
    }
}

impl fmt::Display for DataError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataError::MissingFile(path) => write!(f, "Missing file: {}", path.display()),
            DataError::Io { path, details } => write!(f, "I/O error on {}: {}", path.display(), details),
            DataError::Parse { path, details } => {
                write!(f, "Failed to parse {}: {}", path.display(), details)
            }
            DataError::UnsupportedFormat(path) => {
                write!(f, "Unsupported file format: {}", path.display())
            }
            DataError::Encode(details) => write!(f, "Failed to encode output: {}", details),
        }
    }
}

impl fmt::Display for ReferenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReferenceError::MissingReference { kind, id } => write!(f, "Unknown {} '{}'", kind, id),
        }
    }
}

impl fmt::Display for BattleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BattleError::MalformedBattle { battle_id, details } => {
                write!(f, "Malformed battle '{}': {}", battle_id, details)
            }
        }
    }
}

impl fmt::Display for PatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatchError::PatchConflict { entry, field } => {
                write!(f, "Patch entry '{}' adds field '{}' unknown to the base table", entry, field)
            }
            PatchError::MalformedEntry { entry, details } => {
                write!(f, "Dropped malformed patch entry '{}': {}", entry, details)
            }
        }
    }
}

impl fmt::Display for SpeciesFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpeciesFailure::UnknownSpecies(id) => write!(f, "Species not found: {}", id),
            SpeciesFailure::InvalidRecord { species_id, details } => {
                write!(f, "Invalid species record '{}': {}", species_id, details)
            }
            SpeciesFailure::Panicked { species_id, details } => {
                write!(f, "Analysis of '{}' panicked: {}", species_id, details)
            }
        }
    }
}

impl std::error::Error for EngineError {}
impl std::error::Error for DataError {}
impl std::error::Error for ReferenceError {}
impl std::error::Error for BattleError {}
impl std::error::Error for PatchError {}
impl std::error::Error for SpeciesFailure {}

impl From<DataError> for EngineError {
    fn from(err: DataError) -> Self {
        EngineError::Data(err)
    }
}

impl From<ReferenceError> for EngineError {
    fn from(err: ReferenceError) -> Self {
        EngineError::Reference(err)
    }
}

impl From<BattleError> for EngineError {
    fn from(err: BattleError) -> Self {
        EngineError::Battle(err)
    }
}

impl From<PatchError> for EngineError {
    fn from(err: PatchError) -> Self {
        EngineError::Patch(err)
    }
}

impl From<SpeciesFailure> for EngineError {
    fn from(err: SpeciesFailure) -> Self {
        EngineError::Species(err)
    }
}

/// Type alias for Results using EngineError
pub type EngineResult<T> = Result<T, EngineError>;

/// Type alias for Results using DataError
pub type DataResult<T> = Result<T, DataError>;

/// Type alias for Results using SpeciesFailure
pub type SpeciesResult<T> = Result<T, SpeciesFailure>;
