use clap::{Args, Parser, Subcommand};
use pokemon_tiers::analysis::{GameContext, TierEngine};
use pokemon_tiers::batch::{run_batch, BatchOptions};
use pokemon_tiers::config::EngineConfig;
use pokemon_tiers::errors::{DataError, EngineResult};
use pokemon_tiers::parallel::WorkerPool;
use pokemon_tiers::reference::loader::{load_game, load_reference_tables};
use pokemon_tiers::report::TierEntry;
use schema::PhaseKind;
use serde_json::json;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(author, version, about = "Tactical viability tiers for every species of every game", long_about = None)]
struct Cli {
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Subcommand)]
enum Mode {
    /// Analyze every game under the data directory and write the tier tables
    Run(RunArgs),
    /// Print one game's phase layout and, optionally, one species' analysis
    Inspect(InspectArgs),
}

#[derive(Debug, Args)]
struct RunArgs {
    /// Directory holding `reference/` and `games/`
    #[arg(long)]
    data: PathBuf,
    /// Directory the tier tables are written to
    #[arg(long)]
    out: PathBuf,
    /// Engine configuration file (.json or .ron)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Only process these games
    #[arg(long = "game")]
    games: Vec<String>,
    /// Only analyze these species
    #[arg(long = "species")]
    species: Vec<String>,
    /// Worker threads for the species sweep; 0 uses every core
    #[arg(long, default_value_t = 0)]
    threads: usize,
    /// Also write a postcard encoding of each table
    #[arg(long)]
    binary: bool,
}

#[derive(Debug, Args)]
struct InspectArgs {
    #[arg(long)]
    data: PathBuf,
    #[arg(long)]
    game: String,
    #[arg(long)]
    species: Option<String>,
    #[arg(long)]
    config: Option<PathBuf>,
}

fn load_config(path: Option<&PathBuf>) -> EngineResult<EngineConfig> {
    match path {
        Some(path) => Ok(EngineConfig::load(path)?),
        None => Ok(EngineConfig::default()),
    }
}

fn run(args: RunArgs) -> EngineResult<()> {
    let options = BatchOptions {
        config: load_config(args.config.as_ref())?,
        data_dir: args.data,
        out_dir: args.out,
        games: args.games,
        species: args.species,
        pool: WorkerPool::with_workers(args.threads),
        binary: args.binary,
    };

    let summary = run_batch(&options)?;
    for (game_id, err) in &summary.games_failed {
        log::error!("{}: {}", game_id, err);
    }
    Ok(())
}

fn inspect(args: InspectArgs) -> EngineResult<()> {
    let config = load_config(args.config.as_ref())?;
    let base = load_reference_tables(&args.data)?;
    let game = load_game(&args.data, &args.game)?;
    let context = GameContext::prepare(&base, game, &config);
    let partition = &context.partition;

    let phases: serde_json::Map<String, serde_json::Value> = PhaseKind::ALL
        .iter()
        .map(|kind| {
            let battles: Vec<&str> = partition
                .phase(*kind)
                .battles
                .iter()
                .map(|placed| placed.battle.id.as_str())
                .collect();
            (kind.to_string(), json!(battles))
        })
        .collect();
    let optional: Vec<&str> = partition.optional.iter().map(|placed| placed.battle.id.as_str()).collect();
    let dropped: Vec<String> = partition.dropped.iter().map(|err| err.to_string()).collect();

    let mut document = json!({
        "game": context.game_id,
        "generation": context.generation,
        "phaseLabels": partition.labels,
        "phases": phases,
        "optional": optional,
        "dropped": dropped,
    });

    if let Some(species_id) = &args.species {
        let engine = TierEngine::new(&context);
        let result = engine.analyze(species_id)?;
        let movesets = engine.phase_movesets(species_id)?;
        document["species"] = json!({
            "id": species_id,
            "entry": TierEntry::from(&result),
            "movesets": movesets,
        });
    }

    let rendered = serde_json::to_string_pretty(&document).map_err(|e| DataError::Encode(e.to_string()))?;
    println!("{}", rendered);
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let result = match cli.mode {
        Mode::Run(args) => run(args),
        Mode::Inspect(args) => inspect(args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
