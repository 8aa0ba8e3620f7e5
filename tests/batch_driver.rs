use pokemon_tiers::batch::{run_batch, BatchOptions, AVAILABILITY_FILE};
use pokemon_tiers::parallel::WorkerPool;
use pokemon_tiers::report::TierTable;
use pokemon_tiers::{EngineError, Tier};
use pretty_assertions::assert_eq;
use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

const SPECIES: &str = r#"{
    "voltling": (name: "Voltling", types: [electric],
                 stats: (hp: 35, atk: 55, def: 40, spa: 50, spd: 50, spe: 90)),
    "pebble":   (name: "Pebble", types: [rock, ground],
                 stats: (hp: 40, atk: 80, def: 100, spa: 30, spd: 30, spe: 20)),
    "cinder":   (name: "Cinder", types: [fire],
                 stats: (hp: 39, atk: 52, def: 43, spa: 60, spd: 50, spe: 65)),
    "sprout":   (name: "Sprout", types: [grass, poison],
                 stats: (hp: 45, atk: 49, def: 49, spa: 65, spd: 65, spe: 45),
                 evolution: (to: [(id: "bloom", trigger: (method: level_up, min_level: Some(16)))])),
    "bloom":    (name: "Bloom", types: [grass, poison],
                 stats: (hp: 60, atk: 62, def: 63, spa: 80, spd: 80, spe: 60),
                 evolution: (from: Some("sprout"))),
}"#;

const MOVES: &str = r#"{
    "tackle":        {"type": "normal",   "category": "physical", "power": 40, "accuracy": 100, "pp": 35},
    "thunder-shock": {"type": "electric", "category": "special",  "power": 40, "accuracy": 100, "pp": 30},
    "rock-throw":    {"type": "rock",     "category": "physical", "power": 50, "accuracy": 90,  "pp": 15},
    "ember":         {"type": "fire",     "category": "special",  "power": 40, "accuracy": 100, "pp": 25},
    "vine-whip":     {"type": "grass",    "category": "physical", "power": 45, "accuracy": 100, "pp": 25}
}"#;

const MOVEPOOLS: &str = r#"{
    "voltling": {"1": [{"name": "thunder-shock", "level": 1, "learning_method": "level-up"},
                       {"name": "tackle", "level": 0, "learning_method": "machine"}]},
    "pebble":   {"1": [{"name": "tackle", "level": 1, "learning_method": "level-up"},
                       {"name": "rock-throw", "level": 6, "learning_method": "level-up"}]},
    "cinder":   {"1": [{"name": "ember", "level": 1, "learning_method": "level-up"}]},
    "sprout":   {"1": [{"name": "vine-whip", "level": 3, "learning_method": "level-up"}]},
    "bloom":    {"1": [{"name": "vine-whip", "level": 3, "learning_method": "level-up"}]}
}"#;

const KANTO_MANIFEST: &str = r#"{
    "generation": 3,
    "segments": [
        {"id": "route-1", "order": 0, "encounters": ["voltling", {"pokemon_id": "sprout", "method": "gift"}]},
        {"id": "pewter", "order": 1},
        {"id": "route-3", "order": 2, "encounters": ["cinder"]},
        {"id": "cerulean", "order": 3}
    ]
}"#;

const KANTO_BOSSES: &str = r#"[
    {"id": "brock", "segment_id": "pewter", "category": "gym_leader",
     "team": [{"pokemon_id": "pebble", "level": 10},
              {"pokemon_id": "pebble", "level": 12, "moves": ["rock-throw", "tackle"]}]},
    {"id": "rival", "segment_id": "route-3", "category": "rival",
     "team": [{"pokemon_id": "cinder", "level": 14}]},
    {"id": "misty", "segment_id": "cerulean", "category": "gym_leader",
     "team": [{"pokemon_id": "missingno", "level": 18, "moves": ["glitch-beam"]}]},
    {"id": "no-team", "segment_id": "cerulean", "category": "gym_leader"}
]"#;

const JOHTO_MANIFEST: &str = r#"(
    generation: 4,
    segments: [
        (id: "new-bark", order: 0, encounters: ["cinder", "neon", (pokemon_id: "pebble", method: trade)]),
        (id: "violet", order: 1, encounters: [(pokemon_id: "sprout", method: gift)]),
        (id: "goldenrod", order: 2),
    ],
)"#;

const JOHTO_BOSSES: &str = r#"[
    (id: "falkner", segment_id: "violet", category: gym, team: [(pokemon_id: "voltling", level: 13)]),
    (id: "whitney", segment_id: "goldenrod", category: gym_leader, team: [(pokemon_id: "bloom", level: 19)]),
    (id: "no-team", segment_id: "goldenrod", category: rival),
]"#;

const JOHTO_PATCH: &str = r#"(
    pokemon: {
        "neon": (types: [electric],
                 base_stats: (hp: Some(60), attack: Some(60), defense: Some(60),
                              sp_attack: Some(90), sp_defense: Some(60), speed: Some(100))),
        "cinder": (base_stats: (speed: Some(115))),
    },
)"#;

fn write(path: PathBuf, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

/// Lay out a data tree with two good games and one missing its bosses.
///
/// The species table and every johto document are RON.
fn fixture_tree(name: &str) -> PathBuf {
    let root = env::temp_dir().join(format!("pokemon-tiers-batch-{}-{}", name, std::process::id()));
    let _ = fs::remove_dir_all(&root);
    let data = root.join("data");

    write(data.join("reference/species.ron"), SPECIES);
    write(data.join("reference/moves.json"), MOVES);
    write(data.join("reference/movepools.json"), MOVEPOOLS);
    write(data.join("games/kanto/manifest.json"), KANTO_MANIFEST);
    write(data.join("games/kanto/bosses.json"), KANTO_BOSSES);
    write(data.join("games/johto/manifest.ron"), JOHTO_MANIFEST);
    write(data.join("games/johto/bosses.ron"), JOHTO_BOSSES);
    write(data.join("games/johto/patch.ron"), JOHTO_PATCH);
    write(data.join("games/broken/manifest.json"), KANTO_MANIFEST);

    root
}

fn options(root: &Path, out: &str) -> BatchOptions {
    BatchOptions {
        data_dir: root.join("data"),
        out_dir: root.join(out),
        pool: WorkerPool::with_workers(2),
        ..BatchOptions::default()
    }
}

fn read_table(path: PathBuf) -> TierTable {
    serde_json::from_slice(&fs::read(path).unwrap()).unwrap()
}

#[test]
fn test_batch_writes_every_loadable_game() {
    // Arrange
    let root = fixture_tree("all");

    // Act
    let summary = run_batch(&options(&root, "out")).unwrap();

    // Assert
    assert_eq!(summary.games_written, vec!["johto".to_string(), "kanto".to_string()]);
    assert_eq!(summary.games_failed.len(), 1);
    assert_eq!(summary.games_failed[0].0, "broken");
    assert!(matches!(summary.games_failed[0].1, EngineError::Data(_)));
    assert!(!root.join("out/broken.json").exists());

    let kanto = read_table(root.join("out/kanto.json"));
    let johto = read_table(root.join("out/johto.json"));
    assert!(kanto.entries.contains_key("voltling"));
    assert!(!kanto.entries.contains_key("neon"));
    assert!(johto.entries.contains_key("neon"));
    assert_eq!(kanto.entries["pebble"].tier, Tier::NotAvailable);
    assert_eq!(kanto.entries["voltling"].phase_labels, ["GYM 1".to_string(), "GYM 2".to_string()]);
}

#[test]
fn test_availability_index_lists_games_per_species() {
    let root = fixture_tree("index");

    run_batch(&options(&root, "out")).unwrap();

    let index: BTreeMap<String, Vec<String>> =
        serde_json::from_slice(&fs::read(root.join("out").join(AVAILABILITY_FILE)).unwrap()).unwrap();
    assert_eq!(index["cinder"], vec!["johto".to_string(), "kanto".to_string()]);
    assert_eq!(index["voltling"], vec!["kanto".to_string()]);
    assert_eq!(index["neon"], vec!["johto".to_string()]);
    assert_eq!(index["sprout"], vec!["johto".to_string(), "kanto".to_string()]);
    assert!(!index.contains_key("pebble"));
}

#[test]
fn test_rerun_is_byte_identical() {
    let root = fixture_tree("rerun");

    run_batch(&options(&root, "first")).unwrap();
    run_batch(&options(&root, "second")).unwrap();

    for file in ["kanto.json", "johto.json", AVAILABILITY_FILE] {
        let first = fs::read(root.join("first").join(file)).unwrap();
        let second = fs::read(root.join("second").join(file)).unwrap();
        assert!(first == second, "{} differs between runs", file);
    }
}

#[test]
fn test_species_filter_and_binary_output() {
    let root = fixture_tree("filter");
    let filtered = BatchOptions {
        games: vec!["kanto".to_string(), "sinnoh".to_string()],
        species: vec!["voltling".to_string(), "missingno".to_string()],
        binary: true,
        ..options(&root, "out")
    };

    let summary = run_batch(&filtered).unwrap();

    assert_eq!(summary.games_written, vec!["kanto".to_string()]);
    assert_eq!(summary.species_failed, 1);
    let json = read_table(root.join("out/kanto.json"));
    let binary: TierTable = postcard::from_bytes(&fs::read(root.join("out/kanto.postcard")).unwrap()).unwrap();
    assert_eq!(json.entries.keys().collect::<Vec<_>>(), vec!["voltling"]);
    assert_eq!(binary, json);
}
