use std::io::Write;
use tempfile::NamedTempFile;
use treegp::{ConfigManager, GpError, InitMethod};

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_load_partial_file() {
    let file = write_config(
        r#"
[evolution]
population_size = 120
seed = 11
init_method = "Grow"
size_limit = 60
"#,
    );

    let manager = ConfigManager::new();
    manager.load_from_file(file.path()).unwrap();
    let config = manager.get().unwrap().evolution;

    assert_eq!(config.population_size, 120);
    assert_eq!(config.seed, Some(11));
    assert_eq!(config.init_method, InitMethod::Grow);
    assert_eq!(config.size_limit, Some(60));
    assert_eq!(config.tournament_size, 7);
    assert_eq!(config.depth_limit, None);
}

#[test]
fn test_save_then_load_round_trip() {
    let manager = ConfigManager::new();
    manager
        .update(|config| {
            config.evolution.population_size = 77;
            config.evolution.mutation_prob = 0.35;
            config.evolution.depth_limit = Some(12);
        })
        .unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("run.toml");
    manager.save_to_file(&path).unwrap();

    let reloaded = ConfigManager::new();
    reloaded.load_from_file(&path).unwrap();
    let config = reloaded.get().unwrap().evolution;
    assert_eq!(config.population_size, 77);
    assert_eq!(config.mutation_prob, 0.35);
    assert_eq!(config.depth_limit, Some(12));
}

#[test]
fn test_invalid_file_rejected_and_previous_kept() {
    let file = write_config("[evolution]\ncrossover_prob = 3.0\n");

    let manager = ConfigManager::new();
    let result = manager.load_from_file(file.path());
    assert!(matches!(result, Err(GpError::Configuration(_))));
    assert_eq!(manager.get().unwrap().evolution.crossover_prob, 0.5);
}

#[test]
fn test_missing_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let manager = ConfigManager::new();
    assert!(manager.load_from_file(dir.path().join("absent.toml")).is_err());
}
