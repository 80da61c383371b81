use std::fs;
use std::path::PathBuf;

use torus_life::render::render_to_string;
use torus_life::{ConfigError, EngineConfig, LifeError, SimulationEngine, WorldConfig};

fn write_world(name: &str, contents: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("torus-life-{}", std::process::id()));
    fs::create_dir_all(&dir).expect("create temp dir");
    let path = dir.join(name);
    fs::write(&path, contents).expect("write world file");
    path
}

#[test]
fn loaded_world_runs_to_expected_state() {
    let path = write_world("blinker.txt", "5\n5\n1\n3\n1 2\n2 2\n3 2\n");
    let world = WorldConfig::load(&path).unwrap();
    assert_eq!(world.iterations, 1);

    let config = EngineConfig::default().worker_count(2);
    let engine = SimulationEngine::new(world.to_grid(), world.iterations, &config).unwrap();
    let report = engine.run().unwrap();

    assert_eq!(report.transitions, 2);
    assert_eq!(
        render_to_string(&report.grid),
        ".....\n.....\n.@@@.\n.....\n.....\n"
    );
}

#[test]
fn too_many_workers_fails_before_running() {
    let world = WorldConfig::parse("8 3 5 0").unwrap();
    let config = EngineConfig::default().worker_count(4);
    let err = SimulationEngine::new(world.to_grid(), world.iterations, &config)
        .err()
        .expect("four workers cannot share three rows");
    assert!(matches!(
        err,
        LifeError::Config(ConfigError::TooManyWorkers { workers: 4, height: 3 })
    ));
    assert_eq!(
        err.to_string(),
        "configuration error: worker count 4 exceeds the grid height 3"
    );
}

#[test]
fn truncated_cell_list_is_fatal() {
    let path = write_world("short.txt", "6 6 2 4\n0 0\n1 1\n2 2\n");
    let err = WorldConfig::load(&path).unwrap_err();
    assert!(matches!(err, LifeError::State { declared: 4, supplied: 3 }));
}
