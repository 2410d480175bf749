use std::{fs, process::Command};

fn run_cli(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_maze-pursuit"))
        .args(args)
        .env("RUST_LOG", "warn")
        .output()
        .expect("failed to invoke maze-pursuit binary")
}

#[test]
fn summary_json_reports_the_run() {
    let output = run_cli(&["--ticks", "25", "--seed", "3", "--summary-json"]);
    assert!(output.status.success(), "maze-pursuit should succeed");

    let stdout = String::from_utf8(output.stdout).expect("stdout is utf-8");
    let json_start = stdout.find('{').expect("summary is printed");
    let summary: serde_json::Value =
        serde_json::from_str(&stdout[json_start..]).expect("summary is valid JSON");

    assert_eq!(summary["seed"], 3);
    assert!(summary["ticks"].as_u64().is_some_and(|ticks| ticks <= 25));
    assert!(summary["status"].is_string());
}

#[test]
fn same_seed_produces_identical_output() {
    let first = run_cli(&["--ticks", "80", "--seed", "11"]);
    let second = run_cli(&["--ticks", "80", "--seed", "11"]);

    assert!(first.status.success());
    assert_eq!(first.stdout, second.stdout);
}

#[test]
fn custom_layout_and_config_are_loaded() {
    let directory = tempfile::tempdir().expect("temp dir is created");
    let layout = directory.path().join("layout.txt");
    let config = directory.path().join("config.toml");
    fs::write(&layout, "WWWWWWW\nW.....W\nW.WWW.W\nW.....W\nWWWWWWW\n").expect("layout written");
    fs::write(&config, "player = [1, 1]\nadversaries = [[3, 5]]\n").expect("config written");

    let output = run_cli(&[
        "--layout",
        layout.to_str().expect("utf-8 path"),
        "--config",
        config.to_str().expect("utf-8 path"),
        "--ticks",
        "2",
        "--frames",
    ]);

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).expect("stdout is utf-8");
    assert!(stdout.starts_with("WWWWWWW\n"));
    assert_eq!(stdout.matches("tick ").count(), 3);
}

#[test]
fn placing_entities_in_walls_fails() {
    let directory = tempfile::tempdir().expect("temp dir is created");
    let config = directory.path().join("config.toml");
    fs::write(&config, "player = [0, 0]\n").expect("config written");

    let output = run_cli(&["--config", config.to_str().expect("utf-8 path")]);

    assert!(!output.status.success());
}
