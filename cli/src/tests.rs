use std::fs;
use clap::Parser;
use tempdir::TempDir;
use ljargon_core::{ParallelType, SolverError};
use crate::args::Args;
use crate::commands::{build_config, run};

fn read_records(path: &std::path::Path) -> (csv::StringRecord, Vec<csv::StringRecord>) {
    let mut reader = csv::Reader::from_path(path).expect("Can't open csv");
    let headers = reader.headers().expect("Can't read headers").clone();
    let records = reader.records()
        .collect::<Result<Vec<_>, _>>()
        .expect("Can't read records");
    (headers, records)
}

#[test]
fn solvation() {
    let temp_dir = TempDir::new("test_dir").expect("Can't create temp directory");
    let path = temp_dir.path().join("steps.csv");
    let args = Args::parse_from([
        "ljargon_cli", "--supercells", "1", "--parallel", "no-parallel",
        "--seed", "3", "--iterations", "5", "--out", path.to_str().expect("Bad path"),
    ]);
    let written = run(&args).expect("Can't run simulation");
    assert_eq!(written, 5);
    let (headers, records) = read_records(&path);
    assert_eq!(&headers[0], "iteration");
    assert!(headers.iter().any(|h| h == "temperature_K"));
    assert_eq!(records.len(), 5);
    for (k, record) in records.iter().enumerate() {
        let iteration: u64 = record[0].parse().expect("Bad iteration");
        assert_eq!(iteration, k as u64 + 1);
        let total: f64 = record[4].parse().expect("Bad total energy");
        assert!(total.is_finite());
    }
}

#[test]
fn config_file_is_honored() {
    let temp_dir = TempDir::new("test_dir").expect("Can't create temp directory");
    let config_path = temp_dir.path().join("config.json");
    fs::write(&config_path,
              r#"{"supercells": 2, "temperature": 80.0, "parallel_type": "thread_pool", "seed": 9}"#)
        .expect("Can't write config");
    let out = temp_dir.path().join("steps.csv");
    let args = Args::parse_from([
        "ljargon_cli", "--config", config_path.to_str().expect("Bad path"),
        "--shells", "1", "--out", out.to_str().expect("Bad path"),
    ]);
    let config = build_config(&args).expect("Can't build config");
    assert_eq!(config.supercells, 2);
    assert_eq!(config.temperature, 80.0);
    assert_eq!(config.parallel_type, ParallelType::ThreadPool);
    assert_eq!(config.seed, Some(9));
    assert_eq!(config.shells, 1);
    assert_eq!(args.iterations, 1000);
}

#[test]
fn invalid_arguments() {
    let args = Args::parse_from(["ljargon_cli", "--supercells", "0", "--out", "unused.csv"]);
    let res = build_config(&args);
    assert!(matches!(res, Err(SolverError::Configuration(_))));
}
