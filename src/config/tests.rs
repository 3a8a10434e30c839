use super::*;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_defaults_match_experiment() {
    let config = BenchConfig::default();
    assert_eq!(config.iterations, 2);
    assert_eq!(config.circuit_sizes, vec![12]);
    assert_eq!(config.sentinel, "Start MLFT");
    assert_eq!(config.primary_file, "cutqc.txt");
    assert_eq!(config.secondary_file, "mlft.txt");
    assert_eq!(config.on_failure, FailurePolicy::Continue);
    assert!(config.circuit_types.contains(&"supremacy".to_string()));
    assert!(config.validate().is_ok());
}

#[test]
fn test_parse_partial_toml_keeps_defaults() {
    let config = ConfigLoader::parse(
        r#"
command = "python3 scripts/full_cut_mlft.py --quiet"
circuit_types = ["bv", "hwea"]
circuit_sizes = [8, 12]
timeout = "45m"
on_failure = "abort"

[env]
CUDA_VISIBLE_DEVICES = "-1"
"#,
    )
    .unwrap();

    assert_eq!(config.circuit_types, vec!["bv", "hwea"]);
    assert_eq!(config.circuit_sizes, vec![8, 12]);
    assert_eq!(config.timeout, Some(Duration::from_secs(45 * 60)));
    assert_eq!(config.on_failure, FailurePolicy::Abort);
    assert_eq!(config.iterations, 2);
    assert_eq!(config.env.get("CUDA_VISIBLE_DEVICES").unwrap(), "-1");

    let (program, args) = config.command_parts().unwrap();
    assert_eq!(program, "python3");
    assert_eq!(args, vec!["scripts/full_cut_mlft.py", "--quiet"]);
}

#[test]
fn test_parse_rejects_unknown_fields() {
    let result = ConfigLoader::parse("iteration = 3\n");
    assert!(result.is_err());
}

#[test]
fn test_command_parts_handles_quotes() {
    let config = BenchConfig {
        command: "'/opt/my env/bin/python' -u run.py".to_string(),
        ..BenchConfig::default()
    };
    let (program, args) = config.command_parts().unwrap();
    assert_eq!(program, "/opt/my env/bin/python");
    assert_eq!(args, vec!["-u", "run.py"]);
}

#[test]
fn test_validate_rejects_bad_values() {
    let cases: Vec<(&str, BenchConfig)> = vec![
        (
            "empty command",
            BenchConfig {
                command: "   ".to_string(),
                ..BenchConfig::default()
            },
        ),
        (
            "unbalanced quote",
            BenchConfig {
                command: "python 'oops".to_string(),
                ..BenchConfig::default()
            },
        ),
        (
            "no types",
            BenchConfig {
                circuit_types: vec![],
                ..BenchConfig::default()
            },
        ),
        (
            "type with separator",
            BenchConfig {
                circuit_types: vec!["a/b".to_string()],
                ..BenchConfig::default()
            },
        ),
        (
            "zero size",
            BenchConfig {
                circuit_sizes: vec![12, 0],
                ..BenchConfig::default()
            },
        ),
        (
            "zero iterations",
            BenchConfig {
                iterations: 0,
                ..BenchConfig::default()
            },
        ),
        (
            "empty sentinel",
            BenchConfig {
                sentinel: String::new(),
                ..BenchConfig::default()
            },
        ),
        (
            "same sink files",
            BenchConfig {
                secondary_file: "cutqc.txt".to_string(),
                ..BenchConfig::default()
            },
        ),
    ];

    for (name, config) in cases {
        assert!(
            matches!(config.validate(), Err(CutbenchError::Config(_))),
            "case '{}' should fail validation",
            name
        );
    }
}

#[tokio::test]
async fn test_loader_reads_file_from_search_dir() {
    let temp = TempDir::new().unwrap();
    fs::write(
        temp.path().join(DEFAULT_CONFIG_FILE),
        "circuit_sizes = [6]\niterations = 1\n",
    )
    .unwrap();

    let config = ConfigLoader::new(temp.path()).load(None).await.unwrap();
    assert_eq!(config.circuit_sizes, vec![6]);
}

#[tokio::test]
async fn test_loader_without_file_uses_defaults() {
    let temp = TempDir::new().unwrap();
    let config = ConfigLoader::new(temp.path()).load(None).await.unwrap();
    assert_eq!(config.circuit_sizes, vec![12]);
}

#[tokio::test]
async fn test_loader_explicit_missing_file_is_error() {
    let temp = TempDir::new().unwrap();
    let missing = temp.path().join("nope.toml");

    let result = ConfigLoader::new(temp.path()).load(Some(&missing)).await;
    assert!(matches!(result, Err(CutbenchError::Io { .. })));
}

#[tokio::test]
async fn test_loader_reports_parse_errors_with_path() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("bad.toml");
    fs::write(&path, "circuit_sizes = \"twelve\"\n").unwrap();

    let err = ConfigLoader::new(temp.path())
        .load(Some(&path))
        .await
        .unwrap_err();
    assert!(matches!(err, CutbenchError::ConfigParse { .. }));
    assert!(err.to_string().contains("bad.toml"));
}

#[test]
fn test_merge_env_vars() {
    let mut config = BenchConfig::default();

    std::env::set_var("CUTBENCH_COMMAND", "python3 -u full_cut_mlft.py");
    std::env::set_var("CUTBENCH_OUTPUT_ROOT", "/data/cutqc");
    std::env::set_var("CUTBENCH_ITERATIONS", "5");
    std::env::set_var("CUTBENCH_TIMEOUT", "90s");

    config.merge_env_vars();

    assert_eq!(config.command, "python3 -u full_cut_mlft.py");
    assert_eq!(config.output_root, PathBuf::from("/data/cutqc"));
    assert_eq!(config.iterations, 5);
    assert_eq!(config.timeout, Some(Duration::from_secs(90)));

    // Unparseable values are ignored and the previous value stays
    std::env::set_var("CUTBENCH_ITERATIONS", "abc");
    std::env::set_var("CUTBENCH_TIMEOUT", "soon");

    config.merge_env_vars();

    assert_eq!(config.iterations, 5);
    assert_eq!(config.timeout, Some(Duration::from_secs(90)));

    std::env::remove_var("CUTBENCH_COMMAND");
    std::env::remove_var("CUTBENCH_OUTPUT_ROOT");
    std::env::remove_var("CUTBENCH_ITERATIONS");
    std::env::remove_var("CUTBENCH_TIMEOUT");

    let mut untouched = BenchConfig::default();
    untouched.merge_env_vars();
    assert_eq!(untouched.iterations, 2);
    assert_eq!(untouched.timeout, None);
}
