//! CLI argument parsing and end-to-end command tests.
//!
//! Argument parsing is checked against a mirror of the CLI structs (the CLI
//! is a binary crate); commands are checked by running the built binary on
//! files in a temporary directory.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

// ============================================================================
// Fixtures
// ============================================================================

const XY_CIRCUIT: &str = r#"{
    "name": "xy",
    "num_wires": 7,
    "qregs": [{ "start": 0, "length": 4 }, { "start": 4, "length": 2 }],
    "ops": [
        { "op": "gate", "name": "X", "wires": [2] },
        { "op": "gate", "name": "X", "wires": [3] },
        { "op": "gate", "name": "CNOT", "wires": [3, 4] },
        { "op": "gate", "name": "CCX", "wires": [0, 1, 6] },
        { "op": "measure", "wires": [4], "clbits": [0] }
    ]
}"#;

const XY_LAYOUT: &str = "\
- name: x
  range: { start: 0, end: 4 }
  element_count: 1
  element_width: 4
  type: integer
- name: y
  range: { start: 4, end: 6 }
";

const HADAMARD_CIRCUIT: &str = r#"{
    "name": "h",
    "num_wires": 1,
    "ops": [{ "op": "gate", "name": "H", "wires": [0] }]
}"#;

fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).unwrap();
    path
}

fn qrev(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_qrev"))
        .args(args)
        .env_remove("QREV_OUTPUT_FORMAT")
        .env_remove("QREV_SHOW_HISTORY")
        .env_remove("QREV_LOG_LEVEL")
        .env_remove("QREV_LOG")
        .env_remove("QREV_CONFIG")
        .output()
        .unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

// ============================================================================
// run
// ============================================================================

mod run_command {
    use super::*;

    #[test]
    fn test_run_json_output() {
        let dir = tempfile::tempdir().unwrap();
        let circuit = write(dir.path(), "xy.json", XY_CIRCUIT);
        let layout = write(dir.path(), "layout.yaml", XY_LAYOUT);

        let output = qrev(&[
            "run",
            "-i",
            circuit.to_str().unwrap(),
            "-l",
            layout.to_str().unwrap(),
            "-f",
            "json",
        ]);
        assert!(output.status.success());

        let json: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
        assert_eq!(json["state"], "0011100");
        assert_eq!(json["registers"]["x"], serde_json::json!([3]));
        assert_eq!(json["registers"]["y"], "10");
        assert_eq!(json["registers"]["auto_ancillae"], "0");
        assert_eq!(json["stats"]["applied"], 3);
        assert_eq!(json["stats"]["skipped"], 1);
        assert!(json.get("history").is_none());
    }

    #[test]
    fn test_run_selected_registers_with_history() {
        let dir = tempfile::tempdir().unwrap();
        let circuit = write(dir.path(), "xy.json", XY_CIRCUIT);
        let layout = write(dir.path(), "layout.yaml", XY_LAYOUT);

        let output = qrev(&[
            "run",
            "-i",
            circuit.to_str().unwrap(),
            "-l",
            layout.to_str().unwrap(),
            "-f",
            "json",
            "-r",
            "y",
            "--history",
        ]);
        assert!(output.status.success());

        let json: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
        let registers = json["registers"].as_object().unwrap();
        assert_eq!(registers.len(), 1);
        assert_eq!(json["history"].as_array().unwrap().len(), 4);
        assert_eq!(json["history"][3]["fired"], false);
    }

    #[test]
    fn test_run_table_output() {
        let dir = tempfile::tempdir().unwrap();
        let circuit = write(dir.path(), "xy.json", XY_CIRCUIT);

        let output = qrev(&["run", "-i", circuit.to_str().unwrap()]);
        assert!(output.status.success());
        let text = stdout(&output);
        assert!(text.contains("0011100"));
        assert!(text.contains("0_4"));
        assert!(text.contains("4_6"));
    }

    #[test]
    fn test_run_rejects_hadamard() {
        let dir = tempfile::tempdir().unwrap();
        let circuit = write(dir.path(), "h.json", HADAMARD_CIRCUIT);

        let output = qrev(&["run", "-i", circuit.to_str().unwrap()]);
        assert_eq!(output.status.code(), Some(1));
        let err = String::from_utf8_lossy(&output.stderr);
        assert!(err.contains("Unsupported gate 'H'"));
    }

    #[test]
    fn test_run_unknown_register() {
        let dir = tempfile::tempdir().unwrap();
        let circuit = write(dir.path(), "xy.json", XY_CIRCUIT);

        let output = qrev(&["run", "-i", circuit.to_str().unwrap(), "-r", "nope"]);
        assert!(!output.status.success());
        assert!(String::from_utf8_lossy(&output.stderr).contains("Unknown register 'nope'"));
    }

    #[test]
    fn test_run_missing_file() {
        let output = qrev(&["run", "-i", "/nonexistent/qrev_circuit.json"]);
        assert!(!output.status.success());
        assert!(String::from_utf8_lossy(&output.stderr).contains("File not found"));
    }
}

// ============================================================================
// inspect, gates, config
// ============================================================================

mod other_commands {
    use super::*;

    #[test]
    fn test_inspect_report() {
        let dir = tempfile::tempdir().unwrap();
        let circuit = write(dir.path(), "xy.json", XY_CIRCUIT);
        let layout = write(dir.path(), "layout.yaml", XY_LAYOUT);

        let output = qrev(&[
            "inspect",
            "-i",
            circuit.to_str().unwrap(),
            "-l",
            layout.to_str().unwrap(),
        ]);
        assert!(output.status.success());
        let text = stdout(&output);
        assert!(text.contains("n qbits 7"));
        assert!(text.contains("n rbits 7"));
        assert!(text.contains("[0..4] ->\t(3,)"));
        assert!(text.contains("[4..6] ->\t10"));
    }

    #[test]
    fn test_gates_lists_table() {
        let output = qrev(&["gates"]);
        assert!(output.status.success());
        let text = stdout(&output);
        for name in ["CNOT", "C-C-X", "SWAP", "RESET"] {
            assert!(text.contains(name), "{name}");
        }
    }

    #[test]
    fn test_config_file_sets_format() {
        let dir = tempfile::tempdir().unwrap();
        let circuit = write(dir.path(), "xy.json", XY_CIRCUIT);
        let config = write(dir.path(), "qrev.yaml", "output:\n  format: json\n");

        let output = qrev(&[
            "--config",
            config.to_str().unwrap(),
            "run",
            "-i",
            circuit.to_str().unwrap(),
        ]);
        assert!(output.status.success());
        let json: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
        assert_eq!(json["circuit"], "xy");
    }

    #[test]
    fn test_invalid_config_fails() {
        let dir = tempfile::tempdir().unwrap();
        let config = write(dir.path(), "qrev.yaml", "logging:\n  level: chatty\n");

        let output = qrev(&["--config", config.to_str().unwrap(), "gates"]);
        assert_eq!(output.status.code(), Some(1));
        assert!(String::from_utf8_lossy(&output.stderr).contains("Invalid log level"));
    }
}

// ============================================================================
// Clap argument parsing (test via try_parse_from on equivalent structs)
// ============================================================================

mod clap_parsing {
    use clap::{Parser, Subcommand, ValueEnum};

    #[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
    enum TestFormat {
        Table,
        Json,
    }

    // Mirror the CLI struct for testing (since main.rs is a binary)
    #[derive(Parser)]
    #[command(name = "qrev")]
    struct TestCli {
        #[arg(short, long, action = clap::ArgAction::Count, global = true)]
        verbose: u8,

        #[arg(long, global = true)]
        config: Option<String>,

        #[command(subcommand)]
        command: TestCommands,
    }

    #[derive(Subcommand)]
    enum TestCommands {
        Run {
            #[arg(short, long)]
            input: String,
            #[arg(short, long)]
            layout: Option<String>,
            #[arg(short, long, value_enum)]
            format: Option<TestFormat>,
            #[arg(short, long, value_delimiter = ',')]
            registers: Vec<String>,
            #[arg(long)]
            history: bool,
        },
        Inspect {
            #[arg(short, long)]
            input: String,
            #[arg(short, long)]
            layout: Option<String>,
            #[arg(short, long, value_enum)]
            format: Option<TestFormat>,
        },
        Gates,
        Version,
    }

    #[test]
    fn test_parse_run_minimal() {
        let cli = TestCli::try_parse_from(["qrev", "run", "-i", "c.json"]).unwrap();
        match cli.command {
            TestCommands::Run {
                input,
                layout,
                format,
                registers,
                history,
            } => {
                assert_eq!(input, "c.json");
                assert!(layout.is_none());
                assert!(format.is_none());
                assert!(registers.is_empty());
                assert!(!history);
            }
            _ => panic!("expected run"),
        }
    }

    #[test]
    fn test_parse_run_full() {
        let cli = TestCli::try_parse_from([
            "qrev", "-vv", "run", "-i", "c.json", "-l", "l.yaml", "-f", "json", "-r", "x,y",
            "--history",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        match cli.command {
            TestCommands::Run {
                format,
                registers,
                history,
                ..
            } => {
                assert_eq!(format, Some(TestFormat::Json));
                assert_eq!(registers, vec!["x", "y"]);
                assert!(history);
            }
            _ => panic!("expected run"),
        }
    }

    #[test]
    fn test_parse_inspect_with_global_config() {
        let cli = TestCli::try_parse_from(["qrev", "inspect", "-i", "c.json", "--config", "q.yaml"])
            .unwrap();
        assert_eq!(cli.config.as_deref(), Some("q.yaml"));
        assert!(matches!(cli.command, TestCommands::Inspect { .. }));
    }

    #[test]
    fn test_parse_rejects_unknown_format() {
        assert!(TestCli::try_parse_from(["qrev", "run", "-i", "c.json", "-f", "xml"]).is_err());
    }

    #[test]
    fn test_parse_run_requires_input() {
        assert!(TestCli::try_parse_from(["qrev", "run"]).is_err());
    }

    #[test]
    fn test_parse_simple_commands() {
        assert!(matches!(
            TestCli::try_parse_from(["qrev", "gates"]).unwrap().command,
            TestCommands::Gates
        ));
        assert!(matches!(
            TestCli::try_parse_from(["qrev", "version"]).unwrap().command,
            TestCommands::Version
        ));
    }
}
