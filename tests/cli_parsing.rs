use clap::Parser;
use prompt_bandit::cli::{Cli, Commands};
use std::path::PathBuf;

#[test]
fn test_parse_run_defaults() {
    let cli = Cli::try_parse_from(["prompt-bandit", "run"]).unwrap();
    assert!(!cli.json);
    assert!(cli.config.is_none());
    match cli.command {
        Commands::Run(args) => {
            assert!(args.epochs.is_none());
            assert!(args.seed.is_none());
            assert!(!args.show_trials);
            assert!(!args.no_shuffle);
        }
        Commands::Arms(_) => panic!("Wrong command"),
    }
}

#[test]
fn test_parse_run_with_flags() {
    let cli = Cli::try_parse_from([
        "prompt-bandit",
        "--json",
        "--config",
        "custom.yaml",
        "run",
        "--epochs",
        "3",
        "--seed",
        "7",
        "--dataset",
        "questions.yaml",
        "-k",
        "2",
        "--show-trials",
    ])
    .unwrap();

    assert!(cli.json);
    assert_eq!(cli.config, Some(PathBuf::from("custom.yaml")));
    match cli.command {
        Commands::Run(args) => {
            assert_eq!(args.epochs, Some(3));
            assert_eq!(args.seed, Some(7));
            assert_eq!(args.dataset, Some(PathBuf::from("questions.yaml")));
            assert_eq!(args.top_k, Some(2));
            assert!(args.show_trials);
        }
        Commands::Arms(_) => panic!("Wrong command"),
    }
}

#[test]
fn test_probe_flags_require_each_other() {
    assert!(Cli::try_parse_from(["prompt-bandit", "run", "--probe-input", "Capital of Peru?"]).is_err());

    let cli = Cli::try_parse_from([
        "prompt-bandit",
        "run",
        "--probe-input",
        "Capital of Peru?",
        "--probe-reference",
        "Lima",
    ])
    .unwrap();
    match cli.command {
        Commands::Run(args) => {
            assert_eq!(args.probe_input.as_deref(), Some("Capital of Peru?"));
            assert_eq!(args.probe_reference.as_deref(), Some("Lima"));
        }
        Commands::Arms(_) => panic!("Wrong command"),
    }
}

#[test]
fn test_global_json_after_subcommand() {
    let cli = Cli::try_parse_from(["prompt-bandit", "arms", "--json", "--templates"]).unwrap();
    assert!(cli.json);
    match cli.command {
        Commands::Arms(args) => assert!(args.templates),
        Commands::Run(_) => panic!("Wrong command"),
    }
}

#[test]
fn test_rejects_unknown_command() {
    assert!(Cli::try_parse_from(["prompt-bandit", "train"]).is_err());
}
