// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

use clap::Parser;
use devbench::cli::{Cli, Commands, OutputFormat};

#[test]
fn test_parse_run_command() {
    let cli = Cli::try_parse_from(["devbench", "run"]).expect("Valid command parsing");
    match cli.command {
        Commands::Run(args) => assert!(!args.no_submit),
        _ => panic!("Expected Run command"),
    }
}

#[test]
fn test_parse_stress_defaults() {
    let cli = Cli::try_parse_from(["devbench", "stress"]).expect("Valid command parsing");
    match cli.command {
        Commands::Stress(args) => {
            assert!(!args.cpu);
            assert!(!args.gpu);
            assert!(args.duration.is_none());
        }
        _ => panic!("Expected Stress command"),
    }
}

#[test]
fn test_parse_stress_short_duration() {
    let cli = Cli::try_parse_from(["devbench", "stress", "--cpu", "-d", "30"])
        .expect("Valid command parsing");
    match cli.command {
        Commands::Stress(args) => {
            assert!(args.cpu);
            assert_eq!(args.duration, Some(30));
        }
        _ => panic!("Expected Stress command"),
    }
}

#[test]
fn test_parse_json_format() {
    let cli = Cli::try_parse_from(["devbench", "--format", "json", "scores"])
        .expect("Valid command parsing");
    assert_eq!(cli.format, OutputFormat::Json);
    assert!(matches!(cli.command, Commands::Scores));
}

#[test]
fn test_parse_invalid_format() {
    assert!(Cli::try_parse_from(["devbench", "--format", "yaml", "scores"]).is_err());
}

#[test]
fn test_parse_config_alias() {
    let cli = Cli::try_parse_from(["devbench", "config"]).expect("Valid command parsing");
    match cli.command {
        Commands::Settings(args) => {
            assert!(!args.init);
            assert!(!args.force);
        }
        _ => panic!("Expected Settings command"),
    }
}

#[test]
fn test_parse_unknown_command() {
    assert!(Cli::try_parse_from(["devbench", "chat"]).is_err());
}

#[test]
fn test_parse_negative_duration_rejected() {
    assert!(Cli::try_parse_from(["devbench", "stress", "-d", "-5"]).is_err());
}
