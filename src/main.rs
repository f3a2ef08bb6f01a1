// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! devbench - device benchmark suite and thermal stress monitor
//!
//! Entry point for the devbench CLI application.

use clap::Parser;

use devbench::cli::{Cli, Commands};
use devbench::commands;
use devbench::config::Settings;
use devbench::error::Result;
use devbench::report::{reporter_from_config, version_code};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing::Level::WARN.into());

    // `-v` turns on the per-subsystem diagnostics. `RUST_LOG` still takes precedence.
    if cli.verbose > 0 {
        for directive in [
            "devbench.suite=debug",
            "devbench.inference=debug",
            "devbench.stress=debug",
            "devbench.report=debug",
        ] {
            if let Ok(parsed) = directive.parse() {
                env_filter = env_filter.add_directive(parsed);
            }
        }
    }

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let config_path = cli.config.clone().unwrap_or_else(Settings::default_path);
    let settings = Settings::load_from(&config_path)?;

    match cli.command {
        Commands::Run(args) => {
            commands::run::execute(&args, &settings, cli.format).await?;
        }
        Commands::Stress(args) => {
            commands::stress::execute(&args, &settings, cli.format).await?;
        }
        Commands::Scores => {
            commands::scores::execute(&commands::score_store(), cli.format)?;
        }
        Commands::Rank => {
            let reporter = reporter_from_config(&settings.reporting)?;
            commands::rank::execute(
                &commands::score_store(),
                reporter.as_ref(),
                version_code(),
                cli.format,
            )
            .await?;
        }
        Commands::System => {
            commands::system::execute(&settings, cli.format)?;
        }
        Commands::Settings(args) => {
            commands::settings::execute(&args, &settings, &config_path, cli.format)?;
        }
    }

    Ok(())
}
