// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Settings command

use std::path::Path;

use crate::cli::args::{OutputFormat, SettingsArgs};
use crate::config::Settings;
use crate::error::{BenchError, Result};

/// Execute the settings command
pub fn execute(args: &SettingsArgs, settings: &Settings, path: &Path, format: OutputFormat) -> Result<()> {
    if args.init {
        init(path, args.force)?;
        println!("Wrote default settings to {}", path.display());
        return Ok(());
    }

    if format == OutputFormat::Text {
        println!("# {}", path.display());
    }
    println!("{}", serde_json::to_string_pretty(settings)?);
    Ok(())
}

/// Write default settings to `path`, refusing to overwrite unless `force`
pub fn init(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        return Err(BenchError::Config(format!(
            "{} already exists (use --force to overwrite)",
            path.display()
        )));
    }
    Settings::default().save_to(path)
}
