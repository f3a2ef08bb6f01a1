// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Benchmark suite command

use std::sync::Arc;

use indicatif::{ProgressBar, ProgressStyle};
use tokio::task::JoinHandle;

use crate::cli::args::{OutputFormat, RunArgs};
use crate::config::Settings;
use crate::error::Result;
use crate::hardware::DeviceProfile;
use crate::inference::InferenceBenchmark;
use crate::report::{reporter_from_config, version_code};
use crate::store::ScoreStore;
use crate::suite::{standard_steps, Category, ProcessCompanion, SuiteOrchestrator, SuiteReport, SuiteView};
use crate::workload::{HostCapabilities, HostWorkloads};

/// Wire the host collaborators described by `settings` into an orchestrator.
pub fn build_orchestrator(
    settings: &Settings,
    store: Arc<dyn ScoreStore>,
    submit: bool,
) -> Result<SuiteOrchestrator> {
    let mut suite = SuiteOrchestrator::new(
        standard_steps(),
        Arc::new(HostWorkloads::new(settings.suite.clone())),
        Arc::new(HostCapabilities::detect(&settings.companion)),
        store,
    )
    .with_inference(InferenceBenchmark::from_settings(settings))
    .with_device(DeviceProfile::detect());

    if let Some(command) = &settings.companion.command {
        suite = suite.with_companion(
            Arc::new(ProcessCompanion::new(command)?),
            settings.companion_timeout(),
        );
    }

    if submit && settings.reporting.base_url.is_some() {
        let reporter = reporter_from_config(&settings.reporting)?;
        suite = suite.with_reporter(Arc::from(reporter), version_code());
    }

    Ok(suite)
}

/// Execute the run command
pub async fn execute(args: &RunArgs, settings: &Settings, format: OutputFormat) -> Result<()> {
    settings.validate()?;
    Settings::ensure_directories()?;

    let store: Arc<dyn ScoreStore> = Arc::new(super::score_store());
    let mut suite = build_orchestrator(settings, store, !args.no_submit)?;

    let progress = match format {
        OutputFormat::Text => Some(show_progress(suite.view())),
        OutputFormat::Json => None,
    };

    let report = suite.run().await;
    if let Some(handle) = progress {
        let _ = handle.await;
    }

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Text => print_report(&report),
    }
    Ok(())
}

fn show_progress(mut view: SuiteView) -> JoinHandle<()> {
    tokio::spawn(async move {
        let bar = ProgressBar::new(1000);
        let style = ProgressStyle::with_template("{bar:40.cyan/blue} {percent:>3}% {wide_msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        bar.set_style(style);

        loop {
            bar.set_position((view.overall_progress() * 1000.0) as u64);
            if let Some(step) = view.current_step() {
                bar.set_message(format!(
                    "{} ({}: {}%)",
                    step.label,
                    step.category,
                    view.category_progress_percent(step.category)
                ));
            }
            if view.snapshot().is_finished() || !view.changed().await {
                break;
            }
        }
        bar.finish_and_clear();
    })
}

fn print_report(report: &SuiteReport) {
    println!("\n=== devbench results ===");
    if let Some(device) = &report.device {
        println!("Device: {} ({} cores, {}GB RAM)", device.cpu_brand, device.cpu_cores, device.ram_gb);
    }

    for category in Category::ALL {
        println!("\n{:<28} {:>12}", category.store_key(), report.category(category));
        for step in report.steps.iter().filter(|s| s.category == category) {
            println!("  {:<26} {:>12}", step.label, step.score);
        }
    }

    println!("\n{:<28} {:>12}", "Overall", report.overall);
    let seconds = report.duration().num_seconds();
    println!("Completed in {}m {}s", seconds / 60, seconds % 60);
    if report.submitted {
        println!("Score submitted. Run 'devbench rank' to see your percentile.");
    }
    println!();
}
