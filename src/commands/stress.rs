// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Thermal stress test command

use std::io;
use std::time::Duration;

use crossterm::{
    style::{Color, ResetColor, SetForegroundColor},
    ExecutableCommand,
};

use crate::cli::args::{OutputFormat, StressArgs};
use crate::config::Settings;
use crate::error::Result;
use crate::stress::{SafetyTrip, StressSelection, StressSnapshot, StressSupervisor, TripKind};

/// Workloads requested on the command line; CPU when none are named
pub fn selection_from_args(args: &StressArgs) -> StressSelection {
    StressSelection {
        cpu: args.cpu || !args.gpu,
        gpu: args.gpu,
    }
}

/// Execute the stress command
pub async fn execute(args: &StressArgs, settings: &Settings, format: OutputFormat) -> Result<()> {
    settings.validate()?;

    let supervisor = StressSupervisor::from_config(settings.stress.clone());
    let mut rx = supervisor.subscribe();
    supervisor.start(selection_from_args(args))?;

    if format == OutputFormat::Text {
        println!(
            "Stress test running (high {:.1}°C, low {:.1}°C). Press Ctrl-C to stop.",
            settings.stress.high_threshold, settings.stress.low_threshold
        );
    }

    let deadline = async {
        match args.duration {
            Some(secs) => tokio::time::sleep(Duration::from_secs(secs)).await,
            None => std::future::pending().await,
        }
    };
    tokio::pin!(deadline);
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    let mut printed = 0u64;
    loop {
        tokio::select! {
            changed = rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let snapshot = rx.borrow_and_update().clone();
                if format == OutputFormat::Text && snapshot.samples > printed {
                    printed = snapshot.samples;
                    print_sample(&snapshot);
                }
                if !snapshot.running {
                    break;
                }
            }
            _ = &mut ctrl_c => {
                tracing::info!(target: "devbench.stress", "Interrupted");
                break;
            }
            _ = &mut deadline => {
                tracing::info!(target: "devbench.stress", "Duration elapsed");
                break;
            }
        }
    }

    supervisor.stop();
    let snapshot = supervisor.snapshot();

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&snapshot)?),
        OutputFormat::Text => {
            if let Some(trip) = snapshot.trip {
                print_trip(&trip)?;
            }
            println!(
                "Stopped after {} samples ({:.0}s).",
                snapshot.samples, snapshot.elapsed_secs
            );
        }
    }
    Ok(())
}

fn print_sample(snapshot: &StressSnapshot) {
    let Some(temperature) = snapshot.last_temperature else {
        return;
    };
    let label = snapshot
        .points
        .len()
        .checked_sub(1)
        .map(|last| snapshot.axis_label(last))
        .unwrap_or_default();
    println!(
        "[{:>7}] {:5.1}°C  ({} points, {}s/point)",
        label,
        temperature,
        snapshot.points.len(),
        snapshot.seconds_per_point
    );
}

fn print_trip(trip: &SafetyTrip) -> Result<()> {
    let reason = match trip.kind {
        TripKind::High => "too hot",
        TripKind::Low => "too cold",
    };
    let mut stdout = io::stdout();
    stdout.execute(SetForegroundColor(Color::Red))?;
    println!(
        "\nSAFETY STOP: device {} at {:.1}°C. All workloads have been stopped.",
        reason, trip.temperature
    );
    stdout.execute(ResetColor)?;
    Ok(())
}
