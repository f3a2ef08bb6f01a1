// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! System hardware information command

use serde::Serialize;

use crate::cli::args::OutputFormat;
use crate::config::Settings;
use crate::error::Result;
use crate::hardware::DeviceProfile;
use crate::stress::{SysfsThermalSampler, ThermalSampler};
use crate::workload::{Capability, CapabilityProbe, HostCapabilities};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SystemInfo {
    device: DeviceProfile,
    gpu_compute: bool,
    ray_tracing: bool,
    temperature_c: Option<f32>,
}

/// Execute the system command
pub fn execute(settings: &Settings, format: OutputFormat) -> Result<()> {
    let capabilities = HostCapabilities::detect(&settings.companion);
    let info = SystemInfo {
        device: DeviceProfile::detect(),
        gpu_compute: capabilities.supports(Capability::GpuCompute),
        ray_tracing: capabilities.supports(Capability::RayTracing),
        temperature_c: SysfsThermalSampler::default().sample(),
    };

    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&info)?);
        return Ok(());
    }

    let device = &info.device;
    println!("\n=== devbench System Profile ===\n");
    println!("CPU: {} ({} cores)", device.cpu_brand, device.cpu_cores);
    println!("RAM: {}GB", device.ram_gb);
    println!("Architecture: {:?}", device.architecture);
    if let Some(model) = &device.model {
        println!("Model: {}", model);
    }
    if let Some(os) = &device.os {
        println!("OS: {}", os);
    }

    println!("\n=== Capabilities ===");
    println!("  {} GPU compute", mark(info.gpu_compute));
    println!("  {} Ray tracing (companion)", mark(info.ray_tracing));

    match info.temperature_c {
        Some(t) => println!("\nTemperature: {:.1}°C", t),
        None => println!("\nTemperature: no sensor found (stress test will not sample)"),
    }
    println!();
    Ok(())
}

fn mark(supported: bool) -> &'static str {
    if supported {
        "✓"
    } else {
        "✗"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mark() {
        assert_eq!(mark(true), "✓");
        assert_eq!(mark(false), "✗");
    }

    #[test]
    fn test_system_info_serialization() {
        let info = SystemInfo {
            device: DeviceProfile::detect(),
            gpu_compute: false,
            ray_tracing: true,
            temperature_c: Some(31.5),
        };
        let json = serde_json::to_value(&info).unwrap();
        assert_eq!(json["gpuCompute"], false);
        assert_eq!(json["rayTracing"], true);
        assert!(json["device"]["cpu_brand"].is_string());
    }
}
