// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Device temperature readings for the stress monitor

use std::fs;
use std::path::PathBuf;

/// Source of device temperature in °C
pub trait ThermalSampler: Send + Sync {
    /// Current temperature, or None when no sensor could be read
    fn sample(&self) -> Option<f32>;
}

/// Reads battery temperature from sysfs, falling back to the first thermal zone
pub struct SysfsThermalSampler {
    root: PathBuf,
}

impl Default for SysfsThermalSampler {
    fn default() -> Self {
        Self::new("/sys/class")
    }
}

impl SysfsThermalSampler {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn battery_temperature(&self) -> Option<f32> {
        let mut supplies: Vec<PathBuf> = fs::read_dir(self.root.join("power_supply"))
            .ok()?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .collect();
        supplies.sort();

        supplies
            .iter()
            .filter(|dir| is_battery(dir))
            .find_map(|dir| fs::read_to_string(dir.join("temp")).ok())
            .and_then(|raw| parse_battery_temp(&raw))
    }

    fn thermal_zone_temperature(&self) -> Option<f32> {
        let raw = fs::read_to_string(self.root.join("thermal/thermal_zone0/temp")).ok()?;
        parse_thermal_zone_temp(&raw)
    }
}

impl ThermalSampler for SysfsThermalSampler {
    fn sample(&self) -> Option<f32> {
        self.battery_temperature()
            .or_else(|| self.thermal_zone_temperature())
    }
}

fn is_battery(dir: &std::path::Path) -> bool {
    match fs::read_to_string(dir.join("type")) {
        Ok(kind) => kind.trim().eq_ignore_ascii_case("battery"),
        // Some kernels omit `type`; accept any supply that reports a temperature.
        Err(_) => true,
    }
}

/// Battery temperature is reported in tenths of a degree
fn parse_battery_temp(raw: &str) -> Option<f32> {
    let value: f32 = raw.trim().parse().ok()?;
    Some(value / 10.0)
}

/// Thermal zones report millidegrees; some drivers report whole degrees
fn parse_thermal_zone_temp(raw: &str) -> Option<f32> {
    let value: f32 = raw.trim().parse().ok()?;
    if value > 1000.0 {
        Some(value / 1000.0)
    } else {
        Some(value)
    }
}
