// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Device profile recorded alongside benchmark results

use serde::{Deserialize, Serialize};
use std::path::Path;
use sysinfo::System;

/// CPU architecture classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CpuArchitecture {
    X86_64,
    ARM64,
    ARM32,
    Other,
}

impl CpuArchitecture {
    pub fn detect() -> Self {
        Self::from_arch(std::env::consts::ARCH)
    }

    fn from_arch(arch: &str) -> Self {
        match arch {
            "x86_64" | "amd64" => CpuArchitecture::X86_64,
            "aarch64" | "arm64" => CpuArchitecture::ARM64,
            "arm" | "armv7" => CpuArchitecture::ARM32,
            _ => CpuArchitecture::Other,
        }
    }
}

/// Hardware the suite ran on
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceProfile {
    /// CPU brand/model name
    pub cpu_brand: String,
    /// Logical CPU count
    pub cpu_cores: usize,
    /// Total system RAM in GB
    pub ram_gb: usize,
    pub architecture: CpuArchitecture,
    /// Device model reported by the device tree (single-board computers)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub os: Option<String>,
}

impl DeviceProfile {
    /// Detect the current system's profile
    pub fn detect() -> Self {
        let mut sys = System::new_all();
        sys.refresh_all();

        let ram_gb = (sys.total_memory() / (1024 * 1024 * 1024)) as usize;
        let cpu_cores = sys.cpus().len();
        let cpu_brand = sys
            .cpus()
            .first()
            .map(|cpu| cpu.brand().trim().to_string())
            .filter(|brand| !brand.is_empty())
            .unwrap_or_else(|| "Unknown CPU".to_string());

        Self {
            cpu_brand,
            cpu_cores,
            ram_gb,
            architecture: CpuArchitecture::detect(),
            model: Self::detect_model(),
            os: System::long_os_version(),
        }
    }

    /// Device-tree model string, present on most ARM boards
    fn detect_model() -> Option<String> {
        ["/proc/device-tree/model", "/sys/firmware/devicetree/base/model"]
            .iter()
            .map(Path::new)
            .filter(|path| path.exists())
            .find_map(|path| std::fs::read_to_string(path).ok())
            .map(|model| model.trim_end_matches('\0').trim().to_string())
            .filter(|model| !model.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cpu_architecture_from_arch() {
        assert_eq!(CpuArchitecture::from_arch("x86_64"), CpuArchitecture::X86_64);
        assert_eq!(CpuArchitecture::from_arch("aarch64"), CpuArchitecture::ARM64);
        assert_eq!(CpuArchitecture::from_arch("armv7"), CpuArchitecture::ARM32);
        assert_eq!(CpuArchitecture::from_arch("riscv64"), CpuArchitecture::Other);
    }

    #[test]
    fn test_cpu_architecture_detect() {
        let arch = CpuArchitecture::detect();
        #[cfg(target_arch = "x86_64")]
        assert_eq!(arch, CpuArchitecture::X86_64);
        #[cfg(target_arch = "aarch64")]
        assert_eq!(arch, CpuArchitecture::ARM64);
        let _ = arch;
    }

    #[test]
    fn test_detect_reports_brand() {
        let profile = DeviceProfile::detect();
        assert!(!profile.cpu_brand.is_empty());
    }

    #[test]
    fn test_serialization() {
        let profile = DeviceProfile {
            cpu_brand: "Test CPU".to_string(),
            cpu_cores: 8,
            ram_gb: 16,
            architecture: CpuArchitecture::ARM64,
            model: None,
            os: Some("Linux 6.1".to_string()),
        };
        let json = serde_json::to_string(&profile).unwrap();
        assert!(!json.contains("model"));
        let parsed: DeviceProfile = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, profile);
    }
}
