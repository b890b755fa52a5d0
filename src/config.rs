//! Telemetry configuration.

use crate::error::{Result, TelemetryError};
use std::path::PathBuf;

/// Maximum length of an APRS addressee field.
const CALLSIGN_WIDTH: usize = 9;

/// Which set of channels the station reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Profile {
    /// Load, temperature, free memory and rx/tx packet rates
    #[default]
    Network,
    /// Load, temperature and free memory only, with a plain-text sequence file
    Basic,
}

/// Configuration for a telemetry run.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// Station callsign with SSID, e.g. `W6BSD-5`
    pub callsign: String,
    /// Channel set to report
    pub profile: Profile,
    /// Load average pseudo-file
    pub loadavg_path: PathBuf,
    /// Memory information pseudo-file
    pub meminfo_path: PathBuf,
    /// Thermal zone sysfs file
    pub thermal_path: PathBuf,
    /// Kernel routing table
    pub route_path: PathBuf,
    /// Per-interface device statistics
    pub netdev_path: PathBuf,
    /// Interface used when the routing table is unreadable
    pub fallback_interface: String,
    /// Directory holding the persisted counters
    pub state_dir: PathBuf,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            callsign: crate::DEFAULT_CALLSIGN.to_string(),
            profile: Profile::default(),
            loadavg_path: PathBuf::from("/proc/loadavg"),
            meminfo_path: PathBuf::from("/proc/meminfo"),
            thermal_path: PathBuf::from("/sys/class/thermal/thermal_zone0/temp"),
            route_path: PathBuf::from("/proc/net/route"),
            netdev_path: PathBuf::from("/proc/net/dev"),
            fallback_interface: crate::DEFAULT_INTERFACE.to_string(),
            state_dir: default_state_dir(),
        }
    }
}

impl TelemetryConfig {
    /// Set the station callsign.
    pub fn with_callsign(mut self, callsign: impl Into<String>) -> Self {
        self.callsign = callsign.into();
        self
    }

    /// Select the reported channel set.
    pub fn with_profile(mut self, profile: Profile) -> Self {
        self.profile = profile;
        self
    }

    /// Set the directory used for persisted counters.
    pub fn with_state_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.state_dir = dir.into();
        self
    }

    /// Point every proc/sysfs source at files under `root`.
    ///
    /// The layout mirrors the live system: `root/proc/loadavg`,
    /// `root/proc/meminfo`, `root/proc/net/route`, `root/proc/net/dev` and
    /// `root/sys/class/thermal/thermal_zone0/temp`.
    pub fn with_source_root(mut self, root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        self.loadavg_path = root.join("proc/loadavg");
        self.meminfo_path = root.join("proc/meminfo");
        self.thermal_path = root.join("sys/class/thermal/thermal_zone0/temp");
        self.route_path = root.join("proc/net/route");
        self.netdev_path = root.join("proc/net/dev");
        self
    }

    /// Path of the network-aware status record.
    pub fn status_path(&self) -> PathBuf {
        self.state_dir.join(crate::STATUS_FILE_NAME)
    }

    /// Path of the plain-text sequence counter.
    pub fn sequence_path(&self) -> PathBuf {
        self.state_dir.join(crate::SEQUENCE_FILE_NAME)
    }

    /// Whether the callsign is still the unconfigured placeholder.
    pub fn is_default_callsign(&self) -> bool {
        self.callsign == crate::DEFAULT_CALLSIGN
    }
}

/// `$XDG_RUNTIME_DIR` when set, else `/tmp`.
pub fn default_state_dir() -> PathBuf {
    match std::env::var_os("XDG_RUNTIME_DIR") {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => PathBuf::from(crate::DEFAULT_STATE_DIR),
    }
}

/// Check that a callsign fits the 9-character APRS addressee field.
pub fn validate_callsign(callsign: &str) -> Result<String> {
    let callsign = callsign.trim();
    if callsign.is_empty() {
        return Err(TelemetryError::config_error("callsign must not be empty"));
    }
    if callsign.len() > CALLSIGN_WIDTH {
        return Err(TelemetryError::config_error(format!(
            "callsign '{}' is longer than {} characters",
            callsign, CALLSIGN_WIDTH
        )));
    }
    if !callsign
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-')
    {
        return Err(TelemetryError::config_error(format!(
            "callsign '{}' contains invalid characters",
            callsign
        )));
    }
    Ok(callsign.to_ascii_uppercase())
}
