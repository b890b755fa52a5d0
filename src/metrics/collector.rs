//! Host metric readers.
//!
//! Every reader degrades to zero on a missing file or malformed contents,
//! except packet counters, which report `None` so the rate baseline is not
//! seeded from a missing interface. Failures are only visible at debug level.

use crate::config::TelemetryConfig;
use crate::error::{Result, TelemetryError};
use crate::metrics::{data::*, meminfo::MemInfo, network};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Reads metrics from the sources named in a [`TelemetryConfig`].
pub struct MetricCollector<'a> {
    config: &'a TelemetryConfig,
}

impl<'a> MetricCollector<'a> {
    /// Create a collector over the configured source paths.
    pub fn new(config: &'a TelemetryConfig) -> Self {
        Self { config }
    }

    /// Second load-average field scaled by 1000, or 0.
    pub fn read_load_average(&self) -> i64 {
        fallback(
            read_load_average(&self.config.loadavg_path),
            &self.config.loadavg_path,
        )
    }

    /// Raw thermal zone reading, or 0.
    pub fn read_temperature(&self) -> i64 {
        fallback(
            read_temperature(&self.config.thermal_path),
            &self.config.thermal_path,
        )
    }

    /// Interface carrying the default route.
    pub fn default_interface(&self) -> String {
        network::default_interface(&self.config.route_path, &self.config.fallback_interface)
    }

    /// Cumulative packet counters of the default interface, `None` when unavailable.
    pub fn read_packet_counters(&self) -> Option<PacketCounters> {
        let interface = self.default_interface();
        debug!("reading packet counters for {}", interface);
        network::read_packet_counters(&self.config.netdev_path, &interface)
    }

    /// Collect load, temperature and free memory. Packet rates are left at
    /// zero since they depend on the persisted baseline.
    pub fn collect_snapshot(&self, meminfo: &MemInfo) -> MetricSnapshot {
        MetricSnapshot {
            load: self.read_load_average(),
            temperature: self.read_temperature(),
            free_memory_kb: meminfo.get("MemFree", 0),
            ..MetricSnapshot::default()
        }
    }
}

fn fallback(value: Result<i64>, path: &Path) -> i64 {
    value.unwrap_or_else(|err| {
        debug!("{}: {}, reporting 0", path.display(), err);
        0
    })
}

fn read_load_average(path: &Path) -> Result<i64> {
    let contents = fs::read_to_string(path)?;
    parse_load_average(&contents)
}

/// Parse the second field of `/proc/loadavg` into thousandths.
pub fn parse_load_average(contents: &str) -> Result<i64> {
    let field = contents
        .split_whitespace()
        .nth(1)
        .ok_or_else(|| TelemetryError::parse_error("loadavg has fewer than 2 fields"))?;
    let load: f64 = field
        .parse()
        .map_err(|e| TelemetryError::parse_error(format!("loadavg '{}': {}", field, e)))?;
    Ok((load * 1000.0) as i64)
}

fn read_temperature(path: &Path) -> Result<i64> {
    let contents = fs::read_to_string(path)?;
    parse_temperature(&contents)
}

/// Parse the first line of a thermal zone file.
pub fn parse_temperature(contents: &str) -> Result<i64> {
    let line = contents.lines().next().unwrap_or("").trim();
    line.parse()
        .map_err(|e| TelemetryError::parse_error(format!("temperature '{}': {}", line, e)))
}
