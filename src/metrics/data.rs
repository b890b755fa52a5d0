//! Data structures for host metrics.

/// Metrics gathered for a single DATA stanza.
///
/// Computed fresh each run and never persisted. Any source that cannot be
/// read contributes zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricSnapshot {
    /// Second load-average field scaled by 1000 and truncated
    pub load: i64,
    /// Raw thermal zone reading, millidegrees Celsius on real hardware
    pub temperature: i64,
    /// `MemFree` in kB
    pub free_memory_kb: u64,
    /// Received packets per second on the default interface
    pub rx_rate: i64,
    /// Transmitted packets per second on the default interface
    pub tx_rate: i64,
}

impl MetricSnapshot {
    /// Free memory in whole MiB.
    pub fn free_memory_mb(&self) -> u64 {
        self.free_memory_kb / 1024
    }
}

/// Cumulative packet counters for one interface.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PacketCounters {
    /// Packets received since boot
    pub rx_packets: u64,
    /// Packets transmitted since boot
    pub tx_packets: u64,
}

impl PacketCounters {
    pub fn new(rx_packets: u64, tx_packets: u64) -> Self {
        Self {
            rx_packets,
            tx_packets,
        }
    }
}
