//! Host metrics collection and data structures.
//!
//! This module reads the load average, CPU temperature, free memory and
//! default-interface packet counters from proc and sysfs files.

pub mod collector;
pub mod data;
pub mod meminfo;
pub mod network;

// Re-export commonly used items
pub use collector::MetricCollector;
pub use data::{MetricSnapshot, PacketCounters};
pub use meminfo::MemInfo;
