//! # iGate Telem - APRS station health telemetry
//!
//! Reads a handful of host metrics (load average, CPU temperature, free memory and
//! packet rates on the default route interface) and renders them as APRS telemetry
//! stanzas. The binary is meant to be run from cron; each invocation prints one
//! stanza line on standard output for an APRS client or TNC to transmit.
//!
//! ## Stanzas
//!
//! - **DATA**: `T#001,250,45000,200,0,0,00000000`
//! - **EQNS**: `:W6BSD-5  :EQNS.0,0.001,0,0,0.001,0,0,1,0,0,1,0,0,1,0`
//! - **PARM**: `:W6BSD-5  :PARM.Cpu,Temp,FreeM,RxP,TxP`
//! - **UNIT**: `:W6BSD-5  :UNIT.Load,DegC,Mb,Pkt,Pkt`
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use igate_telem::{Telemetry, TelemetryConfig};
//!
//! let config = TelemetryConfig::default().with_callsign("W6BSD-5");
//! let telemetry = Telemetry::new(config);
//! println!("{}", telemetry.data_report());
//! ```

pub mod config;
pub mod error;
pub mod metrics;
pub mod stanza;
pub mod status;
pub mod telemetry;

// Re-export public API
pub use config::{Profile, TelemetryConfig};
pub use error::{Result, TelemetryError};
pub use metrics::{
    collector::MetricCollector,
    data::{MetricSnapshot, PacketCounters},
    meminfo::MemInfo,
};
pub use stanza::{Coefficients, Stanza};
pub use status::{SequenceFile, TelemetryStatus};
pub use telemetry::{Command, Telemetry};

/// Placeholder callsign used when none is configured
pub const DEFAULT_CALLSIGN: &str = "N0CALL";

/// Interface assumed when the routing table cannot be read
pub const DEFAULT_INTERFACE: &str = "eth0";

/// Directory used for persisted state when `XDG_RUNTIME_DIR` is unset
pub const DEFAULT_STATE_DIR: &str = "/tmp";

/// File name of the network-aware status record
pub const STATUS_FILE_NAME: &str = "aprs_status.dat";

/// File name of the plain-text sequence counter
pub const SEQUENCE_FILE_NAME: &str = "aprs_seq.dat";

/// Highest sequence number before wrapping back to 1
pub const MAX_SEQUENCE: u32 = 999;
