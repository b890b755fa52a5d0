//! Per-invocation telemetry context.
//!
//! [`Telemetry`] owns the configuration and the memory table for one run and
//! produces whichever stanza the command line asked for.

use crate::config::{Profile, TelemetryConfig};
use crate::metrics::{collector::MetricCollector, data::MetricSnapshot, meminfo::MemInfo};
use crate::stanza::{Coefficients, Stanza};
use crate::status::{SequenceFile, TelemetryStatus};
use tracing::{debug, warn};

const NETWORK_PARAMETERS: &[&str] = &["Cpu", "Temp", "FreeM", "RxP", "TxP"];
const NETWORK_UNITS: &[&str] = &["Load", "DegC", "Mb", "Pkt", "Pkt"];
const BASIC_PARAMETERS: &[&str] = &["Cpu", "Temp", "FreeM"];
const BASIC_UNITS: &[&str] = &["Load", "DegC", "Mb"];

/// Load and temperature are sent in thousandths; the rest as-is.
const COEFFICIENTS: &[Coefficients] = &[Coefficients::scale(0.001), Coefficients::scale(0.001)];

/// The stanza a single invocation emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Sampled values
    Data,
    /// Equation coefficients
    Eqns,
    /// Channel names
    Param,
    /// Unit labels
    Unit,
}

/// Telemetry context for one invocation.
pub struct Telemetry {
    config: TelemetryConfig,
    meminfo: MemInfo,
}

impl Telemetry {
    /// Context for one run; the memory table is loaded on first use.
    pub fn new(config: TelemetryConfig) -> Self {
        let meminfo = MemInfo::new(&config.meminfo_path);
        Self { config, meminfo }
    }

    /// Configuration this run was built from.
    pub fn config(&self) -> &TelemetryConfig {
        &self.config
    }

    /// Memory table shared by every reader in this run.
    pub fn meminfo(&self) -> &MemInfo {
        &self.meminfo
    }

    /// Produce the stanza for `command`.
    pub fn run(&self, command: Command) -> Stanza {
        match command {
            Command::Data => self.data_report(),
            Command::Eqns => self.equations(),
            Command::Param => self.parameters(),
            Command::Unit => self.units(),
        }
    }

    /// DATA stanza stamped with the current time.
    pub fn data_report(&self) -> Stanza {
        self.data_report_at(chrono::Utc::now().timestamp())
    }

    /// DATA stanza as of unix time `now`.
    ///
    /// Advances and persists the sequence counter. A failure to persist is
    /// logged and the stanza is still returned.
    pub fn data_report_at(&self, now: i64) -> Stanza {
        let collector = MetricCollector::new(&self.config);
        let mut snapshot = collector.collect_snapshot(&self.meminfo);

        let sequence = match self.config.profile {
            Profile::Network => {
                let path = self.config.status_path();
                let mut status = TelemetryStatus::load(&path, now);
                let (rx_rate, tx_rate) =
                    status.packet_rates(collector.read_packet_counters(), now);
                snapshot.rx_rate = rx_rate;
                snapshot.tx_rate = tx_rate;
                if let Err(err) = status.save(&path, now) {
                    warn!("cannot save status to {}: {}", path.display(), err);
                }
                status.sequence
            }
            Profile::Basic => SequenceFile::new(self.config.sequence_path()).next(),
        };

        debug!("snapshot {:?}", snapshot);
        Stanza::data(sequence, &channel_values(self.config.profile, &snapshot))
    }

    /// EQNS stanza scaling load and temperature back to units.
    pub fn equations(&self) -> Stanza {
        Stanza::eqns(&self.config.callsign, COEFFICIENTS)
    }

    /// PARM stanza naming the channels.
    pub fn parameters(&self) -> Stanza {
        let names = match self.config.profile {
            Profile::Network => NETWORK_PARAMETERS,
            Profile::Basic => BASIC_PARAMETERS,
        };
        Stanza::parm(&self.config.callsign, names)
    }

    /// UNIT stanza labelling the channels.
    pub fn units(&self) -> Stanza {
        let units = match self.config.profile {
            Profile::Network => NETWORK_UNITS,
            Profile::Basic => BASIC_UNITS,
        };
        Stanza::unit(&self.config.callsign, units)
    }
}

fn channel_values(profile: Profile, snapshot: &MetricSnapshot) -> Vec<i64> {
    let mut values = vec![
        snapshot.load,
        snapshot.temperature,
        snapshot.free_memory_mb() as i64,
    ];
    if profile == Profile::Network {
        values.extend([snapshot.rx_rate, snapshot.tx_rate]);
    }
    values
}
