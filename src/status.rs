//! Counters persisted between invocations.
//!
//! The program runs once per cron tick, so the telemetry sequence number and
//! the packet-rate baseline live on disk. Two stores exist: [`TelemetryStatus`],
//! a versioned JSON record used by the network profile, and [`SequenceFile`],
//! a bare sequence number in plain text used by the basic profile.
//!
//! Neither store locks its file. Invocations must be serialized by the caller.

use crate::error::{Result, TelemetryError};
use crate::metrics::data::PacketCounters;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Schema version written into every status record.
pub const STATUS_VERSION: u32 = 1;

/// Advance a sequence number, wrapping 999 back to 1. Never yields 0.
pub fn next_sequence(sequence: u32) -> u32 {
    (sequence % crate::MAX_SEQUENCE) + 1
}

/// Packets per second between two counter readings.
///
/// `elapsed` is clamped to at least one second. The result truncates toward
/// zero and goes negative if the counter went backwards (interface reset).
/// Counters beyond `i64::MAX` saturate.
pub fn packet_rate(current: u64, baseline: u64, elapsed: i64) -> i64 {
    let current = i64::try_from(current).unwrap_or(i64::MAX);
    let baseline = i64::try_from(baseline).unwrap_or(i64::MAX);
    current.saturating_sub(baseline) / elapsed.max(1)
}

/// Sequence number and packet baseline for the network profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelemetryStatus {
    /// Record schema version
    pub version: u32,
    /// Sequence number of the current DATA stanza, 1..=999 once loaded
    pub sequence: u32,
    /// Unix time of the last save
    pub timestamp: i64,
    /// Received packet count at the last save, `None` before the first reading
    pub rx_packets: Option<u64>,
    /// Transmitted packet count at the last save, `None` before the first reading
    pub tx_packets: Option<u64>,
}

impl TelemetryStatus {
    /// A fresh record as used on first run.
    pub fn new(now: i64) -> Self {
        Self {
            version: STATUS_VERSION,
            sequence: 0,
            timestamp: now,
            rx_packets: None,
            tx_packets: None,
        }
    }

    /// Load the record at `path` and advance its sequence number.
    ///
    /// A missing, unreadable, malformed or foreign-version file yields a
    /// fresh record, so the first sequence handed out is 1.
    pub fn load(path: &Path, now: i64) -> Self {
        let mut status = match Self::read(path) {
            Ok(status) => status,
            Err(TelemetryError::Io(err)) if err.kind() == ErrorKind::NotFound => {
                info!("no status record at {}, starting fresh", path.display());
                Self::new(now)
            }
            Err(err) => {
                warn!("discarding status record {}: {}", path.display(), err);
                Self::new(now)
            }
        };
        status.sequence = next_sequence(status.sequence);
        debug!("sequence {} from {}", status.sequence, path.display());
        status
    }

    fn read(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let status: Self = serde_json::from_str(&contents)?;
        if status.version != STATUS_VERSION {
            return Err(TelemetryError::parse_error(format!(
                "unsupported status version {}",
                status.version
            )));
        }
        Ok(status)
    }

    /// Stamp the record with `now` and overwrite `path`.
    pub fn save(&mut self, path: &Path, now: i64) -> Result<()> {
        self.timestamp = now;
        let json = serde_json::to_string(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Compute rx/tx packet rates against the stored baseline, then move the
    /// baseline to `current`.
    ///
    /// A counter with no stored baseline is seeded from `current` first, so
    /// the first run reports 0 instead of the total since boot. When the
    /// counters are unavailable the rates are 0 and the baseline is cleared,
    /// so the next valid reading seeds it again.
    pub fn packet_rates(&mut self, current: Option<PacketCounters>, now: i64) -> (i64, i64) {
        let Some(current) = current else {
            if self.rx_packets.is_some() || self.tx_packets.is_some() {
                info!("packet counters unavailable, clearing baseline");
            }
            self.rx_packets = None;
            self.tx_packets = None;
            return (0, 0);
        };
        if self.rx_packets.is_none() || self.tx_packets.is_none() {
            info!(
                "seeding packet baseline rx={} tx={}",
                current.rx_packets, current.tx_packets
            );
        }
        let rx_baseline = *self.rx_packets.get_or_insert(current.rx_packets);
        let tx_baseline = *self.tx_packets.get_or_insert(current.tx_packets);
        let elapsed = now.saturating_sub(self.timestamp);

        let rates = (
            packet_rate(current.rx_packets, rx_baseline, elapsed),
            packet_rate(current.tx_packets, tx_baseline, elapsed),
        );

        self.rx_packets = Some(current.rx_packets);
        self.tx_packets = Some(current.tx_packets);
        rates
    }
}

/// Plain-text sequence counter used by the basic profile.
#[derive(Debug, Clone)]
pub struct SequenceFile {
    path: PathBuf,
}

impl SequenceFile {
    /// Counter stored at `path`; nothing is read until [`SequenceFile::next`].
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the counter file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Advance and persist the counter, returning the new value.
    ///
    /// A missing file starts the count at 1. Malformed contents restart it at
    /// 1. A failed write is logged and the computed value is still returned.
    pub fn next(&self) -> u32 {
        let sequence = match fs::read_to_string(&self.path) {
            Ok(contents) => match contents.trim().parse::<u32>() {
                Ok(previous) => next_sequence(previous),
                Err(err) => {
                    warn!("resetting sequence file {}: {}", self.path.display(), err);
                    1
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => 1,
            Err(err) => {
                warn!("cannot read {}: {}", self.path.display(), err);
                1
            }
        };
        if let Err(err) = fs::write(&self.path, sequence.to_string()) {
            warn!("cannot save sequence to {}: {}", self.path.display(), err);
        }
        sequence
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_sequence_wraps() {
        for sequence in 1..crate::MAX_SEQUENCE {
            assert_eq!(next_sequence(sequence), sequence + 1);
        }
        assert_eq!(next_sequence(999), 1);
        assert_eq!(next_sequence(0), 1);
    }

    #[test]
    fn test_packet_rate() {
        assert_eq!(packet_rate(150, 100, 10), 5);
        assert_eq!(packet_rate(150, 100, 0), 50);
        assert_eq!(packet_rate(150, 100, -30), 50);
        assert_eq!(packet_rate(109, 100, 10), 0);
        assert_eq!(packet_rate(50, 100, 10), -5);
    }

    #[test]
    fn test_packet_rate_saturates() {
        assert_eq!(packet_rate(u64::MAX, 0, 1), i64::MAX);
        assert_eq!(packet_rate(0, u64::MAX, 1), -i64::MAX);
        assert_eq!(packet_rate(u64::MAX, u64::MAX, 10), 0);
    }

    #[test]
    fn test_extreme_timestamp_does_not_overflow() {
        let mut status = TelemetryStatus::new(i64::MIN);
        status.rx_packets = Some(100);
        status.tx_packets = Some(100);

        let rates = status.packet_rates(Some(PacketCounters::new(200, 100)), 1000);
        assert_eq!(rates, (0, 0));

        let mut status = TelemetryStatus::new(i64::MAX);
        status.rx_packets = Some(100);
        status.tx_packets = Some(u64::MAX);
        let rates = status.packet_rates(Some(PacketCounters::new(150, 0)), 1000);
        assert_eq!(rates, (50, -i64::MAX));
    }

    #[test]
    fn test_first_load_yields_sequence_one() {
        let dir = tempfile::tempdir().unwrap();
        let status = TelemetryStatus::load(&dir.path().join("aprs_status.dat"), 1000);
        assert_eq!(status.sequence, 1);
        assert_eq!(status.timestamp, 1000);
        assert_eq!(status.rx_packets, None);
    }

    #[test]
    fn test_save_and_reload_advances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("aprs_status.dat");

        let mut status = TelemetryStatus::load(&path, 1000);
        status.rx_packets = Some(100);
        status.tx_packets = Some(40);
        status.save(&path, 1060).unwrap();

        let reloaded = TelemetryStatus::load(&path, 1120);
        assert_eq!(reloaded.sequence, 2);
        assert_eq!(reloaded.timestamp, 1060);
        assert_eq!(reloaded.rx_packets, Some(100));
        assert_eq!(reloaded.tx_packets, Some(40));
    }

    #[test]
    fn test_sequence_wraps_across_saves() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("aprs_status.dat");

        let mut status = TelemetryStatus::new(0);
        status.sequence = 999;
        status.save(&path, 0).unwrap();

        assert_eq!(TelemetryStatus::load(&path, 10).sequence, 1);
    }

    #[test]
    fn test_corrupt_or_foreign_record_starts_fresh() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("aprs_status.dat");

        fs::write(&path, b"\x80\x02}q\x00(U\x03seq").unwrap();
        assert_eq!(TelemetryStatus::load(&path, 5), TelemetryStatus {
            sequence: 1,
            ..TelemetryStatus::new(5)
        });

        fs::write(
            &path,
            r#"{"version":7,"sequence":41,"timestamp":0,"rx_packets":null,"tx_packets":null}"#,
        )
        .unwrap();
        assert_eq!(TelemetryStatus::load(&path, 5).sequence, 1);
    }

    #[test]
    fn test_save_failure_is_reported() {
        let mut status = TelemetryStatus::new(0);
        let result = status.save(Path::new("/nonexistent/dir/aprs_status.dat"), 10);
        assert!(matches!(result, Err(TelemetryError::Io(_))));
    }

    #[test]
    fn test_packet_rates_from_baseline() {
        let mut status = TelemetryStatus::new(0);
        status.rx_packets = Some(100);
        status.tx_packets = Some(20);

        let rates = status.packet_rates(Some(PacketCounters::new(150, 80)), 10);
        assert_eq!(rates, (5, 6));
        assert_eq!(status.rx_packets, Some(150));
        assert_eq!(status.tx_packets, Some(80));
    }

    #[test]
    fn test_first_reading_seeds_baseline() {
        let mut status = TelemetryStatus::new(0);
        let rates = status.packet_rates(Some(PacketCounters::new(123_456, 78_901)), 0);
        assert_eq!(rates, (0, 0));
        assert_eq!(status.rx_packets, Some(123_456));
    }

    #[test]
    fn test_zero_baseline_is_not_reseeded() {
        let mut status = TelemetryStatus::new(0);
        status.rx_packets = Some(0);
        status.tx_packets = Some(0);

        let rates = status.packet_rates(Some(PacketCounters::new(300, 100)), 100);
        assert_eq!(rates, (3, 1));
    }

    #[test]
    fn test_unavailable_counters_clear_baseline() {
        let mut status = TelemetryStatus::new(0);
        status.rx_packets = Some(0);
        status.tx_packets = Some(0);

        assert_eq!(status.packet_rates(None, 60), (0, 0));
        assert_eq!(status.rx_packets, None);
        assert_eq!(status.tx_packets, None);

        let rates = status.packet_rates(Some(PacketCounters::new(600_000, 300_000)), 120);
        assert_eq!(rates, (0, 0));
        assert_eq!(status.rx_packets, Some(600_000));
    }

    #[test]
    fn test_sequence_file_lifecycle() {
        let dir = tempfile::tempdir().unwrap();
        let file = SequenceFile::new(dir.path().join("aprs_seq.dat"));

        assert_eq!(file.next(), 1);
        assert_eq!(fs::read_to_string(file.path()).unwrap(), "1");
        assert_eq!(file.next(), 2);

        fs::write(file.path(), "999").unwrap();
        assert_eq!(file.next(), 1);

        fs::write(file.path(), "garbage").unwrap();
        assert_eq!(file.next(), 1);
        assert_eq!(file.next(), 2);
    }
}
