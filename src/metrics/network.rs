//! Default route discovery and per-interface packet counters.

use crate::metrics::data::PacketCounters;
use std::fs;
use std::path::Path;
use tracing::debug;

/// `RTF_GATEWAY` in the routing table flags column.
const RTF_GATEWAY: u32 = 0x2;

/// Destination column value of the default route.
const DEFAULT_DESTINATION: &str = "00000000";

/// Find the interface carrying the default gateway route.
///
/// Falls back to `fallback` when the routing table cannot be read or has no
/// default gateway entry.
pub fn default_interface(route_path: &Path, fallback: &str) -> String {
    match fs::read_to_string(route_path) {
        Ok(contents) => parse_default_route(&contents).unwrap_or_else(|| {
            debug!("no default gateway in {}, using {}", route_path.display(), fallback);
            fallback.to_string()
        }),
        Err(err) => {
            debug!("cannot read {}: {}, using {}", route_path.display(), err, fallback);
            fallback.to_string()
        }
    }
}

/// Scan `/proc/net/route` contents for the default gateway interface.
///
/// Columns of interest are 0 (interface), 1 (destination) and 3 (flags, hex).
pub fn parse_default_route(contents: &str) -> Option<String> {
    contents.lines().find_map(|line| {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < 4 || fields[1] != DEFAULT_DESTINATION {
            return None;
        }
        let flags = u32::from_str_radix(fields[3], 16).ok()?;
        (flags & RTF_GATEWAY != 0).then(|| fields[0].to_string())
    })
}

/// Read rx/tx packet counters for `interface`.
///
/// `None` when the file is unreadable or the interface is not listed, so the
/// caller can tell a missing interface from one with zero traffic.
pub fn read_packet_counters(netdev_path: &Path, interface: &str) -> Option<PacketCounters> {
    let counters = fs::read_to_string(netdev_path)
        .ok()
        .and_then(|contents| parse_packet_counters(&contents, interface));
    if counters.is_none() {
        debug!(
            "no packet counters for {} in {}",
            interface,
            netdev_path.display()
        );
    }
    counters
}

/// Extract the packet counters of one interface from `/proc/net/dev` contents.
///
/// After the `iface:` prefix the receive block holds bytes, packets, errs,
/// drop, fifo, frame, compressed and multicast; the transmit block follows
/// with bytes then packets.
pub fn parse_packet_counters(contents: &str, interface: &str) -> Option<PacketCounters> {
    contents.lines().find_map(|line| {
        let (name, stats) = line.split_once(':')?;
        if name.trim() != interface {
            return None;
        }
        let fields: Vec<&str> = stats.split_whitespace().collect();
        let rx_packets = fields.get(1)?.parse().ok()?;
        let tx_packets = fields.get(9)?.parse().ok()?;
        Some(PacketCounters::new(rx_packets, tx_packets))
    })
}
