//! APRS telemetry stanza encoding.
//!
//! A station publishes four stanza kinds. DATA carries the sampled values:
//!
//! ```text
//! T#001,250,45000,200,0,0,00000000
//! ```
//!
//! EQNS, PARM and UNIT are messages addressed to the station itself, with the
//! callsign left-justified in a 9-character field:
//!
//! ```text
//! :W6BSD-5  :PARM.Cpu,Temp,FreeM,RxP,TxP
//! ```
//!
//! Every kind carries exactly five channels (fifteen coefficients for EQNS).
//! Extra inputs are dropped and missing ones are filled with defaults.

use std::fmt;

/// Number of analog channels in a telemetry stanza.
pub const CHANNELS: usize = 5;

/// Digital channel bits, always reported off.
const DIGITAL_BITS: &str = "00000000";

/// Quadratic transform from a raw channel value to the displayed value:
/// `a * raw^2 + b * raw + c`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coefficients {
    pub a: f64,
    pub b: f64,
    pub c: f64,
}

impl Coefficients {
    /// Displays the raw value unchanged.
    pub const IDENTITY: Self = Self::new(0.0, 1.0, 0.0);

    pub const fn new(a: f64, b: f64, c: f64) -> Self {
        Self { a, b, c }
    }

    /// Linear scaling with no offset.
    pub const fn scale(b: f64) -> Self {
        Self::new(0.0, b, 0.0)
    }
}

impl Default for Coefficients {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// One telemetry line.
#[derive(Debug, Clone, PartialEq)]
pub enum Stanza {
    /// Sampled channel values
    Data { sequence: u32, values: [i64; CHANNELS] },
    /// Equation coefficients per channel
    Eqns {
        callsign: String,
        coefficients: [Coefficients; CHANNELS],
    },
    /// Channel names
    Parm {
        callsign: String,
        names: [String; CHANNELS],
    },
    /// Channel unit labels
    Unit {
        callsign: String,
        units: [String; CHANNELS],
    },
}

impl Stanza {
    /// DATA stanza; missing values are 0.
    pub fn data(sequence: u32, values: &[i64]) -> Self {
        let mut slots = [0; CHANNELS];
        for (slot, value) in slots.iter_mut().zip(values) {
            *slot = *value;
        }
        Stanza::Data {
            sequence,
            values: slots,
        }
    }

    /// EQNS stanza; missing channels use [`Coefficients::IDENTITY`].
    pub fn eqns(callsign: impl Into<String>, coefficients: &[Coefficients]) -> Self {
        let mut slots = [Coefficients::IDENTITY; CHANNELS];
        for (slot, coef) in slots.iter_mut().zip(coefficients) {
            *slot = *coef;
        }
        Stanza::Eqns {
            callsign: callsign.into(),
            coefficients: slots,
        }
    }

    /// PARM stanza; missing names become `Vx1`, `Vx2`, ...
    ///
    /// Placeholders are numbered from the first missing slot, so a list with
    /// no names gets `Vx1` through `Vx5` and the stanza still carries five
    /// fields like every other kind.
    pub fn parm<S: AsRef<str>>(callsign: impl Into<String>, names: &[S]) -> Self {
        let mut placeholders = (1..).map(|n| format!("Vx{}", n));
        let names = fill_labels(names, || placeholders.next().unwrap_or_default());
        Stanza::Parm {
            callsign: callsign.into(),
            names,
        }
    }

    /// UNIT stanza; missing labels are `U`.
    pub fn unit<S: AsRef<str>>(callsign: impl Into<String>, units: &[S]) -> Self {
        let units = fill_labels(units, || "U".to_string());
        Stanza::Unit {
            callsign: callsign.into(),
            units,
        }
    }

    /// Wire keyword of this stanza kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Stanza::Data { .. } => "DATA",
            Stanza::Eqns { .. } => "EQNS",
            Stanza::Parm { .. } => "PARM",
            Stanza::Unit { .. } => "UNIT",
        }
    }
}

fn fill_labels<S: AsRef<str>>(
    labels: &[S],
    mut filler: impl FnMut() -> String,
) -> [String; CHANNELS] {
    let mut given = labels.iter().map(|label| label.as_ref().trim().to_string());
    std::array::from_fn(|_| given.next().unwrap_or_else(&mut filler))
}

fn join<T: fmt::Display>(items: impl IntoIterator<Item = T>) -> String {
    items
        .into_iter()
        .map(|item| item.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

impl fmt::Display for Stanza {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stanza::Data { sequence, values } => {
                write!(f, "T#{:03},{},{}", sequence, join(values), DIGITAL_BITS)
            }
            Stanza::Eqns {
                callsign,
                coefficients,
            } => {
                let flat = coefficients.iter().flat_map(|c| [c.a, c.b, c.c]);
                write!(f, ":{:<9}:{}.{}", callsign, self.kind(), join(flat))
            }
            Stanza::Parm { callsign, names } => {
                write!(f, ":{:<9}:{}.{}", callsign, self.kind(), names.join(","))
            }
            Stanza::Unit { callsign, units } => {
                write!(f, ":{:<9}:{}.{}", callsign, self.kind(), units.join(","))
            }
        }
    }
}
