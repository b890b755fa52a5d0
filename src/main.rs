//! iGate Telem - APRS station telemetry binary
//!
//! Prints one APRS telemetry stanza on standard output. Run it from cron and
//! pipe the output into an APRS client.

use anyhow::Context;
use clap::{ArgGroup, Parser};
use igate_telem::{
    config::validate_callsign, Command, Profile, Telemetry, TelemetryConfig, DEFAULT_CALLSIGN,
};
use std::path::PathBuf;
use tracing::level_filters::LevelFilter;
use tracing::{debug, warn, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser)]
#[command(name = "igate_telem")]
#[command(about = "Send iGate or digipeater telemetry through APRS")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(group(
    ArgGroup::new("stanza")
        .required(true)
        .args(["data", "eqns", "param", "unit"])
))]
struct Cli {
    /// Send the APRS data
    #[arg(short, long)]
    data: bool,

    /// Send the APRS equation
    #[arg(short, long)]
    eqns: bool,

    /// Send the APRS param
    #[arg(short, long)]
    param: bool,

    /// Send the APRS units
    #[arg(short, long)]
    unit: bool,

    /// iGate full callsign with SSID
    #[arg(
        short,
        long,
        env = "IGATE_CALLSIGN",
        default_value = DEFAULT_CALLSIGN,
        value_parser = validate_callsign
    )]
    callsign: String,

    /// Report load, temperature and memory only, with a plain-text sequence file
    #[arg(long)]
    basic: bool,

    /// Directory for persisted counters [default: $XDG_RUNTIME_DIR or /tmp]
    #[arg(long, value_name = "DIR")]
    state_dir: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,
}

impl Cli {
    fn command(&self) -> Command {
        if self.data {
            Command::Data
        } else if self.eqns {
            Command::Eqns
        } else if self.param {
            Command::Param
        } else {
            Command::Unit
        }
    }

    fn config(&self) -> TelemetryConfig {
        let profile = if self.basic {
            Profile::Basic
        } else {
            Profile::Network
        };
        let mut config = TelemetryConfig::default()
            .with_callsign(&self.callsign)
            .with_profile(profile);
        if let Some(dir) = &self.state_dir {
            config = config.with_state_dir(dir);
        }
        config
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(&cli)?;

    let config = cli.config();
    let command = cli.command();
    if command != Command::Data && config.is_default_callsign() {
        warn!(
            "callsign not configured, using {}; set --callsign or IGATE_CALLSIGN",
            DEFAULT_CALLSIGN
        );
    }
    debug!("running {:?} with {:?}", command, config);

    let telemetry = Telemetry::new(config);
    println!("{}", telemetry.run(command));

    Ok(())
}

/// Logs go to stderr; stdout carries the stanza.
fn init_logging(cli: &Cli) -> anyhow::Result<()> {
    let level = if cli.debug {
        Level::DEBUG
    } else if cli.verbose {
        Level::INFO
    } else {
        Level::WARN
    };

    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(level).into())
        .from_env_lossy();

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber).context("failed to install logger")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::try_parse_from(["igate_telem", "-d"]).unwrap();
        assert_eq!(cli.command(), Command::Data);

        let cli = Cli::try_parse_from(["igate_telem", "--unit", "-c", "w6bsd-5"]).unwrap();
        assert_eq!(cli.command(), Command::Unit);
        assert_eq!(cli.callsign, "W6BSD-5");
    }

    #[test]
    fn test_command_is_required() {
        let err = Cli::try_parse_from(["igate_telem"]).err().unwrap();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
        assert_ne!(err.exit_code(), 0);
    }

    #[test]
    fn test_commands_are_exclusive() {
        let err = Cli::try_parse_from(["igate_telem", "-d", "-e"]).err().unwrap();
        assert_eq!(err.kind(), ErrorKind::ArgumentConflict);
    }

    #[test]
    fn test_invalid_callsign_rejected() {
        let result = Cli::try_parse_from(["igate_telem", "-p", "--callsign", "TOOLONGCALL-1"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_config_from_flags() {
        let cli = Cli::try_parse_from([
            "igate_telem",
            "-e",
            "--basic",
            "--state-dir",
            "/var/lib/igate",
        ])
        .unwrap();
        let config = cli.config();
        assert_eq!(config.profile, Profile::Basic);
        assert_eq!(config.sequence_path(), PathBuf::from("/var/lib/igate/aprs_seq.dat"));
    }
}
