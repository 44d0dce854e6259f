//! Command line arguments

use clap::Parser;
use relay_bridge::BridgeConfig;
use relay_protocol::RELAY_ADDR;

/// Mirror an ALSA volume control onto a relay attenuator
#[derive(Debug, Parser)]
#[command(name = "relay-volume", version, about)]
pub struct Args {
    /// Mixer control that drives the relay (the user's volume knob)
    #[arg(short = 'i', long, default_value = "Master")]
    pub input_control: String,

    /// Mixer control held at full scale
    #[arg(short = 'o', long, default_value = "Digital")]
    pub output_control: String,

    /// Do not enforce a fixed gain on the output control
    #[arg(long)]
    pub no_output_control: bool,

    /// Sound card id or name
    #[arg(long, default_value = "BossDAC")]
    pub card: String,

    /// I2C bus device the relay board is attached to
    #[arg(long, default_value = "/dev/i2c-1")]
    pub i2c_bus: String,

    /// I2C address of the relay board (decimal or 0x-prefixed hex)
    #[arg(long, default_value_t = RELAY_ADDR, value_parser = parse_address)]
    pub address: u8,

    /// Delay between poll cycles in milliseconds
    #[arg(long, default_value_t = 100)]
    pub poll_interval_ms: u64,

    /// Delay after a failed poll cycle in milliseconds
    #[arg(long, default_value_t = 1000)]
    pub error_backoff_ms: u64,
}

impl Args {
    /// Output control to enforce, if any
    pub fn output_control(&self) -> Option<&str> {
        (!self.no_output_control).then_some(self.output_control.as_str())
    }

    /// Bridge configuration from the timing flags
    pub fn bridge_config(&self) -> BridgeConfig {
        BridgeConfig {
            poll_interval_ms: self.poll_interval_ms,
            error_backoff_ms: self.error_backoff_ms,
            ..Default::default()
        }
    }
}

fn parse_address(s: &str) -> Result<u8, String> {
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u8::from_str_radix(hex, 16),
        None => s.parse::<u8>(),
    };
    let address = parsed.map_err(|e| format!("invalid I2C address {s:?}: {e}"))?;
    if address > 0x7F {
        return Err(format!("I2C address 0x{address:02X} is outside the 7-bit range"));
    }
    Ok(address)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("relay-volume").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_defaults() {
        let args = parse(&[]);

        assert_eq!(args.input_control, "Master");
        assert_eq!(args.output_control(), Some("Digital"));
        assert_eq!(args.card, "BossDAC");
        assert_eq!(args.i2c_bus, "/dev/i2c-1");
        assert_eq!(args.address, 0x21);
        assert_eq!(args.bridge_config(), BridgeConfig::default());
    }

    #[test]
    fn test_short_flags() {
        let args = parse(&["-i", "PCM", "-o", "Amp"]);

        assert_eq!(args.input_control, "PCM");
        assert_eq!(args.output_control(), Some("Amp"));
    }

    #[test]
    fn test_no_output_control() {
        let args = parse(&["--no-output-control"]);
        assert_eq!(args.output_control(), None);
    }

    #[test]
    fn test_timing_flags() {
        let args = parse(&["--poll-interval-ms", "50", "--error-backoff-ms", "2000"]);
        let config = args.bridge_config();

        assert_eq!(config.poll_interval_ms, 50);
        assert_eq!(config.error_backoff_ms, 2000);
        assert_eq!(config.fixed_gain_percent, 100);
    }

    #[test]
    fn test_parse_address() {
        assert_eq!(parse_address("0x21"), Ok(0x21));
        assert_eq!(parse_address("0X27"), Ok(0x27));
        assert_eq!(parse_address("33"), Ok(33));
        assert!(parse_address("0x80").is_err());
        assert!(parse_address("relay").is_err());
    }
}
