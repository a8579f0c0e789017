use std::path::PathBuf;

use clap::Parser;

/// Live serial plotter and logger for a CH4 gas sensor.
///
/// Reads one sample per line from the microcontroller (comma-separated
/// when two sensors are attached), plots a rolling window and appends
/// every reading to the sample log.
#[derive(Parser, Debug, Clone)]
#[command(name = "ch4scope", version)]
pub struct MonitorConfig {
    /// Serial device the microcontroller is attached to
    #[arg(long, default_value = "/dev/ttyACM0")]
    pub device: String,

    /// Baud rate (the sensor sketch runs 9600, maybe 115200)
    #[arg(long, default_value_t = 9600)]
    pub baud: u32,

    /// Sensor channels per line: 1 (bare value) or 2 (comma-separated)
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u8).range(1..=2))]
    pub channels: u8,

    /// Samples kept on screen; 0 removes the limit (unbounded memory)
    #[arg(long, default_value_t = 1000)]
    pub window: usize,

    /// Append-only sample log
    #[arg(long, default_value = "serial.log")]
    pub log_file: PathBuf,
}

impl MonitorConfig {
    pub fn capacity(&self) -> Option<usize> {
        (self.window > 0).then_some(self.window)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_sensor_setup() {
        let cfg = MonitorConfig::try_parse_from(["ch4scope"]).unwrap();
        assert_eq!(cfg.device, "/dev/ttyACM0");
        assert_eq!(cfg.baud, 9600);
        assert_eq!(cfg.channels, 1);
        assert_eq!(cfg.capacity(), Some(1000));
        assert_eq!(cfg.log_file, PathBuf::from("serial.log"));
    }

    #[test]
    fn window_zero_means_unbounded() {
        let cfg = MonitorConfig::try_parse_from(["ch4scope", "--window", "0"]).unwrap();
        assert_eq!(cfg.capacity(), None);
    }

    #[test]
    fn channels_limited_to_one_or_two() {
        assert!(MonitorConfig::try_parse_from(["ch4scope", "--channels", "2"]).is_ok());
        assert!(MonitorConfig::try_parse_from(["ch4scope", "--channels", "3"]).is_err());
        assert!(MonitorConfig::try_parse_from(["ch4scope", "--channels", "0"]).is_err());
    }
}
