use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::classify::MIDI_MAX;
use crate::color::ColorRamp;
use crate::{KeylightError, Result};

/// Top-level configuration structure for the application.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Name of the MIDI input port to open once it appears.
    pub device_name: String,
    pub ramp: ColorRamp,
    pub polling: PollPolicy,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            device_name: "CASIO USB-MIDI MIDI 1".to_string(),
            ramp: ColorRamp::default(),
            polling: PollPolicy::default(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from a JSON file. Omitted fields keep their
    /// defaults; the result is validated before it is returned.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.device_name.is_empty() {
            return Err(KeylightError::config("device name must not be empty"));
        }
        if self.ramp.note_low >= self.ramp.note_high {
            return Err(KeylightError::config(
                "note_low must be below note_high",
            ));
        }
        if self.ramp.velocity_low >= self.ramp.velocity_high {
            return Err(KeylightError::config(
                "velocity_low must be below velocity_high",
            ));
        }
        if self.ramp.note_high > MIDI_MAX || self.ramp.velocity_high > MIDI_MAX {
            return Err(KeylightError::config(
                "ramp bounds must stay within the MIDI range 0-127",
            ));
        }
        if self.polling.interval_ms == 0 {
            return Err(KeylightError::config("poll interval must be non-zero"));
        }
        Ok(())
    }
}

/// How the dispatcher waits for an external device to appear.
///
/// Systems usually expose a couple of virtual ports (software synths,
/// through ports) even with no keyboard attached; `baseline_ports` is how
/// many of those to discount before a port counts as a real device.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct PollPolicy {
    /// Ports that are always present and never the device we wait for.
    pub baseline_ports: usize,
    /// Milliseconds between enumeration rounds.
    pub interval_ms: u64,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            baseline_ports: 2,
            interval_ms: 1_000,
        }
    }
}

impl PollPolicy {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_a_full_size_keyboard() {
        let config = AppConfig::default();
        assert_eq!(config.ramp.note_low, 21);
        assert_eq!(config.ramp.note_high, 108);
        assert_eq!(config.ramp.velocity_low, 10);
        assert_eq!(config.ramp.velocity_high, 100);
        assert_eq!(config.polling.baseline_ports, 2);
        assert_eq!(config.polling.interval(), Duration::from_secs(1));
        config.validate().unwrap();
    }

    #[test]
    fn partial_json_keeps_defaults_for_omitted_fields() {
        let config: AppConfig =
            serde_json::from_str(r#"{ "device_name": "Test Keyboard" }"#).unwrap();
        assert_eq!(config.device_name, "Test Keyboard");
        assert_eq!(config.ramp, ColorRamp::default());
    }

    #[test]
    fn rejects_inverted_bounds() {
        let mut config = AppConfig::default();
        config.ramp.note_low = 108;
        config.ramp.note_high = 21;
        assert!(matches!(
            config.validate(),
            Err(KeylightError::Config(_))
        ));

        let mut config = AppConfig::default();
        config.ramp.velocity_low = 100;
        config.ramp.velocity_high = 10;
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_empty_device_name_and_zero_interval() {
        let mut config = AppConfig::default();
        config.device_name.clear();
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.polling.interval_ms = 0;
        assert!(config.validate().is_err());
    }
}
