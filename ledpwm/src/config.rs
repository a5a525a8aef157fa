use std::path::PathBuf;

use config_traits::{StdConfig, StdConfigLoad1};
use ledpwm_cycle::{CycleParams, TimerKind};
use serde_derive::{Deserialize, Serialize};

use crate::cli_opts::CliStart;

pub const CONFIG_FILE: &str = "ledpwm.ron";

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    /// Timing and fade tuning
    pub cycle: CycleParams,
    /// Input device to restrict to when `--input` isn't given
    pub input: Option<String>,
    /// Busy-wait instead of sleeping
    pub spin: bool,
    /// Hand the led back to its kernel trigger on exit, which may relight it
    pub restore_trigger: bool,
}

impl Config {
    /// Command line options win over the file
    pub fn apply_cli(&mut self, cli: &CliStart) {
        if let Some(hz) = cli.frequency {
            self.cycle.nominal_hz = hz;
        }
        if let Some(period) = cli.period {
            self.cycle.period_us = Some(period);
        }
        if let Some(input) = &cli.input {
            self.input = Some(input.clone());
        }
        self.spin |= cli.spin;
        self.restore_trigger |= cli.restore_trigger;
    }

    pub fn timer(&self) -> TimerKind {
        if self.spin {
            TimerKind::Spin
        } else {
            TimerKind::Sleep
        }
    }
}

impl StdConfig for Config {
    fn new() -> Self {
        Self::default()
    }

    fn file_name(&self) -> String {
        CONFIG_FILE.to_owned()
    }

    fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("/tmp"))
            .join("ledpwm")
    }
}

impl StdConfigLoad1 for Config {}

#[cfg(test)]
mod tests {
    use config_traits::ron;

    use super::*;

    #[test]
    fn cli_overrides() {
        let mut config = Config {
            input: Some("input1".into()),
            ..Default::default()
        };
        let cli = CliStart {
            period: Some(5000),
            frequency: Some(1000.0),
            input: Some("input7".into()),
            spin: true,
            restore_trigger: true,
            ..Default::default()
        };
        config.apply_cli(&cli);
        assert!(config.restore_trigger);
        assert_eq!(config.cycle.period(), 5000);
        assert_eq!(config.cycle.ramp_interval(), 5);
        assert_eq!(config.input.as_deref(), Some("input7"));
        assert_eq!(config.timer(), TimerKind::Spin);
    }

    #[test]
    fn file_values_kept_without_cli() {
        let mut config = Config {
            input: Some("input1".into()),
            ..Default::default()
        };
        config.apply_cli(&CliStart::default());
        assert_eq!(config.input.as_deref(), Some("input1"));
        assert_eq!(config.cycle, CycleParams::default());
        assert_eq!(config.timer(), TimerKind::Sleep);
        assert!(!config.restore_trigger);
    }

    #[test]
    fn defaults_through_ron() {
        let text = ron::ser::to_string_pretty(&Config::default(), Default::default()).unwrap();
        let back: Config = ron::from_str(&text).unwrap();
        assert_eq!(back, Config::default());

        let partial: Config = ron::from_str("(cycle: (ramp: (up: 1.5, down: 0.5)))").unwrap();
        assert_eq!(partial.cycle.ramp.up, 1.5);
        assert_eq!(partial.cycle.nominal_hz, 500.0);
        assert_eq!(partial.cycle.fade_seed, 0.1);
    }
}
