use std::fs::{File, OpenOptions};
use std::io::Write;
use std::os::unix::fs::FileExt;
use std::path::{Path, PathBuf};

use ledpwm_cycle::{CycleError, IndicatorId, IndicatorSink, LedState};
use log::{debug, info, warn};

use crate::error::{PlatformError, Result};
use crate::{has_attr, read_attr_string, read_attr_u32, to_device, write_attr_string};

/// sysfs led name for the XKB default indicator numbers
pub fn indicator_name(number: u8) -> Option<&'static str> {
    match number {
        1 => Some("capslock"),
        2 => Some("numlock"),
        3 => Some("scrolllock"),
        4 => Some("compose"),
        5 => Some("kana"),
        _ => None,
    }
}

/// Glob for the led sysnames to drive. `input` restricts the match to one
/// input device, such as `input3`.
pub fn sysname_pattern(indicator: IndicatorId, input: Option<&str>) -> Result<String> {
    let input = input.unwrap_or("input*");
    match indicator.number() {
        Some(n) => {
            let name = indicator_name(n).ok_or(PlatformError::UnknownIndicator(n))?;
            Ok(format!("{input}::{name}"))
        }
        None => Ok(format!("{input}::*")),
    }
}

/// Pull the active entry out of a trigger list like `none [kbd-capslock] ...`
pub fn active_trigger(triggers: &str) -> Option<&str> {
    let start = triggers.find('[')? + 1;
    let end = start + triggers[start..].find(']')?;
    let active = &triggers[start..end];
    if active.is_empty() || active == "none" {
        return None;
    }
    Some(active)
}

#[derive(Debug)]
struct IndicatorLed {
    name: String,
    syspath: PathBuf,
    brightness: File,
    on_value: String,
    trigger: Option<String>,
}

impl IndicatorLed {
    fn open(syspath: &Path) -> Result<Self> {
        let device = to_device(syspath)?;
        let name = device.sysname().to_string_lossy().to_string();

        let max = read_attr_u32(&device, "max_brightness").unwrap_or_else(|e| {
            warn!("{name}: {e}, using 1 for on");
            1
        });
        let trigger = if has_attr(&device, "trigger") {
            read_attr_string(&device, "trigger")
                .ok()
                .and_then(|t| active_trigger(&t).map(|t| t.to_owned()))
        } else {
            None
        };

        let path = syspath.join("brightness");
        let brightness = OpenOptions::new()
            .write(true)
            .open(&path)
            .map_err(|e| PlatformError::Open(path.to_string_lossy().to_string(), e))?;

        debug!("Opened {name}, on value {max}, trigger {trigger:?}");
        Ok(Self {
            name,
            syspath: syspath.to_owned(),
            brightness,
            on_value: max.max(1).to_string(),
            trigger,
        })
    }

    fn write(&mut self, state: LedState) -> Result<()> {
        let value = match state {
            LedState::On => self.on_value.as_str(),
            LedState::Off => "0",
        };
        // sysfs attributes are rewritten whole, always from the start
        self.brightness
            .write_all_at(value.as_bytes(), 0)
            .map_err(|e| PlatformError::Write(self.name.clone(), e))
    }

    fn restore_trigger(&self) -> Result<()> {
        if let Some(trigger) = &self.trigger {
            let mut device = to_device(&self.syspath)?;
            write_attr_string(&mut device, "trigger", trigger)?;
            debug!("{}: restored trigger {trigger}", self.name);
        }
        Ok(())
    }
}

/// The keyboard leds behind one indicator id. Writing `brightness` detaches
/// whatever trigger the kernel had on the led.
///
/// With [`KeyboardIndicators::restore_triggers`] the saved trigger is put
/// back on disconnect, after the final off. A trigger such as
/// `kbd-capslock` then relights the led if caps lock is active, so the led
/// is not guaranteed to stay off. Left disabled the led stays off and the
/// trigger stays detached.
#[derive(Debug)]
pub struct KeyboardIndicators {
    indicator: IndicatorId,
    leds: Vec<IndicatorLed>,
    restore_triggers: bool,
}

impl KeyboardIndicators {
    pub fn connect(indicator: IndicatorId, input: Option<&str>) -> Result<Self> {
        let pattern = sysname_pattern(indicator, input)?;

        let mut enumerator = udev::Enumerator::new().map_err(|err| {
            warn!("{}", err);
            PlatformError::Udev("enumerator failed".into(), err)
        })?;

        enumerator.match_subsystem("leds").map_err(|err| {
            warn!("{}", err);
            PlatformError::Udev("match_subsystem failed".into(), err)
        })?;

        enumerator.match_sysname(&pattern).map_err(|err| {
            warn!("{}", err);
            PlatformError::Udev("match_sysname failed".into(), err)
        })?;

        let mut leds = Vec::new();
        for device in enumerator.scan_devices().map_err(|err| {
            warn!("{}", err);
            PlatformError::Udev("scan_devices failed".into(), err)
        })? {
            leds.push(IndicatorLed::open(device.syspath())?);
        }

        if leds.is_empty() {
            return Err(PlatformError::MissingIndicator(pattern));
        }
        info!(
            "Using {}",
            leds.iter()
                .map(|l| l.name.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        );
        Ok(Self {
            indicator,
            leds,
            restore_triggers: false,
        })
    }

    /// Put the saved kernel triggers back on disconnect
    pub fn restore_triggers(mut self, restore: bool) -> Self {
        self.restore_triggers = restore;
        self
    }

    pub fn names(&self) -> Vec<&str> {
        self.leds.iter().map(|l| l.name.as_str()).collect()
    }

    /// Turning on stops at the first failure. Turning off still tries
    /// every led and reports the first failure.
    fn set_all(&mut self, state: LedState) -> Result<()> {
        let mut result = Ok(());
        for led in &mut self.leds {
            if let Err(e) = led.write(state) {
                if state == LedState::On {
                    return Err(e);
                }
                warn!("{}: could not switch off: {e}", led.name);
                if result.is_ok() {
                    result = Err(e);
                }
            }
        }
        result
    }
}

impl IndicatorSink for KeyboardIndicators {
    fn set_state(&mut self, indicator: IndicatorId, state: LedState) -> ledpwm_cycle::Result<()> {
        if indicator != self.indicator {
            return Err(PlatformError::WrongIndicator(format!(
                "opened for {}, asked for {indicator}",
                self.indicator
            ))
            .into_sink());
        }
        self.set_all(state).map_err(PlatformError::into_sink)
    }

    fn flush(&mut self) -> ledpwm_cycle::Result<()> {
        for led in &mut self.leds {
            led.brightness
                .flush()
                .map_err(|e| PlatformError::Write(led.name.clone(), e).into_sink())?;
        }
        Ok(())
    }

    fn disconnect(&mut self) -> ledpwm_cycle::Result<()> {
        if !self.restore_triggers {
            self.leds.clear();
            return Ok(());
        }
        let mut result: std::result::Result<(), CycleError> = Ok(());
        for led in self.leds.drain(..) {
            if let Err(e) = led.restore_trigger() {
                warn!("{}: could not restore trigger: {e}", led.name);
                result = Err(e.into_sink());
            }
        }
        result
    }
}
