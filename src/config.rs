//! Pin assignments.
//!
//! Defaults match the reference wiring. Any of them can be overridden at
//! build time by putting `BUTTON_GPIO`, `BUZZER_GPIO`, `OLED_SDA_GPIO` or
//! `OLED_SCL_GPIO` in a `.env` file next to Cargo.toml; `build.rs` forwards
//! those into the compile environment.

use anyhow::{anyhow, bail, Result};

/// GPIO numbers for every signal the player drives or reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PinMap {
    /// Play/stop button: input, pull-up, active-low.
    pub button: u8,
    /// Piezo buzzer: PWM output.
    pub buzzer: u8,
    /// OLED I2C data.
    pub sda: u8,
    /// OLED I2C clock.
    pub scl: u8,
}

impl Default for PinMap {
    fn default() -> Self {
        Self {
            button: 2,
            buzzer: 18,
            sda: 21,
            scl: 22,
        }
    }
}

/// Highest GPIO number on the ESP32.
const MAX_GPIO: u8 = 39;
/// GPIO34..=39 are input-only and have no internal pull resistors.
const FIRST_INPUT_ONLY: u8 = 34;
/// GPIO6..=11 are wired to the SPI flash.
const FLASH_PINS: std::ops::RangeInclusive<u8> = 6..=11;
/// Gaps in the ESP32 GPIO numbering.
const MISSING_PINS: [u8; 6] = [20, 24, 28, 29, 30, 31];

impl PinMap {
    /// Defaults with the overrides baked in by `build.rs`.
    pub fn from_build_env() -> Result<Self> {
        Self::from_overrides(
            option_env!("BUTTON_GPIO"),
            option_env!("BUZZER_GPIO"),
            option_env!("OLED_SDA_GPIO"),
            option_env!("OLED_SCL_GPIO"),
        )
    }

    /// Defaults with any given override parsed in, then validated.
    pub fn from_overrides(
        button: Option<&str>,
        buzzer: Option<&str>,
        sda: Option<&str>,
        scl: Option<&str>,
    ) -> Result<Self> {
        let defaults = Self::default();
        let map = Self {
            button: parse_gpio("BUTTON_GPIO", button, defaults.button)?,
            buzzer: parse_gpio("BUZZER_GPIO", buzzer, defaults.buzzer)?,
            sda: parse_gpio("OLED_SDA_GPIO", sda, defaults.sda)?,
            scl: parse_gpio("OLED_SCL_GPIO", scl, defaults.scl)?,
        };
        map.validate()?;
        Ok(map)
    }

    /// Every pin must exist, be usable in its direction, and be used once.
    pub fn validate(&self) -> Result<()> {
        let named = [
            ("button", self.button),
            ("buzzer", self.buzzer),
            ("SDA", self.sda),
            ("SCL", self.scl),
        ];

        // The button needs its pull-up and the rest drive the line, so every
        // signal needs a full I/O pin.
        for (i, &(name, pin)) in named.iter().enumerate() {
            if pin > MAX_GPIO || MISSING_PINS.contains(&pin) {
                bail!("GPIO{pin} ({name}) does not exist");
            }
            if FLASH_PINS.contains(&pin) {
                bail!("GPIO{pin} ({name}) is reserved for flash");
            }
            if pin >= FIRST_INPUT_ONLY {
                bail!("GPIO{pin} ({name}) is input-only");
            }
            if let Some(&(other, _)) = named[..i].iter().find(|(_, p)| *p == pin) {
                bail!("GPIO{pin} is assigned to both {other} and {name}");
            }
        }
        Ok(())
    }
}

fn parse_gpio(key: &str, value: Option<&str>, default: u8) -> Result<u8> {
    match value {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| anyhow!("{key}={raw:?} is not a GPIO number")),
    }
}
