//! Falling-edge detector for the active-low play/stop button.
//!
//! The line is sampled once per main-loop iteration; there is no debouncing
//! beyond that, the 50 ms loop period absorbs contact bounce.

use embedded_hal::digital::InputPin;
use log::error;

/// The button went from released (high) to pressed (low) since the last sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Press;

pub struct Button<P> {
    pin: Option<P>,
    last_level: bool,
}

impl<P: InputPin> Button<P> {
    /// Monitor `pin`, assuming it idles high through its pull-up.
    pub fn new(pin: P) -> Self {
        Self {
            pin: Some(pin),
            last_level: true,
        }
    }

    /// A monitor with no line behind it; it never reports a press.
    pub fn detached() -> Self {
        Self {
            pin: None,
            last_level: true,
        }
    }

    /// Read the line once and report a press on a high-to-low transition.
    pub fn sample(&mut self) -> Option<Press> {
        let pin = self.pin.as_mut()?;
        let level = match pin.is_high() {
            Ok(level) => level,
            Err(e) => {
                error!("Button read failed: {e:?}");
                return None;
            }
        };

        let pressed = self.last_level && !level;
        self.last_level = level;
        pressed.then_some(Press)
    }
}
