//! Time and randomness, the two platform services the core asks for directly.

/// Monotonic milliseconds, wrapping at `u32::MAX`.
pub trait Clock {
    fn now_ms(&self) -> u32;
}

/// Source of song-selection randomness. Uniformity is not required.
pub trait Entropy {
    fn rand32(&mut self) -> u32;
}

#[cfg(target_os = "espidf")]
pub use esp::{BootClock, HardwareRng};

#[cfg(target_os = "espidf")]
mod esp {
    use std::time::Instant;

    use super::{Clock, Entropy};

    /// Milliseconds since the clock was created.
    pub struct BootClock {
        epoch: Instant,
    }

    impl BootClock {
        pub fn new() -> Self {
            Self {
                epoch: Instant::now(),
            }
        }
    }

    impl Default for BootClock {
        fn default() -> Self {
            Self::new()
        }
    }

    impl Clock for BootClock {
        fn now_ms(&self) -> u32 {
            // Truncation is the wrap.
            self.epoch.elapsed().as_millis() as u32
        }
    }

    /// The chip's hardware RNG.
    pub struct HardwareRng;

    impl Entropy for HardwareRng {
        fn rand32(&mut self) -> u32 {
            // Safety: esp_random has no preconditions and is callable from any task.
            unsafe { esp_idf_svc::sys::esp_random() }
        }
    }
}
