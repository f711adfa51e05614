//! Piezo buzzer driver.
//!
//! A passive piezo needs a square wave to produce sound, so the buzzer sits
//! on one PWM channel at 50% duty and the channel's timer frequency is
//! changed per note. Duty 0 is silence.

use log::{error, warn};

/// Lowest frequency the buzzer is asked to produce.
pub const MIN_TONE_HZ: u32 = 20;
/// Highest frequency the buzzer is asked to produce.
pub const MAX_TONE_HZ: u32 = 20_000;

/// One PWM channel and the timer that clocks it.
pub trait Pwm {
    /// Reprogram the timer frequency.
    fn set_frequency(&mut self, hz: u32) -> anyhow::Result<()>;

    /// Set and latch the channel duty.
    fn set_duty(&mut self, duty: u32) -> anyhow::Result<()>;

    /// Full-scale duty value for the configured resolution.
    fn max_duty(&self) -> u32;
}

/// A missing channel (bring-up failed) accepts everything and stays silent.
impl<P: Pwm> Pwm for Option<P> {
    fn set_frequency(&mut self, hz: u32) -> anyhow::Result<()> {
        match self {
            Some(pwm) => pwm.set_frequency(hz),
            None => Ok(()),
        }
    }

    fn set_duty(&mut self, duty: u32) -> anyhow::Result<()> {
        match self {
            Some(pwm) => pwm.set_duty(duty),
            None => Ok(()),
        }
    }

    fn max_duty(&self) -> u32 {
        self.as_ref().map_or(0, Pwm::max_duty)
    }
}

/// Something that can sound a single pitch at a time.
pub trait Tone {
    /// Sound `freq_hz`, or go silent when it is 0.
    fn play_tone(&mut self, freq_hz: u32);

    fn stop_tone(&mut self) {
        self.play_tone(0);
    }
}

/// Turns pitches into PWM updates. Failures are logged, never returned.
pub struct ToneDriver<P> {
    pwm: P,
}

impl<P: Pwm> ToneDriver<P> {
    pub fn new(pwm: P) -> Self {
        Self { pwm }
    }

    pub fn pwm(&self) -> &P {
        &self.pwm
    }

    fn silence(&mut self) {
        if let Err(e) = self.pwm.set_duty(0) {
            error!("Failed to silence buzzer: {e:#}");
        }
    }
}

impl<P: Pwm> Tone for ToneDriver<P> {
    fn play_tone(&mut self, freq_hz: u32) {
        if freq_hz == 0 {
            self.silence();
            return;
        }

        let clamped = freq_hz.clamp(MIN_TONE_HZ, MAX_TONE_HZ);
        if clamped != freq_hz {
            warn!("Tone {freq_hz} Hz out of range, playing {clamped} Hz");
        }

        // Never leave the previous pitch sounding if the timer rejects this one
        if let Err(e) = self.pwm.set_frequency(clamped) {
            error!("Failed to set buzzer frequency {clamped} Hz: {e:#}");
            self.silence();
            return;
        }

        let half = self.pwm.max_duty() / 2;
        if let Err(e) = self.pwm.set_duty(half) {
            error!("Failed to set buzzer duty: {e:#}");
        }
    }
}

#[cfg(target_os = "espidf")]
pub use ledc::LedcPwm;

#[cfg(target_os = "espidf")]
mod ledc {
    use esp_idf_svc::hal::gpio::OutputPin;
    use esp_idf_svc::hal::ledc::config::{Resolution, TimerConfig};
    use esp_idf_svc::hal::ledc::{LedcDriver, LedcTimerDriver, CHANNEL0, TIMER0};
    use esp_idf_svc::hal::peripheral::Peripheral;
    use esp_idf_svc::hal::prelude::*;

    use super::Pwm;

    /// Frequency the timer is configured with before the first note.
    const INITIAL_HZ: u32 = 440;

    /// LEDC timer0 + channel0 in low-speed mode, 13-bit resolution.
    pub struct LedcPwm {
        timer: LedcTimerDriver<'static, TIMER0>,
        channel: LedcDriver<'static>,
    }

    impl LedcPwm {
        /// Takes ownership of the LEDC timer0, channel0, and the buzzer GPIO pin.
        /// The channel starts silent.
        pub fn new(
            timer: TIMER0,
            channel: CHANNEL0,
            pin: impl Peripheral<P = impl OutputPin> + 'static,
        ) -> anyhow::Result<Self> {
            let timer = LedcTimerDriver::new(
                timer,
                &TimerConfig::default()
                    .frequency(INITIAL_HZ.Hz().into())
                    .resolution(Resolution::Bits13),
            )?;

            let mut channel = LedcDriver::new(channel, &timer, pin)?;
            channel.set_duty(0)?;

            Ok(Self { timer, channel })
        }
    }

    impl Pwm for LedcPwm {
        fn set_frequency(&mut self, hz: u32) -> anyhow::Result<()> {
            self.timer.set_frequency(Hertz(hz))?;
            Ok(())
        }

        fn set_duty(&mut self, duty: u32) -> anyhow::Result<()> {
            self.channel.set_duty(duty)?;
            Ok(())
        }

        fn max_duty(&self) -> u32 {
            self.channel.get_max_duty()
        }
    }
}
