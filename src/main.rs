#[cfg(target_os = "espidf")]
fn main() -> anyhow::Result<()> {
    firmware::run()
}

#[cfg(not(target_os = "espidf"))]
fn main() {
    eprintln!("hbd-player is ESP32 firmware: build it for an espidf target and flash it");
}

#[cfg(target_os = "espidf")]
mod firmware {
    use anyhow::{anyhow, Result};
    use esp_idf_svc::hal::delay::FreeRtos;
    use esp_idf_svc::hal::gpio::{AnyIOPin, Input, PinDriver, Pins, Pull};
    use esp_idf_svc::hal::i2c::{I2cConfig, I2cDriver};
    use esp_idf_svc::hal::peripherals::Peripherals;
    use esp_idf_svc::hal::prelude::*;
    use esp_idf_svc::log::EspLogger;
    use esp_idf_svc::nvs::EspDefaultNvsPartition;
    use log::{error, info, warn};

    use hbd_player::button::Button;
    use hbd_player::buzzer::{LedcPwm, ToneDriver};
    use hbd_player::config::PinMap;
    use hbd_player::jukebox::{Jukebox, LOOP_PERIOD_MS};
    use hbd_player::melody::LIBRARY;
    use hbd_player::oled::{self, Ssd1306};
    use hbd_player::platform::{BootClock, Clock, HardwareRng};
    use hbd_player::player::Player;

    // ── Main ───────────────────────────────────────────────────────────────

    pub fn run() -> Result<()> {
        // ESP-IDF boilerplate
        esp_idf_svc::sys::link_patches();
        EspLogger::initialize_default();

        info!("hbd-player starting up");

        // NVS has to be up before the RNG and peripheral subsystems. Keep the
        // handle alive for the whole run.
        let _nvs = match EspDefaultNvsPartition::take() {
            Ok(nvs) => Some(nvs),
            Err(e) => {
                error!("NVS init failed: {e}");
                None
            }
        };

        let peripherals = Peripherals::take()?;
        let mut gpio = io_pins(peripherals.pins);

        let pins = PinMap::from_build_env().unwrap_or_else(|e| {
            warn!("Pin configuration rejected ({e:#}), using defaults");
            PinMap::default()
        });
        info!(
            "Pins: button GPIO{}, buzzer GPIO{}, SDA GPIO{}, SCL GPIO{}",
            pins.button, pins.buzzer, pins.sda, pins.scl
        );

        // ── Button ─────────────────────────────────────────────────────────
        let button = match take_pin(&mut gpio, pins.button).and_then(button_input) {
            Ok(pin) => Button::new(pin),
            Err(e) => {
                error!("Button init failed on GPIO{}: {e:#}", pins.button);
                Button::detached()
            }
        };

        // ── Buzzer ─────────────────────────────────────────────────────────
        let pwm = match take_pin(&mut gpio, pins.buzzer).and_then(|pin| {
            LedcPwm::new(peripherals.ledc.timer0, peripherals.ledc.channel0, pin)
        }) {
            Ok(pwm) => Some(pwm),
            Err(e) => {
                error!("Buzzer init failed on GPIO{}: {e:#}", pins.buzzer);
                None
            }
        };

        // ── Display ────────────────────────────────────────────────────────
        let i2c_config = I2cConfig::new()
            .baudrate(oled::BUS_HZ.Hz().into())
            .sda_enable_pullup(true)
            .scl_enable_pullup(true);
        let bus = take_pin(&mut gpio, pins.sda).and_then(|sda| {
            let scl = take_pin(&mut gpio, pins.scl)?;
            Ok(I2cDriver::new(peripherals.i2c0, sda, scl, &i2c_config)?)
        });
        // Held for the life of the loop so the bus stays configured.
        let _display = match bus {
            Ok(bus) => {
                let mut display = Ssd1306::new(bus);
                // Each step already logged its own failure.
                let _ = display.show_greeting();
                Some(display)
            }
            Err(e) => {
                error!("I2C init failed: {e:#}");
                None
            }
        };

        info!("ESP32 Birthday Player Ready!");

        // ── Main loop ──────────────────────────────────────────────────────
        let clock = BootClock::new();
        let player = Player::new(ToneDriver::new(pwm), &LIBRARY);
        let mut jukebox = Jukebox::new(button, player, HardwareRng);

        loop {
            jukebox.step(clock.now_ms());
            FreeRtos::delay_ms(LOOP_PERIOD_MS);
        }
    }

    /// Active-low button with the internal pull-up holding it high when idle.
    fn button_input(pin: AnyIOPin) -> Result<PinDriver<'static, AnyIOPin, Input>> {
        let mut driver = PinDriver::input(pin)?;
        driver.set_pull(Pull::Up)?;
        Ok(driver)
    }

    // ── Pin mapping helpers ────────────────────────────────────────────────
    // The pin map holds GPIO numbers; these turn a number into the matching
    // field of the Peripherals pins struct. Each field moves into the pool
    // once, so a pin can only be handed out once.

    type IoPins = [Option<AnyIOPin>; 40];

    macro_rules! match_gpio_pool {
        ($pins:expr, [ $($n:literal => $field:ident),+ $(,)? ]) => {{
            let mut pool: IoPins = std::array::from_fn(|_| None);
            $( pool[$n] = Some($pins.$field.into()); )+
            pool
        }};
    }

    /// Every ESP32 pin that can both drive and read a line. Flash pins
    /// (6-11) and the input-only bank (34-39) are left out.
    fn io_pins(pins: Pins) -> IoPins {
        match_gpio_pool!(pins, [
            0 => gpio0, 1 => gpio1, 2 => gpio2, 3 => gpio3,
            4 => gpio4, 5 => gpio5, 12 => gpio12, 13 => gpio13,
            14 => gpio14, 15 => gpio15, 16 => gpio16, 17 => gpio17,
            18 => gpio18, 19 => gpio19, 21 => gpio21, 22 => gpio22,
            23 => gpio23, 25 => gpio25, 26 => gpio26, 27 => gpio27,
            32 => gpio32, 33 => gpio33,
        ])
    }

    fn take_pin(pool: &mut IoPins, num: u8) -> Result<AnyIOPin> {
        pool.get_mut(num as usize)
            .and_then(Option::take)
            .ok_or_else(|| anyhow!("GPIO{num} is not a free I/O pin"))
    }
}
