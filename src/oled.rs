//! SSD1306 128×64 OLED over I2C.
//!
//! Every bus transaction is `address, control byte, payload`; the control
//! byte selects commands (0x00) or display RAM data (0x40). The framebuffer
//! is addressed by page (8-pixel-tall stripe) and column, one byte per column.

use std::fmt::Debug;

use anyhow::anyhow;
use log::{error, info};

/// 7-bit bus address of the controller.
pub const ADDRESS: u8 = 0x3C;
/// Bus clock the controller is driven at.
pub const BUS_HZ: u32 = 100_000;
/// Per-transaction bus timeout.
pub const TIMEOUT_MS: u32 = 1000;

pub const PAGES: u8 = 8;
pub const COLUMNS: u8 = 128;

const CONTROL_COMMAND: u8 = 0x00;
const CONTROL_DATA: u8 = 0x40;

/// Page the greeting is painted on.
pub const GREETING_PAGE: u8 = 2;

const INIT_SEQUENCE: &[u8] = &[
    0xAE, // display off
    0xD5, 0x80, // clock divide
    0xA8, 0x3F, // multiplex ratio: 64 rows
    0xD3, 0x00, // display offset
    0x40, // start line 0
    0x8D, 0x14, // charge pump on
    0x20, 0x00, // horizontal addressing
    0xA1, // segment remap
    0xC8, // COM scan direction: remapped
    0xDA, 0x12, // COM pins
    0x81, 0xCF, // contrast
    0xD9, 0xF1, // precharge
    0xDB, 0x40, // VCOMH
    0xA4, // resume from RAM
    0xA6, // normal, not inverted
    0xAF, // display on
];

/// "HBD Saloni" and a heart, as column bytes (LSB at the top).
#[rustfmt::skip]
pub const GREETING: &[u8] = &[
    0xFF, 0x08, 0x08, 0xFF, 0x00,       // H
    0xFF, 0x89, 0x89, 0x76, 0x00,       // B
    0xFF, 0x81, 0x81, 0x7E, 0x00, 0x00, // D + space
    0x46, 0x89, 0x89, 0x71, 0x00,       // S
    0x20, 0x54, 0x54, 0x78, 0x00,       // a
    0xFF, 0x00,                         // l
    0x38, 0x44, 0x44, 0x38, 0x00,       // o
    0x7C, 0x08, 0x04, 0x78, 0x00,       // n
    0x7D, 0x00, 0x00,                   // i
    0x00, 0x66, 0xFF, 0x7E, 0x3C, 0x18, 0x00, // heart
];

/// A write-only two-wire bus master.
pub trait Bus {
    type Error: Debug;

    /// START, address + write bit, `bytes`, STOP.
    fn transmit(&mut self, address: u8, bytes: &[u8]) -> Result<(), Self::Error>;
}

pub struct Ssd1306<B> {
    bus: B,
    address: u8,
}

impl<B: Bus> Ssd1306<B> {
    pub fn new(bus: B) -> Self {
        Self {
            bus,
            address: ADDRESS,
        }
    }

    pub fn bus(&self) -> &B {
        &self.bus
    }

    /// Send the power-up command sequence and switch the panel on.
    pub fn init(&mut self) -> anyhow::Result<()> {
        let result = self.commands(INIT_SEQUENCE);
        info!("OLED init: {}", if result.is_ok() { "OK" } else { "FAILED" });
        result
    }

    /// Point the RAM write cursor at `page`, `column`.
    pub fn set_cursor(&mut self, page: u8, column: u8) -> anyhow::Result<()> {
        if page >= PAGES || column >= COLUMNS {
            return Err(anyhow!("cursor ({page}, {column}) is off the panel"));
        }
        self.commands(&[0xB0 | page, column & 0x0F, 0x10 | (column >> 4)])
    }

    /// Zero every page. Each page is attempted even if an earlier one failed;
    /// the first failure is returned.
    pub fn clear(&mut self) -> anyhow::Result<()> {
        let blank = [0u8; COLUMNS as usize];
        let mut first_err = None;
        for page in 0..PAGES {
            let results = [self.set_cursor(page, 0), self.data(&blank)];
            for result in results {
                if let Err(e) = result {
                    first_err.get_or_insert(e);
                }
            }
        }
        first_err.map_or(Ok(()), Err)
    }

    /// Draw the greeting at the start of its page.
    pub fn paint_greeting(&mut self) -> anyhow::Result<()> {
        let cursor = self.set_cursor(GREETING_PAGE, 0);
        let data = self.data(GREETING);
        cursor.and(data)?;
        info!("Message displayed");
        Ok(())
    }

    /// Boot sequence: `init`, `clear`, then `paint_greeting`. A failing step
    /// is logged and the next one still runs; the first failure is returned.
    pub fn show_greeting(&mut self) -> anyhow::Result<()> {
        let steps = [
            ("init", self.init()),
            ("clear", self.clear()),
            ("greeting", self.paint_greeting()),
        ];
        let mut first_err = None;
        for (step, result) in steps {
            if let Err(e) = result {
                error!("OLED {step}: {e:#}");
                first_err.get_or_insert(e);
            }
        }
        first_err.map_or(Ok(()), Err)
    }

    fn commands(&mut self, cmds: &[u8]) -> anyhow::Result<()> {
        self.transaction(CONTROL_COMMAND, cmds)
    }

    fn data(&mut self, bytes: &[u8]) -> anyhow::Result<()> {
        self.transaction(CONTROL_DATA, bytes)
    }

    fn transaction(&mut self, control: u8, payload: &[u8]) -> anyhow::Result<()> {
        let mut frame = Vec::with_capacity(payload.len() + 1);
        frame.push(control);
        frame.extend_from_slice(payload);

        self.bus.transmit(self.address, &frame).map_err(|e| {
            error!("OLED transaction (control {control:#04x}) failed: {e:?}");
            anyhow!("OLED bus error: {e:?}")
        })
    }
}

#[cfg(target_os = "espidf")]
mod i2c {
    use esp_idf_svc::hal::delay::TickType;
    use esp_idf_svc::hal::i2c::I2cDriver;
    use esp_idf_svc::sys::EspError;

    use super::{Bus, TIMEOUT_MS};

    impl Bus for I2cDriver<'_> {
        type Error = EspError;

        fn transmit(&mut self, address: u8, bytes: &[u8]) -> Result<(), EspError> {
            let timeout = TickType::new_millis(TIMEOUT_MS as u64).ticks();
            self.write(address, bytes, timeout)
        }
    }
}
