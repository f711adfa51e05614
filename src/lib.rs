//! Single-button birthday music player for the ESP32.
//!
//! A press on the button starts one of two built-in melodies on a piezo
//! buzzer, or stops the one in progress. An SSD1306 OLED shows a fixed
//! greeting. Everything except the peripheral bindings (gated on
//! `target_os = "espidf"`) is plain Rust and runs on the host.

pub mod button;
pub mod buzzer;
pub mod config;
pub mod jukebox;
pub mod melody;
pub mod oled;
pub mod platform;
pub mod player;
