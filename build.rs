fn main() {
    // esp-idf-svc is only pulled in for the device, so the ESP-IDF
    // environment exists only there. Host builds skip it.
    if std::env::var("CARGO_CFG_TARGET_OS").as_deref() == Ok("espidf") {
        embuild::espidf::sysenv::output();
    }

    // Pin overrides (BUTTON_GPIO, BUZZER_GPIO, OLED_SDA_GPIO, OLED_SCL_GPIO)
    // come from an optional .env next to Cargo.toml.
    if let Ok(iter) = dotenvy::dotenv_iter() {
        for item in iter {
            if let Ok((key, val)) = item {
                println!("cargo::rustc-env={}={}", key, val);
            }
        }
    }
}
