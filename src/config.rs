//! # Configuration Module
//!
//! Handles loading and validating configuration from TOML files.

use serde::de::Error;
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::error::Result;
use crate::firmware::options::OptionsBuilder;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub serial: SerialConfig,

    #[serde(default)]
    pub options: OptionsConfig,
}

/// Serial port configuration
#[derive(Debug, Deserialize, Clone)]
pub struct SerialConfig {
    #[serde(default = "default_serial_port")]
    pub port: String,

    #[serde(default = "default_baud_rate")]
    pub baud_rate: u32,

    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

/// Runtime options written into the firmware's configuration block
#[derive(Debug, Deserialize, Clone, Default)]
pub struct OptionsConfig {
    /// Personal binding phrase; hashed into the binding UID
    #[serde(default)]
    pub phrase: Option<String>,

    /// Home network SSID (max 32 chars)
    #[serde(default)]
    pub wifi_ssid: Option<String>,

    /// Home network password (max 64 chars, requires an SSID)
    #[serde(default)]
    pub wifi_password: Option<String>,

    /// Seconds before the device starts its own WiFi when unconnected
    #[serde(default)]
    pub auto_wifi_interval_s: Option<u32>,

    /// Product name stored in the options block
    #[serde(default)]
    pub product_name: Option<String>,
}

// Default value functions
fn default_serial_port() -> String { "/dev/ttyUSB0".to_string() }
fn default_baud_rate() -> u32 { 460_800 }
fn default_timeout_ms() -> u64 { 1000 }

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            port: default_serial_port(),
            baud_rate: default_baud_rate(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration file
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read, TOML parsing fails or
    /// validation fails.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Seed an [`OptionsBuilder`] from the configured runtime options
    ///
    /// A fresh random flash discriminator is drawn on every call, so each
    /// flash gets its own. Key order matches what devices have always been
    /// flashed with: uid, wifi, discriminator, product name.
    pub fn runtime_options(&self) -> OptionsBuilder {
        let mut builder = OptionsBuilder::new();

        if let Some(phrase) = &self.options.phrase {
            builder = builder.binding_phrase(phrase);
        }
        if let Some(ssid) = &self.options.wifi_ssid {
            builder = builder.wifi_credentials(ssid, self.options.wifi_password.as_deref());
        }
        if let Some(interval) = self.options.auto_wifi_interval_s {
            builder = builder.auto_wifi_interval(interval);
        }
        builder = builder.random_discriminator();
        if let Some(name) = &self.options.product_name {
            builder = builder.product_name(name);
        }

        builder
    }

    /// Validate configuration values
    fn validate(&self) -> Result<()> {
        if self.serial.port.is_empty() {
            return Err(crate::error::BackpackError::Config(
                toml::de::Error::custom("serial port cannot be empty")
            ));
        }

        if ![115_200, 230_400, 460_800, 921_600].contains(&self.serial.baud_rate) {
            return Err(crate::error::BackpackError::Config(
                toml::de::Error::custom("baud_rate must be one of: 115200, 230400, 460800, 921600")
            ));
        }

        if self.serial.timeout_ms == 0 || self.serial.timeout_ms > 10000 {
            return Err(crate::error::BackpackError::Config(
                toml::de::Error::custom("timeout_ms must be between 1 and 10000")
            ));
        }

        if let Some(ssid) = &self.options.wifi_ssid {
            if ssid.len() > 32 {
                return Err(crate::error::BackpackError::Config(
                    toml::de::Error::custom("wifi_ssid too long, 32 chars max")
                ));
            }
        }

        if let Some(password) = &self.options.wifi_password {
            if password.len() > 64 {
                return Err(crate::error::BackpackError::Config(
                    toml::de::Error::custom("wifi_password too long, 64 chars max")
                ));
            }
            if self.options.wifi_ssid.is_none() {
                return Err(crate::error::BackpackError::Config(
                    toml::de::Error::custom("wifi_password requires wifi_ssid")
                ));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_valid_config() -> Config {
        Config {
            serial: SerialConfig::default(),
            options: OptionsConfig {
                phrase: Some("bind phrase".to_string()),
                wifi_ssid: Some("homenet".to_string()),
                wifi_password: Some("hunter2".to_string()),
                auto_wifi_interval_s: Some(60),
                product_name: Some("TestVRX".to_string()),
            },
        }
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = Config {
            serial: SerialConfig::default(),
            options: OptionsConfig::default(),
        };
        assert!(config.validate().is_ok());
        assert_eq!(config.serial.port, "/dev/ttyUSB0");
        assert_eq!(config.serial.baud_rate, 460_800);
    }

    #[test]
    fn test_empty_serial_port() {
        let mut config = create_valid_config();
        config.serial.port = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_baud_rate() {
        let mut config = create_valid_config();
        config.serial.baud_rate = 9600;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_valid_baud_rates() {
        for &baud in &[115_200, 230_400, 460_800, 921_600] {
            let mut config = create_valid_config();
            config.serial.baud_rate = baud;
            assert!(config.validate().is_ok(), "Baud rate {} should be valid", baud);
        }
    }

    #[test]
    fn test_timeout_bounds() {
        let mut config = create_valid_config();
        config.serial.timeout_ms = 0;
        assert!(config.validate().is_err());

        config.serial.timeout_ms = 10001;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_ssid_too_long() {
        let mut config = create_valid_config();
        config.options.wifi_ssid = Some("s".repeat(33));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_password_too_long() {
        let mut config = create_valid_config();
        config.options.wifi_password = Some("p".repeat(65));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_password_without_ssid() {
        let mut config = create_valid_config();
        config.options.wifi_ssid = None;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_config_from_file() {
        use std::io::Write;
        use tempfile::NamedTempFile;

        let toml_content = r#"
[serial]
port = "/dev/ttyACM0"
baud_rate = 230400

[options]
phrase = "race day"
wifi_ssid = "homenet"
product_name = "TestVRX"
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();
        temp_file.flush().unwrap();

        let config = Config::load(temp_file.path()).unwrap();
        assert_eq!(config.serial.port, "/dev/ttyACM0");
        assert_eq!(config.serial.baud_rate, 230_400);
        assert_eq!(config.options.product_name.as_deref(), Some("TestVRX"));
    }

    #[test]
    fn test_load_config_all_defaults() {
        use std::io::Write;
        use tempfile::NamedTempFile;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(b"").unwrap();
        temp_file.flush().unwrap();

        let config = Config::load(temp_file.path()).unwrap();
        assert_eq!(config.serial.baud_rate, 460_800);
        assert!(config.options.phrase.is_none());
    }

    #[test]
    fn test_runtime_options_from_config() {
        let config = create_valid_config();
        let json = config.runtime_options().build().unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed["uid"].as_array().unwrap().len(), 6);
        assert_eq!(parsed["wifi-ssid"], "homenet");
        assert_eq!(parsed["wifi-password"], "hunter2");
        assert_eq!(parsed["wifi-on-interval"], 60);
        assert_eq!(parsed["product-name"], "TestVRX");
        assert!(parsed["flash-discriminator"].as_u64().unwrap() >= 1);
    }

    #[test]
    fn test_runtime_options_key_order() {
        let config = create_valid_config();
        let json = config.runtime_options().build().unwrap();

        let uid_pos = json.find("\"uid\"").unwrap();
        let ssid_pos = json.find("\"wifi-ssid\"").unwrap();
        let disc_pos = json.find("\"flash-discriminator\"").unwrap();
        let name_pos = json.find("\"product-name\"").unwrap();

        assert!(uid_pos < ssid_pos);
        assert!(ssid_pos < disc_pos);
        assert!(disc_pos < name_pos);
    }
}
