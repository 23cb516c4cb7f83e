//! # Runtime Options Builder
//!
//! Assembles the JSON mapping that gets appended to the firmware as its
//! runtime configuration: binding UID, home Wi-Fi credentials, a random
//! flash discriminator and the product name.

use md5::{Digest, Md5};
use rand::Rng;
use serde_json::{json, Map, Value};

use crate::error::Result;

/// Number of binding-UID bytes kept from the phrase digest
const UID_LENGTH: usize = 6;

/// Builder for the firmware's runtime options mapping
///
/// Options are accumulated explicitly and serialized once; the firmware
/// parses the resulting JSON text out of its configuration block at boot.
///
/// # Examples
///
/// ```
/// use backpack_tool::firmware::options::OptionsBuilder;
///
/// let json = OptionsBuilder::new()
///     .binding_phrase("team-race-day")
///     .wifi_credentials("homenet", Some("hunter2"))
///     .product_name("Generic VRX Backpack")
///     .flash_discriminator(42)
///     .build()
///     .unwrap();
/// assert!(json.contains("\"wifi-ssid\":\"homenet\""));
/// ```
#[derive(Debug, Default)]
pub struct OptionsBuilder {
    flags: Map<String, Value>,
}

impl OptionsBuilder {
    /// Create an empty builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Derive the binding UID from a binding phrase
    ///
    /// The UID is the first 6 bytes of `MD5("-DMY_BINDING_PHRASE="<phrase>"")`,
    /// matching the derivation the firmware build performs so that a
    /// phrase entered here binds to the same UID.
    pub fn binding_phrase(mut self, phrase: &str) -> Self {
        let mut hasher = Md5::new();
        hasher.update(format!("-DMY_BINDING_PHRASE=\"{}\"", phrase).as_bytes());
        let digest = hasher.finalize();

        let uid: Vec<Value> = digest[..UID_LENGTH].iter().map(|&b| json!(b)).collect();
        self.flags.insert("uid".to_string(), Value::Array(uid));
        self
    }

    /// Set home network credentials
    ///
    /// The password is only recorded alongside an SSID; a password with no
    /// network to join is meaningless to the firmware.
    pub fn wifi_credentials(mut self, ssid: &str, password: Option<&str>) -> Self {
        self.flags.insert("wifi-ssid".to_string(), json!(ssid));
        if let Some(password) = password {
            self.flags.insert("wifi-password".to_string(), json!(password));
        }
        self
    }

    /// Seconds without a connection before the firmware starts its own WiFi
    pub fn auto_wifi_interval(mut self, seconds: u32) -> Self {
        self.flags.insert("wifi-on-interval".to_string(), json!(seconds));
        self
    }

    /// Product name shown by the device
    pub fn product_name(mut self, name: &str) -> Self {
        self.flags.insert("product-name".to_string(), json!(name));
        self
    }

    /// Set an explicit flash discriminator
    pub fn flash_discriminator(mut self, value: u32) -> Self {
        self.flags.insert("flash-discriminator".to_string(), json!(value));
        self
    }

    /// Draw a fresh non-zero flash discriminator
    ///
    /// The discriminator distinguishes this flash from previous ones so the
    /// firmware can detect that its stored state belongs to an older image.
    pub fn random_discriminator(self) -> Self {
        let value = rand::thread_rng().gen_range(1..=u32::MAX);
        self.flash_discriminator(value)
    }

    /// Serialize the mapping to compact JSON text
    pub fn build(self) -> Result<String> {
        Ok(serde_json::to_string(&Value::Object(self.flags))?)
    }
}
