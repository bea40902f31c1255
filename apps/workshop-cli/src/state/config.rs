//! # Configuration State
//!
//! Stores application configuration loaded at startup.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Environment variables (`WORKSHOP_*`)
//! 2. Defaults (this file)
//!
//! ## Thread Safety
//! Configuration is read-only after initialization, so no lock needed.

use serde::{Deserialize, Serialize};
use workshop_core::{DEFAULT_COUNTRY_CODE, DEFAULT_SHOP_NAME};

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigState {
    /// Shop name printed on quotes and WhatsApp messages.
    pub shop_name: String,

    /// Calling code prepended to client phone numbers.
    /// Default: "52" (Mexico)
    pub country_code: String,
}

impl Default for ConfigState {
    fn default() -> Self {
        ConfigState {
            shop_name: DEFAULT_SHOP_NAME.to_string(),
            country_code: DEFAULT_COUNTRY_CODE.to_string(),
        }
    }
}

impl ConfigState {
    /// Creates a new ConfigState from environment variables and defaults.
    ///
    /// ## Environment Variables
    /// - `WORKSHOP_SHOP_NAME`: Override shop name
    /// - `WORKSHOP_COUNTRY_CODE`: Override calling code (digits only, e.g. "57")
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = ConfigState::default();

        if let Some(name) = lookup("WORKSHOP_SHOP_NAME").filter(|v| !v.trim().is_empty()) {
            config.shop_name = name.trim().to_string();
        }

        if let Some(code) = lookup("WORKSHOP_COUNTRY_CODE") {
            let digits: String = code.chars().filter(|c| c.is_ascii_digit()).collect();
            if !digits.is_empty() {
                config.country_code = digits;
            }
        }

        config
    }
}
