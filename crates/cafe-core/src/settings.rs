//! # Cafe Identity
//!
//! The name, address and GSTIN printed at the top of every document,
//! resolved from the key/value settings table. The phone line is printed
//! only when `cafe_phone` is set.
//!
//! ```text
//! settings table                     CafeInfo
//! ───────────────────────────        ─────────────────────────────
//! cafe_name       "Brew Lab"   ──►   name     "Brew Lab"
//! cafe_address    (missing)    ──►   address  "123 Coffee Street, ..."  (default)
//! gst_number      ""           ──►   gstin    "29AABCT1332L1ZT"         (default)
//! receipt_footer  "Visit again"──►   footer   "Visit again"
//! ```
//!
//! Resolution never fails: a missing or blank key keeps its default, and a
//! settings store that cannot be read yields [`CafeInfo::default`].

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use ts_rs::TS;

pub const KEY_CAFE_NAME: &str = "cafe_name";
pub const KEY_CAFE_ADDRESS: &str = "cafe_address";
pub const KEY_CAFE_PHONE: &str = "cafe_phone";
pub const KEY_GST_NUMBER: &str = "gst_number";
pub const KEY_RECEIPT_FOOTER: &str = "receipt_footer";

/// Identity of the cafe as printed on receipts and reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CafeInfo {
    pub name: String,
    pub address: String,
    pub phone: Option<String>,
    pub gstin: String,
    pub footer: String,
}

impl Default for CafeInfo {
    fn default() -> Self {
        CafeInfo {
            name: "Coffee Haven".to_string(),
            address: "123 Coffee Street, Bangalore".to_string(),
            phone: None,
            gstin: "29AABCT1332L1ZT".to_string(),
            footer: "Thank you for visiting!".to_string(),
        }
    }
}

impl CafeInfo {
    /// Builds the identity from `(key, value)` pairs, keeping defaults for
    /// anything absent or blank. Unknown keys are ignored.
    pub fn from_settings<'a, I>(settings: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut info = CafeInfo::default();

        for (key, value) in settings {
            let value = value.trim();
            if value.is_empty() {
                continue;
            }

            let value = value.to_string();
            match key {
                KEY_CAFE_NAME => info.name = value,
                KEY_CAFE_ADDRESS => info.address = value,
                KEY_CAFE_PHONE => info.phone = Some(value),
                KEY_GST_NUMBER => info.gstin = value,
                KEY_RECEIPT_FOOTER => info.footer = value,
                _ => {}
            }
        }

        info
    }

    /// Convenience over a loaded settings map.
    pub fn from_map(settings: &HashMap<String, String>) -> Self {
        Self::from_settings(settings.iter().map(|(k, v)| (k.as_str(), v.as_str())))
    }

    /// Resolves from the outcome of a settings read; a failed read falls
    /// back to the defaults.
    pub fn from_lookup<E>(lookup: Result<HashMap<String, String>, E>) -> Self {
        lookup.map(|map| Self::from_map(&map)).unwrap_or_default()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
