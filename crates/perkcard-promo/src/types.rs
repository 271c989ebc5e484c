//! Promo API response types.
//!
//! The backend wraps every response in a `{"type": "success"|"error", ...}`
//! envelope; [`ApiEnvelope`] captures that pattern. Promo records arrive
//! grouped by category key (`"custom_promo"`, `"all_promo"`, …), each key
//! holding an ordered list of offers.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Promo records grouped by category key, in backend order.
pub type PromoMap = HashMap<String, Vec<PromoRecord>>;

/// Top-level envelope for a successful promo API response.
///
/// The `kind` field is `"success"` or `"error"` on the wire (`type` in JSON).
/// Error envelopes carry no `data` and are surfaced before this type is
/// deserialized, so `data` is required here.
#[derive(Debug, Deserialize)]
pub struct ApiEnvelope {
    #[serde(rename = "type")]
    pub kind: String,
    pub data: PromoPayload,
}

/// Payload of a successful response: `{ "promo": { <category>: [ ... ] } }`.
#[derive(Debug, Deserialize)]
pub struct PromoPayload {
    pub promo: PromoMap,
}

/// A single promotional offer.
///
/// The `*_simplified` and `*_image` fields are not sent by the backend; they
/// are derived by [`crate::normalize::normalize_promos`] before the record is
/// stored for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromoRecord {
    pub client_name: String,
    pub bus_name: String,
    #[serde(default)]
    pub bus_image: Option<String>,
    pub promo_name: String,
    #[serde(default)]
    pub promo_image: Option<String>,
    /// Validity start in `"YYYY-MM-DD"` format.
    #[serde(default)]
    pub date_valid_from: Option<String>,
    /// Validity end in `"YYYY-MM-DD"` format.
    #[serde(default)]
    pub date_valid_to: Option<String>,
    /// Combined human-readable validity, e.g. `"Mar, 1st - 21st"`.
    #[serde(default)]
    pub date_validity_simplified: Option<String>,
    #[serde(default)]
    pub date_valid_from_simplified: Option<String>,
    #[serde(default)]
    pub date_valid_to_simplified: Option<String>,
}
