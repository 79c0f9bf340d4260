//! Print request and outcome model
//!
//! The wire payload is a loosely-typed nested map assembled by the host
//! application. It decodes here into a strongly-typed request with every
//! section optional: malformed sub-maps collapse to their defaults,
//! wrong-typed scalars degrade field by field instead of failing the
//! request, and the only hard requirement (a printer target) is enforced
//! later by the session, not by serde.

use serde::{Deserialize, Serialize};

use crate::paper::PaperProfile;

/// Keep a string only when it has visible content.
///
/// Returns the original (untrimmed) value, not a trimmed copy.
pub fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

// ========== Request ==========

/// One complete print request, as submitted by the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PrintRequest {
    #[serde(deserialize_with = "de::section")]
    pub config: PrinterConfig,
    #[serde(deserialize_with = "de::section")]
    pub store: StoreInfo,
    #[serde(deserialize_with = "de::section")]
    pub receipt: Receipt,
    #[serde(deserialize_with = "de::section")]
    pub print_options: PrintOptions,
    #[serde(deserialize_with = "de::string_list")]
    pub footer_lines: Vec<String>,
    /// Physical copies to print, at least 1.
    #[serde(deserialize_with = "de::copies")]
    pub copies: u32,
}

impl Default for PrintRequest {
    fn default() -> Self {
        Self {
            config: PrinterConfig::default(),
            store: StoreInfo::default(),
            receipt: Receipt::default(),
            print_options: PrintOptions::default(),
            footer_lines: Vec::new(),
            copies: 1,
        }
    }
}

/// Connection parameters for the target printer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PrinterConfig {
    /// Driver-specific device identifier (e.g. `TCP:192.168.1.200`).
    #[serde(deserialize_with = "de::string_or_empty")]
    pub target: String,
    /// Connect timeout in milliseconds.
    #[serde(deserialize_with = "de::millis")]
    pub timeout: Option<u64>,
    #[serde(deserialize_with = "de::opt_string")]
    pub model: Option<String>,
    #[serde(deserialize_with = "de::opt_string")]
    pub lang: Option<String>,
    #[serde(deserialize_with = "de::opt_string")]
    pub paper_size: Option<String>,
}

impl PrinterConfig {
    /// Paper profile resolved from the free-form size string.
    pub fn paper_profile(&self) -> PaperProfile {
        PaperProfile::from_config(self.paper_size.as_deref())
    }
}

/// Store identity printed in the receipt header.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StoreInfo {
    #[serde(deserialize_with = "de::opt_string")]
    pub name: Option<String>,
    #[serde(deserialize_with = "de::opt_string")]
    pub address: Option<String>,
    #[serde(deserialize_with = "de::opt_string")]
    pub phone: Option<String>,
}

/// The order content of the receipt.
///
/// Monetary fields are integer minor units (pence/cents). Legacy payloads
/// carrying decimal major units are converted ×100 on the way in.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Receipt {
    #[serde(deserialize_with = "de::opt_string")]
    pub currency: Option<String>,
    /// ISO-8601 timestamp; formatted at render time, raw on parse failure.
    #[serde(deserialize_with = "de::opt_string")]
    pub created_at: Option<String>,
    #[serde(deserialize_with = "de::opt_string")]
    pub order_id: Option<String>,
    #[serde(deserialize_with = "de::opt_string")]
    pub table: Option<String>,
    #[serde(deserialize_with = "de::opt_string")]
    pub server: Option<String>,
    #[serde(deserialize_with = "de::opt_string")]
    pub note: Option<String>,
    #[serde(deserialize_with = "de::items")]
    pub items: Vec<LineItem>,
    #[serde(deserialize_with = "de::money")]
    pub sub_total: Option<i64>,
    #[serde(deserialize_with = "de::money")]
    pub service_charge: Option<i64>,
    #[serde(deserialize_with = "de::money")]
    pub tax: Option<i64>,
    #[serde(deserialize_with = "de::money")]
    pub discount: Option<i64>,
    #[serde(deserialize_with = "de::money")]
    pub total: Option<i64>,
}

/// One ordered line on the receipt.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LineItem {
    #[serde(deserialize_with = "de::opt_string")]
    pub name: Option<String>,
    /// Never negative after decode.
    #[serde(deserialize_with = "de::quantity")]
    pub qty: i64,
    #[serde(deserialize_with = "de::minor_units")]
    pub unit_price_pence: Option<i64>,
    #[serde(deserialize_with = "de::minor_units")]
    pub total_price_pence: Option<i64>,
    #[serde(deserialize_with = "de::opt_string")]
    pub note: Option<String>,
    #[serde(deserialize_with = "de::opt_string")]
    pub category: Option<String>,
}

impl LineItem {
    /// Line total in minor units: unit price × qty when a unit price is
    /// given, else the explicit total, else 0. The multiply saturates at
    /// the i64 limits.
    pub fn line_total_pence(&self) -> i64 {
        let qty = self.qty.max(0);
        match self.unit_price_pence {
            Some(unit) => unit.saturating_mul(qty),
            None => self.total_price_pence.unwrap_or(0),
        }
    }
}

/// Hardware options for this print run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PrintOptions {
    /// Cut style name; unrecognized values fall back to feed-cut.
    #[serde(deserialize_with = "de::opt_string")]
    pub cut_type: Option<String>,
    /// Fire the cash-drawer pulse after printing. Accepts a boolean or
    /// any number (non-zero → true) on the wire.
    #[serde(deserialize_with = "de::flag")]
    pub open_drawer: bool,
    #[serde(deserialize_with = "de::section")]
    pub print_barcode: Option<BarcodeRequest>,
    #[serde(deserialize_with = "de::section")]
    pub print_qr: Option<QrRequest>,
}

/// Code128 barcode block under the totals.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BarcodeRequest {
    #[serde(deserialize_with = "de::opt_string")]
    pub data: Option<String>,
    /// Dot height, default 80.
    #[serde(deserialize_with = "de::dimension")]
    pub height: Option<i64>,
    /// Module width, default 3, clamped to 2..=6 at render time.
    #[serde(deserialize_with = "de::dimension")]
    pub width: Option<i64>,
}

/// QR symbol block under the totals.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct QrRequest {
    #[serde(deserialize_with = "de::opt_string")]
    pub data: Option<String>,
    /// Module size, default 6.
    #[serde(deserialize_with = "de::dimension")]
    pub size: Option<i64>,
}

// ========== Outcome ==========

/// Terminal result of a print request.
///
/// A request produces exactly one of these on every path; the engine
/// never lets an error or panic cross its boundary instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrintOutcome {
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub copies_printed: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PrintOutcome {
    /// Successful print of `copies` physical copies.
    pub fn success(copies: u32) -> Self {
        Self {
            ok: true,
            copies_printed: Some(copies),
            error: None,
        }
    }

    /// Failed print with a human-readable reason.
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            ok: false,
            copies_printed: None,
            error: Some(error.into()),
        }
    }
}

// ========== Lenient decoding ==========

mod de {
    //! Field decoders matching the tolerance of the original host
    //! payloads: wrong-typed values degrade to defaults, per field, rather
    //! than failing the whole request.

    use serde::de::DeserializeOwned;
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;
    use tracing::debug;

    /// Decode a sub-map, collapsing malformed shapes to the default.
    pub fn section<'de, D, T>(deserializer: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
        T: Default + DeserializeOwned,
    {
        let value = Value::deserialize(deserializer)?;
        let present = !value.is_null();
        match serde_json::from_value(value) {
            Ok(section) => Ok(section),
            Err(err) => {
                if present {
                    debug!(error = %err, "discarding malformed payload section");
                }
                Ok(T::default())
            }
        }
    }

    /// Integer from any JSON number, rounding fractions; `None` otherwise.
    fn int_of(value: &Value) -> Option<i64> {
        match value {
            Value::Number(number) => match number.as_i64() {
                Some(whole) => Some(whole),
                None => number.as_f64().map(|f| f.round() as i64),
            },
            _ => None,
        }
    }

    /// Optional string; any other type reads as absent.
    pub fn opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(match value {
            Value::String(text) => Some(text),
            _ => None,
        })
    }

    /// String field with an empty-string default for anything non-string.
    pub fn string_or_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(opt_string(deserializer)?.unwrap_or_default())
    }

    /// Monetary amount: integers are minor units already, decimals are
    /// legacy major units converted ×100 and rounded.
    pub fn money<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        let Value::Number(number) = value else {
            return Ok(None);
        };
        Ok(match number.as_i64() {
            Some(minor) => Some(minor),
            None => number.as_f64().map(|major| (major * 100.0).round() as i64),
        })
    }

    /// Minor-unit amount on a line item: any number, rounded to integer.
    pub fn minor_units<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(int_of(&value))
    }

    /// Item quantity: any number, rounded, clamped to ≥ 0; garbage → 0.
    pub fn quantity<'de, D>(deserializer: D) -> Result<i64, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(int_of(&value).unwrap_or(0).max(0))
    }

    /// Copy count: any number, rounded, clamped to ≥ 1; garbage → 1.
    pub fn copies<'de, D>(deserializer: D) -> Result<u32, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(int_of(&value).unwrap_or(1).clamp(1, u32::MAX as i64) as u32)
    }

    /// Timeout in milliseconds: non-negative numbers only.
    pub fn millis<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(int_of(&value).filter(|ms| *ms >= 0).map(|ms| ms as u64))
    }

    /// Barcode/QR dimension: any number, rounded; garbage → absent.
    pub fn dimension<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(int_of(&value))
    }

    /// Boolean flag that also accepts numeric truthiness.
    pub fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(match &value {
            Value::Bool(flag) => *flag,
            Value::Number(_) => int_of(&value) != Some(0),
            _ => false,
        })
    }

    /// Line items: map elements decoded (leniently, field by field),
    /// non-map elements dropped; a non-array reads as empty.
    pub fn items<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned,
    {
        let value = Value::deserialize(deserializer)?;
        let Value::Array(entries) = value else {
            return Ok(Vec::new());
        };
        Ok(entries
            .into_iter()
            .filter_map(|entry| serde_json::from_value(entry).ok())
            .collect())
    }

    /// Footer lines: strings kept as-is, numbers and booleans
    /// stringified, everything else dropped.
    pub fn string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        let Value::Array(entries) = value else {
            return Ok(Vec::new());
        };
        Ok(entries
            .into_iter()
            .filter_map(|entry| match entry {
                Value::String(line) => Some(line),
                Value::Number(number) => Some(number.to_string()),
                Value::Bool(flag) => Some(flag.to_string()),
                _ => None,
            })
            .collect())
    }
}
