//! # Tariff Document
//!
//! Parses an uploaded tariff document into [`RawTariff`] records.
//!
//! ## Accepted Shapes
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. Record list                                                         │
//! │     [                                                                   │
//! │       {"category": "Glass", "rate": 0.05, "effectiveFrom": "2020-01-01"}│
//! │       {"cargo_type": "Metal", "rate": "0.03", "effective_date": ...}    │
//! │     ]                                                                   │
//! │                                                                         │
//! │  2. Date-keyed                                                          │
//! │     {                                                                   │
//! │       "2020-06-01": [{"cargo_type": "Glass", "rate": 0.05}, ...],       │
//! │       "2020-07-01": [...]                                               │
//! │     }                                                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Parsing is structural only. Field values stay text and are checked later
//! by [`crate::validation::validate_batch`]. Records come out in document
//! order, and a date key that appears twice keeps both groups.

use rust_decimal::Decimal;
use serde::de::{Deserializer, MapAccess, SeqAccess, Visitor};
use serde::Deserialize;
use serde_json::error::Category;
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;
use crate::types::RawTariff;
use crate::validation::ValidationResult;

// =============================================================================
// Wire Records
// =============================================================================

/// One element of the record-list shape.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ListedRecord {
    #[serde(alias = "cargo_type")]
    category: String,
    rate: RateValue,
    #[serde(
        rename = "effectiveFrom",
        alias = "effective_from",
        alias = "effectiveDate",
        alias = "effective_date"
    )]
    effective_from: String,
}

/// One element under a date key of the date-keyed shape.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct DatedRecord {
    #[serde(alias = "cargo_type")]
    category: String,
    rate: RateValue,
}

/// A rate may be sent as a JSON number or as decimal text.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RateValue {
    Number(serde_json::Number),
    Text(String),
}

impl RateValue {
    /// Decimal text for the validator. Numbers in exponent form (`5e-2`) are
    /// expanded so they parse like any other decimal.
    fn into_text(self) -> String {
        match self {
            RateValue::Text(text) => text,
            RateValue::Number(number) => {
                let text = number.to_string();
                Decimal::from_str(&text)
                    .or_else(|_| Decimal::from_scientific(&text))
                    .map(|d| d.normalize().to_string())
                    .unwrap_or(text)
            }
        }
    }
}

/// The top-level document with entries in source order.
///
/// Read through `MapAccess` directly so a repeated date key reaches
/// validation instead of overwriting the earlier group.
#[derive(Debug)]
enum Document {
    Listed(Vec<Value>),
    Dated(Vec<(String, Value)>),
}

impl<'de> Deserialize<'de> for Document {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(DocumentVisitor)
    }
}

struct DocumentVisitor;

impl<'de> Visitor<'de> for DocumentVisitor {
    type Value = Document;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a list of tariffs or an object keyed by date")
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Document, A::Error> {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element::<Value>()? {
            items.push(item);
        }
        Ok(Document::Listed(items))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Document, A::Error> {
        let mut groups = Vec::with_capacity(map.size_hint().unwrap_or(0));
        while let Some((date, group)) = map.next_entry::<String, Value>()? {
            groups.push((date, group));
        }
        Ok(Document::Dated(groups))
    }
}

// =============================================================================
// Parsing
// =============================================================================

/// Parses raw upload bytes into tariff records.
///
/// ## Errors
/// - Not UTF-8, not JSON, or neither accepted shape → `InvalidDocument`
/// - A record with a missing, mistyped, or unknown field →
///   `InvalidRecord { index, .. }` (index counts records in document order)
///
/// ## Example
/// ```rust
/// use tariff_core::parse_document;
///
/// let body = br#"{"2020-06-01": [{"cargo_type": "Glass", "rate": 0.05}]}"#;
/// let records = parse_document(body).unwrap();
///
/// assert_eq!(records[0].category, "Glass");
/// assert_eq!(records[0].rate, "0.05");
/// assert_eq!(records[0].effective_from, "2020-06-01");
/// ```
pub fn parse_document(bytes: &[u8]) -> ValidationResult<Vec<RawTariff>> {
    let text = std::str::from_utf8(bytes).map_err(|_| ValidationError::InvalidDocument {
        reason: "body is not valid UTF-8".to_string(),
    })?;

    let document: Document = serde_json::from_str(text).map_err(|e| {
        let reason = match e.classify() {
            Category::Data => format!("unexpected document shape: {}", e),
            _ => format!("body is not valid JSON: {}", e),
        };
        ValidationError::InvalidDocument { reason }
    })?;

    match document {
        Document::Listed(items) => parse_listed(items),
        Document::Dated(groups) => parse_dated(groups),
    }
}

fn parse_listed(items: Vec<Value>) -> ValidationResult<Vec<RawTariff>> {
    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            let record: ListedRecord = decode_record(item, index)?;
            Ok(RawTariff::new(
                record.category,
                record.rate.into_text(),
                record.effective_from,
            ))
        })
        .collect()
}

fn parse_dated(groups: Vec<(String, Value)>) -> ValidationResult<Vec<RawTariff>> {
    let mut records = Vec::new();

    for (date, group) in groups {
        let Value::Array(items) = group else {
            return Err(ValidationError::InvalidDocument {
                reason: format!("value under '{}' must be a list of tariffs", date),
            });
        };

        for item in items {
            let index = records.len();
            let record: DatedRecord = decode_record(item, index)?;
            records.push(RawTariff::new(
                record.category,
                record.rate.into_text(),
                date.clone(),
            ));
        }
    }

    Ok(records)
}

fn decode_record<T: serde::de::DeserializeOwned>(item: Value, index: usize) -> ValidationResult<T> {
    serde_json::from_value(item).map_err(|e| {
        ValidationError::InvalidDocument {
            reason: e.to_string(),
        }
        .at_record(index)
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
