//! Locating the record array inside heterogeneous upstream payloads.
//!
//! ## Observed shapes
//!
//! ```text
//! [ {...}, {...} ]                              bare array
//! { "results": [...], "count": 120 }            paginated listing
//! { "data": [...], "total": 120 }               generic envelope
//! { "products": [...], "totalCount": 120 }      domain-named key
//! { "items": [...], "total": 42 }               items envelope
//! { "data": { "items": [...], "total": 42 } }   nested envelope
//! ```
//!
//! Resolution never fails. A payload with none of the known containers
//! resolves to an empty record list tagged [`Shape::Unrecognized`], which is
//! distinct from a recognized container that happens to be empty.

use serde_json::{Map, Value};

use crate::fields::coerce_number;
use crate::outcome::EmptyReason;

/// Container and count keys tried for one family of endpoints, in priority order.
#[derive(Debug, Clone, Copy)]
pub struct ContainerKeys {
    pub records: &'static [&'static str],
    pub totals: &'static [&'static str],
}

const TOTAL_KEYS: &[&str] = &[
    "total",
    "count",
    "totalCount",
    "total_count",
    "totalItems",
    "Total",
];

pub const PRODUCT_CONTAINERS: ContainerKeys = ContainerKeys {
    records: &["results", "data", "products", "items"],
    totals: TOTAL_KEYS,
};

pub const MOVEMENT_CONTAINERS: ContainerKeys = ContainerKeys {
    records: &["results", "data", "movements", "stockMovements", "items"],
    totals: TOTAL_KEYS,
};

/// Keys a detail endpoint may wrap its single record in.
const RECORD_WRAPPERS: &[&str] = &["data", "product", "result"];

#[derive(Clone, Copy)]
enum Slot {
    Array,
    EmptyArray,
    Object,
}

/// Where the records were found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Array,
    Keyed(&'static str),
    Unrecognized,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Resolved {
    pub records: Vec<Value>,
    /// Upstream-reported count, or `records.len()` when none was reported.
    pub total: usize,
    /// `true` when `total` came from a count field in the payload.
    pub total_reported: bool,
    pub shape: Shape,
}

impl Resolved {
    fn unrecognized() -> Self {
        Self {
            records: Vec::new(),
            total: 0,
            total_reported: false,
            shape: Shape::Unrecognized,
        }
    }

    /// Why the page is empty, or `None` when it holds records.
    #[must_use]
    pub fn empty_reason(&self) -> Option<EmptyReason> {
        if !self.records.is_empty() {
            return None;
        }
        Some(match self.shape {
            Shape::Unrecognized => EmptyReason::UnrecognizedShape,
            Shape::Array | Shape::Keyed(_) => EmptyReason::NoRecords,
        })
    }
}

/// Resolves a list payload into its records and total count.
#[must_use]
pub fn resolve(payload: Value, keys: &ContainerKeys) -> Resolved {
    match payload {
        Value::Array(records) => {
            let total = records.len();
            Resolved {
                records,
                total,
                total_reported: false,
                shape: Shape::Array,
            }
        }
        Value::Object(map) => resolve_object(map, keys, true),
        _ => Resolved::unrecognized(),
    }
}

fn resolve_object(mut map: Map<String, Value>, keys: &ContainerKeys, descend: bool) -> Resolved {
    let outer_total = reported_total(&map, keys);
    let mut empty_match: Option<&'static str> = None;

    for &key in keys.records {
        let slot = match map.get(key) {
            Some(Value::Array(items)) if items.is_empty() => Slot::EmptyArray,
            Some(Value::Array(_)) => Slot::Array,
            Some(Value::Object(_)) if descend => Slot::Object,
            _ => continue,
        };
        match (slot, map.remove(key)) {
            (Slot::Array, Some(Value::Array(records))) => {
                return with_total(records, outer_total, Shape::Keyed(key));
            }
            (Slot::Object, Some(Value::Object(inner))) => {
                let nested = resolve_object(inner, keys, false);
                if !nested.records.is_empty() {
                    let total = if nested.total_reported {
                        Some(nested.total)
                    } else {
                        outer_total
                    };
                    return with_total(nested.records, total, Shape::Keyed(key));
                }
                if nested.shape != Shape::Unrecognized {
                    empty_match.get_or_insert(key);
                }
            }
            _ => {
                empty_match.get_or_insert(key);
            }
        }
    }

    match empty_match {
        Some(key) => with_total(Vec::new(), outer_total, Shape::Keyed(key)),
        None => Resolved::unrecognized(),
    }
}

fn with_total(records: Vec<Value>, reported: Option<usize>, shape: Shape) -> Resolved {
    let total_reported = reported.is_some();
    let total = reported.unwrap_or(records.len());
    Resolved {
        records,
        total,
        total_reported,
        shape,
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn reported_total(map: &Map<String, Value>, keys: &ContainerKeys) -> Option<usize> {
    keys.totals
        .iter()
        .filter_map(|key| map.get(*key))
        .find_map(coerce_number)
        .filter(|n| *n >= 0.0)
        .map(|n| n as usize)
}

/// Unwraps a detail payload into the single record it describes.
///
/// Accepts the record itself, or the record wrapped under `data`, `product`,
/// or `result` (as an object or a one-element array).
#[must_use]
pub fn resolve_record(payload: Value) -> Option<Value> {
    let Value::Object(mut map) = payload else {
        return None;
    };
    for key in RECORD_WRAPPERS {
        match map.remove(*key) {
            Some(Value::Object(inner)) => return Some(Value::Object(inner)),
            Some(Value::Array(items)) => {
                return items.into_iter().find(Value::is_object);
            }
            Some(other) => {
                map.insert((*key).to_owned(), other);
            }
            None => {}
        }
    }
    (!map.is_empty()).then_some(Value::Object(map))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn bare_array_uses_length_as_total() {
        let resolved = resolve(json!([{ "id": 1 }, { "id": 2 }]), &PRODUCT_CONTAINERS);
        assert_eq!(resolved.records.len(), 2);
        assert_eq!(resolved.total, 2);
        assert!(!resolved.total_reported);
        assert_eq!(resolved.shape, Shape::Array);
    }

    #[test]
    fn items_with_total() {
        let resolved = resolve(
            json!({ "items": [{ "id": 1 }, { "id": 2 }], "total": 42 }),
            &PRODUCT_CONTAINERS,
        );
        assert_eq!(resolved.records.len(), 2);
        assert_eq!(resolved.total, 42);
        assert!(resolved.total_reported);
        assert_eq!(resolved.shape, Shape::Keyed("items"));
    }

    #[test]
    fn unknown_key_resolves_to_unrecognized_empty_page() {
        let resolved = resolve(json!({ "foo": [] }), &PRODUCT_CONTAINERS);
        assert!(resolved.records.is_empty());
        assert_eq!(resolved.total, 0);
        assert_eq!(resolved.shape, Shape::Unrecognized);
        assert_eq!(resolved.empty_reason(), Some(EmptyReason::UnrecognizedShape));
    }

    #[test]
    fn recognized_empty_container_is_no_records() {
        let resolved = resolve(json!({ "results": [], "count": 0 }), &PRODUCT_CONTAINERS);
        assert_eq!(resolved.shape, Shape::Keyed("results"));
        assert_eq!(resolved.empty_reason(), Some(EmptyReason::NoRecords));
    }

    #[test]
    fn priority_order_results_before_data() {
        let resolved = resolve(
            json!({ "data": [{ "id": "d" }], "results": [{ "id": "r" }] }),
            &PRODUCT_CONTAINERS,
        );
        assert_eq!(resolved.shape, Shape::Keyed("results"));
        assert_eq!(resolved.records[0]["id"], "r");
    }

    #[test]
    fn empty_higher_priority_container_is_skipped() {
        let resolved = resolve(
            json!({ "results": [], "products": [{ "id": 1 }] }),
            &PRODUCT_CONTAINERS,
        );
        assert_eq!(resolved.shape, Shape::Keyed("products"));
        assert_eq!(resolved.total, 1);
    }

    #[test]
    fn count_keys_in_various_casings() {
        for key in ["count", "totalCount", "total_count", "totalItems", "Total"] {
            let mut payload = json!({ "data": [{ "id": 1 }] });
            payload[key] = json!(17);
            let resolved = resolve(payload, &PRODUCT_CONTAINERS);
            assert_eq!(resolved.total, 17, "count key {key} not honoured");
        }
    }

    #[test]
    fn string_total_is_coerced() {
        let resolved = resolve(json!({ "data": [{ "id": 1 }], "total": "9" }), &PRODUCT_CONTAINERS);
        assert_eq!(resolved.total, 9);
    }

    #[test]
    fn nested_data_envelope() {
        let resolved = resolve(
            json!({ "data": { "items": [{ "id": 1 }], "total": 5 } }),
            &PRODUCT_CONTAINERS,
        );
        assert_eq!(resolved.records.len(), 1);
        assert_eq!(resolved.total, 5);
        assert_eq!(resolved.shape, Shape::Keyed("data"));
    }

    #[test]
    fn movement_domain_key() {
        let resolved = resolve(
            json!({ "stockMovements": [{ "type": "E" }] }),
            &MOVEMENT_CONTAINERS,
        );
        assert_eq!(resolved.shape, Shape::Keyed("stockMovements"));
        assert_eq!(resolved.total, 1);
    }

    #[test]
    fn scalar_payload_is_unrecognized() {
        let resolved = resolve(json!("oops"), &PRODUCT_CONTAINERS);
        assert_eq!(resolved.shape, Shape::Unrecognized);
    }

    #[test]
    fn resolve_record_unwraps_known_wrappers() {
        assert_eq!(
            resolve_record(json!({ "data": { "id": 7 } })),
            Some(json!({ "id": 7 }))
        );
        assert_eq!(
            resolve_record(json!({ "product": [{ "id": 8 }] })),
            Some(json!({ "id": 8 }))
        );
        assert_eq!(
            resolve_record(json!({ "id": 9, "name": "x" })),
            Some(json!({ "id": 9, "name": "x" }))
        );
        assert_eq!(resolve_record(json!([])), None);
        assert_eq!(resolve_record(json!({})), None);
    }

    #[test]
    fn resolve_record_keeps_scalar_data_field() {
        let record = resolve_record(json!({ "id": 3, "data": "2024-01-01" })).unwrap();
        assert_eq!(record["data"], "2024-01-01");
        assert_eq!(record["id"], 3);
    }
}
