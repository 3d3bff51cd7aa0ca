// ── Document codec ──
//
// Translation between typed entities and the untyped JSON documents kept
// by the remote service: sanitizing and stamping on the way out,
// validation and decoding on the way in.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Number, Value};
use tracing::debug;

use pennywise_api::{Fields, RawDocument};

use crate::error::CoreError;
use crate::model::{Entity, OwnerId};

/// Field holding the owner stamp; also the remote query filter.
pub const OWNER_FIELD: &str = "userId";

/// Field holding the last-write timestamp.
pub const UPDATED_AT_FIELD: &str = "updatedAt";

/// Structural check applied to documents in both directions.
///
/// A document is valid when it is an object whose `userId` is a
/// non-empty string, and whose `amount` and `balance`, when present,
/// are numbers.
pub fn validate(doc: &Value) -> bool {
    let Some(fields) = doc.as_object() else {
        return false;
    };
    let owner_ok = fields
        .get(OWNER_FIELD)
        .and_then(Value::as_str)
        .is_some_and(|owner| !owner.is_empty());
    let numeric_ok = ["amount", "balance"]
        .iter()
        .all(|key| fields.get(*key).is_none_or(Value::is_number));
    owner_ok && numeric_ok
}

/// Drop null fields and turn numeric-looking strings into numbers.
///
/// Only top-level fields are touched. Blank strings and strings that do
/// not parse to a finite number stay as they are; booleans are never
/// coerced.
pub fn sanitize(fields: Fields) -> Fields {
    fields
        .into_iter()
        .filter(|(_, value)| !value.is_null())
        .map(|(key, value)| match value {
            Value::String(s) => {
                let coerced = numeric(&s);
                (key, coerced.map_or(Value::String(s), Value::Number))
            }
            other => (key, other),
        })
        .collect()
}

fn numeric(raw: &str) -> Option<Number> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(int) = trimmed.parse::<i64>() {
        return Some(Number::from(int));
    }
    trimmed
        .parse::<f64>()
        .ok()
        .filter(|f| f.is_finite())
        .and_then(Number::from_f64)
}

/// Add the owner and last-write stamps.
pub fn stamp(mut fields: Fields, owner: &OwnerId, now: DateTime<Utc>) -> Fields {
    fields.insert(OWNER_FIELD.into(), Value::String(owner.as_str().to_owned()));
    fields.insert(
        UPDATED_AT_FIELD.into(),
        Value::String(now.to_rfc3339_opts(SecondsFormat::Millis, true)),
    );
    fields
}

/// Serialize an entity into the document written for `owner`.
///
/// Entity fields are sanitized before stamping so the owner id always
/// stays a string. Dates serialize as ISO-8601 text.
pub fn encode<T: Entity + Serialize>(
    entity: &T,
    owner: &OwnerId,
    now: DateTime<Utc>,
) -> Result<Fields, CoreError> {
    let invalid = || CoreError::InvalidDocument {
        collection: T::COLLECTION.to_string(),
        id: entity.id().to_string(),
    };

    let Value::Object(fields) = serde_json::to_value(entity)? else {
        return Err(invalid());
    };
    let doc = stamp(sanitize(fields), owner, now);
    if validate(&Value::Object(doc.clone())) {
        Ok(doc)
    } else {
        Err(invalid())
    }
}

/// Decode a fetched document, or `None` if it fails validation or does
/// not match the entity shape. The document key becomes the entity id.
pub fn decode<T: Entity + DeserializeOwned>(raw: RawDocument) -> Option<T> {
    let RawDocument { id, fields } = raw;
    if !validate(&fields) {
        debug!(collection = %T::COLLECTION, id, "dropping invalid document");
        return None;
    }
    let Value::Object(mut fields) = fields else {
        return None;
    };
    fields.insert("id".into(), Value::String(id.clone()));
    match serde_json::from_value(Value::Object(fields)) {
        Ok(entity) => Some(entity),
        Err(e) => {
            debug!(collection = %T::COLLECTION, id, error = %e, "dropping undecodable document");
            None
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::{Account, AccountKind, Transaction};
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn fields(value: Value) -> Fields {
        match value {
            Value::Object(map) => map,
            _ => panic!("not an object"),
        }
    }

    // ── validate ──

    #[test]
    fn validate_requires_object() {
        assert!(!validate(&json!("hello")));
        assert!(!validate(&json!(null)));
        assert!(!validate(&json!([1, 2])));
    }

    #[test]
    fn validate_requires_non_empty_owner_string() {
        assert!(validate(&json!({"userId": "u1"})));
        assert!(!validate(&json!({})));
        assert!(!validate(&json!({"userId": ""})));
        assert!(!validate(&json!({"userId": 42})));
    }

    #[test]
    fn validate_checks_numeric_fields() {
        assert!(validate(&json!({"userId": "u1", "amount": -5.5, "balance": 3})));
        assert!(!validate(&json!({"userId": "u1", "amount": "12"})));
        assert!(!validate(&json!({"userId": "u1", "balance": null})));
    }

    // ── sanitize ──

    #[test]
    fn sanitize_drops_nulls_and_coerces_numbers() {
        let out = sanitize(fields(json!({
            "a": null,
            "b": "42",
            "c": "-3.5",
            "d": "Groceries",
            "e": true,
            "f": "",
            "g": " 7 ",
            "h": "NaN",
            "i": {"nested": "1"}
        })));
        assert_eq!(
            Value::Object(out),
            json!({
                "b": 42,
                "c": -3.5,
                "d": "Groceries",
                "e": true,
                "f": "",
                "g": 7,
                "h": "NaN",
                "i": {"nested": "1"}
            })
        );
    }

    // ── encode ──

    #[test]
    fn encode_stamps_owner_and_timestamp() {
        let account = Account {
            id: "a1".into(),
            name: "Main".into(),
            balance: dec!(10.5),
            kind: AccountKind::Checking,
            currency: "EUR".into(),
        };
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let doc = encode(&account, &"u1".into(), now).unwrap();
        assert_eq!(doc["userId"], "u1");
        assert_eq!(doc["updatedAt"], "2024-05-01T12:00:00.000Z");
        assert_eq!(doc["balance"], json!(10.5));
        assert_eq!(doc["type"], "checking");
    }

    #[test]
    fn encode_keeps_numeric_owner_as_string() {
        let account = Account {
            id: "a1".into(),
            name: "Main".into(),
            balance: dec!(0),
            kind: AccountKind::Savings,
            currency: "EUR".into(),
        };
        let doc = encode(&account, &"12345".into(), Utc::now()).unwrap();
        assert_eq!(doc["userId"], "12345");
    }

    // ── decode ──

    #[test]
    fn decode_uses_document_key_as_id() {
        let raw = RawDocument {
            id: "t-remote".into(),
            fields: json!({
                "id": "stale",
                "userId": "u1",
                "accountId": "a1",
                "amount": -20,
                "description": "Lunch",
                "category": "Food",
                "date": "2024-03-02",
                "type": "expense"
            }),
        };
        let tx: Transaction = decode(raw).unwrap();
        assert_eq!(tx.id.as_str(), "t-remote");
        assert_eq!(tx.amount, dec!(-20));
    }

    #[test]
    fn decode_drops_invalid_documents() {
        let raw = RawDocument {
            id: "a1".into(),
            fields: json!({"name": "no owner", "balance": 1, "type": "checking"}),
        };
        assert!(decode::<Account>(raw).is_none());

        let raw = RawDocument {
            id: "a2".into(),
            fields: json!({"userId": "u1", "name": "x", "balance": "12", "type": "checking"}),
        };
        assert!(decode::<Account>(raw).is_none());
    }

    #[test]
    fn decode_drops_shape_mismatch() {
        let raw = RawDocument {
            id: "a1".into(),
            fields: json!({"userId": "u1", "name": "x", "balance": 1, "type": "brokerage"}),
        };
        assert!(decode::<Account>(raw).is_none());
    }
}
