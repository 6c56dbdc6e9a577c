//! Conversion between request/response JSON and stored BSON documents

use bson::{Bson, Document};
use serde_json::{Number, Value as JsonValue};

use crate::JsonMap;

/// Convert a JSON object into a BSON document.
///
/// Integers that fit in 32 bits are stored as `Int32`, wider integers as
/// `Int64`, everything else as `Double`.
pub fn json_to_document(map: JsonMap) -> Document {
    map.into_iter()
        .map(|(key, value)| (key, json_to_bson(value)))
        .collect()
}

fn json_to_bson(value: JsonValue) -> Bson {
    match value {
        JsonValue::Null => Bson::Null,
        JsonValue::Bool(b) => Bson::Boolean(b),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                i32::try_from(i).map_or(Bson::Int64(i), Bson::Int32)
            } else {
                Bson::Double(n.as_f64().unwrap_or(f64::NAN))
            }
        }
        JsonValue::String(s) => Bson::String(s),
        JsonValue::Array(values) => Bson::Array(values.into_iter().map(json_to_bson).collect()),
        JsonValue::Object(map) => Bson::Document(json_to_document(map)),
    }
}

/// Render a stored document as response JSON.
///
/// ObjectIds become plain hex strings, dates become RFC 3339 strings and
/// non-finite doubles become `null`.
pub fn document_to_json(document: Document) -> JsonValue {
    JsonValue::Object(
        document
            .into_iter()
            .map(|(key, value)| (key, bson_to_json(value)))
            .collect(),
    )
}

fn bson_to_json(value: Bson) -> JsonValue {
    match value {
        Bson::Null | Bson::Undefined => JsonValue::Null,
        Bson::Boolean(b) => JsonValue::Bool(b),
        Bson::Int32(i) => JsonValue::from(i),
        Bson::Int64(i) => JsonValue::from(i),
        Bson::Double(f) => Number::from_f64(f).map_or(JsonValue::Null, JsonValue::Number),
        Bson::String(s) => JsonValue::String(s),
        Bson::ObjectId(oid) => JsonValue::String(oid.to_hex()),
        Bson::DateTime(dt) => dt
            .try_to_rfc3339_string()
            .map_or(JsonValue::Null, JsonValue::String),
        Bson::Array(values) => JsonValue::Array(values.into_iter().map(bson_to_json).collect()),
        Bson::Document(doc) => document_to_json(doc),
        other => other.into_relaxed_extjson(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::{doc, oid::ObjectId};
    use serde_json::json;

    #[test]
    fn numbers_keep_their_width() {
        let value = json!({"small": 7, "wide": 5_000_000_000i64, "price": 9.99});
        let JsonValue::Object(map) = value else {
            unreachable!()
        };
        let doc = json_to_document(map);
        assert_eq!(doc.get("small"), Some(&Bson::Int32(7)));
        assert_eq!(doc.get("wide"), Some(&Bson::Int64(5_000_000_000)));
        assert_eq!(doc.get("price"), Some(&Bson::Double(9.99)));
    }

    #[test]
    fn nested_values_convert() {
        let JsonValue::Object(map) = json!({"tags": ["a", "b"], "dims": {"w": 2, "h": null}}) else {
            unreachable!()
        };
        let doc = json_to_document(map);
        assert_eq!(
            doc,
            doc! { "tags": ["a", "b"], "dims": { "w": 2, "h": Bson::Null } }
        );
    }

    #[test]
    fn object_ids_render_as_hex() {
        let oid = ObjectId::parse_str("65a1f0c2e4b0a1b2c3d4e5f6").unwrap();
        let json = document_to_json(doc! { "_id": oid, "name": "lamp", "price": f64::NAN });
        assert_eq!(
            json,
            json!({"_id": "65a1f0c2e4b0a1b2c3d4e5f6", "name": "lamp", "price": null})
        );
    }
}
