//! Resource kinds served by the API and their body validation rules

use serde_json::Value as JsonValue;

use crate::JsonMap;
use crate::error::ValidationError;

/// Identifier field as stored in the database
pub const ID_FIELD: &str = "_id";

/// How a successful delete is reported to the client
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteStyle {
    /// `204 No Content`, empty body
    NoContent,
    /// `200 {"message":"Deleted successfully"}`
    Message,
}

/// A document collection exposed under `/api/{path}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Items,
    Products,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 2] = [ResourceKind::Items, ResourceKind::Products];

    /// Collection name in the store, also the URL segment
    pub fn collection(self) -> &'static str {
        match self {
            ResourceKind::Items => "items",
            ResourceKind::Products => "products",
        }
    }

    pub fn not_found_message(self) -> &'static str {
        match self {
            ResourceKind::Items => "Item not found",
            ResourceKind::Products => "Product not found",
        }
    }

    /// Whether the list route honours filter/sort/projection parameters
    pub fn supports_query(self) -> bool {
        matches!(self, ResourceKind::Products)
    }

    pub fn delete_style(self) -> DeleteStyle {
        match self {
            ResourceKind::Items => DeleteStyle::NoContent,
            ResourceKind::Products => DeleteStyle::Message,
        }
    }

    /// Validate a create body and return the fields to insert.
    ///
    /// Any caller-supplied `_id` is dropped; identifiers are assigned by
    /// the store.
    pub fn validate_create(self, body: JsonValue) -> Result<JsonMap, ValidationError> {
        let JsonValue::Object(mut fields) = body else {
            return Err(ValidationError::NotAnObject);
        };
        fields.remove(ID_FIELD);

        match self {
            ResourceKind::Items => {
                if !fields.get("name").is_some_and(is_truthy) {
                    return Err(ValidationError::NameRequired);
                }
            }
            ResourceKind::Products => validate_product(&fields)?,
        }

        Ok(fields)
    }
}

fn validate_product(fields: &JsonMap) -> Result<(), ValidationError> {
    let name = fields.get("name").filter(|v| is_truthy(v));
    let price = fields.get("price").filter(|v| !v.is_null());
    let category = fields.get("category").filter(|v| is_truthy(v));

    let (Some(name), Some(price), Some(category)) = (name, price, category) else {
        return Err(ValidationError::ProductFieldsRequired);
    };

    if !name.is_string() {
        return Err(ValidationError::WrongType {
            field: "name",
            expected: "string",
        });
    }
    if !price.is_number() {
        return Err(ValidationError::WrongType {
            field: "price",
            expected: "number",
        });
    }
    if !category.is_string() {
        return Err(ValidationError::WrongType {
            field: "category",
            expected: "string",
        });
    }
    Ok(())
}

/// Validate a PUT/PATCH body and return the fields to merge.
///
/// The body must be a non-empty object that does not touch `_id`.
pub fn validate_update(body: JsonValue) -> Result<JsonMap, ValidationError> {
    match body {
        JsonValue::Object(fields) if !fields.is_empty() && !fields.contains_key(ID_FIELD) => {
            Ok(fields)
        }
        _ => Err(ValidationError::InvalidUpdate),
    }
}

/// JavaScript-style truthiness, used for the required `name` check
fn is_truthy(value: &JsonValue) -> bool {
    match value {
        JsonValue::Null => false,
        JsonValue::Bool(b) => *b,
        JsonValue::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        JsonValue::String(s) => !s.is_empty(),
        JsonValue::Array(_) | JsonValue::Object(_) => true,
    }
}
