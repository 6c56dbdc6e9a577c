use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Body of every error response: `{"error": "..."}`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// Acknowledgement body for updates and message-style deletes
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MessageBody {
    pub message: String,
}

impl MessageBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Response to a successful create
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreatedBody {
    pub id: String,
}

/// Health probe body
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatusBody {
    pub status: String,
}

impl StatusBody {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
        }
    }
}

/// Filtered product listing. `count` is the length of `products`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductList {
    pub count: usize,
    pub products: Vec<JsonValue>,
}

impl ProductList {
    pub fn new(products: Vec<JsonValue>) -> Self {
        Self {
            count: products.len(),
            products,
        }
    }
}
