//! shop-core: Shared document types and request-shaping logic
//!
//! This crate holds everything the HTTP layer needs that does not touch
//! the network: resource kinds and their validation rules, document
//! identifiers, the list query builder, BSON/JSON conversion, and the
//! response bodies.

pub mod convert;
pub mod error;
pub mod id;
pub mod query;
pub mod resource;
pub mod response;

// Re-export our types
pub use convert::{document_to_json, json_to_document};
pub use error::{InvalidId, ValidationError};
pub use id::DocumentId;
pub use query::{FindSpec, ListParams};
pub use resource::{DeleteStyle, ResourceKind};
pub use response::{CreatedBody, ErrorBody, MessageBody, ProductList, StatusBody};

/// A JSON object, as received in request bodies
pub type JsonMap = serde_json::Map<String, serde_json::Value>;
