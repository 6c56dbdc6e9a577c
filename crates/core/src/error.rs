use thiserror::Error;

/// Rejections raised while validating a request body
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Request body must be a JSON object")]
    NotAnObject,

    #[error("Name is required")]
    NameRequired,

    #[error("Name, price and category are required")]
    ProductFieldsRequired,

    #[error("{field} must be a {expected}")]
    WrongType {
        field: &'static str,
        expected: &'static str,
    },

    #[error("Invalid ID or data")]
    InvalidUpdate,
}

/// A path segment that is not a well-formed document identifier
#[derive(Debug, Error, PartialEq, Eq)]
#[error("Invalid ID")]
pub struct InvalidId;
