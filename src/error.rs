//! Error types.

use thiserror::Error;

/// Errors from registering sections and tracked elements.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ViewportError {
    /// A section with this id is already registered.
    #[error("section already registered: {0}")]
    DuplicateSection(String),

    /// The element is already tracked by the reveal controller.
    #[error("element already tracked: {0}")]
    DuplicateElement(String),

    /// A required page element could not be found.
    #[error("element not found: {0}")]
    MissingElement(String),

    /// A required attribute is absent or holds an unusable value.
    #[error("attribute '{attribute}' missing or invalid on {element}")]
    InvalidAttribute { element: String, attribute: String },
}

/// Errors from loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse viewport config: {0}")]
    Parse(#[from] serde_json::Error),

    /// A value parsed but is out of range.
    #[error("invalid viewport config: {0}")]
    Invalid(String),
}

/// Contact form validation failures. The display text is what the visitor
/// sees in the error notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("Please fill in all fields")]
    MissingField,

    #[error("Please enter a valid email address")]
    InvalidEmail,

    #[error("Message must be at least {min} characters long")]
    MessageTooShort { min: usize },
}
