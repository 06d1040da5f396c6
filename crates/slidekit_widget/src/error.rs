//! Error types for slidekit_widget

use thiserror::Error;

/// Errors from typed style-attribute lookups
///
/// These never surface to widget users: `SliderStyle::from_attrs` logs the
/// failure and falls back to the attribute's default.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StyleError {
    /// Attribute value is not a valid float
    #[error("attribute `{attr}` is not a float: `{value}`")]
    InvalidFloat { attr: String, value: String },

    /// Attribute value is not a valid boolean
    #[error("attribute `{attr}` is not a bool: `{value}`")]
    InvalidBool { attr: String, value: String },

    /// Attribute value is not a valid integer
    #[error("attribute `{attr}` is not an integer: `{value}`")]
    InvalidInt { attr: String, value: String },
}
