//! # Validation Errors
//!
//! Domain validation failures raised while turning raw input into typed
//! records. All errors use `thiserror` for derive-based `Display` and
//! `Error` implementations.
//!
//! Every variant carries enough context to produce an actionable client
//! message; the API layer maps the whole enum to HTTP 400.

use thiserror::Error;

/// A domain validation failure.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// The date string could not be parsed in any accepted form.
    #[error("invalid date {input:?}: expected RFC 3339, YYYY-MM-DDTHH:MM:SS, or YYYY-MM-DD")]
    InvalidDate {
        /// The rejected input.
        input: String,
    },

    /// The category string does not name a known category.
    #[error("unknown category: {0:?}")]
    UnknownCategory(String),

    /// The identifier is not a well-formed UUID.
    #[error("invalid identifier: {0:?}")]
    InvalidId(String),

    /// The amount is NaN or infinite.
    #[error("amount must be a finite number")]
    NonFiniteAmount,

    /// The amount is below zero.
    #[error("amount must be non-negative, got {0}")]
    NegativeAmount(f64),

    /// A Consultants-category expense arrived without a consultant name.
    #[error("expenses in the Consultants category require a consultantName")]
    MissingConsultantName,

    /// A consultant name was empty after trimming.
    #[error("consultant name cannot be empty")]
    EmptyConsultantName,

    /// A consultant name was shorter than the minimum length.
    #[error("consultant name must be at least {min} characters long")]
    ConsultantNameTooShort {
        /// Minimum number of characters after trimming.
        min: usize,
    },
}
