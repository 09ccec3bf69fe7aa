//! # Error Types
//!
//! Domain-specific error types for backroom-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  backroom-core errors (this file)                                      │
//! │  ├── CoreError        - Domain rule violations                         │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  backroom-db errors (separate crate)                                   │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DbError → caller                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (field, offending value)
//! 3. Errors are enum variants, never String

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Domain rule violations.
///
/// These are raised synchronously at the point of mutation, independent of
/// persistence. A rejected mutation leaves the prior valid value in place.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Attempt to set a negative salary on an employee.
    #[error("Salary cannot be negative: {cents} cents")]
    NegativeSalary { cents: i64 },

    /// Attempt to set a negative price on a product.
    #[error("Price cannot be negative: {cents} cents")]
    NegativePrice { cents: i64 },

    /// Attempt to set a negative stock quantity.
    #[error("Stock quantity cannot be negative: {quantity}")]
    NegativeStock { quantity: i64 },

    /// A transaction or order line with a non-positive quantity.
    ///
    /// ## When This Occurs
    /// - Building a `TransactionItem` with quantity 0 or below
    /// - Creating an `Order` for zero units
    #[error("Quantity must be positive, got {quantity}")]
    InvalidQuantity { quantity: i64 },

    /// An interval whose end precedes its start.
    ///
    /// ## When This Occurs
    /// - Absence request with end_date before start_date
    #[error("Invalid date range: {start} is after {end}")]
    InvalidDateRange { start: String, end: String },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when caller input doesn't meet field requirements.
/// Used for early validation before an entity is built or persisted.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("Field '{field}' is required")]
    Required { field: String },

    /// A field exceeds its maximum length.
    #[error("Field '{field}' exceeds maximum length of {max}")]
    TooLong { field: String, max: usize },

    /// A field has an invalid format.
    #[error("Field '{field}' is invalid: {reason}")]
    InvalidFormat { field: String, reason: String },
}

/// Result type for domain operations.
pub type CoreResult<T> = Result<T, CoreError>;
