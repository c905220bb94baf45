//! # Error Types
//!
//! Domain-specific error types for gomarket-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  gomarket-core errors (this file)                                      │
//! │  ├── CoreError        - Wire format and domain failures                │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  gomarket-db errors (separate crate)                                   │
//! │  └── DbError          - Durable storage failures                       │
//! │                                                                         │
//! │  storefront errors (in app)                                            │
//! │  ├── CartError        - Store operation failures                       │
//! │  └── ApiError         - What the UI sees (serialized)                  │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → CartError → ApiError → UI         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core cart errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The stored payload is not an array of cart items.
    ///
    /// ## When This Occurs
    /// - Storage holds something that is not JSON
    /// - JSON is valid but not the `[{id, title, image_url, price, quantity}]` shape
    /// - A field has the wrong type (e.g. `quantity: 1.5`)
    #[error("Stored cart is corrupt: {reason}")]
    CorruptState { reason: String },

    /// The cart could not be encoded for storage.
    #[error("Failed to encode cart: {0}")]
    Encode(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// Creates a CorruptState error.
    pub fn corrupt(reason: impl Into<String>) -> Self {
        CoreError::CorruptState {
            reason: reason.into(),
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// Price is NaN or infinite and cannot be stored as a JSON number.
    #[error("{field} must be a finite number, got {value}")]
    NonFinitePrice { field: String, value: f64 },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
