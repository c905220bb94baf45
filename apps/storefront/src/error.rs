//! # Error Types
//!
//! Store-level errors and the serialized error the UI receives.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in the Cart                               │
//! │                                                                         │
//! │  UI                          Rust Backend                               │
//! │  ──                          ────────────                               │
//! │                                                                         │
//! │  increment('p-1')                                                       │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Command Function                                                │  │
//! │  │  Result<CartResponse, ApiError>                                  │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  No provider? ──── CartError::OutsideProvider ───┐              │  │
//! │  │         │                                         │              │  │
//! │  │         ▼                                         ▼              │  │
//! │  │  Write failed? ─── CartError::Storage(DbError) ── ApiError ────►│  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Success ──────────────────────────────────────────────────────►│  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  { "code": "STORAGE_ERROR", "message": "Could not save the cart" }     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use gomarket_core::{CoreError, ValidationError};
use gomarket_db::DbError;
use serde::Serialize;
use thiserror::Error;

// =============================================================================
// Cart Error
// =============================================================================

/// Errors from cart store operations.
#[derive(Debug, Error)]
pub enum CartError {
    /// The cart API was used with no mounted provider.
    ///
    /// ## When This Occurs
    /// - `use_cart()` on an unmounted `CartProvider`
    /// - A `CartHandle` kept around after its provider unmounted
    ///
    /// This is a programming error in the caller, not a runtime condition.
    #[error("Cart used outside of a mounted CartProvider")]
    OutsideProvider,

    /// Durable storage failed before anything was committed. Safe to retry.
    #[error("Storage error: {0}")]
    Storage(#[from] DbError),

    /// The write landed but reading the cart back failed.
    ///
    /// The in-memory cart is stale until the next load. Retrying the
    /// mutation would apply it twice; reload instead.
    #[error("Cart saved but could not be reloaded: {0}")]
    ResyncFailed(#[source] DbError),

    /// Domain error (corrupt stored cart, invalid input).
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Configuration is invalid.
    #[error("Invalid cart configuration: {0}")]
    InvalidConfig(String),

    /// Config file could not be read or parsed.
    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    /// The background load task panicked or was cancelled.
    #[error("Background cart task failed: {0}")]
    Task(String),
}

impl From<ValidationError> for CartError {
    fn from(err: ValidationError) -> Self {
        CartError::Core(CoreError::Validation(err))
    }
}

impl From<std::io::Error> for CartError {
    fn from(err: std::io::Error) -> Self {
        CartError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for CartError {
    fn from(err: toml::de::Error) -> Self {
        CartError::ConfigLoadFailed(err.to_string())
    }
}

/// Result type for cart store operations.
pub type CartResult<T> = Result<T, CartError>;

// =============================================================================
// API Error
// =============================================================================

/// Error returned from cart commands.
///
/// ## Serialization
/// ```json
/// {
///   "code": "CORRUPT_STATE",
///   "message": "Stored cart is corrupt: expected value at line 1 column 1"
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for command responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Cart API used outside a provider
    UsageError,

    /// Input validation failed
    ValidationError,

    /// Durable storage failed; nothing changed, safe to retry
    StorageError,

    /// The change was saved but the cart could not be re-read; reload, don't retry
    StaleState,

    /// Stored cart could not be parsed
    CorruptState,

    /// Configuration could not be loaded
    ConfigError,

    /// Anything else
    Internal,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }
}

/// Converts store errors to API errors.
impl From<CartError> for ApiError {
    fn from(err: CartError) -> Self {
        match err {
            CartError::OutsideProvider => ApiError::new(ErrorCode::UsageError, err.to_string()),
            CartError::Storage(e) => {
                // Log the actual error but return a generic message
                tracing::error!("Cart storage failed: {}", e);
                ApiError::new(ErrorCode::StorageError, "Could not save the cart")
            }
            CartError::ResyncFailed(e) => {
                tracing::error!("Cart reload after save failed: {}", e);
                ApiError::new(ErrorCode::StaleState, "Saved, but could not refresh the cart")
            }
            CartError::Core(CoreError::CorruptState { reason }) => ApiError::new(
                ErrorCode::CorruptState,
                format!("Stored cart is corrupt: {}", reason),
            ),
            CartError::Core(CoreError::Validation(e)) => {
                ApiError::new(ErrorCode::ValidationError, e.to_string())
            }
            CartError::Core(e @ CoreError::Encode(_)) => {
                tracing::error!("Cart encode failed: {}", e);
                ApiError::new(ErrorCode::Internal, "Could not encode the cart")
            }
            CartError::InvalidConfig(_) | CartError::ConfigLoadFailed(_) => {
                ApiError::new(ErrorCode::ConfigError, err.to_string())
            }
            CartError::Task(e) => {
                tracing::error!("Cart task failed: {}", e);
                ApiError::new(ErrorCode::Internal, "Cart task failed")
            }
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}
