//! Centralized error handling for the card service
//!
//! Errors are split by layer so that each one carries only what its caller
//! can act on:
//!
//! - **Lookup Errors**: the remote token metadata call failed
//! - **Asset Errors**: reading or enumerating card files failed
//! - **App Errors**: everything a request handler can end up with
//!
//! Request handlers never let an error escape as a 5xx; see
//! [`AppError`]'s `IntoResponse` implementation in the web layer.

pub mod types;

pub use types::*;

/// Convenience type alias for Results using AppError
pub type AppResult<T> = Result<T, AppError>;

/// Convenience type alias for remote lookup Results
pub type LookupResult<T> = Result<T, LookupError>;

/// Convenience type alias for card store Results
pub type AssetResult<T> = Result<T, AssetError>;
