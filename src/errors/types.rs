//! Error type definitions for the card service

use std::path::PathBuf;
use thiserror::Error;

/// Top-level application error type
///
/// Every failure on the request path ends up here before it is turned into
/// an HTTP response.
#[derive(Error, Debug)]
pub enum AppError {
    /// Remote token metadata lookup failed
    #[error("Lookup error: {0}")]
    Lookup(#[from] LookupError),

    /// Card store errors
    #[error("Asset error: {0}")]
    Asset(#[from] AssetError),

    /// Classification succeeded but the token is neither a group nor a child
    #[error("Unresolved token: {token_id}")]
    Unresolved { token_id: String },

    /// No card is stored for the token at the requested size
    #[error("Card not found: {token_id} at size {size}")]
    AssetNotFound { token_id: String, size: String },

    /// Request parameters that can never name a card
    #[error("Invalid request: {field} - {message}")]
    InvalidRequest { field: String, message: String },
}

/// Remote token metadata lookup errors
///
/// None of these are cached; the next lookup for the same token retries.
#[derive(Error, Debug)]
pub enum LookupError {
    /// The metadata endpoint address could not be turned into a channel
    #[error("Invalid metadata endpoint: {endpoint} - {message}")]
    InvalidEndpoint { endpoint: String, message: String },

    /// Connection level failure before a response was received
    #[error("Transport error: {0}")]
    Transport(#[from] tonic::transport::Error),

    /// The metadata service answered with a non-OK gRPC status
    #[error("Metadata service returned {code}: {message}")]
    Status { code: String, message: String },
}

/// Card store errors
#[derive(Error, Debug)]
pub enum AssetError {
    /// A card file exists but could not be read
    #[error("Failed to read card {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The card directory could not be enumerated
    #[error("Failed to enumerate cards in {path:?}: {source}")]
    Enumerate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl From<tonic::Status> for LookupError {
    fn from(status: tonic::Status) -> Self {
        Self::Status {
            code: format!("{:?}", status.code()),
            message: status.message().to_string(),
        }
    }
}

/// Convenience methods for creating common error types
impl AppError {
    /// Create an unresolved token error
    pub fn unresolved<S: Into<String>>(token_id: S) -> Self {
        Self::Unresolved {
            token_id: token_id.into(),
        }
    }

    /// Create a card not found error
    pub fn asset_not_found<T: Into<String>, S: Into<String>>(token_id: T, size: S) -> Self {
        Self::AssetNotFound {
            token_id: token_id.into(),
            size: size.into(),
        }
    }

    /// Create an invalid request error
    pub fn invalid_request<F: Into<String>, M: Into<String>>(field: F, message: M) -> Self {
        Self::InvalidRequest {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl LookupError {
    /// Create an invalid endpoint error
    pub fn invalid_endpoint<E: Into<String>, M: Into<String>>(endpoint: E, message: M) -> Self {
        Self::InvalidEndpoint {
            endpoint: endpoint.into(),
            message: message.into(),
        }
    }
}

impl AssetError {
    /// Create a read error for a card path
    pub fn read<P: Into<PathBuf>>(path: P, source: std::io::Error) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }

    /// Create an enumeration error for a card directory
    pub fn enumerate<P: Into<PathBuf>>(path: P, source: std::io::Error) -> Self {
        Self::Enumerate {
            path: path.into(),
            source,
        }
    }
}
