//! Token metadata lookup and classification
//!
//! A [`MetadataSource`] answers raw metadata queries (in production the BCHD
//! gRPC API, see [`bchd`]); [`MetadataResolver`] turns the answer for a single
//! token into a [`TokenClassification`].

use async_trait::async_trait;

use crate::errors::LookupResult;
use crate::tokens::TokenId;

pub mod bchd;
pub mod proto;
pub mod resolver;

pub use bchd::BchdMetadataSource;
pub use resolver::{MetadataResolver, TokenClassification};

/// SLP token type of an NFT1 group token
pub const TOKEN_TYPE_NFT1_GROUP: u32 = 0x81;

/// SLP token type of an NFT1 child token
pub const TOKEN_TYPE_NFT1_CHILD: u32 = 0x41;

/// One metadata record as returned by the metadata service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenMetadataRecord {
    pub token_type: u32,
    /// Parent group id bytes, present on NFT1 child records
    pub group_id: Option<Vec<u8>>,
}

/// Remote token metadata service
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MetadataSource: Send + Sync {
    /// Fetch metadata for the given tokens.
    ///
    /// Tokens the service does not know are simply missing from the result.
    async fn get_token_metadata(&self, ids: &[TokenId]) -> LookupResult<Vec<TokenMetadataRecord>>;
}
