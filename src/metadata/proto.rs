//! Subset of the BCHD `pb.bchrpc` protocol used for token metadata lookups.
//!
//! Only the fields this service reads are declared; prost skips the rest.

/// `pb.GetTokenMetadataRequest`
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct GetTokenMetadataRequest {
    #[prost(bytes = "vec", repeated, tag = "1")]
    pub token_ids: ::prost::alloc::vec::Vec<::prost::alloc::vec::Vec<u8>>,
}

/// `pb.GetTokenMetadataResponse`
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct GetTokenMetadataResponse {
    #[prost(message, repeated, tag = "1")]
    pub token_metadata: ::prost::alloc::vec::Vec<TokenMetadata>,
}

/// `pb.TokenMetadata`
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct TokenMetadata {
    #[prost(bytes = "vec", tag = "1")]
    pub token_id: ::prost::alloc::vec::Vec<u8>,
    #[prost(uint32, tag = "2")]
    pub token_type: u32,
    #[prost(oneof = "token_metadata::TypeMetadata", tags = "3, 4, 5")]
    pub type_metadata: ::core::option::Option<token_metadata::TypeMetadata>,
}

/// Nested message and enum types in `TokenMetadata`.
pub mod token_metadata {
    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct V1Fungible {
        #[prost(string, tag = "1")]
        pub token_ticker: ::prost::alloc::string::String,
        #[prost(string, tag = "2")]
        pub token_name: ::prost::alloc::string::String,
    }

    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct V1Nft1Group {
        #[prost(string, tag = "1")]
        pub token_ticker: ::prost::alloc::string::String,
        #[prost(string, tag = "2")]
        pub token_name: ::prost::alloc::string::String,
    }

    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct V1Nft1Child {
        #[prost(string, tag = "1")]
        pub token_ticker: ::prost::alloc::string::String,
        #[prost(string, tag = "2")]
        pub token_name: ::prost::alloc::string::String,
        #[prost(bytes = "vec", tag = "5")]
        pub group_id: ::prost::alloc::vec::Vec<u8>,
    }

    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum TypeMetadata {
        #[prost(message, tag = "3")]
        V1Fungible(V1Fungible),
        #[prost(message, tag = "4")]
        V1Nft1Group(V1Nft1Group),
        #[prost(message, tag = "5")]
        V1Nft1Child(V1Nft1Child),
    }
}

impl From<TokenMetadata> for super::TokenMetadataRecord {
    fn from(metadata: TokenMetadata) -> Self {
        let group_id = match metadata.type_metadata {
            Some(token_metadata::TypeMetadata::V1Nft1Child(child)) => Some(child.group_id),
            _ => None,
        };
        Self {
            token_type: metadata.token_type,
            group_id,
        }
    }
}
