use std::sync::Arc;
use tracing::{debug, warn};

use super::{MetadataSource, TokenMetadataRecord, TOKEN_TYPE_NFT1_CHILD, TOKEN_TYPE_NFT1_GROUP};
use crate::errors::LookupResult;
use crate::tokens::TokenId;

/// Group relationship of a token
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenClassification {
    /// The token is a group token; its group id is its own id
    Group,
    /// The token belongs to the given group
    Child(TokenId),
    /// No metadata, or a token type with no group relationship
    Unknown,
}

impl TokenClassification {
    /// Group id the classified token maps to, if any
    pub fn group_id(&self, token_id: &TokenId) -> Option<TokenId> {
        match self {
            Self::Group => Some(token_id.clone()),
            Self::Child(group_id) => Some(group_id.clone()),
            Self::Unknown => None,
        }
    }
}

/// Classifies tokens with exactly one metadata query per call. Does not cache.
#[derive(Clone)]
pub struct MetadataResolver {
    source: Arc<dyn MetadataSource>,
}

impl MetadataResolver {
    pub fn new(source: Arc<dyn MetadataSource>) -> Self {
        Self { source }
    }

    pub async fn classify(&self, id: &TokenId) -> LookupResult<TokenClassification> {
        let records = self
            .source
            .get_token_metadata(std::slice::from_ref(id))
            .await?;

        let classification = match records.first() {
            Some(record) => Self::classify_record(id, record),
            None => TokenClassification::Unknown,
        };
        debug!("Classified token {} as {:?}", id, classification);
        Ok(classification)
    }

    fn classify_record(id: &TokenId, record: &TokenMetadataRecord) -> TokenClassification {
        match record.token_type {
            TOKEN_TYPE_NFT1_GROUP => TokenClassification::Group,
            TOKEN_TYPE_NFT1_CHILD => match record.group_id.as_deref() {
                Some(group_id) if !group_id.is_empty() => {
                    TokenClassification::Child(TokenId::from_bytes(group_id))
                }
                _ => {
                    warn!("NFT1 child token {} has no group id in its metadata", id);
                    TokenClassification::Unknown
                }
            },
            _ => TokenClassification::Unknown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::LookupError;
    use crate::metadata::MockMetadataSource;

    fn record(token_type: u32, group_id: Option<Vec<u8>>) -> TokenMetadataRecord {
        TokenMetadataRecord {
            token_type,
            group_id,
        }
    }

    fn resolver_returning(records: Vec<TokenMetadataRecord>) -> MetadataResolver {
        let mut source = MockMetadataSource::new();
        source
            .expect_get_token_metadata()
            .times(1)
            .returning(move |_| Ok(records.clone()));
        MetadataResolver::new(Arc::new(source))
    }

    #[tokio::test]
    async fn test_group_record_classifies_as_group() {
        let resolver = resolver_returning(vec![record(0x81, None)]);
        let id = TokenId::new("abc123");
        let classification = resolver.classify(&id).await.unwrap();
        assert_eq!(classification, TokenClassification::Group);
        assert_eq!(classification.group_id(&id), Some(id));
    }

    #[tokio::test]
    async fn test_child_record_hex_encodes_group_id() {
        let resolver = resolver_returning(vec![record(0x41, Some(vec![0xab, 0xc1, 0x23]))]);
        let classification = resolver.classify(&TokenId::new("def456")).await.unwrap();
        assert_eq!(
            classification,
            TokenClassification::Child(TokenId::new("abc123"))
        );
    }

    #[tokio::test]
    async fn test_other_token_types_are_unknown() {
        for token_type in [0x01, 0x00, 0x42, 0x80] {
            let resolver = resolver_returning(vec![record(token_type, Some(vec![0xab]))]);
            let classification = resolver.classify(&TokenId::new("abc123")).await.unwrap();
            assert_eq!(classification, TokenClassification::Unknown, "type {token_type:#x}");
        }
    }

    #[tokio::test]
    async fn test_empty_metadata_is_unknown() {
        let resolver = resolver_returning(Vec::new());
        let classification = resolver.classify(&TokenId::new("xyz999")).await.unwrap();
        assert_eq!(classification, TokenClassification::Unknown);
        assert_eq!(classification.group_id(&TokenId::new("xyz999")), None);
    }

    #[tokio::test]
    async fn test_child_without_group_bytes_is_unknown() {
        let resolver = resolver_returning(vec![record(0x41, Some(Vec::new()))]);
        let classification = resolver.classify(&TokenId::new("def456")).await.unwrap();
        assert_eq!(classification, TokenClassification::Unknown);
    }

    #[tokio::test]
    async fn test_only_first_record_is_consulted() {
        let resolver = resolver_returning(vec![record(0x01, None), record(0x81, None)]);
        let classification = resolver.classify(&TokenId::new("abc123")).await.unwrap();
        assert_eq!(classification, TokenClassification::Unknown);
    }

    #[tokio::test]
    async fn test_queries_only_the_requested_token() {
        let mut source = MockMetadataSource::new();
        source
            .expect_get_token_metadata()
            .withf(|ids: &[TokenId]| ids == [TokenId::new("abc123")])
            .times(1)
            .returning(|_| Ok(Vec::new()));
        let resolver = MetadataResolver::new(Arc::new(source));
        resolver.classify(&TokenId::new("abc123")).await.unwrap();
    }

    #[tokio::test]
    async fn test_lookup_errors_propagate() {
        let mut source = MockMetadataSource::new();
        source
            .expect_get_token_metadata()
            .times(1)
            .returning(|_| Err(tonic::Status::unavailable("down").into()));
        let resolver = MetadataResolver::new(Arc::new(source));
        let err = resolver.classify(&TokenId::new("abc123")).await.unwrap_err();
        assert!(matches!(err, LookupError::Status { .. }));
    }
}
