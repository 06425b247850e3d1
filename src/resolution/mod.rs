//! Process-lifetime token to group resolution cache
//!
//! Token types never change once minted, so a successful classification is
//! valid for as long as the process runs. Entries are only ever added.
//! `Unknown` results are not remembered: every request for an unresolved
//! token goes back to the metadata service.
//!
//! No lock is held across the metadata call. Two requests that miss on the
//! same token at the same time both classify it and both store the same
//! answer.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::errors::LookupResult;
use crate::metadata::{MetadataResolver, TokenClassification};
use crate::tokens::TokenId;

/// Memoizes group resolution in front of a [`MetadataResolver`]
#[derive(Clone)]
pub struct ResolutionCache {
    resolver: MetadataResolver,
    /// token id -> group id; group tokens map to themselves
    entries: Arc<RwLock<HashMap<TokenId, TokenId>>>,
}

impl ResolutionCache {
    pub fn new(resolver: MetadataResolver) -> Self {
        Self {
            resolver,
            entries: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Group id owning `id`, or `None` if the token has no group relationship.
    ///
    /// Lookup errors are returned as-is and leave the cache untouched.
    pub async fn resolve_group_id(&self, id: &TokenId) -> LookupResult<Option<TokenId>> {
        if let Some(group_id) = self.cached(id).await {
            return Ok(Some(group_id));
        }

        let classification = self.resolver.classify(id).await?;
        let Some(group_id) = classification.group_id(id) else {
            debug!("Token {} is not part of a group, not caching", id);
            return Ok(None);
        };

        self.entries
            .write()
            .await
            .insert(id.clone(), group_id.clone());
        match classification {
            TokenClassification::Group => info!("Cached group token {}", id),
            _ => info!("Cached child token {} -> group {}", id, group_id),
        }
        Ok(Some(group_id))
    }

    /// Cached group id for `id` without consulting the metadata service
    pub async fn cached(&self, id: &TokenId) -> Option<TokenId> {
        self.entries.read().await.get(id).cloned()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::LookupError;
    use crate::metadata::{MockMetadataSource, TokenMetadataRecord};

    fn group_record() -> TokenMetadataRecord {
        TokenMetadataRecord {
            token_type: 0x81,
            group_id: None,
        }
    }

    fn child_record(group_id: &[u8]) -> TokenMetadataRecord {
        TokenMetadataRecord {
            token_type: 0x41,
            group_id: Some(group_id.to_vec()),
        }
    }

    fn cache_with(source: MockMetadataSource) -> ResolutionCache {
        ResolutionCache::new(MetadataResolver::new(Arc::new(source)))
    }

    #[tokio::test]
    async fn test_group_resolution_is_fetched_once() {
        let mut source = MockMetadataSource::new();
        source
            .expect_get_token_metadata()
            .times(1)
            .returning(|_| Ok(vec![group_record()]));
        let cache = cache_with(source);
        let id = TokenId::new("abc123");

        for _ in 0..5 {
            assert_eq!(cache.resolve_group_id(&id).await.unwrap(), Some(id.clone()));
        }
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn test_child_resolution_is_fetched_once() {
        let mut source = MockMetadataSource::new();
        source
            .expect_get_token_metadata()
            .times(1)
            .returning(|_| Ok(vec![child_record(&[0xab, 0xc1, 0x23])]));
        let cache = cache_with(source);
        let child = TokenId::new("def456");

        for _ in 0..3 {
            assert_eq!(
                cache.resolve_group_id(&child).await.unwrap(),
                Some(TokenId::new("abc123"))
            );
        }
    }

    #[tokio::test]
    async fn test_child_does_not_cache_its_group() {
        let mut source = MockMetadataSource::new();
        source
            .expect_get_token_metadata()
            .withf(|ids: &[TokenId]| ids[0].as_str() == "def456")
            .times(1)
            .returning(|_| Ok(vec![child_record(&[0xab, 0xc1, 0x23])]));
        source
            .expect_get_token_metadata()
            .withf(|ids: &[TokenId]| ids[0].as_str() == "abc123")
            .times(1)
            .returning(|_| Ok(vec![group_record()]));
        let cache = cache_with(source);

        cache.resolve_group_id(&TokenId::new("def456")).await.unwrap();
        assert_eq!(cache.cached(&TokenId::new("abc123")).await, None);

        let group = cache.resolve_group_id(&TokenId::new("abc123")).await.unwrap();
        assert_eq!(group, Some(TokenId::new("abc123")));
        assert_eq!(cache.len().await, 2);
    }

    #[tokio::test]
    async fn test_unknown_tokens_are_requeried_every_time() {
        let mut source = MockMetadataSource::new();
        source
            .expect_get_token_metadata()
            .times(4)
            .returning(|_| Ok(Vec::new()));
        let cache = cache_with(source);
        let id = TokenId::new("xyz999");

        for _ in 0..4 {
            assert_eq!(cache.resolve_group_id(&id).await.unwrap(), None);
        }
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn test_lookup_errors_are_not_cached() {
        let mut source = MockMetadataSource::new();
        let mut seq = mockall::Sequence::new();
        source
            .expect_get_token_metadata()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Err(tonic::Status::unavailable("node down").into()));
        source
            .expect_get_token_metadata()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(vec![group_record()]));
        let cache = cache_with(source);
        let id = TokenId::new("abc123");

        let err = cache.resolve_group_id(&id).await.unwrap_err();
        assert!(matches!(err, LookupError::Status { .. }));
        assert!(cache.is_empty().await);

        assert_eq!(cache.resolve_group_id(&id).await.unwrap(), Some(id.clone()));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_first_lookups_agree() {
        let mut source = MockMetadataSource::new();
        source
            .expect_get_token_metadata()
            .times(1..=16)
            .returning(|_| Ok(vec![child_record(&[0xab, 0xc1, 0x23])]));
        let cache = cache_with(source);

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let cache = cache.clone();
                tokio::spawn(async move { cache.resolve_group_id(&TokenId::new("def456")).await })
            })
            .collect();

        for handle in handles {
            let group = handle.await.unwrap().unwrap();
            assert_eq!(group, Some(TokenId::new("abc123")));
        }
        assert_eq!(cache.len().await, 1);
        assert_eq!(
            cache.cached(&TokenId::new("def456")).await,
            Some(TokenId::new("abc123"))
        );
    }
}
