//! BCHD gRPC token metadata client

use async_trait::async_trait;
use std::time::{Duration, Instant};
use tonic::codegen::http::uri::PathAndQuery;
use tonic::transport::{Channel, ClientTlsConfig, Endpoint};
use tracing::{debug, info};

use super::{proto, MetadataSource, TokenMetadataRecord};
use crate::errors::{LookupError, LookupResult};
use crate::tokens::TokenId;

const GET_TOKEN_METADATA_PATH: &str = "/pb.bchrpc/GetTokenMetadata";

/// [`MetadataSource`] backed by a BCHD node's `bchrpc` service
#[derive(Clone)]
pub struct BchdMetadataSource {
    channel: Channel,
}

impl BchdMetadataSource {
    /// Build a client without dialing; the connection is made on first use.
    ///
    /// An address without a scheme (`host:port`) is dialed over TLS.
    pub fn connect_lazy(address: &str, request_timeout: Duration) -> LookupResult<Self> {
        let uri = Self::endpoint_uri(address);

        let mut endpoint = Endpoint::from_shared(uri.clone())
            .map_err(|e| LookupError::invalid_endpoint(&uri, e.to_string()))?
            .timeout(request_timeout)
            .connect_timeout(request_timeout);

        if uri.starts_with("https://") {
            endpoint = endpoint
                .tls_config(ClientTlsConfig::new())
                .map_err(|e| LookupError::invalid_endpoint(&uri, e.to_string()))?;
        }

        info!("Token metadata source configured for {}", uri);
        Ok(Self {
            channel: endpoint.connect_lazy(),
        })
    }

    fn endpoint_uri(address: &str) -> String {
        let address = address.trim();
        if address.contains("://") {
            address.to_string()
        } else {
            format!("https://{}", address)
        }
    }
}

#[async_trait]
impl MetadataSource for BchdMetadataSource {
    async fn get_token_metadata(&self, ids: &[TokenId]) -> LookupResult<Vec<TokenMetadataRecord>> {
        // Non-hex ids cannot name an on-chain token
        let token_ids: Vec<Vec<u8>> = ids.iter().filter_map(TokenId::to_bytes).collect();
        if token_ids.is_empty() {
            debug!("Skipping metadata lookup, no valid token ids in {:?}", ids);
            return Ok(Vec::new());
        }

        let started = Instant::now();
        let mut grpc = tonic::client::Grpc::new(self.channel.clone());
        grpc.ready().await?;

        let codec = tonic::codec::ProstCodec::default();
        let path = PathAndQuery::from_static(GET_TOKEN_METADATA_PATH);
        let request = tonic::Request::new(proto::GetTokenMetadataRequest { token_ids });
        let response: tonic::Response<proto::GetTokenMetadataResponse> =
            grpc.unary(request, path, codec).await?;

        let records: Vec<TokenMetadataRecord> = response
            .into_inner()
            .token_metadata
            .into_iter()
            .map(Into::into)
            .collect();

        debug!(
            "Fetched {} metadata records for {} tokens in {}ms",
            records.len(),
            ids.len(),
            started.elapsed().as_millis()
        );
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_address_defaults_to_tls() {
        assert_eq!(
            BchdMetadataSource::endpoint_uri("bchd.fountainhead.cash:443"),
            "https://bchd.fountainhead.cash:443"
        );
        assert_eq!(
            BchdMetadataSource::endpoint_uri("http://127.0.0.1:8335"),
            "http://127.0.0.1:8335"
        );
    }

    #[tokio::test]
    async fn test_invalid_address_is_rejected() {
        let result = BchdMetadataSource::connect_lazy("http://bad host", Duration::from_secs(1));
        assert!(matches!(result, Err(LookupError::InvalidEndpoint { .. })));
    }

    #[tokio::test]
    async fn test_non_hex_ids_skip_the_network() {
        // Nothing listens on port 1; a real request would fail
        let source =
            BchdMetadataSource::connect_lazy("http://127.0.0.1:1", Duration::from_secs(1)).unwrap();
        let records = source
            .get_token_metadata(&[TokenId::new("xyz999")])
            .await
            .unwrap();
        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn test_unreachable_node_is_a_lookup_error() {
        let source =
            BchdMetadataSource::connect_lazy("http://127.0.0.1:1", Duration::from_secs(1)).unwrap();
        let result = source.get_token_metadata(&[TokenId::new("abc123")]).await;
        assert!(result.is_err());
    }
}
