//! Card HTTP handlers

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Json, Response},
};
use std::str::FromStr;
use tracing::debug;

use super::{
    responses::{card_response, moved_permanently, HealthResponse},
    AppState,
};
use crate::cards::CardSize;
use crate::errors::{AppError, AppResult};
use crate::tokens::TokenId;

/// Validate the `{size}/{token_id}` part of a card URL
fn parse_card_path(size: &str, token_id: &str) -> AppResult<(CardSize, TokenId)> {
    let size = CardSize::from_str(size)
        .map_err(|_| AppError::invalid_request("size", format!("unsupported size '{}'", size)))?;
    let token_id = TokenId::from_request(token_id)
        .ok_or_else(|| AppError::invalid_request("token_id", "not a token id"))?;
    Ok((size, token_id))
}

/// `GET /cards/{size}/{token_id}`: the stored card, or 404
pub async fn serve_card(
    State(state): State<AppState>,
    Path((size, token_id)): Path<(String, String)>,
) -> AppResult<Response> {
    let (size, token_id) = parse_card_path(&size, &token_id)?;

    match state.card_store.read(size, &token_id).await? {
        Some(data) => Ok(card_response(data)),
        None => Err(AppError::asset_not_found(token_id.as_str(), size.to_string())),
    }
}

/// `GET /{size}/{token_id}`: 301 to the card of the token's group.
///
/// Every child of a group is sent to the same canonical `/cards` URL.
pub async fn redirect_to_group_card(
    State(state): State<AppState>,
    Path((size, token_id)): Path<(String, String)>,
) -> AppResult<Response> {
    let (size, token_id) = parse_card_path(&size, &token_id)?;

    let group_id = state
        .resolution_cache
        .resolve_group_id(&token_id)
        .await?
        .ok_or_else(|| AppError::unresolved(token_id.as_str()))?;

    if !state.known_groups.contains(&group_id) {
        return Err(AppError::asset_not_found(group_id.as_str(), size.to_string()));
    }

    let location = format!("{}/cards/{}/{}", state.base_path, size, group_id);
    debug!("Redirecting {} to {}", token_id, location);
    Ok(moved_permanently(location))
}

/// `GET /health`
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(HealthResponse::healthy(
        state.start_time,
        state.resolution_cache.len().await,
        state.known_groups.len(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_card_path() {
        let (size, token) = parse_card_path("128", "abc123").unwrap();
        assert_eq!(size, CardSize::Px128);
        assert_eq!(token, TokenId::new("abc123"));

        assert!(matches!(
            parse_card_path("huge", "abc123"),
            Err(AppError::InvalidRequest { .. })
        ));
        assert!(matches!(
            parse_card_path("32", "..%2F..%2Fetc"),
            Err(AppError::InvalidRequest { .. })
        ));
    }
}
