use bytes::Bytes;
use std::io::ErrorKind;
use std::path::PathBuf;
use tokio::fs;

use super::CardSize;
use crate::errors::{AssetError, AssetResult};
use crate::tokens::TokenId;

/// Read access to rendered cards laid out as `{root}/{size}/{token_id}.png`
#[derive(Clone)]
pub struct CardStore {
    root: PathBuf,
}

impl CardStore {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn get_file_path(&self, size: CardSize, token_id: &TokenId) -> PathBuf {
        self.root
            .join(size.to_string())
            .join(format!("{}.png", token_id))
    }

    /// Card bytes, or `None` when no card is stored for this token and size
    pub async fn read(&self, size: CardSize, token_id: &TokenId) -> AssetResult<Option<Bytes>> {
        let path = self.get_file_path(size, token_id);
        match fs::read(&path).await {
            Ok(data) => Ok(Some(Bytes::from(data))),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AssetError::read(path, e)),
        }
    }
}
