use std::collections::HashSet;
use std::path::Path;
use tokio::fs;
use tracing::{debug, info};

use crate::errors::{AssetError, AssetResult};
use crate::tokens::TokenId;

/// Group tokens that have a card, fixed for the lifetime of the process
#[derive(Debug, Clone, Default)]
pub struct KnownGroupAssets {
    groups: HashSet<TokenId>,
}

impl KnownGroupAssets {
    /// Enumerate the card directory once.
    ///
    /// The token id is the file name up to its first `.`, so both
    /// `abc123.png` and `abc123.source.png` register `abc123`.
    pub async fn load(dir: &Path) -> AssetResult<Self> {
        let mut entries = fs::read_dir(dir)
            .await
            .map_err(|e| AssetError::enumerate(dir, e))?;

        let mut groups = HashSet::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| AssetError::enumerate(dir, e))?
        {
            let file_type = entry
                .file_type()
                .await
                .map_err(|e| AssetError::enumerate(dir, e))?;
            if file_type.is_dir() {
                continue;
            }

            let file_name = entry.file_name();
            let Some(file_name) = file_name.to_str() else {
                debug!("Skipping non UTF-8 card file name {:?}", entry.path());
                continue;
            };

            match file_name.split('.').next() {
                Some(token_id) if !token_id.is_empty() => {
                    groups.insert(TokenId::new(token_id));
                }
                _ => debug!("Skipping card file without a token id: {}", file_name),
            }
        }

        info!("Loaded {} group cards from {:?}", groups.len(), dir);
        Ok(Self { groups })
    }

    pub fn contains(&self, token_id: &TokenId) -> bool {
        self.groups.contains(token_id)
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

impl FromIterator<TokenId> for KnownGroupAssets {
    fn from_iter<I: IntoIterator<Item = TokenId>>(iter: I) -> Self {
        Self {
            groups: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_loads_token_ids_from_file_names() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("abc123.png"), b"").unwrap();
        std::fs::write(dir.path().join("fed987.source.png"), b"").unwrap();
        std::fs::write(dir.path().join(".gitkeep"), b"").unwrap();
        std::fs::create_dir(dir.path().join("nested")).unwrap();

        let known = KnownGroupAssets::load(dir.path()).await.unwrap();
        assert_eq!(known.len(), 2);
        assert!(known.contains(&TokenId::new("abc123")));
        assert!(known.contains(&TokenId::new("fed987")));
        assert!(!known.contains(&TokenId::new("nested")));
    }

    #[tokio::test]
    async fn test_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let result = KnownGroupAssets::load(&dir.path().join("missing")).await;
        assert!(matches!(result, Err(AssetError::Enumerate { .. })));
    }

    #[test]
    fn test_collects_from_iterator() {
        let known: KnownGroupAssets = ["abc123", "def456"].into_iter().map(TokenId::new).collect();
        assert!(known.contains(&TokenId::new("def456")));
        assert!(!known.is_empty());
    }
}
