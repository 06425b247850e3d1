//! Card image storage
//!
//! Two directories are involved:
//! - `cards_path` holds the source card for every group token; its file
//!   names define [`KnownGroupAssets`] at startup
//! - `cache_path` holds the rendered cards served over HTTP, one
//!   subdirectory per [`CardSize`]

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

pub mod known_groups;
pub mod storage;

pub use known_groups::KnownGroupAssets;
pub use storage::CardStore;

/// Fixed sizes cards are rendered at
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    EnumString,
    Display,
    EnumIter,
)]
pub enum CardSize {
    #[strum(serialize = "original")]
    #[serde(rename = "original")]
    Original,
    #[strum(serialize = "32")]
    #[serde(rename = "32")]
    Px32,
    #[strum(serialize = "64")]
    #[serde(rename = "64")]
    Px64,
    #[strum(serialize = "128")]
    #[serde(rename = "128")]
    Px128,
}
