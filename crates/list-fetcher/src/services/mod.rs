//! Per-service list adapters.
//!
//! Every adapter turns one user's remote list into a `ScoreMap`, issuing its
//! requests strictly one after another and never retrying.

pub mod anilist;
pub mod kitsu;
pub mod myanimelist;

use crate::api::Transport;
use async_trait::async_trait;
use shared::config::ServicesConfig;
use shared::{Result, ScoreMap, Service};

pub use anilist::AniListAdapter;
pub use kitsu::KitsuAdapter;
pub use myanimelist::MyAnimeListAdapter;

/// Everything an adapter needs to talk to its service
pub struct AdapterContext<'a> {
    pub transport: &'a dyn Transport,
    pub config: &'a ServicesConfig,
}

/// Fetches a user's scores from one service
#[async_trait]
pub trait ScoreAdapter: Send + Sync {
    fn service(&self) -> Service;

    async fn fetch_scores(&self, ctx: &AdapterContext<'_>, username: &str) -> Result<ScoreMap>;
}
