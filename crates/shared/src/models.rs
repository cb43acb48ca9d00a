//! Data models shared by the fetcher library and its binary.
//!
//! A `ScoreMap` is the normalized output of every service adapter: anime
//! identifiers (MyAnimeList ids, as strings) mapped to the user's score.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Mapping of MyAnimeList anime id to a positive user score
pub type ScoreMap = HashMap<String, u32>;

/// Anime-tracking services a list can be fetched from
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum Service {
    AniList,
    Kitsu,
    MyAnimeList,
}

impl Service {
    /// All services, in registry declaration order
    pub const ALL: [Service; 3] = [Service::AniList, Service::Kitsu, Service::MyAnimeList];

    /// Canonical (upper-case) service name
    pub fn as_str(&self) -> &'static str {
        match self {
            Service::AniList => "ANILIST",
            Service::Kitsu => "KITSU",
            Service::MyAnimeList => "MYANIMELIST",
        }
    }
}

impl std::fmt::Display for Service {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Service {
    type Err = anyhow::Error;

    /// Parses a canonical name only; aliases are resolved by the registry.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "ANILIST" => Ok(Service::AniList),
            "KITSU" => Ok(Service::Kitsu),
            "MYANIMELIST" => Ok(Service::MyAnimeList),
            _ => Err(anyhow::anyhow!("Invalid service name: {}", s)),
        }
    }
}

/// A username paired with the service it belongs to
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResolvedUser {
    pub username: String,
    pub service: Service,
    /// Set when no service was given and the configured default was used
    #[serde(default)]
    pub assumed_default: bool,
}

impl ResolvedUser {
    pub fn new(username: impl Into<String>, service: Service) -> Self {
        Self {
            username: username.into(),
            service,
            assumed_default: false,
        }
    }
}

/// Result of a fetch as emitted by the CLI
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreReport {
    pub username: String,
    pub service: Service,
    pub fetched_at: DateTime<Utc>,
    pub total: usize,
    pub scores: ScoreMap,
}

impl ScoreReport {
    pub fn new(user: &ResolvedUser, scores: ScoreMap) -> Self {
        Self {
            username: user.username.clone(),
            service: user.service,
            fetched_at: Utc::now(),
            total: scores.len(),
            scores,
        }
    }
}
