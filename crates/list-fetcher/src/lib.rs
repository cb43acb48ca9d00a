//! Anime list score fetching.
//!
//! Resolves a user given as a username, profile URL or `(username, service)`
//! pair, then fetches that user's list from AniList, Kitsu or MyAnimeList and
//! normalizes it into a `ScoreMap` keyed by MyAnimeList anime id.

pub mod api;
pub mod fetcher;
pub mod registry;
pub mod resolver;
pub mod services;

pub use api::{HttpRequest, HttpResponse, ReqwestTransport, Transport};
pub use fetcher::ScoreFetcher;
pub use registry::ServiceDescriptor;
pub use resolver::{resolve, UserInput};
pub use services::{AniListAdapter, KitsuAdapter, MyAnimeListAdapter, ScoreAdapter};
pub use shared::{FetchError, ResolvedUser, ScoreMap, Service};
