//! Response types for the three list services.

use serde::Deserialize;
use serde_json::Value;

// ---- AniList (GraphQL) ----

/// GraphQL response envelope
#[derive(Debug, Clone, Deserialize)]
pub struct GraphQlResponse<T> {
    pub data: Option<T>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MediaListCollectionData {
    #[serde(rename = "MediaListCollection")]
    pub media_list_collection: Option<MediaListCollection>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MediaListCollection {
    #[serde(default)]
    pub lists: Vec<MediaListGroup>,
}

/// One status group of a user's list (watching, completed, ...)
#[derive(Debug, Clone, Deserialize)]
pub struct MediaListGroup {
    #[serde(default)]
    pub entries: Vec<MediaListEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MediaListEntry {
    pub media: MediaRef,
    pub score: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MediaRef {
    #[serde(rename = "idMal")]
    pub id_mal: Option<u64>,
}

// ---- Kitsu (JSON:API, flattened) ----

/// Library entry after JSON:API flattening
#[derive(Debug, Clone, Deserialize)]
pub struct LibraryEntry {
    /// Rating on a 2-20 scale; null when unrated
    #[serde(rename = "ratingTwenty")]
    pub rating_twenty: Option<u32>,
    pub anime: Option<KitsuAnime>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct KitsuAnime {
    #[serde(default)]
    pub mappings: Vec<Mapping>,
}

/// Cross-site identifier of a Kitsu anime.
///
/// Both fields are absent when the mapping was not part of `included`.
#[derive(Debug, Clone, Deserialize)]
pub struct Mapping {
    #[serde(rename = "externalSite")]
    pub external_site: Option<String>,
    #[serde(rename = "externalId")]
    pub external_id: Option<String>,
}

// ---- MyAnimeList (REST) ----

/// A page of the list endpoint: an array of entries or an error object
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum AnimeListPage {
    Entries(Vec<AnimeListEntry>),
    Error { errors: Value },
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnimeListEntry {
    /// 1 watching, 2 completed, 3 on hold, 4 dropped, 6 plan to watch
    pub status: u8,
    pub anime_id: u64,
    pub score: u32,
}
