//! AniList adapter.
//!
//! A single GraphQL query returns the whole list grouped by status. Scores
//! are requested on the 100-point scale and keyed by the MyAnimeList id.

use super::{AdapterContext, ScoreAdapter};
use crate::api::{GraphQlResponse, HttpRequest, MediaListCollection, MediaListCollectionData};
use async_trait::async_trait;
use serde_json::json;
use shared::{FetchError, Result, ScoreMap, Service};
use tracing::{debug, info};

/// Media list query, one user, anime only
pub const MEDIA_LIST_QUERY: &str = r#"
query ($userName: String) {
  MediaListCollection(userName: $userName, type: ANIME) {
    lists {
      entries {
        media {
          idMal
        }
        score(format: POINT_100)
      }
    }
  }
}
"#;

pub struct AniListAdapter;

#[async_trait]
impl ScoreAdapter for AniListAdapter {
    fn service(&self) -> Service {
        Service::AniList
    }

    async fn fetch_scores(&self, ctx: &AdapterContext<'_>, username: &str) -> Result<ScoreMap> {
        let body = json!({
            "query": MEDIA_LIST_QUERY,
            "variables": { "userName": username }
        });

        debug!(username = username, "Fetching AniList media list");

        let response = ctx
            .transport
            .send(HttpRequest::post_json(&ctx.config.anilist_url, body))
            .await?;

        if response.is_rate_limited() {
            return Err(FetchError::RateLimitExceeded(
                "AniList rate limit exceeded".to_string(),
            ));
        }

        // Unknown users come back as a 404 with a null collection, so the
        // body is inspected whatever the status.
        let parsed: GraphQlResponse<MediaListCollectionData> = response.json(Service::AniList)?;
        let collection = parsed
            .data
            .and_then(|data| data.media_list_collection)
            .ok_or_else(|| {
                FetchError::InvalidUser(format!("User `{}` does not exist on AniList", username))
            })?;

        let scores = extract_scores(&collection);
        if scores.is_empty() {
            return Err(FetchError::NoAffinity(format!(
                "User `{}` hasn't rated any anime on AniList",
                username
            )));
        }

        info!(username = username, scores = scores.len(), "Fetched AniList scores");
        Ok(scores)
    }
}

/// Collect positive scores across all list groups.
///
/// Entries without a MyAnimeList id have no common key and are dropped.
pub fn extract_scores(collection: &MediaListCollection) -> ScoreMap {
    collection
        .lists
        .iter()
        .flat_map(|group| group.entries.iter())
        .filter_map(|entry| {
            let id = entry.media.id_mal?;
            let score = entry.score.unwrap_or(0.0).round();
            (score > 0.0).then(|| (id.to_string(), score as u32))
        })
        .collect()
}
