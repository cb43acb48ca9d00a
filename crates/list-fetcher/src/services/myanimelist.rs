//! MyAnimeList adapter.
//!
//! The list endpoint returns a fixed number of entries per call, so the
//! list is walked by offset until an empty page comes back. MyAnimeList
//! throttles aggressively, hence the fixed pause between requests.

use super::{AdapterContext, ScoreAdapter};
use crate::api::{AnimeListEntry, AnimeListPage, HttpRequest, RequestPacer};
use async_trait::async_trait;
use reqwest::Url;
use shared::{FetchError, Result, ScoreMap, Service};
use std::time::Duration;
use tracing::{debug, info};

/// `status` filter value selecting every list
const ALL_STATUSES: &str = "7";
const PLAN_TO_WATCH: u8 = 6;
/// `{username}` path segment of the list URL template, as stored by `Url`
const USERNAME_SEGMENT: &str = "%7Busername%7D";

pub struct MyAnimeListAdapter;

#[async_trait]
impl ScoreAdapter for MyAnimeListAdapter {
    fn service(&self) -> Service {
        Service::MyAnimeList
    }

    async fn fetch_scores(&self, ctx: &AdapterContext<'_>, username: &str) -> Result<ScoreMap> {
        let url = list_url(&ctx.config.myanimelist_url, username)?;
        let page_size = ctx.config.myanimelist.page_size;
        let mut pacer =
            RequestPacer::new(Duration::from_millis(ctx.config.myanimelist.request_delay_ms));

        let mut scores = ScoreMap::new();
        let mut offset: u32 = 0;

        loop {
            pacer.acquire().await;

            debug!(username = username, offset = offset, "Fetching MyAnimeList page");

            let request = HttpRequest::get(url.as_str())
                .query("status", ALL_STATUSES)
                .query("offset", offset.to_string());
            let response = ctx.transport.send(request).await?;

            if response.is_rate_limited() {
                return Err(FetchError::RateLimitExceeded(
                    "MyAnimeList rate limit exceeded".to_string(),
                ));
            }

            let entries = match response.json(Service::MyAnimeList)? {
                AnimeListPage::Entries(entries) => entries,
                AnimeListPage::Error { .. } => {
                    return Err(FetchError::InvalidUser(format!(
                        "User `{}` does not exist on MyAnimeList",
                        username
                    )));
                }
            };

            if entries.is_empty() {
                break;
            }

            scores.extend(extract_scores(&entries));
            offset += page_size;
        }

        if scores.is_empty() {
            return Err(FetchError::NoAffinity(format!(
                "User `{}` hasn't rated any anime on MyAnimeList",
                username
            )));
        }

        info!(username = username, scores = scores.len(), "Fetched MyAnimeList scores");
        Ok(scores)
    }
}

/// Substitutes the username into the list URL template as one path segment.
///
/// Characters such as `/`, `?` and `#` are percent-encoded so that the
/// username can never leave its segment.
fn list_url(template: &str, username: &str) -> Result<String> {
    let mut url = Url::parse(template).map_err(|e| {
        FetchError::Config(format!("Invalid MyAnimeList URL `{}`: {}", template, e))
    })?;

    let segments: Vec<String> = url
        .path_segments()
        .map(|segments| segments.map(str::to_string).collect())
        .unwrap_or_default();

    url.path_segments_mut()
        .map_err(|_| FetchError::Config(format!("Invalid MyAnimeList URL `{}`", template)))?
        .clear()
        .extend(segments.iter().map(|segment| {
            if segment == USERNAME_SEGMENT {
                username
            } else {
                segment.as_str()
            }
        }));

    Ok(url.to_string())
}

/// Positive scores of a page, plan-to-watch entries excluded
pub fn extract_scores(entries: &[AnimeListEntry]) -> ScoreMap {
    entries
        .iter()
        .filter(|entry| entry.status != PLAN_TO_WATCH && entry.score > 0)
        .map(|entry| (entry.anime_id.to_string(), entry.score))
        .collect()
}
