//! Kitsu adapter.
//!
//! Library entries can only be filtered by numeric user id, so a slug is
//! first looked up through the users endpoint. Entries are then paged with
//! the `next` links Kitsu hands back, and each entry's anime mappings give
//! the MyAnimeList id.

use super::{AdapterContext, ScoreAdapter};
use crate::api::{Document, HttpRequest, HttpResponse, LibraryEntry};
use async_trait::async_trait;
use shared::{FetchError, Result, ScoreMap, Service};
use tracing::{debug, info, warn};

const JSON_API_MEDIA_TYPE: &str = "application/vnd.api+json";
const MAL_EXTERNAL_SITE: &str = "myanimelist/anime";
const LISTED_STATUSES: &str = "completed,current,dropped,on_hold";

pub struct KitsuAdapter;

impl KitsuAdapter {
    /// Numeric ids are used as-is; anything else is treated as a slug.
    /// When several users match a slug the first one is taken.
    async fn resolve_user_id(&self, ctx: &AdapterContext<'_>, user: &str) -> Result<String> {
        if !user.is_empty() && user.chars().all(|c| c.is_ascii_digit()) {
            return Ok(user.to_string());
        }

        let request = HttpRequest::get(format!("{}/users", ctx.config.kitsu_base_url))
            .query("filter[slug]", user)
            .header("Accept", JSON_API_MEDIA_TYPE);

        let response = ctx.transport.send(request).await?;
        check_status(&response)?;

        let document: Document = response.json(Service::Kitsu)?;
        if document.data.len() > 1 {
            warn!(slug = user, matches = document.data.len(), "Slug matched several users, using the first");
        }

        document
            .data
            .into_iter()
            .next()
            .map(|resource| resource.id)
            .ok_or_else(|| FetchError::InvalidUser(format!("User `{}` does not exist on Kitsu", user)))
    }

    fn first_page(&self, ctx: &AdapterContext<'_>, user_id: &str) -> HttpRequest {
        HttpRequest::get(format!("{}/library-entries", ctx.config.kitsu_base_url))
            .query("fields[anime]", "id,mappings")
            .query("filter[user_id]", user_id)
            .query("filter[kind]", "anime")
            .query("filter[status]", LISTED_STATUSES)
            .query("include", "anime,anime.mappings")
            .query("page[offset]", "0")
            .query("page[limit]", ctx.config.kitsu.page_limit.to_string())
            .header("Accept", JSON_API_MEDIA_TYPE)
    }
}

#[async_trait]
impl ScoreAdapter for KitsuAdapter {
    fn service(&self) -> Service {
        Service::Kitsu
    }

    async fn fetch_scores(&self, ctx: &AdapterContext<'_>, username: &str) -> Result<ScoreMap> {
        let user_id = self.resolve_user_id(ctx, username).await?;
        debug!(user = username, user_id = %user_id, "Fetching Kitsu library");

        let mut entries = Vec::new();
        let mut next_request = Some(self.first_page(ctx, &user_id));
        let mut pages = 0;

        while let Some(request) = next_request.take() {
            let response = ctx.transport.send(request).await?;
            check_status(&response)?;

            let document: Document = response.json(Service::Kitsu)?;

            // Kitsu silently returns nothing for an unknown user id
            if document.data.is_empty() {
                return Err(FetchError::InvalidUser(format!(
                    "User `{}` does not exist on Kitsu",
                    username
                )));
            }

            entries.extend(parse_entries(&document)?);
            pages += 1;

            // `next` already carries every parameter of the query
            next_request = document
                .links
                .next
                .map(|url| HttpRequest::get(url).header("Accept", JSON_API_MEDIA_TYPE));
        }

        let scores = extract_scores(&entries);
        if scores.is_empty() {
            return Err(FetchError::NoAffinity(format!(
                "User `{}` hasn't rated any anime on Kitsu",
                username
            )));
        }

        info!(user = username, pages = pages, scores = scores.len(), "Fetched Kitsu scores");
        Ok(scores)
    }
}

fn check_status(response: &HttpResponse) -> Result<()> {
    if response.is_success() {
        return Ok(());
    }
    Err(FetchError::RateLimitExceeded(format!(
        "Kitsu rate limit exceeded (status {})",
        response.status
    )))
}

/// Flatten a page of library entries
pub fn parse_entries(document: &Document) -> Result<Vec<LibraryEntry>> {
    document
        .flatten()
        .into_iter()
        .map(|value| serde_json::from_value(value).map_err(|e| FetchError::decode(Service::Kitsu, e)))
        .collect()
}

/// Score per MyAnimeList id. Unrated entries and entries without a
/// MyAnimeList mapping are skipped.
pub fn extract_scores(entries: &[LibraryEntry]) -> ScoreMap {
    entries
        .iter()
        .filter_map(|entry| {
            let score = entry.rating_twenty.filter(|&score| score > 0)?;
            let mal_id = entry
                .anime
                .as_ref()?
                .mappings
                .iter()
                .filter(|mapping| mapping.external_site.as_deref() == Some(MAL_EXTERNAL_SITE))
                .find_map(|mapping| mapping.external_id.clone())?;
            Some((mal_id, score))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::StubTransport;
    use serde_json::{json, Value};
    use shared::config::ServicesConfig;

    fn users(ids: &[&str]) -> Value {
        let data: Vec<Value> = ids
            .iter()
            .map(|id| json!({ "id": id, "type": "users", "attributes": { "slug": "someone" } }))
            .collect();
        json!({ "data": data })
    }

    /// One library entry per `(entry id, rating, mal id)`
    fn page(entries: &[(&str, Option<u32>, Option<&str>)], next: Option<&str>) -> Value {
        let mut data = Vec::new();
        let mut included = Vec::new();
        for (id, rating, mal_id) in entries {
            let anime_id = format!("a{}", id);
            data.push(json!({
                "id": id,
                "type": "libraryEntries",
                "attributes": { "ratingTwenty": rating },
                "relationships": { "anime": { "data": { "id": anime_id, "type": "anime" } } }
            }));

            let mut mapping_ids = vec![json!({ "id": format!("x{}", id), "type": "mappings" })];
            included.push(json!({
                "id": format!("x{}", id),
                "type": "mappings",
                "attributes": { "externalSite": "anidb", "externalId": "1" }
            }));
            if let Some(mal_id) = mal_id {
                mapping_ids.push(json!({ "id": format!("m{}", id), "type": "mappings" }));
                included.push(json!({
                    "id": format!("m{}", id),
                    "type": "mappings",
                    "attributes": { "externalSite": "myanimelist/anime", "externalId": mal_id }
                }));
            }
            included.push(json!({
                "id": anime_id,
                "type": "anime",
                "relationships": { "mappings": { "data": mapping_ids } }
            }));
        }

        let mut links = json!({ "first": "https://kitsu.io/api/edge/library-entries" });
        if let Some(next) = next {
            links["next"] = json!(next);
        }
        json!({ "data": data, "included": included, "links": links })
    }

    async fn fetch(transport: &StubTransport, user: &str) -> Result<ScoreMap> {
        let config = ServicesConfig::default();
        let ctx = AdapterContext {
            transport,
            config: &config,
        };
        KitsuAdapter.fetch_scores(&ctx, user).await
    }

    #[tokio::test]
    async fn test_slug_is_resolved_to_first_user_id() {
        let transport = StubTransport::new()
            .respond(200, users(&["42", "43"]))
            .respond(200, page(&[("1", Some(14), Some("5114"))], None));

        let scores = fetch(&transport, "someone").await.unwrap();
        assert_eq!(scores.get("5114"), Some(&14));

        let requests = transport.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].url, "https://kitsu.io/api/edge/users");
        assert_eq!(requests[0].query_value("filter[slug]"), Some("someone"));
        assert_eq!(requests[1].query_value("filter[user_id]"), Some("42"));
        assert_eq!(requests[1].query_value("page[limit]"), Some("500"));
    }

    #[tokio::test]
    async fn test_numeric_user_skips_lookup() {
        let transport =
            StubTransport::new().respond(200, page(&[("1", Some(20), Some("1"))], None));

        fetch(&transport, "12345").await.unwrap();

        let requests = transport.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].query_value("filter[user_id]"), Some("12345"));
    }

    #[tokio::test]
    async fn test_unknown_slug_is_invalid_user() {
        let transport = StubTransport::new().respond(200, json!({ "data": [] }));

        let result = fetch(&transport, "nobody").await;
        assert!(matches!(result, Err(FetchError::InvalidUser(_))));
    }

    #[tokio::test]
    async fn test_follows_next_link_without_extra_params() {
        let next = "https://kitsu.io/api/edge/library-entries?page%5Boffset%5D=500";
        let transport = StubTransport::new()
            .respond(200, page(&[("1", Some(10), Some("1"))], Some(next)))
            .respond(200, page(&[("2", Some(18), Some("2"))], None));

        let scores = fetch(&transport, "42").await.unwrap();
        assert_eq!(scores.len(), 2);
        assert_eq!(scores.get("1"), Some(&10));
        assert_eq!(scores.get("2"), Some(&18));

        let requests = transport.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[1].url, next);
        assert!(requests[1].query.is_empty());
    }

    #[tokio::test]
    async fn test_unrated_and_unmapped_entries_are_skipped() {
        let transport = StubTransport::new().respond(
            200,
            page(
                &[
                    ("1", None, Some("10")),
                    ("2", Some(12), None),
                    ("3", Some(8), Some("30")),
                ],
                None,
            ),
        );

        let scores = fetch(&transport, "42").await.unwrap();
        assert_eq!(scores.len(), 1);
        assert_eq!(scores.get("30"), Some(&8));
    }

    #[tokio::test]
    async fn test_empty_library_page_is_invalid_user() {
        let transport = StubTransport::new().respond(200, json!({ "data": [], "links": {} }));

        let result = fetch(&transport, "999999999").await;
        assert!(matches!(result, Err(FetchError::InvalidUser(_))));
    }

    #[tokio::test]
    async fn test_all_unrated_is_no_affinity() {
        let transport =
            StubTransport::new().respond(200, page(&[("1", None, Some("10"))], None));

        let result = fetch(&transport, "42").await;
        assert!(matches!(result, Err(FetchError::NoAffinity(_))));
    }

    #[tokio::test]
    async fn test_error_status_is_rate_limit() {
        let transport = StubTransport::new().respond(429, json!({ "errors": [] }));

        let result = fetch(&transport, "42").await;
        assert!(matches!(result, Err(FetchError::RateLimitExceeded(_))));
    }

    #[tokio::test]
    async fn test_mapping_missing_from_included_is_skipped() {
        let transport = StubTransport::new().respond(
            200,
            json!({
                "data": [{
                    "id": "1",
                    "type": "libraryEntries",
                    "attributes": { "ratingTwenty": 16 },
                    "relationships": { "anime": { "data": { "id": "a1", "type": "anime" } } }
                }],
                "included": [
                    {
                        "id": "a1",
                        "type": "anime",
                        "relationships": { "mappings": { "data": [
                            { "id": "gone", "type": "mappings" },
                            { "id": "m1", "type": "mappings" }
                        ] } }
                    },
                    {
                        "id": "m1",
                        "type": "mappings",
                        "attributes": { "externalSite": "myanimelist/anime", "externalId": "21" }
                    }
                ],
                "links": {}
            }),
        );

        let scores = fetch(&transport, "42").await.unwrap();
        assert_eq!(scores.len(), 1);
        assert_eq!(scores.get("21"), Some(&16));
    }
}
