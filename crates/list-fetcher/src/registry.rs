//! Static table of supported services.
//!
//! Entries are kept in declaration order (AniList, Kitsu, MyAnimeList);
//! alias and URL lookups walk them in that order and the first hit wins.

use crate::services::{AniListAdapter, KitsuAdapter, MyAnimeListAdapter, ScoreAdapter};
use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};
use shared::Service;

/// Everything known about one service
pub struct ServiceDescriptor {
    pub service: Service,
    /// Upper-case short names accepted in place of the canonical name
    pub aliases: &'static [&'static str],
    /// Profile URL pattern, username in the first capture group
    pub url_pattern: Regex,
    pub adapter: &'static dyn ScoreAdapter,
}

static REGISTRY: Lazy<Vec<ServiceDescriptor>> = Lazy::new(|| {
    vec![
        ServiceDescriptor {
            service: Service::AniList,
            aliases: &["AL", "A"],
            url_pattern: url_pattern(
                r"^https?://anilist\.co/user/([a-z0-9_-]+)(?:/(?:animelist)?)?$",
            ),
            adapter: &AniListAdapter,
        },
        ServiceDescriptor {
            service: Service::Kitsu,
            aliases: &["K"],
            url_pattern: url_pattern(
                r"^https?://kitsu\.io/users/([a-z0-9_-]+)(?:/(?:library(?:\?media=anime)?)?)?$",
            ),
            adapter: &KitsuAdapter,
        },
        ServiceDescriptor {
            service: Service::MyAnimeList,
            aliases: &["MAL", "M"],
            url_pattern: url_pattern(
                r"^https?://myanimelist\.net/(?:profile|animelist)/([a-z0-9_-]+)/?(?:\?status=\d)?",
            ),
            adapter: &MyAnimeListAdapter,
        },
    ]
});

fn url_pattern(pattern: &str) -> Regex {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .expect("service URL patterns are valid")
}

/// All descriptors in declaration order
pub fn descriptors() -> &'static [ServiceDescriptor] {
    &REGISTRY
}

pub fn descriptor(service: Service) -> Option<&'static ServiceDescriptor> {
    descriptors().iter().find(|d| d.service == service)
}

/// Resolve a canonical name or alias, ignoring case
pub fn lookup(name: &str) -> Option<Service> {
    let name = name.trim().to_uppercase();

    descriptors()
        .iter()
        .find(|d| d.service.as_str() == name)
        .or_else(|| {
            descriptors()
                .iter()
                .find(|d| d.aliases.iter().any(|alias| *alias == name))
        })
        .map(|d| d.service)
}

/// Match a profile URL, returning the embedded username and its service
pub fn match_url(url: &str) -> Option<(String, Service)> {
    descriptors().iter().find_map(|d| {
        d.url_pattern
            .captures(url)
            .and_then(|captures| captures.get(1))
            .map(|username| (username.as_str().to_string(), d.service))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declaration_order() {
        let services: Vec<Service> = descriptors().iter().map(|d| d.service).collect();
        assert_eq!(services, Service::ALL.to_vec());
    }

    #[test]
    fn test_adapters_match_their_entry() {
        for descriptor in descriptors() {
            assert_eq!(descriptor.adapter.service(), descriptor.service);
        }
    }

    #[test]
    fn test_aliases_resolve_to_canonical_service() {
        for descriptor in descriptors() {
            assert_eq!(lookup(descriptor.service.as_str()), Some(descriptor.service));
            for alias in descriptor.aliases {
                assert_eq!(lookup(alias), Some(descriptor.service));
                assert_eq!(lookup(&alias.to_lowercase()), Some(descriptor.service));
            }
        }
    }

    #[test]
    fn test_unknown_name() {
        assert_eq!(lookup("AP"), None);
        assert_eq!(lookup(""), None);
    }

    #[test]
    fn test_match_profile_urls() {
        let cases = [
            ("https://anilist.co/user/Josh", "Josh", Service::AniList),
            ("http://anilist.co/user/Josh/animelist", "Josh", Service::AniList),
            ("https://kitsu.io/users/some-one/library?media=anime", "some-one", Service::Kitsu),
            ("https://kitsu.io/users/1234", "1234", Service::Kitsu),
            ("https://myanimelist.net/profile/Xinil", "Xinil", Service::MyAnimeList),
            ("https://myanimelist.net/animelist/Xinil?status=2", "Xinil", Service::MyAnimeList),
        ];

        for (url, username, service) in cases {
            assert_eq!(match_url(url), Some((username.to_string(), service)), "{}", url);
        }
    }

    #[test]
    fn test_match_is_case_insensitive() {
        assert_eq!(
            match_url("HTTPS://AniList.co/User/Josh"),
            Some(("Josh".to_string(), Service::AniList))
        );
        assert_eq!(
            match_url("https://MYANIMELIST.NET/PROFILE/Xinil"),
            Some(("Xinil".to_string(), Service::MyAnimeList))
        );
    }

    #[test]
    fn test_unsupported_urls_do_not_match() {
        assert_eq!(match_url("https://anidb.net/user/123"), None);
        assert_eq!(match_url("https://anilist.co/anime/1"), None);
        assert_eq!(match_url("Josh"), None);
    }
}
