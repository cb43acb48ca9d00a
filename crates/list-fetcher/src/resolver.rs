//! Turns the different ways of naming a user into a `ResolvedUser`.
//!
//! Accepted forms:
//! - a username plus an explicit service name or alias
//! - a profile URL of a supported service
//! - a `(username, service)` pair
//! - a bare username, which falls back to the default service

use crate::registry;
use shared::{FetchError, ResolvedUser, Result, Service};
use tracing::warn;

/// User as given by the caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserInput {
    /// Username or profile URL
    Name(String),
    /// Username and service
    Pair(String, String),
}

impl From<&str> for UserInput {
    fn from(value: &str) -> Self {
        UserInput::Name(value.to_string())
    }
}

impl From<String> for UserInput {
    fn from(value: String) -> Self {
        UserInput::Name(value)
    }
}

impl<U: Into<String>, S: Into<String>> From<(U, S)> for UserInput {
    fn from((username, service): (U, S)) -> Self {
        UserInput::Pair(username.into(), service.into())
    }
}

/// Resolve `user` and an optional `service` into a username and service.
///
/// A pair is unpacked once into username and service; giving a pair and a
/// separate service at the same time is rejected.
pub fn resolve(
    user: impl Into<UserInput>,
    service: Option<&str>,
    default_service: Service,
) -> Result<ResolvedUser> {
    let (user, service) = match (user.into(), service) {
        (UserInput::Name(name), service) => (name, service.map(str::to_string)),
        (UserInput::Pair(name, pair_service), None) => (name, Some(pair_service)),
        (UserInput::Pair(..), Some(_)) => return Err(invalid_usage()),
    };

    if user.trim().is_empty() {
        return Err(invalid_usage());
    }

    if let Some(service) = service {
        let service = registry::lookup(&service).ok_or_else(|| {
            FetchError::InvalidUser(format!("Invalid service name `{}`", service))
        })?;
        return Ok(ResolvedUser::new(user, service));
    }

    if let Some((username, service)) = registry::match_url(&user) {
        return Ok(ResolvedUser::new(username, service));
    }

    if is_http_url(&user) {
        return Err(FetchError::InvalidUser(format!(
            "Unrecognized service URL `{}`",
            user
        )));
    }

    warn!(
        username = %user,
        default_service = %default_service,
        "No service has been specified, assuming the default. Specify a service to silence this warning"
    );

    Ok(ResolvedUser {
        username: user,
        service: default_service,
        assumed_default: true,
    })
}

fn is_http_url(user: &str) -> bool {
    let lowered = user.to_ascii_lowercase();
    lowered.starts_with("http://") || lowered.starts_with("https://")
}

fn invalid_usage() -> FetchError {
    FetchError::InvalidUser("Invalid usage - check your `user` and `service` values".to_string())
}
