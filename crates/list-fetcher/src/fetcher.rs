//! Entry point tying resolution and the service adapters together.

use crate::api::{ReqwestTransport, Transport};
use crate::registry;
use crate::resolver::{self, UserInput};
use crate::services::AdapterContext;
use shared::config::ServicesConfig;
use shared::{Config, FetchError, ResolvedUser, Result, ScoreMap, Service};
use tracing::info;

/// Resolves users and fetches their scores from the matching service
pub struct ScoreFetcher {
    transport: Box<dyn Transport>,
    services: ServicesConfig,
    default_service: Service,
}

impl ScoreFetcher {
    /// Create a fetcher using the reqwest transport
    pub fn new(config: &Config) -> Result<Self> {
        let transport = ReqwestTransport::new(&config.http)?;
        Self::with_transport(config, Box::new(transport))
    }

    /// Create a fetcher on top of a custom transport
    pub fn with_transport(config: &Config, transport: Box<dyn Transport>) -> Result<Self> {
        Ok(Self {
            transport,
            services: config.services.clone(),
            default_service: config.default_service()?,
        })
    }

    pub fn default_service(&self) -> Service {
        self.default_service
    }

    pub fn resolve(&self, user: impl Into<UserInput>, service: Option<&str>) -> Result<ResolvedUser> {
        resolver::resolve(user, service, self.default_service)
    }

    /// Resolve `user` (and `service`) and fetch the user's scores
    pub async fn get_scores(
        &self,
        user: impl Into<UserInput>,
        service: Option<&str>,
    ) -> Result<ScoreMap> {
        let resolved = self.resolve(user, service)?;
        self.fetch_resolved(&resolved).await
    }

    /// Fetch the scores of an already resolved user
    pub async fn fetch_resolved(&self, user: &ResolvedUser) -> Result<ScoreMap> {
        let descriptor = registry::descriptor(user.service).ok_or_else(|| {
            FetchError::InvalidUser(format!("Invalid service name `{}`", user.service))
        })?;

        info!(
            username = %user.username,
            service = %user.service,
            "Fetching scores"
        );

        let ctx = AdapterContext {
            transport: self.transport.as_ref(),
            config: &self.services,
        };
        descriptor.adapter.fetch_scores(&ctx, &user.username).await
    }
}
