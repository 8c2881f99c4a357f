use std::sync::Arc;
use tracing::info;

use crate::clients::tmdb::TmdbClient;
use crate::config::Config;
use crate::db::Store;
use crate::services::{MetadataService, MetadataSource, MovieService, SeaOrmMovieService};

/// Build a shared HTTP client with reasonable defaults for API calls.
/// This client should be reused across all HTTP-based services to enable
/// connection pooling.
fn build_shared_http_client(timeout_seconds: u64) -> anyhow::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_seconds))
        .user_agent(concat!("filmclub/", env!("CARGO_PKG_VERSION")))
        .pool_max_idle_per_host(10)
        .build()
        .map_err(|e| anyhow::anyhow!("Failed to build shared HTTP client: {e}"))
}

#[derive(Clone)]
pub struct SharedState {
    pub store: Store,

    pub tmdb: Option<Arc<TmdbClient>>,

    pub metadata: Arc<MetadataService>,

    pub movie_service: Arc<dyn MovieService>,
}

impl SharedState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let http_client = build_shared_http_client(config.tmdb.request_timeout_seconds)?;
        let tmdb = Arc::new(TmdbClient::with_shared_client(
            http_client,
            config.tmdb.clone(),
        ));

        if !tmdb.is_configured() {
            tracing::warn!("TMDB API key is not set; movie metadata will be unavailable");
        }

        Self::init(&config, tmdb.clone(), Some(tmdb)).await
    }

    /// Builds the state around a custom metadata source instead of TMDB.
    pub async fn with_metadata_source(
        config: Config,
        source: Arc<dyn MetadataSource>,
    ) -> anyhow::Result<Self> {
        Self::init(&config, source, None).await
    }

    async fn init(
        config: &Config,
        source: Arc<dyn MetadataSource>,
        tmdb: Option<Arc<TmdbClient>>,
    ) -> anyhow::Result<Self> {
        let store = Store::with_pool_options(
            &config.general.database_path,
            config.general.max_db_connections,
            config.general.min_db_connections,
        )
        .await?;

        let seeded = store.seed_members(&config.club.members).await?;
        if seeded > 0 {
            info!(count = seeded, "Seeded family members");
        }

        let metadata = Arc::new(MetadataService::new(source, &config.tmdb));

        let movie_service = Arc::new(SeaOrmMovieService::new(store.clone(), metadata.clone()))
            as Arc<dyn MovieService + Send + Sync + 'static>;

        Ok(Self {
            store,
            tmdb,
            metadata,
            movie_service,
        })
    }

    /// True when a real metadata client with an API key is wired in.
    #[must_use]
    pub fn metadata_configured(&self) -> bool {
        self.tmdb.as_ref().is_some_and(|client| client.is_configured())
    }
}
