//! Metadata lookups with a degrade-to-absent failure policy.
//!
//! [`MetadataSource`] is the seam over the remote service; [`MetadataService`]
//! wraps it so that callers never see an error: failed lookups are logged,
//! counted, and come back as an empty list or `None`.

use std::sync::Arc;

use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use tracing::warn;

use crate::clients::tmdb::{MovieDetails, MovieSearchResult, TmdbClient};
use crate::config::TmdbConfig;
use crate::models::movie::Movie;

/// Upper bound on detail lookups in flight for one list page.
pub const METADATA_CONCURRENCY: usize = 8;

#[async_trait]
pub trait MetadataSource: Send + Sync {
    async fn search(&self, query: &str) -> anyhow::Result<Vec<MovieSearchResult>>;

    async fn details(&self, tmdb_id: i32) -> anyhow::Result<MovieDetails>;

    /// Profile URL for a person, `None` when the source has no mapping.
    async fn person_external_profile_url(&self, person_id: i64) -> anyhow::Result<Option<String>>;
}

#[async_trait]
impl MetadataSource for TmdbClient {
    async fn search(&self, query: &str) -> anyhow::Result<Vec<MovieSearchResult>> {
        self.search_movies(query).await
    }

    async fn details(&self, tmdb_id: i32) -> anyhow::Result<MovieDetails> {
        self.movie_details(tmdb_id).await
    }

    async fn person_external_profile_url(&self, person_id: i64) -> anyhow::Result<Option<String>> {
        self.person_profile_url(person_id).await
    }
}

fn record_failure(operation: &'static str) {
    metrics::counter!("filmclub_metadata_failures_total", "operation" => operation).increment(1);
}

pub struct MetadataService {
    source: Arc<dyn MetadataSource>,
    image_base_url: String,
    fallback_profile_url: String,
}

impl MetadataService {
    #[must_use]
    pub fn new(source: Arc<dyn MetadataSource>, config: &TmdbConfig) -> Self {
        Self {
            source,
            image_base_url: config.image_base_url.trim_end_matches('/').to_string(),
            fallback_profile_url: config.fallback_profile_url.clone(),
        }
    }

    /// Search candidates; blank queries and failures give an empty list.
    pub async fn search(&self, query: &str) -> Vec<MovieSearchResult> {
        let query = query.trim();
        if query.is_empty() {
            return Vec::new();
        }

        match self.source.search(query).await {
            Ok(results) => results,
            Err(e) => {
                warn!(query, error = %format!("{e:#}"), "Metadata search failed");
                record_failure("search");
                Vec::new()
            }
        }
    }

    /// Details for a linked movie. Manual movies (no id) and failures give `None`.
    pub async fn details(&self, tmdb_id: Option<i32>) -> Option<MovieDetails> {
        let tmdb_id = tmdb_id?;

        match self.source.details(tmdb_id).await {
            Ok(details) => Some(details),
            Err(e) => {
                warn!(tmdb_id, error = %format!("{e:#}"), "Metadata details lookup failed");
                record_failure("details");
                None
            }
        }
    }

    /// Details for each movie in the same order as `movies`, with at most
    /// [`METADATA_CONCURRENCY`] lookups running at once.
    pub async fn details_for(&self, movies: &[Movie]) -> Vec<Option<MovieDetails>> {
        let tmdb_ids: Vec<Option<i32>> = movies.iter().map(|movie| movie.tmdb_id).collect();
        stream::iter(tmdb_ids)
            .map(|tmdb_id| self.details(tmdb_id))
            .buffered(METADATA_CONCURRENCY)
            .collect()
            .await
    }

    /// Profile URL for a person, or the configured fallback page.
    pub async fn profile_url(&self, person_id: i64) -> String {
        match self.source.person_external_profile_url(person_id).await {
            Ok(Some(url)) => url,
            Ok(None) => self.fallback_profile_url.clone(),
            Err(e) => {
                warn!(person_id, error = %format!("{e:#}"), "Person profile lookup failed");
                record_failure("person");
                self.fallback_profile_url.clone()
            }
        }
    }

    #[must_use]
    pub fn poster_url(&self, poster_path: Option<&str>) -> Option<String> {
        let path = poster_path.map(str::trim).filter(|p| !p.is_empty())?;
        if path.starts_with("http://") || path.starts_with("https://") {
            return Some(path.to_string());
        }
        let path = path.trim_start_matches('/');
        Some(format!("{}/{path}", self.image_base_url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FakeSource {
        fail: bool,
        calls: AtomicUsize,
    }

    impl FakeSource {
        fn new(fail: bool) -> Arc<Self> {
            Arc::new(Self {
                fail,
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl MetadataSource for FakeSource {
        async fn search(&self, query: &str) -> anyhow::Result<Vec<MovieSearchResult>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                anyhow::bail!("boom");
            }
            Ok(vec![MovieSearchResult {
                id: 1,
                title: query.to_string(),
                original_title: None,
                release_date: Some("2018-08-30".to_string()),
                poster_path: None,
                overview: None,
            }])
        }

        async fn details(&self, tmdb_id: i32) -> anyhow::Result<MovieDetails> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                anyhow::bail!("boom");
            }
            Ok(MovieDetails {
                id: tmdb_id,
                title: format!("Movie {tmdb_id}"),
                ..MovieDetails::default()
            })
        }

        async fn person_external_profile_url(
            &self,
            person_id: i64,
        ) -> anyhow::Result<Option<String>> {
            if self.fail {
                anyhow::bail!("boom");
            }
            Ok((person_id == 7).then(|| "https://www.imdb.com/name/nm7/".to_string()))
        }
    }

    fn movie(id: i32, tmdb_id: Option<i32>) -> Movie {
        Movie {
            id,
            tmdb_id,
            title: format!("Local {id}"),
            date_watched: String::new(),
            status: None,
        }
    }

    #[tokio::test]
    async fn test_details_for_keeps_order_and_skips_manual_movies() {
        let source = FakeSource::new(false);
        let service = MetadataService::new(source.clone(), &TmdbConfig::default());

        let details = service
            .details_for(&[movie(1, Some(30)), movie(2, None), movie(3, Some(10))])
            .await;

        assert_eq!(details.len(), 3);
        assert_eq!(details[0].as_ref().map(|d| d.id), Some(30));
        assert!(details[1].is_none());
        assert_eq!(details[2].as_ref().map(|d| d.id), Some(10));
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
    }

    /// Tracks how many detail lookups overlap.
    #[derive(Default)]
    struct SlowSource {
        in_flight: AtomicUsize,
        peak: AtomicUsize,
    }

    #[async_trait]
    impl MetadataSource for SlowSource {
        async fn search(&self, _query: &str) -> anyhow::Result<Vec<MovieSearchResult>> {
            Ok(Vec::new())
        }

        async fn details(&self, tmdb_id: i32) -> anyhow::Result<MovieDetails> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            // Later ids finish first so completion order differs from input order.
            let delay = u64::try_from(40 - tmdb_id).unwrap_or_default();
            tokio::time::sleep(std::time::Duration::from_millis(delay)).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            Ok(MovieDetails {
                id: tmdb_id,
                ..MovieDetails::default()
            })
        }

        async fn person_external_profile_url(
            &self,
            _person_id: i64,
        ) -> anyhow::Result<Option<String>> {
            Ok(None)
        }
    }

    #[tokio::test]
    async fn test_details_for_bounds_in_flight_lookups() {
        let source = Arc::new(SlowSource::default());
        let service = MetadataService::new(source.clone(), &TmdbConfig::default());
        let movies: Vec<Movie> = (1..=30).map(|id| movie(id, Some(id))).collect();

        let details = service.details_for(&movies).await;

        let peak = source.peak.load(Ordering::SeqCst);
        assert!(peak <= METADATA_CONCURRENCY, "peak {peak}");
        assert!(peak > 1, "lookups should overlap");
        let ids: Vec<i32> = details.iter().map(|d| d.as_ref().map_or(0, |d| d.id)).collect();
        assert_eq!(ids, (1..=30).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn test_failures_degrade_to_absent() {
        let service = MetadataService::new(FakeSource::new(true), &TmdbConfig::default());

        assert!(service.search("roma").await.is_empty());
        assert!(service.details(Some(10)).await.is_none());
        assert_eq!(service.profile_url(7).await, "https://www.imdb.com/");
    }

    #[tokio::test]
    async fn test_blank_search_skips_source() {
        let source = FakeSource::new(false);
        let service = MetadataService::new(source.clone(), &TmdbConfig::default());

        assert!(service.search("   ").await.is_empty());
        assert_eq!(source.calls.load(Ordering::SeqCst), 0);
        assert_eq!(service.search("Roma").await.len(), 1);
    }

    #[tokio::test]
    async fn test_profile_url_falls_back_without_mapping() {
        let service = MetadataService::new(FakeSource::new(false), &TmdbConfig::default());

        assert_eq!(service.profile_url(7).await, "https://www.imdb.com/name/nm7/");
        assert_eq!(service.profile_url(8).await, "https://www.imdb.com/");
    }

    #[test]
    fn test_poster_url() {
        let service = MetadataService::new(FakeSource::new(false), &TmdbConfig::default());

        assert_eq!(
            service.poster_url(Some("/abc.jpg")).as_deref(),
            Some("https://image.tmdb.org/t/p/w500/abc.jpg")
        );
        assert_eq!(service.poster_url(Some("")), None);
        assert_eq!(service.poster_url(None), None);
    }
}
