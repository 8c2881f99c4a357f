//! Domain service for the club's pages and admin actions.
//!
//! Handlers talk to [`MovieService`] only; it composes the store, the rating
//! arithmetic and metadata enrichment into page view models.

use crate::api::types::{
    AdminSearchView, AdminView, ConfirmMovieView, DiaryView, HomeView, MovieDetailView,
    RatePageView,
};
use crate::domain::{MovieId, Score};
use crate::models::movie::{Movie, MovieStatus, NewMovie};
use crate::models::rating::Rating;
use crate::services::home::HomeSort;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MovieError {
    #[error("Movie not found: {0}")]
    NotFound(MovieId),

    /// Ratings are only accepted for the current weekly movie.
    #[error("Movie {0} is not the weekly movie")]
    NotWeekly(MovieId),

    #[error("A movie with TMDB id {0} already exists")]
    DuplicateExternalId(i32),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<anyhow::Error> for MovieError {
    fn from(err: anyhow::Error) -> Self {
        Self::Database(format!("{err:#}"))
    }
}

impl From<sea_orm::DbErr> for MovieError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

/// Filters for the admin listing, as received from the query string.
#[derive(Debug, Clone, Default)]
pub struct AdminFilter {
    pub q: String,
    /// `None`, blank or `all` lists every status.
    pub status: Option<String>,
    pub sort: Option<String>,
    pub error: Option<String>,
}

/// # Examples
///
/// ```rust,ignore
/// use filmclub::domain::{MovieId, Score};
/// use filmclub::services::{MovieError, MovieService};
/// use std::sync::Arc;
///
/// async fn rate(service: Arc<dyn MovieService>) -> Result<(), MovieError> {
///     let score = Score::new(4.5).unwrap();
///     service.rate_movie(MovieId::new(1), "Leo", score).await?;
///     Ok(())
/// }
/// ```
#[async_trait::async_trait]
pub trait MovieService: Send + Sync {
    /// Weekly movie plus the `seen` history matching `q`, sorted by `sort`.
    ///
    /// # Errors
    ///
    /// Returns [`MovieError::Database`] on store failures.
    async fn home(&self, q: &str, sort: HomeSort) -> Result<HomeView, MovieError>;

    /// Adds a movie typed in by hand (no TMDB link, no status).
    ///
    /// # Errors
    ///
    /// Returns [`MovieError::Database`] on store failures.
    async fn add_manual_movie(&self, title: &str, date_watched: &str)
    -> Result<Movie, MovieError>;

    /// # Errors
    ///
    /// - Returns [`MovieError::NotFound`] if the movie does not exist
    /// - Returns [`MovieError::Database`] on store failures
    async fn movie_detail(
        &self,
        id: MovieId,
        error: Option<String>,
    ) -> Result<MovieDetailView, MovieError>;

    /// Creates or overwrites `member_name`'s score for the weekly movie.
    ///
    /// # Errors
    ///
    /// - Returns [`MovieError::NotFound`] if the movie does not exist
    /// - Returns [`MovieError::NotWeekly`] if the movie is locked; nothing is stored
    /// - Returns [`MovieError::Database`] on store failures
    async fn rate_movie(
        &self,
        id: MovieId,
        member_name: &str,
        score: Score,
    ) -> Result<Rating, MovieError>;

    /// # Errors
    ///
    /// - Returns [`MovieError::NotFound`] if the movie does not exist
    /// - Returns [`MovieError::Database`] on store failures
    async fn rate_page(&self, id: MovieId) -> Result<RatePageView, MovieError>;

    /// # Errors
    ///
    /// Returns [`MovieError::Database`] on store failures.
    async fn admin(&self, filter: AdminFilter) -> Result<AdminView, MovieError>;

    /// Metadata search passthrough. Failures give an empty result list.
    async fn search_metadata(&self, query: &str) -> AdminSearchView;

    /// Echoes a chosen search result back for confirmation.
    fn confirm_movie(
        &self,
        tmdb_id: i32,
        title: String,
        year: String,
        poster_path: String,
    ) -> ConfirmMovieView;

    /// Adds a movie picked from metadata search.
    ///
    /// # Errors
    ///
    /// - Returns [`MovieError::DuplicateExternalId`] if the TMDB id is already stored
    /// - Returns [`MovieError::Database`] on store failures
    async fn add_from_metadata(&self, movie: NewMovie) -> Result<Movie, MovieError>;

    /// Deletes the movie together with its ratings.
    ///
    /// # Errors
    ///
    /// - Returns [`MovieError::NotFound`] if the movie does not exist
    /// - Returns [`MovieError::Database`] on store failures
    async fn delete_movie(&self, id: MovieId) -> Result<(), MovieError>;

    /// Returns `false` when the member already existed.
    ///
    /// # Errors
    ///
    /// Returns [`MovieError::Database`] on store failures.
    async fn add_member(&self, name: &str) -> Result<bool, MovieError>;

    /// # Errors
    ///
    /// - Returns [`MovieError::NotFound`] if the movie does not exist
    /// - Returns [`MovieError::Database`] on store failures
    async fn update_movie(
        &self,
        id: MovieId,
        date_watched: &str,
        status: Option<MovieStatus>,
    ) -> Result<Movie, MovieError>;

    /// Movies watched between `start` and `end` (inclusive, blank = open), grouped by month.
    ///
    /// # Errors
    ///
    /// Returns [`MovieError::Database`] on store failures.
    async fn diary(&self, start: &str, end: &str) -> Result<DiaryView, MovieError>;

    /// External profile URL for a person, or the generic fallback page.
    async fn person_profile_url(&self, person_id: i64) -> String;
}
