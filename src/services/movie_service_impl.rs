//! `SeaORM` implementation of the [`MovieService`] trait.
//!
//! Store reads for a page run concurrently with the metadata lookups they do
//! not depend on; per-movie detail requests are fanned out in one batch.

use std::sync::Arc;

use tracing::info;

use crate::api::types::{
    AdminSearchView, AdminView, ConfirmMovieView, DiaryGroupDto, DiaryView, HomeView,
    MovieDetailView, MovieEntryDto, RatePageView, RatingSummaryDto, SearchResultDto, TopMovieDto,
};
use crate::db::{InsertOutcome, Store};
use crate::domain::{MovieId, Score};
use crate::models::movie::{Movie, MovieFilter, MovieSort, MovieStatus, NewMovie};
use crate::models::rating::{RateOutcome, Rating};
use crate::services::credits::{self, TOP_CAST_LIMIT};
use crate::services::diary::group_by_month;
use crate::services::home::{HomeSort, sort_entries, top_rated};
use crate::services::metadata::MetadataService;
use crate::services::movie_service::{AdminFilter, MovieError, MovieService};
use crate::services::stats::{RatingSummary, average_score, stars};

const ALL_STATUSES: &str = "all";
const DEFAULT_ADMIN_SORT: &str = "date_desc";

fn non_blank(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

pub struct SeaOrmMovieService {
    store: Store,
    metadata: Arc<MetadataService>,
}

impl SeaOrmMovieService {
    #[must_use]
    pub const fn new(store: Store, metadata: Arc<MetadataService>) -> Self {
        Self { store, metadata }
    }

    /// Attaches averages, stars and metadata to each movie, keeping input order.
    async fn build_entries(&self, movies: Vec<Movie>) -> Result<Vec<MovieEntryDto>, MovieError> {
        let ids: Vec<i32> = movies.iter().map(|m| m.id).collect();

        let (ratings, details) = tokio::join!(
            self.store.ratings_for_movies(&ids),
            self.metadata.details_for(&movies)
        );
        let ratings = ratings?;

        Ok(movies
            .into_iter()
            .zip(details)
            .map(|(movie, details)| {
                let average = ratings
                    .get(&movie.id)
                    .and_then(|r| average_score(r.iter().map(|r| r.score)));
                let poster_url = details
                    .as_ref()
                    .and_then(|d| self.metadata.poster_url(d.poster_path.as_deref()));

                MovieEntryDto {
                    stars: stars(average),
                    movie,
                    average,
                    poster_url,
                    details,
                }
            })
            .collect())
    }

    async fn require_movie(&self, id: MovieId) -> Result<Movie, MovieError> {
        self.store
            .get_movie(id.value())
            .await?
            .ok_or(MovieError::NotFound(id))
    }
}

#[async_trait::async_trait]
impl MovieService for SeaOrmMovieService {
    async fn home(&self, q: &str, sort: HomeSort) -> Result<HomeView, MovieError> {
        let filter = MovieFilter {
            title: non_blank(q),
            status: Some(MovieStatus::Seen),
            ..MovieFilter::default()
        };

        let (weekly, seen) = tokio::join!(
            self.store.current_weekly_movie(),
            self.store.list_movies(&filter)
        );
        let weekly = weekly?;
        let seen = seen?;

        let weekly_tmdb_id = weekly.as_ref().and_then(|m| m.tmdb_id);
        let (weekly_details, entries) = tokio::join!(
            self.metadata.details(weekly_tmdb_id),
            self.build_entries(seen)
        );
        let mut entries = entries?;

        // Ties are decided by store order, so pick the top movie before sorting.
        let top_movie = top_rated(&entries).map(|(entry, average)| TopMovieDto {
            movie: entry.movie.clone(),
            average,
        });
        sort_entries(&mut entries, sort);

        let director = weekly_details
            .as_ref()
            .and_then(|d| credits::director(&d.credits))
            .cloned();
        let weekly_poster_url = weekly_details
            .as_ref()
            .and_then(|d| self.metadata.poster_url(d.poster_path.as_deref()));

        Ok(HomeView {
            weekly_movie: weekly,
            weekly_details,
            weekly_poster_url,
            director,
            movies: entries,
            top_movie,
            sort: sort.as_str().to_string(),
            q: q.to_string(),
        })
    }

    async fn add_manual_movie(
        &self,
        title: &str,
        date_watched: &str,
    ) -> Result<Movie, MovieError> {
        let new = NewMovie::manual(title.trim(), date_watched.trim());

        match self.store.add_movie(&new).await? {
            InsertOutcome::Inserted(movie) => {
                info!(movie_id = movie.id, title = %movie.title, "Added movie");
                Ok(movie)
            }
            // Manual movies carry no TMDB id, so there is nothing to collide with.
            InsertOutcome::DuplicateExternalId(movie) => Ok(movie),
        }
    }

    async fn movie_detail(
        &self,
        id: MovieId,
        error: Option<String>,
    ) -> Result<MovieDetailView, MovieError> {
        let movie = self.require_movie(id).await?;

        let (ratings, members, details) = tokio::join!(
            self.store.ratings_for_movie(movie.id),
            self.store.list_members(),
            self.metadata.details(movie.tmdb_id)
        );
        let ratings = ratings?;
        let members = members?;

        let summary = RatingSummary::from_ratings(&ratings);
        let (director, top_cast) = details.as_ref().map_or((None, Vec::new()), |d| {
            (
                credits::director(&d.credits).cloned(),
                credits::top_cast(&d.credits, TOP_CAST_LIMIT)
                    .into_iter()
                    .cloned()
                    .collect(),
            )
        });
        let poster_url = details
            .as_ref()
            .and_then(|d| self.metadata.poster_url(d.poster_path.as_deref()));

        Ok(MovieDetailView {
            locked: !movie.is_weekly(),
            movie,
            ratings,
            summary: RatingSummaryDto {
                stars: stars(summary.average),
                average: summary.average,
                count: summary.count,
                highest: summary.highest,
                lowest: summary.lowest,
            },
            members: members.into_iter().map(|m| m.name).collect(),
            details,
            poster_url,
            director,
            top_cast,
            error,
        })
    }

    async fn rate_movie(
        &self,
        id: MovieId,
        member_name: &str,
        score: Score,
    ) -> Result<Rating, MovieError> {
        let outcome = self
            .store
            .rate_weekly_movie(id.value(), member_name, score.value())
            .await?;

        match outcome {
            RateOutcome::Applied { rating, replaced } => {
                let kind = if replaced { "replaced" } else { "created" };
                metrics::counter!("filmclub_ratings_total", "outcome" => kind).increment(1);
                info!(
                    movie_id = rating.movie_id,
                    member = %rating.member_name,
                    score = rating.score,
                    replaced,
                    "Rating stored"
                );
                Ok(rating)
            }
            RateOutcome::Locked => {
                metrics::counter!("filmclub_ratings_total", "outcome" => "locked").increment(1);
                info!(movie_id = id.value(), member = member_name, "Rating rejected, movie is locked");
                Err(MovieError::NotWeekly(id))
            }
            RateOutcome::MovieNotFound => Err(MovieError::NotFound(id)),
        }
    }

    async fn rate_page(&self, id: MovieId) -> Result<RatePageView, MovieError> {
        let movie = self.require_movie(id).await?;
        let members = self.store.list_members().await?;

        Ok(RatePageView {
            locked: !movie.is_weekly(),
            movie,
            members,
        })
    }

    async fn admin(&self, filter: AdminFilter) -> Result<AdminView, MovieError> {
        let status_param = filter
            .status
            .as_deref()
            .and_then(non_blank)
            .unwrap_or_else(|| ALL_STATUSES.to_string());
        let sort_param = filter
            .sort
            .as_deref()
            .and_then(non_blank)
            .unwrap_or_else(|| DEFAULT_ADMIN_SORT.to_string());

        let status = if status_param == ALL_STATUSES {
            None
        } else {
            MovieStatus::parse(&status_param)
        };

        let movie_filter = MovieFilter {
            title: non_blank(&filter.q),
            status,
            sort: MovieSort::from_param(&sort_param),
            ..MovieFilter::default()
        };

        let (members, movies) = tokio::join!(
            self.store.list_members(),
            self.store.list_movies(&movie_filter)
        );

        Ok(AdminView {
            members: members?,
            movies: movies?,
            q: filter.q,
            status: status_param,
            sort: sort_param,
            error: filter.error,
        })
    }

    async fn search_metadata(&self, query: &str) -> AdminSearchView {
        let results = self
            .metadata
            .search(query)
            .await
            .into_iter()
            .map(|result| {
                let poster_url = self.metadata.poster_url(result.poster_path.as_deref());
                SearchResultDto::from_result(result, poster_url)
            })
            .collect();

        AdminSearchView {
            query: query.to_string(),
            results,
        }
    }

    fn confirm_movie(
        &self,
        tmdb_id: i32,
        title: String,
        year: String,
        poster_path: String,
    ) -> ConfirmMovieView {
        ConfirmMovieView {
            poster_url: self.metadata.poster_url(Some(poster_path.as_str())),
            tmdb_id,
            title,
            year,
            poster_path,
        }
    }

    async fn add_from_metadata(&self, movie: NewMovie) -> Result<Movie, MovieError> {
        let tmdb_id = movie.tmdb_id.unwrap_or_default();

        match self.store.add_movie(&movie).await? {
            InsertOutcome::Inserted(movie) => {
                info!(
                    movie_id = movie.id,
                    tmdb_id,
                    title = %movie.title,
                    status = movie.status.as_ref().map_or("", MovieStatus::as_str),
                    "Added movie from metadata"
                );
                Ok(movie)
            }
            InsertOutcome::DuplicateExternalId(existing) => {
                info!(tmdb_id, existing_id = existing.id, "Rejected duplicate TMDB id");
                Err(MovieError::DuplicateExternalId(tmdb_id))
            }
        }
    }

    async fn delete_movie(&self, id: MovieId) -> Result<(), MovieError> {
        if self.store.remove_movie(id.value()).await? {
            info!(movie_id = id.value(), "Deleted movie and its ratings");
            Ok(())
        } else {
            Err(MovieError::NotFound(id))
        }
    }

    async fn add_member(&self, name: &str) -> Result<bool, MovieError> {
        let added = self.store.add_member_if_absent(name.trim()).await?;
        if added {
            info!(member = name.trim(), "Added family member");
        }
        Ok(added)
    }

    async fn update_movie(
        &self,
        id: MovieId,
        date_watched: &str,
        status: Option<MovieStatus>,
    ) -> Result<Movie, MovieError> {
        let movie = self
            .store
            .update_movie(id.value(), date_watched.trim(), status.as_ref())
            .await?
            .ok_or(MovieError::NotFound(id))?;

        info!(
            movie_id = movie.id,
            status = movie.status.as_ref().map_or("", MovieStatus::as_str),
            "Updated movie"
        );
        Ok(movie)
    }

    async fn diary(&self, start: &str, end: &str) -> Result<DiaryView, MovieError> {
        let filter = MovieFilter {
            watched_from: non_blank(start),
            watched_to: non_blank(end),
            ..MovieFilter::default()
        };

        let movies = self.store.list_movies(&filter).await?;
        let entries = self.build_entries(movies).await?;

        let groups = group_by_month(entries, |entry| entry.movie.date_watched.as_str())
            .into_iter()
            .map(|(month, entries)| DiaryGroupDto { month, entries })
            .collect();

        Ok(DiaryView {
            groups,
            start: start.to_string(),
            end: end.to_string(),
        })
    }

    async fn person_profile_url(&self, person_id: i64) -> String {
        self.metadata.profile_url(person_id).await
    }
}
