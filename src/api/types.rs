use serde::{Deserialize, Serialize};

use crate::clients::tmdb::{CastMember, CrewMember, MovieDetails, MovieSearchResult};
use crate::models::member::FamilyMember;
use crate::models::movie::Movie;
use crate::models::rating::Rating;

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub const fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// A movie card as shown on the home and diary pages.
#[derive(Debug, Clone, Serialize)]
pub struct MovieEntryDto {
    pub movie: Movie,
    pub average: Option<f64>,
    pub stars: String,
    pub poster_url: Option<String>,
    pub details: Option<MovieDetails>,
}

#[derive(Debug, Serialize)]
pub struct TopMovieDto {
    pub movie: Movie,
    pub average: f64,
}

#[derive(Debug, Serialize)]
pub struct HomeView {
    pub weekly_movie: Option<Movie>,
    pub weekly_details: Option<MovieDetails>,
    pub weekly_poster_url: Option<String>,
    pub director: Option<CrewMember>,
    pub movies: Vec<MovieEntryDto>,
    pub top_movie: Option<TopMovieDto>,
    pub sort: String,
    pub q: String,
}

#[derive(Debug, Serialize)]
pub struct RatingSummaryDto {
    pub average: Option<f64>,
    pub stars: String,
    pub count: usize,
    pub highest: Option<Rating>,
    pub lowest: Option<Rating>,
}

#[derive(Debug, Serialize)]
pub struct MovieDetailView {
    pub movie: Movie,
    pub ratings: Vec<Rating>,
    pub summary: RatingSummaryDto,
    pub members: Vec<String>,
    /// Ratings are only accepted for the weekly movie.
    pub locked: bool,
    pub details: Option<MovieDetails>,
    pub poster_url: Option<String>,
    pub director: Option<CrewMember>,
    pub top_cast: Vec<CastMember>,
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RatePageView {
    pub movie: Movie,
    pub members: Vec<FamilyMember>,
    pub locked: bool,
}

#[derive(Debug, Serialize)]
pub struct AdminView {
    pub members: Vec<FamilyMember>,
    pub movies: Vec<Movie>,
    pub q: String,
    pub status: String,
    pub sort: String,
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SearchResultDto {
    pub tmdb_id: i32,
    pub title: String,
    pub original_title: Option<String>,
    pub year: Option<String>,
    pub overview: Option<String>,
    pub poster_path: Option<String>,
    pub poster_url: Option<String>,
}

impl SearchResultDto {
    #[must_use]
    pub fn from_result(result: MovieSearchResult, poster_url: Option<String>) -> Self {
        Self {
            year: result.year().map(str::to_string),
            tmdb_id: result.id,
            title: result.title,
            original_title: result.original_title,
            overview: result.overview,
            poster_path: result.poster_path,
            poster_url,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AdminSearchView {
    pub query: String,
    pub results: Vec<SearchResultDto>,
}

#[derive(Debug, Serialize)]
pub struct ConfirmMovieView {
    pub tmdb_id: i32,
    pub title: String,
    pub year: String,
    pub poster_path: String,
    pub poster_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DiaryGroupDto {
    /// `YYYY-MM`, or `Unknown` for movies without a usable date.
    pub month: String,
    pub entries: Vec<MovieEntryDto>,
}

#[derive(Debug, Serialize)]
pub struct DiaryView {
    pub groups: Vec<DiaryGroupDto>,
    pub start: String,
    pub end: String,
}

#[derive(Debug, Serialize)]
pub struct HealthDto {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub database: bool,
    pub metadata_configured: bool,
}

#[derive(Debug, Deserialize)]
pub struct HomeQuery {
    #[serde(default)]
    pub q: String,
    #[serde(default)]
    pub sort: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct MovieQuery {
    pub error: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AdminQuery {
    #[serde(default)]
    pub q: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub sort: Option<String>,
    pub error: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AdminSearchQuery {
    #[serde(default)]
    pub query: String,
}

#[derive(Debug, Deserialize)]
pub struct ConfirmMovieQuery {
    pub tmdb_id: i32,
    pub title: String,
    #[serde(default)]
    pub year: String,
    #[serde(default)]
    pub poster_path: String,
}

#[derive(Debug, Deserialize)]
pub struct DiaryQuery {
    #[serde(default)]
    pub start: String,
    #[serde(default)]
    pub end: String,
}

#[derive(Debug, Deserialize)]
pub struct AddMovieForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub date_watched: String,
}

/// Rating form. The score arrives as raw text and is validated by the handler,
/// so a malformed value redirects back with an error instead of a 422.
#[derive(Debug, Deserialize)]
pub struct RateMovieForm {
    #[serde(default)]
    pub member_name: String,
    #[serde(default)]
    pub score: String,
}

/// Every field is optional text for the same reason as [`RateMovieForm`].
#[derive(Debug, Deserialize)]
pub struct AddTmdbMovieForm {
    #[serde(default)]
    pub tmdb_id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub date_watched: String,
    #[serde(default)]
    pub status: String,
}

#[derive(Debug, Deserialize)]
pub struct AddMemberForm {
    #[serde(default)]
    pub member_name: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateMovieForm {
    #[serde(default)]
    pub date_watched: String,
    #[serde(default)]
    pub status: String,
}
