//! Movie detail, rating form and rating submission.
//!
//! Unknown movies redirect home instead of answering 404, and rating
//! problems bounce back to the detail page.

use axum::{
    Form, Json,
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState, MovieQuery, RateMovieForm};
use crate::api::validation::{validate_member_name, validate_movie_id, validate_score};
use crate::services::MovieError;

fn detail_url(id: impl std::fmt::Display) -> String {
    format!("/movie/{id}")
}

pub async fn movie_detail(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Query(query): Query<MovieQuery>,
) -> Result<Response, ApiError> {
    let Ok(id) = validate_movie_id(id) else {
        return Ok(Redirect::to("/").into_response());
    };

    match state.movie_service().movie_detail(id, query.error).await {
        Ok(view) => Ok(Json(ApiResponse::success(view)).into_response()),
        Err(MovieError::NotFound(_)) => Ok(Redirect::to("/").into_response()),
        Err(e) => Err(e.into()),
    }
}

pub async fn rate_page(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Response, ApiError> {
    let Ok(id) = validate_movie_id(id) else {
        return Ok(Redirect::to("/").into_response());
    };

    match state.movie_service().rate_page(id).await {
        Ok(view) => Ok(Json(ApiResponse::success(view)).into_response()),
        Err(MovieError::NotFound(_)) => Ok(Redirect::to("/").into_response()),
        Err(e) => Err(e.into()),
    }
}

/// `POST /rate_movie/{id}`.
///
/// Invalid input goes back to the detail page with an `error` code. A movie
/// that is not the weekly pick is locked: the rating is dropped silently.
pub async fn rate_movie(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Form(form): Form<RateMovieForm>,
) -> Result<Redirect, ApiError> {
    let Ok(movie_id) = validate_movie_id(id) else {
        return Ok(Redirect::to("/"));
    };
    let back = detail_url(movie_id);

    let Ok(member_name) = validate_member_name(&form.member_name) else {
        return Ok(Redirect::to(&format!("{back}?error=InvalidMemberName")));
    };
    let Ok(score) = validate_score(&form.score) else {
        return Ok(Redirect::to(&format!("{back}?error=InvalidScore")));
    };

    match state
        .movie_service()
        .rate_movie(movie_id, member_name, score)
        .await
    {
        Ok(_) | Err(MovieError::NotWeekly(_)) => Ok(Redirect::to(&back)),
        Err(MovieError::NotFound(_)) => Ok(Redirect::to("/")),
        Err(e) => Err(e.into()),
    }
}
