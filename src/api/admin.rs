//! Admin endpoints: catalogue listing, metadata search, and the movie and
//! member write actions. Writes answer with a 303 back to `/admin` (or `/`
//! after a successful metadata add); input problems travel in `?error=`.

use axum::{
    Form, Json,
    extract::{Path, Query, State},
    response::Redirect,
};
use std::sync::Arc;

use super::{
    AddMemberForm, AddTmdbMovieForm, AdminQuery, AdminSearchQuery, AdminSearchView, AdminView,
    ApiError, ApiResponse, AppState, ConfirmMovieQuery, ConfirmMovieView, UpdateMovieForm,
};
use crate::api::validation::{
    parse_tmdb_id, validate_member_name, validate_movie_id, validate_status, validate_title,
    validate_tmdb_id,
};
use crate::models::movie::NewMovie;
use crate::services::{AdminFilter, MovieError};

const ADMIN: &str = "/admin";

fn admin_error(code: &str) -> Redirect {
    Redirect::to(&format!("{ADMIN}?error={code}"))
}

pub async fn admin_page(
    State(state): State<Arc<AppState>>,
    Query(query): Query<AdminQuery>,
) -> Result<Json<ApiResponse<AdminView>>, ApiError> {
    let filter = AdminFilter {
        q: query.q,
        status: query.status,
        sort: query.sort,
        error: query.error,
    };

    let view = state.movie_service().admin(filter).await?;
    Ok(Json(ApiResponse::success(view)))
}

pub async fn search(
    State(state): State<Arc<AppState>>,
    Query(query): Query<AdminSearchQuery>,
) -> Json<ApiResponse<AdminSearchView>> {
    let view = state.movie_service().search_metadata(&query.query).await;
    Json(ApiResponse::success(view))
}

pub async fn confirm_movie(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ConfirmMovieQuery>,
) -> Result<Json<ApiResponse<ConfirmMovieView>>, ApiError> {
    let tmdb_id = validate_tmdb_id(query.tmdb_id)?;

    let view = state.movie_service().confirm_movie(
        tmdb_id,
        query.title,
        query.year,
        query.poster_path,
    );
    Ok(Json(ApiResponse::success(view)))
}

pub async fn add_movie_tmdb(
    State(state): State<Arc<AppState>>,
    Form(form): Form<AddTmdbMovieForm>,
) -> Result<Redirect, ApiError> {
    let Ok(tmdb_id) = parse_tmdb_id(&form.tmdb_id) else {
        return Ok(admin_error("InvalidTmdbId"));
    };
    let Ok(title) = validate_title(&form.title) else {
        return Ok(admin_error("InvalidTitle"));
    };
    let Ok(status) = validate_status(&form.status) else {
        return Ok(admin_error("InvalidStatus"));
    };

    let movie = NewMovie {
        tmdb_id: Some(tmdb_id),
        title: title.to_string(),
        date_watched: form.date_watched.trim().to_string(),
        status,
    };

    match state.movie_service().add_from_metadata(movie).await {
        Ok(_) => Ok(Redirect::to("/")),
        Err(MovieError::DuplicateExternalId(_)) => Ok(admin_error("MovieAlreadyExists")),
        Err(e) => Err(e.into()),
    }
}

pub async fn delete_movie(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Redirect, ApiError> {
    let Ok(id) = validate_movie_id(id) else {
        return Ok(Redirect::to(ADMIN));
    };

    match state.movie_service().delete_movie(id).await {
        Ok(()) | Err(MovieError::NotFound(_)) => Ok(Redirect::to(ADMIN)),
        Err(e) => Err(e.into()),
    }
}

pub async fn add_member(
    State(state): State<Arc<AppState>>,
    Form(form): Form<AddMemberForm>,
) -> Result<Redirect, ApiError> {
    let Ok(name) = validate_member_name(&form.member_name) else {
        return Ok(admin_error("InvalidMemberName"));
    };

    state.movie_service().add_member(name).await?;
    Ok(Redirect::to(ADMIN))
}

pub async fn update_movie(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Form(form): Form<UpdateMovieForm>,
) -> Result<Redirect, ApiError> {
    let Ok(id) = validate_movie_id(id) else {
        return Ok(Redirect::to(ADMIN));
    };
    let Ok(status) = validate_status(&form.status) else {
        return Ok(admin_error("InvalidStatus"));
    };

    match state
        .movie_service()
        .update_movie(id, &form.date_watched, status)
        .await
    {
        Ok(_) | Err(MovieError::NotFound(_)) => Ok(Redirect::to(ADMIN)),
        Err(e) => Err(e.into()),
    }
}
