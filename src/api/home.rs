use axum::{
    Form, Json,
    extract::{Query, State},
    response::Redirect,
};
use std::sync::Arc;

use super::{AddMovieForm, ApiError, ApiResponse, AppState, HomeQuery, HomeView};
use crate::api::validation::validate_title;
use crate::services::home::HomeSort;

/// `GET /`: the weekly movie and the rated history of `seen` movies.
pub async fn home(
    State(state): State<Arc<AppState>>,
    Query(query): Query<HomeQuery>,
) -> Result<Json<ApiResponse<HomeView>>, ApiError> {
    let sort = HomeSort::from_param(query.sort.as_deref());
    let view = state.movie_service().home(&query.q, sort).await?;
    Ok(Json(ApiResponse::success(view)))
}

/// `POST /add_movie`: manual entry without a metadata link.
pub async fn add_movie(
    State(state): State<Arc<AppState>>,
    Form(form): Form<AddMovieForm>,
) -> Result<Redirect, ApiError> {
    let title = validate_title(&form.title)?;

    state
        .movie_service()
        .add_manual_movie(title, &form.date_watched)
        .await?;

    Ok(Redirect::to("/"))
}
