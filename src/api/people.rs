use axum::{
    extract::{Path, State},
    http::{StatusCode, header},
    response::IntoResponse,
};
use std::sync::Arc;

use super::AppState;

/// `GET /person/imdb/{id}`: 302 to the person's IMDb page, or to the IMDb
/// home page when no mapping is known.
pub async fn person_imdb_redirect(
    State(state): State<Arc<AppState>>,
    Path(person_id): Path<i64>,
) -> impl IntoResponse {
    let url = state.movie_service().person_profile_url(person_id).await;
    (StatusCode::FOUND, [(header::LOCATION, url)])
}
