use axum::{
    Json,
    extract::{Query, State},
};
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState, DiaryQuery, DiaryView};

/// `GET /diary?start=YYYY-MM-DD&end=YYYY-MM-DD`; both bounds are optional and inclusive.
pub async fn diary(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DiaryQuery>,
) -> Result<Json<ApiResponse<DiaryView>>, ApiError> {
    let view = state
        .movie_service()
        .diary(&query.start, &query.end)
        .await?;
    Ok(Json(ApiResponse::success(view)))
}
