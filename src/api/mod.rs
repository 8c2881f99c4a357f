use axum::{
    Router, middleware,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::services::{MetadataSource, MovieService};
use crate::state::SharedState;

mod admin;
mod diary;
mod error;
mod home;
mod movies;
mod observability;
mod people;
pub mod types;
mod validation;

pub use error::ApiError;
pub use types::*;

use metrics_exporter_prometheus::PrometheusHandle;

#[derive(Clone)]
pub struct AppState {
    pub shared: Arc<SharedState>,

    pub start_time: std::time::Instant,

    pub prometheus_handle: Option<PrometheusHandle>,
}

impl AppState {
    #[must_use]
    pub fn store(&self) -> &crate::db::Store {
        &self.shared.store
    }

    #[must_use]
    pub fn movie_service(&self) -> &Arc<dyn MovieService> {
        &self.shared.movie_service
    }
}

#[must_use]
pub fn create_app_state(
    shared: Arc<SharedState>,
    prometheus_handle: Option<PrometheusHandle>,
) -> Arc<AppState> {
    Arc::new(AppState {
        shared,
        start_time: std::time::Instant::now(),
        prometheus_handle,
    })
}

pub async fn create_app_state_from_config(
    config: Config,
    prometheus_handle: Option<PrometheusHandle>,
) -> anyhow::Result<Arc<AppState>> {
    let shared = Arc::new(SharedState::new(config).await?);
    Ok(create_app_state(shared, prometheus_handle))
}

/// Same as [`create_app_state_from_config`] but with a custom metadata source.
pub async fn create_app_state_with_metadata(
    config: Config,
    source: Arc<dyn MetadataSource>,
    prometheus_handle: Option<PrometheusHandle>,
) -> anyhow::Result<Arc<AppState>> {
    let shared = Arc::new(SharedState::with_metadata_source(config, source).await?);
    Ok(create_app_state(shared, prometheus_handle))
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(home::home))
        .route("/add_movie", post(home::add_movie))
        .route("/movie/{id}", get(movies::movie_detail))
        .route("/movie/{id}/rate", get(movies::rate_page))
        .route("/rate_movie/{id}", post(movies::rate_movie))
        .route("/admin", get(admin::admin_page))
        .route("/admin/search", get(admin::search))
        .route("/admin/confirm_movie", get(admin::confirm_movie))
        .route("/admin/add_movie_tmdb", post(admin::add_movie_tmdb))
        .route("/admin/add_member", post(admin::add_member))
        .route("/admin/update_movie/{id}", post(admin::update_movie))
        .route("/admin/delete_movie/{id}", post(admin::delete_movie))
        .route("/diary", get(diary::diary))
        .route("/person/imdb/{id}", get(people::person_imdb_redirect))
        .route("/health", get(observability::get_health))
        .route("/metrics", get(observability::get_metrics))
        .layer(middleware::from_fn(observability::logging_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
