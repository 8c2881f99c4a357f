use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait, sea_query::Expr,
};
use tracing::info;

use crate::entities::{movies, prelude::*, ratings};
use crate::models::movie::{Movie, MovieFilter, MovieSort, MovieStatus, NewMovie};

impl From<movies::Model> for Movie {
    fn from(model: movies::Model) -> Self {
        Self {
            id: model.id,
            tmdb_id: model.tmdb_id,
            title: model.title,
            date_watched: model.date_watched,
            status: model.status.as_deref().and_then(MovieStatus::parse),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted(Movie),
    /// A movie with the same TMDB id already exists; nothing was written.
    DuplicateExternalId(Movie),
}

pub struct MovieRepository {
    conn: DatabaseConnection,
}

impl MovieRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn get(&self, id: i32) -> Result<Option<Movie>> {
        let movie = Movies::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query movie by ID")?;

        Ok(movie.map(Movie::from))
    }

    pub async fn current_weekly(&self) -> Result<Option<Movie>> {
        let movie = Movies::find()
            .filter(movies::Column::Status.eq(MovieStatus::WEEKLY))
            .order_by_asc(movies::Column::Id)
            .one(&self.conn)
            .await
            .context("Failed to query weekly movie")?;

        Ok(movie.map(Movie::from))
    }

    /// Lists movies matching `filter`.
    ///
    /// Status and date bounds are applied in SQL; the date bounds compare the
    /// stored `YYYY-MM-DD` strings, so blank dates never satisfy a lower bound.
    /// The title match runs in Rust so that case folding also covers
    /// non-ASCII titles.
    pub async fn list(&self, filter: &MovieFilter) -> Result<Vec<Movie>> {
        let mut query = Movies::find();

        if let Some(status) = &filter.status {
            query = query.filter(movies::Column::Status.eq(status.as_str()));
        }
        if let Some(from) = filter.watched_from.as_deref().filter(|d| !d.is_empty()) {
            query = query.filter(movies::Column::DateWatched.gte(from));
        }
        if let Some(to) = filter.watched_to.as_deref().filter(|d| !d.is_empty()) {
            query = query.filter(movies::Column::DateWatched.lte(to));
        }

        query = match filter.sort {
            MovieSort::Insertion => query.order_by_asc(movies::Column::Id),
            MovieSort::DateDesc => query
                .order_by_desc(movies::Column::DateWatched)
                .order_by_asc(movies::Column::Id),
            MovieSort::DateAsc => query
                .order_by_asc(movies::Column::DateWatched)
                .order_by_asc(movies::Column::Id),
            MovieSort::Title => query
                .order_by_asc(movies::Column::Title)
                .order_by_asc(movies::Column::Id),
        };

        let rows = query
            .all(&self.conn)
            .await
            .context("Failed to list movies")?;

        let title = filter.title.as_deref().unwrap_or_default();
        Ok(rows
            .into_iter()
            .map(Movie::from)
            .filter(|movie| movie.title_contains(title))
            .collect())
    }

    /// Inserts a movie, rejecting duplicate TMDB ids.
    ///
    /// A weekly insert demotes the previous weekly movie in the same transaction.
    pub async fn insert(&self, new: &NewMovie) -> Result<InsertOutcome> {
        let txn = self.conn.begin().await?;

        if let Some(tmdb_id) = new.tmdb_id {
            let existing = Movies::find()
                .filter(movies::Column::TmdbId.eq(tmdb_id))
                .one(&txn)
                .await
                .context("Failed to check for duplicate TMDB ID")?;

            if let Some(existing) = existing {
                txn.rollback().await?;
                return Ok(InsertOutcome::DuplicateExternalId(existing.into()));
            }
        }

        if new.status.as_ref().is_some_and(MovieStatus::is_weekly) {
            demote_weekly(&txn, None).await?;
        }

        let model = movies::ActiveModel {
            tmdb_id: Set(new.tmdb_id),
            title: Set(new.title.clone()),
            date_watched: Set(new.date_watched.clone()),
            status: Set(new.status.as_ref().map(|s| s.as_str().to_string())),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .context("Failed to insert movie")?;

        txn.commit().await?;

        info!("Added movie: {} (ID: {})", model.title, model.id);
        Ok(InsertOutcome::Inserted(model.into()))
    }

    /// Updates the watch date and status. Returns `None` when the movie does not exist.
    pub async fn update(
        &self,
        id: i32,
        date_watched: &str,
        status: Option<&MovieStatus>,
    ) -> Result<Option<Movie>> {
        let txn = self.conn.begin().await?;

        let Some(model) = Movies::find_by_id(id).one(&txn).await? else {
            txn.rollback().await?;
            return Ok(None);
        };

        if status.is_some_and(MovieStatus::is_weekly) {
            demote_weekly(&txn, Some(id)).await?;
        }

        let mut active: movies::ActiveModel = model.into();
        active.date_watched = Set(date_watched.to_string());
        active.status = Set(status.map(|s| s.as_str().to_string()));
        let updated = active
            .update(&txn)
            .await
            .context("Failed to update movie")?;

        txn.commit().await?;

        info!(
            "Updated movie {}: date={:?} status={:?}",
            id, updated.date_watched, updated.status
        );
        Ok(Some(updated.into()))
    }

    /// Deletes a movie together with its ratings.
    pub async fn remove(&self, id: i32) -> Result<bool> {
        let txn = self.conn.begin().await?;

        ratings::Entity::delete_many()
            .filter(ratings::Column::MovieId.eq(id))
            .exec(&txn)
            .await?;

        let result = Movies::delete_by_id(id).exec(&txn).await?;

        txn.commit().await?;

        let removed = result.rows_affected > 0;
        if removed {
            info!("Removed movie with ID: {}", id);
        }
        Ok(removed)
    }
}

/// Moves every weekly movie except `keep` back to `seen`.
async fn demote_weekly<C: ConnectionTrait>(conn: &C, keep: Option<i32>) -> Result<u64> {
    let mut update = Movies::update_many()
        .col_expr(movies::Column::Status, Expr::value(MovieStatus::SEEN))
        .filter(movies::Column::Status.eq(MovieStatus::WEEKLY));

    if let Some(id) = keep {
        update = update.filter(movies::Column::Id.ne(id));
    }

    let result = update
        .exec(conn)
        .await
        .context("Failed to demote weekly movie")?;

    if result.rows_affected > 0 {
        info!("Demoted {} weekly movie(s) to seen", result.rows_affected);
    }
    Ok(result.rows_affected)
}
