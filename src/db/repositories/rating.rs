use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use std::collections::HashMap;
use tracing::{debug, info};

use crate::entities::{movies, ratings};
use crate::models::movie::MovieStatus;
use crate::models::rating::{RateOutcome, Rating};

impl From<ratings::Model> for Rating {
    fn from(model: ratings::Model) -> Self {
        Self {
            id: model.id,
            movie_id: model.movie_id,
            member_name: model.member_name,
            score: model.score,
        }
    }
}

pub struct RatingRepository {
    conn: DatabaseConnection,
}

impl RatingRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn for_movie(&self, movie_id: i32) -> Result<Vec<Rating>> {
        let rows = ratings::Entity::find()
            .filter(ratings::Column::MovieId.eq(movie_id))
            .order_by_asc(ratings::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to query ratings for movie")?;

        Ok(rows.into_iter().map(Rating::from).collect())
    }

    /// Loads ratings for many movies in one query, keyed by movie id.
    pub async fn for_movies(&self, movie_ids: &[i32]) -> Result<HashMap<i32, Vec<Rating>>> {
        if movie_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = ratings::Entity::find()
            .filter(ratings::Column::MovieId.is_in(movie_ids.iter().copied()))
            .order_by_asc(ratings::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to query ratings for movies")?;

        let mut grouped: HashMap<i32, Vec<Rating>> = HashMap::new();
        for row in rows {
            grouped.entry(row.movie_id).or_default().push(row.into());
        }
        Ok(grouped)
    }

    /// Stores `score` for `member_name` on the current weekly movie.
    ///
    /// Movies that are not weekly are locked and left untouched. A second
    /// rating from the same member overwrites the first.
    pub async fn rate_weekly(
        &self,
        movie_id: i32,
        member_name: &str,
        score: f64,
    ) -> Result<RateOutcome> {
        let txn = self.conn.begin().await?;

        let Some(movie) = movies::Entity::find_by_id(movie_id).one(&txn).await? else {
            txn.rollback().await?;
            return Ok(RateOutcome::MovieNotFound);
        };

        if movie.status.as_deref() != Some(MovieStatus::WEEKLY) {
            txn.rollback().await?;
            debug!("Rejected rating for locked movie {}", movie_id);
            return Ok(RateOutcome::Locked);
        }

        let existing = ratings::Entity::find()
            .filter(ratings::Column::MovieId.eq(movie_id))
            .filter(ratings::Column::MemberName.eq(member_name))
            .one(&txn)
            .await
            .context("Failed to query existing rating")?;

        let replaced = existing.is_some();
        let model = match existing {
            Some(existing) => {
                let mut active: ratings::ActiveModel = existing.into();
                active.score = Set(score);
                active.update(&txn).await?
            }
            None => {
                ratings::ActiveModel {
                    movie_id: Set(movie_id),
                    member_name: Set(member_name.to_string()),
                    score: Set(score),
                    ..Default::default()
                }
                .insert(&txn)
                .await?
            }
        };

        txn.commit().await?;

        info!(
            "{} rated movie {} with {} (replaced: {})",
            member_name, movie_id, score, replaced
        );
        Ok(RateOutcome::Applied {
            rating: model.into(),
            replaced,
        })
    }
}
