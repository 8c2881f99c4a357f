use anyhow::Result;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::models::member::FamilyMember;
use crate::models::movie::{Movie, MovieFilter, MovieStatus, NewMovie};
use crate::models::rating::{RateOutcome, Rating};

pub mod migrator;
pub mod repositories;

pub use repositories::movie::InsertOutcome;

/// Pooled handle to the club database.
///
/// Cloning is cheap; every request works through the shared pool and each
/// multi-statement write runs in its own transaction.
#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        if !db_url.contains(":memory:") {
            let path_str = db_url.trim_start_matches("sqlite:").trim_start_matches("//");
            if let Some(parent) = Path::new(path_str).parent()
                && !parent.as_os_str().is_empty()
            {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn movie_repo(&self) -> repositories::movie::MovieRepository {
        repositories::movie::MovieRepository::new(self.conn.clone())
    }

    fn rating_repo(&self) -> repositories::rating::RatingRepository {
        repositories::rating::RatingRepository::new(self.conn.clone())
    }

    fn member_repo(&self) -> repositories::member::MemberRepository {
        repositories::member::MemberRepository::new(self.conn.clone())
    }

    pub async fn get_movie(&self, id: i32) -> Result<Option<Movie>> {
        self.movie_repo().get(id).await
    }

    pub async fn current_weekly_movie(&self) -> Result<Option<Movie>> {
        self.movie_repo().current_weekly().await
    }

    pub async fn list_movies(&self, filter: &MovieFilter) -> Result<Vec<Movie>> {
        self.movie_repo().list(filter).await
    }

    pub async fn add_movie(&self, movie: &NewMovie) -> Result<InsertOutcome> {
        self.movie_repo().insert(movie).await
    }

    pub async fn update_movie(
        &self,
        id: i32,
        date_watched: &str,
        status: Option<&MovieStatus>,
    ) -> Result<Option<Movie>> {
        self.movie_repo().update(id, date_watched, status).await
    }

    pub async fn remove_movie(&self, id: i32) -> Result<bool> {
        self.movie_repo().remove(id).await
    }

    pub async fn ratings_for_movie(&self, movie_id: i32) -> Result<Vec<Rating>> {
        self.rating_repo().for_movie(movie_id).await
    }

    pub async fn ratings_for_movies(&self, movie_ids: &[i32]) -> Result<HashMap<i32, Vec<Rating>>> {
        self.rating_repo().for_movies(movie_ids).await
    }

    pub async fn rate_weekly_movie(
        &self,
        movie_id: i32,
        member_name: &str,
        score: f64,
    ) -> Result<RateOutcome> {
        self.rating_repo()
            .rate_weekly(movie_id, member_name, score)
            .await
    }

    pub async fn list_members(&self) -> Result<Vec<FamilyMember>> {
        self.member_repo().list().await
    }

    pub async fn add_member_if_absent(&self, name: &str) -> Result<bool> {
        self.member_repo().add_if_absent(name).await
    }

    /// Inserts every name that is not stored yet. Returns how many were added.
    pub async fn seed_members(&self, names: &[String]) -> Result<usize> {
        let mut added = 0;
        for name in names {
            let name = name.trim();
            if !name.is_empty() && self.add_member_if_absent(name).await? {
                added += 1;
            }
        }
        Ok(added)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{ActiveModelTrait, Set};

    async fn test_store() -> Store {
        let db_path =
            std::env::temp_dir().join(format!("filmclub-store-test-{}.db", uuid::Uuid::new_v4()));
        Store::with_pool_options(&format!("sqlite:{}", db_path.display()), 2, 1)
            .await
            .expect("failed to open test store")
    }

    fn tmdb_movie(tmdb_id: i32, title: &str, date: &str, status: MovieStatus) -> NewMovie {
        NewMovie {
            tmdb_id: Some(tmdb_id),
            title: title.to_string(),
            date_watched: date.to_string(),
            status: Some(status),
        }
    }

    async fn insert(store: &Store, movie: NewMovie) -> Movie {
        match store.add_movie(&movie).await.unwrap() {
            InsertOutcome::Inserted(movie) => movie,
            InsertOutcome::DuplicateExternalId(_) => panic!("unexpected duplicate"),
        }
    }

    async fn weekly_count(store: &Store) -> usize {
        store
            .list_movies(&MovieFilter::with_status(MovieStatus::Weekly))
            .await
            .unwrap()
            .len()
    }

    #[tokio::test]
    async fn weekly_insert_demotes_previous_weekly() {
        let store = test_store().await;

        let first = insert(&store, tmdb_movie(1, "Roma", "2024-01-05", MovieStatus::Weekly)).await;
        let second =
            insert(&store, tmdb_movie(2, "Coco", "2024-01-12", MovieStatus::Weekly)).await;

        assert_eq!(weekly_count(&store).await, 1);
        let weekly = store.current_weekly_movie().await.unwrap().unwrap();
        assert_eq!(weekly.id, second.id);

        let first = store.get_movie(first.id).await.unwrap().unwrap();
        assert_eq!(first.status, Some(MovieStatus::Seen));
    }

    #[tokio::test]
    async fn weekly_update_demotes_other_weekly() {
        let store = test_store().await;

        let weekly = insert(&store, tmdb_movie(1, "Roma", "2024-01-05", MovieStatus::Weekly)).await;
        let seen = insert(&store, tmdb_movie(2, "Coco", "2024-01-12", MovieStatus::Seen)).await;

        let promoted = store
            .update_movie(seen.id, "2024-02-01", Some(&MovieStatus::Weekly))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(promoted.date_watched, "2024-02-01");
        assert!(promoted.is_weekly());

        assert_eq!(weekly_count(&store).await, 1);
        let old = store.get_movie(weekly.id).await.unwrap().unwrap();
        assert_eq!(old.status, Some(MovieStatus::Seen));

        // Re-promoting the current weekly movie keeps it weekly.
        store
            .update_movie(seen.id, "2024-02-01", Some(&MovieStatus::Weekly))
            .await
            .unwrap();
        assert_eq!(weekly_count(&store).await, 1);
    }

    #[tokio::test]
    async fn direct_second_weekly_write_is_rejected_by_schema() {
        let store = test_store().await;
        insert(&store, tmdb_movie(1, "Roma", "", MovieStatus::Weekly)).await;

        let bypass = crate::entities::movies::ActiveModel {
            tmdb_id: Set(Some(2)),
            title: Set("Coco".to_string()),
            date_watched: Set(String::new()),
            status: Set(Some(MovieStatus::WEEKLY.to_string())),
            ..Default::default()
        }
        .insert(&store.conn)
        .await;

        assert!(bypass.is_err());
        assert_eq!(weekly_count(&store).await, 1);
    }

    #[tokio::test]
    async fn duplicate_tmdb_id_is_rejected() {
        let store = test_store().await;
        let original = insert(&store, tmdb_movie(10, "A", "2024-01-05", MovieStatus::Weekly)).await;

        let outcome = store
            .add_movie(&tmdb_movie(10, "B", "2024-01-06", MovieStatus::Weekly))
            .await
            .unwrap();
        assert_eq!(outcome, InsertOutcome::DuplicateExternalId(original.clone()));

        let all = store.list_movies(&MovieFilter::default()).await.unwrap();
        assert_eq!(all, vec![original]);
    }

    #[tokio::test]
    async fn manual_movies_do_not_collide_on_missing_tmdb_id() {
        let store = test_store().await;
        insert(&store, NewMovie::manual("Uno", "2024-01-01")).await;
        insert(&store, NewMovie::manual("Dos", "")).await;

        let all = store.list_movies(&MovieFilter::default()).await.unwrap();
        assert_eq!(all.len(), 2);
        assert!(all.iter().all(|m| m.tmdb_id.is_none() && m.status.is_none()));
    }

    #[tokio::test]
    async fn rerating_overwrites_previous_score() {
        let store = test_store().await;
        let movie = insert(&store, tmdb_movie(10, "A", "2024-01-05", MovieStatus::Weekly)).await;

        let first = store.rate_weekly_movie(movie.id, "Leo", 4.0).await.unwrap();
        assert!(matches!(first, RateOutcome::Applied { replaced: false, .. }));

        let second = store.rate_weekly_movie(movie.id, "Leo", 4.5).await.unwrap();
        assert!(matches!(second, RateOutcome::Applied { replaced: true, .. }));

        let ratings = store.ratings_for_movie(movie.id).await.unwrap();
        assert_eq!(ratings.len(), 1);
        assert_eq!(ratings[0].member_name, "Leo");
        assert!((ratings[0].score - 4.5).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn rating_locked_and_missing_movies() {
        let store = test_store().await;
        let seen = insert(&store, tmdb_movie(3, "Seen", "2024-01-05", MovieStatus::Seen)).await;

        let locked = store.rate_weekly_movie(seen.id, "Cata", 3.0).await.unwrap();
        assert_eq!(locked, RateOutcome::Locked);
        assert!(store.ratings_for_movie(seen.id).await.unwrap().is_empty());

        let missing = store.rate_weekly_movie(999, "Cata", 3.0).await.unwrap();
        assert_eq!(missing, RateOutcome::MovieNotFound);
    }

    #[tokio::test]
    async fn remove_movie_deletes_its_ratings() {
        let store = test_store().await;
        let movie = insert(&store, tmdb_movie(4, "Gone", "2024-01-05", MovieStatus::Weekly)).await;
        store.rate_weekly_movie(movie.id, "Leo", 5.0).await.unwrap();
        store.rate_weekly_movie(movie.id, "Sofi", 2.0).await.unwrap();

        assert!(store.remove_movie(movie.id).await.unwrap());
        assert!(store.get_movie(movie.id).await.unwrap().is_none());
        assert!(store.ratings_for_movie(movie.id).await.unwrap().is_empty());
        assert!(!store.remove_movie(movie.id).await.unwrap());
    }

    #[tokio::test]
    async fn list_movies_filters_and_sorts() {
        let store = test_store().await;
        insert(&store, tmdb_movie(1, "Amores Perros", "2024-03-15", MovieStatus::Seen)).await;
        insert(&store, tmdb_movie(2, "Babel", "2024-01-05", MovieStatus::Seen)).await;
        insert(&store, tmdb_movie(3, "Birdman", "", MovieStatus::Weekly)).await;

        let by_title = store
            .list_movies(&MovieFilter {
                title: Some("b".to_string()),
                sort: crate::models::movie::MovieSort::Title,
                ..MovieFilter::default()
            })
            .await
            .unwrap();
        let titles: Vec<_> = by_title.iter().map(|m| m.title.as_str()).collect();
        assert_eq!(titles, vec!["Babel", "Birdman"]);

        let newest_first = store
            .list_movies(&MovieFilter {
                sort: crate::models::movie::MovieSort::DateDesc,
                ..MovieFilter::default()
            })
            .await
            .unwrap();
        let titles: Vec<_> = newest_first.iter().map(|m| m.title.as_str()).collect();
        assert_eq!(titles, vec!["Amores Perros", "Babel", "Birdman"]);

        let in_range = store
            .list_movies(&MovieFilter {
                watched_from: Some("2024-02-01".to_string()),
                watched_to: Some("2024-12-31".to_string()),
                ..MovieFilter::default()
            })
            .await
            .unwrap();
        assert_eq!(in_range.len(), 1);
        assert_eq!(in_range[0].title, "Amores Perros");

        let seen = store
            .list_movies(&MovieFilter::with_status(MovieStatus::Seen))
            .await
            .unwrap();
        assert_eq!(seen.len(), 2);
    }

    #[tokio::test]
    async fn members_are_deduplicated_and_sorted() {
        let store = test_store().await;

        assert!(store.add_member_if_absent("Marco").await.unwrap());
        assert!(!store.add_member_if_absent("Marco").await.unwrap());

        let added = store
            .seed_members(&["Leo".to_string(), "Marco".to_string(), "  ".to_string()])
            .await
            .unwrap();
        assert_eq!(added, 1);

        let names: Vec<_> = store
            .list_members()
            .await
            .unwrap()
            .into_iter()
            .map(|m| m.name)
            .collect();
        assert_eq!(names, vec!["Leo", "Marco"]);
    }
}
