use crate::entities::{prelude::*, ratings};
use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::{ConnectionTrait, Schema};

#[derive(DeriveMigrationName)]
pub struct Migration;

const RATINGS_MOVIE_MEMBER_INDEX: &str = "idx_ratings_movie_member";

/// At most one row may carry the weekly status, whatever code path writes it.
const SINGLE_WEEKLY_INDEX_SQL: &str = "CREATE UNIQUE INDEX IF NOT EXISTS idx_movies_single_weekly \
     ON movies (status) WHERE status = 'weekly'";

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let backend = manager.get_database_backend();
        let schema = Schema::new(backend);

        manager
            .create_table(
                schema
                    .create_table_from_entity(Movies)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                schema
                    .create_table_from_entity(Ratings)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                schema
                    .create_table_from_entity(FamilyMembers)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(RATINGS_MOVIE_MEMBER_INDEX)
                    .table(Ratings)
                    .col(ratings::Column::MovieId)
                    .col(ratings::Column::MemberName)
                    .unique()
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .get_connection()
            .execute_unprepared(SINGLE_WEEKLY_INDEX_SQL)
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared("DROP INDEX IF EXISTS idx_movies_single_weekly")
            .await?;
        manager
            .drop_table(Table::drop().table(FamilyMembers).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Ratings).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Movies).to_owned())
            .await?;

        Ok(())
    }
}
