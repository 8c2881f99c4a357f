use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "movies")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// TMDB id. Manually entered movies have none.
    #[sea_orm(unique)]
    pub tmdb_id: Option<i32>,

    pub title: String,

    /// `YYYY-MM-DD`, or empty when unknown.
    pub date_watched: String,

    pub status: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
