use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use tracing::info;

use crate::entities::family_members;
use crate::models::member::FamilyMember;

impl From<family_members::Model> for FamilyMember {
    fn from(model: family_members::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
        }
    }
}

pub struct MemberRepository {
    conn: DatabaseConnection,
}

impl MemberRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn list(&self) -> Result<Vec<FamilyMember>> {
        let rows = family_members::Entity::find()
            .order_by_asc(family_members::Column::Name)
            .all(&self.conn)
            .await
            .context("Failed to list family members")?;

        Ok(rows.into_iter().map(FamilyMember::from).collect())
    }

    /// Adds a member unless one with the same name exists. Returns whether a row was added.
    pub async fn add_if_absent(&self, name: &str) -> Result<bool> {
        let txn = self.conn.begin().await?;

        let exists = family_members::Entity::find()
            .filter(family_members::Column::Name.eq(name))
            .one(&txn)
            .await
            .context("Failed to query family member")?
            .is_some();

        if exists {
            txn.rollback().await?;
            return Ok(false);
        }

        family_members::ActiveModel {
            name: Set(name.to_string()),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .context("Failed to insert family member")?;

        txn.commit().await?;

        info!("Added family member: {}", name);
        Ok(true)
    }
}
