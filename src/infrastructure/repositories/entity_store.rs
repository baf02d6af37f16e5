//! SeaORM implementation of EntityStore

use async_trait::async_trait;
use sea_orm::sea_query::OnConflict;
use sea_orm::{DatabaseConnection, EntityTrait, Set};
use serde_json::Value;

use crate::domain::{Collection, DomainResult, EntityStore};
use crate::models::entity_collection::{ActiveModel, Column, Entity as CollectionEntity};

/// SeaORM-based implementation of EntityStore
pub struct SeaOrmEntityStore {
    db: DatabaseConnection,
}

impl SeaOrmEntityStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl EntityStore for SeaOrmEntityStore {
    async fn get(&self, collection: Collection) -> DomainResult<Vec<Value>> {
        let row = CollectionEntity::find_by_id(collection.key().to_string())
            .one(&self.db)
            .await?;

        match row {
            Some(row) => Ok(serde_json::from_str(&row.payload)?),
            None => Ok(Vec::new()),
        }
    }

    async fn put(&self, collection: Collection, records: Vec<Value>) -> DomainResult<()> {
        let payload = serde_json::to_string(&records)?;

        let row = ActiveModel {
            name: Set(collection.key().to_string()),
            payload: Set(payload),
            updated_at: Set(chrono::Utc::now().to_rfc3339()),
        };

        CollectionEntity::insert(row)
            .on_conflict(
                OnConflict::column(Column::Name)
                    .update_columns([Column::Payload, Column::UpdatedAt])
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await?;

        tracing::debug!("Stored {} {} records", records.len(), collection);
        Ok(())
    }
}
