use async_trait::async_trait;
use bson::{doc, Document};
use futures::TryStreamExt;
use mongodb::{options::IndexOptions, Collection, Database, IndexModel};

use crate::error::AppResult;
use crate::repositories::{DocumentStore, Entity};

/// MongoDB-backed document store
pub struct MongoStore<T: Entity> {
    collection: Collection<T>,
}

impl<T: Entity> MongoStore<T> {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection::<T>(T::COLLECTION),
        }
    }
}

#[async_trait]
impl<T: Entity> DocumentStore<T> for MongoStore<T> {
    async fn ensure_indexes(&self) -> AppResult<()> {
        for key in T::UNIQUE_KEYS {
            let mut keys = Document::new();
            keys.insert(*key, 1);

            let index = IndexModel::builder()
                .keys(keys)
                .options(IndexOptions::builder().unique(true).build())
                .build();

            self.collection.create_index(index).await?;
            tracing::debug!("Ensured unique index {}.{}", T::COLLECTION, key);
        }

        Ok(())
    }

    async fn insert(&self, entity: &T) -> AppResult<()> {
        self.collection.insert_one(entity).await?;
        Ok(())
    }

    async fn find_one(&self, filter: Document) -> AppResult<Option<T>> {
        Ok(self.collection.find_one(filter).await?)
    }

    async fn find(&self, filter: Document, sort: Document) -> AppResult<Vec<T>> {
        let cursor = self.collection.find(filter).sort(sort).await?;
        Ok(cursor.try_collect().await?)
    }

    async fn replace(&self, entity: &T) -> AppResult<bool> {
        let result = self
            .collection
            .replace_one(doc! { "_id": entity.id() }, entity)
            .await?;

        Ok(result.matched_count > 0)
    }

    async fn delete_one(&self, filter: Document) -> AppResult<Option<T>> {
        Ok(self.collection.find_one_and_delete(filter).await?)
    }
}
