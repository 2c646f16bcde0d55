pub mod contact;
pub mod education;
pub mod experience;
pub mod memory;
pub mod mongo;
pub mod project;
pub mod skill;
pub mod user;

pub use contact::ContactRepository;
pub use education::EducationRepository;
pub use experience::ExperienceRepository;
pub use memory::InMemoryStore;
pub use mongo::MongoStore;
pub use project::ProjectRepository;
pub use skill::SkillRepository;
pub use user::UserRepository;

use std::sync::Arc;

use async_trait::async_trait;
use bson::{doc, oid::ObjectId, Document};
use serde::{de::DeserializeOwned, Serialize};

use crate::error::{AppError, AppResult};

/// A document persisted in its own collection
pub trait Entity: Serialize + DeserializeOwned + Clone + Send + Sync + Unpin + 'static {
    /// Collection name
    const COLLECTION: &'static str;

    /// Message returned when a lookup by id misses
    const NOT_FOUND: &'static str;

    /// Fields carrying a unique index
    const UNIQUE_KEYS: &'static [&'static str] = &[];

    fn id(&self) -> ObjectId;

    /// Sort applied by `Repository::list`
    fn default_sort() -> Document;

    /// Refresh `updatedAt` before a save
    fn touch(&mut self);
}

/// Storage backend for one collection
#[async_trait]
pub trait DocumentStore<T: Entity>: Send + Sync {
    /// Create the unique indexes declared by the entity
    async fn ensure_indexes(&self) -> AppResult<()>;

    async fn insert(&self, entity: &T) -> AppResult<()>;

    /// First document matching an equality filter
    async fn find_one(&self, filter: Document) -> AppResult<Option<T>>;

    /// All documents matching an equality filter, ordered by `sort`
    async fn find(&self, filter: Document, sort: Document) -> AppResult<Vec<T>>;

    /// Replace the stored document with the same `_id`; false when it no longer exists
    async fn replace(&self, entity: &T) -> AppResult<bool>;

    /// Remove and return the first document matching the filter
    async fn delete_one(&self, filter: Document) -> AppResult<Option<T>>;
}

/// Typed access to one collection, shared by all handlers through `AppState`
pub struct Repository<T: Entity> {
    store: Arc<dyn DocumentStore<T>>,
}

impl<T: Entity> Clone for Repository<T> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<T: Entity> Repository<T> {
    pub fn new(store: Arc<dyn DocumentStore<T>>) -> Self {
        Self { store }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        self.store.ensure_indexes().await
    }

    /// Find entity by ID
    pub async fn find_by_id(&self, id: ObjectId) -> AppResult<T> {
        self.store
            .find_one(doc! { "_id": id })
            .await?
            .ok_or_else(|| AppError::NotFound(T::NOT_FOUND.to_string()))
    }

    pub async fn find_one(&self, filter: Document) -> AppResult<Option<T>> {
        self.store.find_one(filter).await
    }

    pub async fn exists(&self, filter: Document) -> AppResult<bool> {
        Ok(self.store.find_one(filter).await?.is_some())
    }

    /// List entities in the collection's default order
    pub async fn list(&self) -> AppResult<Vec<T>> {
        self.store.find(doc! {}, T::default_sort()).await
    }

    pub async fn insert(&self, entity: T) -> AppResult<T> {
        self.store.insert(&entity).await?;
        Ok(entity)
    }

    /// Persist changes made to a previously loaded entity
    pub async fn save(&self, mut entity: T) -> AppResult<T> {
        entity.touch();

        if !self.store.replace(&entity).await? {
            return Err(AppError::NotFound(T::NOT_FOUND.to_string()));
        }

        Ok(entity)
    }

    /// Delete entity by ID, returning what was removed
    pub async fn delete(&self, id: ObjectId) -> AppResult<T> {
        self.store
            .delete_one(doc! { "_id": id })
            .await?
            .ok_or_else(|| AppError::NotFound(T::NOT_FOUND.to_string()))
    }
}
