use bson::{Document, oid::ObjectId};
use futures::TryStreamExt;
use mongodb::{Collection, Database};
use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DaoError {
    #[error("not found")]
    NotFound,
    #[error("duplicate key: {0}")]
    DuplicateKey(String),
    #[error("validation: {0}")]
    Validation(String),
    #[error(transparent)]
    Mongo(#[from] mongodb::error::Error),
    #[error(transparent)]
    BsonSer(#[from] bson::ser::Error),
    #[error(transparent)]
    BsonDe(#[from] bson::de::Error),
}

pub type DaoResult<T> = Result<T, DaoError>;

/// Generic typed wrapper over a MongoDB collection.
///
/// Domain DAOs embed a `BaseDao<T>` per collection and add the queries
/// that are specific to their document type.
pub struct BaseDao<T: Send + Sync> {
    coll: Collection<T>,
}

impl<T> BaseDao<T>
where
    T: Serialize + DeserializeOwned + Send + Sync + Unpin,
{
    pub fn new(db: &Database, collection: &str) -> Self {
        Self {
            coll: db.collection::<T>(collection),
        }
    }

    pub fn collection(&self) -> &Collection<T> {
        &self.coll
    }

    pub async fn insert_one(&self, doc: &T) -> DaoResult<ObjectId> {
        let result = self.coll.insert_one(doc).await.map_err(map_write_error)?;
        result
            .inserted_id
            .as_object_id()
            .ok_or_else(|| DaoError::Validation("inserted _id is not an ObjectId".to_string()))
    }

    pub async fn find_by_id(&self, id: ObjectId) -> DaoResult<T> {
        self.find_one(bson::doc! { "_id": id })
            .await?
            .ok_or(DaoError::NotFound)
    }

    pub async fn find_one(&self, filter: Document) -> DaoResult<Option<T>> {
        Ok(self.coll.find_one(filter).await?)
    }

    pub async fn find_many(&self, filter: Document, sort: Option<Document>) -> DaoResult<Vec<T>> {
        let mut find = self.coll.find(filter);
        if let Some(sort) = sort {
            find = find.sort(sort);
        }
        let cursor = find.await?;
        Ok(cursor.try_collect().await?)
    }

    /// Returns `true` when a document matched the filter.
    pub async fn update_one(&self, filter: Document, update: Document) -> DaoResult<bool> {
        let result = self.coll.update_one(filter, update).await?;
        Ok(result.matched_count > 0)
    }

    /// Returns `true` when a document was deleted.
    pub async fn delete_one(&self, filter: Document) -> DaoResult<bool> {
        let result = self.coll.delete_one(filter).await?;
        Ok(result.deleted_count > 0)
    }
}

/// Surfaces the E11000 duplicate-key write error as `DaoError::DuplicateKey`
/// so callers can turn unique-index collisions into conflict responses.
fn map_write_error(err: mongodb::error::Error) -> DaoError {
    use mongodb::error::{ErrorKind, WriteFailure};

    if let ErrorKind::Write(WriteFailure::WriteError(write_error)) = &*err.kind
        && write_error.code == 11000
    {
        return DaoError::DuplicateKey(write_error.message.clone());
    }
    DaoError::Mongo(err)
}
