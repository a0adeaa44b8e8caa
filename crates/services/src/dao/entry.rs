use bson::{DateTime, doc, oid::ObjectId};
use mongodb::Database;
use registrovivo_db::models::DiaryEntry;

use super::base::{BaseDao, DaoError, DaoResult};

pub struct EntryDao {
    pub base: BaseDao<DiaryEntry>,
}

impl EntryDao {
    pub fn new(db: &Database) -> Self {
        Self {
            base: BaseDao::new(db, DiaryEntry::COLLECTION),
        }
    }

    pub async fn create(
        &self,
        user_id: ObjectId,
        title: String,
        content: String,
    ) -> DaoResult<DiaryEntry> {
        let now = DateTime::now();
        let entry = DiaryEntry {
            id: None,
            user_id,
            title,
            content,
            created_at: now,
            updated_at: now,
        };

        let id = self.base.insert_one(&entry).await?;
        self.base.find_by_id(id).await
    }

    /// All entries for a user, newest first.
    pub async fn find_by_user(&self, user_id: ObjectId) -> DaoResult<Vec<DiaryEntry>> {
        self.base
            .find_many(
                doc! { "user_id": user_id },
                Some(doc! { "created_at": -1 }),
            )
            .await
    }

    /// A single entry, scoped to its owner.
    pub async fn find_for_user(
        &self,
        entry_id: ObjectId,
        user_id: ObjectId,
    ) -> DaoResult<DiaryEntry> {
        self.base
            .find_one(doc! { "_id": entry_id, "user_id": user_id })
            .await?
            .ok_or(DaoError::NotFound)
    }

    /// Deletes an entry if it belongs to the user. `false` means no match.
    pub async fn delete_for_user(
        &self,
        entry_id: ObjectId,
        user_id: ObjectId,
    ) -> DaoResult<bool> {
        self.base
            .delete_one(doc! { "_id": entry_id, "user_id": user_id })
            .await
    }
}
