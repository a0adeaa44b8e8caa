use std::sync::Arc;

use mongodb::Database;
use registrovivo_services::dao::{entry::EntryDao, user::UserDao};

#[derive(Clone)]
pub struct AppState {
    pub users: Arc<UserDao>,
    pub entries: Arc<EntryDao>,
}

impl AppState {
    pub fn new(db: &Database) -> Self {
        Self {
            users: Arc::new(UserDao::new(db)),
            entries: Arc::new(EntryDao::new(db)),
        }
    }
}
