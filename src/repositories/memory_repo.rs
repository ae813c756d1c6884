use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use crate::models::user::UserRecord;
use crate::repositories::{RepoError, UserRepository};

/// In-memory store used by the test harness in place of the real backend.
#[derive(Clone, Default)]
pub struct MemoryRepository {
    records: Arc<RwLock<HashMap<String, UserRecord>>>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for MemoryRepository {
    async fn get(&self, username: &str) -> Result<Option<UserRecord>, RepoError> {
        let records = self
            .records
            .read()
            .map_err(|_| RepoError::Backend("store lock poisoned".to_string()))?;
        Ok(records.get(username).cloned())
    }

    async fn put(&self, record: &UserRecord) -> Result<(), RepoError> {
        let mut records = self
            .records
            .write()
            .map_err(|_| RepoError::Backend("store lock poisoned".to_string()))?;
        records.insert(record.username.clone(), record.clone());
        Ok(())
    }
}
