use async_trait::async_trait;

use crate::models::user::UserRecord;

pub mod memory_repo;
pub mod user_kv_repo;

pub use user_kv_repo::RepoError;

/// Storage contract for the birthdays table: one record per username,
/// read-one and write-one. Writes replace whatever was there.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn get(&self, username: &str) -> Result<Option<UserRecord>, RepoError>;
    async fn put(&self, record: &UserRecord) -> Result<(), RepoError>;
}
