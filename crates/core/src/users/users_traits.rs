use async_trait::async_trait;

use super::users_model::{NewUser, User};
use crate::errors::Result;

/// Trait defining the contract for user persistence.
#[async_trait]
pub trait UserRepositoryTrait: Send + Sync {
    fn find_by_username(&self, username: &str) -> Result<Option<User>>;
    async fn insert_user(&self, new_user: NewUser) -> Result<User>;
}

/// Trait defining the contract for user operations.
#[async_trait]
pub trait UserServiceTrait: Send + Sync {
    /// Creates a user. The password must already be hashed.
    async fn register(&self, username: &str, password_hash: String) -> Result<User>;
    fn find_by_username(&self, username: &str) -> Result<Option<User>>;
}
