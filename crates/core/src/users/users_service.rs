use async_trait::async_trait;
use log::info;
use std::sync::Arc;

use super::users_model::{NewUser, User};
use super::users_traits::{UserRepositoryTrait, UserServiceTrait};
use crate::constants::MAX_USERNAME_LEN;
use crate::errors::{DatabaseError, Error, Result, ValidationError};

const USERNAME_TAKEN: &str = "Username already registered";

pub struct UserService {
    repository: Arc<dyn UserRepositoryTrait>,
}

impl UserService {
    pub fn new(repository: Arc<dyn UserRepositoryTrait>) -> Self {
        Self { repository }
    }

    fn normalize_username(username: &str) -> Result<String> {
        let username = username.trim();
        if username.is_empty() {
            return Err(ValidationError::MissingField("username".to_string()).into());
        }
        if username.chars().count() > MAX_USERNAME_LEN {
            return Err(ValidationError::TooLong {
                field: "username".to_string(),
                max: MAX_USERNAME_LEN,
            }
            .into());
        }
        Ok(username.to_string())
    }
}

#[async_trait]
impl UserServiceTrait for UserService {
    async fn register(&self, username: &str, password_hash: String) -> Result<User> {
        let username = Self::normalize_username(username)?;
        if self.repository.find_by_username(&username)?.is_some() {
            return Err(Error::ConstraintViolation(USERNAME_TAKEN.to_string()));
        }

        let user = self
            .repository
            .insert_user(NewUser {
                username,
                password_hash,
            })
            .await
            .map_err(|e| match e {
                // Lost a race with a concurrent signup.
                Error::Database(DatabaseError::UniqueViolation(_)) => {
                    Error::ConstraintViolation(USERNAME_TAKEN.to_string())
                }
                other => other,
            })?;

        info!("Registered user {} (id {})", user.username, user.id);
        Ok(user)
    }

    fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        self.repository.find_by_username(username.trim())
    }
}
