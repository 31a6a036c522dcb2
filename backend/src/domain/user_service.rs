//! User domain service.
//!
//! Thin pass-through to the user repository implementing both user driving
//! ports.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::ports::{UserPersistenceError, UserRepository, UsersCommand, UsersQuery};
use crate::domain::{Error, NewUser, User};

fn map_repository_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            Error::store_unavailable(format!("user store unavailable: {message}"))
        }
        UserPersistenceError::Query { message } => {
            Error::store_unavailable(format!("user store error: {message}"))
        }
    }
}

/// User service implementing [`UsersQuery`] and [`UsersCommand`].
pub struct UserService<R: ?Sized> {
    user_repo: Arc<R>,
}

impl<R: ?Sized> Clone for UserService<R> {
    fn clone(&self) -> Self {
        Self {
            user_repo: Arc::clone(&self.user_repo),
        }
    }
}

impl<R: ?Sized> UserService<R> {
    /// Create a new service backed by the user repository.
    pub fn new(user_repo: Arc<R>) -> Self {
        Self { user_repo }
    }
}

#[async_trait]
impl<R> UsersQuery for UserService<R>
where
    R: UserRepository + ?Sized,
{
    async fn list_users(&self) -> Result<Vec<User>, Error> {
        self.user_repo.list().await.map_err(map_repository_error)
    }
}

#[async_trait]
impl<R> UsersCommand for UserService<R>
where
    R: UserRepository + ?Sized,
{
    async fn create_user(&self, user: NewUser) -> Result<User, Error> {
        self.user_repo
            .insert(&user)
            .await
            .map_err(map_repository_error)
    }
}
