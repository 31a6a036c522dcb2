//! Driving port for user mutations.

use async_trait::async_trait;

use crate::domain::{Error, NewUser, User};

/// Domain use-case port for registering users.
#[async_trait]
pub trait UsersCommand: Send + Sync {
    /// Persist a new user and return it with its assigned identifier.
    async fn create_user(&self, user: NewUser) -> Result<User, Error>;
}
