//! User management.
//!
//! Passwords are write-only: a `None` password is left out of the request,
//! which keeps the current one on update.

use tracing::instrument;

use shopfront_core::{User, UserId, UserInput};
use shopfront_storefront::{ApiError, Result};

use crate::client::AdminClient;

impl AdminClient {
    /// # Errors
    ///
    /// Any [`ApiError`].
    #[instrument(skip(self))]
    pub async fn list_users(&self) -> Result<Vec<User>> {
        self.api().get_list("/users", &[]).await
    }

    /// # Errors
    ///
    /// `ApiError::NotFound` for an unknown id.
    #[instrument(skip(self), fields(user_id = %id))]
    pub async fn user(&self, id: UserId) -> Result<User> {
        self.api().get(&format!("/users/{id}")).await
    }

    /// # Errors
    ///
    /// `ApiError::InvalidInput` when the name or password is missing,
    /// otherwise any error from the backend.
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn create_user(&self, input: &UserInput) -> Result<User> {
        input.validate(true).map_err(ApiError::InvalidInput)?;
        let user: User = self.api().post("/users", input).await?;
        tracing::info!(user_id = %user.id, role = %user.role, "User created");
        Ok(user)
    }

    /// # Errors
    ///
    /// `ApiError::InvalidInput` when the name is missing, otherwise any
    /// error from the backend.
    #[instrument(skip(self, input), fields(user_id = %id))]
    pub async fn update_user(&self, id: UserId, input: &UserInput) -> Result<User> {
        input.validate(false).map_err(ApiError::InvalidInput)?;
        self.api().put(&format!("/users/{id}"), input).await
    }

    /// # Errors
    ///
    /// `ApiError::InvalidInput` when deleting the signed-in admin, otherwise
    /// any [`ApiError`], including `NotFound` when already gone.
    #[instrument(skip(self), fields(user_id = %id))]
    pub async fn delete_user(&self, id: UserId) -> Result<()> {
        if id == self.admin().id {
            return Err(ApiError::InvalidInput(
                "cannot delete the signed-in admin".to_string(),
            ));
        }
        self.api().delete(&format!("/users/{id}")).await
    }
}
