//! The signed-in user's own account.
//!
//! - `GET /profile`
//! - `PUT /profile`

use tracing::instrument;

use shopfront_core::{ProfileUpdate, User};

use crate::api::ApiClient;
use crate::error::{ApiError, Result};

impl ApiClient {
    /// The current user's profile.
    ///
    /// # Errors
    ///
    /// `ApiError::AuthRequired` when signed out.
    #[instrument(skip(self))]
    pub async fn profile(&self) -> Result<User> {
        self.get("/profile").await
    }

    /// Save profile changes and refresh the stored user.
    ///
    /// # Errors
    ///
    /// `ApiError::InvalidInput` when nothing would change, otherwise any
    /// error from the backend.
    #[instrument(skip(self, update))]
    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<User> {
        if update.is_empty() {
            return Err(ApiError::InvalidInput("no profile changes".to_string()));
        }
        let user: User = self.put("/profile", update).await?;
        self.session().update_user(user.clone()).await?;
        tracing::info!(user_id = %user.id, "Profile updated");
        Ok(user)
    }
}
