//! Authentication endpoints and screen guards.
//!
//! - `POST /login`, `POST /register` → `{ user, token }`
//! - `POST /logout`
//! - `GET /me`
//!
//! Guards decide from the stored session alone whether a screen may open;
//! only [`ApiClient::bootstrap`] asks the server whether the token is still
//! good.

use secrecy::SecretString;
use serde::Deserialize;
use tracing::instrument;

use shopfront_core::{Credentials, Registration, User};

use crate::api::ApiClient;
use crate::error::{ApiError, Result};
use crate::events::AppEvent;
use crate::session::SessionStore;

/// Login/registration response.
#[derive(Deserialize)]
struct AuthResponse {
    user: User,
    #[serde(alias = "access_token")]
    token: String,
}

impl ApiClient {
    /// Sign in and store the session.
    ///
    /// # Errors
    ///
    /// `ApiError::AuthRequired` or `ApiError::Validation` for bad
    /// credentials, or any transport error.
    #[instrument(skip(self, credentials), fields(email = %credentials.email))]
    pub async fn login(&self, credentials: &Credentials) -> Result<User> {
        let response: AuthResponse = self.post_credentials("/login", credentials).await?;
        self.signed_in(response.user.clone(), SecretString::from(response.token))
            .await?;
        tracing::info!(user_id = %response.user.id, "Signed in");
        Ok(response.user)
    }

    /// Create an account and sign in with it.
    ///
    /// # Errors
    ///
    /// `ApiError::InvalidInput` if the form is incomplete, otherwise any
    /// error from the backend.
    #[instrument(skip(self, registration), fields(email = %registration.email))]
    pub async fn register(&self, registration: &Registration) -> Result<User> {
        registration.validate().map_err(ApiError::InvalidInput)?;
        let response: AuthResponse = self.post_credentials("/register", registration).await?;
        self.signed_in(response.user.clone(), SecretString::from(response.token))
            .await?;
        tracing::info!(user_id = %response.user.id, "Registered");
        Ok(response.user)
    }

    /// Sign out.
    ///
    /// The local session is always cleared, even when the request fails; the
    /// request error (if any) is returned afterwards.
    ///
    /// # Errors
    ///
    /// Returns the logout request's error, or a session error.
    #[instrument(skip(self))]
    pub async fn logout(&self) -> Result<()> {
        let outcome = if self.session().token().await.is_some() {
            self.post_empty("/logout").await
        } else {
            Ok(())
        };
        if let Err(e) = &outcome {
            tracing::warn!(error = %e, "Logout request failed; clearing local session anyway");
        }

        self.session().clear().await?;
        self.events().emit(AppEvent::SignedOut);
        outcome
    }

    /// The user the current token belongs to.
    ///
    /// # Errors
    ///
    /// `ApiError::AuthRequired` if the token is missing or expired.
    #[instrument(skip(self))]
    pub async fn me(&self) -> Result<User> {
        self.get("/me").await
    }

    /// Start-up check: confirm a stored token with `/me` and refresh the
    /// stored user. Returns `None` when signed out or the token was rejected.
    ///
    /// # Errors
    ///
    /// Errors other than 401 (e.g. the backend is down) are returned; the
    /// stored session is left untouched in that case.
    #[instrument(skip(self))]
    pub async fn bootstrap(&self) -> Result<Option<User>> {
        if self.session().token().await.is_none() {
            return Ok(None);
        }
        match self.me().await {
            Ok(user) => {
                self.session().update_user(user.clone()).await?;
                Ok(Some(user))
            }
            Err(ApiError::AuthRequired) => Ok(None),
            Err(e) => Err(e),
        }
    }
}

/// Allow a screen only when a user and token are stored.
///
/// # Errors
///
/// `ApiError::AuthRequired` when signed out.
pub async fn require_user(session: &SessionStore) -> Result<User> {
    if !session.is_authenticated().await {
        return Err(ApiError::AuthRequired);
    }
    session.current_user().await.ok_or(ApiError::AuthRequired)
}

/// Allow an admin screen only for a stored admin user.
///
/// # Errors
///
/// `ApiError::AuthRequired` when signed out, `ApiError::Forbidden` for
/// non-admins.
pub async fn require_admin(session: &SessionStore) -> Result<User> {
    let user = require_user(session).await?;
    if user.is_admin() {
        Ok(user)
    } else {
        Err(ApiError::Forbidden("admin access required".to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use shopfront_core::{Role, UserId};

    use super::*;

    fn user(role: Role) -> User {
        User {
            id: UserId::new(9),
            name: "Grace".to_string(),
            email: "grace@shop.test".to_string(),
            role,
            phone: None,
            address: None,
            city: None,
        }
    }

    #[tokio::test]
    async fn test_guards() {
        let session = SessionStore::in_memory();
        assert!(matches!(
            require_user(&session).await,
            Err(ApiError::AuthRequired)
        ));

        session
            .sign_in(user(Role::User), SecretString::from("t"))
            .await
            .unwrap();
        assert_eq!(require_user(&session).await.unwrap().id, UserId::new(9));
        assert!(matches!(
            require_admin(&session).await,
            Err(ApiError::Forbidden(_))
        ));

        session.update_user(user(Role::Admin)).await.unwrap();
        assert!(require_admin(&session).await.is_ok());
    }

    #[test]
    fn test_auth_response_accepts_access_token() {
        let parsed: AuthResponse = serde_json::from_str(
            r#"{"user":{"id":1,"name":"A","email":"a@b.c","role":"admin"},"access_token":"xyz"}"#,
        )
        .unwrap();
        assert_eq!(parsed.token, "xyz");
        assert!(parsed.user.is_admin());
    }
}
