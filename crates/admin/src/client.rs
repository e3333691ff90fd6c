//! Admin entry point.

use shopfront_core::User;
use shopfront_storefront::{ApiClient, Result, require_admin};

/// Admin-only operations over a signed-in [`ApiClient`].
///
/// Can only be built for a stored admin session, so every screen reached
/// through it has passed the admin guard. The backend still authorises each
/// request; a 401 goes through the client's normal expiry handling.
#[derive(Debug, Clone)]
pub struct AdminClient {
    api: ApiClient,
    admin: User,
}

impl AdminClient {
    /// Wrap `api` if its session belongs to an admin.
    ///
    /// # Errors
    ///
    /// `ApiError::AuthRequired` when signed out, `ApiError::Forbidden` for a
    /// non-admin user.
    pub async fn connect(api: ApiClient) -> Result<Self> {
        let admin = require_admin(api.session()).await?;
        tracing::debug!(user_id = %admin.id, "Admin session");
        Ok(Self { api, admin })
    }

    /// The underlying storefront client.
    #[must_use]
    pub const fn api(&self) -> &ApiClient {
        &self.api
    }

    /// The admin this client was opened for.
    #[must_use]
    pub const fn admin(&self) -> &User {
        &self.admin
    }
}
