//! Sign-in, sign-out and the user's own profile.

use shopfront_core::{Credentials, Email, ProfileUpdate, Registration};
use shopfront_storefront::ApiClient;

use super::CommandResult;
use crate::output;

pub async fn login(api: &ApiClient, email: Email, password: String) -> CommandResult {
    let user = api.login(&Credentials { email, password }).await?;
    output::message(&format!("Signed in as {} ({})", user.name, user.role));
    Ok(())
}

pub async fn register(
    api: &ApiClient,
    name: String,
    email: Email,
    password: String,
    password_confirmation: Option<String>,
) -> CommandResult {
    let password_confirmation = password_confirmation.unwrap_or_else(|| password.clone());
    let user = api
        .register(&Registration {
            name,
            email,
            password,
            password_confirmation,
        })
        .await?;
    output::message(&format!("Welcome, {}! You are now signed in.", user.name));
    Ok(())
}

pub async fn logout(api: &ApiClient) -> CommandResult {
    let outcome = api.logout().await;
    output::message("Signed out.");
    outcome?;
    Ok(())
}

pub async fn whoami(api: &ApiClient) -> CommandResult {
    match api.bootstrap().await? {
        Some(user) => output::user(&user),
        None => output::message("Not signed in."),
    }
    Ok(())
}

pub async fn profile_show(api: &ApiClient) -> CommandResult {
    shopfront_storefront::require_user(api.session()).await?;
    output::user(&api.profile().await?);
    Ok(())
}

pub async fn profile_update(api: &ApiClient, update: ProfileUpdate) -> CommandResult {
    shopfront_storefront::require_user(api.session()).await?;
    let user = api.update_profile(&update).await?;
    output::message("Profile saved.");
    output::user(&user);
    Ok(())
}
