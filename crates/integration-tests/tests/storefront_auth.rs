//! Sign-in, session expiry and the login prompt.

use std::time::Duration;

use secrecy::ExposeSecret;
use shopfront_core::{Credentials, Registration};
use shopfront_integration_tests::{MockBackend, PASSWORD};
use shopfront_storefront::{ApiError, AppEvent};

fn drain(rx: &mut tokio::sync::broadcast::Receiver<AppEvent>) -> Vec<AppEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

#[tokio::test]
async fn test_login_stores_session_and_sends_bearer() {
    let backend = MockBackend::start().await;
    let api = backend.client();
    let mut events = api.events().subscribe();

    let user = api
        .login(&Credentials {
            email: "grace@shop.test".parse().unwrap(),
            password: PASSWORD.to_string(),
        })
        .await
        .unwrap();

    assert_eq!(user.name, "Grace");
    assert!(api.session().is_authenticated().await);
    assert_eq!(api.me().await.unwrap().id, user.id);
    assert_eq!(drain(&mut events), vec![AppEvent::SignedIn(user.id)]);
}

#[tokio::test]
async fn test_bad_credentials_do_not_prompt_login() {
    let backend = MockBackend::start().await;
    let api = backend.client();
    let mut events = api.events().subscribe();

    let err = api
        .login(&Credentials {
            email: "grace@shop.test".parse().unwrap(),
            password: "wrong-password".to_string(),
        })
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::AuthRequired));
    assert!(drain(&mut events).is_empty());
}

#[tokio::test]
async fn test_concurrent_401s_prompt_login_once() {
    let backend = MockBackend::start().await;
    let api = backend.signed_in("grace@shop.test").await;
    let mut events = api.events().subscribe();
    backend.revoke_tokens();

    let (me, cart, orders) = tokio::join!(api.me(), api.get_cart(), api.list_orders());
    assert!(matches!(me, Err(ApiError::AuthRequired)));
    assert!(matches!(cart, Err(ApiError::AuthRequired)));
    assert!(matches!(orders, Err(ApiError::AuthRequired)));
    assert!(api.session().current_user().await.is_none());
    assert!(api.session().token().await.is_none());

    // Further 401s stay quiet until the next sign-in
    assert!(api.profile().await.is_err());
    assert_eq!(drain(&mut events), vec![AppEvent::LoginRequired]);

    let user = api
        .login(&Credentials {
            email: "grace@shop.test".parse().unwrap(),
            password: PASSWORD.to_string(),
        })
        .await
        .unwrap();
    backend.revoke_tokens();
    assert!(api.me().await.is_err());
    assert_eq!(
        drain(&mut events),
        vec![AppEvent::SignedIn(user.id), AppEvent::LoginRequired]
    );
}

#[tokio::test]
async fn test_late_401_for_replaced_token_keeps_new_login() {
    let backend = MockBackend::start().await;
    let api = backend.signed_in("grace@shop.test").await;
    let old_token = api.session().token().await.unwrap();
    backend.revoke_tokens();
    backend.state().unauthorized_delay = Some(Duration::from_millis(300));
    let mut events = api.events().subscribe();

    let relogin = async {
        while backend.requests_to("GET", "/me").is_empty() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        api.login(&Credentials {
            email: "grace@shop.test".parse().unwrap(),
            password: PASSWORD.to_string(),
        })
        .await
        .unwrap()
    };
    let (stale, user) = tokio::join!(api.me(), relogin);

    assert!(matches!(stale, Err(ApiError::AuthRequired)));
    assert!(api.session().is_authenticated().await);
    let token = api.session().token().await.unwrap();
    assert_ne!(token.expose_secret(), old_token.expose_secret());
    assert_eq!(drain(&mut events), vec![AppEvent::SignedIn(user.id)]);

    // The new token still works and a real expiry prompts again
    backend.state().unauthorized_delay = None;
    assert_eq!(api.me().await.unwrap().id, user.id);
    backend.revoke_tokens();
    assert!(api.me().await.is_err());
    assert!(!api.session().is_authenticated().await);
    assert_eq!(drain(&mut events), vec![AppEvent::LoginRequired]);
}

#[tokio::test]
async fn test_register_reports_field_messages() {
    let backend = MockBackend::start().await;
    let api = backend.client();

    let err = api
        .register(&Registration {
            name: "Grace Again".to_string(),
            email: "grace@shop.test".parse().unwrap(),
            password: PASSWORD.to_string(),
            password_confirmation: PASSWORD.to_string(),
        })
        .await
        .unwrap_err();
    assert_eq!(err.tag(), "validation-error");
    assert!(err.to_string().contains("The email has already been taken."));

    let user = api
        .register(&Registration {
            name: "Linus".to_string(),
            email: "linus@shop.test".parse().unwrap(),
            password: PASSWORD.to_string(),
            password_confirmation: PASSWORD.to_string(),
        })
        .await
        .unwrap();
    assert_eq!(api.session().current_user().await.unwrap().id, user.id);
}

#[tokio::test]
async fn test_register_validates_before_sending() {
    let backend = MockBackend::start().await;
    let api = backend.client();

    let err = api
        .register(&Registration {
            name: "Linus".to_string(),
            email: "linus@shop.test".parse().unwrap(),
            password: PASSWORD.to_string(),
            password_confirmation: "different".to_string(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::InvalidInput(_)));
    assert!(backend.requests_to("POST", "/register").is_empty());
}

#[tokio::test]
async fn test_logout_clears_session_even_when_request_fails() {
    let backend = MockBackend::start().await;
    let api = backend.signed_in("grace@shop.test").await;
    backend.revoke_tokens();

    assert!(api.logout().await.is_err());
    assert!(!api.session().is_authenticated().await);
}

#[tokio::test]
async fn test_bootstrap_refreshes_or_forgets_user() {
    let backend = MockBackend::start().await;
    let api = backend.signed_in("grace@shop.test").await;
    assert_eq!(api.bootstrap().await.unwrap().unwrap().name, "Grace");

    backend.revoke_tokens();
    assert!(api.bootstrap().await.unwrap().is_none());
    assert!(api.bootstrap().await.unwrap().is_none());
}

#[tokio::test]
async fn test_profile_update_refreshes_stored_user() {
    let backend = MockBackend::start().await;
    let api = backend.signed_in("grace@shop.test").await;

    let updated = api
        .update_profile(&shopfront_core::ProfileUpdate {
            city: Some("Lagos".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(updated.city.as_deref(), Some("Lagos"));
    let stored = api.session().current_user().await.unwrap();
    assert_eq!(stored.city.as_deref(), Some("Lagos"));
}
