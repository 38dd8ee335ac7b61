/// Lifecycle tests for the session service: signup, signin, refresh, the
/// refresh credential cap, and forced revocation.
use chrono::Duration;

use crate::error::AuthError;
use crate::store::AuthStore;
use crate::tests::fixtures::*;

#[tokio::test]
async fn signup_then_signin_succeeds() {
    let (_store, service) = test_service();

    let session = signed_up(&service).await;
    assert_eq!(session.user.email, TEST_EMAIL);
    assert!(session.user.is_active);
    assert!(!session.user.email_verified);
    assert!(session.user.last_login_at.is_some());

    let again = service.signin(TEST_EMAIL, TEST_PASSWORD).await.unwrap();
    assert_eq!(again.user.id, session.user.id);
}

#[tokio::test]
async fn duplicate_signup_is_rejected() {
    let (_store, service) = test_service();
    signed_up(&service).await;

    let err = service
        .signup("Someone Else", TEST_EMAIL, "a-different-password")
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::DuplicateEmail));
}

#[tokio::test]
async fn emails_are_case_insensitive() {
    let (_store, service) = test_service();
    service
        .signup(TEST_NAME, "  Mixed.Case@Example.COM  ", TEST_PASSWORD)
        .await
        .unwrap();

    // Same address in another case collides...
    let err = service
        .signup(TEST_NAME, "mixed.case@example.com", TEST_PASSWORD)
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::DuplicateEmail));

    // ...and signs in fine.
    assert!(service
        .signin("MIXED.CASE@EXAMPLE.COM", TEST_PASSWORD)
        .await
        .is_ok());
}

#[tokio::test]
async fn unknown_email_and_wrong_password_are_indistinguishable() {
    let (_store, service) = test_service();
    signed_up(&service).await;

    let unknown = service
        .signin("nobody@example.com", TEST_PASSWORD)
        .await
        .unwrap_err();
    let wrong = service.signin(TEST_EMAIL, "wrong-password").await.unwrap_err();

    assert!(matches!(unknown, AuthError::InvalidCredentials));
    assert!(matches!(wrong, AuthError::InvalidCredentials));
}

#[tokio::test]
async fn refresh_yields_a_valid_access_token_for_the_same_identity() {
    let (_store, service) = test_service();
    let session = signed_up(&service).await;

    let refreshed = service
        .refresh(&session.tokens.refresh_token)
        .await
        .unwrap();

    let identity = service.authenticate(&refreshed.access_token).await.unwrap();
    assert_eq!(identity.id, session.user.id);
    assert_eq!(identity.role, session.user.role);
}

#[tokio::test]
async fn refresh_token_is_not_rotated_on_use() {
    let (_store, service) = test_service();
    let session = signed_up(&service).await;

    service.refresh(&session.tokens.refresh_token).await.unwrap();
    // The same refresh token keeps working until revoked or expired.
    assert!(service.refresh(&session.tokens.refresh_token).await.is_ok());
}

#[tokio::test]
async fn sixth_signin_evicts_the_oldest_credential() {
    let (store, service) = test_service();
    let first = signed_up(&service).await;
    // Start from a clean slate so the six signins below are the whole story.
    service.signout_all(first.user.id).await.unwrap();

    let mut refresh_tokens = Vec::new();
    for _ in 0..6 {
        let session = service.signin(TEST_EMAIL, TEST_PASSWORD).await.unwrap();
        refresh_tokens.push(session.tokens.refresh_token);
    }

    assert_eq!(store.count_refresh_tokens(first.user.id).await.unwrap(), 5);

    // Device 1 was evicted; devices 2-6 still refresh.
    let err = service.refresh(&refresh_tokens[0]).await.unwrap_err();
    assert!(matches!(err, AuthError::InvalidRefreshToken));
    for token in &refresh_tokens[1..] {
        assert!(service.refresh(token).await.is_ok());
    }
}

#[tokio::test]
async fn signout_revokes_only_the_presented_credential() {
    let (_store, service) = test_service();
    let first = signed_up(&service).await;
    let second = service.signin(TEST_EMAIL, TEST_PASSWORD).await.unwrap();

    service
        .signout(first.user.id, Some(&first.tokens.refresh_token))
        .await
        .unwrap();

    let err = service
        .refresh(&first.tokens.refresh_token)
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::InvalidRefreshToken));
    assert!(service.refresh(&second.tokens.refresh_token).await.is_ok());
}

#[tokio::test]
async fn signout_all_revokes_every_credential() {
    let (store, service) = test_service();
    let first = signed_up(&service).await;
    let second = service.signin(TEST_EMAIL, TEST_PASSWORD).await.unwrap();

    service.signout_all(first.user.id).await.unwrap();

    assert_eq!(store.count_refresh_tokens(first.user.id).await.unwrap(), 0);
    assert!(service.refresh(&first.tokens.refresh_token).await.is_err());
    assert!(service.refresh(&second.tokens.refresh_token).await.is_err());
}

#[tokio::test]
async fn signout_is_idempotent() {
    let (_store, service) = test_service();
    let session = signed_up(&service).await;

    service
        .signout(session.user.id, Some("never-issued-token"))
        .await
        .unwrap();
    service
        .signout(session.user.id, Some(&session.tokens.refresh_token))
        .await
        .unwrap();
    // Deleting it again is still fine.
    service
        .signout(session.user.id, Some(&session.tokens.refresh_token))
        .await
        .unwrap();
}

#[tokio::test]
async fn change_password_revokes_refresh_but_not_access() {
    let (_store, service) = test_service();
    let session = signed_up(&service).await;

    let err = service
        .change_password(session.user.id, "wrong-password", "a-new-password")
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::InvalidCredentials));

    service
        .change_password(session.user.id, TEST_PASSWORD, "a-new-password")
        .await
        .unwrap();

    // Every refresh credential is gone...
    let err = service
        .refresh(&session.tokens.refresh_token)
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::InvalidRefreshToken));

    // ...but the already-issued access token rides out its own expiry.
    assert!(service
        .authenticate(&session.tokens.access_token)
        .await
        .is_ok());

    // Old password no longer signs in; the new one does.
    assert!(service.signin(TEST_EMAIL, TEST_PASSWORD).await.is_err());
    assert!(service.signin(TEST_EMAIL, "a-new-password").await.is_ok());
}

#[tokio::test]
async fn deactivation_blocks_signin_refresh_and_authentication() {
    let (_store, service) = test_service();
    let session = signed_up(&service).await;

    service.deactivate(session.user.id).await.unwrap();

    let signin = service.signin(TEST_EMAIL, TEST_PASSWORD).await.unwrap_err();
    assert!(matches!(signin, AuthError::AccountDeactivated));

    let refresh = service
        .refresh(&session.tokens.refresh_token)
        .await
        .unwrap_err();
    assert!(matches!(refresh, AuthError::InvalidRefreshToken));

    let auth = service
        .authenticate(&session.tokens.access_token)
        .await
        .unwrap_err();
    assert!(matches!(auth, AuthError::AccountDeactivated));
}

#[tokio::test]
async fn profile_update_resets_email_verification() {
    let (store, service) = test_service();
    let session = signed_up(&service).await;
    store.mark_email_verified(session.user.id).await;
    assert!(service.get_me(session.user.id).await.unwrap().email_verified);

    let before = store.count_refresh_tokens(session.user.id).await.unwrap();
    let profile = service
        .update_profile(session.user.id, Some("Renamed"), Some("New@Example.com"))
        .await
        .unwrap();

    assert_eq!(profile.name, "Renamed");
    assert_eq!(profile.email, "new@example.com");
    assert!(!profile.email_verified);
    // Sessions are untouched by profile changes.
    assert_eq!(
        store.count_refresh_tokens(session.user.id).await.unwrap(),
        before
    );
}

#[tokio::test]
async fn profile_update_rejects_taken_email() {
    let (_store, service) = test_service();
    let session = signed_up(&service).await;
    service
        .signup("Other User", TEST_EMAIL_2, TEST_PASSWORD)
        .await
        .unwrap();

    let err = service
        .update_profile(session.user.id, None, Some(TEST_EMAIL_2))
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::EmailTaken));

    // Keeping your own email is not a collision.
    assert!(service
        .update_profile(session.user.id, Some("Just Renaming"), Some(TEST_EMAIL))
        .await
        .is_ok());
}

#[tokio::test]
async fn expired_records_are_absent_at_read_time() {
    let (store, service) = test_service();
    let session = signed_up(&service).await;
    let user_id = session.user.id;
    let token = &session.tokens.refresh_token;

    // The record is physically present but a zero TTL makes it invisible.
    assert!(store
        .refresh_token_exists(user_id, token, Duration::days(7))
        .await
        .unwrap());
    assert!(!store
        .refresh_token_exists(user_id, token, Duration::seconds(-1))
        .await
        .unwrap());

    // The sweep reclaims it.
    let purged = store.purge_expired_tokens(Duration::seconds(-1)).await.unwrap();
    assert_eq!(purged, 1);
    assert_eq!(store.count_refresh_tokens(user_id).await.unwrap(), 0);
}

#[tokio::test]
async fn authenticate_rejects_garbage_and_unknown_accounts() {
    let (_store, service) = test_service();

    let err = service.authenticate("not-a-token").await.unwrap_err();
    assert!(matches!(err, AuthError::Unauthorized));

    // A well-signed token for an account this store never saw.
    let ghost = test_user();
    let token = test_keys().issue_access_token(&ghost).unwrap();
    let err = service.authenticate(&token).await.unwrap_err();
    assert!(matches!(err, AuthError::Unauthorized));
}

#[tokio::test]
async fn get_me_returns_the_public_projection() {
    let (_store, service) = test_service();
    let session = signed_up(&service).await;

    let profile = service.get_me(session.user.id).await.unwrap();
    assert_eq!(profile.id, session.user.id);
    assert_eq!(profile.email, TEST_EMAIL);
}
