// ============================================================================
// Authorization Tests
// ============================================================================
//
// Session resolution and the policy gate as seen through the HTTP surface:
// - missing / unknown session token -> 401
// - policy deny -> 401, whether or not the group has messages
// - policy or session backend failure -> 500, fail-closed
//
// ============================================================================

use std::sync::atomic::Ordering;

use reqwest::StatusCode;
use serde_json::Value;

use test_utils::{ALICE_ID, ALICE_TOKEN, BOB_TOKEN, create_client, message_body, spawn_app};

#[tokio::test]
async fn test_missing_token_is_401() {
    let app = spawn_app().await;
    let client = create_client();

    let response = client
        .get(app.url("/read/5293cd3cb1a0c4e26a000001"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error_code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_unknown_token_is_401() {
    let app = spawn_app().await;
    let client = create_client();

    let response = client
        .get(app.url("/all/999?starttime=2013-01-01"))
        .bearer_auth("token-mallory")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(app.policy.calls(), 0);
}

#[tokio::test]
async fn test_session_header_fallback() {
    let app = spawn_app().await;
    let client = create_client();
    app.create_message(&client, "999", "2013-11-28T23:07:40+00:00", "hello")
        .await;

    let response = client
        .get(app.url("/all/999?starttime=2013-01-01"))
        .header("x-session-token", ALICE_TOKEN)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_denied_group_is_401_regardless_of_contents() {
    let app = spawn_app().await;
    let client = create_client();
    app.create_message(&client, "999", "2013-11-28T23:07:40+00:00", "hello")
        .await;

    // "999" has a message, "555" has none; bob is granted neither
    for group in ["999", "555"] {
        let response = client
            .get(app.url(&format!("/all/{}?starttime=2013-01-01", group)))
            .bearer_auth(BOB_TOKEN)
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let body: Value = response.json().await.unwrap();
        assert_eq!(body["error"], "Unauthorized");
    }
}

#[tokio::test]
async fn test_denied_send_creates_nothing() {
    let app = spawn_app().await;
    let client = create_client();

    let response = client
        .post(app.url("/send/999"))
        .bearer_auth(ALICE_TOKEN)
        .json(&message_body("999", "2013-11-28T23:07:40+00:00", "hello"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(app.store.is_empty().await);
}

#[tokio::test]
async fn test_unauthorized_caller_sees_401_before_validation() {
    let app = spawn_app().await;
    let client = create_client();

    let response = client
        .post(app.url("/send/12345"))
        .bearer_auth(BOB_TOKEN)
        .json(&message_body("12345", "2013-11-28T23:07:40+00:00", ""))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_policy_failure_is_500_and_fails_closed() {
    let app = spawn_app().await;
    let client = create_client();
    app.policy.grant(ALICE_ID, "999");
    app.policy.failing.store(true, Ordering::SeqCst);

    let response = client
        .post(app.url("/send/999"))
        .bearer_auth(ALICE_TOKEN)
        .json(&message_body("999", "2013-11-28T23:07:40+00:00", "hello"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error_code"], "POLICY_UNAVAILABLE");
    assert_eq!(body["error"], "Internal server error");
    assert!(app.store.is_empty().await);
}

#[tokio::test]
async fn test_session_failure_is_500() {
    let app = spawn_app().await;
    let client = create_client();
    app.sessions.failing.store(true, Ordering::SeqCst);

    let response = client
        .get(app.url("/read/5293cd3cb1a0c4e26a000001"))
        .bearer_auth(ALICE_TOKEN)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error_code"], "SESSION_UNAVAILABLE");
}
