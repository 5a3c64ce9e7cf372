// ============================================================================
// REST API Message Endpoints Tests
// ============================================================================
//
// - POST   /send/:groupid
// - GET    /read/:id
// - GET    /all/:groupid
// - PUT    /edit/:id
// - DELETE /delete/:id
//
// ============================================================================

use reqwest::StatusCode;
use serde_json::{Value, json};

use test_utils::{ALICE_ID, ALICE_TOKEN, BOB_TOKEN, create_client, message_body, spawn_app};

// ============================================================================
// POST /send/:groupid
// ============================================================================

#[tokio::test]
async fn test_send_then_read_round_trip() {
    let app = spawn_app().await;
    let client = create_client();

    let id = app
        .create_message(&client, "999", "2013-11-28T23:07:40+00:00", "hello")
        .await;
    assert_eq!(id.len(), 24);

    let response = client
        .get(app.url(&format!("/read/{}", id)))
        .bearer_auth(ALICE_TOKEN)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await.unwrap();
    let message = &body["message"];
    assert_eq!(message["id"], id);
    assert_eq!(message["userid"], ALICE_ID);
    assert_eq!(message["groupid"], "999");
    assert_eq!(message["timestamp"], "2013-11-28T23:07:40+00:00");
    assert_eq!(message["messagetext"], "hello");
    assert!(message["createdtime"].is_string());
    assert!(message["parentmessage"].is_null());
    assert!(message["modifiedtime"].is_null());
    assert!(message.get("deleteflag").is_none());
}

#[tokio::test]
async fn test_send_with_empty_text_is_rejected_without_creating() {
    let app = spawn_app().await;
    let client = create_client();
    app.policy.grant(ALICE_ID, "12345");

    let response = client
        .post(app.url("/send/12345"))
        .bearer_auth(ALICE_TOKEN)
        .json(&message_body("12345", "2013-11-28T23:07:40+00:00", ""))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error_code"], "VALIDATION_ERROR");
    assert!(body["error"].as_str().unwrap().contains("messagetext"));
    assert!(app.store.is_empty().await);
}

#[tokio::test]
async fn test_send_with_missing_fields_names_them() {
    let app = spawn_app().await;
    let client = create_client();
    app.policy.grant(ALICE_ID, "999");

    let response = client
        .post(app.url("/send/999"))
        .bearer_auth(ALICE_TOKEN)
        .json(&json!({ "message": { "groupid": "999", "messagetext": "hi" } }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    let error = body["error"].as_str().unwrap();
    assert!(error.contains("userid"));
    assert!(error.contains("timestamp"));
    assert!(app.store.is_empty().await);
}

#[tokio::test]
async fn test_send_with_mismatched_group_is_rejected() {
    let app = spawn_app().await;
    let client = create_client();
    app.policy.grant(ALICE_ID, "999");

    let response = client
        .post(app.url("/send/999"))
        .bearer_auth(ALICE_TOKEN)
        .json(&message_body("777", "2013-11-28T23:07:40+00:00", "sneaky"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(app.store.is_empty().await);
}

#[tokio::test]
async fn test_send_with_malformed_json_is_a_validation_error() {
    let app = spawn_app().await;
    let client = create_client();
    app.policy.grant(ALICE_ID, "999");

    let response = client
        .post(app.url("/send/999"))
        .bearer_auth(ALICE_TOKEN)
        .header("Content-Type", "application/json")
        .body("{\"message\": ")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error_code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_send_ignores_client_supplied_id() {
    let app = spawn_app().await;
    let client = create_client();
    app.policy.grant(ALICE_ID, "999");

    let mut body = message_body("999", "2013-11-28T23:07:40+00:00", "hello");
    body["message"]["id"] = json!("5293cd3cb1a0c4e26a000001");

    let response = client
        .post(app.url("/send/999"))
        .bearer_auth(ALICE_TOKEN)
        .json(&body)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let created: Value = response.json().await.unwrap();
    assert_ne!(created["id"], "5293cd3cb1a0c4e26a000001");
}

// ============================================================================
// GET /read/:id
// ============================================================================

#[tokio::test]
async fn test_read_malformed_and_unknown_ids_are_404() {
    let app = spawn_app().await;
    let client = create_client();

    for id in ["12345", "5293cd3cb1a0c4e26a000001"] {
        let response = client
            .get(app.url(&format!("/read/{}", id)))
            .bearer_auth(ALICE_TOKEN)
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    // Nothing to authorize against, so the policy was never asked
    assert_eq!(app.policy.calls(), 0);
}

#[tokio::test]
async fn test_read_is_repeatable() {
    let app = spawn_app().await;
    let client = create_client();
    let id = app
        .create_message(&client, "999", "2013-11-28T23:07:40+00:00", "hello")
        .await;

    let mut bodies = Vec::new();
    for _ in 0..2 {
        let body: Value = client
            .get(app.url(&format!("/read/{}", id)))
            .bearer_auth(ALICE_TOKEN)
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        bodies.push(body);
    }
    assert_eq!(bodies[0], bodies[1]);
}

// ============================================================================
// GET /all/:groupid
// ============================================================================

async fn seed_group_777(app: &test_utils::TestApp, client: &reqwest::Client) {
    for ts in [
        "2013-11-25T10:00:00+00:00",
        "2013-11-27T12:00:00+00:00",
        "2013-11-29T08:30:00+00:00",
        "2013-11-30T15:00:00+00:00",
    ] {
        app.create_message(client, "777", ts, "fixture").await;
    }
}

#[tokio::test]
async fn test_all_in_range_returns_exactly_matching_messages() {
    let app = spawn_app().await;
    let client = create_client();
    seed_group_777(&app, &client).await;

    let response = client
        .get(app.url("/all/777?starttime=2013-11-25&endtime=2013-11-30"))
        .bearer_auth(ALICE_TOKEN)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await.unwrap();
    let messages = body["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 3);
    assert!(messages.iter().all(|m| m["groupid"] == "777"));
    assert!(
        messages
            .iter()
            .all(|m| m["timestamp"] != "2013-11-30T15:00:00+00:00")
    );
}

#[tokio::test]
async fn test_all_without_end_is_unbounded() {
    let app = spawn_app().await;
    let client = create_client();
    seed_group_777(&app, &client).await;

    let body: Value = client
        .get(app.url("/all/777?startTime=2013-11-27"))
        .bearer_auth(ALICE_TOKEN)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["messages"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_all_with_nothing_in_range_is_404() {
    let app = spawn_app().await;
    let client = create_client();
    seed_group_777(&app, &client).await;

    let response = client
        .get(app.url("/all/777?starttime=2020-01-01"))
        .bearer_auth(ALICE_TOKEN)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_all_with_bad_range_is_400() {
    let app = spawn_app().await;
    let client = create_client();
    app.policy.grant(ALICE_ID, "777");

    for query in ["", "?starttime=yesterday", "?starttime=2013-11-25&endtime=later"] {
        let response = client
            .get(app.url(&format!("/all/777{}", query)))
            .bearer_auth(ALICE_TOKEN)
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "query {:?}", query);
    }
}

#[tokio::test]
async fn test_all_with_duplicate_bound_checks_access_first() {
    let app = spawn_app().await;
    let client = create_client();
    app.policy.grant(ALICE_ID, "777");
    let path = "/all/777?starttime=2013-11-25&starttime=2013-11-26";

    let denied = client
        .get(app.url(path))
        .bearer_auth(BOB_TOKEN)
        .send()
        .await
        .unwrap();
    assert_eq!(denied.status(), StatusCode::UNAUTHORIZED);

    let allowed = client
        .get(app.url(path))
        .bearer_auth(ALICE_TOKEN)
        .send()
        .await
        .unwrap();
    assert_eq!(allowed.status(), StatusCode::BAD_REQUEST);
    let body: Value = allowed.json().await.unwrap();
    assert_eq!(body["error_code"], "VALIDATION_ERROR");
}

// ============================================================================
// PUT /edit/:id
// ============================================================================

#[tokio::test]
async fn test_edit_updates_text_and_modified_time() {
    let app = spawn_app().await;
    let client = create_client();
    let id = app
        .create_message(&client, "999", "2013-11-28T23:07:40+00:00", "hello")
        .await;

    let response = client
        .put(app.url(&format!("/edit/{}", id)))
        .bearer_auth(ALICE_TOKEN)
        .json(&json!({ "edits": { "messagetext": "hello again" } }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"]["messagetext"], "hello again");
    assert_eq!(body["message"]["timestamp"], "2013-11-28T23:07:40+00:00");
    assert!(body["message"]["modifiedtime"].is_string());
}

#[tokio::test]
async fn test_edit_with_blank_field_is_400() {
    let app = spawn_app().await;
    let client = create_client();
    let id = app
        .create_message(&client, "999", "2013-11-28T23:07:40+00:00", "hello")
        .await;

    let response = client
        .put(app.url(&format!("/edit/{}", id)))
        .bearer_auth(ALICE_TOKEN)
        .json(&json!({ "edits": { "messagetext": "" } }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_edit_unknown_message_is_404() {
    let app = spawn_app().await;
    let client = create_client();

    let response = client
        .put(app.url("/edit/5293cd3cb1a0c4e26a000001"))
        .bearer_auth(ALICE_TOKEN)
        .json(&json!({ "edits": { "messagetext": "x" } }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ============================================================================
// DELETE /delete/:id
// ============================================================================

#[tokio::test]
async fn test_delete_hides_message_everywhere() {
    let app = spawn_app().await;
    let client = create_client();
    let id = app
        .create_message(&client, "999", "2013-11-28T23:07:40+00:00", "hello")
        .await;

    let response = client
        .delete(app.url(&format!("/delete/{}", id)))
        .bearer_auth(ALICE_TOKEN)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert!(body["message"]["deleteflag"].is_string());

    let read = client
        .get(app.url(&format!("/read/{}", id)))
        .bearer_auth(ALICE_TOKEN)
        .send()
        .await
        .unwrap();
    assert_eq!(read.status(), StatusCode::NOT_FOUND);

    let all = client
        .get(app.url("/all/999?starttime=2013-01-01"))
        .bearer_auth(ALICE_TOKEN)
        .send()
        .await
        .unwrap();
    assert_eq!(all.status(), StatusCode::NOT_FOUND);

    let again = client
        .delete(app.url(&format!("/delete/{}", id)))
        .bearer_auth(ALICE_TOKEN)
        .send()
        .await
        .unwrap();
    assert_eq!(again.status(), StatusCode::NOT_FOUND);

    let edit = client
        .put(app.url(&format!("/edit/{}", id)))
        .bearer_auth(ALICE_TOKEN)
        .json(&json!({ "edits": { "messagetext": "zombie" } }))
        .send()
        .await
        .unwrap();
    assert_eq!(edit.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_other_actor_cannot_delete() {
    let app = spawn_app().await;
    let client = create_client();
    let id = app
        .create_message(&client, "999", "2013-11-28T23:07:40+00:00", "hello")
        .await;

    let response = client
        .delete(app.url(&format!("/delete/{}", id)))
        .bearer_auth(BOB_TOKEN)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let read = client
        .get(app.url(&format!("/read/{}", id)))
        .bearer_auth(ALICE_TOKEN)
        .send()
        .await
        .unwrap();
    assert_eq!(read.status(), StatusCode::OK);
}
