use crate::helpers::{self, TestApp};
use sqlx::Row;
use wiremock::{
    matchers::{header, method, path},
    Mock, ResponseTemplate,
};

async fn mount_provider_mocks(app: &TestApp, expected_logins: u64) {
    Mock::given(path("/token"))
        .and(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "test-access-token",
            "token_type": "bearer",
            "expires_in": 3600,
        })))
        .expect(expected_logins)
        .mount(&app.oauth_server)
        .await;

    Mock::given(path("/userinfo"))
        .and(method("GET"))
        .and(header("Authorization", "Bearer test-access-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "sub": "prov-123",
            "email": "federated@example.com",
            "name": "Fed User",
        })))
        .expect(expected_logins)
        .mount(&app.oauth_server)
        .await;
}

#[tokio::test]
async fn oauth_login_redirects_to_the_identity_provider() {
    // Arrange
    let app = TestApp::spawn().await;

    // Act
    let resp = app.get_oauth_login().await;

    // Assert
    assert_eq!(resp.status().as_u16(), 303);
    let location = resp.headers().get("Location").unwrap().to_str().unwrap();
    let authorize_url = reqwest::Url::parse(location).unwrap();

    assert!(location.starts_with(&format!("{}/authorize", app.oauth_server.uri())));
    let query: std::collections::HashMap<_, _> = authorize_url.query_pairs().collect();
    assert_eq!(query.get("response_type").map(AsRef::as_ref), Some("code"));
    assert!(query.contains_key("client_id"));
    assert!(query.contains_key("redirect_uri"));
    assert!(!query.get("state").unwrap().is_empty());
}

#[tokio::test]
async fn the_callback_is_rejected_without_an_in_flight_login() {
    // Arrange
    let app = TestApp::spawn().await;

    // Act: no prior visit to /oauth/login, so no state in the session
    let resp = app.get_oauth_callback("some-code", "some-state").await;

    // Assert
    assert_eq!(resp.status().as_u16(), 400);
}

#[tokio::test]
async fn the_callback_is_rejected_when_the_state_does_not_match() {
    // Arrange
    let app = TestApp::spawn().await;
    let _state = app.start_oauth_login().await;

    // Act
    let resp = app.get_oauth_callback("some-code", "a-forged-state").await;

    // Assert
    assert_eq!(resp.status().as_u16(), 400);
}

#[tokio::test]
async fn the_state_is_single_use() {
    // Arrange
    let app = TestApp::spawn().await;
    mount_provider_mocks(&app, 1).await;
    let state = app.start_oauth_login().await;

    // Act: the first callback consumes the state
    let resp = app.get_oauth_callback("the-code", &state).await;
    helpers::assert_redirecting(&resp, "/admin/dashboard");

    // Act 2: a replay of the same callback
    let resp = app.get_oauth_callback("the-code", &state).await;

    // Assert
    assert_eq!(resp.status().as_u16(), 400);
}

#[tokio::test]
async fn a_federated_login_provisions_a_user_and_reaches_the_dashboard() {
    // Arrange
    let app = TestApp::spawn().await;
    mount_provider_mocks(&app, 1).await;
    let state = app.start_oauth_login().await;

    // Act
    let resp = app.get_oauth_callback("the-code", &state).await;

    // Assert
    helpers::assert_redirecting(&resp, "/admin/dashboard");

    let expected_username = format!("{}-prov-123", app.oauth_provider);
    let html = app.get_admin_dashboard_html().await;
    assert!(html.contains(&format!("Welcome {expected_username}")));

    let saved = sqlx::query(
        "SELECT username, email, password_hash, status FROM users WHERE username = $1",
    )
    .bind(&expected_username)
    .fetch_one(&app.db_pool)
    .await
    .expect("Failed to fetch the provisioned user.");

    assert_eq!(
        saved.get::<Option<String>, _>("email").as_deref(),
        Some("federated@example.com")
    );
    assert_eq!(saved.get::<Option<String>, _>("password_hash"), None);
    assert_eq!(saved.get::<String, _>("status"), "confirmed");

    let identity = sqlx::query("SELECT provider, subject FROM oauth_identities")
        .fetch_one(&app.db_pool)
        .await
        .expect("Failed to fetch the federated identity.");
    assert_eq!(
        identity.get::<String, _>("provider"),
        app.oauth_provider
    );
    assert_eq!(identity.get::<String, _>("subject"), "prov-123");
}

#[tokio::test]
async fn a_second_federated_login_reuses_the_existing_user() {
    // Arrange
    let app = TestApp::spawn().await;
    mount_provider_mocks(&app, 2).await;

    // Act: log in twice with the same federated identity
    for _ in 0..2 {
        let state = app.start_oauth_login().await;
        let resp = app.get_oauth_callback("the-code", &state).await;
        helpers::assert_redirecting(&resp, "/admin/dashboard");
    }

    // Assert: one provisioned user on top of the seeded test user
    let expected_username = format!("{}-prov-123", app.oauth_provider);
    let row = sqlx::query("SELECT COUNT(*) as count FROM users WHERE username = $1")
        .bind(&expected_username)
        .fetch_one(&app.db_pool)
        .await
        .unwrap();
    assert_eq!(row.get::<i64, _>("count"), 1);
}

#[tokio::test]
async fn a_failed_code_exchange_redirects_back_to_login_with_a_flash() {
    // Arrange
    let app = TestApp::spawn().await;
    Mock::given(path("/token"))
        .and(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&app.oauth_server)
        .await;
    let state = app.start_oauth_login().await;

    // Act
    let resp = app.get_oauth_callback("the-code", &state).await;

    // Assert
    helpers::assert_redirecting(&resp, "/login");
    let html = app.get_login_html().await;
    assert!(html.contains(r#"<p><i>Authentication failed</i></p>"#));
}
