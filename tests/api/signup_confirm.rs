use crate::helpers::TestApp;
use sqlx::Row;
use wiremock::{
    matchers::{method, path},
    Mock, ResponseTemplate,
};

fn valid_form() -> String {
    serde_urlencoded::to_string(serde_json::json!({
        "username": "le guin",
        "email": "ursula_le_guin@gmail.com",
        "password": "correct horse battery",
    }))
    .unwrap()
}

#[tokio::test]
async fn confirmations_without_token_are_rejected_with_a_400() {
    // Arrange
    let app = TestApp::spawn().await;

    // Act
    let resp = reqwest::get(format!("{}/signup/confirm", app.addr))
        .await
        .unwrap();

    // Assert
    assert_eq!(resp.status().as_u16(), 400);
}

#[tokio::test]
async fn the_link_returned_by_signup_returns_a_200_if_called() {
    // Arrange
    let app = TestApp::spawn().await;
    Mock::given(path("/email"))
        .and(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&app.email_server)
        .await;

    app.post_signup(valid_form()).await;
    let email_request = &app.email_server.received_requests().await.unwrap()[0];
    let confirmation_links = app.get_confirmation_links(email_request);

    // Act
    let resp = reqwest::get(confirmation_links.html).await.unwrap();

    // Assert
    assert_eq!(resp.status().as_u16(), 200);
}

#[tokio::test]
async fn clicking_on_the_confirmation_link_confirms_a_user() {
    // Arrange
    let app = TestApp::spawn().await;
    Mock::given(path("/email"))
        .and(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&app.email_server)
        .await;

    app.post_signup(valid_form()).await;
    let email_request = &app.email_server.received_requests().await.unwrap()[0];
    let confirmation_links = app.get_confirmation_links(email_request);

    // Act
    reqwest::get(confirmation_links.html)
        .await
        .unwrap()
        .error_for_status()
        .unwrap();

    // Assert
    let saved = sqlx::query("SELECT email, status FROM users")
        .fetch_one(&app.db_pool)
        .await
        .expect("Failed to fetch saved user.");

    assert_eq!(saved.get::<String, _>("email"), "ursula_le_guin@gmail.com");
    assert_eq!(saved.get::<String, _>("status"), "confirmed");
}

#[tokio::test]
async fn an_unknown_token_is_rejected_with_a_401() {
    // Arrange
    let app = TestApp::spawn().await;

    // Act
    let resp = reqwest::get(format!(
        "{}/signup/confirm?token=abcdefghijklmnopqrstuvwxy",
        app.addr
    ))
    .await
    .unwrap();

    // Assert
    assert_eq!(resp.status().as_u16(), 401);
}
