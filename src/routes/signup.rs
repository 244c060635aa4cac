use crate::{
    auth,
    domain::{NewUser, SignupToken, UserEmail, UserName, ValidPassword},
    email_client::EmailClient,
    startup::AppBaseUrl,
    telemetry,
};
use actix_web::{
    post,
    web::{Data, Form},
    HttpResponse, Responder,
};
use chrono::Utc;
use secrecy::SecretString;
use serde::Deserialize;
use sqlx::{Acquire, PgPool};
use uuid::Uuid;

#[derive(Deserialize)]
pub struct SignupForm {
    username: String,
    email: String,
    password: SecretString,
}

#[post("/signup")]
#[tracing::instrument(
    name = "Signing up a new user",
    skip(form, db_pool, email_client, base_url),
    fields(
        username = %form.username,
        email = %form.email,
    )
)]
pub async fn signup(
    form: Form<SignupForm>,
    db_pool: Data<PgPool>,
    email_client: Data<EmailClient>,
    base_url: Data<AppBaseUrl>,
) -> impl Responder {
    let new_user: NewUser = match form.0.try_into() {
        Ok(nu) => nu,
        Err(_) => return HttpResponse::BadRequest(),
    };
    let NewUser {
        username,
        email,
        password,
    } = new_user;

    let password_hash =
        match telemetry::spawn_blocking_with_tracing(|| auth::compute_password_hash(password))
            .await
        {
            Ok(Ok(hash)) => hash,
            _ => return HttpResponse::InternalServerError(),
        };

    let mut transaction = match db_pool.begin().await {
        Ok(t) => t,
        Err(_) => return HttpResponse::InternalServerError(),
    };
    let user_id = match insert_user(&username, &email, &password_hash, &mut transaction).await {
        Ok(id) => id,
        Err(_) => return HttpResponse::InternalServerError(),
    };
    let signup_token = SignupToken::generate();
    if store_token(&mut transaction, user_id, &signup_token)
        .await
        .is_err()
    {
        return HttpResponse::InternalServerError();
    }
    if send_confirmation_email(&email_client, &email, &base_url.0, &signup_token)
        .await
        .is_err()
    {
        return HttpResponse::InternalServerError();
    }
    if transaction.commit().await.is_err() {
        return HttpResponse::InternalServerError();
    }
    HttpResponse::Ok()
}

#[tracing::instrument(
    name = "Saving the new user in the database",
    skip(username, email, password_hash, executor)
)]
async fn insert_user(
    username: &UserName,
    email: &UserEmail,
    password_hash: &SecretString,
    executor: impl Acquire<'_, Database = sqlx::Postgres>,
) -> Result<Uuid, sqlx::Error> {
    use secrecy::ExposeSecret;

    let executor = &mut *(executor.acquire().await?);

    let id = Uuid::new_v4();
    sqlx::query(
        r#"
        INSERT INTO users (id, username, email, password_hash, status, created_at)
        VALUES ($1, $2, $3, $4, 'pending_confirmation', $5)
        "#,
    )
    .bind(id)
    .bind(username.as_ref())
    .bind(email.as_ref())
    .bind(password_hash.expose_secret())
    .bind(Utc::now())
    .execute(executor)
    .await
    .map_err(|e| {
        tracing::error!("Failed to execute query: {:?}", e);
        e
    })?;
    Ok(id)
}

#[tracing::instrument(
    name = "Storing the signup token for the new user in the database",
    skip(executor, signup_token)
)]
async fn store_token(
    executor: impl Acquire<'_, Database = sqlx::Postgres>,
    user_id: Uuid,
    signup_token: &SignupToken,
) -> Result<(), sqlx::Error> {
    let executor = &mut *(executor.acquire().await?);

    sqlx::query(
        r#"INSERT INTO signup_tokens (user_id, token)
    VALUES ($1, $2)"#,
    )
    .bind(user_id)
    .bind(signup_token.as_ref())
    .execute(executor)
    .await
    .map_err(|e| {
        tracing::error!("Failed to execute query: {:?}", e);
        e
    })?;
    Ok(())
}

#[tracing::instrument(
    name = "Sending a confirmation email to a new user",
    skip(ec, email, base_url, token)
)]
async fn send_confirmation_email(
    ec: &EmailClient,
    email: &UserEmail,
    base_url: &str,
    token: &SignupToken,
) -> Result<(), reqwest::Error> {
    let confirmation_link = format!(
        "{}/signup/confirm?token={}",
        base_url,
        token.as_ref()
    );

    let html_body = format!(
        "Welcome to Gatehouse!<br />\
                Click <a href=\"{}\">here</a> to confirm your account.",
        confirmation_link
    );

    let text_body = format!(
        "Welcome to Gatehouse!\nVisit {} to confirm your account.",
        confirmation_link
    );

    ec.send_email(email, "Welcome!", &html_body, &text_body)
        .await
}

impl TryFrom<SignupForm> for NewUser {
    type Error = String;

    fn try_from(form: SignupForm) -> Result<Self, Self::Error> {
        let username = UserName::parse(&form.username)?;
        let email = UserEmail::parse(form.email)?;
        let password = ValidPassword::parse(form.password).map_err(|e| e.to_string())?;

        Ok(NewUser {
            username,
            email,
            password,
        })
    }
}
