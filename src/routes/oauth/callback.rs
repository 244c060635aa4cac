use crate::{
    oauth::{FederatedIdentity, OAuthClient},
    session_state::Session,
    utils,
};
use actix_web::{
    get,
    web::{Data, Query},
    Responder,
};
use actix_web_flash_messages::FlashMessage;
use anyhow::Context;
use serde::Deserialize;
use sqlx::{Acquire, PgPool, Row};
use uuid::Uuid;

#[derive(Deserialize)]
struct CallbackParams {
    code: String,
    state: String,
}

#[get("/oauth/callback")]
#[tracing::instrument(
    name = "Complete an OAuth login",
    skip(params, db_pool, oauth_client, session),
    fields(user_id = tracing::field::Empty)
)]
pub async fn oauth_callback(
    params: Query<CallbackParams>,
    db_pool: Data<PgPool>,
    oauth_client: Data<OAuthClient>,
    session: Session,
) -> actix_web::Result<impl Responder> {
    // The state is single-use: taking it invalidates replays of this callback.
    let expected_state = session.oauth_state().take().map_err(utils::e500)?;
    if expected_state.as_deref() != Some(params.state.as_str()) {
        return Err(utils::e400(anyhow::anyhow!(
            "The OAuth state is missing or does not match the session."
        )));
    }

    let identity = match oauth_client.fetch_identity(params.0.code).await {
        Ok(identity) => identity,
        Err(e) => {
            tracing::warn!("OAuth login failed: {:?}", e);
            FlashMessage::error("Authentication failed").send();
            return Ok(utils::see_other("/login"));
        }
    };

    let user_id = get_or_create_user(&db_pool, oauth_client.provider(), &identity)
        .await
        .map_err(utils::e500)?;

    session.renew();
    session.user_id().insert(user_id).map_err(utils::e500)?;
    tracing::Span::current().record("user_id", tracing::field::display(&user_id));

    Ok(utils::see_other("/admin/dashboard"))
}

/// Resolve the federated identity to a local user, provisioning one on first
/// login. Federated users are created confirmed and without a password.
#[tracing::instrument(name = "Get or create federated user", skip(db_pool, identity))]
async fn get_or_create_user(
    db_pool: &PgPool,
    provider: &str,
    identity: &FederatedIdentity,
) -> anyhow::Result<Uuid> {
    let mut transaction = db_pool
        .begin()
        .await
        .context("Failed to acquire a Postgres connection from the pool")?;

    if let Some(user_id) =
        find_user_by_identity(provider, &identity.subject, &mut transaction).await?
    {
        return Ok(user_id);
    }

    let user_id = insert_federated_user(provider, identity, &mut transaction).await?;

    transaction
        .commit()
        .await
        .context("Failed to commit the new federated user")?;

    Ok(user_id)
}

#[tracing::instrument(name = "Find user by federated identity", skip(executor))]
async fn find_user_by_identity(
    provider: &str,
    subject: &str,
    executor: impl Acquire<'_, Database = sqlx::Postgres>,
) -> anyhow::Result<Option<Uuid>> {
    let executor = &mut *(executor.acquire().await?);

    let r = sqlx::query(
        r#"
        SELECT user_id
        FROM oauth_identities
        WHERE provider = $1 AND subject = $2
        "#,
    )
    .bind(provider)
    .bind(subject)
    .fetch_optional(executor)
    .await
    .context("Failed to look up the federated identity.")?
    .map(|r| r.get("user_id"));

    Ok(r)
}

#[tracing::instrument(name = "Provision federated user", skip(identity, executor))]
async fn insert_federated_user(
    provider: &str,
    identity: &FederatedIdentity,
    executor: impl Acquire<'_, Database = sqlx::Postgres>,
) -> anyhow::Result<Uuid> {
    let executor = &mut *(executor.acquire().await?);

    // Deterministic and unique per identity; the provider's display name may
    // collide with existing usernames.
    let username = format!("{}-{}", provider, identity.subject);

    let user_id = Uuid::new_v4();
    sqlx::query(
        r#"
        INSERT INTO users (id, username, email, password_hash, status, created_at)
        VALUES ($1, $2, $3, NULL, 'confirmed', $4)
        "#,
    )
    .bind(user_id)
    .bind(&username)
    .bind(&identity.email)
    .bind(chrono::Utc::now())
    .execute(&mut *executor)
    .await
    .context("Failed to insert the federated user.")?;

    sqlx::query(
        r#"
        INSERT INTO oauth_identities (provider, subject, user_id)
        VALUES ($1, $2, $3)
        "#,
    )
    .bind(provider)
    .bind(&identity.subject)
    .bind(user_id)
    .execute(executor)
    .await
    .context("Failed to insert the federated identity.")?;

    Ok(user_id)
}
