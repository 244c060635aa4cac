use actix_web::{
    get,
    web::{Data, Query},
    HttpResponse, Responder,
};
use serde::Deserialize;
use sqlx::{PgPool, Row};
use uuid::Uuid;

#[derive(Deserialize)]
struct Parameters {
    token: String,
}

#[get("/signup/confirm")]
#[tracing::instrument(name = "Confirming a pending user", skip(db_pool, parameters))]
pub async fn signup_confirm(db_pool: Data<PgPool>, parameters: Query<Parameters>) -> impl Responder {
    let id = match get_user_id_from_token(&db_pool, &parameters.token).await {
        Ok(id) => match id {
            Some(id) => id,
            None => return HttpResponse::Unauthorized(),
        },
        Err(_) => return HttpResponse::InternalServerError(),
    };

    if confirm_user(&db_pool, id).await.is_err() {
        return HttpResponse::InternalServerError();
    }

    HttpResponse::Ok()
}

#[tracing::instrument(name = "Mark user as confirmed", skip(user_id, db_pool))]
async fn confirm_user(db_pool: &PgPool, user_id: Uuid) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE users SET status = 'confirmed' WHERE id = $1")
        .bind(user_id)
        .execute(db_pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to execute query: {:?}", e);
            e
        })?;

    Ok(())
}

#[tracing::instrument(name = "Get user_id from token", skip(db_pool, token))]
async fn get_user_id_from_token(
    db_pool: &PgPool,
    token: &str,
) -> Result<Option<Uuid>, sqlx::Error> {
    let id = sqlx::query("SELECT user_id FROM signup_tokens WHERE token = $1")
        .bind(token)
        .fetch_optional(db_pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to execute query: {:?}", e);
            e
        })?
        .map(|r| r.get("user_id"));

    Ok(id)
}
