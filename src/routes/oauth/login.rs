use crate::{oauth::OAuthClient, session_state::Session, utils};
use actix_web::{get, web::Data, Responder};

#[get("/oauth/login")]
#[tracing::instrument(name = "Start an OAuth login", skip(oauth_client, session))]
pub async fn oauth_login(
    oauth_client: Data<OAuthClient>,
    session: Session,
) -> actix_web::Result<impl Responder> {
    let (authorize_url, csrf_state) = oauth_client.authorize_url();

    // Pin the state to this session so the callback can reject forgeries.
    session
        .oauth_state()
        .insert(csrf_state.secret().clone())
        .map_err(utils::e500)?;

    Ok(utils::see_other(authorize_url.as_str()))
}
