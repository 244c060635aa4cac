use crate::{config::OAuthSettings, utils::error_chain_fmt};
use anyhow::Context;
use oauth2::{
    basic::BasicClient, AuthUrl, AuthorizationCode, ClientId, ClientSecret, CsrfToken,
    EndpointNotSet, EndpointSet, RedirectUrl, Scope, TokenResponse, TokenUrl,
};
use reqwest::Url;
use secrecy::ExposeSecret;
use serde::Deserialize;
use std::fmt::Debug;

type ConfiguredBasicClient =
    BasicClient<EndpointSet, EndpointNotSet, EndpointNotSet, EndpointNotSet, EndpointSet>;

/// Authorization-code-flow client for the configured identity provider.
pub struct OAuthClient {
    provider: String,
    client: ConfiguredBasicClient,
    http_client: reqwest::Client,
    userinfo_url: Url,
    scopes: Vec<Scope>,
}

/// The provider's view of the logged-in user.
#[derive(Debug)]
pub struct FederatedIdentity {
    pub subject: String,
    pub email: Option<String>,
    pub name: Option<String>,
}

#[derive(thiserror::Error)]
pub enum OAuthClientError {
    #[error("{0} is not a valid provider endpoint URL.")]
    InvalidEndpoint(String, #[source] oauth2::url::ParseError),
    #[error("Failed to build the provider HTTP client.")]
    HttpClient(#[from] reqwest::Error),
}

impl Debug for OAuthClientError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

#[derive(thiserror::Error)]
pub enum OAuthError {
    #[error("Failed to exchange the authorization code for a token.")]
    ExchangeError(#[source] anyhow::Error),
    #[error("Failed to fetch the user profile from the identity provider.")]
    UserInfoError(#[source] anyhow::Error),
}

impl Debug for OAuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl OAuthClient {
    pub fn new(settings: &OAuthSettings) -> Result<Self, OAuthClientError> {
        let parse_endpoint = |raw: &str| {
            Url::parse(raw).map_err(|e| OAuthClientError::InvalidEndpoint(raw.to_owned(), e))
        };

        let client = BasicClient::new(ClientId::new(settings.client_id.clone()))
            .set_client_secret(ClientSecret::new(
                settings.client_secret.expose_secret().to_owned(),
            ))
            .set_auth_uri(AuthUrl::from_url(parse_endpoint(&settings.auth_url)?))
            .set_token_uri(TokenUrl::from_url(parse_endpoint(&settings.token_url)?))
            .set_redirect_uri(RedirectUrl::from_url(parse_endpoint(
                &settings.redirect_url,
            )?));

        // The provider must never be followed through redirects.
        let http_client = reqwest::ClientBuilder::new()
            .redirect(reqwest::redirect::Policy::none())
            .build()?;

        Ok(Self {
            provider: settings.provider.clone(),
            client,
            http_client,
            userinfo_url: parse_endpoint(&settings.userinfo_url)?,
            scopes: settings.scopes.iter().cloned().map(Scope::new).collect(),
        })
    }

    /// The short name federated identities are stored under.
    pub fn provider(&self) -> &str {
        &self.provider
    }

    /// Build the provider authorization URL and the CSRF state to pin in the
    /// caller's session.
    pub fn authorize_url(&self) -> (Url, CsrfToken) {
        self.client
            .authorize_url(CsrfToken::new_random)
            .add_scopes(self.scopes.iter().cloned())
            .url()
    }

    /// Redeem an authorization code and resolve the federated identity
    /// behind it.
    #[tracing::instrument(name = "Redeem authorization code", skip(self, code))]
    pub async fn fetch_identity(&self, code: String) -> Result<FederatedIdentity, OAuthError> {
        let token = self
            .client
            .exchange_code(AuthorizationCode::new(code))
            .request_async(&self.http_client)
            .await
            .map_err(|e| OAuthError::ExchangeError(e.into()))?;

        let user_info: UserInfoResponse = self
            .http_client
            .get(self.userinfo_url.clone())
            .bearer_auth(token.access_token().secret())
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .context("The user-info request failed.")
            .map_err(OAuthError::UserInfoError)?
            .json()
            .await
            .context("Failed to deserialize the user-info document.")
            .map_err(OAuthError::UserInfoError)?;

        Ok(FederatedIdentity {
            subject: user_info.sub,
            email: user_info.email,
            name: user_info.name.or(user_info.preferred_username),
        })
    }
}

#[derive(Deserialize)]
struct UserInfoResponse {
    sub: String,
    email: Option<String>,
    name: Option<String>,
    preferred_username: Option<String>,
}
