use crate::{
    domain::UserEmail,
    email_client::EmailClient,
    oauth::{OAuthClient, OAuthClientError},
};
use config::{Config, File};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_aux::field_attributes::deserialize_number_from_string;
use sqlx::postgres::{PgConnectOptions, PgSslMode};
use sqlx::PgPool;
use std::env;

#[derive(Deserialize)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub database: DatabaseSettings,
    pub email_client: EmailClientSettings,
    pub oauth: OAuthSettings,
    pub redis_uri: SecretString,
}

#[derive(Deserialize, Clone)]
pub struct ApplicationSettings {
    pub host: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
    pub base_url: String,
    pub hmac_secret: SecretString,
}

#[derive(Deserialize, Clone)]
pub struct DatabaseSettings {
    pub username: String,
    pub password: SecretString,
    pub host: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
    pub name: String,
    pub require_ssl: bool,
}

impl DatabaseSettings {
    pub fn connect_options(&self) -> PgConnectOptions {
        let ssl_mode = if self.require_ssl {
            PgSslMode::Require
        } else {
            PgSslMode::Prefer
        };

        PgConnectOptions::new()
            .username(&self.username)
            .password(self.password.expose_secret())
            .host(&self.host)
            .port(self.port)
            .database(&self.name)
            .ssl_mode(ssl_mode)
    }

    pub fn get_db_pool(&self) -> PgPool {
        PgPool::connect_lazy_with(self.connect_options())
    }
}

#[derive(Deserialize, Clone)]
pub struct EmailClientSettings {
    pub base_url: String,
    pub sender_email: String,
    pub auth_token: SecretString,
}

impl EmailClientSettings {
    pub fn sender(&self) -> Result<UserEmail, String> {
        UserEmail::parse(self.sender_email.clone())
    }

    pub fn client(&self) -> Result<EmailClient, String> {
        let url = reqwest::Url::parse(&self.base_url)
            .map_err(|e| format!("{} is not a valid base url: {e}", self.base_url))?;
        let sender = self.sender()?;

        Ok(EmailClient::new(url, sender, self.auth_token.clone()))
    }
}

/// Authorization-code flow settings for the federated identity provider.
#[derive(Deserialize, Clone)]
pub struct OAuthSettings {
    /// Short name the provider's identities are stored under, e.g. "github".
    pub provider: String,
    pub client_id: String,
    pub client_secret: SecretString,
    pub auth_url: String,
    pub token_url: String,
    pub userinfo_url: String,
    pub redirect_url: String,
    pub scopes: Vec<String>,
}

impl OAuthSettings {
    pub fn client(&self) -> Result<OAuthClient, OAuthClientError> {
        OAuthClient::new(self)
    }
}

pub fn get() -> anyhow::Result<Settings> {
    let config_path = env::current_dir()?.join("config");

    let app_env: Environment = env::var("APP_ENV")
        .unwrap_or_else(|_| "local".into())
        .try_into()
        .map_err(|e: String| anyhow::anyhow!(e))?;

    let env_file = {
        let mut chars = app_env.as_str().chars();
        let mut env_file = chars.next().unwrap().to_string().to_uppercase();
        env_file.push_str(&chars.collect::<String>());

        format!("{}.toml", env_file)
    };

    let settings = Config::builder()
        .add_source(File::from(config_path.join("Base.toml")))
        .add_source(File::from(config_path.join(env_file)))
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("__")
                .separator("__"),
        )
        .build()?;

    Ok(settings.try_deserialize::<Settings>()?)
}

pub enum Environment {
    Local,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Production => "production",
        }
    }
}

impl TryFrom<String> for Environment {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::try_from(s.as_str())
    }
}

impl TryFrom<&str> for Environment {
    type Error = String;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s.to_lowercase().as_str() {
            _ if s == Self::Production.as_str() => Ok(Self::Production),
            _ if s == Self::Local.as_str() => Ok(Self::Local),
            other => Err(format!(
                "{other} is not a supported environment. \
                Use either `local` or `production`.",
            )),
        }
    }
}
