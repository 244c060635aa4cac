use actix_session::{SessionExt, SessionGetError, SessionInsertError};
use actix_web::{dev::Payload, FromRequest, HttpRequest};
use serde::{de::DeserializeOwned, Serialize};
use std::future::{ready, Ready};
use std::marker::PhantomData;
use uuid::Uuid;

/// A typed accessor for a single well-known session key.
pub struct SessionKey<'a, T> {
    value_type: PhantomData<T>,
    session: &'a actix_session::Session,
    key: &'static str,
}

impl<T> SessionKey<'_, T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn get(&self) -> Result<Option<T>, SessionGetError> {
        self.session.get(self.key)
    }

    pub fn insert(&self, value: T) -> Result<(), SessionInsertError> {
        self.session.insert(self.key, value)
    }

    /// Read the value and erase it from the session in one go.
    pub fn take(&self) -> Result<Option<T>, SessionGetError> {
        let value = self.session.get(self.key)?;
        self.session.remove(self.key);
        Ok(value)
    }
}

pub struct Session(actix_session::Session);

impl Session {
    const USER_ID_KEY: &'static str = "user_id";
    const OAUTH_STATE_KEY: &'static str = "oauth_state";

    /// Rotate the session id, keeping its state. Call on every privilege change.
    pub fn renew(&self) {
        self.0.renew();
    }

    pub fn logout(&self) {
        self.0.purge();
    }

    pub fn user_id(&self) -> SessionKey<'_, Uuid> {
        self.key(Self::USER_ID_KEY)
    }

    /// CSRF state for an in-flight OAuth authorization-code exchange.
    pub fn oauth_state(&self) -> SessionKey<'_, String> {
        self.key(Self::OAUTH_STATE_KEY)
    }

    fn key<T>(&self, key: &'static str) -> SessionKey<'_, T> {
        SessionKey {
            value_type: PhantomData,
            session: &self.0,
            key,
        }
    }
}

impl FromRequest for Session {
    type Error = <actix_session::Session as FromRequest>::Error;

    type Future = Ready<Result<Session, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Ok(Session(req.get_session())))
    }
}
