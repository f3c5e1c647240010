//! src/session_state.rs
use crate::subscription::{SessionId, Visitor};
use actix_session::{Session, SessionExt};
use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest};
use anyhow::Context;
use std::future::{ready, Ready};

pub struct TypedSession(Session);

impl TypedSession {
    const SESSION_ID_KEY: &'static str = "session_id";
    const CONFIRMED_KEY: &'static str = "confirmed";

    /// The visitor's id, minted on first use.
    pub fn session_id(&self) -> Result<SessionId, anyhow::Error> {
        let existing = self
            .0
            .get::<SessionId>(Self::SESSION_ID_KEY)
            .context("Failed to read the session id")?;
        if let Some(session_id) = existing {
            return Ok(session_id);
        }

        let session_id = SessionId::new();
        self.0
            .insert(Self::SESSION_ID_KEY, session_id)
            .context("Failed to store the session id")?;
        Ok(session_id)
    }

    pub fn visitor(&self) -> Result<Visitor, anyhow::Error> {
        let visitor = Visitor::new(self.session_id()?);
        let confirmed = self
            .0
            .get::<bool>(Self::CONFIRMED_KEY)
            .context("Failed to read the confirmation flag")?
            .unwrap_or(false);
        Ok(if confirmed { visitor.confirmed() } else { visitor })
    }

    pub fn mark_confirmed(&self) -> Result<(), anyhow::Error> {
        self.0
            .insert(Self::CONFIRMED_KEY, true)
            .context("Failed to store the confirmation flag")
    }
}

impl FromRequest for TypedSession {
    // Same error as the `FromRequest` implementation for `Session`.
    type Error = <Session as FromRequest>::Error;
    // No I/O here, so the future is ready on first poll.
    type Future = Ready<Result<TypedSession, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Ok(TypedSession(req.get_session())))
    }
}
