//! Persistence of the PKCE verifier and the access token.
//!
//! Both survive the full-page hand-off to the authorization endpoint, so
//! they live in the host's durable [`KeyValueStore`] under two fixed keys:
//! * `verifier` holds the raw verifier string
//! * `spotify_token_info` holds the JSON-serialized [`TokenEnvelope`]

use crate::{
    error::{Error, Result},
    storage::KeyValueStore,
    token::TokenEnvelope,
};

/// Typed access to the session entries of a [`KeyValueStore`].
#[derive(Clone, Debug, Default)]
pub struct SessionStore<S> {
    inner: S,
}

impl<S> SessionStore<S>
where
    S: KeyValueStore,
{
    pub const VERIFIER_KEY: &'static str = "verifier";
    pub const TOKEN_KEY: &'static str = "spotify_token_info";

    pub fn new(inner: S) -> Self {
        Self { inner }
    }

    pub fn save_verifier(&mut self, verifier: &str) -> Result<()> {
        self.inner.set(Self::VERIFIER_KEY, verifier)
    }

    pub fn load_verifier(&self) -> Result<Option<String>> {
        self.inner.get(Self::VERIFIER_KEY)
    }

    pub fn clear_verifier(&mut self) -> Result<()> {
        self.inner.remove(Self::VERIFIER_KEY)
    }

    pub fn save_token(&mut self, token: &TokenEnvelope) -> Result<()> {
        let json = serde_json::to_string(token)?;
        self.inner.set(Self::TOKEN_KEY, &json)
    }

    /// Loads the stored token envelope.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails. An entry that is not a valid
    /// envelope is a [`DataLoss`](crate::error::ErrorKind::DataLoss) error
    /// wrapping the `serde_json::Error`.
    pub fn load_token(&self) -> Result<Option<TokenEnvelope>> {
        match self.inner.get(Self::TOKEN_KEY)? {
            Some(json) => serde_json::from_str(&json)
                .map(Some)
                .map_err(Error::data_loss),
            None => Ok(None),
        }
    }

    pub fn clear_token(&mut self) -> Result<()> {
        self.inner.remove(Self::TOKEN_KEY)
    }

    /// Removes every session entry.
    pub fn clear(&mut self) -> Result<()> {
        self.clear_token()?;
        self.clear_verifier()
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}
