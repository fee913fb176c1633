//! Authorization Code flow with PKCE.
//!
//! Authorization takes two page loads:
//! 1. [`AuthFlow::begin`] stores a fresh verifier and hands the user off to
//!    the authorization endpoint with the derived challenge.
//! 2. After consent, the provider redirects back with a one-time `code`,
//!    which [`AuthFlow::exchange_code`] trades for an access token using
//!    the stored verifier.
//!
//! Persisting the resulting token is up to the caller.

use std::sync::Arc;

use url::Url;

use crate::{
    config::Config,
    error::{Error, Result, TokenExchangeError},
    http::{self, HttpClient},
    navigator::Navigator,
    pkce::{self, Hasher, Sha256Hasher},
    protocol::{self, TokenResponse},
    session_store::SessionStore,
    storage::KeyValueStore,
};

pub struct AuthFlow<C, H = Sha256Hasher> {
    config: Config,
    http_client: Arc<C>,
    hasher: H,
}

impl<C> AuthFlow<C>
where
    C: HttpClient,
{
    pub fn new(config: Config, http_client: Arc<C>) -> Self {
        Self::with_hasher(config, http_client, Sha256Hasher)
    }
}

impl<C, H> AuthFlow<C, H>
where
    C: HttpClient,
    H: Hasher,
{
    pub fn with_hasher(config: Config, http_client: Arc<C>, hasher: H) -> Self {
        Self {
            config,
            http_client,
            hasher,
        }
    }

    /// Builds the authorization endpoint URL for `challenge`.
    #[must_use]
    pub fn authorization_url(&self, challenge: &str) -> Url {
        let mut url = self.config.authorize_url.clone();
        url.query_pairs_mut()
            .append_pair("client_id", self.config.client_id.as_str())
            .append_pair("response_type", "code")
            .append_pair("redirect_uri", self.config.redirect_uri.as_str())
            .append_pair("scope", &self.config.scope())
            .append_pair("code_challenge_method", "S256")
            .append_pair("code_challenge", challenge);
        url
    }

    /// Starts a new authorization attempt and navigates to the provider.
    ///
    /// The new verifier replaces any verifier left over from an earlier
    /// attempt. Nothing should run in the current page context after this
    /// returns `Ok`.
    ///
    /// # Errors
    ///
    /// Returns an error if the verifier cannot be stored, in which case no
    /// navigation happens.
    pub fn begin<S, N>(&self, store: &mut SessionStore<S>, navigator: &mut N) -> Result<()>
    where
        S: KeyValueStore,
        N: Navigator + ?Sized,
    {
        let verifier = pkce::generate_verifier(pkce::VERIFIER_LENGTH);
        let challenge = pkce::derive_challenge(&self.hasher, &verifier);
        store.save_verifier(&verifier)?;

        info!("requesting authorization for client {}", self.config.client_id);
        navigator.assign(self.authorization_url(&challenge));

        Ok(())
    }

    /// Exchanges an authorization `code` for an access token.
    ///
    /// # Errors
    ///
    /// Will return `Err` if:
    /// - no verifier is stored, meaning the flow was broken or replayed
    /// - the token endpoint responds with a non-success status, carried as
    ///   a [`TokenExchangeError`]
    /// - the response carries no access token
    pub async fn exchange_code<S>(&self, store: &SessionStore<S>, code: &str) -> Result<String>
    where
        S: KeyValueStore,
    {
        let verifier = store.load_verifier()?.ok_or_else(|| {
            Error::failed_precondition("no code verifier stored for this authorization code")
        })?;

        let request = http::post_form(
            &self.config.token_url,
            [
                ("client_id", self.config.client_id.as_str()),
                ("grant_type", "authorization_code"),
                ("code", code),
                ("redirect_uri", self.config.redirect_uri.as_str()),
                ("code_verifier", verifier.as_str()),
            ],
        )?;

        let response = self.http_client.execute(request).await?;
        let status = response.status();
        if !status.is_success() {
            return Err(TokenExchangeError { status }.into());
        }

        let token: TokenResponse = protocol::json(response.body(), "token")?;
        debug!(
            "received {} token",
            token.token_type.as_deref().unwrap_or("access")
        );

        Ok(token.access_token)
    }
}
