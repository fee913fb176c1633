//! Session bootstrapping on page load.
//!
//! Every page load starts in one of four states, decided from the current
//! location and the stored token:
//!
//! | State | Condition | Transition |
//! |---|---|---|
//! | [`State::HasCode`] | `code` query parameter present | exchange, store token, strip code, load |
//! | [`State::ValidToken`] | stored token usable | load |
//! | [`State::ExpiredToken`] | stored token past its margin | clear token, then as `NoToken` |
//! | [`State::NoToken`] | nothing stored | begin authorization |
//!
//! Loading fetches the profile and all playlists. If the provider rejects
//! the token with 401 Unauthorized, on page load or on any later fetch, the
//! token is cleared and authorization starts over. That is the only
//! automatic recovery; every other error is returned to the caller.

use std::{sync::Arc, time::SystemTime};

use url::Url;

use crate::{
    api::WebApi,
    auth::AuthFlow,
    config::Config,
    error::Result,
    http::HttpClient,
    navigator::{self, Navigator},
    pkce::{Hasher, Sha256Hasher},
    protocol::{Playlist, Track, UserProfile},
    session_store::SessionStore,
    storage::KeyValueStore,
    token::TokenEnvelope,
};

/// Where a page load starts from.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum State {
    /// The provider redirected back with an authorization code.
    HasCode(String),
    ValidToken(TokenEnvelope),
    ExpiredToken,
    NoToken,
}

/// How a token-gated operation ended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome<T = Library> {
    /// The data was fetched and can be rendered.
    Loaded(T),

    /// The user was handed off to the authorization endpoint.
    Redirected,
}

/// Everything fetched for the signed-in user on page load.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Library {
    pub profile: UserProfile,
    pub playlists: Vec<Playlist>,

    /// Token the library was fetched with, for follow-up requests.
    pub token: TokenEnvelope,
}

pub struct Session<S, C, H = Sha256Hasher> {
    store: SessionStore<S>,
    auth: AuthFlow<C, H>,
    api: WebApi<C>,
}

impl<S, C> Session<S, C>
where
    S: KeyValueStore,
    C: HttpClient,
{
    pub fn new(config: Config, store: S, http_client: C) -> Self {
        Self::with_hasher(config, store, http_client, Sha256Hasher)
    }
}

impl<S, C, H> Session<S, C, H>
where
    S: KeyValueStore,
    C: HttpClient,
    H: Hasher,
{
    pub fn with_hasher(config: Config, store: S, http_client: C, hasher: H) -> Self {
        let http_client = Arc::new(http_client);
        let api = WebApi::new(config.api_url.clone(), Arc::clone(&http_client));
        Self {
            store: SessionStore::new(store),
            auth: AuthFlow::with_hasher(config, http_client, hasher),
            api,
        }
    }

    #[must_use]
    pub fn store(&self) -> &SessionStore<S> {
        &self.store
    }

    /// Determines the starting state for a page load at `location`.
    ///
    /// A stored token that cannot be decoded counts as expired.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn state(&self, location: &Url, now: SystemTime) -> Result<State> {
        if let Some(code) = navigator::query_param(location, "code") {
            return Ok(State::HasCode(code));
        }

        match self.store.load_token() {
            Ok(Some(token)) if token.is_usable_at(now) => Ok(State::ValidToken(token)),
            Ok(Some(_)) => Ok(State::ExpiredToken),
            Ok(None) => Ok(State::NoToken),
            Err(e) if e.downcast::<serde_json::Error>().is_some() => {
                warn!("discarding unreadable token: {e}");
                Ok(State::ExpiredToken)
            }
            Err(e) => Err(e),
        }
    }

    /// Runs the page load state machine at the navigator's location.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails, or if loading fails for any
    /// reason other than a rejected token.
    pub async fn bootstrap<N>(&mut self, navigator: &mut N) -> Result<Outcome>
    where
        N: Navigator + ?Sized,
    {
        let state = self.state(navigator.location(), SystemTime::now())?;
        match state {
            State::HasCode(code) => self.authorize(&code, navigator).await,
            State::ValidToken(token) => {
                debug!(
                    "reusing stored token, valid for {}s",
                    token.time_to_live().as_secs()
                );
                self.load(token, navigator).await
            }
            State::ExpiredToken => {
                info!("stored token expired");
                self.store.clear_token()?;
                self.reauthorize(navigator)
            }
            State::NoToken => self.reauthorize(navigator),
        }
    }

    /// Exchanges `code`, then loads with the new token.
    ///
    /// The verifier is consumed whatever the result, and the code is
    /// removed from the location so that reloading cannot replay it. A
    /// failed exchange starts authorization over.
    async fn authorize<N>(&mut self, code: &str, navigator: &mut N) -> Result<Outcome>
    where
        N: Navigator + ?Sized,
    {
        let exchanged = self.auth.exchange_code(&self.store, code).await;
        self.store.clear_verifier()?;

        match exchanged {
            Ok(access_token) => {
                let token = TokenEnvelope::issued(access_token, SystemTime::now());
                self.store.save_token(&token)?;
                Self::strip_code(navigator);
                info!("authorized");

                self.load(token, navigator).await
            }
            Err(e) => {
                error!("{e}");
                Self::strip_code(navigator);
                self.reauthorize(navigator)
            }
        }
    }

    /// Replaces the location with its root document, dropping the code.
    fn strip_code<N>(navigator: &mut N)
    where
        N: Navigator + ?Sized,
    {
        let root = navigator::root_of(navigator.location());
        navigator.replace(root);
    }

    /// Fetches the profile and playlists with `token`.
    async fn load<N>(&mut self, token: TokenEnvelope, navigator: &mut N) -> Result<Outcome>
    where
        N: Navigator + ?Sized,
    {
        let library = self.library(token).await;
        self.recover(library, navigator)
    }

    async fn library(&self, token: TokenEnvelope) -> Result<Library> {
        let profile = self.api.profile(&token.access_token).await?;
        let playlists = self.api.playlists(&token.access_token).await?;
        info!("found {} playlists", playlists.len());

        Ok(Library {
            profile,
            playlists,
            token,
        })
    }

    /// Turns a rejected token into a fresh authorization attempt.
    fn recover<T, N>(&mut self, fetched: Result<T>, navigator: &mut N) -> Result<Outcome<T>>
    where
        N: Navigator + ?Sized,
    {
        match fetched {
            Ok(data) => Ok(Outcome::Loaded(data)),
            Err(e) if e.is_authorization_expired() => {
                warn!("access token was rejected: {e}");
                self.store.clear_token()?;
                self.reauthorize(navigator)
            }
            Err(e) => Err(e),
        }
    }

    fn reauthorize<T, N>(&mut self, navigator: &mut N) -> Result<Outcome<T>>
    where
        N: Navigator + ?Sized,
    {
        self.auth.begin(&mut self.store, navigator)?;
        Ok(Outcome::Redirected)
    }

    /// Fetches the tracks of one playlist, most popular first.
    ///
    /// Independent of any other track fetch and safe to repeat. A token
    /// the provider rejects is cleared and authorization starts over.
    ///
    /// # Errors
    ///
    /// See [`WebApi::playlist_tracks`].
    pub async fn popular_tracks<N>(
        &mut self,
        token: &TokenEnvelope,
        playlist_id: &str,
        navigator: &mut N,
    ) -> Result<Outcome<Vec<Track>>>
    where
        N: Navigator + ?Sized,
    {
        let tracks = self
            .api
            .playlist_tracks(&token.access_token, playlist_id)
            .await;
        self.recover(tracks, navigator)
    }

    /// Forgets the token and verifier and returns to the root document.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be cleared; the location is
    /// left alone then.
    pub fn logout<N>(&mut self, navigator: &mut N) -> Result<()>
    where
        N: Navigator + ?Sized,
    {
        self.store.clear()?;
        info!("logged out");

        let root = navigator::root_of(navigator.location());
        navigator.replace(root);
        Ok(())
    }
}
