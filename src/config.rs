use std::time::Duration;

use url::Url;

use crate::{client_id::ClientId, error::Result};

/// Application and provider settings shared by the authorization flow, the
/// API client and the session bootstrapper.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Config {
    pub app_name: String,
    pub app_version: String,
    pub app_lang: String,

    pub client_id: ClientId,

    /// Must match the redirect URI registered for `client_id` exactly.
    pub redirect_uri: Url,
    pub scopes: Vec<String>,

    pub authorize_url: Url,
    pub token_url: Url,
    /// Base of the Web API, without trailing slash.
    pub api_url: Url,

    /// Per-request timeout. `None` waits for responses indefinitely.
    pub request_timeout: Option<Duration>,

    pub user_agent: String,
}

impl Config {
    pub const REDIRECT_URI: &'static str = "http://127.0.0.1:5173/callback";
    pub const AUTHORIZE_URL: &'static str = "https://accounts.spotify.com/authorize";
    pub const TOKEN_URL: &'static str = "https://accounts.spotify.com/api/token";
    pub const API_URL: &'static str = "https://api.spotify.com/v1";

    /// Private profile, email, private and collaborative playlists.
    pub const SCOPES: [&'static str; 4] = [
        "user-read-private",
        "user-read-email",
        "playlist-read-private",
        "playlist-read-collaborative",
    ];

    /// Creates a configuration for `client_id` with the Spotify defaults.
    ///
    /// # Errors
    ///
    /// Will return `Err` if any of the built-in URLs fails to parse.
    ///
    /// # Panics
    ///
    /// Panics when the application name or version contain characters that
    /// are not allowed in a `User-Agent` product token.
    pub fn with_client_id(client_id: ClientId) -> Result<Self> {
        let app_name = env!("CARGO_PKG_NAME").to_owned();
        let app_version = env!("CARGO_PKG_VERSION").to_owned();
        let app_lang = "en".to_owned();

        // Additional `User-Agent` string checks on top of `reqwest::HeaderValue`.
        let illegal_chars = |chr| chr == '/' || chr == ';';
        assert!(
            !(app_name.is_empty()
                || app_name.contains(illegal_chars)
                || app_version.is_empty()
                || app_version.contains(illegal_chars)),
            "application name and/or version invalid (\"{app_name}\"; \"{app_version}\")"
        );

        let os_name = match std::env::consts::OS {
            "macos" => "osx",
            other => other,
        };
        let os_version = sysinfo::System::os_version()
            .filter(|version| !version.is_empty() && !version.contains(illegal_chars))
            .unwrap_or_else(|| String::from("0"));

        let user_agent = format!("{app_name}/{app_version} (Rust; {os_name}/{os_version})");
        trace!("user agent: {user_agent}");

        Ok(Self {
            app_name,
            app_version,
            app_lang,

            client_id,

            redirect_uri: Url::parse(Self::REDIRECT_URI)?,
            scopes: Self::SCOPES.iter().map(ToString::to_string).collect(),

            authorize_url: Url::parse(Self::AUTHORIZE_URL)?,
            token_url: Url::parse(Self::TOKEN_URL)?,
            api_url: Url::parse(Self::API_URL)?,

            request_timeout: None,

            user_agent,
        })
    }

    /// The space-separated scope list sent to the authorization endpoint.
    #[must_use]
    pub fn scope(&self) -> String {
        self.scopes.join(" ")
    }
}
