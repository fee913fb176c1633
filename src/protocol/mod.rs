//! Wire types of the Spotify Accounts service and Web API.
//!
//! # Submodules
//!
//! * [`auth`] - Token endpoint response
//! * [`page`] - Offset-paginated collection pages
//! * [`user`] - Current user's profile
//! * [`playlist`] - Playlists and their track entries
//! * [`track`] - Tracks, albums and artists
//!
//! Records mirror the provider's JSON. They are fetched, never mutated.
//! Fields the provider documents as nullable, or leaves out for local
//! files, fall back to their defaults instead of failing the whole page.

pub mod auth;
pub mod page;
pub mod playlist;
pub mod track;
pub mod user;

pub use auth::TokenResponse;
pub use page::Page;
pub use playlist::{Playlist, PlaylistTrackEntry};
pub use track::{Album, Artist, Track};
pub use user::UserProfile;

use std::fmt::Debug;

use serde::Deserialize;

use crate::error::Result;

/// Parses and logs JSON responses from Spotify.
///
/// # Errors
///
/// Returns error if the body is not valid JSON or does not match `T`.
///
/// # Logging
///
/// * Success: Logs parsed structure at TRACE level
/// * Parse Error: Logs raw JSON at TRACE level if valid JSON
/// * Invalid JSON: Logs error and raw text at ERROR level
pub fn json<T>(body: &str, origin: &str) -> Result<T>
where
    T: for<'de> Deserialize<'de> + Debug,
{
    match serde_json::from_str(body) {
        Ok(result) => {
            trace!("{origin}: {result:#?}");
            Ok(result)
        }
        Err(e) => {
            if let Ok(json) = serde_json::from_str::<serde_json::Value>(body) {
                trace!("{origin}: {json:#?}");
            } else {
                error!("{origin}: failed parsing response ({e:?})");
                trace!("{body}");
            }
            Err(e.into())
        }
    }
}

/// Link to a resource on the Spotify web player.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Deserialize)]
pub struct ExternalUrls {
    #[serde(default)]
    pub spotify: String,
}

/// Cover art or profile picture.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Deserialize)]
pub struct Image {
    pub url: String,
    pub height: Option<u32>,
    pub width: Option<u32>,
}
