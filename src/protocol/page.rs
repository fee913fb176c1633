//! Offset-paginated collections.
//!
//! # Wire Format
//!
//! ```json
//! {
//!     "href": "https://api.spotify.com/v1/me/playlists?offset=0&limit=50",
//!     "items": [...],
//!     "limit": 50,
//!     "next": "https://api.spotify.com/v1/me/playlists?offset=50&limit=50",
//!     "offset": 0,
//!     "previous": null,
//!     "total": 120
//! }
//! ```
//!
//! `next` is `null` on the last page.

use serde::{de::DeserializeOwned, Deserialize};

use crate::{error::Result, protocol};

/// One page of a collection.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,

    /// Continuation link; absent or `null` when exhausted.
    #[serde(default)]
    pub next: Option<String>,

    #[serde(default)]
    pub offset: Option<u64>,

    #[serde(default)]
    pub total: Option<u64>,
}

impl<T> Page<T>
where
    T: DeserializeOwned,
{
    /// Parses a page from a response body.
    ///
    /// Returns `Ok(None)` when the body is JSON but carries no `items`
    /// array, which ends pagination rather than failing it.
    ///
    /// # Errors
    ///
    /// Returns an error if the body is not JSON, or if `items` holds
    /// entries that do not match `T`.
    pub fn from_body(body: &str, origin: &str) -> Result<Option<Self>> {
        let value: serde_json::Value = protocol::json(body, origin)?;
        if !value.get("items").is_some_and(serde_json::Value::is_array) {
            return Ok(None);
        }

        serde_json::from_value(value).map(Some).map_err(Into::into)
    }
}

impl<T> Page<T> {
    /// Whether the provider reports another page after this one.
    #[must_use]
    pub fn has_next(&self) -> bool {
        self.next.is_some()
    }
}
