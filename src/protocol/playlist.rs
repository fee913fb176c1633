//! Playlists and their track entries.
//!
//! # Wire Format
//!
//! Playlist:
//! ```json
//! {
//!     "collaborative": false,
//!     "description": "Songs for Sunday",
//!     "external_urls": { "spotify": "https://open.spotify.com/playlist/p" },
//!     "href": "https://api.spotify.com/v1/playlists/p",
//!     "id": "p",
//!     "images": [{ "url": "https://mosaic.scdn.co/640/ab67", "height": 640, "width": 640 }],
//!     "name": "Sunday",
//!     "owner": { "display_name": "Listener", "id": "listener", "type": "user", ... },
//!     "public": true,
//!     "snapshot_id": "MTIs...",
//!     "tracks": { "href": "https://api.spotify.com/v1/playlists/p/tracks", "total": 42 },
//!     "type": "playlist",
//!     "uri": "spotify:playlist:p"
//! }
//! ```
//!
//! Playlist track entry:
//! ```json
//! {
//!     "added_at": "2024-01-01T12:00:00Z",
//!     "added_by": { "id": "listener", "type": "user", ... },
//!     "is_local": false,
//!     "track": { ... }
//! }
//! ```
//!
//! `track` is `null` for tracks that were removed from the catalogue.

use serde::Deserialize;
use serde_with::{serde_as, DefaultOnNull};

use super::{track::Track, ExternalUrls, Image};

#[serde_as]
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(default)]
pub struct Playlist {
    pub collaborative: bool,
    #[serde_as(as = "DefaultOnNull")]
    pub description: String,
    pub external_urls: ExternalUrls,
    pub href: String,
    pub id: String,
    #[serde_as(as = "DefaultOnNull")]
    pub images: Vec<Image>,
    pub name: String,
    pub owner: Owner,
    /// `None` when the playlist's public status is not relevant, such as
    /// for collaborative playlists.
    pub public: Option<bool>,
    pub snapshot_id: String,
    pub tracks: TracksRef,
    #[serde(rename = "type")]
    pub kind: String,
    pub uri: String,
}

impl Playlist {
    /// The first, usually largest, cover image.
    #[must_use]
    pub fn image(&self) -> Option<&Image> {
        self.images.first()
    }

    #[must_use]
    pub fn is_public(&self) -> bool {
        self.public.unwrap_or(false)
    }
}

#[serde_as]
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(default)]
pub struct Owner {
    #[serde_as(as = "DefaultOnNull")]
    pub display_name: String,
    pub external_urls: ExternalUrls,
    pub href: String,
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub uri: String,
}

/// Reference to a playlist's tracks, without the tracks themselves.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(default)]
pub struct TracksRef {
    pub href: String,
    pub total: u64,
}

#[serde_as]
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(default)]
pub struct PlaylistTrackEntry {
    pub added_at: Option<String>,
    #[serde_as(as = "DefaultOnNull")]
    pub added_by: Owner,
    pub is_local: bool,
    /// `None` for tracks removed from the catalogue.
    pub track: Option<Track>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_playlist_with_null_images() {
        let playlist: Playlist = serde_json::from_str(
            r#"{
                "collaborative": false,
                "description": null,
                "external_urls": { "spotify": "https://open.spotify.com/playlist/p" },
                "href": "https://api.spotify.com/v1/playlists/p",
                "id": "p",
                "images": null,
                "name": "Sunday",
                "owner": { "display_name": null, "id": "listener", "type": "user" },
                "public": true,
                "snapshot_id": "MTIs",
                "tracks": { "href": "https://api.spotify.com/v1/playlists/p/tracks", "total": 42 },
                "type": "playlist",
                "uri": "spotify:playlist:p"
            }"#,
        )
        .unwrap();

        assert_eq!(playlist.name, "Sunday");
        assert!(playlist.image().is_none());
        assert!(playlist.is_public());
        assert_eq!(playlist.tracks.total, 42);
    }

    #[test]
    fn removed_tracks_parse_as_none() {
        let entry: PlaylistTrackEntry = serde_json::from_str(
            r#"{ "added_at": "2024-01-01T12:00:00Z", "added_by": null, "is_local": false, "track": null }"#,
        )
        .unwrap();
        assert!(entry.track.is_none());
    }
}
