//! Tracks, albums and artists.
//!
//! Playlists may also contain podcast episodes and local files. Those lack
//! some track fields (`album`, `popularity`, `id`), which then take their
//! defaults so that a single odd entry does not fail a whole page.

use serde::Deserialize;
use serde_with::{serde_as, DefaultOnNull};

use super::{ExternalUrls, Image};

#[serde_as]
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(default)]
pub struct Track {
    #[serde_as(as = "DefaultOnNull")]
    pub album: Album,
    #[serde_as(as = "DefaultOnNull")]
    pub artists: Vec<Artist>,
    pub disc_number: u32,
    pub duration_ms: u64,
    pub explicit: bool,
    #[serde_as(as = "DefaultOnNull")]
    pub external_ids: ExternalIds,
    pub external_urls: ExternalUrls,
    #[serde_as(as = "DefaultOnNull")]
    pub href: String,
    #[serde_as(as = "DefaultOnNull")]
    pub id: String,
    pub is_local: bool,
    pub is_playable: Option<bool>,
    pub name: String,
    /// Relative play frequency, 0 to 100.
    pub popularity: u32,
    pub preview_url: Option<String>,
    pub track_number: u32,
    #[serde(rename = "type")]
    pub kind: String,
    pub uri: String,
}

impl Track {
    /// Artist names joined by `", "`.
    #[must_use]
    pub fn artist_names(&self) -> String {
        self.artists
            .iter()
            .map(|artist| artist.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[serde_as]
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(default)]
pub struct Album {
    pub album_type: String,
    #[serde_as(as = "DefaultOnNull")]
    pub artists: Vec<Artist>,
    pub external_urls: ExternalUrls,
    #[serde_as(as = "DefaultOnNull")]
    pub href: String,
    #[serde_as(as = "DefaultOnNull")]
    pub id: String,
    #[serde_as(as = "DefaultOnNull")]
    pub images: Vec<Image>,
    pub name: String,
    #[serde_as(as = "DefaultOnNull")]
    pub release_date: String,
    #[serde_as(as = "DefaultOnNull")]
    pub release_date_precision: String,
    pub total_tracks: u32,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde_as(as = "DefaultOnNull")]
    pub uri: String,
}

#[serde_as]
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(default)]
pub struct Artist {
    pub external_urls: ExternalUrls,
    #[serde_as(as = "DefaultOnNull")]
    pub href: String,
    #[serde_as(as = "DefaultOnNull")]
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde_as(as = "DefaultOnNull")]
    pub uri: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(default)]
pub struct ExternalIds {
    pub isrc: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_track() {
        let track: Track = serde_json::from_str(
            r#"{
                "album": {
                    "album_type": "album",
                    "artists": [],
                    "external_urls": { "spotify": "https://open.spotify.com/album/1" },
                    "href": "https://api.spotify.com/v1/albums/1",
                    "id": "1",
                    "images": [],
                    "name": "Album",
                    "release_date": "1999",
                    "release_date_precision": "year",
                    "total_tracks": 12,
                    "type": "album",
                    "uri": "spotify:album:1"
                },
                "artists": [
                    { "name": "First", "id": "a", "type": "artist" },
                    { "name": "Second", "id": "b", "type": "artist" }
                ],
                "disc_number": 1,
                "duration_ms": 185000,
                "explicit": false,
                "external_ids": { "isrc": "NLA000000001" },
                "external_urls": { "spotify": "https://open.spotify.com/track/t" },
                "href": "https://api.spotify.com/v1/tracks/t",
                "id": "t",
                "is_local": false,
                "name": "Song",
                "popularity": 64,
                "preview_url": null,
                "track_number": 3,
                "type": "track",
                "uri": "spotify:track:t"
            }"#,
        )
        .unwrap();

        assert_eq!(track.popularity, 64);
        assert_eq!(track.album.name, "Album");
        assert_eq!(track.artist_names(), "First, Second");
        assert_eq!(track.preview_url, None);
        assert_eq!(track.is_playable, None);
    }

    #[test]
    fn local_files_parse_with_defaults() {
        let track: Track = serde_json::from_str(
            r#"{
                "album": { "name": "Local", "id": null, "images": [] },
                "artists": [{ "name": "Someone", "id": null, "uri": null }],
                "id": null,
                "is_local": true,
                "name": "Home Recording",
                "popularity": 0,
                "type": "track",
                "uri": "spotify:local:Someone:Local:Home+Recording:180"
            }"#,
        )
        .unwrap();

        assert!(track.is_local);
        assert_eq!(track.id, "");
        assert_eq!(track.artists[0].id, "");
    }
}
