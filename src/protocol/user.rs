//! Current user's profile.
//!
//! # Wire Format
//!
//! ```json
//! {
//!     "country": "NL",
//!     "display_name": "Listener",
//!     "email": "listener@example.com",
//!     "explicit_content": { "filter_enabled": false, "filter_locked": false },
//!     "external_urls": { "spotify": "https://open.spotify.com/user/listener" },
//!     "followers": { "href": null, "total": 3 },
//!     "href": "https://api.spotify.com/v1/users/listener",
//!     "id": "listener",
//!     "images": [{ "url": "https://i.scdn.co/image/ab67", "height": 300, "width": 300 }],
//!     "product": "premium",
//!     "type": "user",
//!     "uri": "spotify:user:listener"
//! }
//! ```

use serde::Deserialize;
use serde_with::{serde_as, DefaultOnNull};

use super::{ExternalUrls, Image};

#[serde_as]
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(default)]
pub struct UserProfile {
    pub country: String,
    #[serde_as(as = "DefaultOnNull")]
    pub display_name: String,
    pub email: String,
    pub explicit_content: ExplicitContent,
    pub external_urls: ExternalUrls,
    pub followers: Followers,
    pub href: String,
    pub id: String,
    #[serde_as(as = "DefaultOnNull")]
    pub images: Vec<Image>,
    pub product: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub uri: String,
}

impl UserProfile {
    /// The first, usually largest, profile picture.
    #[must_use]
    pub fn image(&self) -> Option<&Image> {
        self.images.first()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(default)]
pub struct ExplicitContent {
    pub filter_enabled: bool,
    pub filter_locked: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(default)]
pub struct Followers {
    pub href: Option<String>,
    pub total: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_profile() {
        let profile: UserProfile = serde_json::from_str(
            r#"{
                "country": "NL",
                "display_name": null,
                "email": "listener@example.com",
                "explicit_content": { "filter_enabled": false, "filter_locked": false },
                "external_urls": { "spotify": "https://open.spotify.com/user/listener" },
                "followers": { "href": null, "total": 3 },
                "href": "https://api.spotify.com/v1/users/listener",
                "id": "listener",
                "images": [],
                "product": "premium",
                "type": "user",
                "uri": "spotify:user:listener"
            }"#,
        )
        .unwrap();

        assert_eq!(profile.id, "listener");
        assert_eq!(profile.display_name, "");
        assert_eq!(profile.followers.total, 3);
        assert_eq!(profile.kind, "user");
        assert!(profile.image().is_none());
    }
}
