//! Token-gated access to the Spotify Web API.
//!
//! Collections are walked with offset pagination: pages are requested one
//! at a time at increasing offsets, and the next page is only requested
//! while the previous one was full *and* reported a continuation.
//!
//! # Endpoints
//!
//! * `GET /me` - current user's profile
//! * `GET /me/playlists` - owned and followed playlists, 50 per page
//! * `GET /playlists/{id}/tracks` - a playlist's tracks, 100 per page
//!
//! # Errors
//!
//! Any non-success status aborts the whole fetch with a
//! [`FetchError`](crate::error::FetchError). A body without an `items`
//! array ends pagination with what was gathered so far.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use url::Url;

use crate::{
    error::{Error, FetchError, Result},
    http::{self, HttpClient},
    protocol::{self, Page, Playlist, PlaylistTrackEntry, Track, UserProfile},
};

pub struct WebApi<C> {
    api_url: Url,
    http_client: Arc<C>,
}

impl<C> WebApi<C>
where
    C: HttpClient,
{
    /// Page size for the playlists collection.
    pub const PLAYLISTS_PAGE_SIZE: usize = 50;

    /// Page size for a playlist's tracks.
    pub const TRACKS_PAGE_SIZE: usize = 100;

    pub fn new(api_url: Url, http_client: Arc<C>) -> Self {
        Self {
            api_url,
            http_client,
        }
    }

    /// Resolves path `segments` against the API base, escaping each one.
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.api_url.clone();
        url.path_segments_mut()
            .map_err(|()| Error::internal(format!("{} cannot be a base URL", self.api_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Fetches `url` and returns the body of a successful response.
    async fn get(&self, access_token: &str, url: &Url) -> Result<String> {
        let request = http::get(url, access_token)?;
        let response = self.http_client.execute(request).await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError {
                status,
                endpoint: url.path().to_owned(),
            }
            .into());
        }

        Ok(response.into_body())
    }

    /// Fetches the profile of the user the token belongs to.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the endpoint responds with a
    /// non-success status or the profile cannot be parsed.
    pub async fn profile(&self, access_token: &str) -> Result<UserProfile> {
        let url = self.endpoint(&["me"])?;
        let body = self.get(access_token, &url).await?;
        protocol::json(&body, url.path())
    }

    /// Fetches every item of the collection at `segments`, `limit` items
    /// per request, in collection order.
    ///
    /// # Errors
    ///
    /// Returns an error as soon as any page fails; items of earlier pages
    /// are discarded.
    pub async fn paginate<T>(
        &self,
        access_token: &str,
        segments: &[&str],
        limit: usize,
    ) -> Result<Vec<T>>
    where
        T: DeserializeOwned,
    {
        let base = self.endpoint(segments)?;
        let mut items = Vec::new();
        let mut offset = 0;

        loop {
            let mut url = base.clone();
            url.query_pairs_mut()
                .append_pair("limit", &limit.to_string())
                .append_pair("offset", &offset.to_string());

            let body = self.get(access_token, &url).await?;
            let Some(page) = Page::<T>::from_body(&body, base.path())? else {
                warn!(
                    "{}: no items in response at offset {offset}, ending pagination",
                    base.path()
                );
                break;
            };

            let count = page.items.len();
            let has_next = page.has_next();
            items.extend(page.items);
            offset += limit;

            if count != limit || !has_next {
                break;
            }
        }

        debug!("{}: fetched {} items", base.path(), items.len());
        Ok(items)
    }

    /// Fetches all playlists the user owns or follows.
    ///
    /// # Errors
    ///
    /// See [`Self::paginate`].
    pub async fn playlists(&self, access_token: &str) -> Result<Vec<Playlist>> {
        self.paginate(access_token, &["me", "playlists"], Self::PLAYLISTS_PAGE_SIZE)
            .await
    }

    /// Fetches all tracks of a playlist, most popular first.
    ///
    /// Entries whose track was removed from the catalogue are skipped.
    /// Tracks of equal popularity keep their playlist order.
    ///
    /// # Errors
    ///
    /// See [`Self::paginate`].
    pub async fn playlist_tracks(
        &self,
        access_token: &str,
        playlist_id: &str,
    ) -> Result<Vec<Track>> {
        let entries: Vec<PlaylistTrackEntry> = self
            .paginate(
                access_token,
                &["playlists", playlist_id, "tracks"],
                Self::TRACKS_PAGE_SIZE,
            )
            .await?;

        let mut tracks: Vec<Track> = entries
            .into_iter()
            .filter_map(|entry| entry.track)
            .collect();
        sort_by_popularity(&mut tracks);
        Ok(tracks)
    }
}

/// Sorts `tracks` from most to least popular, stable for equal scores.
pub fn sort_by_popularity(tracks: &mut [Track]) {
    tracks.sort_by(|a, b| b.popularity.cmp(&a.popularity));
}

/// The first `n` tracks of a popularity-sorted list.
#[must_use]
pub fn top_tracks(tracks: &[Track], n: usize) -> &[Track] {
    &tracks[..n.min(tracks.len())]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::Config, error::ErrorKind, http::Client};
    use httpmock::prelude::*;
    use serde_json::{json, Value};

    fn api(server: &MockServer) -> WebApi<Client> {
        let mut config =
            Config::with_client_id("1fd1e055d2704f3bbec35e869034d71b".parse().unwrap()).unwrap();
        config.api_url = Url::parse(&server.url("/v1")).unwrap();
        let client = Client::new(&config).unwrap();
        WebApi::new(config.api_url, Arc::new(client))
    }

    fn playlists(range: std::ops::Range<usize>) -> Vec<Value> {
        range
            .map(|i| json!({ "id": format!("p{i}"), "name": format!("Playlist {i}") }))
            .collect()
    }

    fn entry(name: &str, popularity: u32) -> Value {
        json!({ "is_local": false, "track": { "name": name, "popularity": popularity } })
    }

    #[tokio::test]
    async fn single_full_page_without_next_makes_one_request() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/v1/me/playlists")
                .query_param("limit", "50")
                .query_param("offset", "0")
                .header("authorization", "Bearer token");
            then.status(200)
                .json_body(json!({ "items": playlists(0..50), "next": null }));
        });

        let items = api(&server).playlists("token").await.unwrap();
        mock.assert_calls(1);
        assert_eq!(items.len(), 50);
    }

    #[tokio::test]
    async fn walks_pages_until_short_page() {
        let server = MockServer::start_async().await;
        let next = server.url("/v1/me/playlists?offset=x");
        let first = server.mock(|when, then| {
            when.method(GET)
                .path("/v1/me/playlists")
                .query_param("offset", "0");
            then.status(200)
                .json_body(json!({ "items": playlists(0..50), "next": next }));
        });
        let second = server.mock(|when, then| {
            when.method(GET)
                .path("/v1/me/playlists")
                .query_param("offset", "50");
            then.status(200)
                .json_body(json!({ "items": playlists(50..100), "next": next }));
        });
        let third = server.mock(|when, then| {
            when.method(GET)
                .path("/v1/me/playlists")
                .query_param("offset", "100");
            then.status(200)
                .json_body(json!({ "items": playlists(100..120), "next": null }));
        });

        let items = api(&server).playlists("token").await.unwrap();
        first.assert_calls(1);
        second.assert_calls(1);
        third.assert_calls(1);

        assert_eq!(items.len(), 120);
        assert!(items
            .iter()
            .enumerate()
            .all(|(i, playlist)| playlist.id == format!("p{i}")));
    }

    #[tokio::test]
    async fn missing_items_ends_pagination_with_accumulated_items() {
        let server = MockServer::start_async().await;
        let next = server.url("/v1/me/playlists?offset=50");
        server.mock(|when, then| {
            when.method(GET)
                .path("/v1/me/playlists")
                .query_param("offset", "0");
            then.status(200)
                .json_body(json!({ "items": playlists(0..50), "next": next }));
        });
        let second = server.mock(|when, then| {
            when.method(GET)
                .path("/v1/me/playlists")
                .query_param("offset", "50");
            then.status(200).json_body(json!({ "message": "nothing here" }));
        });

        let items = api(&server).playlists("token").await.unwrap();
        second.assert_calls(1);
        assert_eq!(items.len(), 50);
    }

    #[tokio::test]
    async fn error_status_aborts_whole_fetch() {
        let server = MockServer::start_async().await;
        let next = server.url("/v1/me/playlists?offset=50");
        server.mock(|when, then| {
            when.method(GET)
                .path("/v1/me/playlists")
                .query_param("offset", "0");
            then.status(200)
                .json_body(json!({ "items": playlists(0..50), "next": next }));
        });
        server.mock(|when, then| {
            when.method(GET)
                .path("/v1/me/playlists")
                .query_param("offset", "50");
            then.status(503);
        });

        let err = api(&server)
            .playlists("token")
            .await
            .expect_err("second page fails");
        let fetch = err.downcast::<FetchError>().expect("fetch error");
        assert_eq!(fetch.status, ::http::StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(fetch.endpoint, "/v1/me/playlists");
        assert_eq!(err.kind, ErrorKind::Unavailable);
    }

    #[tokio::test]
    async fn unauthorized_profile_is_authorization_expired() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/v1/me");
            then.status(401)
                .json_body(json!({ "error": { "status": 401, "message": "The access token expired" } }));
        });

        let err = api(&server).profile("token").await.expect_err("401");
        assert!(err.is_authorization_expired());
    }

    #[tokio::test]
    async fn playlist_tracks_skip_removed_and_sort_by_popularity() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/v1/playlists/37i9dQZF1DXcBWIGoYBM5M/tracks")
                .query_param("limit", "100")
                .query_param("offset", "0");
            then.status(200).json_body(json!({
                "items": [
                    entry("low", 10),
                    { "is_local": false, "track": null },
                    entry("high", 90),
                    entry("mid", 50),
                    entry("also mid", 50),
                ],
                "next": null
            }));
        });

        let tracks = api(&server)
            .playlist_tracks("token", "37i9dQZF1DXcBWIGoYBM5M")
            .await
            .unwrap();
        mock.assert_calls(1);

        let names: Vec<&str> = tracks.iter().map(|track| track.name.as_str()).collect();
        assert_eq!(names, ["high", "mid", "also mid", "low"]);
    }

    #[test]
    fn endpoint_escapes_segments() {
        let client = Client::new(
            &Config::with_client_id("1fd1e055d2704f3bbec35e869034d71b".parse().unwrap()).unwrap(),
        )
        .unwrap();
        let api = WebApi::new(Url::parse("https://api.spotify.com/v1").unwrap(), Arc::new(client));

        let url = api.endpoint(&["playlists", "a/b c", "tracks"]).unwrap();
        assert_eq!(url.as_str(), "https://api.spotify.com/v1/playlists/a%2Fb%20c/tracks");
    }

    #[test]
    fn top_tracks_takes_at_most_n() {
        let tracks: Vec<Track> = (0..15)
            .map(|i| Track {
                popularity: 100 - i,
                ..Track::default()
            })
            .collect();
        assert_eq!(top_tracks(&tracks, 10).len(), 10);
        assert_eq!(top_tracks(&tracks[..3], 10).len(), 3);
        assert!(top_tracks(&[], 10).is_empty());
    }
}
