//! Spotify playlist browser with PKCE authorization.
//!
//! tuneshelf signs a user in with the OAuth 2.0 Authorization Code flow
//! with PKCE, keeps the resulting access token between runs and shows the
//! user's profile, playlists and the most popular tracks of a playlist.
//!
//! # Architecture
//!
//! * [`pkce`] - code verifier and challenge generation
//! * [`session_store`] - verifier and token persistence over a
//!   [`storage::KeyValueStore`]
//! * [`auth`] - authorization redirect and code exchange
//! * [`api`] - paginated Web API fetches
//! * [`session`] - the page load state machine tying it all together
//!
//! Host capabilities (HTTP, storage, navigation and hashing) are traits so
//! the flow can run against fakes in tests.
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

#[macro_use]
extern crate log;

pub mod api;
pub mod auth;
pub mod client_id;
pub mod config;
pub mod error;
pub mod http;
pub mod navigator;
pub mod pkce;
pub mod protocol;
pub mod render;
pub mod session;
pub mod session_store;
pub mod storage;
pub mod token;
