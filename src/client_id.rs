//! Spotify application client identifier.
//!
//! The client ID identifies the application registered in the Spotify
//! developer dashboard. It is public, not a secret, but it is usually kept
//! alongside local configuration in a secrets file:
//!
//! ```toml
//! client_id = "1fd1e055d2704f3bbec35e869034d71b"
//! ```

use std::{fmt, fs, path::Path, str::FromStr};

use serde::Deserialize;

use crate::error::{Error, Result};

/// A validated client ID: 32 ASCII hexadecimal digits.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClientId(String);

impl ClientId {
    const LENGTH: usize = 32;

    /// Secrets files larger than this are refused before reading.
    const MAX_FILE_SIZE: u64 = 1024;

    /// Reads the client ID from the `client_id` key of a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is too large, is not
    /// valid TOML or does not contain a valid client ID.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        #[derive(Deserialize)]
        struct Secrets {
            client_id: Option<String>,
        }

        let path = path.as_ref();

        // Prevent out-of-memory condition: secrets file should be small.
        let file_size = fs::metadata(path)?.len();
        if file_size > Self::MAX_FILE_SIZE {
            return Err(Error::invalid_argument(format!(
                "{} is too large",
                path.display()
            )));
        }

        let contents = fs::read_to_string(path)?;
        let secrets: Secrets = toml::from_str(&contents)?;
        match secrets.client_id {
            Some(client_id) => client_id.parse(),
            None => Err(Error::invalid_argument(format!(
                "{} does not contain a client_id",
                path.display()
            ))),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for ClientId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();

        let chars = s.chars().count();
        if chars != Self::LENGTH {
            return Err(Error::invalid_argument(format!(
                "client id should be {} characters long but is {chars}",
                Self::LENGTH
            )));
        }

        if !s.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(Error::invalid_argument(
                "client id should only contain hexadecimal digits",
            ));
        }

        Ok(Self(s.to_owned()))
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
