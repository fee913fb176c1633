//! Location and navigation capability of the host.
//!
//! The session logic never touches a browser window or terminal directly.
//! It reads the current location and requests navigation through a
//! [`Navigator`]:
//! * [`Navigator::assign`] hands the user off to another page; nothing runs
//!   afterwards in the current page context
//! * [`Navigator::replace`] rewrites the current location in place without
//!   navigating, to drop one-time parameters from the visible URL

use url::Url;

pub trait Navigator {
    /// The location the host currently shows.
    fn location(&self) -> &Url;

    /// Navigates away to `url`.
    fn assign(&mut self, url: Url);

    /// Replaces the current location without navigating.
    fn replace(&mut self, url: Url);
}

/// Returns the first value of query parameter `name` in `url`.
///
/// An empty value counts as absent.
#[must_use]
pub fn query_param(url: &Url, name: &str) -> Option<String> {
    url.query_pairs()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())
}

/// The root document of the origin `url` belongs to.
#[must_use]
pub fn root_of(url: &Url) -> Url {
    let mut root = url.clone();
    root.set_path("/");
    root.set_query(None);
    root.set_fragment(None);
    root
}

/// Navigator for terminal hosts.
///
/// A terminal cannot follow a redirect itself, so assigned locations are
/// printed for the user to open in a browser, and kept for inspection.
#[derive(Clone, Debug)]
pub struct Terminal {
    location: Url,
    assigned: Option<Url>,
}

impl Terminal {
    #[must_use]
    pub fn new(location: Url) -> Self {
        Self {
            location,
            assigned: None,
        }
    }

    /// The last location navigated to, if any.
    #[must_use]
    pub fn assigned(&self) -> Option<&Url> {
        self.assigned.as_ref()
    }
}

impl Navigator for Terminal {
    fn location(&self) -> &Url {
        &self.location
    }

    fn assign(&mut self, url: Url) {
        debug!("navigating to {}", url.path());
        println!("Open this page in your browser:\n\n  {url}\n");
        self.location = url.clone();
        self.assigned = Some(url);
    }

    fn replace(&mut self, url: Url) {
        trace!("replacing location with {url}");
        self.location = url;
    }
}
