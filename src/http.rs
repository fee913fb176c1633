//! HTTP capability and the rate-limited client for Spotify's APIs.
//!
//! The authorization flow and the API client only see the [`HttpClient`]
//! trait, which exchanges plain `http` requests and responses with string
//! bodies. Non-success statuses are returned as responses so callers can
//! classify them; only transport failures are errors.
//!
//! [`Client`] implements the trait on top of `reqwest::Client` and adds:
//! * Request rate limiting to stay within Spotify's rolling-window quota
//! * An optional timeout covering the request and its response body
//! * Consistent `User-Agent` and `Accept-Language` headers
//!
//! # Rate Limiting
//!
//! Spotify computes its limit over a rolling 30-second window. The client
//! allows bursts of up to 100 requests and then paces requests evenly over
//! the window; requests that would exceed the quota are delayed, not
//! dropped.
//!
//! # Example
//!
//! ```rust
//! use tuneshelf::http::{self, Client, HttpClient};
//!
//! let client = Client::new(&config)?;
//! let request = http::get(&url, access_token)?;
//! let response = client.execute(request).await?;
//! ```

use std::{future::Future, num::NonZeroU32, time::Duration};

use async_trait::async_trait;
use governor::{DefaultDirectRateLimiter, Quota};
use reqwest::header::{HeaderValue, ACCEPT_LANGUAGE, AUTHORIZATION, CONTENT_TYPE};
use url::{form_urlencoded, Url};

use crate::{config::Config, error::Result};

/// Issues HTTP requests on behalf of the session.
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Sends `request` and returns the complete response.
    ///
    /// # Errors
    ///
    /// Returns an error when no response could be obtained. Any response,
    /// whatever its status, is `Ok`.
    async fn execute(&self, request: http::Request<String>) -> Result<http::Response<String>>;
}

/// Builds a `GET` request authorized with a bearer `access_token`.
///
/// # Errors
///
/// Returns an error if the token cannot be used as a header value.
pub fn get(url: &Url, access_token: &str) -> Result<http::Request<String>> {
    let mut authorization = HeaderValue::from_str(&format!("Bearer {access_token}"))?;
    authorization.set_sensitive(true);

    http::Request::get(url.as_str())
        .header(AUTHORIZATION, authorization)
        .body(String::new())
        .map_err(Into::into)
}

/// Builds a `POST` request with a form-encoded body.
///
/// # Errors
///
/// Returns an error if the URL is not a valid request URI.
pub fn post_form<'a, I>(url: &Url, fields: I) -> Result<http::Request<String>>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let body = form_urlencoded::Serializer::new(String::new())
        .extend_pairs(fields)
        .finish();

    http::Request::post(url.as_str())
        .header(CONTENT_TYPE, Client::FORM_CONTENT)
        .body(body)
        .map_err(Into::into)
}

/// HTTP client with built-in rate limiting and an optional timeout.
pub struct Client {
    /// Transport; every request through it passes `rate_limiter` first.
    client: reqwest::Client,

    rate_limiter: DefaultDirectRateLimiter,

    /// Upper bound on a request and its body. `None` waits indefinitely.
    timeout: Option<Duration>,
}

impl Client {
    /// Length of Spotify's rolling rate limit window.
    const RATE_LIMIT_INTERVAL: Duration = Duration::from_secs(30);

    /// Maximum calls per interval before requests are delayed.
    const RATE_LIMIT_CALLS_PER_INTERVAL: u8 = 100;

    /// Duration to keep idle connections alive.
    const KEEPALIVE_TIMEOUT: Duration = Duration::from_secs(60);

    /// The `Content-Type` of token endpoint requests.
    const FORM_CONTENT: HeaderValue = HeaderValue::from_static("application/x-www-form-urlencoded");

    /// Creates a new client from `config`.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be created.
    ///
    /// # Panics
    ///
    /// Panics if rate limit parameters are zero.
    pub fn new(config: &Config) -> Result<Self> {
        // Not having `Accept-Language` set is non-fatal.
        let mut headers = reqwest::header::HeaderMap::new();
        if let Ok(lang) = HeaderValue::from_str(&config.app_lang) {
            headers.insert(ACCEPT_LANGUAGE, lang);
        }

        let http_client = reqwest::Client::builder()
            .tcp_keepalive(Self::KEEPALIVE_TIMEOUT)
            .default_headers(headers)
            .user_agent(&config.user_agent)
            .build()?;

        let replenish_interval =
            Self::RATE_LIMIT_INTERVAL / u32::from(Self::RATE_LIMIT_CALLS_PER_INTERVAL);
        let quota = Quota::with_period(replenish_interval)
            .expect("quota time interval is zero")
            .allow_burst(
                NonZeroU32::new(Self::RATE_LIMIT_CALLS_PER_INTERVAL.into())
                    .expect("calls per interval is zero"),
            );

        if let Some(timeout) = config.request_timeout {
            debug!("request timeout: {:.1}s", timeout.as_secs_f32());
        }

        Ok(Self {
            client: http_client,
            rate_limiter: governor::RateLimiter::direct(quota),
            timeout: config.request_timeout,
        })
    }

    async fn send(&self, request: reqwest::Request) -> Result<http::Response<String>> {
        let response = self.client.execute(request).await?;

        let mut builder = http::Response::builder()
            .status(response.status())
            .version(response.version());
        if let Some(headers) = builder.headers_mut() {
            headers.extend(
                response
                    .headers()
                    .iter()
                    .map(|(name, value)| (name.clone(), value.clone())),
            );
        }

        let body = response.text().await?;
        builder.body(body).map_err(Into::into)
    }

    async fn with_timeout<F, T>(&self, future: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        match self.timeout {
            Some(timeout) => tokio::time::timeout(timeout, future).await?,
            None => future.await,
        }
    }
}

#[async_trait]
impl HttpClient for Client {
    async fn execute(&self, request: http::Request<String>) -> Result<http::Response<String>> {
        // Check the request early to not needlessly hit the rate limiter.
        let request = reqwest::Request::try_from(request)?;

        self.rate_limiter.until_ready().await;

        trace!("{} {}", request.method(), request.url().path());
        self.with_timeout(self.send(request)).await
    }
}
