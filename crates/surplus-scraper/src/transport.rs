//! Session and request transport for the auction platform.
//!
//! [`Transport`] is the seam between the page driver and whatever actually
//! talks to the site. [`HttpTransport`] is the plain reqwest implementation:
//! it routes everything through the configured proxy and keeps a cookie jar,
//! so listing requests carry the cookies the preview page (and every redirect
//! on the way to it) set.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use reqwest::cookie::{CookieStore, Jar};
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, REFERER};
use reqwest::{Client, Url};
use surplus_core::ProxyConfig;

use crate::error::ScraperError;

/// Redirect hops followed while opening a session.
const MAX_REDIRECTS: usize = 5;

/// Marker the platform's edge serves instead of the preview page when the
/// proxy exit is blocked.
const FORBIDDEN_MARKER: &str = "403 Forbidden";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionCookie {
    pub name: String,
    pub value: String,
}

/// Cookies collected while opening the preview page for one county/date.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    /// The page navigated to; sent as the referer on status requests.
    pub landing_url: String,
    pub cookies: Vec<SessionCookie>,
}

/// One GET against the platform within a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub url: String,
    pub referer: Option<String>,
    /// Send `X-Requested-With: XMLHttpRequest`.
    pub xhr: bool,
}

/// Navigates to pages and fetches raw response text.
pub trait Transport: Send + Sync {
    /// Loads `url` as a browser would and returns the cookies it set.
    fn navigate(&self, url: &str) -> impl Future<Output = Result<Session, ScraperError>> + Send;

    /// Performs `request` with the session's cookies and returns the body text.
    fn fetch(
        &self,
        session: &Session,
        request: &FetchRequest,
    ) -> impl Future<Output = Result<String, ScraperError>> + Send;
}

/// Lets several county clients share one transport.
impl<T: Transport> Transport for &T {
    fn navigate(&self, url: &str) -> impl Future<Output = Result<Session, ScraperError>> + Send {
        (**self).navigate(url)
    }

    fn fetch(
        &self,
        session: &Session,
        request: &FetchRequest,
    ) -> impl Future<Output = Result<String, ScraperError>> + Send {
        (**self).fetch(session, request)
    }
}

/// reqwest-backed [`Transport`], optionally through an authenticated proxy.
///
/// Redirects are followed by reqwest and every hop's `Set-Cookie` lands in
/// the shared jar, which honours `Domain`, `Path`, `Max-Age` and `Expires`.
pub struct HttpTransport {
    client: Client,
    jar: Arc<Jar>,
}

impl HttpTransport {
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the proxy or client cannot be built.
    pub fn new(
        timeout_secs: u64,
        user_agent: &str,
        proxy: Option<&ProxyConfig>,
    ) -> Result<Self, ScraperError> {
        let jar = Arc::new(Jar::default());
        let mut builder = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .cookie_provider(Arc::clone(&jar))
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS));

        if let Some(proxy) = proxy {
            let mut rp = reqwest::Proxy::all(proxy.endpoint())?;
            if let Some(username) = &proxy.username {
                rp = rp.basic_auth(username, proxy.password.as_deref().unwrap_or_default());
            }
            tracing::info!(proxy = %proxy.endpoint(), "routing auction traffic through proxy");
            builder = builder.proxy(rp);
        }

        Ok(Self {
            client: builder.build()?,
            jar,
        })
    }
}

impl Transport for HttpTransport {
    async fn navigate(&self, url: &str) -> Result<Session, ScraperError> {
        let landing = parse_url(url)?;

        let response = self
            .client
            .get(landing.clone())
            .header(
                ACCEPT,
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            )
            .header(ACCEPT_LANGUAGE, "en-US,en;q=0.9")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScraperError::UnexpectedStatus {
                status: status.as_u16(),
                url: response.url().to_string(),
            });
        }
        if response.url() != &landing {
            tracing::debug!(from = %landing, to = %response.url(), "session redirected");
        }

        let body = response.text().await?;
        if body.contains(FORBIDDEN_MARKER) {
            return Err(ScraperError::Session {
                url: url.to_owned(),
                reason: "access denied (403 Forbidden page)".to_owned(),
            });
        }

        let cookies = session_cookies(&self.jar, &landing);
        tracing::debug!(url, cookies = cookies.len(), "session opened");
        Ok(Session {
            landing_url: url.to_owned(),
            cookies,
        })
    }

    /// The jar attaches the `Cookie` header, so `session` only matters to
    /// transports without one.
    async fn fetch(
        &self,
        _session: &Session,
        request: &FetchRequest,
    ) -> Result<String, ScraperError> {
        let url = parse_url(&request.url)?;

        let mut builder = self
            .client
            .get(url)
            .header(ACCEPT, "application/json, text/javascript, */*; q=0.01")
            .header(ACCEPT_LANGUAGE, "en-US,en;q=0.9");
        if let Some(referer) = &request.referer {
            builder = builder.header(REFERER, referer);
        }
        if request.xhr {
            builder = builder.header("X-Requested-With", "XMLHttpRequest");
        }

        let response = builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ScraperError::UnexpectedStatus {
                status: status.as_u16(),
                url: request.url.clone(),
            });
        }

        Ok(response.text().await?)
    }
}

fn parse_url(url: &str) -> Result<Url, ScraperError> {
    Url::parse(url).map_err(|e| ScraperError::InvalidUrl {
        url: url.to_owned(),
        reason: e.to_string(),
    })
}

/// Cookies the jar would send to `url`.
pub(crate) fn session_cookies(jar: &Jar, url: &Url) -> Vec<SessionCookie> {
    let Some(header) = jar.cookies(url) else {
        return Vec::new();
    };
    header
        .to_str()
        .unwrap_or_default()
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .map(|(name, value)| SessionCookie {
            name: name.to_owned(),
            value: value.to_owned(),
        })
        .collect()
}
