//! Site base-URL handling for the auction client.

use reqwest::Url;

use crate::error::ScraperError;

/// Normalizes a county site to `(origin, host)`.
///
/// Accepts a bare hostname (`manatee.realforeclose.com`, which gets `https://`)
/// or a full URL, whose path is dropped.
///
/// # Errors
///
/// Returns [`ScraperError::InvalidUrl`] if no host can be extracted.
pub fn site_origin(site: &str) -> Result<(String, String), ScraperError> {
    let trimmed = site.trim().trim_end_matches('/');
    let candidate = if trimmed.contains("://") {
        trimmed.to_owned()
    } else {
        format!("https://{trimmed}")
    };

    let url = Url::parse(&candidate).map_err(|e| ScraperError::InvalidUrl {
        url: site.to_owned(),
        reason: e.to_string(),
    })?;
    let host = url
        .host_str()
        .filter(|h| !h.is_empty())
        .ok_or_else(|| ScraperError::InvalidUrl {
            url: site.to_owned(),
            reason: "no host".to_owned(),
        })?
        .to_owned();

    Ok((url.origin().ascii_serialization(), host))
}
