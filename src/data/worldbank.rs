//! World Bank indicator API client.
//!
//! API: `GET {base}/{country}/indicator/{indicator}?date={start}:{end}&format=json`
//! Auth: none.
//!
//! One call per fetch, no retry. The caller decides whether to try again.

use reqwest::Url;
use reqwest::blocking::Client;
use reqwest::header::ACCEPT;
use tracing::debug;

use crate::data::decode::decode_series;
use crate::domain::{Series, SeriesQuery};
use crate::error::{FetchError, TransportError};

pub const DEFAULT_BASE_URL: &str = "https://api.worldbank.org/v2/country";

#[derive(Debug, Clone)]
pub struct WorldBankClient {
    client: Client,
    base_url: String,
}

impl WorldBankClient {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build the request URL for `query`.
    ///
    /// Country and indicator codes are appended as path segments, so they are
    /// percent-encoded but otherwise passed through untouched.
    pub fn request_url(&self, query: &SeriesQuery) -> Result<Url, TransportError> {
        let invalid = |reason: String| TransportError::InvalidUrl {
            url: self.base_url.clone(),
            reason,
        };

        let mut url = Url::parse(&self.base_url).map_err(|e| invalid(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| invalid("base URL cannot carry a path".to_string()))?
            .pop_if_empty()
            .push(&query.country)
            .push("indicator")
            .push(&query.indicator);
        url.set_query(Some(&format!(
            "date={}:{}&format=json",
            query.start_year, query.end_year
        )));
        Ok(url)
    }

    /// Issue the GET and return the body of a `200 OK` response.
    pub fn fetch_raw(&self, query: &SeriesQuery) -> Result<String, TransportError> {
        let url = self.request_url(query)?;
        debug!(%url, "fetching World Bank series");

        let resp = self
            .client
            .get(url)
            .header(ACCEPT, "application/json")
            .send()
            .map_err(|e| TransportError::Connection(e.to_string()))?;

        let status = resp.status();
        if status != reqwest::StatusCode::OK {
            return Err(TransportError::Status {
                status_code: status.as_u16(),
            });
        }

        resp.text()
            .map_err(|e| TransportError::Connection(format!("failed to read response body: {e}")))
    }

    /// Fetch and decode one series. `Ok(None)` means the provider had no data.
    pub fn fetch_series(&self, query: &SeriesQuery) -> Result<Option<Series>, FetchError> {
        let body = self.fetch_raw(query)?;
        let series = decode_series(&body)?;
        debug!(
            country = %query.country,
            indicator = %query.indicator,
            points = series.as_ref().map(|s| s.points.len()).unwrap_or(0),
            "decoded series"
        );
        Ok(series)
    }
}

impl Default for WorldBankClient {
    fn default() -> Self {
        Self::new()
    }
}
