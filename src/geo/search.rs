//! Place search service client.
//!
//! [`PlaceSearch`] is the contract the resolver needs; [`NominatimClient`] is the
//! OpenStreetMap Nominatim implementation used by the binary.

use std::future::Future;
use std::time::Duration;

use reqwest::Client;

use crate::constants::CONNECT_TIMEOUT_SECS;
use crate::error::PrayerError;
use crate::geo::types::RawPlace;

/// Free-text place search.
pub trait PlaceSearch {
    /// Return up to `limit` raw hits for `text`, in the service's order.
    fn search(
        &self,
        text: &str,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<RawPlace>, PrayerError>>;
}

/// HTTP client for Nominatim's `/search` endpoint.
///
/// Non-2xx responses become [`PrayerError::UnexpectedStatus`]; nothing is retried.
pub struct NominatimClient {
    client: Client,
    base_url: String,
}

impl NominatimClient {
    /// Creates a client with the given base URL, `User-Agent` and request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`PrayerError::Http`] if the underlying `reqwest::Client` cannot be built.
    pub fn new(base_url: &str, user_agent: &str, timeout_secs: u64) -> Result<Self, PrayerError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub(crate) fn search_url(&self) -> String {
        format!("{}/search", self.base_url)
    }
}

impl PlaceSearch for NominatimClient {
    async fn search(&self, text: &str, limit: usize) -> Result<Vec<RawPlace>, PrayerError> {
        let url = self.search_url();
        let limit = limit.to_string();
        log_debug!("Place search: \"{}\" (limit {})", text, limit);

        let response = self
            .client
            .get(&url)
            .header(reqwest::header::ACCEPT_LANGUAGE, "en")
            .query(&[
                ("q", text),
                ("format", "json"),
                ("addressdetails", "1"),
                ("limit", limit.as_str()),
                ("accept-language", "en"),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(PrayerError::UnexpectedStatus {
                status: status.as_u16(),
                url,
            });
        }

        let body = response.text().await?;
        let hits: Vec<RawPlace> =
            serde_json::from_str(&body).map_err(|source| PrayerError::Deserialize {
                context: format!("place search for \"{text}\""),
                source,
            })?;
        log_debug!("Place search returned {} hits", hits.len());
        Ok(hits)
    }
}
