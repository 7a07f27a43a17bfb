//! Job API client.
//!
//! `JobApi` is the seam between the pipeline and the network: the fetch
//! cache is generic over it, and tests substitute a counting mock. The
//! production implementation is `HttpJobApi` over reqwest.
//!
//! The API's error shape is `{"description": "..."}` with a non-2xx status.
//! When that decodes, callers get `DevscoutError::Api` with the server's
//! message; otherwise the transport error is passed through.

use std::time::Duration;

use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use url::Url;

use crate::error::{DevscoutError, Result};
use crate::types::{ApiErrorBody, DetailResponse, JobDetail, JobSummary, SearchResponse};

/// Request timeout for job API calls.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Remote job API.
pub trait JobApi: Send + Sync + 'static {
    /// Fetch summary records matching a search string.
    fn search_jobs(
        &self,
        text: &str,
    ) -> impl std::future::Future<Output = Result<Vec<JobSummary>>> + Send;

    /// Fetch the full record for one job id.
    fn job_detail(&self, id: u64) -> impl std::future::Future<Output = Result<JobDetail>> + Send;
}

/// HTTP implementation of [`JobApi`].
pub struct HttpJobApi {
    client: Client,
    base_url: Url,
}

impl HttpJobApi {
    /// Create a client against the given base URL.
    pub fn new(base_url: Url) -> Result<Self> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self { client, base_url })
    }

    /// `GET <base>?search=<text>`
    fn search_url(&self, text: &str) -> Url {
        let mut url = self.base_url.clone();
        url.query_pairs_mut().append_pair("search", text);
        url
    }

    /// `GET <base>/<id>`
    fn detail_url(&self, id: u64) -> Result<Url> {
        let raw = format!("{}/{id}", self.base_url.as_str().trim_end_matches('/'));
        Url::parse(&raw).map_err(|e| DevscoutError::Config(format!("invalid job URL '{raw}': {e}")))
    }
}

impl JobApi for HttpJobApi {
    async fn search_jobs(&self, text: &str) -> Result<Vec<JobSummary>> {
        let response = self.client.get(self.search_url(text)).send().await?;
        let envelope: SearchResponse = read_json(response).await?;
        Ok(envelope.job_items)
    }

    async fn job_detail(&self, id: u64) -> Result<JobDetail> {
        let response = self.client.get(self.detail_url(id)?).send().await?;
        let envelope: DetailResponse = read_json(response).await?;
        Ok(envelope.job_item)
    }
}

/// Decode a success body, or map a non-2xx response to an error.
async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json::<T>().await?);
    }

    // Hold the transport-level error in case the body isn't the API's
    // error shape.
    let http_err = response.error_for_status_ref().err();
    let body = response.bytes().await.unwrap_or_default();
    Err(match decode_api_error(status.as_u16(), &body) {
        Some(api_err) => api_err,
        None => match http_err {
            Some(e) => DevscoutError::Http(e),
            None => DevscoutError::Api {
                status: status.as_u16(),
                message: format!("request failed with status {status}"),
            },
        },
    })
}

/// Decode the API's `{"description": ...}` error body, if that's what it is.
pub(crate) fn decode_api_error(status: u16, body: &[u8]) -> Option<DevscoutError> {
    serde_json::from_slice::<ApiErrorBody>(body)
        .ok()
        .map(|b| DevscoutError::Api {
            status,
            message: b.description,
        })
}
