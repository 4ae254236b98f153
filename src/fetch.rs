//! Downloading daily extracts from the open-data endpoint.

use crate::error::FetchError;
use crate::mode::Mode;
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::header::{HeaderValue, REFERER};
use reqwest::{Method, Request, Response};
use std::time::Duration;

const BASE_URL: &str = "https://opendata-tpa.transport.nsw.gov.au";
const REFERER_URL: &str = "https://opendata.transport.nsw.gov.au/";
const FETCH_TIMEOUT: Duration = Duration::from_secs(20);

#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn execute(&self, req: Request) -> reqwest::Result<Response>;
}

pub struct BasicClient(reqwest::Client);

impl BasicClient {
    pub fn new() -> Self {
        Self(reqwest::Client::new())
    }
}

impl Default for BasicClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpClient for BasicClient {
    async fn execute(&self, req: Request) -> reqwest::Result<Response> {
        self.0.execute(req).await
    }
}

/// URL of the published daily extract for a mode and date.
pub fn extract_url(mode: Mode, date: NaiveDate) -> String {
    format!(
        "{BASE_URL}/{tag}/{ym}/{tag}_{ymd}.txt",
        tag = mode.tag(),
        ym = date.format("%Y-%m"),
        ymd = date.format("%Y%m%d"),
    )
}

/// Downloads one daily extract.
///
/// The endpoint requires an open-data referer header. A non-success status
/// is reported as [`FetchError::NotFound`] so a date-range run can skip
/// unpublished days and keep going.
pub async fn fetch_extract<C: HttpClient>(
    client: &C,
    mode: Mode,
    date: NaiveDate,
) -> Result<Vec<u8>, FetchError> {
    let url = extract_url(mode, date);
    let parsed = url
        .parse()
        .map_err(|_| FetchError::InvalidUrl { url: url.clone() })?;

    let mut req = Request::new(Method::GET, parsed);
    req.headers_mut()
        .insert(REFERER, HeaderValue::from_static(REFERER_URL));
    *req.timeout_mut() = Some(FETCH_TIMEOUT);

    let resp = client.execute(req).await?;
    let status = resp.status();
    if !status.is_success() {
        return Err(FetchError::NotFound {
            url,
            status: status.as_u16(),
        });
    }
    Ok(resp.bytes().await?.to_vec())
}
