use std::time::Duration;

use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use shorten_logging::{shorten_debug, shorten_warn};
use url::Url;

use crate::types::ErrorBody;
use crate::{ClientError, ClientErrorKind, Envelope, ShortenRecord, SubmitRequest};

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080/api/v1";

const SUBMIT_FALLBACK: &str = "Failed to submit URL";
const LOOKUP_FALLBACK: &str = "Failed to get URL";
const DECODE_FALLBACK: &str = "Failed to decode URL";
const NOT_FOUND_MESSAGE: &str = "URL not found";

#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub base_url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// The three calls the shortening service exposes. No retries happen here.
#[async_trait::async_trait]
pub trait ApiClient: Send + Sync {
    /// `POST /encode`. The envelope's `data` may be empty.
    async fn submit(
        &self,
        long_url: &str,
        callback_url: Option<&str>,
    ) -> Result<Envelope<serde_json::Value>, ClientError>;

    /// `GET /urls/long`. A 404 fails with [`ClientErrorKind::NotFound`].
    async fn lookup_by_long_url(
        &self,
        long_url: &str,
    ) -> Result<Envelope<ShortenRecord>, ClientError>;

    /// `GET /decode`.
    async fn lookup_by_short_url(
        &self,
        shorten_url: &str,
    ) -> Result<Envelope<ShortenRecord>, ClientError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestApiClient {
    base_url: String,
    client: reqwest::Client,
}

impl ReqwestApiClient {
    pub fn new(settings: ClientSettings) -> Result<Self, ClientError> {
        let base_url = settings.base_url.trim().trim_end_matches('/').to_string();
        let parsed = Url::parse(&base_url)
            .map_err(|err| ClientError::new(ClientErrorKind::InvalidBaseUrl, err.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ClientError::new(
                ClientErrorKind::InvalidBaseUrl,
                format!("unsupported scheme '{}'", parsed.scheme()),
            ));
        }

        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| ClientError::new(ClientErrorKind::Network, err.to_string()))?;

        Ok(Self { base_url, client })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str, query: Option<(&str, &str)>) -> Result<Url, ClientError> {
        let mut url = Url::parse(&format!("{}/{}", self.base_url, path))
            .map_err(|err| ClientError::new(ClientErrorKind::InvalidBaseUrl, err.to_string()))?;
        if let Some((key, value)) = query {
            url.query_pairs_mut().append_pair(key, value);
        }
        Ok(url)
    }

    async fn get_record(
        &self,
        url: Url,
        fallback: &str,
        not_found_is_distinct: bool,
    ) -> Result<Envelope<ShortenRecord>, ClientError> {
        shorten_debug!("GET {}", url);
        let response = self
            .client
            .get(url)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if status.is_success() {
            return read_envelope(response).await;
        }
        if not_found_is_distinct && status == StatusCode::NOT_FOUND {
            return Err(ClientError::new(
                ClientErrorKind::NotFound,
                NOT_FOUND_MESSAGE,
            ));
        }
        Err(service_error(response, fallback).await)
    }
}

#[async_trait::async_trait]
impl ApiClient for ReqwestApiClient {
    async fn submit(
        &self,
        long_url: &str,
        callback_url: Option<&str>,
    ) -> Result<Envelope<serde_json::Value>, ClientError> {
        let url = self.endpoint("encode", None)?;
        let body = serde_json::to_vec(&SubmitRequest {
            long_url: long_url.to_string(),
            callback_url: callback_url.map(ToOwned::to_owned),
        })
        .map_err(|err| ClientError::new(ClientErrorKind::InvalidResponse, err.to_string()))?;

        shorten_debug!("POST {} long_url_len={}", url, long_url.len());
        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .body(body)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        if response.status().is_success() {
            read_envelope(response).await
        } else {
            Err(service_error(response, SUBMIT_FALLBACK).await)
        }
    }

    async fn lookup_by_long_url(
        &self,
        long_url: &str,
    ) -> Result<Envelope<ShortenRecord>, ClientError> {
        let url = self.endpoint("urls/long", Some(("long_url", long_url)))?;
        self.get_record(url, LOOKUP_FALLBACK, true).await
    }

    async fn lookup_by_short_url(
        &self,
        shorten_url: &str,
    ) -> Result<Envelope<ShortenRecord>, ClientError> {
        let url = self.endpoint("decode", Some(("shorten_url", shorten_url)))?;
        self.get_record(url, DECODE_FALLBACK, false).await
    }
}

async fn read_envelope<T: DeserializeOwned>(response: Response) -> Result<Envelope<T>, ClientError> {
    let bytes = response.bytes().await.map_err(map_reqwest_error)?;
    serde_json::from_slice(&bytes)
        .map_err(|err| ClientError::new(ClientErrorKind::InvalidResponse, err.to_string()))
}

/// Builds the error for a non-success response, preferring the body's `message`.
async fn service_error(response: Response, fallback: &str) -> ClientError {
    let status = response.status();
    let message = match response.bytes().await {
        Ok(bytes) => serde_json::from_slice::<ErrorBody>(&bytes)
            .ok()
            .map(|body| body.message)
            .filter(|message| !message.trim().is_empty()),
        Err(err) => {
            shorten_warn!("failed to read error body for status {}: {}", status, err);
            None
        }
    };
    ClientError::new(
        ClientErrorKind::HttpStatus(status.as_u16()),
        message.unwrap_or_else(|| fallback.to_string()),
    )
}

fn map_reqwest_error(err: reqwest::Error) -> ClientError {
    if err.is_timeout() {
        return ClientError::new(ClientErrorKind::Timeout, err.to_string());
    }
    if err.is_decode() {
        return ClientError::new(ClientErrorKind::InvalidResponse, err.to_string());
    }
    ClientError::new(ClientErrorKind::Network, err.to_string())
}
