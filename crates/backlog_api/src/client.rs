use std::future::Future;

use reqwest::header::{HeaderValue, CONTENT_TYPE, USER_AGENT};
use reqwest::{Client as HttpClient, Response, StatusCode};
use tracing::debug;

use crate::config::BacklogConfig;
use crate::dispatch::CallSpec;
use crate::error::{BacklogError, Result};
use crate::models::{CallParams, Credentials, Record};

pub const XML_CONTENT_TYPE: &str = "text/xml";

/// Sends a composed request body to an XML-RPC endpoint and returns the full response body.
pub trait Transport {
    fn send(
        &self,
        endpoint: &str,
        body: String,
        credentials: &Credentials,
    ) -> impl Future<Output = Result<Vec<u8>>> + Send;
}

/// reqwest-backed transport: POST with Basic Auth and `Content-Type: text/xml`.
#[derive(Clone, Debug)]
pub struct HttpTransport {
    http: HttpClient,
}

impl HttpTransport {
    pub fn new(config: &BacklogConfig) -> Result<Self> {
        Ok(Self {
            http: build_http_client(config)?,
        })
    }

    async fn read_body(response: Response) -> Result<Vec<u8>> {
        let status = response.status();
        if status.is_success() {
            // read to end of stream rather than trusting Content-Length
            Ok(response.bytes().await?.to_vec())
        } else if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            let body = response.text().await.unwrap_or_default();
            Err(BacklogError::Authentication(format!(
                "Access denied ({}) - {}",
                status, body
            )))
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(BacklogError::http(status, body))
        }
    }
}

impl Transport for HttpTransport {
    async fn send(&self, endpoint: &str, body: String, credentials: &Credentials) -> Result<Vec<u8>> {
        let response = self
            .http
            .post(endpoint)
            .basic_auth(&credentials.id, Some(&credentials.pass))
            .header(CONTENT_TYPE, XML_CONTENT_TYPE)
            .body(body)
            .send()
            .await?;
        Self::read_body(response).await
    }
}

/// Runs compose, transport and decode for one remote call.
#[derive(Clone, Debug)]
pub struct BacklogClient<T = HttpTransport> {
    config: BacklogConfig,
    transport: T,
}

impl BacklogClient<HttpTransport> {
    pub fn new(config: BacklogConfig) -> Result<Self> {
        let transport = HttpTransport::new(&config)?;
        Ok(Self { config, transport })
    }
}

impl<T: Transport> BacklogClient<T> {
    pub fn with_transport(config: BacklogConfig, transport: T) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &BacklogConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub async fn call(
        &self,
        spec: &CallSpec,
        credentials: &Credentials,
        params: &CallParams,
    ) -> Result<Vec<Record>> {
        let body = (spec.compose)(spec.call, params)?;
        let endpoint = self.config.endpoint_for(&credentials.space);
        debug!(method = spec.call.method_name(), %endpoint, "sending XML-RPC request");
        let bytes = self.transport.send(&endpoint, body, credentials).await?;
        let records = (spec.decode)(spec.call, &bytes)?;
        debug!(method = spec.call.method_name(), count = records.len(), "decoded XML-RPC response");
        Ok(records)
    }
}

fn build_http_client(config: &BacklogConfig) -> Result<HttpClient> {
    let user_agent = HeaderValue::from_str(&config.user_agent)
        .map_err(|err| BacklogError::Other(err.to_string()))?;
    let mut headers = reqwest::header::HeaderMap::new();
    headers.insert(USER_AGENT, user_agent);

    HttpClient::builder()
        .default_headers(headers)
        .timeout(config.timeout)
        .connect_timeout(config.connect_timeout)
        .build()
        .map_err(|err| BacklogError::Other(err.to_string()))
}
