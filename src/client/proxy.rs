//! The request proxy transport.
//!
//! The proxy is a single endpoint on the backend that accepts `{"url": ..., "method": ..., "body": ...}`, performs
//! the request against the vendor API with the user's stored token and answers `{"response": <vendor JSON>}`. The
//! backend finds the user's tokens through their cookies, so [ProxyClient] forwards the cookie jar with every request
//! if it has been given one.

use std::{fmt::Debug, sync::Arc};

use async_trait::async_trait;
use log::{debug, error, trace, warn};
use reqwest::{header, Client as AsyncClient, Method, StatusCode, Url};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

use crate::{
    config::Config,
    error::{Error, Result},
    token::CookieTokenStore,
};

/// A request for the proxy to relay.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProxyRequest {
    pub url: String,
    #[serde(serialize_with = "serialize_method")]
    pub method: Method,
    /// The proxy expects an empty string when there's no body.
    pub body: Value,
}

/// Anything that can relay a request to a vendor API and return the vendor's JSON response.
#[async_trait]
pub trait SendProxyRequest: Send + Sync {
    async fn send_proxy_request(&self, request: ProxyRequest) -> Result<Value>;
}

#[derive(Debug, Clone)]
pub struct ProxyClient {
    inner: Arc<ProxyClientRef>,
    http_client: AsyncClient,
}

#[derive(Debug)]
struct ProxyClientRef {
    endpoint: Url,
    cookie_jar: Option<Arc<CookieTokenStore>>,
}

#[derive(Debug, Clone)]
pub struct ProxyClientBuilder {
    endpoint: String,
    cookie_jar: Option<Arc<CookieTokenStore>>,
}

#[derive(Debug, Deserialize)]
struct ProxyEnvelope {
    response: Option<Value>,
}

impl ProxyRequest {
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            url: url.into(),
            method,
            body: Value::String(String::new()),
        }
    }

    pub fn with_body(self, body: Value) -> Self {
        Self { body, ..self }
    }
}

impl ProxyClient {
    pub fn builder<S>(endpoint: S) -> ProxyClientBuilder
    where
        S: Into<String>,
    {
        ProxyClientBuilder::new(endpoint)
    }

    pub fn endpoint(&self) -> &Url {
        &self.inner.endpoint
    }
}

impl ProxyClientBuilder {
    pub fn new<S>(endpoint: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            endpoint: endpoint.into(),
            cookie_jar: None,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.proxy_url())
    }

    /// Forward the cookies in this jar to the proxy with every request. The jar is read on every request, so tokens
    /// stored into it later are picked up.
    pub fn cookie_jar(self, cookie_jar: Arc<CookieTokenStore>) -> Self {
        Self {
            cookie_jar: Some(cookie_jar),
            ..self
        }
    }

    pub fn build(self) -> Result<ProxyClient> {
        let endpoint = Url::parse(&self.endpoint)
            .map_err(|e| Error::InvalidUrl(format!("{}: {e}", self.endpoint)))?;

        let mut default_headers = header::HeaderMap::new();
        default_headers.insert(header::ACCEPT, header::HeaderValue::from_static("application/json"));

        let http_client = AsyncClient::builder().default_headers(default_headers).build()?;

        Ok(ProxyClient {
            inner: Arc::new(ProxyClientRef {
                endpoint,
                cookie_jar: self.cookie_jar,
            }),
            http_client,
        })
    }
}

#[async_trait]
impl SendProxyRequest for ProxyClient {
    async fn send_proxy_request(&self, request: ProxyRequest) -> Result<Value> {
        debug!("Relaying {} {} through the proxy", request.method, request.url);
        trace!("Proxy request: {:?}", request);

        let mut http_request = self.http_client.post(self.inner.endpoint.clone()).json(&request);

        if let Some(cookie_jar) = &self.inner.cookie_jar {
            let cookies = cookie_jar.cookie_header();

            if !cookies.is_empty() {
                http_request = http_request.header(header::COOKIE, cookies);
            }
        }

        let response = http_request.send().await?;

        match response.status() {
            StatusCode::UNAUTHORIZED => {
                warn!("Got 401 Unauthorized response from the proxy");
                Err(Error::Unauthorized)
            }

            StatusCode::FORBIDDEN => {
                error!("Got 403 Forbidden response from the proxy");
                Err(Error::Forbidden)
            }

            StatusCode::TOO_MANY_REQUESTS => {
                let retry_after = response
                    .headers()
                    .get(header::RETRY_AFTER)
                    .and_then(|header| header.to_str().ok())
                    .and_then(|header_str| header_str.parse::<u64>().ok());

                warn!("Got rate limited, Retry-After: {:?}", retry_after);
                Err(Error::RateLimit(retry_after))
            }

            status if !status.is_success() => {
                let body = response.text().await?;
                error!("Got {status} response from the proxy: {body}");

                Err(Error::UnhandledProxyResponseStatusCode(status.as_u16()))
            }

            _ => {
                let envelope: ProxyEnvelope = response.json().await?;
                trace!("Proxy response: {:?}", envelope);

                envelope
                    .response
                    .ok_or_else(|| Error::UnexpectedResponse(String::from("proxy reply has no response field")))
            }
        }
    }
}

fn serialize_method<S>(method: &Method, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(method.as_str())
}
