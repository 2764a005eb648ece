use std::{borrow::Cow, fmt::Debug, marker::PhantomData};

use log::{debug, error, trace};
use reqwest::{Method, Url};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use super::proxy::{ProxyRequest, SendProxyRequest};
use crate::{
    error::{Error, Result},
    model::error::extract_api_error,
};

/// Builds one vendor API request, relays it through a proxy client and deserializes the vendor's response into
/// `TResponse`.
pub(crate) struct RequestBuilder<'a, C, TResponse, TBody = ()>
where
    C: ?Sized,
{
    client: &'a C,
    method: Method,
    base_url: Cow<'static, str>,
    query_params: Vec<(&'static str, Cow<'static, str>)>,
    body: Option<TBody>,

    response_phantom: PhantomData<fn() -> TResponse>,
}

impl<'a, C, TResponse> RequestBuilder<'a, C, TResponse, ()>
where
    C: ?Sized,
{
    pub(crate) fn new<S>(client: &'a C, method: Method, base_url: S) -> Self
    where
        S: Into<Cow<'static, str>>,
    {
        Self {
            client,
            method,
            base_url: base_url.into(),
            query_params: Vec::new(),
            body: None,

            response_phantom: PhantomData,
        }
    }
}

impl<'a, C, TResponse, TBody> RequestBuilder<'a, C, TResponse, TBody>
where
    C: ?Sized,
{
    pub(crate) fn append_query<S>(mut self, key: &'static str, value: S) -> Self
    where
        S: Into<Cow<'static, str>>,
    {
        self.query_params.push((key, value.into()));
        self
    }

    pub(crate) fn body<T>(self, body: T) -> RequestBuilder<'a, C, TResponse, T> {
        RequestBuilder {
            client: self.client,
            method: self.method,
            base_url: self.base_url,
            query_params: self.query_params,
            body: Some(body),

            response_phantom: PhantomData,
        }
    }

    fn build_url(&self) -> Result<Url> {
        let url = if self.query_params.is_empty() {
            Url::parse(&self.base_url)
        } else {
            Url::parse_with_params(&self.base_url, &self.query_params)
        };

        url.map_err(|e| Error::InvalidUrl(format!("{}: {e}", self.base_url)))
    }
}

impl<'a, C, TResponse, TBody> RequestBuilder<'a, C, TResponse, TBody>
where
    C: SendProxyRequest + ?Sized,
    TResponse: DeserializeOwned + Debug,
    TBody: Serialize + Debug,
{
    pub(crate) async fn send(self) -> Result<TResponse> {
        let url = self.build_url()?;
        let mut request = ProxyRequest::new(self.method, url);

        if let Some(body) = &self.body {
            trace!("Request body: {:?}", body);
            request = request.with_body(serde_json::to_value(body)?);
        }

        let client = self.client;
        let response: Value = client.send_proxy_request(request).await?;

        if let Some(api_error) = extract_api_error(&response) {
            error!("The API returned an error: {api_error}");
            return Err(api_error);
        }

        let response_body = serde_json::from_value(response).map_err(|e| {
            debug!("Failed to deserialize response: {e}");
            Error::UnexpectedResponse(e.to_string())
        })?;

        trace!("Body: {:?}", response_body);
        Ok(response_body)
    }
}
