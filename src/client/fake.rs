//! A canned [SendProxyRequest] for tests.

use std::sync::Mutex;

use async_trait::async_trait;
use reqwest::Method;
use serde_json::Value;

use super::proxy::{ProxyRequest, SendProxyRequest};
use crate::error::{Error, Result};

#[derive(Debug, Clone)]
pub(crate) enum Failure {
    Unauthorized,
    Status(u16),
}

#[derive(Debug)]
struct Route {
    method: Method,
    url_prefix: String,
    body_contains: Option<String>,
    reply: std::result::Result<Value, Failure>,
}

/// Answers proxy requests from a list of routes. A route matches when the method is the same, the URL starts with
/// the route's prefix and, if given, the serialized body contains the route's needle. The most specific match wins.
#[derive(Debug, Default)]
pub(crate) struct FakeProxy {
    routes: Vec<Route>,
    requests: Mutex<Vec<ProxyRequest>>,
}

impl FakeProxy {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn on<S>(self, method: Method, url_prefix: S, reply: Value) -> Self
    where
        S: Into<String>,
    {
        self.route(method, url_prefix, None, Ok(reply))
    }

    pub(crate) fn on_body<S, B>(self, method: Method, url_prefix: S, body_contains: B, reply: Value) -> Self
    where
        S: Into<String>,
        B: Into<String>,
    {
        self.route(method, url_prefix, Some(body_contains.into()), Ok(reply))
    }

    pub(crate) fn fail<S>(self, method: Method, url_prefix: S, failure: Failure) -> Self
    where
        S: Into<String>,
    {
        self.route(method, url_prefix, None, Err(failure))
    }

    pub(crate) fn fail_body<S, B>(self, method: Method, url_prefix: S, body_contains: B, failure: Failure) -> Self
    where
        S: Into<String>,
        B: Into<String>,
    {
        self.route(method, url_prefix, Some(body_contains.into()), Err(failure))
    }

    fn route<S>(
        mut self,
        method: Method,
        url_prefix: S,
        body_contains: Option<String>,
        reply: std::result::Result<Value, Failure>,
    ) -> Self
    where
        S: Into<String>,
    {
        self.routes.push(Route {
            method,
            url_prefix: url_prefix.into(),
            body_contains,
            reply,
        });

        self
    }

    /// Every request received so far, in order.
    pub(crate) fn requests(&self) -> Vec<ProxyRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub(crate) fn requests_to(&self, method: Method, url_prefix: &str) -> usize {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|request| request.method == method && request.url.starts_with(url_prefix))
            .count()
    }
}

#[async_trait]
impl SendProxyRequest for FakeProxy {
    async fn send_proxy_request(&self, request: ProxyRequest) -> Result<Value> {
        let body = request.body.to_string();

        let route = self
            .routes
            .iter()
            .filter(|route| route.method == request.method && request.url.starts_with(&route.url_prefix))
            .filter(|route| {
                route
                    .body_contains
                    .as_deref()
                    .map_or(true, |needle| body.contains(needle))
            })
            .max_by_key(|route| (route.body_contains.is_some(), route.url_prefix.len()));

        let reply = route.map(|route| route.reply.clone());
        self.requests.lock().unwrap().push(request.clone());

        match reply {
            Some(Ok(value)) => Ok(value),
            Some(Err(Failure::Unauthorized)) => Err(Error::Unauthorized),
            Some(Err(Failure::Status(status))) => Err(Error::UnhandledProxyResponseStatusCode(status)),
            None => Err(Error::UnexpectedResponse(format!(
                "no fake route for {} {}",
                request.method, request.url
            ))),
        }
    }
}
