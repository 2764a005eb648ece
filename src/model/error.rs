//! Error bodies relayed from the vendor APIs. The request proxy always answers with a success status and wraps
//! whatever the vendor said, so API errors have to be recognised from the body's shape.

use serde::{de::Visitor, Deserialize};
use serde_json::Value;

use crate::error::Error;

/// Spotify: `{"error": {"status": 401, "message": "The access token expired"}}`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub(crate) struct SpotifyErrorResponse {
    pub error: SpotifyError,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub(crate) struct SpotifyError {
    pub status: u16,
    pub message: ApiErrorMessage,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub(crate) enum ApiErrorMessage {
    PermissionsMissing,
    TokenExpired,

    Other(String),
}

/// Twitter v2 problem: `{"title": "Unauthorized", "type": "about:blank", "status": 401, "detail": "Unauthorized"}`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub(crate) struct TwitterProblem {
    pub title: String,
    pub detail: Option<String>,
    pub status: Option<u16>,
}

/// Twitter errors without any data: `{"errors": [{"message": "..."}]}`. Errors next to data are partial errors (e.g.
/// a deleted tweet in a bookmark list) and aren't fatal.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub(crate) struct TwitterErrors {
    pub errors: Vec<TwitterErrorEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub(crate) struct TwitterErrorEntry {
    pub message: Option<String>,
    pub title: Option<String>,
    pub detail: Option<String>,
}

impl SpotifyError {
    pub fn into_error(self) -> Error {
        match (self.status, self.message) {
            (_, ApiErrorMessage::PermissionsMissing) => Error::MissingScope,
            (401, _) => Error::Unauthorized,
            (403, _) => Error::Forbidden,
            (429, _) => Error::RateLimit(None),
            (status, ApiErrorMessage::TokenExpired) => Error::Api {
                status: Some(status),
                message: String::from("The access token expired"),
            },
            (status, ApiErrorMessage::Other(message)) => Error::Api {
                status: Some(status),
                message,
            },
        }
    }
}

impl TwitterProblem {
    pub fn into_error(self) -> Error {
        match self.status {
            Some(401) => Error::Unauthorized,
            Some(403) => Error::Forbidden,
            Some(429) => Error::RateLimit(None),
            status => Error::Api {
                status,
                message: self.detail.unwrap_or(self.title),
            },
        }
    }
}

impl TwitterErrorEntry {
    fn describe(&self) -> &str {
        self.detail
            .as_deref()
            .or(self.message.as_deref())
            .or(self.title.as_deref())
            .unwrap_or("unknown error")
    }
}

impl TwitterErrors {
    pub fn into_error(self) -> Error {
        Error::Api {
            status: None,
            message: self
                .errors
                .iter()
                .map(TwitterErrorEntry::describe)
                .collect::<Vec<_>>()
                .join("; "),
        }
    }
}

/// Returns the error a relayed vendor response describes, if it describes one.
pub(crate) fn extract_api_error(value: &Value) -> Option<Error> {
    let object = value.as_object()?;

    if object.contains_key("data") {
        return None;
    }

    if object.get("error").map_or(false, Value::is_object) {
        return SpotifyErrorResponse::deserialize(value)
            .ok()
            .map(|response| response.error.into_error());
    }

    if object.contains_key("errors") {
        return TwitterErrors::deserialize(value).ok().map(TwitterErrors::into_error);
    }

    if object.contains_key("title") && (object.contains_key("status") || object.contains_key("type")) {
        return TwitterProblem::deserialize(value).ok().map(TwitterProblem::into_error);
    }

    None
}

impl<'de> Deserialize<'de> for ApiErrorMessage {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct ApiErrorMessageVisitor;

        impl<'de> Visitor<'de> for ApiErrorMessageVisitor {
            type Value = ApiErrorMessage;

            fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
                formatter.write_str("a string")
            }

            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                self.visit_string(v.to_owned())
            }

            fn visit_string<E>(self, v: String) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                match v.as_str() {
                    "Permissions missing" => Ok(ApiErrorMessage::PermissionsMissing),
                    "Token expired" | "The access token expired" => Ok(ApiErrorMessage::TokenExpired),

                    _ => Ok(ApiErrorMessage::Other(v)),
                }
            }
        }

        deserializer.deserialize_str(ApiErrorMessageVisitor)
    }
}
