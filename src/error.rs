use thiserror::Error;

use crate::{model::id::IdError, wizard::Step};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error("The access token for the service is missing or expired. The user should be reauthorized")]
    Unauthorized,
    #[error(
        "The endpoint is forbidden. The user likely removed the application's access to their account. The user \
         should be reauthorized."
    )]
    Forbidden,
    #[error("The required scope for the endpoint hasn't been granted by the user")]
    MissingScope,
    #[error("Request rate limit hit (retry after: {0:?} seconds)")]
    RateLimit(Option<u64>),

    #[error("Unhandled response status code from the request proxy: {0}")]
    UnhandledProxyResponseStatusCode(u16),
    #[error("The API returned an error (status {status:?}): {message}")]
    Api { status: Option<u16>, message: String },
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
    #[error("Unknown service: {0}")]
    UnknownService(String),
    #[error("Cannot create a playlist without any tracks")]
    EmptyPlaylist,
    #[error("There are no tweets to bookmark")]
    NothingToBookmark,
    #[error("The wizard cannot do that while at the {0} step")]
    UnexpectedStep(Step),

    #[error(transparent)]
    InvalidId(#[from] IdError),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    HttpError(#[from] reqwest::Error),
}
