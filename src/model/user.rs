//! The authenticated users on both services.

use serde::{Deserialize, Serialize};

use super::ExternalUrls;

/// The Twitter user the wizard is acting on behalf of, from `GET /2/users/me`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TwitterUser {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub username: String,
}

/// The current Spotify user, from `GET /v1/me`. Only the non-private fields are kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpotifyUser {
    pub id: String,
    pub display_name: Option<String>,
    #[serde(default)]
    pub external_urls: ExternalUrls,
}
