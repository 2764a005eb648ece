//! Spotify track IDs.
//!
//! Tweets link to tracks by URL, while Spotify's playlist endpoints want URIs and the catalog endpoints want bare IDs.
//! [TrackId] parses any of the three forms and can produce any of them:
//! - URLs: `https://open.spotify.com/track/2pDPOMX0kWA7kcPBcDCQBu`. The URL may contain any query parameters and a
//!   locale segment such as `intl-de/`.
//! - URIs: `spotify:track:2pDPOMX0kWA7kcPBcDCQBu`
//! - Bare IDs: `2pDPOMX0kWA7kcPBcDCQBu`
//!
//! ```
//! # use tweetjam::model::id::TrackId;
//! let id = TrackId::from_url("https://open.spotify.com/track/2pDPOMX0kWA7kcPBcDCQBu?si=abc").unwrap();
//!
//! assert_eq!(id.as_str(), "2pDPOMX0kWA7kcPBcDCQBu");
//! assert_eq!(id.as_uri(), "spotify:track:2pDPOMX0kWA7kcPBcDCQBu");
//! ```

use std::fmt;

use const_format::concatcp;
use serde::{de, Deserialize, Serialize};
use thiserror::Error;

const ID_LENGTH: usize = 22; // I hope Spotify never changes this length
const URL_PREFIX: &str = "https://open.spotify.com/";
const URI_PREFIX: &str = "spotify:track:";
const LOCALE_SEGMENT_PREFIX: &str = "intl-";

/// Every link to a track starts with this.
pub const TRACK_URL_PREFIX: &str = concatcp!(URL_PREFIX, "track");

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdError {
    #[error("Malformed track URL or URI: {0}")]
    MalformedString(String),
    #[error("The link points to a {0}, not a track")]
    WrongItemType(String),
    #[error("Invalid Spotify ID: {0}")]
    InvalidId(String),
}

/// A validated Spotify track ID. The ID is only validated to *look* like a Spotify ID; there's no guarantee the track
/// exists in Spotify's catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TrackId(String);

impl TrackId {
    pub fn from_bare<S>(bare: S) -> Result<Self, IdError>
    where
        S: Into<String>,
    {
        let bare = bare.into();

        if verify_valid_id(&bare) {
            Ok(Self(bare))
        } else {
            Err(IdError::InvalidId(bare))
        }
    }

    pub fn from_uri(uri: &str) -> Result<Self, IdError> {
        match uri.strip_prefix(URI_PREFIX) {
            Some(id) => Self::from_bare(id),

            None => match uri.strip_prefix("spotify:").and_then(|rest| rest.split_once(':')) {
                Some((item_type, _)) => Err(IdError::WrongItemType(item_type.to_owned())),
                None => Err(IdError::MalformedString(uri.to_owned())),
            },
        }
    }

    pub fn from_url(url: &str) -> Result<Self, IdError> {
        // a whole URL could look like: https://open.spotify.com/intl-fi/track/3mXLyNsVeLelMakgpGUp1f?si=AAAAAAAAAAAAAAAA
        let path = url
            .strip_prefix(URL_PREFIX)
            .ok_or_else(|| IdError::MalformedString(url.to_owned()))?;

        // drop the query and fragment, if any
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let mut segments = path.split('/').filter(|segment| !segment.is_empty()).peekable();

        if segments
            .peek()
            .map_or(false, |segment| segment.starts_with(LOCALE_SEGMENT_PREFIX))
        {
            segments.next();
        }

        match (segments.next(), segments.next(), segments.next()) {
            (Some("track"), Some(id), None) => Self::from_bare(id),
            (Some(item_type), Some(_), None) => Err(IdError::WrongItemType(item_type.to_owned())),
            _ => Err(IdError::MalformedString(url.to_owned())),
        }
    }

    /// Parse a track URL, URI or bare ID.
    pub fn parse(value: &str) -> Result<Self, IdError> {
        if value.starts_with(URL_PREFIX) {
            Self::from_url(value)
        } else if value.starts_with("spotify:") {
            Self::from_uri(value)
        } else {
            Self::from_bare(value)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn as_uri(&self) -> String {
        format!("{URI_PREFIX}{}", self.0)
    }

    pub fn as_url(&self) -> String {
        format!("{TRACK_URL_PREFIX}/{}", self.0)
    }
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for TrackId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for TrackId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        TrackId::parse(&value).map_err(de::Error::custom)
    }
}

fn verify_valid_id(id: &str) -> bool {
    // Spotify IDs are base-62 strings and they look like 3mXLyNsVeLelMakgpGUp1f
    id.len() == ID_LENGTH && id.chars().all(|c| c.is_ascii_alphanumeric())
}
