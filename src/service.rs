//! The two services the wizard authorizes against.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// A third-party service the user signs in to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Service {
    Spotify,
    Twitter,
}

impl Service {
    /// Every service in the order the wizard asks the user to authorize them.
    pub const ALL: [Service; 2] = [Service::Spotify, Service::Twitter];

    pub fn as_str(&self) -> &'static str {
        match self {
            Service::Spotify => "spotify",
            Service::Twitter => "twitter",
        }
    }

    /// The key the service's token is stored under, e.g. `spotify_token`.
    pub fn token_key(&self) -> String {
        format!("{}_token", self.as_str())
    }

    /// The backend path that starts the service's OAuth flow.
    pub fn authorize_path(&self) -> String {
        format!("/authorize/{}", self.as_str())
    }
}

impl Display for Service {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Service {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "spotify" => Ok(Service::Spotify),
            "twitter" => Ok(Service::Twitter),
            other => Err(Error::UnknownService(other.to_owned())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_keys() {
        assert_eq!(Service::Spotify.token_key(), "spotify_token");
        assert_eq!(Service::Twitter.token_key(), "twitter_token");
    }

    #[test]
    fn parse_known_services() {
        assert_eq!("spotify".parse::<Service>().unwrap(), Service::Spotify);
        assert_eq!("twitter".parse::<Service>().unwrap(), Service::Twitter);
    }

    #[test]
    fn parse_unknown_service() {
        assert!(matches!("myspace".parse::<Service>(), Err(Error::UnknownService(s)) if s == "myspace"));
    }
}
