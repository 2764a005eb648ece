//! Runtime configuration for the wizard and its request proxy.

use std::time::Duration;

use crate::service::Service;

pub const DEFAULT_PROXY_URL: &str = "http://localhost:3000/request";
pub const DEFAULT_PLAYLIST_NAME: &str = "My Twitter Jam";
pub const DEFAULT_SUGGESTION_COUNT: u32 = 10;

/// How long a front end should keep the "bookmarks added" notification open.
pub const NOTIFICATION_DURATION: Duration = Duration::from_millis(5000);

const BACKEND_URL_VAR: &str = "TWEETJAM_BACKEND_URL";
const PROXY_URL_VAR: &str = "TWEETJAM_PROXY_URL";
const PLAYLIST_NAME_VAR: &str = "TWEETJAM_PLAYLIST_NAME";
const SUGGESTION_COUNT_VAR: &str = "TWEETJAM_SUGGESTIONS";

// Twitter's recent search accepts max_results in this range
const MIN_SUGGESTION_COUNT: u32 = 10;
const MAX_SUGGESTION_COUNT: u32 = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    backend_url: String,
    proxy_url: String,
    playlist_name: String,
    suggestion_count: u32,
}

#[derive(Debug, Clone, Default)]
pub struct ConfigBuilder {
    backend_url: Option<String>,
    proxy_url: Option<String>,
    playlist_name: Option<String>,
    suggestion_count: Option<u32>,
}

impl Config {
    /// Read the configuration from the environment. Unset or unparseable variables fall back to their defaults.
    pub fn from_env() -> Self {
        let mut builder = ConfigBuilder::new();

        if let Ok(backend_url) = std::env::var(BACKEND_URL_VAR) {
            builder = builder.backend_url(backend_url);
        }

        if let Ok(proxy_url) = std::env::var(PROXY_URL_VAR) {
            builder = builder.proxy_url(proxy_url);
        }

        if let Ok(playlist_name) = std::env::var(PLAYLIST_NAME_VAR) {
            builder = builder.playlist_name(playlist_name);
        }

        if let Ok(count) = std::env::var(SUGGESTION_COUNT_VAR) {
            match count.parse() {
                Ok(count) => builder = builder.suggestion_count(count),
                Err(_) => log::warn!("Ignoring invalid {SUGGESTION_COUNT_VAR} value: {count}"),
            }
        }

        builder.build()
    }

    pub fn backend_url(&self) -> &str {
        &self.backend_url
    }

    pub fn proxy_url(&self) -> &str {
        &self.proxy_url
    }

    pub fn playlist_name(&self) -> &str {
        &self.playlist_name
    }

    pub fn suggestion_count(&self) -> u32 {
        self.suggestion_count
    }

    /// The link that starts the given service's sign-in flow on the backend.
    pub fn authorize_url(&self, service: Service) -> String {
        format!("{}{}", self.backend_url, service.authorize_path())
    }
}

impl Default for Config {
    fn default() -> Self {
        ConfigBuilder::new().build()
    }
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn backend_url<S>(self, backend_url: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            backend_url: Some(backend_url.into()),
            ..self
        }
    }

    pub fn proxy_url<S>(self, proxy_url: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            proxy_url: Some(proxy_url.into()),
            ..self
        }
    }

    pub fn playlist_name<S>(self, playlist_name: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            playlist_name: Some(playlist_name.into()),
            ..self
        }
    }

    /// How many suggested tweets to request when the user has no track bookmarks. Clamped to 10..=100.
    pub fn suggestion_count(self, suggestion_count: u32) -> Self {
        Self {
            suggestion_count: Some(suggestion_count),
            ..self
        }
    }

    pub fn build(self) -> Config {
        Config {
            // a trailing slash would double up with the authorize path
            backend_url: self
                .backend_url
                .map(|url| url.trim_end_matches('/').to_owned())
                .unwrap_or_default(),
            proxy_url: self.proxy_url.unwrap_or_else(|| DEFAULT_PROXY_URL.to_owned()),
            playlist_name: self.playlist_name.unwrap_or_else(|| DEFAULT_PLAYLIST_NAME.to_owned()),
            suggestion_count: self
                .suggestion_count
                .unwrap_or(DEFAULT_SUGGESTION_COUNT)
                .clamp(MIN_SUGGESTION_COUNT, MAX_SUGGESTION_COUNT),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::default();

        assert_eq!(config.backend_url(), "");
        assert_eq!(config.proxy_url(), DEFAULT_PROXY_URL);
        assert_eq!(config.playlist_name(), DEFAULT_PLAYLIST_NAME);
        assert_eq!(config.suggestion_count(), DEFAULT_SUGGESTION_COUNT);
    }

    #[test]
    fn authorize_url_without_backend_is_relative() {
        let config = Config::default();
        assert_eq!(config.authorize_url(Service::Spotify), "/authorize/spotify");
    }

    #[test]
    fn authorize_url_with_backend() {
        let config = ConfigBuilder::new().backend_url("https://jam.example.com/").build();
        assert_eq!(
            config.authorize_url(Service::Twitter),
            "https://jam.example.com/authorize/twitter"
        );
    }

    #[test]
    fn suggestion_count_is_clamped() {
        assert_eq!(ConfigBuilder::new().suggestion_count(3).build().suggestion_count(), 10);
        assert_eq!(ConfigBuilder::new().suggestion_count(500).build().suggestion_count(), 100);
        assert_eq!(ConfigBuilder::new().suggestion_count(25).build().suggestion_count(), 25);
    }
}
