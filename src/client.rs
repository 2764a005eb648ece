//! The HTTP side of the wizard.
//!
//! Every call to Twitter or Spotify goes through the backend's request proxy, which holds the users' OAuth tokens and
//! relays requests on their behalf. [ProxyClient] is the real transport; anything that implements
//! [SendProxyRequest] can stand in for it. On top of the transport, the [TwitterClient] and [SpotifyClient] traits
//! provide the typed endpoints the wizard uses. Both are implemented for every [SendProxyRequest].

#[cfg(test)]
pub(crate) mod fake;
pub(crate) mod object;
pub mod proxy;
pub(crate) mod request_builder;
pub mod spotify;
pub mod twitter;

use const_format::concatcp;

pub use self::{
    proxy::{ProxyClient, ProxyClientBuilder, ProxyRequest, SendProxyRequest},
    spotify::SpotifyClient,
    twitter::TwitterClient,
};

const TWITTER_API_BASE_URL: &str = "https://api.twitter.com/2/";

const TWITTER_USERS_ENDPOINT: &str = concatcp!(TWITTER_API_BASE_URL, "users");
const TWITTER_USERS_ME_ENDPOINT: &str = concatcp!(TWITTER_API_BASE_URL, "users/me");
const TWITTER_RECENT_SEARCH_ENDPOINT: &str = concatcp!(TWITTER_API_BASE_URL, "tweets/search/recent");

const SPOTIFY_API_BASE_URL: &str = "https://api.spotify.com/v1/";

const SPOTIFY_ME_ENDPOINT: &str = concatcp!(SPOTIFY_API_BASE_URL, "me");
const SPOTIFY_TRACKS_ENDPOINT: &str = concatcp!(SPOTIFY_API_BASE_URL, "tracks");
const SPOTIFY_USERS_ENDPOINT: &str = concatcp!(SPOTIFY_API_BASE_URL, "users");
const SPOTIFY_PLAYLISTS_ENDPOINT: &str = concatcp!(SPOTIFY_API_BASE_URL, "playlists");
