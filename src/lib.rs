//! The engine of a wizard that turns the Spotify tracks in a user's Twitter bookmarks into a Spotify playlist.
//!
//! The wizard asks the user to authorize both services, checks their bookmarks for tweets that link to Spotify
//! tracks, suggests tweets with tracks to bookmark if there are none, and finally creates a playlist out of the
//! tracks. Rendering is left to a front end; the crate exposes the [wizard state](wizard::WizardState) for it.
//!
//! All requests to Twitter and Spotify are relayed through a request proxy on the backend, which attaches the user's
//! tokens. See [ProxyClient](client::ProxyClient).
//!
//! # Crate features
//!
//! - `native-tls` (default): use the system's native TLS implementation.
//! - `rustls-tls`: use `rustls` instead.

pub mod bookmark_writer;
pub mod client;
pub mod config;
pub mod discovery;
pub mod error;
pub mod model;
pub mod playlist_builder;
pub mod service;
pub mod token;
pub mod wizard;

mod util;

/// Contains the client traits needed to call the Twitter and Spotify endpoints on any proxy client.
pub mod prelude {
    pub use crate::{
        client::{SendProxyRequest, SpotifyClient, TwitterClient},
        token::TokenStore,
    };
}
