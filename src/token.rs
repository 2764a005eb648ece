//! OAuth tokens and the authorization gate.
//!
//! The wizard never obtains tokens itself; the backend's sign-in flow stores them, keyed by
//! [`Service::token_key`](crate::service::Service::token_key), and the wizard only checks whether they're still valid
//! before letting the user progress. Where the tokens live is abstracted behind the [TokenStore]-trait:
//!
//! - [MemoryTokenStore] keeps them in memory, which is mostly useful for tests and for front ends that receive the
//!   tokens some other way.
//! - [CookieTokenStore] reads them from an HTTP `Cookie` header, the same place a browser would keep them.

use std::{
    collections::{BTreeMap, HashMap},
    sync::{Arc, RwLock},
};

use chrono::{DateTime, Utc};
use log::{trace, warn};
use serde::{Deserialize, Serialize};

use crate::service::Service;

// Express serializes object cookie values as "j:" followed by JSON
const JSON_COOKIE_PREFIX: &str = "j:";

/// A service's OAuth token as the backend stores it. Often only the expiry is visible to the wizard; the access token
/// itself stays with the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    #[serde(with = "crate::util::timestamp")]
    pub expires_at: DateTime<Utc>,
}

/// Storage for service tokens. Implementations use interior mutability so a store can be shared between the wizard
/// and whatever signs the user in.
pub trait TokenStore: Send + Sync {
    /// Return the service's token, if one is stored.
    fn get(&self, service: Service) -> Option<Token>;

    /// Store a token for the service, replacing any previous one.
    fn set(&self, service: Service, token: Token);

    /// Remove the service's token.
    fn expire(&self, service: Service);
}

/// Which services currently have a valid token.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TokenValidity {
    pub spotify: bool,
    pub twitter: bool,
}

#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    tokens: RwLock<HashMap<Service, Token>>,
}

/// Token store backed by cookies. Every cookie in the jar is kept, so [`cookie_header`](Self::cookie_header) returns
/// the full jar and not just the tokens.
#[derive(Debug, Default)]
pub struct CookieTokenStore {
    cookies: RwLock<BTreeMap<String, String>>,
}

impl Token {
    pub fn new(expires_at: DateTime<Utc>) -> Self {
        Self {
            access_token: None,
            expires_at,
        }
    }

    pub fn with_access_token<S>(self, access_token: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            access_token: Some(access_token.into()),
            ..self
        }
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at < now
    }
}

/// Returns whether the store holds a token for the service that hasn't expired by `now`.
pub fn has_valid_token<S>(store: &S, service: Service, now: DateTime<Utc>) -> bool
where
    S: TokenStore + ?Sized,
{
    match store.get(service) {
        Some(token) => !token.is_expired_at(now),
        None => false,
    }
}

impl TokenValidity {
    /// Check every service's token against the current time.
    pub fn check<S>(store: &S) -> Self
    where
        S: TokenStore + ?Sized,
    {
        Self::check_at(store, Utc::now())
    }

    pub fn check_at<S>(store: &S, now: DateTime<Utc>) -> Self
    where
        S: TokenStore + ?Sized,
    {
        let validity = Self {
            spotify: has_valid_token(store, Service::Spotify, now),
            twitter: has_valid_token(store, Service::Twitter, now),
        };

        trace!("Token validity at {now}: {validity:?}");
        validity
    }

    pub fn is_valid(&self, service: Service) -> bool {
        match service {
            Service::Spotify => self.spotify,
            Service::Twitter => self.twitter,
        }
    }

    pub fn set_valid(&mut self, service: Service, valid: bool) {
        match service {
            Service::Spotify => self.spotify = valid,
            Service::Twitter => self.twitter = valid,
        }
    }

    /// The first service, in authorization order, that lacks a valid token.
    pub fn first_unauthorized(&self) -> Option<Service> {
        Service::ALL.into_iter().find(|service| !self.is_valid(*service))
    }
}

impl<T> TokenStore for Arc<T>
where
    T: TokenStore + ?Sized,
{
    fn get(&self, service: Service) -> Option<Token> {
        (**self).get(service)
    }

    fn set(&self, service: Service, token: Token) {
        (**self).set(service, token)
    }

    fn expire(&self, service: Service) {
        (**self).expire(service)
    }
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self, service: Service) -> Option<Token> {
        self.tokens
            .read()
            .expect("token store rwlock poisoned")
            .get(&service)
            .cloned()
    }

    fn set(&self, service: Service, token: Token) {
        self.tokens
            .write()
            .expect("token store rwlock poisoned")
            .insert(service, token);
    }

    fn expire(&self, service: Service) {
        self.tokens.write().expect("token store rwlock poisoned").remove(&service);
    }
}

impl CookieTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a `Cookie` header value (`name=value; name2=value2`). Malformed pairs are skipped.
    pub fn from_cookie_header(header: &str) -> Self {
        let cookies = header
            .split(';')
            .filter_map(|pair| {
                let (name, value) = pair.trim().split_once('=')?;
                if name.is_empty() {
                    return None;
                }

                Some((name.to_owned(), value.to_owned()))
            })
            .collect();

        Self {
            cookies: RwLock::new(cookies),
        }
    }

    /// Serialize the jar back into a `Cookie` header value.
    pub fn cookie_header(&self) -> String {
        self.cookies
            .read()
            .expect("cookie jar rwlock poisoned")
            .iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

impl TokenStore for CookieTokenStore {
    fn get(&self, service: Service) -> Option<Token> {
        let key = service.token_key();
        let raw = self
            .cookies
            .read()
            .expect("cookie jar rwlock poisoned")
            .get(&key)
            .cloned()?;

        let decoded = match urlencoding::decode(&raw) {
            Ok(decoded) => decoded,
            Err(e) => {
                warn!("Cookie {key} is not valid percent-encoded UTF-8: {e}");
                return None;
            }
        };

        let json = decoded.strip_prefix(JSON_COOKIE_PREFIX).unwrap_or(&decoded);

        match serde_json::from_str(json) {
            Ok(token) => Some(token),
            Err(e) => {
                warn!("Cookie {key} does not contain a token: {e}");
                None
            }
        }
    }

    fn set(&self, service: Service, token: Token) {
        let json = serde_json::to_string(&token).expect("failed to serialize token");

        self.cookies
            .write()
            .expect("cookie jar rwlock poisoned")
            .insert(service.token_key(), urlencoding::encode(&json).into_owned());
    }

    fn expire(&self, service: Service) {
        self.cookies
            .write()
            .expect("cookie jar rwlock poisoned")
            .remove(&service.token_key());
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};

    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2022, 11, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn missing_token_is_invalid() {
        let store = MemoryTokenStore::new();
        assert!(!has_valid_token(&store, Service::Spotify, now()));
    }

    #[test]
    fn expired_token_is_invalid() {
        let store = MemoryTokenStore::new();
        store.set(Service::Spotify, Token::new(now() - Duration::seconds(1)));

        assert!(!has_valid_token(&store, Service::Spotify, now()));
    }

    #[test]
    fn unexpired_token_is_valid() {
        let store = MemoryTokenStore::new();
        store.set(Service::Spotify, Token::new(now() + Duration::hours(1)));

        assert!(has_valid_token(&store, Service::Spotify, now()));
        assert!(!has_valid_token(&store, Service::Twitter, now()));
    }

    #[test]
    fn token_expiring_right_now_is_still_valid() {
        let store = MemoryTokenStore::new();
        store.set(Service::Twitter, Token::new(now()));

        assert!(has_valid_token(&store, Service::Twitter, now()));
    }

    #[test]
    fn expired_tokens_are_removed() {
        let store = MemoryTokenStore::new();
        store.set(Service::Twitter, Token::new(now() + Duration::hours(1)));
        store.expire(Service::Twitter);

        assert!(store.get(Service::Twitter).is_none());
    }

    #[test]
    fn first_unauthorized_checks_spotify_first() {
        let none = TokenValidity::default();
        assert_eq!(none.first_unauthorized(), Some(Service::Spotify));

        let spotify_only = TokenValidity {
            spotify: true,
            twitter: false,
        };
        assert_eq!(spotify_only.first_unauthorized(), Some(Service::Twitter));

        let twitter_only = TokenValidity {
            spotify: false,
            twitter: true,
        };
        assert_eq!(twitter_only.first_unauthorized(), Some(Service::Spotify));

        let mut both = TokenValidity::default();
        both.set_valid(Service::Spotify, true);
        both.set_valid(Service::Twitter, true);
        assert!(both.is_valid(Service::Twitter));
        assert_eq!(both.first_unauthorized(), None);
    }

    #[test]
    fn cookie_with_express_json_prefix() {
        let header = "session=abc; spotify_token=j%3A%7B%22expires_at%22%3A%222022-11-01T13%3A00%3A00.000Z%22%7D";
        let store = CookieTokenStore::from_cookie_header(header);

        let token = store.get(Service::Spotify).unwrap();
        assert_eq!(token.expires_at, now() + Duration::hours(1));
        assert_eq!(token.access_token, None);
        assert!(store.get(Service::Twitter).is_none());
    }

    #[test]
    fn cookie_with_millisecond_expiry() {
        let millis = (now() - Duration::minutes(5)).timestamp_millis();
        let header = format!("twitter_token={}", urlencoding::encode(&format!("{{\"expires_at\":{millis}}}")));
        let store = CookieTokenStore::from_cookie_header(&header);

        assert!(!has_valid_token(&store, Service::Twitter, now()));
        assert_eq!(store.get(Service::Twitter).unwrap().expires_at, now() - Duration::minutes(5));
    }

    #[test]
    fn garbage_cookie_is_not_a_token() {
        let store = CookieTokenStore::from_cookie_header("spotify_token=definitely-not-json");
        assert!(store.get(Service::Spotify).is_none());
    }

    #[test]
    fn cookie_store_set_and_expire() {
        let store = CookieTokenStore::from_cookie_header("session=abc");
        let token = Token::new(now()).with_access_token("secret");

        store.set(Service::Twitter, token.clone());
        assert_eq!(store.get(Service::Twitter), Some(token));
        assert!(store.cookie_header().starts_with("session=abc; twitter_token="));

        store.expire(Service::Twitter);
        assert_eq!(store.cookie_header(), "session=abc");
    }
}
