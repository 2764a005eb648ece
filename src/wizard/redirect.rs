use log::warn;
use reqwest::Url;

use crate::{
    error::{Error, Result},
    service::Service,
};

const SERVICE_PARAM: &str = "service";
const SUCCESS_PARAM: &str = "success";

/// Relative URLs are resolved against this; only the query matters.
const PLACEHOLDER_BASE: &str = "http://localhost/";

/// Where the front end should point its address bar after the redirect parameters are consumed.
pub const CLEANED_URL: &str = "/";

/// The parameters the backend appends to the URL when it redirects back from a service's sign-in flow.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Redirect {
    pub service: Option<Service>,
    /// `Some(true)` for `success=1`, `Some(false)` for `success=0`.
    pub success: Option<bool>,
}

impl Redirect {
    /// Read the redirect parameters from a page URL. The URL may be relative, such as `/?service=spotify&success=1`.
    /// Returns `None` if the URL carries neither parameter.
    pub fn from_url(url: &str) -> Result<Option<Self>> {
        let url = Url::parse(PLACEHOLDER_BASE)
            .and_then(|base| base.join(url))
            .map_err(|e| Error::InvalidUrl(format!("{url}: {e}")))?;

        let mut service = None;
        let mut success = None;

        for (key, value) in url.query_pairs() {
            match key.as_ref() {
                SERVICE_PARAM => service = Some(value.into_owned()),
                SUCCESS_PARAM => success = Some(value.into_owned()),
                _ => {}
            }
        }

        if service.is_none() && success.is_none() {
            return Ok(None);
        }

        let service = service.and_then(|service| match service.parse() {
            Ok(service) => Some(service),
            Err(e) => {
                warn!("Ignoring redirect parameter: {e}");
                None
            }
        });

        let success = success.and_then(|success| match success.as_str() {
            "1" => Some(true),
            "0" => Some(false),
            other => {
                warn!("Ignoring redirect success parameter: {other}");
                None
            }
        });

        Ok(Some(Self { service, success }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_url() {
        assert_eq!(
            Redirect::from_url("/?service=spotify&success=1").unwrap(),
            Some(Redirect {
                service: Some(Service::Spotify),
                success: Some(true)
            })
        );
    }

    #[test]
    fn absolute_url() {
        assert_eq!(
            Redirect::from_url("https://jam.example.com/?success=0&service=twitter").unwrap(),
            Some(Redirect {
                service: Some(Service::Twitter),
                success: Some(false)
            })
        );
    }

    #[test]
    fn no_parameters() {
        assert_eq!(Redirect::from_url("/").unwrap(), None);
        assert_eq!(Redirect::from_url("/?utm_source=x").unwrap(), None);
    }

    #[test]
    fn unknown_values_are_kept_as_a_redirect() {
        assert_eq!(
            Redirect::from_url("/?service=myspace&success=yes").unwrap(),
            Some(Redirect::default())
        );
    }
}
