//! See [`Config`].

use std::{
    net::{AddrParseError, SocketAddr},
    num::ParseIntError,
    time::Duration,
};

use thiserror::Error;

use crate::domain;

/// The domains that may serve any drop when `DEFAULT_DOMAINS` isn't set.
const DEFAULT_DOMAINS: &str = "cl.ly,www.cl.ly";

/// Where `/` redirects when `DEFAULT_HOME_PAGE` isn't set.
const DEFAULT_HOME_PAGE: &str = "http://getcloudapp.com";

/// How many seconds requests to the remote API may take when `API_TIMEOUT_SECS` isn't set.
const DEFAULT_API_TIMEOUT_SECS: u64 = 10;

/// The server's configuration, read from environment variables (or a `.env` file).
#[derive(Clone, PartialEq, Eq, Debug)]
pub(crate) struct Config {
    /// The socket address to listen on.
    pub(crate) address: SocketAddr,

    /// The URI origin of the remote content API, without a trailing slash.
    pub(crate) api_origin: String,

    /// The hosts that may serve any user's drops, in lowercase ASCII form.
    pub(crate) default_domains: Vec<String>,

    /// Where `/` redirects when a domain has no home page of its own.
    pub(crate) default_home_page: String,

    /// How long requests to the remote API may take.
    pub(crate) api_timeout: Duration,
}

/// An error reading the [`Config`].
#[derive(Error, Clone, PartialEq, Eq, Debug)]
#[non_exhaustive]
pub(crate) enum Error {
    /// A required environment variable wasn't set.
    #[error("environment variable `{0}` should be set")]
    Missing(&'static str),

    /// `ADDRESS` wasn't a valid socket address.
    #[error("environment variable `ADDRESS` should be a socket address: {0}")]
    Address(#[from] AddrParseError),

    /// `API_ORIGIN` wasn't an HTTP(S) origin.
    #[error("environment variable `API_ORIGIN` should start with `http://` or `https://`")]
    ApiOrigin,

    /// An entry in `DEFAULT_DOMAINS` wasn't a valid domain name.
    #[error("environment variable `DEFAULT_DOMAINS` has an invalid domain: {0}")]
    DefaultDomain(String),

    /// `API_TIMEOUT_SECS` wasn't a whole number of seconds.
    #[error("environment variable `API_TIMEOUT_SECS` should be a number of seconds: {0}")]
    ApiTimeout(#[from] ParseIntError),
}

impl Config {
    /// Reads the configuration from the environment, loading a `.env` file first if there is one.
    ///
    /// # Errors
    ///
    /// Returns an error if a required variable is missing or any variable is malformed.
    pub(crate) fn from_env() -> Result<Self, Error> {
        Self::from_vars(|key| dotenvy::var(key).ok())
    }

    /// Reads the configuration using the specified function to look up each variable.
    ///
    /// # Errors
    ///
    /// Returns an error if a required variable is missing or any variable is malformed.
    fn from_vars<F: Fn(&'static str) -> Option<String>>(var: F) -> Result<Self, Error> {
        let required = |key: &'static str| var(key).ok_or(Error::Missing(key));

        let address: SocketAddr = required("ADDRESS")?.parse()?;

        let api_origin = required("API_ORIGIN")?.trim_end_matches('/').to_owned();
        if !(api_origin.starts_with("http://") || api_origin.starts_with("https://")) {
            return Err(Error::ApiOrigin);
        }

        let default_domains = var("DEFAULT_DOMAINS")
            .as_deref()
            .unwrap_or(DEFAULT_DOMAINS)
            .split(',')
            .map(str::trim)
            .filter(|domain| !domain.is_empty())
            .map(|domain| {
                domain::to_ascii(domain).ok_or_else(|| Error::DefaultDomain(domain.to_owned()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let default_home_page =
            var("DEFAULT_HOME_PAGE").unwrap_or_else(|| DEFAULT_HOME_PAGE.to_owned());

        let api_timeout: u64 = match var("API_TIMEOUT_SECS") {
            Some(secs) => secs.trim().parse()?,
            None => DEFAULT_API_TIMEOUT_SECS,
        };

        Ok(Self {
            address,
            api_origin,
            default_domains,
            default_home_page,
            api_timeout: Duration::from_secs(api_timeout),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    /// Reads a [`Config`] from the specified variables.
    fn config_from(vars: &[(&str, &str)]) -> Result<Config, Error> {
        let vars: HashMap<&str, &str> = vars.iter().copied().collect();

        Config::from_vars(|key| vars.get(key).map(|value| (*value).to_owned()))
    }

    #[test]
    fn defaults() -> Result<(), Error> {
        let config = config_from(&[
            ("ADDRESS", "127.0.0.1:3000"),
            ("API_ORIGIN", "http://api.example.com/"),
        ])?;

        assert_eq!(config.address, SocketAddr::from(([127, 0, 0, 1], 3000)));
        assert_eq!(config.api_origin, "http://api.example.com");
        assert_eq!(config.default_domains, ["cl.ly", "www.cl.ly"]);
        assert_eq!(config.default_home_page, "http://getcloudapp.com");
        assert_eq!(config.api_timeout, Duration::from_secs(10));

        Ok(())
    }

    #[test]
    fn overrides() -> Result<(), Error> {
        let config = config_from(&[
            ("ADDRESS", "0.0.0.0:80"),
            ("API_ORIGIN", "https://api.example.com"),
            ("DEFAULT_DOMAINS", " Drops.Example.com, ,example.com ,Bücher.Example"),
            ("DEFAULT_HOME_PAGE", "https://example.com/"),
            ("API_TIMEOUT_SECS", "3"),
        ])?;

        assert_eq!(
            config.default_domains,
            ["drops.example.com", "example.com", "xn--bcher-kva.example"]
        );
        assert_eq!(config.default_home_page, "https://example.com/");
        assert_eq!(config.api_timeout, Duration::from_secs(3));

        Ok(())
    }

    #[test]
    fn invalid() {
        assert_eq!(
            config_from(&[("API_ORIGIN", "http://api.example.com")]),
            Err(Error::Missing("ADDRESS"))
        );
        assert_eq!(
            config_from(&[("ADDRESS", "127.0.0.1:3000")]),
            Err(Error::Missing("API_ORIGIN"))
        );
        assert_eq!(
            config_from(&[("ADDRESS", "127.0.0.1:3000"), ("API_ORIGIN", "api.example.com")]),
            Err(Error::ApiOrigin)
        );

        let error = config_from(&[("ADDRESS", "localhost"), ("API_ORIGIN", "http://a.test")])
            .expect_err("address without a port should be invalid");
        assert!(matches!(error, Error::Address(_)), "wrong error: {error}");

        let error = config_from(&[
            ("ADDRESS", "127.0.0.1:3000"),
            ("API_ORIGIN", "http://api.example.com"),
            ("API_TIMEOUT_SECS", "soon"),
        ])
        .expect_err("non-numeric timeout should be invalid");
        assert!(matches!(error, Error::ApiTimeout(_)), "wrong error: {error}");
    }
}
