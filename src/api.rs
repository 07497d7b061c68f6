//! A client for the remote content API that drops are fetched from.

use std::time::Duration;

use reqwest::{header::ACCEPT, StatusCode};
use serde::Deserialize;
use thiserror::Error;
use tokio::task::JoinHandle;

use crate::{
    drops::{Drop, DropData},
    percent_encoding::encode_segment,
};

/// The `Accept` header value for API requests.
const JSON: &str = "application/json";

/// An error from the remote API.
#[derive(Error, Debug)]
#[non_exhaustive]
pub(crate) enum Error {
    /// The API responded `404 Not Found`.
    #[error("not found")]
    NotFound,

    /// The request failed or the API responded with an unexpected status or body.
    #[error("API request failed: {0}")]
    Http(#[from] reqwest::Error),
}

/// A custom domain's settings.
#[derive(Deserialize, Clone, PartialEq, Eq, Default, Debug)]
#[serde(default)]
pub(crate) struct Domain {
    /// Where the domain's `/` should redirect to.
    pub(crate) home_page: Option<String>,
}

/// A client for the remote content API.
#[derive(Clone, Debug)]
pub(crate) struct Client {
    /// The underlying HTTP client.
    http: reqwest::Client,

    /// The API's URI origin, without a trailing slash.
    origin: String,
}

impl Client {
    /// Constructs a new [`Client`] for the API at the specified origin.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client can't be initialized (for example, if TLS is
    /// unavailable).
    pub(crate) fn new(origin: String, timeout: Duration) -> reqwest::Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self { http, origin })
    }

    /// Gets the URL of the specified path on the API's origin.
    pub(crate) fn url_for(&self, path: &str) -> String {
        format!("{}{path}", self.origin)
    }

    /// Fetches the metadata of the drop with the specified slug.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if there's no such drop, or [`Error::Http`] if the request
    /// fails otherwise.
    pub(crate) async fn fetch_drop(&self, slug: &str) -> Result<Drop, Error> {
        let response = self
            .http
            .get(self.url_for(&format!("/{}", encode_segment(slug))))
            .header(ACCEPT, JSON)
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(Error::NotFound);
        }

        let data: DropData = response.error_for_status()?.json().await?;

        Ok(Drop::new(slug.to_owned(), data))
    }

    /// Fetches the settings of the domain with the specified host.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the domain isn't a known custom domain, or [`Error::Http`]
    /// if the request fails otherwise.
    pub(crate) async fn fetch_domain(&self, host: &str) -> Result<Domain, Error> {
        let response = self
            .http
            .get(self.url_for(&format!("/domains/{}", encode_segment(host))))
            .header(ACCEPT, JSON)
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(Error::NotFound);
        }

        Ok(response.error_for_status()?.json().await?)
    }

    /// Fetches the raw content of a text drop.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the content isn't successfully returned.
    pub(crate) async fn fetch_content(&self, content_url: &str) -> Result<String, Error> {
        let response = self.http.get(content_url).send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(Error::NotFound);
        }

        Ok(response.error_for_status()?.text().await?)
    }

    /// Records a view of the drop with the specified slug in the background.
    ///
    /// Failures are only logged, since a missed view shouldn't fail the request being served.
    pub(crate) fn record_view(&self, slug: &str) -> JoinHandle<()> {
        let request = self
            .http
            .post(self.url_for(&format!("/{}/view", encode_segment(slug))));

        tokio::spawn(async move {
            match request.send().await {
                Ok(response) if response.status() == StatusCode::CREATED => {}
                Ok(response) => tracing::warn!(
                    url = %response.url(),
                    status = %response.status(),
                    "view wasn't recorded",
                ),
                Err(error) => tracing::warn!(%error, "view wasn't recorded"),
            }
        })
    }
}
