//! See [`Response`].

use askama::Template;
use axum::{
    body::Body,
    http::{
        self,
        header::{CACHE_CONTROL, CONTENT_TYPE, LOCATION},
        HeaderName, HeaderValue, StatusCode,
    },
};

use crate::percent_encoding::encode_location;

/// A wrapper for [`axum::response::Response`] with a simpler API.
#[derive(Debug)]
pub(crate) struct Response {
    /// The [`axum::response::Response`] value being wrapped.
    inner: axum::response::Response,
}

impl Response {
    /// Constructs a new [`Response`].
    pub(crate) fn new() -> Self {
        Self {
            inner: axum::response::Response::new(Body::empty()),
        }
    }

    /// Sets a [`StatusCode`] on the response.
    pub(crate) fn status(&mut self, status: StatusCode) -> &mut Self {
        *self.inner.status_mut() = status;

        self
    }

    /// Sets a header on the response.
    pub(crate) fn header(&mut self, name: HeaderName, value: HeaderValue) -> &mut Self {
        self.inner.headers_mut().insert(name, value);

        self
    }

    /// Sets a header on the response, panicking if the header is invalid.
    ///
    /// # Panics
    ///
    /// Panics if the header name or value isn't valid. For example, passing a string panics if it
    /// contains a character that isn't visible ASCII (32-127).
    pub(crate) fn header_valid<K, V>(&mut self, key: K, value: V) -> &mut Self
    where
        HeaderName: TryFrom<K>,
        <HeaderName as TryFrom<K>>::Error: Into<http::Error>,
        HeaderValue: TryFrom<V>,
        <HeaderValue as TryFrom<V>>::Error: Into<http::Error>,
    {
        let name = <HeaderName as TryFrom<K>>::try_from(key)
            .map_err(Into::into)
            .expect("header name should be valid");
        let value = <HeaderValue as TryFrom<V>>::try_from(value)
            .map_err(Into::into)
            .expect("header value should be valid");

        self.header(name, value)
    }

    /// Lets shared caches store the response for the specified number of seconds.
    pub(crate) fn cache_publicly(&mut self, max_age: u32) -> &mut Self {
        self.header_valid(CACHE_CONTROL, format!("public, max-age={max_age}"))
    }

    /// Sets a [`Body`] on the response.
    pub(crate) fn body<T: Into<Body>>(mut self, body: T) -> Self {
        *self.inner.body_mut() = body.into();

        self
    }

    /// Renders an HTML [`Template`] as the response's body.
    ///
    /// # Errors
    ///
    /// Returns an error if the template fails to render.
    pub(crate) fn html<T: Template>(mut self, template: &T) -> askama::Result<Self> {
        let html = template.render()?;

        self.header_valid(CONTENT_TYPE, "text/html; charset=utf-8");

        Ok(self.body(html))
    }

    /// Sets a `302 Found` redirect to the specified URL on the response.
    ///
    /// Characters that can't be sent in a header are percent-encoded, so any URL is accepted.
    pub(crate) fn redirect(mut self, location: &str) -> Self {
        self.status(StatusCode::FOUND)
            .header_valid(LOCATION, encode_location(location).into_owned());

        self
    }

    /// Sets a [`StatusCode`], and sets it along with its canonical reason text (e.g. `404 Not
    /// Found`) as a `text/plain` body on the response.
    pub(crate) fn plain_error(mut self, status: StatusCode) -> Self {
        self.status(status)
            .header_valid(CONTENT_TYPE, "text/plain");

        self.body(status.to_string())
    }
}

impl axum::response::IntoResponse for Response {
    fn into_response(self) -> axum::response::Response {
        self.inner
    }
}
