//! See [`Error`].

use axum::{http::StatusCode, response::IntoResponse};
use thiserror::Error;

use crate::{
    api,
    pages::{ErrorPage, NotFoundPage},
    response::Response,
};

/// An error serving a request, answered with an HTML error page.
#[derive(Error, Debug)]
#[non_exhaustive]
pub(crate) enum Error {
    /// There's nothing to serve at the requested path (or on the requested domain).
    #[error("not found")]
    NotFound,

    /// The remote API failed.
    #[error(transparent)]
    Api(#[from] api::Error),

    /// A page failed to render.
    #[error("failed to render page: {0}")]
    Render(#[from] askama::Error),
}

impl Error {
    /// Gets the response status code for this error.
    pub(crate) fn status(&self) -> StatusCode {
        match self {
            Self::NotFound | Self::Api(api::Error::NotFound) => StatusCode::NOT_FOUND,
            Self::Api(_) | Self::Render(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();

        let page = if status == StatusCode::NOT_FOUND {
            Response::new().html(&NotFoundPage)
        } else {
            tracing::error!(error = %self, "failed to serve request");
            Response::new().html(&ErrorPage)
        };

        match page {
            Ok(mut response) => {
                response.status(status);
                response.into_response()
            }
            Err(error) => {
                tracing::error!(%error, "failed to render error page");
                Response::new().plain_error(status).into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses() {
        assert_eq!(Error::NotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(Error::Api(api::Error::NotFound).status(), StatusCode::NOT_FOUND);
        assert_eq!(
            Error::Render(askama::Error::Fmt(std::fmt::Error)).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn error_pages() {
        let response = Error::NotFound.into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            response.headers().get("content-type").map(|value| value.as_bytes()),
            Some(&b"text/html; charset=utf-8"[..])
        );
    }
}
