//! The service function answering every request, and the handlers for each [`Route`].

use axum::{
    extract::{Request, State},
    http::{
        header::{ALLOW, HOST},
        Method, StatusCode,
    },
    Router,
};
use axum_macros::debug_handler;
use base64::{
    alphabet,
    engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig},
    Engine as _,
};

use crate::{
    api, domain,
    drops::Presentation,
    error::Error,
    pages::{DownloadPage, ImagePage, PendingPage, TextPage},
    response::Response,
    routes::Route,
    AppState,
};

/// How many seconds shared caches may store home page redirects.
const HOME_MAX_AGE: u32 = 3600;

/// How many seconds shared caches may store drop pages and download redirects.
const DROP_MAX_AGE: u32 = 900;

/// The URL-safe Base64 engine for legacy content links, which may or may not be padded.
const LEGACY_URL_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Constructs the router sending every request to [`handler`].
pub(crate) fn router(state: AppState) -> Router {
    Router::new().fallback(handler).with_state(state)
}

/// The service function to handle all incoming requests and route them to other handlers based on
/// the request URI.
#[debug_handler]
async fn handler(State(state): State<AppState>, request: Request) -> Result<Response, Error> {
    let (request, _body) = request.into_parts();
    let method = &request.method;

    if !(*method == Method::GET || *method == Method::HEAD) {
        let status = if *method == Method::OPTIONS {
            StatusCode::NO_CONTENT
        } else {
            StatusCode::METHOD_NOT_ALLOWED
        };

        let mut response = Response::new();
        response
            .status(status)
            .header_valid(ALLOW, "GET, HEAD, OPTIONS");

        return Ok(response);
    }

    let path = request.uri.path();
    let host = request
        .headers
        .get(HOST)
        .and_then(|host| host.to_str().ok());

    match Route::parse(path).ok_or(Error::NotFound)? {
        Route::Home => Ok(home(&state, host).await),
        Route::Drop { slug } => drop_page(&state, &slug, host).await,
        Route::Status { slug } => status(&state, &slug).await,
        Route::LegacyContent { slug, encoded_url } => legacy_content(&state, &slug, &encoded_url),
        Route::Download => Ok(download(&state, path)),
        Route::Content { slug, filename } => content(&state, &slug, &filename).await,
    }
}

/// Redirects to the requested domain's home page, or to the default home page if the domain has
/// none.
async fn home(state: &AppState, host: Option<&str>) -> Response {
    let host = host.and_then(|host| host.split(':').next());

    let home_page = match host {
        Some(host) => match state.api.fetch_domain(host).await {
            Ok(domain) => domain.home_page,
            Err(api::Error::NotFound) => None,
            Err(error) => {
                tracing::warn!(host, %error, "failed to fetch domain");
                None
            }
        },
        None => None,
    };

    let mut response = Response::new();
    response.cache_publicly(HOME_MAX_AGE);

    response.redirect(home_page.as_deref().unwrap_or(&state.config.default_home_page))
}

/// Shows a drop, or redirects to it if it's a bookmark.
async fn drop_page(state: &AppState, slug: &str, host: Option<&str>) -> Result<Response, Error> {
    let drop = state.api.fetch_drop(slug).await?;

    if !domain::matches(drop.share_url(), host, &state.config.default_domains) {
        tracing::warn!(
            share_url = ?drop.data().url,
            host = ?host,
            "drop requested on another domain",
        );

        return Err(Error::NotFound);
    }

    let presentation = drop.presentation();
    tracing::debug!(slug, item_type = %drop.item_type(), ?presentation, "serving drop");

    let mut response = Response::new();

    let response = match presentation {
        Presentation::Bookmark => match drop.remote_url() {
            Some(remote_url) => {
                state.api.record_view(slug);
                response.cache_publicly(DROP_MAX_AGE);
                response.redirect(remote_url)
            }
            None => response.html(&DownloadPage { drop: &drop })?,
        },

        // Pending drops are polled until they're ready, so they mustn't be cached.
        Presentation::Pending => response.html(&PendingPage { drop: &drop })?,

        Presentation::Image => {
            response.cache_publicly(DROP_MAX_AGE);
            response.html(&ImagePage { drop: &drop })?
        }

        Presentation::Text(kind) => {
            let content = match drop.content_url() {
                Some(content_url) => match state.api.fetch_content(content_url).await {
                    Ok(content) => Some(content),
                    Err(error) => {
                        tracing::warn!(slug, %error, "failed to fetch drop content");
                        None
                    }
                },
                None => None,
            };

            // The fallback isn't cached so the text is retried on the next request.
            match content {
                Some(content) => {
                    response.cache_publicly(DROP_MAX_AGE);
                    response.html(&TextPage {
                        drop: &drop,
                        kind,
                        content: &content,
                    })?
                }
                None => response.html(&DownloadPage { drop: &drop })?,
            }
        }

        Presentation::Download => {
            response.cache_publicly(DROP_MAX_AGE);
            response.html(&DownloadPage { drop: &drop })?
        }
    };

    Ok(response)
}

/// Answers `204 No Content` while a drop is still being uploaded and `200 OK` once it's done.
async fn status(state: &AppState, slug: &str) -> Result<Response, Error> {
    let drop = state.api.fetch_drop(slug).await?;

    let mut response = Response::new();
    response.status(if drop.is_pending() {
        StatusCode::NO_CONTENT
    } else {
        StatusCode::OK
    });

    Ok(response)
}

/// Records a view and redirects to the content URL embedded in a legacy content link.
fn legacy_content(state: &AppState, slug: &str, encoded_url: &str) -> Result<Response, Error> {
    let url = LEGACY_URL_ENGINE
        .decode(encoded_url)
        .ok()
        .and_then(|url| String::from_utf8(url).ok())
        .ok_or(Error::NotFound)?;

    state.api.record_view(slug);

    Ok(Response::new().redirect(&url))
}

/// Redirects to the same path on the API's origin, which serves downloads.
fn download(state: &AppState, path: &str) -> Response {
    let mut response = Response::new();
    response.cache_publicly(DROP_MAX_AGE);

    response.redirect(&state.api.url_for(path))
}

/// Records a view and redirects to where a drop's content is stored.
async fn content(state: &AppState, slug: &str, filename: &str) -> Result<Response, Error> {
    tracing::debug!(slug, filename, "redirecting to drop content");

    let drop = state.api.fetch_drop(slug).await?;
    let remote_url = drop.remote_url().ok_or(Error::NotFound)?;

    state.api.record_view(slug);

    Ok(Response::new().redirect(remote_url))
}
