//! See [`Route`].

use crate::percent_encoding::decode_segment;

/// The optional first path segments naming a drop's type. They're accepted for compatibility with
/// old share URLs, but a drop's type is always determined from its metadata instead.
const TYPE_SEGMENTS: [&str; 3] = ["text", "code", "image"];

/// The trailing path segment asking for an image at its original size.
const ORIGINAL_SIZE_SEGMENT: &str = "o";

/// A request path's meaning.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub(crate) enum Route {
    /// `/`: the domain's home page.
    Home,

    /// `[/type]/{slug}[/][/o]`: a drop's page.
    Drop {
        /// The drop's slug.
        slug: String,
    },

    /// `/{slug}/status`: whether a drop has finished uploading.
    Status {
        /// The drop's slug.
        slug: String,
    },

    /// `/content[/type]/{slug}/{encoded_url}`: a legacy link embedding the content URL.
    LegacyContent {
        /// The drop's slug.
        slug: String,

        /// The content URL in URL-safe Base64.
        encoded_url: String,
    },

    /// `[/type]/{slug}/download/{filename}`: a drop's download link, served by the API.
    Download,

    /// `[/type]/{slug}/{filename}`: a drop's content.
    Content {
        /// The drop's slug.
        slug: String,

        /// The file name after the slug. It isn't checked against the drop's actual file name.
        filename: String,
    },
}

impl Route {
    /// Parses a request URI's (percent-encoded) path into a [`Route`].
    ///
    /// When a path fits more than one route, the first listed in [`Route`] wins. Returns `None`
    /// if no route fits or a segment doesn't decode to valid UTF-8.
    pub(crate) fn parse(path: &str) -> Option<Self> {
        let path = path.strip_prefix('/')?;

        if path.is_empty() {
            return Some(Self::Home);
        }

        let segments: Vec<&str> = path.split('/').collect();

        if let Some(slug) = without_type(&segments).find_map(parse_drop) {
            return Some(Self::Drop {
                slug: decode(slug)?,
            });
        }

        if let [slug, "status"] = segments[..] {
            if !slug.is_empty() {
                return Some(Self::Status {
                    slug: decode(slug)?,
                });
            }
        }

        if let ["content", rest @ ..] = &segments[..] {
            let legacy_content = without_type(rest).find_map(|segments| match segments {
                [slug, encoded_url] if !slug.is_empty() && !encoded_url.is_empty() => {
                    Some((*slug, *encoded_url))
                }
                _ => None,
            });

            if let Some((slug, encoded_url)) = legacy_content {
                return Some(Self::LegacyContent {
                    slug: decode(slug)?,
                    encoded_url: decode(encoded_url)?,
                });
            }
        }

        let is_download = without_type(&segments).any(|segments| match segments {
            [slug, "download", filename @ ..] => !slug.is_empty() && !filename.join("/").is_empty(),
            _ => false,
        });

        if is_download {
            return Some(Self::Download);
        }

        let content = without_type(&segments).find_map(|segments| match segments {
            [slug, filename @ ..] if !slug.is_empty() => {
                let filename = filename.join("/");
                (!filename.is_empty()).then_some((*slug, filename))
            }
            _ => None,
        });

        if let Some((slug, filename)) = content {
            return Some(Self::Content {
                slug: decode(slug)?,
                filename: decode(&filename)?,
            });
        }

        None
    }
}

/// Returns the ways to read the specified segments: first without a leading type segment (if
/// there is one and anything follows it), then as-is.
fn without_type<'a, 'b>(segments: &'a [&'b str]) -> impl Iterator<Item = &'a [&'b str]> {
    let stripped = match segments {
        [first, rest @ ..] if TYPE_SEGMENTS.contains(first) && !rest.is_empty() => Some(rest),
        _ => None,
    };

    stripped.into_iter().chain([segments])
}

/// Returns the slug if the segments are a drop page's path.
fn parse_drop<'a>(segments: &[&'a str]) -> Option<&'a str> {
    match *segments {
        [slug] | [slug, ""] | [slug, ORIGINAL_SIZE_SEGMENT] if !slug.is_empty() => Some(slug),
        _ => None,
    }
}

/// Percent-decodes a path segment into an owned string.
fn decode(segment: &str) -> Option<String> {
    decode_segment(segment).map(Into::into)
}
