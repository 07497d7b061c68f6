//! See [`Drop`].

use std::borrow::Cow;

use serde::{Deserialize, Deserializer};
use strum_macros::Display;

use crate::percent_encoding::encode_segment;

/// The file extensions of drops displayed inline as images.
const IMAGE_EXTENSIONS: [&str; 11] = [
    ".bmp", ".gif", ".ico", ".jp2", ".jpe", ".jpeg", ".jpf", ".jpg", ".jpg2", ".jpgm", ".png",
];

/// The file extensions of drops displayed as markdown source.
const MARKDOWN_EXTENSIONS: [&str; 3] = [".md", ".mdown", ".markdown"];

/// Source code file extensions, each with the name of the language a client-side highlighter
/// knows it by.
const CODE_LANGUAGES: [(&str, &str); 38] = [
    (".as", "actionscript"),
    (".bash", "bash"),
    (".c", "c"),
    (".clj", "clojure"),
    (".coffee", "coffeescript"),
    (".cpp", "cpp"),
    (".cs", "csharp"),
    (".css", "css"),
    (".diff", "diff"),
    (".erl", "erlang"),
    (".go", "go"),
    (".h", "c"),
    (".hs", "haskell"),
    (".htm", "html"),
    (".html", "html"),
    (".java", "java"),
    (".js", "javascript"),
    (".json", "json"),
    (".lua", "lua"),
    (".m", "objectivec"),
    (".patch", "diff"),
    (".php", "php"),
    (".pl", "perl"),
    (".py", "python"),
    (".rb", "ruby"),
    (".rs", "rust"),
    (".scala", "scala"),
    (".scss", "scss"),
    (".sh", "bash"),
    (".sql", "sql"),
    (".swift", "swift"),
    (".tex", "latex"),
    (".ts", "typescript"),
    (".vim", "vim"),
    (".xml", "xml"),
    (".yaml", "yaml"),
    (".yml", "yaml"),
    (".zsh", "bash"),
];

/// The `source` substring identifying items uploaded by the beta desktop client.
const BETA_SOURCE: &str = "Cloud/2.0 beta";

/// The kind of item as reported by the remote API.
#[derive(Deserialize, Display, Clone, Copy, PartialEq, Eq, Hash, Default, Debug)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub(crate) enum ItemType {
    /// An image file.
    Image,

    /// A link to another URL.
    Bookmark,

    /// A text file.
    Text,

    /// A compressed archive.
    Archive,

    /// An audio file.
    Audio,

    /// A video file.
    Video,

    /// An item whose file is still being uploaded.
    Pending,

    /// Anything else, including item types this service doesn't know about.
    #[default]
    #[serde(other)]
    Unknown,
}

/// A drop's metadata, exactly as received from the remote API.
#[derive(Deserialize, Clone, PartialEq, Eq, Default, Debug)]
#[serde(default)]
pub(crate) struct DropData {
    /// The kind of item.
    #[serde(deserialize_with = "null_as_default")]
    pub(crate) item_type: ItemType,

    /// The public share URL, including the domain the drop is meant to be viewed on.
    pub(crate) url: Option<String>,

    /// The file name given by the uploader.
    pub(crate) name: Option<String>,

    /// The URL of the file's content.
    pub(crate) content_url: Option<String>,

    /// The URL to download the file's content as an attachment.
    pub(crate) download_url: Option<String>,

    /// The URL of a thumbnail preview.
    pub(crate) thumbnail_url: Option<String>,

    /// Where the file is stored.
    pub(crate) remote_url: Option<String>,

    /// Where a bookmark points to.
    pub(crate) redirect_url: Option<String>,

    /// The owner's analytics identifier.
    pub(crate) gauge_id: Option<String>,

    /// Whether the owner has a paid subscription.
    #[serde(deserialize_with = "null_as_default")]
    pub(crate) subscribed: bool,

    /// The user agent of the client which uploaded the drop.
    pub(crate) source: Option<String>,
}

/// Deserializes a value that the remote API may send as `null`, using its default in that case.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// How a text drop's content is shown.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub(crate) enum TextKind {
    /// Plain text.
    Plain,

    /// Markdown source.
    Markdown,

    /// Source code in a language a highlighter recognizes.
    Code {
        /// The highlighter's name for the language.
        language: &'static str,
    },
}

/// How a drop should be answered.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub(crate) enum Presentation {
    /// Redirect to the bookmarked URL.
    Bookmark,

    /// Show a page saying the upload hasn't finished.
    Pending,

    /// Show the image inline.
    Image,

    /// Show the text content inline.
    Text(TextKind),

    /// Offer a download link.
    Download,
}

/// A publicly shared file or link.
///
/// Classification is derived entirely from the metadata. Nothing here performs I/O.
#[derive(Clone, PartialEq, Eq, Debug)]
pub(crate) struct Drop {
    /// The identifier used in the drop's share URL.
    slug: String,

    /// The metadata from the remote API.
    data: DropData,
}

impl Drop {
    /// Constructs a new [`Drop`].
    pub(crate) fn new(slug: String, data: DropData) -> Self {
        Self { slug, data }
    }

    /// Gets the drop's slug.
    pub(crate) fn slug(&self) -> &str {
        &self.slug
    }

    /// Gets the drop's slug percent-encoded for use as a URL path segment.
    pub(crate) fn slug_segment(&self) -> Cow<'_, str> {
        encode_segment(&self.slug)
    }

    /// Gets the drop's metadata.
    pub(crate) fn data(&self) -> &DropData {
        &self.data
    }

    /// Gets the kind of item as reported by the remote API.
    pub(crate) fn item_type(&self) -> ItemType {
        self.data.item_type
    }

    /// Gets the public share URL.
    pub(crate) fn share_url(&self) -> Option<&str> {
        self.data.url.as_deref()
    }

    /// Gets the file name given by the uploader.
    pub(crate) fn name(&self) -> Option<&str> {
        self.data.name.as_deref()
    }

    /// Gets the URL of the file's content.
    pub(crate) fn content_url(&self) -> Option<&str> {
        self.data.content_url.as_deref()
    }

    /// Gets the URL to download the file as an attachment.
    pub(crate) fn download_url(&self) -> Option<&str> {
        self.data.download_url.as_deref()
    }

    /// Gets the URL of a thumbnail preview.
    pub(crate) fn thumbnail_url(&self) -> Option<&str> {
        self.data.thumbnail_url.as_deref()
    }

    /// Gets the owner's analytics identifier.
    pub(crate) fn gauge_id(&self) -> Option<&str> {
        self.data.gauge_id.as_deref()
    }

    /// Whether the owner has a paid subscription.
    pub(crate) fn is_subscribed(&self) -> bool {
        self.data.subscribed
    }

    /// Gets where the drop's content lives: the stored file, or a bookmark's target.
    pub(crate) fn remote_url(&self) -> Option<&str> {
        self.data
            .remote_url
            .as_deref()
            .or(self.data.redirect_url.as_deref())
    }

    /// Whether the drop is a link to another URL.
    pub(crate) fn is_bookmark(&self) -> bool {
        self.data.item_type == ItemType::Bookmark
    }

    /// Whether the drop's file is still being uploaded.
    pub(crate) fn is_pending(&self) -> bool {
        self.data.item_type == ItemType::Pending
    }

    /// Whether the drop was uploaded by the beta desktop client.
    pub(crate) fn is_beta(&self) -> bool {
        self.data
            .source
            .as_deref()
            .is_some_and(|source| source.contains(BETA_SOURCE))
    }

    /// Gets the uploader's file name without its directory or extension, if that isn't empty.
    pub(crate) fn basename(&self) -> Option<&str> {
        let file_name = final_segment(self.name()?);
        let basename = match extension_index(file_name) {
            Some(index) => &file_name[..index],
            None => file_name,
        };

        (!basename.is_empty()).then_some(basename)
    }

    /// Gets the lowercased extension of the drop's file, including the leading `.`.
    ///
    /// A pending drop has no content yet, so its extension comes from its name instead of its
    /// content URL.
    pub(crate) fn extension(&self) -> Option<String> {
        let file_name = if self.is_pending() {
            self.name()
        } else {
            self.content_url()
        }?;

        let file_name = final_segment(file_name);
        let index = extension_index(file_name)?;

        Some(file_name[index..].to_lowercase())
    }

    /// Whether the drop is an image that browsers can display inline.
    pub(crate) fn is_image(&self) -> bool {
        self.extension_in(&IMAGE_EXTENSIONS)
    }

    /// Whether the drop is a `.txt` file.
    pub(crate) fn is_plain_text(&self) -> bool {
        self.extension().as_deref() == Some(".txt")
    }

    /// Whether the drop is markdown source.
    pub(crate) fn is_markdown(&self) -> bool {
        self.extension_in(&MARKDOWN_EXTENSIONS)
    }

    /// Gets the highlighter's name for the language of a source code drop.
    pub(crate) fn code_language(&self) -> Option<&'static str> {
        let extension = self.extension()?;

        CODE_LANGUAGES
            .iter()
            .find(|(code_extension, _)| *code_extension == extension)
            .map(|(_, language)| *language)
    }

    /// Whether the drop is source code.
    pub(crate) fn is_code(&self) -> bool {
        self.code_language().is_some()
    }

    /// Whether the drop's content can be shown inline as text.
    pub(crate) fn is_text(&self) -> bool {
        self.text_kind().is_some()
    }

    /// Gets how a text drop's content is shown, or `None` if the drop isn't text.
    pub(crate) fn text_kind(&self) -> Option<TextKind> {
        if self.is_plain_text() {
            Some(TextKind::Plain)
        } else if self.is_markdown() {
            Some(TextKind::Markdown)
        } else {
            self.code_language()
                .map(|language| TextKind::Code { language })
        }
    }

    /// Picks how the drop should be answered.
    pub(crate) fn presentation(&self) -> Presentation {
        if self.is_bookmark() {
            Presentation::Bookmark
        } else if self.is_pending() {
            Presentation::Pending
        } else if self.is_image() {
            Presentation::Image
        } else if let Some(kind) = self.text_kind() {
            Presentation::Text(kind)
        } else {
            Presentation::Download
        }
    }

    /// Whether the drop's extension is one of the specified extensions.
    fn extension_in(&self, extensions: &[&str]) -> bool {
        self.extension()
            .is_some_and(|extension| extensions.contains(&extension.as_str()))
    }
}

/// Returns everything after the last `/` in a path or URL.
fn final_segment(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Returns the index of the `.` starting a file name's extension.
///
/// Leading dots belong to the name (as in `.profile`), and a trailing dot isn't an extension.
fn extension_index(file_name: &str) -> Option<usize> {
    let leading_dots = file_name.len() - file_name.trim_start_matches('.').len();
    let index = file_name[leading_dots..].rfind('.')? + leading_dots;

    (index + 1 < file_name.len()).then_some(index)
}
