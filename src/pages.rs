//! HTML page templates.

use askama::Template;

use crate::drops::{Drop, TextKind};

/// A page showing an image drop inline.
#[derive(Template, Debug)]
#[template(path = "image.html")]
pub(crate) struct ImagePage<'a> {
    /// The drop being shown.
    pub(crate) drop: &'a Drop,
}

/// A page showing a text drop's content inline.
#[derive(Template, Debug)]
#[template(path = "text.html")]
pub(crate) struct TextPage<'a> {
    /// The drop being shown.
    pub(crate) drop: &'a Drop,

    /// How the content is shown.
    pub(crate) kind: TextKind,

    /// The drop's raw content. It's escaped when rendered.
    pub(crate) content: &'a str,
}

impl TextPage<'_> {
    /// Gets the class names telling client-side scripts how to format the content.
    fn content_class(&self) -> String {
        match self.kind {
            TextKind::Plain => "plain".into(),
            TextKind::Markdown => "markdown".into(),
            TextKind::Code { language } => format!("code language-{language}"),
        }
    }
}

/// A page for a drop that's still being uploaded.
#[derive(Template, Debug)]
#[template(path = "pending.html")]
pub(crate) struct PendingPage<'a> {
    /// The drop being shown.
    pub(crate) drop: &'a Drop,
}

/// A page offering a drop's download link.
#[derive(Template, Debug)]
#[template(path = "download.html")]
pub(crate) struct DownloadPage<'a> {
    /// The drop being shown.
    pub(crate) drop: &'a Drop,
}

/// The `404 Not Found` page.
#[derive(Template, Clone, Copy, Default, Debug)]
#[template(path = "not_found.html")]
pub(crate) struct NotFoundPage;

/// The `500 Internal Server Error` page.
#[derive(Template, Clone, Copy, Default, Debug)]
#[template(path = "error.html")]
pub(crate) struct ErrorPage;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drops::{DropData, ItemType};

    /// Constructs a drop with the specified metadata.
    fn drop(data: DropData) -> Drop {
        Drop::new("hhgttg".into(), data)
    }

    #[test]
    fn image_page() -> askama::Result<()> {
        let drop = drop(DropData {
            item_type: ItemType::Image,
            name: Some("cover.png".into()),
            content_url: Some("http://f.cl.ly/items/hhgttg/cover.png".into()),
            thumbnail_url: Some("http://thumbs.cl.ly/hhgttg".into()),
            ..DropData::default()
        });

        let html = ImagePage { drop: &drop }.render()?;

        assert!(html.contains(r#"<img class="drop-image" src=""#), "{html}");
        assert!(html.contains(r#"cover.png" alt="cover">"#), "{html}");
        assert!(html.contains(r#"property="og:image""#), "{html}");
        assert!(html.contains("thumbs.cl.ly"), "{html}");
        assert!(html.contains("<title>cover.png</title>"), "{html}");

        Ok(())
    }

    #[test]
    fn links_encode_slugs() -> askama::Result<()> {
        let drop = Drop::new(
            "what?#42".into(),
            DropData {
                item_type: ItemType::Pending,
                name: Some("cover.png".into()),
                content_url: Some("http://f.cl.ly/items/hhgttg/cover.png".into()),
                ..DropData::default()
            },
        );

        let html = PendingPage { drop: &drop }.render()?;
        assert!(html.contains("what%3F%2342"), "{html}");
        assert!(!html.contains("what?#42"), "{html}");

        let html = ImagePage { drop: &drop }.render()?;
        assert!(html.contains("what%3F%2342"), "{html}");

        Ok(())
    }

    #[test]
    fn text_page_escapes_content() -> askama::Result<()> {
        let drop = drop(DropData {
            name: Some("towel.rb".into()),
            content_url: Some("http://f.cl.ly/items/hhgttg/towel.rb".into()),
            ..DropData::default()
        });

        let html = TextPage {
            drop: &drop,
            kind: TextKind::Code { language: "ruby" },
            content: "puts '<towel>'",
        }
        .render()?;

        assert!(html.contains(r#"class="code language-ruby""#), "{html}");
        assert!(html.contains("&lt;towel&gt;"), "{html}");
        assert!(!html.contains("<towel>"), "content should be escaped: {html}");

        Ok(())
    }

    #[test]
    fn owner_details() -> askama::Result<()> {
        let subscribed = drop(DropData {
            gauge_id: Some("4f9a".into()),
            subscribed: true,
            source: Some("Cloud/2.0 beta (Mac OS X 10.8)".into()),
            ..DropData::default()
        });

        let html = DownloadPage { drop: &subscribed }.render()?;

        assert!(html.contains(r#"data-gauge-id="4f9a""#), "{html}");
        assert!(html.contains(r#"<body class="beta">"#), "{html}");
        assert!(!html.contains(r#"class="badge""#), "{html}");

        let unsubscribed = drop(DropData::default());

        let html = DownloadPage { drop: &unsubscribed }.render()?;

        assert!(!html.contains("data-gauge-id"), "{html}");
        assert!(html.contains(r#"<body class="">"#), "{html}");
        assert!(html.contains(r#"class="badge""#), "{html}");

        Ok(())
    }

    #[test]
    fn download_page_falls_back_to_slug() -> askama::Result<()> {
        let drop = drop(DropData {
            download_url: Some("http://api.cl.ly/hhgttg/download/towel.zip".into()),
            ..DropData::default()
        });

        let html = DownloadPage { drop: &drop }.render()?;

        assert!(html.contains("<title>hhgttg</title>"), "{html}");
        assert!(html.contains(r#"<a class="download" href=""#), "{html}");
        assert!(html.contains("towel.zip"), "{html}");

        Ok(())
    }
}
