//! Link routing and sanitization for rendered anchors
//!
//! Every rendered link gets an `onclick` that hands the click to one of the
//! page's dispatcher functions, chosen by the shape of the href.

use std::string::FromUtf8Error;

use regex::Regex;

/// Which click handler an anchor is wired to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    /// `http://` or `https://`: open in the system browser
    External,
    /// Points at a file with a markdown extension: open in the app
    Document,
    /// Contains a fragment: scroll within the page
    Hash,
    /// Anything else: swallow the click
    Other,
}

impl LinkKind {
    /// JavaScript `onclick` body calling the page dispatcher
    pub fn onclick(&self) -> &'static str {
        match self {
            LinkKind::External => "markview.openExternal(event)",
            LinkKind::Document => "markview.openDocument(event)",
            LinkKind::Hash => "markview.openHash(event)",
            LinkKind::Other => "markview.cancelClick(event)",
        }
    }
}

/// Classifies hrefs against the configured markdown extensions
#[derive(Debug, Clone)]
pub struct LinkRouter {
    markdown_ext: Option<Regex>,
}

impl LinkRouter {
    pub fn new(markdown_exts: &[String]) -> Self {
        let exts: Vec<String> = markdown_exts
            .iter()
            .map(|e| e.trim_start_matches('.'))
            .filter(|e| !e.is_empty())
            .map(regex::escape)
            .collect();

        if exts.is_empty() {
            return Self { markdown_ext: None };
        }

        let pattern = format!(r"\.(?:{})(?:$|#)", exts.join("|"));
        let markdown_ext = match Regex::new(&pattern) {
            Ok(re) => Some(re),
            Err(e) => {
                tracing::error!("Invalid markdown extension pattern {}: {}", pattern, e);
                None
            }
        };

        Self { markdown_ext }
    }

    pub fn classify(&self, href: &str) -> LinkKind {
        if href.starts_with("http://") || href.starts_with("https://") {
            LinkKind::External
        } else if self
            .markdown_ext
            .as_ref()
            .is_some_and(|re| re.is_match(href))
        {
            LinkKind::Document
        } else if href.contains('#') {
            LinkKind::Hash
        } else {
            LinkKind::Other
        }
    }
}

/// Whether a link must be dropped in sanitize mode
///
/// The href is percent-decoded twice and reduced to word characters and
/// colons before checking the scheme, so `java%0Ascript:` and friends are
/// caught. An undecodable href counts as unsafe.
pub fn is_unsafe_href(href: &str) -> bool {
    let decoded = match decode_twice(href) {
        Ok(decoded) => decoded,
        Err(e) => {
            tracing::debug!("Dropping undecodable link {:?}: {}", href, e);
            return true;
        }
    };

    let scheme: String = decoded
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == ':')
        .collect::<String>()
        .to_lowercase();

    scheme.starts_with("javascript:") || scheme.starts_with("vbscript:")
}

fn decode_twice(href: &str) -> Result<String, FromUtf8Error> {
    let once = urlencoding::decode(href)?;
    Ok(urlencoding::decode(&once)?.into_owned())
}

/// Opening `<a>` tag wired to the dispatcher
pub(crate) fn anchor_open(id: &str, href: &str, kind: LinkKind, title: &str) -> String {
    let href = html_escape::encode_double_quoted_attribute(href);
    if title.is_empty() {
        format!(
            r#"<a id="{}" href="{}" onclick="{}">"#,
            id,
            href,
            kind.onclick()
        )
    } else {
        format!(
            r#"<a id="{}" href="{}" onclick="{}" title="{}">"#,
            id,
            href,
            kind.onclick(),
            html_escape::encode_double_quoted_attribute(title)
        )
    }
}

/// Hover tooltip showing the raw href of link `id`
pub(crate) fn tooltip(id: &str, href: &str) -> String {
    format!(
        r#"<span class="md-link-tooltip" role="tooltip" data-for="{}">{}</span>"#,
        id,
        html_escape::encode_text(href)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn router() -> LinkRouter {
        LinkRouter::new(&["md".to_string(), "markdown".to_string()])
    }

    #[test]
    fn test_classify() {
        let router = router();
        assert_eq!(router.classify("https://example.com"), LinkKind::External);
        assert_eq!(router.classify("http://example.com/a.md"), LinkKind::External);
        assert_eq!(router.classify("notes.md"), LinkKind::Document);
        assert_eq!(router.classify("../docs/guide.markdown#install"), LinkKind::Document);
        assert_eq!(router.classify("#section"), LinkKind::Hash);
        assert_eq!(router.classify("page.html#top"), LinkKind::Hash);
        assert_eq!(router.classify("image.png"), LinkKind::Other);
        assert_eq!(router.classify("mailto:me@example.com"), LinkKind::Other);
    }

    #[test]
    fn test_extension_must_end_path() {
        let router = router();
        assert_eq!(router.classify("notes.mdx"), LinkKind::Other);
        assert_eq!(router.classify("notes.md.bak"), LinkKind::Other);
    }

    #[test]
    fn test_extension_is_regex_escaped() {
        let router = LinkRouter::new(&["c++".to_string()]);
        assert_eq!(router.classify("x.c++"), LinkKind::Document);
        assert_eq!(router.classify("x.cc"), LinkKind::Other);
    }

    #[test]
    fn test_no_extensions() {
        let router = LinkRouter::new(&[]);
        assert_eq!(router.classify("notes.md"), LinkKind::Other);
    }

    #[test]
    fn test_unsafe_hrefs() {
        assert!(is_unsafe_href("javascript:alert(1)"));
        assert!(is_unsafe_href("JavaScript:alert(1)"));
        assert!(is_unsafe_href("vbscript:msgbox"));
        assert!(is_unsafe_href("java%0Ascript:alert(1)"));
        assert!(is_unsafe_href("java%250Ascript:alert(1)"));
        assert!(is_unsafe_href(" javascript :alert(1)"));
        assert!(is_unsafe_href("%ff%fe"));
    }

    #[test]
    fn test_safe_hrefs() {
        assert!(!is_unsafe_href("https://example.com"));
        assert!(!is_unsafe_href("notes.md"));
        assert!(!is_unsafe_href("#javascript"));
        assert!(!is_unsafe_href("my%20notes.md"));
    }

    #[test]
    fn test_anchor_open_escapes() {
        let html = anchor_open("md-link-1", "a\"b.md", LinkKind::Document, "say \"hi\"");
        assert_eq!(
            html,
            r#"<a id="md-link-1" href="a&quot;b.md" onclick="markview.openDocument(event)" title="say &quot;hi&quot;">"#
        );
    }

    #[test]
    fn test_tooltip() {
        assert_eq!(
            tooltip("md-link-2", "a<b"),
            r#"<span class="md-link-tooltip" role="tooltip" data-for="md-link-2">a&lt;b</span>"#
        );
    }
}
