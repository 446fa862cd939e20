//! Emoji shortcode substitution
//!
//! Replaces `:shortcode:` occurrences in plain text with `<img>` markup
//! pointing at `<image_dir>/<shortcode>.png`. Only shortcodes with an image
//! on disk are replaced; everything else stays as text.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

static SHORTCODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r":([a-z0-9_+\-]+):").expect("valid shortcode regex"));

/// Maps emoji shortcodes to inline image markup
#[derive(Debug, Clone, Default)]
pub struct EmojiReplacer {
    image_dir: PathBuf,
    names: HashSet<String>,
}

impl EmojiReplacer {
    /// Create a replacer for an explicit set of shortcodes
    pub fn new(image_dir: impl Into<PathBuf>, names: impl IntoIterator<Item = String>) -> Self {
        Self {
            image_dir: image_dir.into(),
            names: names.into_iter().collect(),
        }
    }

    /// A replacer that never substitutes anything
    pub fn disabled() -> Self {
        Self::default()
    }

    /// Scan `dir` for `*.png` files; each file stem becomes a shortcode
    pub fn from_dir(dir: &Path) -> std::io::Result<Self> {
        let names = std::fs::read_dir(dir)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|ext| ext == "png"))
            .filter_map(|path| {
                path.file_stem()
                    .and_then(|stem| stem.to_str())
                    .map(str::to_string)
            })
            .collect::<Vec<_>>();

        tracing::debug!("Loaded {} emoji from {}", names.len(), dir.display());
        Ok(Self::new(dir, names))
    }

    /// Build a replacer from the emoji config section
    ///
    /// A missing or unreadable image directory disables substitution.
    pub fn from_config(config: &crate::config::EmojiConfig) -> Self {
        if !config.enabled {
            return Self::disabled();
        }
        let Some(dir) = config.resolved_image_dir() else {
            return Self::disabled();
        };
        match Self::from_dir(&dir) {
            Ok(replacer) => replacer,
            Err(e) => {
                tracing::debug!("Emoji images unavailable at {}: {}", dir.display(), e);
                Self::disabled()
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// Replace known shortcodes in `text` with `<img>` markup.
    ///
    /// Returns `None` when nothing was replaced. Otherwise the result is HTML:
    /// the surrounding text is escaped.
    pub fn replace_with_images(&self, text: &str) -> Option<String> {
        if self.names.is_empty() || !text.contains(':') {
            return None;
        }

        let mut out = String::with_capacity(text.len() + 64);
        let mut last = 0;
        let mut replaced = false;

        for caps in SHORTCODE.captures_iter(text) {
            let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            if !self.names.contains(name.as_str()) {
                continue;
            }
            out.push_str(&html_escape::encode_text(&text[last..whole.start()]));
            out.push_str(&self.image_tag(name.as_str()));
            last = whole.end();
            replaced = true;
        }

        if !replaced {
            return None;
        }
        out.push_str(&html_escape::encode_text(&text[last..]));
        Some(out)
    }

    fn image_tag(&self, name: &str) -> String {
        let src = self.image_dir.join(format!("{}.png", name));
        format!(
            r#"<img src="file://{}" title=":{name}:" alt=":{name}:" class="emoji" height="20" width="20" align="absmiddle">"#,
            html_escape::encode_double_quoted_attribute(&src.to_string_lossy()),
            name = name,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn replacer() -> EmojiReplacer {
        EmojiReplacer::new(
            "/emoji",
            ["smile", "+1", "heart"].iter().map(|s| s.to_string()),
        )
    }

    #[test]
    fn test_replaces_known_shortcode() {
        let html = replacer().replace_with_images("hello :smile: world").unwrap();
        assert!(html.starts_with("hello <img src=\"file:///emoji/smile.png\""));
        assert!(html.contains("alt=\":smile:\""));
        assert!(html.ends_with(" world"));
    }

    #[test]
    fn test_unknown_shortcode_left_alone() {
        assert_eq!(replacer().replace_with_images("a :nope: b"), None);
        assert_eq!(replacer().replace_with_images("time 10:30:00"), None);
    }

    #[test]
    fn test_surrounding_text_is_escaped() {
        let html = replacer().replace_with_images("<b> :heart: &").unwrap();
        assert!(html.starts_with("&lt;b&gt; <img"));
        assert!(html.ends_with(" &amp;"));
    }

    #[test]
    fn test_plus_one() {
        let html = replacer().replace_with_images(":+1::smile:").unwrap();
        assert_eq!(html.matches("<img").count(), 2);
    }

    #[test]
    fn test_disabled_replacer() {
        assert!(EmojiReplacer::disabled().is_empty());
        assert_eq!(EmojiReplacer::disabled().replace_with_images(":smile:"), None);
    }

    #[test]
    fn test_from_dir_reads_png_stems() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("tada.png"), b"").unwrap();
        std::fs::write(dir.path().join("notes.txt"), b"").unwrap();

        let replacer = EmojiReplacer::from_dir(dir.path()).unwrap();
        assert!(replacer.contains("tada"));
        assert!(!replacer.contains("notes"));
    }
}
