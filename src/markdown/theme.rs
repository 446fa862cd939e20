//! Preview theme - colors for Markdown preview rendering

/// Theme colors for markdown preview (CSS-formatted)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewTheme {
    pub background: String,
    pub text: String,
    pub heading: String,
    pub link: String,
    pub code_background: String,
    pub border: String,
    pub accent: String,
    pub muted: String,
    pub syntax: SyntaxColors,
}

/// Colors for highlighted code spans
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxColors {
    pub keyword: String,
    pub function: String,
    pub string: String,
    pub comment: String,
    pub type_name: String,
    pub constant: String,
    pub variable: String,
    pub punctuation: String,
}

impl PreviewTheme {
    /// Dark palette
    pub fn dark() -> Self {
        Self {
            background: "#1e1e1e".to_string(),
            text: "#d4d4d4".to_string(),
            heading: "#569cd6".to_string(),
            link: "#ce9178".to_string(),
            code_background: "#252526".to_string(),
            border: "#3c3c3c".to_string(),
            accent: "#dcdcaa".to_string(),
            muted: "#858585".to_string(),
            syntax: SyntaxColors {
                keyword: "#c586c0".to_string(),
                function: "#dcdcaa".to_string(),
                string: "#ce9178".to_string(),
                comment: "#6a9955".to_string(),
                type_name: "#4ec9b0".to_string(),
                constant: "#b5cea8".to_string(),
                variable: "#9cdcfe".to_string(),
                punctuation: "#808080".to_string(),
            },
        }
    }

    /// Light palette, GitHub-like
    pub fn light() -> Self {
        Self {
            background: "#ffffff".to_string(),
            text: "#1f2328".to_string(),
            heading: "#1f2328".to_string(),
            link: "#0969da".to_string(),
            code_background: "#f6f8fa".to_string(),
            border: "#d0d7de".to_string(),
            accent: "#d0d7de".to_string(),
            muted: "#656d76".to_string(),
            syntax: SyntaxColors {
                keyword: "#cf222e".to_string(),
                function: "#8250df".to_string(),
                string: "#0a3069".to_string(),
                comment: "#6e7781".to_string(),
                type_name: "#953800".to_string(),
                constant: "#0550ae".to_string(),
                variable: "#24292f".to_string(),
                punctuation: "#57606a".to_string(),
            },
        }
    }

    /// Theme for the `markdown.code_theme` setting; unknown names fall back to dark
    pub fn named(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "dark" => Self::dark(),
            "light" => Self::light(),
            other => {
                tracing::warn!("Unknown code theme '{}', using dark", other);
                Self::dark()
            }
        }
    }
}

impl Default for PreviewTheme {
    fn default() -> Self {
        Self::dark()
    }
}
