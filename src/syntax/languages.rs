//! Language identification for fenced code blocks
//!
//! Maps fence info strings (```` ```rust ````) to language IDs.

/// Languages the highlighter has grammars for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LanguageId {
    Rust,
    Python,
    Go,
    C,
    Cpp,
    Java,
    Bash,
}

impl LanguageId {
    pub const ALL: [LanguageId; 7] = [
        LanguageId::Rust,
        LanguageId::Python,
        LanguageId::Go,
        LanguageId::C,
        LanguageId::Cpp,
        LanguageId::Java,
        LanguageId::Bash,
    ];

    /// Detect language from a fence tag (case-insensitive)
    pub fn from_fence_tag(tag: &str) -> Option<Self> {
        match tag.to_lowercase().as_str() {
            "rust" | "rs" => Some(LanguageId::Rust),
            "python" | "py" | "python3" => Some(LanguageId::Python),
            "go" | "golang" => Some(LanguageId::Go),
            "c" | "h" => Some(LanguageId::C),
            "cpp" | "c++" | "cc" | "cxx" | "hpp" => Some(LanguageId::Cpp),
            "java" => Some(LanguageId::Java),
            "bash" | "sh" | "shell" | "zsh" => Some(LanguageId::Bash),
            _ => None,
        }
    }

    /// Get display name for the language
    pub fn display_name(&self) -> &'static str {
        match self {
            LanguageId::Rust => "Rust",
            LanguageId::Python => "Python",
            LanguageId::Go => "Go",
            LanguageId::C => "C",
            LanguageId::Cpp => "C++",
            LanguageId::Java => "Java",
            LanguageId::Bash => "Bash",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_fence_tag() {
        assert_eq!(LanguageId::from_fence_tag("rust"), Some(LanguageId::Rust));
        assert_eq!(LanguageId::from_fence_tag("RS"), Some(LanguageId::Rust));
        assert_eq!(LanguageId::from_fence_tag("py"), Some(LanguageId::Python));
        assert_eq!(LanguageId::from_fence_tag("c++"), Some(LanguageId::Cpp));
        assert_eq!(LanguageId::from_fence_tag("sh"), Some(LanguageId::Bash));
        assert_eq!(LanguageId::from_fence_tag("brainfuck"), None);
        assert_eq!(LanguageId::from_fence_tag(""), None);
    }
}
