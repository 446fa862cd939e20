//! Command types for the preview pane
//!
//! Commands represent side effects that should be performed after an update.

use std::path::PathBuf;

use crate::markdown::Heading;

/// Side effects produced by `update_preview`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cmd {
    /// Apply the font size override and toggle the `markdown-body` class
    ApplyContainerStyle {
        font_size: Option<String>,
        github_style: bool,
    },
    /// Replace the container contents with rendered HTML
    ReplaceContent(String),
    /// Run mermaid over diagram blocks not yet processed
    InitDiagrams,
    /// Typeset math blocks not yet processed
    RenderMath,
    /// Hand the fresh outline to the document-updated hook
    NotifyDocumentUpdated {
        revision: u64,
        outline: Vec<Heading>,
    },
    /// Open a URL in the system browser
    OpenExternal(String),
    /// Navigate to another markdown document inside the app
    OpenDocument { path: PathBuf, new_window: bool },
    /// Set the page's location hash
    SetHash(String),
    /// Scroll the element with this id to the top of the container
    ScrollToElement(String),
    /// Execute multiple commands
    Batch(Vec<Cmd>),
}

impl Cmd {
    /// Create a batch of commands
    pub fn batch(cmds: Vec<Cmd>) -> Self {
        Cmd::Batch(cmds)
    }

    /// Flatten nested batches into execution order
    pub fn flatten(self) -> Vec<Cmd> {
        match self {
            Cmd::Batch(cmds) => cmds.into_iter().flat_map(Cmd::flatten).collect(),
            other => vec![other],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flatten_nested_batches() {
        let cmd = Cmd::batch(vec![
            Cmd::InitDiagrams,
            Cmd::batch(vec![Cmd::RenderMath, Cmd::SetHash("a".to_string())]),
        ]);
        assert_eq!(
            cmd.flatten(),
            vec![Cmd::InitDiagrams, Cmd::RenderMath, Cmd::SetHash("a".to_string())]
        );
    }
}
