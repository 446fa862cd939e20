//! Messages handled by the preview pane

use super::dispatch::LinkClick;

/// Preview pane messages
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreviewMsg {
    /// The pane's container exists in the page; build the renderer
    Attach,
    /// The observed document has new contents
    DocumentChanged(String),
    /// The page reported a click on a rendered link
    LinkClicked(LinkClick),
    /// Scroll the heading with this hash to the top of the container
    ScrollToHeading(String),
}
