//! Link click dispatch
//!
//! The page posts a [`LinkClick`] over IPC whenever a rendered link is
//! clicked; [`resolve`] turns it into the action the app should take.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Which page handler caught the click
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkClickKind {
    External,
    Document,
    Hash,
    Cancel,
}

/// Click report posted by the page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkClick {
    pub kind: LinkClickKind,
    /// `href` attribute of the nearest anchor, if one was found
    #[serde(default)]
    pub href: Option<String>,
    #[serde(default)]
    pub ctrl: bool,
    #[serde(default)]
    pub meta: bool,
}

impl LinkClick {
    pub fn new(kind: LinkClickKind, href: impl Into<String>) -> Self {
        Self {
            kind,
            href: Some(href.into()),
            ctrl: false,
            meta: false,
        }
    }
}

/// Message posted by the page over IPC
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum IpcMessage {
    /// The page script has loaded and `window.markview` is usable
    Ready,
    /// A rendered link was clicked
    Link(LinkClick),
}

impl IpcMessage {
    /// Parse an IPC message body
    pub fn from_json(body: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(body)
    }
}

/// What the app does in response to a click
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickAction {
    OpenExternal(String),
    OpenDocument { path: PathBuf, new_window: bool },
    SetHash(String),
    Ignore,
}

pub fn resolve(click: &LinkClick) -> ClickAction {
    if click.kind == LinkClickKind::Cancel {
        return ClickAction::Ignore;
    }

    let Some(href) = click.href.as_deref() else {
        tracing::warn!("{:?} link click without an anchor", click.kind);
        return ClickAction::Ignore;
    };

    match click.kind {
        LinkClickKind::External => ClickAction::OpenExternal(href.to_string()),
        LinkClickKind::Document => match document_path(href) {
            Some(path) => ClickAction::OpenDocument {
                path,
                new_window: click.ctrl || click.meta,
            },
            None => ClickAction::Ignore,
        },
        LinkClickKind::Hash => match href.split_once('#') {
            Some((_, hash)) => ClickAction::SetHash(hash.to_string()),
            None => ClickAction::Ignore,
        },
        LinkClickKind::Cancel => ClickAction::Ignore,
    }
}

/// Filesystem path a document link points at
///
/// The fragment is dropped before percent-decoding so an encoded `%23` in a
/// file name survives.
pub fn document_path(href: &str) -> Option<PathBuf> {
    let without_fragment = href.split('#').next().unwrap_or(href);
    let decoded = match urlencoding::decode(without_fragment) {
        Ok(decoded) => decoded,
        Err(e) => {
            tracing::warn!("Cannot decode document link {:?}: {}", href, e);
            return None;
        }
    };

    let path = decoded.strip_prefix("file://").unwrap_or(decoded.as_ref());
    if path.is_empty() {
        return None;
    }
    Some(PathBuf::from(path))
}
