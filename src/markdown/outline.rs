//! Document outline: heading metadata collected while rendering

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

static NON_WORD_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w]+").expect("valid slug regex"));

/// One rendered heading, in document order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Heading {
    /// Raw heading text (markup stripped)
    pub title: String,
    /// Element id of the rendered heading
    pub hash: String,
    /// 1..=6
    pub level: u8,
    /// Rendered inner HTML of the heading
    pub html: String,
}

/// A heading with the headings nested under it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutlineNode {
    pub heading: Heading,
    pub children: Vec<OutlineNode>,
}

impl OutlineNode {
    /// Whether this node has children (can be expanded/collapsed)
    pub fn is_collapsible(&self) -> bool {
        !self.children.is_empty()
    }
}

/// Slug for a heading: lowercase, every run of non-word characters becomes `-`
pub fn slugify(raw: &str) -> String {
    NON_WORD_RUN
        .replace_all(&raw.to_lowercase(), "-")
        .into_owned()
}

/// Hands out heading ids for one render
///
/// With `unique` set, a slug already handed out gets `-1`, `-2`, ... appended.
#[derive(Debug, Default)]
pub(crate) struct SlugTracker {
    prefix: String,
    unique: bool,
    /// Highest suffix used per base slug
    counts: HashMap<String, usize>,
    taken: HashSet<String>,
}

impl SlugTracker {
    pub(crate) fn new(prefix: &str, unique: bool) -> Self {
        Self {
            prefix: prefix.to_string(),
            unique,
            ..Self::default()
        }
    }

    pub(crate) fn next(&mut self, raw: &str) -> String {
        let base = format!("{}{}", self.prefix, slugify(raw));
        if !self.unique {
            return base;
        }

        let mut suffix = self.counts.get(&base).copied().unwrap_or(0);
        let mut candidate = base.clone();
        while self.taken.contains(&candidate) {
            suffix += 1;
            candidate = format!("{}-{}", base, suffix);
        }

        self.counts.insert(base, suffix);
        self.taken.insert(candidate.clone());
        candidate
    }
}

/// Nest a flat outline by heading level
///
/// A heading becomes a child of the closest preceding heading with a lower
/// level. Documents that skip levels (H1 then H3) still nest.
pub fn build_outline_tree(headings: &[Heading]) -> Vec<OutlineNode> {
    let mut roots: Vec<OutlineNode> = Vec::new();
    let mut stack: Vec<OutlineNode> = Vec::new();

    for heading in headings {
        let node = OutlineNode {
            heading: heading.clone(),
            children: Vec::new(),
        };

        // Pop everything at same level or deeper
        while stack
            .last()
            .is_some_and(|top| top.heading.level >= heading.level)
        {
            if let Some(finished) = stack.pop() {
                attach(&mut stack, &mut roots, finished);
            }
        }

        stack.push(node);
    }

    // Flush remaining stack
    while let Some(finished) = stack.pop() {
        attach(&mut stack, &mut roots, finished);
    }

    roots
}

fn attach(stack: &mut [OutlineNode], roots: &mut Vec<OutlineNode>, node: OutlineNode) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(node),
        None => roots.push(node),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn heading(level: u8, title: &str) -> Heading {
        Heading {
            title: title.to_string(),
            hash: slugify(title),
            level,
            html: title.to_string(),
        }
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Some Title"), "some-title");
        assert_eq!(slugify("Hello, World!"), "hello-world-");
        assert_eq!(slugify("snake_case stays"), "snake_case-stays");
        assert_eq!(slugify("  spaced   out  "), "-spaced-out-");
        assert_eq!(slugify("Überschrift"), "überschrift");
    }

    #[test]
    fn test_slug_tracker_without_dedup() {
        let mut slugs = SlugTracker::new("", false);
        assert_eq!(slugs.next("Intro"), "intro");
        assert_eq!(slugs.next("Intro"), "intro");
    }

    #[test]
    fn test_slug_tracker_dedup() {
        let mut slugs = SlugTracker::new("", true);
        assert_eq!(slugs.next("Intro"), "intro");
        assert_eq!(slugs.next("Intro"), "intro-1");
        assert_eq!(slugs.next("Intro"), "intro-2");
        assert_eq!(slugs.next("Other"), "other");
    }

    #[test]
    fn test_slug_tracker_dedup_avoids_literal_collision() {
        let mut slugs = SlugTracker::new("", true);
        assert_eq!(slugs.next("Intro 1"), "intro-1");
        assert_eq!(slugs.next("Intro"), "intro");
        assert_eq!(slugs.next("Intro"), "intro-2");
    }

    #[test]
    fn test_slug_tracker_prefix() {
        let mut slugs = SlugTracker::new("doc-", true);
        assert_eq!(slugs.next("Intro"), "doc-intro");
    }

    #[test]
    fn test_outline_tree_basic() {
        let headings = vec![
            heading(1, "Title"),
            heading(2, "Section 1"),
            heading(3, "Sub 1.1"),
            heading(2, "Section 2"),
        ];

        let tree = build_outline_tree(&headings);
        assert_eq!(tree.len(), 1, "Should have one root (H1)");
        assert_eq!(tree[0].heading.title, "Title");
        assert_eq!(tree[0].children.len(), 2, "H1 should have 2 H2 children");
        assert_eq!(tree[0].children[0].children.len(), 1);
        assert_eq!(tree[0].children[1].heading.title, "Section 2");
        assert!(tree[0].is_collapsible());
        assert!(!tree[0].children[1].is_collapsible());
    }

    #[test]
    fn test_outline_tree_no_h1() {
        let headings = vec![heading(2, "A"), heading(3, "A.1"), heading(2, "B")];

        let tree = build_outline_tree(&headings);
        assert_eq!(tree.len(), 2);
        assert_eq!(tree[0].children.len(), 1);
        assert!(tree[1].children.is_empty());
    }

    #[test]
    fn test_outline_tree_preserves_order() {
        let headings = vec![heading(1, "One"), heading(1, "Two"), heading(1, "Three")];
        let titles: Vec<_> = build_outline_tree(&headings)
            .into_iter()
            .map(|n| n.heading.title)
            .collect();
        assert_eq!(titles, ["One", "Two", "Three"]);
    }
}
