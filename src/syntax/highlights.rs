//! Highlight capture names and span-to-HTML conversion

use std::collections::HashSet;

/// Standard tree-sitter capture names the preview stylesheet knows about.
/// Index into this array is the HighlightId.
pub const HIGHLIGHT_NAMES: &[&str] = &[
    "attribute",
    "boolean",
    "comment",
    "constant",
    "constant.builtin",
    "constructor",
    "escape",
    "function",
    "function.builtin",
    "function.method",
    "keyword",
    "label",
    "number",
    "operator",
    "property",
    "punctuation",
    "punctuation.bracket",
    "punctuation.delimiter",
    "string",
    "string.special",
    "tag",
    "type",
    "type.builtin",
    "variable",
    "variable.builtin",
    "variable.parameter",
];

/// Index into HIGHLIGHT_NAMES
pub type HighlightId = u16;

/// A highlighted byte range of a code block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HighlightSpan {
    /// Start byte (inclusive)
    pub start: usize,
    /// End byte (exclusive)
    pub end: usize,
    pub highlight: HighlightId,
}

/// Look up highlight ID by capture name
pub fn highlight_id_for_name(name: &str) -> Option<HighlightId> {
    // Try exact match first, then progressively shorter parents
    // (e.g. "keyword.control.import" -> "keyword.control" -> "keyword").
    let mut current = name;
    loop {
        if let Some(pos) = HIGHLIGHT_NAMES.iter().position(|&n| n == current) {
            return Some(pos as HighlightId);
        }

        let Some(dot_pos) = current.rfind('.') else {
            break;
        };
        current = &current[..dot_pos];
    }

    None
}

/// CSS class for a highlight, e.g. `hl-function-method`
pub fn css_class(id: HighlightId) -> String {
    let name = HIGHLIGHT_NAMES.get(id as usize).copied().unwrap_or("text");
    format!("hl-{}", name.replace('.', "-"))
}

/// Render `source` as escaped HTML with `<span class="hl-…">` around highlighted runs.
///
/// Spans may nest or overlap; the innermost (shortest) span wins for every
/// byte. Among spans covering exactly the same range the first one wins,
/// matching tree-sitter's pattern-order precedence.
pub fn spans_to_html(source: &str, spans: &[HighlightSpan]) -> String {
    let mut seen: HashSet<(usize, usize)> = HashSet::with_capacity(spans.len());
    let mut ordered: Vec<HighlightSpan> = Vec::with_capacity(spans.len());
    for span in spans {
        if span.start >= span.end || span.end > source.len() {
            continue;
        }
        if !seen.insert((span.start, span.end)) {
            continue;
        }
        ordered.push(*span);
    }
    // Stable sort: widest first so narrower spans paint over them
    ordered.sort_by_key(|s| std::cmp::Reverse(s.end - s.start));

    let mut paint: Vec<Option<HighlightId>> = vec![None; source.len()];
    for span in &ordered {
        for slot in &mut paint[span.start..span.end] {
            *slot = Some(span.highlight);
        }
    }

    let mut html = String::with_capacity(source.len() * 2);
    let mut run_start = 0;
    while run_start < source.len() {
        let current = paint[run_start];
        let mut run_end = run_start + 1;
        while run_end < source.len() && (paint[run_end] == current || !source.is_char_boundary(run_end))
        {
            run_end += 1;
        }

        let text = html_escape::encode_text(&source[run_start..run_end]);
        match current {
            Some(id) => {
                html.push_str(&format!(r#"<span class="{}">"#, css_class(id)));
                html.push_str(&text);
                html.push_str("</span>");
            }
            None => html.push_str(&text),
        }
        run_start = run_end;
    }

    html
}
