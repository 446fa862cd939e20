//! Markdown to HTML renderer using pulldown-cmark
//!
//! The parser's event stream is rewritten before it reaches
//! `pulldown_cmark::html`: task list items, emoji text, links, headings and
//! fenced code all get custom markup. Everything a render accumulates (link
//! ids, tooltips, outline) lives in a per-call [`RenderContext`], so
//! `render` takes `&self` and repeated renders are independent.

use pulldown_cmark::{
    html, CodeBlockKind, CowStr, Event, LinkType, Options, Parser, Tag, TagEnd,
};

use super::code::render_code_block;
use super::links::{anchor_open, is_unsafe_href, tooltip, LinkRouter};
use super::outline::{Heading, SlugTracker};
use crate::config::{FileExtConfig, PreviewConfig};
use crate::emoji::EmojiReplacer;
use crate::syntax::Highlighter;

const TASK_ITEM_OPEN: &str = "<li class=\"task-list-item\">";
const CHECKBOX_CHECKED: &str = "<input type=\"checkbox\" class=\"task-list-item-checkbox\" checked=\"checked\" disabled=\"disabled\">";
const CHECKBOX_UNCHECKED: &str =
    "<input type=\"checkbox\" class=\"task-list-item-checkbox\" disabled=\"disabled\">";

/// Knobs for one renderer instance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RendererOptions {
    /// Extensions (without dot) whose links open in the app
    pub markdown_exts: Vec<String>,
    /// Drop script links and escape raw HTML
    pub sanitize: bool,
    /// Run fenced code through the syntax highlighter
    pub highlight: bool,
    pub header_prefix: String,
    pub unique_heading_ids: bool,
}

impl Default for RendererOptions {
    fn default() -> Self {
        Self {
            markdown_exts: FileExtConfig::default().markdown,
            sanitize: true,
            highlight: true,
            header_prefix: String::new(),
            unique_heading_ids: true,
        }
    }
}

impl RendererOptions {
    pub fn from_config(config: &PreviewConfig) -> Self {
        Self {
            markdown_exts: config.file_ext.markdown.clone(),
            sanitize: config.markdown.sanitize,
            highlight: config.markdown.highlight,
            header_prefix: config.markdown.header_prefix.clone(),
            unique_heading_ids: config.markdown.unique_heading_ids,
        }
    }
}

/// Result of one render
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderOutput {
    /// Document HTML followed by the link tooltips
    pub html: String,
    /// Headings in document order
    pub outline: Vec<Heading>,
    /// At least one mermaid block was emitted
    pub has_diagrams: bool,
    /// At least one katex block was emitted
    pub has_math: bool,
    /// Number of links wired to a click handler
    pub link_count: usize,
}

/// Markdown renderer with preview-specific hooks
#[derive(Debug)]
pub struct MarkdownRenderer {
    options: RendererOptions,
    router: LinkRouter,
    emoji: EmojiReplacer,
    highlighter: Highlighter,
}

impl MarkdownRenderer {
    pub fn new(options: RendererOptions) -> Self {
        Self {
            router: LinkRouter::new(&options.markdown_exts),
            options,
            emoji: EmojiReplacer::disabled(),
            highlighter: Highlighter::new(),
        }
    }

    /// Renderer configured from the preview config, emoji images included
    pub fn from_config(config: &PreviewConfig) -> Self {
        Self::new(RendererOptions::from_config(config))
            .with_emoji(EmojiReplacer::from_config(&config.emoji))
    }

    pub fn with_emoji(mut self, emoji: EmojiReplacer) -> Self {
        self.emoji = emoji;
        self
    }

    pub fn with_highlighter(mut self, highlighter: Highlighter) -> Self {
        self.highlighter = highlighter;
        self
    }

    pub fn options(&self) -> &RendererOptions {
        &self.options
    }

    /// Render markdown to an HTML fragment and collect its outline
    pub fn render(&self, markdown: &str) -> RenderOutput {
        let sanitize = self.options.sanitize;
        let events: Vec<Event<'_>> = Parser::new_ext(markdown, parser_options())
            .map(|event| if sanitize { escape_raw_html(event) } else { event })
            .collect();

        let mut ctx = RenderContext::new(self);
        let mut out = Vec::with_capacity(events.len());
        ctx.transform(&events, &mut out);

        let mut html_output = String::with_capacity(markdown.len() * 3 / 2);
        html::push_html(&mut html_output, out.into_iter());
        html_output.push_str(&ctx.tooltips);

        tracing::debug!(
            "Rendered {} bytes of markdown: {} headings, {} links",
            markdown.len(),
            ctx.outline.len(),
            ctx.link_id
        );

        RenderOutput {
            html: html_output,
            outline: ctx.outline,
            has_diagrams: ctx.has_diagrams,
            has_math: ctx.has_math,
            link_count: ctx.link_id,
        }
    }
}

fn parser_options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
}

/// Raw HTML from the source becomes literal text
fn escape_raw_html(event: Event<'_>) -> Event<'_> {
    match event {
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
        other => other,
    }
}

/// Mutable state of a single render call
struct RenderContext<'r> {
    renderer: &'r MarkdownRenderer,
    link_id: usize,
    tooltips: String,
    outline: Vec<Heading>,
    slugs: SlugTracker,
    image_depth: usize,
    has_diagrams: bool,
    has_math: bool,
}

impl<'r> RenderContext<'r> {
    fn new(renderer: &'r MarkdownRenderer) -> Self {
        Self {
            renderer,
            link_id: 0,
            tooltips: String::new(),
            outline: Vec::new(),
            slugs: SlugTracker::new(
                &renderer.options.header_prefix,
                renderer.options.unique_heading_ids,
            ),
            image_depth: 0,
            has_diagrams: false,
            has_math: false,
        }
    }

    fn transform<'a>(&mut self, events: &[Event<'a>], out: &mut Vec<Event<'a>>) {
        let mut i = 0;
        while i < events.len() {
            match &events[i] {
                Event::Start(Tag::Item) if is_task_item(&events[i + 1..]) => {
                    out.push(Event::Html(TASK_ITEM_OPEN.into()));
                }
                Event::TaskListMarker(checked) => {
                    let checkbox = if *checked {
                        CHECKBOX_CHECKED
                    } else {
                        CHECKBOX_UNCHECKED
                    };
                    out.push(Event::InlineHtml(checkbox.into()));
                }
                Event::Text(text) if self.image_depth == 0 => {
                    match self.renderer.emoji.replace_with_images(text) {
                        Some(replaced) => out.push(Event::InlineHtml(replaced.into())),
                        None => out.push(events[i].clone()),
                    }
                }
                Event::Start(Tag::Image { .. }) => {
                    self.image_depth += 1;
                    out.push(events[i].clone());
                }
                Event::End(TagEnd::Image) => {
                    self.image_depth = self.image_depth.saturating_sub(1);
                    out.push(events[i].clone());
                }
                Event::Start(Tag::Link { .. }) if self.image_depth > 0 => {
                    // Alt text is plain text; keep only the link's content
                    let end = find_end(events, i, |e| matches!(e, Event::End(TagEnd::Link)));
                    self.transform(&events[i + 1..end], out);
                    i = end;
                }
                Event::Start(Tag::Link {
                    link_type,
                    dest_url,
                    title,
                    ..
                }) => {
                    let end = find_end(events, i, |e| matches!(e, Event::End(TagEnd::Link)));
                    let href: CowStr<'a> = if *link_type == LinkType::Email {
                        format!("mailto:{}", dest_url).into()
                    } else {
                        dest_url.clone()
                    };
                    self.link(events, i, end, &href, title, out);
                    i = end;
                }
                Event::Start(Tag::Heading { level, .. }) => {
                    let end = find_end(events, i, |e| matches!(e, Event::End(TagEnd::Heading(_))));
                    self.heading(*level as u8, &events[i + 1..end], out);
                    i = end;
                }
                Event::Start(Tag::CodeBlock(kind)) => {
                    let end = find_end(events, i, |e| matches!(e, Event::End(TagEnd::CodeBlock)));
                    self.code_block(kind, &events[i + 1..end], out);
                    i = end;
                }
                _ => out.push(events[i].clone()),
            }
            i += 1;
        }
    }

    fn link<'a>(
        &mut self,
        events: &[Event<'a>],
        start: usize,
        end: usize,
        dest_url: &CowStr<'a>,
        title: &CowStr<'a>,
        out: &mut Vec<Event<'a>>,
    ) {
        let inner = &events[start + 1..end];

        if dest_url.is_empty() {
            out.push(events[start].clone());
            self.transform(inner, out);
            if let Some(close) = events.get(end) {
                out.push(close.clone());
            }
            return;
        }

        if self.renderer.options.sanitize && is_unsafe_href(dest_url) {
            tracing::debug!("Sanitized unsafe link {:?}", dest_url.as_ref());
            return;
        }

        self.link_id += 1;
        let id = format!("md-link-{}", self.link_id);
        let kind = self.renderer.router.classify(dest_url);

        out.push(Event::InlineHtml(
            anchor_open(&id, dest_url, kind, title).into(),
        ));
        self.transform(inner, out);
        out.push(Event::InlineHtml("</a>".into()));
        self.tooltips.push_str(&tooltip(&id, dest_url));
    }

    fn heading<'a>(&mut self, level: u8, inner: &[Event<'a>], out: &mut Vec<Event<'a>>) {
        let title = plain_text(inner);

        let mut inner_events = Vec::with_capacity(inner.len());
        self.transform(inner, &mut inner_events);
        let mut inner_html = String::new();
        html::push_html(&mut inner_html, inner_events.into_iter());

        let hash = self.slugs.next(&title);
        out.push(Event::Html(
            format!(
                "<h{level} id=\"{}\">{}</h{level}>\n",
                html_escape::encode_double_quoted_attribute(&hash),
                inner_html,
                level = level
            )
            .into(),
        ));

        self.outline.push(Heading {
            title,
            hash,
            level,
            html: inner_html,
        });
    }

    fn code_block<'a>(
        &mut self,
        kind: &CodeBlockKind<'a>,
        inner: &[Event<'a>],
        out: &mut Vec<Event<'a>>,
    ) {
        let code: String = inner
            .iter()
            .filter_map(|e| match e {
                Event::Text(text) => Some(text.as_ref()),
                _ => None,
            })
            .collect();

        let info = match kind {
            CodeBlockKind::Fenced(info) => Some(info.as_ref()),
            CodeBlockKind::Indented => None,
        };
        let highlighter = self
            .renderer
            .options
            .highlight
            .then_some(&self.renderer.highlighter);

        let block = render_code_block(info, &code, highlighter);
        self.has_diagrams |= block.diagram;
        self.has_math |= block.math;
        out.push(Event::Html(block.html.into()));
    }
}

/// Index of the first event after `start` matching `is_end`, or `events.len()`
fn find_end(events: &[Event<'_>], start: usize, is_end: impl Fn(&Event<'_>) -> bool) -> usize {
    events[start + 1..]
        .iter()
        .position(is_end)
        .map(|offset| start + 1 + offset)
        .unwrap_or(events.len())
}

/// Whether the events following `Start(Item)` open with a task marker.
/// Loose lists wrap the marker in a paragraph.
fn is_task_item(rest: &[Event<'_>]) -> bool {
    matches!(
        rest,
        [Event::TaskListMarker(_), ..] | [Event::Start(Tag::Paragraph), Event::TaskListMarker(_), ..]
    )
}

/// Text content of inline events, markup dropped
fn plain_text(events: &[Event<'_>]) -> String {
    let mut text = String::new();
    for event in events {
        match event {
            Event::Text(t) | Event::Code(t) => text.push_str(t),
            Event::SoftBreak | Event::HardBreak => text.push(' '),
            _ => {}
        }
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(markdown: &str) -> RenderOutput {
        MarkdownRenderer::new(RendererOptions::default()).render(markdown)
    }

    #[test]
    fn test_basic_document() {
        let output = render("# Hello\n\nWorld");
        assert!(output.html.contains("<h1 id=\"hello\">Hello</h1>"));
        assert!(output.html.contains("<p>World</p>"));
        assert_eq!(output.outline.len(), 1);
    }

    #[test]
    fn test_tables() {
        let output = render("| A | B |\n|---|---|\n| 1 | 2 |");
        assert!(output.html.contains("<table>"));
        assert!(output.html.contains("<th>"));
        assert!(output.html.contains("<td>"));
    }

    #[test]
    fn test_heading_html_keeps_inline_markup() {
        let output = render("## Use `cargo` *now*");
        let heading = &output.outline[0];
        assert_eq!(heading.title, "Use cargo now");
        assert_eq!(heading.hash, "use-cargo-now");
        assert_eq!(heading.html, "Use <code>cargo</code> <em>now</em>");
    }

    #[test]
    fn test_setext_heading() {
        let output = render("Title\n=====\n");
        assert_eq!(output.outline[0].level, 1);
        assert_eq!(output.outline[0].hash, "title");
    }

    #[test]
    fn test_loose_task_list() {
        let output = render("- [x] done\n\n- [ ] todo\n");
        assert_eq!(output.html.matches(TASK_ITEM_OPEN).count(), 2);
        assert!(output.html.contains(CHECKBOX_CHECKED));
        assert!(output.html.contains(CHECKBOX_UNCHECKED));
    }

    #[test]
    fn test_plain_list_item_untouched() {
        let output = render("- plain\n");
        assert!(output.html.contains("<li>plain</li>"));
        assert!(!output.html.contains("task-list-item"));
    }

    #[test]
    fn test_empty_href_falls_back_to_default() {
        let output = render("[nothing]()");
        assert!(output.html.contains("<a href=\"\">nothing</a>"));
        assert_eq!(output.link_count, 0);
    }

    #[test]
    fn test_link_inside_heading_gets_tooltip() {
        let output = render("# See [docs](guide.md)");
        assert!(output.html.contains("id=\"md-link-1\""));
        assert!(output.html.contains("data-for=\"md-link-1\""));
        assert_eq!(output.outline[0].title, "See docs");
    }

    #[test]
    fn test_raw_html_escaped_when_sanitizing() {
        let output = render("<script>alert(1)</script>\n\nhi <b>there</b>");
        assert!(!output.html.contains("<script>"));
        assert!(output.html.contains("&lt;script&gt;"));
        assert!(output.html.contains("&lt;b&gt;"));
    }

    #[test]
    fn test_raw_html_kept_without_sanitize() {
        let options = RendererOptions {
            sanitize: false,
            ..RendererOptions::default()
        };
        let output = MarkdownRenderer::new(options).render("hi <b>there</b>");
        assert!(output.html.contains("<b>there</b>"));
    }

    #[test]
    fn test_emoji_not_applied_to_image_alt() {
        let emoji = EmojiReplacer::new("/e", vec!["smile".to_string()]);
        let renderer = MarkdownRenderer::new(RendererOptions::default()).with_emoji(emoji);
        let output = renderer.render("![:smile:](a.png) :smile:");
        assert!(output.html.contains("alt=\":smile:\" />"));
        assert_eq!(output.html.matches("class=\"emoji\"").count(), 1);
    }

    #[test]
    fn test_plain_text_helper() {
        let events: Vec<Event<'_>> = Parser::new("a *b* `c`\nd").collect();
        assert_eq!(plain_text(&events), "a b c d");
    }
}
