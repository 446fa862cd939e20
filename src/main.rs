use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;

use markview::cli::{CliArgs, CliCommand};
use markview::config::{DocumentKind, PreviewConfig};
use markview::markdown::{build_outline_tree, content_to_preview_html, MarkdownRenderer, PageShell};

mod runtime;

fn main() -> Result<()> {
    markview::tracing::init();

    let args = CliArgs::parse();
    let config = args.load_config()?;

    match args.command.clone() {
        Some(CliCommand::Render { path, page }) => render_command(&config, &path, page),
        Some(CliCommand::Outline { path, json }) => outline_command(&config, &path, json),
        None => runtime::run(config, args.path),
    }
}

/// Print rendered HTML for `path`
fn render_command(config: &PreviewConfig, path: &Path, page: bool) -> Result<()> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let kind = config.document_kind(path).unwrap_or(DocumentKind::Markdown);
    let renderer = MarkdownRenderer::from_config(config);

    let html = if page {
        let shell = PageShell::from_config(config, path.parent());
        content_to_preview_html(&content, kind, &renderer, &shell)
    } else if kind == DocumentKind::Html {
        content
    } else {
        renderer.render(&content).html
    };

    println!("{}", html);
    Ok(())
}

/// Print the heading outline of `path`
fn outline_command(config: &PreviewConfig, path: &Path, json: bool) -> Result<()> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let outline = MarkdownRenderer::from_config(config).render(&content).outline;

    if json {
        let tree = build_outline_tree(&outline);
        println!("{}", serde_json::to_string_pretty(&tree)?);
    } else {
        for heading in &outline {
            let indent = "  ".repeat(usize::from(heading.level.saturating_sub(1)));
            println!("{}- {} (#{})", indent, heading.title, heading.hash);
        }
    }
    Ok(())
}
