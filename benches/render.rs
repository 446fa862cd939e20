//! Benchmarks for markdown rendering
//!
//! Run with: cargo bench --bench render

use markview::markdown::{MarkdownRenderer, RendererOptions};
use markview::syntax::Highlighter;

#[global_allocator]
static ALLOC: divan::AllocProfiler = divan::AllocProfiler::system();

fn main() {
    divan::main();
}

const SECTION: &str = r#"
## Section {n}

Some *emphasis*, a [link](https://example.com/{n}) and [a note](notes-{n}.md#top).

- [x] finished task
- [ ] open task

```rust
fn section_{n}(x: i32) -> i32 {
    x * {n}
}
```

| Column | Value |
|--------|-------|
| a      | {n}   |
"#;

fn generate_document(sections: usize) -> String {
    let mut doc = String::from("# Benchmark document\n");
    for n in 0..sections {
        doc.push_str(&SECTION.replace("{n}", &n.to_string()));
    }
    doc
}

#[divan::bench(args = [10, 100, 500])]
fn render_document(bencher: divan::Bencher, sections: usize) {
    let renderer = MarkdownRenderer::new(RendererOptions::default());
    let doc = generate_document(sections);
    bencher.bench_local(|| divan::black_box(renderer.render(&doc)));
}

#[divan::bench(args = [10, 100, 500])]
fn render_without_highlighting(bencher: divan::Bencher, sections: usize) {
    let options = RendererOptions {
        highlight: false,
        ..RendererOptions::default()
    };
    let renderer = MarkdownRenderer::new(options);
    let doc = generate_document(sections);
    bencher.bench_local(|| divan::black_box(renderer.render(&doc)));
}

#[divan::bench(args = [100, 1000])]
fn highlight_rust(bencher: divan::Bencher, lines: usize) {
    let highlighter = Highlighter::new();
    let code: String = (0..lines)
        .map(|i| format!("let value_{i} = compute({i}) + 1;\n"))
        .collect();
    bencher.bench_local(|| divan::black_box(highlighter.highlight("rust", &code)));
}

#[divan::bench]
fn build_highlighter() -> Highlighter {
    Highlighter::new()
}
