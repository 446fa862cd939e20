//! Preview pane update handler

use super::commands::Cmd;
use super::dispatch::{resolve, ClickAction};
use super::messages::PreviewMsg;
use super::{PaneState, PreviewPane};
use crate::markdown::MarkdownRenderer;

pub fn update_preview(pane: &mut PreviewPane, msg: PreviewMsg) -> Option<Cmd> {
    match msg {
        PreviewMsg::Attach => {
            if pane.is_attached() {
                tracing::warn!("Preview pane attached twice, ignoring");
                return None;
            }

            let settings = &pane.settings;
            pane.renderer = Some(
                MarkdownRenderer::new(settings.renderer.clone())
                    .with_emoji(settings.emoji.clone()),
            );
            pane.state = PaneState::Idle;
            tracing::info!("Preview pane attached");

            let mut cmds = vec![Cmd::ApplyContainerStyle {
                font_size: settings.font_size.clone(),
                github_style: settings.github_style,
            }];
            // A document that arrived before attach renders now
            cmds.extend(render_document(pane));
            Some(Cmd::batch(cmds))
        }
        PreviewMsg::DocumentChanged(text) => {
            pane.document = Some(text);
            if !pane.is_attached() {
                tracing::debug!("Document changed before attach, deferring render");
                return None;
            }
            let cmds = render_document(pane);
            (!cmds.is_empty()).then(|| Cmd::batch(cmds))
        }
        PreviewMsg::LinkClicked(click) => match resolve(&click) {
            ClickAction::OpenExternal(url) => Some(Cmd::OpenExternal(url)),
            ClickAction::OpenDocument { path, new_window } => {
                Some(Cmd::OpenDocument { path, new_window })
            }
            ClickAction::SetHash(hash) => Some(Cmd::SetHash(hash)),
            ClickAction::Ignore => None,
        },
        PreviewMsg::ScrollToHeading(hash) => {
            if pane.outline.iter().any(|h| h.hash == hash) {
                Some(Cmd::ScrollToElement(hash))
            } else {
                tracing::debug!("No heading with hash '{}' in outline", hash);
                None
            }
        }
    }
}

/// Render the current document and produce the commands that show it
fn render_document(pane: &mut PreviewPane) -> Vec<Cmd> {
    let (Some(renderer), Some(document)) = (pane.renderer.as_ref(), pane.document.as_deref())
    else {
        return Vec::new();
    };

    pane.state = PaneState::Rendering;
    let output = renderer.render(document);

    pane.revision += 1;
    pane.html = output.html;
    pane.outline = output.outline;

    let mut cmds = vec![Cmd::ReplaceContent(pane.html.clone())];
    if output.has_diagrams {
        cmds.push(Cmd::InitDiagrams);
    }
    if output.has_math {
        cmds.push(Cmd::RenderMath);
    }
    cmds.push(Cmd::NotifyDocumentUpdated {
        revision: pane.revision,
        outline: pane.outline.clone(),
    });

    pane.state = PaneState::Idle;
    tracing::debug!(
        "Preview revision {} rendered ({} headings)",
        pane.revision,
        pane.outline.len()
    );
    cmds
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preview::{LinkClick, LinkClickKind, PreviewSettings};

    fn attached_pane() -> PreviewPane {
        let mut pane = PreviewPane::new(PreviewSettings {
            github_style: true,
            ..PreviewSettings::default()
        });
        update_preview(&mut pane, PreviewMsg::Attach);
        pane
    }

    #[test]
    fn test_attach_applies_style() {
        let mut pane = PreviewPane::new(PreviewSettings {
            font_size: Some("18px".to_string()),
            github_style: false,
            ..PreviewSettings::default()
        });
        assert_eq!(pane.state(), PaneState::Detached);

        let cmd = update_preview(&mut pane, PreviewMsg::Attach).unwrap();
        assert_eq!(
            cmd.flatten(),
            vec![Cmd::ApplyContainerStyle {
                font_size: Some("18px".to_string()),
                github_style: false,
            }]
        );
        assert_eq!(pane.state(), PaneState::Idle);
    }

    #[test]
    fn test_default_pane_keeps_github_style() {
        let mut pane = PreviewPane::default();
        let cmd = update_preview(&mut pane, PreviewMsg::Attach).unwrap();
        assert_eq!(
            cmd.flatten(),
            vec![Cmd::ApplyContainerStyle {
                font_size: None,
                github_style: true,
            }]
        );
    }

    #[test]
    fn test_second_attach_ignored() {
        let mut pane = attached_pane();
        assert!(update_preview(&mut pane, PreviewMsg::Attach).is_none());
    }

    #[test]
    fn test_document_before_attach_is_deferred() {
        let mut pane = PreviewPane::default();
        let cmd = update_preview(&mut pane, PreviewMsg::DocumentChanged("# Early".to_string()));
        assert!(cmd.is_none());
        assert_eq!(pane.revision(), 0);

        let cmds = update_preview(&mut pane, PreviewMsg::Attach).unwrap().flatten();
        assert!(matches!(cmds[1], Cmd::ReplaceContent(ref html) if html.contains("Early")));
        assert_eq!(pane.outline()[0].hash, "early");
        assert_eq!(pane.revision(), 1);
    }

    #[test]
    fn test_document_change_renders() {
        let mut pane = attached_pane();
        let cmds = update_preview(&mut pane, PreviewMsg::DocumentChanged("# A\n## B".to_string()))
            .unwrap()
            .flatten();

        assert!(matches!(cmds[0], Cmd::ReplaceContent(_)));
        assert!(matches!(
            cmds.last(),
            Some(Cmd::NotifyDocumentUpdated { revision: 1, outline }) if outline.len() == 2
        ));
        assert!(!cmds.contains(&Cmd::InitDiagrams));
        assert!(!cmds.contains(&Cmd::RenderMath));
        assert_eq!(pane.state(), PaneState::Idle);
        assert_eq!(pane.outline_tree().len(), 1);
    }

    #[test]
    fn test_diagrams_and_math_trigger_init() {
        let mut pane = attached_pane();
        let md = "```mermaid\ngraph TD;\n```\n\n```katex\nx^2\n```\n";
        let cmds = update_preview(&mut pane, PreviewMsg::DocumentChanged(md.to_string()))
            .unwrap()
            .flatten();
        assert!(cmds.contains(&Cmd::InitDiagrams));
        assert!(cmds.contains(&Cmd::RenderMath));
    }

    #[test]
    fn test_link_clicks() {
        let mut pane = attached_pane();
        let external = LinkClick::new(LinkClickKind::External, "https://example.com");
        assert_eq!(
            update_preview(&mut pane, PreviewMsg::LinkClicked(external)),
            Some(Cmd::OpenExternal("https://example.com".to_string()))
        );

        let cancel = LinkClick::new(LinkClickKind::Cancel, "x.png");
        assert_eq!(update_preview(&mut pane, PreviewMsg::LinkClicked(cancel)), None);
    }

    #[test]
    fn test_scroll_to_heading() {
        let mut pane = attached_pane();
        update_preview(&mut pane, PreviewMsg::DocumentChanged("## Setup".to_string()));

        assert_eq!(
            update_preview(&mut pane, PreviewMsg::ScrollToHeading("setup".to_string())),
            Some(Cmd::ScrollToElement("setup".to_string()))
        );
        assert_eq!(
            update_preview(&mut pane, PreviewMsg::ScrollToHeading("missing".to_string())),
            None
        );
    }
}
