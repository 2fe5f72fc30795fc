//! DOM-based RSS renderer
//!
//! Walks a parsed feed tree and renders it as styled text. During the walk
//! only structure is collected (which element is the channel, the items in
//! document order, the open item's text fields); nothing is written to the
//! canvas until the document pops, because document order and channel
//! identity are only complete once the whole tree has been visited.

use encoding_rs::Encoding;

use crate::dom::{DomHandler, DomTree, NodeId, WalkState};
use crate::feed::FeedElement;

use super::canvas::TextCanvas;
use super::style::{default_stylesheet, resolve_style, TextStyle};
use super::{RenderOptions, RenderedDocument};

/// Label emitted for item links
const LINK_LABEL: &str = "[link]";

/// Stack depth at which a channel element is accepted:
/// document, feed root, channel.
const CHANNEL_DEPTH: usize = 3;

/// Per-traversal renderer state, created at document-enter and consumed at
/// document-exit
struct RssContext {
    title_style: TextStyle,
    aux_style: TextStyle,
    /// The feed-level container; first qualifying element wins
    channel: Option<NodeId>,
    /// Item elements in document order
    items: Vec<NodeId>,
    /// The item currently open, if any; at most one at a time
    item: Option<NodeId>,
    /// The text field currently collecting, if any
    node: Option<NodeId>,
    /// Accumulated field text; meaningful only while `node` is set
    text: Option<String>,
}

/// Stack callbacks and state for rendering RSS/RDF feeds
pub struct RssRenderer<'a> {
    options: &'a RenderOptions,
    canvas: TextCanvas,
    title: Option<String>,
    ctx: Option<RssContext>,
}

impl<'a> RssRenderer<'a> {
    /// Create a renderer for one traversal
    pub fn new(options: &'a RenderOptions) -> Self {
        Self {
            options,
            canvas: TextCanvas::new(),
            title: None,
            ctx: None,
        }
    }

    /// Consume the renderer after the walk, yielding the rendered document
    pub fn finish(self) -> RenderedDocument {
        RenderedDocument {
            title: self.title,
            canvas: self.canvas,
        }
    }

    /// First text content of the container's first field child of `tag`
    ///
    /// The read path behind item rendering; after field flattening this is
    /// the whole field content, and on untouched fields it is the first
    /// text node the parser produced.
    fn field_text(tree: &DomTree, container: NodeId, tag: FeedElement) -> Option<&str> {
        let field = tree.first_element_child(container, tag)?;
        let text = tree.first_text_child(field)?;
        tree.text(text)
    }

    /// Render one channel or item block: title line with an inline link
    /// marker, then an author/date line that is omitted when both are absent
    fn render_block(&mut self, tree: &DomTree, ctx: &RssContext, container: NodeId) {
        let title = Self::field_text(tree, container, FeedElement::Title);
        let link = Self::field_text(tree, container, FeedElement::Link);
        let author = Self::field_text(tree, container, FeedElement::Author).filter(|a| !a.is_empty());
        let date = Self::field_text(tree, container, FeedElement::PubDate).filter(|d| !d.is_empty());

        if let Some(title) = title.filter(|t| !t.is_empty()) {
            if Some(container) == ctx.channel {
                // The channel title doubles as the document title,
                // best-effort: an unconvertible title stays unset.
                self.title = convert_title(title, &self.options.target_charset);
            }
            self.canvas.emit_text(&ctx.title_style, title);
        }

        if let Some(link) = link.filter(|l| !l.is_empty()) {
            self.canvas.cursor.x += 1;
            self.canvas.emit_link(LINK_LABEL, link);
        }

        // New line, and indent
        self.canvas.cursor.y += 1;
        self.canvas.cursor.x = 0;

        if let Some(author) = author {
            self.canvas.emit_text(&ctx.aux_style, author);
        }

        if let Some(date) = date {
            if author.is_some() {
                self.canvas.emit_text(&ctx.aux_style, " - ");
            }
            self.canvas.emit_text(&ctx.aux_style, date);
        }

        if author.is_some() || date.is_some() {
            self.canvas.cursor.y += 1;
            self.canvas.cursor.x = 0;
        }
    }
}

impl DomHandler for RssRenderer<'_> {
    fn enter_document(&mut self, _walk: &WalkState, _tree: &mut DomTree, _node: NodeId) {
        let sheet = match &self.options.stylesheet {
            Some(sheet) => sheet,
            None => default_stylesheet(),
        };
        self.ctx = Some(RssContext {
            title_style: resolve_style(sheet, "title"),
            aux_style: resolve_style(sheet, "aux"),
            channel: None,
            items: Vec::new(),
            item: None,
            node: None,
            text: None,
        });
    }

    fn enter_element(&mut self, walk: &WalkState, tree: &mut DomTree, node: NodeId) {
        let Some(ctx) = self.ctx.as_mut() else {
            return;
        };
        let Some(element) = tree.element(node) else {
            return;
        };

        match element.tag {
            FeedElement::Channel => {
                // The stack should hold: document, feed root, channel.
                if walk.depth() != CHANNEL_DEPTH {
                    return;
                }
                if ctx.channel.is_none() {
                    ctx.channel = Some(node);
                }
            }
            FeedElement::Item => {
                // No depth requirement here, but be exclusive: an item
                // opened inside an open item is ignored.
                if ctx.item.is_some() {
                    return;
                }
                ctx.items.push(node);
                ctx.item = Some(node);
            }
            tag if tag.is_field() => {
                let Some(parent) = tree.parent(node) else {
                    return;
                };
                let accepted = match ctx.node {
                    Some(open) => parent == open,
                    None => {
                        Some(parent) == ctx.item
                            || (ctx.item.is_none() && Some(parent) == ctx.channel)
                    }
                };
                if accepted {
                    ctx.node = Some(node);
                }
            }
            _ => {}
        }
    }

    fn enter_text(&mut self, _walk: &WalkState, tree: &mut DomTree, node: NodeId) {
        let Some(ctx) = self.ctx.as_mut() else {
            return;
        };
        if ctx.node.is_none() {
            return;
        }
        if let Some(content) = tree.text(node) {
            ctx.text.get_or_insert_with(String::new).push_str(content);
        }
    }

    fn exit_element(&mut self, _walk: &WalkState, tree: &mut DomTree, node: NodeId) {
        let Some(ctx) = self.ctx.as_mut() else {
            return;
        };
        let Some(element) = tree.element(node) else {
            return;
        };

        match element.tag {
            FeedElement::Item => {
                ctx.text = None;
                ctx.item = None;
            }
            tag if tag.is_field() => {
                if ctx.node != Some(node) {
                    return;
                }
                let normalized = ctx
                    .text
                    .take()
                    .map(|text| normalize_text(&text))
                    .filter(|text| !text.is_empty());
                if let Some(text) = normalized {
                    let is_open_item_child = match (tree.parent(node), ctx.item) {
                        (Some(parent), Some(open)) => parent == open,
                        _ => false,
                    };
                    if is_open_item_child {
                        // Replace whatever mixed children the field carried
                        // with the normalized text; inner markup is
                        // deliberately flattened away.
                        let replacement = tree.new_text(text);
                        tree.replace_children(node, Some(replacement));
                    }
                }
                ctx.node = None;
            }
            _ => {}
        }
    }

    fn exit_document(&mut self, _walk: &WalkState, tree: &mut DomTree, _node: NodeId) {
        let Some(ctx) = self.ctx.take() else {
            return;
        };
        let Some(channel) = ctx.channel else {
            // No channel, nothing to render; the context is gone either way.
            log::debug!("feed document without a channel, skipping render");
            return;
        };

        self.render_block(tree, &ctx, channel);

        for &item in &ctx.items {
            self.canvas.cursor.y += 1;
            self.canvas.cursor.x = 0;
            self.render_block(tree, &ctx, item);
        }
    }
}

/// Collapse whitespace runs to single spaces and trim the ends
fn normalize_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Re-express a title in the target charset, or None if it cannot be
/// represented there
fn convert_title(title: &str, charset: &str) -> Option<String> {
    let encoding = Encoding::for_label(charset.as_bytes())?;
    let (encoded, _, had_errors) = encoding.encode(title);
    if had_errors {
        log::debug!("title not representable in {}, leaving unset", charset);
        return None;
    }
    let (decoded, _, _) = encoding.decode(&encoded);
    Some(decoded.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_collapses_whitespace() {
        assert_eq!(normalize_text("  Hello\n\t world "), "Hello world");
        assert_eq!(normalize_text(" \n\t "), "");
        assert_eq!(normalize_text("plain"), "plain");
    }

    #[test]
    fn test_convert_title_utf8() {
        assert_eq!(convert_title("Feed", "utf-8"), Some("Feed".to_string()));
    }

    #[test]
    fn test_convert_title_legacy_charset() {
        assert_eq!(
            convert_title("café", "windows-1252"),
            Some("café".to_string())
        );
    }

    #[test]
    fn test_convert_title_unmappable() {
        assert_eq!(convert_title("日本語", "windows-1252"), None);
    }

    #[test]
    fn test_convert_title_unknown_charset() {
        assert_eq!(convert_title("Feed", "no-such-charset"), None);
    }
}
