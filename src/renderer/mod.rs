//! Rendering pipeline for feed documents
//!
//! Turns raw feed bytes into a styled text canvas: decode, parse into a
//! DOM tree, walk the tree with the format renderer's callbacks
//! registered, collect the canvas and document title.

mod canvas;
mod rss;
mod style;

pub use canvas::{Cursor, Line, Link, StyledRun, TextCanvas};
pub use rss::RssRenderer;
pub use style::{
    default_stylesheet, resolve_style, Color, CssParser, Declaration, StyleRule, Stylesheet,
    TextStyle, Value,
};

use crate::dom::DomStack;
use crate::feed::parse_feed;
use crate::utils::Result;

/// Options controlling a render pass
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Charset label the raw document bytes are decoded with
    pub document_charset: String,
    /// Charset label the document title must be representable in
    pub target_charset: String,
    /// Caller stylesheet; the built-in default is used when absent
    pub stylesheet: Option<Stylesheet>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            document_charset: "utf-8".to_string(),
            target_charset: "utf-8".to_string(),
            stylesheet: None,
        }
    }
}

/// A fully rendered document
#[derive(Debug, Clone)]
pub struct RenderedDocument {
    /// Document title, set from the channel title when convertible
    pub title: Option<String>,
    /// The styled text output
    pub canvas: TextCanvas,
}

/// Trait for document renderers
pub trait DocumentRenderer {
    /// Render raw document bytes into styled text
    fn render(&self, data: &[u8]) -> Result<RenderedDocument>;
}

/// RSS/RDF feed renderer
pub struct FeedRenderer {
    options: RenderOptions,
}

impl FeedRenderer {
    /// Create a renderer with default options
    pub fn new() -> Self {
        Self::with_options(RenderOptions::default())
    }

    /// Create a renderer with explicit options
    pub fn with_options(options: RenderOptions) -> Self {
        Self { options }
    }

    /// The options this renderer runs with
    pub fn options(&self) -> &RenderOptions {
        &self.options
    }
}

impl Default for FeedRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentRenderer for FeedRenderer {
    fn render(&self, data: &[u8]) -> Result<RenderedDocument> {
        // 1. Decode and parse the feed into a DOM tree
        let mut tree = parse_feed(data, &self.options.document_charset)?;

        // 2. Walk the tree with the RSS callbacks registered
        let mut handler = RssRenderer::new(&self.options);
        DomStack::new().walk(&mut tree, &mut handler);

        // 3. Collect the canvas and document title
        Ok(handler.finish())
    }
}
