//! # Lantern - Text-Mode Feed Rendering Engine
//!
//! A rendering engine for text-mode browsing: parses RSS/RDF feed
//! documents into a generic DOM tree and renders them as styled text
//! with hyperlinks.
//!
//! ## Architecture
//!
//! The engine is organized into the following core modules:
//!
//! - **dom**: Arena-backed DOM tree and the traversal stack driving
//!   per-node callback dispatch
//! - **feed**: Feed vocabulary and the xml5ever-based parser
//! - **renderer**: Style resolution, the text canvas, the RSS format
//!   renderer, and the pipeline tying them together
//! - **utils**: Shared utilities and error types

pub mod dom;
pub mod feed;
pub mod renderer;
pub mod utils;

// Re-export main types for convenience
pub use renderer::{DocumentRenderer, FeedRenderer, RenderOptions, RenderedDocument};
pub use utils::error::{Error, Result};

/// Engine version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = "Lantern";
