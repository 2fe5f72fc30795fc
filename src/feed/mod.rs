//! Feed document vocabulary
//!
//! RSS and RDF feeds share a small closed set of element types. Every
//! element in a parsed tree carries one of these tags; everything the
//! renderer does dispatches on them rather than on raw element names.

mod parser;

pub use parser::{parse_feed, FeedSink};

/// Element types recognized in RSS/RDF feed documents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeedElement {
    /// `<rss>` document root
    Rss,
    /// `<rdf:RDF>` document root (RSS 1.0)
    Rdf,
    /// `<channel>` feed-level container
    Channel,
    /// `<item>` feed entry
    Item,
    /// `<image>` channel image block
    Image,
    /// `<title>` text field
    Title,
    /// `<link>` text field
    Link,
    /// `<description>` text field
    Description,
    /// `<author>` text field (also `dc:creator`)
    Author,
    /// `<pubDate>` text field (also `dc:date`)
    PubDate,
    /// Any element outside the feed vocabulary
    Other,
}

impl FeedElement {
    /// Classify an element name, case-insensitively
    pub fn classify(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "rss" => FeedElement::Rss,
            "rdf:rdf" => FeedElement::Rdf,
            "channel" => FeedElement::Channel,
            "item" => FeedElement::Item,
            "image" => FeedElement::Image,
            "title" => FeedElement::Title,
            "link" => FeedElement::Link,
            "description" => FeedElement::Description,
            "author" | "dc:creator" => FeedElement::Author,
            "pubdate" | "dc:date" => FeedElement::PubDate,
            _ => FeedElement::Other,
        }
    }

    /// Text-bearing field elements nested under a channel or item
    pub fn is_field(self) -> bool {
        matches!(
            self,
            FeedElement::Title
                | FeedElement::Link
                | FeedElement::Description
                | FeedElement::Author
                | FeedElement::PubDate
        )
    }
}
