//! Integration tests for the feed render pipeline
//!
//! These exercise the whole path: decode, parse, walk, render.

use pretty_assertions::assert_eq;
use proptest::prelude::*;

use lantern::dom::DomStack;
use lantern::feed::{parse_feed, FeedElement};
use lantern::renderer::{Color, CssParser, RssRenderer};
use lantern::{DocumentRenderer, FeedRenderer, RenderOptions, RenderedDocument};

fn render(xml: &str) -> RenderedDocument {
    FeedRenderer::new().render(xml.as_bytes()).unwrap()
}

#[test]
fn test_end_to_end_feed() {
    let document = render(
        r#"<rss version="2.0">
  <channel>
    <title>Feed</title>
    <item>
      <title>Hello</title>
      <link>http://x</link>
      <author>Bob</author>
      <pubDate>Today</pubDate>
    </item>
  </channel>
</rss>"#,
    );

    assert_eq!(document.title, Some("Feed".to_string()));

    let canvas = &document.canvas;
    assert_eq!(canvas.line_text(0), "Feed");
    assert_eq!(canvas.line_text(1), "");
    assert_eq!(canvas.line_text(2), "Hello [link]");
    assert_eq!(canvas.line_text(3), "Bob - Today");

    assert_eq!(canvas.links().len(), 1);
    let link = &canvas.links()[0];
    assert_eq!(link.label, "[link]");
    assert_eq!(link.target, "http://x");
    assert_eq!((link.x, link.y), (6, 2));
}

#[test]
fn test_default_styles_applied() {
    let document = render(
        "<rss><channel><title>Feed</title>\
         <item><author>Bob</author></item></channel></rss>",
    );

    let title_run = &document.canvas.lines()[0].runs()[0];
    assert_eq!(title_run.style.color, Some(Color::rgb(144, 238, 144)));

    let aux_line = document
        .canvas
        .lines()
        .iter()
        .find(|line| line.runs().first().is_some_and(|run| run.text == "Bob"))
        .unwrap();
    assert_eq!(aux_line.runs()[0].style.color, Some(Color::rgb(0, 255, 255)));
}

#[test]
fn test_caller_stylesheet_overrides_default() {
    let sheet = CssParser::new()
        .parse("title { color: red } aux { color: blue }")
        .unwrap();
    let renderer = FeedRenderer::with_options(RenderOptions {
        stylesheet: Some(sheet),
        ..RenderOptions::default()
    });
    let document = renderer
        .render(b"<rss><channel><title>Feed</title></channel></rss>")
        .unwrap();

    let title_run = &document.canvas.lines()[0].runs()[0];
    assert_eq!(title_run.style.color, Some(Color::rgb(255, 0, 0)));
}

#[test]
fn test_separator_with_author_and_date() {
    let document = render(
        "<rss><channel><title>Feed</title>\
         <item><author>A</author><pubDate>D</pubDate></item></channel></rss>",
    );
    assert_eq!(document.canvas.line_text(3), "A - D");
}

#[test]
fn test_separator_with_date_only() {
    let document = render(
        "<rss><channel><title>Feed</title>\
         <item><pubDate>D</pubDate></item></channel></rss>",
    );
    assert_eq!(document.canvas.line_text(3), "D");
}

#[test]
fn test_no_auxiliary_line_without_author_or_date() {
    let document = render(
        "<rss><channel><title>Feed</title>\
         <item><title>Hello</title></item></channel></rss>",
    );
    // The item title line is the last thing written.
    assert_eq!(document.canvas.height(), 3);
    assert_eq!(document.canvas.line_text(2), "Hello");
}

#[test]
fn test_items_render_in_document_order() {
    let document = render(
        "<rss><channel><title>Feed</title>\
         <item><title>One</title></item>\
         <item><title>Two</title></item>\
         <item><title>Three</title></item></channel></rss>",
    );
    assert_eq!(
        document.canvas.to_text(),
        "Feed\n\nOne\n\nTwo\n\nThree"
    );
}

#[test]
fn test_nested_item_is_ignored() {
    let document = render(
        "<rss><channel><title>Feed</title>\
         <item><title>Outer</title><item><title>Inner</title></item></item>\
         </channel></rss>",
    );
    // Only the outer item produces a block; the nested one never opened.
    assert_eq!(document.canvas.to_text(), "Feed\n\nOuter");
}

#[test]
fn test_no_channel_renders_nothing() {
    let document = render("<rss><foo><title>X</title></foo></rss>");
    assert!(document.canvas.is_empty());
    assert_eq!(document.title, None);
}

#[test]
fn test_channel_at_wrong_depth_ignored() {
    let document =
        render("<rss><wrap><channel><title>X</title></channel></wrap></rss>");
    assert!(document.canvas.is_empty());
    assert_eq!(document.title, None);
}

#[test]
fn test_first_channel_wins() {
    let document = render(
        "<rss><channel><title>First</title></channel>\
         <channel><title>Second</title></channel></rss>",
    );
    assert_eq!(document.title, Some("First".to_string()));
    assert_eq!(document.canvas.line_text(0), "First");
}

#[test]
fn test_item_title_never_sets_document_title() {
    let document = render(
        "<rss><channel>\
         <item><title>Hello</title></item></channel></rss>",
    );
    assert_eq!(document.title, None);
    assert_eq!(document.canvas.line_text(2), "Hello");
}

#[test]
fn test_rdf_items_outside_channel() {
    // RSS 1.0 puts items next to the channel rather than inside it; the
    // item path has no depth requirement so they still render.
    let document = render(
        r#"<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#"
                    xmlns:dc="http://purl.org/dc/elements/1.1/">
  <channel><title>Feed</title></channel>
  <item><title>One</title><dc:creator>Ann</dc:creator></item>
</rdf:RDF>"#,
    );
    assert_eq!(document.title, Some("Feed".to_string()));
    assert_eq!(document.canvas.line_text(2), "One");
    assert_eq!(document.canvas.line_text(3), "Ann");
}

#[test]
fn test_field_flattening_is_idempotent() {
    let xml = "<rss><channel><title>Feed</title>\
               <item><description>Hello <b>World</b>!</description></item>\
               </channel></rss>";
    let mut tree = parse_feed(xml.as_bytes(), "utf-8").unwrap();
    let options = RenderOptions::default();

    for _ in 0..2 {
        let mut handler = RssRenderer::new(&options);
        DomStack::new().walk(&mut tree, &mut handler);

        let root_element = tree
            .children(tree.root())
            .iter()
            .copied()
            .find(|&id| tree.element(id).is_some())
            .unwrap();
        let channel = tree
            .first_element_child(root_element, FeedElement::Channel)
            .unwrap();
        let item = tree.first_element_child(channel, FeedElement::Item).unwrap();
        let description = tree
            .first_element_child(item, FeedElement::Description)
            .unwrap();

        // The mixed markup collapsed into a single normalized text node.
        assert_eq!(tree.children(description).len(), 1);
        let text = tree.first_text_child(description).unwrap();
        assert_eq!(tree.text(text), Some("Hello World!"));
    }
}

#[test]
fn test_whitespace_in_item_fields_normalized() {
    let document = render(
        "<rss><channel><title>Feed</title>\
         <item><title>  Hello\n   World  </title></item></channel></rss>",
    );
    assert_eq!(document.canvas.line_text(2), "Hello World");
}

#[test]
fn test_unconvertible_channel_title_left_unset() {
    let renderer = FeedRenderer::with_options(RenderOptions {
        target_charset: "windows-1252".to_string(),
        ..RenderOptions::default()
    });
    let document = renderer
        .render("<rss><channel><title>日本語</title></channel></rss>".as_bytes())
        .unwrap();

    // The styled title line is still emitted; only the document title
    // stays unset.
    assert_eq!(document.title, None);
    assert_eq!(document.canvas.line_text(0), "日本語");
}

#[test]
fn test_legacy_charset_document() {
    let renderer = FeedRenderer::with_options(RenderOptions {
        document_charset: "iso-8859-1".to_string(),
        ..RenderOptions::default()
    });
    let document = renderer
        .render(b"<rss><channel><title>caf\xe9</title></channel></rss>")
        .unwrap();
    assert_eq!(document.title, Some("caf\u{e9}".to_string()));
}

fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

proptest! {
    /// The walk always completes and never panics, whatever the structure.
    #[test]
    fn test_render_never_panics_on_generated_feeds(
        items in proptest::collection::vec(
            ("[a-zA-Z0-9 ]{0,16}", any::<bool>(), any::<bool>(), any::<bool>()),
            0..8,
        ),
        channel_title in "[a-zA-Z0-9 ]{0,16}",
    ) {
        let mut xml = String::from("<rss><channel>");
        xml.push_str(&format!("<title>{}</title>", escape_xml(&channel_title)));
        for (title, with_link, with_author, with_date) in &items {
            xml.push_str("<item>");
            xml.push_str(&format!("<title>{}</title>", escape_xml(title)));
            if *with_link {
                xml.push_str("<link>http://example.com/</link>");
            }
            if *with_author {
                xml.push_str("<author>Ann</author>");
            }
            if *with_date {
                xml.push_str("<pubDate>Today</pubDate>");
            }
            xml.push_str("</item>");
        }
        xml.push_str("</channel></rss>");

        let document = FeedRenderer::new().render(xml.as_bytes()).unwrap();
        // One link per item that declared one, in order.
        let expected_links = items.iter().filter(|(_, l, _, _)| *l).count();
        prop_assert_eq!(document.canvas.links().len(), expected_links);
    }

    /// Arbitrary bytes never panic the pipeline.
    #[test]
    fn test_render_tolerates_arbitrary_bytes(data in proptest::collection::vec(any::<u8>(), 0..512)) {
        let _ = FeedRenderer::new().render(&data);
    }
}
