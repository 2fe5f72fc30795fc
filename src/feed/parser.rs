//! Feed parser building the DOM tree via xml5ever

use std::borrow::Cow;
use std::cell::{Ref, RefCell};
use std::collections::HashMap;

use encoding_rs::Encoding;
use markup5ever::interface::tree_builder::{ElementFlags, NodeOrText, QuirksMode, TreeSink};
use markup5ever::{Attribute, QualName};
use xml5ever::driver::parse_document;
use xml5ever::tendril::{StrTendril, TendrilSink};

use crate::dom::{DomTree, ElementData, NodeId};
use crate::utils::{Error, Result};

/// Element or attribute name in its prefixed source form (e.g. "dc:creator")
fn prefixed_name(name: &QualName) -> String {
    match &name.prefix {
        Some(prefix) => format!("{}:{}", prefix, name.local),
        None => name.local.to_string(),
    }
}

/// Internal node representation during parsing
struct SinkNode {
    kind: SinkKind,
    children: Vec<usize>,
}

enum SinkKind {
    Document,
    Element {
        name: String,
        attrs: HashMap<String, String>,
    },
    Text(String),
    Comment(String),
    Pi {
        target: String,
        data: String,
    },
    Doctype,
}

/// Tree sink that accumulates the parse into an arena, then converts it
/// into a [`DomTree`]
pub struct FeedSink {
    /// Arena of parse-time nodes; node 0 is the document
    nodes: RefCell<Vec<SinkNode>>,
    /// QualNames for elements, parallel to `nodes` (None for non-elements)
    qual_names: RefCell<Vec<Option<QualName>>>,
}

impl FeedSink {
    /// Create a sink holding only the document node
    pub fn new() -> Self {
        Self {
            nodes: RefCell::new(vec![SinkNode {
                kind: SinkKind::Document,
                children: Vec::new(),
            }]),
            qual_names: RefCell::new(vec![None]),
        }
    }

    fn new_handle(&self, kind: SinkKind, qual_name: Option<QualName>) -> usize {
        let mut nodes = self.nodes.borrow_mut();
        let handle = nodes.len();
        nodes.push(SinkNode {
            kind,
            children: Vec::new(),
        });
        self.qual_names.borrow_mut().push(qual_name);
        handle
    }

    /// Convert the parse arena into the public tree
    ///
    /// Doctype nodes and whitespace-only text between elements are dropped;
    /// parent links are established here.
    pub fn into_tree(self) -> DomTree {
        let nodes = self.nodes.into_inner();
        let mut tree = DomTree::new();
        let root = tree.root();
        for &child in &nodes[0].children {
            Self::convert_node(&nodes, child, &mut tree, root);
        }
        tree
    }

    fn convert_node(nodes: &[SinkNode], handle: usize, tree: &mut DomTree, parent: NodeId) {
        match &nodes[handle].kind {
            SinkKind::Document | SinkKind::Doctype => {}
            SinkKind::Element { name, attrs } => {
                let mut data = ElementData::new(name.clone());
                for (key, value) in attrs {
                    data.set_attribute(key.clone(), value.clone());
                }
                let id = tree.new_element(data);
                tree.append_child(parent, id);
                for &child in &nodes[handle].children {
                    Self::convert_node(nodes, child, tree, id);
                }
            }
            SinkKind::Text(content) => {
                if !content.trim().is_empty() {
                    let id = tree.new_text(content.clone());
                    tree.append_child(parent, id);
                }
            }
            SinkKind::Comment(content) => {
                let id = tree.new_comment(content.clone());
                tree.append_child(parent, id);
            }
            SinkKind::Pi { target, data } => {
                let id = tree.new_pi(target.clone(), data.clone());
                tree.append_child(parent, id);
            }
        }
    }
}

impl Default for FeedSink {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeSink for FeedSink {
    type Handle = usize;
    type Output = Self;
    type ElemName<'a>
        = Ref<'a, QualName>
    where
        Self: 'a;

    fn finish(self) -> Self::Output {
        self
    }

    fn parse_error(&self, _msg: Cow<'static, str>) {}

    fn get_document(&self) -> usize {
        0
    }

    fn elem_name<'a>(&'a self, target: &'a usize) -> Self::ElemName<'a> {
        Ref::map(self.qual_names.borrow(), |names| {
            names[*target]
                .as_ref()
                .expect("elem_name called on a node which is not an element")
        })
    }

    fn create_element(&self, name: QualName, attrs: Vec<Attribute>, _flags: ElementFlags) -> usize {
        let element_name = prefixed_name(&name);
        let mut attr_map = HashMap::new();
        for attr in attrs {
            attr_map.insert(prefixed_name(&attr.name), attr.value.to_string());
        }
        self.new_handle(
            SinkKind::Element {
                name: element_name,
                attrs: attr_map,
            },
            Some(name),
        )
    }

    fn create_comment(&self, text: StrTendril) -> usize {
        self.new_handle(SinkKind::Comment(text.to_string()), None)
    }

    fn create_pi(&self, target: StrTendril, data: StrTendril) -> usize {
        self.new_handle(
            SinkKind::Pi {
                target: target.to_string(),
                data: data.to_string(),
            },
            None,
        )
    }

    fn append(&self, parent: &usize, child: NodeOrText<usize>) {
        match child {
            NodeOrText::AppendNode(id) => self.nodes.borrow_mut()[*parent].children.push(id),
            NodeOrText::AppendText(text) => {
                // Merge adjacent text so a field's content stays one node.
                {
                    let mut nodes = self.nodes.borrow_mut();
                    if let Some(&last) = nodes[*parent].children.last() {
                        if let SinkKind::Text(existing) = &mut nodes[last].kind {
                            existing.push_str(&text);
                            return;
                        }
                    }
                }
                let id = self.new_handle(SinkKind::Text(text.to_string()), None);
                self.nodes.borrow_mut()[*parent].children.push(id);
            }
        }
    }

    fn append_before_sibling(&self, sibling: &usize, new_node: NodeOrText<usize>) {
        let child = match new_node {
            NodeOrText::AppendNode(id) => id,
            NodeOrText::AppendText(text) => self.new_handle(SinkKind::Text(text.to_string()), None),
        };
        let mut nodes = self.nodes.borrow_mut();
        for index in 0..nodes.len() {
            if let Some(pos) = nodes[index].children.iter().position(|id| id == sibling) {
                nodes[index].children.insert(pos, child);
                return;
            }
        }
    }

    fn append_based_on_parent_node(
        &self,
        _element: &usize,
        prev_element: &usize,
        child: NodeOrText<usize>,
    ) {
        self.append(prev_element, child);
    }

    fn append_doctype_to_document(
        &self,
        _name: StrTendril,
        _public_id: StrTendril,
        _system_id: StrTendril,
    ) {
        let doctype = self.new_handle(SinkKind::Doctype, None);
        self.nodes.borrow_mut()[0].children.push(doctype);
    }

    fn get_template_contents(&self, target: &usize) -> usize {
        *target
    }

    fn same_node(&self, x: &usize, y: &usize) -> bool {
        x == y
    }

    fn set_quirks_mode(&self, _mode: QuirksMode) {}

    fn add_attrs_if_missing(&self, target: &usize, attrs: Vec<Attribute>) {
        let mut nodes = self.nodes.borrow_mut();
        if let SinkKind::Element { attrs: existing, .. } = &mut nodes[*target].kind {
            for attr in attrs {
                existing
                    .entry(prefixed_name(&attr.name))
                    .or_insert_with(|| attr.value.to_string());
            }
        }
    }

    fn remove_from_parent(&self, target: &usize) {
        let mut nodes = self.nodes.borrow_mut();
        for node in nodes.iter_mut() {
            node.children.retain(|id| id != target);
        }
    }

    fn reparent_children(&self, node: &usize, new_parent: &usize) {
        let mut nodes = self.nodes.borrow_mut();
        let children: Vec<usize> = nodes[*node].children.drain(..).collect();
        nodes[*new_parent].children.extend(children);
    }
}

/// Parse raw feed bytes into a DOM tree
///
/// The input is decoded with the supplied charset label first; unknown
/// labels fall back to lossy UTF-8.
pub fn parse_feed(data: &[u8], charset: &str) -> Result<DomTree> {
    let source = decode(data, charset);
    let sink: FeedSink = parse_document(FeedSink::new(), Default::default())
        .from_utf8()
        .read_from(&mut source.as_bytes())
        .map_err(|err| Error::Parse(err.to_string()))?;
    Ok(sink.into_tree())
}

fn decode(data: &[u8], label: &str) -> String {
    match Encoding::for_label(label.as_bytes()) {
        Some(encoding) => {
            let (text, _, _) = encoding.decode(data);
            text.into_owned()
        }
        None => {
            log::warn!("unknown charset label {:?}, decoding as UTF-8", label);
            String::from_utf8_lossy(data).into_owned()
        }
    }
}
