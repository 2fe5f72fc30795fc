//! Arena-backed DOM tree

use std::collections::HashMap;

use crate::feed::FeedElement;

/// Handle to a node in the arena
///
/// Ids are never reused within one tree; a detached node keeps its slot
/// until the whole tree is dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// Node types in the DOM
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// Document root
    Document,
    /// Element node with its format-specific type tag
    Element(ElementData),
    /// Text node
    Text(String),
    /// Comment node
    Comment(String),
    /// Processing instruction
    ProcessingInstruction {
        /// PI target (e.g. "xml-stylesheet")
        target: String,
        /// Raw PI data
        data: String,
    },
}

/// Data for element nodes
#[derive(Debug, Clone, PartialEq)]
pub struct ElementData {
    /// Element name as written in the document (prefixed form, e.g. "dc:creator")
    pub name: String,
    /// Type tag from the feed vocabulary
    pub tag: FeedElement,
    /// Element attributes
    pub attributes: HashMap<String, String>,
}

impl ElementData {
    /// Create element data, classifying the name against the feed vocabulary
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let tag = FeedElement::classify(&name);
        Self {
            name,
            tag,
            attributes: HashMap::new(),
        }
    }

    /// Get an attribute value
    pub fn get_attribute(&self, name: &str) -> Option<&String> {
        self.attributes.get(name)
    }

    /// Set an attribute value
    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.attributes.insert(name.into(), value.into());
    }
}

/// A node in the arena
#[derive(Debug, Clone)]
struct DomNode {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// The DOM tree arena
///
/// The document root is always node 0 and is created with the tree.
#[derive(Debug, Clone)]
pub struct DomTree {
    nodes: Vec<DomNode>,
}

impl DomTree {
    /// Create a tree holding only the document root
    pub fn new() -> Self {
        Self {
            nodes: vec![DomNode {
                kind: NodeKind::Document,
                parent: None,
                children: Vec::new(),
            }],
        }
    }

    /// The document root node
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    fn node(&self, id: NodeId) -> &DomNode {
        &self.nodes[id.0]
    }

    fn node_mut(&mut self, id: NodeId) -> &mut DomNode {
        &mut self.nodes[id.0]
    }

    /// Node kind and payload
    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.node(id).kind
    }

    /// Weak back-reference to the parent
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    /// Ordered child list
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.node(id).children
    }

    /// Element payload, if this node is an element
    pub fn element(&self, id: NodeId) -> Option<&ElementData> {
        match &self.node(id).kind {
            NodeKind::Element(data) => Some(data),
            _ => None,
        }
    }

    /// Text content, if this node is a text node
    pub fn text(&self, id: NodeId) -> Option<&str> {
        match &self.node(id).kind {
            NodeKind::Text(content) => Some(content),
            _ => None,
        }
    }

    fn push(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(DomNode {
            kind,
            parent: None,
            children: Vec::new(),
        });
        id
    }

    /// Create a detached element node
    pub fn new_element(&mut self, data: ElementData) -> NodeId {
        self.push(NodeKind::Element(data))
    }

    /// Create a detached text node
    pub fn new_text(&mut self, content: impl Into<String>) -> NodeId {
        self.push(NodeKind::Text(content.into()))
    }

    /// Create a detached comment node
    pub fn new_comment(&mut self, content: impl Into<String>) -> NodeId {
        self.push(NodeKind::Comment(content.into()))
    }

    /// Create a detached processing instruction node
    pub fn new_pi(&mut self, target: impl Into<String>, data: impl Into<String>) -> NodeId {
        self.push(NodeKind::ProcessingInstruction {
            target: target.into(),
            data: data.into(),
        })
    }

    /// Append a detached node as the last child of `parent`
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.node_mut(child).parent = Some(parent);
        self.node_mut(parent).children.push(child);
    }

    /// Replace the entire child list of `parent` with at most one node
    ///
    /// The previous children are detached but keep their arena slots; the
    /// replacement's parent link is rewired to `parent`.
    pub fn replace_children(&mut self, parent: NodeId, replacement: Option<NodeId>) {
        let old = std::mem::take(&mut self.node_mut(parent).children);
        for child in old {
            self.node_mut(child).parent = None;
        }
        if let Some(child) = replacement {
            self.append_child(parent, child);
        }
    }

    /// First direct child element carrying the given type tag
    pub fn first_element_child(&self, id: NodeId, tag: FeedElement) -> Option<NodeId> {
        self.children(id)
            .iter()
            .copied()
            .find(|&child| self.element(child).is_some_and(|data| data.tag == tag))
    }

    /// First direct child that is a text node
    pub fn first_text_child(&self, id: NodeId) -> Option<NodeId> {
        self.children(id)
            .iter()
            .copied()
            .find(|&child| matches!(self.kind(child), NodeKind::Text(_)))
    }
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}
