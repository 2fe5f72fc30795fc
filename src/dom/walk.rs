//! Depth-tracked pre/post-order DOM traversal
//!
//! The walker keeps an explicit frame stack instead of recursing. A node's
//! enter callback fires when its frame is pushed and its exit callback when
//! the frame is popped, so a node's whole subtree has been visited by the
//! time its exit callback runs. That ordering is what makes it safe for an
//! exit handler to replace the exiting node's own children mid-walk.

use super::{DomTree, NodeId, NodeKind};

/// Read-only view of the traversal stack exposed to handler callbacks
#[derive(Debug, Clone, Copy)]
pub struct WalkState {
    depth: usize,
}

impl WalkState {
    /// Number of frames on the stack, including the node being visited
    ///
    /// For `document > rss > channel` the channel's callbacks see depth 3.
    pub fn depth(&self) -> usize {
        self.depth
    }
}

/// Per-(node-kind, direction) traversal callbacks
///
/// Every method defaults to a no-op; a handler overrides only the slots it
/// cares about and the walker skips the rest.
pub trait DomHandler {
    /// Document node pushed
    fn enter_document(&mut self, _walk: &WalkState, _tree: &mut DomTree, _node: NodeId) {}
    /// Document node popped
    fn exit_document(&mut self, _walk: &WalkState, _tree: &mut DomTree, _node: NodeId) {}
    /// Element node pushed
    fn enter_element(&mut self, _walk: &WalkState, _tree: &mut DomTree, _node: NodeId) {}
    /// Element node popped
    fn exit_element(&mut self, _walk: &WalkState, _tree: &mut DomTree, _node: NodeId) {}
    /// Text node pushed
    fn enter_text(&mut self, _walk: &WalkState, _tree: &mut DomTree, _node: NodeId) {}
    /// Text node popped
    fn exit_text(&mut self, _walk: &WalkState, _tree: &mut DomTree, _node: NodeId) {}
    /// Comment node pushed
    fn enter_comment(&mut self, _walk: &WalkState, _tree: &mut DomTree, _node: NodeId) {}
    /// Comment node popped
    fn exit_comment(&mut self, _walk: &WalkState, _tree: &mut DomTree, _node: NodeId) {}
    /// Processing instruction pushed
    fn enter_pi(&mut self, _walk: &WalkState, _tree: &mut DomTree, _node: NodeId) {}
    /// Processing instruction popped
    fn exit_pi(&mut self, _walk: &WalkState, _tree: &mut DomTree, _node: NodeId) {}
}

#[derive(Debug)]
struct Frame {
    node: NodeId,
    next_child: usize,
}

enum Direction {
    Enter,
    Exit,
}

/// The traversal stack driving callback dispatch
#[derive(Debug, Default)]
pub struct DomStack {
    frames: Vec<Frame>,
}

impl DomStack {
    /// Create an empty traversal stack
    pub fn new() -> Self {
        Self { frames: Vec::new() }
    }

    /// Walk the whole tree from its document root
    ///
    /// The walk always runs to completion; there is no cancellation path.
    pub fn walk(&mut self, tree: &mut DomTree, handler: &mut dyn DomHandler) {
        self.frames.clear();
        self.push(tree, handler, tree.root());

        loop {
            let (node, index) = match self.frames.last_mut() {
                Some(frame) => {
                    let step = (frame.node, frame.next_child);
                    frame.next_child += 1;
                    step
                }
                None => break,
            };

            match tree.children(node).get(index).copied() {
                Some(child) => self.push(tree, handler, child),
                None => {
                    self.dispatch(tree, handler, node, Direction::Exit);
                    self.frames.pop();
                }
            }
        }
    }

    fn push(&mut self, tree: &mut DomTree, handler: &mut dyn DomHandler, node: NodeId) {
        self.frames.push(Frame {
            node,
            next_child: 0,
        });
        self.dispatch(tree, handler, node, Direction::Enter);
    }

    fn dispatch(
        &self,
        tree: &mut DomTree,
        handler: &mut dyn DomHandler,
        node: NodeId,
        direction: Direction,
    ) {
        let walk = WalkState {
            depth: self.frames.len(),
        };
        match (tree.kind(node), direction) {
            (NodeKind::Document, Direction::Enter) => handler.enter_document(&walk, tree, node),
            (NodeKind::Document, Direction::Exit) => handler.exit_document(&walk, tree, node),
            (NodeKind::Element(_), Direction::Enter) => handler.enter_element(&walk, tree, node),
            (NodeKind::Element(_), Direction::Exit) => handler.exit_element(&walk, tree, node),
            (NodeKind::Text(_), Direction::Enter) => handler.enter_text(&walk, tree, node),
            (NodeKind::Text(_), Direction::Exit) => handler.exit_text(&walk, tree, node),
            (NodeKind::Comment(_), Direction::Enter) => handler.enter_comment(&walk, tree, node),
            (NodeKind::Comment(_), Direction::Exit) => handler.exit_comment(&walk, tree, node),
            (NodeKind::ProcessingInstruction { .. }, Direction::Enter) => {
                handler.enter_pi(&walk, tree, node)
            }
            (NodeKind::ProcessingInstruction { .. }, Direction::Exit) => {
                handler.exit_pi(&walk, tree, node)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::ElementData;

    #[derive(Default)]
    struct Recorder {
        events: Vec<(String, usize)>,
    }

    impl Recorder {
        fn record(&mut self, label: &str, tree: &DomTree, node: NodeId, depth: usize) {
            let name = match tree.kind(node) {
                NodeKind::Document => "#document".to_string(),
                NodeKind::Element(data) => data.name.clone(),
                NodeKind::Text(content) => format!("#text:{content}"),
                _ => "#other".to_string(),
            };
            self.events.push((format!("{label} {name}"), depth));
        }
    }

    impl DomHandler for Recorder {
        fn enter_document(&mut self, walk: &WalkState, tree: &mut DomTree, node: NodeId) {
            self.record("enter", tree, node, walk.depth());
        }
        fn exit_document(&mut self, walk: &WalkState, tree: &mut DomTree, node: NodeId) {
            self.record("exit", tree, node, walk.depth());
        }
        fn enter_element(&mut self, walk: &WalkState, tree: &mut DomTree, node: NodeId) {
            self.record("enter", tree, node, walk.depth());
        }
        fn exit_element(&mut self, walk: &WalkState, tree: &mut DomTree, node: NodeId) {
            self.record("exit", tree, node, walk.depth());
        }
        fn enter_text(&mut self, walk: &WalkState, tree: &mut DomTree, node: NodeId) {
            self.record("enter", tree, node, walk.depth());
        }
    }

    fn feed_tree() -> DomTree {
        let mut tree = DomTree::new();
        let rss = tree.new_element(ElementData::new("rss"));
        tree.append_child(tree.root(), rss);
        let channel = tree.new_element(ElementData::new("channel"));
        tree.append_child(rss, channel);
        let title = tree.new_element(ElementData::new("title"));
        tree.append_child(channel, title);
        let text = tree.new_text("Feed");
        tree.append_child(title, text);
        tree
    }

    #[test]
    fn test_event_order_and_depth() {
        let mut tree = feed_tree();
        let mut recorder = Recorder::default();
        DomStack::new().walk(&mut tree, &mut recorder);

        let expected = vec![
            ("enter #document".to_string(), 1),
            ("enter rss".to_string(), 2),
            ("enter channel".to_string(), 3),
            ("enter title".to_string(), 4),
            ("enter #text:Feed".to_string(), 5),
            ("exit title".to_string(), 4),
            ("exit channel".to_string(), 3),
            ("exit rss".to_string(), 2),
            ("exit #document".to_string(), 1),
        ];
        assert_eq!(recorder.events, expected);
    }

    struct Flattener;

    impl DomHandler for Flattener {
        fn exit_element(&mut self, _walk: &WalkState, tree: &mut DomTree, node: NodeId) {
            if tree.element(node).map(|data| data.name.as_str()) == Some("title") {
                let replacement = tree.new_text("flat");
                tree.replace_children(node, Some(replacement));
            }
        }
    }

    #[test]
    fn test_exit_handler_may_replace_own_children() {
        let mut tree = feed_tree();
        DomStack::new().walk(&mut tree, &mut Flattener);

        let rss = tree.children(tree.root())[0];
        let channel = tree.children(rss)[0];
        let title = tree.children(channel)[0];
        let text = tree.first_text_child(title).unwrap();
        assert_eq!(tree.text(text), Some("flat"));
    }
}
