//! Per-node visit state.

use indexmap::IndexMap;
use smallvec::SmallVec;
use sprout_core::{Node, Params, StyleMap};
use sprout_layout::NodeBounds;

use crate::children::ChildBuckets;

/// Mutable record the plugins of one node write into.
///
/// Owned by the visit of a single node and dropped once its closers are
/// emitted. Plugins never see another node's state.
#[derive(Debug, Clone)]
pub struct VisitState<'t> {
    pub node: &'t Node,
    /// Node whose wrapper encloses this one (flattened groups are skipped)
    pub parent: Option<&'t Node>,
    /// Position relative to `parent`; `None` for the component root
    pub bounds: Option<NodeBounds>,
    /// Stacking order among the parent's emitted children
    pub order: usize,
    /// Positioning wrapper
    pub outer: StyleMap,
    /// The node's own box
    pub middle: StyleMap,
    /// Content wrapper
    pub inner: StyleMap,
    /// Extra attributes of the middle element, values are JSX expressions
    pub node_props: IndexMap<String, String>,
    /// Extra classes of the middle element
    pub class_names: SmallVec<[String; 2]>,
    /// Fragments emitted after the wrappers, before the children
    pub prelude: Vec<String>,
    /// Fragments emitted after the children, before the closers
    pub content: Vec<String>,
    pub children: ChildBuckets,
}

impl<'t> VisitState<'t> {
    pub fn new(
        node: &'t Node,
        parent: Option<&'t Node>,
        bounds: Option<NodeBounds>,
        order: usize,
        children: ChildBuckets,
    ) -> Self {
        let mut middle = StyleMap::new();
        middle.set("position", "relative");
        middle.set("boxSizing", "border-box");
        middle.set("pointerEvents", "auto");

        Self {
            node,
            parent,
            bounds,
            order,
            outer: StyleMap::new(),
            middle,
            inner: StyleMap::new(),
            node_props: IndexMap::new(),
            class_names: SmallVec::new(),
            prelude: Vec::new(),
            content: Vec::new(),
            children,
        }
    }

    /// Whether this node is the root of the component being built.
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    pub fn params(&self) -> &'t Params {
        &self.node.params
    }

    /// Replace the node's subtree: no children are visited and buffered
    /// content is discarded.
    pub fn empty_children(&mut self) {
        self.children.clear();
        self.content.clear();
    }
}
