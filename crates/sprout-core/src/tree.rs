//! Normalized node arena.
//!
//! The arena mirrors the visible part of the scene graph after
//! preprocessing. Nodes are addressed by index; the raw scene graph stays
//! untouched.

use std::collections::HashMap;

use crate::params::Params;
use crate::scene::{Constraints, NodeAttributes, NodeType, Rect};

/// Index of a node in a [`NodeTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

/// A normalized node.
#[derive(Debug, Clone)]
pub struct Node {
    /// Arena index
    pub id: NodeId,
    /// Raw attributes, copied from the scene graph
    pub attrs: NodeAttributes,
    /// Normalized type (vector-family leaves and collapsed groups become `Vector`)
    pub kind: NodeType,
    /// Effective constraints (collapsed vectors inherit their children's pair)
    pub constraints: Constraints,
    /// Parameters parsed from the name
    pub params: Params,
    /// Parent node (None for component roots)
    pub parent: Option<NodeId>,
    /// Visible children in document order
    pub children: Vec<NodeId>,
    /// Following sibling consumed as this node's alpha mask
    pub mask: Option<NodeId>,
    /// Preceding sibling that consumes this node as its mask
    pub masked: Option<NodeId>,
}

impl Node {
    /// Scene id of this node.
    pub fn scene_id(&self) -> &str {
        &self.attrs.id
    }

    /// Name of this node.
    pub fn name(&self) -> &str {
        &self.attrs.name
    }

    /// Whether this node is a mask.
    pub fn is_mask(&self) -> bool {
        self.attrs.is_mask
    }

    /// Absolute bounding box, or an empty rectangle.
    pub fn absolute_box(&self) -> Rect {
        self.attrs.absolute_bounding_box.unwrap_or_default()
    }
}

/// Arena of normalized nodes.
#[derive(Debug, Clone, Default)]
pub struct NodeTree {
    nodes: Vec<Node>,
    roots: Vec<NodeId>,
    by_scene_id: HashMap<String, NodeId>,
}

impl NodeTree {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node. Nodes without a parent become roots.
    pub fn push(
        &mut self,
        attrs: NodeAttributes,
        kind: NodeType,
        constraints: Constraints,
        params: Params,
        parent: Option<NodeId>,
    ) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.by_scene_id.insert(attrs.id.clone(), id);
        self.nodes.push(Node {
            id,
            attrs,
            kind,
            constraints,
            params,
            parent,
            children: Vec::new(),
            mask: None,
            masked: None,
        });

        match parent {
            Some(parent_id) => {
                if let Some(parent) = self.nodes.get_mut(parent_id.0) {
                    parent.children.push(id);
                }
            }
            None => self.roots.push(id),
        }

        id
    }

    /// Get a node.
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// Get a node mutably.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0)
    }

    /// Look up a node by its scene id.
    pub fn find(&self, scene_id: &str) -> Option<NodeId> {
        self.by_scene_id.get(scene_id).copied()
    }

    /// Root nodes in insertion order.
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// Children of a node.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Parent of a node.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent)
    }

    /// Sibling immediately before `id` under the same parent.
    pub fn previous_sibling(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.parent(id)?;
        let siblings = self.children(parent);
        let index = siblings.iter().position(|&s| s == id)?;
        index.checked_sub(1).map(|i| siblings[i])
    }

    /// Link `mask` as the alpha mask of `target`. Both nodes must exist.
    pub fn set_mask(&mut self, target: NodeId, mask: NodeId) {
        if self.get(target).is_none() || self.get(mask).is_none() {
            return;
        }
        if let Some(node) = self.get_mut(target) {
            node.mask = Some(mask);
        }
        if let Some(node) = self.get_mut(mask) {
            node.masked = Some(target);
        }
    }

    /// Whether some sibling consumes `id` as its mask.
    pub fn is_consumed_mask(&self, id: NodeId) -> bool {
        self.get(id).is_some_and(|n| n.masked.is_some())
    }

    /// Iterate all nodes in insertion (pre-order) order.
    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the tree is empty.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
