//! Child bucketing by vertical anchor.

use sprout_core::scene::VerticalConstraint;
use sprout_core::{NodeId, NodeTree};

/// A child scheduled for emission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChildEntry {
    pub id: NodeId,
    /// Stacking order across flattened group levels
    pub order: usize,
}

/// Children split into top-anchored, centered and bottom-anchored buckets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChildBuckets {
    pub min: Vec<ChildEntry>,
    pub center: Vec<ChildEntry>,
    pub max: Vec<ChildEntry>,
}

impl ChildBuckets {
    /// Drop every scheduled child.
    pub fn clear(&mut self) {
        self.min.clear();
        self.center.clear();
        self.max.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.min.is_empty() && self.center.is_empty() && self.max.is_empty()
    }

    pub fn len(&self) -> usize {
        self.min.len() + self.center.len() + self.max.len()
    }
}

/// Bucket the children of `node`.
///
/// Group-family children are flattened into the same bucket set. `min`
/// and `max` are sorted by absolute y (stable); `center` keeps document
/// order. Masks consumed by a sibling are skipped.
pub fn expand_children(tree: &NodeTree, node: NodeId) -> ChildBuckets {
    let mut buckets = ChildBuckets::default();
    let mut order = 0;
    collect(tree, node, &mut buckets, &mut order);

    let y = |entry: &ChildEntry| {
        tree.get(entry.id)
            .map(|n| n.absolute_box().y)
            .unwrap_or_default()
    };
    buckets.min.sort_by(|a, b| y(a).total_cmp(&y(b)));
    buckets.max.sort_by(|a, b| y(a).total_cmp(&y(b)));

    buckets
}

fn collect(tree: &NodeTree, node: NodeId, buckets: &mut ChildBuckets, order: &mut usize) {
    for &child_id in tree.children(node) {
        let Some(child) = tree.get(child_id) else {
            continue;
        };
        if child.kind.is_group_family() {
            collect(tree, child_id, buckets, order);
            continue;
        }
        if tree.is_consumed_mask(child_id) {
            continue;
        }

        let entry = ChildEntry {
            id: child_id,
            order: *order,
        };
        *order += 1;

        match child.constraints.vertical {
            VerticalConstraint::Top => buckets.min.push(entry),
            VerticalConstraint::Bottom => buckets.max.push(entry),
            _ => buckets.center.push(entry),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sprout_core::scene::{Constraints, HorizontalConstraint, NodeAttributes, NodeType, Rect};
    use sprout_core::Params;

    fn push(
        tree: &mut NodeTree,
        id: &str,
        kind: NodeType,
        vertical: VerticalConstraint,
        y: f64,
        parent: Option<NodeId>,
    ) -> NodeId {
        let attrs = NodeAttributes {
            id: id.into(),
            name: id.into(),
            visible: true,
            absolute_bounding_box: Some(Rect::new(0.0, y, 10.0, 10.0)),
            ..Default::default()
        };
        let constraints = Constraints::new(HorizontalConstraint::Left, vertical);
        tree.push(attrs, kind, constraints, Params::default(), parent)
    }

    fn scene_ids(tree: &NodeTree, entries: &[ChildEntry]) -> Vec<String> {
        entries
            .iter()
            .map(|e| tree.get(e.id).unwrap().scene_id().to_string())
            .collect()
    }

    #[test]
    fn test_bucket_order() {
        use VerticalConstraint::*;

        let mut tree = NodeTree::new();
        let root = push(&mut tree, "root", NodeType::Frame, Top, 0.0, None);
        for (i, v) in [Bottom, Top, Center, Top, Bottom].into_iter().enumerate() {
            let id = format!("c{i}");
            push(&mut tree, &id, NodeType::Rectangle, v, 100.0 - i as f64 * 10.0, Some(root));
        }

        let buckets = expand_children(&tree, root);
        assert_eq!(scene_ids(&tree, &buckets.min), vec!["c3", "c1"]);
        assert_eq!(scene_ids(&tree, &buckets.center), vec!["c2"]);
        assert_eq!(scene_ids(&tree, &buckets.max), vec!["c4", "c0"]);
        assert_eq!(buckets.len(), 5);
    }

    #[test]
    fn test_groups_flatten_with_monotonic_order() {
        use VerticalConstraint::*;

        let mut tree = NodeTree::new();
        let root = push(&mut tree, "root", NodeType::Frame, Top, 0.0, None);
        push(&mut tree, "a", NodeType::Rectangle, Center, 0.0, Some(root));
        let group = push(&mut tree, "g", NodeType::Group, Center, 0.0, Some(root));
        push(&mut tree, "b", NodeType::Rectangle, Center, 0.0, Some(group));
        push(&mut tree, "c", NodeType::Text, Center, 0.0, Some(group));
        push(&mut tree, "d", NodeType::Rectangle, Center, 0.0, Some(root));

        let buckets = expand_children(&tree, root);
        assert_eq!(scene_ids(&tree, &buckets.center), vec!["a", "b", "c", "d"]);
        let orders: Vec<usize> = buckets.center.iter().map(|e| e.order).collect();
        assert_eq!(orders, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_consumed_mask_skipped() {
        use VerticalConstraint::*;

        let mut tree = NodeTree::new();
        let root = push(&mut tree, "root", NodeType::Frame, Top, 0.0, None);
        let shape = push(&mut tree, "shape", NodeType::Vector, Center, 0.0, Some(root));
        let mask = push(&mut tree, "mask", NodeType::Vector, Center, 0.0, Some(root));
        tree.set_mask(shape, mask);

        let buckets = expand_children(&tree, root);
        assert_eq!(scene_ids(&tree, &buckets.center), vec!["shape"]);
    }

    #[test]
    fn test_clear() {
        let mut tree = NodeTree::new();
        let root = push(&mut tree, "root", NodeType::Frame, VerticalConstraint::Top, 0.0, None);
        push(&mut tree, "a", NodeType::Rectangle, VerticalConstraint::Top, 0.0, Some(root));

        let mut buckets = expand_children(&tree, root);
        assert!(!buckets.is_empty());
        buckets.clear();
        assert!(buckets.is_empty());
    }
}
