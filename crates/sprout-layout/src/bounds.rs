//! Gaps between a node and its parent.

use sprout_core::scene::NodeAttributes;

use crate::geometry::BoxGeometry;

/// Position of a node within its alignment bucket.
#[derive(Debug, Clone, Copy)]
pub enum Sibling<'a> {
    /// First member, or a member of an unordered bucket
    First,
    /// Follows `previous` as a consecutive flow item
    After(&'a NodeAttributes),
}

/// Offsets of a node inside its parent, in the parent's coordinate space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct NodeBounds {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
    pub width: f64,
    pub height: f64,
    /// Rotation in degrees
    pub angle: f64,
}

impl NodeBounds {
    /// Parent width implied by the horizontal gaps.
    pub fn parent_width(&self) -> f64 {
        self.left + self.width + self.right
    }

    /// Parent height implied by the vertical gaps.
    pub fn parent_height(&self) -> f64 {
        self.top + self.height + self.bottom
    }
}

/// Compute a node's bounds relative to its parent. Roots have none.
///
/// For a consecutive flow item, `top` is measured from the previous
/// sibling's bottom edge so stacked margins do not compound.
pub fn compute_bounds(
    node: &NodeAttributes,
    parent: Option<&NodeAttributes>,
    sibling: Sibling<'_>,
) -> Option<NodeBounds> {
    let parent = BoxGeometry::of(parent?);
    let geometry = BoxGeometry::of(node);

    let top = match sibling {
        Sibling::First => geometry.top() - parent.top(),
        Sibling::After(previous) => geometry.top() - BoxGeometry::of(previous).bottom(),
    };

    Some(NodeBounds {
        left: geometry.left() - parent.left(),
        right: parent.right() - geometry.right(),
        top,
        bottom: parent.bottom() - geometry.bottom(),
        width: geometry.size.x,
        height: geometry.size.y,
        angle: geometry.angle,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use sprout_core::scene::{Rect, Vector};

    fn boxed(x: f64, y: f64, width: f64, height: f64) -> NodeAttributes {
        NodeAttributes {
            absolute_bounding_box: Some(Rect::new(x, y, width, height)),
            size: Some(Vector::new(width, height)),
            ..Default::default()
        }
    }

    #[test]
    fn test_root_has_no_bounds() {
        assert!(compute_bounds(&boxed(0.0, 0.0, 10.0, 10.0), None, Sibling::First).is_none());
    }

    #[test]
    fn test_gaps() {
        let parent = boxed(100.0, 100.0, 200.0, 100.0);
        let node = boxed(120.0, 130.0, 50.0, 20.0);

        let bounds = compute_bounds(&node, Some(&parent), Sibling::First).unwrap();
        assert_eq!(bounds.left, 20.0);
        assert_eq!(bounds.right, 130.0);
        assert_eq!(bounds.top, 30.0);
        assert_eq!(bounds.bottom, 50.0);
        assert_eq!(bounds.width, 50.0);
        assert_eq!(bounds.height, 20.0);
        assert_eq!(bounds.parent_width(), 200.0);
        assert_eq!(bounds.parent_height(), 100.0);
    }

    #[test]
    fn test_non_first_sibling_measures_from_previous_bottom() {
        let parent = boxed(0.0, 0.0, 200.0, 200.0);
        let first = boxed(0.0, 10.0, 50.0, 30.0);
        let second = boxed(0.0, 50.0, 50.0, 30.0);

        let bounds = compute_bounds(&second, Some(&parent), Sibling::After(&first)).unwrap();
        assert_eq!(bounds.top, 10.0);
        assert_eq!(bounds.bottom, 120.0);
    }
}
