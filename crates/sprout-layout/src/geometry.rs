//! Unrotated node boxes.

use glam::{DAffine2, DVec2};
use sprout_core::scene::{NodeAttributes, Transform};

/// A node's box before rotation, in canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxGeometry {
    /// Top-left corner
    pub origin: DVec2,
    /// Unrotated size
    pub size: DVec2,
    /// Rotation in degrees, counter-clockwise
    pub angle: f64,
}

impl BoxGeometry {
    /// Derive the unrotated box of a node.
    ///
    /// The absolute bounding box of a rotated node encloses its rotated
    /// shape; the original box shares its center and has the node's `size`.
    pub fn of(attrs: &NodeAttributes) -> Self {
        let abs = attrs.absolute_bounding_box.unwrap_or_default();
        let center = DVec2::new(abs.x + abs.width / 2.0, abs.y + abs.height / 2.0);
        let size = attrs.original_size();
        let size = DVec2::new(size.x, size.y);

        Self {
            origin: center - size / 2.0,
            size,
            angle: attrs
                .relative_transform
                .as_ref()
                .map(rotation_degrees)
                .unwrap_or(0.0),
        }
    }

    /// Get the left edge.
    pub fn left(&self) -> f64 {
        self.origin.x
    }

    /// Get the top edge.
    pub fn top(&self) -> f64 {
        self.origin.y
    }

    /// Get the right edge.
    pub fn right(&self) -> f64 {
        self.origin.x + self.size.x
    }

    /// Get the bottom edge.
    pub fn bottom(&self) -> f64 {
        self.origin.y + self.size.y
    }
}

/// Rotation of a 2x3 transform in degrees.
pub fn rotation_degrees(transform: &Transform) -> f64 {
    let [[m00, m01, m02], [m10, m11, m12]] = *transform;
    let affine = DAffine2::from_cols_array(&[m00, m10, m01, m11, m02, m12]);
    let x_axis = affine.matrix2.x_axis;
    (-x_axis.y).atan2(x_axis.x).to_degrees()
}

#[cfg(test)]
mod tests {
    use super::*;
    use sprout_core::scene::{Rect, Vector};

    #[test]
    fn test_unrotated_box_matches_absolute() {
        let attrs = NodeAttributes {
            absolute_bounding_box: Some(Rect::new(10.0, 20.0, 100.0, 50.0)),
            size: Some(Vector::new(100.0, 50.0)),
            ..Default::default()
        };
        let geometry = BoxGeometry::of(&attrs);
        assert_eq!(geometry.origin, DVec2::new(10.0, 20.0));
        assert_eq!(geometry.right(), 110.0);
        assert_eq!(geometry.bottom(), 70.0);
        assert_eq!(geometry.angle, 0.0);
    }

    #[test]
    fn test_rotated_box_nets_out_rotation() {
        // A 100x20 bar rotated 90 degrees occupies a 20x100 absolute box.
        let attrs = NodeAttributes {
            absolute_bounding_box: Some(Rect::new(40.0, 0.0, 20.0, 100.0)),
            size: Some(Vector::new(100.0, 20.0)),
            relative_transform: Some([[0.0, 1.0, 0.0], [-1.0, 0.0, 0.0]]),
            ..Default::default()
        };
        let geometry = BoxGeometry::of(&attrs);
        assert_eq!(geometry.origin, DVec2::new(0.0, 40.0));
        assert_eq!(geometry.size, DVec2::new(100.0, 20.0));
        assert!((geometry.angle - 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_rotation_degrees_identity() {
        assert_eq!(rotation_degrees(&[[1.0, 0.0, 5.0], [0.0, 1.0, 7.0]]), 0.0);
    }
}
