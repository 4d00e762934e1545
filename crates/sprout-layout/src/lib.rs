//! Geometry and constraint resolution.
//!
//! Converts the design tool's anchor/constraint model into flow and
//! absolute positioning rules.
//!
//! # Architecture
//!
//! 1. **Geometry**: each node's unrotated box, centered on its absolute box
//! 2. **Bounds**: gaps between a node and its parent (or previous flow sibling)
//! 3. **Constraints**: a table of positioning recipes per constraint value
//!
//! # Example
//!
//! ```ignore
//! use sprout_layout::{compute_bounds, apply_horizontal, apply_vertical, Sibling};
//!
//! if let Some(bounds) = compute_bounds(&node, Some(&parent), Sibling::First) {
//!     apply_horizontal(constraints.horizontal, &bounds, &mut outer, &mut middle);
//!     apply_vertical(constraints.vertical, &bounds, &mut outer, &mut middle);
//! }
//! ```

mod bounds;
mod constraints;
mod geometry;

pub use bounds::{compute_bounds, NodeBounds, Sibling};
pub use constraints::{
    apply_horizontal, apply_vertical, horizontal_rule, vertical_rule, AxisRule, Recipe,
    HORIZONTAL_RULES, VERTICAL_RULES,
};
pub use geometry::{rotation_degrees, BoxGeometry};
