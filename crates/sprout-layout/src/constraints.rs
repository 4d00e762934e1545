//! Constraint-to-positioning translation.
//!
//! Every node renders as up to three nested wrappers. The outer wrapper
//! places the node in its parent (flow or absolute overlay) and the middle
//! wrapper carries the node's own box. Each constraint value maps to one
//! [`Recipe`] through a table indexed by the constraint's discriminant.

use sprout_core::scene::{HorizontalConstraint, VerticalConstraint};
use sprout_core::style::{format_number, StyleMap};

use crate::bounds::NodeBounds;

/// Positioning strategy for one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Recipe {
    /// Flow item offset by its near-edge margin
    FixedMargin,
    /// Overlay anchored to the far edge
    EdgeAnchored,
    /// Overlay centered with an offset margin
    Centered,
    /// Overlay sized and offset in percent of the parent
    Scaled,
    /// Overlay stretched between two margins
    Stretch,
}

/// Recipe plus whether the measured size is pinned as a minimum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisRule {
    pub recipe: Recipe,
    pub pin_size: bool,
}

const fn rule(recipe: Recipe, pin_size: bool) -> AxisRule {
    AxisRule { recipe, pin_size }
}

/// Horizontal rules, in `HorizontalConstraint` declaration order.
pub const HORIZONTAL_RULES: [(HorizontalConstraint, AxisRule); 5] = [
    (HorizontalConstraint::Left, rule(Recipe::FixedMargin, true)),
    (HorizontalConstraint::Right, rule(Recipe::EdgeAnchored, true)),
    (HorizontalConstraint::Center, rule(Recipe::Centered, false)),
    (HorizontalConstraint::LeftRight, rule(Recipe::Stretch, false)),
    (HorizontalConstraint::Scale, rule(Recipe::Scaled, false)),
];

/// Vertical rules, in `VerticalConstraint` declaration order.
pub const VERTICAL_RULES: [(VerticalConstraint, AxisRule); 5] = [
    (VerticalConstraint::Top, rule(Recipe::FixedMargin, true)),
    (VerticalConstraint::Bottom, rule(Recipe::EdgeAnchored, false)),
    (VerticalConstraint::Center, rule(Recipe::Centered, false)),
    (VerticalConstraint::TopBottom, rule(Recipe::Stretch, false)),
    (VerticalConstraint::Scale, rule(Recipe::Scaled, false)),
];

/// Look up the horizontal rule.
pub fn horizontal_rule(constraint: HorizontalConstraint) -> AxisRule {
    HORIZONTAL_RULES[constraint as usize].1
}

/// Look up the vertical rule.
pub fn vertical_rule(constraint: VerticalConstraint) -> AxisRule {
    VERTICAL_RULES[constraint as usize].1
}

fn percent(part: f64, whole: f64) -> String {
    let value = if whole == 0.0 { 0.0 } else { part * 100.0 / whole };
    format!("{}%", format_number(value))
}

fn overlay(outer: &mut StyleMap) {
    outer.set("display", "flex");
    outer.set("width", "100%");
    outer.set("pointerEvents", "none");
    outer.set("position", "absolute");
    outer.set("height", "100%");
    outer.set("left", 0);
}

/// Write horizontal positioning rules.
pub fn apply_horizontal(
    constraint: HorizontalConstraint,
    bounds: &NodeBounds,
    outer: &mut StyleMap,
    middle: &mut StyleMap,
) {
    let AxisRule { recipe, pin_size } = horizontal_rule(constraint);

    if bounds.width != 0.0 && !matches!(recipe, Recipe::Stretch | Recipe::Scaled) {
        middle.set("width", bounds.width);
    }
    if pin_size {
        middle.set("minWidth", bounds.width);
    }

    outer.set("position", "relative");
    outer.set("display", "flex");

    match recipe {
        Recipe::FixedMargin => {
            middle.set("marginLeft", bounds.left);
        }
        Recipe::EdgeAnchored => {
            outer.set("width", "100%");
            outer.set("pointerEvents", "none");
            outer.set("justifyContent", "flex-end");
            middle.set("marginRight", bounds.right);
        }
        Recipe::Centered => {
            outer.set("width", "100%");
            outer.set("pointerEvents", "none");
            outer.set("justifyContent", "center");
            middle.set("marginLeft", bounds.left - bounds.right);
        }
        Recipe::Scaled => {
            let parent_width = bounds.parent_width();
            outer.set("width", "100%");
            outer.set("pointerEvents", "none");
            outer.set("justifyContent", "flex-start");
            middle.set("width", percent(bounds.width, parent_width));
            middle.set("marginLeft", percent(bounds.left, parent_width));
        }
        Recipe::Stretch => {
            outer.set("pointerEvents", "none");
            outer.set("justifyContent", "stretch");
            middle.set("marginLeft", bounds.left);
            middle.set("marginRight", bounds.right);
            middle.set("flexGrow", 1);
        }
    }
}

/// Write vertical positioning rules.
pub fn apply_vertical(
    constraint: VerticalConstraint,
    bounds: &NodeBounds,
    outer: &mut StyleMap,
    middle: &mut StyleMap,
) {
    let AxisRule { recipe, pin_size } = vertical_rule(constraint);

    if bounds.height != 0.0 && !matches!(recipe, Recipe::Stretch | Recipe::Scaled) {
        middle.set("height", bounds.height);
    }
    middle.set("position", "relative");

    match recipe {
        Recipe::FixedMargin => {
            outer.set("position", "relative");
            outer.set("display", "flex");
            middle.set("marginTop", bounds.top);
        }
        Recipe::EdgeAnchored => {
            overlay(outer);
            outer.set("bottom", 0);
            outer.set("alignItems", "flex-end");
            middle.set("marginBottom", bounds.bottom);
        }
        Recipe::Centered => {
            overlay(outer);
            outer.set("top", 0);
            outer.set("alignItems", "center");
            middle.set("marginTop", bounds.top - bounds.bottom);
        }
        Recipe::Scaled => {
            let parent_height = bounds.parent_height();
            overlay(outer);
            outer.set("top", 0);
            outer.set("alignItems", "flex-start");
            middle.set("height", percent(bounds.height, parent_height));
            middle.set("top", percent(bounds.top, parent_height));
        }
        Recipe::Stretch => {
            overlay(outer);
            outer.set("top", 0);
            outer.set("alignItems", "stretch");
            middle.set("marginTop", bounds.top);
            middle.set("marginBottom", bounds.bottom);
        }
    }

    if pin_size {
        middle.remove("height");
        middle.set("minHeight", bounds.height);
    }
}
