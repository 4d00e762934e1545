//! Style plugins: positioning, layout and box painting.

use sprout_core::scene::{
    last_paint, EffectType, LayoutMode, NodeType, Paint, PaintType, ScaleMode,
};
use sprout_core::style::{
    color_string, drop_shadow, format_number, inner_shadow, linear_gradient, radial_gradient,
};
use sprout_core::{Result, StyleMap};
use sprout_layout::{apply_horizontal, apply_vertical};

use super::StylePlugin;
use crate::context::PluginContext;
use crate::state::VisitState;

/// Stacking order as `z-index`.
pub struct MiddleOrder;

impl StylePlugin for MiddleOrder {
    fn name(&self) -> &'static str {
        "middle-order"
    }

    fn apply(&self, state: &mut VisitState<'_>, _cx: &mut PluginContext<'_>) -> Result<()> {
        if state.order > 0 {
            state.middle.set("zIndex", state.order as f64);
        }
        Ok(())
    }
}

/// Rotation of non-vector nodes.
pub struct Transformation;

impl StylePlugin for Transformation {
    fn name(&self) -> &'static str {
        "transformation"
    }

    fn apply(&self, state: &mut VisitState<'_>, _cx: &mut PluginContext<'_>) -> Result<()> {
        let Some(bounds) = state.bounds else {
            return Ok(());
        };
        if state.node.kind != NodeType::Vector && bounds.angle.abs() > 0.01 {
            state
                .middle
                .set("transform", format!("rotate({}deg)", format_number(-bounds.angle)));
            state.middle.set("transformOrigin", "50% 50%");
        }
        Ok(())
    }
}

/// Horizontal constraint positioning.
pub struct HorizontalAlign;

impl StylePlugin for HorizontalAlign {
    fn name(&self) -> &'static str {
        "horizontal-align"
    }

    fn apply(&self, state: &mut VisitState<'_>, _cx: &mut PluginContext<'_>) -> Result<()> {
        if let Some(bounds) = state.bounds {
            let constraint = state.node.constraints.horizontal;
            apply_horizontal(constraint, &bounds, &mut state.outer, &mut state.middle);
        }
        Ok(())
    }
}

/// Vertical constraint positioning.
pub struct VerticalAlign;

impl StylePlugin for VerticalAlign {
    fn name(&self) -> &'static str {
        "vertical-align"
    }

    fn apply(&self, state: &mut VisitState<'_>, _cx: &mut PluginContext<'_>) -> Result<()> {
        if let Some(bounds) = state.bounds {
            let constraint = state.node.constraints.vertical;
            apply_vertical(constraint, &bounds, &mut state.outer, &mut state.middle);
        }
        Ok(())
    }
}

/// Auto-layout frames become flex containers spacing their items.
///
/// Items of an auto-layout parent drop their constraint margins; the
/// spacing comes from a rule on the container's class instead.
pub struct AutoLayout;

impl StylePlugin for AutoLayout {
    fn name(&self) -> &'static str {
        "auto-layout"
    }

    fn apply(&self, state: &mut VisitState<'_>, cx: &mut PluginContext<'_>) -> Result<()> {
        let in_auto_layout = state
            .parent
            .and_then(|p| p.attrs.layout_mode)
            .is_some_and(|mode| mode != LayoutMode::None);
        if in_auto_layout {
            for side in ["marginLeft", "marginRight", "marginTop", "marginBottom"] {
                state.middle.set(side, 0);
            }
        }

        let attrs = &state.node.attrs;
        let spacing = attrs.item_spacing.unwrap_or_default();
        let s = format_number(spacing);

        let item_rule = match attrs.layout_mode {
            Some(LayoutMode::Horizontal) => {
                state.inner.set("display", "flex");
                state.inner.set("flexDirection", "row");
                state.middle.set("maxWidth", "100%");
                state.inner.set("maxWidth", "100%");
                state.inner.set("marginTop", -spacing);
                state.inner.set("marginLeft", -spacing);
                state.inner.set("marginRight", -spacing);
                format!("margin-left: {s}px;\nmargin-right: {s}px;\nmargin-top: {s}px;\nmargin-bottom: 0;")
            }
            Some(LayoutMode::Vertical) => {
                state.inner.set("display", "flex");
                state.inner.set("flexDirection", "column");
                state.middle.set("maxHeight", "100%");
                state.inner.set("maxHeight", "100%");
                state.inner.set("marginTop", -spacing);
                format!("margin-top: {s}px;\nmargin-bottom: 0;")
            }
            _ => return Ok(()),
        };

        let class_name = cx.scope.next_class_name();
        cx.scope
            .additional_styles
            .push(format!(".{class_name} > * > * {{\n{item_rule}\n}}"));
        state.class_names.push(class_name);
        Ok(())
    }
}

/// Backgrounds, fills, effects, borders and corner radii.
pub struct FrameStyles;

impl StylePlugin for FrameStyles {
    fn name(&self) -> &'static str {
        "frame-styles"
    }

    fn apply(&self, state: &mut VisitState<'_>, cx: &mut PluginContext<'_>) -> Result<()> {
        let attrs = &state.node.attrs;
        let middle = &mut state.middle;

        if state.node.kind.is_frame_like() {
            if let Some(color) = &attrs.background_color {
                middle.set("backgroundColor", color_string(color));
            }
            if attrs.clips_content {
                middle.set("overflow", "hidden");
            }
            return Ok(());
        }

        if state.node.kind != NodeType::Rectangle {
            return Ok(());
        }

        if let Some(fill) = last_paint(&attrs.fills).filter(|p| p.visible) {
            match fill.paint_type {
                PaintType::Solid => {
                    middle.set("backgroundColor", color_string(&fill.color.unwrap_or_default()));
                    if let Some(opacity) = fill.opacity {
                        middle.set("opacity", opacity);
                    }
                }
                PaintType::Image => image_fill(fill, middle, cx),
                PaintType::GradientLinear => middle.set("background", linear_gradient(fill)),
                PaintType::GradientRadial => middle.set("background", radial_gradient(fill)),
                _ => {}
            }
        }

        for effect in attrs.effects.iter().filter(|e| e.visible) {
            match effect.effect_type {
                EffectType::DropShadow => middle.append("boxShadow", &drop_shadow(effect)),
                EffectType::InnerShadow => middle.append("boxShadow", &inner_shadow(effect)),
                EffectType::LayerBlur => middle.append(
                    "filter",
                    &format!("blur({}px)", format_number(effect.radius)),
                ),
                _ => {}
            }
        }

        if let Some(stroke) = last_paint(&attrs.strokes).filter(|p| p.visible) {
            if stroke.paint_type == PaintType::Solid {
                let weight = attrs.stroke_weight.unwrap_or(1.0);
                middle.set(
                    "border",
                    format!(
                        "{}px solid {}",
                        format_number(weight),
                        color_string(&stroke.color.unwrap_or_default())
                    ),
                );
            }
        }

        if let Some(radii) = attrs.rectangle_corner_radii.as_deref() {
            if radii.len() == 4 && radii.iter().sum::<f64>() > 0.0 {
                let value = radii
                    .iter()
                    .map(|r| format!("{}px", format_number(*r)))
                    .collect::<Vec<_>>()
                    .join(" ");
                middle.set("borderRadius", value);
            }
        }

        Ok(())
    }
}

fn image_fill(fill: &Paint, middle: &mut StyleMap, cx: &PluginContext<'_>) {
    let Some(image_ref) = fill.image_ref.as_deref() else {
        return;
    };
    let Some(image) = cx.ctx.resources.image(image_ref) else {
        tracing::warn!(image_ref = %image_ref, "image fill not resolved; skipping");
        return;
    };

    middle.set("backgroundImage", format!("url({})", image.url));
    middle.set("backgroundPosition", "center center");
    middle.set("backgroundRepeat", "no-repeat");

    match fill.scale_mode.unwrap_or(ScaleMode::Fill) {
        ScaleMode::Fill => middle.set("backgroundSize", "cover"),
        ScaleMode::Fit => middle.set("backgroundSize", "contain"),
        ScaleMode::Tile => {
            let factor = fill.scaling_factor.unwrap_or(1.0);
            middle.set("backgroundPosition", "left top");
            middle.set("backgroundRepeat", "repeat");
            if let (Some(w), Some(h)) = (image.width, image.height) {
                middle.set(
                    "backgroundSize",
                    format!(
                        "{}px {}px",
                        format_number(factor * f64::from(w)),
                        format_number(factor * f64::from(h))
                    ),
                );
            }
        }
        ScaleMode::Stretch => {
            middle.set("backgroundSize", "100% 100%");
            if let Some(t) = fill.image_transform {
                middle.set(
                    "backgroundPosition",
                    format!(
                        "{}% {}%",
                        format_number(-100.0 * t[0][2]),
                        format_number(-100.0 * t[1][2])
                    ),
                );
            }
        }
        ScaleMode::Unknown => {}
    }
}

/// Alpha mask from the sibling this node consumes.
pub struct MaskCompositing;

impl StylePlugin for MaskCompositing {
    fn name(&self) -> &'static str {
        "mask-compositing"
    }

    fn apply(&self, state: &mut VisitState<'_>, cx: &mut PluginContext<'_>) -> Result<()> {
        let Some(mask) = state.node.mask.and_then(|id| cx.ctx.tree.get(id)) else {
            return Ok(());
        };
        let Some(url) = cx.ctx.resources.mask(mask.scene_id()) else {
            tracing::warn!(id = %mask.scene_id(), "mask not resolved; skipping");
            return Ok(());
        };

        let mask_box = mask.absolute_box();
        let node_box = state.node.absolute_box();
        let position = format!(
            "{}px {}px",
            format_number(mask_box.x - node_box.x),
            format_number(mask_box.y - node_box.y)
        );
        let size = format!(
            "{}px {}px",
            format_number(mask_box.width),
            format_number(mask_box.height)
        );
        let image = format!("url({url})");

        for prefix in ["mask", "WebkitMask"] {
            state.middle.set(&format!("{prefix}Image"), image.as_str());
            state.middle.set(&format!("{prefix}Position"), position.as_str());
            state.middle.set(&format!("{prefix}Size"), size.as_str());
            state.middle.set(&format!("{prefix}Repeat"), "no-repeat");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugins::testing::{with_plugin_context, Fixture};
    use sprout_assets::ImageAsset;
    use sprout_core::scene::{Color, Effect, HorizontalConstraint, SceneNode, VerticalConstraint};
    use sprout_core::style::StyleValue;

    fn text(value: &str) -> Option<StyleValue> {
        Some(StyleValue::Text(value.into()))
    }

    fn card(child: SceneNode) -> SceneNode {
        SceneNode::new("1", "#Card", NodeType::Frame)
            .with_bounds(0.0, 0.0, 200.0, 100.0)
            .with_child(child)
    }

    #[test]
    fn test_middle_order_only_when_positive() {
        let fixture = Fixture::new(card(SceneNode::new("2", "a", NodeType::Rectangle)));
        let mut state = fixture.state("2");
        with_plugin_context(&fixture, |cx| MiddleOrder.apply(&mut state, cx).unwrap());
        assert!(!state.middle.contains("zIndex"));

        state.order = 3;
        with_plugin_context(&fixture, |cx| MiddleOrder.apply(&mut state, cx).unwrap());
        assert_eq!(state.middle.get("zIndex"), Some(&StyleValue::Number(3.0)));
    }

    #[test]
    fn test_left_constraint_margin() {
        let child = SceneNode::new("2", "a", NodeType::Rectangle)
            .with_bounds(24.0, 10.0, 50.0, 20.0)
            .with_constraints(HorizontalConstraint::Left, VerticalConstraint::Top);
        let fixture = Fixture::new(card(child));
        let mut state = fixture.state("2");
        with_plugin_context(&fixture, |cx| {
            HorizontalAlign.apply(&mut state, cx).unwrap();
            VerticalAlign.apply(&mut state, cx).unwrap();
        });

        assert_eq!(state.middle.get("marginLeft"), Some(&StyleValue::Number(24.0)));
        assert_eq!(state.middle.get("marginTop"), Some(&StyleValue::Number(10.0)));
        assert_eq!(state.middle.get("width"), Some(&StyleValue::Number(50.0)));
    }

    #[test]
    fn test_root_has_no_positioning() {
        let fixture = Fixture::new(card(SceneNode::new("2", "a", NodeType::Rectangle)));
        let mut state = fixture.state("1");
        with_plugin_context(&fixture, |cx| HorizontalAlign.apply(&mut state, cx).unwrap());
        assert!(state.outer.is_empty());
    }

    #[test]
    fn test_solid_rectangle() {
        let mut fill = Paint::solid(Color::new(1.0, 0.0, 0.0, 1.0));
        fill.opacity = Some(0.5);
        let child = SceneNode::new("2", "bg", NodeType::Rectangle).with_fill(fill);
        let fixture = Fixture::new(card(child));
        let mut state = fixture.state("2");
        with_plugin_context(&fixture, |cx| FrameStyles.apply(&mut state, cx).unwrap());

        assert_eq!(state.middle.get("backgroundColor"), text("rgba(255, 0, 0, 1)").as_ref());
        assert_eq!(state.middle.get("opacity"), Some(&StyleValue::Number(0.5)));
    }

    #[test]
    fn test_effects_stroke_and_radii() {
        let mut rect = SceneNode::new("2", "bg", NodeType::Rectangle);
        rect.attrs.effects.push(Effect {
            effect_type: EffectType::DropShadow,
            visible: true,
            radius: 4.0,
            color: Some(Color::new(0.0, 0.0, 0.0, 0.25)),
            offset: Some(sprout_core::Vector::new(0.0, 2.0)),
        });
        rect.attrs.effects.push(Effect {
            effect_type: EffectType::LayerBlur,
            visible: true,
            radius: 8.0,
            color: None,
            offset: None,
        });
        rect.attrs.strokes.push(Paint::solid(Color::new(0.0, 0.0, 0.0, 1.0)));
        rect.attrs.stroke_weight = Some(2.0);
        rect.attrs.rectangle_corner_radii = Some(vec![4.0, 4.0, 0.0, 0.0]);

        let fixture = Fixture::new(card(rect));
        let mut state = fixture.state("2");
        with_plugin_context(&fixture, |cx| FrameStyles.apply(&mut state, cx).unwrap());

        assert_eq!(
            state.middle.get("boxShadow"),
            text("0px 2px 4px rgba(0, 0, 0, 0.25)").as_ref()
        );
        assert_eq!(state.middle.get("filter"), text("blur(8px)").as_ref());
        assert_eq!(state.middle.get("border"), text("2px solid rgba(0, 0, 0, 1)").as_ref());
        assert_eq!(state.middle.get("borderRadius"), text("4px 4px 0px 0px").as_ref());
    }

    #[test]
    fn test_frame_background_and_clip() {
        let fixture = Fixture::new({
            let mut root = card(SceneNode::new("2", "a", NodeType::Rectangle));
            root.attrs.background_color = Some(Color::new(1.0, 1.0, 1.0, 1.0));
            root.attrs.clips_content = true;
            root
        });
        let mut state = fixture.state("1");
        with_plugin_context(&fixture, |cx| FrameStyles.apply(&mut state, cx).unwrap());

        assert_eq!(state.middle.get("backgroundColor"), text("rgba(255, 255, 255, 1)").as_ref());
        assert_eq!(state.middle.get("overflow"), text("hidden").as_ref());
    }

    #[test]
    fn test_image_fill_tile() {
        let mut fill = Paint::image("ref-1", ScaleMode::Tile);
        fill.scaling_factor = Some(0.5);
        let child = SceneNode::new("2", "photo", NodeType::Rectangle).with_fill(fill);
        let mut fixture = Fixture::new(card(child));
        fixture.resources.images.insert(
            "ref-1".into(),
            ImageAsset {
                source_url: "https://cdn/ref-1".into(),
                url: "https://cdn/ref-1".into(),
                bytes: Vec::new(),
                content_type: "image/png".into(),
                width: Some(64),
                height: Some(32),
            },
        );
        let mut state = fixture.state("2");
        with_plugin_context(&fixture, |cx| FrameStyles.apply(&mut state, cx).unwrap());

        assert_eq!(state.middle.get("backgroundImage"), text("url(https://cdn/ref-1)").as_ref());
        assert_eq!(state.middle.get("backgroundRepeat"), text("repeat").as_ref());
        assert_eq!(state.middle.get("backgroundSize"), text("32px 16px").as_ref());
    }

    #[test]
    fn test_unresolved_image_fill_is_skipped() {
        let child = SceneNode::new("2", "photo", NodeType::Rectangle)
            .with_fill(Paint::image("missing", ScaleMode::Fill));
        let fixture = Fixture::new(card(child));
        let mut state = fixture.state("2");
        with_plugin_context(&fixture, |cx| FrameStyles.apply(&mut state, cx).unwrap());

        assert!(!state.middle.contains("backgroundImage"));
    }

    #[test]
    fn test_horizontal_auto_layout() {
        let mut row = SceneNode::new("2", "row", NodeType::Frame)
            .with_child(SceneNode::new("3", "item", NodeType::Rectangle));
        row.attrs.layout_mode = Some(LayoutMode::Horizontal);
        row.attrs.item_spacing = Some(8.0);
        let fixture = Fixture::new(card(row));

        let mut row_state = fixture.state("2");
        let (_, scope, _) =
            with_plugin_context(&fixture, |cx| AutoLayout.apply(&mut row_state, cx).unwrap());
        assert_eq!(row_state.inner.get("flexDirection"), text("row").as_ref());
        assert_eq!(row_state.inner.get("marginLeft"), Some(&StyleValue::Number(-8.0)));
        assert_eq!(row_state.class_names.as_slice(), &["figma-0".to_string()]);
        assert!(scope.additional_styles[0].starts_with(".figma-0 > * > * {"));
        assert!(scope.additional_styles[0].contains("margin-left: 8px;"));

        let mut item_state = fixture.state("3");
        item_state.middle.set("marginLeft", 12.0);
        with_plugin_context(&fixture, |cx| AutoLayout.apply(&mut item_state, cx).unwrap());
        assert_eq!(item_state.middle.get("marginLeft"), Some(&StyleValue::Number(0.0)));
    }

    #[test]
    fn test_rotation() {
        let mut child = SceneNode::new("2", "tilted", NodeType::Rectangle)
            .with_bounds(10.0, 10.0, 20.0, 20.0);
        let (s, c) = (90f64).to_radians().sin_cos();
        child.attrs.relative_transform = Some([[c, s, 0.0], [-s, c, 0.0]]);
        let fixture = Fixture::new(card(child));
        let mut state = fixture.state("2");
        with_plugin_context(&fixture, |cx| Transformation.apply(&mut state, cx).unwrap());

        let transform = state.middle.get("transform").map(ToString::to_string);
        assert!(transform.is_some_and(|t| t.starts_with("rotate(")));
        assert_eq!(state.middle.get("transformOrigin"), text("50% 50%").as_ref());
    }

    #[test]
    fn test_mask_compositing() {
        let root = card(
            SceneNode::new("2", "shape", NodeType::Vector).with_bounds(10.0, 20.0, 40.0, 40.0),
        )
        .with_child(
            SceneNode::new("3", "mask", NodeType::Ellipse)
                .with_bounds(15.0, 30.0, 20.0, 10.0)
                .with_mask(),
        );
        let mut fixture = Fixture::new(root);
        fixture.resources.masks.insert("3".into(), "https://cdn/mask.png".into());
        let mut state = fixture.state("2");
        with_plugin_context(&fixture, |cx| MaskCompositing.apply(&mut state, cx).unwrap());

        assert_eq!(state.middle.get("maskImage"), text("url(https://cdn/mask.png)").as_ref());
        assert_eq!(state.middle.get("WebkitMaskImage"), text("url(https://cdn/mask.png)").as_ref());
        assert_eq!(state.middle.get("maskPosition"), text("5px 10px").as_ref());
        assert_eq!(state.middle.get("maskSize"), text("20px 10px").as_ref());
        assert_eq!(state.middle.get("maskRepeat"), text("no-repeat").as_ref());
    }
}
