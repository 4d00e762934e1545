//! Content plugins driven by node name parameters.

use indexmap::IndexMap;
use sprout_core::params::component_name;
use sprout_core::scene::{HorizontalConstraint, NodeType, VerticalConstraint};
use sprout_core::{ParamValue, Result, StyleMap, StyleValue};
use sprout_markup::{transcode, TranscodeOptions};

use super::ContentPlugin;
use crate::context::{ComponentImport, PluginContext};
use crate::state::VisitState;

const ANY: &str = "any";
const MOUSE_HANDLER: &str = "React.MouseEventHandler<HTMLElement>";

/// `style.*`, `innerStyle.*` and `outerStyle.*` parameters.
pub struct ApplyNameStyles;

impl ContentPlugin for ApplyNameStyles {
    fn name(&self) -> &'static str {
        "name-styles"
    }

    fn apply(&self, state: &mut VisitState<'_>, _cx: &mut PluginContext<'_>) -> Result<()> {
        let params = state.params();
        if let Some(styles) = params.nested("style") {
            copy_styles(styles, &mut state.middle);
        }
        if let Some(styles) = params.nested("innerStyle") {
            copy_styles(styles, &mut state.inner);
        }
        if let Some(styles) = params.nested("outerStyle") {
            copy_styles(styles, &mut state.outer);
        }
        Ok(())
    }
}

fn copy_styles(styles: &IndexMap<String, ParamValue>, target: &mut StyleMap) {
    for (property, value) in styles {
        let Some(value) = value.as_str() else {
            continue;
        };
        let value = match value.parse::<f64>() {
            Ok(number) => StyleValue::Number(number),
            Err(_) => StyleValue::Text(value.to_string()),
        };
        target.set(property, value);
    }
}

/// Nested `#` nodes render as an instance of their own component.
pub struct ComponentFromCache;

impl ContentPlugin for ComponentFromCache {
    fn name(&self) -> &'static str {
        "component-from-cache"
    }

    fn apply(&self, state: &mut VisitState<'_>, cx: &mut PluginContext<'_>) -> Result<()> {
        if state.is_root() {
            return Ok(());
        }
        let node = state.node;

        if !node.attrs.is_component_root() {
            if let Some(styles) = cx.ctx.description_styles(node) {
                cx.scope.additional_styles.push(styles);
            }
            return Ok(());
        }

        let name = component_name(node.name(), &cx.ctx.options.delimiters);
        state.empty_children();
        state
            .content
            .push(format!("<{name} {{...props}} nodeId='{}' />", node.scene_id()));

        let component = cx.registry.build(cx.ctx, node.id)?;
        cx.scope.local_components.insert(
            component.name.clone(),
            ComponentImport {
                name: component.name.clone(),
                file_name: component.file_name.clone(),
            },
        );

        let class_name = cx.scope.next_class_name();
        cx.scope.additional_styles.push(format!(
            ".{class_name} > :global(*) {{\nheight: 100%;\nwidth: 100%;\n}}"
        ));
        state.class_names.push(class_name);
        Ok(())
    }
}

/// Unconsumed masks render nothing.
pub struct RenderMask;

impl ContentPlugin for RenderMask {
    fn name(&self) -> &'static str {
        "render-mask"
    }

    fn apply(&self, state: &mut VisitState<'_>, _cx: &mut PluginContext<'_>) -> Result<()> {
        if state.node.is_mask() {
            state.empty_children();
        }
        Ok(())
    }
}

/// Vectors render as inline markup or, with `vectorImg`, as an image.
pub struct RenderVector;

impl ContentPlugin for RenderVector {
    fn name(&self) -> &'static str {
        "render-vector"
    }

    fn apply(&self, state: &mut VisitState<'_>, cx: &mut PluginContext<'_>) -> Result<()> {
        let node = state.node;
        if node.kind != NodeType::Vector || node.is_mask() {
            return Ok(());
        }
        let Some(markup) = cx.ctx.resources.vector(node.scene_id()) else {
            return Ok(());
        };

        state.empty_children();
        let class_name = cx.scope.next_class_name();

        let scale_h = matches!(
            node.constraints.horizontal,
            HorizontalConstraint::LeftRight | HorizontalConstraint::Scale
        );
        let scale_v = matches!(
            node.constraints.vertical,
            VerticalConstraint::TopBottom | VerticalConstraint::Scale
        );
        let mut rule = Vec::new();
        if scale_h {
            rule.push("left: 0;\nwidth: 100%;");
        }
        if scale_v {
            rule.push("top: 0;\nheight: 100%;");
        }
        match (scale_h, scale_v) {
            (true, true) => rule.push("transform: unset;"),
            (true, false) => rule.push("transform: translateY(-50%);"),
            (false, true) => rule.push("transform: translateX(-50%);"),
            (false, false) => {}
        }
        if !rule.is_empty() {
            cx.scope
                .additional_styles
                .push(format!(".{class_name} {{\n{}\n}}", rule.join("\n")));
        }

        if state.params().contains("vectorImg") {
            if let Some(url) = cx.ctx.resources.vector_url(node.scene_id()) {
                state
                    .content
                    .push(format!("<img className='vector {class_name}' src='{url}' />"));
            }
            return Ok(());
        }

        let options =
            TranscodeOptions::new(node.scene_id()).with_class_name(format!("vector {class_name}"));
        match transcode(markup, &options) {
            Ok(jsx) => state.content.push(jsx),
            Err(e) if cx.ctx.options.strict_markup => return Err(e.into()),
            Err(e) => tracing::warn!(id = %node.scene_id(), error = %e, "skipping vector"),
        }
        Ok(())
    }
}

/// `content=prop` replaces the subtree with a prop.
pub struct ContentSlot;

impl ContentPlugin for ContentSlot {
    fn name(&self) -> &'static str {
        "content-slot"
    }

    fn apply(&self, state: &mut VisitState<'_>, cx: &mut PluginContext<'_>) -> Result<()> {
        let params = state.params();
        if params.contains("contentIfEmpty") {
            return Ok(());
        }
        if let Some(prop) = params.value("content") {
            state.empty_children();
            state.content.push(format!("{{{prop}}}"));
            cx.scope.declare_prop(prop, ANY);
        }
        Ok(())
    }
}

/// `content=prop&contentIfEmpty` renders the subtree only when the prop is
/// falsy, and the prop otherwise.
pub struct ContentSlotFallback;

impl ContentPlugin for ContentSlotFallback {
    fn name(&self) -> &'static str {
        "content-slot-fallback"
    }

    fn apply(&self, state: &mut VisitState<'_>, cx: &mut PluginContext<'_>) -> Result<()> {
        let params = state.params();
        if !params.contains("contentIfEmpty") {
            return Ok(());
        }
        if let Some(prop) = params.value("content") {
            state.prelude.push(format!("{{ !{prop} && ("));
            state.content.push(")}".to_string());
            state.content.push(format!("{{{prop}}}"));
            cx.scope.declare_prop(prop, ANY);
        }
        Ok(())
    }
}

/// `ifTrue=prop` renders the subtree only when the prop is truthy.
pub struct IfTrue;

impl ContentPlugin for IfTrue {
    fn name(&self) -> &'static str {
        "if-true"
    }

    fn apply(&self, state: &mut VisitState<'_>, cx: &mut PluginContext<'_>) -> Result<()> {
        conditional(state, cx, "ifTrue", "!!")
    }
}

/// `ifFalse=prop` renders the subtree only when the prop is falsy.
pub struct IfFalse;

impl ContentPlugin for IfFalse {
    fn name(&self) -> &'static str {
        "if-false"
    }

    fn apply(&self, state: &mut VisitState<'_>, cx: &mut PluginContext<'_>) -> Result<()> {
        conditional(state, cx, "ifFalse", "!")
    }
}

fn conditional(
    state: &mut VisitState<'_>,
    cx: &mut PluginContext<'_>,
    key: &str,
    negation: &str,
) -> Result<()> {
    if let Some(prop) = state.params().value(key) {
        state.prelude.push(format!("{{ {negation}{prop} && ("));
        state.content.push(")}".to_string());
        cx.scope.declare_prop(prop, ANY);
    }
    Ok(())
}

/// `onClick=prop` binds a click handler prop.
pub struct OnClick;

impl ContentPlugin for OnClick {
    fn name(&self) -> &'static str {
        "on-click"
    }

    fn apply(&self, state: &mut VisitState<'_>, cx: &mut PluginContext<'_>) -> Result<()> {
        if let Some(prop) = state.params().value("onClick") {
            state.node_props.insert("onClick".into(), prop.to_string());
            cx.scope.declare_prop(prop, MOUSE_HANDLER);
        }
        Ok(())
    }
}

/// `id=value` sets a fixed element id.
pub struct SetId;

impl ContentPlugin for SetId {
    fn name(&self) -> &'static str {
        "id"
    }

    fn apply(&self, state: &mut VisitState<'_>, _cx: &mut PluginContext<'_>) -> Result<()> {
        if let Some(id) = state.params().value("id") {
            state.node_props.insert("id".into(), format!("'{id}'"));
        }
        Ok(())
    }
}

/// `class=name` adds a hand-written class.
pub struct AddClass;

impl ContentPlugin for AddClass {
    fn name(&self) -> &'static str {
        "class"
    }

    fn apply(&self, state: &mut VisitState<'_>, _cx: &mut PluginContext<'_>) -> Result<()> {
        if let Some(class_name) = state.params().value("class") {
            state.class_names.push(class_name.to_string());
        }
        Ok(())
    }
}
