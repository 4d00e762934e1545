//! Text node rendering.

use indexmap::IndexMap;
use sprout_core::scene::{
    last_paint, EffectType, NodeType, PaintType, TextAlignHorizontal, TextAlignVertical,
};
use sprout_core::style::{apply_type_style, color_string, drop_shadow, format_number, inner_shadow};
use sprout_core::{ParamValue, Result, StyleMap};

use super::ContentPlugin;
use crate::context::PluginContext;
use crate::state::VisitState;
use crate::text::{edge_whitespace, escape_template_literal, split_runs, TextFragment};

/// Text nodes: font styling, alignment, shadows and styled runs.
///
/// Parameters: `input[=type]` renders an input with the text as its
/// placeholder; `ellipsis[=i,j]` truncates all runs or the listed ones;
/// `ellipsisFlex` and `ellipsisWrap` let the last override style grow or
/// wrap; `filterShadow` renders shadows as a drop-shadow filter.
pub struct TextRenderer;

impl ContentPlugin for TextRenderer {
    fn name(&self) -> &'static str {
        "text"
    }

    fn apply(&self, state: &mut VisitState<'_>, cx: &mut PluginContext<'_>) -> Result<()> {
        if state.node.kind != NodeType::Text {
            return Ok(());
        }
        text_box_styles(state);

        if state.params().contains("input") {
            render_input(state, cx);
        } else {
            render_runs(state, cx);
        }
        Ok(())
    }
}

fn text_box_styles(state: &mut VisitState<'_>) {
    let attrs = &state.node.attrs;
    let filter_shadow = state.node.params.contains("filterShadow");
    let middle = &mut state.middle;

    if let Some(color) = last_paint(&attrs.fills).and_then(|p| p.color) {
        middle.set("color", color_string(&color));
    }
    if let Some(color) = last_paint(&attrs.strokes).and_then(|p| p.color) {
        let weight = attrs.stroke_weight.unwrap_or(1.0);
        middle.set(
            "WebkitTextStroke",
            format!("{}px {}", format_number(weight), color_string(&color)),
        );
    }

    let style = attrs.style.clone().unwrap_or_default();
    apply_type_style(middle, &style);

    middle.set("display", "flex");
    middle.set("maxWidth", "-webkit-fill-available");
    middle.set("alignContent", "flex-start");

    let horizontal = match style.text_align_horizontal {
        Some(TextAlignHorizontal::Center) => Some(("center", "center")),
        Some(TextAlignHorizontal::Left) => Some(("flex-start", "left")),
        Some(TextAlignHorizontal::Right) => Some(("flex-end", "right")),
        _ => None,
    };
    if let Some((justify, align)) = horizontal {
        middle.set("justifyContent", justify);
        middle.set("textAlign", align);
    }

    let vertical = match style.text_align_vertical {
        Some(TextAlignVertical::Center) => Some(("middle", "center")),
        Some(TextAlignVertical::Top) => Some(("top", "flex-start")),
        Some(TextAlignVertical::Bottom) => Some(("bottom", "flex-end")),
        None => None,
    };
    if let Some((vertical_align, align)) = vertical {
        middle.set("verticalAlign", vertical_align);
        middle.set("alignItems", align);
        middle.set("alignContent", align);
    }

    for effect in attrs.effects.iter().filter(|e| e.visible) {
        let shadow = match effect.effect_type {
            EffectType::DropShadow => drop_shadow(effect),
            EffectType::InnerShadow => inner_shadow(effect),
            _ => continue,
        };
        if filter_shadow {
            middle.append("filter", &format!("drop-shadow({shadow})"));
        } else {
            middle.append("textShadow", &shadow);
        }
    }
}

fn render_input(state: &mut VisitState<'_>, cx: &mut PluginContext<'_>) {
    let mut input_style = StyleMap::new();
    input_style.set("flex", 1);
    input_style.set("height", "100%");
    let input_class = cx.scope.print_style(&input_style);

    let node = state.node;
    let mut tag = String::from("<input");
    if !state.node_props.contains_key("id") {
        tag.push_str(&format!(" id='{}'", node.scene_id()));
    }
    for (key, value) in state.node_props.drain(..) {
        tag.push_str(&format!(" {key}={{{value}}}"));
    }

    let classes: Vec<&str> = input_class
        .as_deref()
        .into_iter()
        .chain(state.class_names.iter().map(String::as_str))
        .collect();
    let input_type = state.params().value("input").unwrap_or("text");
    let placeholder = node
        .attrs
        .characters
        .as_deref()
        .unwrap_or_default()
        .replace('"', "&quot;");

    tag.push_str(&format!(
        " className='{}' type=\"{input_type}\" placeholder=\"{placeholder}\" />",
        classes.join(" ")
    ));
    state.content.push(tag);
}

fn render_runs(state: &mut VisitState<'_>, cx: &mut PluginContext<'_>) {
    let node = state.node;
    let params = &node.params;
    let characters = node.attrs.characters.as_deref().unwrap_or_default();
    let table = &node.attrs.style_override_table;

    let last_style = table
        .keys()
        .filter_map(|k| k.parse::<usize>().ok())
        .max()
        .unwrap_or(0);
    // `None` truncates every run
    let ellipsis_runs: Option<Vec<usize>> = match params.get("ellipsis") {
        Some(ParamValue::Flag) => None,
        Some(ParamValue::Value(list)) => Some(
            list.split(',')
                .filter_map(|s| s.trim().parse().ok())
                .collect(),
        ),
        _ => Some(Vec::new()),
    };

    let mut run_styles: IndexMap<usize, StyleMap> = IndexMap::new();

    for fragment in split_runs(characters, &node.attrs.character_style_overrides) {
        match fragment {
            TextFragment::Run {
                text,
                style,
                index,
                key,
            } => {
                let run_style = run_styles.entry(style).or_default();
                if let Some(overrides) = table.get(&style.to_string()) {
                    if let Some(fill) = last_paint(&overrides.fills) {
                        if fill.paint_type == PaintType::Solid {
                            if let Some(color) = &fill.color {
                                run_style.set("color", color_string(color));
                            }
                            if let Some(opacity) = fill.opacity {
                                state.middle.set("opacity", opacity);
                            }
                        }
                    }
                    apply_type_style(run_style, overrides);
                }

                let truncate = ellipsis_runs
                    .as_ref()
                    .map_or(true, |runs| runs.contains(&index));
                if truncate {
                    run_style.set("overflow", "hidden");
                    run_style.set("textOverflow", "ellipsis");
                }
                if style == last_style && params.contains("ellipsisFlex") {
                    run_style.set("flex", 1);
                }
                if style == last_style && params.contains("ellipsisWrap") {
                    state.middle.set("flexWrap", "wrap");
                }

                let class_name = cx.scope.print_style(run_style);
                state.content.push(span(&text, &key, class_name.as_deref()));
            }
            TextFragment::LineBreak { key } => {
                let mut style = StyleMap::new();
                style.set("flex", 1);
                style.set("content", "\"\"");
                style.set("minWidth", "-webkit-fill-available");
                let class_name = cx.scope.print_style(&style).unwrap_or_default();
                state
                    .content
                    .push(format!("<br className=\"{class_name}\" key=\"{key}\" />"));
                state.middle.set("flexWrap", "wrap");
            }
            TextFragment::BlankLine { key } => {
                let mut style = StyleMap::new();
                style.set("flex", 1);
                style.set("minWidth", "-webkit-fill-available");
                let class_name = cx.scope.print_style(&style).unwrap_or_default();
                state.content.push(format!(
                    "<div className=\"{class_name}\" key=\"{key}\">&nbsp;</div>"
                ));
            }
        }
    }
}

fn span(text: &str, key: &str, class_name: Option<&str>) -> String {
    let (leading, trailing) = edge_whitespace(text);
    let before = "&nbsp;".repeat(leading);
    let after = "&nbsp;".repeat(trailing);
    let text = escape_template_literal(text.trim());

    match class_name {
        Some(class_name) => format!(
            "<span className=\"{class_name}\" key=\"{key}\">{before}{{`{text}`}}{after}</span>"
        ),
        None => format!("<span key=\"{key}\">{before}{{`{text}`}}{after}</span>"),
    }
}
