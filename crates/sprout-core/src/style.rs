//! Style maps and CSS rendering.

use std::fmt;

use convert_case::{Case, Casing};
use indexmap::IndexMap;

use crate::scene::{Color, Effect, Paint, TextAlignHorizontal, TypeStyle};

/// Properties whose bare numbers are pixel lengths.
const LENGTH_PROPERTIES: &[&str] = &[
    "width",
    "min-width",
    "max-width",
    "height",
    "min-height",
    "max-height",
    "left",
    "right",
    "top",
    "bottom",
    "font-size",
    "margin-right",
    "margin-left",
    "margin-top",
    "margin-bottom",
    "padding-right",
    "padding-left",
    "padding-top",
    "padding-bottom",
];

/// A style property value.
#[derive(Debug, Clone, PartialEq)]
pub enum StyleValue {
    Number(f64),
    Text(String),
}

impl From<f64> for StyleValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i32> for StyleValue {
    fn from(value: i32) -> Self {
        Self::Number(value as f64)
    }
}

impl From<&str> for StyleValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for StyleValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl fmt::Display for StyleValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => f.write_str(&format_number(*n)),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// Ordered map of camelCase style properties.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StyleMap {
    entries: IndexMap<String, StyleValue>,
}

impl StyleMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a property, keeping its original position if already present.
    pub fn set(&mut self, property: &str, value: impl Into<StyleValue>) {
        self.entries.insert(property.to_string(), value.into());
    }

    /// Remove a property.
    pub fn remove(&mut self, property: &str) -> Option<StyleValue> {
        self.entries.shift_remove(property)
    }

    /// Get a property.
    pub fn get(&self, property: &str) -> Option<&StyleValue> {
        self.entries.get(property)
    }

    /// Check if a property is set.
    pub fn contains(&self, property: &str) -> bool {
        self.entries.contains_key(property)
    }

    /// Append `value` to a comma-separated property.
    pub fn append(&mut self, property: &str, value: &str) {
        let merged = match self.entries.get(property) {
            Some(existing) => format!("{existing}, {value}"),
            None => value.to_string(),
        };
        self.set(property, merged);
    }

    /// Copy every property of `other` into this map.
    pub fn merge(&mut self, other: &StyleMap) {
        for (k, v) in &other.entries {
            self.entries.insert(k.clone(), v.clone());
        }
    }

    /// Iterate properties in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &StyleValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of properties.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the map is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Render CSS declarations, one per line.
    pub fn to_declarations(&self) -> String {
        self.entries
            .iter()
            .map(|(property, value)| {
                let name = css_property_name(property);
                let value = match value {
                    StyleValue::Number(n) if LENGTH_PROPERTIES.contains(&name.as_str()) => {
                        format!("{}px", format_number(*n))
                    }
                    other => other.to_string(),
                };
                format!("{name}: {value};")
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Render a class rule, or `None` when the map is empty.
    pub fn to_rule(&self, class_name: &str) -> Option<String> {
        if self.is_empty() {
            return None;
        }
        Some(format!(".{class_name} {{\n{}\n}}", self.to_declarations()))
    }
}

impl<K: Into<String>, V: Into<StyleValue>> FromIterator<(K, V)> for StyleMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Convert a camelCase property to its CSS name. Capitalized names are
/// vendor-prefixed (`WebkitTextStroke` becomes `-webkit-text-stroke`).
pub fn css_property_name(property: &str) -> String {
    let kebab = property.to_case(Case::Kebab);
    if property.starts_with(|c: char| c.is_ascii_uppercase()) {
        format!("-{kebab}")
    } else {
        kebab
    }
}

/// Format a number with at most four decimals and no trailing zeros.
pub fn format_number(value: f64) -> String {
    let rounded = (value * 10_000.0).round() / 10_000.0;
    if rounded == 0.0 {
        return "0".to_string();
    }
    if rounded.fract() == 0.0 {
        return format!("{}", rounded as i64);
    }
    let text = format!("{rounded:.4}");
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}

/// `rgba(...)` with channels scaled to 0..=255.
pub fn color_string(color: &Color) -> String {
    format!(
        "rgba({}, {}, {}, {})",
        (color.r * 255.0).round() as i64,
        (color.g * 255.0).round() as i64,
        (color.b * 255.0).round() as i64,
        format_number(color.a)
    )
}

fn shadow_parts(effect: &Effect) -> String {
    let offset = effect.offset.unwrap_or_default();
    format!(
        "{}px {}px {}px {}",
        format_number(offset.x),
        format_number(offset.y),
        format_number(effect.radius),
        color_string(&effect.color.unwrap_or_default())
    )
}

/// Drop shadow value for `box-shadow`/`text-shadow`.
pub fn drop_shadow(effect: &Effect) -> String {
    shadow_parts(effect)
}

/// Inset shadow value.
pub fn inner_shadow(effect: &Effect) -> String {
    format!("inset {}", shadow_parts(effect))
}

fn gradient_stops(paint: &Paint) -> String {
    paint
        .gradient_stops
        .iter()
        .map(|stop| {
            format!(
                "{} {}%",
                color_string(&stop.color),
                (stop.position * 100.0).round() as i64
            )
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// `linear-gradient(...)` with the angle taken from the first two handles.
pub fn linear_gradient(paint: &Paint) -> String {
    let angle = match paint.gradient_handle_positions.as_slice() {
        [start, end, ..] => (end.x - start.x).atan2(start.y - end.y),
        _ => 0.0,
    };
    format!(
        "linear-gradient({}rad, {})",
        format_number(angle),
        gradient_stops(paint)
    )
}

/// `radial-gradient(...)`.
pub fn radial_gradient(paint: &Paint) -> String {
    format!("radial-gradient({})", gradient_stops(paint))
}

/// Copy font properties of `style` into `target`.
pub fn apply_type_style(target: &mut StyleMap, style: &TypeStyle) {
    if let Some(size) = style.font_size {
        target.set("fontSize", size);
    }
    if let Some(weight) = style.font_weight {
        target.set("fontWeight", weight);
    }
    if let Some(family) = &style.font_family {
        target.set("fontFamily", family.as_str());
    }
    if let Some(align) = style.text_align_horizontal {
        target.set("textAlign", text_align(align));
    }
    target.set("fontStyle", if style.italic { "italic" } else { "normal" });
    if let Some(percent) = style.line_height_percent {
        target.set("lineHeight", format!("{}%", format_number(percent * 1.25)));
    }
    if let Some(spacing) = style.letter_spacing {
        target.set("letterSpacing", format!("{}px", format_number(spacing)));
    }
}

fn text_align(align: TextAlignHorizontal) -> &'static str {
    match align {
        TextAlignHorizontal::Left => "left",
        TextAlignHorizontal::Right => "right",
        TextAlignHorizontal::Center => "center",
        TextAlignHorizontal::Justified => "justify",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{ColorStop, EffectType, PaintType, Vector};

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(10.0), "10");
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(12.5), "12.5");
        assert_eq!(format_number(1.0 / 3.0), "0.3333");
        assert_eq!(format_number(-4.25), "-4.25");
    }

    #[test]
    fn test_css_property_name() {
        assert_eq!(css_property_name("backgroundColor"), "background-color");
        assert_eq!(css_property_name("zIndex"), "z-index");
        assert_eq!(css_property_name("WebkitTextStroke"), "-webkit-text-stroke");
        assert_eq!(css_property_name("width"), "width");
    }

    #[test]
    fn test_declarations_add_px_to_lengths() {
        let mut style = StyleMap::new();
        style.set("marginLeft", 12.0);
        style.set("zIndex", 3);
        style.set("width", "50%");

        assert_eq!(
            style.to_declarations(),
            "margin-left: 12px;\nz-index: 3;\nwidth: 50%;"
        );
    }

    #[test]
    fn test_rule() {
        let style: StyleMap = [("display", "flex")].into_iter().collect();
        assert_eq!(
            style.to_rule("figma-0").as_deref(),
            Some(".figma-0 {\ndisplay: flex;\n}")
        );
        assert!(StyleMap::new().to_rule("figma-1").is_none());
    }

    #[test]
    fn test_set_keeps_position_and_remove_shifts() {
        let mut style = StyleMap::new();
        style.set("a", 1);
        style.set("b", 2);
        style.set("a", 3);
        let keys: Vec<&str> = style.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["a", "b"]);

        style.remove("a");
        assert_eq!(style.len(), 1);
        assert!(!style.contains("a"));
    }

    #[test]
    fn test_append() {
        let mut style = StyleMap::new();
        style.append("textShadow", "1px 1px 0px red");
        style.append("textShadow", "2px 2px 0px blue");
        assert_eq!(
            style.get("textShadow"),
            Some(&StyleValue::Text("1px 1px 0px red, 2px 2px 0px blue".into()))
        );
    }

    #[test]
    fn test_color_string() {
        let color = Color::new(1.0, 0.5, 0.0, 0.8);
        assert_eq!(color_string(&color), "rgba(255, 128, 0, 0.8)");
    }

    #[test]
    fn test_shadows() {
        let effect = Effect {
            effect_type: EffectType::DropShadow,
            visible: true,
            radius: 4.0,
            color: Some(Color::new(0.0, 0.0, 0.0, 0.25)),
            offset: Some(Vector::new(0.0, 2.0)),
        };
        assert_eq!(drop_shadow(&effect), "0px 2px 4px rgba(0, 0, 0, 0.25)");
        assert_eq!(inner_shadow(&effect), "inset 0px 2px 4px rgba(0, 0, 0, 0.25)");
    }

    #[test]
    fn test_linear_gradient_top_to_bottom() {
        let mut paint = Paint::of_type(PaintType::GradientLinear);
        paint.gradient_handle_positions = vec![Vector::new(0.5, 0.0), Vector::new(0.5, 1.0)];
        paint.gradient_stops = vec![
            ColorStop { position: 0.0, color: Color::new(1.0, 1.0, 1.0, 1.0) },
            ColorStop { position: 1.0, color: Color::new(0.0, 0.0, 0.0, 1.0) },
        ];

        assert_eq!(
            linear_gradient(&paint),
            "linear-gradient(3.1416rad, rgba(255, 255, 255, 1) 0%, rgba(0, 0, 0, 1) 100%)"
        );
    }

    #[test]
    fn test_apply_type_style() {
        let style = TypeStyle {
            font_family: Some("Inter".into()),
            font_size: Some(14.0),
            font_weight: Some(500.0),
            line_height_percent: Some(100.0),
            letter_spacing: Some(0.5),
            ..Default::default()
        };
        let mut target = StyleMap::new();
        apply_type_style(&mut target, &style);

        assert_eq!(target.get("fontFamily"), Some(&StyleValue::Text("Inter".into())));
        assert_eq!(target.get("lineHeight"), Some(&StyleValue::Text("125%".into())));
        assert_eq!(target.get("letterSpacing"), Some(&StyleValue::Text("0.5px".into())));
        assert_eq!(target.get("fontStyle"), Some(&StyleValue::Text("normal".into())));
    }
}
