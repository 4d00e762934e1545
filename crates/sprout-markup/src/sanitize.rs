//! Attribute renaming and capability filtering.

use convert_case::{Case, Casing};

use crate::element::{MarkupElement, MarkupNode};

/// Attributes the target accepts on SVG elements, in target spelling.
const SUPPORTED_ATTRIBUTES: &[&str] = &[
    "id",
    "className",
    "style",
    "ref",
    "key",
    "d",
    "x",
    "y",
    "x1",
    "x2",
    "y1",
    "y2",
    "cx",
    "cy",
    "r",
    "rx",
    "ry",
    "dx",
    "dy",
    "fx",
    "fy",
    "width",
    "height",
    "viewBox",
    "preserveAspectRatio",
    "points",
    "transform",
    "fill",
    "fillOpacity",
    "fillRule",
    "clipPath",
    "clipRule",
    "clipPathUnits",
    "stroke",
    "strokeWidth",
    "strokeOpacity",
    "strokeLinecap",
    "strokeLinejoin",
    "strokeMiterlimit",
    "strokeDasharray",
    "strokeDashoffset",
    "opacity",
    "mask",
    "maskUnits",
    "maskContentUnits",
    "maskType",
    "offset",
    "stopColor",
    "stopOpacity",
    "gradientUnits",
    "gradientTransform",
    "spreadMethod",
    "patternUnits",
    "patternContentUnits",
    "patternTransform",
    "href",
    "xlinkHref",
    "filter",
    "filterUnits",
    "primitiveUnits",
    "colorInterpolationFilters",
    "stdDeviation",
    "in",
    "in2",
    "result",
    "mode",
    "type",
    "values",
    "operator",
    "floodColor",
    "floodOpacity",
    "textAnchor",
    "dominantBaseline",
    "fontFamily",
    "fontSize",
    "fontWeight",
    "letterSpacing",
    "visibility",
    "display",
    "xmlSpace",
];

/// Target spelling of an attribute name.
///
/// `class` becomes `className`, namespaced names fold their prefix
/// (`xlink:href` becomes `xlinkHref`) and kebab names are camelized.
/// `data-*` and `aria-*` keep their spelling.
pub fn attribute_name(name: &str) -> String {
    if name == "class" {
        return "className".to_string();
    }
    if name.starts_with("data-") || name.starts_with("aria-") {
        return name.to_string();
    }
    if let Some((prefix, local)) = name.split_once(':') {
        return format!("{prefix}{}", local.to_case(Case::Pascal));
    }
    if name.contains('-') {
        return name.to_case(Case::Camel);
    }
    name.to_string()
}

/// CSS property to style-object key (`-webkit-mask` becomes `WebkitMask`).
pub fn css_property(property: &str) -> String {
    let property = property.trim();
    if property.starts_with('-') {
        property.to_case(Case::Pascal)
    } else {
        property.to_case(Case::Camel)
    }
}

/// Whether an attribute survives sanitizing.
pub fn is_supported_attribute(name: &str) -> bool {
    name.starts_with("data-") || name.starts_with("aria-") || SUPPORTED_ATTRIBUTES.contains(&name)
}

/// Rename attributes, drop unsupported ones and whitespace-only text.
///
/// Custom elements (tags containing `-`) keep every attribute as written.
pub fn sanitize(element: &mut MarkupElement) {
    element.walk_mut(&mut |el: &mut MarkupElement| {
        if !el.tag.contains('-') {
            let attributes = std::mem::take(&mut el.attributes);
            el.attributes = attributes
                .into_iter()
                .map(|(name, value)| (attribute_name(&name), value))
                .filter(|(name, _)| is_supported_attribute(name))
                .collect();
        }
        el.children
            .retain(|child| !matches!(child, MarkupNode::Text(text) if text.trim().is_empty()));
    });
}
