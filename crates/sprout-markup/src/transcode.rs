//! JSX re-serialization.

use indexmap::IndexMap;
use sprout_core::errors::MarkupError;

use crate::element::{AttributeValue, MarkupElement, MarkupNode};
use crate::sanitize::{css_property, sanitize};

/// Element receiving the children placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChildrenTarget {
    Root,
    Id(String),
}

/// Options for one transcode call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscodeOptions {
    /// Scene node the markup belongs to, used in errors
    pub source_id: String,
    /// Id of the element to use as the new root
    pub root: Option<String>,
    /// Element id to ref expression
    pub refs: IndexMap<String, String>,
    /// Spread the props bag onto the root
    pub pass_props: bool,
    /// Element receiving the children placeholder
    pub render_children: Option<ChildrenTarget>,
    /// Class names prepended to the root's `className`
    pub class_name: Option<String>,
    /// Expression rendered as the children placeholder
    pub children_expression: String,
    /// Expression spread onto the root
    pub props_expression: String,
}

impl TranscodeOptions {
    /// Create options for markup belonging to `source_id`.
    pub fn new(source_id: impl Into<String>) -> Self {
        Self {
            source_id: source_id.into(),
            root: None,
            refs: IndexMap::new(),
            pass_props: false,
            render_children: None,
            class_name: None,
            children_expression: "props.children".into(),
            props_expression: "...props".into(),
        }
    }

    /// Use the element with `id` as the root.
    pub fn with_root(mut self, id: impl Into<String>) -> Self {
        self.root = Some(id.into());
        self
    }

    /// Attach a ref expression to the element with `id`.
    pub fn with_ref(mut self, id: impl Into<String>, expression: impl Into<String>) -> Self {
        self.refs.insert(id.into(), expression.into());
        self
    }

    /// Spread the props bag onto the root.
    pub fn with_pass_props(mut self) -> Self {
        self.pass_props = true;
        self
    }

    /// Render children into `target`.
    pub fn with_children(mut self, target: ChildrenTarget) -> Self {
        self.render_children = Some(target);
        self
    }

    /// Prepend class names to the root.
    pub fn with_class_name(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = Some(class_name.into());
        self
    }
}

/// Transcode raw SVG markup into JSX.
pub fn transcode(raw: &str, options: &TranscodeOptions) -> Result<String, MarkupError> {
    let mut root = MarkupElement::parse(raw, &options.source_id)?;
    sanitize(&mut root);

    let not_found = |element_id: &str| MarkupError::ElementNotFound {
        node_id: options.source_id.clone(),
        element_id: element_id.to_string(),
    };

    if let Some(id) = &options.root {
        root = root.find_by_id(id).cloned().ok_or_else(|| not_found(id))?;
    }

    for (id, expression) in &options.refs {
        let element = root.find_by_id_mut(id).ok_or_else(|| not_found(id))?;
        element
            .attributes
            .insert("ref".into(), AttributeValue::Expression(expression.clone()));
    }

    if options.pass_props {
        root.spreads.push(options.props_expression.clone());
    }

    if let Some(target) = &options.render_children {
        let element = match target {
            ChildrenTarget::Root => &mut root,
            ChildrenTarget::Id(id) => root.find_by_id_mut(id).ok_or_else(|| not_found(id))?,
        };
        element
            .children
            .push(MarkupNode::Expression(options.children_expression.clone()));
    }

    if let Some(class_name) = &options.class_name {
        let merged = match root.attribute("className") {
            Some(existing) => format!("{class_name} {existing}"),
            None => class_name.clone(),
        };
        root.attributes
            .insert("className".into(), AttributeValue::Literal(merged));
    }

    root.walk_mut(&mut |el: &mut MarkupElement| {
        if let Some(AttributeValue::Literal(style)) = el.attributes.get("style") {
            let object = style_object(style);
            el.attributes
                .insert("style".into(), AttributeValue::Expression(object));
        }
    });

    Ok(serialize(&root))
}

/// `fill: red; stroke-width: 2` to `{"fill":"red","strokeWidth":"2"}`.
fn style_object(style: &str) -> String {
    let entries: Vec<String> = declarations(style)
        .into_iter()
        .filter_map(|rule| rule.split_once(':'))
        .filter(|(property, _)| !property.trim().is_empty())
        .map(|(property, value)| {
            format!(
                "{}:{}",
                json_string(&css_property(property)),
                json_string(value.trim())
            )
        })
        .collect();
    format!("{{{}}}", entries.join(","))
}

/// Split a style attribute at `;` outside parentheses.
fn declarations(style: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, ch) in style.char_indices() {
        match ch {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ';' if depth == 0 => {
                parts.push(&style[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&style[start..]);
    parts
}

fn json_string(s: &str) -> String {
    serde_json::Value::String(s.to_string()).to_string()
}

/// Serialize an element tree as tab-indented JSX.
pub fn serialize(root: &MarkupElement) -> String {
    let mut out = String::new();
    write_element(&mut out, root, 0);
    out.truncate(out.trim_end().len());
    out
}

fn write_element(out: &mut String, element: &MarkupElement, depth: usize) {
    let indent = "\t".repeat(depth);
    out.push_str(&indent);
    out.push('<');
    out.push_str(&element.tag);

    for spread in &element.spreads {
        out.push_str(&format!(" {{{spread}}}"));
    }
    for (name, value) in &element.attributes {
        match value {
            AttributeValue::Literal(v) => out.push_str(&format!(" {name}=\"{}\"", escape_attribute(v))),
            AttributeValue::Expression(e) => out.push_str(&format!(" {name}={{{e}}}")),
        }
    }

    if element.children.is_empty() {
        out.push_str(" />\n");
        return;
    }

    let inline = element
        .children
        .iter()
        .all(|child| !matches!(child, MarkupNode::Element(_)));
    if inline {
        out.push('>');
        for child in &element.children {
            out.push_str(&inline_child(child));
        }
        out.push_str(&format!("</{}>\n", element.tag));
        return;
    }

    out.push_str(">\n");
    for child in &element.children {
        match child {
            MarkupNode::Element(child) => write_element(out, child, depth + 1),
            other => {
                out.push_str(&indent);
                out.push('\t');
                out.push_str(&inline_child(other));
                out.push('\n');
            }
        }
    }
    out.push_str(&format!("{indent}</{}>\n", element.tag));
}

fn inline_child(child: &MarkupNode) -> String {
    match child {
        MarkupNode::Text(text) => escape_text(text),
        MarkupNode::Expression(e) => format!("{{{e}}}"),
        MarkupNode::Element(_) => String::new(),
    }
}

fn escape_attribute(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
}

fn escape_text(text: &str) -> String {
    if text.contains(['{', '}', '<', '>']) {
        format!("{{{}}}", json_string(text))
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ICON: &str = r##"<svg width="24" height="24" viewBox="0 0 24 24" fill="none" xmlns="http://www.w3.org/2000/svg">
<g id="frame">
<path d="M2 2H22V22H2Z" fill="#FF0000" stroke-width="2" style="mix-blend-mode: multiply; fill-opacity: 0.5"/>
</g>
</svg>"##;

    #[test]
    fn test_transcode_basic() {
        let jsx = transcode(ICON, &TranscodeOptions::new("1:2")).unwrap();
        let expected = "<svg width=\"24\" height=\"24\" viewBox=\"0 0 24 24\" fill=\"none\">\n\
                        \t<g id=\"frame\">\n\
                        \t\t<path d=\"M2 2H22V22H2Z\" fill=\"#FF0000\" strokeWidth=\"2\" style={{\"mixBlendMode\":\"multiply\",\"fillOpacity\":\"0.5\"}} />\n\
                        \t</g>\n\
                        </svg>";
        assert_eq!(jsx, expected);
    }

    #[test]
    fn test_transcode_class_and_props() {
        let options = TranscodeOptions::new("1:2")
            .with_class_name("vector figma-3")
            .with_pass_props();
        let jsx = transcode(ICON, &options).unwrap();
        assert!(jsx.starts_with("<svg {...props} width=\"24\""));
        assert!(jsx.contains("className=\"vector figma-3\">"));
    }

    #[test]
    fn test_transcode_root_and_children() {
        let options = TranscodeOptions::new("1:2")
            .with_root("frame")
            .with_children(ChildrenTarget::Root)
            .with_ref("frame", "frameRef");
        let jsx = transcode(ICON, &options).unwrap();
        assert!(jsx.starts_with("<g id=\"frame\" ref={frameRef}>"));
        assert!(jsx.contains("\t{props.children}\n"));
        assert!(!jsx.contains("<svg"));
    }

    #[test]
    fn test_transcode_missing_element() {
        let options = TranscodeOptions::new("1:2").with_root("nope");
        match transcode(ICON, &options) {
            Err(MarkupError::ElementNotFound { node_id, element_id }) => {
                assert_eq!(node_id, "1:2");
                assert_eq!(element_id, "nope");
            }
            other => panic!("expected missing element, got {other:?}"),
        }
    }

    #[test]
    fn test_style_keeps_semicolons_inside_parentheses() {
        let object = style_object("fill: url(data:image/png;base64,AAA=); opacity: 0.5;");
        assert_eq!(
            object,
            "{\"fill\":\"url(data:image/png;base64,AAA=)\",\"opacity\":\"0.5\"}"
        );
    }

    #[test]
    fn test_text_with_braces_is_wrapped() {
        let root = MarkupElement {
            tag: "text".into(),
            children: vec![MarkupNode::Text("a {b}".into())],
            ..Default::default()
        };
        assert_eq!(serialize(&root), "<text>{\"a {b}\"}</text>");
    }
}
