//! Generic attributed-element tree.

use indexmap::IndexMap;
use sprout_core::errors::MarkupError;

const XLINK_NS: &str = "http://www.w3.org/1999/xlink";
const XML_NS: &str = "http://www.w3.org/XML/1998/namespace";

/// An attribute value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeValue {
    /// Quoted string
    Literal(String),
    /// Braced template expression
    Expression(String),
}

/// A child of an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkupNode {
    Element(MarkupElement),
    Text(String),
    /// Braced template expression
    Expression(String),
}

/// An element with ordered attributes and children.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MarkupElement {
    pub tag: String,
    pub attributes: IndexMap<String, AttributeValue>,
    /// Expressions spread onto the element (`{...props}`)
    pub spreads: Vec<String>,
    pub children: Vec<MarkupNode>,
}

impl MarkupElement {
    /// Create an element.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Default::default()
        }
    }

    /// Add a literal attribute.
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes
            .insert(name.into(), AttributeValue::Literal(value.into()));
        self
    }

    /// Add a child element.
    pub fn with_child(mut self, child: MarkupElement) -> Self {
        self.children.push(MarkupNode::Element(child));
        self
    }

    /// Parse raw markup. Errors are attributed to `source_id`.
    pub fn parse(raw: &str, source_id: &str) -> Result<Self, MarkupError> {
        let options = roxmltree::ParsingOptions {
            allow_dtd: true,
            ..Default::default()
        };
        let document = roxmltree::Document::parse_with_options(raw, options)
            .map_err(|e| MarkupError::parse(source_id, e.to_string()))?;
        Ok(convert(document.root_element()))
    }

    /// Literal attribute value.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        match self.attributes.get(name) {
            Some(AttributeValue::Literal(value)) => Some(value),
            _ => None,
        }
    }

    /// The `id` attribute.
    pub fn id(&self) -> Option<&str> {
        self.attribute("id")
    }

    /// Child elements.
    pub fn elements(&self) -> impl Iterator<Item = &MarkupElement> {
        self.children.iter().filter_map(|child| match child {
            MarkupNode::Element(element) => Some(element),
            _ => None,
        })
    }

    /// Find an element by id in this subtree.
    pub fn find_by_id(&self, id: &str) -> Option<&MarkupElement> {
        if self.id() == Some(id) {
            return Some(self);
        }
        self.elements().find_map(|child| child.find_by_id(id))
    }

    /// Find an element by id in this subtree, mutably.
    pub fn find_by_id_mut(&mut self, id: &str) -> Option<&mut MarkupElement> {
        if self.id() == Some(id) {
            return Some(self);
        }
        self.children.iter_mut().find_map(|child| match child {
            MarkupNode::Element(element) => element.find_by_id_mut(id),
            _ => None,
        })
    }

    /// Visit this element and every descendant element, parents first.
    pub fn walk_mut(&mut self, f: &mut impl FnMut(&mut MarkupElement)) {
        f(self);
        for child in &mut self.children {
            if let MarkupNode::Element(element) = child {
                element.walk_mut(f);
            }
        }
    }
}

fn convert(node: roxmltree::Node<'_, '_>) -> MarkupElement {
    let mut element = MarkupElement::new(node.tag_name().name());

    for attribute in node.attributes() {
        let name = match attribute.namespace() {
            Some(XLINK_NS) => format!("xlink:{}", attribute.name()),
            Some(XML_NS) => format!("xml:{}", attribute.name()),
            _ => attribute.name().to_string(),
        };
        element
            .attributes
            .insert(name, AttributeValue::Literal(attribute.value().to_string()));
    }

    for child in node.children() {
        if child.is_element() {
            element.children.push(MarkupNode::Element(convert(child)));
        } else if child.is_text() {
            if let Some(text) = child.text() {
                element.children.push(MarkupNode::Text(text.to_string()));
            }
        }
    }

    element
}
