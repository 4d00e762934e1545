//! Run-wide and per-component compilation context.

use indexmap::IndexMap;
use serde::Serialize;
use sprout_assets::Resources;
use sprout_core::{CompileOptions, Node, NodeTree, StyleMap};

use crate::codegen::DEFAULT_STYLES;
use crate::plugins::PluginSet;
use crate::registry::ComponentRegistry;

/// Read-only inputs shared by every component build of a run.
pub struct CompileContext<'a> {
    pub tree: &'a NodeTree,
    pub options: &'a CompileOptions,
    pub resources: &'a Resources,
    /// Component description per node or component id
    pub descriptions: &'a IndexMap<String, String>,
    pub plugins: &'a PluginSet,
}

impl CompileContext<'_> {
    /// Raw CSS a designer attached to the node's component description,
    /// found after the description-style delimiter.
    pub fn description_styles(&self, node: &Node) -> Option<String> {
        let key = node.attrs.component_id.as_deref().unwrap_or(node.scene_id());
        let description = self.descriptions.get(key)?;
        let delimiter = &self.options.style_description_delimiter;
        let index = description.find(delimiter.as_str())?;

        let styles = description[index + delimiter.len()..]
            .replace("\\n", "\n")
            .trim()
            .to_string();
        (!styles.is_empty()).then_some(styles)
    }
}

/// A component imported by the component being built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComponentImport {
    pub name: String,
    pub file_name: String,
}

/// Accumulators of one component build.
///
/// The class counter starts at zero for every build, so a component's
/// output depends only on its own subtree.
#[derive(Debug, Clone)]
pub struct ComponentScope {
    pub name: String,
    class_prefix: String,
    class_counter: usize,
    rules: Vec<String>,
    /// Hand-written rules appended after the generated ones
    pub additional_styles: Vec<String>,
    /// Declared props and their TypeScript types
    pub prop_types: IndexMap<String, String>,
    /// Nested components referenced from this one
    pub local_components: IndexMap<String, ComponentImport>,
}

impl ComponentScope {
    pub fn new(name: impl Into<String>, class_prefix: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            class_prefix: class_prefix.into(),
            class_counter: 0,
            rules: Vec::new(),
            additional_styles: Vec::new(),
            prop_types: IndexMap::new(),
            local_components: IndexMap::new(),
        }
    }

    /// Allocate the next class name.
    pub fn next_class_name(&mut self) -> String {
        let class_name = format!("{}{}", self.class_prefix, self.class_counter);
        self.class_counter += 1;
        class_name
    }

    /// Register a rule for `style` under a fresh class name. Empty styles
    /// still consume a class name but produce no rule.
    pub fn print_style(&mut self, style: &StyleMap) -> Option<String> {
        let class_name = self.next_class_name();
        let rule = style.to_rule(&class_name)?;
        self.rules.push(rule);
        Some(class_name)
    }

    /// Declare a prop; a later declaration replaces the type.
    pub fn declare_prop(&mut self, name: &str, ty: &str) {
        self.prop_types.insert(name.to_string(), ty.to_string());
    }

    /// Final stylesheet: defaults, generated rules, additional rules, then
    /// description styles.
    pub fn stylesheet(&self, description: Option<&str>) -> String {
        let mut sheet = String::from(DEFAULT_STYLES);
        for rule in self.rules.iter().chain(&self.additional_styles) {
            sheet.push('\n');
            sheet.push_str(rule);
        }
        if let Some(description) = description {
            sheet.push('\n');
            sheet.push_str(description);
        }
        sheet
    }
}

/// What a plugin can reach while handling one node.
pub struct PluginContext<'a> {
    pub ctx: &'a CompileContext<'a>,
    pub scope: &'a mut ComponentScope,
    pub registry: &'a mut ComponentRegistry,
}
