//! Style and content plugins.
//!
//! For every node, each style plugin runs in order, then each content
//! plugin. Style plugins write the three wrapper styles; content plugins
//! write markup fragments, classes and element attributes. The default
//! [`PluginSet`] reproduces the full compiler; callers may reorder,
//! remove or add plugins.

mod content;
mod style;
mod text;

pub use content::{
    AddClass, ApplyNameStyles, ComponentFromCache, ContentSlot, ContentSlotFallback, IfFalse,
    IfTrue, OnClick, RenderMask, RenderVector, SetId,
};
pub use style::{
    AutoLayout, FrameStyles, HorizontalAlign, MaskCompositing, MiddleOrder, Transformation,
    VerticalAlign,
};
pub use text::TextRenderer;

use sprout_core::Result;

use crate::context::PluginContext;
use crate::state::VisitState;

/// Writes wrapper styles for a node.
pub trait StylePlugin: Send + Sync {
    fn name(&self) -> &'static str;

    fn apply(&self, state: &mut VisitState<'_>, cx: &mut PluginContext<'_>) -> Result<()>;
}

/// Writes markup for a node.
pub trait ContentPlugin: Send + Sync {
    fn name(&self) -> &'static str;

    fn apply(&self, state: &mut VisitState<'_>, cx: &mut PluginContext<'_>) -> Result<()>;
}

/// Ordered plugin lists.
pub struct PluginSet {
    pub style: Vec<Box<dyn StylePlugin>>,
    pub content: Vec<Box<dyn ContentPlugin>>,
}

impl PluginSet {
    /// A set with no plugins.
    pub fn empty() -> Self {
        Self {
            style: Vec::new(),
            content: Vec::new(),
        }
    }

    /// Append a style plugin.
    pub fn with_style(mut self, plugin: impl StylePlugin + 'static) -> Self {
        self.style.push(Box::new(plugin));
        self
    }

    /// Append a content plugin.
    pub fn with_content(mut self, plugin: impl ContentPlugin + 'static) -> Self {
        self.content.push(Box::new(plugin));
        self
    }

    /// Remove every plugin named `name`.
    pub fn without(mut self, name: &str) -> Self {
        self.style.retain(|p| p.name() != name);
        self.content.retain(|p| p.name() != name);
        self
    }

    /// Plugin names in execution order.
    pub fn names(&self) -> Vec<&'static str> {
        self.style
            .iter()
            .map(|p| p.name())
            .chain(self.content.iter().map(|p| p.name()))
            .collect()
    }
}

impl Default for PluginSet {
    fn default() -> Self {
        Self::empty()
            .with_style(MiddleOrder)
            .with_style(Transformation)
            .with_style(HorizontalAlign)
            .with_style(VerticalAlign)
            .with_style(AutoLayout)
            .with_style(FrameStyles)
            .with_style(MaskCompositing)
            .with_content(ApplyNameStyles)
            .with_content(ComponentFromCache)
            .with_content(RenderMask)
            .with_content(RenderVector)
            .with_content(ContentSlot)
            .with_content(ContentSlotFallback)
            .with_content(IfTrue)
            .with_content(IfFalse)
            .with_content(OnClick)
            .with_content(SetId)
            .with_content(AddClass)
            .with_content(TextRenderer)
    }
}

impl std::fmt::Debug for PluginSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_order() {
        let names = PluginSet::default().names();
        assert_eq!(names.first(), Some(&"middle-order"));
        assert_eq!(names.last(), Some(&"text"));
        let style_end = names.iter().position(|n| *n == "mask-compositing").unwrap();
        let content_start = names.iter().position(|n| *n == "name-styles").unwrap();
        assert!(style_end < content_start);
    }

    #[test]
    fn test_without() {
        let plugins = PluginSet::default().without("on-click").without("auto-layout");
        let names = plugins.names();
        assert!(!names.contains(&"on-click"));
        assert!(!names.contains(&"auto-layout"));
        assert_eq!(plugins.style.len(), 6);
    }
}
