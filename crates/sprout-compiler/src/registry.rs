//! Memoized component builds.

use std::sync::Arc;

use indexmap::{IndexMap, IndexSet};
use sprout_core::errors::CompileError;
use sprout_core::params::{component_instance, component_name, file_name};
use sprout_core::{NodeId, Result};

use crate::context::{CompileContext, ComponentImport, ComponentScope, PluginContext};
use crate::visitor::{visit_node, Printer};

/// A built component, ready for code generation.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledComponent {
    /// Normalized component name (`Card`)
    pub name: String,
    /// Exported identifier (`CardGenerated`)
    pub instance: String,
    /// Source file stem (`card`)
    pub file_name: String,
    /// Node the component was built from
    pub root_id: NodeId,
    pub markup: String,
    pub styles: String,
    pub prop_types: IndexMap<String, String>,
    pub local_components: IndexMap<String, ComponentImport>,
}

/// Components built so far, keyed by name.
///
/// Each name is built at most once per run; later requests for the same
/// name return the first build.
#[derive(Debug, Default)]
pub struct ComponentRegistry {
    components: IndexMap<String, Arc<CompiledComponent>>,
    building: IndexSet<String>,
}

impl ComponentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a built component by name.
    pub fn get(&self, name: &str) -> Option<&Arc<CompiledComponent>> {
        self.components.get(name)
    }

    /// Built components in build completion order.
    pub fn components(&self) -> impl Iterator<Item = &Arc<CompiledComponent>> {
        self.components.values()
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Build the component rooted at `root`, or return the cached build of
    /// a component with the same name.
    ///
    /// A component that (directly or through other components) contains
    /// an instance of itself fails with
    /// [`CompileError::RecursiveComponent`].
    pub fn build(
        &mut self,
        ctx: &CompileContext<'_>,
        root: NodeId,
    ) -> Result<Arc<CompiledComponent>> {
        let node = ctx
            .tree
            .get(root)
            .ok_or_else(|| CompileError::NodeNotFound(format!("#{}", root.0)))?;
        let name = component_name(node.name(), &ctx.options.delimiters);

        if let Some(component) = self.components.get(&name) {
            tracing::trace!(component = %name, "component cache hit");
            return Ok(Arc::clone(component));
        }
        if !self.building.insert(name.clone()) {
            return Err(CompileError::RecursiveComponent(name).into());
        }

        let result = self.build_component(ctx, root, &name);
        self.building.shift_remove(&name);

        let component = Arc::new(result?);
        self.components.insert(name, Arc::clone(&component));
        Ok(component)
    }

    #[tracing::instrument(skip(self, ctx, root))]
    fn build_component(
        &mut self,
        ctx: &CompileContext<'_>,
        root: NodeId,
        name: &str,
    ) -> Result<CompiledComponent> {
        let mut scope = ComponentScope::new(name, ctx.options.class_prefix.clone());
        let mut printer = Printer::new();
        {
            let mut cx = PluginContext {
                ctx,
                scope: &mut scope,
                registry: self,
            };
            visit_node(&mut cx, &mut printer, root, None, None, 0)?;
        }

        let description = ctx.tree.get(root).and_then(|node| ctx.description_styles(node));
        let styles = scope.stylesheet(description.as_deref());
        tracing::debug!(
            props = scope.prop_types.len(),
            locals = scope.local_components.len(),
            "component built"
        );

        Ok(CompiledComponent {
            name: name.to_string(),
            instance: component_instance(name, &ctx.options.instance_suffix),
            file_name: file_name(name),
            root_id: root,
            markup: printer.finish(),
            styles,
            prop_types: scope.prop_types,
            local_components: scope.local_components,
        })
    }
}
