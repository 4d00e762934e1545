//! The compilation run.

use std::sync::Arc;

use indexmap::IndexMap;
use sprout_assets::{EmittedAsset, ResourcePipeline};
use sprout_core::scene::SceneNode;
use sprout_core::{CompileOptions, DesignSource, Result};

use crate::codegen::{GeneratedFile, TemplateEngine};
use crate::context::CompileContext;
use crate::plugins::PluginSet;
use crate::preprocess::preprocess;
use crate::registry::{CompiledComponent, ComponentRegistry};

/// Everything one run produced.
#[derive(Debug, Clone, Default)]
pub struct CompileOutput {
    /// Built components, nested components before their users
    pub components: Vec<Arc<CompiledComponent>>,
    pub files: Vec<GeneratedFile>,
    /// Asset files for local image mode
    pub assets: Vec<EmittedAsset>,
}

impl CompileOutput {
    /// Get a component by name.
    pub fn component(&self, name: &str) -> Option<&CompiledComponent> {
        self.components
            .iter()
            .find(|c| c.name == name)
            .map(Arc::as_ref)
    }
}

/// Compiles a design document into React components.
#[derive(Debug, Default)]
pub struct Compiler {
    options: CompileOptions,
    plugins: PluginSet,
}

impl Compiler {
    /// Create a compiler with the default plugins.
    pub fn new(options: CompileOptions) -> Self {
        Self {
            options,
            plugins: PluginSet::default(),
        }
    }

    /// Replace the plugin set.
    pub fn with_plugins(mut self, plugins: PluginSet) -> Self {
        self.plugins = plugins;
        self
    }

    pub fn options(&self) -> &CompileOptions {
        &self.options
    }

    /// Load the canvas from `source` and compile it.
    pub async fn compile(&self, source: &dyn DesignSource) -> Result<CompileOutput> {
        self.options.validate()?;
        let canvas = source.load_canvas().await?;
        self.compile_canvas(source, &canvas).await
    }

    /// Compile an already loaded canvas. Descriptions and assets are still
    /// fetched through `source`.
    pub async fn compile_canvas(
        &self,
        source: &dyn DesignSource,
        canvas: &SceneNode,
    ) -> Result<CompileOutput> {
        self.options.validate()?;
        let pre = preprocess(canvas, &self.options);
        if pre.component_roots().is_empty() {
            tracing::warn!(canvas = %canvas.attrs.id, "no component roots on canvas");
        }

        let description_ids: Vec<String> = pre.description_ids.iter().cloned().collect();
        let descriptions = if description_ids.is_empty() {
            IndexMap::new()
        } else {
            source.load_descriptions(&description_ids).await?
        };

        let mut pipeline = ResourcePipeline::new(source, &self.options);
        let resources = pipeline.resolve(&pre.resource_request()).await?;

        let ctx = CompileContext {
            tree: &pre.tree,
            options: &self.options,
            resources: &resources,
            descriptions: &descriptions,
            plugins: &self.plugins,
        };
        let mut registry = ComponentRegistry::new();
        for &root in pre.component_roots() {
            registry.build(&ctx, root)?;
        }

        let engine = TemplateEngine::react()?;
        let mut files = Vec::with_capacity(registry.len() * 2);
        for component in registry.components() {
            files.extend(engine.generate(component, &self.options)?);
        }

        let components: Vec<_> = registry.components().cloned().collect();
        tracing::info!(
            components = components.len(),
            files = files.len(),
            assets = resources.emitted.len(),
            "compilation finished"
        );

        Ok(CompileOutput {
            components,
            files,
            assets: resources.emitted,
        })
    }
}

/// Compile the document behind `source` with the default plugins.
#[tracing::instrument(skip_all)]
pub async fn compile_document(
    source: &dyn DesignSource,
    options: &CompileOptions,
) -> Result<CompileOutput> {
    Compiler::new(options.clone()).compile(source).await
}
