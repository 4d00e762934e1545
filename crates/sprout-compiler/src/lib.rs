//! Design tree to React component compiler.
//!
//! Compiles the named top-level nodes of a design document into React
//! components with scoped styles.
//!
//! # Pipeline
//!
//! 1. **Preprocess**: normalize the visible scene graph into a node arena
//! 2. **Resources**: resolve vectors, image fills and masks in one batch
//! 3. **Registry**: build each named component once
//! 4. **Visitor**: run style then content plugins per node and emit markup
//! 5. **Codegen**: render generated sources and editable shells
//!
//! # Example
//!
//! ```ignore
//! use sprout_compiler::compile_document;
//! use sprout_core::CompileOptions;
//!
//! let output = compile_document(&source, &CompileOptions::default()).await?;
//! for file in &output.files {
//!     println!("{}", file.path.display());
//! }
//! ```

mod children;
mod codegen;
mod compile;
mod context;
pub mod plugins;
mod preprocess;
mod registry;
mod state;
mod text;
mod visitor;

pub use children::{expand_children, ChildBuckets, ChildEntry};
pub use codegen::{GeneratedFile, TemplateEngine, DEFAULT_STYLES};
pub use compile::{compile_document, CompileOutput, Compiler};
pub use context::{CompileContext, ComponentImport, ComponentScope, PluginContext};
pub use plugins::{ContentPlugin, PluginSet, StylePlugin};
pub use preprocess::{preprocess, Preprocessed};
pub use registry::{CompiledComponent, ComponentRegistry};
pub use state::VisitState;
pub use text::{split_runs, TextFragment};
