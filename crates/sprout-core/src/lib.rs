//! Core types for the Sprout design compiler.
//!
//! This crate holds the data model shared by every compilation stage:
//!
//! - [`scene`] - the raw scene graph as delivered by the design tool
//! - [`tree`] - the normalized node arena built by preprocessing
//! - [`params`] - the parameter language embedded in node names
//! - [`style`] - ordered style maps and CSS rendering
//! - [`options`] - compiler options and presets
//! - [`source`] - the design-tool collaborator trait
//! - [`errors`] - the error taxonomy

pub mod errors;
pub mod options;
pub mod params;
pub mod scene;
pub mod source;
pub mod style;
pub mod tree;

pub use errors::{CompileError, ConfigError, FetchError, MarkupError, Result, SproutError};
pub use options::{CompileOptions, ImageFormat, ImageMode, ParamDelimiters, Preset};
pub use params::{ParamValue, Params};
pub use scene::{
    Color, Constraints, Effect, EffectType, HorizontalConstraint, LayoutMode, NodeAttributes,
    NodeType, Paint, PaintType, Rect, SceneNode, TypeStyle, Vector, VerticalConstraint,
};
pub use source::{DesignSource, ExportRequest, FetchedResource};
pub use style::{StyleMap, StyleValue};
pub use tree::{Node, NodeId, NodeTree};
