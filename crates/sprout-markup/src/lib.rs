//! Vector markup transcoding.
//!
//! Fetched SVG documents are parsed into a generic element tree, stripped
//! of attributes the target cannot express, and re-serialized as JSX with
//! optional root extraction, refs, prop spreading and children injection.
//!
//! # Example
//!
//! ```ignore
//! use sprout_markup::{transcode, TranscodeOptions};
//!
//! let options = TranscodeOptions::new("1:2").with_class_name("vector figma-4");
//! let jsx = transcode(&svg, &options)?;
//! ```

mod element;
mod sanitize;
mod transcode;

pub use element::{AttributeValue, MarkupElement, MarkupNode};
pub use sanitize::{attribute_name, css_property, is_supported_attribute, sanitize};
pub use transcode::{serialize, transcode, ChildrenTarget, TranscodeOptions};
