//! Resolved assets handed to the visitor.

use indexmap::IndexMap;

use crate::store::EmittedAsset;

/// A resolved image fill.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageAsset {
    /// URL the bytes were fetched from
    pub source_url: String,
    /// URL referenced from generated styles
    pub url: String,
    pub bytes: Vec<u8>,
    pub content_type: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

/// Everything the resource phase resolved, keyed by node id or image ref.
#[derive(Debug, Clone, Default)]
pub struct Resources {
    /// Vector markup per node id
    pub vectors: IndexMap<String, String>,
    /// Vector reference URL per node id
    pub vector_urls: IndexMap<String, String>,
    /// Image fills per image ref
    pub images: IndexMap<String, ImageAsset>,
    /// Mask reference URL per mask node id
    pub masks: IndexMap<String, String>,
    /// Files to write for local image mode
    pub emitted: Vec<EmittedAsset>,
}

impl Resources {
    pub fn vector(&self, id: &str) -> Option<&str> {
        self.vectors.get(id).map(String::as_str)
    }

    pub fn vector_url(&self, id: &str) -> Option<&str> {
        self.vector_urls.get(id).map(String::as_str)
    }

    pub fn image(&self, image_ref: &str) -> Option<&ImageAsset> {
        self.images.get(image_ref)
    }

    pub fn mask(&self, id: &str) -> Option<&str> {
        self.masks.get(id).map(String::as_str)
    }

    /// Fold a later batch into this one.
    pub fn extend(&mut self, other: Resources) {
        self.vectors.extend(other.vectors);
        self.vector_urls.extend(other.vector_urls);
        self.images.extend(other.images);
        self.masks.extend(other.masks);
        self.emitted.extend(other.emitted);
    }
}
