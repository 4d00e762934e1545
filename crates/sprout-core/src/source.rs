//! Design-document collaborator boundary.
//!
//! The compiler never talks HTTP itself. A [`DesignSource`] supplies the
//! canvas, component descriptions, export URLs and asset bytes; the wire
//! shapes below decode the design tool's REST responses for implementors.

use futures::future::BoxFuture;
use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::errors::FetchError;
use crate::options::ImageFormat;
use crate::scene::SceneNode;

/// Parameters of an image-export call.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportRequest {
    pub ids: Vec<String>,
    pub format: ImageFormat,
    pub scale: f64,
    pub use_absolute_bounds: bool,
}

impl ExportRequest {
    /// SVG export of `ids`.
    pub fn svg(ids: Vec<String>, use_absolute_bounds: bool) -> Self {
        Self {
            ids,
            format: ImageFormat::Svg,
            scale: 1.0,
            use_absolute_bounds,
        }
    }

    /// Raster export of `ids` with absolute bounds.
    pub fn raster(ids: Vec<String>, format: ImageFormat, scale: f64) -> Self {
        Self {
            ids,
            format,
            scale,
            use_absolute_bounds: true,
        }
    }
}

/// Bytes fetched from an asset URL.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FetchedResource {
    pub bytes: Vec<u8>,
    pub content_type: Option<String>,
}

impl FetchedResource {
    /// Create a resource.
    pub fn new(bytes: Vec<u8>, content_type: Option<String>) -> Self {
        Self {
            bytes,
            content_type,
        }
    }

    /// Body as UTF-8 text, replacing invalid sequences.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.bytes).into_owned()
    }
}

/// Everything the compiler needs from the design tool.
pub trait DesignSource: Send + Sync {
    /// Canvas root: the first child of the document.
    fn load_canvas(&self) -> BoxFuture<'_, Result<SceneNode, FetchError>>;

    /// Description text of each node id.
    fn load_descriptions<'a>(
        &'a self,
        ids: &'a [String],
    ) -> BoxFuture<'a, Result<IndexMap<String, String>, FetchError>>;

    /// Export URL per id; ids the tool could not render map to `None`.
    fn export_urls<'a>(
        &'a self,
        request: &'a ExportRequest,
    ) -> BoxFuture<'a, Result<IndexMap<String, Option<String>>, FetchError>>;

    /// Download URL per image-fill reference.
    fn image_fill_urls(&self) -> BoxFuture<'_, Result<IndexMap<String, String>, FetchError>>;

    /// Fetch the content behind an URL.
    fn fetch<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<FetchedResource, FetchError>>;
}

/// Error body returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiErrorPayload {
    pub status: u16,
    pub err: String,
}

impl From<ApiErrorPayload> for FetchError {
    fn from(payload: ApiErrorPayload) -> Self {
        FetchError::upstream(payload.status, payload.err)
    }
}

/// `GET /v1/files/:key`
#[derive(Debug, Clone, Deserialize)]
pub struct FileResponse {
    pub document: SceneNode,
}

impl FileResponse {
    /// Take the canvas root.
    pub fn into_canvas(self) -> Result<SceneNode, FetchError> {
        self.document
            .children
            .into_iter()
            .next()
            .ok_or_else(|| FetchError::malformed("files", "document has no canvas"))
    }
}

/// Component metadata in a nodes response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ComponentMeta {
    #[serde(default)]
    pub description: String,
}

/// One entry of a nodes response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NodeEntry {
    #[serde(default)]
    pub components: IndexMap<String, ComponentMeta>,
}

/// `GET /v1/files/:key/nodes?ids=...`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NodesResponse {
    #[serde(default)]
    pub nodes: IndexMap<String, Option<NodeEntry>>,
}

impl NodesResponse {
    /// Description of each requested id that is itself a component.
    pub fn descriptions(&self) -> IndexMap<String, String> {
        self.nodes
            .iter()
            .filter_map(|(id, entry)| {
                let meta = entry.as_ref()?.components.get(id)?;
                Some((id.clone(), meta.description.clone()))
            })
            .collect()
    }
}

/// `GET /v1/images/:key?ids=...`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImagesResponse {
    #[serde(default)]
    pub images: IndexMap<String, Option<String>>,
}

/// Image-fill metadata.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImageFillMeta {
    #[serde(default)]
    pub images: IndexMap<String, String>,
}

/// `GET /v1/files/:key/images`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImageFillsResponse {
    #[serde(default)]
    pub meta: ImageFillMeta,
}

/// Decode an API body, turning error payloads into [`FetchError::Upstream`].
pub fn decode_response<T: DeserializeOwned>(target: &str, body: &[u8]) -> Result<T, FetchError> {
    if let Ok(payload) = serde_json::from_slice::<ApiErrorPayload>(body) {
        if payload.status >= 400 {
            return Err(payload.into());
        }
    }
    serde_json::from_slice(body).map_err(|e| FetchError::malformed(target, e.to_string()))
}
