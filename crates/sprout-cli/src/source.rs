//! A design source backed by a saved document and a directory of assets.
//!
//! Asset layout below the assets directory:
//!
//! - `<id>.svg`, `<id>.png`, `<id>.jpg`: node exports, named by
//!   [`asset_file_stem`] of the node id
//! - `fills/<ref>.<ext>`: image-fill bytes, named by the image ref
//!
//! Missing exports resolve to `None`, which the compiler treats as a soft
//! miss.

use std::fs;
use std::path::{Path, PathBuf};

use futures::future::{self, BoxFuture, FutureExt};
use indexmap::IndexMap;
use serde::Deserialize;
use sprout_assets::asset_file_stem;
use sprout_core::errors::FetchError;
use sprout_core::scene::SceneNode;
use sprout_core::source::{
    decode_response, ComponentMeta, DesignSource, ExportRequest, FetchedResource,
};

/// A saved file response, with the component table the API returns
/// alongside the document.
#[derive(Debug, Clone, Deserialize)]
struct SavedDocument {
    document: SceneNode,
    #[serde(default)]
    components: IndexMap<String, ComponentMeta>,
}

#[derive(Debug)]
pub struct LocalSource {
    canvas: SceneNode,
    descriptions: IndexMap<String, String>,
    assets: Option<PathBuf>,
}

impl LocalSource {
    /// Read the document at `path`.
    pub fn open(path: &Path, assets: Option<PathBuf>) -> Result<Self, FetchError> {
        let target = path.display().to_string();
        let body = fs::read(path).map_err(|e| FetchError::transport(&target, e.to_string()))?;
        let saved: SavedDocument = decode_response(&target, &body)?;

        let canvas = saved
            .document
            .children
            .into_iter()
            .next()
            .ok_or_else(|| FetchError::malformed(&target, "document has no canvas"))?;
        let descriptions = saved
            .components
            .into_iter()
            .map(|(id, meta)| (id, meta.description))
            .collect();

        Ok(Self {
            canvas,
            descriptions,
            assets,
        })
    }

    fn export_path(&self, id: &str, extension: &str) -> Option<PathBuf> {
        let path = self
            .assets
            .as_ref()?
            .join(format!("{}.{extension}", asset_file_stem(id)));
        path.is_file().then_some(path)
    }

    fn fill_paths(&self) -> Result<IndexMap<String, String>, FetchError> {
        let Some(dir) = self.assets.as_ref().map(|d| d.join("fills")) else {
            return Ok(IndexMap::new());
        };
        if !dir.is_dir() {
            return Ok(IndexMap::new());
        }
        let target = dir.display().to_string();
        let entries =
            fs::read_dir(&dir).map_err(|e| FetchError::transport(&target, e.to_string()))?;

        let mut fills = Vec::new();
        for entry in entries {
            let path = entry
                .map_err(|e| FetchError::transport(&target, e.to_string()))?
                .path();
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                fills.push((stem.to_string(), path.display().to_string()));
            }
        }
        fills.sort();
        Ok(fills.into_iter().collect())
    }
}

impl DesignSource for LocalSource {
    fn load_canvas(&self) -> BoxFuture<'_, Result<SceneNode, FetchError>> {
        future::ready(Ok(self.canvas.clone())).boxed()
    }

    fn load_descriptions<'a>(
        &'a self,
        ids: &'a [String],
    ) -> BoxFuture<'a, Result<IndexMap<String, String>, FetchError>> {
        let found: IndexMap<String, String> = ids
            .iter()
            .filter_map(|id| Some((id.clone(), self.descriptions.get(id)?.clone())))
            .collect();
        future::ready(Ok(found)).boxed()
    }

    fn export_urls<'a>(
        &'a self,
        request: &'a ExportRequest,
    ) -> BoxFuture<'a, Result<IndexMap<String, Option<String>>, FetchError>> {
        let extension = request.format.extension();
        let urls: IndexMap<String, Option<String>> = request
            .ids
            .iter()
            .map(|id| {
                let path = self.export_path(id, extension);
                (id.clone(), path.map(|p| p.display().to_string()))
            })
            .collect();
        future::ready(Ok(urls)).boxed()
    }

    fn image_fill_urls(&self) -> BoxFuture<'_, Result<IndexMap<String, String>, FetchError>> {
        future::ready(self.fill_paths()).boxed()
    }

    fn fetch<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<FetchedResource, FetchError>> {
        let result = fs::read(url)
            .map(|bytes| FetchedResource::new(bytes, None))
            .map_err(|e| FetchError::transport(url, e.to_string()));
        future::ready(result).boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;
    use sprout_core::ImageFormat;

    const DOCUMENT: &str = r##"{
        "document": {
            "id": "0:0",
            "name": "Document",
            "type": "DOCUMENT",
            "children": [{
                "id": "0:1",
                "name": "Page 1",
                "type": "CANVAS",
                "children": [{ "id": "1:1", "name": "#Card", "type": "COMPONENT" }]
            }]
        },
        "components": { "1:1": { "description": "Card !style! .x { color: red; }" } }
    }"##;

    fn write_document(dir: &Path) -> PathBuf {
        let path = dir.join("document.json");
        fs::write(&path, DOCUMENT).unwrap();
        path
    }

    #[test]
    fn test_open_reads_canvas_and_descriptions() {
        let tmp = tempfile::tempdir().unwrap();
        let source = LocalSource::open(&write_document(tmp.path()), None).unwrap();

        let canvas = block_on(source.load_canvas()).unwrap();
        assert_eq!(canvas.attrs.id, "0:1");
        assert_eq!(canvas.children[0].attrs.name, "#Card");

        let ids = vec!["1:1".to_string(), "9:9".to_string()];
        let descriptions = block_on(source.load_descriptions(&ids)).unwrap();
        assert_eq!(descriptions.len(), 1);
        assert!(descriptions["1:1"].contains("!style!"));
    }

    #[test]
    fn test_error_payload_is_upstream() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("error.json");
        fs::write(&path, r#"{"status": 404, "err": "Not found"}"#).unwrap();

        let err = LocalSource::open(&path, None).unwrap_err();
        assert!(matches!(err, FetchError::Upstream { status: 404, .. }));
    }

    #[test]
    fn test_exports_resolve_by_file_stem() {
        let tmp = tempfile::tempdir().unwrap();
        let assets = tmp.path().join("assets");
        fs::create_dir_all(assets.join("fills")).unwrap();
        fs::write(assets.join("1-2.svg"), "<svg/>").unwrap();
        fs::write(assets.join("fills").join("abc.png"), [1u8, 2, 3]).unwrap();
        let source = LocalSource::open(&write_document(tmp.path()), Some(assets)).unwrap();

        let request = ExportRequest::svg(vec!["1:2".into(), "1:3".into()], true);
        let urls = block_on(source.export_urls(&request)).unwrap();
        let url = urls["1:2"].clone().unwrap();
        assert!(url.ends_with("1-2.svg"));
        assert_eq!(urls["1:3"], None);

        let raster = ExportRequest::raster(vec!["1:2".into()], ImageFormat::Png, 2.0);
        assert_eq!(block_on(source.export_urls(&raster)).unwrap()["1:2"], None);

        let fills = block_on(source.image_fill_urls()).unwrap();
        let fill = block_on(source.fetch(&fills["abc"])).unwrap();
        assert_eq!(fill.bytes, vec![1, 2, 3]);

        assert_eq!(block_on(source.fetch(&url)).unwrap().text(), "<svg/>");
    }

    #[test]
    fn test_missing_file_is_transport_error() {
        let tmp = tempfile::tempdir().unwrap();
        let source = LocalSource::open(&write_document(tmp.path()), None).unwrap();
        let err = block_on(source.fetch("/nonexistent/sprout.svg")).unwrap_err();
        assert!(matches!(err, FetchError::Transport { .. }));
    }
}
