//! Batched asset resolution.

use futures::future::try_join_all;
use indexmap::{IndexMap, IndexSet};
use sprout_core::errors::FetchError;
use sprout_core::options::CompileOptions;
use sprout_core::source::{DesignSource, ExportRequest, FetchedResource};

use crate::ledger::FetchLedger;
use crate::raster::{probe_dimensions, rasterize_svg};
use crate::reference::{content_type_of, AssetRef};
use crate::resources::{ImageAsset, Resources};

const SVG_CONTENT_TYPE: &str = "image/svg+xml";

/// Asset ids discovered by preprocessing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceRequest {
    pub vector_ids: Vec<String>,
    pub image_refs: Vec<String>,
    pub mask_ids: Vec<String>,
}

impl ResourceRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_vectors(mut self, ids: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.vector_ids.extend(ids.into_iter().map(Into::into));
        self
    }

    pub fn with_images(mut self, refs: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.image_refs.extend(refs.into_iter().map(Into::into));
        self
    }

    pub fn with_masks(mut self, ids: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.mask_ids.extend(ids.into_iter().map(Into::into));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.vector_ids.is_empty() && self.image_refs.is_empty() && self.mask_ids.is_empty()
    }
}

/// Resolves asset ids through a [`DesignSource`].
///
/// Each asset key is requested at most once per pipeline. Vector markup
/// fetched by earlier batches stays available as the rasterization source
/// for masks without an export URL.
pub struct ResourcePipeline<'a> {
    source: &'a dyn DesignSource,
    options: &'a CompileOptions,
    ledger: FetchLedger,
    markup: IndexMap<String, String>,
}

impl<'a> ResourcePipeline<'a> {
    pub fn new(source: &'a dyn DesignSource, options: &'a CompileOptions) -> Self {
        Self {
            source,
            options,
            ledger: FetchLedger::new(),
            markup: IndexMap::new(),
        }
    }

    pub fn ledger(&self) -> &FetchLedger {
        &self.ledger
    }

    /// Resolve a batch. Vectors and image fills are fetched concurrently,
    /// masks afterwards.
    #[tracing::instrument(
        skip_all,
        fields(
            vectors = request.vector_ids.len(),
            images = request.image_refs.len(),
            masks = request.mask_ids.len()
        )
    )]
    pub async fn resolve(&mut self, request: &ResourceRequest) -> Result<Resources, FetchError> {
        let vector_ids = self.ledger.claim("vector", &request.vector_ids);
        let image_refs = self.ledger.claim("image", &request.image_refs);
        let mask_ids = self.ledger.claim("mask", &request.mask_ids);

        let (vectors, images) = futures::try_join!(
            self.fetch_vectors(&vector_ids),
            self.fetch_images(&image_refs)
        )?;

        let mut resources = Resources::default();

        for (id, (url, markup)) in vectors {
            let (reference, emitted) = AssetRef::resolve(
                &id,
                Some(url.as_str()),
                markup.as_bytes(),
                SVG_CONTENT_TYPE,
                self.options,
            )
            .into_parts();
            resources.emitted.extend(emitted);
            resources.vector_urls.insert(id.clone(), reference);
            self.markup.insert(id.clone(), markup.clone());
            resources.vectors.insert(id, markup);
        }

        for (image_ref, (url, body)) in images {
            let content_type = content_type_of(&body.bytes, body.content_type.as_deref());
            let dimensions = probe_dimensions(&body.bytes);
            let (reference, emitted) = AssetRef::resolve(
                &image_ref,
                Some(url.as_str()),
                &body.bytes,
                &content_type,
                self.options,
            )
            .into_parts();
            resources.emitted.extend(emitted);
            resources.images.insert(
                image_ref,
                ImageAsset {
                    source_url: url,
                    url: reference,
                    bytes: body.bytes,
                    content_type,
                    width: dimensions.map(|(w, _)| w),
                    height: dimensions.map(|(_, h)| h),
                },
            );
        }

        let mut exported = self.fetch_masks(&mask_ids).await?;
        for id in mask_ids {
            let reference = match exported.shift_remove(&id) {
                Some((url, body)) => {
                    let content_type = content_type_of(&body.bytes, body.content_type.as_deref());
                    AssetRef::resolve(
                        &id,
                        Some(url.as_str()),
                        &body.bytes,
                        &content_type,
                        self.options,
                    )
                }
                None => match self.rasterize_mask(&id) {
                    Some(png) => AssetRef::resolve(&id, None, &png, "image/png", self.options),
                    None => continue,
                },
            };
            let (reference, emitted) = reference.into_parts();
            resources.emitted.extend(emitted);
            resources.masks.insert(id, reference);
        }

        tracing::debug!(
            vectors = resources.vectors.len(),
            images = resources.images.len(),
            masks = resources.masks.len(),
            "resources resolved"
        );
        Ok(resources)
    }

    async fn fetch_vectors(
        &self,
        ids: &[String],
    ) -> Result<IndexMap<String, (String, String)>, FetchError> {
        if ids.is_empty() {
            return Ok(IndexMap::new());
        }

        let absolute_request = ExportRequest::svg(ids.to_vec(), true);
        let relative_request = ExportRequest::svg(ids.to_vec(), false);
        let (absolute, relative) = futures::try_join!(
            self.source.export_urls(&absolute_request),
            self.source.export_urls(&relative_request)
        )?;

        let urls = merge_exports(ids, &absolute, &relative);
        let bodies = self.fetch_unique(urls.values().map(String::as_str)).await?;

        Ok(urls
            .into_iter()
            .filter_map(|(id, url)| {
                let markup = preserve_aspect_ratio(&bodies.get(&url)?.text());
                Some((id, (url, markup)))
            })
            .collect())
    }

    async fn fetch_images(
        &self,
        refs: &[String],
    ) -> Result<IndexMap<String, (String, FetchedResource)>, FetchError> {
        if refs.is_empty() {
            return Ok(IndexMap::new());
        }

        let fills = self.source.image_fill_urls().await?;
        let urls: IndexMap<&str, &str> = refs
            .iter()
            .filter_map(|image_ref| match fills.get(image_ref) {
                Some(url) => Some((image_ref.as_str(), url.as_str())),
                None => {
                    tracing::warn!(image_ref = %image_ref, "no download URL for image fill");
                    None
                }
            })
            .collect();

        let bodies = self.fetch_unique(urls.values().copied()).await?;
        Ok(urls
            .into_iter()
            .filter_map(|(image_ref, url)| {
                let body = bodies.get(url)?.clone();
                Some((image_ref.to_string(), (url.to_string(), body)))
            })
            .collect())
    }

    async fn fetch_masks(
        &self,
        ids: &[String],
    ) -> Result<IndexMap<String, (String, FetchedResource)>, FetchError> {
        if ids.is_empty() {
            return Ok(IndexMap::new());
        }

        let request = ExportRequest::raster(
            ids.to_vec(),
            self.options.image_format,
            self.options.image_scale,
        );
        let exports = self.source.export_urls(&request).await?;
        let urls: IndexMap<&str, &str> = ids
            .iter()
            .filter_map(|id| Some((id.as_str(), exports.get(id)?.as_deref()?)))
            .collect();

        let bodies = self.fetch_unique(urls.values().copied()).await?;
        Ok(urls
            .into_iter()
            .filter_map(|(id, url)| {
                let body = bodies.get(url)?.clone();
                Some((id.to_string(), (url.to_string(), body)))
            })
            .collect())
    }

    /// Fetch each distinct URL once, concurrently.
    async fn fetch_unique<'u>(
        &self,
        urls: impl Iterator<Item = &'u str>,
    ) -> Result<IndexMap<String, FetchedResource>, FetchError> {
        let unique: IndexSet<&str> = urls.collect();
        let fetched = try_join_all(unique.iter().map(|&url| {
            tracing::debug!(url = %url, "fetching asset");
            self.source.fetch(url)
        }))
        .await?;
        Ok(unique.into_iter().map(str::to_string).zip(fetched).collect())
    }

    fn rasterize_mask(&self, id: &str) -> Option<Vec<u8>> {
        let Some(markup) = self.markup.get(id) else {
            tracing::warn!(id = %id, "no export URL for mask; skipping");
            return None;
        };
        match rasterize_svg(markup, self.options.image_scale) {
            Ok(png) => {
                tracing::debug!(id = %id, "rasterized mask locally");
                Some(png)
            }
            Err(e) => {
                tracing::warn!(id = %id, error = %e, "mask rasterization failed; skipping");
                None
            }
        }
    }
}

/// Export URL per id, absolute bounds first.
fn merge_exports(
    ids: &[String],
    absolute: &IndexMap<String, Option<String>>,
    relative: &IndexMap<String, Option<String>>,
) -> IndexMap<String, String> {
    ids.iter()
        .filter_map(|id| {
            let url = absolute
                .get(id)
                .and_then(Option::as_ref)
                .or_else(|| relative.get(id).and_then(Option::as_ref));
            match url {
                Some(url) => Some((id.clone(), url.clone())),
                None => {
                    tracing::warn!(id = %id, "no export URL for vector; skipping");
                    None
                }
            }
        })
        .collect()
}

/// Let the root `<svg>` stretch to its box.
fn preserve_aspect_ratio(markup: &str) -> String {
    let Some(start) = markup.find("<svg") else {
        return markup.to_string();
    };
    let tag_end = markup[start..]
        .find('>')
        .map_or(markup.len(), |end| start + end);
    if markup[start..tag_end].contains("preserveAspectRatio") {
        return markup.to_string();
    }
    let insert_at = start + "<svg".len();
    format!(
        "{} preserveAspectRatio=\"none\"{}",
        &markup[..insert_at],
        &markup[insert_at..]
    )
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;
    use std::sync::Mutex;

    use futures::executor::block_on;
    use futures::future::{BoxFuture, FutureExt};
    use sprout_core::options::{ImageFormat, ImageMode};
    use sprout_core::scene::SceneNode;

    use super::*;

    const ICON: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" width="4" height="2" viewBox="0 0 4 2"><rect width="4" height="2" fill="red"/></svg>"#;

    #[derive(Default)]
    struct FakeSource {
        absolute: IndexMap<String, Option<String>>,
        relative: IndexMap<String, Option<String>>,
        raster: IndexMap<String, Option<String>>,
        fills: IndexMap<String, String>,
        bodies: IndexMap<String, Vec<u8>>,
        fetches: Mutex<Vec<String>>,
        exports: Mutex<Vec<(ImageFormat, bool)>>,
    }

    impl FakeSource {
        fn fetch_count(&self, url: &str) -> usize {
            self.fetches.lock().unwrap().iter().filter(|u| *u == url).count()
        }

        fn export_count(&self) -> usize {
            self.exports.lock().unwrap().len()
        }
    }

    impl DesignSource for FakeSource {
        fn load_canvas(&self) -> BoxFuture<'_, Result<SceneNode, FetchError>> {
            async { Err(FetchError::malformed("files", "no canvas")) }.boxed()
        }

        fn load_descriptions<'a>(
            &'a self,
            _ids: &'a [String],
        ) -> BoxFuture<'a, Result<IndexMap<String, String>, FetchError>> {
            async { Ok(IndexMap::new()) }.boxed()
        }

        fn export_urls<'a>(
            &'a self,
            request: &'a ExportRequest,
        ) -> BoxFuture<'a, Result<IndexMap<String, Option<String>>, FetchError>> {
            async move {
                self.exports
                    .lock()
                    .unwrap()
                    .push((request.format, request.use_absolute_bounds));
                let table = match (request.format, request.use_absolute_bounds) {
                    (ImageFormat::Svg, true) => &self.absolute,
                    (ImageFormat::Svg, false) => &self.relative,
                    _ => &self.raster,
                };
                Ok(request
                    .ids
                    .iter()
                    .map(|id| (id.clone(), table.get(id).cloned().flatten()))
                    .collect())
            }
            .boxed()
        }

        fn image_fill_urls(&self) -> BoxFuture<'_, Result<IndexMap<String, String>, FetchError>> {
            async move { Ok(self.fills.clone()) }.boxed()
        }

        fn fetch<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<FetchedResource, FetchError>> {
            async move {
                self.fetches.lock().unwrap().push(url.to_string());
                match self.bodies.get(url) {
                    Some(bytes) => Ok(FetchedResource::new(bytes.clone(), None)),
                    None => Err(FetchError::transport(url, "not found")),
                }
            }
            .boxed()
        }
    }

    fn png(width: u32, height: u32) -> Vec<u8> {
        let mut bytes = Vec::new();
        image::RgbaImage::new(width, height)
            .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        bytes
    }

    fn owned(pairs: &[(&str, Option<&str>)]) -> IndexMap<String, Option<String>> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.map(str::to_string)))
            .collect()
    }

    #[test]
    fn test_preserve_aspect_ratio() {
        assert_eq!(
            preserve_aspect_ratio("<svg width=\"1\"></svg>"),
            "<svg preserveAspectRatio=\"none\" width=\"1\"></svg>"
        );
        let already = "<svg preserveAspectRatio=\"xMidYMid\"></svg>";
        assert_eq!(preserve_aspect_ratio(already), already);
    }

    #[test]
    fn test_vectors_prefer_absolute_bounds() {
        let source = FakeSource {
            absolute: owned(&[("1:1", Some("abs/1")), ("1:2", None), ("1:3", None)]),
            relative: owned(&[("1:1", Some("rel/1")), ("1:2", Some("rel/2")), ("1:3", None)]),
            bodies: [("abs/1", ICON), ("rel/2", ICON), ("rel/1", ICON)]
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.as_bytes().to_vec()))
                .collect(),
            ..Default::default()
        };
        let options = CompileOptions::default();
        let mut pipeline = ResourcePipeline::new(&source, &options);
        let request = ResourceRequest::new().with_vectors(["1:1", "1:2", "1:3"]);

        let resources = block_on(pipeline.resolve(&request)).unwrap();

        assert_eq!(resources.vector_url("1:1"), Some("abs/1"));
        assert_eq!(resources.vector_url("1:2"), Some("rel/2"));
        assert!(resources.vector("1:3").is_none());
        assert!(resources.vector("1:1").unwrap().starts_with("<svg preserveAspectRatio=\"none\""));
        assert_eq!(source.fetch_count("rel/1"), 0);
        assert_eq!(source.export_count(), 2);
    }

    #[test]
    fn test_shared_urls_fetch_once() {
        let source = FakeSource {
            fills: [("ref-a", "img/shared"), ("ref-b", "img/shared")]
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            bodies: [("img/shared".to_string(), png(3, 2))].into_iter().collect(),
            ..Default::default()
        };
        let options = CompileOptions::default();
        let mut pipeline = ResourcePipeline::new(&source, &options);
        let request = ResourceRequest::new().with_images(["ref-a", "ref-b", "ref-a", "ref-c"]);

        let resources = block_on(pipeline.resolve(&request)).unwrap();

        assert_eq!(source.fetch_count("img/shared"), 1);
        assert_eq!(resources.images.len(), 2);
        let image = resources.image("ref-b").unwrap();
        assert_eq!(image.url, "img/shared");
        assert_eq!(image.content_type, "image/png");
        assert_eq!((image.width, image.height), (Some(3), Some(2)));
    }

    #[test]
    fn test_masks_export_then_rasterize() {
        let source = FakeSource {
            absolute: owned(&[("2:1", Some("abs/mask"))]),
            raster: owned(&[("2:1", None), ("2:2", Some("png/2"))]),
            bodies: [
                ("abs/mask".to_string(), ICON.as_bytes().to_vec()),
                ("png/2".to_string(), png(1, 1)),
            ]
            .into_iter()
            .collect(),
            ..Default::default()
        };
        let options = CompileOptions::default();
        let mut pipeline = ResourcePipeline::new(&source, &options);
        let request = ResourceRequest::new()
            .with_vectors(["2:1"])
            .with_masks(["2:1", "2:2", "2:3"]);

        let resources = block_on(pipeline.resolve(&request)).unwrap();

        assert_eq!(resources.mask("2:2"), Some("png/2"));
        assert!(resources.mask("2:1").unwrap().starts_with("data:image/png;base64,"));
        assert!(resources.mask("2:3").is_none());
    }

    #[test]
    fn test_second_batch_skips_claimed_ids() {
        let source = FakeSource {
            absolute: owned(&[("1:1", Some("abs/1"))]),
            bodies: [("abs/1".to_string(), ICON.as_bytes().to_vec())].into_iter().collect(),
            ..Default::default()
        };
        let options = CompileOptions::default();
        let mut pipeline = ResourcePipeline::new(&source, &options);
        let request = ResourceRequest::new().with_vectors(["1:1"]);

        block_on(pipeline.resolve(&request)).unwrap();
        let again = block_on(pipeline.resolve(&request)).unwrap();

        assert!(again.vectors.is_empty());
        assert_eq!(source.fetch_count("abs/1"), 1);
        assert_eq!(source.export_count(), 2);
    }

    #[test]
    fn test_local_mode_emits_files() {
        let source = FakeSource {
            fills: [("ref-a".to_string(), "img/a".to_string())].into_iter().collect(),
            bodies: [("img/a".to_string(), png(1, 1))].into_iter().collect(),
            ..Default::default()
        };
        let options = CompileOptions::default().with_image_mode(ImageMode::Local);
        let mut pipeline = ResourcePipeline::new(&source, &options);
        let request = ResourceRequest::new().with_images(["ref-a"]);

        let resources = block_on(pipeline.resolve(&request)).unwrap();

        assert_eq!(resources.image("ref-a").unwrap().url, "/images/ref-a.png");
        assert_eq!(resources.emitted.len(), 1);
        assert_eq!(resources.emitted[0].file_name, "ref-a.png");
    }

    #[test]
    fn test_fetch_failure_is_fatal() {
        let source = FakeSource {
            absolute: owned(&[("1:1", Some("abs/missing"))]),
            ..Default::default()
        };
        let options = CompileOptions::default();
        let mut pipeline = ResourcePipeline::new(&source, &options);
        let request = ResourceRequest::new().with_vectors(["1:1"]);

        let result = block_on(pipeline.resolve(&request));
        assert!(matches!(result, Err(FetchError::Transport { .. })));
    }
}
