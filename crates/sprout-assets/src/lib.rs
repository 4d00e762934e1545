//! Resource pipeline.
//!
//! Resolves the vector, image-fill and mask assets a document references
//! into markup and reference URLs before any node is visited.
//!
//! # Architecture
//!
//! 1. **Ledger**: at most one request per asset key per run
//! 2. **Pipeline**: batched export lookups and concurrent fetches
//! 3. **Raster**: local SVG rasterization when the tool has no export
//! 4. **Reference**: export URL, emitted file or `data:` URL per image mode
//! 5. **Store**: persistence of emitted asset files

mod ledger;
mod pipeline;
mod raster;
mod reference;
mod resources;
mod store;

pub use ledger::FetchLedger;
pub use pipeline::{ResourcePipeline, ResourceRequest};
pub use raster::{probe_dimensions, rasterize_svg, RasterError};
pub use reference::{asset_file_stem, AssetRef};
pub use resources::{ImageAsset, Resources};
pub use store::{AssetStore, DirAssetStore, EmittedAsset, MemoryAssetStore};
