//! Asset references per image mode.

use base64::Engine;
use sprout_core::options::{CompileOptions, ImageMode};

use crate::store::EmittedAsset;

/// How generated styles and markup reference one asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetRef {
    /// The design tool's export URL
    Remote(String),
    /// An emitted file served under the image URL prefix
    Local { url: String, asset: EmittedAsset },
    /// A `data:` URL
    Inline(String),
}

impl AssetRef {
    /// Reference `bytes` fetched for `key` according to the configured mode.
    ///
    /// Remote mode falls back to inlining when the asset has no export URL,
    /// as happens for locally rasterized masks.
    pub fn resolve(
        key: &str,
        remote_url: Option<&str>,
        bytes: &[u8],
        content_type: &str,
        options: &CompileOptions,
    ) -> Self {
        match (options.image_mode, remote_url) {
            (ImageMode::Remote, Some(url)) => Self::Remote(url.to_string()),
            (ImageMode::Local, _) => {
                let file_name = format!("{}.{}", asset_file_stem(key), extension(content_type));
                Self::Local {
                    url: format!("{}{}", options.image_url_prefix, file_name),
                    asset: EmittedAsset {
                        file_name,
                        bytes: bytes.to_vec(),
                        content_type: content_type.to_string(),
                    },
                }
            }
            _ => Self::Inline(data_url(bytes, content_type)),
        }
    }

    /// URL to place in generated output.
    pub fn url(&self) -> &str {
        match self {
            Self::Remote(url) | Self::Inline(url) => url,
            Self::Local { url, .. } => url,
        }
    }

    /// Consume the reference, returning its URL and any emitted file.
    pub fn into_parts(self) -> (String, Option<EmittedAsset>) {
        match self {
            Self::Remote(url) | Self::Inline(url) => (url, None),
            Self::Local { url, asset } => (url, Some(asset)),
        }
    }
}

/// File stem for an asset key: `1:23` becomes `1-23`.
pub fn asset_file_stem(key: &str) -> String {
    key.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect()
}

/// Content type of fetched bytes, trusting the source first.
pub(crate) fn content_type_of(bytes: &[u8], reported: Option<&str>) -> String {
    if let Some(reported) = reported.filter(|r| !r.is_empty()) {
        return reported.to_string();
    }
    match image::guess_format(bytes) {
        Ok(format) => format.to_mime_type().to_string(),
        Err(_) if looks_like_svg(bytes) => "image/svg+xml".to_string(),
        Err(_) => "application/octet-stream".to_string(),
    }
}

fn looks_like_svg(bytes: &[u8]) -> bool {
    String::from_utf8_lossy(&bytes[..bytes.len().min(512)]).contains("<svg")
}

fn extension(content_type: &str) -> &'static str {
    match content_type {
        "image/svg+xml" => "svg",
        "image/jpeg" => "jpg",
        "image/gif" => "gif",
        "image/webp" => "webp",
        _ => "png",
    }
}

fn data_url(bytes: &[u8], content_type: &str) -> String {
    let encoded = base64::engine::general_purpose::STANDARD.encode(bytes);
    format!("data:{content_type};base64,{encoded}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote() {
        let options = CompileOptions::default();
        let r = AssetRef::resolve("1:2", Some("https://x/a.png"), b"png", "image/png", &options);
        assert_eq!(r, AssetRef::Remote("https://x/a.png".into()));
    }

    #[test]
    fn test_remote_without_url_inlines() {
        let options = CompileOptions::default();
        let r = AssetRef::resolve("1:2", None, b"abc", "image/png", &options);
        assert_eq!(r.url(), "data:image/png;base64,YWJj");
    }

    #[test]
    fn test_local() {
        let options = CompileOptions::default().with_image_mode(ImageMode::Local);
        let r = AssetRef::resolve("1:23", Some("https://x/a"), b"abc", "image/jpeg", &options);
        let (url, asset) = r.into_parts();
        assert_eq!(url, "/images/1-23.jpg");
        let asset = asset.unwrap();
        assert_eq!(asset.file_name, "1-23.jpg");
        assert_eq!(asset.bytes, b"abc");
    }

    #[test]
    fn test_content_type_sniffing() {
        let png = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0];
        assert_eq!(content_type_of(&png, None), "image/png");
        assert_eq!(content_type_of(b"<svg></svg>", None), "image/svg+xml");
        assert_eq!(content_type_of(b"x", Some("image/gif")), "image/gif");
    }
}
