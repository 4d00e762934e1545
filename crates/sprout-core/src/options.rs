//! Compiler options and named presets.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

/// Delimiters of the name parameter language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ParamDelimiters {
    /// Separates the component name from its parameter block
    pub slot: String,
    /// Separates parameter pairs
    pub pair: String,
    /// Separates a key from its value
    pub key_value: String,
    /// Separates nested key segments
    pub nested: String,
}

impl Default for ParamDelimiters {
    fn default() -> Self {
        Self {
            slot: "??".into(),
            pair: "&".into(),
            key_value: "=".into(),
            nested: ".".into(),
        }
    }
}

/// How image assets are referenced from generated styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageMode {
    /// Link the design tool's export URL
    #[default]
    Remote,
    /// Emit asset files and link them under the URL prefix
    Local,
    /// Embed assets as `data:` URLs
    Inline,
}

/// Raster export format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    #[default]
    Png,
    Jpg,
    Svg,
}

impl ImageFormat {
    /// File extension and API format name.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpg => "jpg",
            Self::Svg => "svg",
        }
    }
}

/// Named option sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    /// Plain React components wrapped in `React.memo`
    Default,
    /// MobX observer components
    Mobx,
}

impl Preset {
    /// Resolve a preset by name.
    pub fn from_name(name: &str) -> Result<Self, ConfigError> {
        match name {
            "default" => Ok(Self::Default),
            "mobx" => Ok(Self::Mobx),
            other => Err(ConfigError::UnknownPreset(other.to_string())),
        }
    }
}

/// Options for one compilation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CompileOptions {
    /// Directory generated sources are written to
    pub out_dir: PathBuf,
    /// Prefix of generated class names
    pub class_prefix: String,
    /// Name parameter delimiters
    pub delimiters: ParamDelimiters,
    /// Marker in component descriptions after which raw CSS follows
    pub style_description_delimiter: String,
    /// Extra import lines for generated sources
    pub imports: Vec<String>,
    /// Wrapper applied to generated component functions
    pub decorator: String,
    /// Suffix of the generated component identifier
    pub instance_suffix: String,
    /// Suffix of generated file stems
    pub file_suffix: String,
    /// Image reference mode
    pub image_mode: ImageMode,
    /// Raster export format for masks
    pub image_format: ImageFormat,
    /// Raster export scale
    pub image_scale: f64,
    /// Directory emitted assets are written to
    pub image_dir: PathBuf,
    /// URL prefix of emitted assets
    pub image_url_prefix: String,
    /// Fail the run on invalid vector markup instead of skipping the vector
    pub strict_markup: bool,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            out_dir: PathBuf::from("./src/design-system"),
            class_prefix: "figma-".into(),
            delimiters: ParamDelimiters::default(),
            style_description_delimiter: "!style!".into(),
            imports: Vec::new(),
            decorator: "React.memo".into(),
            instance_suffix: "Generated".into(),
            file_suffix: ".generated".into(),
            image_mode: ImageMode::Remote,
            image_format: ImageFormat::Png,
            image_scale: 2.0,
            image_dir: PathBuf::from("./static/images"),
            image_url_prefix: "/images/".into(),
            strict_markup: false,
        }
    }
}

impl CompileOptions {
    /// Create default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create options from a preset.
    pub fn preset(preset: Preset) -> Self {
        match preset {
            Preset::Default => Self::default(),
            Preset::Mobx => Self {
                imports: vec!["import { observer } from 'mobx-react';".into()],
                decorator: "observer".into(),
                ..Self::default()
            },
        }
    }

    /// Create options from a preset name.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        Preset::from_name(name).map(Self::preset)
    }

    /// Set the output directory.
    pub fn with_out_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.out_dir = dir.into();
        self
    }

    /// Set the class name prefix.
    pub fn with_class_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.class_prefix = prefix.into();
        self
    }

    /// Set the image mode.
    pub fn with_image_mode(mut self, mode: ImageMode) -> Self {
        self.image_mode = mode;
        self
    }

    /// Set the decorator.
    pub fn with_decorator(mut self, decorator: impl Into<String>) -> Self {
        self.decorator = decorator.into();
        self
    }

    /// Fail on invalid vector markup.
    pub fn with_strict_markup(mut self, strict: bool) -> Self {
        self.strict_markup = strict;
        self
    }

    /// Check required identifiers before any traversal.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.class_prefix.is_empty() {
            return Err(ConfigError::Missing("classPrefix"));
        }
        if !is_css_ident(&self.class_prefix) {
            return Err(ConfigError::Invalid {
                option: "classPrefix",
                message: format!("'{}' is not a valid class name prefix", self.class_prefix),
            });
        }

        let d = &self.delimiters;
        let delimiters = [
            ("delimiters.slot", &d.slot),
            ("delimiters.pair", &d.pair),
            ("delimiters.keyValue", &d.key_value),
            ("delimiters.nested", &d.nested),
        ];
        for (i, &(option, value)) in delimiters.iter().enumerate() {
            if value.is_empty() {
                return Err(ConfigError::Missing(option));
            }
            if delimiters[..i].iter().any(|&(_, other)| other == value) {
                return Err(ConfigError::Invalid {
                    option,
                    message: format!("'{value}' is used by another delimiter"),
                });
            }
        }

        if self.style_description_delimiter.is_empty() {
            return Err(ConfigError::Missing("styleDescriptionDelimiter"));
        }
        if self.decorator.trim().is_empty() {
            return Err(ConfigError::Missing("decorator"));
        }
        if !self
            .instance_suffix
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            return Err(ConfigError::Invalid {
                option: "instanceSuffix",
                message: format!("'{}' is not an identifier suffix", self.instance_suffix),
            });
        }
        if !(self.image_scale.is_finite() && self.image_scale > 0.0) {
            return Err(ConfigError::Invalid {
                option: "imageScale",
                message: format!("{} is not a positive scale", self.image_scale),
            });
        }

        Ok(())
    }
}

fn is_css_ident(s: &str) -> bool {
    let mut chars = s.chars();
    let starts_ok = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == '-');
    starts_ok && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}
