//! Raw scene graph as exported by the design tool.
//!
//! These types mirror the REST payload. Unknown node, paint and effect types
//! deserialize to an `Unknown` variant so new design-tool features never abort
//! a run. The compiler never mutates a `SceneNode`; normalization produces a
//! separate [`NodeTree`](crate::tree::NodeTree).

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Node type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NodeType {
    Document,
    Canvas,
    #[default]
    Frame,
    Group,
    Vector,
    BooleanOperation,
    Star,
    Line,
    Ellipse,
    RegularPolygon,
    Rectangle,
    Text,
    Slice,
    Component,
    ComponentSet,
    Instance,
    #[serde(other)]
    Unknown,
}

impl NodeType {
    /// Leaf shapes that render as a single vector graphic.
    pub fn is_vector_family(self) -> bool {
        matches!(
            self,
            Self::Vector | Self::Line | Self::RegularPolygon | Self::Ellipse | Self::Star
        )
    }

    /// Transparent grouping nodes, flattened into their parent on emission.
    pub fn is_group_family(self) -> bool {
        matches!(self, Self::Group | Self::BooleanOperation)
    }

    /// Nodes painted as boxes by the frame style plugin.
    pub fn is_frame_like(self) -> bool {
        matches!(self, Self::Frame | Self::Component | Self::Instance)
    }
}

/// Horizontal constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HorizontalConstraint {
    #[default]
    Left,
    Right,
    Center,
    LeftRight,
    Scale,
}

/// Vertical constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VerticalConstraint {
    #[default]
    Top,
    Bottom,
    Center,
    TopBottom,
    Scale,
}

/// Per-axis resize behavior relative to the parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Constraints {
    #[serde(default)]
    pub horizontal: HorizontalConstraint,
    #[serde(default)]
    pub vertical: VerticalConstraint,
}

impl Constraints {
    /// Create a constraint pair.
    pub fn new(horizontal: HorizontalConstraint, vertical: VerticalConstraint) -> Self {
        Self {
            horizontal,
            vertical,
        }
    }
}

/// RGBA color with channels in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    #[serde(default = "default_one")]
    pub a: f64,
}

impl Color {
    /// Create a color.
    pub fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::new(0.0, 0.0, 0.0, 1.0)
    }
}

/// 2D vector.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector {
    pub x: f64,
    pub y: f64,
}

impl Vector {
    /// Create a vector.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle in canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    /// Create a rectangle.
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Get the right edge.
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Get the bottom edge.
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }
}

/// 2x3 affine transform, rows `[m00, m01, m02]` and `[m10, m11, m12]`.
pub type Transform = [[f64; 3]; 2];

/// Paint type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaintType {
    Solid,
    GradientLinear,
    GradientRadial,
    GradientAngular,
    GradientDiamond,
    Image,
    Emoji,
    #[serde(other)]
    Unknown,
}

/// How an image paint fills its box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScaleMode {
    Fill,
    Fit,
    Tile,
    Stretch,
    #[serde(other)]
    Unknown,
}

/// Layer blend mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BlendMode {
    PassThrough,
    Normal,
    Darken,
    Multiply,
    LinearBurn,
    ColorBurn,
    Lighten,
    Screen,
    LinearDodge,
    ColorDodge,
    Overlay,
    SoftLight,
    HardLight,
    Difference,
    Exclusion,
    Hue,
    Saturation,
    Color,
    Luminosity,
    #[serde(other)]
    Other,
}

impl BlendMode {
    /// Whether CSS can express this mode without rasterizing.
    pub fn is_normal(self) -> bool {
        matches!(self, Self::PassThrough | Self::Normal)
    }
}

/// Gradient color stop.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColorStop {
    pub position: f64,
    pub color: Color,
}

/// A fill or stroke.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paint {
    #[serde(rename = "type")]
    pub paint_type: PaintType,
    #[serde(default = "default_true")]
    pub visible: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub gradient_handle_positions: Vec<Vector>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub gradient_stops: Vec<ColorStop>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale_mode: Option<ScaleMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_ref: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scaling_factor: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_transform: Option<Transform>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blend_mode: Option<BlendMode>,
}

impl Paint {
    /// Create a visible solid paint.
    pub fn solid(color: Color) -> Self {
        Self {
            color: Some(color),
            ..Self::of_type(PaintType::Solid)
        }
    }

    /// Create a visible image paint referencing `image_ref`.
    pub fn image(image_ref: impl Into<String>, scale_mode: ScaleMode) -> Self {
        Self {
            image_ref: Some(image_ref.into()),
            scale_mode: Some(scale_mode),
            ..Self::of_type(PaintType::Image)
        }
    }

    /// Create an empty visible paint of the given type.
    pub fn of_type(paint_type: PaintType) -> Self {
        Self {
            paint_type,
            visible: true,
            opacity: None,
            color: None,
            gradient_handle_positions: Vec::new(),
            gradient_stops: Vec::new(),
            scale_mode: None,
            image_ref: None,
            scaling_factor: None,
            image_transform: None,
            blend_mode: None,
        }
    }
}

/// Effect type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EffectType {
    InnerShadow,
    DropShadow,
    LayerBlur,
    BackgroundBlur,
    #[serde(other)]
    Unknown,
}

/// A shadow or blur.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Effect {
    #[serde(rename = "type")]
    pub effect_type: EffectType,
    #[serde(default = "default_true")]
    pub visible: bool,
    #[serde(default)]
    pub radius: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<Vector>,
}

/// Horizontal text alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TextAlignHorizontal {
    Left,
    Right,
    Center,
    Justified,
}

/// Vertical text alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TextAlignVertical {
    Top,
    Center,
    Bottom,
}

/// Typography, either a node's base style or a per-run override.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TypeStyle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    pub italic: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_align_horizontal: Option<TextAlignHorizontal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_align_vertical: Option<TextAlignVertical>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub letter_spacing: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_height_percent: Option<f64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fills: Vec<Paint>,
}

/// Auto-layout direction of a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LayoutMode {
    #[default]
    None,
    Horizontal,
    Vertical,
}

/// Every attribute of a scene node except its children.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NodeAttributes {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub node_type: NodeType,
    #[serde(default = "default_true")]
    pub visible: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fills: Vec<Paint>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub strokes: Vec<Paint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke_weight: Option<f64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub effects: Vec<Effect>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub constraints: Option<Constraints>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub absolute_bounding_box: Option<Rect>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<Vector>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relative_transform: Option<Transform>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<Color>,
    pub clips_content: bool,
    pub is_mask: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blend_mode: Option<BlendMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rectangle_corner_radii: Option<Vec<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub characters: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub character_style_overrides: Vec<usize>,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub style_override_table: IndexMap<String, TypeStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<TypeStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layout_mode: Option<LayoutMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_spacing: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub component_id: Option<String>,
}

impl NodeAttributes {
    /// Whether the name carries the component-root sentinel.
    pub fn is_component_root(&self) -> bool {
        self.name.starts_with('#')
    }

    /// Unrotated size, falling back to the absolute box.
    pub fn original_size(&self) -> Vector {
        self.size.unwrap_or_else(|| {
            self.absolute_bounding_box
                .map(|b| Vector::new(b.width, b.height))
                .unwrap_or_default()
        })
    }

    /// Whether fills or strokes need a raster/vector render.
    pub fn requires_render(&self) -> bool {
        paints_require_render(&self.fills)
            || paints_require_render(&self.strokes)
            || self.blend_mode.is_some_and(|mode| !mode.is_normal())
    }
}

/// A node of the input scene graph.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SceneNode {
    #[serde(flatten)]
    pub attrs: NodeAttributes,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<SceneNode>,
}

impl SceneNode {
    /// Create a visible node.
    pub fn new(id: impl Into<String>, name: impl Into<String>, node_type: NodeType) -> Self {
        Self {
            attrs: NodeAttributes {
                id: id.into(),
                name: name.into(),
                node_type,
                visible: true,
                ..Default::default()
            },
            children: Vec::new(),
        }
    }

    /// Set the absolute bounding box and matching original size.
    pub fn with_bounds(mut self, x: f64, y: f64, width: f64, height: f64) -> Self {
        self.attrs.absolute_bounding_box = Some(Rect::new(x, y, width, height));
        self.attrs.size = Some(Vector::new(width, height));
        self
    }

    /// Set the constraints.
    pub fn with_constraints(
        mut self,
        horizontal: HorizontalConstraint,
        vertical: VerticalConstraint,
    ) -> Self {
        self.attrs.constraints = Some(Constraints::new(horizontal, vertical));
        self
    }

    /// Append a fill.
    pub fn with_fill(mut self, paint: Paint) -> Self {
        self.attrs.fills.push(paint);
        self
    }

    /// Append a child.
    pub fn with_child(mut self, child: SceneNode) -> Self {
        self.children.push(child);
        self
    }

    /// Set text content.
    pub fn with_characters(mut self, characters: impl Into<String>) -> Self {
        self.attrs.characters = Some(characters.into());
        self
    }

    /// Set visibility.
    pub fn with_visible(mut self, visible: bool) -> Self {
        self.attrs.visible = visible;
        self
    }

    /// Mark this node as a mask for its preceding sibling.
    pub fn with_mask(mut self) -> Self {
        self.attrs.is_mask = true;
        self
    }

    /// Find a node by id in this subtree.
    pub fn find(&self, id: &str) -> Option<&SceneNode> {
        if self.attrs.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(id))
    }
}

/// Last paint of a list; single-paint consumers use last-wins.
pub fn last_paint(paints: &[Paint]) -> Option<&Paint> {
    paints.last()
}

/// More than one visible paint, or any emoji paint, cannot be expressed in CSS.
pub fn paints_require_render(paints: &[Paint]) -> bool {
    let mut visible = 0;
    for paint in paints.iter().filter(|p| p.visible) {
        if paint.paint_type == PaintType::Emoji {
            return true;
        }
        visible += 1;
    }
    visible > 1
}

fn default_true() -> bool {
    true
}

fn default_one() -> f64 {
    1.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_node() {
        let json = r##"{
            "id": "1:2",
            "name": "#Card",
            "type": "FRAME",
            "absoluteBoundingBox": {"x": 0, "y": 10, "width": 200, "height": 100},
            "constraints": {"horizontal": "LEFT_RIGHT", "vertical": "TOP"},
            "fills": [{"type": "SOLID", "color": {"r": 1, "g": 0, "b": 0, "a": 1}}],
            "children": [
                {"id": "1:3", "name": "Label", "type": "TEXT", "characters": "Hi"}
            ]
        }"##;

        let node: SceneNode = serde_json::from_str(json).unwrap();
        assert_eq!(node.attrs.id, "1:2");
        assert_eq!(node.attrs.node_type, NodeType::Frame);
        assert!(node.attrs.visible);
        assert!(node.attrs.is_component_root());
        assert_eq!(
            node.attrs.constraints.unwrap().horizontal,
            HorizontalConstraint::LeftRight
        );
        assert_eq!(node.children.len(), 1);
        assert_eq!(node.children[0].attrs.characters.as_deref(), Some("Hi"));
    }

    #[test]
    fn test_unknown_types_deserialize() {
        let json = r#"{
            "id": "5", "name": "x", "type": "STICKY",
            "fills": [{"type": "VIDEO"}],
            "effects": [{"type": "NOISE", "radius": 2}]
        }"#;

        let node: SceneNode = serde_json::from_str(json).unwrap();
        assert_eq!(node.attrs.node_type, NodeType::Unknown);
        assert_eq!(node.attrs.fills[0].paint_type, PaintType::Unknown);
        assert_eq!(node.attrs.effects[0].effect_type, EffectType::Unknown);
    }

    #[test]
    fn test_paints_require_render() {
        let red = Paint::solid(Color::new(1.0, 0.0, 0.0, 1.0));
        assert!(!paints_require_render(&[red.clone()]));
        assert!(paints_require_render(&[red.clone(), red.clone()]));

        let mut hidden = red.clone();
        hidden.visible = false;
        assert!(!paints_require_render(&[red, hidden]));

        assert!(paints_require_render(&[Paint::of_type(PaintType::Emoji)]));
    }

    #[test]
    fn test_blend_mode_requires_render() {
        let mut node = SceneNode::new("1", "blend", NodeType::Rectangle);
        node.attrs.blend_mode = Some(BlendMode::PassThrough);
        assert!(!node.attrs.requires_render());
        node.attrs.blend_mode = Some(BlendMode::Multiply);
        assert!(node.attrs.requires_render());
    }

    #[test]
    fn test_find() {
        let root = SceneNode::new("0", "root", NodeType::Frame).with_child(
            SceneNode::new("1", "a", NodeType::Group)
                .with_child(SceneNode::new("2", "b", NodeType::Rectangle)),
        );
        assert_eq!(root.find("2").map(|n| n.attrs.name.as_str()), Some("b"));
        assert!(root.find("9").is_none());
    }
}
