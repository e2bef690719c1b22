use crate::foundation::core::{Affine, Position, affine_from_matrix};
use serde::{Deserialize, Serialize};

/// A complete, renderable scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    /// Visible region of scene space.
    pub viewport: Viewport,
    /// Clear color. `None` keeps previous contents (accumulation).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
    /// The one root material of the scene.
    pub root: RootMaterial,
}

/// Visible region of a [`Frame`], centred on the scene origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Viewport {
    /// Half of the visible width, in scene units.
    pub half_width: f64,
    /// Half of the visible height, in scene units.
    pub half_height: f64,
    /// How the viewport maps onto an output surface of another aspect ratio.
    pub scale_mode: ScaleMode,
}

/// Aspect-ratio policy for a [`Viewport`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ScaleMode {
    /// Letterbox: the whole viewport stays visible.
    #[default]
    Fit,
    /// Crop: the output is fully covered.
    Fill,
    /// Non-uniform scale to the output.
    Stretch,
}

/// Root of a full scene; defines every style field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RootMaterial {
    /// Material id, unique within the tree.
    pub id: String,
    /// Fill paint.
    pub fill: String,
    /// Stroke paint.
    pub stroke: String,
    /// Stroke width in scene units.
    pub stroke_width: f64,
    /// Child nodes.
    #[serde(default)]
    pub children: Vec<FrameNode>,
}

/// Child material: overrides some style fields of an ancestor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Material {
    /// Material id, unique within the tree.
    pub id: String,
    /// Id of the ancestor material this one inherits from.
    #[serde(rename = "ref")]
    pub inherits: String,
    /// Fill override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<String>,
    /// Stroke override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke: Option<String>,
    /// Stroke width override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke_width: Option<f64>,
    /// Child nodes.
    #[serde(default)]
    pub children: Vec<FrameNode>,
}

/// Geometry-only wrapper applying a 2D affine matrix to its children.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    /// `[a, b, c, d, e, f]`, mapping `(x, y)` to `(ax + cy + e, bx + dy + f)`.
    pub matrix: Vec<f64>,
    /// Child nodes.
    #[serde(default)]
    pub children: Vec<FrameNode>,
}

impl Transform {
    /// The matrix as an [`Affine`], or `None` if it is malformed.
    pub fn affine(&self) -> Option<Affine> {
        affine_from_matrix(&self.matrix)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub center: Position,
    pub radius: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Line {
    pub start: Position,
    pub end: Position,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rectangle {
    pub center: Position,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Image {
    pub url: String,
    /// Top-left corner in scene space.
    pub position: Position,
    pub width: f64,
    pub height: f64,
    /// Source sub-rectangle, in source-pixel units.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crop: Option<Crop>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Crop {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Anchor at the top of a [`Fragment`]: an id with no style of its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RootMaterialRef {
    /// Anchor id. Child materials `ref` it to inherit from the embedding context.
    pub id: String,
    /// Child nodes.
    #[serde(default)]
    pub children: Vec<FrameNode>,
}

/// Portable, embeddable sub-tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fragment {
    pub root: RootMaterialRef,
}

/// Placeholder meaning "inline `fragment` here".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Embed {
    /// Prefix applied to every id the fragment defines. Must match `^[A-Za-z][A-Za-z0-9]*$`.
    pub namespace: String,
    /// Ancestor material the fragment's anchor references are rewritten to.
    pub root_material_id: String,
    pub fragment: Fragment,
}

/// Any node below a root material or fragment anchor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum FrameNode {
    Material(Material),
    Transform(Transform),
    Circle(Circle),
    Line(Line),
    Rectangle(Rectangle),
    Image(Image),
    Embed(Embed),
}

impl FrameNode {
    /// Child list of container nodes; empty for shapes and embeds.
    pub fn children(&self) -> &[FrameNode] {
        match self {
            Self::Material(m) => &m.children,
            Self::Transform(t) => &t.children,
            Self::Circle(_) | Self::Line(_) | Self::Rectangle(_) | Self::Image(_) => &[],
            Self::Embed(_) => &[],
        }
    }

    /// Return `true` for leaf geometry nodes.
    pub fn is_shape(&self) -> bool {
        matches!(
            self,
            Self::Circle(_) | Self::Line(_) | Self::Rectangle(_) | Self::Image(_)
        )
    }

    /// Return `true` if this node, or anything below it, is an unresolved embed.
    pub fn contains_embed(&self) -> bool {
        match self {
            Self::Embed(_) => true,
            other => other.children().iter().any(FrameNode::contains_embed),
        }
    }
}

impl Frame {
    /// Return `true` if any embed marker remains in the tree.
    pub fn has_embeds(&self) -> bool {
        self.root.children.iter().any(FrameNode::contains_embed)
    }
}

impl From<Material> for FrameNode {
    fn from(v: Material) -> Self {
        Self::Material(v)
    }
}

impl From<Transform> for FrameNode {
    fn from(v: Transform) -> Self {
        Self::Transform(v)
    }
}

impl From<Circle> for FrameNode {
    fn from(v: Circle) -> Self {
        Self::Circle(v)
    }
}

impl From<Line> for FrameNode {
    fn from(v: Line) -> Self {
        Self::Line(v)
    }
}

impl From<Rectangle> for FrameNode {
    fn from(v: Rectangle) -> Self {
        Self::Rectangle(v)
    }
}

impl From<Image> for FrameNode {
    fn from(v: Image) -> Self {
        Self::Image(v)
    }
}

impl From<Embed> for FrameNode {
    fn from(v: Embed) -> Self {
        Self::Embed(v)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/model.rs"]
mod tests;
