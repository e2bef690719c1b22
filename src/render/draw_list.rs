use crate::foundation::core::{Affine, Rgba8Premul};
use crate::foundation::error::{SceneLinkError, SceneLinkResult};
use crate::paint::color::Color;
use crate::paint::material::{MaterialLink, ResolvedMaterial, resolve_material};
use crate::scene::model::{Circle, Frame, FrameNode, Image, Line, Rectangle, Viewport};
use crate::schema::validate::validate_frame;

/// Leaf geometry as handed to a renderer.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawShape {
    Circle(Circle),
    Line(Line),
    Rectangle(Rectangle),
    Image(Image),
}

impl DrawShape {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Circle(_) => "circle",
            Self::Line(_) => "line",
            Self::Rectangle(_) => "rectangle",
            Self::Image(_) => "image",
        }
    }
}

/// One shape with everything needed to paint it.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawItem {
    pub shape: DrawShape,
    /// Product of every enclosing transform, outermost first.
    pub transform: Affine,
    pub material: ResolvedMaterial,
}

/// A frame flattened into paint order.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawList {
    pub viewport: Viewport,
    /// `None` keeps whatever the target already holds.
    pub clear: Option<Rgba8Premul>,
    pub items: Vec<DrawItem>,
}

/// Flatten a resolved frame into a [`DrawList`].
///
/// The frame must pass validation and be free of embed markers.
pub fn build_draw_list(frame: &Frame) -> SceneLinkResult<DrawList> {
    validate_frame(frame).into_result()?;

    let clear = frame
        .background
        .as_deref()
        .map(|bg| Color::parse(bg).map(Color::to_rgba8_premul))
        .transpose()?;

    let mut b = Builder {
        chain: vec![MaterialLink::Root(&frame.root)],
        items: Vec::new(),
    };
    let root_material = resolve_material(&b.chain)?;
    b.nodes(&frame.root.children, Affine::IDENTITY, &root_material)?;

    Ok(DrawList {
        viewport: frame.viewport,
        clear,
        items: b.items,
    })
}

struct Builder<'a> {
    chain: Vec<MaterialLink<'a>>,
    items: Vec<DrawItem>,
}

impl<'a> Builder<'a> {
    fn nodes(
        &mut self,
        nodes: &'a [FrameNode],
        transform: Affine,
        material: &ResolvedMaterial,
    ) -> SceneLinkResult<()> {
        for node in nodes {
            let shape = match node {
                FrameNode::Material(m) => {
                    self.chain.push(MaterialLink::Child(m));
                    let res = resolve_material(&self.chain)
                        .and_then(|inner| self.nodes(&m.children, transform, &inner));
                    self.chain.pop();
                    res?;
                    continue;
                }
                FrameNode::Transform(t) => {
                    let local = t.affine().ok_or_else(|| {
                        SceneLinkError::invalid_input("transform matrix is malformed")
                    })?;
                    self.nodes(&t.children, transform * local, material)?;
                    continue;
                }
                FrameNode::Embed(e) => {
                    return Err(SceneLinkError::invalid_input(format!(
                        "frame contains an unresolved embed \"{}\"",
                        e.namespace
                    )));
                }
                FrameNode::Circle(c) => DrawShape::Circle(c.clone()),
                FrameNode::Line(l) => DrawShape::Line(l.clone()),
                FrameNode::Rectangle(r) => DrawShape::Rectangle(r.clone()),
                FrameNode::Image(i) => DrawShape::Image(i.clone()),
            };
            self.items.push(DrawItem {
                shape,
                transform,
                material: material.clone(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/draw_list.rs"]
mod tests;
