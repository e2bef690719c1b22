use crate::foundation::error::{SceneLinkError, SceneLinkResult};
use crate::paint::material::ResolvedMaterial;
use crate::resolve::ResolveOpts;
use crate::resolve::embed::resolve_embed_at;
use crate::scene::model::{
    Embed, Fragment, Frame, FrameNode, Material, RootMaterial, Transform, Viewport,
};
use std::collections::HashSet;

/// Root id used by [`fragment_to_frame`].
pub const DEFAULT_ROOT_ID: &str = "root";

/// Replace every embed in `frame` with its expansion.
///
/// The input is left untouched. A frame without embeds comes back as an equal copy.
pub fn resolve_frame(frame: &Frame) -> SceneLinkResult<Frame> {
    resolve_frame_with_opts(frame, ResolveOpts::default())
}

#[tracing::instrument(level = "debug", skip_all, fields(root = %frame.root.id))]
pub fn resolve_frame_with_opts(frame: &Frame, opts: ResolveOpts) -> SceneLinkResult<Frame> {
    let mut walk = FrameWalk {
        path: vec![frame.root.id.clone()],
        opts,
    };
    let children = walk.nodes(&frame.root.children, 1)?;

    Ok(Frame {
        viewport: frame.viewport,
        background: frame.background.clone(),
        root: RootMaterial {
            id: frame.root.id.clone(),
            fill: frame.root.fill.clone(),
            stroke: frame.root.stroke.clone(),
            stroke_width: frame.root.stroke_width,
            children,
        },
    })
}

struct FrameWalk {
    /// Material ids from the scene root down to the current node.
    path: Vec<String>,
    opts: ResolveOpts,
}

impl FrameWalk {
    fn nodes(&mut self, nodes: &[FrameNode], depth: usize) -> SceneLinkResult<Vec<FrameNode>> {
        if depth > self.opts.max_depth && !nodes.is_empty() {
            return Err(SceneLinkError::DepthExceeded {
                limit: self.opts.max_depth,
            });
        }
        let mut out = Vec::with_capacity(nodes.len());
        for node in nodes {
            match node {
                FrameNode::Material(m) => {
                    self.path.push(m.id.clone());
                    let children = self.nodes(&m.children, depth + 1);
                    self.path.pop();
                    out.push(FrameNode::Material(Material {
                        id: m.id.clone(),
                        inherits: m.inherits.clone(),
                        fill: m.fill.clone(),
                        stroke: m.stroke.clone(),
                        stroke_width: m.stroke_width,
                        children: children?,
                    }));
                }
                FrameNode::Transform(t) => {
                    out.push(FrameNode::Transform(Transform {
                        matrix: t.matrix.clone(),
                        children: self.nodes(&t.children, depth + 1)?,
                    }));
                }
                FrameNode::Circle(_)
                | FrameNode::Line(_)
                | FrameNode::Rectangle(_)
                | FrameNode::Image(_) => out.push(node.clone()),
                FrameNode::Embed(e) => {
                    let ancestors: HashSet<String> = self.path.iter().cloned().collect();
                    out.extend(resolve_embed_at(e, &ancestors, self.opts, depth)?);
                }
            }
        }
        Ok(out)
    }
}

/// Turn a fragment into a standalone frame for previewing or testing.
///
/// The anchor becomes a root material styled with `default_material` under
/// [`DEFAULT_ROOT_ID`].
pub fn fragment_to_frame(
    fragment: &Fragment,
    viewport: Viewport,
    default_material: &ResolvedMaterial,
) -> Frame {
    fragment_to_frame_with_root_id(fragment, viewport, default_material, DEFAULT_ROOT_ID)
}

/// [`fragment_to_frame`] with an explicit root id.
///
/// References to the fragment anchor are rewritten to `root_id`; every other id and reference
/// is kept as is.
pub fn fragment_to_frame_with_root_id(
    fragment: &Fragment,
    viewport: Viewport,
    default_material: &ResolvedMaterial,
    root_id: &str,
) -> Frame {
    let anchor = fragment.root.id.as_str();
    Frame {
        viewport,
        background: None,
        root: RootMaterial {
            id: root_id.to_owned(),
            fill: default_material.fill.clone(),
            stroke: default_material.stroke.clone(),
            stroke_width: default_material.stroke_width,
            children: reanchor(&fragment.root.children, anchor, root_id),
        },
    }
}

fn reanchor(nodes: &[FrameNode], anchor: &str, root_id: &str) -> Vec<FrameNode> {
    let retarget = |id: &str| {
        if id == anchor {
            root_id.to_owned()
        } else {
            id.to_owned()
        }
    };

    nodes
        .iter()
        .map(|node| match node {
            FrameNode::Material(m) => FrameNode::Material(Material {
                id: m.id.clone(),
                inherits: retarget(&m.inherits),
                fill: m.fill.clone(),
                stroke: m.stroke.clone(),
                stroke_width: m.stroke_width,
                children: reanchor(&m.children, anchor, root_id),
            }),
            FrameNode::Transform(t) => FrameNode::Transform(Transform {
                matrix: t.matrix.clone(),
                children: reanchor(&t.children, anchor, root_id),
            }),
            FrameNode::Embed(e) => FrameNode::Embed(Embed {
                namespace: e.namespace.clone(),
                root_material_id: retarget(&e.root_material_id),
                fragment: e.fragment.clone(),
            }),
            FrameNode::Circle(_)
            | FrameNode::Line(_)
            | FrameNode::Rectangle(_)
            | FrameNode::Image(_) => node.clone(),
        })
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/resolve/frame.rs"]
mod tests;
