use crate::foundation::error::{SceneLinkError, SceneLinkResult};
use crate::resolve::{ResolveOpts, mangle};
use crate::scene::model::{Embed, Fragment, FrameNode, Material, Transform};
use std::collections::HashSet;

/// Expand one embed into plain nodes.
///
/// The fragment's anchor is dropped and its children become the returned list. Ids defined by
/// the fragment are prefixed with `embed.namespace`; references to the anchor are redirected to
/// `embed.root_material_id`. Nested embeds are expanded in place with compound namespaces.
///
/// Fails with [`SceneLinkError::NotAncestor`] when `embed.root_material_id` is not in
/// `ancestor_material_ids`. Everything else is assumed to have passed validation.
pub fn resolve_embed(
    embed: &Embed,
    ancestor_material_ids: &HashSet<String>,
) -> SceneLinkResult<Vec<FrameNode>> {
    resolve_embed_with_opts(embed, ancestor_material_ids, ResolveOpts::default())
}

pub fn resolve_embed_with_opts(
    embed: &Embed,
    ancestor_material_ids: &HashSet<String>,
    opts: ResolveOpts,
) -> SceneLinkResult<Vec<FrameNode>> {
    resolve_embed_at(embed, ancestor_material_ids, opts, 0)
}

/// Entry used by the frame walker, which already knows how deep the mount point is.
pub(crate) fn resolve_embed_at(
    embed: &Embed,
    ancestors: &HashSet<String>,
    opts: ResolveOpts,
    depth: usize,
) -> SceneLinkResult<Vec<FrameNode>> {
    let out = expand(
        &embed.namespace,
        &embed.root_material_id,
        &embed.fragment,
        ancestors,
        opts,
        depth,
    )?;
    tracing::debug!(
        namespace = %embed.namespace,
        root_material_id = %embed.root_material_id,
        nodes = out.len(),
        "embed resolved"
    );
    Ok(out)
}

fn expand(
    namespace: &str,
    root_material_id: &str,
    fragment: &Fragment,
    ancestors: &HashSet<String>,
    opts: ResolveOpts,
    depth: usize,
) -> SceneLinkResult<Vec<FrameNode>> {
    if !ancestors.contains(root_material_id) {
        return Err(SceneLinkError::not_ancestor(root_material_id));
    }

    let mut cx = Expander {
        namespace,
        anchor: &fragment.root.id,
        root_material_id,
        ancestors,
        synthesized: Vec::new(),
        opts,
    };
    cx.nodes(&fragment.root.children, depth + 1)
}

struct Expander<'a> {
    namespace: &'a str,
    anchor: &'a str,
    root_material_id: &'a str,
    ancestors: &'a HashSet<String>,
    /// Every material id produced so far, in DFS order.
    synthesized: Vec<String>,
    opts: ResolveOpts,
}

impl Expander<'_> {
    fn nodes(&mut self, nodes: &[FrameNode], depth: usize) -> SceneLinkResult<Vec<FrameNode>> {
        let mut out = Vec::with_capacity(nodes.len());
        for node in nodes {
            self.node(node, depth, &mut out)?;
        }
        Ok(out)
    }

    fn node(
        &mut self,
        node: &FrameNode,
        depth: usize,
        out: &mut Vec<FrameNode>,
    ) -> SceneLinkResult<()> {
        if depth > self.opts.max_depth {
            return Err(SceneLinkError::DepthExceeded {
                limit: self.opts.max_depth,
            });
        }
        match node {
            FrameNode::Material(m) => {
                let material = self.material(m, depth)?;
                out.push(FrameNode::Material(material));
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
            FrameNode::Embed(inner) => {
                out.extend(self.nested(inner, depth)?);
            }
        }
        Ok(())
    }

    fn material(&mut self, m: &Material, depth: usize) -> SceneLinkResult<Material> {
        let id = mangle(self.namespace, &m.id);
        let inherits = self.rebase(&m.inherits);
        tracing::trace!(from = %m.id, to = %id, "material id namespaced");

        // Recorded before descending so nested embeds below may mount on it.
        self.synthesized.push(id.clone());
        let children = self.nodes(&m.children, depth + 1)?;

        Ok(Material {
            id,
            inherits,
            fill: m.fill.clone(),
            stroke: m.stroke.clone(),
            stroke_width: m.stroke_width,
            children,
        })
    }

    fn nested(&mut self, inner: &Embed, depth: usize) -> SceneLinkResult<Vec<FrameNode>> {
        let namespace = mangle(self.namespace, &inner.namespace);
        let root_material_id = self.rebase(&inner.root_material_id);

        let mut visible = self.ancestors.clone();
        visible.extend(self.synthesized.iter().cloned());

        expand(
            &namespace,
            &root_material_id,
            &inner.fragment,
            &visible,
            self.opts,
            depth,
        )
    }

    /// Map a fragment-local material reference into the embedding scope.
    fn rebase(&self, id: &str) -> String {
        if id == self.anchor {
            self.root_material_id.to_owned()
        } else {
            mangle(self.namespace, id)
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/resolve/embed.rs"]
mod tests;
