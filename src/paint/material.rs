use crate::foundation::core::Rgba8Premul;
use crate::foundation::error::{SceneLinkError, SceneLinkResult};
use crate::paint::color::Color;
use crate::scene::model::{Material, RootMaterial};
use serde::{Deserialize, Serialize};

/// One link of an ancestor chain, from the scene root downwards.
#[derive(Debug, Clone, Copy)]
pub enum MaterialLink<'a> {
    Root(&'a RootMaterial),
    Child(&'a Material),
}

/// Fully-defined paint style for a shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedMaterial {
    pub fill: String,
    pub stroke: String,
    pub stroke_width: f64,
}

impl ResolvedMaterial {
    pub fn new(fill: impl Into<String>, stroke: impl Into<String>, stroke_width: f64) -> Self {
        Self {
            fill: fill.into(),
            stroke: stroke.into(),
            stroke_width,
        }
    }

    /// Parsed fill paint.
    pub fn fill_rgba(&self) -> SceneLinkResult<Rgba8Premul> {
        Ok(Color::parse(&self.fill)?.to_rgba8_premul())
    }

    /// Parsed stroke paint.
    pub fn stroke_rgba(&self) -> SceneLinkResult<Rgba8Premul> {
        Ok(Color::parse(&self.stroke)?.to_rgba8_premul())
    }
}

impl From<&RootMaterial> for ResolvedMaterial {
    fn from(root: &RootMaterial) -> Self {
        Self::new(root.fill.clone(), root.stroke.clone(), root.stroke_width)
    }
}

/// Compute the effective style at the end of an ancestor chain.
///
/// The chain must start with the root material; every later link overrides the fields it sets.
pub fn resolve_material(ancestors: &[MaterialLink<'_>]) -> SceneLinkResult<ResolvedMaterial> {
    let (first, rest) = ancestors.split_first().ok_or_else(|| {
        SceneLinkError::invalid_input("material chain is empty: the root material is required")
    })?;
    let MaterialLink::Root(root) = first else {
        return Err(SceneLinkError::invalid_input(
            "material chain must start with the root material",
        ));
    };

    let mut out = ResolvedMaterial::from(*root);
    for link in rest {
        let MaterialLink::Child(m) = link else {
            return Err(SceneLinkError::invalid_input(
                "root material may only appear at the start of a material chain",
            ));
        };
        if let Some(fill) = &m.fill {
            out.fill.clone_from(fill);
        }
        if let Some(stroke) = &m.stroke {
            out.stroke.clone_from(stroke);
        }
        if let Some(w) = m.stroke_width {
            out.stroke_width = w;
        }
    }
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/paint/material.rs"]
mod tests;
