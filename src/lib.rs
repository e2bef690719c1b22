//! scenelink is an intermediate representation for declarative 2D scenes.
//!
//! A scene is a tree of materials (inheritable paint style), transforms and shapes. Reusable
//! sub-trees ([`Fragment`]s) are mounted with [`Embed`] markers and inlined by the resolver,
//! which prefixes every id a fragment defines with the embed's namespace:
//!
//! - Parse a [`Frame`] or [`Fragment`] from JSON
//! - Check it with [`validate_frame`] / [`validate_fragment`]
//! - Inline embeds with [`resolve_frame`]
//! - Flatten the result for painting with [`build_draw_list`]
#![forbid(unsafe_code)]

mod foundation;

/// Paint style and material inheritance.
pub mod paint;
/// Renderer-facing flattening.
pub mod render;
/// Embed and frame resolution.
pub mod resolve;
/// Scene tree model and JSON documents.
pub mod scene;
/// Structural validation.
pub mod schema;

pub use crate::foundation::core::{Affine, Point, Position, Rgba8Premul, affine_from_matrix};
pub use crate::foundation::error::{SceneLinkError, SceneLinkResult};

pub use crate::paint::color::Color;
pub use crate::paint::material::{MaterialLink, ResolvedMaterial, resolve_material};
pub use crate::render::draw_list::{DrawItem, DrawList, DrawShape, build_draw_list};
pub use crate::resolve::ResolveOpts;
pub use crate::resolve::embed::{resolve_embed, resolve_embed_with_opts};
pub use crate::resolve::frame::{
    DEFAULT_ROOT_ID, fragment_to_frame, fragment_to_frame_with_root_id, resolve_frame,
    resolve_frame_with_opts,
};
pub use crate::scene::model::{
    Circle, Crop, Embed, Fragment, Frame, FrameNode, Image, Line, Material, Rectangle,
    RootMaterial, RootMaterialRef, ScaleMode, Transform, Viewport,
};
pub use crate::schema::validate::{
    DEFAULT_MAX_DEPTH, ValidateOpts, ValidationResult, validate_embed, validate_fragment,
    validate_fragment_with_opts, validate_frame, validate_frame_with_opts,
};
