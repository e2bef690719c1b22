use crate::foundation::core::Position;
use crate::foundation::error::{SceneLinkError, SceneLinkResult};
use crate::resolve::mangle;
use crate::scene::model::{
    Circle, Embed, Fragment, Frame, FrameNode, Image, Line, Material, Rectangle, Transform,
    Viewport,
};
use serde::Serialize;
use std::collections::HashSet;

/// Default nesting limit shared by validation and resolution.
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Separator placed between a namespace and the id it prefixes.
pub const NAMESPACE_SEPARATOR: char = '_';

/// Outcome of a validation call.
///
/// Serializes as `{"valid":true}` or `{"valid":false,"error":"..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl ValidationResult {
    pub fn ok() -> Self {
        Self {
            valid: true,
            error: None,
        }
    }

    pub fn fail(error: impl Into<String>) -> Self {
        Self {
            valid: false,
            error: Some(error.into()),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// The first error found, if any.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Convert into a `Result`, mapping failures to [`SceneLinkError::Validation`].
    pub fn into_result(self) -> SceneLinkResult<()> {
        match self.error {
            None => Ok(()),
            Some(e) => Err(SceneLinkError::validation(e)),
        }
    }
}

impl From<Result<(), String>> for ValidationResult {
    fn from(r: Result<(), String>) -> Self {
        match r {
            Ok(()) => Self::ok(),
            Err(e) => Self::fail(e),
        }
    }
}

/// Validation settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidateOpts {
    /// Deepest node nesting accepted before the tree is rejected.
    pub max_depth: usize,
}

impl Default for ValidateOpts {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

type Check = Result<(), String>;

/// Validate a complete scene, resolved or not.
pub fn validate_frame(frame: &Frame) -> ValidationResult {
    validate_frame_with_opts(frame, ValidateOpts::default())
}

#[tracing::instrument(level = "debug", skip_all, fields(root = %frame.root.id))]
pub fn validate_frame_with_opts(frame: &Frame, opts: ValidateOpts) -> ValidationResult {
    let res = ValidationResult::from(check_frame(frame, opts));
    if let Some(e) = res.error() {
        tracing::debug!(error = e, "frame rejected");
    }
    res
}

/// Validate a standalone fragment.
pub fn validate_fragment(fragment: &Fragment) -> ValidationResult {
    validate_fragment_with_opts(fragment, ValidateOpts::default())
}

#[tracing::instrument(level = "debug", skip_all, fields(anchor = %fragment.root.id))]
pub fn validate_fragment_with_opts(fragment: &Fragment, opts: ValidateOpts) -> ValidationResult {
    let res = ValidationResult::from(check_fragment(fragment, opts, 0));
    if let Some(e) = res.error() {
        tracing::debug!(error = e, "fragment rejected");
    }
    res
}

/// Validate one embed marker at its mount point.
///
/// `ancestor_material_ids` are the material ids visible at the mount point and
/// `used_namespaces` the namespaces already claimed by sibling embeds.
pub fn validate_embed(
    embed: &Embed,
    ancestor_material_ids: &HashSet<String>,
    used_namespaces: &HashSet<String>,
) -> ValidationResult {
    check_embed(
        embed,
        ancestor_material_ids,
        used_namespaces,
        ValidateOpts::default(),
        0,
    )
    .into()
}

fn check_frame(frame: &Frame, opts: ValidateOpts) -> Check {
    let root = &frame.root;
    if root.id.trim().is_empty() {
        return Err("root material id must be non-empty".to_owned());
    }
    if root.fill.trim().is_empty() {
        return Err("root material must define fill".to_owned());
    }
    if root.stroke.trim().is_empty() {
        return Err("root material must define stroke".to_owned());
    }
    if !is_non_negative(root.stroke_width) {
        return Err("root material must define strokeWidth as a finite number >= 0".to_owned());
    }
    check_viewport(&frame.viewport)?;

    let mut cx = Walk::new(opts);
    cx.enter_material(&root.id);
    cx.children(&root.children, 1)
}

fn check_viewport(v: &Viewport) -> Check {
    if !is_positive(v.half_width) {
        return Err("viewport halfWidth must be a positive finite number".to_owned());
    }
    if !is_positive(v.half_height) {
        return Err("viewport halfHeight must be a positive finite number".to_owned());
    }
    Ok(())
}

fn check_fragment(fragment: &Fragment, opts: ValidateOpts, depth: usize) -> Check {
    let anchor = &fragment.root;
    if anchor.id.trim().is_empty() {
        return Err("fragment root id must be non-empty".to_owned());
    }

    let mut cx = Walk::new(opts);
    cx.enter_material(&anchor.id);
    cx.children(&anchor.children, depth + 1)
}

fn check_embed(
    embed: &Embed,
    ancestors: &HashSet<String>,
    used_namespaces: &HashSet<String>,
    opts: ValidateOpts,
    depth: usize,
) -> Check {
    check_namespace(&embed.namespace)?;
    if used_namespaces.contains(&embed.namespace) {
        return Err(format!(
            "embed namespace \"{}\" is already used in this scope",
            embed.namespace
        ));
    }
    if !ancestors.contains(&embed.root_material_id) {
        return Err(format!(
            "embed rootMaterialId \"{}\" is not an ancestor material",
            embed.root_material_id
        ));
    }
    check_fragment(&embed.fragment, opts, depth)
}

fn check_namespace(ns: &str) -> Check {
    if ns.is_empty() {
        return Err("embed namespace must be non-empty".to_owned());
    }
    if ns.contains(NAMESPACE_SEPARATOR) {
        return Err(format!(
            "embed namespace \"{ns}\" must not contain '_' (reserved as the namespace separator)"
        ));
    }
    let mut chars = ns.chars();
    let head_ok = chars.next().is_some_and(|c| c.is_ascii_alphabetic());
    if !head_ok || !chars.all(|c| c.is_ascii_alphanumeric()) {
        return Err(format!(
            "embed namespace \"{ns}\" must match ^[A-Za-z][A-Za-z0-9]*$"
        ));
    }
    Ok(())
}

/// Per-call traversal state: every id seen so far plus the ids on the current path.
struct Walk {
    opts: ValidateOpts,
    seen: HashSet<String>,
    ancestors: HashSet<String>,
}

impl Walk {
    fn new(opts: ValidateOpts) -> Self {
        Self {
            opts,
            seen: HashSet::new(),
            ancestors: HashSet::new(),
        }
    }

    fn enter_material(&mut self, id: &str) {
        self.seen.insert(id.to_owned());
        self.ancestors.insert(id.to_owned());
    }

    fn children(&mut self, children: &[FrameNode], depth: usize) -> Check {
        // Namespaces only have to be distinct among siblings.
        let mut used_namespaces = HashSet::new();
        for child in children {
            self.node(child, &mut used_namespaces, depth)?;
        }
        Ok(())
    }

    fn node(
        &mut self,
        node: &FrameNode,
        used_namespaces: &mut HashSet<String>,
        depth: usize,
    ) -> Check {
        if depth > self.opts.max_depth {
            return Err(format!(
                "tree depth exceeds the limit of {}",
                self.opts.max_depth
            ));
        }
        match node {
            FrameNode::Material(m) => self.material(m, depth),
            FrameNode::Transform(t) => {
                check_matrix(t)?;
                self.children(&t.children, depth + 1)
            }
            FrameNode::Circle(c) => check_circle(c),
            FrameNode::Line(l) => check_line(l),
            FrameNode::Rectangle(r) => check_rectangle(r),
            FrameNode::Image(i) => check_image(i),
            FrameNode::Embed(e) => {
                check_embed(e, &self.ancestors, used_namespaces, self.opts, depth)?;
                used_namespaces.insert(e.namespace.clone());
                self.claim_embedded_ids(e)
            }
        }
    }

    /// Reserve the ids `embed` produces once resolved, so they cannot clash with scene ids.
    fn claim_embedded_ids(&mut self, embed: &Embed) -> Check {
        let mut ids = Vec::new();
        collect_embedded_ids(&embed.namespace, &embed.fragment.root.children, &mut ids);
        for id in ids {
            if self.seen.contains(&id) {
                return Err(format!("duplicate material id \"{id}\""));
            }
            self.seen.insert(id);
        }
        Ok(())
    }

    fn material(&mut self, m: &Material, depth: usize) -> Check {
        if m.id.trim().is_empty() {
            return Err("material id must be non-empty".to_owned());
        }
        if !self.seen.insert(m.id.clone()) {
            return Err(format!("duplicate material id \"{}\"", m.id));
        }
        if !self.ancestors.contains(&m.inherits) {
            return Err(format!(
                "material \"{}\" references \"{}\", which is not an ancestor material",
                m.id, m.inherits
            ));
        }
        if let Some(w) = m.stroke_width
            && !is_non_negative(w)
        {
            return Err(format!(
                "material \"{}\" strokeWidth must be a finite number >= 0",
                m.id
            ));
        }

        self.ancestors.insert(m.id.clone());
        let res = self.children(&m.children, depth + 1);
        self.ancestors.remove(&m.id);
        res
    }
}

/// Material ids a fragment's children resolve to under `namespace`, nested embeds included.
fn collect_embedded_ids(namespace: &str, nodes: &[FrameNode], out: &mut Vec<String>) {
    for node in nodes {
        match node {
            FrameNode::Material(m) => out.push(mangle(namespace, &m.id)),
            FrameNode::Embed(e) => {
                let inner = mangle(namespace, &e.namespace);
                collect_embedded_ids(&inner, &e.fragment.root.children, out);
            }
            _ => {}
        }
        collect_embedded_ids(namespace, node.children(), out);
    }
}

fn check_matrix(t: &Transform) -> Check {
    if t.matrix.len() != 6 {
        return Err(format!(
            "transform matrix must have exactly 6 entries, got {}",
            t.matrix.len()
        ));
    }
    match t.matrix.iter().position(|v| !v.is_finite()) {
        Some(i) => Err(format!(
            "transform matrix entry at index {i} is not a finite number"
        )),
        None => Ok(()),
    }
}

fn check_position(p: Position, what: &str) -> Check {
    if p.is_finite() {
        Ok(())
    } else {
        Err(format!("{what} must have finite coordinates"))
    }
}

fn check_circle(c: &Circle) -> Check {
    check_position(c.center, "circle center")?;
    if !is_non_negative(c.radius) {
        return Err("circle radius must be a finite number >= 0".to_owned());
    }
    Ok(())
}

fn check_line(l: &Line) -> Check {
    check_position(l.start, "line start")?;
    check_position(l.end, "line end")
}

fn check_rectangle(r: &Rectangle) -> Check {
    check_position(r.center, "rectangle center")?;
    if !is_non_negative(r.width) {
        return Err("rectangle width must be a finite number >= 0".to_owned());
    }
    if !is_non_negative(r.height) {
        return Err("rectangle height must be a finite number >= 0".to_owned());
    }
    Ok(())
}

fn check_image(i: &Image) -> Check {
    if i.url.trim().is_empty() {
        return Err("image url must be non-empty".to_owned());
    }
    check_position(i.position, "image position")?;
    if !is_positive(i.width) {
        return Err("image width must be a positive finite number".to_owned());
    }
    if !is_positive(i.height) {
        return Err("image height must be a positive finite number".to_owned());
    }
    if let Some(crop) = &i.crop {
        if !is_non_negative(crop.x) {
            return Err("image crop.x must be a finite number >= 0".to_owned());
        }
        if !is_non_negative(crop.y) {
            return Err("image crop.y must be a finite number >= 0".to_owned());
        }
        if !is_positive(crop.width) {
            return Err("image crop.width must be a positive finite number".to_owned());
        }
        if !is_positive(crop.height) {
            return Err("image crop.height must be a positive finite number".to_owned());
        }
    }
    Ok(())
}

fn is_positive(v: f64) -> bool {
    v.is_finite() && v > 0.0
}

fn is_non_negative(v: f64) -> bool {
    v.is_finite() && v >= 0.0
}

#[cfg(test)]
#[path = "../../tests/unit/schema/validate.rs"]
mod tests;
