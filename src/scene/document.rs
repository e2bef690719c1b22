use crate::foundation::error::{SceneLinkError, SceneLinkResult};
use crate::scene::model::{Fragment, Frame};
use crate::schema::validate::DEFAULT_MAX_DEPTH;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::io::Read;
use std::path::Path;

/// JSON levels one node level may add: an embed opens the embed, its fragment, the anchor and
/// the `children` array before the next node.
const JSON_LEVELS_PER_NODE: usize = 4;
/// Frame and root wrappers plus leaf payloads such as `center` or `crop`.
const JSON_LEVELS_SLACK: usize = 8;

fn parse<T: DeserializeOwned>(text: &str, what: &str, max_depth: usize) -> SceneLinkResult<T> {
    // Stands in for serde_json's fixed 128-level recursion limit.
    let limit = max_depth
        .saturating_mul(JSON_LEVELS_PER_NODE)
        .saturating_add(JSON_LEVELS_SLACK);
    if nesting_exceeds(text, limit) {
        return Err(SceneLinkError::DepthExceeded { limit: max_depth });
    }

    let mut de = serde_json::Deserializer::from_str(text);
    de.disable_recursion_limit();
    serde::Deserialize::deserialize(&mut de)
        .and_then(|v| de.end().map(|()| v))
        .map_err(|e| SceneLinkError::serde(format!("parse {what} JSON: {e}")))
}

/// Return `true` when objects/arrays in `text` nest deeper than `limit`.
fn nesting_exceeds(text: &str, limit: usize) -> bool {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    for b in text.bytes() {
        if in_string {
            match b {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match b {
            b'"' => in_string = true,
            b'{' | b'[' => {
                depth += 1;
                if depth > limit {
                    return true;
                }
            }
            b'}' | b']' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    false
}

fn read_text<R: Read>(mut r: R, what: &str) -> SceneLinkResult<String> {
    let mut text = String::new();
    r.read_to_string(&mut text)
        .map_err(|e| SceneLinkError::serde(format!("read {what} JSON: {e}")))?;
    Ok(text)
}

fn read_path(path: &Path, what: &str) -> SceneLinkResult<String> {
    std::fs::read_to_string(path).map_err(|e| {
        SceneLinkError::serde(format!("open {what} JSON '{}': {e}", path.display()))
    })
}

fn to_json_pretty<T: Serialize>(v: &T, what: &str) -> SceneLinkResult<String> {
    serde_json::to_string_pretty(v)
        .map_err(|e| SceneLinkError::serde(format!("serialize {what} JSON: {e}")))
}

impl Frame {
    /// Parse a frame from a JSON reader.
    pub fn from_reader<R: Read>(r: R) -> SceneLinkResult<Self> {
        parse(&read_text(r, "frame")?, "frame", DEFAULT_MAX_DEPTH)
    }

    /// Parse a frame from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> SceneLinkResult<Self> {
        Self::from_path_with_max_depth(path, DEFAULT_MAX_DEPTH)
    }

    /// [`Frame::from_path`] accepting trees up to `max_depth` node levels.
    pub fn from_path_with_max_depth(
        path: impl AsRef<Path>,
        max_depth: usize,
    ) -> SceneLinkResult<Self> {
        parse(&read_path(path.as_ref(), "frame")?, "frame", max_depth)
    }

    /// Parse a frame from a JSON string.
    pub fn from_json_str(s: &str) -> SceneLinkResult<Self> {
        parse(s, "frame", DEFAULT_MAX_DEPTH)
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json_pretty(&self) -> SceneLinkResult<String> {
        to_json_pretty(self, "frame")
    }
}

impl Fragment {
    /// Parse a fragment from a JSON reader.
    pub fn from_reader<R: Read>(r: R) -> SceneLinkResult<Self> {
        parse(&read_text(r, "fragment")?, "fragment", DEFAULT_MAX_DEPTH)
    }

    /// Parse a fragment from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> SceneLinkResult<Self> {
        Self::from_path_with_max_depth(path, DEFAULT_MAX_DEPTH)
    }

    pub fn from_path_with_max_depth(
        path: impl AsRef<Path>,
        max_depth: usize,
    ) -> SceneLinkResult<Self> {
        parse(&read_path(path.as_ref(), "fragment")?, "fragment", max_depth)
    }

    /// Parse a fragment from a JSON string.
    pub fn from_json_str(s: &str) -> SceneLinkResult<Self> {
        parse(s, "fragment", DEFAULT_MAX_DEPTH)
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json_pretty(&self) -> SceneLinkResult<String> {
        to_json_pretty(self, "fragment")
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/document.rs"]
mod tests;
