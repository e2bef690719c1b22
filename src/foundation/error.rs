/// Result alias used by every fallible scenelink operation.
pub type SceneLinkResult<T> = Result<T, SceneLinkError>;

/// Errors raised by resolution, document I/O and draw-list construction.
///
/// Validators never return this type directly; they produce a
/// [`ValidationResult`](crate::ValidationResult) that can be converted with
/// [`ValidationResult::into_result`](crate::ValidationResult::into_result).
#[derive(thiserror::Error, Debug)]
pub enum SceneLinkError {
    /// A tree failed structural validation.
    #[error("validation error: {0}")]
    Validation(String),

    /// A caller handed an operation input it cannot work with.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// An embed's `rootMaterialId` is not visible at its mount point.
    #[error("rootMaterialId is not an ancestor material: \"{root_material_id}\"")]
    NotAncestor {
        /// The offending (already rewritten) root material id.
        root_material_id: String,
    },

    /// Tree nesting went past the configured depth limit.
    #[error("tree depth exceeds the limit of {limit}")]
    DepthExceeded {
        /// Configured maximum depth.
        limit: usize,
    },

    /// A JSON document could not be read or written.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Anything else.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SceneLinkError {
    /// Build a [`SceneLinkError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`SceneLinkError::InvalidInput`].
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Build a [`SceneLinkError::NotAncestor`].
    pub fn not_ancestor(root_material_id: impl Into<String>) -> Self {
        Self::NotAncestor {
            root_material_id: root_material_id.into(),
        }
    }

    /// Build a [`SceneLinkError::Serde`].
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
