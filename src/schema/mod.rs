//! Structural validation.
//!
//! Validates frames and fragments, resolved or not, in a single depth-first pass.

pub mod validate;
