//! Scene boundary model.
//!
//! Plain data: every node kind of the tree plus JSON document loading.

pub mod document;
pub mod model;
