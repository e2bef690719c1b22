//! Paint style: color strings and material inheritance.

pub mod color;
pub mod material;
