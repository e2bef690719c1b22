//! Renderer-facing output.

pub mod draw_list;
