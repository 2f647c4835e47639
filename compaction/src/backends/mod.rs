//! Rendering backends.

pub mod svg;
