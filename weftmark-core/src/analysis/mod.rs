//! Per-category descriptor analyzers.
//!
//! Texture, edge, histogram and dimension analysis are independent of each
//! other and pure in the input image; the pattern scorer joins on the texture
//! and dimension outputs. All enumeration orders (neighbor angles, histogram
//! bins, channel order, scan order) are fixed, which is what makes descriptor
//! values, and therefore feature hashes, reproducible across invocations.

pub mod dimensions;
pub mod edge;
pub mod histogram;
pub mod pattern;
pub mod texture;
