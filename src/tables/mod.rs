//! Symbol table entries.
//!
//! Table entries live as nodes inside a `TABLE` container in the TABLES
//! section.  Only the layer table carries typed fields; other table kinds
//! round-trip as opaque nodes.

pub mod layer;

pub use layer::{Layer, LayerStateFlags};
