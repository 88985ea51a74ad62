//! # dxfdom
//!
//! A pure Rust library for reading and writing 2D CAD drawings in the
//! ASCII DXF exchange format.
//!
//! The format is a flat stream of `(group code, value)` line pairs; dxfdom
//! models it as a generic document tree in which every node keeps its raw
//! property list alongside optional typed fields.  Known object kinds get
//! structured access, everything else round-trips losslessly as-is.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use dxfdom::{Document, entities::{EntityType, Line}, types::Vector2};
//!
//! // Read a drawing
//! let mut doc = Document::open_file("sample.dxf")?;
//!
//! // Walk the entities
//! for id in doc.entities().collect::<Vec<_>>() {
//!     if let Some(entity) = doc.entity(id) {
//!         println!("{:?} on layer {}", entity.common().resolved_color, entity.common().layer);
//!     }
//! }
//!
//! // Add a line and write the drawing back
//! doc.add_entity(EntityType::Line(Line::from_points(
//!     Vector2::ZERO,
//!     Vector2::new(100.0, 50.0),
//! )));
//! doc.save_file("out.dxf")?;
//! # Ok::<(), dxfdom::DxfError>(())
//! ```
//!
//! ## Architecture
//!
//! - [`node`] — the generic tree: `Property`, `DocumentNode`, `NodeArena`
//! - [`io::dxf`] — the stream reader (a stack machine with implicit-close
//!   state) and its inverse, the pre-order writer
//! - [`entities`] — the closed entity catalogue with two-way
//!   field/property synchronization and an opaque catch-all
//! - [`types::color`] — the layered color model (by-layer / by-block /
//!   indexed / true color) and the palette resolver
//! - [`resolve`] — the post-parse pass binding layer and block names to
//!   their nodes

#![warn(rustdoc::missing_crate_level_docs)]

pub mod document;
pub mod entities;
pub mod error;
pub mod io;
pub mod node;
pub mod notification;
pub mod resolve;
pub mod tables;
pub mod types;

// Re-export commonly used types
pub use document::Document;
pub use error::{DxfError, Result};
pub use node::{DocumentNode, NodeArena, NodeData, NodeId, Property};
pub use notification::{Notification, NotificationCollection, NotificationKind};
pub use tables::Layer;
pub use types::{BoundingBox2D, Color, Rgb, Vector2};

// Re-export entity types
pub use entities::{Entity, EntityType};

// Re-export I/O types
pub use io::dxf::{DxfReader, DxfWriter};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_document_creation() {
        let doc = Document::new();
        assert_eq!(doc.layers().count(), 1);
    }
}
