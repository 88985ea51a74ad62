//! Shared value types: vectors, bounding boxes, colors

pub mod bounds;
pub mod color;
pub mod vector;

pub use bounds::BoundingBox2D;
pub use color::{aci_index, aci_rgb, Color, Rgb};
pub use vector::Vector2;
