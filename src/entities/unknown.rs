//! Opaque catch-all for object kinds outside the dispatch table.
//!
//! Unknown objects are preserved losslessly: their raw property list is
//! the data, and `synchronize` deliberately leaves it untouched so that
//! reading and re-writing a stream reproduces the pairs byte for byte.

use super::{Entity, EntityCommon};
use crate::error::Result;
use crate::node::{find_code, Property};
use crate::types::{BoundingBox2D, Color, Vector2};

/// An entity whose type name is not in the dispatch table
#[derive(Debug, Clone)]
pub struct Unknown {
    /// Common entity data, read best-effort for display purposes
    pub common: EntityCommon,
    /// The type name exactly as it appeared on the wire
    pub dxf_name: String,
}

impl Unknown {
    /// Create an unknown entity with the given wire type name
    pub fn new(dxf_name: impl Into<String>) -> Self {
        Unknown {
            common: EntityCommon::new(),
            dxf_name: dxf_name.into(),
        }
    }
}

impl Entity for Unknown {
    fn common(&self) -> &EntityCommon {
        &self.common
    }

    fn common_mut(&mut self) -> &mut EntityCommon {
        &mut self.common
    }

    fn type_name(&self) -> &'static str {
        "UNKNOWN"
    }

    fn materialize(&mut self, props: &[Property]) -> Result<()> {
        // Best-effort only: a malformed value in an unknown object must
        // never fail the read
        if let Some(p) = find_code(props, 8) {
            self.common.layer = p.text().to_string();
        }
        if let Some(p) = find_code(props, 62) {
            if let Ok(code) = p.as_i32() {
                self.common.color = Color::from_code(code);
            }
        }
        Ok(())
    }

    fn synchronize(&self, _props: &mut Vec<Property>) {
        // The property list is the source of truth; rewriting anything
        // would break byte-for-byte preservation
    }

    fn invalidate(&mut self) {}

    fn bounds(&self) -> BoundingBox2D {
        BoundingBox2D::EMPTY
    }

    fn hit_test(&self, _point: Vector2) -> bool {
        false
    }
}
