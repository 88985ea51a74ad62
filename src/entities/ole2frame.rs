//! Embedded OLE frame entity

use super::{read_f64, read_string, sync_optional, Entity, EntityCommon};
use crate::error::Result;
use crate::node::{format_float, update_or_add, Property};
use crate::types::{BoundingBox2D, Vector2};

/// A frame holding an embedded foreign object.
///
/// The embedded payload is opaque; only the placement rectangle is typed.
#[derive(Debug, Clone)]
pub struct Ole2Frame {
    /// Common entity data
    pub common: EntityCommon,
    /// Insertion point (codes 10/20)
    pub insertion: Vector2,
    /// Frame width (code 40)
    pub width: f64,
    /// Frame height (code 41)
    pub height: f64,
    /// Rotation in degrees (code 50)
    pub rotation: f64,
    /// Description of the embedded object kind (code 1)
    pub object_type: String,
}

impl Ole2Frame {
    /// Create an empty frame
    pub fn new() -> Self {
        Ole2Frame {
            common: EntityCommon::new(),
            insertion: Vector2::ZERO,
            width: 0.0,
            height: 0.0,
            rotation: 0.0,
            object_type: String::new(),
        }
    }
}

impl Default for Ole2Frame {
    fn default() -> Self {
        Self::new()
    }
}

impl Entity for Ole2Frame {
    fn common(&self) -> &EntityCommon {
        &self.common
    }

    fn common_mut(&mut self) -> &mut EntityCommon {
        &mut self.common
    }

    fn type_name(&self) -> &'static str {
        "OLE2FRAME"
    }

    fn materialize(&mut self, props: &[Property]) -> Result<()> {
        self.common.materialize(props)?;
        read_f64(props, 10, &mut self.insertion.x)?;
        read_f64(props, 20, &mut self.insertion.y)?;
        read_f64(props, 40, &mut self.width)?;
        read_f64(props, 41, &mut self.height)?;
        read_f64(props, 50, &mut self.rotation)?;
        read_string(props, 1, &mut self.object_type);
        Ok(())
    }

    fn synchronize(&self, props: &mut Vec<Property>) {
        self.common.synchronize(props);
        update_or_add(props, 10, format_float(self.insertion.x));
        update_or_add(props, 20, format_float(self.insertion.y));
        update_or_add(props, 40, format_float(self.width));
        update_or_add(props, 41, format_float(self.height));
        sync_optional(props, 50, format_float(self.rotation), self.rotation == 0.0);
        sync_optional(props, 1, self.object_type.clone(), self.object_type.is_empty());
    }

    fn invalidate(&mut self) {}

    fn bounds(&self) -> BoundingBox2D {
        let mut bbox = BoundingBox2D::from_point(self.insertion);
        bbox.expand_to_include(self.insertion + Vector2::new(self.width, self.height));
        bbox
    }

    fn hit_test(&self, point: Vector2) -> bool {
        self.bounds().contains(point)
    }
}
