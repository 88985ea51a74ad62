//! Raster image entity

use super::{read_f64, read_string, sync_optional, Entity, EntityCommon};
use crate::error::Result;
use crate::node::{format_float, update_or_add, Property};
use crate::types::{BoundingBox2D, Vector2};

/// A placed raster image.
///
/// The image plane is spanned by the u/v pixel vectors; the pixel data
/// itself lives outside the document and is referenced by path.
#[derive(Debug, Clone)]
pub struct RasterImage {
    /// Common entity data
    pub common: EntityCommon,
    /// Insertion point, lower-left corner (codes 10/20)
    pub insertion: Vector2,
    /// Single-pixel step along image X (codes 11/21)
    pub u_vector: Vector2,
    /// Single-pixel step along image Y (codes 12/22)
    pub v_vector: Vector2,
    /// Image size in pixels (codes 13/23)
    pub size: Vector2,
    /// Path to the image file (code 1)
    pub path: String,
}

impl RasterImage {
    /// Create an empty image placement
    pub fn new() -> Self {
        RasterImage {
            common: EntityCommon::new(),
            insertion: Vector2::ZERO,
            u_vector: Vector2::UNIT_X,
            v_vector: Vector2::UNIT_Y,
            size: Vector2::ZERO,
            path: String::new(),
        }
    }

    /// The four corners of the placed image in drawing space
    pub fn corners(&self) -> [Vector2; 4] {
        let u = self.u_vector * self.size.x;
        let v = self.v_vector * self.size.y;
        [
            self.insertion,
            self.insertion + u,
            self.insertion + u + v,
            self.insertion + v,
        ]
    }
}

impl Default for RasterImage {
    fn default() -> Self {
        Self::new()
    }
}

impl Entity for RasterImage {
    fn common(&self) -> &EntityCommon {
        &self.common
    }

    fn common_mut(&mut self) -> &mut EntityCommon {
        &mut self.common
    }

    fn type_name(&self) -> &'static str {
        "IMAGE"
    }

    fn materialize(&mut self, props: &[Property]) -> Result<()> {
        self.common.materialize(props)?;
        read_f64(props, 10, &mut self.insertion.x)?;
        read_f64(props, 20, &mut self.insertion.y)?;
        read_f64(props, 11, &mut self.u_vector.x)?;
        read_f64(props, 21, &mut self.u_vector.y)?;
        read_f64(props, 12, &mut self.v_vector.x)?;
        read_f64(props, 22, &mut self.v_vector.y)?;
        read_f64(props, 13, &mut self.size.x)?;
        read_f64(props, 23, &mut self.size.y)?;
        read_string(props, 1, &mut self.path);
        Ok(())
    }

    fn synchronize(&self, props: &mut Vec<Property>) {
        self.common.synchronize(props);
        update_or_add(props, 10, format_float(self.insertion.x));
        update_or_add(props, 20, format_float(self.insertion.y));
        sync_optional(props, 11, format_float(self.u_vector.x), self.u_vector == Vector2::UNIT_X);
        sync_optional(props, 21, format_float(self.u_vector.y), self.u_vector == Vector2::UNIT_X);
        sync_optional(props, 12, format_float(self.v_vector.x), self.v_vector == Vector2::UNIT_Y);
        sync_optional(props, 22, format_float(self.v_vector.y), self.v_vector == Vector2::UNIT_Y);
        update_or_add(props, 13, format_float(self.size.x));
        update_or_add(props, 23, format_float(self.size.y));
        sync_optional(props, 1, self.path.clone(), self.path.is_empty());
    }

    fn invalidate(&mut self) {}

    fn bounds(&self) -> BoundingBox2D {
        BoundingBox2D::from_points(&self.corners()).unwrap_or_default()
    }

    fn hit_test(&self, point: Vector2) -> bool {
        self.bounds().contains(point)
    }
}
