//! Dimension entity

use super::{read_f64, read_i32, read_string, sync_optional, Entity, EntityCommon};
use crate::error::Result;
use crate::node::{format_float, update_or_add, Property};
use crate::types::{BoundingBox2D, Vector2};

/// A dimension annotation.
///
/// Only the linear measurement points are carried as typed fields; style
/// resolution and measured-value formatting are renderer concerns.
#[derive(Debug, Clone)]
pub struct Dimension {
    /// Common entity data
    pub common: EntityCommon,
    /// Dimension line definition point (codes 10/20)
    pub definition_point: Vector2,
    /// Middle point of the dimension text (codes 11/21)
    pub text_midpoint: Vector2,
    /// First extension line origin (codes 13/23)
    pub extension_point1: Vector2,
    /// Second extension line origin (codes 14/24)
    pub extension_point2: Vector2,
    /// Text override; empty means the measured value (code 1)
    pub text: String,
    /// Dimension type flags (code 70)
    pub dimension_type: i32,
    /// Text height (code 140)
    pub text_height: f64,
}

impl Dimension {
    /// Create an empty dimension
    pub fn new() -> Self {
        Dimension {
            common: EntityCommon::new(),
            definition_point: Vector2::ZERO,
            text_midpoint: Vector2::ZERO,
            extension_point1: Vector2::ZERO,
            extension_point2: Vector2::ZERO,
            text: String::new(),
            dimension_type: 0,
            text_height: 2.5,
        }
    }

    /// The measured length between the extension line origins
    pub fn measurement(&self) -> f64 {
        self.extension_point1.distance(&self.extension_point2)
    }
}

impl Default for Dimension {
    fn default() -> Self {
        Self::new()
    }
}

impl Entity for Dimension {
    fn common(&self) -> &EntityCommon {
        &self.common
    }

    fn common_mut(&mut self) -> &mut EntityCommon {
        &mut self.common
    }

    fn type_name(&self) -> &'static str {
        "DIMENSION"
    }

    fn materialize(&mut self, props: &[Property]) -> Result<()> {
        self.common.materialize(props)?;
        read_f64(props, 10, &mut self.definition_point.x)?;
        read_f64(props, 20, &mut self.definition_point.y)?;
        read_f64(props, 11, &mut self.text_midpoint.x)?;
        read_f64(props, 21, &mut self.text_midpoint.y)?;
        read_f64(props, 13, &mut self.extension_point1.x)?;
        read_f64(props, 23, &mut self.extension_point1.y)?;
        read_f64(props, 14, &mut self.extension_point2.x)?;
        read_f64(props, 24, &mut self.extension_point2.y)?;
        read_string(props, 1, &mut self.text);
        read_i32(props, 70, &mut self.dimension_type)?;
        read_f64(props, 140, &mut self.text_height)?;
        Ok(())
    }

    fn synchronize(&self, props: &mut Vec<Property>) {
        self.common.synchronize(props);
        update_or_add(props, 10, format_float(self.definition_point.x));
        update_or_add(props, 20, format_float(self.definition_point.y));
        sync_optional(props, 11, format_float(self.text_midpoint.x), self.text_midpoint == Vector2::ZERO);
        sync_optional(props, 21, format_float(self.text_midpoint.y), self.text_midpoint == Vector2::ZERO);
        sync_optional(props, 13, format_float(self.extension_point1.x), self.extension_point1 == Vector2::ZERO);
        sync_optional(props, 23, format_float(self.extension_point1.y), self.extension_point1 == Vector2::ZERO);
        sync_optional(props, 14, format_float(self.extension_point2.x), self.extension_point2 == Vector2::ZERO);
        sync_optional(props, 24, format_float(self.extension_point2.y), self.extension_point2 == Vector2::ZERO);
        sync_optional(props, 1, self.text.clone(), self.text.is_empty());
        sync_optional(props, 70, self.dimension_type.to_string(), self.dimension_type == 0);
        sync_optional(props, 140, format_float(self.text_height), self.text_height == 2.5);
    }

    fn invalidate(&mut self) {}

    fn bounds(&self) -> BoundingBox2D {
        BoundingBox2D::from_points(&[
            self.definition_point,
            self.text_midpoint,
            self.extension_point1,
            self.extension_point2,
        ])
        .unwrap_or_default()
    }

    fn hit_test(&self, point: Vector2) -> bool {
        self.bounds().contains(point)
    }
}
