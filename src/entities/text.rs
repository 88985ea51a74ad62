//! Single-line text entity

use super::{read_f64, read_i32, read_string, sync_optional, Entity, EntityCommon};
use crate::error::Result;
use crate::node::{format_float, update_or_add, Property};
use crate::types::{BoundingBox2D, Vector2};

/// A single line of text
#[derive(Debug, Clone)]
pub struct Text {
    /// Common entity data
    pub common: EntityCommon,
    /// The text value (code 1)
    pub value: String,
    /// Insertion point (codes 10/20)
    pub insertion: Vector2,
    /// Text height (code 40)
    pub height: f64,
    /// Rotation angle in degrees (code 50)
    pub rotation: f64,
    /// Relative width scale factor (code 41)
    pub width_factor: f64,
    /// Oblique (slant) angle in degrees (code 51)
    pub oblique_angle: f64,
    /// Text style name (code 7)
    pub style: String,
    /// Generation flags: mirrored in X/Y (code 71)
    pub generation_flags: i32,
    /// Horizontal alignment (code 72)
    pub horizontal_alignment: i32,
    /// Vertical alignment (code 73)
    pub vertical_alignment: i32,
    /// Second alignment point (codes 11/21)
    pub alignment_point: Vector2,
}

impl Text {
    /// Create an empty text entity
    pub fn new() -> Self {
        Text {
            common: EntityCommon::new(),
            value: String::new(),
            insertion: Vector2::ZERO,
            height: 1.0,
            rotation: 0.0,
            width_factor: 1.0,
            oblique_angle: 0.0,
            style: "STANDARD".to_string(),
            generation_flags: 0,
            horizontal_alignment: 0,
            vertical_alignment: 0,
            alignment_point: Vector2::ZERO,
        }
    }

    /// Create a text entity at a point
    pub fn at(insertion: Vector2, value: impl Into<String>) -> Self {
        Text {
            insertion,
            value: value.into(),
            ..Self::new()
        }
    }

    /// Approximate rendered width from character count.
    ///
    /// The real width depends on the style's font metrics, which live
    /// outside the document; this estimate only feeds bounds and picking.
    fn approximate_width(&self) -> f64 {
        self.value.chars().count() as f64 * self.height * self.width_factor * 0.6
    }
}

impl Default for Text {
    fn default() -> Self {
        Self::new()
    }
}

impl Entity for Text {
    fn common(&self) -> &EntityCommon {
        &self.common
    }

    fn common_mut(&mut self) -> &mut EntityCommon {
        &mut self.common
    }

    fn type_name(&self) -> &'static str {
        "TEXT"
    }

    fn materialize(&mut self, props: &[Property]) -> Result<()> {
        self.common.materialize(props)?;
        read_string(props, 1, &mut self.value);
        read_f64(props, 10, &mut self.insertion.x)?;
        read_f64(props, 20, &mut self.insertion.y)?;
        read_f64(props, 40, &mut self.height)?;
        read_f64(props, 50, &mut self.rotation)?;
        read_f64(props, 41, &mut self.width_factor)?;
        read_f64(props, 51, &mut self.oblique_angle)?;
        read_string(props, 7, &mut self.style);
        read_i32(props, 71, &mut self.generation_flags)?;
        read_i32(props, 72, &mut self.horizontal_alignment)?;
        read_i32(props, 73, &mut self.vertical_alignment)?;
        read_f64(props, 11, &mut self.alignment_point.x)?;
        read_f64(props, 21, &mut self.alignment_point.y)?;
        Ok(())
    }

    fn synchronize(&self, props: &mut Vec<Property>) {
        self.common.synchronize(props);
        update_or_add(props, 1, self.value.clone());
        update_or_add(props, 10, format_float(self.insertion.x));
        update_or_add(props, 20, format_float(self.insertion.y));
        update_or_add(props, 40, format_float(self.height));
        sync_optional(props, 50, format_float(self.rotation), self.rotation == 0.0);
        sync_optional(props, 41, format_float(self.width_factor), self.width_factor == 1.0);
        sync_optional(props, 51, format_float(self.oblique_angle), self.oblique_angle == 0.0);
        sync_optional(props, 7, self.style.clone(), self.style == "STANDARD");
        sync_optional(props, 71, self.generation_flags.to_string(), self.generation_flags == 0);
        sync_optional(props, 72, self.horizontal_alignment.to_string(), self.horizontal_alignment == 0);
        sync_optional(props, 73, self.vertical_alignment.to_string(), self.vertical_alignment == 0);
        sync_optional(props, 11, format_float(self.alignment_point.x), self.alignment_point == Vector2::ZERO);
        sync_optional(props, 21, format_float(self.alignment_point.y), self.alignment_point == Vector2::ZERO);
    }

    fn invalidate(&mut self) {}

    fn bounds(&self) -> BoundingBox2D {
        let mut bbox = BoundingBox2D::from_point(self.insertion);
        bbox.expand_to_include(
            self.insertion + Vector2::new(self.approximate_width(), self.height),
        );
        bbox
    }

    fn hit_test(&self, point: Vector2) -> bool {
        self.bounds().contains(point)
    }
}
