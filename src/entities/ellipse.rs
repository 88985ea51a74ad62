//! Ellipse entity

use super::{pick_tolerance, read_f64, sync_optional, Entity, EntityCommon};
use crate::error::Result;
use crate::node::{format_float, update_or_add, Property};
use crate::types::{BoundingBox2D, Vector2};

/// An ellipse defined by its center, major-axis endpoint and axis ratio
#[derive(Debug, Clone)]
pub struct Ellipse {
    /// Common entity data
    pub common: EntityCommon,
    /// Center point (codes 10/20)
    pub center: Vector2,
    /// Endpoint of the major axis, relative to the center (codes 11/21)
    pub major_axis: Vector2,
    /// Minor-to-major axis length ratio (code 40)
    pub ratio: f64,
    /// Start parameter in radians (code 41); 0 for a full ellipse
    pub start_param: f64,
    /// End parameter in radians (code 42); 2π for a full ellipse
    pub end_param: f64,
}

impl Ellipse {
    /// Create a degenerate ellipse at the origin
    pub fn new() -> Self {
        Ellipse {
            common: EntityCommon::new(),
            center: Vector2::ZERO,
            major_axis: Vector2::UNIT_X,
            ratio: 1.0,
            start_param: 0.0,
            end_param: std::f64::consts::TAU,
        }
    }

    /// The minor half-axis vector (major axis rotated 90°, scaled by ratio)
    pub fn minor_axis(&self) -> Vector2 {
        Vector2::new(-self.major_axis.y, self.major_axis.x) * self.ratio
    }
}

impl Default for Ellipse {
    fn default() -> Self {
        Self::new()
    }
}

impl Entity for Ellipse {
    fn common(&self) -> &EntityCommon {
        &self.common
    }

    fn common_mut(&mut self) -> &mut EntityCommon {
        &mut self.common
    }

    fn type_name(&self) -> &'static str {
        "ELLIPSE"
    }

    fn materialize(&mut self, props: &[Property]) -> Result<()> {
        self.common.materialize(props)?;
        read_f64(props, 10, &mut self.center.x)?;
        read_f64(props, 20, &mut self.center.y)?;
        read_f64(props, 11, &mut self.major_axis.x)?;
        read_f64(props, 21, &mut self.major_axis.y)?;
        read_f64(props, 40, &mut self.ratio)?;
        read_f64(props, 41, &mut self.start_param)?;
        read_f64(props, 42, &mut self.end_param)?;
        Ok(())
    }

    fn synchronize(&self, props: &mut Vec<Property>) {
        self.common.synchronize(props);
        update_or_add(props, 10, format_float(self.center.x));
        update_or_add(props, 20, format_float(self.center.y));
        update_or_add(props, 11, format_float(self.major_axis.x));
        update_or_add(props, 21, format_float(self.major_axis.y));
        update_or_add(props, 40, format_float(self.ratio));
        sync_optional(props, 41, format_float(self.start_param), self.start_param == 0.0);
        sync_optional(
            props,
            42,
            format_float(self.end_param),
            self.end_param == std::f64::consts::TAU,
        );
    }

    fn invalidate(&mut self) {}

    fn bounds(&self) -> BoundingBox2D {
        // Extents of the full ellipse from its two half-axis vectors
        let minor = self.minor_axis();
        let extent = Vector2::new(
            (self.major_axis.x * self.major_axis.x + minor.x * minor.x).sqrt(),
            (self.major_axis.y * self.major_axis.y + minor.y * minor.y).sqrt(),
        );
        BoundingBox2D::new(self.center - extent, self.center + extent)
    }

    fn hit_test(&self, point: Vector2) -> bool {
        let a = self.major_axis.length();
        if a <= 0.0 || self.ratio <= 0.0 {
            return false;
        }
        let b = a * self.ratio;
        let u = self.major_axis / a;
        let offset = point - self.center;
        let local = Vector2::new(offset.dot(&u), offset.cross(&u).abs());
        // Radial distance from the curve, in normalized ellipse space
        let normalized = ((local.x / a).powi(2) + (local.y / b).powi(2)).sqrt();
        (normalized - 1.0).abs() * b <= pick_tolerance(a)
    }
}
