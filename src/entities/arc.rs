//! Arc entity

use super::{pick_tolerance, read_f64, Entity, EntityCommon};
use crate::error::Result;
use crate::node::{format_float, update_or_add, Property};
use crate::types::{BoundingBox2D, Vector2};

/// A circular arc swept counterclockwise from start to end angle
#[derive(Debug, Clone)]
pub struct Arc {
    /// Common entity data
    pub common: EntityCommon,
    /// Center point (codes 10/20)
    pub center: Vector2,
    /// Radius (code 40)
    pub radius: f64,
    /// Start angle in degrees (code 50)
    pub start_angle: f64,
    /// End angle in degrees (code 51)
    pub end_angle: f64,
    cached_bounds: Option<BoundingBox2D>,
}

impl Arc {
    /// Create a zero-radius arc at the origin
    pub fn new() -> Self {
        Arc {
            common: EntityCommon::new(),
            center: Vector2::ZERO,
            radius: 0.0,
            start_angle: 0.0,
            end_angle: 360.0,
            cached_bounds: None,
        }
    }

    /// Point on the arc at the given angle (degrees)
    pub fn point_at(&self, angle_deg: f64) -> Vector2 {
        let rad = angle_deg.to_radians();
        self.center + Vector2::new(rad.cos(), rad.sin()) * self.radius
    }

    /// Whether `angle_deg` falls inside the counterclockwise sweep
    pub fn contains_angle(&self, angle_deg: f64) -> bool {
        let a = angle_deg.rem_euclid(360.0);
        let start = self.start_angle.rem_euclid(360.0);
        let end = self.end_angle.rem_euclid(360.0);
        if start <= end {
            a >= start && a <= end
        } else {
            a >= start || a <= end
        }
    }

    fn compute_bounds(&self) -> BoundingBox2D {
        if self.radius <= 0.0 {
            return BoundingBox2D::from_point(self.center);
        }
        // Endpoints always bound the arc; a quadrant extreme joins only when
        // the sweep crosses it
        let mut bbox = BoundingBox2D::from_point(self.point_at(self.start_angle));
        bbox.expand_to_include(self.point_at(self.end_angle));
        for quadrant in [0.0, 90.0, 180.0, 270.0] {
            if self.contains_angle(quadrant) {
                bbox.expand_to_include(self.point_at(quadrant));
            }
        }
        bbox
    }
}

impl Default for Arc {
    fn default() -> Self {
        Self::new()
    }
}

impl Entity for Arc {
    fn common(&self) -> &EntityCommon {
        &self.common
    }

    fn common_mut(&mut self) -> &mut EntityCommon {
        &mut self.common
    }

    fn type_name(&self) -> &'static str {
        "ARC"
    }

    fn materialize(&mut self, props: &[Property]) -> Result<()> {
        self.common.materialize(props)?;
        read_f64(props, 10, &mut self.center.x)?;
        read_f64(props, 20, &mut self.center.y)?;
        read_f64(props, 40, &mut self.radius)?;
        read_f64(props, 50, &mut self.start_angle)?;
        read_f64(props, 51, &mut self.end_angle)?;
        Ok(())
    }

    fn synchronize(&self, props: &mut Vec<Property>) {
        self.common.synchronize(props);
        update_or_add(props, 10, format_float(self.center.x));
        update_or_add(props, 20, format_float(self.center.y));
        update_or_add(props, 40, format_float(self.radius));
        update_or_add(props, 50, format_float(self.start_angle));
        update_or_add(props, 51, format_float(self.end_angle));
    }

    fn invalidate(&mut self) {
        self.cached_bounds = Some(self.compute_bounds());
    }

    fn bounds(&self) -> BoundingBox2D {
        self.cached_bounds.unwrap_or_else(|| self.compute_bounds())
    }

    fn hit_test(&self, point: Vector2) -> bool {
        if self.radius <= 0.0 {
            return false;
        }
        let offset = point - self.center;
        if (offset.length() - self.radius).abs() > pick_tolerance(self.radius) {
            return false;
        }
        self.contains_angle(offset.y.atan2(offset.x).to_degrees())
    }
}
