//! Circle entity

use super::{pick_tolerance, read_f64, Entity, EntityCommon};
use crate::error::Result;
use crate::node::{format_float, update_or_add, Property};
use crate::types::{BoundingBox2D, Vector2};

/// A full circle defined by center and radius
#[derive(Debug, Clone)]
pub struct Circle {
    /// Common entity data
    pub common: EntityCommon,
    /// Center point (codes 10/20)
    pub center: Vector2,
    /// Radius (code 40)
    pub radius: f64,
    cached_bounds: Option<BoundingBox2D>,
}

impl Circle {
    /// Create a zero-radius circle at the origin
    pub fn new() -> Self {
        Circle {
            common: EntityCommon::new(),
            center: Vector2::ZERO,
            radius: 0.0,
            cached_bounds: None,
        }
    }

    /// Create a circle from center and radius
    pub fn from_center(center: Vector2, radius: f64) -> Self {
        Circle {
            center,
            radius,
            ..Self::new()
        }
    }

    fn compute_bounds(&self) -> BoundingBox2D {
        if self.radius <= 0.0 {
            return BoundingBox2D::from_point(self.center);
        }
        let r = Vector2::new(self.radius, self.radius);
        BoundingBox2D::new(self.center - r, self.center + r)
    }
}

impl Default for Circle {
    fn default() -> Self {
        Self::new()
    }
}

impl Entity for Circle {
    fn common(&self) -> &EntityCommon {
        &self.common
    }

    fn common_mut(&mut self) -> &mut EntityCommon {
        &mut self.common
    }

    fn type_name(&self) -> &'static str {
        "CIRCLE"
    }

    fn materialize(&mut self, props: &[Property]) -> Result<()> {
        self.common.materialize(props)?;
        read_f64(props, 10, &mut self.center.x)?;
        read_f64(props, 20, &mut self.center.y)?;
        read_f64(props, 40, &mut self.radius)?;
        Ok(())
    }

    fn synchronize(&self, props: &mut Vec<Property>) {
        self.common.synchronize(props);
        update_or_add(props, 10, format_float(self.center.x));
        update_or_add(props, 20, format_float(self.center.y));
        update_or_add(props, 40, format_float(self.radius));
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
        // On the stroke, not inside the disc
        (point.distance(&self.center) - self.radius).abs() <= pick_tolerance(self.radius)
    }
}
