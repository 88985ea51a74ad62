//! Filled quadrilateral entity (SOLID / TRACE)

use super::{point_in_polygon, read_f64, Entity, EntityCommon};
use crate::error::Result;
use crate::node::{format_float, update_or_add, Property};
use crate::types::{BoundingBox2D, Vector2};

/// A filled quadrilateral.
///
/// Corners 3 and 4 arrive swapped on the wire (the format orders them
/// 1-2-4-3), so [`outline`](Trace::outline) re-orders them for geometry.
#[derive(Debug, Clone)]
pub struct Trace {
    /// Common entity data
    pub common: EntityCommon,
    /// First corner (codes 10/20)
    pub corner1: Vector2,
    /// Second corner (codes 11/21)
    pub corner2: Vector2,
    /// Third corner (codes 12/22)
    pub corner3: Vector2,
    /// Fourth corner (codes 13/23)
    pub corner4: Vector2,
}

impl Trace {
    /// Create a degenerate quad at the origin
    pub fn new() -> Self {
        Trace {
            common: EntityCommon::new(),
            corner1: Vector2::ZERO,
            corner2: Vector2::ZERO,
            corner3: Vector2::ZERO,
            corner4: Vector2::ZERO,
        }
    }

    /// The corners in perimeter order
    pub fn outline(&self) -> [Vector2; 4] {
        [self.corner1, self.corner2, self.corner4, self.corner3]
    }
}

impl Default for Trace {
    fn default() -> Self {
        Self::new()
    }
}

impl Entity for Trace {
    fn common(&self) -> &EntityCommon {
        &self.common
    }

    fn common_mut(&mut self) -> &mut EntityCommon {
        &mut self.common
    }

    fn type_name(&self) -> &'static str {
        "SOLID"
    }

    fn materialize(&mut self, props: &[Property]) -> Result<()> {
        self.common.materialize(props)?;
        read_f64(props, 10, &mut self.corner1.x)?;
        read_f64(props, 20, &mut self.corner1.y)?;
        read_f64(props, 11, &mut self.corner2.x)?;
        read_f64(props, 21, &mut self.corner2.y)?;
        read_f64(props, 12, &mut self.corner3.x)?;
        read_f64(props, 22, &mut self.corner3.y)?;
        read_f64(props, 13, &mut self.corner4.x)?;
        read_f64(props, 23, &mut self.corner4.y)?;
        Ok(())
    }

    fn synchronize(&self, props: &mut Vec<Property>) {
        self.common.synchronize(props);
        update_or_add(props, 10, format_float(self.corner1.x));
        update_or_add(props, 20, format_float(self.corner1.y));
        update_or_add(props, 11, format_float(self.corner2.x));
        update_or_add(props, 21, format_float(self.corner2.y));
        update_or_add(props, 12, format_float(self.corner3.x));
        update_or_add(props, 22, format_float(self.corner3.y));
        update_or_add(props, 13, format_float(self.corner4.x));
        update_or_add(props, 23, format_float(self.corner4.y));
    }

    fn invalidate(&mut self) {}

    fn bounds(&self) -> BoundingBox2D {
        BoundingBox2D::from_points(&self.outline()).unwrap_or_default()
    }

    fn hit_test(&self, point: Vector2) -> bool {
        point_in_polygon(point, &self.outline())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_quad() -> Trace {
        let mut trace = Trace::new();
        trace.corner1 = Vector2::new(0.0, 0.0);
        trace.corner2 = Vector2::new(10.0, 0.0);
        trace.corner3 = Vector2::new(0.0, 10.0);
        trace.corner4 = Vector2::new(10.0, 10.0);
        trace
    }

    #[test]
    fn test_materialize() {
        let props = vec![
            Property::new(0, "SOLID"),
            Property::new(10, "0.0"),
            Property::new(20, "0.0"),
            Property::new(11, "4.0"),
            Property::new(21, "0.0"),
            Property::new(12, "0.0"),
            Property::new(22, "4.0"),
            Property::new(13, "4.0"),
            Property::new(23, "4.0"),
        ];
        let mut trace = Trace::new();
        trace.materialize(&props).unwrap();
        assert_eq!(trace.corner4, Vector2::new(4.0, 4.0));
    }

    #[test]
    fn test_fill_hit() {
        let trace = unit_quad();
        // Interior, not just the stroke
        assert!(trace.hit_test(Vector2::new(5.0, 5.0)));
        assert!(!trace.hit_test(Vector2::new(15.0, 5.0)));
    }

    #[test]
    fn test_bounds() {
        let bbox = unit_quad().bounds();
        assert_eq!(bbox.max, Vector2::new(10.0, 10.0));
    }
}
