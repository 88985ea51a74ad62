//! Line entity

use super::{pick_tolerance, read_f64, Entity, EntityCommon};
use crate::error::Result;
use crate::node::{format_float, update_or_add, Property};
use crate::types::{BoundingBox2D, Vector2};

/// A line segment between two points
#[derive(Debug, Clone)]
pub struct Line {
    /// Common entity data
    pub common: EntityCommon,
    /// Start point (codes 10/20)
    pub start: Vector2,
    /// End point (codes 11/21)
    pub end: Vector2,
    cached_bounds: Option<BoundingBox2D>,
}

impl Line {
    /// Create a degenerate line at the origin
    pub fn new() -> Self {
        Line {
            common: EntityCommon::new(),
            start: Vector2::ZERO,
            end: Vector2::ZERO,
            cached_bounds: None,
        }
    }

    /// Create a line between two points
    pub fn from_points(start: Vector2, end: Vector2) -> Self {
        Line {
            start,
            end,
            ..Self::new()
        }
    }

    /// Length of the segment
    pub fn length(&self) -> f64 {
        self.start.distance(&self.end)
    }

    /// Midpoint of the segment
    pub fn midpoint(&self) -> Vector2 {
        (self.start + self.end) / 2.0
    }

    fn compute_bounds(&self) -> BoundingBox2D {
        let mut bbox = BoundingBox2D::from_point(self.start);
        bbox.expand_to_include(self.end);
        bbox
    }
}

impl Default for Line {
    fn default() -> Self {
        Self::new()
    }
}

impl Entity for Line {
    fn common(&self) -> &EntityCommon {
        &self.common
    }

    fn common_mut(&mut self) -> &mut EntityCommon {
        &mut self.common
    }

    fn type_name(&self) -> &'static str {
        "LINE"
    }

    fn materialize(&mut self, props: &[Property]) -> Result<()> {
        self.common.materialize(props)?;
        read_f64(props, 10, &mut self.start.x)?;
        read_f64(props, 20, &mut self.start.y)?;
        read_f64(props, 11, &mut self.end.x)?;
        read_f64(props, 21, &mut self.end.y)?;
        Ok(())
    }

    fn synchronize(&self, props: &mut Vec<Property>) {
        self.common.synchronize(props);
        update_or_add(props, 10, format_float(self.start.x));
        update_or_add(props, 20, format_float(self.start.y));
        update_or_add(props, 11, format_float(self.end.x));
        update_or_add(props, 21, format_float(self.end.y));
    }

    fn invalidate(&mut self) {
        self.cached_bounds = Some(self.compute_bounds());
    }

    fn bounds(&self) -> BoundingBox2D {
        self.cached_bounds.unwrap_or_else(|| self.compute_bounds())
    }

    fn hit_test(&self, point: Vector2) -> bool {
        point.distance_to_segment(self.start, self.end) <= pick_tolerance(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_materialize() {
        let props = vec![
            Property::new(0, "LINE"),
            Property::new(10, "1.5"),
            Property::new(20, "2.5"),
            Property::new(11, "10.0"),
            Property::new(21, "2.5"),
        ];
        let mut line = Line::new();
        line.materialize(&props).unwrap();
        assert_eq!(line.start, Vector2::new(1.5, 2.5));
        assert_eq!(line.end, Vector2::new(10.0, 2.5));
        assert_eq!(line.length(), 8.5);
    }

    #[test]
    fn test_materialize_missing_codes_keep_defaults() {
        let props = vec![Property::new(0, "LINE"), Property::new(10, "4.0")];
        let mut line = Line::new();
        line.materialize(&props).unwrap();
        assert_eq!(line.start, Vector2::new(4.0, 0.0));
        assert_eq!(line.end, Vector2::ZERO);
    }

    #[test]
    fn test_materialize_bad_value_keeps_earlier_fields() {
        let props = vec![
            Property::new(10, "3.0"),
            Property::new(20, "oops"),
        ];
        let mut line = Line::new();
        assert!(line.materialize(&props).is_err());
        // The field parsed before the failure survives
        assert_eq!(line.start.x, 3.0);
    }

    #[test]
    fn test_synchronize() {
        let mut props = vec![Property::new(0, "LINE")];
        let line = Line::from_points(Vector2::new(0.0, 0.0), Vector2::new(3.0, 4.0));
        line.synchronize(&mut props);
        assert!(props.contains(&Property::new(11, "3.0")));
        assert!(props.contains(&Property::new(21, "4.0")));
        // The kind pair is untouched
        assert_eq!(props[0], Property::new(0, "LINE"));
    }

    #[test]
    fn test_bounds_and_hit() {
        let line = Line::from_points(Vector2::new(0.0, 0.0), Vector2::new(10.0, 0.0));
        let bbox = line.bounds();
        assert_eq!(bbox.min, Vector2::ZERO);
        assert_eq!(bbox.max, Vector2::new(10.0, 0.0));
        assert!(line.hit_test(Vector2::new(5.0, 0.5)));
        assert!(!line.hit_test(Vector2::new(5.0, 5.0)));
    }
}
