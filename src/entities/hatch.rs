//! Hatch entity

use super::{read_f64, read_string, sync_optional, Entity, EntityCommon};
use crate::error::Result;
use crate::node::{format_float, update_or_add, Property};
use crate::types::{BoundingBox2D, Vector2};

/// A hatch fill described by its pattern
#[derive(Debug, Clone)]
pub struct Hatch {
    /// Common entity data
    pub common: EntityCommon,
    /// Pattern name (code 2)
    pub pattern_name: String,
    /// Elevation point (codes 10/20)
    pub elevation: Vector2,
    /// Pattern scale (code 41)
    pub pattern_scale: f64,
    /// Pattern angle in degrees (code 52)
    pub pattern_angle: f64,
}

impl Hatch {
    /// Create a solid hatch at the origin
    pub fn new() -> Self {
        Hatch {
            common: EntityCommon::new(),
            pattern_name: "SOLID".to_string(),
            elevation: Vector2::ZERO,
            pattern_scale: 1.0,
            pattern_angle: 0.0,
        }
    }
}

impl Default for Hatch {
    fn default() -> Self {
        Self::new()
    }
}

impl Entity for Hatch {
    fn common(&self) -> &EntityCommon {
        &self.common
    }

    fn common_mut(&mut self) -> &mut EntityCommon {
        &mut self.common
    }

    fn type_name(&self) -> &'static str {
        "HATCH"
    }

    fn materialize(&mut self, props: &[Property]) -> Result<()> {
        self.common.materialize(props)?;
        read_string(props, 2, &mut self.pattern_name);
        read_f64(props, 10, &mut self.elevation.x)?;
        read_f64(props, 20, &mut self.elevation.y)?;
        read_f64(props, 41, &mut self.pattern_scale)?;
        read_f64(props, 52, &mut self.pattern_angle)?;
        Ok(())
    }

    fn synchronize(&self, props: &mut Vec<Property>) {
        self.common.synchronize(props);
        update_or_add(props, 2, self.pattern_name.clone());
        sync_optional(props, 10, format_float(self.elevation.x), self.elevation == Vector2::ZERO);
        sync_optional(props, 20, format_float(self.elevation.y), self.elevation == Vector2::ZERO);
        sync_optional(props, 41, format_float(self.pattern_scale), self.pattern_scale == 1.0);
        sync_optional(props, 52, format_float(self.pattern_angle), self.pattern_angle == 0.0);
    }

    fn invalidate(&mut self) {}

    fn bounds(&self) -> BoundingBox2D {
        // The boundary loops stay in the raw property list; only the
        // elevation point is available as typed geometry
        BoundingBox2D::from_point(self.elevation)
    }

    fn hit_test(&self, _point: Vector2) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_materialize_and_synchronize() {
        let props = vec![
            Property::new(0, "HATCH"),
            Property::new(2, "ANSI31"),
            Property::new(41, "2.0"),
            Property::new(52, "45.0"),
        ];
        let mut hatch = Hatch::new();
        hatch.materialize(&props).unwrap();
        assert_eq!(hatch.pattern_name, "ANSI31");
        assert_eq!(hatch.pattern_scale, 2.0);
        assert_eq!(hatch.pattern_angle, 45.0);

        let mut out = vec![Property::new(0, "HATCH")];
        hatch.synchronize(&mut out);
        assert!(out.contains(&Property::new(2, "ANSI31")));
        assert!(out.contains(&Property::new(52, "45.0")));
    }
}
