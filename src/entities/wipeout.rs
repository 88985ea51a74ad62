//! Wipeout (masking polygon) entity

use super::{point_in_polygon, read_point_list, sync_optional, Entity, EntityCommon};
use crate::error::Result;
use crate::node::{find_code, format_float, remove_codes, Property};
use crate::types::{BoundingBox2D, Vector2};

/// A polygon that masks whatever lies beneath it
#[derive(Debug, Clone)]
pub struct Wipeout {
    /// Common entity data
    pub common: EntityCommon,
    /// Boundary vertices in order, repeated codes 10/20
    pub vertices: Vec<Vector2>,
    /// Whether the boundary frame is drawn (code 290)
    pub show_frame: bool,
    cached_bounds: Option<BoundingBox2D>,
}

impl Wipeout {
    /// Create an empty wipeout
    pub fn new() -> Self {
        Wipeout {
            common: EntityCommon::new(),
            vertices: Vec::new(),
            show_frame: true,
            cached_bounds: None,
        }
    }

    fn compute_bounds(&self) -> BoundingBox2D {
        BoundingBox2D::from_points(&self.vertices).unwrap_or_default()
    }
}

impl Default for Wipeout {
    fn default() -> Self {
        Self::new()
    }
}

impl Entity for Wipeout {
    fn common(&self) -> &EntityCommon {
        &self.common
    }

    fn common_mut(&mut self) -> &mut EntityCommon {
        &mut self.common
    }

    fn type_name(&self) -> &'static str {
        "WIPEOUT"
    }

    fn materialize(&mut self, props: &[Property]) -> Result<()> {
        self.common.materialize(props)?;
        let vertices = read_point_list(props, 10, 20)?;
        if !vertices.is_empty() {
            self.vertices = vertices;
        }
        if let Some(p) = find_code(props, 290) {
            self.show_frame = p.as_i32()? != 0;
        }
        Ok(())
    }

    fn synchronize(&self, props: &mut Vec<Property>) {
        self.common.synchronize(props);
        sync_optional(
            props,
            290,
            if self.show_frame { "1" } else { "0" }.to_string(),
            self.show_frame,
        );
        remove_codes(props, &[10, 20]);
        for vertex in &self.vertices {
            props.push(Property::new(10, format_float(vertex.x)));
            props.push(Property::new(20, format_float(vertex.y)));
        }
    }

    fn invalidate(&mut self) {
        self.cached_bounds = Some(self.compute_bounds());
    }

    fn bounds(&self) -> BoundingBox2D {
        self.cached_bounds.unwrap_or_else(|| self.compute_bounds())
    }

    fn hit_test(&self, point: Vector2) -> bool {
        point_in_polygon(point, &self.vertices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_materialize() {
        let props = vec![
            Property::new(0, "WIPEOUT"),
            Property::new(290, "0"),
            Property::new(10, "0.0"),
            Property::new(20, "0.0"),
            Property::new(10, "10.0"),
            Property::new(20, "0.0"),
            Property::new(10, "5.0"),
            Property::new(20, "10.0"),
        ];
        let mut wipeout = Wipeout::new();
        wipeout.materialize(&props).unwrap();
        assert!(!wipeout.show_frame);
        assert_eq!(wipeout.vertices.len(), 3);
    }

    #[test]
    fn test_mask_containment() {
        let mut wipeout = Wipeout::new();
        wipeout.vertices = vec![
            Vector2::new(0.0, 0.0),
            Vector2::new(10.0, 0.0),
            Vector2::new(5.0, 10.0),
        ];
        assert!(wipeout.hit_test(Vector2::new(5.0, 2.0)));
        assert!(!wipeout.hit_test(Vector2::new(0.0, 9.0)));
    }

    #[test]
    fn test_synchronize_frame_flag() {
        let mut wipeout = Wipeout::new();
        wipeout.show_frame = false;
        let mut props = vec![Property::new(0, "WIPEOUT")];
        wipeout.synchronize(&mut props);
        assert!(props.contains(&Property::new(290, "0")));
    }
}
