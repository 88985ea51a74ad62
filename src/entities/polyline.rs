//! Lightweight polyline entity

use super::{pick_tolerance, read_point_list, sync_optional, Entity, EntityCommon};
use crate::error::Result;
use crate::node::{find_code, format_float, remove_codes, update_or_add, Property};
use crate::types::{BoundingBox2D, Vector2};

/// Polyline flag bit: the last vertex connects back to the first
const FLAG_CLOSED: i32 = 1;

/// A lightweight polyline: an ordered run of vertices, optionally closed.
///
/// Vertices travel as repeated 10/20 pairs whose order is semantically
/// meaningful — the nth code 10 pairs with the nth code 20.
#[derive(Debug, Clone)]
pub struct Polyline {
    /// Common entity data
    pub common: EntityCommon,
    /// Vertices in drawing order
    pub vertices: Vec<Vector2>,
    /// Whether the polyline is closed (code 70, bit 0)
    pub closed: bool,
    cached_bounds: Option<BoundingBox2D>,
}

impl Polyline {
    /// Create an empty open polyline
    pub fn new() -> Self {
        Polyline {
            common: EntityCommon::new(),
            vertices: Vec::new(),
            closed: false,
            cached_bounds: None,
        }
    }

    /// Create a polyline from vertices
    pub fn from_vertices(vertices: Vec<Vector2>) -> Self {
        Polyline {
            vertices,
            ..Self::new()
        }
    }

    /// Append a vertex
    pub fn push_vertex(&mut self, vertex: Vector2) {
        self.vertices.push(vertex);
    }

    /// The segments of the polyline, including the closing one if closed
    fn segments(&self) -> impl Iterator<Item = (Vector2, Vector2)> + '_ {
        let n = self.vertices.len();
        let closing = if self.closed && n > 2 { 1 } else { 0 };
        (0..n.saturating_sub(1) + closing)
            .map(move |i| (self.vertices[i], self.vertices[(i + 1) % n]))
    }

    fn compute_bounds(&self) -> BoundingBox2D {
        BoundingBox2D::from_points(&self.vertices).unwrap_or_default()
    }
}

impl Default for Polyline {
    fn default() -> Self {
        Self::new()
    }
}

impl Entity for Polyline {
    fn common(&self) -> &EntityCommon {
        &self.common
    }

    fn common_mut(&mut self) -> &mut EntityCommon {
        &mut self.common
    }

    fn type_name(&self) -> &'static str {
        "LWPOLYLINE"
    }

    fn materialize(&mut self, props: &[Property]) -> Result<()> {
        self.common.materialize(props)?;
        if let Some(p) = find_code(props, 70) {
            self.closed = (p.as_i32()? & FLAG_CLOSED) != 0;
        }
        let vertices = read_point_list(props, 10, 20)?;
        if !vertices.is_empty() || find_code(props, 90).is_some() {
            self.vertices = vertices;
        }
        Ok(())
    }

    fn synchronize(&self, props: &mut Vec<Property>) {
        self.common.synchronize(props);
        update_or_add(props, 90, self.vertices.len().to_string());
        sync_optional(
            props,
            70,
            if self.closed { FLAG_CLOSED } else { 0 }.to_string(),
            !self.closed,
        );
        // Vertex codes are positional: rewritten wholesale, in order
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
        self.segments()
            .any(|(a, b)| point.distance_to_segment(a, b) <= pick_tolerance(0.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> Polyline {
        let mut pl = Polyline::from_vertices(vec![
            Vector2::new(0.0, 0.0),
            Vector2::new(10.0, 0.0),
            Vector2::new(10.0, 10.0),
        ]);
        pl.closed = true;
        pl
    }

    #[test]
    fn test_materialize_positional_pairs() {
        let props = vec![
            Property::new(0, "LWPOLYLINE"),
            Property::new(90, "3"),
            Property::new(70, "1"),
            Property::new(10, "0.0"),
            Property::new(20, "0.0"),
            Property::new(10, "5.0"),
            Property::new(20, "1.0"),
            Property::new(10, "9.0"),
            Property::new(20, "2.0"),
        ];
        let mut pl = Polyline::new();
        pl.materialize(&props).unwrap();
        assert!(pl.closed);
        assert_eq!(
            pl.vertices,
            vec![
                Vector2::new(0.0, 0.0),
                Vector2::new(5.0, 1.0),
                Vector2::new(9.0, 2.0),
            ]
        );
    }

    #[test]
    fn test_synchronize_rewrites_vertices() {
        let pl = triangle();
        let mut props = vec![
            Property::new(0, "LWPOLYLINE"),
            Property::new(10, "99.0"),
            Property::new(20, "99.0"),
        ];
        pl.synchronize(&mut props);
        // Stale coordinates are gone, the list is rewritten in order
        let coords: Vec<&Property> = props.iter().filter(|p| p.code == 10).collect();
        assert_eq!(coords.len(), 3);
        assert_eq!(coords[0].value, "0.0");
        assert!(props.contains(&Property::new(90, "3")));
        assert!(props.contains(&Property::new(70, "1")));
    }

    #[test]
    fn test_closing_segment_hit() {
        let pl = triangle();
        // Midpoint of the closing edge from (10,10) back to (0,0)
        assert!(pl.hit_test(Vector2::new(5.0, 5.0)));

        let mut open = triangle();
        open.closed = false;
        assert!(!open.hit_test(Vector2::new(5.0, 5.0)));
    }

    #[test]
    fn test_bounds() {
        let bbox = triangle().bounds();
        assert_eq!(bbox.min, Vector2::new(0.0, 0.0));
        assert_eq!(bbox.max, Vector2::new(10.0, 10.0));
    }
}
