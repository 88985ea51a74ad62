//! Spline entity

use super::{pick_tolerance, read_f64, read_i32, read_point_list, sync_optional, Entity, EntityCommon};
use crate::error::Result;
use crate::node::{format_float, remove_codes, update_or_add, Property};
use crate::types::{BoundingBox2D, Vector2};

/// A NURBS curve carried as its defining data.
///
/// Knots, control points and fit points are positional lists; the curve is
/// evaluated by the renderer, not here.
#[derive(Debug, Clone)]
pub struct Spline {
    /// Common entity data
    pub common: EntityCommon,
    /// Spline flags (code 70)
    pub flags: i32,
    /// Curve degree (code 71)
    pub degree: i32,
    /// Knot tolerance (code 42)
    pub knot_tolerance: f64,
    /// Control point tolerance (code 43)
    pub control_tolerance: f64,
    /// Fit tolerance (code 44)
    pub fit_tolerance: f64,
    /// Start tangent direction (codes 12/22)
    pub start_tangent: Vector2,
    /// End tangent direction (codes 13/23)
    pub end_tangent: Vector2,
    /// Knot values, repeated code 40
    pub knots: Vec<f64>,
    /// Control points, repeated codes 10/20
    pub control_points: Vec<Vector2>,
    /// Fit points, repeated codes 11/21
    pub fit_points: Vec<Vector2>,
}

impl Spline {
    /// Create an empty cubic spline
    pub fn new() -> Self {
        Spline {
            common: EntityCommon::new(),
            flags: 0,
            degree: 3,
            knot_tolerance: 1e-7,
            control_tolerance: 1e-7,
            fit_tolerance: 1e-7,
            start_tangent: Vector2::ZERO,
            end_tangent: Vector2::ZERO,
            knots: Vec::new(),
            control_points: Vec::new(),
            fit_points: Vec::new(),
        }
    }
}

impl Default for Spline {
    fn default() -> Self {
        Self::new()
    }
}

impl Entity for Spline {
    fn common(&self) -> &EntityCommon {
        &self.common
    }

    fn common_mut(&mut self) -> &mut EntityCommon {
        &mut self.common
    }

    fn type_name(&self) -> &'static str {
        "SPLINE"
    }

    fn materialize(&mut self, props: &[Property]) -> Result<()> {
        self.common.materialize(props)?;
        read_i32(props, 70, &mut self.flags)?;
        read_i32(props, 71, &mut self.degree)?;
        read_f64(props, 42, &mut self.knot_tolerance)?;
        read_f64(props, 43, &mut self.control_tolerance)?;
        read_f64(props, 44, &mut self.fit_tolerance)?;
        read_f64(props, 12, &mut self.start_tangent.x)?;
        read_f64(props, 22, &mut self.start_tangent.y)?;
        read_f64(props, 13, &mut self.end_tangent.x)?;
        read_f64(props, 23, &mut self.end_tangent.y)?;
        self.knots = props
            .iter()
            .filter(|p| p.code == 40)
            .map(|p| p.as_f64())
            .collect::<Result<Vec<_>>>()?;
        self.control_points = read_point_list(props, 10, 20)?;
        self.fit_points = read_point_list(props, 11, 21)?;
        Ok(())
    }

    fn synchronize(&self, props: &mut Vec<Property>) {
        self.common.synchronize(props);
        update_or_add(props, 70, self.flags.to_string());
        update_or_add(props, 71, self.degree.to_string());
        // Counts are derived from the lists, never stored separately
        sync_optional(props, 72, self.knots.len().to_string(), self.knots.is_empty());
        sync_optional(
            props,
            73,
            self.control_points.len().to_string(),
            self.control_points.is_empty(),
        );
        sync_optional(
            props,
            74,
            self.fit_points.len().to_string(),
            self.fit_points.is_empty(),
        );
        sync_optional(props, 42, format_float(self.knot_tolerance), self.knot_tolerance == 1e-7);
        sync_optional(props, 43, format_float(self.control_tolerance), self.control_tolerance == 1e-7);
        sync_optional(props, 44, format_float(self.fit_tolerance), self.fit_tolerance == 1e-7);
        sync_optional(props, 12, format_float(self.start_tangent.x), self.start_tangent == Vector2::ZERO);
        sync_optional(props, 22, format_float(self.start_tangent.y), self.start_tangent == Vector2::ZERO);
        sync_optional(props, 13, format_float(self.end_tangent.x), self.end_tangent == Vector2::ZERO);
        sync_optional(props, 23, format_float(self.end_tangent.y), self.end_tangent == Vector2::ZERO);
        remove_codes(props, &[40, 10, 20, 11, 21]);
        for knot in &self.knots {
            props.push(Property::new(40, format_float(*knot)));
        }
        for point in &self.control_points {
            props.push(Property::new(10, format_float(point.x)));
            props.push(Property::new(20, format_float(point.y)));
        }
        for point in &self.fit_points {
            props.push(Property::new(11, format_float(point.x)));
            props.push(Property::new(21, format_float(point.y)));
        }
    }

    fn invalidate(&mut self) {}

    fn bounds(&self) -> BoundingBox2D {
        // The curve stays inside the convex hull of its defining points
        let mut points = self.control_points.clone();
        points.extend_from_slice(&self.fit_points);
        BoundingBox2D::from_points(&points).unwrap_or_default()
    }

    fn hit_test(&self, point: Vector2) -> bool {
        self.control_points
            .windows(2)
            .any(|pair| point.distance_to_segment(pair[0], pair[1]) <= pick_tolerance(0.0))
    }
}
