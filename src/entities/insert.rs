//! Block reference (INSERT) entity

use super::{read_f64, read_string, sync_optional, Entity, EntityCommon};
use crate::error::Result;
use crate::node::{format_float, update_or_add, NodeId, Property};
use crate::types::{BoundingBox2D, Vector2};

/// A placement of a block definition.
///
/// The reference holds the block's *name*; the association to the block
/// node is bound by reference resolution and stays absent when the name
/// has no match.  Block contents are never copied — the insertion only
/// transforms the block's coordinate space.
#[derive(Debug, Clone)]
pub struct Insert {
    /// Common entity data
    pub common: EntityCommon,
    /// Referenced block name (code 2)
    pub block_name: String,
    /// Insertion point (codes 10/20)
    pub insertion: Vector2,
    /// X scale factor (code 41)
    pub scale_x: f64,
    /// Y scale factor (code 42)
    pub scale_y: f64,
    /// Rotation in degrees (code 50)
    pub rotation: f64,
    /// The bound block node; populated by reference resolution
    pub resolved_block: Option<NodeId>,
    /// Bounds of the referenced block mapped through this insertion,
    /// recomputed during resolution
    resolved_bounds: Option<BoundingBox2D>,
}

impl Insert {
    /// Create an unbound insertion at the origin
    pub fn new() -> Self {
        Insert {
            common: EntityCommon::new(),
            block_name: String::new(),
            insertion: Vector2::ZERO,
            scale_x: 1.0,
            scale_y: 1.0,
            rotation: 0.0,
            resolved_block: None,
            resolved_bounds: None,
        }
    }

    /// Create an insertion of a named block at a point
    pub fn of_block(block_name: impl Into<String>, insertion: Vector2) -> Self {
        Insert {
            block_name: block_name.into(),
            insertion,
            ..Self::new()
        }
    }

    /// Map a point from block space into drawing space: scale, rotate,
    /// then translate
    pub fn transform_point(&self, point: Vector2) -> Vector2 {
        let scaled = Vector2::new(point.x * self.scale_x, point.y * self.scale_y);
        self.insertion + scaled.rotated(self.rotation.to_radians())
    }

    /// Map a bounding box from block space into drawing space
    pub fn transform_bounds(&self, bounds: &BoundingBox2D) -> BoundingBox2D {
        let corners = bounds.corners().map(|c| self.transform_point(c));
        BoundingBox2D::from_points(&corners).unwrap_or_default()
    }

    /// Store the transformed bounds computed by the resolution pass
    pub(crate) fn set_resolved_bounds(&mut self, bounds: Option<BoundingBox2D>) {
        self.resolved_bounds = bounds;
    }
}

impl Default for Insert {
    fn default() -> Self {
        Self::new()
    }
}

impl Entity for Insert {
    fn common(&self) -> &EntityCommon {
        &self.common
    }

    fn common_mut(&mut self) -> &mut EntityCommon {
        &mut self.common
    }

    fn type_name(&self) -> &'static str {
        "INSERT"
    }

    fn materialize(&mut self, props: &[Property]) -> Result<()> {
        self.common.materialize(props)?;
        read_string(props, 2, &mut self.block_name);
        read_f64(props, 10, &mut self.insertion.x)?;
        read_f64(props, 20, &mut self.insertion.y)?;
        read_f64(props, 41, &mut self.scale_x)?;
        read_f64(props, 42, &mut self.scale_y)?;
        read_f64(props, 50, &mut self.rotation)?;
        Ok(())
    }

    fn synchronize(&self, props: &mut Vec<Property>) {
        self.common.synchronize(props);
        update_or_add(props, 2, self.block_name.clone());
        update_or_add(props, 10, format_float(self.insertion.x));
        update_or_add(props, 20, format_float(self.insertion.y));
        sync_optional(props, 41, format_float(self.scale_x), self.scale_x == 1.0);
        sync_optional(props, 42, format_float(self.scale_y), self.scale_y == 1.0);
        sync_optional(props, 50, format_float(self.rotation), self.rotation == 0.0);
    }

    fn invalidate(&mut self) {
        self.resolved_bounds = None;
    }

    fn bounds(&self) -> BoundingBox2D {
        // Unresolved references have no geometry of their own
        self.resolved_bounds.unwrap_or_default()
    }

    fn hit_test(&self, point: Vector2) -> bool {
        self.resolved_bounds
            .map(|b| b.contains(point))
            .unwrap_or(false)
    }
}
