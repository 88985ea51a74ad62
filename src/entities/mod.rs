//! Graphical entity types.
//!
//! The catalogue is a closed sum type: every known object kind is one
//! variant of [`EntityType`], constructed through the fixed dispatch table
//! in [`EntityType::from_type_name`], and anything else lands in the
//! [`Unknown`] catch-all so no data is ever dropped.  Adding a shape is one
//! table entry plus one variant.
//!
//! Typed fields and the raw property list of an entity's node are kept
//! consistent by an explicit two-way synchronization step: `materialize`
//! after reading, `synchronize` before writing.  Neither side is the single
//! source of truth.

use crate::error::Result;
use crate::node::{find_code, NodeId, Property};
use crate::types::{BoundingBox2D, Color, Rgb, Vector2};
use ahash::AHashMap;
use once_cell::sync::Lazy;

pub mod arc;
pub mod block;
pub mod circle;
pub mod dimension;
pub mod ellipse;
pub mod hatch;
pub mod insert;
pub mod line;
pub mod mtext;
pub mod ole2frame;
pub mod polyline;
pub mod raster_image;
pub mod spline;
pub mod text;
pub mod trace;
pub mod unknown;
pub mod wipeout;

pub use arc::Arc;
pub use block::Block;
pub use circle::Circle;
pub use dimension::Dimension;
pub use ellipse::Ellipse;
pub use hatch::Hatch;
pub use insert::Insert;
pub use line::Line;
pub use mtext::MText;
pub use ole2frame::Ole2Frame;
pub use polyline::Polyline;
pub use raster_image::RasterImage;
pub use spline::Spline;
pub use text::Text;
pub use trace::Trace;
pub use unknown::Unknown;
pub use wipeout::Wipeout;

/// Common data shared by every entity.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityCommon {
    /// Owning layer name (code 8); always set, defaults to `"0"`
    pub layer: String,
    /// Color specification (code 62)
    pub color: Color,
    /// The bound layer node, populated by reference resolution.  Absent
    /// until resolution runs or when the name has no match — both are
    /// normal states.
    pub resolved_layer: Option<NodeId>,
    /// Display color computed by the last resolution pass
    pub resolved_color: Rgb,
}

impl EntityCommon {
    /// Create common entity data with defaults
    pub fn new() -> Self {
        EntityCommon {
            layer: "0".to_string(),
            color: Color::ByLayer,
            resolved_layer: None,
            resolved_color: Rgb::WHITE,
        }
    }

    /// Parse the common codes out of a property list
    pub fn materialize(&mut self, props: &[Property]) -> Result<()> {
        if let Some(p) = find_code(props, 8) {
            self.layer = p.text().to_string();
        }
        if let Some(p) = find_code(props, 62) {
            self.color = Color::from_code(p.as_i32()?);
        }
        Ok(())
    }

    /// Write the common codes back into a property list.
    ///
    /// Codes still at their wire defaults (layer `"0"`, ByLayer color) are
    /// not added if the stream never carried them.
    pub fn synchronize(&self, props: &mut Vec<Property>) {
        sync_optional(props, 8, self.layer.clone(), self.layer == "0");
        sync_optional(
            props,
            62,
            self.color.to_code().to_string(),
            self.color == Color::ByLayer,
        );
    }
}

impl Default for EntityCommon {
    fn default() -> Self {
        Self::new()
    }
}

/// Behavior every entity variant implements.
pub trait Entity {
    /// Common entity data
    fn common(&self) -> &EntityCommon;

    /// Mutable common entity data
    fn common_mut(&mut self) -> &mut EntityCommon;

    /// The code 0 type name written for this entity
    fn type_name(&self) -> &'static str;

    /// Parse typed fields out of the property list.
    ///
    /// Codes absent from the list keep their current field values.  A
    /// field whose value fails to parse surfaces
    /// [`DxfError::MalformedField`](crate::DxfError::MalformedField); fields
    /// materialized before it keep the parsed values.
    fn materialize(&mut self, props: &[Property]) -> Result<()>;

    /// Write typed fields back into the property list, updating owned codes
    /// in place and preserving codes this variant does not own.  The
    /// kind-determining `(0, …)` pair is never rewritten.
    fn synchronize(&self, props: &mut Vec<Property>);

    /// Drop cached derived geometry (paths, bounds) so it is recomputed
    fn invalidate(&mut self);

    /// Axis-aligned bounds of the entity's geometry
    fn bounds(&self) -> BoundingBox2D;

    /// Whether the point lies on (or in) the entity
    fn hit_test(&self, point: Vector2) -> bool;

    /// Owning layer name
    fn layer(&self) -> &str {
        &self.common().layer
    }

    /// Color specification
    fn color(&self) -> Color {
        self.common().color
    }
}

/// Pick tolerance used by stroke hit tests, scaled with the feature size.
pub(crate) fn pick_tolerance(size: f64) -> f64 {
    (size * 0.05).max(1.0)
}

/// Materialize helper: overwrite `target` if `code` is present.
pub(crate) fn read_f64(props: &[Property], code: i32, target: &mut f64) -> Result<()> {
    if let Some(p) = find_code(props, code) {
        *target = p.as_f64()?;
    }
    Ok(())
}

/// Materialize helper for integer fields.
pub(crate) fn read_i32(props: &[Property], code: i32, target: &mut i32) -> Result<()> {
    if let Some(p) = find_code(props, code) {
        *target = p.as_i32()?;
    }
    Ok(())
}

/// Materialize helper for string fields.
pub(crate) fn read_string(props: &[Property], code: i32, target: &mut String) {
    if let Some(p) = find_code(props, code) {
        *target = p.text().to_string();
    }
}

/// Collect repeated coordinate codes into points, pairing positionally.
pub(crate) fn read_point_list(props: &[Property], x_code: i32, y_code: i32) -> Result<Vec<Vector2>> {
    let xs = props
        .iter()
        .filter(|p| p.code == x_code)
        .map(|p| p.as_f64())
        .collect::<Result<Vec<_>>>()?;
    let ys = props
        .iter()
        .filter(|p| p.code == y_code)
        .map(|p| p.as_f64())
        .collect::<Result<Vec<_>>>()?;
    Ok(xs
        .into_iter()
        .zip(ys)
        .map(|(x, y)| Vector2::new(x, y))
        .collect())
}

/// Synchronize helper for optional codes.
///
/// Updates in place when the code is already on the wire; appends only
/// when the field has left its wire default.  This keeps a read → write
/// round trip from inventing records the source stream never had.
pub(crate) fn sync_optional(
    props: &mut Vec<Property>,
    code: i32,
    value: String,
    is_default: bool,
) {
    if find_code(props, code).is_some() || !is_default {
        crate::node::update_or_add(props, code, value);
    }
}

/// Even-odd ray cast containment test against a closed polygon.
pub(crate) fn point_in_polygon(point: Vector2, polygon: &[Vector2]) -> bool {
    if polygon.len() < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = polygon.len() - 1;
    for i in 0..polygon.len() {
        let (a, b) = (polygon[i], polygon[j]);
        if (a.y > point.y) != (b.y > point.y)
            && point.x < (b.x - a.x) * (point.y - a.y) / (b.y - a.y) + a.x
        {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Enumeration of all entity variants for type-safe storage.
#[derive(Debug, Clone)]
pub enum EntityType {
    /// Line entity
    Line(Line),
    /// Circle entity
    Circle(Circle),
    /// Arc entity
    Arc(Arc),
    /// Ellipse entity
    Ellipse(Ellipse),
    /// Lightweight polyline entity
    Polyline(Polyline),
    /// Single-line text entity
    Text(Text),
    /// Multi-line text entity
    MText(MText),
    /// Hatch entity
    Hatch(Hatch),
    /// Dimension entity
    Dimension(Dimension),
    /// Filled quadrilateral (SOLID/TRACE)
    Trace(Trace),
    /// Raster image entity
    RasterImage(RasterImage),
    /// Embedded OLE frame entity
    Ole2Frame(Ole2Frame),
    /// Spline entity
    Spline(Spline),
    /// Wipeout (masking polygon) entity
    Wipeout(Wipeout),
    /// Block reference (INSERT) entity
    Insert(Insert),
    /// Block definition; its node's children are the block's entities
    Block(Block),
    /// Catch-all for object kinds outside the dispatch table
    Unknown(Unknown),
}

/// Constructor signature stored in the dispatch table.
type EntityCtor = fn() -> EntityType;

/// Fixed dispatch table from code 0 type names to constructors.
///
/// `SOLID` and `TRACE` share a variant; `BLOCK` is not listed because block
/// definitions open a container and are handled structurally by the reader.
static DISPATCH: Lazy<AHashMap<&'static str, EntityCtor>> = Lazy::new(|| {
    let mut table: AHashMap<&'static str, EntityCtor> = AHashMap::new();
    table.insert("LINE", || EntityType::Line(Line::new()));
    table.insert("CIRCLE", || EntityType::Circle(Circle::new()));
    table.insert("ARC", || EntityType::Arc(Arc::new()));
    table.insert("ELLIPSE", || EntityType::Ellipse(Ellipse::new()));
    table.insert("LWPOLYLINE", || EntityType::Polyline(Polyline::new()));
    table.insert("TEXT", || EntityType::Text(Text::new()));
    table.insert("MTEXT", || EntityType::MText(MText::new()));
    table.insert("HATCH", || EntityType::Hatch(Hatch::new()));
    table.insert("DIMENSION", || EntityType::Dimension(Dimension::new()));
    table.insert("SOLID", || EntityType::Trace(Trace::new()));
    table.insert("TRACE", || EntityType::Trace(Trace::new()));
    table.insert("IMAGE", || EntityType::RasterImage(RasterImage::new()));
    table.insert("OLE2FRAME", || EntityType::Ole2Frame(Ole2Frame::new()));
    table.insert("SPLINE", || EntityType::Spline(Spline::new()));
    table.insert("WIPEOUT", || EntityType::Wipeout(Wipeout::new()));
    table.insert("INSERT", || EntityType::Insert(Insert::new()));
    table
});

impl EntityType {
    /// Construct the typed variant for a code 0 value, if it is known
    pub fn from_type_name(name: &str) -> Option<EntityType> {
        DISPATCH.get(name).map(|ctor| ctor())
    }

    /// Get a reference to the entity trait object
    pub fn as_entity(&self) -> &dyn Entity {
        match self {
            EntityType::Line(e) => e,
            EntityType::Circle(e) => e,
            EntityType::Arc(e) => e,
            EntityType::Ellipse(e) => e,
            EntityType::Polyline(e) => e,
            EntityType::Text(e) => e,
            EntityType::MText(e) => e,
            EntityType::Hatch(e) => e,
            EntityType::Dimension(e) => e,
            EntityType::Trace(e) => e,
            EntityType::RasterImage(e) => e,
            EntityType::Ole2Frame(e) => e,
            EntityType::Spline(e) => e,
            EntityType::Wipeout(e) => e,
            EntityType::Insert(e) => e,
            EntityType::Block(e) => e,
            EntityType::Unknown(e) => e,
        }
    }

    /// Get a mutable reference to the entity trait object
    pub fn as_entity_mut(&mut self) -> &mut dyn Entity {
        match self {
            EntityType::Line(e) => e,
            EntityType::Circle(e) => e,
            EntityType::Arc(e) => e,
            EntityType::Ellipse(e) => e,
            EntityType::Polyline(e) => e,
            EntityType::Text(e) => e,
            EntityType::MText(e) => e,
            EntityType::Hatch(e) => e,
            EntityType::Dimension(e) => e,
            EntityType::Trace(e) => e,
            EntityType::RasterImage(e) => e,
            EntityType::Ole2Frame(e) => e,
            EntityType::Spline(e) => e,
            EntityType::Wipeout(e) => e,
            EntityType::Insert(e) => e,
            EntityType::Block(e) => e,
            EntityType::Unknown(e) => e,
        }
    }

    /// Common entity data
    pub fn common(&self) -> &EntityCommon {
        self.as_entity().common()
    }

    /// Mutable common entity data
    pub fn common_mut(&mut self) -> &mut EntityCommon {
        self.as_entity_mut().common_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dispatch_known_names() {
        assert!(matches!(
            EntityType::from_type_name("LINE"),
            Some(EntityType::Line(_))
        ));
        assert!(matches!(
            EntityType::from_type_name("LWPOLYLINE"),
            Some(EntityType::Polyline(_))
        ));
        // SOLID and TRACE are the same shape
        assert!(matches!(
            EntityType::from_type_name("TRACE"),
            Some(EntityType::Trace(_))
        ));
        assert!(matches!(
            EntityType::from_type_name("SOLID"),
            Some(EntityType::Trace(_))
        ));
    }

    #[test]
    fn test_dispatch_unknown_name() {
        assert!(EntityType::from_type_name("ACAD_PROXY_ENTITY").is_none());
        assert!(EntityType::from_type_name("line").is_none());
    }

    #[test]
    fn test_common_defaults() {
        let common = EntityCommon::new();
        assert_eq!(common.layer, "0");
        assert_eq!(common.color, Color::ByLayer);
        assert!(common.resolved_layer.is_none());
        assert_eq!(common.resolved_color, Rgb::WHITE);
    }

    #[test]
    fn test_common_materialize() {
        let props = vec![
            Property::new(0, "LINE"),
            Property::new(8, "walls"),
            Property::new(62, "1"),
        ];
        let mut common = EntityCommon::new();
        common.materialize(&props).unwrap();
        assert_eq!(common.layer, "walls");
        assert_eq!(common.color, Color::Index(1));
    }
}
