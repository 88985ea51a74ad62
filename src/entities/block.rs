//! Block definition entity

use super::{read_f64, Entity, EntityCommon};
use crate::error::Result;
use crate::node::{find_code, format_float, update_or_add, Property};
use crate::types::{BoundingBox2D, Vector2};

/// A named block definition.
///
/// The block's entities are the children of its document node: deleting the
/// node deletes them.  Insertions reference the definition by name and
/// never copy its contents.
#[derive(Debug, Clone)]
pub struct Block {
    /// Common entity data
    pub common: EntityCommon,
    /// Block name (code 2, alternate code 3)
    pub name: String,
    /// Base point the block's geometry is relative to (codes 10/20)
    pub base_point: Vector2,
}

impl Block {
    /// Create an unnamed block at the origin
    pub fn new() -> Self {
        Block {
            common: EntityCommon::new(),
            name: String::new(),
            base_point: Vector2::ZERO,
        }
    }

    /// Create a named block
    pub fn named(name: impl Into<String>) -> Self {
        Block {
            name: name.into(),
            ..Self::new()
        }
    }
}

impl Default for Block {
    fn default() -> Self {
        Self::new()
    }
}

impl Entity for Block {
    fn common(&self) -> &EntityCommon {
        &self.common
    }

    fn common_mut(&mut self) -> &mut EntityCommon {
        &mut self.common
    }

    fn type_name(&self) -> &'static str {
        "BLOCK"
    }

    fn materialize(&mut self, props: &[Property]) -> Result<()> {
        self.common.materialize(props)?;
        if let Some(p) = find_code(props, 2) {
            self.name = p.text().to_string();
        } else if let Some(p) = find_code(props, 3) {
            self.name = p.text().to_string();
        }
        read_f64(props, 10, &mut self.base_point.x)?;
        read_f64(props, 20, &mut self.base_point.y)?;
        Ok(())
    }

    fn synchronize(&self, props: &mut Vec<Property>) {
        self.common.synchronize(props);
        update_or_add(props, 2, self.name.clone());
        update_or_add(props, 10, format_float(self.base_point.x));
        update_or_add(props, 20, format_float(self.base_point.y));
    }

    fn invalidate(&mut self) {}

    fn bounds(&self) -> BoundingBox2D {
        // The definition's extent is the union of its children's bounds,
        // which only the owning document can see
        BoundingBox2D::EMPTY
    }

    fn hit_test(&self, _point: Vector2) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_materialize_name_fallback() {
        let props = vec![Property::new(0, "BLOCK"), Property::new(3, "ALT_NAME")];
        let mut block = Block::new();
        block.materialize(&props).unwrap();
        assert_eq!(block.name, "ALT_NAME");

        // Code 2 wins when both are present
        let props = vec![
            Property::new(0, "BLOCK"),
            Property::new(2, "MAIN"),
            Property::new(3, "ALT"),
        ];
        let mut block = Block::new();
        block.materialize(&props).unwrap();
        assert_eq!(block.name, "MAIN");
    }

    #[test]
    fn test_synchronize() {
        let mut block = Block::named("DOOR");
        block.base_point = Vector2::new(1.0, 2.0);
        let mut props = vec![Property::new(0, "BLOCK")];
        block.synchronize(&mut props);
        assert!(props.contains(&Property::new(2, "DOOR")));
        assert!(props.contains(&Property::new(10, "1.0")));
    }
}
