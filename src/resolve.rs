//! Post-parse reference resolution.
//!
//! Names on the wire become associations here: every entity's layer name is
//! bound to its layer node and every block reference's block name to its
//! block definition, both case-insensitively.  A name with no match leaves
//! the association absent — that is a normal, renderable state, not an
//! error.  The pass is idempotent: each run rebinds from the current tree,
//! so stale associations cannot accumulate.

use crate::document::Document;
use crate::entities::{Entity, EntityType};
use crate::node::{NodeData, NodeId};
use crate::types::BoundingBox2D;
use ahash::AHashMap;

/// Hard cap on nested block-reference depth.
///
/// A block can reference itself through intermediate inserts; bounds
/// evaluation stops here instead of recursing forever.
const MAX_REFERENCE_DEPTH: usize = 8;

type NameIndex = AHashMap<String, NodeId>;

impl Document {
    /// Bind entity→layer and block-reference→block associations and
    /// recompute each entity's resolved display color.
    ///
    /// Covers the ENTITIES section and the contents of every block
    /// definition, so block geometry drawn through references carries
    /// correct colors too.
    pub fn resolve_references(&mut self) {
        let layer_index = self.layer_name_index();
        let block_index = self.block_name_index();
        let entity_ids = self.resolvable_entities();

        // Layer binding, then color: the color may defer to the layer just
        // bound
        for &id in &entity_ids {
            let Some(entity) = self.entity(id) else { continue };
            let layer_id = layer_index
                .get(&entity.common().layer.to_lowercase())
                .copied();
            let layer = layer_id.and_then(|lid| self.node(lid).as_layer()).cloned();
            let resolved_color = entity.common().color.resolve(layer.as_ref(), None);

            let common = self.entity_mut(id).unwrap().common_mut();
            common.resolved_layer = layer_id;
            common.resolved_color = resolved_color;
        }

        // Block-reference binding, plus the transformed bounds cache each
        // insert needs to answer bounds queries on its own
        let mut insert_updates = Vec::new();
        for &id in &entity_ids {
            let Some(EntityType::Insert(insert)) = self.entity(id) else {
                continue;
            };
            let block_id = block_index.get(&insert.block_name.to_lowercase()).copied();
            let bounds = block_id.and_then(|bid| {
                self.block_bounds(bid, &block_index, 0)
                    .map(|bb| insert.transform_bounds(&bb))
            });
            insert_updates.push((id, block_id, bounds));
        }
        for (id, block_id, bounds) in insert_updates {
            if let Some(EntityType::Insert(insert)) = self.entity_mut(id) {
                insert.resolved_block = block_id;
                insert.set_resolved_bounds(bounds);
            }
        }
    }

    /// Display bounds of an entity node, following block references with
    /// the depth cap applied
    pub fn entity_display_bounds(&self, id: NodeId) -> BoundingBox2D {
        let block_index = self.block_name_index();
        self.resolved_entity_bounds(id, &block_index, 0)
            .unwrap_or_default()
    }

    fn layer_name_index(&self) -> NameIndex {
        self.layers()
            .filter_map(|id| {
                self.node(id)
                    .as_layer()
                    .map(|l| (l.name.to_lowercase(), id))
            })
            .collect()
    }

    fn block_name_index(&self) -> NameIndex {
        self.blocks()
            .filter_map(|id| match &self.node(id).data {
                NodeData::Entity(EntityType::Block(b)) => Some((b.name.to_lowercase(), id)),
                _ => None,
            })
            .collect()
    }

    /// Every entity node reachable from the ENTITIES and BLOCKS sections,
    /// nested containers included
    fn resolvable_entities(&self) -> Vec<NodeId> {
        let mut ids = Vec::new();
        for section in [self.entities_section(), self.blocks_section()]
            .into_iter()
            .flatten()
        {
            ids.extend(
                self.nodes()
                    .descendants(section)
                    .filter(|&id| matches!(self.node(id).data, NodeData::Entity(_))),
            );
        }
        ids
    }

    /// Union of the bounds of a block's entities, `None` when the block
    /// has no measurable geometry
    fn block_bounds(
        &self,
        block: NodeId,
        block_index: &NameIndex,
        depth: usize,
    ) -> Option<BoundingBox2D> {
        if depth >= MAX_REFERENCE_DEPTH {
            return None;
        }
        let mut merged: Option<BoundingBox2D> = None;
        for &child in self.node(block).children() {
            if let Some(bounds) = self.resolved_entity_bounds(child, block_index, depth) {
                merged = Some(match merged {
                    Some(acc) => acc.merge(&bounds),
                    None => bounds,
                });
            }
        }
        merged
    }

    fn resolved_entity_bounds(
        &self,
        id: NodeId,
        block_index: &NameIndex,
        depth: usize,
    ) -> Option<BoundingBox2D> {
        match &self.node(id).data {
            NodeData::Entity(EntityType::Insert(insert)) => {
                if depth >= MAX_REFERENCE_DEPTH {
                    return None;
                }
                let block = block_index.get(&insert.block_name.to_lowercase())?;
                let inner = self.block_bounds(*block, block_index, depth + 1)?;
                Some(insert.transform_bounds(&inner))
            }
            NodeData::Entity(entity) => {
                let bounds = entity.as_entity().bounds();
                (!bounds.is_empty()).then_some(bounds)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{Block, Insert, Line};
    use crate::tables::Layer;
    use crate::types::{Color, Rgb, Vector2};

    fn doc_with_line_on(layer_name: &str) -> (Document, NodeId) {
        let mut doc = Document::new();
        let mut line = Line::from_points(Vector2::ZERO, Vector2::new(1.0, 1.0));
        line.common.layer = layer_name.to_string();
        let id = doc.add_entity(EntityType::Line(line));
        (doc, id)
    }

    #[test]
    fn test_unresolved_layer_is_absent_and_white() {
        let (mut doc, id) = doc_with_line_on("missing");
        doc.resolve_references();
        let common = doc.entity(id).unwrap().common();
        assert!(common.resolved_layer.is_none());
        assert_eq!(common.resolved_color, Rgb::WHITE);
    }

    #[test]
    fn test_late_layer_binds_case_insensitively() {
        let (mut doc, id) = doc_with_line_on("x");
        doc.resolve_references();
        assert!(doc.entity(id).unwrap().common().resolved_layer.is_none());

        let layer = doc.add_layer(Layer::with_color("X", 1));
        doc.resolve_references();
        let common = doc.entity(id).unwrap().common();
        assert_eq!(common.resolved_layer, Some(layer));
        assert_eq!(common.resolved_color, Rgb::RED);
    }

    #[test]
    fn test_idempotent() {
        let (mut doc, id) = doc_with_line_on("0");
        doc.resolve_references();
        let first = doc.entity(id).unwrap().common().clone();
        doc.resolve_references();
        assert_eq!(*doc.entity(id).unwrap().common(), first);
    }

    #[test]
    fn test_explicit_color_ignores_layer() {
        let (mut doc, id) = doc_with_line_on("0");
        doc.entity_mut(id).unwrap().common_mut().color = Color::Index(5);
        doc.resolve_references();
        assert_eq!(doc.entity(id).unwrap().common().resolved_color, Rgb::BLUE);
    }

    #[test]
    fn test_insert_binding_and_bounds() {
        let mut doc = Document::new();
        let block = doc.add_block(Block::named("SQUARE"));
        doc.add_block_entity(
            block,
            EntityType::Line(Line::from_points(Vector2::ZERO, Vector2::new(2.0, 2.0))),
        );
        let insert = doc.add_entity(EntityType::Insert(Insert::of_block(
            "square",
            Vector2::new(10.0, 10.0),
        )));
        doc.resolve_references();

        let EntityType::Insert(ins) = doc.entity(insert).unwrap() else {
            panic!("not an insert");
        };
        assert_eq!(ins.resolved_block, Some(block));
        let bounds = doc.entity_display_bounds(insert);
        assert_eq!(bounds.min, Vector2::new(10.0, 10.0));
        assert_eq!(bounds.max, Vector2::new(12.0, 12.0));
    }

    #[test]
    fn test_self_referencing_block_is_capped() {
        let mut doc = Document::new();
        let block = doc.add_block(Block::named("LOOP"));
        doc.add_block_entity(
            block,
            EntityType::Insert(Insert::of_block("LOOP", Vector2::new(1.0, 0.0))),
        );
        let insert = doc.add_entity(EntityType::Insert(Insert::of_block("LOOP", Vector2::ZERO)));
        // Must terminate rather than recurse forever
        doc.resolve_references();
        let _ = doc.entity_display_bounds(insert);
    }

    #[test]
    fn test_unresolved_block_reference() {
        let mut doc = Document::new();
        let insert = doc.add_entity(EntityType::Insert(Insert::of_block(
            "GHOST",
            Vector2::ZERO,
        )));
        doc.resolve_references();
        let EntityType::Insert(ins) = doc.entity(insert).unwrap() else {
            panic!("not an insert");
        };
        assert!(ins.resolved_block.is_none());
        assert!(doc.entity_display_bounds(insert).is_empty());
    }
}
