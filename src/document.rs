//! CAD document structure.
//!
//! A [`Document`] is the root of one parsed drawing: it owns the node arena
//! and exposes the named-section views (`ENTITIES`, `BLOCKS`, `TABLES`, the
//! `LAYER` table) plus the mutation points external tools go through.  The
//! views are computed by scanning children for their marker properties, not
//! cached, so they stay correct across arbitrary tree edits.

use crate::entities::{Block, Entity, EntityType};
use crate::error::Result;
use crate::io::dxf::{DxfReader, DxfWriter};
use crate::node::{DocumentNode, NodeArena, NodeData, NodeId, Property};
use crate::notification::NotificationCollection;
use crate::tables::Layer;
use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::Path;

/// A CAD document: the root of the node tree
#[derive(Debug, Clone)]
pub struct Document {
    arena: NodeArena,
    root: NodeId,
    /// Diagnostics collected during the last read
    pub notifications: NotificationCollection,
}

impl Document {
    /// Create the canonical empty document: a HEADER section, a TABLES
    /// section holding a LAYER table with the default layer `"0"`, an
    /// ENTITIES section and the EOF marker.
    pub fn new() -> Self {
        let mut doc = Self::bare();

        let header = doc.new_section("HEADER");
        let root = doc.root;
        doc.arena.append_child(root, header);

        let tables = doc.new_section("TABLES");
        doc.arena.append_child(root, tables);
        let layer_table = doc.alloc_container(NodeData::Table, "TABLE", Some("LAYER"), "ENDTAB");
        doc.insert_before_end_marker(tables, layer_table);
        let layer0 = doc.new_layer_node(Layer::layer_0());
        doc.insert_before_end_marker(layer_table, layer0);

        let entities = doc.new_section("ENTITIES");
        doc.arena.append_child(root, entities);

        let eof = doc
            .arena
            .alloc(DocumentNode::with_property(NodeData::Eof, 0, "EOF"));
        doc.arena.append_child(root, eof);

        doc
    }

    /// A document with nothing but the root node.  The reader starts from
    /// this and builds whatever the stream actually contains.
    pub(crate) fn bare() -> Self {
        let mut arena = NodeArena::new();
        let root = arena.alloc(DocumentNode::new(NodeData::Root));
        Document {
            arena,
            root,
            notifications: NotificationCollection::new(),
        }
    }

    /// Read a document from a stream: parse, materialize typed fields and
    /// resolve references.
    pub fn open<R: Read>(reader: R) -> Result<Document> {
        DxfReader::new(reader).read()
    }

    /// Read a document from a file path
    pub fn open_file<P: AsRef<Path>>(path: P) -> Result<Document> {
        Self::open(File::open(path)?)
    }

    /// Write the document to a stream: synchronize typed fields back into
    /// properties, then emit the tree.
    pub fn save<W: Write>(&mut self, writer: W) -> Result<()> {
        DxfWriter::new(writer).write(self)
    }

    /// Write the document to a file path
    pub fn save_file<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        self.save(BufWriter::new(File::create(path)?))
    }

    /// The root node id
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// The node arena
    pub fn nodes(&self) -> &NodeArena {
        &self.arena
    }

    pub(crate) fn nodes_mut(&mut self) -> &mut NodeArena {
        &mut self.arena
    }

    /// A node by id
    pub fn node(&self, id: NodeId) -> &DocumentNode {
        &self.arena[id]
    }

    /// A node by id, mutably
    pub fn node_mut(&mut self, id: NodeId) -> &mut DocumentNode {
        &mut self.arena[id]
    }

    /// The entity attached to a node, if any
    pub fn entity(&self, id: NodeId) -> Option<&EntityType> {
        self.arena[id].as_entity()
    }

    /// The entity attached to a node, mutably
    pub fn entity_mut(&mut self, id: NodeId) -> Option<&mut EntityType> {
        self.arena[id].as_entity_mut()
    }

    /// The layer attached to a node, if any
    pub fn layer(&self, id: NodeId) -> Option<&Layer> {
        self.arena[id].as_layer()
    }

    // ======================= section views =======================

    /// Find a top-level section by its `(2, name)` marker property
    pub fn section(&self, name: &str) -> Option<NodeId> {
        self.arena[self.root]
            .children()
            .iter()
            .copied()
            .find(|&c| {
                matches!(self.arena[c].data, NodeData::Section) && self.arena[c].name() == Some(name)
            })
    }

    /// The ENTITIES section
    pub fn entities_section(&self) -> Option<NodeId> {
        self.section("ENTITIES")
    }

    /// The BLOCKS section
    pub fn blocks_section(&self) -> Option<NodeId> {
        self.section("BLOCKS")
    }

    /// The TABLES section
    pub fn tables_section(&self) -> Option<NodeId> {
        self.section("TABLES")
    }

    /// The LAYER table inside the TABLES section
    pub fn layer_table(&self) -> Option<NodeId> {
        let tables = self.tables_section()?;
        self.arena[tables].children().iter().copied().find(|&c| {
            matches!(self.arena[c].data, NodeData::Table) && self.arena[c].name() == Some("LAYER")
        })
    }

    /// Entity nodes in the ENTITIES section, in drawing order
    pub fn entities(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.children_of(self.entities_section())
            .filter(|&c| matches!(self.arena[c].data, NodeData::Entity(_)))
    }

    /// Layer nodes in the layer table
    pub fn layers(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.children_of(self.layer_table())
            .filter(|&c| matches!(self.arena[c].data, NodeData::Layer(_)))
    }

    /// Block definition nodes in the BLOCKS section
    pub fn blocks(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.children_of(self.blocks_section())
            .filter(|&c| matches!(self.arena[c].data, NodeData::Entity(EntityType::Block(_))))
    }

    fn children_of(&self, container: Option<NodeId>) -> impl Iterator<Item = NodeId> + '_ {
        container
            .map(|id| self.arena[id].children().to_vec())
            .unwrap_or_default()
            .into_iter()
    }

    /// Find a layer by name, case-insensitively
    pub fn find_layer_by_name(&self, name: &str) -> Option<NodeId> {
        self.layers().find(|&id| {
            self.arena[id]
                .as_layer()
                .is_some_and(|l| l.name.eq_ignore_ascii_case(name))
        })
    }

    /// Find a block definition by name, case-insensitively
    pub fn find_block_by_name(&self, name: &str) -> Option<NodeId> {
        self.blocks().find(|&id| {
            matches!(&self.arena[id].data,
                NodeData::Entity(EntityType::Block(b)) if b.name.eq_ignore_ascii_case(name))
        })
    }

    // ======================= mutation points =======================

    /// Add an entity to the ENTITIES section, creating the section when
    /// the document does not have one yet.  Returns the new node's id.
    pub fn add_entity(&mut self, entity: EntityType) -> NodeId {
        let section = self.ensure_section("ENTITIES");
        let node = self.new_entity_node(entity);
        self.insert_before_end_marker(section, node);
        node
    }

    /// Detach an entity node from the document.  Returns `false` if the
    /// node was not attached.
    pub fn remove_entity(&mut self, id: NodeId) -> bool {
        self.arena.detach(id)
    }

    /// Add a layer to the layer table, creating the TABLES section and the
    /// table when missing.  Returns the new node's id.
    pub fn add_layer(&mut self, layer: Layer) -> NodeId {
        let table = self.ensure_layer_table();
        let node = self.new_layer_node(layer);
        self.insert_before_end_marker(table, node);
        node
    }

    /// Find a layer by name or create it with default settings
    pub fn get_or_create_layer(&mut self, name: &str) -> NodeId {
        match self.find_layer_by_name(name) {
            Some(id) => id,
            None => self.add_layer(Layer::new(name)),
        }
    }

    /// Add a block definition to the BLOCKS section, creating the section
    /// when missing.  The block node is given its ENDBLK marker; entities
    /// go in through [`add_block_entity`](Self::add_block_entity).
    pub fn add_block(&mut self, block: Block) -> NodeId {
        let section = self.ensure_section("BLOCKS");
        let mut properties = vec![Property::new(0, "BLOCK")];
        block.synchronize(&mut properties);
        let mut node = DocumentNode::new(NodeData::Entity(EntityType::Block(block)));
        node.properties = properties;
        let id = self.arena.alloc(node);
        let end = self
            .arena
            .alloc(DocumentNode::with_property(NodeData::EndMarker, 0, "ENDBLK"));
        self.arena.append_child(id, end);
        self.insert_before_end_marker(section, id);
        id
    }

    /// Add an entity to a block definition, keeping it ahead of the
    /// block's ENDBLK marker
    pub fn add_block_entity(&mut self, block: NodeId, entity: EntityType) -> NodeId {
        let node = self.new_entity_node(entity);
        self.insert_before_end_marker(block, node);
        node
    }

    // ======================= synchronization =======================

    /// Run `materialize` over every typed node in the tree.
    ///
    /// With `failsafe` set, field errors become notifications instead of
    /// aborting.
    pub(crate) fn materialize_all(&mut self, failsafe: bool) -> Result<()> {
        for id in self.arena.ids().collect::<Vec<_>>() {
            let node = &mut self.arena[id];
            let DocumentNode {
                properties, data, ..
            } = node;
            let result = match data {
                NodeData::Layer(layer) => {
                    layer.materialize(properties);
                    Ok(())
                }
                NodeData::Entity(entity) => entity.as_entity_mut().materialize(properties),
                _ => Ok(()),
            };
            if let Err(err) = result {
                if failsafe {
                    self.notifications.notify(
                        crate::notification::NotificationKind::FieldError,
                        err.to_string(),
                    );
                } else {
                    return Err(err);
                }
            }
        }
        Ok(())
    }

    /// Run `synchronize` over every typed node so edits made to typed
    /// fields are reflected in the property lists before writing
    pub(crate) fn synchronize_all(&mut self) {
        for id in self.arena.ids().collect::<Vec<_>>() {
            let node = &mut self.arena[id];
            let DocumentNode {
                properties, data, ..
            } = node;
            match data {
                NodeData::Layer(layer) => layer.synchronize(properties),
                NodeData::Entity(entity) => entity.as_entity().synchronize(properties),
                _ => {}
            }
        }
    }

    // ======================= construction helpers =======================

    fn new_section(&mut self, name: &str) -> NodeId {
        self.alloc_container(NodeData::Section, "SECTION", Some(name), "ENDSEC")
    }

    fn alloc_container(
        &mut self,
        data: NodeData,
        type_name: &str,
        name: Option<&str>,
        end_marker: &str,
    ) -> NodeId {
        let mut node = DocumentNode::with_property(data, 0, type_name);
        if let Some(name) = name {
            node.add_property(2, name);
        }
        let id = self.arena.alloc(node);
        let end = self
            .arena
            .alloc(DocumentNode::with_property(NodeData::EndMarker, 0, end_marker));
        self.arena.append_child(id, end);
        id
    }

    fn new_layer_node(&mut self, layer: Layer) -> NodeId {
        let mut properties = vec![Property::new(0, "LAYER")];
        layer.synchronize(&mut properties);
        let mut node = DocumentNode::new(NodeData::Layer(layer));
        node.properties = properties;
        self.arena.alloc(node)
    }

    fn new_entity_node(&mut self, entity: EntityType) -> NodeId {
        let type_name = match &entity {
            EntityType::Unknown(u) => u.dxf_name.clone(),
            other => other.as_entity().type_name().to_string(),
        };
        let mut properties = vec![Property::new(0, type_name)];
        entity.as_entity().synchronize(&mut properties);
        let mut node = DocumentNode::new(NodeData::Entity(entity));
        node.properties = properties;
        self.arena.alloc(node)
    }

    /// Insert a child just ahead of the container's trailing end marker,
    /// or at the end when the container has none
    fn insert_before_end_marker(&mut self, container: NodeId, child: NodeId) {
        let position = self.arena[container]
            .children()
            .iter()
            .position(|&c| matches!(self.arena[c].data, NodeData::EndMarker))
            .unwrap_or(self.arena[container].children().len());
        self.arena.insert_child(container, position, child);
    }

    fn ensure_section(&mut self, name: &str) -> NodeId {
        if let Some(id) = self.section(name) {
            return id;
        }
        let section = self.new_section(name);
        // Keep BLOCKS and TABLES ahead of ENTITIES, and everything ahead
        // of the EOF marker
        let root_children = self.arena[self.root].children();
        let position = root_children
            .iter()
            .position(|&c| {
                (name != "ENTITIES" && self.arena[c].name() == Some("ENTITIES"))
                    || matches!(self.arena[c].data, NodeData::Eof)
            })
            .unwrap_or(root_children.len());
        self.arena.insert_child(self.root, position, section);
        section
    }

    fn ensure_layer_table(&mut self) -> NodeId {
        if let Some(id) = self.layer_table() {
            return id;
        }
        let tables = self.ensure_section("TABLES");
        let table = self.alloc_container(NodeData::Table, "TABLE", Some("LAYER"), "ENDTAB");
        self.insert_before_end_marker(tables, table);
        table
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}
