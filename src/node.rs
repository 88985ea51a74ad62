//! Generic document tree model.
//!
//! The exchange format is a flat stream of `(group code, value)` pairs, so
//! the in-memory model mirrors it directly: every node owns an ordered
//! property list and an ordered child list, and nothing else.  Encounter
//! order of both lists is preserved verbatim across a read → write round
//! trip — repeated codes (polyline vertices, text continuations) are
//! positional and must not be re-sorted or deduplicated.
//!
//! Nodes live in a [`NodeArena`] and refer to each other through stable
//! [`NodeId`] handles.  Parent links and the resolver's entity→layer /
//! insert→block associations are plain ids: non-owning, nullable, and never
//! used to manage lifetimes, so reference cycles through nested block
//! insertions cannot leak or recurse unboundedly.

use crate::entities::EntityType;
use crate::error::{DxfError, Result};
use crate::tables::Layer;
use std::ops::{Index, IndexMut};

/// The atomic datum of the format: an integer group code and its raw value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    /// The group code
    pub code: i32,
    /// The value, kept as an uninterpreted string until a typed node
    /// materializes it
    pub value: String,
}

impl Property {
    /// Create a new property
    pub fn new(code: i32, value: impl Into<String>) -> Self {
        Property {
            code,
            value: value.into(),
        }
    }

    /// Parse the value as a float (period decimal separator, any locale)
    pub fn as_f64(&self) -> Result<f64> {
        self.value
            .trim()
            .parse::<f64>()
            .map_err(|_| DxfError::MalformedField {
                code: self.code,
                value: self.value.clone(),
            })
    }

    /// Parse the value as an integer
    pub fn as_i32(&self) -> Result<i32> {
        self.value
            .trim()
            .parse::<i32>()
            .map_err(|_| DxfError::MalformedField {
                code: self.code,
                value: self.value.clone(),
            })
    }

    /// The value with surrounding whitespace removed
    pub fn text(&self) -> &str {
        self.value.trim()
    }
}

/// First property with the given code, if any.
pub fn find_code(props: &[Property], code: i32) -> Option<&Property> {
    props.iter().find(|p| p.code == code)
}

/// Update the first property with the given code, or append one.
///
/// This is the synchronization primitive: codes owned by a typed node are
/// rewritten in place so codes it does not own keep their position and
/// value.
pub fn update_or_add(props: &mut Vec<Property>, code: i32, value: impl Into<String>) {
    let value = value.into();
    match props.iter_mut().find(|p| p.code == code) {
        Some(p) => p.value = value,
        None => props.push(Property::new(code, value)),
    }
}

/// Drop every property carrying one of the given codes.
///
/// Used before re-emitting list-valued codes (vertices, text
/// continuations), which are positional and must be rewritten as a whole.
pub fn remove_codes(props: &mut Vec<Property>, codes: &[i32]) {
    props.retain(|p| !codes.contains(&p.code));
}

/// Canonical float formatting for property values: period decimal
/// separator regardless of host locale, trailing zeros trimmed, always at
/// least one decimal digit.
pub fn format_float(value: f64) -> String {
    if value == value.trunc() && value.abs() < 1e15 {
        format!("{:.1}", value)
    } else {
        let formatted = format!("{:.15}", value);
        let trimmed = formatted.trim_end_matches('0');
        if trimmed.ends_with('.') {
            format!("{}0", trimmed)
        } else {
            trimmed.to_string()
        }
    }
}

/// Stable handle into a [`NodeArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(u32);

impl NodeId {
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// The typed attachment of a node.
///
/// A node's kind is always recoverable from its first `(0, …)` property (or
/// its `(2, …)` name for sections and tables); the variant here selects
/// which materializer applies, it is not a second copy of that information.
#[derive(Debug, Clone)]
pub enum NodeData {
    /// The document root; its children are the top-level sections
    Root,
    /// A `SECTION` container
    Section,
    /// A `TABLE` container inside the TABLES section
    Table,
    /// An `ENDSEC` / `ENDTAB` / `ENDBLK` marker, kept as the last child of
    /// the container it closes
    EndMarker,
    /// The `EOF` marker
    Eof,
    /// A `LAYER` table entry
    Layer(Layer),
    /// A graphical entity (including `BLOCK` definitions, whose children
    /// are the block's owned entities).  Object kinds outside the dispatch
    /// table land here too, as the `Unknown` variant, preserved losslessly
    /// as their flat property list.
    Entity(EntityType),
}

/// A node in the document tree.
#[derive(Debug, Clone)]
pub struct DocumentNode {
    /// Ordered property list, exactly as encountered in the stream
    pub properties: Vec<Property>,
    /// Typed attachment
    pub data: NodeData,
    children: Vec<NodeId>,
    parent: Option<NodeId>,
}

impl DocumentNode {
    /// Create a node with no properties or children
    pub fn new(data: NodeData) -> Self {
        DocumentNode {
            properties: Vec::new(),
            data,
            children: Vec::new(),
            parent: None,
        }
    }

    /// Create a node seeded with one property
    pub fn with_property(data: NodeData, code: i32, value: impl Into<String>) -> Self {
        let mut node = Self::new(data);
        node.properties.push(Property::new(code, value));
        node
    }

    /// Append a property
    pub fn add_property(&mut self, code: i32, value: impl Into<String>) {
        self.properties.push(Property::new(code, value));
    }

    /// Ordered child ids
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Parent id, for upward navigation only
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// The value of the node's first property when it is a `(0, …)` pair —
    /// the object kind for structural and entity nodes
    pub fn type_name(&self) -> Option<&str> {
        self.properties
            .first()
            .filter(|p| p.code == 0)
            .map(|p| p.text())
    }

    /// The node's `(2, …)` name — section names, table names, block names
    pub fn name(&self) -> Option<&str> {
        self.properties
            .iter()
            .find(|p| p.code == 2)
            .map(|p| p.text())
    }

    /// The entity attachment, if this node is an entity
    pub fn as_entity(&self) -> Option<&EntityType> {
        match &self.data {
            NodeData::Entity(e) => Some(e),
            _ => None,
        }
    }

    /// Mutable entity attachment
    pub fn as_entity_mut(&mut self) -> Option<&mut EntityType> {
        match &mut self.data {
            NodeData::Entity(e) => Some(e),
            _ => None,
        }
    }

    /// The layer attachment, if this node is a layer table entry
    pub fn as_layer(&self) -> Option<&Layer> {
        match &self.data {
            NodeData::Layer(l) => Some(l),
            _ => None,
        }
    }

    /// Mutable layer attachment
    pub fn as_layer_mut(&mut self) -> Option<&mut Layer> {
        match &mut self.data {
            NodeData::Layer(l) => Some(l),
            _ => None,
        }
    }
}

/// Owns every node of one document.
///
/// Slots are never reclaimed while the document lives; detaching a node
/// only removes it from its parent's child list, so outstanding ids stay
/// valid.
#[derive(Debug, Clone, Default)]
pub struct NodeArena {
    nodes: Vec<DocumentNode>,
}

impl NodeArena {
    /// Create an empty arena
    pub fn new() -> Self {
        NodeArena { nodes: Vec::new() }
    }

    /// Number of allocated nodes (detached nodes included)
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the arena has no nodes
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Move a node into the arena, returning its id
    pub fn alloc(&mut self, node: DocumentNode) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Append `child` to `parent`'s child list and set its parent link
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.nodes[child.index()].parent = Some(parent);
        self.nodes[parent.index()].children.push(child);
    }

    /// Insert `child` at `index` in `parent`'s child list
    pub fn insert_child(&mut self, parent: NodeId, index: usize, child: NodeId) {
        self.nodes[child.index()].parent = Some(parent);
        self.nodes[parent.index()].children.insert(index, child);
    }

    /// Remove `node` from its parent's child list.
    ///
    /// The slot stays allocated; only the tree link is severed.  Returns
    /// `true` if the node was attached.
    pub fn detach(&mut self, node: NodeId) -> bool {
        let Some(parent) = self.nodes[node.index()].parent.take() else {
            return false;
        };
        let siblings = &mut self.nodes[parent.index()].children;
        match siblings.iter().position(|&c| c == node) {
            Some(pos) => {
                siblings.remove(pos);
                true
            }
            None => false,
        }
    }

    /// Every allocated id, in allocation order (detached nodes included)
    pub fn ids(&self) -> impl Iterator<Item = NodeId> {
        (0..self.nodes.len() as u32).map(NodeId)
    }

    /// Pre-order traversal of the subtree rooted at `root`
    pub fn descendants(&self, root: NodeId) -> Descendants<'_> {
        Descendants {
            arena: self,
            stack: vec![root],
        }
    }
}

impl Index<NodeId> for NodeArena {
    type Output = DocumentNode;

    fn index(&self, id: NodeId) -> &DocumentNode {
        &self.nodes[id.index()]
    }
}

impl IndexMut<NodeId> for NodeArena {
    fn index_mut(&mut self, id: NodeId) -> &mut DocumentNode {
        &mut self.nodes[id.index()]
    }
}

/// Pre-order iterator over a subtree.
pub struct Descendants<'a> {
    arena: &'a NodeArena,
    stack: Vec<NodeId>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.stack.pop()?;
        let node = &self.arena[id];
        // Push in reverse so children come out in list order
        for &child in node.children().iter().rev() {
            self.stack.push(child);
        }
        Some(id)
    }
}
