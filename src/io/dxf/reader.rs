//! DXF stream reader.
//!
//! The format has no grammar for closing a plain entity: an object opened
//! by one code 0 record is closed implicitly by the *next* code 0 record.
//! The reader models that one piece of ambiguity as an explicit two-state
//! machine ([`ReadState`]) driving a stack of open containers.

use crate::document::Document;
use crate::entities::{Block, EntityType, Unknown};
use crate::error::{DxfError, Result};
use crate::node::{DocumentNode, NodeData, NodeId, Property};
use crate::notification::NotificationKind;
use crate::tables::Layer;
use encoding_rs::Encoding;
use std::io::{BufReader, Read};

/// Configuration for the DXF reader.
#[derive(Debug, Clone)]
pub struct DxfReaderConfiguration {
    /// When `true`, field-materialization errors inside known entities are
    /// recorded as notifications instead of aborting the read.
    ///
    /// Default: `false` (strict mode — errors propagate).
    pub failsafe: bool,
}

impl Default for DxfReaderConfiguration {
    fn default() -> Self {
        Self { failsafe: false }
    }
}

/// A raw code/value record as it appeared on the wire
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodePair {
    /// The group code
    pub code: i32,
    /// The trimmed, unescaped value
    pub value: String,
}

impl CodePair {
    /// Create a code/value pair
    pub fn new(code: i32, value: impl Into<String>) -> Self {
        Self {
            code,
            value: value.into(),
        }
    }
}

/// Where the state machine stands between code 0 records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReadState {
    /// Nothing is pending; the stack top is a real container
    Idle,
    /// The stack top is a plain object that the next code 0 record closes
    /// implicitly
    AwaitingImplicitClose,
}

/// DXF text reader
pub struct DxfReader<R: Read> {
    reader: BufReader<R>,
    line_number: usize,
    /// Non-UTF8 fallback encoding.  `None` means Latin-1 (byte-to-char).
    encoding: Option<&'static Encoding>,
    config: DxfReaderConfiguration,
    truncated: bool,
}

impl<R: Read> DxfReader<R> {
    /// Create a reader over any byte stream
    pub fn new(reader: R) -> Self {
        Self {
            reader: BufReader::new(reader),
            line_number: 0,
            encoding: None,
            config: DxfReaderConfiguration::default(),
            truncated: false,
        }
    }

    /// Set the reader configuration
    pub fn with_configuration(mut self, config: DxfReaderConfiguration) -> Self {
        self.config = config;
        self
    }

    /// Set the fallback encoding for non-UTF8 bytes
    pub fn with_encoding(mut self, encoding: &'static Encoding) -> Self {
        self.encoding = Some(encoding);
        self
    }

    /// Consume the stream and return the document: structural pass,
    /// typed-field materialization, then reference resolution.
    pub fn read(mut self) -> Result<Document> {
        let mut document = Document::bare();
        let root = document.root();
        let mut stack: Vec<NodeId> = vec![root];
        let mut state = ReadState::Idle;

        while let Some(pair) = self.read_pair()? {
            if pair.code != 0 {
                let top = *stack.last().unwrap();
                document.node_mut(top).properties.push(Property::new(pair.code, pair.value));
                continue;
            }

            match pair.value.as_str() {
                "SECTION" | "TABLE" => {
                    state = ReadState::Idle;
                    let data = if pair.value == "SECTION" {
                        NodeData::Section
                    } else {
                        NodeData::Table
                    };
                    let node = document
                        .nodes_mut()
                        .alloc(DocumentNode::with_property(data, 0, &*pair.value));
                    let top = *stack.last().unwrap();
                    document.nodes_mut().append_child(top, node);
                    stack.push(node);
                }
                "BLOCK" => {
                    // A block is both an entity and a container: its
                    // children are the block's owned entities
                    state = ReadState::Idle;
                    let node = document.nodes_mut().alloc(DocumentNode::with_property(
                        NodeData::Entity(EntityType::Block(Block::new())),
                        0,
                        "BLOCK",
                    ));
                    let top = *stack.last().unwrap();
                    document.nodes_mut().append_child(top, node);
                    stack.push(node);
                }
                "ENDSEC" | "ENDTAB" | "ENDBLK" => {
                    // A pending plain object is closed by this marker
                    // before the container itself closes
                    if state == ReadState::AwaitingImplicitClose {
                        stack.pop();
                    }
                    state = ReadState::Idle;
                    let top = *stack.last().unwrap();
                    let marker = document
                        .nodes_mut()
                        .alloc(DocumentNode::with_property(NodeData::EndMarker, 0, &*pair.value));
                    document.nodes_mut().append_child(top, marker);
                    if stack.len() > 1 {
                        stack.pop();
                    } else {
                        document.notifications.notify(
                            NotificationKind::UnbalancedEndMarker,
                            format!("{} with no open container", pair.value),
                        );
                    }
                }
                "EOF" => {
                    if state == ReadState::AwaitingImplicitClose {
                        stack.pop();
                    }
                    let top = *stack.last().unwrap();
                    let marker = document
                        .nodes_mut()
                        .alloc(DocumentNode::with_property(NodeData::Eof, 0, "EOF"));
                    document.nodes_mut().append_child(top, marker);
                    if stack.len() > 1 {
                        stack.pop();
                    }
                    break;
                }
                name => {
                    // Any other code 0 value opens an object; a previously
                    // open one has just been closed implicitly
                    if state == ReadState::AwaitingImplicitClose {
                        stack.pop();
                    }
                    let data = if name == "LAYER" {
                        NodeData::Layer(Layer::layer_0())
                    } else {
                        match EntityType::from_type_name(name) {
                            Some(entity) => NodeData::Entity(entity),
                            None => {
                                document.notifications.notify(
                                    NotificationKind::UnknownObjectType,
                                    name.to_string(),
                                );
                                NodeData::Entity(EntityType::Unknown(Unknown::new(name)))
                            }
                        }
                    };
                    let node = document
                        .nodes_mut()
                        .alloc(DocumentNode::with_property(data, 0, name));
                    let top = *stack.last().unwrap();
                    document.nodes_mut().append_child(top, node);
                    stack.push(node);
                    state = ReadState::AwaitingImplicitClose;
                }
            }
        }

        if self.truncated {
            document.notifications.notify(
                NotificationKind::TruncatedStream,
                format!("stream ended mid-record at line {}", self.line_number),
            );
        }

        document.materialize_all(self.config.failsafe)?;
        document.resolve_references();
        Ok(document)
    }

    /// Read a single line, tolerating non-UTF8 bytes: UTF-8 first, then
    /// the configured encoding, then Latin-1 byte mapping.
    fn read_line(&mut self) -> Result<Option<String>> {
        let mut bytes = Vec::new();
        loop {
            let mut byte = [0u8; 1];
            match self.reader.read(&mut byte) {
                Ok(0) => {
                    if bytes.is_empty() {
                        return Ok(None);
                    }
                    break;
                }
                Ok(_) => {
                    if byte[0] == b'\n' {
                        break;
                    }
                    bytes.push(byte[0]);
                }
                Err(e) => return Err(e.into()),
            }
        }

        self.line_number += 1;

        let line = match String::from_utf8(bytes) {
            Ok(s) => s,
            Err(err) => {
                let bytes = err.into_bytes();
                if let Some(encoding) = self.encoding {
                    let (decoded, _, _) = encoding.decode(&bytes);
                    decoded.into_owned()
                } else {
                    // Latin-1 maps bytes 0-255 straight to code points
                    bytes.iter().map(|&b| b as char).collect()
                }
            }
        };

        Ok(Some(line.trim().to_string()))
    }

    /// Read one code/value record.
    ///
    /// `Ok(None)` means the stream is exhausted — either cleanly or in the
    /// middle of a record, which is tolerated and flagged for the caller.
    /// A code line that is not an integer is fatal.
    fn read_pair(&mut self) -> Result<Option<CodePair>> {
        let code_line = match self.read_line()? {
            Some(line) => line,
            None => return Ok(None),
        };

        // Some writers leave a blank trailer; treat it as end of stream
        if code_line.is_empty() {
            return Ok(None);
        }

        let code = code_line.parse::<i32>().map_err(|_| DxfError::MalformedRecord {
            line: self.line_number,
            text: code_line,
        })?;

        let value_line = match self.read_line()? {
            Some(line) => line,
            None => {
                self.truncated = true;
                return Ok(None);
            }
        };

        Ok(Some(CodePair::new(code, unescape(&value_line))))
    }
}

/// Decode the format's caret escapes in string values
fn unescape(value: &str) -> String {
    value
        .replace("^J", "\n")
        .replace("^M", "\r")
        .replace("^I", "\t")
        .replace("^ ", "^")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn reader(data: &str) -> DxfReader<Cursor<Vec<u8>>> {
        DxfReader::new(Cursor::new(data.as_bytes().to_vec()))
    }

    #[test]
    fn test_read_pair() {
        let mut r = reader("0\nSECTION\n");
        let pair = r.read_pair().unwrap().unwrap();
        assert_eq!(pair, CodePair::new(0, "SECTION"));
        assert!(r.read_pair().unwrap().is_none());
    }

    #[test]
    fn test_read_pair_trims_and_unescapes() {
        let mut r = reader("  1  \nline1^Jline2^ up\n");
        let pair = r.read_pair().unwrap().unwrap();
        assert_eq!(pair.code, 1);
        assert_eq!(pair.value, "line1\nline2^up");
    }

    #[test]
    fn test_malformed_code_is_fatal() {
        let mut r = reader("LINE\n0\n");
        assert!(matches!(
            r.read_pair(),
            Err(DxfError::MalformedRecord { line: 1, .. })
        ));
    }

    #[test]
    fn test_missing_value_line_flags_truncation() {
        let mut r = reader("0\nLINE\n10\n");
        assert!(r.read_pair().unwrap().is_some());
        assert!(r.read_pair().unwrap().is_none());
        assert!(r.truncated);
    }

    #[test]
    fn test_latin1_fallback() {
        let mut bytes = b"1\n".to_vec();
        bytes.extend_from_slice(&[0xE9]); // 'é' in Latin-1, invalid UTF-8
        bytes.push(b'\n');
        let mut r = DxfReader::new(Cursor::new(bytes));
        let pair = r.read_pair().unwrap().unwrap();
        assert_eq!(pair.value, "é");
    }

    #[test]
    fn test_implicit_close_between_entities() {
        let data = "0\nSECTION\n2\nENTITIES\n\
                    0\nLINE\n10\n0.0\n20\n0.0\n11\n1.0\n21\n1.0\n\
                    0\nCIRCLE\n10\n5.0\n20\n5.0\n40\n2.0\n\
                    0\nENDSEC\n0\nEOF\n";
        let doc = reader(data).read().unwrap();
        // The circle is a sibling of the line, not its child
        let entities: Vec<_> = doc.entities().collect();
        assert_eq!(entities.len(), 2);
        assert!(matches!(
            doc.entity(entities[0]),
            Some(EntityType::Line(_))
        ));
        assert!(matches!(
            doc.entity(entities[1]),
            Some(EntityType::Circle(_))
        ));
        assert!(doc.node(entities[0]).children().is_empty());
    }

    #[test]
    fn test_unbalanced_end_marker_tolerated() {
        let data = "0\nENDBLK\n0\nEOF\n";
        let doc = reader(data).read().unwrap();
        assert!(doc
            .notifications
            .has_kind(NotificationKind::UnbalancedEndMarker));
    }

    #[test]
    fn test_unknown_type_preserved() {
        let data = "0\nSECTION\n2\nENTITIES\n\
                    0\nFUTURE_THING\n8\nlayer9\n1070\n42\n\
                    0\nENDSEC\n0\nEOF\n";
        let doc = reader(data).read().unwrap();
        let id = doc.entities().next().unwrap();
        let node = doc.node(id);
        assert_eq!(node.type_name(), Some("FUTURE_THING"));
        assert_eq!(node.properties.len(), 3);
        assert!(matches!(doc.entity(id), Some(EntityType::Unknown(u)) if u.dxf_name == "FUTURE_THING"));
        assert!(doc
            .notifications
            .has_kind(NotificationKind::UnknownObjectType));
    }

    #[test]
    fn test_truncated_stream_returns_partial_document() {
        let data = "0\nSECTION\n2\nENTITIES\n0\nLINE\n10\n";
        let doc = reader(data).read().unwrap();
        assert_eq!(doc.entities().count(), 1);
        assert!(doc
            .notifications
            .has_kind(NotificationKind::TruncatedStream));
    }

    #[test]
    fn test_strict_mode_surfaces_field_errors() {
        let data = "0\nSECTION\n2\nENTITIES\n\
                    0\nLINE\n10\nnot_a_number\n\
                    0\nENDSEC\n0\nEOF\n";
        assert!(matches!(
            reader(data).read(),
            Err(DxfError::MalformedField { code: 10, .. })
        ));
    }

    #[test]
    fn test_failsafe_mode_downgrades_field_errors() {
        let data = "0\nSECTION\n2\nENTITIES\n\
                    0\nLINE\n10\nnot_a_number\n\
                    0\nENDSEC\n0\nEOF\n";
        let doc = reader(data)
            .with_configuration(DxfReaderConfiguration { failsafe: true })
            .read()
            .unwrap();
        assert_eq!(doc.entities().count(), 1);
        assert!(doc.notifications.has_kind(NotificationKind::FieldError));
    }

    #[test]
    fn test_layer_entries_are_typed() {
        let data = "0\nSECTION\n2\nTABLES\n\
                    0\nTABLE\n2\nLAYER\n\
                    0\nLAYER\n2\nWalls\n70\n0\n62\n3\n6\nCONTINUOUS\n\
                    0\nENDTAB\n0\nENDSEC\n0\nEOF\n";
        let doc = reader(data).read().unwrap();
        let layers: Vec<_> = doc.layers().collect();
        assert_eq!(layers.len(), 1);
        let layer = doc.layer(layers[0]).unwrap();
        assert_eq!(layer.name, "Walls");
        assert_eq!(layer.color_number, 3);
    }

    #[test]
    fn test_block_container_owns_entities() {
        let data = "0\nSECTION\n2\nBLOCKS\n\
                    0\nBLOCK\n2\nDOOR\n10\n0.0\n20\n0.0\n\
                    0\nLINE\n10\n0.0\n20\n0.0\n11\n1.0\n21\n0.0\n\
                    0\nENDBLK\n\
                    0\nENDSEC\n0\nEOF\n";
        let doc = reader(data).read().unwrap();
        let block = doc.find_block_by_name("DOOR").unwrap();
        let children = doc.node(block).children();
        // The line plus the ENDBLK marker
        assert_eq!(children.len(), 2);
        assert!(matches!(doc.entity(children[0]), Some(EntityType::Line(_))));
        assert!(matches!(
            doc.node(children[1]).data,
            NodeData::EndMarker
        ));
    }

    #[test]
    fn test_stack_balance_on_nested_containers() {
        let data = "0\nSECTION\n2\nTABLES\n\
                    0\nTABLE\n2\nLAYER\n\
                    0\nLAYER\n2\n0\n\
                    0\nENDTAB\n\
                    0\nENDSEC\n\
                    0\nSECTION\n2\nENTITIES\n0\nENDSEC\n\
                    0\nEOF\n";
        let doc = reader(data).read().unwrap();
        // Both sections are direct children of the root
        assert!(doc.tables_section().is_some());
        assert!(doc.entities_section().is_some());
        let root_children = doc.node(doc.root()).children();
        assert_eq!(root_children.len(), 3); // two sections + EOF marker
        assert!(!doc
            .notifications
            .has_kind(NotificationKind::UnbalancedEndMarker));
    }
}
