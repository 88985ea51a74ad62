//! DXF stream writer.
//!
//! The inverse of the reader needs no per-kind logic: the tree already
//! encodes the structure, so emission is a pre-order walk — each node's
//! properties in list order, then its children in list order.

use crate::document::Document;
use crate::error::Result;
use crate::node::NodeId;
use std::io::Write;

/// DXF text writer
pub struct DxfWriter<W: Write> {
    writer: W,
}

impl<W: Write> DxfWriter<W> {
    /// Create a writer over any byte sink
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Synchronize typed fields into properties, then emit the whole tree
    pub fn write(&mut self, document: &mut Document) -> Result<()> {
        document.synchronize_all();
        self.write_subtree(document, document.root())?;
        self.writer.flush()?;
        Ok(())
    }

    fn write_subtree(&mut self, document: &Document, id: NodeId) -> Result<()> {
        let node = document.node(id);
        for property in &node.properties {
            self.write_pair(property.code, &property.value)?;
        }
        for &child in node.children() {
            self.write_subtree(document, child)?;
        }
        Ok(())
    }

    /// Emit one record: the code right-aligned in a three-character field,
    /// then the value line
    fn write_pair(&mut self, code: i32, value: &str) -> Result<()> {
        if (0..10).contains(&code) {
            writeln!(self.writer, "  {}", code)?;
        } else if (10..100).contains(&code) {
            writeln!(self.writer, " {}", code)?;
        } else {
            writeln!(self.writer, "{}", code)?;
        }
        writeln!(self.writer, "{}", value)?;
        Ok(())
    }

    /// Get the inner writer back
    pub fn into_inner(self) -> W {
        self.writer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{EntityType, Line};
    use crate::types::Vector2;

    fn write_to_string(document: &mut Document) -> String {
        let mut writer = DxfWriter::new(Vec::new());
        writer.write(document).unwrap();
        String::from_utf8(writer.into_inner()).unwrap()
    }

    #[test]
    fn test_code_field_alignment() {
        let mut doc = Document::new();
        let output = write_to_string(&mut doc);
        assert!(output.starts_with("  0\nSECTION\n  2\nHEADER\n"));
        // Two-digit codes get a single leading space
        assert!(output.contains("\n 70\n"));
    }

    #[test]
    fn test_empty_document_stream_shape() {
        let mut doc = Document::new();
        let output = write_to_string(&mut doc);
        // Sections close in order and the stream ends with EOF
        let endsec_count = output.matches("ENDSEC").count();
        assert_eq!(endsec_count, 3);
        assert!(output.trim_end().ends_with("  0\nEOF"));
    }

    #[test]
    fn test_typed_edit_is_written() {
        let mut doc = Document::new();
        let id = doc.add_entity(EntityType::Line(Line::from_points(
            Vector2::ZERO,
            Vector2::new(1.0, 1.0),
        )));
        // Edit the typed field only; synchronization must carry it out
        if let Some(EntityType::Line(line)) = doc.entity_mut(id) {
            line.end = Vector2::new(42.0, 1.0);
        }
        let output = write_to_string(&mut doc);
        assert!(output.contains("\n 11\n42.0\n"));
    }
}
