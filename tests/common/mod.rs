//! Shared test utilities for dxfdom integration tests.

#![allow(dead_code)]

use dxfdom::io::dxf::{DxfReader, DxfWriter};
use dxfdom::Document;

/// Read a document from an in-memory stream.
pub fn read_str(data: &str) -> Document {
    DxfReader::new(std::io::Cursor::new(data.as_bytes().to_vec()))
        .read()
        .expect("stream should parse")
}

/// Write a document to an in-memory stream.
pub fn write_string(document: &mut Document) -> String {
    let mut writer = DxfWriter::new(Vec::new());
    writer.write(document).expect("write should succeed");
    String::from_utf8(writer.into_inner()).expect("output should be UTF-8")
}

/// Split a stream into its `(code, value)` records, whitespace-trimmed.
///
/// This is the equivalence the round-trip guarantees: the same records in
/// the same order, independent of code-field padding.
pub fn record_pairs(stream: &str) -> Vec<(i32, String)> {
    let lines: Vec<&str> = stream.lines().collect();
    lines
        .chunks(2)
        .filter(|chunk| chunk.len() == 2)
        .map(|chunk| {
            (
                chunk[0].trim().parse::<i32>().expect("code line"),
                chunk[1].trim().to_string(),
            )
        })
        .collect()
}

/// A minimal well-formed drawing: one layer, one line, one circle.
pub fn minimal_drawing() -> String {
    "  0\nSECTION\n  2\nHEADER\n  0\nENDSEC\n\
       0\nSECTION\n  2\nTABLES\n\
       0\nTABLE\n  2\nLAYER\n\
       0\nLAYER\n  2\nWalls\n 70\n0\n 62\n1\n  6\nCONTINUOUS\n\
       0\nENDTAB\n  0\nENDSEC\n\
       0\nSECTION\n  2\nENTITIES\n\
       0\nLINE\n  8\nWalls\n 62\n256\n 10\n0.0\n 20\n0.0\n 11\n10.0\n 21\n10.0\n\
       0\nCIRCLE\n  8\nWalls\n 62\n3\n 10\n5.0\n 20\n5.0\n 40\n2.5\n\
       0\nENDSEC\n  0\nEOF\n"
        .to_string()
}

/// A drawing with a block definition and an insertion referencing it.
pub fn drawing_with_block() -> String {
    "  0\nSECTION\n  2\nBLOCKS\n\
       0\nBLOCK\n  2\nDOOR\n 10\n0.0\n 20\n0.0\n\
       0\nLINE\n 10\n0.0\n 20\n0.0\n 11\n1.0\n 21\n0.0\n\
       0\nLINE\n 10\n1.0\n 20\n0.0\n 11\n1.0\n 21\n2.0\n\
       0\nENDBLK\n\
       0\nENDSEC\n\
       0\nSECTION\n  2\nENTITIES\n\
       0\nINSERT\n  2\ndoor\n 10\n10.0\n 20\n20.0\n 41\n2.0\n 42\n2.0\n\
       0\nENDSEC\n  0\nEOF\n"
        .to_string()
}
