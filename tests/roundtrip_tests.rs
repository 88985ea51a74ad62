//! Read → write round-trip guarantees

mod common;

use common::{drawing_with_block, minimal_drawing, read_str, record_pairs, write_string};
use dxfdom::entities::{EntityType, Line};
use dxfdom::types::Vector2;
use dxfdom::Document;
use proptest::prelude::*;

/// Reading a stream and writing it back reproduces the same records in the
/// same structural order, numeric reformatting aside.
fn assert_roundtrip_equivalent(stream: &str) {
    let mut doc = read_str(stream);
    let output = write_string(&mut doc);

    let before = record_pairs(stream);
    let after = record_pairs(&output);
    assert_eq!(before.len(), after.len(), "record count must survive");
    for ((code_a, value_a), (code_b, value_b)) in before.iter().zip(after.iter()) {
        assert_eq!(code_a, code_b, "group codes must survive in order");
        // Numeric values may be reformatted; compare numerically when both
        // sides parse, byte-wise otherwise
        match (value_a.parse::<f64>(), value_b.parse::<f64>()) {
            (Ok(a), Ok(b)) => assert!((a - b).abs() < 1e-9, "{} != {}", value_a, value_b),
            _ => assert_eq!(value_a, value_b),
        }
    }
}

#[test]
fn test_minimal_drawing_roundtrip() {
    assert_roundtrip_equivalent(&minimal_drawing());
}

#[test]
fn test_block_drawing_roundtrip() {
    assert_roundtrip_equivalent(&drawing_with_block());
}

#[test]
fn test_default_document_roundtrip() {
    let mut doc = Document::new();
    let written = write_string(&mut doc);

    let reread = read_str(&written);
    assert_eq!(reread.layers().count(), 1);
    assert_eq!(
        reread
            .layer(reread.layers().next().unwrap())
            .unwrap()
            .name,
        "0"
    );
    assert_eq!(reread.entities().count(), 0);

    // And the second pass is byte-stable
    let mut reread = reread;
    assert_eq!(write_string(&mut reread), written);
}

#[test]
fn test_unknown_entity_preserved_byte_for_byte() {
    let data = "  0\nSECTION\n  2\nENTITIES\n\
                  0\nFUTURE_THING\n  8\nmystery\n1001\nACAD\n1070\n42\n 10\n1.25\n\
                  0\nENDSEC\n  0\nEOF\n";
    let mut doc = read_str(data);
    let output = write_string(&mut doc);

    // Every record of the unknown entity survives verbatim
    let wanted = [
        (0, "FUTURE_THING"),
        (8, "mystery"),
        (1001, "ACAD"),
        (1070, "42"),
        (10, "1.25"),
    ];
    let pairs = record_pairs(&output);
    let start = pairs
        .iter()
        .position(|(_, v)| v == "FUTURE_THING")
        .expect("unknown entity is written back");
    for (offset, (code, value)) in wanted.iter().enumerate() {
        assert_eq!(pairs[start + offset].0, *code);
        assert_eq!(pairs[start + offset].1, *value);
    }
}

#[test]
fn test_double_roundtrip_is_stable() {
    // write(read(s)) may reformat once; after that the stream is a fixed
    // point
    let mut doc = read_str(&minimal_drawing());
    let once = write_string(&mut doc);
    let mut doc2 = read_str(&once);
    let twice = write_string(&mut doc2);
    assert_eq!(once, twice);
}

proptest! {
    #[test]
    fn prop_line_geometry_roundtrips(
        x1 in -1e6f64..1e6, y1 in -1e6f64..1e6,
        x2 in -1e6f64..1e6, y2 in -1e6f64..1e6,
    ) {
        let mut doc = Document::new();
        doc.add_entity(EntityType::Line(Line::from_points(
            Vector2::new(x1, y1),
            Vector2::new(x2, y2),
        )));
        let written = write_string(&mut doc);
        let reread = read_str(&written);

        let id = reread.entities().next().unwrap();
        let Some(EntityType::Line(line)) = reread.entity(id) else {
            panic!("expected a line back");
        };
        prop_assert!((line.start.x - x1).abs() < 1e-9);
        prop_assert!((line.start.y - y1).abs() < 1e-9);
        prop_assert!((line.end.x - x2).abs() < 1e-9);
        prop_assert!((line.end.y - y2).abs() < 1e-9);
    }

    #[test]
    fn prop_record_structure_survives_roundtrip(radius in 0.001f64..1e6) {
        let data = format!(
            "  0\nSECTION\n  2\nENTITIES\n  0\nCIRCLE\n 10\n0.5\n 20\n0.5\n 40\n{}\n  0\nENDSEC\n  0\nEOF\n",
            radius
        );
        let mut doc = read_str(&data);
        let output = write_string(&mut doc);
        let before = record_pairs(&data);
        let after = record_pairs(&output);
        prop_assert_eq!(before.len(), after.len());
        for ((code_a, _), (code_b, _)) in before.iter().zip(after.iter()) {
            prop_assert_eq!(code_a, code_b);
        }
    }
}
