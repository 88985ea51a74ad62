//! Integration tests for DXF reading

mod common;

use common::{drawing_with_block, minimal_drawing, read_str};
use dxfdom::entities::EntityType;
use dxfdom::{NotificationKind, Rgb};

#[test]
fn test_read_minimal_drawing() {
    let doc = read_str(&minimal_drawing());

    let layers: Vec<_> = doc.layers().collect();
    assert_eq!(layers.len(), 1);
    assert_eq!(doc.layer(layers[0]).unwrap().name, "Walls");
    assert_eq!(doc.layer(layers[0]).unwrap().color_number, 1);

    let entities: Vec<_> = doc.entities().collect();
    assert_eq!(entities.len(), 2);

    let Some(EntityType::Line(line)) = doc.entity(entities[0]) else {
        panic!("first entity should be a line");
    };
    assert_eq!(line.end.x, 10.0);

    let Some(EntityType::Circle(circle)) = doc.entity(entities[1]) else {
        panic!("second entity should be a circle");
    };
    assert_eq!(circle.radius, 2.5);
}

#[test]
fn test_read_resolves_layers_and_colors() {
    let doc = read_str(&minimal_drawing());
    let layer_id = doc.find_layer_by_name("walls").unwrap();

    let entities: Vec<_> = doc.entities().collect();
    // The line defers to its layer (red); the circle is explicitly green
    let line = doc.entity(entities[0]).unwrap().common();
    assert_eq!(line.resolved_layer, Some(layer_id));
    assert_eq!(line.resolved_color, Rgb::RED);

    let circle = doc.entity(entities[1]).unwrap().common();
    assert_eq!(circle.resolved_layer, Some(layer_id));
    assert_eq!(circle.resolved_color, Rgb::GREEN);
}

#[test]
fn test_read_block_and_insertion() {
    let doc = read_str(&drawing_with_block());

    let block = doc.find_block_by_name("DOOR").unwrap();
    // Two lines plus the ENDBLK marker
    assert_eq!(doc.node(block).children().len(), 3);

    let insert_id = doc.entities().next().unwrap();
    let Some(EntityType::Insert(insert)) = doc.entity(insert_id) else {
        panic!("expected an insert");
    };
    // Bound case-insensitively
    assert_eq!(insert.resolved_block, Some(block));

    // Block spans (0,0)-(1,2); scaled by 2 and placed at (10,20)
    let bounds = doc.entity_display_bounds(insert_id);
    assert_eq!(bounds.min.x, 10.0);
    assert_eq!(bounds.min.y, 20.0);
    assert_eq!(bounds.max.x, 12.0);
    assert_eq!(bounds.max.y, 24.0);
}

#[test]
fn test_read_without_any_sections() {
    // A bare entity stream still parses; views over missing sections are
    // simply empty
    let doc = read_str("0\nEOF\n");
    assert!(doc.entities_section().is_none());
    assert_eq!(doc.entities().count(), 0);
    assert_eq!(doc.layers().count(), 0);
}

#[test]
fn test_unknown_section_content_preserved() {
    let data = "  0\nSECTION\n  2\nOBJECTS\n\
                  0\nDICTIONARY\n  5\nC\n280\n0\n\
                  0\nENDSEC\n  0\nEOF\n";
    let doc = read_str(data);
    let section = doc.section("OBJECTS").unwrap();
    let children = doc.node(section).children();
    // The dictionary node plus the ENDSEC marker
    assert_eq!(children.len(), 2);
    let dict = doc.node(children[0]);
    assert_eq!(dict.type_name(), Some("DICTIONARY"));
    assert_eq!(dict.properties.len(), 3);
    assert!(doc.notifications.has_kind(NotificationKind::UnknownObjectType));
}

#[test]
fn test_kind_recoverable_from_first_property() {
    let doc = read_str(&minimal_drawing());
    for id in doc.nodes().descendants(doc.root()) {
        if id == doc.root() {
            continue;
        }
        let node = doc.node(id);
        // Every non-root node announces its kind in its first pair
        let first = node.properties.first().expect("node has properties");
        assert!(first.code == 0, "first property of every node is a (0, kind) pair");
    }
}
