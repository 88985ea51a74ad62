//! Diagnostic tool: parse a DXF file and dump its tree, layers and
//! entities to stdout.
//!
//! ```text
//! cargo run --bin dxf_dump -- drawing.dxf
//! ```

use anyhow::{bail, Context};
use dxfdom::{Document, NodeId};

fn main() -> anyhow::Result<()> {
    let Some(path) = std::env::args().nth(1) else {
        bail!("usage: dxf_dump <file.dxf>");
    };

    let doc = Document::open_file(&path).with_context(|| format!("reading {}", path))?;

    println!("=== Layers ===");
    for id in doc.layers() {
        let layer = doc.layer(id).unwrap();
        println!(
            "  {:<20} color {:<4} linetype {:<12} visible={} locked={} plottable={}",
            layer.name,
            layer.color_number,
            layer.line_type,
            layer.visible,
            layer.locked,
            layer.plottable
        );
    }

    println!("=== Blocks ===");
    for id in doc.blocks() {
        let node = doc.node(id);
        println!(
            "  {:<20} {} entities",
            node.name().unwrap_or("?"),
            node.children().len().saturating_sub(1)
        );
    }

    println!("=== Entities ===");
    for id in doc.entities() {
        print_entity(&doc, id);
    }

    if !doc.notifications.is_empty() {
        println!("=== Notifications ===");
        for n in &doc.notifications {
            println!("  {}", n);
        }
    }

    Ok(())
}

fn print_entity(doc: &Document, id: NodeId) {
    let node = doc.node(id);
    let Some(entity) = doc.entity(id) else { return };
    let common = entity.common();
    let bounds = doc.entity_display_bounds(id);
    println!(
        "  {:<16} layer {:<12} color {:<18} bounds {}",
        node.type_name().unwrap_or("?"),
        common.layer,
        common.resolved_color.to_string(),
        bounds
    );
}
