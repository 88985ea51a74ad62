//! Layer table entry

use crate::node::{find_code, update_or_add, Property};
use crate::types::{aci_rgb, Rgb};
use bitflags::bitflags;

bitflags! {
    /// Layer state bits as serialized in group code 70.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct LayerStateFlags: i32 {
        /// Bit 0: the layer is invisible
        const HIDDEN = 1;
        /// Bit 2: the layer is locked against editing
        const LOCKED = 1 << 2;
        /// Bit 4: the layer is excluded from plotting
        const NOT_PLOTTABLE = 1 << 4;
    }
}

/// A layer table entry.
///
/// Names are unique within the layer table, compared case-insensitively.
/// Layers are created explicitly or on demand by name and are never
/// implicitly deleted.
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    /// Layer name
    pub name: String,
    /// Palette index used by entities whose color defers to the layer
    pub color_number: i16,
    /// Line type name
    pub line_type: String,
    /// Layer is shown
    pub visible: bool,
    /// Layer is locked against editing
    pub locked: bool,
    /// Layer is included when plotting
    pub plottable: bool,
}

impl Layer {
    /// Create a new layer with default settings (white, continuous)
    pub fn new(name: impl Into<String>) -> Self {
        Layer {
            name: name.into(),
            color_number: 7,
            line_type: "CONTINUOUS".to_string(),
            visible: true,
            locked: false,
            plottable: true,
        }
    }

    /// The default layer `"0"` every document starts with
    pub fn layer_0() -> Self {
        Self::new("0")
    }

    /// Create a layer with a specific palette index
    pub fn with_color(name: impl Into<String>, color_number: i16) -> Self {
        Layer {
            color_number,
            ..Self::new(name)
        }
    }

    /// Pack the three state booleans into the code 70 bit field
    pub fn state_flags(&self) -> LayerStateFlags {
        let mut flags = LayerStateFlags::empty();
        flags.set(LayerStateFlags::HIDDEN, !self.visible);
        flags.set(LayerStateFlags::LOCKED, self.locked);
        flags.set(LayerStateFlags::NOT_PLOTTABLE, !self.plottable);
        flags
    }

    /// Unpack the code 70 bit field into the state booleans
    pub fn set_state_flags(&mut self, flags: LayerStateFlags) {
        self.visible = !flags.contains(LayerStateFlags::HIDDEN);
        self.locked = flags.contains(LayerStateFlags::LOCKED);
        self.plottable = !flags.contains(LayerStateFlags::NOT_PLOTTABLE);
    }

    /// The layer's own display color
    pub fn rgb(&self) -> Rgb {
        aci_rgb(self.color_number)
    }

    /// Parse typed fields out of the property list.
    ///
    /// Missing codes keep their current values; unparsable numbers are
    /// skipped field-by-field.
    pub fn materialize(&mut self, props: &[Property]) {
        if let Some(p) = find_code(props, 2) {
            self.name = p.text().to_string();
        }
        if let Some(p) = find_code(props, 70) {
            if let Ok(bits) = p.as_i32() {
                self.set_state_flags(LayerStateFlags::from_bits_truncate(bits));
            }
        }
        if let Some(p) = find_code(props, 62) {
            if let Ok(color) = p.as_i32() {
                self.color_number = color as i16;
            }
        }
        if let Some(p) = find_code(props, 6) {
            self.line_type = p.text().to_string();
        }
    }

    /// Write the typed fields back into the property list
    pub fn synchronize(&self, props: &mut Vec<Property>) {
        update_or_add(props, 2, self.name.clone());
        update_or_add(props, 70, self.state_flags().bits().to_string());
        update_or_add(props, 62, self.color_number.to_string());
        update_or_add(props, 6, self.line_type.clone());
    }
}
