//! Multi-line text entity

use super::{read_f64, read_i32, read_string, sync_optional, Entity, EntityCommon};
use crate::error::Result;
use crate::node::{find_code, format_float, remove_codes, update_or_add, Property};
use crate::types::{BoundingBox2D, Vector2};

/// Maximum characters carried by one continuation record on the wire
const CHUNK_LEN: usize = 250;

/// A multi-line text block.
///
/// Long values are split across the wire: any number of code 3
/// continuation records in order, then the final chunk under code 1.
#[derive(Debug, Clone)]
pub struct MText {
    /// Common entity data
    pub common: EntityCommon,
    /// The full text value, reassembled from its chunks
    pub value: String,
    /// Insertion point (codes 10/20)
    pub insertion: Vector2,
    /// Nominal text height (code 40)
    pub height: f64,
    /// Reference rectangle width; 0 means unbounded (code 41)
    pub rect_width: f64,
    /// Attachment point 1-9, top-left through bottom-right (code 71)
    pub attachment_point: i32,
    /// Drawing direction (code 72)
    pub drawing_direction: i32,
    /// Text style name (code 7)
    pub style: String,
    /// Rotation angle in degrees (code 50)
    pub rotation: f64,
    /// Line spacing factor (code 44)
    pub line_spacing_factor: f64,
    /// Line spacing style (code 73)
    pub line_spacing_style: i32,
}

impl MText {
    /// Create an empty text block
    pub fn new() -> Self {
        MText {
            common: EntityCommon::new(),
            value: String::new(),
            insertion: Vector2::ZERO,
            height: 1.0,
            rect_width: 0.0,
            attachment_point: 1,
            drawing_direction: 1,
            style: "STANDARD".to_string(),
            rotation: 0.0,
            line_spacing_factor: 1.0,
            line_spacing_style: 1,
        }
    }

    /// Number of display lines in the value
    pub fn line_count(&self) -> usize {
        self.value.lines().count().max(1)
    }
}

impl Default for MText {
    fn default() -> Self {
        Self::new()
    }
}

impl Entity for MText {
    fn common(&self) -> &EntityCommon {
        &self.common
    }

    fn common_mut(&mut self) -> &mut EntityCommon {
        &mut self.common
    }

    fn type_name(&self) -> &'static str {
        "MTEXT"
    }

    fn materialize(&mut self, props: &[Property]) -> Result<()> {
        self.common.materialize(props)?;
        // Continuations in encounter order, final chunk from code 1
        let mut assembled: String = props
            .iter()
            .filter(|p| p.code == 3)
            .map(|p| p.value.as_str())
            .collect();
        if let Some(p) = find_code(props, 1) {
            assembled.push_str(&p.value);
        }
        if !assembled.is_empty() || find_code(props, 1).is_some() {
            self.value = assembled;
        }
        read_f64(props, 10, &mut self.insertion.x)?;
        read_f64(props, 20, &mut self.insertion.y)?;
        read_f64(props, 40, &mut self.height)?;
        read_f64(props, 41, &mut self.rect_width)?;
        read_i32(props, 71, &mut self.attachment_point)?;
        read_i32(props, 72, &mut self.drawing_direction)?;
        read_string(props, 7, &mut self.style);
        read_f64(props, 50, &mut self.rotation)?;
        read_f64(props, 44, &mut self.line_spacing_factor)?;
        read_i32(props, 73, &mut self.line_spacing_style)?;
        Ok(())
    }

    fn synchronize(&self, props: &mut Vec<Property>) {
        self.common.synchronize(props);
        // Re-chunk the value: continuations are positional, so the old runs
        // are dropped and rewritten as a whole
        remove_codes(props, &[3]);
        let chars: Vec<char> = self.value.chars().collect();
        let mut rest = chars.as_slice();
        let mut chunks: Vec<String> = Vec::new();
        while rest.len() > CHUNK_LEN {
            let (head, tail) = rest.split_at(CHUNK_LEN);
            chunks.push(head.iter().collect());
            rest = tail;
        }
        update_or_add(props, 1, rest.iter().collect::<String>());
        for chunk in chunks {
            props.push(Property::new(3, chunk));
        }
        update_or_add(props, 10, format_float(self.insertion.x));
        update_or_add(props, 20, format_float(self.insertion.y));
        update_or_add(props, 40, format_float(self.height));
        sync_optional(props, 41, format_float(self.rect_width), self.rect_width == 0.0);
        sync_optional(props, 71, self.attachment_point.to_string(), self.attachment_point == 1);
        sync_optional(props, 72, self.drawing_direction.to_string(), self.drawing_direction == 1);
        sync_optional(props, 7, self.style.clone(), self.style == "STANDARD");
        sync_optional(props, 50, format_float(self.rotation), self.rotation == 0.0);
        sync_optional(props, 44, format_float(self.line_spacing_factor), self.line_spacing_factor == 1.0);
        sync_optional(props, 73, self.line_spacing_style.to_string(), self.line_spacing_style == 1);
    }

    fn invalidate(&mut self) {}

    fn bounds(&self) -> BoundingBox2D {
        let longest = self
            .value
            .lines()
            .map(|l| l.chars().count())
            .max()
            .unwrap_or(0);
        let width = if self.rect_width > 0.0 {
            self.rect_width
        } else {
            longest as f64 * self.height * 0.6
        };
        let total_height = self.height * self.line_spacing_factor * self.line_count() as f64;
        // Insertion is the top-left corner for the default attachment
        let mut bbox = BoundingBox2D::from_point(self.insertion);
        bbox.expand_to_include(self.insertion + Vector2::new(width, -total_height));
        bbox
    }

    fn hit_test(&self, point: Vector2) -> bool {
        self.bounds().contains(point)
    }
}
