//! Visual states of a tag element.
//!
//! Every transition writes all four managed properties or restores all four
//! to the page's own values, so the result never depends on the previous
//! state.

use crate::color::{mix_colors, HexColor};
use crate::dom::{Document, NodeId};

use super::HighlightSettings;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TextTone {
    /// Cluster color blended toward the dark tone by this ratio.
    Mixed(f64),
    Fixed(HexColor),
}

/// Blend ratios toward the dark tone for one visual state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StylePreset {
    pub border: f64,
    pub background: f64,
    pub shadow: f64,
    pub text: TextTone,
}

pub const HOVER: StylePreset = StylePreset {
    border: 0.4,
    background: 0.7,
    shadow: 0.6,
    text: TextTone::Mixed(0.0),
};

pub const ACTIVE: StylePreset = StylePreset {
    border: 0.3,
    background: 0.6,
    shadow: 0.4,
    text: TextTone::Fixed(HexColor::WHITE),
};

/// Concrete colors for one element in one state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagPaint {
    pub border: HexColor,
    pub background: HexColor,
    pub shadow: HexColor,
    pub text: HexColor,
}

impl StylePreset {
    pub fn paint(&self, color: HexColor, dark_tone: HexColor) -> TagPaint {
        TagPaint {
            border: mix_colors(color, dark_tone, self.border),
            background: mix_colors(color, dark_tone, self.background),
            shadow: mix_colors(color, dark_tone, self.shadow),
            text: match self.text {
                TextTone::Mixed(ratio) => mix_colors(color, dark_tone, ratio),
                TextTone::Fixed(c) => c,
            },
        }
    }
}

fn write_paint(document: &mut Document, node: NodeId, paint: TagPaint) {
    let style = &mut document.node_mut(node).style;
    style.border_color = Some(paint.border);
    style.background_color = Some(paint.background);
    style.box_shadow = Some(paint.shadow);
    style.color = Some(paint.text);
}

/// Transient preview.
pub fn apply_hover(document: &mut Document, node: NodeId, color: HexColor, settings: &HighlightSettings) {
    write_paint(document, node, HOVER.paint(color, settings.dark_tone));
    document.remove_class(node, &settings.active_tag_class);
}

/// Persistent highlight.
pub fn apply_active(document: &mut Document, node: NodeId, color: HexColor, settings: &HighlightSettings) {
    write_paint(document, node, ACTIVE.paint(color, settings.dark_tone));
    document.add_class(node, &settings.active_tag_class);
}

/// Back to the page's own styling.
pub fn clear(document: &mut Document, node: NodeId, settings: &HighlightSettings) {
    document.node_mut(node).style.restore_authored();
    document.remove_class(node, &settings.active_tag_class);
}
