//! Visual style for rendered annotations.

use serde::{Deserialize, Serialize};

/// Colors and metrics used when drawing annotations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderStyle {
    /// Outline color as RGB.
    pub box_color: [u8; 3],

    /// Label text color as RGB.
    pub label_color: [u8; 3],

    /// Outline thickness in pixels.
    pub thickness: u32,

    /// Label glyph height in pixels.
    pub label_height: f32,

    /// Gap between the label baseline and the region's top edge.
    pub label_offset: i32,
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self {
            box_color: [0, 255, 0],
            label_color: [36, 255, 12],
            thickness: 2,
            label_height: 24.0,
            label_offset: 10,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_style_is_green_on_green() {
        let style = RenderStyle::default();
        assert_eq!(style.box_color, [0, 255, 0]);
        assert_eq!(style.label_color, [36, 255, 12]);
        assert_eq!(style.thickness, 2);
    }
}
