//! The annotation renderer.

use std::sync::atomic::{AtomicBool, Ordering};

use ab_glyph::PxScale;
use image::Rgb;
use imageproc::drawing::{draw_hollow_rect_mut, draw_text_mut};
use imageproc::rect::Rect;

use vidmark_frame_model::{Annotation, AnnotationSet, Frame};

use crate::font::LabelFont;
use crate::style::RenderStyle;

/// Draws annotation sets onto frames.
///
/// A pure function of its inputs: the same frame and set always produce
/// the same pixels. An empty set returns the frame untouched. Without a
/// label font the renderer still draws outlines; label text is skipped
/// with a single warning for the whole run.
pub struct AnnotationRenderer {
    style: RenderStyle,
    font: Option<LabelFont>,
    missing_font_warned: AtomicBool,
}

impl AnnotationRenderer {
    pub fn new(style: RenderStyle) -> Self {
        Self {
            style,
            font: None,
            missing_font_warned: AtomicBool::new(false),
        }
    }

    pub fn with_font(mut self, font: LabelFont) -> Self {
        self.font = Some(font);
        self
    }

    pub fn has_font(&self) -> bool {
        self.font.is_some()
    }

    /// Draw every annotation in set order onto the frame.
    pub fn render(&self, mut frame: Frame, annotations: &AnnotationSet) -> Frame {
        if annotations.is_empty() {
            return frame;
        }

        let (width, height) = (frame.width(), frame.height());
        for annotation in annotations {
            // Regions may hang partially off the frame; drawing clips, but
            // a fully invisible region has nothing to draw at all.
            if annotation.region.intersect(width, height).is_none() {
                continue;
            }
            self.draw_outline(&mut frame, annotation);
            self.draw_label(&mut frame, annotation);
        }
        frame
    }

    fn draw_outline(&self, frame: &mut Frame, annotation: &Annotation) {
        let region = annotation.region;
        let color = Rgb(self.style.box_color);
        let image = frame.image_mut();

        // Nested 1px outlines, shrinking inward, give the configured
        // thickness without spilling outside the region.
        for inset in 0..self.style.thickness {
            let shrink = inset * 2;
            if region.width <= shrink || region.height <= shrink {
                break;
            }
            let rect = Rect::at(region.x + inset as i32, region.y + inset as i32)
                .of_size(region.width - shrink, region.height - shrink);
            draw_hollow_rect_mut(image, rect, color);
        }
    }

    fn draw_label(&self, frame: &mut Frame, annotation: &Annotation) {
        let text = if annotation.detail.is_empty() {
            annotation.label.clone()
        } else {
            format!("{} - {}", annotation.label, annotation.detail)
        };
        if text.is_empty() {
            return;
        }

        let Some(font) = &self.font else {
            if !self.missing_font_warned.swap(true, Ordering::Relaxed) {
                tracing::warn!("No label font available; rendering outlines only");
            }
            return;
        };

        let scale = PxScale::from(self.style.label_height);
        let y = annotation.region.y - self.style.label_offset - self.style.label_height as i32;
        draw_text_mut(
            frame.image_mut(),
            Rgb(self.style.label_color),
            annotation.region.x,
            y,
            scale,
            font.as_font(),
            &text,
        );
    }
}
