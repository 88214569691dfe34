//! Vidmark Render Engine
//!
//! Draws a merged [`vidmark_frame_model::AnnotationSet`] onto a frame:
//! one outlined box per annotation plus its label anchored above the box.
//!
//! Rendering is a pure function of `(frame, annotation set, style)`; the
//! renderer consults no caches and keeps no per-frame state. Annotations
//! are drawn in set order so overlapping boxes resolve identically across
//! runs, which golden-output tests rely on.

pub mod font;
pub mod renderer;
pub mod style;

pub use font::LabelFont;
pub use renderer::AnnotationRenderer;
pub use style::RenderStyle;
