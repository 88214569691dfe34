//! Vidmark Frame Model
//!
//! Defines the core data contracts for the annotation pipeline:
//! - **Frame:** An ordinal-indexed RGB bitmap owned by the pipeline
//! - **Region / Annotation / AnnotationSet:** What to draw on a frame
//! - **VideoMetadata:** Geometry, rate, and length advertised by a source
//! - **FrameRecord:** The JSONL sidecar format for per-frame annotations
//!
//! All region coordinates are frame pixel coordinates; a region may extend
//! partially outside the frame and is clipped only at render time.

pub mod annotation;
pub mod frame;
pub mod metadata;
pub mod record;
pub mod region;

pub use annotation::*;
pub use frame::*;
pub use metadata::*;
pub use record::*;
pub use region::*;
