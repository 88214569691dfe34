//! Vidmark Analysis Core
//!
//! The single capability every detector variant is adapted to:
//! `analyze(frame) -> AnnotationSet`. The pipeline is polymorphic over this
//! trait and never special-cases a variant; adding a new analyzer requires
//! no pipeline changes.
//!
//! Concrete detection models (face location/encoding, emotion
//! classification, pose estimation) are external collaborators behind the
//! traits in [`detectors`]. This crate is computation over their outputs;
//! it performs no process or file I/O.

pub mod analyzer;
pub mod detectors;
pub mod face_emotion;
pub mod gallery;
pub mod pose;
pub mod replay;

pub use analyzer::{AnalysisError, Analyzer};
pub use face_emotion::FaceEmotionAnalyzer;
pub use gallery::FaceGallery;
pub use pose::PoseAnalyzer;
pub use replay::ReplayAnalyzer;
