//! The analyzer capability trait.

use vidmark_frame_model::{AnalyzerId, AnnotationSet, Frame};

/// Failure of the analysis mechanism itself.
///
/// "Detector found nothing" is not an error: analyzers return an empty
/// [`AnnotationSet`] for that. Errors are reserved for a model or detector
/// that could not process the frame at all.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error("Detector failure: {message}")]
    Detector { message: String },

    #[error("Frame rejected: {message}")]
    BadInput { message: String },
}

impl AnalysisError {
    pub fn detector(msg: impl Into<String>) -> Self {
        Self::Detector {
            message: msg.into(),
        }
    }

    pub fn bad_input(msg: impl Into<String>) -> Self {
        Self::BadInput {
            message: msg.into(),
        }
    }
}

/// A frame analyzer: one expensive pass over one frame, producing the
/// annotations to draw.
///
/// Implementations may keep internal state across invocations (`&mut
/// self`), but that state is encapsulated; the pipeline's own
/// last-result caching happens outside, keyed by [`Analyzer::id`].
/// Analyzers borrow the frame and must not retain it.
pub trait Analyzer: Send {
    /// Stable identity for cache slots and annotation provenance.
    fn id(&self) -> AnalyzerId;

    /// Analyze one frame. An error here is contained by the pipeline: the
    /// analyzer's previously cached result stays in effect and other
    /// analyzers are unaffected.
    fn analyze(&mut self, frame: &Frame) -> Result<AnnotationSet, AnalysisError>;
}
