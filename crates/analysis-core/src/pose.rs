//! Pose landmark analyzer.

use vidmark_frame_model::{AnalyzerId, Annotation, AnnotationSet, Frame, Region};

use crate::analyzer::{AnalysisError, Analyzer};
use crate::detectors::{PoseEstimator, PoseLandmark};

/// Reduces estimated body landmarks to a single bounding-region annotation.
///
/// Landmarks below the visibility threshold are ignored; the remainder are
/// scaled from normalized coordinates to pixels and enclosed in one region
/// labeled `person`.
pub struct PoseAnalyzer {
    id: AnalyzerId,
    estimator: Box<dyn PoseEstimator>,
    min_visibility: f64,
}

impl PoseAnalyzer {
    pub fn new(estimator: Box<dyn PoseEstimator>) -> Self {
        Self {
            id: AnalyzerId::new("pose"),
            estimator,
            min_visibility: 0.5,
        }
    }

    /// Override the minimum landmark visibility considered.
    pub fn with_min_visibility(mut self, min_visibility: f64) -> Self {
        self.min_visibility = min_visibility;
        self
    }

    fn bounding_region(&self, landmarks: &[PoseLandmark], frame: &Frame) -> Option<(Region, usize)> {
        let width = frame.width() as f64;
        let height = frame.height() as f64;

        let mut min_x = f64::INFINITY;
        let mut min_y = f64::INFINITY;
        let mut max_x = f64::NEG_INFINITY;
        let mut max_y = f64::NEG_INFINITY;
        let mut visible = 0usize;

        for landmark in landmarks {
            if landmark.visibility < self.min_visibility {
                continue;
            }
            let px = landmark.x * width;
            let py = landmark.y * height;
            min_x = min_x.min(px);
            min_y = min_y.min(py);
            max_x = max_x.max(px);
            max_y = max_y.max(py);
            visible += 1;
        }

        if visible == 0 {
            return None;
        }

        let region = Region::new(
            min_x.floor() as i32,
            min_y.floor() as i32,
            (max_x - min_x).ceil().max(1.0) as u32,
            (max_y - min_y).ceil().max(1.0) as u32,
        );
        Some((region, visible))
    }
}

impl Analyzer for PoseAnalyzer {
    fn id(&self) -> AnalyzerId {
        self.id.clone()
    }

    fn analyze(&mut self, frame: &Frame) -> Result<AnnotationSet, AnalysisError> {
        let landmarks = self.estimator.estimate(frame)?;

        let mut annotations = AnnotationSet::new();
        if let Some((region, visible)) = self.bounding_region(&landmarks, frame) {
            annotations.push(Annotation {
                region,
                label: "person".to_string(),
                detail: format!("{visible} landmarks"),
                source: self.id.clone(),
            });
        }
        Ok(annotations)
    }
}
