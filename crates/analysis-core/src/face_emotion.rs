//! Face identity + emotion analyzer.

use vidmark_frame_model::{AnalyzerId, Annotation, AnnotationSet, Frame};

use crate::analyzer::{AnalysisError, Analyzer};
use crate::detectors::{EmotionClassifier, FaceDetector};
use crate::gallery::FaceGallery;

/// Label used when no gallery entry is close enough to a detected face.
const UNKNOWN_NAME: &str = "Unknown";

/// Detail used when the emotion classifier has no verdict for a face.
const NO_EMOTION: &str = "N/A";

/// Detects faces, matches them against a gallery of known identities, and
/// classifies each face's emotion.
///
/// Emotion is bound per face: each detected region gets its own
/// classification rather than one frame-global dominant emotion applied
/// uniformly.
pub struct FaceEmotionAnalyzer {
    id: AnalyzerId,
    detector: Box<dyn FaceDetector>,
    classifier: Box<dyn EmotionClassifier>,
    gallery: FaceGallery,
    match_tolerance: f64,
}

impl FaceEmotionAnalyzer {
    pub fn new(
        detector: Box<dyn FaceDetector>,
        classifier: Box<dyn EmotionClassifier>,
        gallery: FaceGallery,
    ) -> Self {
        Self {
            id: AnalyzerId::new("face-emotion"),
            detector,
            classifier,
            gallery,
            match_tolerance: 0.6,
        }
    }

    /// Override the maximum encoding distance accepted as an identity match.
    pub fn with_match_tolerance(mut self, tolerance: f64) -> Self {
        self.match_tolerance = tolerance;
        self
    }
}

impl Analyzer for FaceEmotionAnalyzer {
    fn id(&self) -> AnalyzerId {
        self.id.clone()
    }

    fn analyze(&mut self, frame: &Frame) -> Result<AnnotationSet, AnalysisError> {
        let detections = self.detector.detect(frame)?;

        let mut annotations = AnnotationSet::new();
        for detection in detections {
            let name = self
                .gallery
                .best_match(&detection.encoding, self.match_tolerance)
                .unwrap_or(UNKNOWN_NAME)
                .to_string();

            let emotion = self
                .classifier
                .classify(frame, &detection.region)?
                .unwrap_or_else(|| NO_EMOTION.to_string());

            annotations.push(Annotation {
                region: detection.region,
                label: name,
                detail: emotion,
                source: self.id.clone(),
            });
        }

        Ok(annotations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detectors::FaceDetection;
    use vidmark_frame_model::Region;

    struct FixedFaces(Vec<FaceDetection>);

    impl FaceDetector for FixedFaces {
        fn detect(&mut self, _frame: &Frame) -> Result<Vec<FaceDetection>, AnalysisError> {
            Ok(self.0.clone())
        }
    }

    struct FailingFaces;

    impl FaceDetector for FailingFaces {
        fn detect(&mut self, _frame: &Frame) -> Result<Vec<FaceDetection>, AnalysisError> {
            Err(AnalysisError::detector("model unavailable"))
        }
    }

    /// Classifies by region position so per-face binding is observable.
    struct PositionalEmotions;

    impl EmotionClassifier for PositionalEmotions {
        fn classify(
            &mut self,
            _frame: &Frame,
            region: &Region,
        ) -> Result<Option<String>, AnalysisError> {
            Ok(match region.x {
                0 => Some("happy".to_string()),
                50 => Some("sad".to_string()),
                _ => None,
            })
        }
    }

    fn test_frame() -> Frame {
        Frame::from_raw(0, 100, 100, vec![0u8; 100 * 100 * 3]).unwrap()
    }

    fn detection(x: i32, encoding: Vec<f32>) -> FaceDetection {
        FaceDetection {
            region: Region::new(x, 10, 20, 20),
            encoding,
        }
    }

    #[test]
    fn each_face_gets_its_own_emotion_and_identity() {
        let mut gallery = FaceGallery::new();
        gallery.add("Ada", vec![0.0, 0.0]);

        let mut analyzer = FaceEmotionAnalyzer::new(
            Box::new(FixedFaces(vec![
                detection(0, vec![0.1, 0.0]),
                detection(50, vec![5.0, 5.0]),
            ])),
            Box::new(PositionalEmotions),
            gallery,
        );

        let set = analyzer.analyze(&test_frame()).unwrap();
        let summary: Vec<_> = set
            .iter()
            .map(|a| (a.label.as_str(), a.detail.as_str()))
            .collect();
        assert_eq!(summary, vec![("Ada", "happy"), ("Unknown", "sad")]);
    }

    #[test]
    fn no_faces_is_an_empty_set_not_an_error() {
        let mut analyzer = FaceEmotionAnalyzer::new(
            Box::new(FixedFaces(vec![])),
            Box::new(PositionalEmotions),
            FaceGallery::new(),
        );
        let set = analyzer.analyze(&test_frame()).unwrap();
        assert!(set.is_empty());
    }

    #[test]
    fn classifier_silence_maps_to_na() {
        let mut analyzer = FaceEmotionAnalyzer::new(
            Box::new(FixedFaces(vec![detection(99, vec![0.0, 0.0])])),
            Box::new(PositionalEmotions),
            FaceGallery::new(),
        );
        let set = analyzer.analyze(&test_frame()).unwrap();
        assert_eq!(set.as_slice()[0].detail, "N/A");
    }

    #[test]
    fn detector_failure_propagates() {
        let mut analyzer = FaceEmotionAnalyzer::new(
            Box::new(FailingFaces),
            Box::new(PositionalEmotions),
            FaceGallery::new(),
        );
        assert!(analyzer.analyze(&test_frame()).is_err());
    }
}
