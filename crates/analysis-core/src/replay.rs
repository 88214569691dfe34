//! Replay analyzer: serves precomputed annotations by frame ordinal.

use std::collections::HashMap;

use vidmark_frame_model::{AnalyzerId, AnnotationSet, Frame, FrameRecord};

use crate::analyzer::{AnalysisError, Analyzer};

/// An analyzer backed by externally computed [`FrameRecord`]s.
///
/// Detection can run anywhere (a GPU box, a hosted model, a previous run);
/// the records it produces flow through the same cache and interval
/// machinery as a live detector. Frames without a record yield an empty
/// set. Annotations are re-tagged with this analyzer's id, since within
/// this run it is the producer.
pub struct ReplayAnalyzer {
    id: AnalyzerId,
    by_frame: HashMap<u64, AnnotationSet>,
}

impl ReplayAnalyzer {
    pub fn new(records: Vec<FrameRecord>) -> Self {
        Self::with_id(AnalyzerId::new("replay"), records)
    }

    pub fn with_id(id: AnalyzerId, records: Vec<FrameRecord>) -> Self {
        let mut by_frame: HashMap<u64, AnnotationSet> = HashMap::new();
        for record in records {
            let entry = by_frame.entry(record.frame_index).or_default();
            for mut annotation in record.annotations {
                annotation.source = id.clone();
                entry.push(annotation);
            }
        }
        tracing::debug!(analyzer = %id, frames = by_frame.len(), "Loaded replay annotations");
        Self { id, by_frame }
    }

    /// Number of frame ordinals with at least one annotation.
    pub fn annotated_frames(&self) -> usize {
        self.by_frame.len()
    }
}

impl Analyzer for ReplayAnalyzer {
    fn id(&self) -> AnalyzerId {
        self.id.clone()
    }

    fn analyze(&mut self, frame: &Frame) -> Result<AnnotationSet, AnalysisError> {
        Ok(self
            .by_frame
            .get(&frame.index())
            .cloned()
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vidmark_frame_model::{Annotation, Region};

    fn record(frame_index: u64, label: &str) -> FrameRecord {
        FrameRecord {
            frame_index,
            annotations: vec![Annotation {
                region: Region::new(0, 0, 5, 5),
                label: label.to_string(),
                detail: String::new(),
                source: AnalyzerId::new("external"),
            }],
        }
    }

    fn frame(index: u64) -> Frame {
        Frame::from_raw(index, 4, 4, vec![0u8; 4 * 4 * 3]).unwrap()
    }

    #[test]
    fn serves_records_by_frame_ordinal() {
        let mut analyzer = ReplayAnalyzer::new(vec![record(0, "Ada"), record(10, "Grace")]);

        let set = analyzer.analyze(&frame(10)).unwrap();
        assert_eq!(set.as_slice()[0].label, "Grace");

        assert!(analyzer.analyze(&frame(5)).unwrap().is_empty());
    }

    #[test]
    fn annotations_are_retagged_with_replay_id() {
        let mut analyzer = ReplayAnalyzer::new(vec![record(0, "Ada")]);
        let set = analyzer.analyze(&frame(0)).unwrap();
        assert_eq!(set.as_slice()[0].source, AnalyzerId::new("replay"));
    }

    #[test]
    fn split_records_for_one_frame_are_merged_in_order() {
        let mut analyzer = ReplayAnalyzer::new(vec![record(2, "first"), record(2, "second")]);
        let set = analyzer.analyze(&frame(2)).unwrap();
        let labels: Vec<_> = set.iter().map(|a| a.label.as_str()).collect();
        assert_eq!(labels, vec!["first", "second"]);
        assert_eq!(analyzer.annotated_frames(), 1);
    }
}
