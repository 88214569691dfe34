//! Per-analyzer memory of the most recent analysis result.

use std::collections::HashMap;

use vidmark_frame_model::{AnalyzerId, AnnotationSet};

static EMPTY: AnnotationSet = AnnotationSet::new();

/// One annotation slot per analyzer.
///
/// The pipeline writes a slot after every successful analyze pass and
/// reads it on every frame. Slots are independent: a failed or absent
/// analyzer never disturbs another analyzer's slot. No merging happens
/// here; the pipeline concatenates slots in registration order.
#[derive(Debug, Default)]
pub struct AnnotationCache {
    slots: HashMap<AnalyzerId, AnnotationSet>,
}

impl AnnotationCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite an analyzer's cached set.
    pub fn update(&mut self, id: AnalyzerId, set: AnnotationSet) {
        self.slots.insert(id, set);
    }

    /// The analyzer's last cached set, or an empty set if it has never
    /// produced one.
    pub fn get(&self, id: &AnalyzerId) -> &AnnotationSet {
        self.slots.get(id).unwrap_or(&EMPTY)
    }

    /// Number of analyzers with a cached result.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vidmark_frame_model::{Annotation, Region};

    fn set(label: &str, source: &str) -> AnnotationSet {
        vec![Annotation {
            region: Region::new(0, 0, 1, 1),
            label: label.to_string(),
            detail: String::new(),
            source: AnalyzerId::new(source),
        }]
        .into()
    }

    #[test]
    fn unknown_analyzer_reads_empty() {
        let cache = AnnotationCache::new();
        assert!(cache.get(&AnalyzerId::new("face")).is_empty());
    }

    #[test]
    fn update_overwrites_previous_set() {
        let mut cache = AnnotationCache::new();
        let id = AnalyzerId::new("face");

        cache.update(id.clone(), set("first", "face"));
        cache.update(id.clone(), set("second", "face"));

        assert_eq!(cache.get(&id).as_slice()[0].label, "second");
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn slots_are_isolated_per_analyzer() {
        let mut cache = AnnotationCache::new();
        let face = AnalyzerId::new("face");
        let pose = AnalyzerId::new("pose");

        cache.update(face.clone(), set("face-result", "face"));
        cache.update(pose.clone(), AnnotationSet::new());

        assert_eq!(cache.get(&face).len(), 1);
        assert!(cache.get(&pose).is_empty());
    }
}
