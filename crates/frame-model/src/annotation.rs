//! Annotations: labeled regions produced by analyzers.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::region::Region;

/// Identity of an analyzer, used to key cache slots and tag annotation
/// provenance. Cheap to clone and stable for the lifetime of a run.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnalyzerId(String);

impl AnalyzerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AnalyzerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AnalyzerId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// One labeled region on one frame, produced by exactly one analyzer
/// invocation. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    /// Where to draw, in frame pixel coordinates.
    pub region: Region,

    /// Primary label (e.g. a recognized identity).
    pub label: String,

    /// Secondary classification tag (e.g. an emotion). May be empty.
    pub detail: String,

    /// The analyzer that produced this annotation.
    pub source: AnalyzerId,
}

/// An ordered sequence of annotations for one frame.
///
/// Order is meaningful: analyzer registration order first, then emission
/// order within an analyzer. Renderers draw in this order so overlapping
/// boxes resolve identically across runs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnnotationSet(Vec<Annotation>);

impl AnnotationSet {
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    pub fn push(&mut self, annotation: Annotation) {
        self.0.push(annotation);
    }

    /// Append a copy of every annotation in `other`, preserving order.
    pub fn extend_from(&mut self, other: &AnnotationSet) {
        self.0.extend_from_slice(&other.0);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Annotation> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[Annotation] {
        &self.0
    }
}

impl From<Vec<Annotation>> for AnnotationSet {
    fn from(annotations: Vec<Annotation>) -> Self {
        Self(annotations)
    }
}

impl FromIterator<Annotation> for AnnotationSet {
    fn from_iter<I: IntoIterator<Item = Annotation>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for AnnotationSet {
    type Item = Annotation;
    type IntoIter = std::vec::IntoIter<Annotation>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a AnnotationSet {
    type Item = &'a Annotation;
    type IntoIter = std::slice::Iter<'a, Annotation>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
