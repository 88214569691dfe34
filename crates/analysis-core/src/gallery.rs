//! Known-face gallery: identities matched by encoding distance.

use serde::{Deserialize, Serialize};

/// An ordered store of known identities and their face encodings.
///
/// Matching follows the usual face-encoding contract: euclidean distance,
/// with a match accepted when the nearest known encoding is within a
/// tolerance (0.6 by convention). Galleries are produced by external
/// tooling that runs an encoder over reference images; this type only
/// stores and matches.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FaceGallery {
    names: Vec<String>,
    encodings: Vec<Vec<f32>>,
}

impl FaceGallery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a known identity. Multiple entries may share a name to
    /// cover several reference photos of the same person.
    pub fn add(&mut self, name: impl Into<String>, encoding: Vec<f32>) {
        self.names.push(name.into());
        self.encodings.push(encoding);
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// The name of the nearest known encoding within `tolerance`, or
    /// `None` when the gallery is empty or nothing is close enough.
    pub fn best_match(&self, encoding: &[f32], tolerance: f64) -> Option<&str> {
        let mut best: Option<(usize, f64)> = None;
        for (i, known) in self.encodings.iter().enumerate() {
            let distance = euclidean_distance(known, encoding);
            if distance <= tolerance && best.map_or(true, |(_, d)| distance < d) {
                best = Some((i, distance));
            }
        }
        best.map(|(i, _)| self.names[i].as_str())
    }

    /// Parse a gallery from its JSON form.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Euclidean distance between two encodings. Encodings of different
/// lengths never match; the distance is infinite.
fn euclidean_distance(a: &[f32], b: &[f32]) -> f64 {
    if a.len() != b.len() {
        return f64::INFINITY;
    }
    a.iter()
        .zip(b)
        .map(|(x, y)| {
            let d = (*x - *y) as f64;
            d * d
        })
        .sum::<f64>()
        .sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_gallery_never_matches() {
        let gallery = FaceGallery::new();
        assert_eq!(gallery.best_match(&[0.0, 0.0], 0.6), None);
    }

    #[test]
    fn nearest_entry_within_tolerance_wins() {
        let mut gallery = FaceGallery::new();
        gallery.add("Ada", vec![0.0, 0.0]);
        gallery.add("Grace", vec![1.0, 0.0]);

        assert_eq!(gallery.best_match(&[0.9, 0.0], 0.6), Some("Grace"));
        assert_eq!(gallery.best_match(&[0.1, 0.0], 0.6), Some("Ada"));
    }

    #[test]
    fn match_outside_tolerance_is_rejected() {
        let mut gallery = FaceGallery::new();
        gallery.add("Ada", vec![0.0, 0.0]);
        assert_eq!(gallery.best_match(&[3.0, 4.0], 0.6), None);
        // distance 5.0 accepted once the tolerance allows it
        assert_eq!(gallery.best_match(&[3.0, 4.0], 5.0), Some("Ada"));
    }

    #[test]
    fn mismatched_encoding_lengths_never_match() {
        let mut gallery = FaceGallery::new();
        gallery.add("Ada", vec![0.0, 0.0, 0.0]);
        assert_eq!(gallery.best_match(&[0.0, 0.0], f64::MAX), None);
    }

    #[test]
    fn gallery_roundtrips_through_json() {
        let mut gallery = FaceGallery::new();
        gallery.add("Ada", vec![0.25, -0.5]);
        let parsed = FaceGallery::from_json(&gallery.to_json().unwrap()).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed.best_match(&[0.25, -0.5], 0.1), Some("Ada"));
    }
}
