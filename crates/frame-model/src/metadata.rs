//! Stream metadata advertised by a video source.

use serde::{Deserialize, Serialize};

/// Geometry, rate, and length of a video stream.
///
/// Sinks encode with exactly these parameters; the core performs no
/// rescaling or reframing. `total_frames` is what the container advertises
/// and may overstate what is actually decodable (see the pipeline's
/// truncation policy).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VideoMetadata {
    pub width: u32,
    pub height: u32,
    pub fps: f64,
    pub total_frames: u64,
}

impl VideoMetadata {
    /// Bytes per raw RGB24 frame at this geometry.
    pub fn frame_bytes(&self) -> usize {
        self.width as usize * self.height as usize * 3
    }

    /// Stream duration in seconds implied by frame count and rate.
    pub fn duration_secs(&self) -> f64 {
        if self.fps > 0.0 {
            self.total_frames as f64 / self.fps
        } else {
            0.0
        }
    }
}
