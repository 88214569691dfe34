//! JSONL sidecar log of each frame's rendered annotations.

use std::io::{BufWriter, Write};
use std::path::Path;

use vidmark_common::{VidmarkError, VidmarkResult};
use vidmark_frame_model::{AnnotationSet, FrameRecord};

/// Append-only writer for per-frame [`FrameRecord`]s.
///
/// The log records what was actually drawn on each output frame, analyzed
/// or replayed, so downstream tooling can consume detections without
/// re-decoding the video.
pub struct AnnotationLog {
    writer: Box<dyn Write + Send>,
}

impl AnnotationLog {
    /// Create the log file, truncating any existing one, and write the
    /// header comment line.
    pub fn create(path: &Path) -> VidmarkResult<Self> {
        let file = std::fs::File::create(path).map_err(|e| {
            VidmarkError::stream(format!(
                "Failed to create annotation log {}: {e}",
                path.display()
            ))
        })?;
        Self::from_writer(Box::new(BufWriter::new(file)))
    }

    /// Wrap an arbitrary writer (used by tests and in-memory consumers).
    pub fn from_writer(mut writer: Box<dyn Write + Send>) -> VidmarkResult<Self> {
        writeln!(writer, "# vidmark annotations v1")
            .map_err(|e| VidmarkError::stream(format!("Annotation log header write: {e}")))?;
        Ok(Self { writer })
    }

    /// Append one frame's annotations.
    pub fn write_record(&mut self, frame_index: u64, annotations: &AnnotationSet) -> VidmarkResult<()> {
        let record = FrameRecord {
            frame_index,
            annotations: annotations.as_slice().to_vec(),
        };
        let line = serde_json::to_string(&record)?;
        writeln!(self.writer, "{line}")
            .map_err(|e| VidmarkError::stream(format!("Annotation log write: {e}")))?;
        Ok(())
    }

    /// Flush buffered records.
    pub fn finish(&mut self) -> VidmarkResult<()> {
        self.writer
            .flush()
            .map_err(|e| VidmarkError::stream(format!("Annotation log flush: {e}")))
    }
}
