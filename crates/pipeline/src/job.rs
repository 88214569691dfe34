//! Job configuration and progress reporting.

use std::path::PathBuf;

use vidmark_common::{VidmarkError, VidmarkResult};

/// Analysis schedule for a pipeline run.
#[derive(Debug, Clone, Copy)]
pub struct PipelineConfig {
    analyze_interval: u32,
}

impl PipelineConfig {
    /// Analyze every `analyze_interval`-th frame (1 = every frame).
    ///
    /// Fails with a configuration error for 0, before any stream is
    /// opened.
    pub fn new(analyze_interval: u32) -> VidmarkResult<Self> {
        if analyze_interval < 1 {
            return Err(VidmarkError::config(
                "analyze_interval must be at least 1",
            ));
        }
        Ok(Self { analyze_interval })
    }

    pub fn analyze_interval(&self) -> u32 {
        self.analyze_interval
    }

    /// Whether the frame at `index` gets expensive analysis.
    pub fn is_analysis_frame(&self, index: u64) -> bool {
        index % self.analyze_interval as u64 == 0
    }

    /// Analyze passes a full run of `total_frames` performs per analyzer.
    pub fn analysis_pass_count(&self, total_frames: u64) -> u64 {
        total_frames.div_ceil(self.analyze_interval as u64)
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            analyze_interval: 10,
        }
    }
}

/// An annotation job ready to run.
#[derive(Debug, Clone)]
pub struct AnnotateJob {
    /// Input video path.
    pub input: PathBuf,

    /// Output video path.
    pub output: PathBuf,

    /// Analysis schedule.
    pub config: PipelineConfig,

    /// Optional JSONL sidecar recording each frame's rendered annotations.
    pub annotations_out: Option<PathBuf>,
}

/// Progress callback for a pipeline run.
pub type ProgressCallback = Box<dyn Fn(Progress) + Send>;

/// Progress report emitted once per written frame.
#[derive(Debug, Clone)]
pub struct Progress {
    /// Completion in `[0.0, 1.0]` against the advertised frame count.
    pub progress: f64,

    /// Frames written so far.
    pub frames_written: u64,

    /// Advertised total frame count.
    pub total_frames: u64,

    /// Analyze passes performed so far.
    pub analyze_passes: u64,

    /// Estimated seconds remaining.
    pub eta_secs: f64,

    /// Current stage.
    pub stage: Stage,
}

/// Stages of an annotation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Preparing,
    Annotating,
    Finalizing,
    Complete,
}
