//! The sequential frame loop.

use std::collections::HashMap;
use std::time::Instant;

use chrono::{DateTime, Utc};

use vidmark_analysis_core::Analyzer;
use vidmark_common::{VidmarkError, VidmarkResult};
use vidmark_frame_model::{AnalyzerId, AnnotationSet};
use vidmark_render_engine::AnnotationRenderer;
use vidmark_stream_io::{FrameSink, FrameSource};

use crate::cache::AnnotationCache;
use crate::job::{PipelineConfig, Progress, ProgressCallback, Stage};
use crate::sidecar::AnnotationLog;

/// Outcome of a pipeline run.
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Frames successfully read from the source.
    pub frames_read: u64,

    /// Frames written to the sink, in ordinal order.
    pub frames_written: u64,

    /// Analyze passes performed (each pass fans out to every analyzer).
    pub analyze_passes: u64,

    /// Whether the stream ended before the advertised frame count.
    pub truncated: bool,

    /// Contained analysis failures per analyzer, in registration order.
    pub analyzer_failures: Vec<(AnalyzerId, u64)>,

    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl RunReport {
    fn new() -> Self {
        let now = Utc::now();
        Self {
            frames_read: 0,
            frames_written: 0,
            analyze_passes: 0,
            truncated: false,
            analyzer_failures: Vec::new(),
            started_at: now,
            finished_at: now,
        }
    }

    /// Contained failures recorded for one analyzer.
    pub fn failures_for(&self, id: &AnalyzerId) -> u64 {
        self.analyzer_failures
            .iter()
            .find(|(failed, _)| failed == id)
            .map(|(_, count)| *count)
            .unwrap_or(0)
    }
}

/// Drives frames from a source through analysis, caching, rendering, and
/// ordered sink writes.
///
/// Analyzers registered first merge first; the merged set for any frame is
/// the concatenation of every analyzer's cached result in registration
/// order, independent of analyzer latency or failure.
pub struct FramePipeline {
    config: PipelineConfig,
    analyzers: Vec<Box<dyn Analyzer>>,
    cache: AnnotationCache,
    annotation_log: Option<AnnotationLog>,
}

impl FramePipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            analyzers: Vec::new(),
            cache: AnnotationCache::new(),
            annotation_log: None,
        }
    }

    /// Register an analyzer. Call order defines merge and render order.
    pub fn register_analyzer(&mut self, analyzer: Box<dyn Analyzer>) {
        self.analyzers.push(analyzer);
    }

    /// Record every frame's rendered annotations to a sidecar log.
    pub fn set_annotation_log(&mut self, log: AnnotationLog) {
        self.annotation_log = Some(log);
    }

    pub fn analyzer_count(&self) -> usize {
        self.analyzers.len()
    }

    /// Process the whole stream.
    ///
    /// The sink is closed on every exit path. A short read mid-stream is
    /// reported as a truncated run, not an error; analysis failures are
    /// contained per analyzer and collected in the report.
    pub fn run(
        &mut self,
        source: &mut dyn FrameSource,
        sink: &mut dyn FrameSink,
        renderer: &AnnotationRenderer,
        progress: Option<ProgressCallback>,
    ) -> VidmarkResult<RunReport> {
        let result = self.run_loop(source, sink, renderer, progress.as_ref());
        let close_result = sink.close();

        match result {
            Ok(mut report) => {
                close_result?;
                report.finished_at = Utc::now();
                if let Some(cb) = &progress {
                    cb(Progress {
                        progress: 1.0,
                        frames_written: report.frames_written,
                        total_frames: source.metadata().total_frames,
                        analyze_passes: report.analyze_passes,
                        eta_secs: 0.0,
                        stage: Stage::Complete,
                    });
                }
                Ok(report)
            }
            Err(err) => {
                if let Err(close_err) = close_result {
                    tracing::warn!(error = %close_err, "Sink close failed while aborting");
                }
                Err(err)
            }
        }
    }

    fn run_loop(
        &mut self,
        source: &mut dyn FrameSource,
        sink: &mut dyn FrameSink,
        renderer: &AnnotationRenderer,
        progress: Option<&ProgressCallback>,
    ) -> VidmarkResult<RunReport> {
        let ids: Vec<AnalyzerId> = self.analyzers.iter().map(|a| a.id()).collect();
        self.check_unique_ids(&ids)?;

        let total_frames = source.metadata().total_frames;
        let mut report = RunReport::new();
        let mut failures: HashMap<AnalyzerId, u64> = HashMap::new();
        let started = Instant::now();

        tracing::info!(
            total_frames,
            analyzers = ids.len(),
            analyze_interval = self.config.analyze_interval(),
            "Starting annotation run"
        );

        for index in 0..total_frames {
            let frame = match source.read_frame() {
                Ok(Some(frame)) => frame,
                Ok(None) => {
                    tracing::warn!(
                        frames_read = index,
                        advertised = total_frames,
                        "Stream ended before the advertised frame count"
                    );
                    report.truncated = true;
                    break;
                }
                Err(err) => {
                    // Mid-stream read faults are stream truncation, not a
                    // crash: flush what we have and finish cleanly.
                    tracing::warn!(
                        frame = index,
                        error = %err,
                        "Frame read failed; finishing early"
                    );
                    report.truncated = true;
                    break;
                }
            };
            report.frames_read += 1;

            if self.config.is_analysis_frame(index) {
                for (analyzer, id) in self.analyzers.iter_mut().zip(&ids) {
                    match analyzer.analyze(&frame) {
                        Ok(set) => self.cache.update(id.clone(), set),
                        Err(err) => {
                            // Keep the previous cached result for this and
                            // subsequent skipped frames.
                            tracing::warn!(
                                analyzer = %id,
                                frame = index,
                                error = %err,
                                "Analyzer failed; retaining previous annotations"
                            );
                            *failures.entry(id.clone()).or_insert(0) += 1;
                        }
                    }
                }
                report.analyze_passes += 1;
            }

            let merged = self.merged_annotations(&ids);

            let mut log_failed = false;
            if let Some(log) = self.annotation_log.as_mut() {
                if let Err(err) = log.write_record(index, &merged) {
                    tracing::warn!(error = %err, "Annotation log write failed; disabling log");
                    log_failed = true;
                }
            }
            if log_failed {
                self.annotation_log = None;
            }

            let rendered = renderer.render(frame, &merged);
            sink.write_frame(&rendered)?;
            report.frames_written += 1;

            if let Some(cb) = progress {
                let elapsed = started.elapsed().as_secs_f64();
                let remaining = total_frames.saturating_sub(report.frames_written);
                let eta_secs = if report.frames_written > 0 {
                    elapsed / report.frames_written as f64 * remaining as f64
                } else {
                    0.0
                };
                cb(Progress {
                    progress: report.frames_written as f64 / total_frames.max(1) as f64,
                    frames_written: report.frames_written,
                    total_frames,
                    analyze_passes: report.analyze_passes,
                    eta_secs,
                    stage: Stage::Annotating,
                });
            }
        }

        if let Some(log) = self.annotation_log.as_mut() {
            log.finish()?;
        }

        report.analyzer_failures = ids
            .iter()
            .filter_map(|id| {
                failures
                    .get(id)
                    .map(|count| (id.clone(), *count))
            })
            .collect();

        tracing::info!(
            frames_written = report.frames_written,
            analyze_passes = report.analyze_passes,
            truncated = report.truncated,
            "Annotation run finished"
        );
        Ok(report)
    }

    /// Concatenate every analyzer's cached set in registration order.
    fn merged_annotations(&self, ids: &[AnalyzerId]) -> AnnotationSet {
        let mut merged = AnnotationSet::new();
        for id in ids {
            merged.extend_from(self.cache.get(id));
        }
        merged
    }

    fn check_unique_ids(&self, ids: &[AnalyzerId]) -> VidmarkResult<()> {
        let mut seen = std::collections::HashSet::new();
        for id in ids {
            if !seen.insert(id) {
                return Err(VidmarkError::config(format!(
                    "Duplicate analyzer id: {id}"
                )));
            }
        }
        Ok(())
    }
}
