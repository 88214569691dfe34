//! High-level job runner: wires ffmpeg streams to the pipeline.

use std::path::PathBuf;

use vidmark_analysis_core::Analyzer;
use vidmark_common::{VidmarkError, VidmarkResult};
use vidmark_render_engine::AnnotationRenderer;
use vidmark_stream_io::{FfmpegFrameSink, FfmpegFrameSource, FrameSource};

use crate::engine::{FramePipeline, RunReport};
use crate::job::{AnnotateJob, Progress, ProgressCallback, Stage};
use crate::sidecar::AnnotationLog;

/// Annotate a video file end to end.
///
/// This is the main entry point for callers that work with files rather
/// than raw streams: it probes the input, opens the ffmpeg decode/encode
/// pipes at the source's geometry and rate, and runs the pipeline with the
/// given analyzers.
pub async fn run_annotate_job(
    job: AnnotateJob,
    analyzers: Vec<Box<dyn Analyzer>>,
    renderer: AnnotationRenderer,
    progress: Option<ProgressCallback>,
) -> VidmarkResult<PathBuf> {
    let report = run_annotate_job_with_report(job.clone(), analyzers, renderer, progress).await?;
    tracing::info!(
        output = %job.output.display(),
        frames = report.frames_written,
        "Annotation complete"
    );
    Ok(job.output)
}

/// Like [`run_annotate_job`], returning the full [`RunReport`].
pub async fn run_annotate_job_with_report(
    job: AnnotateJob,
    analyzers: Vec<Box<dyn Analyzer>>,
    renderer: AnnotationRenderer,
    progress: Option<ProgressCallback>,
) -> VidmarkResult<RunReport> {
    tracing::info!(
        input = %job.input.display(),
        output = %job.output.display(),
        analyze_interval = job.config.analyze_interval(),
        "Starting annotation job"
    );

    if !job.input.exists() {
        return Err(VidmarkError::FileNotFound {
            path: job.input.clone(),
        });
    }

    if !vidmark_stream_io::is_available() {
        return Err(VidmarkError::unsupported(
            "No stream backend found (expected ffmpeg and ffprobe in PATH)",
        ));
    }

    if let Some(parent) = job.output.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let mut source = FfmpegFrameSource::open(&job.input)?;
    let metadata = *source.metadata();

    if let Some(cb) = &progress {
        cb(Progress {
            progress: 0.0,
            frames_written: 0,
            total_frames: metadata.total_frames,
            analyze_passes: 0,
            eta_secs: 0.0,
            stage: Stage::Preparing,
        });
    }

    let mut sink = FfmpegFrameSink::open(&job.output, &metadata)?;

    let mut pipeline = FramePipeline::new(job.config);
    for analyzer in analyzers {
        pipeline.register_analyzer(analyzer);
    }
    if let Some(path) = &job.annotations_out {
        pipeline.set_annotation_log(AnnotationLog::create(path)?);
    }

    pipeline.run(&mut source, &mut sink, &renderer, progress)
}
