//! Annotate a video.

use std::path::PathBuf;

use vidmark_analysis_core::{Analyzer, ReplayAnalyzer};
use vidmark_common::config::AppConfig;
use vidmark_frame_model::parse_records;
use vidmark_pipeline::{
    run_annotate_job_with_report, AnnotateJob, PipelineConfig, Progress, ProgressCallback,
};
use vidmark_render_engine::{AnnotationRenderer, LabelFont, RenderStyle};

pub async fn run(
    input: PathBuf,
    output: Option<PathBuf>,
    interval: Option<u32>,
    annotations: Option<PathBuf>,
    annotations_out: Option<PathBuf>,
    font: Option<PathBuf>,
) -> anyhow::Result<()> {
    let app_config = AppConfig::load();
    let interval = interval.unwrap_or(app_config.analysis.analyze_interval);
    let output = output.unwrap_or_else(|| default_output_path(&input));

    println!("Annotating: {}", input.display());
    println!("  Output: {}", output.display());
    println!("  Analyze interval: every {interval} frame(s)");

    let mut analyzers: Vec<Box<dyn Analyzer>> = Vec::new();
    if let Some(path) = &annotations {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read {}: {e}", path.display()))?;
        let records = parse_records(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse {}: {e}", path.display()))?;
        let replay = ReplayAnalyzer::new(records);
        println!(
            "  Replaying annotations: {} ({} annotated frames)",
            path.display(),
            replay.annotated_frames()
        );
        analyzers.push(Box::new(replay));
    } else {
        println!("  No analyzers registered; output will be an unannotated re-encode");
    }

    let renderer = build_renderer(font.or(app_config.render.font_path.clone()));
    if !renderer.has_font() {
        println!("  No label font found; drawing outlines only");
    }

    let job = AnnotateJob {
        input,
        output: output.clone(),
        config: PipelineConfig::new(interval)
            .map_err(|e| anyhow::anyhow!("Invalid configuration: {e}"))?,
        annotations_out,
    };

    let progress_cb: ProgressCallback = Box::new(|p: Progress| {
        print!(
            "\r  Progress: {:.1}% ({}/{} frames, {} analyze passes, ETA: {:.0}s)  ",
            p.progress * 100.0,
            p.frames_written,
            p.total_frames,
            p.analyze_passes,
            p.eta_secs,
        );
    });

    match run_annotate_job_with_report(job, analyzers, renderer, Some(progress_cb)).await {
        Ok(report) => {
            println!("\nAnnotation complete: {}", output.display());
            println!(
                "  {} frames written, {} analyze passes",
                report.frames_written, report.analyze_passes
            );
            if report.truncated {
                println!(
                    "  Stream ended early: {} of advertised frames were readable",
                    report.frames_read
                );
            }
            for (analyzer, failures) in &report.analyzer_failures {
                println!("  Analyzer '{analyzer}' failed {failures} pass(es)");
            }
        }
        Err(e) => {
            println!("\nAnnotation failed: {e}");
        }
    }

    Ok(())
}

fn build_renderer(font_path: Option<PathBuf>) -> AnnotationRenderer {
    let renderer = AnnotationRenderer::new(RenderStyle::default());
    let font = match font_path {
        Some(path) => match LabelFont::from_path(&path) {
            Ok(font) => Some(font),
            Err(e) => {
                tracing::warn!(error = %e, "Configured font unusable; falling back to discovery");
                LabelFont::discover()
            }
        },
        None => LabelFont::discover(),
    };
    match font {
        Some(font) => renderer.with_font(font),
        None => renderer,
    }
}

fn default_output_path(input: &PathBuf) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "output".to_string());
    let extension = input
        .extension()
        .map(|e| e.to_string_lossy().to_string())
        .unwrap_or_else(|| "mp4".to_string());
    input.with_file_name(format!("{stem}_annotated.{extension}"))
}
