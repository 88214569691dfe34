//! Vidmark Pipeline
//!
//! The orchestration layer the rest of the workspace exists to serve:
//!
//! ```text
//! source ──▶ FramePipeline ──▶ analyzers (every Nth frame)
//!                │                   │
//!                │            AnnotationCache (write on analyze,
//!                │                   │         read on skip)
//!                ├── merge (registration order) ◀──┘
//!                ├── sidecar log (optional)
//!                ▼
//!             renderer ──▶ sink (strict ordinal order)
//! ```
//!
//! Expensive analysis runs on every Nth frame; skipped frames replay each
//! analyzer's most recent cached result, so every output frame is
//! annotated consistently and written in order.

pub mod cache;
pub mod engine;
pub mod job;
pub mod runner;
pub mod sidecar;

pub use cache::AnnotationCache;
pub use engine::{FramePipeline, RunReport};
pub use job::{AnnotateJob, PipelineConfig, Progress, ProgressCallback, Stage};
pub use runner::{run_annotate_job, run_annotate_job_with_report};
pub use sidecar::AnnotationLog;
