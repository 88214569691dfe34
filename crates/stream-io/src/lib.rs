//! Vidmark Stream I/O
//!
//! Frame-level access to video files for the annotation pipeline:
//! a sequential [`FrameSource`] with known total length, and a sequential
//! [`FrameSink`] at fixed geometry and rate.
//!
//! The shipped implementations drive the `ffmpeg`/`ffprobe` CLI over raw
//! RGB24 pipes, so no codec library is linked:
//!
//! ```text
//! input.mp4 ── ffprobe ──▶ VideoMetadata
//! input.mp4 ── ffmpeg ──▶ rawvideo stdout ──▶ Frame ...
//! Frame ... ──▶ rawvideo stdin ── ffmpeg ──▶ output.mp4 (H.264)
//! ```

pub mod ffmpeg;
pub mod traits;

pub use ffmpeg::{is_available, probe, FfmpegFrameSink, FfmpegFrameSource};
pub use traits::{FrameSink, FrameSource};
