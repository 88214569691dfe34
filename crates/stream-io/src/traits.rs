//! Abstract stream contracts consumed by the frame pipeline.

use vidmark_common::VidmarkResult;
use vidmark_frame_model::{Frame, VideoMetadata};

/// A sequential frame source with a known advertised length.
///
/// Abstracts video decoding so the pipeline can run against any media
/// backend, including in-memory test doubles.
pub trait FrameSource: Send {
    /// Stream geometry, rate, and advertised frame count.
    fn metadata(&self) -> &VideoMetadata;

    /// Read the next frame in ordinal order.
    ///
    /// `Ok(None)` is a clean end of stream. An `Err` mid-stream is a read
    /// fault the pipeline treats as premature end-of-stream, not a crash.
    fn read_frame(&mut self) -> VidmarkResult<Option<Frame>>;
}

/// A sequential frame sink at fixed geometry and rate.
pub trait FrameSink: Send {
    /// Write one frame. Frames must arrive in ordinal order.
    fn write_frame(&mut self, frame: &Frame) -> VidmarkResult<()>;

    /// Flush and release the underlying encoder. Called exactly once, on
    /// every exit path.
    fn close(&mut self) -> VidmarkResult<()>;
}
