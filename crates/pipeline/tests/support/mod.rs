//! In-memory doubles for pipeline tests.

use std::collections::VecDeque;
use std::io::Write;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use vidmark_analysis_core::{AnalysisError, Analyzer};
use vidmark_common::{VidmarkError, VidmarkResult};
use vidmark_frame_model::{
    parse_records, AnalyzerId, Annotation, AnnotationSet, Frame, FrameRecord, Region,
    VideoMetadata,
};
use vidmark_stream_io::{FrameSink, FrameSource};

pub const FRAME_WIDTH: u32 = 16;
pub const FRAME_HEIGHT: u32 = 16;

pub fn test_frame(index: u64) -> Frame {
    Frame::from_raw(
        index,
        FRAME_WIDTH,
        FRAME_HEIGHT,
        vec![0u8; (FRAME_WIDTH * FRAME_HEIGHT * 3) as usize],
    )
    .unwrap()
}

/// A source that advertises `advertised` frames but actually yields
/// `actual`. Setting them equal models a healthy stream.
pub struct MemorySource {
    metadata: VideoMetadata,
    frames: VecDeque<Frame>,
}

impl MemorySource {
    pub fn new(advertised: u64, actual: u64) -> Self {
        Self {
            metadata: VideoMetadata {
                width: FRAME_WIDTH,
                height: FRAME_HEIGHT,
                fps: 30.0,
                total_frames: advertised,
            },
            frames: (0..actual).map(test_frame).collect(),
        }
    }
}

impl FrameSource for MemorySource {
    fn metadata(&self) -> &VideoMetadata {
        &self.metadata
    }

    fn read_frame(&mut self) -> VidmarkResult<Option<Frame>> {
        Ok(self.frames.pop_front())
    }
}

/// Collects written frames and records whether close was called.
#[derive(Default)]
pub struct MemorySink {
    pub frames: Vec<Frame>,
    pub closed: bool,
    fail_after: Option<usize>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the write after `count` successful frames.
    pub fn failing_after(count: usize) -> Self {
        Self {
            fail_after: Some(count),
            ..Self::default()
        }
    }
}

impl FrameSink for MemorySink {
    fn write_frame(&mut self, frame: &Frame) -> VidmarkResult<()> {
        if self.closed {
            return Err(VidmarkError::stream("write after close"));
        }
        if self.fail_after == Some(self.frames.len()) {
            return Err(VidmarkError::stream("simulated write failure"));
        }
        self.frames.push(frame.clone());
        Ok(())
    }

    fn close(&mut self) -> VidmarkResult<()> {
        self.closed = true;
        Ok(())
    }
}

/// Emits one annotation whose detail records the analyzed frame ordinal,
/// making cache replay observable downstream.
pub struct StampAnalyzer {
    id: AnalyzerId,
    calls: Arc<AtomicU64>,
}

impl StampAnalyzer {
    pub fn new(id: &str) -> (Self, Arc<AtomicU64>) {
        let calls = Arc::new(AtomicU64::new(0));
        (
            Self {
                id: AnalyzerId::new(id),
                calls: calls.clone(),
            },
            calls,
        )
    }
}

impl Analyzer for StampAnalyzer {
    fn id(&self) -> AnalyzerId {
        self.id.clone()
    }

    fn analyze(&mut self, frame: &Frame) -> Result<AnnotationSet, AnalysisError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(vec![Annotation {
            region: Region::new(1, 1, 4, 4),
            label: self.id.to_string(),
            detail: frame.index().to_string(),
            source: self.id.clone(),
        }]
        .into())
    }
}

/// Fails every invocation after the first `succeed_passes` passes.
pub struct FlakyAnalyzer {
    id: AnalyzerId,
    succeed_passes: u64,
    calls: Arc<AtomicU64>,
}

impl FlakyAnalyzer {
    pub fn new(id: &str, succeed_passes: u64) -> (Self, Arc<AtomicU64>) {
        let calls = Arc::new(AtomicU64::new(0));
        (
            Self {
                id: AnalyzerId::new(id),
                succeed_passes,
                calls: calls.clone(),
            },
            calls,
        )
    }

    /// An analyzer that fails on every single pass.
    pub fn always_failing(id: &str) -> (Self, Arc<AtomicU64>) {
        Self::new(id, 0)
    }
}

impl Analyzer for FlakyAnalyzer {
    fn id(&self) -> AnalyzerId {
        self.id.clone()
    }

    fn analyze(&mut self, frame: &Frame) -> Result<AnnotationSet, AnalysisError> {
        let pass = self.calls.fetch_add(1, Ordering::SeqCst);
        if pass >= self.succeed_passes {
            return Err(AnalysisError::detector("simulated failure"));
        }
        Ok(vec![Annotation {
            region: Region::new(2, 2, 4, 4),
            label: self.id.to_string(),
            detail: frame.index().to_string(),
            source: self.id.clone(),
        }]
        .into())
    }
}

/// In-memory annotation log target readable after the run.
#[derive(Clone, Default)]
pub struct SharedBuf(pub Arc<Mutex<Vec<u8>>>);

impl SharedBuf {
    pub fn records(&self) -> Vec<FrameRecord> {
        let content = String::from_utf8(self.0.lock().unwrap().clone()).unwrap();
        parse_records(&content).unwrap()
    }
}

impl Write for SharedBuf {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}
