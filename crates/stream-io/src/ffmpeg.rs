//! ffmpeg/ffprobe-backed frame streams.

use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};
use std::thread::JoinHandle;

use serde::Deserialize;

use vidmark_common::{VidmarkError, VidmarkResult};
use vidmark_frame_model::{Frame, VideoMetadata};

use crate::traits::{FrameSink, FrameSource};

/// Whether both `ffmpeg` and `ffprobe` are resolvable on PATH.
pub fn is_available() -> bool {
    which::which("ffmpeg").is_ok() && which::which("ffprobe").is_ok()
}

/// ffprobe JSON output for the selected video stream.
#[derive(Debug, Deserialize)]
struct ProbeOutput {
    #[serde(default)]
    streams: Vec<ProbeStream>,
}

#[derive(Debug, Deserialize)]
struct ProbeStream {
    width: u32,
    height: u32,
    /// Frame rate as a rational, e.g. "30000/1001".
    r_frame_rate: String,
    /// Frame count as a decimal string. Absent for some containers.
    nb_frames: Option<String>,
    /// Stream duration in seconds as a decimal string.
    duration: Option<String>,
}

/// Probe a video file's geometry, rate, and frame count.
pub fn probe(path: &Path) -> VidmarkResult<VideoMetadata> {
    if !path.exists() {
        return Err(VidmarkError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let output = Command::new("ffprobe")
        .args([
            "-v",
            "error",
            "-select_streams",
            "v:0",
            "-show_entries",
            "stream=width,height,r_frame_rate,nb_frames,duration",
            "-of",
            "json",
        ])
        .arg(path)
        .output()
        .map_err(|e| VidmarkError::source_open(format!("Failed to run ffprobe: {e}")))?;

    if !output.status.success() {
        return Err(VidmarkError::source_open(format!(
            "ffprobe failed for {}: {}",
            path.display(),
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }

    parse_probe_output(&String::from_utf8_lossy(&output.stdout))
}

fn parse_probe_output(json: &str) -> VidmarkResult<VideoMetadata> {
    let probe: ProbeOutput = serde_json::from_str(json)
        .map_err(|e| VidmarkError::source_open(format!("Unreadable ffprobe output: {e}")))?;

    let stream = probe
        .streams
        .into_iter()
        .next()
        .ok_or_else(|| VidmarkError::source_open("No video stream found"))?;

    let fps = parse_rational(&stream.r_frame_rate).ok_or_else(|| {
        VidmarkError::source_open(format!("Unreadable frame rate: {}", stream.r_frame_rate))
    })?;

    let total_frames = match stream.nb_frames.as_deref().and_then(|n| n.parse().ok()) {
        Some(count) => count,
        None => {
            // Some containers omit nb_frames; estimate from duration.
            let duration: f64 = stream
                .duration
                .as_deref()
                .and_then(|d| d.parse().ok())
                .ok_or_else(|| {
                    VidmarkError::source_open("Stream advertises neither frame count nor duration")
                })?;
            let estimated = (duration * fps).round() as u64;
            tracing::warn!(estimated, "nb_frames missing; estimated from duration");
            estimated
        }
    };

    Ok(VideoMetadata {
        width: stream.width,
        height: stream.height,
        fps,
        total_frames,
    })
}

/// Parse an ffprobe rational like "30000/1001" or a plain "25".
fn parse_rational(value: &str) -> Option<f64> {
    match value.split_once('/') {
        Some((num, den)) => {
            let num: f64 = num.trim().parse().ok()?;
            let den: f64 = den.trim().parse().ok()?;
            if den == 0.0 {
                None
            } else {
                Some(num / den)
            }
        }
        None => value.trim().parse().ok(),
    }
}

fn build_decode_args(path: &Path) -> Vec<String> {
    vec![
        "-v".to_string(),
        "error".to_string(),
        "-i".to_string(),
        path.display().to_string(),
        "-map".to_string(),
        "0:v:0".to_string(),
        "-f".to_string(),
        "rawvideo".to_string(),
        "-pix_fmt".to_string(),
        "rgb24".to_string(),
        "pipe:1".to_string(),
    ]
}

fn build_encode_args(path: &Path, metadata: &VideoMetadata) -> Vec<String> {
    vec![
        "-y".to_string(),
        "-v".to_string(),
        "error".to_string(),
        "-f".to_string(),
        "rawvideo".to_string(),
        "-pix_fmt".to_string(),
        "rgb24".to_string(),
        "-s".to_string(),
        format!("{}x{}", metadata.width, metadata.height),
        "-r".to_string(),
        format!("{}", metadata.fps),
        "-i".to_string(),
        "pipe:0".to_string(),
        "-an".to_string(),
        "-c:v".to_string(),
        "libx264".to_string(),
        "-pix_fmt".to_string(),
        "yuv420p".to_string(),
        path.display().to_string(),
    ]
}

/// Drain a child's stderr on its own thread so the process never blocks on
/// a full pipe; the collected output feeds error messages at exit.
fn spawn_stderr_drain(child: &mut Child) -> Option<JoinHandle<String>> {
    let stderr = child.stderr.take()?;
    Some(std::thread::spawn(move || {
        let mut reader = std::io::BufReader::new(stderr);
        let mut output = String::new();
        match reader.read_to_string(&mut output) {
            Ok(_) => output,
            Err(err) => format!("<failed to read ffmpeg stderr: {err}>"),
        }
    }))
}

fn stderr_tail(handle: Option<JoinHandle<String>>) -> String {
    handle
        .and_then(|h| h.join().ok())
        .unwrap_or_else(|| "<no stderr captured>".to_string())
        .trim()
        .to_string()
}

/// Sequential frame reader over an ffmpeg rawvideo decode pipe.
pub struct FfmpegFrameSource {
    path: PathBuf,
    metadata: VideoMetadata,
    child: Child,
    stdout: ChildStdout,
    stderr: Option<JoinHandle<String>>,
    next_index: u64,
    finished: bool,
}

impl FfmpegFrameSource {
    /// Probe `path` and start decoding from its first frame.
    pub fn open(path: &Path) -> VidmarkResult<Self> {
        let metadata = probe(path)?;

        let mut child = Command::new("ffmpeg")
            .args(build_decode_args(path))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| VidmarkError::source_open(format!("Failed to start ffmpeg: {e}")))?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| VidmarkError::source_open("Failed to capture ffmpeg stdout"))?;
        let stderr = spawn_stderr_drain(&mut child);

        tracing::debug!(
            path = %path.display(),
            width = metadata.width,
            height = metadata.height,
            fps = metadata.fps,
            total_frames = metadata.total_frames,
            "Opened frame source"
        );

        Ok(Self {
            path: path.to_path_buf(),
            metadata,
            child,
            stdout,
            stderr,
            next_index: 0,
            finished: false,
        })
    }
}

impl FrameSource for FfmpegFrameSource {
    fn metadata(&self) -> &VideoMetadata {
        &self.metadata
    }

    fn read_frame(&mut self) -> VidmarkResult<Option<Frame>> {
        if self.finished {
            return Ok(None);
        }

        let mut buf = vec![0u8; self.metadata.frame_bytes()];
        let mut filled = 0usize;

        while filled < buf.len() {
            match self.stdout.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    self.finished = true;
                    return Err(VidmarkError::stream(format!(
                        "Read failure at frame {}: {e}",
                        self.next_index
                    )));
                }
            }
        }

        if filled == 0 {
            // EOF on a frame boundary: clean end of stream.
            self.finished = true;
            return Ok(None);
        }
        if filled < buf.len() {
            self.finished = true;
            return Err(VidmarkError::stream(format!(
                "Truncated frame {} ({filled} of {} bytes)",
                self.next_index,
                buf.len()
            )));
        }

        let frame = Frame::from_raw(self.next_index, self.metadata.width, self.metadata.height, buf)
            .ok_or_else(|| VidmarkError::stream("Frame buffer mismatch"))?;
        self.next_index += 1;
        Ok(Some(frame))
    }
}

impl Drop for FfmpegFrameSource {
    fn drop(&mut self) {
        // The decoder may still be running if the read loop stopped early.
        if self.child.try_wait().ok().flatten().is_none() {
            let _ = self.child.kill();
            let _ = self.child.wait();
        }
        if let Some(handle) = self.stderr.take() {
            let output = handle.join().unwrap_or_default();
            let output = output.trim();
            if !output.is_empty() {
                tracing::debug!(path = %self.path.display(), stderr = output, "Decoder stderr");
            }
        }
    }
}

/// Sequential frame writer into an ffmpeg rawvideo encode pipe.
pub struct FfmpegFrameSink {
    path: PathBuf,
    metadata: VideoMetadata,
    child: Child,
    stdin: Option<ChildStdin>,
    stderr: Option<JoinHandle<String>>,
    frames_written: u64,
    closed: bool,
}

impl FfmpegFrameSink {
    /// Start an encoder writing to `path` with the source's geometry and
    /// rate.
    pub fn open(path: &Path, metadata: &VideoMetadata) -> VidmarkResult<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                return Err(VidmarkError::sink_open(format!(
                    "Output directory does not exist: {}",
                    parent.display()
                )));
            }
        }

        let mut child = Command::new("ffmpeg")
            .args(build_encode_args(path, metadata))
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| VidmarkError::sink_open(format!("Failed to start ffmpeg: {e}")))?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| VidmarkError::sink_open("Failed to open ffmpeg stdin"))?;
        let stderr = spawn_stderr_drain(&mut child);

        Ok(Self {
            path: path.to_path_buf(),
            metadata: *metadata,
            child,
            stdin: Some(stdin),
            stderr,
            frames_written: 0,
            closed: false,
        })
    }
}

impl FrameSink for FfmpegFrameSink {
    fn write_frame(&mut self, frame: &Frame) -> VidmarkResult<()> {
        if frame.width() != self.metadata.width || frame.height() != self.metadata.height {
            return Err(VidmarkError::stream(format!(
                "Frame {} geometry {}x{} does not match sink {}x{}",
                frame.index(),
                frame.width(),
                frame.height(),
                self.metadata.width,
                self.metadata.height
            )));
        }

        let stdin = self
            .stdin
            .as_mut()
            .ok_or_else(|| VidmarkError::stream("Sink already closed"))?;

        stdin.write_all(frame.as_raw()).map_err(|e| {
            VidmarkError::stream(format!("Write failure at frame {}: {e}", frame.index()))
        })?;
        self.frames_written += 1;
        Ok(())
    }

    fn close(&mut self) -> VidmarkResult<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;

        // Dropping stdin sends EOF so the encoder can flush and finalize.
        drop(self.stdin.take());

        let status = self
            .child
            .wait()
            .map_err(|e| VidmarkError::sink_open(format!("Failed to wait on ffmpeg: {e}")))?;
        let stderr = stderr_tail(self.stderr.take());

        if !status.success() {
            return Err(VidmarkError::sink_open(format!(
                "ffmpeg encode failed for {} (status {status}): {stderr}",
                self.path.display()
            )));
        }

        tracing::debug!(
            path = %self.path.display(),
            frames = self.frames_written,
            "Closed frame sink"
        );
        Ok(())
    }
}

impl Drop for FfmpegFrameSink {
    fn drop(&mut self) {
        if !self.closed {
            tracing::warn!(path = %self.path.display(), "Frame sink dropped without close");
            drop(self.stdin.take());
            let _ = self.child.kill();
            let _ = self.child.wait();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_rational_handles_ntsc_and_plain_rates() {
        assert!((parse_rational("30000/1001").unwrap() - 29.97).abs() < 0.01);
        assert_eq!(parse_rational("25/1"), Some(25.0));
        assert_eq!(parse_rational("24"), Some(24.0));
        assert_eq!(parse_rational("30/0"), None);
        assert_eq!(parse_rational("abc"), None);
    }

    #[test]
    fn probe_output_prefers_nb_frames() {
        let json = r#"{
            "streams": [{
                "width": 1280,
                "height": 720,
                "r_frame_rate": "30/1",
                "nb_frames": "250",
                "duration": "8.333333"
            }]
        }"#;
        let meta = parse_probe_output(json).unwrap();
        assert_eq!((meta.width, meta.height), (1280, 720));
        assert_eq!(meta.fps, 30.0);
        assert_eq!(meta.total_frames, 250);
    }

    #[test]
    fn probe_output_falls_back_to_duration() {
        let json = r#"{
            "streams": [{
                "width": 640,
                "height": 480,
                "r_frame_rate": "25/1",
                "duration": "10.0"
            }]
        }"#;
        let meta = parse_probe_output(json).unwrap();
        assert_eq!(meta.total_frames, 250);
    }

    #[test]
    fn probe_output_without_length_info_is_an_error() {
        let json = r#"{
            "streams": [{
                "width": 640,
                "height": 480,
                "r_frame_rate": "25/1"
            }]
        }"#;
        assert!(parse_probe_output(json).is_err());
    }

    #[test]
    fn probe_output_without_video_stream_is_an_error() {
        assert!(parse_probe_output(r#"{"streams": []}"#).is_err());
    }

    #[test]
    fn decode_args_request_raw_rgb_on_stdout() {
        let args = build_decode_args(Path::new("in.mp4"));
        assert!(args.windows(2).any(|w| w == ["-pix_fmt", "rgb24"]));
        assert_eq!(args.last().unwrap(), "pipe:1");
    }

    #[test]
    fn encode_args_fix_geometry_and_rate() {
        let meta = VideoMetadata {
            width: 1920,
            height: 1080,
            fps: 30.0,
            total_frames: 1,
        };
        let args = build_encode_args(Path::new("out.mp4"), &meta);
        assert!(args.windows(2).any(|w| w == ["-s", "1920x1080"]));
        assert!(args.windows(2).any(|w| w == ["-r", "30"]));
        assert!(args.windows(2).any(|w| w == ["-c:v", "libx264"]));
        assert_eq!(args.last().unwrap(), "out.mp4");
    }
}
