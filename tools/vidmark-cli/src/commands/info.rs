//! Show stream metadata.

use std::path::PathBuf;

pub fn run(path: PathBuf) -> anyhow::Result<()> {
    let metadata = vidmark_stream_io::probe(&path)
        .map_err(|e| anyhow::anyhow!("Failed to probe {}: {e}", path.display()))?;

    println!("Stream: {}", path.display());
    println!(
        "  Resolution: {}x{} @ {:.3}fps",
        metadata.width, metadata.height, metadata.fps
    );
    println!("  Frames: {}", metadata.total_frames);
    println!("  Duration: {:.1}s", metadata.duration_secs());

    Ok(())
}
