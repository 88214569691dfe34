//! Check system capabilities.

use vidmark_render_engine::LabelFont;

pub fn run() -> anyhow::Result<()> {
    println!("Vidmark System Check");
    println!("{}", "=".repeat(50));

    let backend_ok = vidmark_stream_io::is_available();
    if backend_ok {
        println!("[OK] Stream backend: ffmpeg and ffprobe found in PATH");
    } else {
        println!("[MISSING] Stream backend: ffmpeg/ffprobe not found in PATH");
    }

    match LabelFont::discover() {
        Some(font) => println!("[OK] Label font: {}", font.path().display()),
        None => println!("[WARN] Label font: none found (outlines only)"),
    }

    println!();
    if backend_ok {
        println!("All required capabilities are available. Vidmark is ready.");
    } else {
        println!("Some required capabilities are missing. Install ffmpeg to proceed.");
    }

    Ok(())
}
