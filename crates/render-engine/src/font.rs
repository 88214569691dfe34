//! Label font loading and discovery.

use std::path::{Path, PathBuf};

use ab_glyph::FontVec;

use vidmark_common::{VidmarkError, VidmarkResult};

/// System font locations tried in order when no explicit font is
/// configured.
const FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/truetype/noto/NotoSans-Regular.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/System/Library/Fonts/Helvetica.ttc",
];

/// A TrueType font used for annotation labels.
pub struct LabelFont {
    font: FontVec,
    path: PathBuf,
}

impl LabelFont {
    /// Load a font from an explicit file path.
    pub fn from_path(path: &Path) -> VidmarkResult<Self> {
        let bytes = std::fs::read(path).map_err(|e| {
            VidmarkError::render(format!("Failed to read font {}: {e}", path.display()))
        })?;
        let font = FontVec::try_from_vec(bytes).map_err(|e| {
            VidmarkError::render(format!("Unreadable font {}: {e}", path.display()))
        })?;
        Ok(Self {
            font,
            path: path.to_path_buf(),
        })
    }

    /// Try the known system font locations, returning the first that
    /// loads. `None` when no usable font exists on this machine.
    pub fn discover() -> Option<Self> {
        for candidate in FONT_CANDIDATES {
            let path = Path::new(candidate);
            if !path.exists() {
                continue;
            }
            match Self::from_path(path) {
                Ok(font) => {
                    tracing::debug!(path = candidate, "Discovered label font");
                    return Some(font);
                }
                Err(e) => {
                    tracing::debug!(path = candidate, error = %e, "Skipping font candidate");
                }
            }
        }
        None
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub(crate) fn as_font(&self) -> &FontVec {
        &self.font
    }
}

impl std::fmt::Debug for LabelFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LabelFont")
            .field("path", &self.path)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_font_path_is_a_render_error() {
        let err = LabelFont::from_path(Path::new("/nonexistent/font.ttf")).unwrap_err();
        assert!(matches!(err, VidmarkError::Render { .. }));
    }
}
