//! A single video frame, owned by the pipeline for one processing turn.

use image::RgbImage;

/// An ordinal-indexed RGB24 bitmap.
///
/// The pipeline owns exactly one `Frame` at a time: it is read from the
/// source, borrowed immutably by analyzers, moved into the renderer, and
/// finally consumed by the sink write. Analyzers never retain a frame
/// beyond their invocation.
#[derive(Debug, Clone)]
pub struct Frame {
    index: u64,
    image: RgbImage,
}

impl Frame {
    /// Wrap an existing image buffer.
    pub fn new(index: u64, image: RgbImage) -> Self {
        Self { index, image }
    }

    /// Build a frame from raw interleaved RGB24 bytes.
    ///
    /// Returns `None` when `data.len() != width * height * 3`.
    pub fn from_raw(index: u64, width: u32, height: u32, data: Vec<u8>) -> Option<Self> {
        RgbImage::from_raw(width, height, data).map(|image| Self { index, image })
    }

    /// Ordinal position of this frame within its stream.
    pub fn index(&self) -> u64 {
        self.index
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Raw interleaved RGB24 bytes, row-major.
    pub fn as_raw(&self) -> &[u8] {
        self.image.as_raw()
    }

    pub fn image(&self) -> &RgbImage {
        &self.image
    }

    pub fn image_mut(&mut self) -> &mut RgbImage {
        &mut self.image
    }

    /// Consume the frame, keeping the ordinal index with the pixels.
    pub fn into_parts(self) -> (u64, RgbImage) {
        (self.index, self.image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_raw_validates_buffer_length() {
        assert!(Frame::from_raw(0, 4, 4, vec![0u8; 4 * 4 * 3]).is_some());
        assert!(Frame::from_raw(0, 4, 4, vec![0u8; 7]).is_none());
    }

    #[test]
    fn accessors_reflect_geometry() {
        let frame = Frame::from_raw(3, 8, 2, vec![9u8; 8 * 2 * 3]).unwrap();
        assert_eq!(frame.index(), 3);
        assert_eq!(frame.width(), 8);
        assert_eq!(frame.height(), 2);
        assert_eq!(frame.as_raw().len(), 8 * 2 * 3);
    }
}
