use std::fmt;

use image::{ImageBuffer, Rgb, RgbImage};
use serde::{Deserialize, Serialize};

/// Represents a single rendered frame
///
/// A thin wrapper around an RGB image buffer with the operations slide
/// rendering needs.
#[derive(Clone, Debug)]
pub struct Frame {
    buffer: RgbImage,
}

impl Frame {
    /// Create a new frame with the given dimensions filled with the specified color
    pub fn new_filled(width: u32, height: u32, color: [u8; 3]) -> Self {
        let buffer = ImageBuffer::from_pixel(width, height, Rgb(color));
        Self { buffer }
    }

    /// Get the width of the frame
    pub fn width(&self) -> u32 {
        self.buffer.width()
    }

    /// Get the height of the frame
    pub fn height(&self) -> u32 {
        self.buffer.height()
    }

    /// Get a pixel at the given coordinates (returns RGB array)
    pub fn get_pixel(&self, x: u32, y: u32) -> [u8; 3] {
        let pixel = self.buffer.get_pixel(x, y);
        [pixel[0], pixel[1], pixel[2]]
    }

    /// Get the underlying image buffer
    pub fn as_image(&self) -> &RgbImage {
        &self.buffer
    }

    /// Get a mutable reference to the underlying image buffer
    pub fn as_image_mut(&mut self) -> &mut RgbImage {
        &mut self.buffer
    }

    /// Save the frame as a PNG file
    pub fn save_png<P: AsRef<std::path::Path>>(&self, path: P) -> Result<(), image::ImageError> {
        self.buffer.save(path)
    }
}

/// One of the two fixed output geometries.
///
/// The set is closed: every pipeline invocation renders both members, and the
/// resolutions are not configurable at call time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolutionProfile {
    Landscape,
    Portrait,
}

impl ResolutionProfile {
    /// Both profiles, in the order they are exported
    pub const ALL: [ResolutionProfile; 2] = [Self::Landscape, Self::Portrait];

    /// Target frame size (width, height)
    pub fn dimensions(self) -> (u32, u32) {
        match self {
            Self::Landscape => (1280, 720),
            Self::Portrait => (720, 1280),
        }
    }

    pub fn width(self) -> u32 {
        self.dimensions().0
    }

    pub fn height(self) -> u32 {
        self.dimensions().1
    }

    /// Stable name used as the output-map key and in filenames
    pub fn name(self) -> &'static str {
        match self {
            Self::Landscape => "landscape",
            Self::Portrait => "portrait",
        }
    }
}

impl fmt::Display for ResolutionProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_dimensions() {
        assert_eq!(ResolutionProfile::Landscape.dimensions(), (1280, 720));
        assert_eq!(ResolutionProfile::Portrait.dimensions(), (720, 1280));
    }

    #[test]
    fn test_profile_names() {
        assert_eq!(ResolutionProfile::Landscape.name(), "landscape");
        assert_eq!(ResolutionProfile::Portrait.name(), "portrait");
        assert_eq!(ResolutionProfile::ALL.len(), 2);
    }

    #[test]
    fn test_frame_fill() {
        let frame = Frame::new_filled(16, 9, [10, 20, 30]);
        assert_eq!(frame.width(), 16);
        assert_eq!(frame.height(), 9);
        assert_eq!(frame.get_pixel(0, 0), [10, 20, 30]);
        assert_eq!(frame.get_pixel(15, 8), [10, 20, 30]);
    }
}
