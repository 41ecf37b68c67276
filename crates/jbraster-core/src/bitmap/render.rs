//! Rendering to an 8-bit grayscale image for inspection

use super::{Bitmap, Polarity};
use image::{GrayImage, Luma};

impl Bitmap {
    /// Render as an 8-bit grayscale image.
    ///
    /// ON pixels become black (0) for vanilla bitmaps and white (255) for
    /// chocolate ones; the other value is used for OFF pixels.
    pub fn to_gray_image(&self) -> GrayImage {
        let (on, off) = match self.polarity() {
            Polarity::Vanilla => (0u8, 255u8),
            Polarity::Chocolate => (255u8, 0u8),
        };
        GrayImage::from_fn(self.width(), self.height(), |x, y| {
            Luma([if self.get_pixel(x, y) { on } else { off }])
        })
    }
}
