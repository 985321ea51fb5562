use std::io::{Seek, Write};

use egui::{ColorImage, Rect};
use image::{ImageFormat, RgbaImage};

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("frame buffer does not hold {width}x{height} RGBA pixels")]
    BufferSize { width: usize, height: usize },

    #[error("encoding frame: {0}")]
    Encode(#[from] image::ImageError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// RGBA pixels of a rendered graph frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedFrame {
    pub width: usize,
    pub height: usize,
    /// Unmultiplied RGBA, row-major, four bytes per pixel.
    pub rgba: Vec<u8>,
}

impl ExportedFrame {
    pub fn from_image(image: &ColorImage) -> Self {
        let [width, height] = image.size;
        let rgba = image
            .pixels
            .iter()
            .flat_map(|p| p.to_srgba_unmultiplied())
            .collect();
        Self {
            width,
            height,
            rgba,
        }
    }

    /// Crops a full viewport screenshot to the widget rectangle, given in points.
    pub fn from_screenshot(image: &ColorImage, rect: Rect, pixels_per_point: f32) -> Self {
        Self::from_image(&image.region(&rect, Some(pixels_per_point)))
    }

    pub fn to_image(&self) -> Result<RgbaImage, ExportError> {
        let size = || ExportError::BufferSize {
            width: self.width,
            height: self.height,
        };
        let width = u32::try_from(self.width).map_err(|_| size())?;
        let height = u32::try_from(self.height).map_err(|_| size())?;
        RgbaImage::from_raw(width, height, self.rgba.clone()).ok_or_else(size)
    }

    /// PNG encoding of the frame.
    pub fn write_png<W: Write + Seek>(&self, w: &mut W) -> Result<(), ExportError> {
        self.to_image()?.write_to(w, ImageFormat::Png)?;
        Ok(())
    }

    pub fn to_png(&self) -> Result<Vec<u8>, ExportError> {
        let mut out = std::io::Cursor::new(Vec::new());
        self.write_png(&mut out)?;
        Ok(out.into_inner())
    }
}

/// Progress of a frame export through the viewport screenshot round-trip.
#[derive(Debug, Clone, Default)]
pub struct ExportState {
    requested: bool,
    awaiting: bool,
    frame: Option<ExportedFrame>,
}

impl ExportState {
    /// Asks for the next rendered frame to be captured.
    pub fn request(&mut self) {
        self.requested = true;
    }

    pub fn is_pending(&self) -> bool {
        self.requested || self.awaiting
    }

    /// Called by the widget once it has sent the screenshot command.
    pub(crate) fn take_request(&mut self) -> bool {
        if !self.requested {
            return false;
        }
        self.requested = false;
        self.awaiting = true;
        true
    }

    pub(crate) fn is_awaiting(&self) -> bool {
        self.awaiting
    }

    pub(crate) fn complete(&mut self, frame: ExportedFrame) {
        log::info!("exported frame {}x{}", frame.width, frame.height);
        self.awaiting = false;
        self.frame = Some(frame);
    }

    /// The last captured frame, if any.
    pub fn take_frame(&mut self) -> Option<ExportedFrame> {
        self.frame.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::{Color32, Pos2};

    fn image() -> ColorImage {
        ColorImage::from_rgba_unmultiplied([2, 1], &[255, 0, 0, 255, 1, 2, 3, 255])
    }

    #[test]
    fn png_keeps_pixels() {
        let frame = ExportedFrame::from_image(&image());
        assert_eq!(frame.rgba, vec![255, 0, 0, 255, 1, 2, 3, 255]);

        let png = frame.to_png().unwrap();
        let decoded = image::load_from_memory_with_format(&png, ImageFormat::Png)
            .unwrap()
            .to_rgba8();
        assert_eq!(decoded.dimensions(), (2, 1));
        assert_eq!(decoded.into_raw(), frame.rgba);
    }

    #[test]
    fn short_buffer_is_rejected() {
        let frame = ExportedFrame {
            width: 3,
            height: 3,
            rgba: vec![0; 8],
        };
        assert!(matches!(
            frame.to_png(),
            Err(ExportError::BufferSize { width: 3, height: 3 })
        ));
    }

    #[test]
    fn screenshot_is_cropped_to_widget() {
        let mut full = ColorImage::from_rgba_unmultiplied([4, 4], &[0; 64]);
        full.pixels[5] = Color32::WHITE;
        let rect = Rect::from_min_max(Pos2::new(1., 1.), Pos2::new(3., 3.));
        let frame = ExportedFrame::from_screenshot(&full, rect, 1.);
        assert_eq!((frame.width, frame.height), (2, 2));
        assert_eq!(&frame.rgba[..4], &[255, 255, 255, 255]);
    }

    #[test]
    fn export_round_trip() {
        let mut s = ExportState::default();
        assert!(!s.take_request());
        s.request();
        assert!(s.is_pending());
        assert!(s.take_request());
        assert!(s.is_awaiting());
        s.complete(ExportedFrame::from_image(&image()));
        assert!(!s.is_pending());
        assert!(s.take_frame().is_some());
        assert!(s.take_frame().is_none());
    }
}
