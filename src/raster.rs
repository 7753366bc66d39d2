//! Signature Rasterisation
//!
//! Strokes are stamped onto an alpha mask as round pen tips and encoded as
//! an RGBA PNG with black ink on a transparent background.

use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use png::{BitDepth, ColorType, Encoder, EncodingError};

use crate::signature_pad::Point;

/// Spacing between pen stamps along a segment, in pixels.
const STAMP_SPACING: f32 = 0.5;

/// Prefix of a PNG data URL.
pub const PNG_DATA_URL_PREFIX: &str = "data:image/png;base64,";

/// Alpha mask that strokes are drawn onto.
#[derive(Debug, Clone)]
pub(crate) struct Canvas {
    width: u32,
    height: u32,
    alpha: Vec<u8>,
}

impl Canvas {
    pub(crate) fn new(width: u32, height: u32) -> Self {
        let len = usize::try_from(u64::from(width) * u64::from(height)).unwrap_or(0);

        Self {
            width,
            height,
            alpha: vec![0; len],
        }
    }

    /// Draw a polyline with a round pen of diameter `pen_width`.
    pub(crate) fn draw_stroke(&mut self, points: &[Point], pen_width: f32) {
        let radius = (pen_width / 2.0).max(0.5);

        let Some(first) = points.first() else {
            return;
        };

        self.stamp(*first, radius);

        for pair in points.windows(2) {
            if let [from, to] = pair {
                self.draw_segment(*from, *to, radius);
            }
        }
    }

    /// Number of pixels with any ink.
    #[cfg(test)]
    pub(crate) fn inked_pixels(&self) -> usize {
        self.alpha.iter().filter(|alpha| **alpha > 0).count()
    }

    /// Encode as RGBA PNG.
    pub(crate) fn encode_png(&self) -> Result<Vec<u8>, EncodingError> {
        let mut rgba = Vec::with_capacity(self.alpha.len() * 4);

        for alpha in &self.alpha {
            rgba.extend_from_slice(&[0, 0, 0, *alpha]);
        }

        let mut out = Vec::new();

        {
            let mut encoder = Encoder::new(&mut out, self.width, self.height);
            encoder.set_color(ColorType::Rgba);
            encoder.set_depth(BitDepth::Eight);

            let mut writer = encoder.write_header()?;
            writer.write_image_data(&rgba)?;
            writer.finish()?;
        }

        Ok(out)
    }

    fn draw_segment(&mut self, from: Point, to: Point, radius: f32) {
        let dx = to.x - from.x;
        let dy = to.y - from.y;
        let length = dx.hypot(dy);

        #[expect(
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss,
            reason = "segment lengths are bounded by the canvas diagonal"
        )]
        let steps = (length / STAMP_SPACING).ceil().max(1.0) as u32;

        for step in 1..=steps {
            #[expect(
                clippy::cast_precision_loss,
                reason = "step counts are far below f32 precision limits"
            )]
            let t = step as f32 / steps as f32;

            self.stamp(
                Point {
                    x: from.x + dx * t,
                    y: from.y + dy * t,
                },
                radius,
            );
        }
    }

    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_precision_loss,
        reason = "pixel coordinates are clamped to the canvas before conversion"
    )]
    fn stamp(&mut self, center: Point, radius: f32) {
        let max_x = self.width as f32;
        let max_y = self.height as f32;

        let min_px = (center.x - radius).floor().clamp(0.0, max_x) as i64;
        let max_px = (center.x + radius).ceil().clamp(0.0, max_x) as i64;
        let min_py = (center.y - radius).floor().clamp(0.0, max_y) as i64;
        let max_py = (center.y + radius).ceil().clamp(0.0, max_y) as i64;

        let radius_sq = radius * radius;

        for py in min_py..max_py {
            for px in min_px..max_px {
                let cx = px as f32 + 0.5 - center.x;
                let cy = py as f32 + 0.5 - center.y;

                if cx * cx + cy * cy > radius_sq {
                    continue;
                }

                let Ok(index) = usize::try_from(py * i64::from(self.width) + px) else {
                    continue;
                };

                if let Some(alpha) = self.alpha.get_mut(index) {
                    *alpha = u8::MAX;
                }
            }
        }
    }
}

/// Wrap PNG bytes in a `data:` URL.
#[must_use]
pub fn png_data_url(png: &[u8]) -> String {
    format!("{PNG_DATA_URL_PREFIX}{}", BASE64.encode(png))
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];

    #[test]
    fn empty_canvas_has_no_ink() {
        let canvas = Canvas::new(10, 10);

        assert_eq!(canvas.inked_pixels(), 0);
    }

    #[test]
    fn horizontal_stroke_inks_pixels_along_the_line() {
        let mut canvas = Canvas::new(20, 10);

        canvas.draw_stroke(&[Point { x: 2.0, y: 5.0 }, Point { x: 18.0, y: 5.0 }], 2.0);

        // 16px long, 2px wide, plus round caps
        assert!(canvas.inked_pixels() >= 32, "{}", canvas.inked_pixels());
        assert!(canvas.inked_pixels() < 60, "{}", canvas.inked_pixels());
    }

    #[test]
    fn strokes_outside_the_canvas_are_clipped() {
        let mut canvas = Canvas::new(10, 10);

        canvas.draw_stroke(&[Point { x: -50.0, y: -50.0 }, Point { x: -40.0, y: -40.0 }], 3.0);

        assert_eq!(canvas.inked_pixels(), 0);
    }

    #[test]
    fn encodes_png_with_signature_bytes() -> TestResult {
        let mut canvas = Canvas::new(8, 4);
        canvas.draw_stroke(&[Point { x: 4.0, y: 2.0 }], 2.0);

        let png = canvas.encode_png()?;

        assert_eq!(png.get(..8), Some(PNG_SIGNATURE.as_slice()));

        Ok(())
    }

    #[test]
    fn data_url_is_base64_png() {
        let url = png_data_url(&[1, 2, 3]);

        assert_eq!(url, "data:image/png;base64,AQID");
    }
}
