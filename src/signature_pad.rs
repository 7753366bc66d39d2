//! Signature Pad
//!
//! Collects a hand-drawn signature from pointer input and produces a vector
//! (SVG) and a raster (PNG) rendition of it.
//!
//! A pad hands out its payload once. After [`SignaturePad::confirm`] succeeds
//! it stays locked until the owner calls [`SignaturePad::reset`], which keeps
//! a slow submission from being sent twice.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::raster::{Canvas, png_data_url};

/// A pointer position in canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal offset from the left edge.
    pub x: f32,

    /// Vertical offset from the top edge.
    pub y: f32,
}

impl From<(f32, f32)> for Point {
    fn from((x, y): (f32, f32)) -> Self {
        Self { x, y }
    }
}

impl From<[f32; 2]> for Point {
    fn from([x, y]: [f32; 2]) -> Self {
        Self { x, y }
    }
}

/// Canvas and pen settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PadOptions {
    /// Canvas width in pixels.
    pub width: u32,

    /// Canvas height in pixels.
    pub height: u32,

    /// Stroke width in pixels.
    pub pen_width: f32,
}

impl Default for PadOptions {
    fn default() -> Self {
        Self {
            width: 500,
            height: 200,
            pen_width: 2.5,
        }
    }
}

/// Lifecycle of a pad.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PadState {
    /// Accepting input.
    Ready,

    /// The owner has a submission in flight. Input and confirm are ignored.
    Busy,

    /// Payload handed out; locked until reset.
    Confirmed,
}

#[derive(Debug, Error)]
pub enum SignaturePadError {
    #[error("please draw your signature first")]
    Empty,

    #[error("signature pad is busy")]
    Busy,

    #[error("signature already submitted")]
    AlreadyConfirmed,

    #[error("invalid canvas size {width}x{height}")]
    InvalidCanvas { width: u32, height: u32 },

    #[error("failed to encode signature image")]
    Encoding(#[from] png::EncodingError),
}

/// A finished signature.
#[derive(Debug, Clone, PartialEq)]
pub struct CapturedSignature {
    /// SVG document, one path per stroke.
    pub svg: String,

    /// PNG image bytes.
    pub png: Vec<u8>,

    /// Strokes as drawn.
    pub strokes: Vec<Vec<Point>>,
}

impl CapturedSignature {
    /// PNG as a `data:image/png;base64,` URL, the form sent to the backend.
    #[must_use]
    pub fn data_url(&self) -> String {
        png_data_url(&self.png)
    }
}

/// Freehand signature capture.
#[derive(Debug, Clone)]
pub struct SignaturePad {
    options: PadOptions,
    strokes: Vec<Vec<Point>>,
    drawing: bool,
    state: PadState,
}

impl SignaturePad {
    /// Create an empty pad.
    ///
    /// # Errors
    ///
    /// Returns an error when the canvas has a zero dimension.
    pub fn new(options: PadOptions) -> Result<Self, SignaturePadError> {
        if options.width == 0 || options.height == 0 {
            return Err(SignaturePadError::InvalidCanvas {
                width: options.width,
                height: options.height,
            });
        }

        Ok(Self {
            options,
            strokes: Vec::new(),
            drawing: false,
            state: PadState::Ready,
        })
    }

    /// Build a pad pre-filled with recorded strokes.
    ///
    /// # Errors
    ///
    /// Returns an error when the canvas has a zero dimension.
    pub fn from_strokes<P>(
        options: PadOptions,
        strokes: impl IntoIterator<Item = Vec<P>>,
    ) -> Result<Self, SignaturePadError>
    where
        P: Into<Point>,
    {
        let mut pad = Self::new(options)?;

        for stroke in strokes {
            let mut points = stroke.into_iter();

            let Some(first) = points.next() else {
                continue;
            };

            pad.pointer_down(first.into());

            for point in points {
                pad.pointer_move(point.into());
            }

            pad.pointer_up();
        }

        Ok(pad)
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> PadState {
        self.state
    }

    #[must_use]
    pub fn options(&self) -> PadOptions {
        self.options
    }

    /// Whether nothing has been drawn.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.strokes.iter().all(Vec::is_empty)
    }

    /// Recorded strokes.
    #[must_use]
    pub fn strokes(&self) -> &[Vec<Point>] {
        &self.strokes
    }

    /// Start a stroke.
    pub fn pointer_down(&mut self, point: Point) {
        if self.state != PadState::Ready {
            return;
        }

        let point = self.clamp(point);

        self.drawing = true;
        self.strokes.push(vec![point]);
    }

    /// Extend the current stroke. Ignored when no stroke is in progress.
    pub fn pointer_move(&mut self, point: Point) {
        if self.state != PadState::Ready || !self.drawing {
            return;
        }

        let point = self.clamp(point);

        if let Some(stroke) = self.strokes.last_mut()
            && stroke.last() != Some(&point)
        {
            stroke.push(point);
        }
    }

    /// Finish the current stroke.
    pub fn pointer_up(&mut self) {
        self.drawing = false;
    }

    /// Remove the last stroke.
    pub fn undo(&mut self) {
        if self.state == PadState::Ready {
            self.drawing = false;
            self.strokes.pop();
        }
    }

    /// Remove every stroke.
    pub fn clear(&mut self) {
        if self.state == PadState::Ready {
            self.drawing = false;
            self.strokes.clear();
        }
    }

    /// Enter or leave the busy state while the owner submits.
    pub fn set_busy(&mut self, busy: bool) {
        self.state = match (busy, self.state) {
            (true, _) => PadState::Busy,
            (false, PadState::Busy) => PadState::Ready,
            (false, state) => state,
        };
    }

    /// Re-arm the pad after a submission finished or failed.
    ///
    /// Strokes are kept so the signer does not have to draw again.
    pub fn reset(&mut self) {
        self.drawing = false;
        self.state = PadState::Ready;
    }

    /// Finish the signature and hand out its payload.
    ///
    /// # Errors
    ///
    /// Returns an error when the pad is empty, busy, already confirmed, or
    /// the image cannot be encoded.
    pub fn confirm(&mut self) -> Result<CapturedSignature, SignaturePadError> {
        match self.state {
            PadState::Busy => return Err(SignaturePadError::Busy),
            PadState::Confirmed => return Err(SignaturePadError::AlreadyConfirmed),
            PadState::Ready => {}
        }

        if self.is_empty() {
            return Err(SignaturePadError::Empty);
        }

        self.drawing = false;

        let strokes: Vec<Vec<Point>> = self
            .strokes
            .iter()
            .filter(|stroke| !stroke.is_empty())
            .cloned()
            .collect();

        let mut canvas = Canvas::new(self.options.width, self.options.height);

        for stroke in &strokes {
            canvas.draw_stroke(stroke, self.options.pen_width);
        }

        let png = canvas.encode_png()?;
        let svg = render_svg(&strokes, self.options);

        self.state = PadState::Confirmed;

        Ok(CapturedSignature { svg, png, strokes })
    }

    fn clamp(&self, point: Point) -> Point {
        #[expect(
            clippy::cast_precision_loss,
            reason = "canvas dimensions are small"
        )]
        let (max_x, max_y) = (self.options.width as f32, self.options.height as f32);

        Point {
            x: point.x.clamp(0.0, max_x),
            y: point.y.clamp(0.0, max_y),
        }
    }
}

/// Render strokes as an SVG document.
#[must_use]
pub fn render_svg(strokes: &[Vec<Point>], options: PadOptions) -> String {
    let PadOptions {
        width,
        height,
        pen_width,
    } = options;

    let mut svg = format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}">"#
    );

    for stroke in strokes {
        let mut points = stroke.iter();

        let Some(first) = points.next() else {
            continue;
        };

        let mut path = format!("M{:.1} {:.1}", first.x, first.y);

        if stroke.len() == 1 {
            // zero-length segment so round caps render a dot
            path.push_str(" l0.1 0");
        }

        for point in points {
            path.push_str(&format!(" L{:.1} {:.1}", point.x, point.y));
        }

        svg.push_str(&format!(
            r##"<path d="{path}" fill="none" stroke="#000" stroke-width="{pen_width}" stroke-linecap="round" stroke-linejoin="round"/>"##
        ));
    }

    svg.push_str("</svg>");

    svg
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    fn pt(x: f32, y: f32) -> Point {
        Point { x, y }
    }

    fn drawn_pad() -> Result<SignaturePad, SignaturePadError> {
        SignaturePad::from_strokes(
            PadOptions::default(),
            vec![
                vec![pt(10.0, 10.0), pt(40.0, 30.0), pt(80.0, 20.0)],
                vec![pt(100.0, 50.0)],
            ],
        )
    }

    #[test]
    fn empty_pad_cannot_be_confirmed() -> TestResult {
        let mut pad = SignaturePad::new(PadOptions::default())?;

        assert!(matches!(pad.confirm(), Err(SignaturePadError::Empty)));
        assert_eq!(pad.state(), PadState::Ready);

        Ok(())
    }

    #[test]
    fn confirm_produces_vector_and_raster() -> TestResult {
        let mut pad = drawn_pad()?;

        let signature = pad.confirm()?;

        assert!(signature.svg.starts_with("<svg"));
        assert_eq!(signature.svg.matches("<path").count(), 2);
        assert!(signature.svg.contains("M10.0 10.0 L40.0 30.0 L80.0 20.0"));
        assert!(signature.data_url().starts_with("data:image/png;base64,"));
        assert_eq!(signature.strokes.len(), 2);

        Ok(())
    }

    #[test]
    fn second_confirm_is_rejected_until_reset() -> TestResult {
        let mut pad = drawn_pad()?;

        pad.confirm()?;

        assert!(matches!(
            pad.confirm(),
            Err(SignaturePadError::AlreadyConfirmed)
        ));

        pad.reset();

        assert!(pad.confirm().is_ok());

        Ok(())
    }

    #[test]
    fn busy_pad_ignores_input_and_confirm() -> TestResult {
        let mut pad = drawn_pad()?;

        pad.set_busy(true);
        pad.pointer_down(Point { x: 1.0, y: 1.0 });

        assert_eq!(pad.strokes().len(), 2);
        assert!(matches!(pad.confirm(), Err(SignaturePadError::Busy)));

        pad.set_busy(false);

        assert_eq!(pad.state(), PadState::Ready);

        Ok(())
    }

    #[test]
    fn points_are_clamped_to_canvas() -> TestResult {
        let mut pad = SignaturePad::new(PadOptions {
            width: 100,
            height: 50,
            pen_width: 2.0,
        })?;

        pad.pointer_down(Point { x: -5.0, y: 10.0 });
        pad.pointer_move(Point { x: 500.0, y: 80.0 });
        pad.pointer_up();

        assert_eq!(
            pad.strokes(),
            &[vec![Point { x: 0.0, y: 10.0 }, Point { x: 100.0, y: 50.0 }]]
        );

        Ok(())
    }

    #[test]
    fn move_without_down_is_ignored() -> TestResult {
        let mut pad = SignaturePad::new(PadOptions::default())?;

        pad.pointer_move(Point { x: 5.0, y: 5.0 });

        assert!(pad.is_empty());

        Ok(())
    }

    #[test]
    fn undo_and_clear() -> TestResult {
        let mut pad = drawn_pad()?;

        pad.undo();
        assert_eq!(pad.strokes().len(), 1);

        pad.clear();
        assert!(pad.is_empty());

        Ok(())
    }

    #[test]
    fn zero_sized_canvas_is_rejected() {
        let result = SignaturePad::new(PadOptions {
            width: 0,
            height: 10,
            pen_width: 1.0,
        });

        assert!(matches!(
            result,
            Err(SignaturePadError::InvalidCanvas {
                width: 0,
                height: 10
            })
        ));
    }
}
