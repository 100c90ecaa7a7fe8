use ab_glyph::{point, Font, FontArc, GlyphId, PxScale, ScaleFont};
use image::RgbImage;

use crate::error::StripError;

/// Bold serif face embedded for the strip caption
static CAPTION_FONT: &[u8] = include_bytes!("../../assets/DejaVuSerif-Bold.ttf");

/// Measures and rasterizes the caption text
///
/// Text is positioned by its baseline, with the horizontal extent computed
/// from glyph advances plus kerning, so callers can center it the same way a
/// canvas `measureText` would.
pub struct CaptionRenderer {
    font: FontArc,
}

impl CaptionRenderer {
    pub fn new() -> Result<Self, StripError> {
        let font = FontArc::try_from_slice(CAPTION_FONT)
            .map_err(|e| StripError::CaptionFailed { reason: e.to_string() })?;
        Ok(Self { font })
    }

    /// Width of `text` in pixels at the given size
    pub fn measure(&self, text: &str, px: f32) -> f32 {
        let scaled = self.font.as_scaled(PxScale::from(px));

        let mut width = 0.0;
        let mut last: Option<GlyphId> = None;
        for ch in text.chars() {
            let id = self.font.glyph_id(ch);
            if let Some(prev) = last {
                width += scaled.kern(prev, id);
            }
            width += scaled.h_advance(id);
            last = Some(id);
        }
        width
    }

    /// Draw `text` onto the canvas with its baseline at (`origin_x`, `baseline_y`)
    pub fn draw(
        &self,
        canvas: &mut RgbImage,
        text: &str,
        px: f32,
        origin_x: f32,
        baseline_y: f32,
        color: [u8; 3],
    ) {
        let scale = PxScale::from(px);
        let scaled = self.font.as_scaled(scale);

        let mut caret = point(origin_x, baseline_y);
        let mut last: Option<GlyphId> = None;

        for ch in text.chars() {
            let id = self.font.glyph_id(ch);
            if let Some(prev) = last {
                caret.x += scaled.kern(prev, id);
            }
            let glyph = id.with_scale_and_position(scale, caret);
            caret.x += scaled.h_advance(id);
            last = Some(id);

            let Some(outlined) = self.font.outline_glyph(glyph) else {
                // Whitespace and other empty glyphs only advance the caret
                continue;
            };

            let bounds = outlined.px_bounds();
            outlined.draw(|gx, gy, coverage| {
                let x = bounds.min.x as i32 + gx as i32;
                let y = bounds.min.y as i32 + gy as i32;
                if x < 0 || y < 0 || x as u32 >= canvas.width() || y as u32 >= canvas.height() {
                    return;
                }

                let pixel = canvas.get_pixel_mut(x as u32, y as u32);
                for (channel, target) in pixel.0.iter_mut().zip(color) {
                    let blended =
                        *channel as f32 + (target as f32 - *channel as f32) * coverage.min(1.0);
                    *channel = blended.round() as u8;
                }
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn test_measure_is_positive_and_scales() {
        let renderer = CaptionRenderer::new().unwrap();

        let narrow = renderer.measure("Snapify", 40.0);
        let wide = renderer.measure("Snapify", 80.0);

        assert!(narrow > 0.0);
        assert!(wide > narrow * 1.5);
    }

    #[test]
    fn test_draw_marks_the_canvas() {
        let renderer = CaptionRenderer::new().unwrap();
        let mut canvas = RgbImage::from_pixel(600, 200, Rgb([255, 255, 255]));

        renderer.draw(&mut canvas, "Snapify", 80.0, 100.0, 150.0, [0, 0, 0]);

        let inked = canvas.pixels().filter(|p| p.0 != [255, 255, 255]).count();
        assert!(inked > 100, "expected glyph coverage, found {} inked pixels", inked);
    }

    #[test]
    fn test_draw_clips_outside_the_canvas() {
        let renderer = CaptionRenderer::new().unwrap();
        let mut canvas = RgbImage::from_pixel(50, 50, Rgb([255, 255, 255]));

        // Baseline far outside the canvas must not panic
        renderer.draw(&mut canvas, "Snapify", 80.0, -200.0, 500.0, [0, 0, 0]);
    }
}
