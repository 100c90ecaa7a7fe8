use image::{imageops, imageops::FilterType, Rgb, RgbImage};
use reqwest::Client;
use tracing::{debug, info};

use crate::capture::Photo;
use crate::config::StripConfig;
use crate::error::StripError;
use crate::strip::caption::CaptionRenderer;
use crate::strip::handle::ImageHandle;
use crate::strip::layout::{StripLayout, PHOTOS_PER_STRIP};

const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
const CAPTION_COLOR: [u8; 3] = [0, 0, 0];

/// Renders three photos into one vertical photostrip
///
/// All three sources are loaded to fully decoded buffers before any drawing
/// happens, concurrently; a single failed load aborts the whole composite so
/// a partial strip is never produced.
pub struct StripCompositor {
    config: StripConfig,
    layout: StripLayout,
    caption: CaptionRenderer,
    http: Client,
}

impl StripCompositor {
    pub fn new(config: StripConfig) -> Result<Self, StripError> {
        let layout = StripLayout::new(&config);
        let caption = CaptionRenderer::new()?;

        Ok(Self {
            config,
            layout,
            caption,
            http: Client::new(),
        })
    }

    async fn load(&self, handle: &ImageHandle) -> Result<RgbImage, StripError> {
        debug!("Loading strip source: {}", handle.describe());

        match handle {
            ImageHandle::Photo(photo) => Ok(photo.as_image().clone()),

            ImageHandle::DataUri(uri) => Photo::from_data_uri(uri)
                .map(Photo::into_image)
                .map_err(|e| StripError::LoadFailed { reason: e.to_string() }),

            ImageHandle::Path(path) => {
                let bytes = tokio::fs::read(path).await.map_err(|e| StripError::LoadFailed {
                    reason: format!("{}: {}", path.display(), e),
                })?;
                Photo::from_bytes(&bytes)
                    .map(Photo::into_image)
                    .map_err(|e| StripError::LoadFailed { reason: e.to_string() })
            }

            ImageHandle::Url(url) => {
                let response = self
                    .http
                    .get(url)
                    .send()
                    .await
                    .map_err(|e| StripError::LoadFailed { reason: e.to_string() })?;

                if !response.status().is_success() {
                    return Err(StripError::LoadFailed {
                        reason: format!("{} returned {}", url, response.status()),
                    });
                }

                let bytes = response
                    .bytes()
                    .await
                    .map_err(|e| StripError::LoadFailed { reason: e.to_string() })?;
                Photo::from_bytes(&bytes)
                    .map(Photo::into_image)
                    .map_err(|e| StripError::LoadFailed { reason: e.to_string() })
            }
        }
    }

    /// Compose exactly three image sources into a photostrip
    pub async fn compose(&self, sources: &[ImageHandle]) -> Result<Photo, StripError> {
        if sources.len() != PHOTOS_PER_STRIP {
            return Err(StripError::InvalidInput {
                expected: PHOTOS_PER_STRIP,
                count: sources.len(),
            });
        }

        // All loads proceed concurrently; any failure aborts the composite
        let (top, middle, bottom) = tokio::try_join!(
            self.load(&sources[0]),
            self.load(&sources[1]),
            self.load(&sources[2]),
        )?;

        let mut canvas =
            RgbImage::from_pixel(self.layout.width(), self.layout.height(), WHITE);

        for (index, source) in [top, middle, bottom].into_iter().enumerate() {
            let resized = imageops::resize(
                &source,
                self.layout.photo_width(),
                self.layout.photo_height(),
                FilterType::Triangle,
            );
            let (x, y) = self.layout.photo_position(index);
            imageops::overlay(&mut canvas, &resized, x as i64, y as i64);
        }

        let text = &self.config.caption;
        let text_width = self.caption.measure(text, self.config.caption_px);
        let text_x = (self.layout.width() as f32 - text_width) / 2.0;
        self.caption.draw(
            &mut canvas,
            text,
            self.config.caption_px,
            text_x,
            self.layout.caption_baseline_y(),
            CAPTION_COLOR,
        );

        info!("Composed {}x{} photostrip", self.layout.width(), self.layout.height());
        Ok(Photo::new(canvas))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compositor() -> StripCompositor {
        StripCompositor::new(StripConfig::default()).unwrap()
    }

    fn solid(color: [u8; 3]) -> ImageHandle {
        ImageHandle::Photo(Photo::new_filled(56, 42, color))
    }

    #[tokio::test]
    async fn test_wrong_photo_count_is_rejected() {
        let compositor = compositor();

        for count in [0, 1, 2, 4] {
            let sources: Vec<ImageHandle> = (0..count).map(|_| solid([9, 9, 9])).collect();
            let result = compositor.compose(&sources).await;
            assert!(
                matches!(result, Err(StripError::InvalidInput { count: c, .. }) if c == count),
                "count {} should be rejected",
                count
            );
        }
    }

    #[tokio::test]
    async fn test_strip_layout_and_caption() {
        let compositor = compositor();
        let sources = vec![solid([220, 30, 30]), solid([30, 220, 30]), solid([30, 30, 220])];

        let strip = compositor.compose(&sources).await.unwrap();
        assert_eq!(strip.width(), 600);
        assert_eq!(strip.height(), 1500);

        // Photos land at their fixed offsets
        assert_eq!(strip.get_pixel(300, 30), [220, 30, 30]);
        assert_eq!(strip.get_pixel(300, 470), [30, 220, 30]);
        assert_eq!(strip.get_pixel(300, 910), [30, 30, 220]);

        // Padding stays white: above, between, and beside the photos
        assert_eq!(strip.get_pixel(300, 10), [255, 255, 255]);
        assert_eq!(strip.get_pixel(300, 450), [255, 255, 255]);
        assert_eq!(strip.get_pixel(5, 30), [255, 255, 255]);

        // The caption band [1320, 1500) carries ink around its center
        let band_ink = (150..450)
            .flat_map(|x| (1380..1440).map(move |y| (x, y)))
            .filter(|&(x, y)| strip.get_pixel(x, y) != [255, 255, 255])
            .count();
        assert!(band_ink > 50, "expected caption ink in the band, found {}", band_ink);

        // Nothing below the photos but the caption: corners stay white
        assert_eq!(strip.get_pixel(5, 1495), [255, 255, 255]);
        assert_eq!(strip.get_pixel(595, 1325), [255, 255, 255]);
    }

    #[tokio::test]
    async fn test_caption_ink_flanks_the_strip_center() {
        let compositor = compositor();
        let sources = vec![solid([9, 9, 9]), solid([9, 9, 9]), solid([9, 9, 9])];

        let strip = compositor.compose(&sources).await.unwrap();

        // Centering "Snapify" puts the inter-letter gap between 'a' and 'p'
        // on the exact center column, so that one column can stay white.
        // Lowercase glyph bodies must carry ink within 50px on both sides of
        // (300, 1400).
        let ink = |xs: std::ops::Range<u32>| {
            xs.flat_map(|x| (1390..1410).map(move |y| (x, y)))
                .filter(|&(x, y)| strip.get_pixel(x, y) != [255, 255, 255])
                .count()
        };
        assert!(ink(250..300) > 0, "no caption ink left of center");
        assert!(ink(301..351) > 0, "no caption ink right of center");
    }

    #[tokio::test]
    async fn test_any_failed_load_aborts_the_composite() {
        let compositor = compositor();
        let sources = vec![
            solid([1, 1, 1]),
            ImageHandle::Path("/definitely/not/here.png".into()),
            solid([2, 2, 2]),
        ];

        let result = compositor.compose(&sources).await;
        assert!(matches!(result, Err(StripError::LoadFailed { .. })));
    }

    #[tokio::test]
    async fn test_data_uri_source_composes() {
        let compositor = compositor();
        let uri = Photo::new_filled(10, 10, [80, 80, 80]).to_data_uri().unwrap();
        let sources = vec![
            ImageHandle::DataUri(uri),
            solid([90, 90, 90]),
            solid([100, 100, 100]),
        ];

        let strip = compositor.compose(&sources).await.unwrap();
        assert_eq!(strip.get_pixel(300, 30), [80, 80, 80]);
    }
}
