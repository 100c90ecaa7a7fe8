use crate::config::StripConfig;

/// A photostrip always stacks exactly three photos
pub const PHOTOS_PER_STRIP: usize = 3;

/// Fixed pixel geometry of the photostrip
///
/// Derived from [`StripConfig`]; with the defaults this is the 600x1500
/// canvas with photos at y = 20, 460, 900 and the caption band below 1320.
#[derive(Debug, Clone)]
pub struct StripLayout {
    width: u32,
    height: u32,
    photo_x: u32,
    photo_width: u32,
    photo_height: u32,
    padding: u32,
    caption_offset: u32,
}

impl StripLayout {
    pub fn new(config: &StripConfig) -> Self {
        Self {
            width: config.width,
            height: config.height,
            photo_x: config.photo_x,
            photo_width: config.photo_width,
            photo_height: config.photo_height,
            padding: config.padding,
            caption_offset: config.caption_offset,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn photo_width(&self) -> u32 {
        self.photo_width
    }

    pub fn photo_height(&self) -> u32 {
        self.photo_height
    }

    /// Top-left corner of photo `index` (0-based, top to bottom)
    pub fn photo_position(&self, index: usize) -> (u32, u32) {
        let y = self.padding + index as u32 * (self.photo_height + self.padding);
        (self.photo_x, y)
    }

    /// Bottom edge of the last photo
    pub fn photos_bottom(&self) -> u32 {
        self.padding + PHOTOS_PER_STRIP as u32 * (self.photo_height + self.padding) - self.padding
    }

    /// Height of the caption band below the photos
    pub fn caption_band_height(&self) -> u32 {
        self.height - self.photos_bottom()
    }

    /// Caption baseline: vertically centered in the band, nudged down by the
    /// configured offset
    pub fn caption_baseline_y(&self) -> f32 {
        (self.photos_bottom() + self.caption_band_height() / 2 + self.caption_offset) as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout() -> StripLayout {
        StripLayout::new(&StripConfig::default())
    }

    #[test]
    fn test_photo_positions() {
        let layout = layout();
        assert_eq!(layout.photo_position(0), (20, 20));
        assert_eq!(layout.photo_position(1), (20, 460));
        assert_eq!(layout.photo_position(2), (20, 900));
    }

    #[test]
    fn test_caption_band() {
        let layout = layout();
        assert_eq!(layout.photos_bottom(), 1320);
        assert_eq!(layout.caption_band_height(), 180);
        assert_eq!(layout.caption_baseline_y(), 1430.0);
    }
}
