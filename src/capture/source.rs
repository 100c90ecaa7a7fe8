use std::path::{Path, PathBuf};

use rand::{rngs::SmallRng, Rng, SeedableRng};
use tracing::{debug, info, warn};

use crate::capture::photo::Photo;
use crate::error::{CaptureError, Result};

/// A live video feed reduced to its one imperative operation: capture now.
///
/// Returns `None` when no frame is available. Callers treat a miss as a
/// skipped cycle, never a fatal error.
pub trait FrameSource: Send {
    fn capture_frame(&mut self) -> Option<Photo>;
}

/// Frame source backed by a directory of still images
///
/// Files are ordered by name and handed out one per capture, cycling back to
/// the first once exhausted. This is the stand-in webcam for headless runs.
pub struct DirectorySource {
    frames: Vec<PathBuf>,
    next: usize,
}

impl DirectorySource {
    pub fn new<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref();

        let entries = std::fs::read_dir(dir).map_err(|_| CaptureError::SourceUnavailable {
            path: dir.display().to_string(),
        })?;

        let mut frames: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| Self::is_image_file(path))
            .collect();
        frames.sort();

        if frames.is_empty() {
            return Err(CaptureError::NoFramesFound {
                path: dir.display().to_string(),
            }
            .into());
        }

        info!("Frame source ready: {} stills from {:?}", frames.len(), dir);

        Ok(Self { frames, next: 0 })
    }

    fn is_image_file(path: &Path) -> bool {
        matches!(
            path.extension().and_then(|e| e.to_str()),
            Some("jpg") | Some("jpeg") | Some("png") | Some("bmp")
        )
    }
}

impl FrameSource for DirectorySource {
    fn capture_frame(&mut self) -> Option<Photo> {
        let path = &self.frames[self.next];
        self.next = (self.next + 1) % self.frames.len();

        match image::open(path) {
            Ok(image) => {
                debug!("Captured frame from {:?}", path);
                Some(Photo::new(image.to_rgb8()))
            }
            Err(e) => {
                // A bad file is a missed frame, not a fatal error
                warn!("Skipping unreadable frame {:?}: {}", path, e);
                None
            }
        }
    }
}

/// Synthetic frame source producing hue-shifted test pattern frames
///
/// Each capture advances the hue and sprinkles a little noise so consecutive
/// frames are visibly distinct.
pub struct TestPatternSource {
    width: u32,
    height: u32,
    counter: u64,
    rng: SmallRng,
}

impl TestPatternSource {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            counter: 0,
            rng: SmallRng::seed_from_u64(0x534e4150),
        }
    }

    fn hsv_to_rgb(h: f32, s: f32, v: f32) -> [u8; 3] {
        let c = v * s;
        let x = c * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());
        let m = v - c;

        let (r, g, b) = match h as u32 {
            0..=59 => (c, x, 0.0),
            60..=119 => (x, c, 0.0),
            120..=179 => (0.0, c, x),
            180..=239 => (0.0, x, c),
            240..=299 => (x, 0.0, c),
            _ => (c, 0.0, x),
        };

        [
            ((r + m) * 255.0) as u8,
            ((g + m) * 255.0) as u8,
            ((b + m) * 255.0) as u8,
        ]
    }
}

impl FrameSource for TestPatternSource {
    fn capture_frame(&mut self) -> Option<Photo> {
        let hue = ((self.counter * 47) % 360) as f32;
        self.counter += 1;

        let base = Self::hsv_to_rgb(hue, 0.6, 0.8);
        let mut photo = Photo::new_filled(self.width, self.height, base);

        for pixel in photo.as_image_mut().pixels_mut() {
            let noise: i16 = self.rng.gen_range(-12..=12);
            for channel in pixel.0.iter_mut() {
                *channel = (*channel as i16 + noise).clamp(0, 255) as u8;
            }
        }

        Some(photo)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_empty_directory_rejected() {
        let dir = tempdir().unwrap();
        assert!(DirectorySource::new(dir.path()).is_err());
    }

    #[test]
    fn test_directory_source_cycles_in_name_order() {
        let dir = tempdir().unwrap();
        Photo::new_filled(4, 4, [10, 0, 0]).save_png(dir.path().join("a.png")).unwrap();
        Photo::new_filled(4, 4, [20, 0, 0]).save_png(dir.path().join("b.png")).unwrap();

        let mut source = DirectorySource::new(dir.path()).unwrap();
        let first = source.capture_frame().unwrap();
        let second = source.capture_frame().unwrap();
        let third = source.capture_frame().unwrap();

        assert_eq!(first.get_pixel(0, 0), [10, 0, 0]);
        assert_eq!(second.get_pixel(0, 0), [20, 0, 0]);
        assert_eq!(third.get_pixel(0, 0), [10, 0, 0]);
    }

    #[test]
    fn test_unreadable_frame_is_a_miss() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("bad.png"), b"definitely not a png").unwrap();

        let mut source = DirectorySource::new(dir.path()).unwrap();
        assert!(source.capture_frame().is_none());
    }

    #[test]
    fn test_test_pattern_always_produces_frames() {
        let mut source = TestPatternSource::new(32, 24);
        for _ in 0..5 {
            let photo = source.capture_frame().unwrap();
            assert_eq!(photo.width(), 32);
            assert_eq!(photo.height(), 24);
        }
    }
}
