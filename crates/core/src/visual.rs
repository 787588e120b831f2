use crate::metadata::Brightness;
use anyhow::{Context, Result};
use image::imageops::FilterType;
use image::{DynamicImage, GrayImage};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_BRIGHTNESS_THRESHOLD: f64 = 100.0;
pub const DEFAULT_MAX_FACES: usize = 10;
pub const DEFAULT_FACE_DETECT_WIDTH: u32 = 800;

pub trait FaceDetector: Send + Sync {
    fn detect_faces(&self, image: &GrayImage) -> Result<usize>;
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VisualOptions {
    pub brightness_threshold: f64,
    pub max_faces: usize,
    /// Images wider than this are downscaled before face detection.
    pub face_detect_width: u32,
}

impl Default for VisualOptions {
    fn default() -> Self {
        Self {
            brightness_threshold: DEFAULT_BRIGHTNESS_THRESHOLD,
            max_faces: DEFAULT_MAX_FACES,
            face_detect_width: DEFAULT_FACE_DETECT_WIDTH,
        }
    }
}

pub fn open_image(path: &Path) -> Result<DynamicImage> {
    image::open(path).with_context(|| format!("could not decode image: {}", path.display()))
}

pub fn brightness_of(path: &Path, threshold: f64) -> Result<Brightness> {
    Ok(classify_brightness(&open_image(path)?, threshold))
}

pub fn classify_brightness(image: &DynamicImage, threshold: f64) -> Brightness {
    Brightness::classify(mean_luma(&image.to_luma8()), threshold)
}

pub fn mean_luma(gray: &GrayImage) -> f64 {
    let pixels = u64::from(gray.width()) * u64::from(gray.height());
    if pixels == 0 {
        return 0.0;
    }
    let sum: u64 = gray.pixels().map(|p| u64::from(p[0])).sum();
    sum as f64 / pixels as f64
}

pub fn face_count_of(
    path: &Path,
    detector: &dyn FaceDetector,
    options: &VisualOptions,
) -> Result<usize> {
    count_faces(&open_image(path)?, detector, options)
}

pub fn count_faces(
    image: &DynamicImage,
    detector: &dyn FaceDetector,
    options: &VisualOptions,
) -> Result<usize> {
    let gray = downscale_for_detection(image, options.face_detect_width).to_luma8();
    let faces = detector.detect_faces(&gray)?;
    Ok(faces.min(options.max_faces))
}

fn downscale_for_detection(image: &DynamicImage, max_width: u32) -> DynamicImage {
    let (width, height) = (image.width(), image.height());
    if max_width == 0 || width <= max_width {
        return image.clone();
    }
    let scale = f64::from(max_width) / f64::from(width);
    let new_height = ((f64::from(height) * scale) as u32).max(1);
    image.resize_exact(max_width, new_height, FilterType::Triangle)
}

#[cfg(test)]
mod tests {
    use super::{brightness_of, count_faces, mean_luma, FaceDetector, VisualOptions};
    use crate::metadata::Brightness;
    use anyhow::Result;
    use image::{DynamicImage, GrayImage, Luma};
    use std::sync::Mutex;
    use tempfile::tempdir;

    struct FixedDetector {
        faces: usize,
        seen: Mutex<Option<(u32, u32)>>,
    }

    impl FixedDetector {
        fn new(faces: usize) -> Self {
            Self {
                faces,
                seen: Mutex::new(None),
            }
        }
    }

    impl FaceDetector for FixedDetector {
        fn detect_faces(&self, image: &GrayImage) -> Result<usize> {
            *self.seen.lock().expect("lock") = Some(image.dimensions());
            Ok(self.faces)
        }
    }

    fn gray(width: u32, height: u32, value: u8) -> DynamicImage {
        DynamicImage::ImageLuma8(GrayImage::from_pixel(width, height, Luma([value])))
    }

    #[test]
    fn mean_luma_of_uniform_image() {
        let image = GrayImage::from_pixel(4, 4, Luma([120]));
        assert_eq!(mean_luma(&image), 120.0);
        assert_eq!(mean_luma(&GrayImage::new(0, 0)), 0.0);
    }

    #[test]
    fn brightness_of_reads_image_from_disk() {
        let temp = tempdir().expect("tempdir");
        let bright = temp.path().join("bright.png");
        let dark = temp.path().join("dark.png");
        gray(8, 8, 200).save(&bright).expect("save bright");
        gray(8, 8, 20).save(&dark).expect("save dark");

        assert_eq!(
            brightness_of(&bright, 100.0).expect("bright"),
            Brightness::Bright
        );
        assert_eq!(brightness_of(&dark, 100.0).expect("dark"), Brightness::Dark);
    }

    #[test]
    fn brightness_of_undecodable_file_is_an_error() {
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join("broken.png");
        std::fs::write(&path, b"nope").expect("write");
        assert!(brightness_of(&path, 100.0).is_err());
    }

    #[test]
    fn face_count_is_capped() {
        let detector = FixedDetector::new(42);
        let faces = count_faces(&gray(10, 10, 0), &detector, &VisualOptions::default())
            .expect("count");
        assert_eq!(faces, 10);
    }

    #[test]
    fn wide_images_are_downscaled_before_detection() {
        let detector = FixedDetector::new(2);
        let faces = count_faces(&gray(1600, 900, 0), &detector, &VisualOptions::default())
            .expect("count");
        assert_eq!(faces, 2);
        assert_eq!(*detector.seen.lock().expect("lock"), Some((800, 450)));
    }

    #[test]
    fn narrow_images_keep_their_size() {
        let detector = FixedDetector::new(0);
        count_faces(&gray(640, 480, 0), &detector, &VisualOptions::default()).expect("count");
        assert_eq!(*detector.seen.lock().expect("lock"), Some((640, 480)));
    }
}
