use crate::exif_reader::read_capture_date;
use crate::visual::{classify_brightness, count_faces, open_image, FaceDetector, VisualOptions};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

pub trait NameSuggester: Send + Sync {
    fn suggest(&self, path: &Path) -> Option<String>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ExifSuggester;

impl NameSuggester for ExifSuggester {
    fn suggest(&self, path: &Path) -> Option<String> {
        match read_capture_date(path) {
            Ok(date) => date.map(|d| d.to_string()),
            Err(err) => {
                debug!(
                    path = %path.display(),
                    error = %format!("{err:#}"),
                    "no EXIF suggestion"
                );
                None
            }
        }
    }
}

#[derive(Default)]
pub struct VisualSuggester {
    options: VisualOptions,
    detector: Option<Box<dyn FaceDetector>>,
}

impl VisualSuggester {
    pub fn new(options: VisualOptions) -> Self {
        Self {
            options,
            detector: None,
        }
    }

    pub fn with_face_detector(mut self, detector: Box<dyn FaceDetector>) -> Self {
        self.detector = Some(detector);
        self
    }
}

impl NameSuggester for VisualSuggester {
    fn suggest(&self, path: &Path) -> Option<String> {
        let image = match open_image(path) {
            Ok(image) => image,
            Err(err) => {
                debug!(
                    path = %path.display(),
                    error = %format!("{err:#}"),
                    "no visual suggestion"
                );
                return None;
            }
        };

        let mut name = classify_brightness(&image, self.options.brightness_threshold).to_string();

        if let Some(detector) = self.detector.as_deref() {
            match count_faces(&image, detector, &self.options) {
                Ok(0) => {}
                Ok(1) => name.push_str("_1_Face"),
                Ok(n) => name.push_str(&format!("_{n}_Faces")),
                Err(err) => {
                    debug!(
                        path = %path.display(),
                        error = %format!("{err:#}"),
                        "face detection failed"
                    );
                }
            }
        }

        Some(name)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoSuggester;

impl NameSuggester for NoSuggester {
    fn suggest(&self, _path: &Path) -> Option<String> {
        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggesterKind {
    #[default]
    Exif,
    Visual,
    None,
}

impl SuggesterKind {
    pub fn build(self, options: VisualOptions) -> Box<dyn NameSuggester> {
        match self {
            Self::Exif => Box::new(ExifSuggester),
            Self::Visual => Box::new(VisualSuggester::new(options)),
            Self::None => Box::new(NoSuggester),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    pub path: PathBuf,
    pub name: Option<String>,
}

pub fn suggest_many(suggester: &dyn NameSuggester, paths: &[PathBuf]) -> Vec<Suggestion> {
    paths
        .par_iter()
        .map(|path| Suggestion {
            path: path.clone(),
            name: suggester.suggest(path),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{
        suggest_many, ExifSuggester, NameSuggester, NoSuggester, SuggesterKind, VisualSuggester,
    };
    use crate::visual::{FaceDetector, VisualOptions};
    use anyhow::{bail, Result};
    use image::{DynamicImage, GrayImage, Luma};
    use std::fs;
    use std::path::{Path, PathBuf};
    use tempfile::tempdir;

    struct Fixed(usize);

    impl FaceDetector for Fixed {
        fn detect_faces(&self, _image: &GrayImage) -> Result<usize> {
            Ok(self.0)
        }
    }

    struct Broken;

    impl FaceDetector for Broken {
        fn detect_faces(&self, _image: &GrayImage) -> Result<usize> {
            bail!("model not loaded")
        }
    }

    fn write_gray_png(dir: &Path, name: &str, value: u8) -> PathBuf {
        let path = dir.join(name);
        DynamicImage::ImageLuma8(GrayImage::from_pixel(16, 16, Luma([value])))
            .save(&path)
            .expect("save png");
        path
    }

    #[test]
    fn none_suggests_nothing() {
        assert_eq!(NoSuggester.suggest(Path::new("whatever.jpg")), None);
    }

    #[test]
    fn exif_suggester_swallows_errors() {
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join("plain.jpg");
        fs::write(&path, b"no exif here").expect("write");

        assert_eq!(ExifSuggester.suggest(&path), None);
        assert_eq!(ExifSuggester.suggest(&temp.path().join("missing.jpg")), None);
    }

    #[test]
    fn visual_suggester_reports_brightness() {
        let temp = tempdir().expect("tempdir");
        let bright = write_gray_png(temp.path(), "bright.png", 230);
        let dark = write_gray_png(temp.path(), "dark.png", 10);

        let suggester = VisualSuggester::new(VisualOptions::default());
        assert_eq!(suggester.suggest(&bright).as_deref(), Some("Bright"));
        assert_eq!(suggester.suggest(&dark).as_deref(), Some("Dark"));
    }

    #[test]
    fn visual_suggester_appends_face_count() {
        let temp = tempdir().expect("tempdir");
        let path = write_gray_png(temp.path(), "group.png", 10);

        let many = VisualSuggester::new(VisualOptions::default())
            .with_face_detector(Box::new(Fixed(3)));
        assert_eq!(many.suggest(&path).as_deref(), Some("Dark_3_Faces"));

        let one = VisualSuggester::new(VisualOptions::default())
            .with_face_detector(Box::new(Fixed(1)));
        assert_eq!(one.suggest(&path).as_deref(), Some("Dark_1_Face"));

        let none = VisualSuggester::new(VisualOptions::default())
            .with_face_detector(Box::new(Fixed(0)));
        assert_eq!(none.suggest(&path).as_deref(), Some("Dark"));
    }

    #[test]
    fn failing_face_detector_still_yields_brightness() {
        let temp = tempdir().expect("tempdir");
        let path = write_gray_png(temp.path(), "x.png", 200);

        let suggester =
            VisualSuggester::new(VisualOptions::default()).with_face_detector(Box::new(Broken));
        assert_eq!(suggester.suggest(&path).as_deref(), Some("Bright"));
    }

    #[test]
    fn visual_suggester_on_non_image_is_none() {
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join("notes.txt");
        fs::write(&path, b"hello").expect("write");

        assert_eq!(VisualSuggester::default().suggest(&path), None);
    }

    #[test]
    fn suggest_many_keeps_input_order() {
        let temp = tempdir().expect("tempdir");
        let paths: Vec<PathBuf> = (0..8)
            .map(|n| {
                let value = if n % 2 == 0 { 250 } else { 5 };
                write_gray_png(temp.path(), &format!("{n}.png"), value)
            })
            .collect();

        let suggester = SuggesterKind::Visual.build(VisualOptions::default());
        let suggestions = suggest_many(suggester.as_ref(), &paths);

        assert_eq!(suggestions.len(), paths.len());
        for (n, suggestion) in suggestions.iter().enumerate() {
            assert_eq!(suggestion.path, paths[n]);
            let expected = if n % 2 == 0 { "Bright" } else { "Dark" };
            assert_eq!(suggestion.name.as_deref(), Some(expected));
        }
    }
}
