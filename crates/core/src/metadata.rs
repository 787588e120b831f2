use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureDate {
    pub year: i32,
    pub month: String,
}

impl fmt::Display for CaptureDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.year, self.month)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Brightness {
    Bright,
    Dark,
}

impl Brightness {
    /// `mean_luma` is the average 8-bit grayscale value of the image.
    pub fn classify(mean_luma: f64, threshold: f64) -> Self {
        if mean_luma > threshold {
            Self::Bright
        } else {
            Self::Dark
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Bright => "Bright",
            Self::Dark => "Dark",
        }
    }
}

impl fmt::Display for Brightness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::{Brightness, CaptureDate};

    #[test]
    fn classify_uses_strict_threshold() {
        assert_eq!(Brightness::classify(100.5, 100.0), Brightness::Bright);
        assert_eq!(Brightness::classify(100.0, 100.0), Brightness::Dark);
        assert_eq!(Brightness::classify(3.0, 100.0), Brightness::Dark);
    }

    #[test]
    fn capture_date_displays_year_then_month() {
        let date = CaptureDate {
            year: 2023,
            month: "Jul".to_string(),
        };
        assert_eq!(date.to_string(), "2023_Jul");
    }
}
