//! Scaling of minutely precipitation into chart bars.

use crate::model::MinutelyPrecipitationPoint;

/// Linear bar scale clamped to `[min_height, max_height]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarScale {
    pub factor: f64,
    pub min_height: f64,
    pub max_height: f64,
}

impl Default for BarScale {
    fn default() -> Self {
        Self { factor: 12.0, min_height: 4.0, max_height: 70.0 }
    }
}

impl BarScale {
    pub fn height(&self, intensity_mm_h: f64) -> f64 {
        let intensity = if intensity_mm_h.is_finite() { intensity_mm_h.max(0.0) } else { 0.0 };
        (intensity * self.factor).min(self.max_height).max(self.min_height)
    }

    /// Intensity at and above which bars are capped.
    pub fn saturation_intensity(&self) -> f64 {
        self.max_height / self.factor
    }
}

/// Colour band of a bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntensityTier {
    Light,
    Moderate,
    Heavy,
}

impl IntensityTier {
    pub fn from_intensity(intensity_mm_h: f64) -> Self {
        if intensity_mm_h <= 0.0 {
            IntensityTier::Light
        } else if intensity_mm_h < 1.0 {
            IntensityTier::Moderate
        } else {
            IntensityTier::Heavy
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            IntensityTier::Light => "Light",
            IntensityTier::Moderate => "Moderate",
            IntensityTier::Heavy => "Heavy",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            IntensityTier::Light => "#B3E5FC",
            IntensityTier::Moderate => "#4FC3F7",
            IntensityTier::Heavy => "#0288D1",
        }
    }

    pub const fn all() -> &'static [IntensityTier] {
        &[IntensityTier::Light, IntensityTier::Moderate, IntensityTier::Heavy]
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bar {
    pub height: f64,
    pub tier: IntensityTier,
}

pub fn bars(points: &[MinutelyPrecipitationPoint], scale: &BarScale) -> Vec<Bar> {
    points
        .iter()
        .map(|p| Bar {
            height: scale.height(p.precipitation_mm_h),
            tier: IntensityTier::from_intensity(p.precipitation_mm_h),
        })
        .collect()
}

/// Peak intensity over the window, `None` when there is no data.
pub fn max_intensity(points: &[MinutelyPrecipitationPoint]) -> Option<f64> {
    points.iter().map(|p| p.precipitation_mm_h).reduce(f64::max)
}
