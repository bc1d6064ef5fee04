//! "Can we go outside?" decision rule.

use serde::{Deserialize, Serialize};

use crate::model::CurrentConditions;

/// Below this (°F) a coat is required.
pub const COLD_THRESHOLD_F: f64 = 45.0;

const PRECIPITATING_KEYWORDS: &[&str] = &["rain", "drizzle", "thunderstorm"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Rain,
    Cold,
    Normal,
}

impl Verdict {
    pub fn message(&self) -> &'static str {
        match self {
            Verdict::Rain => "No, LeBron can't go out.",
            Verdict::Cold => "Yes, but LeBron must wear a coat.",
            Verdict::Normal => "Yes, LeBron can go out.",
        }
    }

    /// Asset reference for the reaction picture shown with the verdict.
    pub fn illustration(&self) -> &'static str {
        match self {
            Verdict::Rain => "assets/images/lesad.png",
            Verdict::Cold => "assets/images/lecold.jpg",
            Verdict::Normal => "assets/images/lehappy.png",
        }
    }
}

/// Rules are checked in order: precipitation, then cold, then normal.
///
/// Returns `None` when there are no conditions or the provider sent no
/// condition entry.
pub fn classify(current: Option<&CurrentConditions>) -> Option<Verdict> {
    let current = current?;
    let condition = current.condition.as_ref()?;

    let category = condition.main.to_lowercase();
    let precipitating = PRECIPITATING_KEYWORDS.iter().any(|kw| category.contains(kw))
        || current.rain_mm_h.is_some();

    if precipitating {
        Some(Verdict::Rain)
    } else if current.temperature_f.is_some_and(|t| t < COLD_THRESHOLD_F) {
        Some(Verdict::Cold)
    } else {
        Some(Verdict::Normal)
    }
}
