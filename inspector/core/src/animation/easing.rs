//! Easing Functions
//!
//! Frame-rate independent progress curves for animations.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::style::StyleParseError;

/// Easing functions for smooth animation
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum EasingFunction {
    /// No easing (constant speed)
    #[serde(rename = "linear")]
    Linear,

    /// Cubic ease out
    #[serde(rename = "cubic")]
    EaseOutCubic,

    /// Quartic ease out: `1 - (1 - t)^4`
    #[default]
    #[serde(rename = "quart")]
    EaseOutQuart,
}

impl EasingFunction {
    /// Every curve
    pub const ALL: [Self; 3] = [Self::Linear, Self::EaseOutCubic, Self::EaseOutQuart];

    /// Config name
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::EaseOutCubic => "cubic",
            Self::EaseOutQuart => "quart",
        }
    }

    /// Apply the easing function to a progress value (0.0 to 1.0)
    #[must_use]
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);

        match self {
            Self::Linear => t,
            Self::EaseOutCubic => 1.0 - (1.0 - t).powi(3),
            Self::EaseOutQuart => 1.0 - (1.0 - t).powi(4),
        }
    }
}

impl fmt::Display for EasingFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EasingFunction {
    type Err = StyleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|easing| easing.as_str() == wanted)
            .ok_or_else(|| StyleParseError {
                kind: "easing",
                value: s.to_string(),
            })
    }
}
