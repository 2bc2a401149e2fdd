use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::Difficulty;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum SettingsError {
    #[error("{difficulty} threshold must be in (0, 1], got {value}")]
    InvalidThreshold { difficulty: Difficulty, value: f64 },

    #[error("thresholds must increase from beginner to advanced")]
    ThresholdOrder,

    #[error("warning band must be in [0, 1), got {0}")]
    InvalidWarningBand(f64),

    #[error("{difficulty} playback rate must be in (0, 4], got {value}")]
    InvalidRate { difficulty: Difficulty, value: f32 },
}

//
// ─── SETTINGS ──────────────────────────────────────────────────────────────────
//

/// Tunables for grading and playback.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PracticeSettings {
    beginner_threshold: f64,
    intermediate_threshold: f64,
    advanced_threshold: f64,
    warning_band: f64,
    beginner_rate: f32,
    intermediate_rate: f32,
    advanced_rate: f32,
    shuffle_phrases: bool,
}

/// Unvalidated settings; unset fields fall back to the defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PracticeSettingsDraft {
    pub beginner_threshold: Option<f64>,
    pub intermediate_threshold: Option<f64>,
    pub advanced_threshold: Option<f64>,
    pub warning_band: Option<f64>,
    pub beginner_rate: Option<f32>,
    pub intermediate_rate: Option<f32>,
    pub advanced_rate: Option<f32>,
    pub shuffle_phrases: Option<bool>,
}

impl PracticeSettingsDraft {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate the draft into settings.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError` if a threshold, the warning band or a rate is out
    /// of range, or if thresholds do not increase with difficulty.
    pub fn validate(self) -> Result<PracticeSettings, SettingsError> {
        let defaults = PracticeSettings::default();

        let beginner_threshold = self.beginner_threshold.unwrap_or(defaults.beginner_threshold);
        let intermediate_threshold = self
            .intermediate_threshold
            .unwrap_or(defaults.intermediate_threshold);
        let advanced_threshold = self.advanced_threshold.unwrap_or(defaults.advanced_threshold);

        for (difficulty, value) in [
            (Difficulty::Beginner, beginner_threshold),
            (Difficulty::Intermediate, intermediate_threshold),
            (Difficulty::Advanced, advanced_threshold),
        ] {
            if !value.is_finite() || value <= 0.0 || value > 1.0 {
                return Err(SettingsError::InvalidThreshold { difficulty, value });
            }
        }
        if beginner_threshold >= intermediate_threshold
            || intermediate_threshold >= advanced_threshold
        {
            return Err(SettingsError::ThresholdOrder);
        }

        let warning_band = self.warning_band.unwrap_or(defaults.warning_band);
        if !warning_band.is_finite() || !(0.0..1.0).contains(&warning_band) {
            return Err(SettingsError::InvalidWarningBand(warning_band));
        }

        let beginner_rate = self.beginner_rate.unwrap_or(defaults.beginner_rate);
        let intermediate_rate = self.intermediate_rate.unwrap_or(defaults.intermediate_rate);
        let advanced_rate = self.advanced_rate.unwrap_or(defaults.advanced_rate);
        for (difficulty, value) in [
            (Difficulty::Beginner, beginner_rate),
            (Difficulty::Intermediate, intermediate_rate),
            (Difficulty::Advanced, advanced_rate),
        ] {
            if !value.is_finite() || value <= 0.0 || value > 4.0 {
                return Err(SettingsError::InvalidRate { difficulty, value });
            }
        }

        Ok(PracticeSettings {
            beginner_threshold,
            intermediate_threshold,
            advanced_threshold,
            warning_band,
            beginner_rate,
            intermediate_rate,
            advanced_rate,
            shuffle_phrases: self.shuffle_phrases.unwrap_or(defaults.shuffle_phrases),
        })
    }
}

impl PracticeSettings {
    /// Minimum similarity that counts as a successful attempt.
    #[must_use]
    pub fn threshold(&self, difficulty: Difficulty) -> f64 {
        match difficulty {
            Difficulty::Beginner => self.beginner_threshold,
            Difficulty::Intermediate => self.intermediate_threshold,
            Difficulty::Advanced => self.advanced_threshold,
        }
    }

    /// Width of the near-miss range just below the threshold.
    #[must_use]
    pub fn warning_band(&self) -> f64 {
        self.warning_band
    }

    /// Playback speed multiplier; slower for easier tiers.
    #[must_use]
    pub fn playback_rate(&self, difficulty: Difficulty) -> f32 {
        match difficulty {
            Difficulty::Beginner => self.beginner_rate,
            Difficulty::Intermediate => self.intermediate_rate,
            Difficulty::Advanced => self.advanced_rate,
        }
    }

    #[must_use]
    pub fn shuffle_phrases(&self) -> bool {
        self.shuffle_phrases
    }
}

impl Default for PracticeSettings {
    fn default() -> Self {
        Self {
            beginner_threshold: 0.60,
            intermediate_threshold: 0.75,
            advanced_threshold: 0.85,
            warning_band: 0.20,
            beginner_rate: 0.8,
            intermediate_rate: 0.9,
            advanced_rate: 1.0,
            shuffle_phrases: false,
        }
    }
}
