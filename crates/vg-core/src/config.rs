use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Configuration complète de l'analyse.
///
/// Sérialisable en TOML. Chaque champ a une valeur par défaut saine ;
/// un fichier partiel est fusionné avec les défauts. There is no
/// process-wide mutable default: the configuration is passed explicitly
/// into each analyzer call.
///
/// # Example
/// ```
/// use vg_core::config::AnalysisConfig;
/// let config = AnalysisConfig::default();
/// assert_eq!(config.energy.frame_length, 2048);
/// assert!((config.energy.threshold_db - -30.0).abs() < f32::EPSILON);
/// ```
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Short-time RMS energy and cry/silence classification.
    pub energy: EnergyConfig,
    /// Fundamental frequency tracking.
    pub pitch: PitchConfig,
    /// Jitter/shimmer estimation.
    pub perturbation: PerturbationConfig,
    /// Time-frequency representation.
    pub spectrogram: SpectrogramConfig,
    /// Zero-crossing rate.
    pub zcr: ZcrConfig,
}

/// Frame energy analyzer parameters (spectrogram-style framing).
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct EnergyConfig {
    /// Window size in samples.
    pub frame_length: usize,
    /// Advance between consecutive frames, in samples.
    pub hop_length: usize,
    /// Cry/silence decision threshold in dB. UI convention: [-60, 0].
    pub threshold_db: f32,
    /// Linear RMS threshold for the simple "any cry present?" check.
    pub presence_threshold: f32,
}

impl Default for EnergyConfig {
    fn default() -> Self {
        Self {
            frame_length: 2048,
            hop_length: 512,
            threshold_db: -30.0,
            presence_threshold: 0.02,
        }
    }
}

/// Pitch tracker parameters.
///
/// The tracker itself is an external capability (McLeod pitch method);
/// these parameters fix its analysis schedule and the display filter.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct PitchConfig {
    /// Analysis window in samples.
    pub frame_length: usize,
    /// Advance between consecutive windows, in samples.
    pub hop_length: usize,
    /// Minimum in-window power for a window to be considered voiced.
    pub power_threshold: f32,
    /// Minimum clarity (periodicity confidence) of a pitch estimate.
    pub clarity_threshold: f32,
    /// Lower bound of the display/outlier filter, in Hz.
    pub display_min_hz: f32,
    /// Upper bound of the display/outlier filter, in Hz.
    pub display_max_hz: f32,
    /// Lower bound of the typical infant-cry band, in Hz.
    pub cry_band_min_hz: f32,
    /// Upper bound of the typical infant-cry band, in Hz.
    pub cry_band_max_hz: f32,
}

impl Default for PitchConfig {
    fn default() -> Self {
        Self {
            frame_length: 2048,
            hop_length: 512,
            power_threshold: 0.15,
            clarity_threshold: 0.6,
            display_min_hz: 200.0,
            display_max_hz: 1000.0,
            cry_band_min_hz: 250.0,
            cry_band_max_hz: 600.0,
        }
    }
}

/// Jitter/shimmer estimation parameters.
///
/// The fixed defaults reproduce the reference operating point of the
/// periodic point-process extraction (75–500 Hz, whole sound, period
/// floor/ceiling 0.0001/0.02 s, max period factor 1.3, max amplitude
/// factor 1.6) and must not drift: output comparability across runs and
/// across tools depends on them.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct PerturbationConfig {
    /// Pitch floor for the point-process extraction, in Hz.
    pub pitch_floor_hz: f32,
    /// Pitch ceiling for the point-process extraction, in Hz.
    pub pitch_ceiling_hz: f32,
    /// Shortest accepted period, in seconds.
    pub period_floor_s: f32,
    /// Longest accepted period, in seconds.
    pub period_ceiling_s: f32,
    /// Maximum ratio between consecutive periods for the pair to count.
    pub max_period_factor: f32,
    /// Maximum ratio between consecutive amplitudes for the pair to count.
    pub max_amplitude_factor: f32,
}

impl Default for PerturbationConfig {
    fn default() -> Self {
        Self {
            pitch_floor_hz: 75.0,
            pitch_ceiling_hz: 500.0,
            period_floor_s: 0.0001,
            period_ceiling_s: 0.02,
            max_period_factor: 1.3,
            max_amplitude_factor: 1.6,
        }
    }
}

/// Spectrogram parameters.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct SpectrogramConfig {
    /// Analysis window length in seconds.
    pub window_length_s: f32,
    /// Highest frequency kept in the matrix, in Hz.
    pub max_freq_hz: f32,
    /// Cell budget for the decimated presentation view.
    pub view_budget: usize,
}

impl Default for SpectrogramConfig {
    fn default() -> Self {
        Self {
            window_length_s: 0.025,
            max_freq_hz: 5000.0,
            view_budget: 200_000,
        }
    }
}

/// Zero-crossing rate parameters.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct ZcrConfig {
    /// Window size in samples.
    pub frame_length: usize,
    /// Advance between consecutive frames, in samples.
    pub hop_length: usize,
}

impl Default for ZcrConfig {
    fn default() -> Self {
        Self {
            frame_length: 2048,
            hop_length: 512,
        }
    }
}

/// Charge un fichier TOML et fusionne avec les valeurs par défaut.
///
/// # Errors
/// Returns an error if the file cannot be read or parsed.
///
/// # Example
/// ```no_run
/// use vg_core::config::load_config;
/// use std::path::Path;
/// let config = load_config(Path::new("config/default.toml")).unwrap();
/// ```
pub fn load_config(path: &Path) -> Result<AnalysisConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Impossible de lire {}", path.display()))?;

    let config: AnalysisConfig = toml::from_str(&content)
        .with_context(|| format!("Erreur de parsing TOML dans {}", path.display()))?;

    config.validate()?;
    Ok(config)
}

impl AnalysisConfig {
    /// Reject degenerate framing or inverted ranges early, before any
    /// analyzer divides by them.
    ///
    /// # Errors
    /// Returns `AnalysisError::Config` (wrapped in anyhow) on the first
    /// invalid field found.
    pub fn validate(&self) -> Result<()> {
        use crate::error::AnalysisError;

        let fail = |msg: String| -> Result<()> { Err(AnalysisError::Config(msg).into()) };

        if self.energy.frame_length == 0 || self.energy.hop_length == 0 {
            return fail("energy.frame_length et energy.hop_length doivent être > 0".into());
        }
        if self.zcr.frame_length == 0 || self.zcr.hop_length == 0 {
            return fail("zcr.frame_length et zcr.hop_length doivent être > 0".into());
        }
        if self.pitch.frame_length == 0 || self.pitch.hop_length == 0 {
            return fail("pitch.frame_length et pitch.hop_length doivent être > 0".into());
        }
        if self.pitch.display_min_hz >= self.pitch.display_max_hz {
            return fail(format!(
                "plage F0 inversée : {} >= {}",
                self.pitch.display_min_hz, self.pitch.display_max_hz
            ));
        }
        if self.perturbation.pitch_floor_hz >= self.perturbation.pitch_ceiling_hz {
            return fail(format!(
                "plage de pitch inversée : {} >= {}",
                self.perturbation.pitch_floor_hz, self.perturbation.pitch_ceiling_hz
            ));
        }
        if self.spectrogram.window_length_s <= 0.0 || self.spectrogram.max_freq_hz <= 0.0 {
            return fail("spectrogram.window_length_s et max_freq_hz doivent être > 0".into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        AnalysisConfig::default().validate().unwrap();
    }

    #[test]
    fn partial_toml_merges_with_defaults() {
        let config: AnalysisConfig =
            toml::from_str("[energy]\nthreshold_db = -25.0\n").unwrap();
        assert!((config.energy.threshold_db - -25.0).abs() < f32::EPSILON);
        // Untouched sections and fields keep their defaults
        assert_eq!(config.energy.frame_length, 2048);
        assert!((config.spectrogram.max_freq_hz - 5000.0).abs() < f32::EPSILON);
    }

    #[test]
    fn inverted_pitch_range_rejected() {
        let config: AnalysisConfig =
            toml::from_str("[pitch]\ndisplay_min_hz = 900.0\ndisplay_max_hz = 300.0\n").unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn roundtrips_through_toml() {
        let config = AnalysisConfig::default();
        let text = toml::to_string(&config).unwrap();
        let back: AnalysisConfig = toml::from_str(&text).unwrap();
        assert_eq!(back.energy.hop_length, config.energy.hop_length);
        assert!((back.perturbation.max_period_factor - 1.3).abs() < f32::EPSILON);
    }
}
