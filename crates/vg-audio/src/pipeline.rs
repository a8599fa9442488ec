use std::path::Path;

use anyhow::Result;
use vg_core::report::{AnalysisReport, EnergyReport, Outcome, Waveform};
use vg_core::{AnalysisConfig, AnalysisError};

use crate::{decode, energy, perturbation, pitch, segment, spectrogram, zcr};

/// Run the full analysis pipeline over a decoded waveform.
///
/// The waveform is immutable and every analyzer is a pure function of
/// it plus its own configuration, so the four independent feature
/// analyzers run concurrently. Each analyzer fails independently: a
/// failure surfaces as `Outcome::Undetermined` plus a warning and never
/// aborts the others. No retries — the computations are deterministic.
///
/// # Errors
/// Returns `AnalysisError::EmptyAudio` for a zero-length signal; this
/// is the only fatal condition past decoding.
///
/// # Example
/// ```
/// use vg_audio::pipeline::analyze;
/// use vg_core::{AnalysisConfig, Waveform};
///
/// let wave = Waveform::new(vec![0.0; 16000], 16000);
/// let report = analyze(&wave, &AnalysisConfig::default()).unwrap();
/// assert!(report.energy.is_determined());
/// ```
pub fn analyze(wave: &Waveform, config: &AnalysisConfig) -> Result<AnalysisReport, AnalysisError> {
    let stats = wave.stats()?;

    let run_energy = || {
        let profile = energy::analyze(wave, &config.energy);
        let mask = energy::classify(&profile, config.energy.threshold_db);
        let totals = energy::totals(&profile, &mask, wave.duration_s());
        let segments = segment::extract(&mask, &profile.times());
        let cry_detected = energy::cry_detected(&profile, config.energy.presence_threshold);
        EnergyReport {
            profile,
            mask,
            totals,
            segments,
            cry_detected,
            threshold_db: config.energy.threshold_db,
        }
    };

    let ((energy_report, pitch_report), (perturbation_result, (spec, zcr_series))) = rayon::join(
        || rayon::join(run_energy, || pitch::report(wave, &config.pitch)),
        || {
            rayon::join(
                || perturbation::analyze(wave, &config.perturbation),
                || {
                    rayon::join(
                        || spectrogram::compute(wave, &config.spectrogram),
                        || zcr::analyze(wave, &config.zcr),
                    )
                },
            )
        },
    );

    let mut warnings = Vec::new();

    if pitch_report.summary.is_none() {
        let reason = AnalysisError::PitchUndetectable.to_string();
        log::warn!("{reason}");
        warnings.push(reason);
    }

    let perturbation_outcome: Outcome<_> = perturbation_result.into();
    if let Outcome::Undetermined { reason } = &perturbation_outcome {
        log::warn!("Perturbation : {reason}");
        warnings.push(reason.clone());
    }

    Ok(AnalysisReport {
        stats,
        energy: Outcome::determined(energy_report),
        pitch: Outcome::determined(pitch_report),
        perturbation: perturbation_outcome,
        spectrogram: Outcome::determined(spec),
        zcr: Outcome::determined(zcr_series),
        warnings,
    })
}

/// Decode uploaded bytes, then analyze.
///
/// # Errors
/// Returns `Decode` for unreadable bytes and `EmptyAudio` for a
/// zero-length signal.
pub fn analyze_bytes(
    bytes: &[u8],
    ext: Option<&str>,
    config: &AnalysisConfig,
) -> Result<AnalysisReport, AnalysisError> {
    let wave = decode::decode_bytes(bytes, ext)?;
    analyze(&wave, config)
}

/// Decode an audio file, then analyze.
///
/// # Errors
/// Returns an error if the file cannot be opened, decoded, or holds an
/// empty signal.
pub fn analyze_file(path: impl AsRef<Path>, config: &AnalysisConfig) -> Result<AnalysisReport> {
    let wave = decode::decode_file(path)?;
    Ok(analyze(&wave, config)?)
}
