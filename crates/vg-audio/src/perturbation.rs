use pitch_detection::detector::mcleod::McLeodDetector;
use pitch_detection::detector::PitchDetector;
use vg_core::config::PerturbationConfig;
use vg_core::report::{PerturbationMetrics, Waveform};
use vg_core::AnalysisError;

/// Detector thresholds for the point-process pass. Stricter than the
/// display curve: a spurious period corrupts the perturbation ratios.
const POWER_THRESHOLD: f32 = 0.15;
const CLARITY_THRESHOLD: f32 = 0.7;

/// One accepted quasi-periodic cycle.
struct Cycle {
    /// Period length in seconds.
    period_s: f32,
    /// Peak amplitude over one period at the window start.
    amplitude: f32,
    /// Window index, used to detect chain breaks.
    window: usize,
}

/// Estimate jitter and shimmer from a pitch-guided periodic point process.
///
/// The waveform is tracked with the McLeod detector constrained to the
/// configured operating range (75–500 Hz by default). Each voiced
/// window contributes one period `T = 1/F0` and the peak amplitude over
/// one period at the window start; periods outside the configured
/// floor/ceiling are rejected. Jitter is the mean absolute difference
/// between consecutive periods divided by the mean period, shimmer the
/// analogous ratio over amplitudes. Pairs straddling an unvoiced gap
/// are excluded from both; the `max_period_factor` filter applies to
/// jitter pairs and `max_amplitude_factor` to shimmer pairs,
/// independently of each other.
///
/// # Errors
/// Returns `AnalysisError::InsufficientPeriods` when fewer than 2
/// usable periods exist, and `AnalysisError::UnstableCycles` when
/// periods exist but every consecutive pair was rejected by a filter.
/// Callers surface both as per-feature warnings, not fatal errors.
pub fn analyze(
    wave: &Waveform,
    config: &PerturbationConfig,
) -> Result<PerturbationMetrics, AnalysisError> {
    let cycles = extract_cycles(wave, config);
    if cycles.len() < 2 {
        return Err(AnalysisError::InsufficientPeriods {
            found: cycles.len(),
        });
    }

    let mut period_diffs = Vec::new();
    let mut amplitude_diffs = Vec::new();

    for pair in cycles.windows(2) {
        let (a, b) = (&pair[0], &pair[1]);
        // Chain break: windows were not adjacent in time.
        if b.window != a.window + 1 {
            continue;
        }

        let period_ratio = (a.period_s / b.period_s).max(b.period_s / a.period_s);
        if period_ratio <= config.max_period_factor {
            period_diffs.push((a.period_s - b.period_s).abs());
        }

        if a.amplitude > 0.0 && b.amplitude > 0.0 {
            let amp_ratio = (a.amplitude / b.amplitude).max(b.amplitude / a.amplitude);
            if amp_ratio <= config.max_amplitude_factor {
                amplitude_diffs.push((a.amplitude - b.amplitude).abs());
            }
        }
    }

    if period_diffs.is_empty() || amplitude_diffs.is_empty() {
        return Err(AnalysisError::UnstableCycles);
    }

    let mean_period = cycles.iter().map(|c| c.period_s).sum::<f32>() / cycles.len() as f32;
    let mean_amplitude = cycles.iter().map(|c| c.amplitude).sum::<f32>() / cycles.len() as f32;
    if mean_period <= 0.0 || mean_amplitude <= 0.0 {
        return Err(AnalysisError::UnstableCycles);
    }

    let jitter_local =
        period_diffs.iter().sum::<f32>() / period_diffs.len() as f32 / mean_period;
    let shimmer_local =
        amplitude_diffs.iter().sum::<f32>() / amplitude_diffs.len() as f32 / mean_amplitude;

    Ok(PerturbationMetrics {
        jitter_local,
        shimmer_local,
    })
}

/// Extract the accepted cycle sequence for the perturbation pass.
fn extract_cycles(wave: &Waveform, config: &PerturbationConfig) -> Vec<Cycle> {
    let sr = wave.sample_rate as f32;
    // The analysis window must hold at least two periods of the pitch
    // floor for the detector to resolve it.
    let min_size = (2.0 * sr / config.pitch_floor_hz).ceil() as usize;
    let size = min_size.next_power_of_two().max(2048);
    let hop = size / 4;
    let samples = &wave.samples;

    if samples.len() < size {
        return Vec::new();
    }

    let mut detector = McLeodDetector::new(size, size / 2);
    let num_windows = (samples.len() - size) / hop + 1;
    let mut cycles = Vec::new();

    for i in 0..num_windows {
        let start = i * hop;
        let window = &samples[start..start + size];

        let Some(pitch) = detector.get_pitch(
            window,
            wave.sample_rate as usize,
            POWER_THRESHOLD,
            CLARITY_THRESHOLD,
        ) else {
            continue;
        };

        let f0 = pitch.frequency;
        if f0 < config.pitch_floor_hz || f0 > config.pitch_ceiling_hz {
            continue;
        }

        let period_s = 1.0 / f0;
        if period_s < config.period_floor_s || period_s > config.period_ceiling_s {
            continue;
        }

        let period_samples = ((sr / f0).round() as usize).min(samples.len() - start);
        let amplitude = samples[start..start + period_samples]
            .iter()
            .fold(0.0f32, |m, &s| m.max(s.abs()));

        cycles.push(Cycle {
            period_s,
            amplitude,
            window: i,
        });
    }

    cycles
}
