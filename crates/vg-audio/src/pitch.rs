use pitch_detection::detector::mcleod::McLeodDetector;
use pitch_detection::detector::PitchDetector;
use vg_core::config::PitchConfig;
use vg_core::report::{PitchCurve, PitchPoint, PitchReport, Waveform};

/// Mean-square energy below which a window is skipped outright.
///
/// Cheaper than running the detector on silence, and the detector's own
/// power threshold would reject these windows anyway.
const SILENT_WINDOW_ENERGY: f32 = 1e-4;

/// Track the fundamental frequency over the waveform.
///
/// The tracking algorithm itself is the McLeod pitch method from the
/// `pitch-detection` crate, treated as a black box; this function fixes
/// the analysis schedule (frame/hop from `config`), marks windows the
/// detector rejects as unvoiced (`f0 == 0`), and keeps every window in
/// the output so the curve has one point per hop.
///
/// A waveform shorter than one analysis window produces an empty curve.
///
/// # Example
/// ```
/// use vg_audio::pitch::analyze;
/// use vg_core::config::PitchConfig;
/// use vg_core::report::Waveform;
///
/// let wave = Waveform::new(vec![0.0; 8000], 16000);
/// let curve = analyze(&wave, &PitchConfig::default());
/// assert!(curve.points.iter().all(|p| !p.is_voiced()));
/// ```
#[must_use]
pub fn analyze(wave: &Waveform, config: &PitchConfig) -> PitchCurve {
    let size = config.frame_length;
    let hop = config.hop_length;
    let samples = &wave.samples;

    if samples.len() < size {
        return PitchCurve::default();
    }

    let mut detector = McLeodDetector::new(size, size / 2);
    let num_windows = (samples.len() - size) / hop + 1;
    let mut points = Vec::with_capacity(num_windows);

    for i in 0..num_windows {
        let start = i * hop;
        let window = &samples[start..start + size];
        let time_s = start as f32 / wave.sample_rate as f32;

        let energy: f32 = window.iter().map(|s| s * s).sum::<f32>() / size as f32;
        let f0_hz = if energy < SILENT_WINDOW_ENERGY {
            0.0
        } else {
            detector
                .get_pitch(
                    window,
                    wave.sample_rate as usize,
                    config.power_threshold,
                    config.clarity_threshold,
                )
                .map_or(0.0, |pitch| pitch.frequency)
        };

        points.push(PitchPoint { time_s, f0_hz });
    }

    PitchCurve { points }
}

/// Full pitch analysis: curve, voiced summary, and cry-band share.
///
/// `summary` is `None` when zero voiced windows exist — callers must
/// treat that as "pitch undetectable", not as an error.
#[must_use]
pub fn report(wave: &Waveform, config: &PitchConfig) -> PitchReport {
    let curve = analyze(wave, config);
    let summary = curve.summary();

    let cry_band_share = summary.map(|s| {
        let in_band = curve
            .in_range(config.cry_band_min_hz, config.cry_band_max_hz)
            .len();
        in_band as f32 / s.voiced_count as f32
    });

    PitchReport {
        curve,
        summary,
        cry_band_share,
    }
}
