use vg_core::config::EnergyConfig;
use vg_core::report::{CryTotals, EnergyFrame, FrameEnergyProfile, Waveform};

/// Floor applied before `log10` to avoid -inf on silent frames.
pub const DB_EPSILON: f32 = 1e-10;

/// Convert a linear RMS value to decibels: `10 * log10(max(rms, 1e-10))`.
#[must_use]
pub fn rms_to_db(rms: f32) -> f32 {
    10.0 * rms.max(DB_EPSILON).log10()
}

/// Compute the short-time RMS energy profile of a waveform.
///
/// Frames of `frame_length` samples advance by `hop_length`; a frame
/// start exists for every hop inside the signal, and frames extending
/// past the signal end are zero-padded (the missing samples contribute
/// zero energy but the divisor stays `frame_length`). Frame timestamps
/// follow `time(i) = i * hop_length / sample_rate`.
///
/// # Example
/// ```
/// use vg_audio::energy::analyze;
/// use vg_core::config::EnergyConfig;
/// use vg_core::report::Waveform;
///
/// let wave = Waveform::new(vec![0.0; 16000], 16000);
/// let profile = analyze(&wave, &EnergyConfig::default());
/// assert_eq!(profile.frames.len(), 16000usize.div_ceil(512));
/// ```
#[must_use]
pub fn analyze(wave: &Waveform, config: &EnergyConfig) -> FrameEnergyProfile {
    let frame_length = config.frame_length;
    let hop_length = config.hop_length;
    let samples = &wave.samples;

    let num_frames = samples.len().div_ceil(hop_length);
    let mut frames = Vec::with_capacity(num_frames);

    for i in 0..num_frames {
        let start = i * hop_length;
        let end = (start + frame_length).min(samples.len());

        let sum_sq: f32 = samples[start..end].iter().map(|s| s * s).sum();
        let rms = (sum_sq / frame_length as f32).sqrt();

        frames.push(EnergyFrame {
            index: i,
            time_s: start as f32 / wave.sample_rate as f32,
            rms,
            rms_db: rms_to_db(rms),
        });
    }

    FrameEnergyProfile {
        frames,
        frame_length,
        hop_length,
        sample_rate: wave.sample_rate,
    }
}

/// Classify each frame as cry (`true`) or silence (`false`).
///
/// A frame is cry iff `rms_db > threshold_db`. The threshold is a
/// caller-supplied control; the UI convention is [-60, 0] dB but no
/// hard limit is enforced here.
#[must_use]
pub fn classify(profile: &FrameEnergyProfile, threshold_db: f32) -> Vec<bool> {
    profile
        .frames
        .iter()
        .map(|f| f.rms_db > threshold_db)
        .collect()
}

/// Aggregate cry/silence durations from a classification mask.
///
/// Cry time counts each cry frame as one hop; silence is the remainder
/// of the total duration. This is a hop-granularity approximation (see
/// `CryTotals`), kept as-is rather than corrected at the boundaries.
#[must_use]
pub fn totals(profile: &FrameEnergyProfile, mask: &[bool], duration_s: f32) -> CryTotals {
    let cry_frames = mask.iter().filter(|&&m| m).count();
    let cry_s = cry_frames as f32 * profile.hop_length as f32 / profile.sample_rate as f32;
    CryTotals {
        cry_s,
        silence_s: duration_s - cry_s,
    }
}

/// Simple presence check: is any frame's linear RMS above `threshold`?
#[must_use]
pub fn cry_detected(profile: &FrameEnergyProfile, threshold: f32) -> bool {
    profile.frames.iter().any(|f| f.rms > threshold)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    fn sine(freq: f32, amplitude: f32, sample_rate: u32, duration_s: f32) -> Waveform {
        let n = (sample_rate as f32 * duration_s) as usize;
        let samples = (0..n)
            .map(|i| amplitude * (2.0 * PI * freq * i as f32 / sample_rate as f32).sin())
            .collect();
        Waveform::new(samples, sample_rate)
    }

    #[test]
    fn sine_rms_db_constant_over_full_frames() {
        // 1s @ 16 kHz, 440 Hz, amplitude 0.5: rms = 0.5/sqrt(2)
        let wave = sine(440.0, 0.5, 16000, 1.0);
        let config = EnergyConfig::default();
        let profile = analyze(&wave, &config);

        let expected_db = rms_to_db(0.5 / 2.0f32.sqrt());
        let full_frames = profile
            .frames
            .iter()
            .filter(|f| f.index * config.hop_length + config.frame_length <= 16000);
        let mut count = 0;
        for f in full_frames {
            assert!(
                (f.rms_db - expected_db).abs() < 0.2,
                "frame {} rms_db {} != {expected_db}",
                f.index,
                f.rms_db
            );
            count += 1;
        }
        assert!(count > 20);

        // Any threshold below the constant level classifies every frame
        // as cry (zero-padded tail frames stay well above -30 dB here).
        let mask = classify(&profile, -30.0);
        assert!(mask.iter().all(|&m| m));
    }

    #[test]
    fn silence_is_floor_db_and_never_cry() {
        let wave = Waveform::new(vec![0.0; 32000], 16000);
        let profile = analyze(&wave, &EnergyConfig::default());

        for f in &profile.frames {
            assert_eq!(f.rms, 0.0);
            assert!((f.rms_db - 10.0 * DB_EPSILON.log10()).abs() < 1e-3);
        }

        let mask = classify(&profile, -60.0);
        assert!(mask.iter().all(|&m| !m));

        let t = totals(&profile, &mask, wave.duration_s());
        assert_eq!(t.cry_s, 0.0);
        assert!((t.silence_s - 2.0).abs() < 1e-6);
    }

    #[test]
    fn frame_times_follow_hop_mapping() {
        let wave = sine(200.0, 0.3, 16000, 0.5);
        let config = EnergyConfig::default();
        let profile = analyze(&wave, &config);
        for f in &profile.frames {
            let expected = f.index as f32 * config.hop_length as f32 / 16000.0;
            assert!((f.time_s - expected).abs() < 1e-6);
        }
    }

    #[test]
    fn raising_threshold_never_increases_cry_time() {
        // Half loud sine, half silence
        let mut samples = sine(440.0, 0.5, 16000, 1.0).samples;
        samples.extend(std::iter::repeat(0.0).take(16000));
        let wave = Waveform::new(samples, 16000);
        let profile = analyze(&wave, &EnergyConfig::default());

        let mut previous = f32::MAX;
        for threshold in [-60.0, -40.0, -20.0, -10.0, -2.0] {
            let mask = classify(&profile, threshold);
            let t = totals(&profile, &mask, wave.duration_s());
            assert!(
                t.cry_s <= previous,
                "cry time grew when threshold rose to {threshold}"
            );
            previous = t.cry_s;
        }
    }

    #[test]
    fn idempotent_for_same_inputs() {
        let wave = sine(350.0, 0.4, 22050, 0.7);
        let config = EnergyConfig::default();
        let a = analyze(&wave, &config);
        let b = analyze(&wave, &config);
        assert_eq!(a.frames.len(), b.frames.len());
        for (x, y) in a.frames.iter().zip(&b.frames) {
            assert_eq!(x.rms.to_bits(), y.rms.to_bits());
            assert_eq!(x.rms_db.to_bits(), y.rms_db.to_bits());
        }
    }

    #[test]
    fn presence_check_uses_linear_threshold() {
        let loud = sine(440.0, 0.5, 16000, 0.5);
        let profile = analyze(&loud, &EnergyConfig::default());
        assert!(cry_detected(&profile, 0.02));

        let quiet = sine(440.0, 0.005, 16000, 0.5);
        let profile = analyze(&quiet, &EnergyConfig::default());
        assert!(!cry_detected(&profile, 0.02));
    }
}
