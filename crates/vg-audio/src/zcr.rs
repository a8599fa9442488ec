use vg_core::config::ZcrConfig;
use vg_core::report::{Waveform, ZcrPoint};

/// Compute the zero-crossing-rate series of a waveform.
///
/// The rate of a frame is the number of adjacent sample pairs with
/// opposite sign inside the frame, divided by `frame_length`. Framing
/// and timestamps match the energy analyzer: one frame per hop,
/// trailing frames zero-padded, `time(i) = i * hop_length / sample_rate`.
///
/// # Example
/// ```
/// use vg_audio::zcr::analyze;
/// use vg_core::config::ZcrConfig;
/// use vg_core::report::Waveform;
///
/// let wave = Waveform::new(vec![0.0; 16000], 16000);
/// let series = analyze(&wave, &ZcrConfig::default());
/// assert!(series.iter().all(|p| p.rate == 0.0));
/// ```
#[must_use]
pub fn analyze(wave: &Waveform, config: &ZcrConfig) -> Vec<ZcrPoint> {
    let frame_length = config.frame_length;
    let hop_length = config.hop_length;
    let samples = &wave.samples;

    let num_frames = samples.len().div_ceil(hop_length);
    let mut points = Vec::with_capacity(num_frames);

    for i in 0..num_frames {
        let start = i * hop_length;
        let end = (start + frame_length).min(samples.len());
        let frame = &samples[start..end];

        let mut crossings = 0usize;
        for pair in frame.windows(2) {
            if (pair[0] >= 0.0) != (pair[1] >= 0.0) {
                crossings += 1;
            }
        }

        points.push(ZcrPoint {
            time_s: start as f32 / wave.sample_rate as f32,
            rate: crossings as f32 / frame_length as f32,
        });
    }

    points
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn sine_rate_matches_analytic_value() {
        // A 440 Hz sine crosses zero 2*440 times per second:
        // rate ≈ 2 * 440 / 16000 ≈ 0.055
        let sr = 16000u32;
        let samples: Vec<f32> = (0..sr as usize)
            .map(|i| 0.5 * (2.0 * PI * 440.0 * i as f32 / sr as f32).sin())
            .collect();
        let wave = Waveform::new(samples, sr);
        let config = ZcrConfig::default();
        let series = analyze(&wave, &config);

        for p in series
            .iter()
            .take((16000 - config.frame_length) / config.hop_length)
        {
            assert!(
                (p.rate - 0.055).abs() < 0.005,
                "rate {} at t={} too far from 0.055",
                p.rate,
                p.time_s
            );
        }
    }

    #[test]
    fn silence_has_zero_rate() {
        let wave = Waveform::new(vec![0.0; 8000], 16000);
        let series = analyze(&wave, &ZcrConfig::default());
        assert!(!series.is_empty());
        assert!(series.iter().all(|p| p.rate == 0.0));
    }

    #[test]
    fn timestamps_match_energy_mapping() {
        let wave = Waveform::new(vec![0.1; 6000], 12000);
        let config = ZcrConfig::default();
        let series = analyze(&wave, &config);
        for (i, p) in series.iter().enumerate() {
            let expected = i as f32 * config.hop_length as f32 / 12000.0;
            assert!((p.time_s - expected).abs() < 1e-6);
        }
    }
}
