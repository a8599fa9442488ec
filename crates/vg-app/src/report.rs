use std::fmt::Write as _;

use vg_core::report::{AnalysisReport, Outcome, PerturbationMetrics};

/// Render a human-readable summary of an analysis report.
///
/// One block per feature; undetermined features print their reason
/// instead of numbers, never a silent zero.
#[must_use]
pub fn render(report: &AnalysisReport) -> String {
    let mut out = String::new();

    let s = &report.stats;
    let _ = writeln!(out, "=== Señal ===");
    let _ = writeln!(
        out,
        "Duración: {:.2} s  ({} muestras @ {} Hz)",
        s.duration_s, s.sample_count, s.sample_rate
    );
    let _ = writeln!(
        out,
        "RMS: {:.4}  Pico: {:.4}  DC offset: {:+.5}",
        s.rms, s.peak, s.dc_offset
    );

    let _ = writeln!(out, "\n=== Energía / llanto ===");
    match &report.energy {
        Outcome::Determined { value } => {
            let _ = writeln!(
                out,
                "Llanto detectado: {}  (umbral {} dB)",
                if value.cry_detected { "sí" } else { "no" },
                value.threshold_db
            );
            let _ = writeln!(
                out,
                "Tiempo de llanto: {:.2} s  Silencio: {:.2} s",
                value.totals.cry_s, value.totals.silence_s
            );
            let _ = writeln!(out, "Segmentos de llanto: {}", value.segments.len());
            for (i, seg) in value.segments.iter().enumerate() {
                let _ = writeln!(
                    out,
                    "  {:>3}. {:.2} s – {:.2} s  ({:.2} s)",
                    i + 1,
                    seg.start_s,
                    seg.end_s,
                    seg.duration_s()
                );
            }
        }
        Outcome::Undetermined { reason } => {
            let _ = writeln!(out, "No determinado: {reason}");
        }
    }

    let _ = writeln!(out, "\n=== Frecuencia fundamental (F0) ===");
    match &report.pitch {
        Outcome::Determined { value } => match value.summary {
            Some(summary) => {
                let _ = writeln!(
                    out,
                    "F0 media: {:.2} Hz  mín: {:.2} Hz  máx: {:.2} Hz  ({} ventanas sonoras)",
                    summary.mean_hz, summary.min_hz, summary.max_hz, summary.voiced_count
                );
                if let Some(share) = value.cry_band_share {
                    let _ = writeln!(
                        out,
                        "En banda típica de llanto (250–600 Hz): {:.0} %",
                        share * 100.0
                    );
                }
            }
            None => {
                let _ = writeln!(out, "F0 no detectada");
            }
        },
        Outcome::Undetermined { reason } => {
            let _ = writeln!(out, "No determinado: {reason}");
        }
    }

    let _ = writeln!(out, "\n=== Perturbación ===");
    match &report.perturbation {
        Outcome::Determined { value } => {
            let _ = writeln!(
                out,
                "Jitter (local): {:.2} %  [referencia {:.2} %]{}",
                value.jitter_local * 100.0,
                PerturbationMetrics::JITTER_REFERENCE * 100.0,
                if value.jitter_above_reference() {
                    "  ⚠ sobre referencia"
                } else {
                    ""
                }
            );
            let _ = writeln!(
                out,
                "Shimmer (local): {:.2} %  [referencia {:.2} %]{}",
                value.shimmer_local * 100.0,
                PerturbationMetrics::SHIMMER_REFERENCE * 100.0,
                if value.shimmer_above_reference() {
                    "  ⚠ sobre referencia"
                } else {
                    ""
                }
            );
        }
        Outcome::Undetermined { reason } => {
            let _ = writeln!(out, "No determinado: {reason}");
        }
    }

    let _ = writeln!(out, "\n=== Espectro / temporal ===");
    if let Some(matrix) = report.spectrogram.value() {
        let _ = writeln!(
            out,
            "Espectrograma: {} bandas × {} columnas ({} celdas)",
            matrix.freqs.len(),
            matrix.times.len(),
            matrix.cell_count()
        );
    }
    if let Some(series) = report.zcr.value() {
        if !series.is_empty() {
            let mean: f32 = series.iter().map(|p| p.rate).sum::<f32>() / series.len() as f32;
            let _ = writeln!(out, "ZCR media: {mean:.4}");
        }
    }

    if !report.warnings.is_empty() {
        let _ = writeln!(out, "\n=== Avisos ===");
        for w in &report.warnings {
            let _ = writeln!(out, "- {w}");
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use vg_audio::pipeline::analyze;
    use vg_core::{AnalysisConfig, Waveform};

    #[test]
    fn renders_undetermined_sections_for_silence() {
        let wave = Waveform::new(vec![0.0; 32000], 16000);
        let report = analyze(&wave, &AnalysisConfig::default()).unwrap();
        let text = render(&report);

        assert!(text.contains("Duración: 2.00 s"));
        assert!(text.contains("Llanto detectado: no"));
        assert!(text.contains("F0 no detectada"));
        assert!(text.contains("No determinado"));
        assert!(text.contains("Avisos"));
    }

    #[test]
    fn renders_segments_for_tone() {
        let samples: Vec<f32> = (0..32000)
            .map(|i| 0.5 * (2.0 * std::f32::consts::PI * 440.0 * i as f32 / 16000.0).sin())
            .collect();
        let wave = Waveform::new(samples, 16000);
        let report = analyze(&wave, &AnalysisConfig::default()).unwrap();
        let text = render(&report);

        assert!(text.contains("Llanto detectado: sí"));
        assert!(text.contains("Segmentos de llanto: 1"));
        assert!(text.contains("F0 media"));
    }
}
