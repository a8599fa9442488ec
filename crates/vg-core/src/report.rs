use ndarray::{s, Array2};
use serde::{Deserialize, Serialize};

use crate::error::AnalysisError;

/// Decoded audio: mono samples at the file's native sample rate.
///
/// Immutable after load; every derived entity of the pipeline is a pure
/// function of this signal plus its own explicit parameters.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Waveform {
    /// Mono amplitudes in [-1, 1].
    pub samples: Vec<f32>,
    /// Sample rate in Hz.
    pub sample_rate: u32,
}

impl Waveform {
    /// Create a waveform from mono samples.
    #[must_use]
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    /// Signal duration in seconds: `sample_count / sample_rate`.
    #[must_use]
    pub fn duration_s(&self) -> f32 {
        self.samples.len() as f32 / self.sample_rate as f32
    }

    /// Single-pass descriptive statistics over the signal.
    ///
    /// # Errors
    /// Returns `AnalysisError::EmptyAudio` for a zero-length signal
    /// instead of dividing by zero.
    ///
    /// # Example
    /// ```
    /// use vg_core::report::Waveform;
    /// let wave = Waveform::new(vec![0.0; 32000], 16000);
    /// let stats = wave.stats().unwrap();
    /// assert!((stats.duration_s - 2.0).abs() < 1e-6);
    /// assert_eq!(stats.rms, 0.0);
    /// ```
    pub fn stats(&self) -> Result<WaveformStats, AnalysisError> {
        if self.samples.is_empty() {
            return Err(AnalysisError::EmptyAudio);
        }

        let n = self.samples.len() as f64;
        let mut sum = 0.0f64;
        let mut sum_sq = 0.0f64;
        let mut peak = 0.0f32;
        for &s in &self.samples {
            sum += f64::from(s);
            sum_sq += f64::from(s) * f64::from(s);
            peak = peak.max(s.abs());
        }

        Ok(WaveformStats {
            duration_s: self.duration_s(),
            sample_count: self.samples.len(),
            sample_rate: self.sample_rate,
            rms: (sum_sq / n).sqrt() as f32,
            peak,
            dc_offset: (sum / n) as f32,
        })
    }
}

/// Descriptive statistics of a decoded waveform.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct WaveformStats {
    /// Duration in seconds (`sample_count / sample_rate`).
    pub duration_s: f32,
    /// Number of mono samples.
    pub sample_count: usize,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Root-mean-square amplitude over the whole signal.
    pub rms: f32,
    /// Largest absolute amplitude.
    pub peak: f32,
    /// Mean amplitude.
    pub dc_offset: f32,
}

/// One analysis frame of the energy profile.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct EnergyFrame {
    /// Frame index.
    pub index: usize,
    /// Frame start time: `index * hop_length / sample_rate`.
    pub time_s: f32,
    /// Linear RMS amplitude of the frame.
    pub rms: f32,
    /// `10 * log10(max(rms, 1e-10))`.
    pub rms_db: f32,
}

/// Per-frame loudness of a waveform on a fixed frame/hop schedule.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FrameEnergyProfile {
    /// Frames in time order.
    pub frames: Vec<EnergyFrame>,
    /// Window size in samples.
    pub frame_length: usize,
    /// Hop size in samples.
    pub hop_length: usize,
    /// Sample rate of the source waveform, in Hz.
    pub sample_rate: u32,
}

impl FrameEnergyProfile {
    /// Frame start times, in order.
    #[must_use]
    pub fn times(&self) -> Vec<f32> {
        self.frames.iter().map(|f| f.time_s).collect()
    }
}

/// One contiguous interval of cry activity.
///
/// The end time is the time of the first non-cry frame after the run
/// (or the last frame's time when the recording ends mid-cry), so a
/// single-frame run at the signal end has `start_s == end_s`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CrySegment {
    /// Segment start in seconds.
    pub start_s: f32,
    /// Segment end in seconds (`start_s <= end_s`).
    pub end_s: f32,
}

impl CrySegment {
    /// Segment length in seconds.
    #[must_use]
    pub fn duration_s(&self) -> f32 {
        self.end_s - self.start_s
    }
}

/// Aggregate cry/silence durations.
///
/// Cry time is `cry_frame_count * hop_length / sample_rate` and silence
/// is `total_duration - cry time`: a hop-granularity approximation that
/// will not exactly match summed true frame durations at the signal
/// boundaries. Kept as-is deliberately.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct CryTotals {
    /// Total detected cry time in seconds.
    pub cry_s: f32,
    /// Total silence time in seconds.
    pub silence_s: f32,
}

/// One point of the fundamental-frequency curve.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct PitchPoint {
    /// Window start time in seconds.
    pub time_s: f32,
    /// Estimated F0 in Hz. `0.0` denotes an unvoiced window.
    pub f0_hz: f32,
}

impl PitchPoint {
    /// Whether this point carries a voiced estimate.
    #[must_use]
    pub fn is_voiced(&self) -> bool {
        self.f0_hz > 0.0
    }
}

/// F0 over time, as returned by the pitch tracker (unvoiced points kept).
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct PitchCurve {
    /// Points in time order, one per analysis window.
    pub points: Vec<PitchPoint>,
}

impl PitchCurve {
    /// Voiced points only (f0 > 0).
    #[must_use]
    pub fn voiced(&self) -> Vec<PitchPoint> {
        self.points.iter().copied().filter(PitchPoint::is_voiced).collect()
    }

    /// Voiced points inside `[lo, hi]` Hz — the display/outlier filter.
    #[must_use]
    pub fn in_range(&self, lo: f32, hi: f32) -> Vec<PitchPoint> {
        self.points
            .iter()
            .copied()
            .filter(|p| p.is_voiced() && p.f0_hz >= lo && p.f0_hz <= hi)
            .collect()
    }

    /// Mean/min/max over voiced points.
    ///
    /// `None` when no voiced point exists — the curve is "undetectable",
    /// which is a valid outcome, not an error.
    #[must_use]
    pub fn summary(&self) -> Option<PitchSummary> {
        let voiced = self.voiced();
        if voiced.is_empty() {
            return None;
        }

        let mut min = f32::MAX;
        let mut max = f32::MIN;
        let mut sum = 0.0f32;
        for p in &voiced {
            min = min.min(p.f0_hz);
            max = max.max(p.f0_hz);
            sum += p.f0_hz;
        }

        Some(PitchSummary {
            mean_hz: sum / voiced.len() as f32,
            min_hz: min,
            max_hz: max,
            voiced_count: voiced.len(),
        })
    }
}

/// Summary statistics over the voiced part of a pitch curve.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct PitchSummary {
    /// Mean F0 over voiced windows, in Hz.
    pub mean_hz: f32,
    /// Lowest voiced F0, in Hz.
    pub min_hz: f32,
    /// Highest voiced F0, in Hz.
    pub max_hz: f32,
    /// Number of voiced windows.
    pub voiced_count: usize,
}

/// Pitch analysis output: the raw curve plus derived views.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PitchReport {
    /// Raw tracker output, unvoiced windows included as `f0 == 0`.
    pub curve: PitchCurve,
    /// Voiced-only summary. `None` = pitch undetectable.
    pub summary: Option<PitchSummary>,
    /// Share of voiced points inside the typical cry band (250–600 Hz
    /// by default). `None` when nothing is voiced.
    pub cry_band_share: Option<f32>,
}

/// Cycle-to-cycle voice stability measures, as fractions.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct PerturbationMetrics {
    /// Relative period perturbation: mean |ΔT| / mean T.
    pub jitter_local: f32,
    /// Relative amplitude perturbation: mean |ΔA| / mean A.
    pub shimmer_local: f32,
}

impl PerturbationMetrics {
    /// Clinical reference threshold for local jitter (1.04 %).
    pub const JITTER_REFERENCE: f32 = 0.0104;
    /// Clinical reference threshold for local shimmer (3.81 %).
    pub const SHIMMER_REFERENCE: f32 = 0.0381;

    /// Jitter above the clinical reference threshold.
    #[must_use]
    pub fn jitter_above_reference(&self) -> bool {
        self.jitter_local > Self::JITTER_REFERENCE
    }

    /// Shimmer above the clinical reference threshold.
    #[must_use]
    pub fn shimmer_above_reference(&self) -> bool {
        self.shimmer_local > Self::SHIMMER_REFERENCE
    }
}

/// Time-frequency energy map in decibels.
///
/// Rows are frequency bins (low to high), columns are time bins. The
/// full-resolution matrix is what export paths receive; `decimated` is
/// only a presentation view.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SpectrogramMatrix {
    /// dB values, shape `(freqs.len(), times.len())`.
    pub values: Array2<f32>,
    /// Time axis in seconds, linearly spaced over `[0, duration]`.
    pub times: Vec<f32>,
    /// Frequency axis in Hz, linearly spaced over `[0, max_freq]`.
    pub freqs: Vec<f32>,
}

impl SpectrogramMatrix {
    /// Total number of cells.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.values.len()
    }

    /// Decimated copy for interactive rendering.
    ///
    /// When the matrix exceeds `budget` cells, both axes are strided by
    /// integer factors `ceil(len / sqrt(budget))` so the view fits the
    /// budget. Below the budget the matrix is returned unchanged.
    #[must_use]
    pub fn decimated(&self, budget: usize) -> Self {
        if budget == 0 || self.cell_count() <= budget {
            return self.clone();
        }

        let side = (budget as f64).sqrt();
        let factor_t = (self.times.len() as f64 / side).ceil() as usize;
        let factor_f = (self.freqs.len() as f64 / side).ceil() as usize;
        let factor_t = factor_t.max(1);
        let factor_f = factor_f.max(1);

        Self {
            values: self.values.slice(s![..;factor_f, ..;factor_t]).to_owned(),
            times: self.times.iter().copied().step_by(factor_t).collect(),
            freqs: self.freqs.iter().copied().step_by(factor_f).collect(),
        }
    }
}

/// One point of the zero-crossing-rate series.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct ZcrPoint {
    /// Frame start time in seconds.
    pub time_s: f32,
    /// Sign changes within the frame divided by the frame length.
    pub rate: f32,
}

/// Result of one feature analyzer.
///
/// A failed analyzer yields `Undetermined` with a reason; this is
/// explicitly distinct from a determined-but-empty result (e.g. zero
/// cry segments), which is still `Determined`.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome<T> {
    /// The analyzer ran to completion.
    Determined {
        /// The analyzer's output.
        value: T,
    },
    /// The analyzer failed; other analyzers are unaffected.
    Undetermined {
        /// Human-readable failure reason.
        reason: String,
    },
}

impl<T> Outcome<T> {
    /// Wrap a successful analyzer result.
    pub fn determined(value: T) -> Self {
        Self::Determined { value }
    }

    /// The determined value, if any.
    pub fn value(&self) -> Option<&T> {
        match self {
            Self::Determined { value } => Some(value),
            Self::Undetermined { .. } => None,
        }
    }

    /// Whether the analyzer completed.
    pub fn is_determined(&self) -> bool {
        matches!(self, Self::Determined { .. })
    }
}

impl<T, E: std::fmt::Display> From<Result<T, E>> for Outcome<T> {
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => Self::Determined { value },
            Err(e) => Self::Undetermined {
                reason: e.to_string(),
            },
        }
    }
}

/// Energy analysis output: profile, classification, and aggregates.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EnergyReport {
    /// Per-frame RMS energy.
    pub profile: FrameEnergyProfile,
    /// Per-frame cry/silence classification at the configured threshold.
    pub mask: Vec<bool>,
    /// Aggregate cry/silence durations.
    pub totals: CryTotals,
    /// Contiguous cry intervals derived from the mask.
    pub segments: Vec<CrySegment>,
    /// Simple presence check: any frame RMS above the linear threshold.
    pub cry_detected: bool,
    /// Threshold the mask was computed with, in dB.
    pub threshold_db: f32,
}

/// Everything one analysis run produces.
///
/// Feature analyzers fail independently: a failure in one shows up as
/// `Undetermined` plus a warning, and never aborts the others.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Waveform descriptive statistics.
    pub stats: WaveformStats,
    /// Frame energy, classification, totals, and cry segments.
    pub energy: Outcome<EnergyReport>,
    /// Pitch curve and voiced summary.
    pub pitch: Outcome<PitchReport>,
    /// Jitter/shimmer.
    pub perturbation: Outcome<PerturbationMetrics>,
    /// Full-resolution spectrogram.
    pub spectrogram: Outcome<SpectrogramMatrix>,
    /// Zero-crossing-rate series.
    pub zcr: Outcome<Vec<ZcrPoint>>,
    /// Per-feature warnings accumulated during the run.
    pub warnings: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;

    #[test]
    fn duration_is_exact_sample_ratio() {
        let wave = Waveform::new(vec![0.5; 16000], 16000);
        assert!((wave.duration_s() - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn stats_reject_empty_signal() {
        let wave = Waveform::new(vec![], 44100);
        assert!(matches!(wave.stats(), Err(AnalysisError::EmptyAudio)));
    }

    #[test]
    fn stats_of_silence_are_zero() {
        let wave = Waveform::new(vec![0.0; 32000], 16000);
        let stats = wave.stats().unwrap();
        assert_eq!(stats.rms, 0.0);
        assert_eq!(stats.peak, 0.0);
        assert_eq!(stats.dc_offset, 0.0);
        assert!((stats.duration_s - 2.0).abs() < 1e-6);
    }

    #[test]
    fn stats_capture_dc_offset() {
        let wave = Waveform::new(vec![0.25; 1000], 8000);
        let stats = wave.stats().unwrap();
        assert!((stats.dc_offset - 0.25).abs() < 1e-6);
        assert!((stats.rms - 0.25).abs() < 1e-6);
        assert!((stats.peak - 0.25).abs() < 1e-6);
    }

    #[test]
    fn summary_none_when_all_unvoiced() {
        let curve = PitchCurve {
            points: (0..10)
                .map(|i| PitchPoint {
                    time_s: i as f32 * 0.032,
                    f0_hz: 0.0,
                })
                .collect(),
        };
        assert!(curve.summary().is_none());
    }

    #[test]
    fn summary_of_single_voiced_point() {
        let curve = PitchCurve {
            points: vec![
                PitchPoint { time_s: 0.0, f0_hz: 0.0 },
                PitchPoint { time_s: 0.032, f0_hz: 437.5 },
                PitchPoint { time_s: 0.064, f0_hz: 0.0 },
            ],
        };
        let summary = curve.summary().unwrap();
        assert!((summary.mean_hz - 437.5).abs() < f32::EPSILON);
        assert!((summary.min_hz - 437.5).abs() < f32::EPSILON);
        assert!((summary.max_hz - 437.5).abs() < f32::EPSILON);
        assert_eq!(summary.voiced_count, 1);
    }

    #[test]
    fn in_range_drops_outliers_and_unvoiced() {
        let curve = PitchCurve {
            points: vec![
                PitchPoint { time_s: 0.0, f0_hz: 0.0 },
                PitchPoint { time_s: 0.1, f0_hz: 150.0 },
                PitchPoint { time_s: 0.2, f0_hz: 450.0 },
                PitchPoint { time_s: 0.3, f0_hz: 1200.0 },
            ],
        };
        let kept = curve.in_range(200.0, 1000.0);
        assert_eq!(kept.len(), 1);
        assert!((kept[0].f0_hz - 450.0).abs() < f32::EPSILON);
    }

    #[test]
    fn decimation_respects_budget_and_preserves_original() {
        let rows = 500;
        let cols = 800;
        let matrix = SpectrogramMatrix {
            values: Array2::from_elem((rows, cols), -40.0),
            times: (0..cols).map(|i| i as f32 * 0.01).collect(),
            freqs: (0..rows).map(|i| i as f32 * 10.0).collect(),
        };

        let view = matrix.decimated(10_000);
        assert!(view.cell_count() <= 10_000);
        assert_eq!(view.values.nrows(), view.freqs.len());
        assert_eq!(view.values.ncols(), view.times.len());
        // Full-resolution matrix is untouched
        assert_eq!(matrix.cell_count(), rows * cols);
    }

    #[test]
    fn decimation_noop_below_budget() {
        let matrix = SpectrogramMatrix {
            values: Array2::from_elem((10, 10), 0.0),
            times: vec![0.0; 10],
            freqs: vec![0.0; 10],
        };
        let view = matrix.decimated(200_000);
        assert_eq!(view.cell_count(), 100);
    }

    #[test]
    fn perturbation_reference_comparison() {
        let normal = PerturbationMetrics {
            jitter_local: 0.008,
            shimmer_local: 0.02,
        };
        assert!(!normal.jitter_above_reference());
        assert!(!normal.shimmer_above_reference());

        let raised = PerturbationMetrics {
            jitter_local: 0.02,
            shimmer_local: 0.05,
        };
        assert!(raised.jitter_above_reference());
        assert!(raised.shimmer_above_reference());
    }

    #[test]
    fn outcome_from_result() {
        let ok: Outcome<u32> = Ok::<_, AnalysisError>(7).into();
        assert!(ok.is_determined());
        assert_eq!(ok.value(), Some(&7));

        let err: Outcome<u32> = Err::<u32, _>(AnalysisError::EmptyAudio).into();
        assert!(!err.is_determined());
        assert!(err.value().is_none());
    }
}
