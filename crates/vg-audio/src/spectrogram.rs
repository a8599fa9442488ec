use ndarray::Array2;
use realfft::RealFftPlanner;
use vg_core::config::SpectrogramConfig;
use vg_core::report::{SpectrogramMatrix, Waveform};

use crate::energy::DB_EPSILON;

/// STFT pipeline: windowed real FFT using realfft.
///
/// Pre-allocates the FFT plan, window, and scratch buffers so every
/// column of the spectrogram reuses them.
struct StftPipeline {
    window_len: usize,
    fft_size: usize,
    input_buf: Vec<f32>,
    spectrum_buf: Vec<realfft::num_complex::Complex<f32>>,
    scratch: Vec<realfft::num_complex::Complex<f32>>,
    plan: std::sync::Arc<dyn realfft::RealToComplex<f32>>,
    /// Hann window over `window_len` samples; the tail up to `fft_size`
    /// is zero-padded.
    window: Vec<f32>,
}

impl StftPipeline {
    fn new(window_len: usize) -> Self {
        let window_len = window_len.max(2);
        let fft_size = window_len.next_power_of_two();

        let mut planner = RealFftPlanner::<f32>::new();
        let plan = planner.plan_fft_forward(fft_size);

        let input_buf = plan.make_input_vec();
        let spectrum_buf = plan.make_output_vec();
        let scratch = plan.make_scratch_vec();

        // Hann window
        let window: Vec<f32> = (0..window_len)
            .map(|i| {
                0.5 * (1.0
                    - (2.0 * std::f32::consts::PI * i as f32 / (window_len as f32 - 1.0)).cos())
            })
            .collect();

        Self {
            window_len,
            fft_size,
            input_buf,
            spectrum_buf,
            scratch,
            plan,
            window,
        }
    }

    /// Number of frequency bins per column.
    fn bins(&self) -> usize {
        self.fft_size / 2 + 1
    }

    /// Width of one frequency bin in Hz.
    fn bin_hz(&self, sample_rate: u32) -> f32 {
        sample_rate as f32 / self.fft_size as f32
    }

    /// Power spectrum (|X|² / N²) of one windowed frame.
    fn power(&mut self, samples: &[f32]) -> Vec<f32> {
        let n = self.window_len.min(samples.len());

        for (i, slot) in self.input_buf.iter_mut().enumerate() {
            *slot = if i < n { samples[i] * self.window[i] } else { 0.0 };
        }

        if self
            .plan
            .process_with_scratch(&mut self.input_buf, &mut self.spectrum_buf, &mut self.scratch)
            .is_err()
        {
            return vec![0.0; self.spectrum_buf.len()];
        }

        let norm = self.fft_size as f32;
        self.spectrum_buf
            .iter()
            .map(|c| (c.re * c.re + c.im * c.im) / (norm * norm))
            .collect()
    }
}

/// Compute the time-frequency magnitude representation of a waveform.
///
/// Magnitude-squared STFT converted to decibels with the pipeline-wide
/// `10 * log10(max(x, 1e-10))` rule. The analysis window spans
/// `window_length_s` seconds (Hann-weighted, zero-padded to the next
/// power of two), columns advance by half a window, and trailing
/// partial frames are zero-padded. Rows are cropped to `max_freq_hz`,
/// clamped to the Nyquist frequency so low-rate recordings never get an
/// axis labeled past what the signal can contain; the frequency axis is
/// linearly spaced over `[0, cutoff]` and the time axis over
/// `[0, duration]`, matching the matrix's shape.
///
/// # Example
/// ```
/// use vg_audio::spectrogram::compute;
/// use vg_core::config::SpectrogramConfig;
/// use vg_core::report::Waveform;
///
/// let wave = Waveform::new(vec![0.0; 16000], 16000);
/// let matrix = compute(&wave, &SpectrogramConfig::default());
/// assert_eq!(matrix.values.nrows(), matrix.freqs.len());
/// assert_eq!(matrix.values.ncols(), matrix.times.len());
/// ```
#[must_use]
pub fn compute(wave: &Waveform, config: &SpectrogramConfig) -> SpectrogramMatrix {
    let sr = wave.sample_rate;
    let window_len = ((config.window_length_s * sr as f32).round() as usize).max(2);
    let hop = (window_len / 2).max(1);
    let samples = &wave.samples;

    let mut stft = StftPipeline::new(window_len);

    // Le cutoff ne peut pas dépasser Nyquist.
    let cutoff = config.max_freq_hz.min(sr as f32 / 2.0);
    let bin_hz = stft.bin_hz(sr);
    let keep = (((cutoff / bin_hz).floor() as usize) + 1).min(stft.bins());

    let num_cols = samples.len().div_ceil(hop).max(1);
    let mut values = Array2::zeros((keep, num_cols));

    for col in 0..num_cols {
        let start = col * hop;
        let end = (start + window_len).min(samples.len());
        let frame = if start < samples.len() {
            &samples[start..end]
        } else {
            &[]
        };

        let power = stft.power(frame);
        for (row, &p) in power[..keep].iter().enumerate() {
            values[(row, col)] = 10.0 * p.max(DB_EPSILON).log10();
        }
    }

    SpectrogramMatrix {
        values,
        times: linspace(0.0, wave.duration_s(), num_cols),
        freqs: linspace(0.0, cutoff, keep),
    }
}

/// `n` evenly spaced values from `start` to `end` inclusive.
fn linspace(start: f32, end: f32, n: usize) -> Vec<f32> {
    if n <= 1 {
        return vec![start];
    }
    let step = (end - start) / (n - 1) as f32;
    (0..n).map(|i| start + step * i as f32).collect()
}
