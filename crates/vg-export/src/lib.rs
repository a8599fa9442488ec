// Export artifacts for vagido analysis results.

pub mod f0;
pub mod spectrogram;
