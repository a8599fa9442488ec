//! Configuration, types, and shared structures for vagido.
//!
//! This crate contains the data model produced by the analysis pipeline
//! (waveform, energy profile, cry segments, pitch curve, perturbation
//! metrics, spectrogram), the analyzer configuration, and the error kinds
//! shared across the vagido workspace.

pub mod config;
pub mod error;
pub mod report;

pub use config::AnalysisConfig;
pub use error::AnalysisError;
pub use report::{
    AnalysisReport, CrySegment, CryTotals, EnergyFrame, EnergyReport, FrameEnergyProfile, Outcome,
    PerturbationMetrics, PitchCurve, PitchPoint, PitchReport, PitchSummary, SpectrogramMatrix,
    Waveform, WaveformStats, ZcrPoint,
};
