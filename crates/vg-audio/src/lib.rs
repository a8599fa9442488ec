// Audio decode and acoustic feature extraction for vagido.

pub mod decode;
pub mod energy;
pub mod perturbation;
pub mod pipeline;
pub mod pitch;
pub mod segment;
pub mod spectrogram;
pub mod zcr;
