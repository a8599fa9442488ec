use thiserror::Error;

/// Errors originating from the analysis pipeline.
///
/// `Decode` and `EmptyAudio` are fatal for the request; the remaining
/// kinds are per-analyzer failures that the pipeline reports as warnings
/// without aborting the other analyzers.
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// Input bytes are not a readable audio container.
    #[error("Audio indécodable : {0}")]
    Decode(String),

    /// The decoded signal has zero samples.
    #[error("Signal audio vide")]
    EmptyAudio,

    /// No voiced frame was found; pitch statistics are undefined.
    ///
    /// Non-fatal: callers must treat this as "pitch undetectable",
    /// not as a pipeline error.
    #[error("Aucune trame voisée : F0 indétectable")]
    PitchUndetectable,

    /// Fewer than 2 usable glottal periods; jitter/shimmer undefined.
    #[error("Périodes insuffisantes pour jitter/shimmer : {found} trouvée(s), 2 requises")]
    InsufficientPeriods {
        /// Number of usable periods that were detected.
        found: usize,
    },

    /// Periods were found but every consecutive pair was rejected by the
    /// stability filters; jitter/shimmer undefined.
    #[error("Aucune paire de cycles consécutifs stable : jitter/shimmer indéfinis")]
    UnstableCycles,

    /// Invalid configuration value or structure.
    #[error("Configuration invalide : {0}")]
    Config(String),
}
