use std::path::PathBuf;

use clap::Parser;

/// vagido — Acoustic biomarker extraction for infant-cry recordings.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Fichier audio à analyser (WAV, FLAC, MP3, OGG).
    pub input: PathBuf,

    /// Fichier de configuration TOML. Défaut : config/default.toml.
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: PathBuf,

    /// Seuil cri/silence en dB (convention UI : -60 à 0).
    #[arg(long, allow_negative_numbers = true)]
    pub threshold_db: Option<f32>,

    /// Fréquence maximale du spectrogramme en Hz.
    #[arg(long)]
    pub max_freq: Option<f32>,

    /// Exporter la série F0 filtrée en CSV vers ce chemin.
    #[arg(long)]
    pub export_f0: Option<PathBuf>,

    /// Exporter le spectrogramme pleine résolution en NPZ vers ce chemin.
    #[arg(long)]
    pub export_spectrogram: Option<PathBuf>,

    /// Imprimer le rapport complet en JSON au lieu du texte.
    #[arg(long, default_value_t = false)]
    pub json: bool,

    /// Niveau de log : error, warn, info, debug, trace.
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_invocation() {
        let cli = Cli::try_parse_from(["vagido", "cry.wav"]).unwrap();
        assert_eq!(cli.input, PathBuf::from("cry.wav"));
        assert!(cli.threshold_db.is_none());
        assert!(!cli.json);
    }

    #[test]
    fn parses_overrides_and_exports() {
        let cli = Cli::try_parse_from([
            "vagido",
            "cry.wav",
            "--threshold-db",
            "-25",
            "--export-f0",
            "f0.csv",
            "--json",
        ])
        .unwrap();
        assert!((cli.threshold_db.unwrap() - -25.0).abs() < f32::EPSILON);
        assert_eq!(cli.export_f0.unwrap(), PathBuf::from("f0.csv"));
        assert!(cli.json);
    }

    #[test]
    fn input_is_required() {
        assert!(Cli::try_parse_from(["vagido"]).is_err());
    }
}
