use anyhow::{Context, Result};
use clap::Parser;
use vg_core::AnalysisConfig;

pub mod cli;
pub mod report;

fn main() -> Result<()> {
    // 1. Parser CLI
    let cli = cli::Cli::parse();

    // 2. Initialiser le logging
    env_logger::Builder::new()
        .filter_level(cli.log_level.parse().unwrap_or(log::LevelFilter::Warn))
        .init();

    // 3. Charger la config
    let mut config = resolve_config(&cli)?;

    // 3b. Appliquer les overrides CLI
    if let Some(threshold) = cli.threshold_db {
        config.energy.threshold_db = threshold;
    }
    if let Some(max_freq) = cli.max_freq {
        config.spectrogram.max_freq_hz = max_freq;
    }
    config.validate()?;

    // 4. Analyser
    let analysis = vg_audio::pipeline::analyze_file(&cli.input, &config)
        .with_context(|| format!("Analyse échouée : {}", cli.input.display()))?;

    // 5. Exports
    if let Some(path) = &cli.export_f0 {
        match analysis.pitch.value() {
            Some(pitch) => vg_export::f0::write_csv_file(
                path,
                &pitch.curve,
                config.pitch.display_min_hz,
                config.pitch.display_max_hz,
            )?,
            None => log::warn!("F0 indéterminée : export CSV ignoré"),
        }
    }
    if let Some(path) = &cli.export_spectrogram {
        match analysis.spectrogram.value() {
            // Export always takes the full-resolution matrix, never the
            // decimated presentation view.
            Some(matrix) => vg_export::spectrogram::write_npz(path, matrix)?,
            None => log::warn!("Spectrogramme indéterminé : export NPZ ignoré"),
        }
    }

    // 6. Rapport
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&analysis)?);
    } else {
        print!("{}", report::render(&analysis));
    }

    Ok(())
}

/// Charge la config depuis le chemin CLI ; le chemin par défaut absent
/// retombe sur les valeurs par défaut, un chemin explicite absent est
/// une erreur.
fn resolve_config(cli: &cli::Cli) -> Result<AnalysisConfig> {
    if cli.config.exists() {
        vg_core::config::load_config(&cli.config)
    } else if cli.config == std::path::Path::new("config/default.toml") {
        log::info!("config/default.toml absent, utilisation des défauts");
        Ok(AnalysisConfig::default())
    } else {
        anyhow::bail!("Fichier de configuration introuvable : {}", cli.config.display())
    }
}
