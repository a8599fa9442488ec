use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};
use ndarray::Array1;
use ndarray_npy::NpzWriter;
use vg_core::report::SpectrogramMatrix;

/// Write the full-resolution spectrogram as a compressed NPZ archive.
///
/// Three named arrays, names preserved from the original exporter:
/// `espectrograma` (dB matrix, freq × time), `tiempo` (time axis,
/// seconds), `frecuencia` (frequency axis, Hz). Export always receives
/// the full-resolution matrix — the decimated presentation view must
/// never reach this path.
///
/// # Errors
/// Returns an error if the file cannot be created or written.
pub fn write_npz(path: impl AsRef<Path>, matrix: &SpectrogramMatrix) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path)
        .with_context(|| format!("Impossible de créer {}", path.display()))?;

    let mut npz = NpzWriter::new_compressed(file);
    npz.add_array("espectrograma", &matrix.values)
        .context("Écriture de l'espectrograma")?;
    npz.add_array("tiempo", &Array1::from(matrix.times.clone()))
        .context("Écriture de l'axe temps")?;
    npz.add_array("frecuencia", &Array1::from(matrix.freqs.clone()))
        .context("Écriture de l'axe fréquence")?;
    npz.finish().context("Finalisation du NPZ")?;

    log::info!(
        "Spectrogram ({} x {}) written to {}",
        matrix.freqs.len(),
        matrix.times.len(),
        path.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array2, Ix1};
    use ndarray_npy::NpzReader;

    #[test]
    fn npz_roundtrip_preserves_full_resolution() {
        let rows = 40;
        let cols = 60;
        let matrix = SpectrogramMatrix {
            values: Array2::from_shape_fn((rows, cols), |(r, c)| (r * cols + c) as f32 * 0.5),
            times: (0..cols).map(|i| i as f32 * 0.01).collect(),
            freqs: (0..rows).map(|i| i as f32 * 125.0).collect(),
        };

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("espectro.npz");
        write_npz(&path, &matrix).unwrap();

        let mut npz = NpzReader::new(File::open(&path).unwrap()).unwrap();
        let values: Array2<f32> = npz.by_name("espectrograma.npy").unwrap();
        let times: ndarray::Array<f32, Ix1> = npz.by_name("tiempo.npy").unwrap();
        let freqs: ndarray::Array<f32, Ix1> = npz.by_name("frecuencia.npy").unwrap();

        assert_eq!(values.dim(), (rows, cols));
        assert_eq!(values, matrix.values);
        assert_eq!(times.len(), cols);
        assert_eq!(freqs.len(), rows);
        assert!((times[1] - 0.01).abs() < 1e-6);
    }
}
