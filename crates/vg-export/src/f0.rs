use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use vg_core::report::PitchCurve;

/// Header row of the F0 series export. Kept verbatim for compatibility
/// with downstream spreadsheets built on the original tool.
pub const HEADER: &str = "Tiempo (s),F0 (Hz)";

/// Write the F0 series as two-column CSV.
///
/// One row per voiced, in-range point — the raw unfiltered curve is
/// not exported. Range bounds are the display filter (200–1000 Hz by
/// default).
///
/// # Errors
/// Returns an error if writing fails.
///
/// # Example
/// ```
/// use vg_core::report::{PitchCurve, PitchPoint};
/// use vg_export::f0::write_csv;
///
/// let curve = PitchCurve {
///     points: vec![
///         PitchPoint { time_s: 0.0, f0_hz: 0.0 },
///         PitchPoint { time_s: 0.032, f0_hz: 451.2 },
///     ],
/// };
/// let mut out = Vec::new();
/// write_csv(&mut out, &curve, 200.0, 1000.0).unwrap();
/// let text = String::from_utf8(out).unwrap();
/// assert!(text.starts_with("Tiempo (s),F0 (Hz)\n"));
/// assert_eq!(text.lines().count(), 2);
/// ```
pub fn write_csv<W: Write>(mut writer: W, curve: &PitchCurve, lo: f32, hi: f32) -> Result<()> {
    writeln!(writer, "{HEADER}")?;
    for p in curve.in_range(lo, hi) {
        writeln!(writer, "{:.4},{:.2}", p.time_s, p.f0_hz)?;
    }
    Ok(())
}

/// Write the F0 series CSV to a file path.
///
/// # Errors
/// Returns an error if the file cannot be created or written.
pub fn write_csv_file(path: impl AsRef<Path>, curve: &PitchCurve, lo: f32, hi: f32) -> Result<()> {
    let path = path.as_ref();
    let file = std::fs::File::create(path)
        .with_context(|| format!("Impossible de créer {}", path.display()))?;
    write_csv(std::io::BufWriter::new(file), curve, lo, hi)?;
    log::info!("F0 series written to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use vg_core::report::PitchPoint;

    fn curve() -> PitchCurve {
        PitchCurve {
            points: vec![
                PitchPoint { time_s: 0.000, f0_hz: 0.0 },    // unvoiced
                PitchPoint { time_s: 0.032, f0_hz: 150.0 },  // below range
                PitchPoint { time_s: 0.064, f0_hz: 432.1 },
                PitchPoint { time_s: 0.096, f0_hz: 512.7 },
                PitchPoint { time_s: 0.128, f0_hz: 1400.0 }, // above range
            ],
        }
    }

    #[test]
    fn exports_only_voiced_in_range_rows() {
        let mut out = Vec::new();
        write_csv(&mut out, &curve(), 200.0, 1000.0).unwrap();
        let text = String::from_utf8(out).unwrap();

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], HEADER);
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], "0.0640,432.10");
        assert_eq!(lines[2], "0.0960,512.70");
    }

    #[test]
    fn empty_curve_exports_header_only() {
        let mut out = Vec::new();
        write_csv(&mut out, &PitchCurve::default(), 200.0, 1000.0).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), format!("{HEADER}\n"));
    }

    #[test]
    fn file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("f0.csv");
        write_csv_file(&path, &curve(), 200.0, 1000.0).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with(HEADER));
        assert_eq!(text.lines().count(), 3);
    }
}
