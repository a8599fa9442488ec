use std::fs::File;
use std::io::Cursor;
use std::path::Path;

use anyhow::{Context, Result};
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::DecoderOptions;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::{MediaSource, MediaSourceStream};
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use vg_core::{AnalysisError, Waveform};

/// Decode audio bytes into a mono waveform at the native sample rate.
///
/// Supports WAV, FLAC, MP3, OGG via symphonia. Multi-channel input is
/// downmixed to mono by averaging the interleaved channels. No
/// resampling is applied: downstream analyzers receive the file's
/// native rate.
///
/// # Errors
/// Returns `AnalysisError::Decode` if the bytes are not a valid audio
/// container or no audio track can be decoded.
///
/// # Example
/// ```no_run
/// use vg_audio::decode::decode_bytes;
/// let bytes = std::fs::read("cry.wav").unwrap();
/// let wave = decode_bytes(&bytes, Some("wav")).unwrap();
/// assert!(wave.sample_rate > 0);
/// ```
pub fn decode_bytes(bytes: &[u8], ext: Option<&str>) -> Result<Waveform, AnalysisError> {
    let cursor = Cursor::new(bytes.to_vec());
    decode_source(Box::new(cursor), ext)
}

/// Decode an audio file into a mono waveform.
///
/// # Errors
/// Returns an error if the file cannot be opened or decoded.
pub fn decode_file(path: impl AsRef<Path>) -> Result<Waveform> {
    let path = path.as_ref();
    let file =
        File::open(path).with_context(|| format!("Impossible d'ouvrir {}", path.display()))?;
    let ext = path.extension().and_then(|e| e.to_str());
    let wave = decode_source(Box::new(file), ext)
        .with_context(|| format!("Décodage échoué : {}", path.display()))?;
    Ok(wave)
}

fn decode_source(
    source: Box<dyn MediaSource>,
    ext: Option<&str>,
) -> Result<Waveform, AnalysisError> {
    let mss = MediaSourceStream::new(
        source,
        symphonia::core::io::MediaSourceStreamOptions::default(),
    );

    let mut hint = Hint::new();
    if let Some(ext) = ext {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| AnalysisError::Decode(format!("format non reconnu : {e}")))?;

    let mut format = probed.format;
    let track = format
        .default_track()
        .ok_or_else(|| AnalysisError::Decode("aucune piste audio".into()))?;

    // Every downstream timestamp and F0 scales with the sample rate;
    // a container that does not declare one cannot be analyzed.
    let sample_rate = track
        .codec_params
        .sample_rate
        .filter(|&rate| rate > 0)
        .ok_or_else(|| {
            AnalysisError::Decode("fréquence d'échantillonnage non déclarée".into())
        })?;
    let channels = track
        .codec_params
        .channels
        .map_or(1, symphonia::core::audio::Channels::count);

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(|e| AnalysisError::Decode(format!("codec non supporté : {e}")))?;

    let track_id = track.id;
    let mut samples: Vec<f32> = Vec::new();
    let mut sample_buf: Option<SampleBuffer<f32>> = None;
    let mut max_sample_frames: usize = 0;

    loop {
        let packet = match format.next_packet() {
            Ok(p) => p,
            Err(symphonia::core::errors::Error::IoError(ref e))
                if e.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break;
            }
            Err(e) => {
                log::warn!("Audio decode packet error: {e}");
                break;
            }
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(d) => d,
            Err(e) => {
                log::warn!("Audio decode frame error: {e}");
                continue;
            }
        };

        let spec = *decoded.spec();
        let num_frames = decoded.capacity();
        // Reuse SampleBuffer: only reallocate if this packet is bigger than current capacity
        if sample_buf.is_none() || num_frames > max_sample_frames {
            sample_buf = Some(SampleBuffer::<f32>::new(num_frames as u64, spec));
            max_sample_frames = num_frames;
        }
        let Some(buf) = sample_buf.as_mut() else {
            continue;
        };
        buf.copy_interleaved_ref(decoded);
        let interleaved = buf.samples();

        // Downmix to mono by averaging channels
        for chunk in interleaved.chunks(channels) {
            let mono: f32 = chunk.iter().sum::<f32>() / channels as f32;
            samples.push(mono);
        }
    }

    log::info!("Decoded {} samples @ {sample_rate}Hz", samples.len());

    Ok(Waveform::new(samples, sample_rate))
}
