use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::time::Duration;

use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use crate::error::{CallError, Result};
use crate::io::load_audio_asset;
use crate::models::AudioAsset;

/// MIME type of the re-encoded audio
pub const PREPARED_MIME_TYPE: &str = "audio/x-wav";

/// Configuration for audio preconditioning
#[derive(Debug, Clone)]
pub struct PreconditionConfig {
    /// Silence appended after the last sample
    pub trailing_silence: Duration,
    /// Directory for the padded copy (system temp dir if unset)
    pub temp_dir: Option<PathBuf>,
}

impl Default for PreconditionConfig {
    fn default() -> Self {
        Self {
            trailing_silence: Duration::from_secs(120),
            temp_dir: None,
        }
    }
}

/// Padded audio ready for upload
///
/// Owns the temporary file; dropping this value deletes it.
#[derive(Debug)]
pub struct PreparedAudio {
    file: NamedTempFile,
    pub source: AudioAsset,
    pub sample_rate: u32,
    pub channels: u16,
    /// Duration of the original recording in seconds
    pub source_seconds: f64,
    /// Duration including the appended silence
    pub padded_seconds: f64,
}

impl PreparedAudio {
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    pub fn mime_type(&self) -> &'static str {
        PREPARED_MIME_TYPE
    }
}

/// Shape of the decoded recording
struct DecodedStream {
    sample_rate: u32,
    channels: u16,
    source_frames: u64,
}

type PaddedWriter = hound::WavWriter<BufWriter<std::fs::File>>;

/// Execute Stage 0: validate the input and append trailing silence
///
/// Rejects non-audio paths before doing any work, then decodes the
/// recording packet by packet straight into a 16-bit PCM WAV temp file
/// and appends the silence frames.
pub fn precondition(path: &Path, config: &PreconditionConfig) -> Result<PreparedAudio> {
    let source = load_audio_asset(path)?;

    let mut builder = tempfile::Builder::new();
    builder.prefix("callsense_padded_").suffix(".wav");
    let file = match &config.temp_dir {
        Some(dir) => builder.tempfile_in(dir),
        None => builder.tempfile(),
    }
    .map_err(|e| CallError::audio(path, format!("Failed to create temp file: {}", e)))?;

    let decoded = decode_padded(path, file.as_file(), config.trailing_silence)?;
    let rate = decoded.sample_rate as f64;
    let padding_frames = silence_frames(config.trailing_silence, decoded.sample_rate);

    let prepared = PreparedAudio {
        source,
        sample_rate: decoded.sample_rate,
        channels: decoded.channels,
        source_seconds: decoded.source_frames as f64 / rate,
        padded_seconds: (decoded.source_frames + padding_frames) as f64 / rate,
        file,
    };

    info!(
        "Prepared {:?}: {:.1}s audio + {}s silence -> {:?}",
        path,
        prepared.source_seconds,
        config.trailing_silence.as_secs(),
        prepared.path()
    );

    Ok(prepared)
}

fn silence_frames(silence: Duration, sample_rate: u32) -> u64 {
    (silence.as_secs_f64() * sample_rate as f64).round() as u64
}

/// Decode `path` into `out` as WAV, then write `silence` worth of zero frames
///
/// The WAV header is written once the first packet reveals the stream
/// layout, so only one packet of PCM is held in memory at a time.
fn decode_padded(
    path: &Path,
    out: &std::fs::File,
    silence: Duration,
) -> Result<DecodedStream> {
    let file = std::fs::File::open(path).map_err(|e| CallError::audio(path, e))?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(extension) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(extension);
    }

    let probed = symphonia::default::get_probe()
        .format(&hint, mss, &FormatOptions::default(), &MetadataOptions::default())
        .map_err(|e| CallError::audio(path, format!("Unsupported container: {}", e)))?;
    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| CallError::audio(path, "No audio track found"))?;
    let track_id = track.id;
    let declared_rate = track.codec_params.sample_rate;
    let declared_channels = track.codec_params.channels.map(|c| c.count() as u16);

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(|e| CallError::audio(path, format!("Unsupported codec: {}", e)))?;

    let wav_error = |e: hound::Error| CallError::audio(path, e);

    let mut writer: Option<PaddedWriter> = None;
    let mut layout: Option<(u32, u16)> = None;
    let mut sample_buf: Option<SampleBuffer<i16>> = None;
    let mut samples_written: u64 = 0;

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                break;
            }
            Err(SymphoniaError::ResetRequired) => break,
            Err(e) => return Err(CallError::audio(path, format!("Error reading packet: {}", e))),
        };

        if packet.track_id() != track_id {
            continue;
        }

        match decoder.decode(&packet) {
            Ok(decoded) => {
                let spec = *decoded.spec();
                let this_layout = (spec.rate, spec.channels.count() as u16);
                match layout {
                    None => {
                        writer = Some(wav_writer(out, this_layout).map_err(wav_error)?);
                        layout = Some(this_layout);
                    }
                    Some(current) if current != this_layout => {
                        return Err(CallError::audio(
                            path,
                            format!("Stream layout changed mid-file: {:?} -> {:?}", current, this_layout),
                        ));
                    }
                    Some(_) => {}
                }

                let buf = sample_buf
                    .get_or_insert_with(|| SampleBuffer::new(decoded.capacity() as u64, spec));
                buf.copy_interleaved_ref(decoded);
                if let Some(writer) = writer.as_mut() {
                    for &sample in buf.samples() {
                        writer.write_sample(sample).map_err(wav_error)?;
                    }
                }
                samples_written += buf.samples().len() as u64;
            }
            Err(SymphoniaError::DecodeError(e)) => {
                warn!("Skipping corrupt packet in {:?}: {}", path, e);
            }
            Err(e) => return Err(CallError::audio(path, format!("Decode failed: {}", e))),
        }
    }

    let (sample_rate, channels) = match (layout, declared_rate, declared_channels) {
        (Some(layout), _, _) => layout,
        (None, Some(rate), Some(channels)) if rate > 0 && channels > 0 => (rate, channels),
        _ => {
            return Err(CallError::audio(path, "Could not determine sample rate or channels"));
        }
    };

    let mut writer = match writer {
        Some(writer) => writer,
        None => wav_writer(out, (sample_rate, channels)).map_err(wav_error)?,
    };

    let silence_samples = silence_frames(silence, sample_rate) * channels as u64;
    for _ in 0..silence_samples {
        writer.write_sample(0i16).map_err(wav_error)?;
    }
    writer.finalize().map_err(wav_error)?;

    let source_frames = samples_written / channels as u64;
    debug!(
        path = %path.display(),
        sample_rate,
        channels,
        source_frames,
        silence_samples,
        "Decoded and padded audio"
    );

    Ok(DecodedStream {
        sample_rate,
        channels,
        source_frames,
    })
}

/// Start a 16-bit WAV on a second handle to `out`
fn wav_writer(out: &std::fs::File, (sample_rate, channels): (u32, u16)) -> hound::Result<PaddedWriter> {
    let spec = hound::WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    hound::WavWriter::new(BufWriter::new(out.try_clone()?), spec)
}

/// Write a 16-bit WAV of `seconds` length filled with a square wave
#[cfg(test)]
pub(crate) fn write_wav_fixture(path: &Path, sample_rate: u32, channels: u16, seconds: u32) {
    let spec = hound::WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec).unwrap();
    let frames = sample_rate * seconds;
    for i in 0..frames {
        let value: i16 = if (i / 20) % 2 == 0 { 8000 } else { -8000 };
        for _ in 0..channels {
            writer.write_sample(value).unwrap();
        }
    }
    writer.finalize().unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precondition_appends_silence() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("call.wav");
        write_wav_fixture(&input, 8000, 1, 1);

        let config = PreconditionConfig {
            trailing_silence: Duration::from_secs(2),
            temp_dir: Some(dir.path().to_path_buf()),
        };
        let prepared = precondition(&input, &config).unwrap();

        assert_ne!(prepared.path(), input.as_path());
        assert_eq!(prepared.sample_rate, 8000);
        assert_eq!(prepared.channels, 1);
        assert!((prepared.source_seconds - 1.0).abs() < 1e-6);
        assert!((prepared.padded_seconds - 3.0).abs() < 1e-6);

        let mut reader = hound::WavReader::open(prepared.path()).unwrap();
        assert_eq!(reader.duration(), 24_000);
        let samples: Vec<i16> = reader.samples::<i16>().map(|s| s.unwrap()).collect();
        assert_eq!(samples[0], 8000);
        assert!(samples[8000..].iter().all(|&s| s == 0));
    }

    #[test]
    fn test_precondition_keeps_stereo_layout() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("stereo.wav");
        write_wav_fixture(&input, 16000, 2, 1);

        let config = PreconditionConfig {
            trailing_silence: Duration::from_millis(500),
            temp_dir: Some(dir.path().to_path_buf()),
        };
        let prepared = precondition(&input, &config).unwrap();

        let reader = hound::WavReader::open(prepared.path()).unwrap();
        assert_eq!(reader.spec().channels, 2);
        assert_eq!(reader.duration(), 24_000);
    }

    #[test]
    fn test_streamed_copy_matches_source_across_packets() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("long.wav");
        write_wav_fixture(&input, 48_000, 2, 5);

        let config = PreconditionConfig {
            trailing_silence: Duration::from_secs(1),
            temp_dir: Some(dir.path().to_path_buf()),
        };
        let prepared = precondition(&input, &config).unwrap();

        let source: Vec<i16> = hound::WavReader::open(&input)
            .unwrap()
            .samples::<i16>()
            .map(|s| s.unwrap())
            .collect();
        let padded: Vec<i16> = hound::WavReader::open(prepared.path())
            .unwrap()
            .samples::<i16>()
            .map(|s| s.unwrap())
            .collect();

        assert_eq!(padded.len(), source.len() + 48_000 * 2);
        assert_eq!(&padded[..source.len()], source.as_slice());
        assert!(padded[source.len()..].iter().all(|&s| s == 0));
        assert!((prepared.source_seconds - 5.0).abs() < 1e-6);
        assert!((prepared.padded_seconds - 6.0).abs() < 1e-6);
    }

    #[test]
    fn test_non_audio_rejected_before_reading() {
        // The file does not exist: the extension check must fail first
        let err = precondition(Path::new("/nonexistent/notes.txt"), &PreconditionConfig::default())
            .unwrap_err();
        assert!(matches!(err, CallError::NotAudio { .. }));
    }

    #[test]
    fn test_undecodable_audio_is_processing_error() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("broken.mp3");
        std::fs::write(&input, b"definitely not an mp3 stream").unwrap();

        let err = precondition(&input, &PreconditionConfig::default()).unwrap_err();
        assert!(matches!(err, CallError::AudioProcessing { .. }));
    }

    #[test]
    fn test_drop_removes_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("call.wav");
        write_wav_fixture(&input, 8000, 1, 1);

        let config = PreconditionConfig {
            trailing_silence: Duration::from_secs(1),
            temp_dir: Some(dir.path().to_path_buf()),
        };
        let prepared = precondition(&input, &config).unwrap();
        let temp_path = prepared.path().to_path_buf();
        assert!(temp_path.exists());

        drop(prepared);
        assert!(!temp_path.exists());
        assert!(input.exists());
    }
}
