use std::path::Path;

use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use tracing::{debug, warn};

use crate::error::{Result, WordsyncError};
use crate::types::AudioData;

fn decode_error(context: &str, err: impl std::fmt::Display) -> WordsyncError {
    WordsyncError::transcribe_failed(format!("{context}: {err}"))
}

/// Decode an audio file to mono f32 PCM at its native sample rate.
pub fn decode_audio<P: AsRef<Path>>(path: P) -> Result<AudioData> {
    let path = path.as_ref();
    let file = std::fs::File::open(path)
        .map_err(|err| decode_error(&format!("failed to open audio file {}", path.display()), err))?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(extension) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(extension);
    }

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|err| decode_error("failed to detect audio format", err))?;
    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| WordsyncError::transcribe_failed("no audio tracks found in file"))?;
    let track_id = track.id;
    let sample_rate = track
        .codec_params
        .sample_rate
        .ok_or_else(|| WordsyncError::transcribe_failed("sample rate not specified in audio file"))?;

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(|err| decode_error("failed to create decoder", err))?;

    let mut samples = Vec::new();
    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(err))
                if err.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break;
            }
            Err(err) => return Err(decode_error("failed to read packet", err)),
        };
        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(decoded) => decoded,
            // Corrupt frames are skipped, the rest of the stream is still usable.
            Err(SymphoniaError::DecodeError(reason)) => {
                warn!(reason, "skipping undecodable audio packet");
                continue;
            }
            Err(err) => return Err(decode_error("failed to decode audio packet", err)),
        };

        let spec = *decoded.spec();
        let channels = spec.channels.count();
        let mut buffer = SampleBuffer::<f32>::new(decoded.capacity() as u64, spec);
        buffer.copy_interleaved_ref(decoded);
        samples.extend(downmix_interleaved(buffer.samples(), channels));
    }

    debug!(
        samples = samples.len(),
        sample_rate,
        path = %path.display(),
        "decoded audio"
    );
    Ok(AudioData {
        samples,
        sample_rate,
    })
}

/// Average interleaved frames down to a single channel.
fn downmix_interleaved(interleaved: &[f32], channels: usize) -> Vec<f32> {
    if channels <= 1 {
        return interleaved.to_vec();
    }
    interleaved
        .chunks_exact(channels)
        .map(|frame| frame.iter().sum::<f32>() / channels as f32)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{decode_audio, downmix_interleaved};
    use crate::error::ErrorCode;

    #[test]
    fn mono_passes_through() {
        assert_eq!(downmix_interleaved(&[0.1, 0.2, 0.3], 1), vec![0.1, 0.2, 0.3]);
    }

    #[test]
    fn stereo_frames_are_averaged() {
        let mixed = downmix_interleaved(&[1.0, 0.0, 0.5, 0.5, -1.0, 1.0], 2);
        assert_eq!(mixed, vec![0.5, 0.5, 0.0]);
    }

    #[test]
    fn missing_file_is_transcription_failure() {
        let err = decode_audio("/no/such/audio.wav").unwrap_err();
        assert_eq!(err.code(), ErrorCode::TranscribeFailed);
    }
}
