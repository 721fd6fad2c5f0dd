//! Whole-file decoding into stereo frames at the output rate.

use anyhow::{Context, Result};
use std::path::Path;
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::DecoderOptions;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

/// Interleaved stereo samples ready for the output callback
#[derive(Debug, Clone, Default)]
pub struct DecodedTrack {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
}

impl DecodedTrack {
    /// Zero-length track played in place of one that failed to load
    pub fn silent(sample_rate: u32) -> Self {
        Self {
            samples: Vec::new(),
            sample_rate,
        }
    }

    /// Number of stereo frames
    pub fn frames(&self) -> usize {
        self.samples.len() / 2
    }

    pub fn frame(&self, index: usize) -> Option<(f32, f32)> {
        let i = index * 2;
        Some((*self.samples.get(i)?, *self.samples.get(i + 1)?))
    }

    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.frames() as f64 / self.sample_rate as f64
    }
}

/// Decode `path` completely and convert it to stereo at `output_rate`
pub fn decode_track(path: &Path, output_rate: u32) -> Result<DecodedTrack> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open audio file: {}", path.display()))?;

    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let detected = symphonia::default::get_probe()
        .format(&hint, mss, &FormatOptions::default(), &MetadataOptions::default())
        .context("Failed to detect audio format")?;

    let mut format = detected.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != symphonia::core::codecs::CODEC_TYPE_NULL)
        .context("No audio tracks found")?;

    let track_id = track.id;
    let channels = track.codec_params.channels.map_or(1, |c| c.count()).max(1);
    let sample_rate = track.codec_params.sample_rate.context("Unknown sample rate")?;

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .context("Failed to create audio decoder")?;

    let mut interleaved: Vec<f32> = Vec::new();

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(symphonia::core::errors::Error::IoError(ref e))
                if e.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break;
            }
            Err(e) => return Err(e.into()),
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(d) => d,
            Err(symphonia::core::errors::Error::DecodeError(_)) => continue,
            Err(e) => return Err(e.into()),
        };

        let spec = *decoded.spec();
        let mut sample_buf = SampleBuffer::<f32>::new(decoded.capacity() as u64, spec);
        sample_buf.copy_interleaved_ref(decoded);
        interleaved.extend_from_slice(sample_buf.samples());
    }

    let stereo = to_stereo(&interleaved, channels);
    let samples = resample_linear(&stereo, sample_rate, output_rate);

    let decoded = DecodedTrack {
        samples,
        sample_rate: output_rate,
    };
    log::info!(
        "Decoded {}: {} ch @ {}Hz -> stereo @ {}Hz, {:.1}s",
        path.display(),
        channels,
        sample_rate,
        output_rate,
        decoded.duration_secs()
    );

    Ok(decoded)
}

/// Mono is duplicated; wider layouts keep their front pair
fn to_stereo(interleaved: &[f32], channels: usize) -> Vec<f32> {
    match channels {
        0 => Vec::new(),
        1 => interleaved.iter().flat_map(|&s| [s, s]).collect(),
        2 => interleaved.to_vec(),
        _ => interleaved
            .chunks_exact(channels)
            .flat_map(|frame| [frame[0], frame[1]])
            .collect(),
    }
}

/// Linear interpolation between neighbouring stereo frames
fn resample_linear(stereo: &[f32], from_rate: u32, to_rate: u32) -> Vec<f32> {
    if from_rate == to_rate || from_rate == 0 || to_rate == 0 {
        return stereo.to_vec();
    }

    let in_frames = stereo.len() / 2;
    if in_frames == 0 {
        return Vec::new();
    }

    let ratio = from_rate as f64 / to_rate as f64;
    let out_frames = (in_frames as f64 / ratio).round() as usize;
    let mut out = Vec::with_capacity(out_frames * 2);

    for j in 0..out_frames {
        let pos = j as f64 * ratio;
        let i = (pos.floor() as usize).min(in_frames - 1);
        let next = (i + 1).min(in_frames - 1);
        let frac = (pos - i as f64).clamp(0.0, 1.0) as f32;

        for ch in 0..2 {
            let a = stereo[i * 2 + ch];
            let b = stereo[next * 2 + ch];
            out.push(a + (b - a) * frac);
        }
    }

    out
}
