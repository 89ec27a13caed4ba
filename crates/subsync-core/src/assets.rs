use std::{
    collections::BTreeSet,
    fs::File,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use symphonia::core::{
    codecs::DecoderOptions, errors::Error as SymphoniaError, formats::FormatOptions,
    io::MediaSourceStream, meta::MetadataOptions, probe::Hint,
};
use tracing::{debug, instrument, warn};
use walkdir::WalkDir;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AudioAssetEntry {
    pub path: PathBuf,
    pub extension: String,
    pub size_bytes: u64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ClipDuration {
    pub sample_rate: u32,
    pub total_frames: u64,
    pub seconds: f64,
}

/// Measures a clip by decoding it and counting frames.
#[instrument(fields(path = %path.display()))]
pub fn probe_duration(path: &Path) -> Result<ClipDuration> {
    let file = File::open(path)
        .with_context(|| format!("failed to open audio file: {}", path.display()))?;
    let source = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(extension) = path.extension().and_then(|value| value.to_str()) {
        hint.with_extension(extension);
    }

    let probed = symphonia::default::get_probe().format(
        &hint,
        source,
        &FormatOptions::default(),
        &MetadataOptions::default(),
    )?;
    let mut format = probed.format;
    let track = format
        .default_track()
        .ok_or_else(|| anyhow::anyhow!("no default audio track found in {}", path.display()))?;
    let track_id = track.id;
    let mut decoder =
        symphonia::default::get_codecs().make(&track.codec_params, &DecoderOptions::default())?;
    let mut sample_rate = track.codec_params.sample_rate.unwrap_or(0);
    let mut total_frames = 0_u64;

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(error)) if error.kind() == ErrorKind::UnexpectedEof => {
                break;
            }
            Err(SymphoniaError::ResetRequired) => {
                return Err(anyhow::anyhow!(
                    "audio stream reset required for {}",
                    path.display()
                ));
            }
            Err(error) => return Err(error.into()),
        };
        if packet.track_id() != track_id {
            continue;
        }

        match decoder.decode(&packet) {
            Ok(decoded) => {
                sample_rate = decoded.spec().rate;
                total_frames += decoded.frames() as u64;
            }
            Err(SymphoniaError::DecodeError(_)) => {}
            Err(error) => return Err(error.into()),
        }
    }

    if sample_rate == 0 {
        return Err(anyhow::anyhow!(
            "unknown sample rate for {}",
            path.display()
        ));
    }

    let seconds = total_frames as f64 / f64::from(sample_rate);
    debug!(sample_rate, total_frames, seconds, "clip duration probed");
    Ok(ClipDuration {
        sample_rate,
        total_frames,
        seconds,
    })
}

/// Lists rendered clips under `directory`, sorted by path.
#[instrument(fields(directory = %directory.display()))]
pub fn scan_audio_clips(directory: &Path) -> Result<Vec<AudioAssetEntry>> {
    if !directory.is_dir() {
        return Err(anyhow::anyhow!(
            "audio clip directory not found: {}",
            directory.display()
        ));
    }

    let extensions = supported_audio_extensions();
    let mut assets = Vec::new();

    for entry in WalkDir::new(directory).follow_links(true) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(error) => {
                warn!(?error, "ignoring unreadable entry while scanning audio clips");
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        let Some(extension) = entry
            .path()
            .extension()
            .and_then(|value| value.to_str())
            .map(str::to_ascii_lowercase)
        else {
            continue;
        };
        if !extensions.contains(extension.as_str()) {
            continue;
        }

        let size_bytes = entry.metadata().map(|meta| meta.len()).unwrap_or(0);
        assets.push(AudioAssetEntry {
            path: entry.into_path(),
            extension,
            size_bytes,
        });
    }

    assets.sort_by(|left, right| left.path.cmp(&right.path));
    debug!(count = assets.len(), "audio clip scan complete");
    Ok(assets)
}

fn supported_audio_extensions() -> BTreeSet<&'static str> {
    ["wav", "flac", "mp3", "ogg", "m4a", "aiff", "aif", "caf"]
        .into_iter()
        .collect()
}
