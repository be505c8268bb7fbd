// Copyright (C) 2026 Michael Wilson <mike@mdwn.dev>
//
// This program is free software: you can redistribute it and/or modify it under
// the terms of the GNU General Public License as published by the Free Software
// Foundation, version 3.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with
// this program. If not, see <https://www.gnu.org/licenses/>.
//
use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::signature::{SignatureChange, TimeSignature};
use crate::tempo::TempoMarker;
use crate::track::TrackError;

/// Typed error for track file load/parse failures so callers can distinguish
/// e.g. file-not-found from parse errors without string matching.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("unable to read track file: {0}")]
    Io(#[from] std::io::Error),
    #[error("unable to parse track file: {0}")]
    Parse(#[from] serde_yml::Error),
    #[error(transparent)]
    Track(#[from] TrackError),
}

/// A YAML representation of a track's musical metadata.
#[derive(Deserialize)]
struct Track {
    /// The name of the track.
    name: String,
    /// The total duration of the track in seconds.
    duration: f64,
    /// Tempo breakpoints, sorted ascending by position.
    #[serde(default)]
    tempo: Vec<Tempo>,
    /// Time signature changes, keyed by measure.
    #[serde(default)]
    signatures: Vec<Signature>,
}

/// A YAML representation of a tempo breakpoint.
#[derive(Deserialize)]
struct Tempo {
    /// Seconds from track start at which this tempo takes effect.
    position: f64,
    /// Beats per minute.
    bpm: f64,
}

/// A YAML representation of a time signature change.
#[derive(Deserialize)]
struct Signature {
    /// The 1-based measure this signature applies to.
    measure: u32,
    /// Beats per measure.
    numerator: u32,
    /// The note value that receives one beat.
    denominator: u32,
}

impl Track {
    /// Converts this track configuration into a Track object, validating the
    /// metadata in the process.
    fn to_track(&self) -> Result<crate::track::Track, TrackError> {
        crate::track::Track::new(
            self.name.clone(),
            self.duration,
            self.tempo
                .iter()
                .map(|tempo| TempoMarker::new(tempo.position, tempo.bpm))
                .collect(),
            self.signatures
                .iter()
                .map(|signature| SignatureChange {
                    measure: signature.measure,
                    signature: TimeSignature::new(signature.numerator, signature.denominator),
                })
                .collect(),
        )
    }
}

/// Parses a track's musical metadata from a YAML file.
pub fn parse_track(file: &Path) -> Result<crate::track::Track, ConfigError> {
    let track: Track = serde_yml::from_str(&fs::read_to_string(file)?)?;
    let track = track.to_track()?;

    debug!(
        name = track.name(),
        tempo_markers = track.tempo_markers().len(),
        signatures = track.signatures().len(),
        "parsed track file"
    );
    Ok(track)
}
