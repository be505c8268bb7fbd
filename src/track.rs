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
use crate::signature::{SignatureChange, SignatureTrack};
use crate::tempo::TempoMarker;

/// Typed errors for invalid track metadata, so malformed input fails fast at
/// construction instead of producing a nonsensical beat grid.
#[derive(Debug, thiserror::Error)]
pub enum TrackError {
    #[error("invalid duration {0}: must be a non-negative number of seconds")]
    InvalidDuration(f64),
    #[error("invalid tempo marker at {position}s: BPM {bpm} must be positive")]
    InvalidTempo { position: f64, bpm: f64 },
    #[error("tempo markers must be sorted ascending by position: {position}s appears after {previous}s")]
    UnsortedTempo { previous: f64, position: f64 },
    #[error("invalid time signature {numerator}/{denominator} at measure {measure}")]
    InvalidSignature {
        measure: u32,
        numerator: u32,
        denominator: u32,
    },
}

/// The musical metadata of a single audio track: its duration, its tempo
/// breakpoints, and its time signature timeline. This is everything the
/// marker calculator needs; the audio itself lives elsewhere.
#[derive(Debug, Clone)]
pub struct Track {
    /// The name of the track.
    name: String,
    /// The total duration of the track in seconds.
    duration_seconds: f64,
    /// Tempo breakpoints, sorted ascending by position.
    tempo_markers: Vec<TempoMarker>,
    /// The time signature timeline.
    signatures: SignatureTrack,
}

impl Track {
    /// Creates a new track, validating the metadata. Tempo markers must be
    /// sorted strictly ascending by position with positive BPM values;
    /// signature changes must name a 1-based measure and a signature with
    /// non-zero numerator and denominator.
    pub fn new(
        name: String,
        duration_seconds: f64,
        tempo_markers: Vec<TempoMarker>,
        signature_changes: Vec<SignatureChange>,
    ) -> Result<Track, TrackError> {
        if !duration_seconds.is_finite() || duration_seconds < 0.0 {
            return Err(TrackError::InvalidDuration(duration_seconds));
        }

        let mut previous: Option<f64> = None;
        for marker in tempo_markers.iter() {
            if !marker.bpm.is_finite() || marker.bpm <= 0.0 || !marker.position.is_finite() {
                return Err(TrackError::InvalidTempo {
                    position: marker.position,
                    bpm: marker.bpm,
                });
            }
            if let Some(previous) = previous {
                if marker.position <= previous {
                    return Err(TrackError::UnsortedTempo {
                        previous,
                        position: marker.position,
                    });
                }
            }
            previous = Some(marker.position);
        }

        let mut signatures = SignatureTrack::new();
        for change in signature_changes {
            if change.measure < 1
                || change.signature.numerator < 1
                || change.signature.denominator < 1
            {
                return Err(TrackError::InvalidSignature {
                    measure: change.measure,
                    numerator: change.signature.numerator,
                    denominator: change.signature.denominator,
                });
            }
            signatures.push(change);
        }

        Ok(Track {
            name,
            duration_seconds,
            tempo_markers,
            signatures,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn duration_seconds(&self) -> f64 {
        self.duration_seconds
    }

    pub fn tempo_markers(&self) -> &[TempoMarker] {
        &self.tempo_markers
    }

    pub fn signatures(&self) -> &SignatureTrack {
        &self.signatures
    }
}
